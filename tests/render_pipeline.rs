//! End-to-end rendering through the public API.

use std::f32::consts::FRAC_PI_2;

use softscene::mesh::DEFAULT_FACE_COLOR;
use softscene::prelude::*;

const SIZE: u32 = 129;

fn camera(origin: Vec3, direction: Vec3) -> Camera {
    Camera::perspective_fov(origin, direction, Vec3::Y, FRAC_PI_2, FRAC_PI_2, 1.0, 100.0).unwrap()
}

/// Side-2 cube at z = 5 with its +Z side red, its -Z side blue and the rest green.
fn coloured_cube() -> Mesh {
    coloured_cube_at(Vec3::new(0.0, 0.0, 5.0), 2.0)
}

fn coloured_cube_at(origin: Vec3, side: f32) -> Mesh {
    let mut cube = builders::cube(origin, side);
    for (i, face) in cube.faces_mut().iter_mut().enumerate() {
        face.color = match i {
            0 | 1 => colors::RED,
            2 | 3 => colors::BLUE,
            _ => colors::GREEN,
        };
    }
    cube
}

fn pixel(surface: &RgbaImage, x: u32, y: u32) -> u32 {
    colors::from_rgba(*surface.get_pixel(x, y))
}

/// Inclusive bounds of every pixel that differs from `background`.
fn drawn_bounds(surface: &RgbaImage, background: u32) -> Option<(u32, u32, u32, u32)> {
    surface
        .enumerate_pixels()
        .filter(|(_, _, p)| colors::from_rgba(**p) != background)
        .fold(None, |acc, (x, y, _)| match acc {
            None => Some((x, y, x, y)),
            Some((x0, y0, x1, y1)) => Some((x0.min(x), y0.min(y), x1.max(x), y1.max(y))),
        })
}

#[test]
fn cube_ahead_is_centred() {
    let mut scene = Scene::new(SIZE, SIZE, colors::WHITE);
    scene.add_camera(camera(Vec3::ZERO, Vec3::Z));
    scene.add_shape(coloured_cube());

    let mut surface = RgbaImage::new(SIZE, SIZE);
    let stats = scene.render(&mut surface).unwrap();
    assert_eq!(stats.faces_drawn, 2);
    assert_eq!(stats.faces_culled, 10);

    let (x0, y0, x1, y1) = drawn_bounds(&surface, colors::WHITE).unwrap();
    // The near side spans x, y in [-0.25, 0.25] after projection.
    assert!((x0 + x1).abs_diff(SIZE - 1) <= 1, "x bounds {x0}..{x1}");
    assert!((y0 + y1).abs_diff(SIZE - 1) <= 1, "y bounds {y0}..{y1}");
    assert!((46..=50).contains(&x0), "x0 = {x0}");
    assert!(x0 > 0 && y0 > 0);
}

#[test]
fn unit_cube_at_origin_fills_the_centre() {
    let mut scene = Scene::new(512, 512, colors::WHITE);
    let mut eye = camera(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
    eye.look_at(Vec3::ZERO, Vec3::Y).unwrap();
    scene.add_camera(eye);
    scene.add_shape(coloured_cube_at(Vec3::ZERO, 1.0));

    let mut surface = RgbaImage::new(512, 512);
    let stats = scene.render(&mut surface).unwrap();
    let (x0, y0, x1, y1) = drawn_bounds(&surface, colors::WHITE).unwrap();
    assert!((x0 + x1).abs_diff(511) <= 2, "x bounds {x0}..{x1}");
    assert!((y0 + y1).abs_diff(511) <= 2, "y bounds {y0}..{y1}");
    assert_eq!(stats.faces_drawn, 2);
    assert_eq!(pixel(&surface, 245, 250), colors::RED);

    // Turn around about up and step through to the far side.
    let id = scene.render_camera_id().unwrap();
    let eye = scene.camera_mut(id).unwrap();
    eye.rotate(CameraAxis::Up, std::f32::consts::PI);
    eye.set_origin(Vec3::new(0.0, 0.0, -5.0));
    let stats = scene.render(&mut surface).unwrap();
    assert_eq!(stats.faces_drawn, 2);
    assert_eq!(stats.faces_culled, 10);
    assert_eq!(pixel(&surface, 245, 250), colors::BLUE);
    let (x0, _, x1, _) = drawn_bounds(&surface, colors::WHITE).unwrap();
    assert!((x0 + x1).abs_diff(511) <= 2, "x bounds {x0}..{x1}");
}

#[test]
fn culling_follows_the_viewpoint() {
    let mut scene = Scene::new(SIZE, SIZE, colors::WHITE);
    let front = scene.add_camera(camera(Vec3::ZERO, Vec3::Z));
    let back = scene.add_camera(camera(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z));
    scene.add_shape(coloured_cube());
    let mut surface = RgbaImage::new(SIZE, SIZE);

    assert!(scene.set_render_camera(front));
    scene.render(&mut surface).unwrap();
    assert_eq!(pixel(&surface, 56, 60), colors::BLUE);

    assert!(scene.set_render_camera(back));
    let stats = scene.render(&mut surface).unwrap();
    assert_eq!(stats.faces_drawn, 2);
    assert_eq!(pixel(&surface, 56, 60), colors::RED);
}

#[test]
fn rendering_is_deterministic() {
    let mut scene = Scene::new(SIZE, SIZE, colors::WHITE);
    scene.add_camera(camera(Vec3::new(3.0, 2.0, -1.0), Vec3::Z));
    scene.add_shape(coloured_cube());
    let mut sphere = builders::sphere(Vec3::new(1.0, 0.0, 8.0), 1.5, 6, 10);
    sphere.draw_spots = true;
    scene.add_shape(sphere);

    let mut first = RgbaImage::new(SIZE, SIZE);
    let mut second = RgbaImage::new(SIZE, SIZE);
    scene.render(&mut first).unwrap();
    scene.render(&mut second).unwrap();
    assert_eq!(first, second);
}

#[test]
fn obj_triangle_renders() {
    let mut scene = Scene::new(SIZE, SIZE, colors::WHITE);
    scene.add_camera(camera(Vec3::ZERO, Vec3::Z));
    let id = scene
        .add_from_obj_str("v -1 -1 5\nv 1 -1 5\nv 0 1 5\nf 1 3 2\n")
        .unwrap();
    assert!(scene.shape(id).is_some());

    let mut surface = RgbaImage::new(SIZE, SIZE);
    let stats = scene.render(&mut surface).unwrap();
    assert_eq!(stats.faces_drawn, 1);
    assert_eq!(pixel(&surface, SIZE / 2, SIZE / 2), DEFAULT_FACE_COLOR);
}

#[test]
fn failed_obj_load_leaves_scene_untouched() {
    let mut scene = Scene::new(SIZE, SIZE, colors::WHITE);
    scene.add_camera(camera(Vec3::ZERO, Vec3::Z));
    let first = scene.add_shape(coloured_cube());

    let mut before = RgbaImage::new(SIZE, SIZE);
    scene.render(&mut before).unwrap();

    for text in [
        "v 0 0 5\nv 1 0 5\nf 1 2 3\n",
        "v 0 0 5\nv 1 zero 5\nv 0 1 5\nf 1 2 3\n",
        "v 0 0 5\nv 1 0 5\nv nan 1 5\nf 1 2 3\n",
    ] {
        assert!(scene.add_from_obj_str(text).is_err(), "{text:?}");
    }
    assert_eq!(scene.shapes().len(), 1);
    assert_eq!(scene.shapes()[0].id(), first);

    let mut after = RgbaImage::new(SIZE, SIZE);
    scene.render(&mut after).unwrap();
    assert_eq!(before, after);

    // Failed loads consume no ids.
    let next = scene.add_shape(builders::cube(Vec3::ZERO, 1.0));
    assert_eq!(next.get(), first.get() + 1);
}

#[test]
fn everything_behind_the_camera_leaves_the_background() {
    let mut scene = Scene::new(SIZE, SIZE, colors::GRAY);
    scene.add_camera(camera(Vec3::ZERO, Vec3::NEG_Z));
    scene.add_shape(coloured_cube());

    let mut surface = RgbaImage::new(SIZE, SIZE);
    scene.render(&mut surface).unwrap();
    assert_eq!(drawn_bounds(&surface, colors::GRAY), None);
}
