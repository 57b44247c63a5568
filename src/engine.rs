//! Headless driver.
//!
//! [`Engine`] polls a [`FrameClock`], applies held camera commands once per
//! logic update and renders the shared scene into its own surface when a
//! frame is due. It never sleeps: the caller decides how often to call
//! [`Engine::tick`] and with which clock.

use std::sync::Arc;
use std::time::Instant;

use image::RgbaImage;
use log::{debug, info, warn};

use crate::camera::{Camera, CameraCommand, CameraController};
use crate::colors;
use crate::config::{RenderConfig, TimingConfig};
use crate::error::{GeometryError, RenderError};
use crate::light::DistantLight;
use crate::math::Vec3;
use crate::mesh::builders;
use crate::scene::{CameraId, Scene, SharedScene};
use crate::texture::Texture;
use crate::timing::{FpsCounter, FpsReport, FrameClock, Tick};

pub struct Engine {
    scene: SharedScene,
    clock: FrameClock,
    fps: FpsCounter,
    controller: CameraController,
    surface: RgbaImage,
    frames_rendered: u64,
    last_report: Option<FpsReport>,
}

impl Engine {
    pub fn new(
        scene: SharedScene,
        timing: &TimingConfig,
        controller: CameraController,
    ) -> Result<Self, RenderError> {
        let (width, height) = scene.with(|s| (s.width(), s.height()))?;
        Ok(Self {
            scene,
            clock: FrameClock::new(timing.frames_per_second, timing.updates_per_second),
            fps: FpsCounter::new(),
            controller,
            surface: RgbaImage::new(width, height),
            frames_rendered: 0,
            last_report: None,
        })
    }

    pub fn scene(&self) -> &SharedScene {
        &self.scene
    }

    /// The most recently rendered frame.
    pub fn surface(&self) -> &RgbaImage {
        &self.surface
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn last_report(&self) -> Option<FpsReport> {
        self.last_report
    }

    /// Advances the clock to `now`.
    ///
    /// Every due update applies `commands` to the render camera for one update
    /// step; a due frame renders the scene into the surface.
    pub fn tick(&mut self, now: Instant, commands: &[CameraCommand]) -> Result<Tick, RenderError> {
        let tick = self.clock.tick(now);

        if tick.updates > 0 && !commands.is_empty() {
            let step = tick.update_step.as_secs_f32();
            let controller = &self.controller;
            self.scene.with(|scene| {
                if let Some(camera) = scene.render_camera_mut() {
                    for _ in 0..tick.updates {
                        controller.apply(camera, commands, step);
                    }
                }
            })?;
        }

        if tick.render {
            let mut scene = self.scene.lock()?;
            let size = (scene.width(), scene.height());
            if self.surface.dimensions() != size {
                self.surface = RgbaImage::new(size.0, size.1);
            }
            scene.render(&mut self.surface)?;
            self.frames_rendered += 1;
        }

        if let Some(report) = self.fps.record(now, &tick) {
            debug!("FPS: {}, UPS: {}", report.frames, report.updates);
            self.last_report = Some(report);
        }

        Ok(tick)
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), RenderError> {
        self.scene.resize(width, height)?;
        self.surface = RgbaImage::new(width, height);
        Ok(())
    }

    pub fn cycle_camera(&self) -> Result<Option<CameraId>, RenderError> {
        self.scene.with(|scene| scene.cycle_render_camera())
    }
}

/// Perspective camera placed and aimed as configured.
pub fn configured_camera(config: &RenderConfig) -> Result<Camera, GeometryError> {
    let c = &config.camera;
    let mut camera = Camera::perspective_fov(
        Vec3::from(c.position),
        Vec3::NEG_Z,
        Vec3::Y,
        c.fov_x.to_radians(),
        c.fov_y.to_radians(),
        c.near,
        c.far,
    )?;
    camera.look_at(Vec3::from(c.target), Vec3::Y)?;
    Ok(camera)
}

pub fn configured_controller(config: &RenderConfig) -> CameraController {
    CameraController::new(config.camera.pan_speed, config.camera.tilt_speed.to_radians())
}

/// Scene shown by the demo binary: a cube, a textured floor, a sphere with
/// vertex spots, the world axes, one light and two cameras.
///
/// An OBJ file named in the config is added too; if it fails to load the
/// scene is built without it.
pub fn demo_scene(config: &RenderConfig) -> Result<Scene, GeometryError> {
    let mut scene = Scene::new(
        config.surface.width,
        config.surface.height,
        config.surface.background_color(),
    );

    scene.add_camera(configured_camera(config)?);
    scene.add_camera(Camera::orthogonal(
        Vec3::new(0.0, 250.0, 0.0),
        Vec3::NEG_Y,
        Vec3::NEG_Z,
        400.0,
        300.0,
        1.0,
        500.0,
    )?);

    if config.debug.show_axes {
        scene.add_axes(100.0);
    }

    let mut cube = builders::cube(Vec3::ZERO, 50.0);
    cube.set_face_color(colors::rgb(0x4c, 0xaf, 0x50));
    scene.add_shape(cube);

    let texture = Arc::new(Texture::checkerboard(64, 8, colors::GRAY, colors::WHITE));
    let mut floor = builders::plane(Vec3::new(0.0, -40.0, 0.0), 300.0, 300.0);
    floor.set_texture(texture);
    floor.draw_edges = false;
    scene.add_shape(floor);

    let mut sphere = builders::sphere(Vec3::new(90.0, 0.0, -40.0), 25.0, 8, 12);
    sphere.set_face_color(colors::CYAN);
    sphere.draw_spots = true;
    scene.add_shape(sphere);

    scene.add_light(DistantLight::pointed_at(Vec3::new(0.0, 200.0, 0.0), Vec3::ZERO)?);

    if let Some(path) = &config.demo.obj {
        match scene.add_from_obj(path) {
            Ok(id) => info!("loaded {} as {}", path.display(), id),
            Err(e) => warn!("failed to load {}: {}", path.display(), e),
        }
    }

    info!(
        "demo scene ready: {} shapes, {} lights",
        scene.shapes().len(),
        scene.light_count()
    );
    Ok(scene)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::CameraAxis;
    use approx::assert_relative_eq;
    use std::time::Duration;

    fn small_config() -> RenderConfig {
        let mut config = RenderConfig::default();
        config.surface.width = 80;
        config.surface.height = 60;
        config
    }

    fn engine(config: &RenderConfig) -> Engine {
        let scene = SharedScene::new(demo_scene(config).unwrap());
        Engine::new(scene, &config.timing, configured_controller(config)).unwrap()
    }

    #[test]
    fn configured_camera_looks_at_target() {
        let config = RenderConfig::default();
        let camera = configured_camera(&config).unwrap();
        let expected = (Vec3::from(config.camera.target) - Vec3::from(config.camera.position)).normalize();
        assert_relative_eq!(camera.direction(), expected, epsilon = 1e-5);
    }

    #[test]
    fn demo_scene_has_everything() {
        let scene = demo_scene(&small_config()).unwrap();
        // Three axes, cube, floor, sphere.
        assert_eq!(scene.shapes().len(), 6);
        assert_eq!(scene.camera_ids().count(), 2);
        assert_eq!(scene.light_count(), 1);
    }

    #[test]
    fn missing_obj_is_skipped() {
        let mut config = small_config();
        config.demo.obj = Some("/nonexistent/softscene/model.obj".into());
        assert_eq!(demo_scene(&config).unwrap().shapes().len(), 6);
    }

    #[test]
    fn renders_on_schedule() {
        let config = small_config();
        let mut engine = engine(&config);
        let t0 = Instant::now();
        engine.tick(t0, &[]).unwrap();
        assert_eq!(engine.frames_rendered(), 0);

        let tick = engine.tick(t0 + Duration::from_millis(20), &[]).unwrap();
        assert!(tick.render);
        assert_eq!(engine.frames_rendered(), 1);
        assert_eq!(engine.surface().dimensions(), (80, 60));
    }

    #[test]
    fn commands_move_render_camera() {
        let config = small_config();
        let mut engine = engine(&config);
        let before = engine
            .scene()
            .with(|s| s.render_camera().unwrap().origin())
            .unwrap();

        let t0 = Instant::now();
        engine.tick(t0, &[]).unwrap();
        let pan = [CameraCommand::Pan {
            axis: CameraAxis::Up,
            amount: 1.0,
        }];
        let tick = engine.tick(t0 + Duration::from_millis(50), &pan).unwrap();
        assert!(tick.updates >= 2);

        let after = engine
            .scene()
            .with(|s| s.render_camera().unwrap().origin())
            .unwrap();
        let expected = config.camera.pan_speed * tick.update_step.as_secs_f32() * tick.updates as f32;
        assert_relative_eq!((after - before).magnitude(), expected, epsilon = 1e-3);
    }

    #[test]
    fn resize_reallocates_surface() {
        let config = small_config();
        let mut engine = engine(&config);
        engine.resize(40, 30).unwrap();
        let t0 = Instant::now();
        engine.tick(t0, &[]).unwrap();
        engine.tick(t0 + Duration::from_millis(20), &[]).unwrap();
        assert_eq!(engine.surface().dimensions(), (40, 30));
    }

    #[test]
    fn cycle_switches_to_second_camera() {
        let engine = engine(&small_config());
        let first = engine.scene().with(|s| s.render_camera_id()).unwrap();
        let next = engine.cycle_camera().unwrap();
        assert_ne!(first, next);
    }
}
