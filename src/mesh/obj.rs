//! Wavefront OBJ ingestion.
//!
//! Understands the geometry subset of the format:
//!
//! | Line | Meaning |
//! |---|---|
//! | `v x y z [w]` | vertex, `w` defaults to 1 |
//! | `vt u [v] [w]` | texture coordinate, `v` defaults to 0 |
//! | `f c1 c2 c3 ...` | face; each corner is `v`, `v/vt`, `v//vn` or `v/vt/vn` |
//! | `l v1 v2 ...` | polyline, one edge per consecutive pair |
//! | `# ...` | comment |
//!
//! Indices are 1-based; negative indices count back from the most recent
//! element. Faces with more than three corners are split into a triangle fan.
//! Any other statement is ignored. A malformed number or an index that does
//! not name an earlier element fails the whole load, as does a coordinate
//! that is not finite.

use std::path::Path;

use log::debug;
use nom::{
    bytes::complete::take_till,
    character::complete::{char, i64 as integer, space0, space1},
    combinator::{all_consuming, map, opt, verify},
    multi::many1,
    number::complete::float,
    sequence::{pair, preceded, terminated, tuple},
    IResult,
};

use crate::error::LoadError;
use crate::math::{Vec3, Vec4};

use super::{Edge, Face, Mesh};

/// A face corner before index resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Corner {
    vertex: i64,
    texture: Option<i64>,
}

#[derive(Debug, Clone, PartialEq)]
enum Statement {
    Vertex(Vec4),
    TexCoord(f32, f32),
    Face(Vec<Corner>),
    Polyline(Vec<Corner>),
    Ignored,
}

/// Geometry read from OBJ text, with every index resolved to 0-based.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjData {
    pub vertices: Vec<Vec4>,
    pub tex_coords: Vec<(f32, f32)>,
    pub edges: Vec<[usize; 2]>,
    pub faces: Vec<ObjFace>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ObjFace {
    pub vertices: [usize; 3],
    pub tex_coords: Option<[usize; 3]>,
}

// ============ Parsers ============

/// A coordinate. `nan`, `inf` and values that overflow `f32` are rejected.
fn finite(input: &str) -> IResult<&str, f32> {
    verify(float, |value: &f32| value.is_finite())(input)
}

fn vertex(input: &str) -> IResult<&str, Statement> {
    map(
        tuple((
            preceded(space0, finite),
            preceded(space1, finite),
            preceded(space1, finite),
            opt(preceded(space1, finite)),
        )),
        |(x, y, z, w)| Statement::Vertex(Vec4::new(x, y, z, w.unwrap_or(1.0))),
    )(input)
}

fn tex_coord(input: &str) -> IResult<&str, Statement> {
    map(
        tuple((
            preceded(space0, finite),
            opt(preceded(space1, finite)),
            opt(preceded(space1, finite)),
        )),
        |(u, v, _w)| Statement::TexCoord(u, v.unwrap_or(0.0)),
    )(input)
}

/// `v`, `v/vt`, `v//vn` or `v/vt/vn`.
fn corner(input: &str) -> IResult<&str, Corner> {
    map(
        pair(
            integer,
            opt(preceded(
                char('/'),
                terminated(opt(integer), opt(preceded(char('/'), integer))),
            )),
        ),
        |(vertex, rest)| Corner {
            vertex,
            texture: rest.flatten(),
        },
    )(input)
}

fn corners(input: &str) -> IResult<&str, Vec<Corner>> {
    many1(preceded(space1, corner))(input)
}

fn face(input: &str) -> IResult<&str, Statement> {
    map(corners, Statement::Face)(input)
}

fn polyline(input: &str) -> IResult<&str, Statement> {
    map(corners, Statement::Polyline)(input)
}

/// Parses one comment-free, non-empty line.
fn statement(line: &str) -> Result<Statement, String> {
    let keyword_result: IResult<&str, &str> = take_till(|c: char| c.is_whitespace())(line);
    let (rest, keyword) = keyword_result.map_err(|e| e.to_string())?;

    let body: fn(&str) -> IResult<&str, Statement> = match keyword {
        "v" => vertex,
        "vt" => tex_coord,
        "f" => face,
        "l" => polyline,
        _ => return Ok(Statement::Ignored),
    };

    all_consuming(terminated(body, space0))(rest)
        .map(|(_, statement)| statement)
        .map_err(|e| format!("invalid '{}' statement: {}", keyword, e))
}

// ============ Resolution ============

fn resolve(line: usize, index: i64, count: usize) -> Result<usize, LoadError> {
    let resolved = if index > 0 {
        index - 1
    } else {
        count as i64 + index
    };
    if index == 0 || resolved < 0 || resolved >= count as i64 {
        return Err(LoadError::IndexOutOfRange { line, index, count });
    }
    Ok(resolved as usize)
}

/// Parses OBJ text. Nothing is returned unless the whole input is valid.
pub fn parse(text: &str) -> Result<ObjData, LoadError> {
    let mut data = ObjData::default();

    for (number, raw) in text.lines().enumerate() {
        let line = number + 1;
        let content = raw.split('#').next().unwrap_or("").trim();
        if content.is_empty() {
            continue;
        }

        let parsed = statement(content).map_err(|message| LoadError::Parse { line, message })?;
        match parsed {
            Statement::Vertex(v) => data.vertices.push(v),
            Statement::TexCoord(u, v) => data.tex_coords.push((u, v)),
            Statement::Polyline(points) => {
                if points.len() < 2 {
                    return Err(LoadError::Parse {
                        line,
                        message: "polyline needs at least two points".to_string(),
                    });
                }
                let indices = points
                    .iter()
                    .map(|c| resolve(line, c.vertex, data.vertices.len()))
                    .collect::<Result<Vec<_>, _>>()?;
                data.edges
                    .extend(indices.windows(2).map(|pair| [pair[0], pair[1]]));
            }
            Statement::Face(points) => {
                if points.len() < 3 {
                    return Err(LoadError::Parse {
                        line,
                        message: "face needs at least three corners".to_string(),
                    });
                }
                let vertices = points
                    .iter()
                    .map(|c| resolve(line, c.vertex, data.vertices.len()))
                    .collect::<Result<Vec<_>, _>>()?;
                let tex_coords = points
                    .iter()
                    .map(|c| c.texture.map(|t| resolve(line, t, data.tex_coords.len())))
                    .collect::<Option<Result<Vec<_>, _>>>()
                    .transpose()?;

                for i in 1..vertices.len() - 1 {
                    data.faces.push(ObjFace {
                        vertices: [vertices[0], vertices[i], vertices[i + 1]],
                        tex_coords: tex_coords.as_ref().map(|t| [t[0], t[i], t[i + 1]]),
                    });
                }
            }
            Statement::Ignored => {}
        }
    }

    Ok(data)
}

impl ObjData {
    /// Builds a mesh at the world origin in the default orientation.
    pub fn into_mesh(self) -> Mesh {
        let edges = self.edges.iter().map(|&[a, b]| Edge::new(a, b)).collect();
        let faces = self
            .faces
            .iter()
            .map(|f| {
                let [a, b, c] = f.vertices;
                let mut face = Face::new(a, b, c);
                face.uvs = f.tex_coords.map(|t| {
                    t.map(|i| {
                        let (u, v) = self.tex_coords[i];
                        Vec3::new(u, v, 1.0)
                    })
                });
                face
            })
            .collect();
        Mesh::from_checked(self.vertices, edges, faces)
    }
}

impl Mesh {
    /// Parses OBJ text into a mesh.
    pub fn from_obj_str(text: &str) -> Result<Mesh, LoadError> {
        let data = parse(text)?;
        debug!(
            "parsed OBJ: {} vertices, {} edges, {} faces",
            data.vertices.len(),
            data.edges.len(),
            data.faces.len()
        );
        Ok(data.into_mesh())
    }

    /// Reads and parses an OBJ file.
    pub fn load_obj<P: AsRef<Path>>(path: P) -> Result<Mesh, LoadError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_obj_str(&text)
    }
}
