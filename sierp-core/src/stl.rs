//! STL export of generated frames, and a binary/ASCII STL reader
use std::fmt::Write as _;

use nom::{
    bytes::complete::{tag, take_till},
    character::complete::{multispace0, multispace1},
    multi::{count, many0},
    number::complete::{float, le_f32, le_u16},
    sequence::preceded,
    IResult,
};
use thiserror::Error;

use crate::buffers::MeshBuffers;

const HEADER_LEN: usize = 80;
const FACET_LEN: usize = 50;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StlError {
    #[error("file too small to be a valid STL ({0} bytes)")]
    TooSmall(usize),
    #[error("header announces {expected} facets but only {found} bytes of facet data follow")]
    Truncated { expected: usize, found: usize },
    #[error("failed to parse ASCII STL: {0}")]
    Ascii(String),
}

/// One facet: flat normal and three vertices
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Facet {
    pub normal: [f32; 3],
    pub vertices: [[f32; 3]; 3],
}

/// A parsed STL triangle soup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StlMesh {
    pub facets: Vec<Facet>,
}

fn facets(buffers: &MeshBuffers) -> impl Iterator<Item = Facet> + '_ {
    buffers.triangles().enumerate().map(|(i, vertices)| Facet {
        normal: buffers.normal(i * 3),
        vertices,
    })
}

/// Encode a frame as binary STL
pub fn to_binary(buffers: &MeshBuffers, name: &str) -> Vec<u8> {
    let triangles = buffers.triangle_count();
    let mut data = Vec::with_capacity(HEADER_LEN + 4 + triangles * FACET_LEN);

    let mut header = [0u8; HEADER_LEN];
    let name = name.as_bytes();
    let len = name.len().min(HEADER_LEN);
    header[..len].copy_from_slice(&name[..len]);
    data.extend_from_slice(&header);
    data.extend_from_slice(&(triangles as u32).to_le_bytes());

    for facet in facets(buffers) {
        for value in facet.normal.iter().chain(facet.vertices.iter().flatten()) {
            data.extend_from_slice(&value.to_le_bytes());
        }
        // Attribute byte count
        data.extend_from_slice(&0u16.to_le_bytes());
    }

    data
}

/// Encode a frame as ASCII STL
pub fn to_ascii(buffers: &MeshBuffers, name: &str) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "solid {name}");
    for facet in facets(buffers) {
        let [nx, ny, nz] = facet.normal;
        let _ = writeln!(out, "  facet normal {nx:e} {ny:e} {nz:e}");
        let _ = writeln!(out, "    outer loop");
        for [x, y, z] in facet.vertices {
            let _ = writeln!(out, "      vertex {x:e} {y:e} {z:e}");
        }
        let _ = writeln!(out, "    endloop");
        let _ = writeln!(out, "  endfacet");
    }
    let _ = writeln!(out, "endsolid {name}");
    out
}

/// Parse a binary STL file
pub fn parse_binary_stl(data: &[u8]) -> Result<StlMesh, StlError> {
    if data.len() < HEADER_LEN + 4 {
        return Err(StlError::TooSmall(data.len()));
    }

    let body = &data[HEADER_LEN + 4..];
    let expected = u32::from_le_bytes([
        data[HEADER_LEN],
        data[HEADER_LEN + 1],
        data[HEADER_LEN + 2],
        data[HEADER_LEN + 3],
    ]) as usize;
    let truncated = StlError::Truncated {
        expected,
        found: body.len(),
    };
    if body.len() < expected.saturating_mul(FACET_LEN) {
        return Err(truncated);
    }

    match count(parse_binary_facet, expected)(body) {
        Ok((_, facets)) => Ok(StlMesh { facets }),
        Err(_) => Err(truncated),
    }
}

fn parse_binary_facet(input: &[u8]) -> IResult<&[u8], Facet> {
    let (input, normal) = parse_le_vector3(input)?;
    let (input, a) = parse_le_vector3(input)?;
    let (input, b) = parse_le_vector3(input)?;
    let (input, c) = parse_le_vector3(input)?;
    let (input, _attributes) = le_u16(input)?;
    Ok((
        input,
        Facet {
            normal,
            vertices: [a, b, c],
        },
    ))
}

fn parse_le_vector3(input: &[u8]) -> IResult<&[u8], [f32; 3]> {
    let (input, x) = le_f32(input)?;
    let (input, y) = le_f32(input)?;
    let (input, z) = le_f32(input)?;
    Ok((input, [x, y, z]))
}

/// Parse an ASCII STL file
pub fn parse_ascii_stl(input: &str) -> Result<StlMesh, StlError> {
    match parse_ascii_stl_impl(input) {
        Ok((_, mesh)) => Ok(mesh),
        Err(e) => Err(StlError::Ascii(format!("{e:?}"))),
    }
}

fn parse_ascii_stl_impl(input: &str) -> IResult<&str, StlMesh> {
    let (input, _) = preceded(multispace0, tag("solid"))(input)?;
    let (input, _name) = take_till(|c| c == '\n')(input)?;
    let (input, facets) = many0(parse_facet)(input)?;
    let (input, _) = preceded(multispace0, tag("endsolid"))(input)?;
    Ok((input, StlMesh { facets }))
}

fn parse_facet(input: &str) -> IResult<&str, Facet> {
    let (input, _) = preceded(multispace0, tag("facet"))(input)?;
    let (input, _) = preceded(multispace1, tag("normal"))(input)?;
    let (input, normal) = parse_vector3(input)?;
    let (input, _) = preceded(multispace0, tag("outer"))(input)?;
    let (input, _) = preceded(multispace1, tag("loop"))(input)?;
    let (input, a) = parse_vertex(input)?;
    let (input, b) = parse_vertex(input)?;
    let (input, c) = parse_vertex(input)?;
    let (input, _) = preceded(multispace0, tag("endloop"))(input)?;
    let (input, _) = preceded(multispace0, tag("endfacet"))(input)?;

    Ok((
        input,
        Facet {
            normal,
            vertices: [a, b, c],
        },
    ))
}

fn parse_vertex(input: &str) -> IResult<&str, [f32; 3]> {
    let (input, _) = preceded(multispace0, tag("vertex"))(input)?;
    parse_vector3(input)
}

fn parse_vector3(input: &str) -> IResult<&str, [f32; 3]> {
    let (input, _) = multispace0(input)?;
    let (input, x) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, y) = float(input)?;
    let (input, _) = multispace1(input)?;
    let (input, z) = float(input)?;
    Ok((input, [x, y, z]))
}

/// Detect and parse STL file (binary or ASCII)
pub fn parse_stl(data: &[u8]) -> Result<StlMesh, StlError> {
    if data.starts_with(b"solid") {
        if let Ok(text) = std::str::from_utf8(data) {
            if let Ok(mesh) = parse_ascii_stl(text) {
                return Ok(mesh);
            }
        }
    }

    parse_binary_stl(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::MeshGenerator;

    #[test]
    fn test_parse_binary_header() {
        let mut data = vec![0u8; 84];
        data[80..84].copy_from_slice(&0u32.to_le_bytes());

        let mesh = parse_binary_stl(&data).unwrap();
        assert!(mesh.facets.is_empty());
    }

    #[test]
    fn test_binary_too_small() {
        assert_eq!(parse_binary_stl(&[0u8; 10]), Err(StlError::TooSmall(10)));
    }

    #[test]
    fn test_binary_truncated() {
        let mut data = vec![0u8; 84 + FACET_LEN];
        data[80..84].copy_from_slice(&2u32.to_le_bytes());
        assert_eq!(
            parse_binary_stl(&data),
            Err(StlError::Truncated {
                expected: 2,
                found: FACET_LEN
            })
        );
    }

    #[test]
    fn test_binary_export_layout() {
        let buffers = MeshGenerator::default().generate(2.0);
        let data = to_binary(&buffers, "sierpinski");

        assert_eq!(data.len(), 84 + 16 * FACET_LEN);
        assert!(data.starts_with(b"sierpinski"));

        let mesh = parse_stl(&data).unwrap();
        assert_eq!(mesh.facets.len(), 16);
        assert_eq!(mesh.facets[5].vertices[1], buffers.position(16));
        assert_eq!(mesh.facets[5].normal, buffers.normal(15));
    }

    #[test]
    fn test_ascii_export_parses() {
        let buffers = MeshGenerator::default().generate(1.0);
        let text = to_ascii(&buffers, "unit");

        assert!(text.starts_with("solid unit\n"));
        let mesh = parse_stl(text.as_bytes()).unwrap();
        assert_eq!(mesh.facets.len(), 4);
        for (facet, vertices) in mesh.facets.iter().zip(buffers.triangles()) {
            for (parsed, expected) in facet.vertices.iter().flatten().zip(vertices.iter().flatten()) {
                assert!((parsed - expected).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_ascii_garbage() {
        assert!(matches!(
            parse_ascii_stl("solid x\n facet nonsense"),
            Err(StlError::Ascii(_))
        ));
    }
}
