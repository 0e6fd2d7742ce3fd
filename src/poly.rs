use std::{fs, path::Path, str::FromStr};

use thiserror::Error;
use tracing::debug;

use crate::types::{Edge, Float, Polygon, Vertex};

#[derive(Debug, Error)]
pub enum PolyFileError {
    #[error("failed to read poly file: {0}")]
    Io(#[from] std::io::Error),
    #[error("poly file ended before the {0} section")]
    MissingSection(&'static str),
    #[error("line {line}: expected at least {expected} values")]
    MalformedLine { line: usize, expected: usize },
    #[error("line {line}: `{value}` is not a valid number")]
    InvalidNumber { line: usize, value: String },
    #[error("line {line}: segment references vertex {label} but the file has {vertex_count} vertices")]
    UnknownVertexLabel {
        line: usize,
        label: usize,
        vertex_count: usize,
    },
}

/// Planar straight line graph read from a `.poly` file (format of the Triangle mesh generator)
///
/// ```text
/// # <vertex count> <dimension> <attributes count> <boundary markers>
/// 4 2 0 0
/// # <label> <x> <y>
/// 1 0 0
/// 2 1 0
/// 3 1 1
/// 4 0 1
/// # <segment count> <boundary markers>
/// 4 0
/// # <label> <vertex label> <vertex label>
/// 1 1 2
/// 2 2 3
/// 3 3 4
/// 4 4 1
/// # <hole count>
/// 0
/// ```
///
/// Vertex labels are 1-based in the file. Extra columns (attributes, boundary markers) are ignored.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolyFile {
    pub vertices: Vec<Vertex>,
    /// Indexes (0-based) in `vertices`
    pub segments: Vec<Edge>,
    pub holes: Vec<Vertex>,
}

impl PolyFile {
    pub fn parse(content: &str) -> Result<Self, PolyFileError> {
        let mut lines = content
            .lines()
            .enumerate()
            .map(|(index, line)| {
                let line_content = match line.find('#') {
                    Some(comment_start) => &line[..comment_start],
                    None => line,
                };
                (index + 1, line_content.split_whitespace().collect::<Vec<_>>())
            })
            .filter(|(_, values)| !values.is_empty());

        let (line, header) = next_line(&mut lines, "vertices", 1)?;
        let vertex_count: usize = parse_value(line, header[0])?;
        // Counts come from the file, vectors only grow with the lines actually read
        let mut vertices = Vec::new();
        for _ in 0..vertex_count {
            let (line, values) = next_line(&mut lines, "vertices", 3)?;
            vertices.push(Vertex::new(
                parse_value::<Float>(line, values[1])?,
                parse_value::<Float>(line, values[2])?,
            ));
        }

        let (line, header) = next_line(&mut lines, "segments", 1)?;
        let segment_count: usize = parse_value(line, header[0])?;
        let mut segments = Vec::new();
        for _ in 0..segment_count {
            let (line, values) = next_line(&mut lines, "segments", 3)?;
            segments.push(Edge::new(
                vertex_index(line, values[1], vertex_count)?,
                vertex_index(line, values[2], vertex_count)?,
            ));
        }

        // The holes section is optional
        let mut holes = Vec::new();
        if let Some((line, header)) = lines.next() {
            let hole_count: usize = parse_value(line, header[0])?;
            for _ in 0..hole_count {
                let (line, values) = next_line(&mut lines, "holes", 3)?;
                holes.push(Vertex::new(
                    parse_value::<Float>(line, values[1])?,
                    parse_value::<Float>(line, values[2])?,
                ));
            }
        }

        debug!(
            "Parsed poly file with {} vertices, {} segments and {} holes",
            vertices.len(),
            segments.len(),
            holes.len()
        );

        Ok(Self {
            vertices,
            segments,
            holes,
        })
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, PolyFileError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Vertices, in the file order, as a polygon ring. Segments and holes are not used.
    pub fn polygon(&self) -> Polygon {
        Polygon::new(self.vertices.clone())
    }
}

fn next_line<'a, I: Iterator<Item = (usize, Vec<&'a str>)>>(
    lines: &mut I,
    section: &'static str,
    expected: usize,
) -> Result<(usize, Vec<&'a str>), PolyFileError> {
    let (line, values) = lines.next().ok_or(PolyFileError::MissingSection(section))?;
    if values.len() < expected {
        return Err(PolyFileError::MalformedLine { line, expected });
    }
    Ok((line, values))
}

fn parse_value<T: FromStr>(line: usize, value: &str) -> Result<T, PolyFileError> {
    value.parse().map_err(|_| PolyFileError::InvalidNumber {
        line,
        value: value.to_string(),
    })
}

fn vertex_index(line: usize, value: &str, vertex_count: usize) -> Result<usize, PolyFileError> {
    let label: usize = parse_value(line, value)?;
    if label == 0 || label > vertex_count {
        return Err(PolyFileError::UnknownVertexLabel {
            line,
            label,
            vertex_count,
        });
    }
    Ok(label - 1)
}

///////////////////////////////////////////////////////////
///                                                     ///
///                        Tests                        ///
///                                                     ///
///////////////////////////////////////////////////////////
