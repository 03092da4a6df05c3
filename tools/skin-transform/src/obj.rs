//! OBJ mesh reading and writing
//!
//! Only positions and triangle faces are used. Face tokens may be `v`,
//! `v/t`, `v//n` or `v/t/n`; the texture and normal references are ignored.

use anyhow::{Context, Result, bail};
use skin_core::{Mesh, ScopedStage, TimingSink, Vec3};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

pub const READ_STAGE: &str = "read_obj_mesh";
pub const WRITE_STAGE: &str = "write_obj_mesh";

/// Read an OBJ file, timing the read under [`READ_STAGE`]
pub fn read_obj<S: TimingSink + ?Sized>(path: &Path, sink: &mut S) -> Result<Mesh> {
    let _stage = ScopedStage::new(sink, READ_STAGE);

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to open OBJ: {:?}", path))?;
    let mesh = parse_obj(&text).with_context(|| format!("Failed to parse OBJ: {:?}", path))?;

    tracing::debug!(
        "Read OBJ mesh: {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Parse OBJ text into a triangle mesh
pub fn parse_obj(text: &str) -> Result<Mesh> {
    let mut positions: Vec<Vec3> = Vec::new();
    let mut triangles: Vec<[u32; 3]> = Vec::new();

    for (line_index, line) in text.lines().enumerate() {
        let line_number = line_index + 1;
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("v") => positions.push(parse_position(parts, line_number)?),
            Some("f") => triangles.push(parse_face(parts, positions.len(), line_number)?),
            // vt, vn, o, g, s, usemtl, mtllib, ...
            _ => {}
        }
    }

    Mesh::new(positions, triangles).context("OBJ face references a missing vertex")
}

fn parse_position<'a>(mut parts: impl Iterator<Item = &'a str>, line: usize) -> Result<Vec3> {
    let mut coords = [0.0f32; 3];
    for (axis, coord) in coords.iter_mut().enumerate() {
        let Some(token) = parts.next() else {
            bail!("Line {}: vertex has {} coordinates, expected 3", line, axis);
        };
        *coord = token
            .parse()
            .with_context(|| format!("Line {}: invalid vertex coordinate {:?}", line, token))?;
    }
    Ok(Vec3::from(coords))
}

fn parse_face<'a>(
    parts: impl Iterator<Item = &'a str>,
    vertex_count: usize,
    line: usize,
) -> Result<[u32; 3]> {
    let tokens: Vec<&str> = parts.collect();
    if tokens.len() != 3 {
        bail!(
            "Line {}: face has {} vertices, only triangulated faces are supported",
            line,
            tokens.len()
        );
    }

    let mut face = [0u32; 3];
    for (slot, token) in face.iter_mut().zip(&tokens) {
        *slot = resolve_face_index(token, vertex_count, line)?;
    }
    Ok(face)
}

/// Convert a 1-based (or negative, relative) OBJ index to a 0-based one
fn resolve_face_index(token: &str, vertex_count: usize, line: usize) -> Result<u32> {
    let vertex = token.split('/').next().unwrap_or(token);
    let index: i64 = vertex
        .parse()
        .with_context(|| format!("Line {}: invalid face index {:?}", line, token))?;

    let resolved = match index {
        0 => bail!("Line {}: face index 0 is invalid (OBJ indices are 1-based)", line),
        i if i > 0 => i - 1,
        i => vertex_count as i64 + i,
    };
    if resolved < 0 {
        bail!(
            "Line {}: relative face index {} reaches before the first vertex",
            line,
            index
        );
    }
    u32::try_from(resolved).with_context(|| format!("Line {}: face index {} too large", line, index))
}

/// Write a mesh as OBJ, timing the write under [`WRITE_STAGE`]
pub fn write_obj<S: TimingSink + ?Sized>(path: &Path, mesh: &Mesh, sink: &mut S) -> Result<()> {
    let _stage = ScopedStage::new(sink, WRITE_STAGE);

    let file =
        File::create(path).with_context(|| format!("Failed to create output: {:?}", path))?;
    let mut writer = BufWriter::new(file);
    write_obj_to(&mut writer, mesh)
        .and_then(|()| writer.flush())
        .with_context(|| format!("Failed to write OBJ: {:?}", path))?;

    tracing::debug!(
        "Wrote OBJ mesh: {} vertices, {} triangles",
        mesh.vertex_count(),
        mesh.triangle_count()
    );
    Ok(())
}

/// Serialize a mesh: header comment, `v` lines, then 1-based `f` lines
pub fn write_obj_to<W: Write>(writer: &mut W, mesh: &Mesh) -> std::io::Result<()> {
    writeln!(writer, "# Skinned mesh")?;
    for p in &mesh.positions {
        writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
    }
    for [a, b, c] in &mesh.triangles {
        writeln!(writer, "f {} {} {}", a + 1, b + 1, c + 1)?;
    }
    Ok(())
}
