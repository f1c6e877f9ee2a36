//! Binary Mesh Format (BMF) codec
//!
//! BMF is a flat stream of little-endian 32-bit words. Sections are
//! bracketed by four-character tokens:
//!
//! ```text
//! BMF0
//!   SoV0 count f32[3*count] EoV0
//!   [SoC0 count f32[3*count] EoC0]            colors, one per vertex
//!   { SoG0
//!       [Mat0 len u8[len]]                    material name
//!       SoF0 tris u32[3*tris] EoF0
//!       [SoU0 count f32[2*count] EoU0]        count == 3*tris
//!       [SoN0 count f32[3*count] EoN0]        count == 3*tris
//!     EoG0 }*
//! FMB0
//! ```
//!
//! Decoding expands the indexed faces of every group into unindexed
//! per-corner buffers so each [`MeshGroup`] stands on its own.

use crate::error::{DecodeError, IoError, Result};
use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use footview_core::MeshGroup;
use std::path::Path;

/// Section tokens
pub mod tokens {
    pub const START_MESH: u32 = 0x424d_4630;
    pub const END_MESH: u32 = 0x464d_4230;
    pub const START_VERTICES: u32 = 0x536f_5630;
    pub const END_VERTICES: u32 = 0x456f_5630;
    pub const START_COLORS: u32 = 0x536f_4330;
    pub const END_COLORS: u32 = 0x456f_4330;
    pub const START_GROUP: u32 = 0x536f_4730;
    pub const END_GROUP: u32 = 0x456f_4730;
    pub const MATERIAL_NAME: u32 = 0x4d61_7430;
    pub const START_FACES: u32 = 0x536f_4630;
    pub const END_FACES: u32 = 0x456f_4630;
    pub const START_UVS: u32 = 0x536f_5530;
    pub const END_UVS: u32 = 0x456f_5530;
    pub const START_NORMALS: u32 = 0x536f_4e30;
    pub const END_NORMALS: u32 = 0x456f_4e30;
}

/// Human readable name of a section token
pub fn token_name(token: u32) -> &'static str {
    use tokens::*;
    match token {
        START_MESH => "START_MESH",
        END_MESH => "END_MESH",
        START_VERTICES => "START_VERTICES",
        END_VERTICES => "END_VERTICES",
        START_COLORS => "START_COLORS",
        END_COLORS => "END_COLORS",
        START_GROUP => "START_GROUP",
        END_GROUP => "END_GROUP",
        MATERIAL_NAME => "MATERIAL_NAME",
        START_FACES => "START_FACES",
        END_FACES => "END_FACES",
        START_UVS => "START_UVS",
        END_UVS => "END_UVS",
        START_NORMALS => "START_NORMALS",
        END_NORMALS => "END_NORMALS",
        _ => "unknown",
    }
}

/// Forward-only reader over the word stream
struct WordCursor<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> WordCursor<'a> {
    fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    fn take(&mut self, len: usize) -> std::result::Result<&'a [u8], DecodeError> {
        let available = self.bytes.len() - self.offset;
        if len > available {
            return Err(DecodeError::UnexpectedEof {
                offset: self.offset,
                needed: len,
                available,
            });
        }
        let slice = &self.bytes[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    /// Byte length of `count` items of `width` words, saturating so that
    /// absurd counts surface as an end-of-buffer error
    fn span(count: u32, width: usize) -> usize {
        (count as usize)
            .checked_mul(width * 4)
            .unwrap_or(usize::MAX)
    }

    fn u32(&mut self) -> std::result::Result<u32, DecodeError> {
        Ok(LittleEndian::read_u32(self.take(4)?))
    }

    fn expect(&mut self, expected: u32) -> std::result::Result<(), DecodeError> {
        let offset = self.offset;
        let found = self.u32()?;
        if found != expected {
            return Err(DecodeError::UnexpectedToken {
                expected,
                found,
                offset,
            });
        }
        Ok(())
    }

    fn f32s(&mut self, count: u32, width: usize) -> std::result::Result<Vec<f32>, DecodeError> {
        let bytes = self.take(Self::span(count, width))?;
        let mut values = vec![0.0; bytes.len() / 4];
        LittleEndian::read_f32_into(bytes, &mut values);
        Ok(values)
    }

    fn u32s(&mut self, count: u32, width: usize) -> std::result::Result<Vec<u32>, DecodeError> {
        let bytes = self.take(Self::span(count, width))?;
        let mut values = vec![0; bytes.len() / 4];
        LittleEndian::read_u32_into(bytes, &mut values);
        Ok(values)
    }

    /// Length-prefixed name; bytes that are not valid UTF-8 are read as Latin-1
    fn name(&mut self) -> std::result::Result<String, DecodeError> {
        let len = self.u32()? as usize;
        let bytes = self.take(len)?;
        Ok(match std::str::from_utf8(bytes) {
            Ok(name) => name.to_string(),
            Err(_) => bytes.iter().map(|&b| b as char).collect(),
        })
    }
}

/// Decoder for BMF buffers
pub struct BmfDecoder;

impl BmfDecoder {
    /// Decode a complete BMF buffer into its material groups, in file order.
    ///
    /// Any token mismatch, count mismatch, truncated section or face index
    /// outside the vertex block fails the whole decode.
    pub fn decode(bytes: &[u8]) -> std::result::Result<Vec<MeshGroup>, DecodeError> {
        use tokens::*;

        let mut cursor = WordCursor::new(bytes);
        cursor.expect(START_MESH)?;

        cursor.expect(START_VERTICES)?;
        let vertex_count = cursor.u32()?;
        let positions = cursor.f32s(vertex_count, 3)?;
        cursor.expect(END_VERTICES)?;

        let mut next = cursor.u32()?;

        let mut colors = None;
        if next == START_COLORS {
            let color_count = cursor.u32()?;
            if color_count != vertex_count {
                return Err(DecodeError::CountMismatch {
                    section: "colors",
                    expected: vertex_count as usize,
                    found: color_count as usize,
                });
            }
            colors = Some(cursor.f32s(color_count, 3)?);
            cursor.expect(END_COLORS)?;
            next = cursor.u32()?;
        }

        let mut groups = Vec::new();
        while next == START_GROUP {
            next = cursor.u32()?;

            let mut material_name = String::new();
            if next == MATERIAL_NAME {
                material_name = cursor.name()?;
                next = cursor.u32()?;
            }

            if next != START_FACES {
                return Err(DecodeError::UnexpectedToken {
                    expected: START_FACES,
                    found: next,
                    offset: cursor.offset - 4,
                });
            }
            let triangle_count = cursor.u32()?;
            let indices = cursor.u32s(triangle_count, 3)?;
            cursor.expect(END_FACES)?;

            let corner_count = indices.len();
            next = cursor.u32()?;

            let mut uvs = None;
            if next == START_UVS {
                let uv_count = cursor.u32()?;
                if uv_count as usize != corner_count {
                    return Err(DecodeError::CountMismatch {
                        section: "uvs",
                        expected: corner_count,
                        found: uv_count as usize,
                    });
                }
                uvs = Some(cursor.f32s(uv_count, 2)?);
                cursor.expect(END_UVS)?;
                next = cursor.u32()?;
            }

            let mut normals = None;
            if next == START_NORMALS {
                let normal_count = cursor.u32()?;
                if normal_count as usize != corner_count {
                    return Err(DecodeError::CountMismatch {
                        section: "normals",
                        expected: corner_count,
                        found: normal_count as usize,
                    });
                }
                normals = Some(cursor.f32s(normal_count, 3)?);
                cursor.expect(END_NORMALS)?;
                next = cursor.u32()?;
            }

            if next != END_GROUP {
                return Err(DecodeError::UnexpectedToken {
                    expected: END_GROUP,
                    found: next,
                    offset: cursor.offset - 4,
                });
            }
            next = cursor.u32()?;

            let group_index = groups.len();
            let vertices = expand(&positions, &indices, group_index)?;
            let group_colors = match &colors {
                Some(colors) => Some(expand(colors, &indices, group_index)?),
                None => None,
            };

            groups.push(MeshGroup {
                vertices,
                normals,
                uvs,
                colors: group_colors,
                material_name,
            });
        }

        if next != END_MESH {
            return Err(DecodeError::UnexpectedToken {
                expected: END_MESH,
                found: next,
                offset: cursor.offset - 4,
            });
        }

        log::debug!(
            "Decoded BMF buffer: {} vertices, {} groups",
            vertex_count,
            groups.len()
        );
        Ok(groups)
    }
}

/// Copy the xyz triple referenced by each index into a fresh buffer
fn expand(
    source: &[f32],
    indices: &[u32],
    group: usize,
) -> std::result::Result<Vec<f32>, DecodeError> {
    let vertex_count = source.len() / 3;
    let mut out = Vec::with_capacity(indices.len() * 3);
    for &index in indices {
        let out_of_range = || DecodeError::IndexOutOfRange {
            group,
            index,
            vertex_count,
        };
        // must not wrap on 32-bit targets
        let start = usize::try_from(index)
            .ok()
            .and_then(|index| index.checked_mul(3))
            .ok_or_else(out_of_range)?;
        let end = start.checked_add(3).ok_or_else(out_of_range)?;
        let triple = source.get(start..end).ok_or_else(out_of_range)?;
        out.extend_from_slice(triple);
    }
    Ok(out)
}

/// Reads `.bmf` files from disk
pub struct BmfReader;

impl crate::MeshGroupReader for BmfReader {
    fn read_mesh_groups<P: AsRef<Path>>(path: P) -> Result<Vec<MeshGroup>> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(IoError::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let bytes = std::fs::read(path)?;
        Ok(BmfDecoder::decode(&bytes)?)
    }
}

/// One group of an indexed BMF document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BmfGroup {
    pub material_name: Option<String>,
    pub faces: Vec<[u32; 3]>,
    /// One uv pair per face corner
    pub uvs: Option<Vec<[f32; 2]>>,
    /// One normal per face corner
    pub normals: Option<Vec<[f32; 3]>>,
}

/// Indexed mesh description in the shape BMF stores it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BmfDocument {
    pub positions: Vec<[f32; 3]>,
    pub colors: Option<Vec<[f32; 3]>>,
    pub groups: Vec<BmfGroup>,
}

/// Encoder producing BMF buffers.
///
/// Counts are written as found in the document, so malformed documents
/// produce malformed buffers.
pub struct BmfWriter;

impl BmfWriter {
    /// Encode a document into a byte buffer
    pub fn encode(document: &BmfDocument) -> std::io::Result<Vec<u8>> {
        use tokens::*;

        let mut out = Vec::new();
        out.write_u32::<LittleEndian>(START_MESH)?;

        out.write_u32::<LittleEndian>(START_VERTICES)?;
        write_triples(&mut out, &document.positions)?;
        out.write_u32::<LittleEndian>(END_VERTICES)?;

        if let Some(colors) = &document.colors {
            out.write_u32::<LittleEndian>(START_COLORS)?;
            write_triples(&mut out, colors)?;
            out.write_u32::<LittleEndian>(END_COLORS)?;
        }

        for group in &document.groups {
            out.write_u32::<LittleEndian>(START_GROUP)?;

            if let Some(name) = &group.material_name {
                out.write_u32::<LittleEndian>(MATERIAL_NAME)?;
                out.write_u32::<LittleEndian>(name.len() as u32)?;
                out.extend_from_slice(name.as_bytes());
            }

            out.write_u32::<LittleEndian>(START_FACES)?;
            out.write_u32::<LittleEndian>(group.faces.len() as u32)?;
            for face in &group.faces {
                for &index in face {
                    out.write_u32::<LittleEndian>(index)?;
                }
            }
            out.write_u32::<LittleEndian>(END_FACES)?;

            if let Some(uvs) = &group.uvs {
                out.write_u32::<LittleEndian>(START_UVS)?;
                out.write_u32::<LittleEndian>(uvs.len() as u32)?;
                for uv in uvs {
                    out.write_f32::<LittleEndian>(uv[0])?;
                    out.write_f32::<LittleEndian>(uv[1])?;
                }
                out.write_u32::<LittleEndian>(END_UVS)?;
            }

            if let Some(normals) = &group.normals {
                out.write_u32::<LittleEndian>(START_NORMALS)?;
                write_triples(&mut out, normals)?;
                out.write_u32::<LittleEndian>(END_NORMALS)?;
            }

            out.write_u32::<LittleEndian>(END_GROUP)?;
        }

        out.write_u32::<LittleEndian>(END_MESH)?;
        Ok(out)
    }

    /// Encode a document and write it to `path`
    pub fn write_file<P: AsRef<Path>>(document: &BmfDocument, path: P) -> Result<()> {
        let bytes = Self::encode(document)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

fn write_triples(out: &mut Vec<u8>, values: &[[f32; 3]]) -> std::io::Result<()> {
    out.write_u32::<LittleEndian>(values.len() as u32)?;
    for value in values {
        for &component in value {
            out.write_f32::<LittleEndian>(component)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_triangle() -> BmfDocument {
        BmfDocument {
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            colors: None,
            groups: vec![BmfGroup {
                material_name: Some("abc".to_string()),
                faces: vec![[0, 1, 2]],
                ..Default::default()
            }],
        }
    }

    #[test]
    fn test_token_names() {
        assert_eq!(token_name(tokens::START_MESH), "START_MESH");
        assert_eq!(token_name(tokens::END_NORMALS), "END_NORMALS");
        assert_eq!(token_name(0), "unknown");
        // Tokens spell their tag when read as big-endian ASCII
        assert_eq!(&tokens::START_VERTICES.to_be_bytes(), b"SoV0");
        assert_eq!(&tokens::END_MESH.to_be_bytes(), b"FMB0");
    }

    #[test]
    fn test_decode_single_group() {
        let bytes = BmfWriter::encode(&unit_triangle()).unwrap();
        let groups = BmfDecoder::decode(&bytes).unwrap();

        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].material_name, "abc");
        assert_eq!(
            groups[0].vertices,
            vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]
        );
        assert!(groups[0].colors.is_none());
        assert!(groups[0].uvs.is_none());
        assert!(groups[0].normals.is_none());
    }

    #[test]
    fn test_decode_expands_shared_vertices() {
        let mut document = unit_triangle();
        document.positions.push([1.0, 1.0, 0.0]);
        document.colors = Some(vec![
            [1.0, 0.0, 0.0],
            [0.0, 1.0, 0.0],
            [0.0, 0.0, 1.0],
            [1.0, 1.0, 1.0],
        ]);
        document.groups[0].faces.push([1, 3, 2]);

        let groups = BmfDecoder::decode(&BmfWriter::encode(&document).unwrap()).unwrap();
        let group = &groups[0];
        assert_eq!(group.triangle_count(), 2);
        assert_eq!(&group.vertices[9..12], &[1.0, 0.0, 0.0]);
        assert_eq!(&group.vertices[12..15], &[1.0, 1.0, 0.0]);

        let colors = group.colors.as_ref().unwrap();
        assert_eq!(colors.len(), group.vertices.len());
        assert_eq!(&colors[12..15], &[1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_decode_group_without_name() {
        let mut document = unit_triangle();
        document.groups[0].material_name = None;
        let groups = BmfDecoder::decode(&BmfWriter::encode(&document).unwrap()).unwrap();
        assert_eq!(groups[0].material_name, "");
    }

    #[test]
    fn test_latin1_material_name() {
        let mut bytes = BmfWriter::encode(&unit_triangle()).unwrap();
        // Name bytes follow START_MESH..END_VERTICES (4 + 4 + 4 + 36 + 4),
        // START_GROUP, MATERIAL_NAME and the length word.
        let name_offset = 52 + 12;
        assert_eq!(&bytes[name_offset..name_offset + 3], b"abc");
        bytes[name_offset] = 0xe9;

        let groups = BmfDecoder::decode(&bytes).unwrap();
        assert_eq!(groups[0].material_name, "\u{e9}bc");
    }

    #[test]
    fn test_expand_rejects_indices_past_the_end() {
        let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0];
        assert_eq!(expand(&positions, &[1, 0], 2).unwrap(), vec![1.0, 0.0, 0.0, 0.0, 0.0, 0.0]);
        for index in [2, u32::MAX / 3 + 1, u32::MAX] {
            assert_eq!(
                expand(&positions, &[0, index], 2),
                Err(DecodeError::IndexOutOfRange {
                    group: 2,
                    index,
                    vertex_count: 2,
                })
            );
        }
    }
}
