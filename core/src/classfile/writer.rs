//! Big-endian primitives and the structured records of a class file.

use std::io::{self, Write};

use super::EmitError;

pub(crate) fn wr_u1<W: Write>(w: &mut W, v: u8) -> io::Result<()> {
    w.write_all(&[v])
}
pub(crate) fn wr_u2<W: Write>(w: &mut W, v: u16) -> io::Result<()> {
    w.write_all(&v.to_be_bytes())
}
pub(crate) fn wr_u4<W: Write>(w: &mut W, v: u32) -> io::Result<()> {
    w.write_all(&v.to_be_bytes())
}

/// Encodes text the way class files store it: NUL as two bytes, characters
/// outside the basic plane as two three-byte surrogates.
pub fn modified_utf8(text: &str) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\0' => bytes.extend_from_slice(&[0xC0, 0x80]),
            '\u{1}'..='\u{FFFF}' => {
                bytes.extend_from_slice(c.encode_utf8(&mut [0; 4]).as_bytes());
            }
            _ => {
                for unit in c.encode_utf16(&mut [0; 2]).iter() {
                    bytes.extend_from_slice(&[
                        0xE0 | (unit >> 12) as u8,
                        0x80 | ((unit >> 6) & 0x3F) as u8,
                        0x80 | (unit & 0x3F) as u8,
                    ]);
                }
            }
        }
    }
    bytes
}

/// `attribute_info`: a named blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeInfo {
    pub name_index: u16,
    pub info: Vec<u8>,
}

impl AttributeInfo {
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<(), EmitError> {
        let len = u32::try_from(self.info.len())
            .map_err(|_| EmitError::AttributeTooLarge { len: self.info.len() })?;
        wr_u2(w, self.name_index)?;
        wr_u4(w, len)?;
        w.write_all(&self.info)?;
        Ok(())
    }
}

/// `method_info`: flags, name and descriptor indices, attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodInfo {
    pub access_flags: u16,
    pub name_index: u16,
    pub descriptor_index: u16,
    pub attributes: Vec<AttributeInfo>,
}

impl MethodInfo {
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<(), EmitError> {
        let count = u16::try_from(self.attributes.len()).map_err(|_| {
            EmitError::AttributeTooLarge {
                len: self.attributes.len(),
            }
        })?;
        wr_u2(w, self.access_flags)?;
        wr_u2(w, self.name_index)?;
        wr_u2(w, self.descriptor_index)?;
        wr_u2(w, count)?;
        for attribute in &self.attributes {
            attribute.write_to(w)?;
        }
        Ok(())
    }
}
