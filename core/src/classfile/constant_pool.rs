//! Deduplicated constant pool.
//!
//! Entries are numbered from 1 in insertion order. Interning is idempotent:
//! interning a constant equal to an existing entry returns that entry's
//! index instead of appending. Composite constants intern their parts first,
//! through the same path, so equal arguments always give equal indices.

use std::io::Write;

use hashbrown::HashMap;

use super::EmitError;
use super::writer::{modified_utf8, wr_u1, wr_u2};

/// Largest valid index: the pool count (entries + 1) must fit in a u2.
const MAX_INDEX: usize = u16::MAX as usize - 1;

/// A constant pool entry. Composite constants refer to other entries by
/// index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Constant {
    Utf8(String),
    String {
        string_index: u16,
    },
    Class {
        name_index: u16,
    },
    NameAndType {
        name_index: u16,
        descriptor_index: u16,
    },
    MethodRef {
        class_index: u16,
        name_and_type_index: u16,
    },
}

impl Constant {
    pub const UTF8_TAG: u8 = 1;
    pub const CLASS_TAG: u8 = 7;
    pub const STRING_TAG: u8 = 8;
    pub const METHOD_REF_TAG: u8 = 10;
    pub const NAME_AND_TYPE_TAG: u8 = 12;

    pub fn tag(&self) -> u8 {
        match self {
            Constant::Utf8(_) => Self::UTF8_TAG,
            Constant::String { .. } => Self::STRING_TAG,
            Constant::Class { .. } => Self::CLASS_TAG,
            Constant::NameAndType { .. } => Self::NAME_AND_TYPE_TAG,
            Constant::MethodRef { .. } => Self::METHOD_REF_TAG,
        }
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<(), EmitError> {
        wr_u1(w, self.tag())?;
        match self {
            Constant::Utf8(text) => {
                let bytes = modified_utf8(text);
                let len = u16::try_from(bytes.len())
                    .map_err(|_| EmitError::StringTooLong { len: bytes.len() })?;
                wr_u2(w, len)?;
                w.write_all(&bytes)?;
            }
            Constant::String { string_index } => wr_u2(w, *string_index)?,
            Constant::Class { name_index } => wr_u2(w, *name_index)?,
            Constant::NameAndType {
                name_index,
                descriptor_index,
            } => {
                wr_u2(w, *name_index)?;
                wr_u2(w, *descriptor_index)?;
            }
            Constant::MethodRef {
                class_index,
                name_and_type_index,
            } => {
                wr_u2(w, *class_index)?;
                wr_u2(w, *name_and_type_index)?;
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct ConstantPool {
    entries: Vec<Constant>,
    /// Constant -> index, for deduplication.
    index: HashMap<Constant, u16>,
}

impl ConstantPool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at a 1-based index.
    pub fn get(&self, index: u16) -> Option<&Constant> {
        self.entries.get(usize::from(index).checked_sub(1)?)
    }

    /// Index of an entry equal to `constant`, if interned.
    pub fn find(&self, constant: &Constant) -> Option<u16> {
        self.index.get(constant).copied()
    }

    /// Entries with their indices, in pool order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, &Constant)> {
        (1..=u16::MAX).zip(&self.entries)
    }

    fn intern(&mut self, constant: Constant) -> Result<u16, EmitError> {
        if let Some(index) = self.find(&constant) {
            return Ok(index);
        }
        if self.entries.len() >= MAX_INDEX {
            return Err(EmitError::ConstantPoolOverflow);
        }
        let index = u16::try_from(self.entries.len() + 1).map_err(|_| EmitError::ConstantPoolOverflow)?;
        self.entries.push(constant.clone());
        self.index.insert(constant, index);
        Ok(index)
    }

    pub fn utf8(&mut self, text: &str) -> Result<u16, EmitError> {
        let len = modified_utf8(text).len();
        if len > usize::from(u16::MAX) {
            return Err(EmitError::StringTooLong { len });
        }
        self.intern(Constant::Utf8(text.to_string()))
    }

    pub fn string(&mut self, text: &str) -> Result<u16, EmitError> {
        let string_index = self.utf8(text)?;
        self.intern(Constant::String { string_index })
    }

    pub fn class(&mut self, name: &str) -> Result<u16, EmitError> {
        let name_index = self.utf8(name)?;
        self.intern(Constant::Class { name_index })
    }

    pub fn name_and_type(&mut self, name: &str, descriptor: &str) -> Result<u16, EmitError> {
        let name_index = self.utf8(name)?;
        let descriptor_index = self.utf8(descriptor)?;
        self.intern(Constant::NameAndType {
            name_index,
            descriptor_index,
        })
    }

    pub fn method_ref(&mut self, class: &str, name: &str, descriptor: &str) -> Result<u16, EmitError> {
        let class_index = self.class(class)?;
        let name_and_type_index = self.name_and_type(name, descriptor)?;
        self.intern(Constant::MethodRef {
            class_index,
            name_and_type_index,
        })
    }

    /// Writes the pool count (entries + 1) followed by the entries.
    pub fn write_to<W: Write>(&self, w: &mut W) -> Result<(), EmitError> {
        let count = u16::try_from(self.entries.len() + 1).map_err(|_| EmitError::ConstantPoolOverflow)?;
        wr_u2(w, count)?;
        for constant in &self.entries {
            constant.write_to(w)?;
        }
        Ok(())
    }
}
