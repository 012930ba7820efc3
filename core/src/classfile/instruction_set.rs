//! JVM opcodes emitted by the code generator.
//!
//! Only the instructions the code generator currently lowers to are listed.
//! Operands follow the opcode byte, big-endian.
//!
//! Stack effect notation: `[..., operand1, operand2] -> [..., result]`

use core::fmt;

/// A JVM opcode.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// Push a constant from the pool (index 1-255)
    /// Operand: u1 index | Stack: [...] -> [..., value]
    Ldc = 0x12,

    /// Push a constant from the pool, wide index
    /// Operand: u2 index | Stack: [...] -> [..., value]
    LdcW = 0x13,

    /// Return void from method
    /// Stack: [...] -> []
    Return = 0xB1,

    /// Invoke a class (static) method
    /// Operand: u2 method ref index | Stack: [..., args] -> [..., result?]
    InvokeStatic = 0xB8,
}
static_assertions::assert_eq_size!(Opcode, u8);

impl Opcode {
    /// Number of operand bytes following the opcode.
    pub const fn operand_len(self) -> usize {
        match self {
            Self::Ldc => 1,
            Self::LdcW | Self::InvokeStatic => 2,
            Self::Return => 0,
        }
    }

    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Ldc => "ldc",
            Self::LdcW => "ldc_w",
            Self::Return => "return",
            Self::InvokeStatic => "invokestatic",
        }
    }
}

impl TryFrom<u8> for Opcode {
    type Error = u8;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            0x12 => Ok(Self::Ldc),
            0x13 => Ok(Self::LdcW),
            0xB1 => Ok(Self::Return),
            0xB8 => Ok(Self::InvokeStatic),
            other => Err(other),
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
