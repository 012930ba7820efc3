//! JVM class file backend.
//!
//! A [`Program`] owns a deduplicated [`ConstantPool`] and the methods defined
//! so far. The code generator appends instructions to [`CodeBlock`]s through
//! the [`Pushable`] and [`Invocable`] handles the program hands out, then
//! [`Program::emit`] serializes the whole class.

mod code;
mod constant_pool;
mod error;
mod instruction_set;
mod program;
mod writer;


pub use code::CodeBlock;
pub use constant_pool::{Constant, ConstantPool};
pub use error::EmitError;
pub use instruction_set::Opcode;
pub use program::{
    Invocable, LibraryFunction, Program, Pushable, StringConstant, descriptor_slots,
    is_library_function,
};
pub use writer::{AttributeInfo, MethodInfo, modified_utf8};

// === Access flags ===

pub const ACC_PUBLIC: u16 = 0x0001;
pub const ACC_STATIC: u16 = 0x0008;
pub const ACC_SUPER: u16 = 0x0020;

// === Header ===

pub const MAGIC: u32 = 0xCAFE_BABE;
pub const MINOR_VERSION: u16 = 0;
/// Java 11
pub const MAJOR_VERSION: u16 = 55;
