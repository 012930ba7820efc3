//! A class under construction: constant pool, methods and the handles the
//! code generator pushes and invokes through.

use core::fmt;
use std::io::Write;

use hashbrown::HashMap;
use lazy_static::lazy_static;
use tracing::debug;

use super::writer::{AttributeInfo, MethodInfo, wr_u2, wr_u4};
use super::{
    ACC_STATIC, ACC_SUPER, CodeBlock, ConstantPool, EmitError, MAGIC, MAJOR_VERSION, MINOR_VERSION,
    Opcode,
};
use crate::api::CompilerOptions;

lazy_static! {
    /// Runtime library functions the code generator can invoke, with their
    /// descriptors.
    static ref LIBRARY_FUNCTIONS: HashMap<&'static str, &'static str> = {
        let mut functions = HashMap::new();
        functions.insert("print", "(Ljava/lang/String;)V");
        functions
    };
}

/// Whether `name` is a runtime library function.
pub fn is_library_function(name: &str) -> bool {
    LIBRARY_FUNCTIONS.contains_key(name)
}

/// A value that can be pushed onto the operand stack.
pub trait Pushable: fmt::Debug {
    fn push(&self, code: &mut CodeBlock);
}

/// A method that can be invoked.
pub trait Invocable: fmt::Debug {
    fn invoke(&self, code: &mut CodeBlock);
}

/// A `String` constant of the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringConstant {
    index: u16,
}

impl StringConstant {
    /// Pool index of the `String` entry.
    pub fn index(&self) -> u16 {
        self.index
    }
}

impl Pushable for StringConstant {
    fn push(&self, code: &mut CodeBlock) {
        match u8::try_from(self.index) {
            Ok(index) => code.emit_u1(Opcode::Ldc, index),
            Err(_) => code.emit_u2(Opcode::LdcW, self.index),
        }
        code.push_stack(1);
    }
}

/// A static method of the runtime library class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LibraryFunction {
    method_ref: u16,
    arg_slots: usize,
    return_slots: usize,
}

impl LibraryFunction {
    /// Pool index of the `Methodref` entry.
    pub fn method_ref(&self) -> u16 {
        self.method_ref
    }
}

impl Invocable for LibraryFunction {
    fn invoke(&self, code: &mut CodeBlock) {
        code.emit_u2(Opcode::InvokeStatic, self.method_ref);
        code.pop_stack(self.arg_slots);
        code.push_stack(self.return_slots);
    }
}

/// Operand stack slots taken by the arguments and the result of a method
/// descriptor such as `(ILjava/lang/String;)V`.
pub fn descriptor_slots(descriptor: &str) -> Option<(usize, usize)> {
    let rest = descriptor.strip_prefix('(')?;
    let (params, result) = rest.split_once(')')?;

    let mut args = 0;
    let mut params = params;
    while !params.is_empty() {
        let (slots, tail) = field_type(params)?;
        args += slots;
        params = tail;
    }

    let returns = match result {
        "V" => 0,
        _ => match field_type(result)? {
            (slots, "") => slots,
            _ => return None,
        },
    };
    Some((args, returns))
}

/// Splits the first field type off a descriptor: `(slots, rest)`.
fn field_type(descriptor: &str) -> Option<(usize, &str)> {
    let mut chars = descriptor.char_indices();
    match chars.next()?.1 {
        'B' | 'C' | 'F' | 'I' | 'S' | 'Z' => Some((1, &descriptor[1..])),
        'J' | 'D' => Some((2, &descriptor[1..])),
        'L' => {
            let end = descriptor.find(';')?;
            Some((1, &descriptor[end + 1..]))
        }
        '[' => {
            let (_, rest) = field_type(&descriptor[1..])?;
            Some((1, rest))
        }
        _ => None,
    }
}

/// A class being built.
#[derive(Debug)]
pub struct Program {
    class_name: String,
    super_class: String,
    library_class: String,
    constant_pool: ConstantPool,
    methods: Vec<MethodInfo>,
}

impl Program {
    /// An empty JVM class, named and linked as configured.
    pub fn java_program(options: &CompilerOptions) -> Self {
        Self {
            class_name: options.class_name.clone(),
            super_class: options.super_class.clone(),
            library_class: options.library_class.clone(),
            constant_pool: ConstantPool::new(),
            methods: Vec::new(),
        }
    }

    pub fn constant_pool(&self) -> &ConstantPool {
        &self.constant_pool
    }

    pub fn methods(&self) -> &[MethodInfo] {
        &self.methods
    }

    /// Intern a string literal.
    pub fn define_string_constant(&mut self, text: &str) -> Result<StringConstant, EmitError> {
        let index = self.constant_pool.string(text)?;
        Ok(StringConstant { index })
    }

    /// Resolve a runtime library function, interning its method reference.
    ///
    /// Returns `None` for names that are not library functions.
    pub fn lookup_library_function(&mut self, name: &str) -> Result<Option<LibraryFunction>, EmitError> {
        let Some(descriptor) = LIBRARY_FUNCTIONS.get(name).copied() else {
            return Ok(None);
        };
        let Some((arg_slots, return_slots)) = descriptor_slots(descriptor) else {
            debug!("Malformed descriptor {descriptor} of library function {name}");
            return Ok(None);
        };

        let method_ref = self
            .constant_pool
            .method_ref(&self.library_class, name, descriptor)?;
        Ok(Some(LibraryFunction {
            method_ref,
            arg_slots,
            return_slots,
        }))
    }

    /// Add a method whose body is `code`.
    ///
    /// The body must already end with a return instruction.
    pub fn define_function(
        &mut self,
        access_flags: u16,
        name: &str,
        descriptor: &str,
        code: &CodeBlock,
    ) -> Result<(), EmitError> {
        let too_large = || EmitError::CodeTooLarge {
            method: name.to_string(),
            len: code.len(),
        };
        let code_len = u16::try_from(code.len()).map_err(|_| too_large())?;
        let max_stack = u16::try_from(code.max_stack()).map_err(|_| too_large())?;

        // Arguments occupy the first locals, after `this` for instance methods
        let this_slot = usize::from(access_flags & ACC_STATIC == 0);
        let arg_slots = descriptor_slots(descriptor).map_or(0, |(args, _)| args);
        let max_locals = u16::try_from(this_slot + arg_slots).map_err(|_| too_large())?;

        let name_index = self.constant_pool.utf8(name)?;
        let descriptor_index = self.constant_pool.utf8(descriptor)?;
        let code_name_index = self.constant_pool.utf8("Code")?;

        let mut info = Vec::with_capacity(12 + code.len());
        wr_u2(&mut info, max_stack)?;
        wr_u2(&mut info, max_locals)?;
        wr_u4(&mut info, u32::from(code_len))?;
        info.extend_from_slice(code.bytes());
        wr_u2(&mut info, 0)?; // exception table length
        wr_u2(&mut info, 0)?; // attributes count

        debug!(
            "Defined method {name}{descriptor}: {} bytes of code, max_stack {max_stack}, max_locals {max_locals}",
            code.len()
        );
        self.methods.push(MethodInfo {
            access_flags,
            name_index,
            descriptor_index,
            attributes: vec![AttributeInfo {
                name_index: code_name_index,
                info,
            }],
        });
        Ok(())
    }

    /// Serialize the class.
    ///
    /// Interns the class references and the super class constructor first,
    /// so emitting twice writes the same bytes.
    pub fn emit<W: Write>(&mut self, w: &mut W) -> Result<(), EmitError> {
        let this_class = self.constant_pool.class(&self.class_name)?;
        let super_class = self.constant_pool.class(&self.super_class)?;
        self.constant_pool
            .method_ref(&self.super_class, "<init>", "()V")?;
        let methods_count = u16::try_from(self.methods.len()).map_err(|_| EmitError::TooManyMethods)?;

        wr_u4(w, MAGIC)?;
        wr_u2(w, MINOR_VERSION)?;
        wr_u2(w, MAJOR_VERSION)?;
        self.constant_pool.write_to(w)?;
        wr_u2(w, ACC_SUPER)?;
        wr_u2(w, this_class)?;
        wr_u2(w, super_class)?;
        wr_u2(w, 0)?; // interfaces count
        wr_u2(w, 0)?; // fields count
        wr_u2(w, methods_count)?;
        for method in &self.methods {
            method.write_to(w)?;
        }
        wr_u2(w, 0)?; // attributes count

        debug!(
            "Emitted class {}: {} constants, {} methods",
            self.class_name,
            self.constant_pool.len(),
            self.methods.len()
        );
        Ok(())
    }
}
