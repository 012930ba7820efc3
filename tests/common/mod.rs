//! A minimal class file reader for checking compiler output.

#![allow(dead_code)]

use tigerc::{Compiler, CompilerOptions, Expression};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Utf8(String),
    String(u16),
    Class(u16),
    NameAndType(u16, u16),
    MethodRef(u16, u16),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Method {
    pub access_flags: u16,
    pub name: String,
    pub descriptor: String,
    pub attribute_name: String,
    pub max_stack: u16,
    pub max_locals: u16,
    pub code: Vec<u8>,
}

#[derive(Debug)]
pub struct ClassFile {
    pub magic: u32,
    pub minor: u16,
    pub major: u16,
    pub pool_count: u16,
    /// Entry `i` of the pool is `constants[i - 1]`
    pub constants: Vec<Entry>,
    pub access_flags: u16,
    pub this_class: u16,
    pub super_class: u16,
    pub interfaces: u16,
    pub fields: u16,
    pub methods: Vec<Method>,
    pub attributes: u16,
}

impl ClassFile {
    pub fn constant(&self, index: u16) -> &Entry {
        &self.constants[usize::from(index) - 1]
    }

    pub fn utf8(&self, index: u16) -> &str {
        match self.constant(index) {
            Entry::Utf8(text) => text,
            other => panic!("#{index} is not utf8: {other:?}"),
        }
    }

    pub fn class_name(&self, index: u16) -> &str {
        match self.constant(index) {
            Entry::Class(name) => self.utf8(*name),
            other => panic!("#{index} is not a class: {other:?}"),
        }
    }

    /// Text of the `String` constant at `index`.
    pub fn string(&self, index: u16) -> &str {
        match self.constant(index) {
            Entry::String(text) => self.utf8(*text),
            other => panic!("#{index} is not a string: {other:?}"),
        }
    }

    /// `(class, name, descriptor)` of the method reference at `index`.
    pub fn method_ref(&self, index: u16) -> (&str, &str, &str) {
        match self.constant(index) {
            Entry::MethodRef(class, name_and_type) => match self.constant(*name_and_type) {
                Entry::NameAndType(name, descriptor) => (
                    self.class_name(*class),
                    self.utf8(*name),
                    self.utf8(*descriptor),
                ),
                other => panic!("#{name_and_type} is not a name and type: {other:?}"),
            },
            other => panic!("#{index} is not a method ref: {other:?}"),
        }
    }

    pub fn count(&self, predicate: impl Fn(&Entry) -> bool) -> usize {
        self.constants.iter().filter(|entry| predicate(entry)).count()
    }

    /// Code of the only method.
    pub fn main_code(&self) -> &[u8] {
        assert_eq!(self.methods.len(), 1);
        &self.methods[0].code
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, n: usize) -> &'a [u8] {
        let slice = &self.bytes[self.pos..self.pos + n];
        self.pos += n;
        slice
    }

    fn u1(&mut self) -> u8 {
        self.take(1)[0]
    }

    fn u2(&mut self) -> u16 {
        u16::from_be_bytes(self.take(2).try_into().unwrap())
    }

    fn u4(&mut self) -> u32 {
        u32::from_be_bytes(self.take(4).try_into().unwrap())
    }
}

pub fn parse(bytes: &[u8]) -> ClassFile {
    let mut r = Reader { bytes, pos: 0 };
    let magic = r.u4();
    let minor = r.u2();
    let major = r.u2();

    let pool_count = r.u2();
    let mut constants = Vec::new();
    for _ in 1..pool_count {
        let entry = match r.u1() {
            1 => {
                let len = usize::from(r.u2());
                Entry::Utf8(String::from_utf8(r.take(len).to_vec()).unwrap())
            }
            7 => Entry::Class(r.u2()),
            8 => Entry::String(r.u2()),
            10 => Entry::MethodRef(r.u2(), r.u2()),
            12 => Entry::NameAndType(r.u2(), r.u2()),
            tag => panic!("unexpected constant tag {tag}"),
        };
        constants.push(entry);
    }

    let access_flags = r.u2();
    let this_class = r.u2();
    let super_class = r.u2();
    let interfaces = r.u2();
    let fields = r.u2();

    let mut methods = Vec::new();
    let methods_count = r.u2();
    let mut raw = Vec::new();
    for _ in 0..methods_count {
        let access_flags = r.u2();
        let name = r.u2();
        let descriptor = r.u2();
        assert_eq!(r.u2(), 1, "one attribute per method");
        let attribute_name = r.u2();
        let attribute_len = r.u4() as usize;
        let start = r.pos;
        let max_stack = r.u2();
        let max_locals = r.u2();
        let code_len = r.u4() as usize;
        let code = r.take(code_len).to_vec();
        assert_eq!(r.u2(), 0, "exception table length");
        assert_eq!(r.u2(), 0, "code attributes count");
        assert_eq!(r.pos - start, attribute_len);
        raw.push((
            access_flags,
            name,
            descriptor,
            attribute_name,
            max_stack,
            max_locals,
            code,
        ));
    }
    let attributes = r.u2();
    assert_eq!(r.pos, bytes.len(), "trailing bytes");

    let mut class = ClassFile {
        magic,
        minor,
        major,
        pool_count,
        constants,
        access_flags,
        this_class,
        super_class,
        interfaces,
        fields,
        methods: Vec::new(),
        attributes,
    };
    for (access_flags, name, descriptor, attribute_name, max_stack, max_locals, code) in raw {
        methods.push(Method {
            access_flags,
            name: class.utf8(name).to_string(),
            descriptor: class.utf8(descriptor).to_string(),
            attribute_name: class.utf8(attribute_name).to_string(),
            max_stack,
            max_locals,
            code,
        });
    }
    class.methods = methods;
    class
}

/// Opt into compiler logs with `RUST_LOG`.
pub fn init_logging() {
    use tracing_subscriber::{EnvFilter, fmt};

    let _ = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Compile with default options and parse the result.
pub fn compile(program: &Expression) -> ClassFile {
    init_logging();
    let module = Compiler::new(CompilerOptions::default())
        .compile(program)
        .unwrap();
    parse(module.bytes())
}

/// Opcodes of a code array, skipping operands.
pub fn opcodes(code: &[u8]) -> Vec<u8> {
    let mut ops = Vec::new();
    let mut pos = 0;
    while pos < code.len() {
        let op = code[pos];
        ops.push(op);
        pos += match op {
            0x12 => 2,
            0x13 | 0xB8 => 3,
            _ => 1,
        };
    }
    ops
}
