mod common;

use common::{Entry, compile, parse};
use pretty_assertions::assert_eq;
use tigerc::{AstBuilder, Compiler, CompilerOptions};

#[test]
fn test_header() {
    let b = AstBuilder::new();
    let class = compile(&b.call("print", vec![b.string("hello")]));

    assert_eq!(class.magic, 0xCAFE_BABE);
    assert_eq!(class.minor, 0);
    assert_eq!(class.major, 55);
    assert_eq!(usize::from(class.pool_count), class.constants.len() + 1);
}

#[test]
fn test_class_entries() {
    let b = AstBuilder::new();
    let class = compile(&b.call("print", vec![b.string("hello")]));

    assert_eq!(class.access_flags, 0x0020);
    assert_eq!(class.class_name(class.this_class), "Main");
    assert_eq!(class.class_name(class.super_class), "java/lang/Object");
    assert_eq!(class.interfaces, 0);
    assert_eq!(class.fields, 0);
    assert_eq!(class.attributes, 0);
}

#[test]
fn test_pool_after_code() {
    let b = AstBuilder::new();
    let class = compile(&b.call("print", vec![b.string("hello")]));

    // Entries added by the method definition and by emission follow the
    // ones added while generating code.
    assert_eq!(
        &class.constants[8..],
        &[
            Entry::Utf8("main".to_string()),
            Entry::Utf8("([Ljava/lang/String;)V".to_string()),
            Entry::Utf8("Code".to_string()),
            Entry::Utf8("Main".to_string()),
            Entry::Class(12),
            Entry::Utf8("java/lang/Object".to_string()),
            Entry::Class(14),
            Entry::Utf8("<init>".to_string()),
            Entry::Utf8("()V".to_string()),
            Entry::NameAndType(16, 17),
            Entry::MethodRef(15, 18),
        ]
    );
    assert_eq!(class.method_ref(19), ("java/lang/Object", "<init>", "()V"));
}

#[test]
fn test_main_method() {
    let b = AstBuilder::new();
    let class = compile(&b.call("print", vec![b.string("hello")]));

    assert_eq!(class.methods.len(), 1);
    let main = &class.methods[0];
    assert_eq!(main.access_flags, 0x0009);
    assert_eq!(main.name, "main");
    assert_eq!(main.descriptor, "([Ljava/lang/String;)V");
    assert_eq!(main.attribute_name, "Code");
    assert_eq!(main.max_stack, 1);
    assert_eq!(main.max_locals, 1);
    assert_eq!(main.code.last(), Some(&0xB1));
}

#[test]
fn test_configured_names() {
    let b = AstBuilder::new();
    let options = CompilerOptions {
        class_name: "demo/Hello".to_string(),
        super_class: "demo/Base".to_string(),
        library_class: "demo/Runtime".to_string(),
        entry_point: "run".to_string(),
        ..CompilerOptions::default()
    };
    let module = Compiler::new(options)
        .compile(&b.call("print", vec![b.string("hi")]))
        .unwrap();
    let class = parse(module.bytes());

    assert_eq!(class.class_name(class.this_class), "demo/Hello");
    assert_eq!(class.class_name(class.super_class), "demo/Base");
    assert_eq!(class.method_ref(8).0, "demo/Runtime");
    assert_eq!(class.methods[0].name, "run");
    assert_eq!(class.method_ref(19), ("demo/Base", "<init>", "()V"));
}
