//! Tiger surface syntax rendering of syntax tree nodes.
//!
//! Used for diagnostics and trace output, e.g. `print("hello")` or
//! `let var x := 1 in x end`.

use core::fmt;
use std::rc::Rc;

use super::{BinaryOp, Declaration, Expression, FieldValue, LValue, Type, TypeField};
use crate::visitor::{
    CONTINUE, DeclarationVisitor, ExpressionVisitor, Flow, LValueVisitor, STOP, TypeVisitor,
};

/// Writes nodes to a formatter. A formatter error stops the traversal.
struct Printer<'a, 'f> {
    f: &'a mut fmt::Formatter<'f>,
    failed: bool,
}

impl<'a, 'f> Printer<'a, 'f> {
    fn new(f: &'a mut fmt::Formatter<'f>) -> Self {
        Self { f, failed: false }
    }

    fn write(&mut self, args: fmt::Arguments<'_>) -> Flow {
        match self.f.write_fmt(args) {
            Ok(()) => CONTINUE,
            Err(fmt::Error) => {
                self.failed = true;
                STOP
            }
        }
    }

    fn finish(self) -> fmt::Result {
        if self.failed { Err(fmt::Error) } else { Ok(()) }
    }

    fn separated<'ast, T>(
        &mut self,
        items: &'ast [T],
        separator: &str,
        mut each: impl FnMut(&mut Self, &'ast T) -> Flow,
    ) -> Flow {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.write(format_args!("{separator}"))?;
            }
            each(self, item)?;
        }
        CONTINUE
    }
}

impl<'ast> ExpressionVisitor<'ast> for Printer<'_, '_> {
    fn visit_string_constant(&mut self, text: &'ast str) -> Flow {
        self.write(format_args!("{text:?}"))
    }

    fn visit_integer_constant(&mut self, value: i32) -> Flow {
        self.write(format_args!("{value}"))
    }

    fn visit_nil(&mut self) -> Flow {
        self.write(format_args!("nil"))
    }

    fn visit_lvalue(&mut self, value: &'ast LValue) -> Flow {
        value.accept(self)
    }

    fn visit_negated(&mut self, value: &'ast Expression) -> Flow {
        self.write(format_args!("-"))?;
        value.accept(self)
    }

    fn visit_binary(&mut self, left: &'ast Expression, op: BinaryOp, right: &'ast Expression) -> Flow {
        self.write(format_args!("("))?;
        left.accept(self)?;
        self.write(format_args!(" {op} "))?;
        right.accept(self)?;
        self.write(format_args!(")"))
    }

    fn visit_assignment(&mut self, target: &'ast LValue, value: &'ast Expression) -> Flow {
        target.accept(self)?;
        self.write(format_args!(" := "))?;
        value.accept(self)
    }

    fn visit_function_call(&mut self, id: &'ast str, args: &'ast [Rc<Expression>]) -> Flow {
        self.write(format_args!("{id}("))?;
        self.separated(args, ", ", |p, arg| arg.accept(p))?;
        self.write(format_args!(")"))
    }

    fn visit_block(&mut self, exprs: &'ast [Rc<Expression>]) -> Flow {
        self.write(format_args!("("))?;
        self.separated(exprs, "; ", |p, expr| expr.accept(p))?;
        self.write(format_args!(")"))
    }

    fn visit_record(&mut self, type_id: &'ast str, fields: &'ast [FieldValue]) -> Flow {
        self.write(format_args!("{type_id} {{"))?;
        self.separated(fields, ", ", |p, field| {
            p.write(format_args!("{} = ", field.id))?;
            field.expr.accept(p)
        })?;
        self.write(format_args!("}}"))
    }

    fn visit_array(&mut self, type_id: &'ast str, size: &'ast Expression, value: &'ast Expression) -> Flow {
        self.write(format_args!("{type_id}["))?;
        size.accept(self)?;
        self.write(format_args!("] of "))?;
        value.accept(self)
    }

    fn visit_if_then(&mut self, condition: &'ast Expression, then_expr: &'ast Expression) -> Flow {
        self.write(format_args!("if "))?;
        condition.accept(self)?;
        self.write(format_args!(" then "))?;
        then_expr.accept(self)
    }

    fn visit_if_then_else(
        &mut self,
        condition: &'ast Expression,
        then_expr: &'ast Expression,
        else_expr: &'ast Expression,
    ) -> Flow {
        self.visit_if_then(condition, then_expr)?;
        self.write(format_args!(" else "))?;
        else_expr.accept(self)
    }

    fn visit_while(&mut self, condition: &'ast Expression, body: &'ast Expression) -> Flow {
        self.write(format_args!("while "))?;
        condition.accept(self)?;
        self.write(format_args!(" do "))?;
        body.accept(self)
    }

    fn visit_for(
        &mut self,
        id: &'ast str,
        first: &'ast Expression,
        last: &'ast Expression,
        body: &'ast Expression,
    ) -> Flow {
        self.write(format_args!("for {id} := "))?;
        first.accept(self)?;
        self.write(format_args!(" to "))?;
        last.accept(self)?;
        self.write(format_args!(" do "))?;
        body.accept(self)
    }

    fn visit_break(&mut self) -> Flow {
        self.write(format_args!("break"))
    }

    fn visit_let(&mut self, declarations: &'ast [Rc<Declaration>], body: &'ast [Rc<Expression>]) -> Flow {
        self.write(format_args!("let "))?;
        self.separated(declarations, " ", |p, decl| decl.accept(p))?;
        self.write(format_args!(" in "))?;
        self.separated(body, "; ", |p, expr| expr.accept(p))?;
        self.write(format_args!(" end"))
    }

    fn visit_builtin_body(&mut self) -> Flow {
        self.write(format_args!("<builtin>"))
    }
}

impl<'ast> LValueVisitor<'ast> for Printer<'_, '_> {
    fn visit_id(&mut self, id: &'ast str) -> Flow {
        self.write(format_args!("{id}"))
    }

    fn visit_field(&mut self, base: &'ast LValue, field: &'ast str) -> Flow {
        base.accept(self)?;
        self.write(format_args!(".{field}"))
    }

    fn visit_index(&mut self, base: &'ast LValue, index: &'ast Expression) -> Flow {
        base.accept(self)?;
        self.write(format_args!("["))?;
        index.accept(self)?;
        self.write(format_args!("]"))
    }
}

impl<'ast> DeclarationVisitor<'ast> for Printer<'_, '_> {
    fn visit_type_declaration(&mut self, id: &'ast str, ty: &'ast Type) -> Flow {
        self.write(format_args!("type {id} = "))?;
        ty.accept(self)
    }

    fn visit_function_declaration(
        &mut self,
        id: &'ast str,
        params: &'ast [Declaration],
        return_type: Option<&'ast str>,
        body: &'ast Expression,
    ) -> Flow {
        self.write(format_args!("function {id}("))?;
        self.separated(params, ", ", |p, param| param.accept(p))?;
        self.write(format_args!(")"))?;
        if let Some(return_type) = return_type {
            self.write(format_args!(": {return_type}"))?;
        }
        self.write(format_args!(" = "))?;
        body.accept(self)
    }

    fn visit_variable_declaration(
        &mut self,
        id: &'ast str,
        type_id: Option<&'ast str>,
        init: &'ast Expression,
    ) -> Flow {
        self.write(format_args!("var {id}"))?;
        if let Some(type_id) = type_id {
            self.write(format_args!(": {type_id}"))?;
        }
        self.write(format_args!(" := "))?;
        init.accept(self)
    }

    fn visit_parameter_declaration(&mut self, id: &'ast str, type_id: &'ast str) -> Flow {
        self.write(format_args!("{id}: {type_id}"))
    }
}

impl<'ast> TypeVisitor<'ast> for Printer<'_, '_> {
    fn visit_int(&mut self) -> Flow {
        self.write(format_args!("int"))
    }

    fn visit_string(&mut self) -> Flow {
        self.write(format_args!("string"))
    }

    fn visit_name(&mut self, type_id: &'ast str) -> Flow {
        self.write(format_args!("{type_id}"))
    }

    fn visit_record(&mut self, fields: &'ast [TypeField]) -> Flow {
        self.write(format_args!("{{"))?;
        self.separated(fields, ", ", |p, field| {
            p.write(format_args!("{}: {}", field.name, field.type_id))
        })?;
        self.write(format_args!("}}"))
    }

    fn visit_array(&mut self, element_type: &'ast str) -> Flow {
        self.write(format_args!("array of {element_type}"))
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut printer = Printer::new(f);
        let _ = self.accept(&mut printer);
        printer.finish()
    }
}

impl fmt::Display for LValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut printer = Printer::new(f);
        let _ = self.accept(&mut printer);
        printer.finish()
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut printer = Printer::new(f);
        let _ = self.accept(&mut printer);
        printer.finish()
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut printer = Printer::new(f);
        let _ = self.accept(&mut printer);
        printer.finish()
    }
}
