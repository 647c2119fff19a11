//! The visitor framework analysis passes are built on.
//!
//! [`Visitor`] provides a default traversal of the whole tree: each
//! `visit_*` method delegates to the matching free `walk_*` function, which
//! visits children in declaration order. A pass overrides only the methods
//! it cares about and keeps the default traversal for everything else (the
//! gather pass, for example, overrides parameters and type names).
//!
//! Error handling is short-circuiting by construction: every method returns
//! `Result<()>` and the walk functions thread it with `?`, so traversal
//! stops at the first error and running a traversal twice over the same
//! tree observes the same thing both times.
//!
//! Traversal orders are fixed:
//!
//! - module: directives → structures → variables → type aliases →
//!   functions;
//! - functions: attributes → parameters → return attributes → return type →
//!   body;
//! - expressions: operands left to right, callable targets before their
//!   arguments.

use crate::ast::{
    Attribute, CompoundStatement, Expression, FunctionDecl, GlobalDirective, Literal,
    NativeTypeDecl, Parameter, ShaderModule, Statement, StructureDecl, StructureMember,
    TypeAliasDecl, TypeName, VariableDecl, VariableQualifier,
};
use wgslc_base::Result;

/// Base trait for analysis passes over the AST.
///
/// The lifetime `'a` is the borrow of the tree being visited, so an
/// implementation may keep references to nodes it has seen (the gather pass
/// stores the semantic attribute it is currently under).
pub trait Visitor<'a>: Sized {
    fn visit_shader_module(&mut self, module: &'a ShaderModule) -> Result<()> {
        walk_shader_module(self, module)
    }

    fn visit_global_directive(&mut self, _directive: &'a GlobalDirective) -> Result<()> {
        Ok(())
    }

    fn visit_attribute(&mut self, _attribute: &'a Attribute) -> Result<()> {
        Ok(())
    }

    fn visit_structure(&mut self, structure: &'a StructureDecl) -> Result<()> {
        walk_structure(self, structure)
    }

    fn visit_structure_member(&mut self, member: &'a StructureMember) -> Result<()> {
        walk_structure_member(self, member)
    }

    fn visit_variable(&mut self, variable: &'a VariableDecl) -> Result<()> {
        walk_variable(self, variable)
    }

    fn visit_variable_qualifier(&mut self, _qualifier: &'a VariableQualifier) -> Result<()> {
        Ok(())
    }

    fn visit_type_alias(&mut self, alias: &'a TypeAliasDecl) -> Result<()> {
        walk_type_alias(self, alias)
    }

    fn visit_native_type(&mut self, native: &'a NativeTypeDecl) -> Result<()> {
        walk_native_type(self, native)
    }

    fn visit_function(&mut self, function: &'a FunctionDecl) -> Result<()> {
        walk_function(self, function)
    }

    fn visit_parameter(&mut self, parameter: &'a Parameter) -> Result<()> {
        walk_parameter(self, parameter)
    }

    fn visit_statement(&mut self, statement: &'a Statement) -> Result<()> {
        walk_statement(self, statement)
    }

    fn visit_compound_statement(&mut self, compound: &'a CompoundStatement) -> Result<()> {
        walk_compound_statement(self, compound)
    }

    fn visit_expression(&mut self, expression: &'a Expression) -> Result<()> {
        walk_expression(self, expression)
    }

    fn visit_literal(&mut self, _literal: &'a Literal) -> Result<()> {
        Ok(())
    }

    /// Dispatches on the type-name variant. Passes that care about type
    /// references override the per-variant methods below instead.
    fn visit_type_name(&mut self, type_name: &'a TypeName) -> Result<()> {
        walk_type_name(self, type_name)
    }

    fn visit_array_type_name(&mut self, type_name: &'a TypeName) -> Result<()> {
        walk_array_type_name(self, type_name)
    }

    fn visit_named_type_name(&mut self, _type_name: &'a TypeName) -> Result<()> {
        Ok(())
    }

    fn visit_parameterized_type_name(&mut self, type_name: &'a TypeName) -> Result<()> {
        walk_parameterized_type_name(self, type_name)
    }
}

pub fn walk_shader_module<'a, V: Visitor<'a>>(
    visitor: &mut V,
    module: &'a ShaderModule,
) -> Result<()> {
    for directive in &module.directives {
        visitor.visit_global_directive(directive)?;
    }
    for structure in &module.structures {
        visitor.visit_structure(structure)?;
    }
    for variable in &module.variables {
        visitor.visit_variable(variable)?;
    }
    for alias in &module.type_aliases {
        visitor.visit_type_alias(alias)?;
    }
    for function in &module.functions {
        visitor.visit_function(function)?;
    }
    Ok(())
}

pub fn walk_structure<'a, V: Visitor<'a>>(
    visitor: &mut V,
    structure: &'a StructureDecl,
) -> Result<()> {
    for attribute in &structure.attributes {
        visitor.visit_attribute(attribute)?;
    }
    for member in &structure.members {
        visitor.visit_structure_member(member)?;
    }
    Ok(())
}

pub fn walk_structure_member<'a, V: Visitor<'a>>(
    visitor: &mut V,
    member: &'a StructureMember,
) -> Result<()> {
    for attribute in &member.attributes {
        visitor.visit_attribute(attribute)?;
    }
    visitor.visit_type_name(&member.ty)
}

pub fn walk_variable<'a, V: Visitor<'a>>(
    visitor: &mut V,
    variable: &'a VariableDecl,
) -> Result<()> {
    for attribute in &variable.attributes {
        visitor.visit_attribute(attribute)?;
    }
    if let Some(qualifier) = &variable.qualifier {
        visitor.visit_variable_qualifier(qualifier)?;
    }
    if let Some(ty) = &variable.ty {
        visitor.visit_type_name(ty)?;
    }
    if let Some(initializer) = &variable.initializer {
        visitor.visit_expression(initializer)?;
    }
    Ok(())
}

pub fn walk_type_alias<'a, V: Visitor<'a>>(
    visitor: &mut V,
    alias: &'a TypeAliasDecl,
) -> Result<()> {
    for attribute in &alias.attributes {
        visitor.visit_attribute(attribute)?;
    }
    visitor.visit_type_name(&alias.ty)
}

pub fn walk_native_type<'a, V: Visitor<'a>>(
    visitor: &mut V,
    native: &'a NativeTypeDecl,
) -> Result<()> {
    for attribute in &native.attributes {
        visitor.visit_attribute(attribute)?;
    }
    visitor.visit_type_name(&native.ty)
}

pub fn walk_function<'a, V: Visitor<'a>>(
    visitor: &mut V,
    function: &'a FunctionDecl,
) -> Result<()> {
    for attribute in &function.attributes {
        visitor.visit_attribute(attribute)?;
    }
    for parameter in &function.parameters {
        visitor.visit_parameter(parameter)?;
    }
    for attribute in &function.return_attributes {
        visitor.visit_attribute(attribute)?;
    }
    if let Some(return_type) = &function.return_type {
        visitor.visit_type_name(return_type)?;
    }
    visitor.visit_compound_statement(&function.body)
}

pub fn walk_parameter<'a, V: Visitor<'a>>(
    visitor: &mut V,
    parameter: &'a Parameter,
) -> Result<()> {
    for attribute in &parameter.attributes {
        visitor.visit_attribute(attribute)?;
    }
    visitor.visit_type_name(&parameter.ty)
}

pub fn walk_statement<'a, V: Visitor<'a>>(visitor: &mut V, statement: &'a Statement) -> Result<()> {
    match statement {
        Statement::Compound(compound) => visitor.visit_compound_statement(compound),
        Statement::Return { expression, .. } => {
            if let Some(expression) = expression {
                visitor.visit_expression(expression)?;
            }
            Ok(())
        }
        Statement::Assignment { lhs, rhs, .. } => {
            if let Some(lhs) = lhs {
                visitor.visit_expression(lhs)?;
            }
            visitor.visit_expression(rhs)
        }
        Statement::Variable { declaration, .. } => visitor.visit_variable(declaration),
    }
}

pub fn walk_compound_statement<'a, V: Visitor<'a>>(
    visitor: &mut V,
    compound: &'a CompoundStatement,
) -> Result<()> {
    for statement in &compound.statements {
        visitor.visit_statement(statement)?;
    }
    Ok(())
}

pub fn walk_expression<'a, V: Visitor<'a>>(
    visitor: &mut V,
    expression: &'a Expression,
) -> Result<()> {
    match expression {
        Expression::Literal { literal, .. } => visitor.visit_literal(literal),
        Expression::Identifier { .. } => Ok(()),
        Expression::ArrayAccess { base, index, .. } => {
            visitor.visit_expression(base)?;
            visitor.visit_expression(index)
        }
        Expression::StructureAccess { base, .. } => visitor.visit_expression(base),
        Expression::Callable { target, arguments, .. } => {
            visitor.visit_type_name(target)?;
            for argument in arguments {
                visitor.visit_expression(argument)?;
            }
            Ok(())
        }
        Expression::Unary { expression, .. } => visitor.visit_expression(expression),
    }
}

pub fn walk_type_name<'a, V: Visitor<'a>>(visitor: &mut V, type_name: &'a TypeName) -> Result<()> {
    match type_name {
        TypeName::Array { .. } => visitor.visit_array_type_name(type_name),
        TypeName::Named { .. } => visitor.visit_named_type_name(type_name),
        TypeName::Parameterized { .. } => visitor.visit_parameterized_type_name(type_name),
    }
}

pub fn walk_array_type_name<'a, V: Visitor<'a>>(
    visitor: &mut V,
    type_name: &'a TypeName,
) -> Result<()> {
    if let TypeName::Array { element, count, .. } = type_name {
        if let Some(element) = element {
            visitor.visit_type_name(element)?;
        }
        if let Some(count) = count {
            visitor.visit_expression(count)?;
        }
    }
    Ok(())
}

pub fn walk_parameterized_type_name<'a, V: Visitor<'a>>(
    visitor: &mut V,
    type_name: &'a TypeName,
) -> Result<()> {
    if let TypeName::Parameterized { element, .. } = type_name {
        visitor.visit_type_name(element)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;
    use wgslc_base::{SourceSpan, SpannedError};

    const SOURCE: &str = "\
enable f16;
struct S { @location(0) a: vec2<f32>, b: u32 }
var<uniform> u: S;
type Alias = array<u32, 4>;
@vertex fn main(@builtin(vertex_index) i: u32) -> @builtin(position) vec4<f32> {
    var x = vec4<f32>(1.0, 0.0, 0.0, 1.0);
    x[0] = -u.b;
    return x;
}
";

    #[derive(Default)]
    struct Counter {
        attributes: usize,
        type_names: usize,
        expressions: usize,
        statements: usize,
        order: Vec<&'static str>,
    }

    impl<'a> Visitor<'a> for Counter {
        fn visit_global_directive(&mut self, _: &'a GlobalDirective) -> Result<()> {
            self.order.push("directive");
            Ok(())
        }

        fn visit_structure(&mut self, structure: &'a StructureDecl) -> Result<()> {
            self.order.push("structure");
            walk_structure(self, structure)
        }

        fn visit_variable(&mut self, variable: &'a VariableDecl) -> Result<()> {
            self.order.push("variable");
            walk_variable(self, variable)
        }

        fn visit_type_alias(&mut self, alias: &'a TypeAliasDecl) -> Result<()> {
            self.order.push("alias");
            walk_type_alias(self, alias)
        }

        fn visit_function(&mut self, function: &'a FunctionDecl) -> Result<()> {
            self.order.push("function");
            walk_function(self, function)
        }

        fn visit_attribute(&mut self, _: &'a Attribute) -> Result<()> {
            self.attributes += 1;
            Ok(())
        }

        fn visit_type_name(&mut self, type_name: &'a TypeName) -> Result<()> {
            self.type_names += 1;
            walk_type_name(self, type_name)
        }

        fn visit_expression(&mut self, expression: &'a Expression) -> Result<()> {
            self.expressions += 1;
            walk_expression(self, expression)
        }

        fn visit_statement(&mut self, statement: &'a Statement) -> Result<()> {
            self.statements += 1;
            walk_statement(self, statement)
        }
    }

    #[test]
    fn default_traversal_follows_module_order() {
        let module = parse(SOURCE).expect("parses");
        let mut counter = Counter::default();
        counter.visit_shader_module(&module).expect("no error");
        assert_eq!(counter.order, vec!["directive", "structure", "variable", "alias", "function"]);
        assert!(counter.attributes >= 4);
        assert!(counter.type_names >= 6);
        assert!(counter.statements >= 3);
        assert!(counter.expressions >= 5);
    }

    #[test]
    fn traversal_is_idempotent() {
        let module = parse(SOURCE).expect("parses");
        let mut first = Counter::default();
        first.visit_shader_module(&module).expect("no error");
        let mut second = Counter::default();
        second.visit_shader_module(&module).expect("no error");
        second.visit_shader_module(&module).expect("no error");
        assert_eq!(second.attributes, first.attributes * 2);
        assert_eq!(second.type_names, first.type_names * 2);
        assert_eq!(second.expressions, first.expressions * 2);
        assert_eq!(second.statements, first.statements * 2);
    }

    struct FailOnSecondStructure {
        seen: usize,
        visited_after_error: usize,
    }

    impl<'a> Visitor<'a> for FailOnSecondStructure {
        fn visit_structure(&mut self, _: &'a StructureDecl) -> Result<()> {
            self.seen += 1;
            if self.seen == 2 {
                return Err(SpannedError::new("boom", SourceSpan::default()));
            }
            Ok(())
        }

        fn visit_function(&mut self, _: &'a FunctionDecl) -> Result<()> {
            self.visited_after_error += 1;
            Ok(())
        }
    }

    #[test]
    fn first_error_short_circuits_traversal() {
        let module =
            parse("struct A { a: u32 } struct B { b: u32 } fn f() {}").expect("parses");
        let mut visitor = FailOnSecondStructure { seen: 0, visited_after_error: 0 };
        let result = visitor.visit_shader_module(&module);
        assert!(result.is_err());
        assert_eq!(visitor.seen, 2);
        assert_eq!(visitor.visited_after_error, 0, "functions must not be visited after the error");
    }
}
