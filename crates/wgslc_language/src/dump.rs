//! The deterministic pretty-printer.
//!
//! [`dump`] renders a [`ShaderModule`] back to WGSL text, byte-for-byte
//! stable, so golden files can assert on it and the output re-parses to a
//! structurally equal module (spans aside). The format:
//!
//! - directives first (`enable NAME;`, one per line), then structures,
//!   module variables, type aliases, and functions, with one blank line
//!   between non-empty sections and between multi-line declarations;
//! - four-space indentation per nesting level;
//! - struct members and function parameters one per line, comma-separated;
//! - parameterized types in lower-case WGSL form (`vec4<f32>`);
//! - float literals always with a decimal point or exponent so they re-lex
//!   as floats.

use crate::ast::{
    Attribute, AttributeKind, CompoundStatement, Expression, FunctionDecl, IntSuffix, Literal,
    ShaderModule, Stage, Statement, StructureDecl, TypeAliasDecl, UnaryOperation, VariableDecl,
};
use crate::token::FloatSuffix;
use wgslc_base::Interner;

/// Renders the module in its canonical text form.
pub fn dump(module: &ShaderModule) -> String {
    let dumper = Dumper { interner: module.interner() };
    let mut sections: Vec<String> = Vec::new();

    if !module.directives.is_empty() {
        let mut section = String::new();
        for directive in &module.directives {
            section.push_str("enable ");
            section.push_str(module.name(directive.name));
            section.push_str(";\n");
        }
        sections.push(section);
    }

    if !module.structures.is_empty() {
        let texts: Vec<String> =
            module.structures.iter().map(|s| dumper.structure(s)).collect();
        sections.push(texts.join("\n"));
    }

    if !module.variables.is_empty() {
        let mut section = String::new();
        for variable in &module.variables {
            section.push_str(&dumper.variable(variable));
            section.push_str(";\n");
        }
        sections.push(section);
    }

    if !module.type_aliases.is_empty() {
        let mut section = String::new();
        for alias in &module.type_aliases {
            section.push_str(&dumper.type_alias(alias));
        }
        sections.push(section);
    }

    if !module.functions.is_empty() {
        let texts: Vec<String> =
            module.functions.iter().map(|f| dumper.function(f)).collect();
        sections.push(texts.join("\n"));
    }

    sections.join("\n")
}

/// Renders one expression; shared with [`TypeName::to_wgsl`] for array
/// element counts.
///
/// [`TypeName::to_wgsl`]: crate::ast::TypeName::to_wgsl
pub(crate) fn expression_to_wgsl(expression: &Expression, interner: &Interner) -> String {
    match expression {
        Expression::Literal { literal, .. } => literal_to_wgsl(literal),
        Expression::Identifier { name, .. } => interner.resolve(*name).to_string(),
        Expression::ArrayAccess { base, index, .. } => format!(
            "{}[{}]",
            expression_to_wgsl(base, interner),
            expression_to_wgsl(index, interner)
        ),
        Expression::StructureAccess { base, field, .. } => {
            format!("{}.{}", expression_to_wgsl(base, interner), interner.resolve(*field))
        }
        Expression::Callable { target, arguments, .. } => {
            let rendered: Vec<String> =
                arguments.iter().map(|a| expression_to_wgsl(a, interner)).collect();
            format!("{}({})", target.to_wgsl(interner), rendered.join(", "))
        }
        Expression::Unary { op, expression, .. } => match op {
            UnaryOperation::Negate => format!("-{}", expression_to_wgsl(expression, interner)),
        },
    }
}

fn literal_to_wgsl(literal: &Literal) -> String {
    match literal {
        Literal::Bool { value, .. } => if *value { "true" } else { "false" }.to_string(),
        Literal::Int { value, suffix, .. } => match suffix {
            IntSuffix::None => format!("{value}"),
            IntSuffix::I32 => format!("{value}i"),
            IntSuffix::U32 => format!("{value}u"),
        },
        Literal::Float { value, suffix, .. } => {
            let text = format_float(*value);
            match suffix {
                FloatSuffix::None => text,
                FloatSuffix::F32 => format!("{text}f"),
            }
        }
    }
}

/// Formats a float so it re-lexes as a float: integral values keep one
/// fractional digit, everything else uses the shortest representation
/// (which carries a '.' or an exponent of its own).
fn format_float(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

fn attribute_to_wgsl(attribute: &Attribute, interner: &Interner) -> String {
    match attribute.kind {
        AttributeKind::Binding(index) => format!("@binding({index})"),
        AttributeKind::Group(index) => format!("@group({index})"),
        AttributeKind::Location(index) => format!("@location({index})"),
        AttributeKind::Builtin(name) => format!("@builtin({})", interner.resolve(name)),
        AttributeKind::Stage(Stage::Vertex) => "@vertex".to_string(),
        AttributeKind::Stage(Stage::Fragment) => "@fragment".to_string(),
        AttributeKind::Stage(Stage::Compute) => "@compute".to_string(),
        AttributeKind::Native => "@native".to_string(),
    }
}

struct Dumper<'a> {
    interner: &'a Interner,
}

impl Dumper<'_> {
    fn attributes(&self, attributes: &[Attribute]) -> String {
        let rendered: Vec<String> =
            attributes.iter().map(|a| attribute_to_wgsl(a, self.interner)).collect();
        rendered.join(" ")
    }

    fn structure(&self, structure: &StructureDecl) -> String {
        let mut out = String::new();
        if !structure.attributes.is_empty() {
            out.push_str(&self.attributes(&structure.attributes));
            out.push('\n');
        }
        out.push_str("struct ");
        out.push_str(self.interner.resolve(structure.name));
        out.push_str(" {");
        if !structure.members.is_empty() {
            out.push('\n');
            let members: Vec<String> = structure
                .members
                .iter()
                .map(|member| {
                    let mut line = String::from("    ");
                    if !member.attributes.is_empty() {
                        line.push_str(&self.attributes(&member.attributes));
                        line.push(' ');
                    }
                    line.push_str(self.interner.resolve(member.name));
                    line.push_str(": ");
                    line.push_str(&member.ty.to_wgsl(self.interner));
                    line
                })
                .collect();
            out.push_str(&members.join(",\n"));
            out.push('\n');
        }
        out.push_str("}\n");
        out
    }

    fn variable(&self, variable: &VariableDecl) -> String {
        let mut out = String::new();
        if !variable.attributes.is_empty() {
            out.push_str(&self.attributes(&variable.attributes));
            out.push(' ');
        }
        out.push_str("var");
        if let Some(qualifier) = &variable.qualifier {
            out.push('<');
            out.push_str(qualifier.storage_class.keyword());
            out.push(',');
            out.push_str(qualifier.access_mode.keyword());
            out.push('>');
        }
        out.push(' ');
        out.push_str(self.interner.resolve(variable.name));
        if let Some(ty) = &variable.ty {
            out.push_str(": ");
            out.push_str(&ty.to_wgsl(self.interner));
        }
        if let Some(initializer) = &variable.initializer {
            out.push_str(" = ");
            out.push_str(&expression_to_wgsl(initializer, self.interner));
        }
        out
    }

    fn type_alias(&self, alias: &TypeAliasDecl) -> String {
        let mut out = String::new();
        if !alias.attributes.is_empty() {
            out.push_str(&self.attributes(&alias.attributes));
            out.push(' ');
        }
        out.push_str("type ");
        out.push_str(self.interner.resolve(alias.name));
        out.push_str(" = ");
        out.push_str(&alias.ty.to_wgsl(self.interner));
        out.push_str(";\n");
        out
    }

    fn function(&self, function: &FunctionDecl) -> String {
        let mut out = String::new();
        if !function.attributes.is_empty() {
            out.push_str(&self.attributes(&function.attributes));
            out.push('\n');
        }
        out.push_str("fn ");
        out.push_str(self.interner.resolve(function.name));
        out.push('(');
        if !function.parameters.is_empty() {
            out.push('\n');
            let parameters: Vec<String> = function
                .parameters
                .iter()
                .map(|parameter| {
                    let mut line = String::from("    ");
                    if !parameter.attributes.is_empty() {
                        line.push_str(&self.attributes(&parameter.attributes));
                        line.push(' ');
                    }
                    line.push_str(self.interner.resolve(parameter.name));
                    line.push_str(": ");
                    line.push_str(&parameter.ty.to_wgsl(self.interner));
                    line
                })
                .collect();
            out.push_str(&parameters.join(",\n"));
            out.push('\n');
        }
        out.push(')');
        if let Some(return_type) = &function.return_type {
            out.push_str(" -> ");
            for attribute in &function.return_attributes {
                out.push_str(&attribute_to_wgsl(attribute, self.interner));
                out.push(' ');
            }
            out.push_str(&return_type.to_wgsl(self.interner));
        }
        out.push('\n');
        out.push_str(&self.compound(&function.body, ""));
        out.push('\n');
        out
    }

    fn compound(&self, compound: &CompoundStatement, indent: &str) -> String {
        let mut out = String::new();
        out.push_str(indent);
        out.push('{');
        if !compound.statements.is_empty() {
            out.push('\n');
            let inner = format!("{indent}    ");
            let statements: Vec<String> =
                compound.statements.iter().map(|s| self.statement(s, &inner)).collect();
            out.push_str(&statements.join("\n"));
            out.push('\n');
            out.push_str(indent);
        }
        out.push('}');
        out
    }

    fn statement(&self, statement: &Statement, indent: &str) -> String {
        match statement {
            Statement::Compound(compound) => self.compound(compound, indent),
            Statement::Return { expression, .. } => {
                let mut out = format!("{indent}return");
                if let Some(expression) = expression {
                    out.push(' ');
                    out.push_str(&expression_to_wgsl(expression, self.interner));
                }
                out.push(';');
                out
            }
            Statement::Assignment { lhs, rhs, .. } => {
                let lhs_text = match lhs {
                    Some(lhs) => expression_to_wgsl(lhs, self.interner),
                    // A discarded left-hand side displays as '_'.
                    None => "_".to_string(),
                };
                format!("{indent}{lhs_text} = {};", expression_to_wgsl(rhs, self.interner))
            }
            Statement::Variable { declaration, .. } => {
                format!("{indent}{};", self.variable(declaration))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn dump_of(source: &str) -> String {
        dump(&parse(source).expect("parses"))
    }

    #[test]
    fn empty_module_dumps_to_nothing() {
        assert_eq!(dump_of(""), "");
    }

    #[test]
    fn literals_keep_their_suffixes() {
        let text = dump_of("fn f() { return 5i; }");
        assert!(text.contains("return 5i;"), "{text}");
        let text = dump_of("fn f() { return 5u; }");
        assert!(text.contains("return 5u;"), "{text}");
        let text = dump_of("fn f() { return 5; }");
        assert!(text.contains("return 5;"), "{text}");
        let text = dump_of("fn f() { return true; }");
        assert!(text.contains("return true;"), "{text}");
    }

    #[test]
    fn floats_always_re_lex_as_floats() {
        let text = dump_of("fn f() { return 1.0; }");
        assert!(text.contains("return 1.0;"), "{text}");
        let text = dump_of("fn f() { return 1.5f; }");
        assert!(text.contains("return 1.5f;"), "{text}");
        // The hex float 0x1.8p+1 is 3.0; it dumps in decimal form.
        let text = dump_of("fn f() { return 0x1.8p+1; }");
        assert!(text.contains("return 3.0;"), "{text}");
    }

    #[test]
    fn struct_dump_is_golden() {
        let text = dump_of(
            "struct Vertex { @builtin(position) pos: vec4<f32>, @location(0) uv: vec2<f32> }",
        );
        assert_eq!(
            text,
            "struct Vertex {\n    @builtin(position) pos: vec4<f32>,\n    @location(0) uv: vec2<f32>\n}\n"
        );
    }

    #[test]
    fn module_variable_dump_is_golden() {
        let text = dump_of("@group(0) @binding(1) var<storage, read_write> data: array<u32>;");
        assert_eq!(text, "@group(0) @binding(1) var<storage,read_write> data: array<u32>;\n");
    }

    #[test]
    fn function_dump_is_golden() {
        let text = dump_of(
            "@vertex fn main(@builtin(vertex_index) i: u32) -> @builtin(position) vec4<f32> { return v; }",
        );
        assert_eq!(
            text,
            "@vertex\nfn main(\n    @builtin(vertex_index) i: u32\n) -> @builtin(position) vec4<f32>\n{\n    return v;\n}\n"
        );
    }

    #[test]
    fn nested_blocks_indent_by_four_spaces() {
        let text = dump_of("fn f() { { var x = 1i; } }");
        assert_eq!(text, "fn f()\n{\n    {\n        var x = 1i;\n    }\n}\n");
    }

    #[test]
    fn sections_are_separated_by_blank_lines() {
        let text = dump_of("enable f16;\nstruct S { a: u32 }\nvar<private> x: u32;\ntype T = u32;\nfn f() {}");
        assert_eq!(
            text,
            "enable f16;\n\nstruct S {\n    a: u32\n}\n\nvar<private> x: u32;\n\ntype T = u32;\n\nfn f()\n{}\n"
        );
    }

    #[test]
    fn callable_and_postfix_expressions_render() {
        let text = dump_of("fn f() { return vec4<f32>(pos[i], 0.0, 1.0).x; }");
        assert!(text.contains("return vec4<f32>(pos[i], 0.0, 1.0).x;"), "{text}");
    }

    #[test]
    fn unary_negate_renders() {
        let text = dump_of("fn f() { a.b = -c[0]; }");
        assert!(text.contains("a.b = -c[0];"), "{text}");
    }
}
