//! Expression and literal nodes.

use crate::ast::types::TypeName;
use crate::token::FloatSuffix;
use wgslc_base::{SourceSpan, Symbol};

/// Suffix tag on an integer literal: `5` is abstract, `5i`/`5u` are
/// concrete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntSuffix {
    None,
    I32,
    U32,
}

/// A literal value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    Bool { span: SourceSpan, value: bool },
    Int { span: SourceSpan, value: i64, suffix: IntSuffix },
    Float { span: SourceSpan, value: f64, suffix: FloatSuffix },
}

impl Literal {
    pub fn span(&self) -> SourceSpan {
        match self {
            Literal::Bool { span, .. } | Literal::Int { span, .. } | Literal::Float { span, .. } => {
                *span
            }
        }
    }
}

/// The unary operators of the expression grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperation {
    Negate,
}

/// An expression.
///
/// The grammar's tower (`or → rel → shift → add → mul → unary`) currently
/// collapses onto these shapes; there are no binary operator nodes yet.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Literal { span: SourceSpan, literal: Literal },
    Identifier { span: SourceSpan, name: Symbol },
    /// `base[index]`
    ArrayAccess { span: SourceSpan, base: Box<Expression>, index: Box<Expression> },
    /// `base.field`
    StructureAccess { span: SourceSpan, base: Box<Expression>, field: Symbol },
    /// A constructor call: `vec4<f32>(…)`, `array<u32, 2>(…)`, `foo(…)`.
    Callable { span: SourceSpan, target: TypeName, arguments: Vec<Expression> },
    /// `-expr`
    Unary { span: SourceSpan, op: UnaryOperation, expression: Box<Expression> },
}

impl Expression {
    pub fn span(&self) -> SourceSpan {
        match self {
            Expression::Literal { span, .. }
            | Expression::Identifier { span, .. }
            | Expression::ArrayAccess { span, .. }
            | Expression::StructureAccess { span, .. }
            | Expression::Callable { span, .. }
            | Expression::Unary { span, .. } => *span,
        }
    }
}
