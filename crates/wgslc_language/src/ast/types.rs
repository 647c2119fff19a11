//! Type references as written in source: `u32`, `MyStruct`,
//! `vec4<f32>`, `array<vec2<f32>, 3>`.
//!
//! These are *syntactic* types. The resolved, semantic types live in the
//! type context ([`crate::types::TypeNode`]); the gather pass bridges the
//! two by stringifying a reference and looking it up.

use crate::ast::expr::Expression;
use wgslc_base::{Interner, SourceSpan, Symbol};

/// The twelve vector/matrix bases a parameterized type reference may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterizedBase {
    Vec2,
    Vec3,
    Vec4,
    Mat2x2,
    Mat2x3,
    Mat2x4,
    Mat3x2,
    Mat3x3,
    Mat3x4,
    Mat4x2,
    Mat4x3,
    Mat4x4,
}

impl ParameterizedBase {
    /// All twelve bases, in declaration order.
    pub const ALL: [ParameterizedBase; 12] = [
        ParameterizedBase::Vec2,
        ParameterizedBase::Vec3,
        ParameterizedBase::Vec4,
        ParameterizedBase::Mat2x2,
        ParameterizedBase::Mat2x3,
        ParameterizedBase::Mat2x4,
        ParameterizedBase::Mat3x2,
        ParameterizedBase::Mat3x3,
        ParameterizedBase::Mat3x4,
        ParameterizedBase::Mat4x2,
        ParameterizedBase::Mat4x3,
        ParameterizedBase::Mat4x4,
    ];

    /// Recognizes a source spelling (`"vec2"` … `"mat4x4"`).
    pub fn from_word(word: &str) -> Option<ParameterizedBase> {
        let base = match word {
            "vec2" => ParameterizedBase::Vec2,
            "vec3" => ParameterizedBase::Vec3,
            "vec4" => ParameterizedBase::Vec4,
            "mat2x2" => ParameterizedBase::Mat2x2,
            "mat2x3" => ParameterizedBase::Mat2x3,
            "mat2x4" => ParameterizedBase::Mat2x4,
            "mat3x2" => ParameterizedBase::Mat3x2,
            "mat3x3" => ParameterizedBase::Mat3x3,
            "mat3x4" => ParameterizedBase::Mat3x4,
            "mat4x2" => ParameterizedBase::Mat4x2,
            "mat4x3" => ParameterizedBase::Mat4x3,
            "mat4x4" => ParameterizedBase::Mat4x4,
            _ => return None,
        };
        Some(base)
    }

    /// The WGSL spelling of this base.
    pub fn name(self) -> &'static str {
        match self {
            ParameterizedBase::Vec2 => "vec2",
            ParameterizedBase::Vec3 => "vec3",
            ParameterizedBase::Vec4 => "vec4",
            ParameterizedBase::Mat2x2 => "mat2x2",
            ParameterizedBase::Mat2x3 => "mat2x3",
            ParameterizedBase::Mat2x4 => "mat2x4",
            ParameterizedBase::Mat3x2 => "mat3x2",
            ParameterizedBase::Mat3x3 => "mat3x3",
            ParameterizedBase::Mat3x4 => "mat3x4",
            ParameterizedBase::Mat4x2 => "mat4x2",
            ParameterizedBase::Mat4x3 => "mat4x3",
            ParameterizedBase::Mat4x4 => "mat4x4",
        }
    }

    /// Returns `true` for the `vecN` bases, `false` for the `matNxM` ones.
    pub fn is_vector(self) -> bool {
        matches!(self, ParameterizedBase::Vec2 | ParameterizedBase::Vec3 | ParameterizedBase::Vec4)
    }
}

/// A type reference as written in source.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeName {
    /// `array`, `array<T>`, or `array<T, N>`. Both element type and count
    /// are optional in constructor contexts (`array(…)`); a type position
    /// requires the element, which a later pass enforces.
    Array {
        span: SourceSpan,
        element: Option<Box<TypeName>>,
        count: Option<Box<Expression>>,
    },
    /// A plain name: a primitive (`i32`), a struct, or an alias.
    Named { span: SourceSpan, name: Symbol },
    /// `vec2<T>` … `mat4x4<T>`.
    Parameterized {
        span: SourceSpan,
        base: ParameterizedBase,
        element: Box<TypeName>,
    },
}

impl TypeName {
    pub fn span(&self) -> SourceSpan {
        match self {
            TypeName::Array { span, .. }
            | TypeName::Named { span, .. }
            | TypeName::Parameterized { span, .. } => *span,
        }
    }

    /// The WGSL spelling of this reference: `vec4<f32>`,
    /// `array<u32, 3>`, `MyStruct`.
    ///
    /// This is the form the type context keys on and the form the dumper
    /// prints, so it round-trips through the parser.
    pub fn to_wgsl(&self, interner: &Interner) -> String {
        match self {
            TypeName::Named { name, .. } => interner.resolve(*name).to_string(),
            TypeName::Parameterized { base, element, .. } => {
                format!("{}<{}>", base.name(), element.to_wgsl(interner))
            }
            TypeName::Array { element, count, .. } => {
                let mut out = String::from("array");
                if let Some(element) = element {
                    out.push('<');
                    out.push_str(&element.to_wgsl(interner));
                    if let Some(count) = count {
                        out.push_str(", ");
                        out.push_str(&crate::dump::expression_to_wgsl(count, interner));
                    }
                    out.push('>');
                }
                out
            }
        }
    }
}
