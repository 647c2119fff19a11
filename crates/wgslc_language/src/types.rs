//! Resolved types and the name → type lookup the gather pass consults.
//!
//! [`TypeNode`] is the semantic counterpart of a syntactic
//! [`TypeName`](crate::ast::TypeName): `vec4<f32>` written in source
//! resolves to `Vector { component: Float32, size: 4 }` here. The
//! [`TypeContext`] is populated from the builtin primitives (the four
//! scalars and the twelve parameterized bases instantiated per scalar) and
//! from the module's `struct` and `type` declarations, keyed by the
//! lower-case WGSL spelling of the reference.

use crate::ast::{
    NativeTypeDecl, ParameterizedBase, ShaderModule, TypeName,
};
use std::collections::HashMap;
use wgslc_base::{Interner, Result, SpannedError, Symbol};

/// A resolved type.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeNode {
    Bool,
    Int32,
    Unsigned32,
    Float32,
    Vector { component: Box<TypeNode>, size: u8 },
    Matrix { component: Box<TypeNode>, columns: u8, rows: u8 },
    /// A user struct. Member layout stays on the declaration; the context
    /// only needs the identity.
    Structure { name: Symbol },
}

const SCALARS: [(&str, TypeNode); 4] = [
    ("i32", TypeNode::Int32),
    ("u32", TypeNode::Unsigned32),
    ("f32", TypeNode::Float32),
    ("bool", TypeNode::Bool),
];

fn parameterized_node(base: ParameterizedBase, component: TypeNode) -> TypeNode {
    let component = Box::new(component);
    match base {
        ParameterizedBase::Vec2 => TypeNode::Vector { component, size: 2 },
        ParameterizedBase::Vec3 => TypeNode::Vector { component, size: 3 },
        ParameterizedBase::Vec4 => TypeNode::Vector { component, size: 4 },
        ParameterizedBase::Mat2x2 => TypeNode::Matrix { component, columns: 2, rows: 2 },
        ParameterizedBase::Mat2x3 => TypeNode::Matrix { component, columns: 2, rows: 3 },
        ParameterizedBase::Mat2x4 => TypeNode::Matrix { component, columns: 2, rows: 4 },
        ParameterizedBase::Mat3x2 => TypeNode::Matrix { component, columns: 3, rows: 2 },
        ParameterizedBase::Mat3x3 => TypeNode::Matrix { component, columns: 3, rows: 3 },
        ParameterizedBase::Mat3x4 => TypeNode::Matrix { component, columns: 3, rows: 4 },
        ParameterizedBase::Mat4x2 => TypeNode::Matrix { component, columns: 4, rows: 2 },
        ParameterizedBase::Mat4x3 => TypeNode::Matrix { component, columns: 4, rows: 3 },
        ParameterizedBase::Mat4x4 => TypeNode::Matrix { component, columns: 4, rows: 4 },
    }
}

/// Name → resolved-type lookup for one module.
///
/// Construction registers, in order: builtin scalars, builtin
/// parameterized instantiations, the module's structs, then its type
/// aliases in source order. An alias whose target cannot be resolved fails
/// construction with the target's span; an alias to an `array` type is
/// skipped, since array types are not resolvable interface types yet.
#[derive(Debug)]
pub struct TypeContext<'m> {
    module: &'m ShaderModule,
    types: HashMap<String, TypeNode>,
    natives: Vec<NativeTypeDecl>,
}

impl<'m> TypeContext<'m> {
    pub fn new(module: &'m ShaderModule) -> Result<TypeContext<'m>> {
        let mut context =
            TypeContext { module, types: HashMap::new(), natives: Vec::new() };
        context.register_builtins();

        for structure in &module.structures {
            let name = module.name(structure.name).to_string();
            context.types.insert(name, TypeNode::Structure { name: structure.name });
        }

        for alias in &module.type_aliases {
            if matches!(alias.ty, TypeName::Array { .. }) {
                continue;
            }
            let node = context.resolve(&alias.ty)?.clone();
            context.types.insert(module.name(alias.name).to_string(), node);
        }

        log::debug!("type context ready: {} entries", context.types.len());
        Ok(context)
    }

    fn register_builtins(&mut self) {
        let interner = self.module.interner();
        for (name, node) in SCALARS {
            self.types.insert(name.to_string(), node);
            if let Some(symbol) = interner.lookup(name) {
                self.natives.push(NativeTypeDecl::synthesized(TypeName::Named {
                    span: Default::default(),
                    name: symbol,
                }));
            }
        }
        for base in ParameterizedBase::ALL {
            for (scalar_name, scalar_node) in SCALARS {
                let key = format!("{}<{}>", base.name(), scalar_name);
                self.types.insert(key, parameterized_node(base, scalar_node));
            }
        }
    }

    /// The interner the context's module resolves names through.
    pub fn interner(&self) -> &Interner {
        self.module.interner()
    }

    /// Looks up a type by its WGSL spelling.
    pub fn lookup(&self, name: &str) -> Option<&TypeNode> {
        self.types.get(name)
    }

    /// Resolves a named or parameterized type reference. A failed lookup is
    /// fatal for the calling pass and carries the reference's span.
    pub fn resolve(&self, reference: &TypeName) -> Result<&TypeNode> {
        let key = reference.to_wgsl(self.module.interner());
        if matches!(reference, TypeName::Array { .. }) {
            return Err(SpannedError::new(
                format!("Cannot resolve array type '{key}'"),
                reference.span(),
            ));
        }
        self.lookup(&key).ok_or_else(|| {
            SpannedError::new(format!("Unknown type name '{key}'"), reference.span())
        })
    }

    /// The synthesized declarations backing the builtin entries.
    pub fn native_declarations(&self) -> &[NativeTypeDecl] {
        &self.natives
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    fn context_for(source: &str) -> (ShaderModule, Vec<(String, TypeNode)>) {
        // Contexts borrow the module, so tests that outlive the borrow
        // snapshot what they need.
        let module = parse(source).expect("parses");
        let context = TypeContext::new(&module).expect("context builds");
        let snapshot = context
            .types
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        (module, snapshot)
    }

    #[test]
    fn builtin_scalars_resolve() {
        let module = parse("").expect("parses");
        let context = TypeContext::new(&module).expect("context builds");
        assert_eq!(context.lookup("i32"), Some(&TypeNode::Int32));
        assert_eq!(context.lookup("u32"), Some(&TypeNode::Unsigned32));
        assert_eq!(context.lookup("f32"), Some(&TypeNode::Float32));
        assert_eq!(context.lookup("bool"), Some(&TypeNode::Bool));
    }

    #[test]
    fn builtin_parameterized_types_resolve() {
        let module = parse("").expect("parses");
        let context = TypeContext::new(&module).expect("context builds");
        assert_eq!(
            context.lookup("vec4<f32>"),
            Some(&TypeNode::Vector { component: Box::new(TypeNode::Float32), size: 4 })
        );
        assert_eq!(
            context.lookup("mat2x3<u32>"),
            Some(&TypeNode::Matrix {
                component: Box::new(TypeNode::Unsigned32),
                columns: 2,
                rows: 3
            })
        );
        assert!(context.lookup("vec5<f32>").is_none());
    }

    #[test]
    fn all_twelve_bases_are_registered_per_scalar() {
        let module = parse("").expect("parses");
        let context = TypeContext::new(&module).expect("context builds");
        for base in ParameterizedBase::ALL {
            for scalar in ["i32", "u32", "f32", "bool"] {
                let key = format!("{}<{}>", base.name(), scalar);
                assert!(context.lookup(&key).is_some(), "missing builtin {key}");
            }
        }
    }

    #[test]
    fn structs_register_by_name() {
        let (module, types) = context_for("struct Light { intensity: f32 }");
        let entry = types.iter().find(|(k, _)| k == "Light").expect("registered");
        match &entry.1 {
            TypeNode::Structure { name } => assert_eq!(module.name(*name), "Light"),
            other => panic!("expected structure, got {other:?}"),
        }
    }

    #[test]
    fn aliases_resolve_in_source_order() {
        let module =
            parse("type Color = vec4<f32>;\ntype Pixel = Color;").expect("parses");
        let context = TypeContext::new(&module).expect("context builds");
        let color = context.lookup("Color").expect("alias registered");
        assert_eq!(
            color,
            &TypeNode::Vector { component: Box::new(TypeNode::Float32), size: 4 }
        );
        assert_eq!(context.lookup("Pixel"), Some(color));
    }

    #[test]
    fn alias_to_unknown_type_fails_construction() {
        let module = parse("type T = Missing;").expect("parses");
        let err = TypeContext::new(&module).unwrap_err();
        assert!(err.message.contains("Unknown type name 'Missing'"), "message: {}", err.message);
        assert!(!err.span.is_empty());
    }

    #[test]
    fn alias_to_array_is_skipped() {
        let module = parse("type Buf = array<u32, 4>;").expect("parses");
        let context = TypeContext::new(&module).expect("context builds");
        assert!(context.lookup("Buf").is_none());
    }

    #[test]
    fn resolve_reports_the_reference_span() {
        let module = parse("fn f(x: NotAType) {}").expect("parses");
        let context = TypeContext::new(&module).expect("context builds");
        let reference = &module.functions[0].parameters[0].ty;
        let err = context.resolve(reference).unwrap_err();
        assert!(err.message.contains("NotAType"));
        assert_eq!(err.span, reference.span());
    }

    #[test]
    fn native_declarations_are_synthesized_for_mentioned_scalars() {
        let module = parse("fn f(x: u32) -> f32 { return y; }").expect("parses");
        let context = TypeContext::new(&module).expect("context builds");
        assert!(!context.native_declarations().is_empty());
        for native in context.native_declarations() {
            assert!(native.span.is_empty());
        }
    }
}
