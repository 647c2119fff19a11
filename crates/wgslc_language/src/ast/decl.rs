//! Declaration nodes: functions, structures, variables, type aliases, and
//! the synthesized native-type declarations the type context uses for
//! builtins.

use crate::ast::attribute::{first_semantic, Attribute, AttributeKind, Stage};
use crate::ast::expr::Expression;
use crate::ast::stmt::CompoundStatement;
use crate::ast::types::TypeName;
use wgslc_base::{SourceSpan, Symbol};

/// An `enable NAME;` directive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalDirective {
    pub span: SourceSpan,
    pub name: Symbol,
}

/// Where a `var` lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageClass {
    Function,
    Private,
    Workgroup,
    Uniform,
    Storage,
}

impl StorageClass {
    pub fn keyword(self) -> &'static str {
        match self {
            StorageClass::Function => "function",
            StorageClass::Private => "private",
            StorageClass::Workgroup => "workgroup",
            StorageClass::Uniform => "uniform",
            StorageClass::Storage => "storage",
        }
    }
}

/// How a `var` may be accessed. `Read` is the default when the qualifier
/// names only a storage class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Read,
    Write,
    ReadWrite,
}

impl AccessMode {
    pub fn keyword(self) -> &'static str {
        match self {
            AccessMode::Read => "read",
            AccessMode::Write => "write",
            AccessMode::ReadWrite => "read_write",
        }
    }
}

/// The `<storage, read_write>` part of a `var` declaration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VariableQualifier {
    pub span: SourceSpan,
    pub storage_class: StorageClass,
    pub access_mode: AccessMode,
}

/// A `var` declaration, at module scope or inside a function body.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableDecl {
    pub span: SourceSpan,
    pub name: Symbol,
    pub qualifier: Option<VariableQualifier>,
    pub ty: Option<TypeName>,
    pub initializer: Option<Expression>,
    pub attributes: Vec<Attribute>,
}

/// One function parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    pub span: SourceSpan,
    pub name: Symbol,
    pub attributes: Vec<Attribute>,
    pub ty: TypeName,
}

impl Parameter {
    /// The parameter's semantic: its first `builtin`/`location` attribute.
    pub fn maybe_semantic(&self) -> Option<&Attribute> {
        first_semantic(&self.attributes)
    }
}

/// One member of a `struct` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureMember {
    pub span: SourceSpan,
    pub name: Symbol,
    pub attributes: Vec<Attribute>,
    pub ty: TypeName,
}

impl StructureMember {
    pub fn maybe_semantic(&self) -> Option<&Attribute> {
        first_semantic(&self.attributes)
    }
}

/// A `struct` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureDecl {
    pub span: SourceSpan,
    pub name: Symbol,
    pub attributes: Vec<Attribute>,
    pub members: Vec<StructureMember>,
}

/// A `type NAME = T` alias.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeAliasDecl {
    pub span: SourceSpan,
    pub name: Symbol,
    pub attributes: Vec<Attribute>,
    pub ty: TypeName,
}

/// A synthesized declaration of a builtin type, carrying a
/// [`AttributeKind::Native`] attribute and an empty span. The type context
/// creates these for its builtin entries; the parser never does.
#[derive(Debug, Clone, PartialEq)]
pub struct NativeTypeDecl {
    pub span: SourceSpan,
    pub attributes: Vec<Attribute>,
    pub ty: TypeName,
}

impl NativeTypeDecl {
    pub fn synthesized(ty: TypeName) -> Self {
        Self {
            span: SourceSpan::default(),
            attributes: vec![Attribute::new(AttributeKind::Native, SourceSpan::default())],
            ty,
        }
    }
}

/// A function declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub span: SourceSpan,
    pub name: Symbol,
    pub attributes: Vec<Attribute>,
    pub parameters: Vec<Parameter>,
    pub return_attributes: Vec<Attribute>,
    pub return_type: Option<TypeName>,
    pub body: CompoundStatement,
}

impl FunctionDecl {
    /// The stage named by the function's stage attribute, if it has one. A
    /// function with a stage attribute is an entry point.
    pub fn maybe_stage(&self) -> Option<Stage> {
        self.attributes.iter().find_map(|attribute| match attribute.kind {
            AttributeKind::Stage(stage) => Some(stage),
            _ => None,
        })
    }

    /// The stage of an entry point.
    ///
    /// # Panics
    ///
    /// Panics if the function is not an entry point; callers check
    /// [`FunctionDecl::maybe_stage`] first.
    pub fn stage(&self) -> Stage {
        self.maybe_stage().expect("function is an entry point")
    }

    pub fn is_entry_point(&self) -> bool {
        self.maybe_stage().is_some()
    }

    /// The semantic attached to the return type, if any.
    pub fn maybe_return_semantic(&self) -> Option<&Attribute> {
        first_semantic(&self.return_attributes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attribute(kind: AttributeKind) -> Attribute {
        Attribute::new(kind, SourceSpan::default())
    }

    fn function_with_attributes(attributes: Vec<Attribute>) -> FunctionDecl {
        FunctionDecl {
            span: SourceSpan::default(),
            name: Symbol::EMPTY,
            attributes,
            parameters: Vec::new(),
            return_attributes: Vec::new(),
            return_type: None,
            body: CompoundStatement { span: SourceSpan::default(), statements: Vec::new() },
        }
    }

    #[test]
    fn stage_attribute_makes_an_entry_point() {
        let function =
            function_with_attributes(vec![attribute(AttributeKind::Stage(Stage::Fragment))]);
        assert!(function.is_entry_point());
        assert_eq!(function.stage(), Stage::Fragment);
    }

    #[test]
    fn plain_function_has_no_stage() {
        let function = function_with_attributes(vec![attribute(AttributeKind::Group(0))]);
        assert_eq!(function.maybe_stage(), None);
        assert!(!function.is_entry_point());
    }

    #[test]
    fn return_semantic_is_first_builtin_or_location() {
        let mut function = function_with_attributes(Vec::new());
        function.return_attributes = vec![attribute(AttributeKind::Location(0))];
        let semantic = function.maybe_return_semantic().expect("has semantic");
        assert_eq!(semantic.kind, AttributeKind::Location(0));
    }

    #[test]
    fn parameter_semantic_prefers_first_match() {
        let parameter = Parameter {
            span: SourceSpan::default(),
            name: Symbol::EMPTY,
            attributes: vec![
                attribute(AttributeKind::Builtin(Symbol::EMPTY)),
                attribute(AttributeKind::Location(1)),
            ],
            ty: TypeName::Named { span: SourceSpan::default(), name: Symbol::EMPTY },
        };
        let semantic = parameter.maybe_semantic().expect("has semantic");
        assert!(matches!(semantic.kind, AttributeKind::Builtin(_)));
    }

    #[test]
    fn synthesized_native_decl_has_empty_span_and_native_attribute() {
        let decl = NativeTypeDecl::synthesized(TypeName::Named {
            span: SourceSpan::default(),
            name: Symbol::EMPTY,
        });
        assert!(decl.span.is_empty());
        assert!(matches!(decl.attributes[0].kind, AttributeKind::Native));
    }
}
