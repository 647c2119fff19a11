//! The entry-point gather pass.
//!
//! Given a function carrying a stage attribute, walk its parameters and
//! return type and assemble the ordered pipeline interface:
//! [`EntryPointItems`] holds the inputs (one per resolvable leaf of each
//! parameter, in parameter order) and the outputs (from the return type,
//! unless the stage is compute). Every item records the dotted path that
//! names it, its resolved type, and the semantic (`builtin`/`location`
//! attribute) that binds it to the pipeline.
//!
//! The pass is a [`Visitor`] that overrides parameters and the three
//! type-name variants; everything else keeps the default traversal.

use crate::ast::{Attribute, FunctionDecl, Parameter, Stage, TypeName};
use crate::types::{TypeContext, TypeNode};
use crate::visitor::Visitor;
use wgslc_base::{Result, SourceSpan, SpannedError, Symbol};

/// One pipeline input or output.
#[derive(Debug)]
pub struct EntryPointItem<'a> {
    /// Names from the parameter down to this leaf; empty for the return
    /// value.
    pub path: Vec<Symbol>,
    /// The resolved type of the leaf.
    pub ty: Option<&'a TypeNode>,
    /// The `builtin`/`location` attribute binding the leaf to the pipeline.
    pub semantic: &'a Attribute,
}

/// The gathered pipeline interface of one entry point.
#[derive(Debug, Default)]
pub struct EntryPointItems<'a> {
    pub inputs: Vec<EntryPointItem<'a>>,
    pub outputs: Vec<EntryPointItem<'a>>,
}

struct Gatherer<'a, 'ctx> {
    context: &'a TypeContext<'ctx>,
    current_semantic: Option<&'a Attribute>,
    current_span: SourceSpan,
    path: Vec<Symbol>,
    items: Vec<EntryPointItem<'a>>,
}

impl<'a, 'ctx> Gatherer<'a, 'ctx> {
    fn new(context: &'a TypeContext<'ctx>, semantic: Option<&'a Attribute>) -> Self {
        Self {
            context,
            current_semantic: semantic,
            current_span: SourceSpan::default(),
            path: Vec::new(),
            items: Vec::new(),
        }
    }

    fn current_semantic(&self) -> Result<&'a Attribute> {
        self.current_semantic.ok_or_else(|| {
            SpannedError::new("Expected semantic for entrypoint argument.", self.current_span)
        })
    }

    /// The semantic check runs before resolution so a parameter that is
    /// missing both reports the missing semantic, not the unknown type.
    fn gather_leaf(&mut self, type_name: &'a TypeName) -> Result<()> {
        let semantic = self.current_semantic()?;
        let resolved = self.context.resolve(type_name)?;
        self.items.push(EntryPointItem { path: self.path.clone(), ty: Some(resolved), semantic });
        Ok(())
    }
}

impl<'a, 'ctx> Visitor<'a> for Gatherer<'a, 'ctx> {
    fn visit_parameter(&mut self, parameter: &'a Parameter) -> Result<()> {
        self.current_span = parameter.span;
        // A semantic on the parameter itself governs the whole walk below
        // it; once struct parameters recurse into members, a member's own
        // semantic overrides this one for that member's subtree.
        if let Some(semantic) = parameter.maybe_semantic() {
            self.current_semantic = Some(semantic);
        }
        self.path.push(parameter.name);
        self.visit_type_name(&parameter.ty)?;
        self.path.pop();
        Ok(())
    }

    fn visit_named_type_name(&mut self, type_name: &'a TypeName) -> Result<()> {
        self.gather_leaf(type_name)
    }

    fn visit_parameterized_type_name(&mut self, type_name: &'a TypeName) -> Result<()> {
        self.gather_leaf(type_name)
    }

    fn visit_array_type_name(&mut self, _type_name: &'a TypeName) -> Result<()> {
        // TODO: define the interface rule for array-typed entry point
        // arguments once array interface types are specified; until then
        // they are rejected rather than silently gathered without a type.
        Err(SpannedError::new(
            "Entry point parameters of array type are not supported yet.",
            self.current_span,
        ))
    }
}

/// Gathers the pipeline inputs and outputs of an entry point.
///
/// Inputs are listed in parameter declaration order. Compute entry points
/// have no outputs even when a return type is present.
pub fn gather_entry_point_items<'a>(
    function: &'a FunctionDecl,
    context: &'a TypeContext<'_>,
) -> Result<EntryPointItems<'a>> {
    debug_assert!(function.is_entry_point(), "gather requires a stage attribute");

    let mut inputs = Vec::new();
    for parameter in &function.parameters {
        // A fresh gatherer per parameter: the semantic and path never leak
        // from one parameter to the next.
        let mut gatherer = Gatherer::new(context, None);
        gatherer.visit_parameter(parameter)?;
        inputs.extend(gatherer.items);
    }

    let mut output_gatherer = Gatherer::new(context, function.maybe_return_semantic());
    if let Some(return_type) = &function.return_type {
        if function.maybe_stage() != Some(Stage::Compute) {
            output_gatherer.current_span = return_type.span();
            output_gatherer.visit_type_name(return_type)?;
        }
    }

    log::debug!(
        "gathered {} inputs, {} outputs",
        inputs.len(),
        output_gatherer.items.len()
    );
    Ok(EntryPointItems { inputs, outputs: output_gatherer.items })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::AttributeKind;
    use crate::parse;

    #[test]
    fn builtin_input_and_output_gather_with_types() {
        let module = parse(
            "@vertex fn main(@builtin(vertex_index) VertexIndex: u32) \
             -> @builtin(position) vec4<f32> { return v; }",
        )
        .expect("parses");
        let context = TypeContext::new(&module).expect("context builds");
        let items =
            gather_entry_point_items(&module.functions[0], &context).expect("gathers");

        assert_eq!(items.inputs.len(), 1);
        let input = &items.inputs[0];
        assert_eq!(input.path.len(), 1);
        assert_eq!(module.name(input.path[0]), "VertexIndex");
        assert_eq!(input.ty, Some(&TypeNode::Unsigned32));
        match input.semantic.kind {
            AttributeKind::Builtin(name) => assert_eq!(module.name(name), "vertex_index"),
            other => panic!("expected builtin semantic, got {other:?}"),
        }

        assert_eq!(items.outputs.len(), 1);
        let output = &items.outputs[0];
        assert!(output.path.is_empty());
        assert_eq!(
            output.ty,
            Some(&TypeNode::Vector { component: Box::new(TypeNode::Float32), size: 4 })
        );
        assert!(matches!(output.semantic.kind, AttributeKind::Builtin(_)));
    }

    #[test]
    fn location_semantic_flows_to_the_output() {
        let module = parse(
            "@fragment fn main() -> @location(0) vec4<f32> { return vec4<f32>(1.0, 0.0, 0.0, 1.0); }",
        )
        .expect("parses");
        let context = TypeContext::new(&module).expect("context builds");
        let items =
            gather_entry_point_items(&module.functions[0], &context).expect("gathers");
        assert!(items.inputs.is_empty());
        assert_eq!(items.outputs.len(), 1);
        assert_eq!(items.outputs[0].semantic.kind, AttributeKind::Location(0));
    }

    #[test]
    fn missing_semantic_on_a_parameter_is_fatal() {
        let module = parse("@vertex fn f(x: u32) {}").expect("parses");
        let context = TypeContext::new(&module).expect("context builds");
        let err = gather_entry_point_items(&module.functions[0], &context).unwrap_err();
        assert_eq!(err.message, "Expected semantic for entrypoint argument.");
        assert_eq!(err.span, module.functions[0].parameters[0].span);
    }

    #[test]
    fn compute_stage_suppresses_outputs() {
        let module = parse("@compute fn f() -> u32 { return 0u; }").expect("parses");
        let context = TypeContext::new(&module).expect("context builds");
        let items =
            gather_entry_point_items(&module.functions[0], &context).expect("gathers");
        assert!(items.inputs.is_empty());
        assert!(items.outputs.is_empty());
    }

    #[test]
    fn inputs_follow_parameter_declaration_order() {
        let module = parse(
            "@vertex fn f(@location(1) b: f32, @location(0) a: f32) \
             -> @builtin(position) vec4<f32> { return v; }",
        )
        .expect("parses");
        let context = TypeContext::new(&module).expect("context builds");
        let items =
            gather_entry_point_items(&module.functions[0], &context).expect("gathers");
        assert_eq!(items.inputs.len(), 2);
        assert_eq!(module.name(items.inputs[0].path[0]), "b");
        assert_eq!(module.name(items.inputs[1].path[0]), "a");
    }

    #[test]
    fn unresolved_parameter_type_is_fatal_with_its_span() {
        let module =
            parse("@vertex fn f(@location(0) x: Missing) {}").expect("parses");
        let context = TypeContext::new(&module).expect("context builds");
        let err = gather_entry_point_items(&module.functions[0], &context).unwrap_err();
        assert!(err.message.contains("Unknown type name 'Missing'"));
        assert_eq!(err.span, module.functions[0].parameters[0].ty.span());
    }

    #[test]
    fn array_parameter_is_rejected_for_now() {
        let module =
            parse("@vertex fn f(@location(0) x: array<f32, 4>) {}").expect("parses");
        let context = TypeContext::new(&module).expect("context builds");
        let err = gather_entry_point_items(&module.functions[0], &context).unwrap_err();
        assert!(err.message.contains("array type"), "message: {}", err.message);
    }

    #[test]
    fn struct_typed_parameter_resolves_to_a_structure_leaf() {
        let module = parse(
            "struct In { v: f32 }\n@vertex fn f(@location(0) input: In) \
             -> @builtin(position) vec4<f32> { return v; }",
        )
        .expect("parses");
        let context = TypeContext::new(&module).expect("context builds");
        let items =
            gather_entry_point_items(&module.functions[0], &context).expect("gathers");
        assert_eq!(items.inputs.len(), 1);
        match items.inputs[0].ty {
            Some(TypeNode::Structure { name }) => assert_eq!(module.name(*name), "In"),
            other => panic!("expected structure leaf, got {other:?}"),
        }
    }

    #[test]
    fn return_semantic_missing_is_fatal_for_non_compute() {
        let module = parse("@vertex fn f() -> vec4<f32> { return v; }").expect("parses");
        let context = TypeContext::new(&module).expect("context builds");
        let err = gather_entry_point_items(&module.functions[0], &context).unwrap_err();
        assert_eq!(err.message, "Expected semantic for entrypoint argument.");
    }
}
