//! Entry-point gathering scenarios, mirroring how a back end consumes the
//! front end: parse, build the type context, gather each entry point.

use wgslc_language::ast::AttributeKind;
use wgslc_language::{gather_entry_point_items, parse, TypeContext, TypeNode};

const TRIVIAL_GRAPHICS_SHADER: &str = r#"@vertex
fn main(
    @builtin(vertex_index) VertexIndex : u32
) -> @builtin(position) vec4<f32> {
    var pos = array<vec2<f32>, 3>(
        vec2<f32>( 0.0, 0.5),
        vec2<f32>(-0.5,-0.5),
        vec2<f32>( 0.5,-0.5)
    );
    return vec4<f32>(pos[VertexIndex], 0.0, 1.0);
}

@fragment
fn main() -> @location(0) vec4<f32> {
    return vec4<f32>(1.0, 0.0, 0.0, 1.0);
}"#;

#[test]
fn trivial_graphics_shader_gathers_both_entry_points() {
    let module = parse(TRIVIAL_GRAPHICS_SHADER).expect("parses");
    let context = TypeContext::new(&module).expect("context builds");

    let vertex_items =
        gather_entry_point_items(&module.functions[0], &context).expect("vertex gathers");
    assert_eq!(vertex_items.inputs.len(), 1);
    let input = &vertex_items.inputs[0];
    assert_eq!(input.path.len(), 1);
    assert_eq!(module.name(input.path[0]), "VertexIndex");
    assert_eq!(input.ty, Some(&TypeNode::Unsigned32));
    match input.semantic.kind {
        AttributeKind::Builtin(name) => assert_eq!(module.name(name), "vertex_index"),
        other => panic!("expected builtin semantic, got {other:?}"),
    }
    assert_eq!(vertex_items.outputs.len(), 1);
    assert_eq!(
        vertex_items.outputs[0].ty,
        Some(&TypeNode::Vector { component: Box::new(TypeNode::Float32), size: 4 })
    );

    let fragment_items =
        gather_entry_point_items(&module.functions[1], &context).expect("fragment gathers");
    assert!(fragment_items.inputs.is_empty());
    assert_eq!(fragment_items.outputs.len(), 1);
    assert_eq!(fragment_items.outputs[0].semantic.kind, AttributeKind::Location(0));
    assert_eq!(
        fragment_items.outputs[0].ty,
        Some(&TypeNode::Vector { component: Box::new(TypeNode::Float32), size: 4 })
    );
}

#[test]
fn missing_semantic_fails_with_the_documented_message() {
    let module = parse("@vertex fn f(x: u32) {}").expect("parses");
    let context = TypeContext::new(&module).expect("context builds");
    let err = gather_entry_point_items(&module.functions[0], &context).unwrap_err();
    assert_eq!(err.message, "Expected semantic for entrypoint argument.");
}

#[test]
fn compute_entry_point_with_return_type_has_no_outputs() {
    let module = parse("@compute fn f() -> u32 { return 0u; }").expect("parses");
    let context = TypeContext::new(&module).expect("context builds");
    let items = gather_entry_point_items(&module.functions[0], &context).expect("gathers");
    assert!(items.outputs.is_empty());
}

#[test]
fn gather_is_deterministic_across_runs() {
    let module = parse(
        "@vertex fn f(@location(0) a: f32, @location(1) b: vec2<f32>, \
         @builtin(vertex_index) i: u32) -> @builtin(position) vec4<f32> { return v; }",
    )
    .expect("parses");
    let context = TypeContext::new(&module).expect("context builds");

    let first = gather_entry_point_items(&module.functions[0], &context).expect("gathers");
    let second = gather_entry_point_items(&module.functions[0], &context).expect("gathers");

    let paths = |items: &wgslc_language::EntryPointItems<'_>| -> Vec<String> {
        items
            .inputs
            .iter()
            .map(|item| {
                item.path.iter().map(|s| module.name(*s).to_string()).collect::<Vec<_>>().join(".")
            })
            .collect()
    };
    assert_eq!(paths(&first), vec!["a", "b", "i"]);
    assert_eq!(paths(&first), paths(&second));
}

#[test]
fn alias_typed_parameter_resolves_through_the_context() {
    let module = parse(
        "type Coord = vec2<f32>;\n@vertex fn f(@location(0) p: Coord) \
         -> @builtin(position) vec4<f32> { return v; }",
    )
    .expect("parses");
    let context = TypeContext::new(&module).expect("context builds");
    let items = gather_entry_point_items(&module.functions[0], &context).expect("gathers");
    assert_eq!(
        items.inputs[0].ty,
        Some(&TypeNode::Vector { component: Box::new(TypeNode::Float32), size: 2 })
    );
}
