//! # wgslc-language
//!
//! The front end of a WGSL shader compiler: lexing, parsing, the AST, and
//! the analysis passes a back end needs before it can translate a shader
//! into a native GPU dialect.
//!
//! ## Quick start
//!
//! ```
//! use wgslc_language::{gather_entry_point_items, parse, TypeContext};
//!
//! let module = parse(
//!     "@fragment fn main() -> @location(0) vec4<f32> { return vec4<f32>(1.0, 0.0, 0.0, 1.0); }",
//! )
//! .unwrap();
//!
//! let context = TypeContext::new(&module).unwrap();
//! let items = gather_entry_point_items(&module.functions[0], &context).unwrap();
//! assert!(items.inputs.is_empty());
//! assert_eq!(items.outputs.len(), 1);
//! ```
//!
//! ## Pipeline
//!
//! 1. **Lexer** ([`lexer`]) — on-demand tokenization over UTF-8 or UTF-16
//!    input, sharing one scanner over both widths.
//! 2. **Parser** ([`parser`]) — single-lookahead recursive descent
//!    producing the owned [`ShaderModule`]; aborts at the first error.
//! 3. **Visitor** ([`visitor`]) — default traversal for analysis passes,
//!    short-circuiting on the first error.
//! 4. **Type context** ([`types`]) — name → resolved-type lookup over
//!    builtins plus the module's structs and aliases.
//! 5. **Gather** ([`gather`]) — extracts an entry point's pipeline inputs
//!    and outputs with their semantics and resolved types.
//! 6. **Dumper** ([`dump`]) — deterministic pretty-printer whose output
//!    re-parses to an equal module; the golden-file target.
//!
//! A compilation is a straight-line, single-threaded function from source
//! text to module; distinct compilations share nothing and may run in
//! parallel.

pub mod ast;
pub mod dump;
pub mod gather;
pub mod lexer;
pub mod parser;
pub mod token;
pub mod types;
pub mod visitor;

// Re-export the base vocabulary so downstream crates see one surface.
pub use wgslc_base::{Interner, Result, SourcePosition, SourceSpan, SpannedError, Symbol};

pub use ast::ShaderModule;
pub use dump::dump;
pub use gather::{gather_entry_point_items, EntryPointItem, EntryPointItems};
pub use types::{TypeContext, TypeNode};
pub use visitor::Visitor;

use lexer::{CharacterStream, Lexer, Utf16Stream, Utf8Stream};
use parser::Parser;

/// Parses UTF-8 WGSL source into a shader module.
pub fn parse(source: &str) -> Result<ShaderModule> {
    parse_with(Utf8Stream::new(source))
}

/// Parses UTF-16 WGSL source into a shader module.
///
/// ASCII-only input produces a module identical to the UTF-8 path's, spans
/// included.
pub fn parse_utf16(source: &[u16]) -> Result<ShaderModule> {
    parse_with(Utf16Stream::new(source))
}

fn parse_with<S: CharacterStream>(stream: S) -> Result<ShaderModule> {
    let lexer = Lexer::new(stream, Interner::new());
    let module = Parser::new(lexer).parse_shader()?;
    log::debug!(
        "parsed module: {} directives, {} structs, {} vars, {} aliases, {} functions",
        module.directives.len(),
        module.structures.len(),
        module.variables.len(),
        module.type_aliases.len(),
        module.functions.len(),
    );
    Ok(module)
}
