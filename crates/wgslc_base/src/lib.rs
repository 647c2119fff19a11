//! # wgslc-base
//!
//! Pure structural atoms for the wgslc front end: source positions and
//! spans, string interning, and the spanned diagnostic type. Nothing in
//! this crate knows anything about WGSL; it exists so that tokens, AST
//! nodes, and analysis passes in `wgslc-language` can share one vocabulary
//! for "where" and "what went wrong".

pub mod error;
pub mod intern;
pub mod span;

pub use error::{Result, SpannedError};
pub use intern::{Interner, Symbol, SymbolEq};
pub use span::{SourcePosition, SourceSpan};
