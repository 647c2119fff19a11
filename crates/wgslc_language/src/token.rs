//! Token definitions for the WGSL lexer and parser.
//!
//! A [`Token`] pairs a [`TokenKind`] with the [`SourceSpan`] it was scanned
//! from. Payloads live inside the kind: identifiers carry an interned
//! [`Symbol`], integer literals carry the decoded `i64`, float literals
//! carry the decoded `f64` plus their suffix tag. The set of kinds is
//! closed; anything the lexer cannot classify becomes [`TokenKind::Error`]
//! with a [`LexErrorKind`] describing why, and the parser turns the first
//! such token into the compilation's one diagnostic.

use wgslc_base::{SourceSpan, Symbol};

/// Suffix tag on a float literal: `1.5` is abstract, `1.5f` is 32-bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatSuffix {
    None,
    F32,
}

/// Why the lexer rejected a piece of input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LexErrorKind {
    /// A character that cannot begin or continue any token.
    UnrecognizedCharacter,
    /// A numeric literal that went wrong partway through, e.g. `0x` with no
    /// digits or `1.5x`.
    MalformedNumber,
    /// A numeric literal whose value does not fit its suffix's type.
    NumberOutOfRange,
}

impl LexErrorKind {
    /// The diagnostic message the parser reports for this error.
    pub fn message(self) -> &'static str {
        match self {
            LexErrorKind::UnrecognizedCharacter => "Unrecognized character",
            LexErrorKind::MalformedNumber => "Malformed numeric literal",
            LexErrorKind::NumberOutOfRange => "Numeric literal out of range",
        }
    }
}

/// The closed set of token kinds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TokenKind {
    // Keywords.
    KeywordFn,
    KeywordVar,
    KeywordStruct,
    KeywordType,
    KeywordReturn,
    KeywordArray,
    KeywordI32,
    KeywordU32,
    KeywordF32,
    KeywordBool,
    KeywordFunction,
    KeywordPrivate,
    KeywordWorkgroup,
    KeywordUniform,
    KeywordStorage,
    KeywordRead,
    KeywordWrite,
    KeywordReadWrite,

    // Literals.
    LiteralTrue,
    LiteralFalse,
    /// Unsuffixed integer literal (abstract int).
    IntegerLiteral(i64),
    /// `i`-suffixed integer literal; the value fits in an `i32`.
    IntegerLiteralSigned(i64),
    /// `u`-suffixed integer literal; the value fits in a `u32`.
    IntegerLiteralUnsigned(i64),
    /// Decimal float literal, e.g. `1.5`, `2e10`, `0.25f`.
    DecimalFloatLiteral(f64, FloatSuffix),
    /// Hex float literal, e.g. `0x1.8p+1`.
    HexFloatLiteral(f64, FloatSuffix),

    Identifier(Symbol),

    // Punctuation.
    Attribute,
    ParenLeft,
    ParenRight,
    BraceLeft,
    BraceRight,
    BracketLeft,
    BracketRight,
    Lt,
    Gt,
    Colon,
    Semicolon,
    Comma,
    Period,
    Equal,
    Minus,
    Arrow,

    Eof,
    Error(LexErrorKind),
}

impl TokenKind {
    /// Stable, human-readable name for diagnostics.
    ///
    /// Parser errors are phrased "Expected X, got Y" using these names, so
    /// they are part of the observable message format.
    pub fn name(&self) -> &'static str {
        match self {
            TokenKind::KeywordFn => "'fn'",
            TokenKind::KeywordVar => "'var'",
            TokenKind::KeywordStruct => "'struct'",
            TokenKind::KeywordType => "'type'",
            TokenKind::KeywordReturn => "'return'",
            TokenKind::KeywordArray => "'array'",
            TokenKind::KeywordI32 => "'i32'",
            TokenKind::KeywordU32 => "'u32'",
            TokenKind::KeywordF32 => "'f32'",
            TokenKind::KeywordBool => "'bool'",
            TokenKind::KeywordFunction => "'function'",
            TokenKind::KeywordPrivate => "'private'",
            TokenKind::KeywordWorkgroup => "'workgroup'",
            TokenKind::KeywordUniform => "'uniform'",
            TokenKind::KeywordStorage => "'storage'",
            TokenKind::KeywordRead => "'read'",
            TokenKind::KeywordWrite => "'write'",
            TokenKind::KeywordReadWrite => "'read_write'",
            TokenKind::LiteralTrue => "'true'",
            TokenKind::LiteralFalse => "'false'",
            TokenKind::IntegerLiteral(_) => "integer literal",
            TokenKind::IntegerLiteralSigned(_) => "signed integer literal",
            TokenKind::IntegerLiteralUnsigned(_) => "unsigned integer literal",
            TokenKind::DecimalFloatLiteral(..) => "float literal",
            TokenKind::HexFloatLiteral(..) => "hex float literal",
            TokenKind::Identifier(_) => "identifier",
            TokenKind::Attribute => "'@'",
            TokenKind::ParenLeft => "'('",
            TokenKind::ParenRight => "')'",
            TokenKind::BraceLeft => "'{'",
            TokenKind::BraceRight => "'}'",
            TokenKind::BracketLeft => "'['",
            TokenKind::BracketRight => "']'",
            TokenKind::Lt => "'<'",
            TokenKind::Gt => "'>'",
            TokenKind::Colon => "':'",
            TokenKind::Semicolon => "';'",
            TokenKind::Comma => "','",
            TokenKind::Period => "'.'",
            TokenKind::Equal => "'='",
            TokenKind::Minus => "'-'",
            TokenKind::Arrow => "'->'",
            TokenKind::Eof => "end of file",
            TokenKind::Error(_) => "invalid token",
        }
    }

    /// Reclassifies a scanned word as a keyword or boolean literal, if its
    /// text is in the closed keyword set.
    pub fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word {
            "fn" => TokenKind::KeywordFn,
            "var" => TokenKind::KeywordVar,
            "struct" => TokenKind::KeywordStruct,
            "type" => TokenKind::KeywordType,
            "return" => TokenKind::KeywordReturn,
            "array" => TokenKind::KeywordArray,
            "i32" => TokenKind::KeywordI32,
            "u32" => TokenKind::KeywordU32,
            "f32" => TokenKind::KeywordF32,
            "bool" => TokenKind::KeywordBool,
            "function" => TokenKind::KeywordFunction,
            "private" => TokenKind::KeywordPrivate,
            "workgroup" => TokenKind::KeywordWorkgroup,
            "uniform" => TokenKind::KeywordUniform,
            "storage" => TokenKind::KeywordStorage,
            "read" => TokenKind::KeywordRead,
            "write" => TokenKind::KeywordWrite,
            "read_write" => TokenKind::KeywordReadWrite,
            "true" => TokenKind::LiteralTrue,
            "false" => TokenKind::LiteralFalse,
            _ => return None,
        };
        Some(kind)
    }
}

/// A token: kind plus the source range it was scanned from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: SourceSpan,
}

impl Token {
    pub fn new(kind: TokenKind, span: SourceSpan) -> Self {
        Self { kind, span }
    }

    pub fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_reclassification_covers_the_closed_set() {
        assert_eq!(TokenKind::keyword("fn"), Some(TokenKind::KeywordFn));
        assert_eq!(TokenKind::keyword("read_write"), Some(TokenKind::KeywordReadWrite));
        assert_eq!(TokenKind::keyword("true"), Some(TokenKind::LiteralTrue));
        assert_eq!(TokenKind::keyword("vec2"), None);
        assert_eq!(TokenKind::keyword("enable"), None);
    }

    #[test]
    fn keyword_lookup_is_case_sensitive() {
        assert_eq!(TokenKind::keyword("Fn"), None);
        assert_eq!(TokenKind::keyword("VAR"), None);
    }

    #[test]
    fn names_are_stable() {
        assert_eq!(TokenKind::Identifier(Default::default()).name(), "identifier");
        assert_eq!(TokenKind::ParenRight.name(), "')'");
        assert_eq!(TokenKind::Eof.name(), "end of file");
        assert_eq!(TokenKind::IntegerLiteral(3).name(), "integer literal");
    }

    #[test]
    fn lex_error_messages_match_taxonomy() {
        assert_eq!(LexErrorKind::UnrecognizedCharacter.message(), "Unrecognized character");
        assert_eq!(LexErrorKind::MalformedNumber.message(), "Malformed numeric literal");
    }
}
