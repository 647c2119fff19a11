//! The WGSL lexer.
//!
//! [`Lexer`] turns characters into [`Token`]s on demand: the parser holds
//! one prefetched token and calls [`Lexer::lex`] each time it consumes it.
//! The lexer is parameterized over a [`CharacterStream`] rather than a
//! buffer type, so the same classification logic serves UTF-8 input
//! ([`Utf8Stream`]) and UTF-16 input ([`Utf16Stream`]); for ASCII-only
//! sources the two paths produce identical tokens, spans included.
//!
//! Scanning rules:
//!
//! - Whitespace and `// …` line comments are consumed before each token.
//!   Block comments are not supported.
//! - Identifiers are `[A-Za-z_][A-Za-z0-9_]*`; words matching the closed
//!   keyword set are reclassified after scanning.
//! - Integer literals are decimal or `0x` hex, with optional `i`/`u`
//!   suffix; suffixed values are range-checked at scan time.
//! - Float literals are decimal with a fractional part and/or exponent, or
//!   hex floats (`0x1.8p+1`, binary exponent mandatory), with optional `f`
//!   suffix.
//! - Punctuation is longest-match (`->` before `-`).
//! - Anything else becomes an error token spanning the offending input;
//!   the parser turns the first one it sees into the fatal diagnostic.

use crate::token::{FloatSuffix, LexErrorKind, Token, TokenKind};
use wgslc_base::{Interner, SourcePosition, SourceSpan};

/// A decoded character source with one character of lookahead beyond the
/// cursor.
///
/// `offset` counts code units of the underlying encoding, which is what
/// token spans are measured in.
pub trait CharacterStream {
    /// The character at the cursor, if any.
    fn peek(&self) -> Option<char>;
    /// The character after the cursor, if any.
    fn peek_second(&self) -> Option<char>;
    /// Consumes the character at the cursor.
    fn advance(&mut self);
    /// Code units consumed so far.
    fn offset(&self) -> u32;
}

/// UTF-8 input; offsets are byte offsets.
pub struct Utf8Stream<'a> {
    rest: std::str::Chars<'a>,
    offset: u32,
}

impl<'a> Utf8Stream<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { rest: source.chars(), offset: 0 }
    }
}

impl CharacterStream for Utf8Stream<'_> {
    fn peek(&self) -> Option<char> {
        self.rest.clone().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut it = self.rest.clone();
        it.next();
        it.next()
    }

    fn advance(&mut self) {
        if let Some(c) = self.rest.next() {
            self.offset += c.len_utf8() as u32;
        }
    }

    fn offset(&self) -> u32 {
        self.offset
    }
}

/// UTF-16 input; offsets are 16-bit code-unit offsets.
///
/// Surrogate pairs decode to one character of width two; an unpaired
/// surrogate decodes to U+FFFD, which no token class accepts, so it
/// surfaces as an unrecognized-character error.
pub struct Utf16Stream<'a> {
    units: &'a [u16],
    index: usize,
}

impl<'a> Utf16Stream<'a> {
    pub fn new(source: &'a [u16]) -> Self {
        Self { units: source, index: 0 }
    }

    fn decode_at(&self, index: usize) -> Option<(char, usize)> {
        let unit = *self.units.get(index)?;
        if (0xD800..=0xDBFF).contains(&unit) {
            if let Some(&low) = self.units.get(index + 1) {
                if (0xDC00..=0xDFFF).contains(&low) {
                    let value =
                        0x10000 + (((unit as u32) - 0xD800) << 10) + ((low as u32) - 0xDC00);
                    return Some((char::from_u32(value).unwrap_or('\u{FFFD}'), 2));
                }
            }
            return Some(('\u{FFFD}', 1));
        }
        if (0xDC00..=0xDFFF).contains(&unit) {
            return Some(('\u{FFFD}', 1));
        }
        Some((char::from_u32(unit as u32).unwrap_or('\u{FFFD}'), 1))
    }
}

impl CharacterStream for Utf16Stream<'_> {
    fn peek(&self) -> Option<char> {
        self.decode_at(self.index).map(|(c, _)| c)
    }

    fn peek_second(&self) -> Option<char> {
        let (_, width) = self.decode_at(self.index)?;
        self.decode_at(self.index + width).map(|(c, _)| c)
    }

    fn advance(&mut self) {
        if let Some((_, width)) = self.decode_at(self.index) {
            self.index += width;
        }
    }

    fn offset(&self) -> u32 {
        self.index as u32
    }
}

fn is_identifier_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_identifier_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// On-demand tokenizer over a [`CharacterStream`].
///
/// The lexer owns the [`Interner`] while scanning (identifier tokens are
/// interned as they are produced) and releases it via
/// [`Lexer::into_interner`] once the module is built, so the finished
/// [`ShaderModule`] becomes the owning bundle for every identifier.
///
/// [`ShaderModule`]: crate::ast::ShaderModule
pub struct Lexer<S: CharacterStream> {
    stream: S,
    interner: Interner,
    line: u32,
    column: u32,
}

impl<S: CharacterStream> Lexer<S> {
    pub fn new(stream: S, interner: Interner) -> Self {
        Self { stream, interner, line: 1, column: 1 }
    }

    /// Read access to the interner, for resolving identifier payloads.
    pub fn interner(&self) -> &Interner {
        &self.interner
    }

    /// Interns a string on behalf of the parser; primitive type keywords
    /// become named type references this way.
    pub fn intern(&mut self, text: &str) -> wgslc_base::Symbol {
        self.interner.intern(text)
    }

    /// Releases the interner to the finished module.
    pub fn into_interner(self) -> Interner {
        self.interner
    }

    /// The position of the cursor, after any token already returned.
    pub fn current_position(&self) -> SourcePosition {
        SourcePosition::new(self.stream.offset(), self.line, self.column)
    }

    /// Returns `true` once every character has been consumed.
    ///
    /// Trailing trivia still counts as input; callers generally loop on the
    /// parser's EOF token instead.
    pub fn is_at_end(&self) -> bool {
        self.stream.peek().is_none()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.stream.peek()?;
        self.stream.advance();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_trivia(&mut self) {
        loop {
            match self.stream.peek() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('/') if self.stream.peek_second() == Some('/') => {
                    while let Some(c) = self.stream.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                _ => break,
            }
        }
    }

    fn span_from(&self, start: SourcePosition) -> SourceSpan {
        SourceSpan::new(start, self.current_position())
    }

    fn token_from(&self, kind: TokenKind, start: SourcePosition) -> Token {
        Token::new(kind, self.span_from(start))
    }

    fn error_token(&mut self, kind: LexErrorKind, start: SourcePosition) -> Token {
        // Swallow the rest of the lexeme so the span names the whole
        // offender rather than its first character.
        while let Some(c) = self.stream.peek() {
            if is_identifier_continue(c) || c == '.' {
                self.advance();
            } else {
                break;
            }
        }
        self.token_from(TokenKind::Error(kind), start)
    }

    /// Scans and returns the next token.
    pub fn lex(&mut self) -> Token {
        self.skip_trivia();
        let start = self.current_position();

        let c = match self.stream.peek() {
            Some(c) => c,
            None => return self.token_from(TokenKind::Eof, start),
        };

        if is_identifier_start(c) {
            return self.lex_word(start);
        }
        if c.is_ascii_digit() {
            return self.lex_number(start);
        }

        self.advance();
        let kind = match c {
            '@' => TokenKind::Attribute,
            '(' => TokenKind::ParenLeft,
            ')' => TokenKind::ParenRight,
            '{' => TokenKind::BraceLeft,
            '}' => TokenKind::BraceRight,
            '[' => TokenKind::BracketLeft,
            ']' => TokenKind::BracketRight,
            '<' => TokenKind::Lt,
            '>' => TokenKind::Gt,
            ':' => TokenKind::Colon,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            '.' => TokenKind::Period,
            '=' => TokenKind::Equal,
            '-' => {
                if self.stream.peek() == Some('>') {
                    self.advance();
                    TokenKind::Arrow
                } else {
                    TokenKind::Minus
                }
            }
            _ => return self.token_from(TokenKind::Error(LexErrorKind::UnrecognizedCharacter), start),
        };
        self.token_from(kind, start)
    }

    fn lex_word(&mut self, start: SourcePosition) -> Token {
        let mut word = String::new();
        while let Some(c) = self.stream.peek() {
            if is_identifier_continue(c) {
                word.push(c);
                self.advance();
            } else {
                break;
            }
        }
        let kind = match TokenKind::keyword(&word) {
            Some(keyword) => keyword,
            None => TokenKind::Identifier(self.interner.intern(&word)),
        };
        self.token_from(kind, start)
    }

    fn lex_number(&mut self, start: SourcePosition) -> Token {
        let mut digits = String::new();
        while let Some(c) = self.stream.peek() {
            if c.is_ascii_digit() {
                digits.push(c);
                self.advance();
            } else {
                break;
            }
        }

        if digits == "0" && matches!(self.stream.peek(), Some('x') | Some('X')) {
            self.advance();
            return self.lex_hex_number(start);
        }

        let mut is_float = false;
        let mut text = digits;

        if self.stream.peek() == Some('.') {
            is_float = true;
            text.push('.');
            self.advance();
            while let Some(c) = self.stream.peek() {
                if c.is_ascii_digit() {
                    text.push(c);
                    self.advance();
                } else {
                    break;
                }
            }
        }

        if matches!(self.stream.peek(), Some('e') | Some('E')) {
            is_float = true;
            text.push('e');
            self.advance();
            if matches!(self.stream.peek(), Some('+') | Some('-')) {
                text.push(self.stream.peek().unwrap());
                self.advance();
            }
            let mut saw_exponent_digit = false;
            while let Some(c) = self.stream.peek() {
                if c.is_ascii_digit() {
                    saw_exponent_digit = true;
                    text.push(c);
                    self.advance();
                } else {
                    break;
                }
            }
            if !saw_exponent_digit {
                return self.error_token(LexErrorKind::MalformedNumber, start);
            }
        }

        let kind = match self.stream.peek() {
            Some('i') if !is_float => {
                self.advance();
                match text.parse::<i64>() {
                    Ok(value) if value <= i32::MAX as i64 => TokenKind::IntegerLiteralSigned(value),
                    _ => return self.error_token(LexErrorKind::NumberOutOfRange, start),
                }
            }
            Some('u') if !is_float => {
                self.advance();
                match text.parse::<i64>() {
                    Ok(value) if value <= u32::MAX as i64 => {
                        TokenKind::IntegerLiteralUnsigned(value)
                    }
                    _ => return self.error_token(LexErrorKind::NumberOutOfRange, start),
                }
            }
            Some('f') => {
                self.advance();
                match text.parse::<f64>() {
                    Ok(value) => TokenKind::DecimalFloatLiteral(value, FloatSuffix::F32),
                    Err(_) => return self.error_token(LexErrorKind::MalformedNumber, start),
                }
            }
            _ if is_float => match text.parse::<f64>() {
                Ok(value) => TokenKind::DecimalFloatLiteral(value, FloatSuffix::None),
                Err(_) => return self.error_token(LexErrorKind::MalformedNumber, start),
            },
            _ => match text.parse::<i64>() {
                Ok(value) => TokenKind::IntegerLiteral(value),
                Err(_) => return self.error_token(LexErrorKind::NumberOutOfRange, start),
            },
        };

        if matches!(self.stream.peek(), Some(c) if is_identifier_continue(c)) {
            return self.error_token(LexErrorKind::MalformedNumber, start);
        }
        self.token_from(kind, start)
    }

    fn lex_hex_number(&mut self, start: SourcePosition) -> Token {
        let mut mantissa = String::new();
        while let Some(c) = self.stream.peek() {
            if c.is_ascii_hexdigit() {
                mantissa.push(c);
                self.advance();
            } else {
                break;
            }
        }

        let mut fraction = String::new();
        let mut has_fraction = false;
        if self.stream.peek() == Some('.') {
            has_fraction = true;
            self.advance();
            while let Some(c) = self.stream.peek() {
                if c.is_ascii_hexdigit() {
                    fraction.push(c);
                    self.advance();
                } else {
                    break;
                }
            }
        }

        if mantissa.is_empty() && fraction.is_empty() {
            return self.error_token(LexErrorKind::MalformedNumber, start);
        }

        if matches!(self.stream.peek(), Some('p') | Some('P')) {
            self.advance();
            let negative = match self.stream.peek() {
                Some('+') => {
                    self.advance();
                    false
                }
                Some('-') => {
                    self.advance();
                    true
                }
                _ => false,
            };
            let mut exponent_digits = String::new();
            while let Some(c) = self.stream.peek() {
                if c.is_ascii_digit() {
                    exponent_digits.push(c);
                    self.advance();
                } else {
                    break;
                }
            }
            if exponent_digits.is_empty() {
                return self.error_token(LexErrorKind::MalformedNumber, start);
            }
            let exponent = match exponent_digits.parse::<i32>() {
                Ok(e) => {
                    if negative {
                        -e
                    } else {
                        e
                    }
                }
                Err(_) => return self.error_token(LexErrorKind::NumberOutOfRange, start),
            };
            let value = decode_hex_float(&mantissa, &fraction, exponent);
            let suffix = if self.stream.peek() == Some('f') {
                self.advance();
                FloatSuffix::F32
            } else {
                FloatSuffix::None
            };
            if matches!(self.stream.peek(), Some(c) if is_identifier_continue(c)) {
                return self.error_token(LexErrorKind::MalformedNumber, start);
            }
            return self.token_from(TokenKind::HexFloatLiteral(value, suffix), start);
        }

        // A hex fraction without a binary exponent is not a literal form.
        if has_fraction {
            return self.error_token(LexErrorKind::MalformedNumber, start);
        }

        let value = match u64::from_str_radix(&mantissa, 16) {
            Ok(value) => value,
            Err(_) => return self.error_token(LexErrorKind::NumberOutOfRange, start),
        };
        let kind = match self.stream.peek() {
            Some('i') => {
                self.advance();
                if value <= i32::MAX as u64 {
                    TokenKind::IntegerLiteralSigned(value as i64)
                } else {
                    return self.error_token(LexErrorKind::NumberOutOfRange, start);
                }
            }
            Some('u') => {
                self.advance();
                if value <= u32::MAX as u64 {
                    TokenKind::IntegerLiteralUnsigned(value as i64)
                } else {
                    return self.error_token(LexErrorKind::NumberOutOfRange, start);
                }
            }
            _ => {
                if value <= i64::MAX as u64 {
                    TokenKind::IntegerLiteral(value as i64)
                } else {
                    return self.error_token(LexErrorKind::NumberOutOfRange, start);
                }
            }
        };
        if matches!(self.stream.peek(), Some(c) if is_identifier_continue(c)) {
            return self.error_token(LexErrorKind::MalformedNumber, start);
        }
        self.token_from(kind, start)
    }
}

/// Decodes `0x<mantissa>.<fraction>p<exponent>` into an `f64`.
fn decode_hex_float(mantissa: &str, fraction: &str, exponent: i32) -> f64 {
    let mut value = 0.0f64;
    for digit in mantissa.chars() {
        value = value * 16.0 + digit.to_digit(16).unwrap_or(0) as f64;
    }
    let mut scale = 1.0 / 16.0;
    for digit in fraction.chars() {
        value += digit.to_digit(16).unwrap_or(0) as f64 * scale;
        scale /= 16.0;
    }
    value * 2.0f64.powi(exponent)
}
