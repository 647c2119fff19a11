//! The recursive-descent WGSL parser.
//!
//! One production per `parse_*` method, single token of lookahead: the
//! parser holds a prefetched `current` token and pulls the next one from
//! the lexer each time it consumes. Every production returns
//! `Result<Node>`; the first mismatch unwinds the whole parse with one
//! [`SpannedError`] naming the expected and actual token kinds. There is no
//! recovery.
//!
//! Span discipline: a production records the start of its first token and
//! closes its span at the end of the last token it consumed, so every
//! node's span contains its children's spans. Attributes written before a
//! declaration are parsed by the caller and handed in together with their
//! start position, keeping them inside the declaration's span.

use crate::ast::{
    AccessMode, Attribute, AttributeKind, CompoundStatement, Expression, FunctionDecl,
    GlobalDirective, IntSuffix, Literal, Parameter, ParameterizedBase, ShaderModule, Stage,
    Statement, StorageClass, StructureDecl, StructureMember, TypeAliasDecl, TypeName,
    UnaryOperation, VariableDecl, VariableQualifier,
};
use crate::lexer::{CharacterStream, Lexer};
use crate::token::{Token, TokenKind};
use wgslc_base::{Result, SourcePosition, SourceSpan, SpannedError, Symbol, SymbolEq};

pub struct Parser<S: CharacterStream> {
    lexer: Lexer<S>,
    current: Token,
    last_end: SourcePosition,
}

impl<S: CharacterStream> Parser<S> {
    pub fn new(mut lexer: Lexer<S>) -> Self {
        let current = lexer.lex();
        Self { lexer, current, last_end: SourcePosition::default() }
    }

    // ------------------------------------------------------------------
    // Token plumbing
    // ------------------------------------------------------------------

    fn consume(&mut self) {
        self.last_end = self.current.span.end;
        self.current = self.lexer.lex();
    }

    fn start(&self) -> SourcePosition {
        self.current.span.start
    }

    fn span_from(&self, start: SourcePosition) -> SourceSpan {
        SourceSpan::new(start, self.last_end)
    }

    fn check(&self, kind: TokenKind) -> bool {
        std::mem::discriminant(&self.current.kind) == std::mem::discriminant(&kind)
    }

    fn error(&self, message: impl Into<String>) -> SpannedError {
        SpannedError::new(message, self.current.span)
    }

    /// Promotes a lexer error token into the compilation's diagnostic.
    /// Called wherever the parser dispatches on the current token, so a
    /// lexical error is reported as itself rather than as a mismatch.
    fn bail_if_error_token(&self) -> Result<()> {
        if let TokenKind::Error(kind) = self.current.kind {
            return Err(self.error(kind.message()));
        }
        Ok(())
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token> {
        self.bail_if_error_token()?;
        if self.check(kind) {
            let token = self.current;
            self.consume();
            return Ok(token);
        }
        Err(self.error(format!("Expected {}, got {}", kind.name(), self.current.kind.name())))
    }

    fn expect_identifier(&mut self) -> Result<(Symbol, SourceSpan)> {
        self.bail_if_error_token()?;
        if let TokenKind::Identifier(name) = self.current.kind {
            let span = self.current.span;
            self.consume();
            return Ok((name, span));
        }
        Err(self.error(format!("Expected identifier, got {}", self.current.kind.name())))
    }

    /// Attribute arguments accept exactly an unsuffixed non-negative
    /// integer literal.
    fn expect_attribute_index(&mut self) -> Result<u32> {
        self.bail_if_error_token()?;
        if let TokenKind::IntegerLiteral(value) = self.current.kind {
            if (0..=u32::MAX as i64).contains(&value) {
                self.consume();
                return Ok(value as u32);
            }
        }
        Err(self.error(format!(
            "Expected a non-negative integer literal, got {}",
            self.current.kind.name()
        )))
    }

    fn ident_is(&self, name: Symbol, text: &str) -> bool {
        name.is(self.lexer.interner(), text)
    }

    // ------------------------------------------------------------------
    // Module level
    // ------------------------------------------------------------------

    pub fn parse_shader(mut self) -> Result<ShaderModule> {
        let mut directives = Vec::new();
        let mut structures = Vec::new();
        let mut variables = Vec::new();
        let mut functions = Vec::new();
        let mut type_aliases = Vec::new();

        while self.at_enable_directive() {
            directives.push(self.parse_global_directive()?);
        }

        while !self.current.is_eof() {
            self.bail_if_error_token()?;
            let attributes_start = self.start();
            let attributes = self.parse_attributes()?;

            match self.current.kind {
                TokenKind::KeywordStruct => {
                    structures.push(self.parse_structure_declaration(attributes, attributes_start)?);
                }
                TokenKind::KeywordVar => {
                    let mut variable = self.parse_variable_declaration(attributes_start)?;
                    variable.attributes = attributes;
                    self.expect(TokenKind::Semicolon)?;
                    variable.span = self.span_from(attributes_start);
                    variables.push(variable);
                }
                TokenKind::KeywordFn => {
                    functions.push(self.parse_function_declaration(attributes, attributes_start)?);
                }
                TokenKind::KeywordType => {
                    let mut alias = self.parse_type_alias_declaration(attributes_start)?;
                    alias.attributes = attributes;
                    self.expect(TokenKind::Semicolon)?;
                    alias.span = self.span_from(attributes_start);
                    type_aliases.push(alias);
                }
                _ => {
                    return Err(self.error(format!(
                        "Expected 'fn', 'struct', 'type', or 'var' to begin a global \
                         declaration, got {}",
                        self.current.kind.name()
                    )))
                }
            }
        }

        let mut module = ShaderModule::new(self.lexer.into_interner());
        module.directives = directives;
        module.structures = structures;
        module.variables = variables;
        module.functions = functions;
        module.type_aliases = type_aliases;
        Ok(module)
    }

    fn at_enable_directive(&self) -> bool {
        matches!(self.current.kind, TokenKind::Identifier(name) if self.ident_is(name, "enable"))
    }

    fn parse_global_directive(&mut self) -> Result<GlobalDirective> {
        let start = self.start();
        self.consume(); // the 'enable' identifier
        let (name, _) = self.expect_identifier()?;
        self.expect(TokenKind::Semicolon)?;
        Ok(GlobalDirective { span: self.span_from(start), name })
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    fn parse_attributes(&mut self) -> Result<Vec<Attribute>> {
        let mut attributes = Vec::new();
        while self.check(TokenKind::Attribute) {
            attributes.push(self.parse_attribute()?);
        }
        Ok(attributes)
    }

    fn parse_attribute(&mut self) -> Result<Attribute> {
        let start = self.start();
        self.expect(TokenKind::Attribute)?;
        let (name, name_span) = self.expect_identifier()?;

        let kind = if self.ident_is(name, "group") {
            AttributeKind::Group(self.parse_attribute_argument()?)
        } else if self.ident_is(name, "binding") {
            AttributeKind::Binding(self.parse_attribute_argument()?)
        } else if self.ident_is(name, "location") {
            AttributeKind::Location(self.parse_attribute_argument()?)
        } else if self.ident_is(name, "builtin") {
            self.expect(TokenKind::ParenLeft)?;
            let (builtin, _) = self.expect_identifier()?;
            self.expect(TokenKind::ParenRight)?;
            AttributeKind::Builtin(builtin)
        } else if self.ident_is(name, "vertex") {
            AttributeKind::Stage(Stage::Vertex)
        } else if self.ident_is(name, "fragment") {
            AttributeKind::Stage(Stage::Fragment)
        } else if self.ident_is(name, "compute") {
            AttributeKind::Stage(Stage::Compute)
        } else {
            return Err(SpannedError::new(
                "Unknown attribute. Supported attributes are 'group', 'binding', 'location', \
                 'builtin', 'vertex', 'compute', 'fragment'.",
                name_span,
            ));
        };

        Ok(Attribute::new(kind, self.span_from(start)))
    }

    fn parse_attribute_argument(&mut self) -> Result<u32> {
        self.expect(TokenKind::ParenLeft)?;
        let value = self.expect_attribute_index()?;
        self.expect(TokenKind::ParenRight)?;
        Ok(value)
    }

    // ------------------------------------------------------------------
    // Declarations
    // ------------------------------------------------------------------

    fn parse_structure_declaration(
        &mut self,
        attributes: Vec<Attribute>,
        start: SourcePosition,
    ) -> Result<StructureDecl> {
        self.expect(TokenKind::KeywordStruct)?;
        let (name, _) = self.expect_identifier()?;
        self.expect(TokenKind::BraceLeft)?;

        let mut members = Vec::new();
        while !self.check(TokenKind::BraceRight) {
            members.push(self.parse_structure_member()?);
        }
        self.expect(TokenKind::BraceRight)?;

        Ok(StructureDecl { span: self.span_from(start), name, attributes, members })
    }

    fn parse_structure_member(&mut self) -> Result<StructureMember> {
        let start = self.start();
        let attributes = self.parse_attributes()?;
        let (name, _) = self.expect_identifier()?;
        self.expect(TokenKind::Colon)?;
        let ty = self.parse_type_name()?;
        let span = self.span_from(start);

        // Members are separated by ',' or ';'; the separator is optional
        // before the closing brace.
        if self.check(TokenKind::Comma) || self.check(TokenKind::Semicolon) {
            self.consume();
        } else if !self.check(TokenKind::BraceRight) {
            return Err(self.error(format!(
                "Expected ',' or '}}' after a struct member, got {}",
                self.current.kind.name()
            )));
        }

        Ok(StructureMember { span, name, attributes, ty })
    }

    fn parse_type_alias_declaration(&mut self, start: SourcePosition) -> Result<TypeAliasDecl> {
        self.expect(TokenKind::KeywordType)?;
        let (name, _) = self.expect_identifier()?;
        self.expect(TokenKind::Equal)?;
        let ty = self.parse_type_name()?;
        Ok(TypeAliasDecl { span: self.span_from(start), name, attributes: Vec::new(), ty })
    }

    fn parse_variable_declaration(&mut self, start: SourcePosition) -> Result<VariableDecl> {
        self.expect(TokenKind::KeywordVar)?;

        let qualifier = if self.check(TokenKind::Lt) {
            Some(self.parse_variable_qualifier()?)
        } else {
            None
        };

        let (name, _) = self.expect_identifier()?;

        let ty = if self.check(TokenKind::Colon) {
            self.consume();
            Some(self.parse_type_name()?)
        } else {
            None
        };

        let initializer = if self.check(TokenKind::Equal) {
            self.consume();
            Some(self.parse_expression()?)
        } else {
            None
        };

        Ok(VariableDecl {
            span: self.span_from(start),
            name,
            qualifier,
            ty,
            initializer,
            attributes: Vec::new(),
        })
    }

    fn parse_variable_qualifier(&mut self) -> Result<VariableQualifier> {
        let start = self.start();
        self.expect(TokenKind::Lt)?;
        let storage_class = self.parse_storage_class()?;

        let access_mode = if self.check(TokenKind::Comma) {
            self.consume();
            self.parse_access_mode()?
        } else {
            AccessMode::Read
        };

        self.expect(TokenKind::Gt)?;
        Ok(VariableQualifier { span: self.span_from(start), storage_class, access_mode })
    }

    fn parse_storage_class(&mut self) -> Result<StorageClass> {
        let storage_class = match self.current.kind {
            TokenKind::KeywordFunction => StorageClass::Function,
            TokenKind::KeywordPrivate => StorageClass::Private,
            TokenKind::KeywordWorkgroup => StorageClass::Workgroup,
            TokenKind::KeywordUniform => StorageClass::Uniform,
            TokenKind::KeywordStorage => StorageClass::Storage,
            _ => {
                return Err(self.error(
                    "Expected one of 'function'/'private'/'storage'/'uniform'/'workgroup'",
                ))
            }
        };
        self.consume();
        Ok(storage_class)
    }

    fn parse_access_mode(&mut self) -> Result<AccessMode> {
        let access_mode = match self.current.kind {
            TokenKind::KeywordRead => AccessMode::Read,
            TokenKind::KeywordWrite => AccessMode::Write,
            TokenKind::KeywordReadWrite => AccessMode::ReadWrite,
            _ => return Err(self.error("Expected one of 'read'/'write'/'read_write'")),
        };
        self.consume();
        Ok(access_mode)
    }

    fn parse_function_declaration(
        &mut self,
        attributes: Vec<Attribute>,
        start: SourcePosition,
    ) -> Result<FunctionDecl> {
        self.expect(TokenKind::KeywordFn)?;
        let (name, _) = self.expect_identifier()?;

        self.expect(TokenKind::ParenLeft)?;
        let mut parameters = Vec::new();
        if !self.check(TokenKind::ParenRight) {
            loop {
                parameters.push(self.parse_parameter()?);
                if self.check(TokenKind::Comma) {
                    self.consume();
                } else {
                    break;
                }
            }
        }
        self.expect(TokenKind::ParenRight)?;

        let mut return_attributes = Vec::new();
        let mut return_type = None;
        if self.check(TokenKind::Arrow) {
            self.consume();
            return_attributes = self.parse_attributes()?;
            return_type = Some(self.parse_type_name()?);
        }

        let body = self.parse_compound_statement()?;

        Ok(FunctionDecl {
            span: self.span_from(start),
            name,
            attributes,
            parameters,
            return_attributes,
            return_type,
            body,
        })
    }

    fn parse_parameter(&mut self) -> Result<Parameter> {
        let start = self.start();
        let attributes = self.parse_attributes()?;
        let (name, _) = self.expect_identifier()?;
        self.expect(TokenKind::Colon)?;
        let ty = self.parse_type_name()?;
        Ok(Parameter { span: self.span_from(start), name, attributes, ty })
    }

    // ------------------------------------------------------------------
    // Types
    // ------------------------------------------------------------------

    fn parse_type_name(&mut self) -> Result<TypeName> {
        self.bail_if_error_token()?;
        let start = self.start();

        match self.current.kind {
            TokenKind::KeywordArray => self.parse_array_type_name(),
            TokenKind::KeywordI32 => Ok(self.named_primitive("i32", start)),
            TokenKind::KeywordU32 => Ok(self.named_primitive("u32", start)),
            TokenKind::KeywordF32 => Ok(self.named_primitive("f32", start)),
            TokenKind::KeywordBool => Ok(self.named_primitive("bool", start)),
            TokenKind::Identifier(_) => {
                let (name, _) = self.expect_identifier()?;
                self.parse_type_name_after_identifier(name, start)
            }
            _ => {
                Err(self
                    .error(format!("Expected a type name, got {}", self.current.kind.name())))
            }
        }
    }

    fn named_primitive(&mut self, text: &str, start: SourcePosition) -> TypeName {
        self.consume();
        let name = self.lexer.intern(text);
        TypeName::Named { span: self.span_from(start), name }
    }

    fn parse_type_name_after_identifier(
        &mut self,
        name: Symbol,
        start: SourcePosition,
    ) -> Result<TypeName> {
        let base = ParameterizedBase::from_word(self.lexer.interner().resolve(name));
        if let Some(base) = base {
            self.expect(TokenKind::Lt)?;
            let element = self.parse_type_name()?;
            self.expect(TokenKind::Gt)?;
            return Ok(TypeName::Parameterized {
                span: self.span_from(start),
                base,
                element: Box::new(element),
            });
        }
        Ok(TypeName::Named { span: self.span_from(start), name })
    }

    fn parse_array_type_name(&mut self) -> Result<TypeName> {
        let start = self.start();
        self.expect(TokenKind::KeywordArray)?;

        let mut element = None;
        let mut count = None;
        if self.check(TokenKind::Lt) {
            // The element type is optional in the grammar so constructor
            // expressions can reuse this production; a bare `array` in a
            // type position is rejected by a later pass.
            self.consume();
            element = Some(Box::new(self.parse_type_name()?));
            if self.check(TokenKind::Comma) {
                self.consume();
                count = Some(Box::new(self.parse_additive_expression()?));
            }
            self.expect(TokenKind::Gt)?;
        }

        Ok(TypeName::Array { span: self.span_from(start), element, count })
    }

    // ------------------------------------------------------------------
    // Statements
    // ------------------------------------------------------------------

    fn parse_statement(&mut self) -> Result<Statement> {
        self.bail_if_error_token()?;
        let start = self.start();

        match self.current.kind {
            TokenKind::BraceLeft => Ok(Statement::Compound(self.parse_compound_statement()?)),
            TokenKind::Semicolon => {
                self.consume();
                Ok(Statement::Compound(CompoundStatement {
                    span: self.span_from(start),
                    statements: Vec::new(),
                }))
            }
            TokenKind::KeywordReturn => {
                self.consume();
                let expression = if self.check(TokenKind::Semicolon) {
                    None
                } else {
                    Some(self.parse_short_circuit_or_expression()?)
                };
                self.expect(TokenKind::Semicolon)?;
                Ok(Statement::Return { span: self.span_from(start), expression })
            }
            TokenKind::KeywordVar => {
                let declaration = self.parse_variable_declaration(start)?;
                self.expect(TokenKind::Semicolon)?;
                Ok(Statement::Variable { span: self.span_from(start), declaration })
            }
            TokenKind::Identifier(_) => {
                let lhs = self.parse_lhs_expression()?;
                self.expect(TokenKind::Equal)?;
                let rhs = self.parse_expression()?;
                self.expect(TokenKind::Semicolon)?;
                Ok(Statement::Assignment { span: self.span_from(start), lhs: Some(lhs), rhs })
            }
            _ => Err(self.error("Not a valid statement")),
        }
    }

    fn parse_compound_statement(&mut self) -> Result<CompoundStatement> {
        let start = self.start();
        self.expect(TokenKind::BraceLeft)?;

        let mut statements = Vec::new();
        while !self.check(TokenKind::BraceRight) {
            statements.push(self.parse_statement()?);
        }
        self.expect(TokenKind::BraceRight)?;

        Ok(CompoundStatement { span: self.span_from(start), statements })
    }

    // ------------------------------------------------------------------
    // Expressions
    // ------------------------------------------------------------------
    //
    // The tower above `unary` is passthrough until binary operators land
    // in the grammar; each level keeps its own function so precedence can
    // be filled in without reshaping call sites.

    fn parse_expression(&mut self) -> Result<Expression> {
        self.parse_relational_expression()
    }

    fn parse_short_circuit_or_expression(&mut self) -> Result<Expression> {
        self.parse_relational_expression()
    }

    fn parse_relational_expression(&mut self) -> Result<Expression> {
        self.parse_shift_expression()
    }

    fn parse_shift_expression(&mut self) -> Result<Expression> {
        self.parse_additive_expression()
    }

    fn parse_additive_expression(&mut self) -> Result<Expression> {
        self.parse_multiplicative_expression()
    }

    fn parse_multiplicative_expression(&mut self) -> Result<Expression> {
        self.parse_unary_expression()
    }

    fn parse_unary_expression(&mut self) -> Result<Expression> {
        if self.check(TokenKind::Minus) {
            let start = self.start();
            self.consume();
            let expression = self.parse_singular_expression()?;
            return Ok(Expression::Unary {
                span: self.span_from(start),
                op: UnaryOperation::Negate,
                expression: Box::new(expression),
            });
        }
        self.parse_singular_expression()
    }

    fn parse_singular_expression(&mut self) -> Result<Expression> {
        let start = self.start();
        let base = self.parse_primary_expression()?;
        self.parse_postfix_expression(base, start)
    }

    fn parse_postfix_expression(
        &mut self,
        base: Expression,
        start: SourcePosition,
    ) -> Result<Expression> {
        let mut expression = base;
        loop {
            match self.current.kind {
                TokenKind::BracketLeft => {
                    self.consume();
                    let index = self.parse_expression()?;
                    self.expect(TokenKind::BracketRight)?;
                    expression = Expression::ArrayAccess {
                        span: self.span_from(start),
                        base: Box::new(expression),
                        index: Box::new(index),
                    };
                }
                TokenKind::Period => {
                    self.consume();
                    let (field, _) = self.expect_identifier()?;
                    expression = Expression::StructureAccess {
                        span: self.span_from(start),
                        base: Box::new(expression),
                        field,
                    };
                }
                _ => return Ok(expression),
            }
        }
    }

    fn parse_primary_expression(&mut self) -> Result<Expression> {
        self.bail_if_error_token()?;
        let start = self.start();

        match self.current.kind {
            TokenKind::ParenLeft => {
                self.consume();
                let expression = self.parse_expression()?;
                self.expect(TokenKind::ParenRight)?;
                Ok(expression)
            }
            TokenKind::Identifier(_) => {
                let (name, span) = self.expect_identifier()?;
                if self.check(TokenKind::Lt) || self.check(TokenKind::ParenLeft) {
                    // `vec4<f32>(…)` or `foo(…)`. A non-constructor
                    // identifier followed by `<` falls through the named
                    // branch of the type parse and then fails on the
                    // argument list, which is where comparisons get
                    // rejected until the grammar has them.
                    let target = self.parse_type_name_after_identifier(name, start)?;
                    let arguments = self.parse_argument_expression_list()?;
                    return Ok(Expression::Callable {
                        span: self.span_from(start),
                        target,
                        arguments,
                    });
                }
                Ok(Expression::Identifier { span, name })
            }
            TokenKind::KeywordArray => {
                let target = self.parse_array_type_name()?;
                let arguments = self.parse_argument_expression_list()?;
                Ok(Expression::Callable { span: self.span_from(start), target, arguments })
            }
            TokenKind::LiteralTrue | TokenKind::LiteralFalse => {
                let value = matches!(self.current.kind, TokenKind::LiteralTrue);
                self.consume();
                let span = self.span_from(start);
                Ok(Expression::Literal { span, literal: Literal::Bool { span, value } })
            }
            TokenKind::IntegerLiteral(value) => {
                self.literal_int(value, IntSuffix::None, start)
            }
            TokenKind::IntegerLiteralSigned(value) => {
                self.literal_int(value, IntSuffix::I32, start)
            }
            TokenKind::IntegerLiteralUnsigned(value) => {
                self.literal_int(value, IntSuffix::U32, start)
            }
            TokenKind::DecimalFloatLiteral(value, suffix)
            | TokenKind::HexFloatLiteral(value, suffix) => {
                self.consume();
                let span = self.span_from(start);
                Ok(Expression::Literal { span, literal: Literal::Float { span, value, suffix } })
            }
            _ => Err(self.error("Expected one of '(', a literal, or an identifier")),
        }
    }

    fn literal_int(
        &mut self,
        value: i64,
        suffix: IntSuffix,
        start: SourcePosition,
    ) -> Result<Expression> {
        self.consume();
        let span = self.span_from(start);
        Ok(Expression::Literal { span, literal: Literal::Int { span, value, suffix } })
    }

    fn parse_lhs_expression(&mut self) -> Result<Expression> {
        let start = self.start();
        let base = self.parse_core_lhs_expression()?;
        self.parse_postfix_expression(base, start)
    }

    fn parse_core_lhs_expression(&mut self) -> Result<Expression> {
        self.bail_if_error_token()?;
        match self.current.kind {
            TokenKind::ParenLeft => {
                self.consume();
                let expression = self.parse_lhs_expression()?;
                self.expect(TokenKind::ParenRight)?;
                Ok(expression)
            }
            TokenKind::Identifier(_) => {
                let (name, span) = self.expect_identifier()?;
                Ok(Expression::Identifier { span, name })
            }
            _ => Err(self.error("Tried to parse the left-hand side of an assignment and failed")),
        }
    }

    fn parse_argument_expression_list(&mut self) -> Result<Vec<Expression>> {
        self.expect(TokenKind::ParenLeft)?;

        let mut arguments = Vec::new();
        while !self.check(TokenKind::ParenRight) {
            arguments.push(self.parse_expression()?);
            if !self.check(TokenKind::ParenRight) {
                self.expect(TokenKind::Comma)?;
            }
        }
        self.expect(TokenKind::ParenRight)?;
        Ok(arguments)
    }
}
