//! Recursive-descent parser: token stream to undecorated tree.
//!
//! Every production is token-driven with at most two tokens of lookahead
//! (declarations and calls both begin with an identifier) and there is no
//! backtracking. The parser attaches no semantic information: names stay
//! unresolved until the decoration pass runs.

pub mod error;

pub use error::ParseError;

use crate::ast::{
    Attribute, BindingRequest, Class, Declaration, Expression, Function, FunctionCall,
    FunctionParameter, FunctionParameterList, InlineAsmStatement, Instruction, InstructionList,
    Method, NumberLiteral, ReturnStatement, StringLiteral, TranslationUnit, TypeExpr, Variable,
    Visibility,
};
use crate::codegen::Register;
use crate::lexer::{Span, Token, TokenKind};

/// Parse a token stream into a translation unit.
pub fn parse(tokens: Vec<Token>) -> Result<TranslationUnit, ParseError> {
    Parser::new(tokens).translation_unit()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(mut tokens: Vec<Token>) -> Self {
        if tokens.is_empty() {
            tokens.push(Token::new(TokenKind::Eof, Span::point(1, 1)));
        }
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn peek_kind(&self) -> &TokenKind {
        &self.tokens[self.pos].kind
    }

    /// Look `n` tokens ahead, clamped to the trailing Eof.
    fn peek_nth(&self, n: usize) -> &TokenKind {
        let index = (self.pos + n).min(self.tokens.len() - 1);
        &self.tokens[index].kind
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
        token
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let token = self.peek();
        if token.kind == TokenKind::Eof {
            ParseError::UnexpectedEof {
                expected: expected.to_string(),
                span: token.span,
            }
        } else {
            ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: token.kind.describe(),
                span: token.span,
            }
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &str) -> Result<Token, ParseError> {
        if self.peek().kind == kind {
            Ok(self.advance())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expect_ident(&mut self, expected: &str) -> Result<(String, Span), ParseError> {
        if let TokenKind::Ident(name) = self.peek_kind().clone() {
            let span = self.peek().span;
            self.advance();
            Ok((name, span))
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expect_string(&mut self, expected: &str) -> Result<StringLiteral, ParseError> {
        if let TokenKind::Str(value) = self.peek_kind().clone() {
            let span = self.peek().span;
            self.advance();
            Ok(StringLiteral { value, span })
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn translation_unit(&mut self) -> Result<TranslationUnit, ParseError> {
        let span = self.peek().span;
        let mut functions = Vec::new();
        let mut classes = Vec::new();
        while *self.peek_kind() != TokenKind::Eof {
            if *self.peek_kind() == TokenKind::KwClass {
                classes.push(self.class()?);
            } else {
                functions.push(self.function()?);
            }
        }
        Ok(TranslationUnit::new(functions, classes, span))
    }

    fn type_expr(&mut self) -> Result<TypeExpr, ParseError> {
        let (name, span) = self.expect_ident("a type name")?;
        let mut pointer_depth: u8 = 0;
        while *self.peek_kind() == TokenKind::Star {
            self.advance();
            pointer_depth += 1;
        }
        Ok(TypeExpr::new(name, pointer_depth, span))
    }

    fn function(&mut self) -> Result<Function, ParseError> {
        let return_type = self.type_expr()?;
        let (name, span) = self.expect_ident("a function name")?;
        let params = self.parameter_list()?;
        let body = self.block()?;
        Ok(Function::new(return_type, name, params, body, span))
    }

    fn parameter_list(&mut self) -> Result<FunctionParameterList, ParseError> {
        let open = self.expect(TokenKind::LParen, "'('")?;
        let mut parameters = Vec::new();
        if *self.peek_kind() != TokenKind::RParen {
            loop {
                let ty = self.type_expr()?;
                let (name, span) = self.expect_ident("a parameter name")?;
                parameters.push(FunctionParameter::new(ty, name, span));
                if *self.peek_kind() == TokenKind::Comma {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "')'")?;
        Ok(FunctionParameterList::new(parameters, open.span))
    }

    fn block(&mut self) -> Result<InstructionList, ParseError> {
        let open = self.expect(TokenKind::LBrace, "'{'")?;
        let mut instructions = Vec::new();
        while !matches!(self.peek_kind(), TokenKind::RBrace | TokenKind::Eof) {
            instructions.push(self.instruction()?);
        }
        self.expect(TokenKind::RBrace, "'}'")?;
        Ok(InstructionList::new(instructions, open.span))
    }

    fn instruction(&mut self) -> Result<Instruction, ParseError> {
        match self.peek_kind() {
            TokenKind::KwReturn => self.return_statement().map(Instruction::Return),
            TokenKind::KwAsm => self.inline_asm().map(Instruction::InlineAsm),
            TokenKind::Ident(_) if *self.peek_nth(1) == TokenKind::LParen => {
                let call = self.call()?;
                self.expect(TokenKind::Semicolon, "';'")?;
                Ok(Instruction::Call(call))
            }
            TokenKind::Ident(_) => self.declaration().map(Instruction::Declaration),
            _ => Err(self.unexpected("an instruction")),
        }
    }

    fn return_statement(&mut self) -> Result<ReturnStatement, ParseError> {
        let keyword = self.advance();
        let value = self.expression()?;
        self.expect(TokenKind::Semicolon, "';'")?;
        Ok(ReturnStatement {
            value,
            span: keyword.span,
        })
    }

    fn declaration(&mut self) -> Result<Declaration, ParseError> {
        let ty = self.type_expr()?;
        let (name, name_span) = self.expect_ident("a variable name")?;
        let initializer = if *self.peek_kind() == TokenKind::Assign {
            self.advance();
            Some(self.expression()?)
        } else {
            None
        };
        self.expect(TokenKind::Semicolon, "';'")?;
        Ok(Declaration {
            span: ty.span,
            ty,
            variable: Variable::new(name, name_span),
            initializer,
        })
    }

    fn inline_asm(&mut self) -> Result<InlineAsmStatement, ParseError> {
        let keyword = self.advance();
        self.expect(TokenKind::LParen, "'('")?;
        let body = self.expect_string("a string of raw assembly")?;

        let mut bindings = Vec::new();
        if *self.peek_kind() == TokenKind::Colon {
            self.advance();
            loop {
                bindings.push(self.binding_request()?);
                if *self.peek_kind() == TokenKind::Comma {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "')'")?;
        self.expect(TokenKind::Semicolon, "';'")?;
        Ok(InlineAsmStatement {
            body,
            bindings,
            span: keyword.span,
        })
    }

    /// `=<register>(<identifier>)`
    fn binding_request(&mut self) -> Result<BindingRequest, ParseError> {
        let eq = self.expect(TokenKind::Assign, "'=' starting a binding request")?;
        let (register_name, register_span) = self.expect_ident("a register name")?;
        let register =
            Register::parse(&register_name).ok_or_else(|| ParseError::UnknownRegister {
                name: register_name,
                span: register_span,
            })?;
        self.expect(TokenKind::LParen, "'('")?;
        let (variable, variable_span) = self.expect_ident("a variable name")?;
        self.expect(TokenKind::RParen, "')'")?;
        Ok(BindingRequest {
            register,
            variable: Variable::new(variable, variable_span),
            span: eq.span,
        })
    }

    fn call(&mut self) -> Result<FunctionCall, ParseError> {
        let (name, span) = self.expect_ident("a function name")?;
        self.expect(TokenKind::LParen, "'('")?;
        let mut arguments = Vec::new();
        if *self.peek_kind() != TokenKind::RParen {
            loop {
                arguments.push(self.expression()?);
                if *self.peek_kind() == TokenKind::Comma {
                    self.advance();
                } else {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "')'")?;
        Ok(FunctionCall::new(name, arguments, span))
    }

    fn expression(&mut self) -> Result<Expression, ParseError> {
        match self.peek_kind().clone() {
            TokenKind::Number(value) => {
                let span = self.peek().span;
                self.advance();
                Ok(Expression::Number(NumberLiteral { value, span }))
            }
            TokenKind::Ident(name) => {
                let span = self.peek().span;
                self.advance();
                Ok(Expression::Variable(Variable::new(name, span)))
            }
            _ => Err(self.unexpected("an expression")),
        }
    }

    fn class(&mut self) -> Result<Class, ParseError> {
        let keyword = self.advance();
        let (name, _) = self.expect_ident("a class name")?;
        self.expect(TokenKind::LBrace, "'{'")?;

        let mut visibility = Visibility::Private;
        let mut attributes = Vec::new();
        let mut methods = Vec::new();
        while !matches!(self.peek_kind(), TokenKind::RBrace | TokenKind::Eof) {
            match self.peek_kind() {
                TokenKind::KwPublic => {
                    self.advance();
                    self.expect(TokenKind::Colon, "':'")?;
                    visibility = Visibility::Public;
                }
                TokenKind::KwProtected => {
                    self.advance();
                    self.expect(TokenKind::Colon, "':'")?;
                    visibility = Visibility::Protected;
                }
                TokenKind::KwPrivate => {
                    self.advance();
                    self.expect(TokenKind::Colon, "':'")?;
                    visibility = Visibility::Private;
                }
                _ => {
                    let ty = self.type_expr()?;
                    let (member_name, member_span) = self.expect_ident("a member name")?;
                    if *self.peek_kind() == TokenKind::LParen {
                        let params = self.parameter_list()?;
                        let body = self.block()?;
                        methods.push(Method::new(
                            visibility,
                            ty,
                            member_name,
                            params,
                            body,
                            member_span,
                        ));
                    } else {
                        self.expect(TokenKind::Semicolon, "';'")?;
                        attributes.push(Attribute {
                            visibility,
                            ty,
                            name: member_name,
                            span: member_span,
                        });
                    }
                }
            }
        }
        self.expect(TokenKind::RBrace, "'}'")?;
        if *self.peek_kind() == TokenKind::Semicolon {
            self.advance();
        }
        Ok(Class::new(name, attributes, methods, keyword.span))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse_source(source: &str) -> TranslationUnit {
        parse(tokenize(source).expect("lexes")).expect("parses")
    }

    fn parse_err(source: &str) -> ParseError {
        parse(tokenize(source).expect("lexes")).expect_err("should fail to parse")
    }

    #[test]
    fn empty_input_is_an_empty_unit() {
        let unit = parse_source("");
        assert!(unit.functions.is_empty());
        assert!(unit.classes.is_empty());
    }

    #[test]
    fn parses_a_minimal_function() {
        let unit = parse_source("int f() { return 5; }");
        assert_eq!(unit.functions.len(), 1);
        let function = &unit.functions[0];
        assert_eq!(function.name, "f");
        assert_eq!(function.return_type.full_name(), "int");
        assert!(function.params.is_empty());
        assert_eq!(function.body.len(), 1);
    }

    #[test]
    fn parses_parameters_and_pointer_types() {
        let unit = parse_source("void f(int a, char** lines) { }");
        let params = &unit.functions[0].params.parameters;
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].ty.full_name(), "int");
        assert_eq!(params[1].ty.full_name(), "char**");
        assert_eq!(params[1].name, "lines");
    }

    #[test]
    fn declaration_with_and_without_initializer() {
        let unit = parse_source("int f() { int x = 3; int y; return x; }");
        let body = &unit.functions[0].body.instructions;
        let Instruction::Declaration(with_init) = &body[0] else {
            panic!("expected declaration");
        };
        assert!(with_init.initializer.is_some());
        let Instruction::Declaration(without_init) = &body[1] else {
            panic!("expected declaration");
        };
        assert!(without_init.initializer.is_none());
    }

    #[test]
    fn call_and_declaration_are_disambiguated() {
        let unit = parse_source("int f() { g(); int g2 = 1; return g2; }");
        let body = &unit.functions[0].body.instructions;
        assert!(matches!(body[0], Instruction::Call(_)));
        assert!(matches!(body[1], Instruction::Declaration(_)));
    }

    #[test]
    fn call_arguments_parse_in_order() {
        let unit = parse_source("int f() { g(1, x, 3); }");
        let Instruction::Call(call) = &unit.functions[0].body.instructions[0] else {
            panic!("expected call");
        };
        assert_eq!(call.name, "g");
        assert_eq!(call.arguments.len(), 3);
        assert!(matches!(call.arguments[1], Expression::Variable(_)));
    }

    #[test]
    fn inline_asm_without_bindings() {
        let unit = parse_source("int f() { asm(\"nop\"); }");
        let Instruction::InlineAsm(asm) = &unit.functions[0].body.instructions[0] else {
            panic!("expected inline asm");
        };
        assert_eq!(asm.body.value, "nop");
        assert!(asm.bindings.is_empty());
    }

    #[test]
    fn inline_asm_with_binding_requests() {
        let unit = parse_source("int f() { asm(\"mov rax, 1\" : =rax(x), =rdi(y)); }");
        let Instruction::InlineAsm(asm) = &unit.functions[0].body.instructions[0] else {
            panic!("expected inline asm");
        };
        assert_eq!(asm.bindings.len(), 2);
        assert_eq!(asm.bindings[0].register, Register::Rax);
        assert_eq!(asm.bindings[0].variable.name, "x");
        assert_eq!(asm.bindings[1].register, Register::Rdi);
        assert_eq!(asm.bindings[1].variable.name, "y");
    }

    #[test]
    fn unknown_register_in_binding_is_rejected() {
        let err = parse_err("int f() { asm(\"nop\" : =abc(x)); }");
        match err {
            ParseError::UnknownRegister { name, .. } => assert_eq!(name, "abc"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn class_members_get_the_active_visibility() {
        let unit = parse_source(
            "class Player { int hp; public: int get() { return hp; } int mana; }",
        );
        let class = &unit.classes[0];
        assert_eq!(class.name, "Player");
        // Default visibility is private until a specifier appears.
        assert_eq!(class.attributes[0].visibility, Visibility::Private);
        assert_eq!(class.attributes[0].name, "hp");
        assert_eq!(class.methods[0].visibility, Visibility::Public);
        assert_eq!(class.attributes[1].visibility, Visibility::Public);
    }

    #[test]
    fn class_accepts_an_optional_trailing_semicolon() {
        let unit = parse_source("class A { } ; class B { }");
        assert_eq!(unit.classes.len(), 2);
    }

    #[test]
    fn missing_semicolon_is_reported() {
        let err = parse_err("int f() { return 5 }");
        match err {
            ParseError::UnexpectedToken { expected, found, .. } => {
                assert_eq!(expected, "';'");
                assert_eq!(found, "'}'");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn truncated_input_is_an_eof_error() {
        let err = parse_err("int f() { return");
        assert!(matches!(err, ParseError::UnexpectedEof { .. }));
    }

    #[test]
    fn garbage_in_instruction_position_is_reported() {
        let err = parse_err("int f() { 5; }");
        match err {
            ParseError::UnexpectedToken { expected, .. } => {
                assert_eq!(expected, "an instruction");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
