use std::rc::Rc;
use tracing::{debug, trace};
use crate::interpreter::ast::{BinaryOperator, CaseTest, ConditionOperator, Node, NodeKind, Property, SwitchCase};
use crate::interpreter::error::{Error, ErrorKind, LangResult};
use crate::interpreter::lexer::{self, Token, TokenPos, TokenType};
use crate::util;


/// Tokenizes and parses `source` into a `Program` node.
pub fn parse(source: &str) -> LangResult<Node> {
    let tokens = lexer::tokenize(source)?;
    Parser::new(tokens).parse()
}

pub struct Parser {
    tokens: Vec<Token>,
    index: usize,
}

impl Parser {
    /// `tokens` must end with an [`TokenType::Eof`] token, as produced by [`lexer::tokenize`].
    pub fn new(tokens: Vec<Token>) -> Parser {
        Parser { tokens, index: 0 }
    }

    // Statement parsing

    pub fn parse(&mut self) -> LangResult<Node> {
        debug!(tokens = self.tokens.len(), "parsing program");

        let mut statements = Vec::new();

        while !self.is_eof() {
            statements.push(self.parse_statement()?);
        }

        Ok(Node::new(NodeKind::Program(statements), TokenPos::begin()))
    }

    fn parse_statement(&mut self) -> LangResult<Node> {
        util::ensure_sufficient_stack(|| self.parse_statement_inner())
    }

    fn parse_statement_inner(&mut self) -> LangResult<Node> {
        let start = *self.current().start();
        trace!(token = %self.current(), "parsing statement");

        let result = match self.current().token_type() {
            TokenType::Let | TokenType::Const => self.parse_variable_declaration(),
            TokenType::Fn => self.parse_function_declaration(),
            TokenType::If => self.parse_if_expression(),
            TokenType::For => self.parse_for_expression(),
            TokenType::Break => Ok(self.parse_break_expression()),
            TokenType::Continue => Ok(self.parse_continue_expression()),
            TokenType::Switch => self.parse_switch_expression(),
            _ => self.parse_expression_statement(),
        };

        result.map_err(|err| err.with_trace(start))
    }

    fn parse_variable_declaration(&mut self) -> LangResult<Node> {
        let keyword = self.consume();
        let constant = keyword.token_type() == TokenType::Const;

        let name = self.expect(TokenType::Identifier, "Expected variable name after 'let' or 'const'")?;

        if self.matches(TokenType::Semicolon) {
            if constant {
                return Err(Error::at(ErrorKind::ConstantWithoutInitializer(name.source().to_owned()), *name.start()));
            }

            return Ok(Node::new(NodeKind::VariableDeclaration {
                name: name.source().to_owned(), constant, value: None,
            }, *keyword.start()));
        }

        self.expect(TokenType::Assign, "Expected '=' or ';' after variable name")?;
        let value = self.parse_expression()?;
        self.expect(TokenType::Semicolon, "Expected ';' after variable declaration")?;

        Ok(Node::new(NodeKind::VariableDeclaration {
            name: name.source().to_owned(), constant, value: Some(Box::new(value)),
        }, *keyword.start()))
    }

    fn parse_function_declaration(&mut self) -> LangResult<Node> {
        let keyword = self.consume();
        let name = self.expect(TokenType::Identifier, "Expected function name after 'fn'")?;

        self.expect(TokenType::ParenthesisLeft, "Expected '(' after function name")?;
        let mut parameters = Vec::new();

        if !self.check(TokenType::ParenthesisRight) {
            loop {
                let parameter = self.expect(TokenType::Identifier, "Expected parameter name")?;
                parameters.push(parameter.source().to_owned());

                if !self.matches(TokenType::Comma) {
                    break;
                }
            }
        }

        self.expect(TokenType::ParenthesisRight, "Expected ')' after function parameters")?;
        let body = self.parse_block("function body")?;

        Ok(Node::new(NodeKind::FunctionDeclaration {
            name: name.source().to_owned(), parameters, body: Rc::new(body),
        }, *keyword.start()))
    }

    /// Parses an `if`, `elseif` or `else` clause and the rest of its chain.
    fn parse_if_expression(&mut self) -> LangResult<Node> {
        let keyword = self.consume();

        let condition = if keyword.token_type() == TokenType::Else {
            None
        } else {
            self.expect(TokenType::ParenthesisLeft, &format!("Expected '(' after '{}'", keyword.source()))?;
            let condition = self.parse_expression()?;
            self.expect(TokenType::ParenthesisRight, "Expected ')' after condition")?;

            Some(Box::new(condition))
        };

        let body = self.parse_block("if body")?;

        // A clause without a condition ends the chain
        let otherwise = if condition.is_some() && self.check_any(&[TokenType::Else, TokenType::ElseIf]) {
            Some(Box::new(self.parse_if_expression()?))
        } else {
            None
        };

        Ok(Node::new(NodeKind::IfExpression { condition, body, otherwise }, *keyword.start()))
    }

    fn parse_for_expression(&mut self) -> LangResult<Node> {
        let keyword = self.consume();

        let mut init = None;
        let mut condition = None;
        let mut increment = None;

        if !self.check(TokenType::BracketLeft) {
            self.expect(TokenType::ParenthesisLeft, "Expected '(' or '{' after 'for'")?;

            if self.count_header_semicolons() == 0 {
                condition = Some(Box::new(self.parse_expression()?));
            } else {
                if self.check_any(&[TokenType::Let, TokenType::Const]) {
                    init = Some(Box::new(self.parse_variable_declaration()?));
                } else {
                    self.expect(TokenType::Semicolon, "Expected variable declaration or ';' in for loop header")?;
                }

                if !self.check(TokenType::Semicolon) {
                    condition = Some(Box::new(self.parse_expression()?));
                }

                self.expect(TokenType::Semicolon, "Expected ';' after for loop condition")?;

                if !self.check(TokenType::ParenthesisRight) {
                    increment = Some(Box::new(self.parse_expression()?));
                }
            }

            self.expect(TokenType::ParenthesisRight, "Expected ')' after for loop header")?;
        }

        let body = self.parse_block("for body")?;

        let post_condition = if self.matches(TokenType::ParenthesisLeft) {
            let post_condition = self.parse_expression()?;
            self.expect(TokenType::ParenthesisRight, "Expected ')' after for loop post-condition")?;

            Some(Box::new(post_condition))
        } else {
            None
        };

        Ok(Node::new(NodeKind::ForExpression { init, condition, increment, post_condition, body }, *keyword.start()))
    }

    /// Counts the semicolons between the current token and the `)` closing the loop header.
    fn count_header_semicolons(&self) -> usize {
        let mut depth = 0usize;
        let mut count = 0;

        for token in &self.tokens[self.index..] {
            match token.token_type() {
                TokenType::ParenthesisLeft => depth += 1,
                TokenType::ParenthesisRight if depth == 0 => break,
                TokenType::ParenthesisRight => depth -= 1,
                TokenType::Semicolon if depth == 0 => count += 1,
                TokenType::BracketLeft | TokenType::Eof => break,
                _ => {},
            }
        }

        count
    }

    fn parse_switch_expression(&mut self) -> LangResult<Node> {
        let keyword = self.consume();

        self.expect(TokenType::ParenthesisLeft, "Expected '(' after 'switch'")?;
        let value = self.parse_expression()?;
        self.expect(TokenType::ParenthesisRight, "Expected ')' after switch value")?;
        self.expect(TokenType::BracketLeft, "Expected '{' after switch value")?;

        let mut cases = Vec::new();

        while !self.check(TokenType::BracketRight) && !self.is_eof() {
            let clause = self.consume();

            let test = match clause.token_type() {
                TokenType::Default => CaseTest::Default,
                TokenType::Case => {
                    let literal = self.consume();

                    match literal.token_type() {
                        TokenType::Number => CaseTest::Number(Self::parse_number(&literal)?),
                        TokenType::String => CaseTest::String(literal.source().to_owned()),
                        _ => return Err(Error::at(ErrorKind::InvalidCaseValue(literal.to_string()), *literal.start())),
                    }
                },
                _ => return Err(Error::at(ErrorKind::UnexpectedToken {
                    expected: String::from("Expected 'case' or 'default' in switch body"),
                    found: clause.to_string(),
                }, *clause.start())),
            };

            self.expect(TokenType::Colon, "Expected ':' after case value")?;

            let mut body = Vec::new();

            while !self.check_any(&[TokenType::Case, TokenType::Default, TokenType::BracketRight]) && !self.is_eof() {
                body.push(self.parse_statement()?);
            }

            cases.push(SwitchCase { test, body, pos: *clause.start() });
        }

        self.expect(TokenType::BracketRight, "Expected '}' after switch cases")?;

        Ok(Node::new(NodeKind::SwitchExpression { value: Box::new(value), cases }, *keyword.start()))
    }

    fn parse_break_expression(&mut self) -> Node {
        let keyword = self.consume();
        self.matches(TokenType::Semicolon);

        Node::new(NodeKind::BreakExpression, *keyword.start())
    }

    fn parse_continue_expression(&mut self) -> Node {
        let keyword = self.consume();
        self.matches(TokenType::Semicolon);

        Node::new(NodeKind::ContinueExpression, *keyword.start())
    }

    fn parse_expression_statement(&mut self) -> LangResult<Node> {
        let expr = self.parse_expression()?;
        self.matches(TokenType::Semicolon);

        Ok(expr)
    }

    fn parse_block(&mut self, context: &str) -> LangResult<Vec<Node>> {
        self.expect(TokenType::BracketLeft, &format!("Expected '{{' before {}", context))?;

        let mut statements = Vec::new();

        while !self.check(TokenType::BracketRight) && !self.is_eof() {
            statements.push(self.parse_statement()?);
        }

        self.expect(TokenType::BracketRight, &format!("Expected '}}' after {}", context))?;
        Ok(statements)
    }

    // Expression parsing

    fn parse_expression(&mut self) -> LangResult<Node> {
        util::ensure_sufficient_stack(|| self.parse_condition())
    }

    fn parse_condition(&mut self) -> LangResult<Node> {
        let left = self.parse_assignment()?;

        let operator = match self.current().token_type() {
            TokenType::Equal => ConditionOperator::Equal,
            TokenType::NotEqual => ConditionOperator::NotEqual,
            TokenType::Greater => ConditionOperator::Greater,
            TokenType::GreaterEqual => ConditionOperator::GreaterEqual,
            TokenType::Less => ConditionOperator::Less,
            TokenType::LessEqual => ConditionOperator::LessEqual,
            TokenType::And => ConditionOperator::And,
            TokenType::Or => ConditionOperator::Or,
            TokenType::Not => ConditionOperator::Not,
            _ => return Ok(left),
        };

        let token = self.consume();
        let right = self.parse_assignment()?;

        Ok(Node::new(NodeKind::ConditionExpression {
            left: Box::new(left), operator, right: Box::new(right),
        }, *token.start()))
    }

    fn parse_assignment(&mut self) -> LangResult<Node> {
        let left = self.parse_object()?;

        if !self.check(TokenType::Assign) {
            return Ok(left);
        }

        let token = self.consume();

        if !matches!(left.kind, NodeKind::Identifier(_)) {
            return Err(Error::at(ErrorKind::InvalidAssignmentTarget, left.pos).with_trace(*token.start()));
        }

        let value = self.parse_assignment()?;

        Ok(Node::new(NodeKind::AssignmentExpression {
            assignee: Box::new(left), value: Box::new(value),
        }, *token.start()))
    }

    fn parse_object(&mut self) -> LangResult<Node> {
        if !self.check(TokenType::BracketLeft) {
            return self.parse_additive();
        }

        let brace = self.consume();
        let mut properties = Vec::new();

        while !self.check(TokenType::BracketRight) && !self.is_eof() {
            let key = self.expect(TokenType::Identifier, "Expected property name in object literal")?;

            // Shorthand `{ key }` / `{ key, ... }`
            if self.matches(TokenType::Comma) || self.check(TokenType::BracketRight) {
                properties.push(Property { key: key.source().to_owned(), value: None, pos: *key.start() });
                continue;
            }

            self.expect(TokenType::Colon, "Expected ':' after property name")?;
            let value = self.parse_expression()?;
            properties.push(Property { key: key.source().to_owned(), value: Some(value), pos: *key.start() });

            if !self.check(TokenType::BracketRight) {
                self.expect(TokenType::Comma, "Expected ',' or '}' after property")?;
            }
        }

        self.expect(TokenType::BracketRight, "Expected '}' after object literal")?;
        Ok(Node::new(NodeKind::ObjectLiteral(properties), *brace.start()))
    }

    fn parse_additive(&mut self) -> LangResult<Node> {
        let mut expr = self.parse_multiplicative()?;

        loop {
            let operator = match self.current().token_type() {
                TokenType::Plus => BinaryOperator::Add,
                TokenType::Minus => BinaryOperator::Subtract,
                _ => break,
            };

            let token = self.consume();
            let right = self.parse_multiplicative()?;

            expr = Node::new(NodeKind::BinaryExpression { left: Box::new(expr), operator, right: Box::new(right) }, *token.start());
        }

        Ok(expr)
    }

    fn parse_multiplicative(&mut self) -> LangResult<Node> {
        let mut expr = self.parse_call_member()?;

        loop {
            let operator = match self.current().token_type() {
                TokenType::Multiply => BinaryOperator::Multiply,
                TokenType::Divide => BinaryOperator::Divide,
                TokenType::Modulo => BinaryOperator::Modulo,
                _ => break,
            };

            let token = self.consume();
            let right = self.parse_call_member()?;

            expr = Node::new(NodeKind::BinaryExpression { left: Box::new(expr), operator, right: Box::new(right) }, *token.start());
        }

        Ok(expr)
    }

    fn parse_call_member(&mut self) -> LangResult<Node> {
        let mut expr = self.parse_primary()?;

        loop {
            if self.check(TokenType::Dot) {
                let dot = self.consume();
                let name = self.expect(TokenType::Identifier, "Expected property name after '.'")?;
                let property = Node::new(NodeKind::Identifier(name.source().to_owned()), *name.start());

                expr = Node::new(NodeKind::MemberExpression {
                    object: Box::new(expr), property: Box::new(property), computed: false,
                }, *dot.start());
            } else if self.check(TokenType::SquareBracketLeft) {
                let bracket = self.consume();
                let property = self.parse_expression()?;
                self.expect(TokenType::SquareBracketRight, "Expected ']' after computed property")?;

                expr = Node::new(NodeKind::MemberExpression {
                    object: Box::new(expr), property: Box::new(property), computed: true,
                }, *bracket.start());
            } else if self.check(TokenType::ParenthesisLeft) {
                expr = self.finish_call(expr)?;
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn finish_call(&mut self, callee: Node) -> LangResult<Node> {
        let paren_left = self.consume();
        let mut args = Vec::new();

        if !self.check(TokenType::ParenthesisRight) {
            args.push(self.parse_assignment()?);

            while self.matches(TokenType::Comma) {
                args.push(self.parse_assignment()?);
            }
        }

        self.expect(TokenType::ParenthesisRight, "Expected ')' after call arguments")?;
        Ok(Node::new(NodeKind::CallExpression { callee: Box::new(callee), args }, *paren_left.start()))
    }

    fn parse_primary(&mut self) -> LangResult<Node> {
        let token = self.consume();
        let pos = *token.start();

        match token.token_type() {
            TokenType::Identifier => Ok(Node::new(NodeKind::Identifier(token.source().to_owned()), pos)),
            TokenType::Number => Ok(Node::new(NodeKind::NumericLiteral(Self::parse_number(&token)?), pos)),
            TokenType::String => Ok(Node::new(NodeKind::StringLiteral(token.source().to_owned()), pos)),
            TokenType::ParenthesisLeft => {
                let expr = self.parse_expression()?;
                self.expect(TokenType::ParenthesisRight, "Expected ')' after expression")?;

                Ok(expr)
            },
            _ => Err(Error::at(ErrorKind::UnexpectedToken {
                expected: String::from("Expected expression"),
                found: token.to_string(),
            }, pos)),
        }
    }

    fn parse_number(token: &Token) -> LangResult<f64> {
        match token.source().parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(value),
            _ => Err(Error::at(ErrorKind::InvalidNumber(token.source().to_owned()), *token.start())),
        }
    }

    // Token stream

    fn current(&self) -> &Token {
        // The stream always ends with Eof, which is never consumed
        &self.tokens[self.index.min(self.tokens.len() - 1)]
    }

    fn consume(&mut self) -> Token {
        let token = self.current().clone();

        if token.token_type() != TokenType::Eof {
            self.index += 1;
        }

        token
    }

    fn expect(&mut self, token_type: TokenType, message: &str) -> LangResult<Token> {
        let token = self.consume();

        if token.token_type() == token_type {
            Ok(token)
        } else {
            Err(Error::at(ErrorKind::UnexpectedToken {
                expected: message.to_owned(),
                found: token.to_string(),
            }, *token.start()))
        }
    }

    fn matches(&mut self, token_type: TokenType) -> bool { // Should be called "match", but that's a keyword
        if !self.check(token_type) {
            return false;
        }

        self.consume();
        true
    }

    #[inline]
    fn check(&self, token_type: TokenType) -> bool {
        self.current().token_type() == token_type
    }

    fn check_any(&self, token_types: &[TokenType]) -> bool {
        token_types.iter().any(|token_type| self.check(*token_type))
    }

    fn is_eof(&self) -> bool {
        self.current().token_type() == TokenType::Eof
    }
}
