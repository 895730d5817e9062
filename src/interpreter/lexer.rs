use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use std::iter::Peekable;
use std::str::CharIndices;
use lazy_static::lazy_static;
use crate::interpreter::error::{Error, ErrorKind, LangResult};
use crate::util;

#[cfg(test)]
mod tests;

/// Byte offset into the source text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenPos {
    pub offset: usize,
}

impl TokenPos {
    pub fn new(offset: usize) -> TokenPos {
        TokenPos { offset }
    }

    pub fn begin() -> TokenPos {
        TokenPos::new(0)
    }
}

impl Display for TokenPos {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "[offset {}]", self.offset)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TokenType {
    ParenthesisLeft, ParenthesisRight,
    BracketLeft, BracketRight,
    SquareBracketLeft, SquareBracketRight,
    Dot, Comma, Semicolon, Colon,

    Assign, Equal,
    Not, NotEqual,
    Greater, GreaterEqual,
    Less, LessEqual,

    Plus, Minus,
    Multiply, Divide, Modulo,

    And, Or,

    Identifier,
    Number,
    String,

    // Keywords
    Let, Const,
    Fn,
    If, Else, ElseIf,
    For,
    Switch, Case, Default,
    Break, Continue,

    // EOF
    Eof,
}

lazy_static! {
    static ref KEYWORDS: HashMap<&'static str, TokenType> = HashMap::from([
        ("let", TokenType::Let),
        ("const", TokenType::Const),
        ("fn", TokenType::Fn),
        ("if", TokenType::If),
        ("else", TokenType::Else),
        ("elseif", TokenType::ElseIf),
        ("for", TokenType::For),
        ("switch", TokenType::Switch),
        ("case", TokenType::Case),
        ("default", TokenType::Default),
        ("break", TokenType::Break),
        ("continue", TokenType::Continue),
    ]);
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    token_type: TokenType,
    source: String,
    start: TokenPos, end: TokenPos,
}

impl Token {
    pub fn new(token_type: TokenType, source: String, start: TokenPos, end: TokenPos) -> Token {
        Token {
            token_type, source,
            start, end
        }
    }

    pub fn token_type(&self) -> TokenType { self.token_type }
    pub fn source(&self) -> &str { &self.source }
    pub fn start(&self) -> &TokenPos { &self.start }
    pub fn end(&self) -> &TokenPos { &self.end }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.token_type {
            TokenType::Eof => f.write_str("end of input"),
            TokenType::String => write!(f, "`\"{}\"`", self.source),
            _ => write!(f, "`{}`", self.source),
        }
    }
}

/// Scans `source` into a token stream terminated by an [`TokenType::Eof`] token.
pub fn tokenize(source: &str) -> LangResult<Vec<Token>> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();

    loop {
        let token = lexer.scan_token()?;
        let eof = token.token_type() == TokenType::Eof;
        tokens.push(token);

        if eof {
            return Ok(tokens);
        }
    }
}

pub struct Lexer<'source> {
    input: &'source str,
    chars: Peekable<CharIndices<'source>>,

    start_index: usize,
    current_index: usize,
}

impl<'source> Lexer<'source> {
    pub fn new(source: &'source str) -> Lexer<'source> {
        Lexer {
            input: source,
            chars: source.char_indices().peekable(),

            start_index: 0,
            current_index: 0,
        }
    }

    pub fn scan_token(&mut self) -> LangResult<Token> {
        loop {
            self.skip_whitespace();
            self.start_index = self.current_index;

            let c = match self.consume() {
                Some(c) => c,
                None => return Ok(self.make_token(TokenType::Eof)),
            };

            return match c {
                '(' => Ok(self.make_token(TokenType::ParenthesisLeft)),
                ')' => Ok(self.make_token(TokenType::ParenthesisRight)),
                '{' => Ok(self.make_token(TokenType::BracketLeft)),
                '}' => Ok(self.make_token(TokenType::BracketRight)),
                '[' => Ok(self.make_token(TokenType::SquareBracketLeft)),
                ']' => Ok(self.make_token(TokenType::SquareBracketRight)),
                '.' => Ok(self.make_token(TokenType::Dot)),
                ',' => Ok(self.make_token(TokenType::Comma)),
                ';' => Ok(self.make_token(TokenType::Semicolon)),
                ':' => Ok(self.make_token(TokenType::Colon)),

                '+' => Ok(self.make_token(TokenType::Plus)),
                '-' => Ok(self.make_token(TokenType::Minus)),
                '*' => Ok(self.make_token(TokenType::Multiply)),
                '%' => Ok(self.make_token(TokenType::Modulo)),
                '/' => if self.expect('/') {
                    // `//` always starts a comment, never a division followed by something else
                    self.skip_line();
                    continue;
                } else {
                    Ok(self.make_token(TokenType::Divide))
                },

                '=' => Ok(if self.expect('=') { self.make_token(TokenType::Equal) } else {
                    self.make_token(TokenType::Assign)
                }),
                '!' => Ok(if self.expect('=') { self.make_token(TokenType::NotEqual) } else {
                    self.make_token(TokenType::Not)
                }),
                '>' => Ok(if self.expect('=') { self.make_token(TokenType::GreaterEqual) } else {
                    self.make_token(TokenType::Greater)
                }),
                '<' => Ok(if self.expect('=') { self.make_token(TokenType::LessEqual) } else {
                    self.make_token(TokenType::Less)
                }),
                '&' => if self.expect('&') { Ok(self.make_token(TokenType::And)) } else {
                    Err(Error::at(ErrorKind::IncompleteOperator('&'), self.start_pos()))
                },
                '|' => if self.expect('|') { Ok(self.make_token(TokenType::Or)) } else {
                    Err(Error::at(ErrorKind::IncompleteOperator('|'), self.start_pos()))
                },

                '"' => self.scan_string(),
                c if util::is_numeric(c) => self.scan_number(),
                c if util::is_alphabetic(c) => self.scan_identifier(),

                _ => Err(Error::at(ErrorKind::UnexpectedCharacter(c), self.start_pos())),
            };
        }
    }

    fn scan_string(&mut self) -> LangResult<Token> {
        let mut value = String::new();

        loop {
            match self.consume() {
                Some('"') => {
                    // A doubled quote is an escaped literal quote
                    if self.expect('"') {
                        value.push('"');
                    } else {
                        break;
                    }
                },
                Some(c) => value.push(c),
                None => return Err(Error::at(ErrorKind::UnterminatedString, self.start_pos())),
            }
        }

        Ok(Token {
            token_type: TokenType::String,
            source: value,
            start: self.start_pos(), end: TokenPos::new(self.current_index),
        })
    }

    fn scan_number(&mut self) -> LangResult<Token> {
        while let Some(c) = self.peek() {
            if !util::is_numeric(c) {
                break;
            }

            self.consume();
        }

        Ok(self.make_token(TokenType::Number))
    }

    fn scan_identifier(&mut self) -> LangResult<Token> {
        while let Some(c) = self.peek() {
            if !util::is_alphabetic(c) {
                break;
            }

            self.consume();
        }

        let name = &self.input[self.start_index..self.current_index];
        let token_type = KEYWORDS.get(name).copied().unwrap_or(TokenType::Identifier);

        Ok(self.make_token(token_type))
    }

    fn make_token(&self, token_type: TokenType) -> Token {
        Token {
            token_type,
            source: self.input[self.start_index..self.current_index].to_owned(),

            start: self.start_pos(), end: TokenPos::new(self.current_index),
        }
    }

    fn start_pos(&self) -> TokenPos {
        TokenPos::new(self.start_index)
    }

    fn consume(&mut self) -> Option<char> {
        self.chars.next().map(|(index, c)| {
            self.current_index = index + c.len_utf8();
            c
        })
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|(_, c)| *c)
    }

    fn expect(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.consume();
            true
        } else {
            false
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_whitespace() {
                return;
            }

            self.consume();
        }
    }

    fn skip_line(&mut self) {
        while let Some(c) = self.consume() {
            if c == '\n' {
                return;
            }
        }
    }
}
