//
// Copyright 2020 GTO Developers
//
// Licensed under the Apache License, Version 2.0, <LICENSE-APACHE or
// http://apache.org/licenses/LICENSE-2.0> or the MIT license <LICENSE-MIT or
// http://opensource.org/licenses/MIT>, at your option. This file may not be
// copied, modified, or distributed except according to those terms.
//

//! GTOa tokenizer.
//!
//! Skips `#`-to-end-of-line and `/* ... */` comments (discarded, not
//! retained) and whitespace, and tracks 1-based line/column for every
//! token so the parser can anchor diagnostics precisely.

use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::{Error, Location, Result};

#[derive(Clone, PartialEq, Debug)]
pub enum Token {
    /// An unquoted identifier, e.g. `cube`, `-inf`, `nan`.
    Ident(String),
    /// The unescaped contents of a double-quoted string literal.
    QuotedString(String),
    /// The raw lexeme of a numeric literal, e.g. `"-3"`, `"1.5"`, `"1e-10"`.
    Number(String),
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Colon,
    Equals,
}

#[derive(Clone, PartialEq, Debug)]
pub struct PosToken {
    pub token: Token,
    pub line: usize,
    pub column: usize,
}

struct Lexer<'a> {
    input: &'a str,
    chars: Peekable<CharIndices<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        Lexer {
            input,
            chars: input.char_indices().peekable(),
            line: 1,
            column: 1,
        }
    }

    fn location(&self) -> Location {
        Location::LineCol(self.line, self.column)
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn advance(&mut self) -> Option<char> {
        let (_, c) = self.chars.next()?;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn skip_whitespace_and_comments(&mut self) -> Result<()> {
        loop {
            match self.peek_char() {
                Some(c) if c.is_whitespace() => {
                    self.advance();
                }
                Some('#') => {
                    while let Some(c) = self.peek_char() {
                        if c == '\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                Some('/') => {
                    let mut lookahead = self.chars.clone();
                    lookahead.next();
                    if let Some(&(_, '*')) = lookahead.peek() {
                        let start = self.location();
                        self.advance();
                        self.advance();
                        let mut closed = false;
                        while let Some(c) = self.advance() {
                            if c == '*' && self.peek_char() == Some('/') {
                                self.advance();
                                closed = true;
                                break;
                            }
                        }
                        if !closed {
                            return Err(Error::SyntaxError { location: start });
                        }
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
        Ok(())
    }

    fn lex_quoted_string(&mut self) -> Result<String> {
        let start = self.location();
        self.advance(); // consume opening quote
        let mut out = String::new();
        loop {
            match self.advance() {
                None => return Err(Error::UnterminatedString { location: start }),
                Some('"') => break,
                Some('\\') => match self.advance() {
                    Some('\\') => out.push('\\'),
                    Some('"') => out.push('"'),
                    Some('n') => out.push('\n'),
                    Some('r') => out.push('\r'),
                    Some('t') => out.push('\t'),
                    Some(other) => out.push(other),
                    None => return Err(Error::UnterminatedString { location: start }),
                },
                Some(c) => out.push(c),
            }
        }
        Ok(out)
    }

    fn lex_number(&mut self) -> String {
        let mut out = String::new();
        if self.peek_char() == Some('-') {
            out.push(self.advance().unwrap());
        }
        while let Some(c) = self.peek_char() {
            if c.is_ascii_digit() {
                out.push(self.advance().unwrap());
            } else {
                break;
            }
        }
        if self.peek_char() == Some('.') {
            out.push(self.advance().unwrap());
            while let Some(c) = self.peek_char() {
                if c.is_ascii_digit() {
                    out.push(self.advance().unwrap());
                } else {
                    break;
                }
            }
        }
        if let Some(e) = self.peek_char() {
            if e == 'e' || e == 'E' {
                let mut lookahead = self.chars.clone();
                lookahead.next();
                let sign_or_digit = matches!(lookahead.peek(), Some(&(_, c)) if c.is_ascii_digit() || c == '+' || c == '-');
                if sign_or_digit {
                    out.push(self.advance().unwrap());
                    if let Some(s) = self.peek_char() {
                        if s == '+' || s == '-' {
                            out.push(self.advance().unwrap());
                        }
                    }
                    while let Some(c) = self.peek_char() {
                        if c.is_ascii_digit() {
                            out.push(self.advance().unwrap());
                        } else {
                            break;
                        }
                    }
                }
            }
        }
        out
    }

    fn lex_ident(&mut self) -> String {
        let mut out = String::new();
        if self.peek_char() == Some('-') {
            out.push(self.advance().unwrap());
        }
        while let Some(c) = self.peek_char() {
            if c.is_alphanumeric() || c == '_' || c == '-' || c == '.' {
                out.push(self.advance().unwrap());
            } else {
                break;
            }
        }
        out
    }

    fn next_token(&mut self) -> Result<Option<PosToken>> {
        self.skip_whitespace_and_comments()?;
        let (line, column) = (self.line, self.column);
        let c = match self.peek_char() {
            None => return Ok(None),
            Some(c) => c,
        };

        let token = match c {
            '(' => {
                self.advance();
                Token::LParen
            }
            ')' => {
                self.advance();
                Token::RParen
            }
            '{' => {
                self.advance();
                Token::LBrace
            }
            '}' => {
                self.advance();
                Token::RBrace
            }
            '[' => {
                self.advance();
                Token::LBracket
            }
            ']' => {
                self.advance();
                Token::RBracket
            }
            ':' => {
                self.advance();
                Token::Colon
            }
            '=' => {
                self.advance();
                Token::Equals
            }
            '"' => Token::QuotedString(self.lex_quoted_string()?),
            '-' => {
                let mut lookahead = self.chars.clone();
                lookahead.next();
                match lookahead.peek() {
                    Some(&(_, d)) if d.is_ascii_digit() => Token::Number(self.lex_number()),
                    Some(&(_, a)) if a.is_alphabetic() => Token::Ident(self.lex_ident()),
                    _ => return Err(Error::SyntaxError { location: self.location() }),
                }
            }
            d if d.is_ascii_digit() => Token::Number(self.lex_number()),
            a if a.is_alphabetic() || a == '_' => Token::Ident(self.lex_ident()),
            _ => return Err(Error::SyntaxError { location: self.location() }),
        };

        Ok(Some(PosToken { token, line, column }))
    }

    fn tokenize(mut self) -> Result<Vec<PosToken>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        let _ = self.input; // retained for potential future slice-based diagnostics
        Ok(tokens)
    }
}

/// Tokenizes a complete GTOa document.
pub fn tokenize(input: &str) -> Result<Vec<PosToken>> {
    Lexer::new(input).tokenize()
}
