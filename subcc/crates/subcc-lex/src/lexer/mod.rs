//! The scanner.
//!
//! [`Lexer::next_token`] skips insignificant characters, then dispatches
//! on the first character of the next token. Identifier and number
//! scanning live here; comments, quoted literals, and operators are in
//! the sibling modules.

mod comment;
mod literal;
mod operator;

use subcc_util::Loc;

use crate::cursor::Cursor;
use crate::error::LexError;
use crate::token::{keyword, Token, TokenKind};

/// Lexer for subC source text.
pub struct Lexer<'a> {
    /// Character cursor over the source.
    cursor: Cursor<'a>,

    /// Byte offset where the current token starts.
    token_start: usize,

    /// Location where the current token starts.
    token_loc: Loc,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer over `source`.
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            token_start: 0,
            token_loc: Loc::START,
        }
    }

    /// Scans and returns the next token.
    ///
    /// At end of input this returns the `$` sentinel token; calling it
    /// again keeps returning the sentinel.
    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace_and_comments()?;

        self.token_start = self.cursor.position();
        self.token_loc = self.cursor.loc();

        if self.cursor.is_at_end() {
            return Ok(Token::new(TokenKind::Eof, "$", self.token_loc));
        }

        match self.cursor.current_char() {
            '(' => Ok(self.single(TokenKind::LParen)),
            ')' => Ok(self.single(TokenKind::RParen)),
            '[' => Ok(self.single(TokenKind::LBracket)),
            ']' => Ok(self.single(TokenKind::RBracket)),
            '{' => Ok(self.single(TokenKind::LBrace)),
            '}' => Ok(self.single(TokenKind::RBrace)),
            ',' => Ok(self.single(TokenKind::Comma)),
            ';' => Ok(self.single(TokenKind::Semicolon)),
            '.' => Ok(self.single(TokenKind::Dot)),
            '/' => Ok(self.single(TokenKind::Slash)),
            '%' => Ok(self.single(TokenKind::Percent)),
            '+' => Ok(self.lex_plus()),
            '-' => Ok(self.lex_minus()),
            '*' => self.lex_star(),
            '=' => Ok(self.lex_equals()),
            '!' => Ok(self.lex_bang()),
            '<' | '>' => Ok(self.lex_angle()),
            '&' => Ok(self.lex_ampersand()),
            '|' => self.lex_pipe(),
            '\'' => self.lex_char(),
            '"' => self.lex_string(),
            c if c.is_ascii_alphabetic() || c == '_' => Ok(self.lex_identifier()),
            c if c.is_ascii_digit() => Ok(self.lex_number()),
            c => Err(LexError::UnexpectedCharacter {
                ch: c,
                loc: self.token_loc,
            }),
        }
    }

    /// Consumes one character and produces a single-character token.
    fn single(&mut self, kind: TokenKind) -> Token {
        self.cursor.advance();
        self.finish(kind)
    }

    /// Finishes the current token with the accumulated lexeme.
    fn finish(&mut self, kind: TokenKind) -> Token {
        Token::new(kind, self.cursor.slice_from(self.token_start), self.token_loc)
    }

    /// Lexes an identifier or keyword.
    fn lex_identifier(&mut self) -> Token {
        while matches!(self.cursor.current_char(), c if c.is_ascii_alphanumeric() || c == '_') {
            self.cursor.advance();
        }
        let lexeme = self.cursor.slice_from(self.token_start);
        let kind = keyword(lexeme).unwrap_or(TokenKind::Id);
        Token::new(kind, lexeme, self.token_loc)
    }

    /// Lexes an integer or float literal.
    ///
    /// `[0-9]+` is an integer. A `.` directly after the digits makes it
    /// a float, optionally continuing with a fraction and a well-formed
    /// exponent. Floats are not in the grammar; the parser rejects them.
    fn lex_number(&mut self) -> Token {
        self.consume_digits();

        let mut kind = TokenKind::IntegerConst;
        if self.cursor.current_char() == '.' && self.cursor.peek_char(1) != '.' {
            kind = TokenKind::FloatConst;
            self.cursor.advance();
            self.consume_digits();

            if matches!(self.cursor.current_char(), 'e' | 'E') {
                let sign = self.cursor.peek_char(1);
                let digits_at = if sign == '+' || sign == '-' { 2 } else { 1 };
                if self.cursor.peek_char(digits_at).is_ascii_digit() {
                    self.cursor.advance();
                    if sign == '+' || sign == '-' {
                        self.cursor.advance();
                    }
                    self.consume_digits();
                }
            }
        }

        self.finish(kind)
    }

    fn consume_digits(&mut self) {
        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }
    }
}
