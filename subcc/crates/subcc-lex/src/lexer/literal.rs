//! Character and string literal lexing.
//!
//! Lexemes keep the original source text, quotes and escapes included;
//! no unescaping happens here because the parser never interprets
//! literal values.

use crate::error::LexError;
use crate::token::{Token, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes a character literal: one character or one backslash escape
    /// between single quotes.
    pub(super) fn lex_char(&mut self) -> Result<Token, LexError> {
        let start = self.token_loc;
        self.cursor.advance(); // opening quote

        match self.cursor.current_char() {
            '\0' if self.cursor.is_at_end() => return Err(LexError::UnterminatedChar(start)),
            '\n' => return Err(LexError::NewlineInChar(start)),
            '\\' => {
                self.cursor.advance();
                if self.cursor.is_at_end() {
                    return Err(LexError::UnterminatedCharEscape(start));
                }
                self.cursor.advance();
            }
            _ => self.cursor.advance(),
        }

        if !self.cursor.match_char('\'') {
            return Err(LexError::InvalidChar(start));
        }
        Ok(self.finish(TokenKind::CharConst))
    }

    /// Lexes a string literal with backslash escapes.
    pub(super) fn lex_string(&mut self) -> Result<Token, LexError> {
        let start = self.token_loc;
        self.cursor.advance(); // opening quote

        loop {
            match self.cursor.current_char() {
                '\0' if self.cursor.is_at_end() => {
                    return Err(LexError::UnterminatedString(start))
                }
                '\n' => return Err(LexError::NewlineInString(start)),
                '\\' => {
                    self.cursor.advance();
                    if self.cursor.is_at_end() {
                        return Err(LexError::UnterminatedStringEscape(start));
                    }
                    self.cursor.advance();
                }
                '"' => {
                    self.cursor.advance();
                    return Ok(self.finish(TokenKind::StringLit));
                }
                _ => self.cursor.advance(),
            }
        }
    }
}
