//! Operator lexing.
//!
//! Multi-character operators are matched greedily (longest match):
//! `-> ++ -- <= >= == != && ||`.

use crate::error::LexError;
use crate::token::{Token, TokenKind};
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes `+` or `++`.
    pub(super) fn lex_plus(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('+') {
            self.finish(TokenKind::IncOp)
        } else {
            self.finish(TokenKind::Plus)
        }
    }

    /// Lexes `-`, `--`, or `->`.
    pub(super) fn lex_minus(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('-') {
            self.finish(TokenKind::DecOp)
        } else if self.cursor.match_char('>') {
            self.finish(TokenKind::StructOp)
        } else {
            self.finish(TokenKind::Minus)
        }
    }

    /// Lexes `*`, rejecting a stray `*/`.
    ///
    /// A `*/` with no open comment is a lexical error rather than a
    /// `'*'` `'/'` pair.
    pub(super) fn lex_star(&mut self) -> Result<Token, LexError> {
        if self.cursor.peek_char(1) == '/' {
            return Err(LexError::UnmatchedCommentClose(self.token_loc));
        }
        self.cursor.advance();
        Ok(self.finish(TokenKind::Star))
    }

    /// Lexes `=` or `==`.
    pub(super) fn lex_equals(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.finish(TokenKind::EqOp)
        } else {
            self.finish(TokenKind::Assign)
        }
    }

    /// Lexes `!` or `!=`.
    pub(super) fn lex_bang(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('=') {
            self.finish(TokenKind::EqOp)
        } else {
            self.finish(TokenKind::Bang)
        }
    }

    /// Lexes `<`, `<=`, `>`, or `>=`, all of which are `RELOP`.
    pub(super) fn lex_angle(&mut self) -> Token {
        self.cursor.advance();
        self.cursor.match_char('=');
        self.finish(TokenKind::RelOp)
    }

    /// Lexes `&` or `&&`.
    pub(super) fn lex_ampersand(&mut self) -> Token {
        self.cursor.advance();
        if self.cursor.match_char('&') {
            self.finish(TokenKind::AndAnd)
        } else {
            self.finish(TokenKind::Amp)
        }
    }

    /// Lexes `||`; a lone `|` is not in the alphabet.
    pub(super) fn lex_pipe(&mut self) -> Result<Token, LexError> {
        if self.cursor.peek_char(1) == '|' {
            self.cursor.advance();
            self.cursor.advance();
            Ok(self.finish(TokenKind::OrOr))
        } else {
            Err(LexError::UnexpectedCharacter {
                ch: '|',
                loc: self.token_loc,
            })
        }
    }
}
