//! Whitespace and comment skipping.

use crate::error::LexError;
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Skips whitespace and comments before the next token.
    ///
    /// Whitespace is space, tab, CR, and LF. Line comments run to the
    /// end of the line; block comments nest.
    pub(super) fn skip_whitespace_and_comments(&mut self) -> Result<(), LexError> {
        loop {
            match self.cursor.current_char() {
                ' ' | '\t' | '\r' | '\n' => self.cursor.advance(),
                '/' if self.cursor.peek_char(1) == '/' => self.skip_line_comment(),
                '/' if self.cursor.peek_char(1) == '*' => self.skip_block_comment()?,
                _ => return Ok(()),
            }
        }
    }

    /// Skips a `//` comment up to (not including) the newline.
    fn skip_line_comment(&mut self) {
        self.cursor.advance();
        self.cursor.advance();
        while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
            self.cursor.advance();
        }
    }

    /// Skips a `/* … */` comment, honoring nesting.
    ///
    /// A comment at depth n needs n matching `*/` before it is closed.
    fn skip_block_comment(&mut self) -> Result<(), LexError> {
        self.cursor.advance();
        self.cursor.advance();

        let mut depth = 1u32;
        while depth > 0 {
            if self.cursor.is_at_end() {
                return Err(LexError::UnterminatedComment(self.cursor.loc()));
            }
            if self.cursor.current_char() == '/' && self.cursor.peek_char(1) == '*' {
                self.cursor.advance();
                self.cursor.advance();
                depth += 1;
            } else if self.cursor.current_char() == '*' && self.cursor.peek_char(1) == '/' {
                self.cursor.advance();
                self.cursor.advance();
                depth -= 1;
            } else {
                self.cursor.advance();
            }
        }
        Ok(())
    }
}
