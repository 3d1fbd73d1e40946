//! subcc-lex - Lexical analyzer for subC.
//!
//! Transforms a UTF-8 source buffer into a finite token stream. Each
//! token carries its terminal kind, the original lexeme, and a 1-based
//! line/column location; the stream is terminated by exactly one `$`
//! sentinel token.
//!
//! The lexer is strictly left-to-right with no look-behind. Whitespace
//! and comments (line comments, and block comments which nest) are
//! skipped between tokens. Errors are fatal: an unterminated comment or
//! literal, a stray `*/`, or a character outside the alphabet aborts
//! lexing with a positioned [`LexError`].

pub mod cursor;
mod error;
mod lexer;
mod token;

pub use error::LexError;
pub use lexer::Lexer;
pub use token::{Token, TokenKind};

/// Tokenizes `source`, appending the `$` end-of-input sentinel.
///
/// # Example
///
/// ```
/// use subcc_lex::{tokenize, TokenKind};
///
/// let tokens = tokenize("int x;").unwrap();
/// let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
/// assert_eq!(
///     kinds,
///     [TokenKind::Type, TokenKind::Id, TokenKind::Semicolon, TokenKind::Eof]
/// );
/// ```
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sentinel_is_last_and_unique() {
        let tokens = tokenize("int main(void){}").unwrap();
        let eofs: Vec<_> = tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Eof)
            .collect();
        assert_eq!(eofs.len(), 1);
        assert_eq!(tokens.last().unwrap().kind, TokenKind::Eof);
        assert_eq!(tokens.last().unwrap().lexeme, "$");
    }

    #[test]
    fn test_locations_non_decreasing() {
        let tokens = tokenize("int a;\nint b;\n\nint c;").unwrap();
        for pair in tokens.windows(2) {
            assert!(pair[0].loc <= pair[1].loc, "{:?} > {:?}", pair[0], pair[1]);
        }
    }

    proptest! {
        #[test]
        fn prop_identifiers_lex_to_single_id(
            name in "[a-zA-Z_][a-zA-Z0-9_]{0,30}"
        ) {
            prop_assume!(super::token::keyword(&name).is_none());
            let tokens = tokenize(&name).unwrap();
            prop_assert_eq!(tokens.len(), 2);
            prop_assert_eq!(tokens[0].kind, TokenKind::Id);
            prop_assert_eq!(&tokens[0].lexeme, &name);
        }

        #[test]
        fn prop_lexer_never_panics(source in "[ -~\n\t]{0,200}") {
            let _ = tokenize(&source);
        }

        #[test]
        fn prop_integer_literals(n in 0u64..1_000_000) {
            let text = n.to_string();
            let tokens = tokenize(&text).unwrap();
            prop_assert_eq!(tokens[0].kind, TokenKind::IntegerConst);
            prop_assert_eq!(&tokens[0].lexeme, &text);
        }
    }
}
