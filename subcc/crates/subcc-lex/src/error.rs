//! Lexer error types.

use subcc_util::Loc;
use thiserror::Error;

/// A fatal lexical error.
///
/// Every variant carries the location of the offending construct and
/// renders as a single diagnostic line naming the condition.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum LexError {
    /// A `/* … */` comment was still open at end of input.
    #[error("LexerError: Unterminated block comment at {0}")]
    UnterminatedComment(Loc),

    /// A `*/` appeared with no open comment.
    #[error("LexerError: Unmatched '*/' outside of a comment at {0}")]
    UnmatchedCommentClose(Loc),

    /// A character literal was still open at end of input.
    #[error("LexerError: Unterminated character literal at {0}")]
    UnterminatedChar(Loc),

    /// A raw newline inside a character literal.
    #[error("LexerError: Newline in character literal at {0}")]
    NewlineInChar(Loc),

    /// A character literal with more than one character, or a missing
    /// closing quote.
    #[error("LexerError: Invalid character literal at {0}")]
    InvalidChar(Loc),

    /// Input ended after a backslash inside a character literal.
    #[error("LexerError: Unterminated escape in character literal at {0}")]
    UnterminatedCharEscape(Loc),

    /// A string literal was still open at end of input.
    #[error("LexerError: Unterminated string literal at {0}")]
    UnterminatedString(Loc),

    /// A raw newline inside a string literal.
    #[error("LexerError: Newline in string literal at {0}")]
    NewlineInString(Loc),

    /// Input ended after a backslash inside a string literal.
    #[error("LexerError: Unterminated escape in string literal at {0}")]
    UnterminatedStringEscape(Loc),

    /// A character outside the subC alphabet.
    #[error("LexerError: Unexpected character '{ch}' at {loc}")]
    UnexpectedCharacter {
        /// The offending character.
        ch: char,
        /// Where it occurred.
        loc: Loc,
    },
}
