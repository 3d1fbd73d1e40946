//! Error types for grammar construction, table generation, and parsing.

use subcc_util::Loc;
use thiserror::Error;

/// A defect in the grammar definition itself.
///
/// These can only arise while assembling or validating a grammar; the
/// fixed subC grammar never produces one.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GrammarError {
    /// A right-hand side mentions a symbol that is neither a declared
    /// terminal nor the left-hand side of any production.
    #[error("grammar error: undeclared symbol '{symbol}' in a production for '{lhs}'")]
    UndeclaredSymbol {
        /// Left-hand side of the offending production.
        lhs: String,
        /// The unknown symbol.
        symbol: String,
    },

    /// A precedence entry names a symbol that is not a declared terminal.
    #[error("grammar error: precedence declared for unknown terminal '{0}'")]
    UnknownPrecTerminal(String),

    /// A nonterminal no derivation from the start symbol can reach.
    #[error("grammar error: nonterminal '{0}' is unreachable from the start symbol")]
    Unreachable(String),

    /// A nonterminal that derives no terminal string.
    #[error("grammar error: nonterminal '{0}' derives no terminal string")]
    Unproductive(String),
}

/// A conflict that survived precedence resolution during table
/// construction. Fatal: the tables cannot be materialized.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TableError {
    /// A shift/reduce conflict where neither the terminal nor the
    /// production has a precedence, and the terminal is not `ELSE`.
    #[error("table error: unresolved shift/reduce conflict in state {state} on terminal {terminal}")]
    UnresolvedShiftReduce {
        /// Automaton state index.
        state: u32,
        /// Terminal name.
        terminal: String,
    },

    /// Two distinct reductions proposed for the same lookahead.
    #[error("table error: reduce/reduce conflict in state {state} on lookahead {lookahead}")]
    ReduceReduce {
        /// Automaton state index.
        state: u32,
        /// Lookahead terminal name.
        lookahead: String,
    },
}

/// A failure while driving the tables over a token stream.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The ACTION entry for the current state and lookahead is absent.
    #[error("SyntaxError: expected {expected} before '{lexeme}' at {loc}")]
    Syntax {
        /// Comma-joined, sorted names of the terminals the state accepts,
        /// or `end of input` if it accepts none.
        expected: String,
        /// Lexeme of the offending token.
        lexeme: String,
        /// Location of the offending token.
        loc: Loc,
    },

    /// GOTO was consulted for a pair it does not define. Indicates a
    /// table-construction bug, not bad input.
    #[error("internal parser error: missing goto for symbol {symbol}")]
    MissingGoto {
        /// The nonterminal that had no GOTO entry.
        symbol: String,
    },

    /// The token stream ran out without the `$` sentinel.
    #[error("internal parser error: token stream ended without the '$' sentinel")]
    MissingSentinel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_syntax_error_format() {
        let err = ParseError::Syntax {
            expected: "';', RELOP".to_string(),
            lexeme: "}".to_string(),
            loc: Loc::new(1, 21),
        };
        assert_eq!(
            err.to_string(),
            "SyntaxError: expected ';', RELOP before '}' at line 1, column 21"
        );
    }

    #[test]
    fn test_missing_goto_format() {
        let err = ParseError::MissingGoto {
            symbol: "stmt".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "internal parser error: missing goto for symbol stmt"
        );
    }
}
