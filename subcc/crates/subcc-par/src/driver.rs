//! The shift/reduce parse driver.
//!
//! A classical LR driver with a single state stack. The only side
//! effect of a reduce is appending a [`Reduction`] record, so the loop
//! is allocation-free once the stack stops growing. Reduction order is
//! exactly reduce execution order: a leftmost derivation in reverse.

use tracing::debug;

use subcc_lex::Token;

use crate::error::ParseError;
use crate::grammar::{Grammar, ProdId};
use crate::lalr::StateId;
use crate::table::{Action, ParseTables};

/// One emitted reduction: the production the parser reduced by.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reduction {
    /// The production reduced by.
    pub prod: ProdId,
}

/// The table-driven parser.
///
/// Borrows the grammar and tables; both are immutable, so one `Parser`
/// (or several) can serve any number of sequential parses.
pub struct Parser<'g> {
    grammar: &'g Grammar,
    tables: &'g ParseTables,
}

impl<'g> Parser<'g> {
    /// Creates a parser over prebuilt tables.
    pub fn new(grammar: &'g Grammar, tables: &'g ParseTables) -> Self {
        Self { grammar, tables }
    }

    /// Parses a token stream, returning the reductions in execution
    /// order.
    ///
    /// `tokens` must be terminated by the `$` sentinel token. The first
    /// absent ACTION entry aborts the parse with a syntax error; there
    /// is no recovery.
    pub fn parse(&self, tokens: &[Token]) -> Result<Vec<Reduction>, ParseError> {
        let mut stack: Vec<StateId> = vec![StateId(0)];
        let mut reductions: Vec<Reduction> = Vec::new();
        let mut index = 0usize;

        loop {
            // The bottom state is never popped, so the stack is never
            // empty here.
            let state = *stack.last().expect("state stack is never empty");
            let token = tokens.get(index).ok_or(ParseError::MissingSentinel)?;

            // A token kind outside the grammar's alphabet (a float
            // literal, for instance) has no ACTION column and reports
            // like any other syntax error.
            let Some(terminal) = self
                .grammar
                .symbol(token.kind.terminal())
                .filter(|&sym| self.grammar.is_terminal(sym))
            else {
                return Err(self.syntax_error(state, token));
            };

            match self.tables.action(state, terminal) {
                Action::Shift(next) => {
                    stack.push(next);
                    index += 1;
                }
                Action::Reduce(prod) => {
                    let production = self.grammar.production(prod);
                    let remaining = stack
                        .len()
                        .checked_sub(production.rhs.len())
                        .filter(|&n| n > 0)
                        .ok_or_else(|| ParseError::MissingGoto {
                            symbol: self.grammar.name(production.lhs).to_string(),
                        })?;
                    stack.truncate(remaining);
                    let top = *stack.last().expect("state stack is never empty");
                    let next = self
                        .tables
                        .goto(self.grammar, top, production.lhs)
                        .ok_or_else(|| ParseError::MissingGoto {
                            symbol: self.grammar.name(production.lhs).to_string(),
                        })?;
                    stack.push(next);
                    reductions.push(Reduction { prod });
                }
                Action::Accept => {
                    debug!(reductions = reductions.len(), "parse accepted");
                    return Ok(reductions);
                }
                Action::Error => return Err(self.syntax_error(state, token)),
            }
        }
    }

    /// Builds the `SyntaxError` diagnostic for an absent ACTION entry.
    fn syntax_error(&self, state: StateId, token: &Token) -> ParseError {
        let expected = self.tables.expected_terminals(self.grammar, state);
        let expected = if expected.is_empty() {
            "end of input".to_string()
        } else {
            expected.join(", ")
        };
        ParseError::Syntax {
            expected,
            lexeme: token.lexeme.clone(),
            loc: token.loc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;
    use crate::trace::format_reduction;
    use subcc_lex::tokenize;

    fn parse_trace(source: &str) -> Result<Vec<String>, ParseError> {
        let grammar = Grammar::subc();
        let tables = ParseTables::build(&grammar).expect("subC tables build");
        let parser = Parser::new(&grammar, &tables);
        let tokens = tokenize(source).expect("test source lexes");
        let reductions = parser.parse(&tokens)?;
        Ok(reductions
            .iter()
            .map(|r| format_reduction(&grammar, *r))
            .collect())
    }

    /// Replays the trace as the derivation it encodes. The reductions
    /// in execution order are a rightmost derivation in reverse, so
    /// walking them backwards from the start symbol — always expanding
    /// the rightmost nonterminal — must reproduce the input terminal
    /// string exactly.
    fn replay(source: &str) {
        let grammar = Grammar::subc();
        let tables = ParseTables::build(&grammar).unwrap();
        let parser = Parser::new(&grammar, &tables);
        let tokens = tokenize(source).unwrap();
        let reductions = parser.parse(&tokens).unwrap();

        let input: Vec<_> = tokens
            .iter()
            .take(tokens.len() - 1) // drop the sentinel
            .map(|t| grammar.symbol(t.kind.terminal()).unwrap())
            .collect();

        let mut sentential = vec![grammar.start()];
        for reduction in reductions.iter().rev() {
            let production = grammar.production(reduction.prod);
            let at = sentential
                .iter()
                .rposition(|&sym| !grammar.is_terminal(sym))
                .expect("derivation still has a nonterminal to expand");
            assert_eq!(
                sentential[at],
                production.lhs,
                "reduction by {:?} does not match the rightmost nonterminal",
                production
            );
            sentential.splice(at..=at, production.rhs.iter().copied());
        }

        assert_eq!(sentential, input, "derivation did not rebuild the input");
    }

    #[test]
    fn test_empty_program() {
        let trace = parse_trace("").unwrap();
        assert_eq!(trace, vec!["ext_def_list->epsilon", "program->ext_def_list"]);
    }

    #[test]
    fn test_empty_main_trace_suffix() {
        let trace = parse_trace("int main(void){}").unwrap();
        let tail = &trace[trace.len() - 3..];
        assert_eq!(
            tail,
            [
                "ext_def->func_decl compound_stmt",
                "ext_def_list->ext_def_list ext_def",
                "program->ext_def_list",
            ]
        );
    }

    #[test]
    fn test_return_literal() {
        let trace = parse_trace("int f(void){ return 0; }").unwrap();
        for line in [
            "unary->INTEGER_CONST",
            "binary->unary",
            "expr->binary",
            "stmt->RETURN expr ';'",
        ] {
            assert!(trace.contains(&line.to_string()), "missing {line}");
        }
    }

    #[test]
    fn test_assignment() {
        let trace = parse_trace("int f(void){ int a; a = 1; }").unwrap();
        let assignments = trace
            .iter()
            .filter(|l| l.as_str() == "expr->unary '=' expr")
            .count();
        assert_eq!(assignments, 1);
        let def = trace
            .iter()
            .position(|l| l == "def->type_specifier pointers ID ';'")
            .expect("definition reduction present");
        let assign = trace
            .iter()
            .position(|l| l == "expr->unary '=' expr")
            .unwrap();
        assert!(def < assign);
    }

    #[test]
    fn test_multiplication_reduces_before_addition() {
        let trace = parse_trace("int f(void){ int a; a = 1 + 2 * 3; }").unwrap();
        let mul = trace
            .iter()
            .position(|l| l == "binary->binary '*' binary")
            .expect("multiplication reduction");
        let add = trace
            .iter()
            .position(|l| l == "binary->binary '+' binary")
            .expect("addition reduction");
        assert!(mul < add);
    }

    #[test]
    fn test_assignment_is_right_associative() {
        let trace = parse_trace("int f(void){ int a; int b; int c; a = b = c; }").unwrap();
        // Two assignment reductions; the inner (b = c) fires first, so
        // both appear and the statement reduces only after both.
        let positions: Vec<_> = trace
            .iter()
            .enumerate()
            .filter(|(_, l)| l.as_str() == "expr->unary '=' expr")
            .map(|(i, _)| i)
            .collect();
        assert_eq!(positions.len(), 2);
        let stmt = trace.iter().position(|l| l == "stmt->expr ';'").unwrap();
        assert!(positions[1] < stmt);
    }

    #[test]
    fn test_relational_groups_before_equality() {
        let trace = parse_trace("int f(void){ int a; a = 1 < 2 == 3; }").unwrap();
        let rel = trace
            .iter()
            .position(|l| l == "binary->binary RELOP binary")
            .expect("relational reduction");
        let eq = trace
            .iter()
            .position(|l| l == "binary->binary EQUOP binary")
            .expect("equality reduction");
        assert!(rel < eq);
    }

    #[test]
    fn test_dangling_else_binds_to_inner_if() {
        let trace =
            parse_trace("int f(void){ int a; int b; if (a) if (b) a = 1; else a = 2; }").unwrap();
        let inner = trace
            .iter()
            .position(|l| l == "stmt->IF '(' expr ')' stmt ELSE stmt")
            .expect("if-else reduction");
        let outer = trace
            .iter()
            .position(|l| l == "stmt->IF '(' expr ')' stmt")
            .expect("plain if reduction");
        // The if-else reduction is the inner statement, so it fires
        // before the remaining plain if.
        assert!(inner < outer);
    }

    #[test]
    fn test_postfix_chain_reduces_left_to_right() {
        let trace = parse_trace("int g(void){ f()[0].x->y; }").unwrap();
        let call = trace
            .iter()
            .position(|l| l == "unary->unary '(' ')'")
            .expect("call reduction");
        let index = trace
            .iter()
            .position(|l| l == "unary->unary '[' expr ']'")
            .expect("index reduction");
        let member = trace
            .iter()
            .position(|l| l == "unary->unary '.' ID")
            .expect("member reduction");
        let arrow = trace
            .iter()
            .position(|l| l == "unary->unary STRUCTOP ID")
            .expect("arrow reduction");
        assert!(call < index && index < member && member < arrow);
    }

    #[test]
    fn test_prefix_increment_yields_to_postfix() {
        let trace = parse_trace("int f(void){ int a; ++a++; }").unwrap();
        let postfix = trace
            .iter()
            .position(|l| l == "unary->unary INCOP")
            .expect("postfix reduction");
        let prefix = trace
            .iter()
            .position(|l| l == "unary->INCOP unary")
            .expect("prefix reduction");
        assert!(postfix < prefix);
    }

    #[test]
    fn test_syntax_error_reports_expected_set() {
        let err = parse_trace("int f(void){ return }").unwrap_err();
        match err {
            ParseError::Syntax {
                expected,
                lexeme,
                loc,
            } => {
                assert_eq!(lexeme, "}");
                assert_eq!(loc.line, 1);
                assert!(expected.contains("';'"), "expected set was {expected}");
            }
            other => panic!("expected a syntax error, got {other}"),
        }
    }

    #[test]
    fn test_float_is_a_parse_error() {
        let err = parse_trace("int f(void){ int a; a = 1.5; }").unwrap_err();
        match err {
            ParseError::Syntax { lexeme, .. } => assert_eq!(lexeme, "1.5"),
            other => panic!("expected a syntax error, got {other}"),
        }
    }

    #[test]
    fn test_determinism() {
        let source = "int f(void){ int a; for (a = 0; a < 10; a++) { a = a + 1; } }";
        let first = parse_trace(source).unwrap();
        let second = parse_trace(source).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_round_trip_replay() {
        replay("");
        replay("int x;");
        replay("int main(void){}");
        replay("int f(void){ return 0; }");
        replay("int f(void){ int a; a = 1 + 2 * 3; }");
        replay("struct point { int x; int y; }; int f(void){ struct point p; p.x = 1; }");
        replay("int f(int a[3]) { while (a[0]) { a[0] = a[0] - 1; } return a[1]; }");
        replay("int f(void){ int a; if (a) if (a) a = 1; else a = 2; }");
    }

    #[test]
    fn test_structs_pointers_and_loops() {
        // A broader program exercising most of the grammar.
        let source = r#"
            struct node { int value; struct node *next; };

            int *g;

            int length(struct node *head) {
                int n;
                n = 0;
                while (head != NULL) {
                    n++;
                    head = head->next;
                }
                return n;
            }

            int main(void) {
                int i;
                for (i = 0; i < 3; i++) {
                    continue;
                }
                if (!g && *g == 0 || i % 2) {
                    return -i;
                }
                return 0;
            }
        "#;
        let trace = parse_trace(source).unwrap();
        assert!(trace.contains(&"pointers->'*'".to_string()));
        assert!(trace.contains(&"unary->SYM_NULL".to_string()));
        assert!(trace.contains(&"stmt->CONTINUE ';'".to_string()));
        assert!(trace.last().unwrap() == "program->ext_def_list");
        replay(source);
    }
}
