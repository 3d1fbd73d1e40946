//! Reduction trace formatting.
//!
//! Each reduction prints as `lhs->rhs1 rhs2 …`, or `lhs->epsilon` for
//! an empty right-hand side. Symbol names appear exactly as declared in
//! the grammar: word-like terminals bare, punctuators quoted.

use std::io;

use crate::driver::Reduction;
use crate::grammar::Grammar;

/// Renders one reduction record.
pub fn format_reduction(grammar: &Grammar, reduction: Reduction) -> String {
    let production = grammar.production(reduction.prod);
    let lhs = grammar.name(production.lhs);
    if production.rhs.is_empty() {
        return format!("{lhs}->epsilon");
    }
    let rhs = production
        .rhs
        .iter()
        .map(|&sym| grammar.name(sym))
        .collect::<Vec<_>>()
        .join(" ");
    format!("{lhs}->{rhs}")
}

/// Writes the whole trace, one reduction per line.
pub fn write_trace<W: io::Write>(
    grammar: &Grammar,
    reductions: &[Reduction],
    out: &mut W,
) -> io::Result<()> {
    for &reduction in reductions {
        writeln!(out, "{}", format_reduction(grammar, reduction))?;
    }
    Ok(())
}
