//! subcc-drv - Driver for the subC front-end.
//!
//! Wires the pipeline together: read the source file, lex it, drive the
//! LALR(1) tables over the token stream, and print the reduction trace.
//! The grammar and tables are built once per [`Session`] and reused for
//! every parse the session runs.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::debug;

use subcc_lex::tokenize;
use subcc_par::{write_trace, Grammar, ParseTables, Parser};

/// Driver configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// The source file to parse.
    pub input: PathBuf,
}

/// One driver invocation: the grammar and tables plus the configuration.
pub struct Session {
    config: Config,
    grammar: Grammar,
    tables: ParseTables,
}

impl Session {
    /// Builds the grammar and parse tables for this session.
    ///
    /// Table construction cannot fail for the fixed subC grammar; the
    /// error path exists for the construction invariants (conflict
    /// reports), which exit nonzero if they ever trip.
    pub fn new(config: Config) -> Result<Session> {
        let grammar = Grammar::subc();
        let tables = ParseTables::build(&grammar)?;
        debug!(states = tables.state_count(), "parse tables ready");
        Ok(Session {
            config,
            grammar,
            tables,
        })
    }

    /// Runs the pipeline, writing the reduction trace to `out`.
    pub fn run(&self, out: &mut impl Write) -> Result<()> {
        let source = fs::read_to_string(&self.config.input)
            .context("Could not read input file")?;
        debug!(
            path = %self.config.input.display(),
            bytes = source.len(),
            "source loaded"
        );

        let tokens = tokenize(&source)?;
        debug!(tokens = tokens.len(), "lexing complete");

        let parser = Parser::new(&self.grammar, &self.tables);
        let reductions = parser.parse(&tokens)?;
        debug!(reductions = reductions.len(), "parse complete");

        write_trace(&self.grammar, &reductions, out)
            .context("could not write the reduction trace")?;
        Ok(())
    }
}
