//! The interactive shell.
//!
//! Owns all user-facing text and session state (the stats toggle). Raw
//! input is classified into commands here; the engine only ever receives
//! already-classified search requests with explicit scope and limit
//! parameters.

use std::io::{BufRead, Write};

use crate::error::{JavelinError, Result};
use crate::schema::Schema;
use crate::search::engine::SearchEngine;

/// Usage text printed by `.help`.
pub const CLI_USAGE: &str = "\
product search shell
-----------------------------------------
basic usage:
[search query]
~~~~~~~~~~~~~~~~
query operators:
- search only within one field
.[field] [query]
~~~~~~~~~~~~~~~~
- limit number of results, default 3
[query] .limit [max number of items to display]
~~~~~~~~~~~~~~~~
- toggle result statistics, default on
.show_stats
~~~~~~~~~~~~~~~~
- quit
.exit
~~~~~~~~~~~~~~~~
- print this message
.help
-----------------------------------------
examples:
.title jeans .limit 10
furniture
lewis .limit 1
.merchant lewis
-----------------------------------------";

/// A classified line of user input.
#[derive(Debug, PartialEq, Eq)]
pub enum Command<'a> {
    /// Quit the shell.
    Exit,
    /// Print usage.
    Help,
    /// Toggle the statistics display.
    ToggleStats,
    /// Run a search, optionally scoped to one field.
    Search {
        /// Query text (may still carry a `.limit` directive).
        query: &'a str,
        /// Field scope from a leading `.field` prefix.
        field_scope: Option<&'a str>,
    },
}

/// Classify one line of input.
///
/// A leading `.word` prefix becomes a field scope only when `word` is a
/// schema field; otherwise the whole line is treated as query text, so a
/// typo like `.titel jeans` searches instead of erroring.
pub fn classify<'a>(input: &'a str, schema: &Schema) -> Command<'a> {
    let trimmed = input.trim();

    match trimmed {
        ".exit" => return Command::Exit,
        ".help" => return Command::Help,
        ".show_stats" => return Command::ToggleStats,
        _ => {}
    }

    if let Some(without_dot) = trimmed.strip_prefix('.') {
        let (head, rest) = match without_dot.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest),
            None => (without_dot, ""),
        };
        if schema.has_field(head) {
            return Command::Search {
                query: rest.trim(),
                field_scope: Some(head),
            };
        }
    }

    Command::Search {
        query: trimmed,
        field_scope: None,
    }
}

/// The interactive loop over an engine.
pub struct Repl<'a> {
    engine: &'a SearchEngine,
    show_stats: bool,
}

impl<'a> Repl<'a> {
    /// Create a shell over the given engine. Statistics start enabled.
    pub fn new(engine: &'a SearchEngine) -> Self {
        Repl {
            engine,
            show_stats: true,
        }
    }

    /// Run the loop until `.exit` or end of input.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> Result<()> {
        write!(output, ">>")?;
        output.flush()?;

        for line in input.lines() {
            let line = line?;
            match classify(&line, self.engine.index().schema()) {
                Command::Exit => {
                    writeln!(output, "Bye")?;
                    return Ok(());
                }
                Command::Help => writeln!(output, "{CLI_USAGE}")?,
                Command::ToggleStats => {
                    self.show_stats = !self.show_stats;
                    writeln!(
                        output,
                        "show_stats: {}",
                        if self.show_stats { "ON" } else { "OFF" }
                    )?;
                }
                Command::Search { query, field_scope } => {
                    self.handle_search(&mut output, query, field_scope)?;
                }
            }
            write!(output, ">>")?;
            output.flush()?;
        }

        Ok(())
    }

    /// Run one search request and render it. Input errors are printed and
    /// swallowed so the user can correct the query; everything else
    /// propagates.
    fn handle_search<W: Write>(
        &self,
        output: &mut W,
        query: &str,
        field_scope: Option<&str>,
    ) -> Result<()> {
        let results = match self.engine.search_request(query, field_scope, None) {
            Ok(results) => results,
            Err(
                e @ (JavelinError::EmptyQuery
                | JavelinError::Parse { .. }
                | JavelinError::InvalidLimit(_)),
            ) => {
                writeln!(output, "{e}")?;
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        for hit in &results.hits {
            match self.engine.doc(hit.doc_id)? {
                Some(fields) => {
                    let rendered = serde_json::to_string_pretty(&fields)?;
                    writeln!(output, "{rendered}")?;
                }
                None => log::warn!("hit {} has no stored fields", hit.doc_id),
            }
        }

        if self.show_stats {
            writeln!(
                output,
                "{{'runtime': {:?}, 'results': {}}}",
                results.elapsed, results.estimated_length
            )?;
        }

        Ok(())
    }
}
