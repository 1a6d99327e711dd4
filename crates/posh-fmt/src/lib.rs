//! Canonical pretty-printer for PowerShell scripts.
//!
//! Given an already-parsed syntax tree (and the token stream it was
//! parsed from), this crate emits normalized source text: four-space
//! indentation, `\n` line endings, canonical operator spellings and
//! string escaping. It is a structural printer: the output is
//! semantically equivalent to the input, produced in a single streaming
//! pass with no line-width awareness and no comment preservation.

use std::path::Path;

use posh_ast::{ParseResult, ScriptBlock, Token};

pub use config::PrintConfig;
pub use error::PrintError;

mod buffer;
mod config;
mod error;
mod spelling;
mod visitor;

/// The seam to the external parser.
///
/// Turning PowerShell source into a tree is the caller's concern;
/// anything that can produce a [`ParseResult`] can drive
/// [`print_source`] and [`print_file`].
pub trait Parse {
    fn parse_input(&self, source: &str) -> ParseResult;
}

/// Parse source text with the given parser, then pretty-print it.
///
/// Fails with [`PrintError::Parse`] when the parser reports any errors;
/// printing is only attempted on clean parses.
pub fn print_source<P: Parse>(
    parser: &P,
    source: &str,
    config: &PrintConfig,
) -> Result<String, PrintError> {
    let result = parser.parse_input(source);

    if !result.errors.is_empty() {
        return Err(PrintError::Parse(result.errors));
    }

    let script = result.script.ok_or(PrintError::NoAst)?;

    print_script(&script, &result.tokens, config)
}

/// Read a file, parse it with the given parser, then pretty-print it.
pub fn print_file<P: Parse>(
    parser: &P,
    path: &Path,
    config: &PrintConfig,
) -> Result<String, PrintError> {
    let source = std::fs::read_to_string(path).map_err(PrintError::Io)?;
    print_source(parser, &source, config)
}

/// Pretty-print an already-parsed script.
///
/// This is the core operation: a validated tree plus its token stream
/// in, formatted text out. The tree is assumed well-formed; a construct
/// the printer has no formatting rule for fails the whole render with
/// [`PrintError::Unsupported`], with no partial output.
pub fn print_script(
    script: &ScriptBlock,
    tokens: &[Token],
    config: &PrintConfig,
) -> Result<String, PrintError> {
    visitor::Printer::new(tokens, config).run(script)
}

#[cfg(test)]
mod tests {
    use super::*;
    use posh_ast::{Constant, Expr, Pipeline, Stmt};

    #[test]
    fn test_print_simple_constant() {
        let script =
            ScriptBlock::from_statements(vec![Stmt::Pipeline(Pipeline::expression(
                Expr::Constant(Constant::Int(42)),
            ))]);
        let out = print_script(&script, &[], &PrintConfig::default()).unwrap();
        assert_eq!(out, "42");
    }

    #[test]
    fn test_print_empty_script_is_empty() {
        let script = ScriptBlock::from_statements(Vec::new());
        let out = print_script(&script, &[], &PrintConfig::default()).unwrap();
        assert_eq!(out, "");
    }
}
