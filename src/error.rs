//! Shared error utilities used across the translation pipeline.
//!
//! Diagnostics are kept lightweight on purpose – these routines format
//! messages in a caret style, quoting the expression and pointing at the
//! offending byte. Lexical and syntactic failures are separate variants so
//! callers can tell a malformed token from a structurally invalid
//! expression.

use snafu::Snafu;

pub type CompileResult<T> = Result<T, CompileError>;

#[derive(Debug, Snafu)]
pub enum CompileError {
  /// The input could not be split into tokens.
  #[snafu(display("{expr_line}\n{marker} {message}"))]
  Lex {
    expr_line: String,
    marker: String,
    message: String,
  },
  /// The token sequence does not match the grammar.
  #[snafu(display("{expr_line}\n{marker} {message}"))]
  Parse {
    expr_line: String,
    marker: String,
    message: String,
  },
}

impl CompileError {
  /// Construct a lexical error anchored at a specific byte offset in the source.
  pub fn lex_at(expr: &str, loc: usize, message: impl Into<String>) -> Self {
    let (expr_line, marker) = anchor(expr, loc);
    Self::Lex {
      expr_line,
      marker,
      message: message.into(),
    }
  }

  /// Construct a parse error anchored at a specific byte offset in the source.
  pub fn parse_at(expr: &str, loc: usize, message: impl Into<String>) -> Self {
    let (expr_line, marker) = anchor(expr, loc);
    Self::Parse {
      expr_line,
      marker,
      message: message.into(),
    }
  }

  pub fn is_lex(&self) -> bool {
    matches!(self, Self::Lex { .. })
  }

  pub fn is_parse(&self) -> bool {
    matches!(self, Self::Parse { .. })
  }
}

fn anchor(expr: &str, loc: usize) -> (String, String) {
  let expr_line = format!("'{expr}'");
  let safe_loc = loc.min(expr.len());
  let char_offset = expr[..safe_loc].chars().count() + 1; // account for opening quote
  let marker = format!("{}^", " ".repeat(char_offset));
  (expr_line, marker)
}
