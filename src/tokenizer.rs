//! Lexical analysis: turns the raw expression string into a vector of tokens.
//!
//! The tokenizer is intentionally tiny – it knows nothing about the grammar
//! beyond classifying characters. Keyword resolution happens here: `e` and
//! `pi` collapse straight into numeric tokens, while function names survive
//! as identifiers for the parser to pair with their parenthesised argument.

use crate::error::{CompileError, CompileResult};

/// Kinds of tokens recognised by the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
  Number,
  Variable,
  Plus,
  Minus,
  Star,
  Slash,
  Caret,
  LParen,
  RParen,
  Identifier,
  FactorialMark,
  Eof,
}

/// Thin wrapper for lexical information needed by later stages.
#[derive(Debug, Clone)]
pub struct Token {
  pub kind: TokenKind,
  pub value: Option<f64>,
  pub imaginary: bool,
  pub loc: usize,
  pub len: usize,
}

impl Token {
  /// Convenience constructor to keep the `tokenize` loop readable.
  pub fn new(kind: TokenKind, loc: usize, len: usize) -> Self {
    Self {
      kind,
      value: None,
      imaginary: false,
      loc,
      len,
    }
  }

  /// A numeric token. `imaginary` is set only for literals lexed with a
  /// trailing imaginary suffix (or the bare imaginary unit).
  pub fn number(value: f64, imaginary: bool, loc: usize, len: usize) -> Self {
    Self {
      kind: TokenKind::Number,
      value: Some(value),
      imaginary,
      loc,
      len,
    }
  }
}

/// Letter runs the parser accepts as function names.
const FUNCTION_NAMES: [&str; 4] = ["ln", "sin", "cos", "tan"];

/// Lex the input into a flat vector of tokens terminated by an `Eof` marker.
pub fn tokenize(input: &str) -> CompileResult<Vec<Token>> {
  let mut tokens: Vec<Token> = Vec::new();
  let bytes = input.as_bytes();
  let mut i = 0;

  while i < bytes.len() {
    let c = bytes[i];
    if c.is_ascii_whitespace() {
      i += 1;
      continue;
    }

    if let Some(kind) = operator_kind(c) {
      // `)(` means juxtaposition; synthesise the multiplication the user
      // left out. The inserted token has zero length so diagnostics keep
      // pointing at real input.
      if kind == TokenKind::LParen
        && tokens.last().is_some_and(|t| t.kind == TokenKind::RParen)
      {
        tokens.push(Token::new(TokenKind::Star, i, 0));
      }
      tokens.push(Token::new(kind, i, 1));
      i += 1;
      continue;
    }

    if c == b'z' || c == b'Z' {
      tokens.push(Token::new(TokenKind::Variable, i, 1));
      i += 1;
      continue;
    }

    if c.is_ascii_digit() || c == b'.' || c == b'i' {
      tokens.push(scan_number(input, &mut i)?);
      continue;
    }

    if c.is_ascii_alphabetic() {
      let start = i;
      while i < bytes.len() && bytes[i].is_ascii_alphabetic() {
        i += 1;
      }
      let word = input[start..i].to_ascii_lowercase();
      if FUNCTION_NAMES.contains(&word.as_str()) {
        tokens.push(Token::new(TokenKind::Identifier, start, i - start));
      } else if word == "e" {
        tokens.push(Token::number(std::f64::consts::E, false, start, i - start));
      } else if word == "pi" {
        tokens.push(Token::number(std::f64::consts::PI, false, start, i - start));
      } else {
        return Err(CompileError::lex_at(
          input,
          start,
          format!("unknown identifier \"{}\"", &input[start..i]),
        ));
      }
      continue;
    }

    let invalid_char = input[i..].chars().next().unwrap_or('\0');
    return Err(CompileError::lex_at(
      input,
      i,
      format!("unexpected character '{invalid_char}'"),
    ));
  }

  tokens.push(Token::new(TokenKind::Eof, input.len(), 0));
  Ok(tokens)
}

fn operator_kind(c: u8) -> Option<TokenKind> {
  match c {
    b'+' => Some(TokenKind::Plus),
    b'-' => Some(TokenKind::Minus),
    b'*' => Some(TokenKind::Star),
    b'/' => Some(TokenKind::Slash),
    b'^' => Some(TokenKind::Caret),
    b'(' => Some(TokenKind::LParen),
    b')' => Some(TokenKind::RParen),
    b'!' => Some(TokenKind::FactorialMark),
    _ => None,
  }
}

/// Scan a numeric or imaginary literal starting at `*i`, advancing the
/// cursor past it. Accepts digits with at most one decimal point and an
/// optional trailing `i`; `.5` and `3.` are padded out before parsing so the
/// value always goes through the locale-independent `f64` parser.
fn scan_number(input: &str, i: &mut usize) -> CompileResult<Token> {
  let bytes = input.as_bytes();
  let start = *i;

  // A literal consisting solely of `i` is the imaginary unit.
  if bytes[start] == b'i' {
    *i += 1;
    return Ok(Token::number(1.0, true, start, 1));
  }

  let mut has_dot = false;
  while *i < bytes.len() {
    match bytes[*i] {
      b'0'..=b'9' => *i += 1,
      b'.' => {
        if has_dot {
          return Err(CompileError::lex_at(
            input,
            *i,
            "malformed number: second decimal point",
          ));
        }
        has_dot = true;
        *i += 1;
      }
      _ => break,
    }
  }

  let mut text = input[start..*i].to_string();

  let mut imaginary = false;
  if *i < bytes.len() && bytes[*i] == b'i' {
    imaginary = true;
    *i += 1;
  }

  if text.starts_with('.') {
    text.insert(0, '0');
  }
  if text.ends_with('.') {
    text.push('0');
  }

  let value = text
    .parse::<f64>()
    .map_err(|err| CompileError::lex_at(input, start, format!("malformed number: {err}")))?;
  Ok(Token::number(value, imaginary, start, *i - start))
}

/// Return the slice from the source that produced this token.
pub fn token_text<'a>(token: &Token, source: &'a str) -> &'a str {
  let end = token.loc + token.len;
  &source[token.loc..end]
}

/// Human-friendly description used in diagnostics.
pub fn describe_token(token: Option<&Token>, source: &str) -> String {
  match token {
    Some(t) => match t.kind {
      TokenKind::Eof => "EOF".to_string(),
      TokenKind::Star if t.len == 0 => "*".to_string(),
      _ => token_text(t, source).to_string(),
    },
    None => "EOF".to_string(),
  }
}
