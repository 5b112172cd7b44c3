//! Recursive-descent parser producing the expression AST.
//!
//! One function per grammar rule, a single token of lookahead, no
//! backtracking:
//!
//! ```text
//! Expression := Term (('+' | '-') Term)*            left-associative
//! Term       := Factor (('*' | '/') Factor)*        left-associative
//! Factor     := '-' Factor | Base ('^' Factor)?     '^' right-associative
//! Base       := Identifier '(' Expression ')' ['!']
//!             | '(' Expression ')' ['!']
//!             | Number
//!             | Variable
//! ```
//!
//! The cursor lives in `TokenStream`; each rule advances it as it consumes
//! input and returns the subtree it recognised.

use crate::error::{CompileError, CompileResult};
use crate::tokenizer::{Token, TokenKind, describe_token, token_text};

/// Binary operators recognised by the expression language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
  Add,
  Sub,
  Mul,
  Div,
  Pow,
}

/// Built-in complex functions. `Gamma` comes from the postfix `!`, which the
/// generated code evaluates through the gamma function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
  Ln,
  Sin,
  Cos,
  Tan,
  Gamma,
}

impl Function {
  fn from_name(name: &str) -> Option<Self> {
    match name.to_ascii_lowercase().as_str() {
      "ln" => Some(Self::Ln),
      "sin" => Some(Self::Sin),
      "cos" => Some(Self::Cos),
      "tan" => Some(Self::Tan),
      _ => None,
    }
  }
}

/// Expression tree produced by the parser.
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
  Number { value: f64, imaginary: bool },
  Variable,
  Neg { operand: Box<AstNode> },
  Binary {
    op: BinaryOp,
    lhs: Box<AstNode>,
    rhs: Box<AstNode>,
  },
  Call {
    function: Function,
    argument: Box<AstNode>,
  },
}

impl AstNode {
  pub fn number(value: f64, imaginary: bool) -> Self {
    Self::Number { value, imaginary }
  }

  pub fn unary_neg(operand: AstNode) -> Self {
    Self::Neg {
      operand: Box::new(operand),
    }
  }

  pub fn binary(op: BinaryOp, lhs: AstNode, rhs: AstNode) -> Self {
    Self::Binary {
      op,
      lhs: Box::new(lhs),
      rhs: Box::new(rhs),
    }
  }

  pub fn call(function: Function, argument: AstNode) -> Self {
    Self::Call {
      function,
      argument: Box::new(argument),
    }
  }
}

/// Parse a complete expression from the token stream.
///
/// The whole input must be consumed: leftover tokens before `Eof` are a
/// parse error, never a partial tree.
pub fn parse(tokens: Vec<Token>, source: &str) -> CompileResult<AstNode> {
  let mut stream = TokenStream::new(tokens, source);

  if stream.is_eof() {
    return Err(CompileError::parse_at(source, 0, "expression is empty"));
  }

  let node = parse_expr(&mut stream)?;

  if !stream.is_eof() {
    let (loc, got) = stream.here();
    return Err(CompileError::parse_at(
      source,
      loc,
      format!("unexpected token \"{got}\""),
    ));
  }

  Ok(node)
}

fn parse_expr(stream: &mut TokenStream) -> CompileResult<AstNode> {
  let mut node = parse_term(stream)?;

  loop {
    let op = match stream.peek_kind() {
      Some(TokenKind::Plus) => BinaryOp::Add,
      Some(TokenKind::Minus) => BinaryOp::Sub,
      _ => break,
    };
    stream.advance();
    let rhs = parse_term(stream)?;
    node = AstNode::binary(op, node, rhs);
  }

  Ok(node)
}

fn parse_term(stream: &mut TokenStream) -> CompileResult<AstNode> {
  let mut node = parse_factor(stream)?;

  loop {
    let op = match stream.peek_kind() {
      Some(TokenKind::Star) => BinaryOp::Mul,
      Some(TokenKind::Slash) => BinaryOp::Div,
      _ => break,
    };
    stream.advance();
    let rhs = parse_factor(stream)?;
    node = AstNode::binary(op, node, rhs);
  }

  Ok(node)
}

fn parse_factor(stream: &mut TokenStream) -> CompileResult<AstNode> {
  // Unary minus binds here, above `^`, so `-z^2` negates the whole power
  // and a run of minuses nests.
  if stream.eat(TokenKind::Minus) {
    let operand = parse_factor(stream)?;
    return Ok(AstNode::unary_neg(operand));
  }

  let base = parse_base(stream)?;

  if stream.eat(TokenKind::Caret) {
    // The exponent recurses into Factor, making `^` right-associative.
    let exponent = parse_factor(stream)?;
    return Ok(AstNode::binary(BinaryOp::Pow, base, exponent));
  }

  Ok(base)
}

fn parse_base(stream: &mut TokenStream) -> CompileResult<AstNode> {
  match stream.peek_kind() {
    Some(TokenKind::Identifier) => {
      let (name, loc) = stream.get_identifier()?;
      let function = Function::from_name(&name).ok_or_else(|| {
        CompileError::parse_at(stream.source, loc, format!("unknown function \"{name}\""))
      })?;
      stream.expect(TokenKind::LParen)?;
      let argument = parse_expr(stream)?;
      stream.expect(TokenKind::RParen)?;
      let call = AstNode::call(function, argument);
      if stream.eat(TokenKind::FactorialMark) {
        return Ok(AstNode::call(Function::Gamma, call));
      }
      Ok(call)
    }
    Some(TokenKind::LParen) => {
      stream.advance();
      let node = parse_expr(stream)?;
      stream.expect(TokenKind::RParen)?;
      if stream.eat(TokenKind::FactorialMark) {
        return Ok(AstNode::call(Function::Gamma, node));
      }
      Ok(node)
    }
    Some(TokenKind::Number) => {
      let (value, imaginary) = stream.get_number()?;
      Ok(AstNode::number(value, imaginary))
    }
    Some(TokenKind::Variable) => {
      stream.advance();
      Ok(AstNode::Variable)
    }
    _ => {
      let (loc, got) = stream.here();
      Err(CompileError::parse_at(
        stream.source,
        loc,
        format!("expected an expression, but got \"{got}\""),
      ))
    }
  }
}

/// Lightweight cursor over the token vector.
struct TokenStream<'a> {
  tokens: Vec<Token>,
  source: &'a str,
  pos: usize,
}

impl<'a> TokenStream<'a> {
  /// Take ownership of the token stream; the parser will advance `pos` as it consumes input.
  fn new(tokens: Vec<Token>, source: &'a str) -> Self {
    Self {
      tokens,
      source,
      pos: 0,
    }
  }

  fn peek(&self) -> Option<&Token> {
    self.tokens.get(self.pos)
  }

  fn peek_kind(&self) -> Option<TokenKind> {
    self.peek().map(|token| token.kind)
  }

  fn advance(&mut self) {
    self.pos += 1;
  }

  /// Consume the current token if it has the given kind.
  fn eat(&mut self, kind: TokenKind) -> bool {
    if self.peek_kind() == Some(kind) {
      self.pos += 1;
      return true;
    }
    false
  }

  /// Consume a token of the given kind or fail naming both the expected and
  /// the actual token.
  fn expect(&mut self, kind: TokenKind) -> CompileResult<()> {
    if self.eat(kind) {
      Ok(())
    } else {
      let (loc, got) = self.here();
      Err(CompileError::parse_at(
        self.source,
        loc,
        format!("expected {}, but got \"{got}\"", describe_kind(kind)),
      ))
    }
  }

  /// Location and description of the current token, for diagnostics.
  fn here(&self) -> (usize, String) {
    match self.peek() {
      Some(token) => (token.loc, describe_token(Some(token), self.source)),
      None => (self.source.len(), "EOF".to_string()),
    }
  }

  /// Consume the current token as a numeric literal.
  fn get_number(&mut self) -> CompileResult<(f64, bool)> {
    if let Some(token) = self.peek()
      && token.kind == TokenKind::Number
    {
      let value = token.value.ok_or_else(|| {
        CompileError::parse_at(
          self.source,
          token.loc,
          "internal error: numeric token missing value",
        )
      })?;
      let imaginary = token.imaginary;
      self.pos += 1;
      return Ok((value, imaginary));
    }

    let (loc, got) = self.here();
    Err(CompileError::parse_at(
      self.source,
      loc,
      format!("expected a number, but got \"{got}\""),
    ))
  }

  /// Consume the current token as a function identifier.
  fn get_identifier(&mut self) -> CompileResult<(String, usize)> {
    if let Some(token) = self.peek()
      && token.kind == TokenKind::Identifier
    {
      let name = token_text(token, self.source).to_string();
      let loc = token.loc;
      self.pos += 1;
      return Ok((name, loc));
    }

    let (loc, got) = self.here();
    Err(CompileError::parse_at(
      self.source,
      loc,
      format!("expected a function name, but got \"{got}\""),
    ))
  }

  fn is_eof(&self) -> bool {
    matches!(self.peek_kind(), Some(TokenKind::Eof))
  }
}

fn describe_kind(kind: TokenKind) -> &'static str {
  match kind {
    TokenKind::Number => "a number",
    TokenKind::Variable => "\"z\"",
    TokenKind::Plus => "\"+\"",
    TokenKind::Minus => "\"-\"",
    TokenKind::Star => "\"*\"",
    TokenKind::Slash => "\"/\"",
    TokenKind::Caret => "\"^\"",
    TokenKind::LParen => "\"(\"",
    TokenKind::RParen => "\")\"",
    TokenKind::Identifier => "a function name",
    TokenKind::FactorialMark => "\"!\"",
    TokenKind::Eof => "EOF",
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::tokenizer::tokenize;

  fn parse_str(input: &str) -> CompileResult<AstNode> {
    parse(tokenize(input)?, input)
  }

  fn ast(input: &str) -> AstNode {
    parse_str(input).expect("input should parse")
  }

  #[test]
  fn addition_binds_looser_than_power() {
    let expected = AstNode::binary(
      BinaryOp::Add,
      AstNode::binary(BinaryOp::Pow, AstNode::Variable, AstNode::number(2.0, false)),
      AstNode::number(1.0, false),
    );
    assert_eq!(ast("z^2+1"), expected);
  }

  #[test]
  fn power_is_right_associative() {
    let expected = AstNode::binary(
      BinaryOp::Pow,
      AstNode::number(2.0, false),
      AstNode::binary(
        BinaryOp::Pow,
        AstNode::number(3.0, false),
        AstNode::number(2.0, false),
      ),
    );
    assert_eq!(ast("2^3^2"), expected);
  }

  #[test]
  fn addition_is_left_associative() {
    let expected = AstNode::binary(
      BinaryOp::Sub,
      AstNode::binary(
        BinaryOp::Add,
        AstNode::number(1.0, false),
        AstNode::number(2.0, false),
      ),
      AstNode::number(3.0, false),
    );
    assert_eq!(ast("1+2-3"), expected);
  }

  #[test]
  fn juxtaposition_parses_like_explicit_multiplication() {
    assert_eq!(ast("(z)(z)"), ast("(z)*(z)"));
  }

  #[test]
  fn unary_minus_negates_the_whole_power() {
    let expected = AstNode::unary_neg(AstNode::binary(
      BinaryOp::Pow,
      AstNode::Variable,
      AstNode::number(2.0, false),
    ));
    assert_eq!(ast("-z^2"), expected);
  }

  #[test]
  fn runs_of_unary_minus_nest() {
    let expected = AstNode::unary_neg(AstNode::unary_neg(AstNode::Variable));
    assert_eq!(ast("--z"), expected);
  }

  #[test]
  fn factorial_wraps_the_group_in_gamma() {
    let expected = AstNode::call(
      Function::Gamma,
      AstNode::binary(BinaryOp::Add, AstNode::Variable, AstNode::number(1.0, false)),
    );
    assert_eq!(ast("(z+1)!"), expected);
  }

  #[test]
  fn factorial_applies_to_a_function_call() {
    let expected = AstNode::call(
      Function::Gamma,
      AstNode::call(Function::Sin, AstNode::Variable),
    );
    assert_eq!(ast("sin(z)!"), expected);
  }

  #[test]
  fn function_calls_take_a_parenthesised_argument() {
    assert_eq!(ast("sin(z)"), AstNode::call(Function::Sin, AstNode::Variable));
    assert_eq!(ast("ln(z)"), AstNode::call(Function::Ln, AstNode::Variable));
  }

  #[test]
  fn function_argument_may_be_a_full_expression() {
    let expected = AstNode::call(
      Function::Cos,
      AstNode::binary(BinaryOp::Mul, AstNode::Variable, AstNode::Variable),
    );
    assert_eq!(ast("cos(z*z)"), expected);
  }

  #[test]
  fn imaginary_literals_flow_into_the_tree() {
    assert_eq!(ast("2.5i"), AstNode::number(2.5, true));
    assert_eq!(ast("i"), AstNode::number(1.0, true));
  }

  #[test]
  fn unbalanced_group_is_a_parse_error() {
    let err = parse_str("(z+1").unwrap_err();
    assert!(err.is_parse());
    assert!(err.to_string().contains("expected \")\""));
  }

  #[test]
  fn extra_closer_is_a_parse_error() {
    let err = parse_str("z)").unwrap_err();
    assert!(err.is_parse());
    assert!(err.to_string().contains("\")\""));
  }

  #[test]
  fn empty_input_is_a_parse_error() {
    assert!(parse_str("").unwrap_err().is_parse());
  }

  #[test]
  fn trailing_token_is_a_parse_error() {
    assert!(parse_str("z z").unwrap_err().is_parse());
  }

  #[test]
  fn leading_plus_is_not_supported() {
    assert!(parse_str("+z").unwrap_err().is_parse());
  }

  #[test]
  fn factorial_after_a_bare_number_is_rejected() {
    assert!(parse_str("3!").unwrap_err().is_parse());
  }

  #[test]
  fn function_without_argument_is_a_parse_error() {
    let err = parse_str("sin z").unwrap_err();
    assert!(err.is_parse());
    assert!(err.to_string().contains("expected \"(\""));
  }

  #[test]
  fn premature_end_of_input_is_a_parse_error() {
    assert!(parse_str("z +").unwrap_err().is_parse());
  }
}
