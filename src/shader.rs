//! Live shader recompilation: splice a compiled snippet into the shader
//! template and track the last successfully compiled expression.
//!
//! The renderer polls [`LiveShader::poll`] once per frame with the current
//! editor text. Translation only runs when the text differs from the last
//! text that compiled, and a failed translation leaves the previous program
//! installed untouched.

use crate::error::CompileResult;
use crate::expression_to_glsl;

/// Marker in the shader template that the compiled snippet replaces.
pub const PLACEHOLDER: &str = "vec2(0.00)";

/// Substitute a compiled snippet into a shader template.
pub fn substitute(template: &str, snippet: &str) -> String {
  template.replace(PLACEHOLDER, snippet)
}

/// Owns the shader template plus the most recently compiled program.
#[derive(Debug, Clone)]
pub struct LiveShader {
  template: String,
  last_text: String,
  program: Option<String>,
}

impl LiveShader {
  pub fn new(template: impl Into<String>) -> Self {
    Self {
      template: template.into(),
      last_text: String::new(),
      program: None,
    }
  }

  /// Recompile if `text` differs from the last successfully compiled
  /// expression.
  ///
  /// Returns `Ok(true)` when a new program was installed and `Ok(false)`
  /// when the text was unchanged. On a translation error the previous
  /// program stays installed and the text is not remembered, so the next
  /// poll retries.
  pub fn poll(&mut self, text: &str) -> CompileResult<bool> {
    if text == self.last_text && self.program.is_some() {
      return Ok(false);
    }

    let snippet = expression_to_glsl(text)?;
    self.program = Some(substitute(&self.template, &snippet));
    self.last_text = text.to_string();
    Ok(true)
  }

  /// The currently installed program, if any compile has succeeded yet.
  pub fn program(&self) -> Option<&str> {
    self.program.as_deref()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  const TEMPLATE: &str = "color = render(vec2(0.00), uv);";

  #[test]
  fn substitute_replaces_the_placeholder() {
    assert_eq!(
      substitute(TEMPLATE, "complexMult(z, z)"),
      "color = render(complexMult(z, z), uv);"
    );
  }

  #[test]
  fn poll_installs_a_program_on_success() {
    let mut live = LiveShader::new(TEMPLATE);
    assert!(live.poll("z*z").unwrap());
    assert_eq!(
      live.program(),
      Some("color = render(complexMult(z, z), uv);")
    );
  }

  #[test]
  fn poll_is_a_no_op_while_the_text_is_unchanged() {
    let mut live = LiveShader::new(TEMPLATE);
    assert!(live.poll("z").unwrap());
    assert!(!live.poll("z").unwrap());
  }

  #[test]
  fn failed_translation_retains_the_previous_program() {
    let mut live = LiveShader::new(TEMPLATE);
    live.poll("z").unwrap();
    let before = live.program().unwrap().to_string();

    // Mid-edit state: unbalanced parenthesis.
    assert!(live.poll("(z").is_err());
    assert_eq!(live.program(), Some(before.as_str()));

    // Finishing the edit swaps the program in.
    assert!(live.poll("(z)(z)").unwrap());
    assert_ne!(live.program(), Some(before.as_str()));
  }

  #[test]
  fn errors_keep_retrying_until_the_text_compiles() {
    let mut live = LiveShader::new(TEMPLATE);
    assert!(live.poll("(z").is_err());
    assert!(live.poll("(z").is_err());
    assert_eq!(live.program(), None);
  }
}
