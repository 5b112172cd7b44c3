//! Code generation: lower the parsed AST into a GLSL expression snippet.
//!
//! The emitter is a single structural recursion: every node contributes one
//! call into the complex-arithmetic primitives the host shader defines
//! (`complexAdd`, `complexMult`, `complex_pow_complex`, ...), so the snippet
//! can be spliced into the shader source verbatim. Numbers become `vec2`
//! literal pairs with the value in the real or imaginary slot.

use crate::parser::{AstNode, BinaryOp, Function};

/// Emit the GLSL expression for a parsed AST.
pub fn generate(node: &AstNode) -> String {
  let mut glsl = String::new();
  emit_expr(node, &mut glsl);
  glsl
}

fn emit_expr(node: &AstNode, glsl: &mut String) {
  match node {
    AstNode::Number { value, imaginary } => {
      if *imaginary {
        glsl.push_str(&format!("vec2(0.0, {})", format_number(*value)));
      } else {
        glsl.push_str(&format!("vec2({}, 0.0)", format_number(*value)));
      }
    }
    AstNode::Variable => glsl.push('z'),
    AstNode::Neg { operand } => {
      glsl.push_str("complexMult(vec2(-1.0, 0.0), ");
      emit_expr(operand, glsl);
      glsl.push(')');
    }
    AstNode::Binary { op, lhs, rhs } => {
      glsl.push_str(match op {
        BinaryOp::Add => "complexAdd",
        BinaryOp::Sub => "complexSub",
        BinaryOp::Mul => "complexMult",
        BinaryOp::Div => "complexDivide",
        BinaryOp::Pow => "complex_pow_complex",
      });
      glsl.push('(');
      emit_expr(lhs, glsl);
      glsl.push_str(", ");
      emit_expr(rhs, glsl);
      glsl.push(')');
    }
    AstNode::Call { function, argument } => {
      glsl.push_str(match function {
        Function::Ln => "complexLn",
        Function::Sin => "complexSin",
        Function::Cos => "complexCos",
        Function::Tan => "complexTan",
        Function::Gamma => "complexGamma",
      });
      glsl.push('(');
      emit_expr(argument, glsl);
      glsl.push(')');
    }
  }
}

/// Render a double the way the snippet expects: shortest round-trip decimal
/// with `.` as the separator, no grouping, and no forced fractional part on
/// integral values.
fn format_number(value: f64) -> String {
  value.to_string()
}
