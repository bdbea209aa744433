use crate::{
    ast::{Expr, Span, UnaryOp},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        value::core::Value,
    },
};

impl Interpreter {
    /// Evaluates a unary operation.
    ///
    /// `not` requires a boolean operand; there is no numeric negation
    /// operator (negative literals are written as `0 - n`).
    pub(crate) fn eval_unary(&mut self, op: UnaryOp, right: &Expr, span: Span) -> EvalResult<Value> {
        let value = self.eval_expr(right)?;

        match op {
            UnaryOp::Not => {
                let Value::Bool(b) = value else {
                    return Err(self.fail(RuntimeError::OperandType { op:       "not".to_string(),
                                                                     expected: "boolean",
                                                                     span }));
                };
                Ok(Value::Bool(!b))
            },
        }
    }
}
