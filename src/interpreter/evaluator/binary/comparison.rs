use crate::{
    ast::{BinaryOp, Span},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        value::core::Value,
    },
};

impl Interpreter {
    /// Evaluates an ordering comparison between two values.
    ///
    /// Numbers compare by IEEE-754 ordering; strings compare
    /// lexicographically by code point. Mixing kinds is an error.
    pub(crate) fn eval_comparison(&self,
                                  op: BinaryOp,
                                  left: &Value,
                                  right: &Value,
                                  span: Span)
                                  -> EvalResult<Value> {
        use BinaryOp::{Greater, GreaterEqual, Less, LessEqual};

        let result = match (left, right) {
            (Value::Number(a), Value::Number(b)) => match op {
                Less => a < b,
                Greater => a > b,
                LessEqual => a <= b,
                GreaterEqual => a >= b,
                _ => unreachable!(),
            },

            (Value::Str(a), Value::Str(b)) => match op {
                Less => a < b,
                Greater => a > b,
                LessEqual => a <= b,
                GreaterEqual => a >= b,
                _ => unreachable!(),
            },

            _ => {
                return Err(self.fail(RuntimeError::OperandType { op: op.to_string(),
                                                                 expected:
                                                                     "two numbers or two strings",
                                                                 span }));
            },
        };

        Ok(Value::Bool(result))
    }
}
