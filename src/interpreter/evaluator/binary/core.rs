use crate::{
    ast::{BinaryOp, Expr, Span},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        value::core::Value,
    },
};

impl Interpreter {
    /// Evaluates a binary operation.
    ///
    /// `and`/`or` short-circuit, so they receive the unevaluated operand
    /// expressions. Every other operator evaluates both sides first and then
    /// dispatches:
    ///
    /// - `+` adds numbers, concatenates two arrays into a fresh array, and
    ///   otherwise renders both operands and concatenates the strings.
    /// - `-`, `*`, `/` require two numbers. Division is IEEE-754; dividing
    ///   by zero yields an infinity or NaN, not an error.
    /// - `==`/`!=` use recursive structural equality.
    /// - The orderings require two numbers or two strings.
    pub(crate) fn eval_binary(&mut self,
                              left: &Expr,
                              op: BinaryOp,
                              right: &Expr,
                              span: Span)
                              -> EvalResult<Value> {
        use BinaryOp::{
            Add, And, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mul, NotEqual, Or, Sub,
        };

        if matches!(op, And | Or) {
            return self.eval_logic(left, op, right);
        }

        let left_value = self.eval_expr(left)?;
        let right_value = self.eval_expr(right)?;

        match op {
            Add => Ok(Self::eval_add(&left_value, &right_value)),

            Equal => Ok(Value::Bool(left_value == right_value)),
            NotEqual => Ok(Value::Bool(left_value != right_value)),

            Less | Greater | LessEqual | GreaterEqual => {
                self.eval_comparison(op, &left_value, &right_value, span)
            },

            Sub | Mul | Div => {
                let (Value::Number(a), Value::Number(b)) = (&left_value, &right_value) else {
                    return Err(self.fail(RuntimeError::OperandType { op: op.to_string(),
                                                                     expected: "numbers",
                                                                     span }));
                };
                let result = match op {
                    Sub => a - b,
                    Mul => a * b,
                    Div => a / b,
                    _ => unreachable!(),
                };
                Ok(Value::Number(result))
            },

            And | Or => unreachable!(),
        }
    }

    /// Evaluates the overloaded `+`.
    fn eval_add(left: &Value, right: &Value) -> Value {
        match (left, right) {
            (Value::Number(a), Value::Number(b)) => Value::Number(a + b),

            (Value::Array(a), Value::Array(b)) => {
                let mut out = a.borrow().clone();
                out.extend(b.borrow().iter().cloned());
                Value::array(out)
            },

            _ => Value::Str(format!("{left}{right}")),
        }
    }

    /// Evaluates `and`/`or` with short-circuiting.
    ///
    /// The left operand decides whether the right is evaluated at all, but
    /// both operands must ultimately be booleans: a non-boolean on either
    /// side that gets evaluated is an error.
    fn eval_logic(&mut self, left: &Expr, op: BinaryOp, right: &Expr) -> EvalResult<Value> {
        let left_value = self.eval_expr(left)?;
        let Value::Bool(left_bool) = left_value else {
            return Err(self.fail(RuntimeError::OperandType { op:       op.to_string(),
                                                             expected: "booleans",
                                                             span:     left.span(), }));
        };

        match op {
            BinaryOp::And if !left_bool => return Ok(Value::Bool(false)),
            BinaryOp::Or if left_bool => return Ok(Value::Bool(true)),
            _ => {},
        }

        let right_value = self.eval_expr(right)?;
        let Value::Bool(right_bool) = right_value else {
            return Err(self.fail(RuntimeError::OperandType { op:       op.to_string(),
                                                             expected: "booleans",
                                                             span:     right.span(), }));
        };

        Ok(Value::Bool(right_bool))
    }
}
