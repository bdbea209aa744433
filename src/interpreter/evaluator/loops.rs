use crate::{
    ast::{Expr, Span, Stmt},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Flow, Interpreter},
        value::core::Value,
    },
};

impl Interpreter {
    /// Executes a `while` loop.
    ///
    /// The condition is re-evaluated before each iteration and must be a
    /// boolean every time. `break` ends the loop normally; `continue` skips
    /// to the next condition check; `return` propagates.
    pub(crate) fn exec_while(&mut self, condition: &Expr, body: &[Stmt]) -> EvalResult<Flow> {
        loop {
            let cond = self.eval_expr(condition)?;
            let Value::Bool(cond) = cond else {
                return Err(self.fail(RuntimeError::ConditionNotBool { construct: "While",
                                                                      span: condition.span(), }));
            };
            if !cond {
                break;
            }

            match self.exec_block(body)? {
                Flow::Normal | Flow::Continue(_) => {},
                Flow::Break(_) => break,
                flow @ Flow::Return(_) => return Ok(flow),
            }
        }

        Ok(Flow::Normal)
    }

    /// Executes a counted `for` loop.
    ///
    /// `start` and `end` must be numbers. Without an explicit `step` the
    /// loop counts by `1` when `start <= end` and by `-1` otherwise; an
    /// explicit step must be a non-zero number. The loop terminates when the
    /// counter crosses the bound in the step's direction.
    ///
    /// The counter is an ordinary variable in the current scope. It is read
    /// back at the top of every iteration (a non-number there is an error)
    /// and rewritten after the body from the value read at the top, so the
    /// body sees its own writes but cannot change the progression.
    pub(crate) fn exec_for(&mut self,
                           var: &str,
                           start: &Expr,
                           end: &Expr,
                           step: Option<&Expr>,
                           body: &[Stmt],
                           span: Span)
                           -> EvalResult<Flow> {
        let start_value = self.eval_expr(start)?;
        let end_value = self.eval_expr(end)?;
        let (Value::Number(start_n), Value::Number(end_n)) = (&start_value, &end_value) else {
            return Err(self.fail(RuntimeError::ForBoundsNotNumber { span }));
        };
        let (start_n, end_n) = (*start_n, *end_n);

        let step_n = match step {
            Some(step_expr) => match self.eval_expr(step_expr)? {
                Value::Number(n) if n != 0.0 => n,
                _ => {
                    return Err(self.fail(RuntimeError::ForStepInvalid { span:
                                                                            step_expr.span() }));
                },
            },
            None if start_n > end_n => -1.0,
            None => 1.0,
        };

        self.current_env().insert(var.to_string(), Value::Number(start_n));

        loop {
            let current = match self.lookup(var) {
                Some(Value::Number(n)) => *n,
                _ => return Err(self.fail(RuntimeError::ForVarNotNumber { span })),
            };

            if (step_n > 0.0 && current > end_n) || (step_n < 0.0 && current < end_n) {
                break;
            }

            match self.exec_block(body)? {
                Flow::Normal | Flow::Continue(_) => {
                    self.current_env()
                        .insert(var.to_string(), Value::Number(current + step_n));
                },
                Flow::Break(_) => break,
                flow @ Flow::Return(_) => return Ok(flow),
            }
        }

        Ok(Flow::Normal)
    }

    /// Executes a `for each` loop over an array or map.
    ///
    /// Arrays walk a snapshot of the elements taken at entry, so mutating
    /// the array inside the body does not change the iteration. Maps iterate
    /// the key list captured (already sorted) at entry; the value variable
    /// receives the **key** and the optional index variable the zero-based
    /// position.
    #[allow(clippy::cast_precision_loss)]
    pub(crate) fn exec_for_each(&mut self,
                                var: &str,
                                index_var: Option<&str>,
                                iterable: &Expr,
                                body: &[Stmt],
                                span: Span)
                                -> EvalResult<Flow> {
        let iterable_value = self.eval_expr(iterable)?;

        match iterable_value {
            Value::Array(elements) => {
                let snapshot = elements.borrow().clone();
                for (position, element) in snapshot.into_iter().enumerate() {
                    self.current_env().insert(var.to_string(), element);
                    if let Some(index_name) = index_var {
                        self.current_env()
                            .insert(index_name.to_string(), Value::Number(position as f64));
                    }

                    match self.exec_block(body)? {
                        Flow::Normal | Flow::Continue(_) => {},
                        Flow::Break(_) => break,
                        flow @ Flow::Return(_) => return Ok(flow),
                    }
                }
                Ok(Flow::Normal)
            },

            Value::Map(entries) => {
                let keys: Vec<String> = entries.borrow().keys().cloned().collect();
                for (position, key) in keys.into_iter().enumerate() {
                    self.current_env().insert(var.to_string(), Value::Str(key));
                    if let Some(index_name) = index_var {
                        self.current_env()
                            .insert(index_name.to_string(), Value::Number(position as f64));
                    }

                    match self.exec_block(body)? {
                        Flow::Normal | Flow::Continue(_) => {},
                        Flow::Break(_) => break,
                        flow @ Flow::Return(_) => return Ok(flow),
                    }
                }
                Ok(Flow::Normal)
            },

            _ => Err(self.fail(RuntimeError::ForEachNotIterable { span })),
        }
    }
}
