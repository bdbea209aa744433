use std::{
    collections::{BTreeMap, HashMap},
    io::{self, BufRead, BufReader, Write},
    rc::Rc,
};

use crate::{
    ast::{Expr, FunctionDecl, Span, Stmt},
    error::{Diagnostic, RuntimeError},
    interpreter::{
        evaluator::{files::FileHandle, modules::ModuleState, utils::split_lines},
        value::core::Value,
    },
};

/// Result type used by the evaluator.
///
/// Failures are fully contextualized [`Diagnostic`]s: the filename, source
/// line, and call stack are captured at the point the error is raised, so a
/// failure inside an imported module renders against that module's source.
pub type EvalResult<T> = Result<T, Diagnostic>;

/// The non-error outcome of executing a statement.
///
/// `return`, `break`, and `continue` are not errors; they are typed signals
/// that propagate out of nested constructs until something consumes them.
/// Loops consume `Break` and `Continue`; function calls consume `Return`. A
/// signal that escapes its legal enclosing construct is converted into a
/// runtime error at that boundary.
#[derive(Debug)]
pub enum Flow {
    /// Execution fell through normally.
    Normal,
    /// A `return` carrying its value up to the enclosing call.
    Return(Value),
    /// A `break` looking for its enclosing loop.
    Break(Span),
    /// A `continue` looking for its enclosing loop.
    Continue(Span),
}

/// The interpreter state.
///
/// One instance holds the global environment, the stack of call-local
/// frames, the user-function table, the module registry, and the open
/// file-handle table for its entire lifetime. A frame exists only for the
/// duration of one call.
pub struct Interpreter {
    pub(crate) globals:      HashMap<String, Value>,
    pub(crate) locals:       Vec<HashMap<String, Value>>,
    pub(crate) functions:    HashMap<String, Rc<FunctionDecl>>,
    /// Filename used in diagnostics for the currently executing source.
    pub(crate) filename:     String,
    /// The current source split into lines, for diagnostic rendering.
    pub(crate) lines:        Vec<String>,
    /// Names of user functions currently executing, outermost first.
    pub(crate) call_stack:   Vec<String>,
    pub(crate) modules:      HashMap<String, ModuleState>,
    pub(crate) module_stack: Vec<String>,
    pub(crate) files:        HashMap<i64, FileHandle>,
    pub(crate) out:          Box<dyn Write>,
    pub(crate) input:        Box<dyn BufRead>,
}

impl Interpreter {
    /// Creates an interpreter bound to a filename and source text for
    /// diagnostics, writing to stdout and reading from stdin.
    #[must_use]
    pub fn with_source(filename: &str, source: &str) -> Self {
        Self::with_io(filename,
                      source,
                      Box::new(io::stdout()),
                      Box::new(BufReader::new(io::stdin())))
    }

    /// Creates an interpreter with explicit output and input streams.
    ///
    /// `print` statements write to `out`; the `input()` built-in reads from
    /// `input`. Tests use this to capture program output.
    #[must_use]
    pub fn with_io(filename: &str,
                   source: &str,
                   out: Box<dyn Write>,
                   input: Box<dyn BufRead>)
                   -> Self {
        Self { globals: HashMap::new(),
               locals: Vec::new(),
               functions: HashMap::new(),
               filename: filename.to_string(),
               lines: split_lines(source),
               call_stack: Vec::new(),
               modules: HashMap::new(),
               module_stack: Vec::new(),
               files: HashMap::new(),
               out,
               input }
    }

    /// Rebinds the diagnostic context to a new filename and source.
    ///
    /// Used by interactive drivers between chunks so runtime errors show the
    /// correct filename and caret lines, and imports resolve relative to the
    /// chunk filename.
    pub fn set_source(&mut self, filename: &str, source: &str) {
        self.filename = filename.to_string();
        self.lines = split_lines(source);
    }

    /// Executes a program in the current scope.
    ///
    /// A control-flow signal escaping the top level is an error here: there
    /// is no loop for `break`/`continue` and no function for `return` to
    /// terminate.
    ///
    /// # Errors
    /// Returns the first runtime [`Diagnostic`] raised by the program.
    pub fn run(&mut self, program: &[Stmt]) -> Result<(), Diagnostic> {
        match self.exec_block(program)? {
            Flow::Normal => Ok(()),
            Flow::Break(span) => Err(self.fail(RuntimeError::BreakOutsideLoop { span })),
            Flow::Continue(span) => Err(self.fail(RuntimeError::ContinueOutsideLoop { span })),
            Flow::Return(_) => {
                Err(self.fail(RuntimeError::ReturnOutsideFunction { span: Span::default() }))
            },
        }
    }

    /// Executes the statements of one block, stopping at the first signal.
    pub(crate) fn exec_block(&mut self, statements: &[Stmt]) -> EvalResult<Flow> {
        for statement in statements {
            match self.exec_stmt(statement)? {
                Flow::Normal => {},
                flow => return Ok(flow),
            }
        }
        Ok(Flow::Normal)
    }

    /// Executes a single statement.
    pub(crate) fn exec_stmt(&mut self, statement: &Stmt) -> EvalResult<Flow> {
        match statement {
            Stmt::Print { value, .. } => {
                let value = self.eval_expr(value)?;
                let _ = writeln!(self.out, "{value}");
                Ok(Flow::Normal)
            },

            Stmt::PrintHandle { handle, value, span } => {
                self.exec_print_handle(*handle, value, *span)
            },

            Stmt::Assign { name, value, .. } => {
                let value = self.eval_expr(value)?;
                self.current_env().insert(name.clone(), value);
                Ok(Flow::Normal)
            },

            Stmt::IndexAssign { name,
                                index,
                                value,
                                span, } => self.exec_index_assign(name, index, value, *span),

            Stmt::Expression { expr, .. } => {
                self.eval_expr(expr)?;
                Ok(Flow::Normal)
            },

            Stmt::If { condition,
                       then_branch,
                       else_branch,
                       .. } => {
                let cond = self.eval_expr(condition)?;
                let Value::Bool(cond) = cond else {
                    return Err(self.fail(RuntimeError::ConditionNotBool { construct: "If",
                                                                          span:      condition.span(), }));
                };
                if cond {
                    self.exec_block(then_branch)
                } else {
                    self.exec_block(else_branch)
                }
            },

            Stmt::While { condition, body, .. } => self.exec_while(condition, body),

            Stmt::For { var,
                        start,
                        end,
                        step,
                        body,
                        span, } => self.exec_for(var, start, end, step.as_ref(), body, *span),

            Stmt::ForEach { var,
                            index_var,
                            iterable,
                            body,
                            span, } => {
                self.exec_for_each(var, index_var.as_deref(), iterable, body, *span)
            },

            Stmt::Function(decl) => {
                self.functions.insert(decl.name.clone(), Rc::new(decl.clone()));
                Ok(Flow::Normal)
            },

            Stmt::Return { value, span } => {
                if !self.in_function() {
                    return Err(self.fail(RuntimeError::ReturnOutsideFunction { span: *span }));
                }
                let value = self.eval_expr(value)?;
                Ok(Flow::Return(value))
            },

            Stmt::Break { span } => Ok(Flow::Break(*span)),
            Stmt::Continue { span } => Ok(Flow::Continue(*span)),

            Stmt::Import { path, span } => self.exec_import(path, *span),

            Stmt::Open { handle,
                         path,
                         mode,
                         span, } => self.exec_open(*handle, path, mode, *span),

            Stmt::Close { handle, span } => self.exec_close(*handle, *span),
        }
    }

    /// Executes `name[index] = value`.
    ///
    /// The container must already be bound; arrays require an in-range
    /// integer index, maps a string key (new keys are inserted). Mutation
    /// goes through the shared reference, so every alias observes it.
    #[allow(clippy::cast_sign_loss)]
    fn exec_index_assign(&mut self,
                         name: &str,
                         index: &Expr,
                         value: &Expr,
                         span: Span)
                         -> EvalResult<Flow> {
        let Some(container) = self.lookup(name).cloned() else {
            return Err(self.fail(RuntimeError::UndefinedVariable { name: name.to_string(),
                                                                   span }));
        };

        let index_value = self.eval_expr(index)?;
        let new_value = self.eval_expr(value)?;

        match container {
            Value::Array(elements) => {
                let idx = self.to_index(&index_value, index.span())?;
                let mut elements = elements.borrow_mut();
                let size = elements.len();

                if idx < 0 || idx as usize >= size {
                    return Err(self.fail(RuntimeError::IndexOutOfBounds { index: idx,
                                                                          size,
                                                                          span }));
                }
                elements[idx as usize] = new_value;
                Ok(Flow::Normal)
            },

            Value::Map(entries) => {
                let Value::Str(key) = index_value else {
                    return Err(self.fail(RuntimeError::KeyNotString { span: index.span() }));
                };
                entries.borrow_mut().insert(key, new_value);
                Ok(Flow::Normal)
            },

            _ => Err(self.fail(RuntimeError::IndexAssignTarget { span })),
        }
    }

    /// Evaluates an expression and returns the resulting value.
    pub(crate) fn eval_expr(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::StringLit { value, .. } => Ok(Value::Str(value.clone())),
            Expr::NumberLit { value, .. } => Ok(Value::Number(*value)),
            Expr::BoolLit { value, .. } => Ok(Value::Bool(*value)),

            Expr::Identifier { name, span } => match self.lookup(name).cloned() {
                Some(value) => Ok(value),
                None => Err(self.fail(RuntimeError::UndefinedVariable { name: name.clone(),
                                                                        span: *span, })),
            },

            Expr::Unary { op, right, span } => self.eval_unary(*op, right, *span),

            Expr::Binary { left,
                           op,
                           right,
                           span, } => self.eval_binary(left, *op, right, *span),

            Expr::Call { callee, args, span } => self.eval_call(callee, args, *span),

            Expr::ArrayLit { elements, .. } => {
                let mut values = Vec::with_capacity(elements.len());
                for element in elements {
                    values.push(self.eval_expr(element)?);
                }
                Ok(Value::array(values))
            },

            Expr::MapLit { entries, .. } => {
                let mut map = BTreeMap::new();
                for entry in entries {
                    // duplicate keys keep the last value
                    let value = self.eval_expr(&entry.value)?;
                    map.insert(entry.key.clone(), value);
                }
                Ok(Value::map(map))
            },

            Expr::Index { left, index, span } => self.eval_index(left, index, *span),
        }
    }

    /// Evaluates `left[index]` for arrays and maps.
    #[allow(clippy::cast_sign_loss)]
    fn eval_index(&mut self, left: &Expr, index: &Expr, span: Span) -> EvalResult<Value> {
        let container = self.eval_expr(left)?;
        let index_value = self.eval_expr(index)?;

        match container {
            Value::Array(elements) => {
                let idx = self.to_index(&index_value, index.span())?;
                let elements = elements.borrow();
                let size = elements.len();

                if idx < 0 || idx as usize >= size {
                    Err(self.fail(RuntimeError::IndexOutOfBounds { index: idx,
                                                                   size,
                                                                   span }))
                } else {
                    Ok(elements[idx as usize].clone())
                }
            },

            Value::Map(entries) => {
                let Value::Str(key) = index_value else {
                    return Err(self.fail(RuntimeError::KeyNotString { span: index.span() }));
                };
                let found = entries.borrow().get(&key).cloned();
                match found {
                    Some(value) => Ok(value),
                    None => Err(self.fail(RuntimeError::KeyNotFound { key, span })),
                }
            },

            _ => Err(self.fail(RuntimeError::NotIndexable { span })),
        }
    }
}
