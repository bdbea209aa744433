use std::rc::Rc;

use crate::{
    ast::{Expr, FunctionDecl, Span},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{EvalResult, Flow, Interpreter},
            function::{array_ops, builtin, file_ops, map_ops, string_ops},
        },
        value::core::Value,
    },
};

/// Type alias for builtin function handlers.
///
/// A builtin receives the interpreter (for I/O streams and the file-handle
/// table), the evaluated argument values, and the call span for error
/// reporting.
type BuiltinFn = fn(&mut Interpreter, &[Value], Span) -> EvalResult<Value>;

/// Specifies the allowed number of arguments for a builtin.
///
/// - `Exact(n)` means the builtin must receive exactly `n` arguments.
/// - `OneOf(slice)` means the builtin accepts any arity listed in `slice`.
#[derive(Clone, Copy)]
enum Arity {
    Exact(usize),
    OneOf(&'static [usize]),
}

/// Defines builtin functions by generating a lookup table and a name list.
///
/// Each entry provides:
/// - a string name,
/// - an arity specification,
/// - a usage string shown in arity errors,
/// - a function pointer implementing the builtin.
///
/// The macro produces:
/// - `BuiltinDef` (internal metadata),
/// - `BUILTIN_TABLE` (static table for lookup),
/// - `BUILTIN_FUNCTIONS` (public list of builtin names).
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                usage: $usage:literal,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        struct BuiltinDef {
            name:  &'static str,
            arity: Arity,
            usage: &'static str,
            func:  BuiltinFn,
        }
        static BUILTIN_TABLE: &[BuiltinDef] = &[
            $(
                BuiltinDef { name: $name, arity: $arity, usage: $usage, func: $func },
            )*
        ];
        pub const BUILTIN_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

builtin_functions! {
    "str"         => { arity: Arity::Exact(1), usage: "str(x)", func: builtin::str_fn },
    "num"         => { arity: Arity::Exact(1), usage: "num(x)", func: builtin::num },
    "len"         => { arity: Arity::Exact(1), usage: "len(x)", func: builtin::len },
    "input"       => { arity: Arity::OneOf(&[0, 1]), usage: "input([prompt])", func: builtin::input },
    "push"        => { arity: Arity::Exact(2), usage: "push(array, value)", func: array_ops::push },
    "pop"         => { arity: Arity::Exact(1), usage: "pop(array)", func: array_ops::pop },
    "insert"      => { arity: Arity::Exact(3), usage: "insert(array, index, value)", func: array_ops::insert },
    "remove"      => { arity: Arity::Exact(2), usage: "remove(array, index)", func: array_ops::remove },
    "has"         => { arity: Arity::Exact(2), usage: "has(map, key)", func: map_ops::has },
    "get"         => { arity: Arity::Exact(3), usage: "get(map, key, default)", func: map_ops::get },
    "keys"        => { arity: Arity::Exact(1), usage: "keys(map)", func: map_ops::keys },
    "values"      => { arity: Arity::Exact(1), usage: "values(map)", func: map_ops::values },
    "items"       => { arity: Arity::Exact(1), usage: "items(map)", func: map_ops::items },
    "del"         => { arity: Arity::Exact(2), usage: "del(map, key)", func: map_ops::del },
    "clear"       => { arity: Arity::Exact(1), usage: "clear(map)", func: map_ops::clear },
    "readfile"    => { arity: Arity::Exact(1), usage: "readfile(path)", func: file_ops::readfile },
    "writefile"   => { arity: Arity::Exact(2), usage: "writefile(path, value)", func: file_ops::writefile },
    "appendfile"  => { arity: Arity::Exact(2), usage: "appendfile(path, value)", func: file_ops::appendfile },
    "exists"      => { arity: Arity::Exact(1), usage: "exists(path)", func: file_ops::exists },
    "lineinput"   => { arity: Arity::Exact(1), usage: "lineinput(handle)", func: file_ops::lineinput },
    "eof"         => { arity: Arity::Exact(1), usage: "eof(handle)", func: file_ops::eof },
    "lower"       => { arity: Arity::Exact(1), usage: "lower(s)", func: string_ops::lower },
    "upper"       => { arity: Arity::Exact(1), usage: "upper(s)", func: string_ops::upper },
    "trim"        => { arity: Arity::OneOf(&[1, 2]), usage: "trim(s [,cutset])", func: string_ops::trim },
    "ltrim"       => { arity: Arity::OneOf(&[1, 2]), usage: "ltrim(s [,cutset])", func: string_ops::ltrim },
    "rtrim"       => { arity: Arity::OneOf(&[1, 2]), usage: "rtrim(s [,cutset])", func: string_ops::rtrim },
    "contains"    => { arity: Arity::Exact(2), usage: "contains(s, sub)", func: string_ops::contains },
    "startswith"  => { arity: Arity::Exact(2), usage: "startswith(s, prefix)", func: string_ops::startswith },
    "endswith"    => { arity: Arity::Exact(2), usage: "endswith(s, suffix)", func: string_ops::endswith },
    "replace"     => { arity: Arity::OneOf(&[3, 4]), usage: "replace(s, old, new [,n])", func: string_ops::replace },
    "split"       => { arity: Arity::Exact(2), usage: "split(s, sep)", func: string_ops::split },
    "join"        => { arity: Arity::Exact(2), usage: "join(array, sep)", func: string_ops::join },
    "indexof"     => { arity: Arity::Exact(2), usage: "indexof(s, sub)", func: string_ops::indexof },
    "lastindexof" => { arity: Arity::Exact(2), usage: "lastindexof(s, sub)", func: string_ops::lastindexof },
    "repeat"      => { arity: Arity::Exact(2), usage: "repeat(s, n)", func: string_ops::repeat },
    "substr"      => { arity: Arity::OneOf(&[2, 3]), usage: "substr(s, start [,len])", func: string_ops::substr },
}

impl Arity {
    /// Tests whether the given argument count satisfies this arity
    /// constraint.
    fn check(self, n: usize) -> bool {
        match self {
            Self::Exact(m) => n == m,
            Self::OneOf(options) => options.contains(&n),
        }
    }
}

impl std::fmt::Display for Arity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact(1) => write!(f, "1 arg"),
            Self::Exact(n) => write!(f, "{n} args"),
            Self::OneOf(options) => {
                let counts: Vec<String> = options.iter().map(ToString::to_string).collect();
                write!(f, "{} args", counts.join(" or "))
            },
        }
    }
}

impl Interpreter {
    /// Evaluates a function call.
    ///
    /// Resolution checks user-defined functions first, so a user function
    /// may shadow a builtin of the same name. Unknown names are runtime
    /// errors.
    ///
    /// # Parameters
    /// - `callee`: Function name.
    /// - `args`: Unevaluated argument expressions.
    /// - `span`: Call position for error reporting.
    ///
    /// # Returns
    /// The function result.
    pub(crate) fn eval_call(&mut self, callee: &str, args: &[Expr], span: Span) -> EvalResult<Value> {
        if let Some(decl) = self.functions.get(callee).cloned() {
            return self.eval_user_call(&decl, args, span);
        }
        self.eval_builtin(callee, args, span)
    }

    /// Executes a user-defined function.
    ///
    /// Arguments are fully evaluated left to right, then a fresh frame is
    /// pushed and the parameters bound positionally. The body must finish
    /// via `return`; falling off the end is an error, as is a `break` or
    /// `continue` escaping the body.
    fn eval_user_call(&mut self,
                      decl: &Rc<FunctionDecl>,
                      args: &[Expr],
                      span: Span)
                      -> EvalResult<Value> {
        if args.len() != decl.params.len() {
            return Err(self.fail(RuntimeError::ArityMismatch { name: decl.name.clone(),
                                                               expected: decl.params.len(),
                                                               got: args.len(),
                                                               span }));
        }

        let mut arg_values = Vec::with_capacity(args.len());
        for arg in args {
            arg_values.push(self.eval_expr(arg)?);
        }

        self.call_stack.push(decl.name.clone());
        self.push_frame();

        for (param, value) in decl.params.iter().zip(arg_values) {
            self.current_env().insert(param.clone(), value);
        }

        let flow = self.exec_block(&decl.body);

        // the error is built before the frame and stack entry go away so the
        // diagnostic still shows this call
        let outcome = match flow {
            Ok(Flow::Return(value)) => Ok(value),
            Ok(Flow::Normal) => {
                Err(self.fail(RuntimeError::NoReturnValue { name: decl.name.clone(),
                                                            span: decl.span, }))
            },
            Ok(Flow::Break(span)) => Err(self.fail(RuntimeError::BreakOutsideLoop { span })),
            Ok(Flow::Continue(span)) => Err(self.fail(RuntimeError::ContinueOutsideLoop { span })),
            Err(e) => Err(e),
        };

        self.pop_frame();
        self.call_stack.pop();

        outcome
    }

    /// Executes a builtin after evaluating and arity-checking arguments.
    fn eval_builtin(&mut self, name: &str, args: &[Expr], span: Span) -> EvalResult<Value> {
        let Some(def) = BUILTIN_TABLE.iter().find(|b| b.name == name) else {
            return Err(self.fail(RuntimeError::UndefinedFunction { name: name.to_string(),
                                                                   span }));
        };

        let mut values = Vec::with_capacity(args.len());
        for arg in args {
            values.push(self.eval_expr(arg)?);
        }

        if !def.arity.check(values.len()) {
            return Err(self.fail(RuntimeError::Usage { message: format!("{}() expects {}: {}",
                                                                        def.name,
                                                                        def.arity,
                                                                        def.usage),
                                                       span }));
        }

        (def.func)(self, &values, span)
    }
}
