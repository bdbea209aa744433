/// A source position attached to tokens and syntax nodes.
///
/// Both fields are 1-based. Columns count Unicode code points, not bytes, so
/// diagnostics line up with what an editor shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// The 1-based source line.
    pub line: usize,
    /// The 1-based column of the first code point.
    pub col:  usize,
}

impl Span {
    /// Creates a span from a line and column pair.
    #[must_use]
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

/// An abstract syntax tree node representing an expression.
///
/// `Expr` covers literals, variable references, unary and binary operations,
/// calls, array and map literals, and indexing. Every variant carries the
/// span of the token that introduced it.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A double-quoted string literal, already unescaped.
    StringLit {
        /// The literal text.
        value: String,
        /// Source position of the literal.
        span:  Span,
    },
    /// A numeric literal.
    NumberLit {
        /// The literal value.
        value: f64,
        /// Source position of the literal.
        span:  Span,
    },
    /// A boolean literal: `true` or `false`.
    BoolLit {
        /// The literal value.
        value: bool,
        /// Source position of the literal.
        span:  Span,
    },
    /// A reference to a variable by name.
    Identifier {
        /// Name of the variable.
        name: String,
        /// Source position of the identifier.
        span: Span,
    },
    /// A unary operation (`not`).
    Unary {
        /// The operator.
        op:    UnaryOp,
        /// The operand expression.
        right: Box<Self>,
        /// Source position of the operator.
        span:  Span,
    },
    /// A binary operation.
    Binary {
        /// Left operand.
        left:  Box<Self>,
        /// The operator.
        op:    BinaryOp,
        /// Right operand.
        right: Box<Self>,
        /// Source position of the operator.
        span:  Span,
    },
    /// A call such as `push(a, 1)`. The callee is a bare name resolved
    /// against user functions first, then built-ins, at call time.
    Call {
        /// Name of the called function.
        callee: String,
        /// Argument expressions, evaluated left to right.
        args:   Vec<Self>,
        /// Source position of the callee.
        span:   Span,
    },
    /// An array literal such as `[1, 2, 3]`.
    ArrayLit {
        /// Element expressions.
        elements: Vec<Self>,
        /// Source position of the opening bracket.
        span:     Span,
    },
    /// A map literal such as `{"a": 1}`. Keys are string literals.
    MapLit {
        /// Key/value entries in source order.
        entries: Vec<MapEntry>,
        /// Source position of the opening brace.
        span:    Span,
    },
    /// An indexing expression such as `a[0]` or `m["k"]`.
    Index {
        /// The indexed expression.
        left:  Box<Self>,
        /// The index expression.
        index: Box<Self>,
        /// Source position of the opening bracket.
        span:  Span,
    },
}

impl Expr {
    /// Gets the source span of `self`.
    ///
    /// ## Example
    /// ```
    /// use bpl::ast::{Expr, Span};
    ///
    /// let expr = Expr::Identifier { name: "x".to_string(),
    ///                               span: Span::new(3, 7), };
    ///
    /// assert_eq!(expr.span(), Span::new(3, 7));
    /// ```
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::StringLit { span, .. }
            | Self::NumberLit { span, .. }
            | Self::BoolLit { span, .. }
            | Self::Identifier { span, .. }
            | Self::Unary { span, .. }
            | Self::Binary { span, .. }
            | Self::Call { span, .. }
            | Self::ArrayLit { span, .. }
            | Self::MapLit { span, .. }
            | Self::Index { span, .. } => *span,
        }
    }
}

/// One `"key": value` entry of a map literal.
#[derive(Debug, Clone, PartialEq)]
pub struct MapEntry {
    /// The string key.
    pub key:   String,
    /// The value expression.
    pub value: Expr,
}

/// A user-defined function declaration.
///
/// Declarations are registered by name when executed; calls look the name up
/// in the function table at call time, so redefinition replaces the prior
/// entry.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    /// The function name.
    pub name:   String,
    /// Parameter names, bound positionally on call.
    pub params: Vec<String>,
    /// The statements of the function body.
    pub body:   Vec<Stmt>,
    /// Source position of the function name.
    pub span:   Span,
}

/// An abstract syntax tree node representing a statement.
///
/// Statements are newline-terminated; block statements run until a matching
/// `end`.
#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    /// `print expr` — render and write a line to the output stream.
    Print {
        /// The printed expression.
        value: Expr,
        /// Source position of the `print` keyword.
        span:  Span,
    },
    /// `print #N, expr` — render and write a line to an open file handle.
    PrintHandle {
        /// The file handle number.
        handle: i64,
        /// The printed expression.
        value:  Expr,
        /// Source position of the `print` keyword.
        span:   Span,
    },
    /// `name = expr`.
    Assign {
        /// The assigned variable name.
        name:  String,
        /// The assigned value.
        value: Expr,
        /// Source position of the variable name.
        span:  Span,
    },
    /// `name[index] = expr` — element assignment into an array or map.
    IndexAssign {
        /// The container variable name.
        name:  String,
        /// The index expression.
        index: Expr,
        /// The assigned value.
        value: Expr,
        /// Source position of the opening bracket.
        span:  Span,
    },
    /// A call evaluated for its effects, result discarded.
    Expression {
        /// The expression to evaluate.
        expr: Expr,
        /// Source position of the first token.
        span: Span,
    },
    /// `if cond ... [else ...] end`.
    If {
        /// The condition; must evaluate to a boolean.
        condition:   Expr,
        /// Statements of the then-branch.
        then_branch: Vec<Self>,
        /// Statements of the else-branch (empty when absent).
        else_branch: Vec<Self>,
        /// Source position of the `if` keyword.
        span:        Span,
    },
    /// `while cond ... end`.
    While {
        /// The condition, checked before each iteration.
        condition: Expr,
        /// The loop body.
        body:      Vec<Self>,
        /// Source position of the `while` keyword.
        span:      Span,
    },
    /// `for v = start to end [step s] ... end`.
    For {
        /// The loop variable name.
        var:   String,
        /// The starting value.
        start: Expr,
        /// The bound the counter runs to (inclusive).
        end:   Expr,
        /// Optional step; defaults to `1` or `-1` by direction.
        step:  Option<Expr>,
        /// The loop body.
        body:  Vec<Self>,
        /// Source position of the loop variable.
        span:  Span,
    },
    /// `for each v[, i] in iterable ... end`.
    ForEach {
        /// Receives each element (arrays) or key (maps).
        var:       String,
        /// Optional variable receiving the zero-based position.
        index_var: Option<String>,
        /// The iterated expression; must be an array or map.
        iterable:  Expr,
        /// The loop body.
        body:      Vec<Self>,
        /// Source position of the `for` keyword.
        span:      Span,
    },
    /// `function name(params) ... end`.
    Function(FunctionDecl),
    /// `return expr` — only valid inside a function.
    Return {
        /// The returned value.
        value: Expr,
        /// Source position of the `return` keyword.
        span:  Span,
    },
    /// `break` — only valid inside a loop.
    Break {
        /// Source position of the `break` keyword.
        span: Span,
    },
    /// `continue` — only valid inside a loop.
    Continue {
        /// Source position of the `continue` keyword.
        span: Span,
    },
    /// `import "path"` — load and execute a module once.
    Import {
        /// The import path as written.
        path: String,
        /// Source position of the `import` keyword.
        span: Span,
    },
    /// `open #N, path, mode`.
    Open {
        /// The file handle number.
        handle: i64,
        /// The path expression.
        path:   Expr,
        /// The mode expression (`"r"`, `"w"`, or `"a"`).
        mode:   Expr,
        /// Source position of the `open` keyword.
        span:   Span,
    },
    /// `close #N`.
    Close {
        /// The file handle number.
        handle: i64,
        /// Source position of the `close` keyword.
        span:   Span,
    },
}

impl Stmt {
    /// Gets the source span of `self`.
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Print { span, .. }
            | Self::PrintHandle { span, .. }
            | Self::Assign { span, .. }
            | Self::IndexAssign { span, .. }
            | Self::Expression { span, .. }
            | Self::If { span, .. }
            | Self::While { span, .. }
            | Self::For { span, .. }
            | Self::ForEach { span, .. }
            | Self::Return { span, .. }
            | Self::Break { span }
            | Self::Continue { span }
            | Self::Import { span, .. }
            | Self::Open { span, .. }
            | Self::Close { span, .. } => *span,
            Self::Function(decl) => decl.span,
        }
    }
}

/// Represents a binary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOp {
    /// Addition, array concatenation, or string concatenation (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Equal to (`==`)
    Equal,
    /// Not equal to (`!=`)
    NotEqual,
    /// Less than (`<`)
    Less,
    /// Greater than (`>`)
    Greater,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Logical and (`and`), short-circuiting
    And,
    /// Logical or (`or`), short-circuiting
    Or,
}

/// Represents a unary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOp {
    /// Logical negation (`not`).
    Not,
}

impl std::fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use BinaryOp::{
            Add, And, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mul, NotEqual, Or, Sub,
        };
        let operator = match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Equal => "==",
            NotEqual => "!=",
            Less => "<",
            Greater => ">",
            LessEqual => "<=",
            GreaterEqual => ">=",
            And => "and",
            Or => "or",
        };
        write!(f, "{operator}")
    }
}

impl std::fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Not => write!(f, "not"),
        }
    }
}
