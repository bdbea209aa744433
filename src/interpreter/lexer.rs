use logos::{FilterResult, Logos};

use crate::{ast::Span, error::ParseError};

/// Errors the lexer can produce while scanning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexError {
    /// A character that cannot begin any token.
    #[default]
    UnexpectedCharacter,
    /// A string literal that was still open at the end of input.
    UnterminatedString,
}

/// Represents a lexical token in the source input.
///
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// Keywords are matched in exactly three case forms (`print`, `PRINT`,
/// `Print`); all other identifiers are case-sensitive. Newlines are tokens,
/// not whitespace.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(error = LexError)]
pub enum Token {
    /// Numeric literal tokens such as `42` or `3.14`. A decimal part is
    /// required after the dot.
    #[regex(r"[0-9]+(\.[0-9]+)?", |lex| lex.slice().parse().ok())]
    Number(f64),
    /// Double-quoted string literal tokens, stored unescaped. Recognized
    /// escapes are `\n`, `\t`, `\"`, and `\\`; an unrecognized escape keeps
    /// the backslash literally.
    #[token("\"", lex_string)]
    Str(String),
    /// Boolean literal tokens: `true` or `false`.
    #[token("true", parse_bool)]
    #[token("TRUE", parse_bool)]
    #[token("True", parse_bool)]
    #[token("false", parse_bool)]
    #[token("FALSE", parse_bool)]
    #[token("False", parse_bool)]
    Bool(bool),
    /// `print`
    #[token("print")]
    #[token("PRINT")]
    #[token("Print")]
    Print,
    /// `if`
    #[token("if")]
    #[token("IF")]
    #[token("If")]
    If,
    /// `else`
    #[token("else")]
    #[token("ELSE")]
    #[token("Else")]
    Else,
    /// `end`
    #[token("end")]
    #[token("END")]
    #[token("End")]
    End,
    /// `while`
    #[token("while")]
    #[token("WHILE")]
    #[token("While")]
    While,
    /// `for`
    #[token("for")]
    #[token("FOR")]
    #[token("For")]
    For,
    /// `to`
    #[token("to")]
    #[token("TO")]
    #[token("To")]
    To,
    /// `step`
    #[token("step")]
    #[token("STEP")]
    #[token("Step")]
    Step,
    /// `function`
    #[token("function")]
    #[token("FUNCTION")]
    #[token("Function")]
    Function,
    /// `return`
    #[token("return")]
    #[token("RETURN")]
    #[token("Return")]
    Return,
    /// `each`
    #[token("each")]
    #[token("EACH")]
    #[token("Each")]
    Each,
    /// `in`
    #[token("in")]
    #[token("IN")]
    #[token("In")]
    In,
    /// `break`
    #[token("break")]
    #[token("BREAK")]
    #[token("Break")]
    Break,
    /// `continue`
    #[token("continue")]
    #[token("CONTINUE")]
    #[token("Continue")]
    Continue,
    /// `import`
    #[token("import")]
    #[token("IMPORT")]
    #[token("Import")]
    Import,
    /// `open`
    #[token("open")]
    #[token("OPEN")]
    #[token("Open")]
    Open,
    /// `close`
    #[token("close")]
    #[token("CLOSE")]
    #[token("Close")]
    Close,
    /// `and`
    #[token("and")]
    #[token("AND")]
    #[token("And")]
    And,
    /// `or`
    #[token("or")]
    #[token("OR")]
    #[token("Or")]
    Or,
    /// `not`
    #[token("not")]
    #[token("NOT")]
    #[token("Not")]
    Not,
    /// Identifier tokens; variable or function names such as `x` or `push`.
    #[regex(r"[\p{L}_][\p{L}\p{Nd}_]*", |lex| lex.slice().to_string())]
    Ident(String),
    /// `#` when immediately followed by a digit (a file-handle prefix).
    /// Any other `#` begins a comment running to end of line.
    #[token("#", lex_hash)]
    Hash,
    /// `=`
    #[token("=")]
    Assign,
    /// `==`
    #[token("==")]
    Eq,
    /// `!=`
    #[token("!=")]
    NotEq,
    /// `<=`
    #[token("<=")]
    LessEq,
    /// `>=`
    #[token(">=")]
    GreaterEq,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `:`
    #[token(":")]
    Colon,
    /// `,`
    #[token(",")]
    Comma,
    /// Statement terminator.
    #[token("\n")]
    Newline,
    /// Spaces, tabs, and stray carriage returns.
    #[regex(r"[ \t\r\f]+", logos::skip)]
    Ignored,
}

impl Token {
    /// The token's kind name as used in parse error messages, e.g.
    /// `Expected an expression at 2:5 (got NEWLINE)`.
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Number(_) => "NUMBER",
            Self::Str(_) => "STRING",
            Self::Bool(true) => "TRUE",
            Self::Bool(false) => "FALSE",
            Self::Print => "PRINT",
            Self::If => "IF",
            Self::Else => "ELSE",
            Self::End => "END",
            Self::While => "WHILE",
            Self::For => "FOR",
            Self::To => "TO",
            Self::Step => "STEP",
            Self::Function => "FUNCTION",
            Self::Return => "RETURN",
            Self::Each => "EACH",
            Self::In => "IN",
            Self::Break => "BREAK",
            Self::Continue => "CONTINUE",
            Self::Import => "IMPORT",
            Self::Open => "OPEN",
            Self::Close => "CLOSE",
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
            Self::Ident(_) => "IDENT",
            Self::Hash => "HASH",
            Self::Assign => "ASSIGN",
            Self::Eq => "EQ",
            Self::NotEq => "NEQ",
            Self::LessEq => "LTE",
            Self::GreaterEq => "GTE",
            Self::Less => "LT",
            Self::Greater => "GT",
            Self::Plus => "PLUS",
            Self::Minus => "MINUS",
            Self::Star => "STAR",
            Self::Slash => "SLASH",
            Self::LParen => "LPAREN",
            Self::RParen => "RPAREN",
            Self::LBracket => "LBRACKET",
            Self::RBracket => "RBRACKET",
            Self::LBrace => "LBRACE",
            Self::RBrace => "RBRACE",
            Self::Colon => "COLON",
            Self::Comma => "COMMA",
            Self::Newline => "NEWLINE",
            Self::Ignored => "IGNORED",
        }
    }
}

/// Replaces CRLF and lone CR line endings with LF.
///
/// Both the lexer and the interpreter's diagnostic line table expect LF-only
/// text, so sources are normalized once before either sees them.
#[must_use]
pub fn normalize_newlines(source: &str) -> String {
    source.replace("\r\n", "\n").replace('\r', "\n")
}

/// Tokenizes a full source text into `(token, span)` pairs.
///
/// Spans are 1-based `(line, column)` positions of each token's first code
/// point. Comments and horizontal whitespace are dropped; newlines appear as
/// [`Token::Newline`].
///
/// # Errors
/// Returns a [`ParseError::IllegalToken`] for a character that cannot begin
/// any token or for a string literal left unterminated at end of input.
///
/// # Example
/// ```
/// use bpl::interpreter::lexer::{Token, tokenize};
///
/// let tokens = tokenize("x = 1\n").unwrap();
/// assert_eq!(tokens[0].0, Token::Ident("x".to_string()));
/// assert_eq!(tokens[1].0, Token::Assign);
/// assert_eq!(tokens[2].0, Token::Number(1.0));
/// assert_eq!(tokens[3].0, Token::Newline);
/// ```
pub fn tokenize(source: &str) -> Result<Vec<(Token, Span)>, ParseError> {
    let mut tokens = Vec::new();

    let mut line = 1;
    let mut line_start = 0;

    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        let range = lexer.span();
        let col = source[line_start..range.start].chars().count() + 1;
        let span = Span::new(line, col);

        match result {
            Ok(token) => {
                // The token slice may contain newlines (the Newline token
                // itself, or a string literal spanning lines); keep the line
                // accounting in step.
                let slice = lexer.slice();
                if let Some(last) = slice.rfind('\n') {
                    line += slice.matches('\n').count();
                    line_start = range.start + last + 1;
                }
                tokens.push((token, span));
            },
            Err(LexError::UnterminatedString) => {
                return Err(ParseError::IllegalToken { message:
                                                          "Unterminated string literal".to_string(),
                                                      span });
            },
            Err(LexError::UnexpectedCharacter) => {
                return Err(ParseError::IllegalToken { message: format!("Unexpected character {:?}",
                                                                       lexer.slice()),
                                                      span });
            },
        }
    }

    Ok(tokens)
}

/// Parses a boolean literal from the current token slice, in any of the
/// three accepted case forms.
fn parse_bool(lex: &logos::Lexer<Token>) -> Option<bool> {
    match lex.slice() {
        "true" | "TRUE" | "True" => Some(true),
        "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

/// Consumes the rest of a string literal after the opening quote.
///
/// Handles the four recognized escapes and keeps unknown escapes literally.
/// The literal may span multiple lines; reaching end of input without a
/// closing quote is an error.
fn lex_string(lex: &mut logos::Lexer<Token>) -> Result<String, LexError> {
    let mut out = String::new();
    let mut consumed = 0;

    let remainder = lex.remainder();
    let mut chars = remainder.chars().peekable();

    loop {
        match chars.next() {
            None => {
                lex.bump(consumed);
                return Err(LexError::UnterminatedString);
            },
            Some('"') => {
                lex.bump(consumed + 1);
                return Ok(out);
            },
            Some('\\') => match chars.peek() {
                Some('n') => {
                    out.push('\n');
                    chars.next();
                    consumed += 2;
                },
                Some('t') => {
                    out.push('\t');
                    chars.next();
                    consumed += 2;
                },
                Some('"') => {
                    out.push('"');
                    chars.next();
                    consumed += 2;
                },
                Some('\\') => {
                    out.push('\\');
                    chars.next();
                    consumed += 2;
                },
                _ => {
                    // Unknown escape; keep the backslash literally and let
                    // the following character lex as itself.
                    out.push('\\');
                    consumed += 1;
                },
            },
            Some(c) => {
                out.push(c);
                consumed += c.len_utf8();
            },
        }
    }
}

/// Decides between a file-handle prefix and a comment after seeing `#`.
///
/// A `#` immediately followed by a digit is a handle prefix; the digits lex
/// separately as a number. Any other `#` starts a comment which is consumed
/// to end of line, leaving the newline for the next token.
fn lex_hash(lex: &mut logos::Lexer<Token>) -> FilterResult<(), LexError> {
    let remainder = lex.remainder();
    match remainder.chars().next() {
        Some(c) if c.is_ascii_digit() => FilterResult::Emit(()),
        _ => {
            let line_end = remainder.find('\n').unwrap_or(remainder.len());
            lex.bump(line_end);
            FilterResult::Skip
        },
    }
}
