use crate::{
    ast::Span,
    error::{Diagnostic, RuntimeError},
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        value::core::Value,
    },
};

fn usage(interp: &Interpreter, message: String, span: Span) -> Diagnostic {
    interp.fail(RuntimeError::Usage { message, span })
}

/// Extracts a string argument or fails with a builtin-specific message.
fn string_arg<'a>(interp: &Interpreter,
                  value: &'a Value,
                  message: &str,
                  span: Span)
                  -> Result<&'a str, Diagnostic> {
    match value {
        Value::Str(s) => Ok(s),
        _ => Err(usage(interp, message.to_string(), span)),
    }
}

/// Lowercases a string (full Unicode case mapping).
pub fn lower(interp: &mut Interpreter, args: &[Value], span: Span) -> EvalResult<Value> {
    let s = string_arg(interp, &args[0], "lower() expects 1 string arg", span)?;
    Ok(Value::Str(s.to_lowercase()))
}

/// Uppercases a string (full Unicode case mapping).
pub fn upper(interp: &mut Interpreter, args: &[Value], span: Span) -> EvalResult<Value> {
    let s = string_arg(interp, &args[0], "upper() expects 1 string arg", span)?;
    Ok(Value::Str(s.to_uppercase()))
}

/// Trims both ends: whitespace by default, or the code points of an
/// explicit cutset.
pub fn trim(interp: &mut Interpreter, args: &[Value], span: Span) -> EvalResult<Value> {
    let s = string_arg(interp, &args[0], "trim() first arg must be a string", span)?;

    match args.get(1) {
        None => Ok(Value::Str(s.trim().to_string())),
        Some(cutset) => {
            let cutset = string_arg(interp, cutset, "trim() cutset must be a string", span)?;
            Ok(Value::Str(s.trim_matches(|c| cutset.contains(c)).to_string()))
        },
    }
}

/// Trims the start: whitespace by default, or an explicit cutset.
pub fn ltrim(interp: &mut Interpreter, args: &[Value], span: Span) -> EvalResult<Value> {
    let s = string_arg(interp, &args[0], "ltrim() first arg must be a string", span)?;

    match args.get(1) {
        None => Ok(Value::Str(s.trim_start().to_string())),
        Some(cutset) => {
            let cutset = string_arg(interp, cutset, "ltrim() cutset must be a string", span)?;
            Ok(Value::Str(s.trim_start_matches(|c| cutset.contains(c)).to_string()))
        },
    }
}

/// Trims the end: whitespace by default, or an explicit cutset.
pub fn rtrim(interp: &mut Interpreter, args: &[Value], span: Span) -> EvalResult<Value> {
    let s = string_arg(interp, &args[0], "rtrim() first arg must be a string", span)?;

    match args.get(1) {
        None => Ok(Value::Str(s.trim_end().to_string())),
        Some(cutset) => {
            let cutset = string_arg(interp, cutset, "rtrim() cutset must be a string", span)?;
            Ok(Value::Str(s.trim_end_matches(|c| cutset.contains(c)).to_string()))
        },
    }
}

/// Substring membership test.
pub fn contains(interp: &mut Interpreter, args: &[Value], span: Span) -> EvalResult<Value> {
    let message = "contains() expects 2 string args: contains(s, sub)";
    let s = string_arg(interp, &args[0], message, span)?;
    let sub = string_arg(interp, &args[1], message, span)?;
    Ok(Value::Bool(s.contains(sub)))
}

/// Prefix test.
pub fn startswith(interp: &mut Interpreter, args: &[Value], span: Span) -> EvalResult<Value> {
    let message = "startswith() expects 2 string args: startswith(s, prefix)";
    let s = string_arg(interp, &args[0], message, span)?;
    let prefix = string_arg(interp, &args[1], message, span)?;
    Ok(Value::Bool(s.starts_with(prefix)))
}

/// Suffix test.
pub fn endswith(interp: &mut Interpreter, args: &[Value], span: Span) -> EvalResult<Value> {
    let message = "endswith() expects 2 string args: endswith(s, suffix)";
    let s = string_arg(interp, &args[0], message, span)?;
    let suffix = string_arg(interp, &args[1], message, span)?;
    Ok(Value::Bool(s.ends_with(suffix)))
}

/// Replaces occurrences of `old` with `new`.
///
/// With a fourth argument `n`, at most `n` replacements happen; `n == 0`
/// replaces nothing and a negative `n` (like omitting it) replaces all.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn replace(interp: &mut Interpreter, args: &[Value], span: Span) -> EvalResult<Value> {
    if !(args[0].is_string() && args[1].is_string() && args[2].is_string()) {
        return Err(usage(interp,
                         "replace() expects string args for s/old/new".to_string(),
                         span));
    }
    let (Value::Str(s), Value::Str(old), Value::Str(new)) = (&args[0], &args[1], &args[2]) else {
        unreachable!()
    };

    let count = match args.get(3) {
        None => -1,
        Some(Value::Number(n)) => *n as i64,
        Some(_) => {
            return Err(usage(interp, "replace() n must be a number".to_string(), span));
        },
    };

    let replaced = if count < 0 {
        s.replace(old.as_str(), new)
    } else {
        s.replacen(old.as_str(), new, count as usize)
    };
    Ok(Value::Str(replaced))
}

/// Splits a string on a separator.
///
/// An empty separator splits into individual code points.
pub fn split(interp: &mut Interpreter, args: &[Value], span: Span) -> EvalResult<Value> {
    let message = "split() expects 2 string args: split(s, sep)";
    let s = string_arg(interp, &args[0], message, span)?;
    let sep = string_arg(interp, &args[1], message, span)?;

    let parts: Vec<Value> = if sep.is_empty() {
        s.chars().map(|c| Value::Str(c.to_string())).collect()
    } else {
        s.split(sep).map(|part| Value::Str(part.to_string())).collect()
    };

    Ok(Value::array(parts))
}

/// Joins an array with a separator; each element is rendered canonically.
pub fn join(interp: &mut Interpreter, args: &[Value], span: Span) -> EvalResult<Value> {
    let Value::Array(elements) = &args[0] else {
        return Err(usage(interp, "join() first arg must be an array".to_string(), span));
    };
    let sep = string_arg(interp, &args[1], "join() sep must be a string", span)?;

    let rendered: Vec<String> = elements.borrow().iter().map(ToString::to_string).collect();
    Ok(Value::Str(rendered.join(sep)))
}

/// The code-point position of the first occurrence of `sub`, or `-1`.
///
/// An empty needle is found at position `0`.
#[allow(clippy::cast_precision_loss)]
pub fn indexof(interp: &mut Interpreter, args: &[Value], span: Span) -> EvalResult<Value> {
    let message = "indexof() expects 2 string args: indexof(s, sub)";
    let s = string_arg(interp, &args[0], message, span)?;
    let sub = string_arg(interp, &args[1], message, span)?;
    Ok(Value::Number(rune_index_of(s, sub) as f64))
}

/// The code-point position of the last occurrence of `sub`, or `-1`.
///
/// An empty needle is found at the end of the string.
#[allow(clippy::cast_precision_loss)]
pub fn lastindexof(interp: &mut Interpreter, args: &[Value], span: Span) -> EvalResult<Value> {
    let message = "lastindexof() expects 2 string args: lastindexof(s, sub)";
    let s = string_arg(interp, &args[0], message, span)?;
    let sub = string_arg(interp, &args[1], message, span)?;
    Ok(Value::Number(rune_last_index_of(s, sub) as f64))
}

/// Repeats a string `n` times; `n` must be non-negative.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn repeat(interp: &mut Interpreter, args: &[Value], span: Span) -> EvalResult<Value> {
    let (Value::Str(s), Value::Number(n)) = (&args[0], &args[1]) else {
        return Err(usage(interp,
                         "repeat() expects (string, number): repeat(s, n)".to_string(),
                         span));
    };

    let n = *n as i64;
    if n < 0 {
        return Err(usage(interp, "repeat() n must be >= 0".to_string(), span));
    }

    Ok(Value::Str(s.repeat(n as usize)))
}

/// A code-point substring starting at `start`, optionally limited to `len`
/// code points.
///
/// `start` must lie in `[0, len(s)]`; a negative length is out of range. A
/// length running past the end is clamped.
#[allow(clippy::cast_possible_truncation, clippy::float_cmp)]
pub fn substr(interp: &mut Interpreter, args: &[Value], span: Span) -> EvalResult<Value> {
    let (Value::Str(s), Value::Number(start)) = (&args[0], &args[1]) else {
        return Err(usage(interp,
                         "substr() expects (string, number [,number])".to_string(),
                         span));
    };

    let start_idx = *start as i64;
    if start_idx as f64 != *start {
        return Err(usage(interp, "substr() start must be an integer".to_string(), span));
    }

    let length = match args.get(2) {
        None => None,
        Some(Value::Number(len)) => {
            let len_idx = *len as i64;
            if len_idx as f64 != *len {
                return Err(usage(interp, "substr() len must be an integer".to_string(), span));
            }
            Some(len_idx)
        },
        Some(_) => {
            return Err(usage(interp, "substr() len must be a number".to_string(), span));
        },
    };

    match substr_runes(s, start_idx, length) {
        Some(out) => Ok(Value::Str(out)),
        None => Err(usage(interp, "substr() out of range".to_string(), span)),
    }
}

/// Finds `needle` in `hay` by code-point position; `-1` when absent.
#[allow(clippy::cast_possible_wrap)]
fn rune_index_of(hay: &str, needle: &str) -> i64 {
    let hs: Vec<char> = hay.chars().collect();
    let ns: Vec<char> = needle.chars().collect();

    if ns.is_empty() {
        return 0;
    }
    if ns.len() > hs.len() {
        return -1;
    }

    for i in 0..=(hs.len() - ns.len()) {
        if hs[i..i + ns.len()] == ns[..] {
            return i as i64;
        }
    }
    -1
}

/// Finds the last occurrence of `needle` in `hay` by code-point position.
#[allow(clippy::cast_possible_wrap)]
fn rune_last_index_of(hay: &str, needle: &str) -> i64 {
    let hs: Vec<char> = hay.chars().collect();
    let ns: Vec<char> = needle.chars().collect();

    if ns.is_empty() {
        return hs.len() as i64;
    }
    if ns.len() > hs.len() {
        return -1;
    }

    for i in (0..=(hs.len() - ns.len())).rev() {
        if hs[i..i + ns.len()] == ns[..] {
            return i as i64;
        }
    }
    -1
}

/// Code-point substring; `None` when the bounds are invalid.
#[allow(clippy::cast_sign_loss)]
fn substr_runes(s: &str, start: i64, length: Option<i64>) -> Option<String> {
    let rs: Vec<char> = s.chars().collect();

    if start < 0 || start as usize > rs.len() {
        return None;
    }
    let start = start as usize;

    match length {
        None => Some(rs[start..].iter().collect()),
        Some(len) if len < 0 => None,
        Some(len) => {
            let end = (start + len as usize).min(rs.len());
            Some(rs[start..end].iter().collect())
        },
    }
}
