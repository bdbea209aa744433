use crate::{
    ast::Span,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        value::core::Value,
    },
};

fn usage(interp: &Interpreter, message: &str, span: Span) -> crate::error::Diagnostic {
    interp.fail(RuntimeError::Usage { message: message.to_string(),
                                      span })
}

/// Whether a key is present in a map.
pub fn has(interp: &mut Interpreter, args: &[Value], span: Span) -> EvalResult<Value> {
    let (Value::Map(entries), Value::Str(key)) = (&args[0], &args[1]) else {
        return Err(usage(interp, "has() expects (map, string)", span));
    };
    Ok(Value::Bool(entries.borrow().contains_key(key)))
}

/// Looks up a key, returning the given default when it is absent.
pub fn get(interp: &mut Interpreter, args: &[Value], span: Span) -> EvalResult<Value> {
    let (Value::Map(entries), Value::Str(key)) = (&args[0], &args[1]) else {
        return Err(usage(interp, "get() expects (map, string, default)", span));
    };

    let found = entries.borrow().get(key).cloned();
    Ok(found.unwrap_or_else(|| args[2].clone()))
}

/// The keys of a map as a fresh array of strings, sorted.
pub fn keys(interp: &mut Interpreter, args: &[Value], span: Span) -> EvalResult<Value> {
    let Value::Map(entries) = &args[0] else {
        return Err(usage(interp, "keys() expects a map", span));
    };

    let keys = entries.borrow()
                      .keys()
                      .map(|key| Value::Str(key.clone()))
                      .collect();
    Ok(Value::array(keys))
}

/// The values of a map as a fresh array, ordered by sorted key.
pub fn values(interp: &mut Interpreter, args: &[Value], span: Span) -> EvalResult<Value> {
    let Value::Map(entries) = &args[0] else {
        return Err(usage(interp, "values() expects a map", span));
    };

    let values = entries.borrow().values().cloned().collect();
    Ok(Value::array(values))
}

/// The entries of a map as an array of `[key, value]` pairs, ordered by
/// sorted key.
pub fn items(interp: &mut Interpreter, args: &[Value], span: Span) -> EvalResult<Value> {
    let Value::Map(entries) = &args[0] else {
        return Err(usage(interp, "items() expects a map", span));
    };

    let pairs = entries.borrow()
                       .iter()
                       .map(|(key, value)| {
                           Value::array(vec![Value::Str(key.clone()), value.clone()])
                       })
                       .collect();
    Ok(Value::array(pairs))
}

/// Deletes a key in place. Deleting an absent key is not an error.
pub fn del(interp: &mut Interpreter, args: &[Value], span: Span) -> EvalResult<Value> {
    let (Value::Map(entries), Value::Str(key)) = (&args[0], &args[1]) else {
        return Err(usage(interp, "del() expects (map, string)", span));
    };

    entries.borrow_mut().remove(key);
    Ok(Value::Null)
}

/// Empties a map in place.
pub fn clear(interp: &mut Interpreter, args: &[Value], span: Span) -> EvalResult<Value> {
    let Value::Map(entries) = &args[0] else {
        return Err(usage(interp, "clear() expects a map", span));
    };

    entries.borrow_mut().clear();
    Ok(Value::Null)
}
