use crate::{
    ast::Span,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Interpreter},
        value::core::Value,
    },
};

/// Appends a value to an array in place.
pub fn push(interp: &mut Interpreter, args: &[Value], span: Span) -> EvalResult<Value> {
    let Value::Array(elements) = &args[0] else {
        return Err(interp.fail(RuntimeError::Usage { message:
                                                         "push() first arg must be an array".to_string(),
                                                     span }));
    };

    elements.borrow_mut().push(args[1].clone());
    Ok(Value::Null)
}

/// Removes and returns the last element of an array.
///
/// Popping an empty array is an error.
pub fn pop(interp: &mut Interpreter, args: &[Value], span: Span) -> EvalResult<Value> {
    let Value::Array(elements) = &args[0] else {
        return Err(interp.fail(RuntimeError::Usage { message:
                                                         "pop() first arg must be an array".to_string(),
                                                     span }));
    };

    let removed = elements.borrow_mut().pop();
    match removed {
        Some(value) => Ok(value),
        None => Err(interp.fail(RuntimeError::Usage { message: "pop() on empty array".to_string(),
                                                      span })),
    }
}

/// Inserts a value at an index, shifting later elements right.
///
/// The index may be anywhere in `[0, len]`; inserting at `len` appends.
#[allow(clippy::cast_sign_loss)]
pub fn insert(interp: &mut Interpreter, args: &[Value], span: Span) -> EvalResult<Value> {
    let Value::Array(elements) = &args[0] else {
        return Err(interp.fail(RuntimeError::Usage { message:
                                                         "insert() first arg must be an array".to_string(),
                                                     span }));
    };

    let idx = interp.to_index(&args[1], span)?;
    let mut elements = elements.borrow_mut();
    let size = elements.len();

    if idx < 0 || idx as usize > size {
        return Err(interp.fail(RuntimeError::Usage { message: format!("insert() index out of range (index {idx}, size {size})"),
                                                     span }));
    }

    elements.insert(idx as usize, args[2].clone());
    Ok(Value::Null)
}

/// Removes and returns the element at an index, shifting later elements
/// left.
#[allow(clippy::cast_sign_loss)]
pub fn remove(interp: &mut Interpreter, args: &[Value], span: Span) -> EvalResult<Value> {
    let Value::Array(elements) = &args[0] else {
        return Err(interp.fail(RuntimeError::Usage { message:
                                                         "remove() first arg must be an array".to_string(),
                                                     span }));
    };

    let idx = interp.to_index(&args[1], span)?;
    let mut elements = elements.borrow_mut();
    let size = elements.len();

    if idx < 0 || idx as usize >= size {
        return Err(interp.fail(RuntimeError::Usage { message: format!("remove() index out of range (index {idx}, size {size})"),
                                                     span }));
    }

    Ok(elements.remove(idx as usize))
}
