/// Binary operator dispatch.
///
/// Routes each operator to its evaluation rule: short-circuit logic, the
/// overloaded `+`, numeric arithmetic, and structural equality.
pub mod core;

/// Ordering comparisons.
///
/// `<`, `>`, `<=`, `>=` over two numbers or two strings.
pub mod comparison;
