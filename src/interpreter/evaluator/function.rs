/// Call resolution and the built-in table.
///
/// User functions are checked first, then built-ins; an unknown name is a
/// runtime error.
pub mod core;

/// Core built-ins: conversion (`str`, `num`), `len`, and `input`.
pub mod builtin;

/// Array built-ins: `push`, `pop`, `insert`, `remove`. All mutate in place
/// through the shared reference.
pub mod array_ops;

/// Map built-ins: `has`, `get`, `keys`, `values`, `items`, `del`, `clear`.
pub mod map_ops;

/// String built-ins, all code-point aware where positions are involved.
pub mod string_ops;

/// Whole-file and handle-based I/O built-ins.
pub mod file_ops;
