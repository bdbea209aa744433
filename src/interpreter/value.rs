/// Core value representation.
///
/// Defines the `Value` enum with its scalar variants and the two
/// shared-reference container variants, together with the canonical string
/// rendering used by `print`, `str()`, and string concatenation.
pub mod core;
