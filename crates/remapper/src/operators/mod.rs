//! Operation implementations, grouped the way remapper authors think of them.
//!
//! Each `*_eval` function receives its validated arguments, the current value
//! and the evaluation scope. Nested remappers are evaluated through
//! [`crate::evaluate::eval`] so scope changes stay local to the operation.

pub mod ambient;
pub mod array;
pub mod branching;
pub mod calendar;
pub mod comparison;
pub mod date;
pub mod debug;
pub mod history;
pub mod input;
pub mod logical;
pub mod object;
pub mod random;
pub mod string;
pub mod type_ops;
