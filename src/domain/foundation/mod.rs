//! Foundation module - Shared domain primitives.
//!
//! Contains value objects and identifiers that form the vocabulary of the
//! TestCraft domain.

mod ids;
mod lenient;
mod percentage;
mod timestamp;

pub use ids::DocumentId;
pub use lenient::{
    lenient_list, lenient_opt_string, lenient_string, lenient_strings, or_default,
};
pub use percentage::{lenient_count, Percentage};
pub use timestamp::Timestamp;
