#![forbid(unsafe_code)]

//! yamlsort: recursively sort the keys of a YAML document.
//!
//! Mapping keys are ordered byte-wise at every nesting level. Sequence order,
//! scalar values and anything the sorter cannot look into are preserved.

pub mod codec;
pub mod document;
pub mod error;
pub mod report;
pub mod sorter;

pub use document::{Document, Scalar};
pub use error::SortError;
pub use sorter::{KeyPath, Sorted, Warning, sort, sort_document};
