//! Mock attachment and consultation.
//!
//! - [`MockRegistry`]: the per-host mapping of method name to response
//! - [`MockHandle`]: fluent configuration of one attached response
//! - [`MockResponse`]: the ordered queue of return tuples behind each entry

pub mod registry;
pub mod response;

pub use registry::{MockHandle, MockRegistry};
pub use response::MockResponse;
