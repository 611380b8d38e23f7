//! Typed endpoint wrappers
//!
//! Each function is a thin call through [`ApiClient`](crate::ApiClient);
//! error reporting, session handling and redirects happen in the pipeline.

pub mod ai;
pub mod favorites;
pub mod ratings;
pub mod reviews;
pub mod submissions;
pub mod tools;
pub mod users;

use serde_json::Value;

use crate::error::Result;

/// Drop the `data` of an acknowledgement-only endpoint.
pub(crate) fn acknowledge(result: Result<Value>) -> Result<()> {
    result.map(|_| ())
}
