//! DNS MX resolution.
//!
//! The public entry point is [`resolve_mx`], which performs a synchronous,
//! time-bounded lookup using the system resolver configuration and returns the
//! records in ascending preference order.

mod error;
mod resolver;
mod types;

pub use error::MxError;
pub use resolver::{LookupMx, SystemResolver, resolve_mx, resolve_with};
pub use types::MxRecord;
