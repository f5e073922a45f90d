//! Record identifiers, redacted secrets, and the shared access-token cache.

pub mod id;
pub mod token;

pub use id::*;
pub use token::{cache::*, metrics::*, secret::*};
