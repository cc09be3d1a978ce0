//! Marked 2 application discovery
//!
//! Finds every installed copy of Marked 2 via the system metadata index,
//! ranks the candidates, and resolves to a single preferred bundle path,
//! caching the choice in the preference store.

mod candidate;
mod locator;

pub use candidate::*;
pub use locator::*;
