//! Flow engine: places estimated blocks into columns and pages
//!
//! - Break decisions and cursor state live in `engine`
//! - The resulting plan and its invariant checks live in `types`

mod engine;
mod types;

pub use engine::*;
pub use types::*;
