//! Data models for the Mizuki admin dashboard.
//!
//! Field names match what the dashboard UI sends and expects.

mod collection;
mod git;
mod media;
mod post;

pub use collection::*;
pub use git::*;
pub use media::*;
pub use post::*;
