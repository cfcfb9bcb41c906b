//! Filesystem stores for site content.
//!
//! The files on disk are the source of truth; nothing is cached between calls.

mod collections;
mod derived;
pub mod frontmatter;
mod media;
pub mod paths;
mod posts;
mod site_config;

pub use collections::*;
pub use derived::*;
pub use media::*;
pub use posts::*;
pub use site_config::*;
