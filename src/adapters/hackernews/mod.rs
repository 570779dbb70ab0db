//! HackerNews listing pages.

pub mod source;

pub use source::HackerNewsSource;
