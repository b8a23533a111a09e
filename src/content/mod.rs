//! Content module - documents, front-matter, compilation and loading

mod error;
mod frontmatter;
pub mod loader;
mod markdown;
mod post;

pub use error::ContentError;
pub use frontmatter::FrontMatter;
pub use loader::{ContentLoader, ContentRegistry};
pub use markdown::Compiler;
pub use post::{Page, Post};
