//! Render module - turns a compiled document body into a markup tree
//!
//! The renderer itself has no control flow beyond dispatching every node to
//! the handler registered for its [`HandlerTag`] in a [`SubstitutionTable`].

mod grid;
mod handlers;
mod link;
mod markup;
mod node;
mod renderer;

pub use grid::GridColumns;
pub use handlers::{Handler, HandlerTag, SubstitutionTable};
pub use link::{classify, LinkKind};
pub use markup::{Element, Markup};
pub use node::{
    Attributes, Body, CalloutNode, ElementNode, ImageNode, LinkNode, MultiImageNode, Node,
};
pub use renderer::Renderer;
