//! Layout templates, placeholder binding and component rendering

pub mod binder;
mod component;
mod layout;

pub use binder::Bindings;
pub use component::{ComponentParams, ComponentRenderer, TeraComponentRenderer};
pub use layout::LayoutRegistry;

/// Default layout of posts
pub const POST_LAYOUT: &str = "post";

/// Default layout of pages
pub const PAGE_LAYOUT: &str = "page";
