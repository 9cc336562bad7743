//! quire renders flat-file content sites.
//!
//! A request route is resolved to a content file, its header metadata is
//! read, the body is rendered to HTML, the sibling pages are indexed and the
//! result goes through a theme template. Plugins can observe and change
//! every step through named hooks.

pub mod config;
pub mod content;
pub mod hooks;
pub mod pipeline;
pub mod plugins;
pub mod render;
pub mod site;
pub mod util;

pub use site::Site;
