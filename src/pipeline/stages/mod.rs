//! Default pipeline stages.
//!
//! Each request passes through, in order:
//!
//! 1. **ConfigStage** - Layer the nearest section config over the site settings
//! 2. **RouteStage** - Normalize the request path
//! 3. **LoadContentStage** - Read the content file or a not-found page
//! 4. **FileMetaStage** - Read the header metadata
//! 5. **ParseContentStage** - Render the content to HTML
//! 6. **IndexStage** - Index the sibling pages and find the neighbors
//! 7. **RenderStage** - Render the page template

mod config;
mod index;
mod load;
mod meta;
mod parse;
mod render;
mod route;

pub use config::ConfigStage;
pub use index::IndexStage;
pub use load::{LoadContentStage, NOT_FOUND_PAGE};
pub use meta::FileMetaStage;
pub use parse::ParseContentStage;
pub use render::RenderStage;
pub use route::RouteStage;
