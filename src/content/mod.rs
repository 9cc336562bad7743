//! Content resolution, metadata and indexing.

mod files;
mod index;
mod markup;
mod meta;
mod resolver;

pub use files::find_files;
pub use index::{Indexer, Neighbors, PageEntry, PageIndex, anchor_directory, locate_neighbors};
pub use markup::{BASE_URL_PLACEHOLDER, Markdown, MarkupError, MarkupRenderer, parse_content};
pub use meta::{HeaderSpec, PageMetadata, format_date, read_file_meta};
pub use resolver::{ContentResolver, RequestPaths, normalize_route};
