//! Page index stage.

use crate::content::{Indexer, anchor_directory, locate_neighbors};
use crate::hooks::{HookPayload, names};
use crate::pipeline::{PipelineContext, PipelineError, RequestState, Stage};

/// Stage that indexes the pages next to the current one.
///
/// The index covers the directory of the served file (and its subdirectories
/// with `index_recursive`). `get_index`
/// subscribers may supply the whole index; otherwise each page built by the
/// indexer passes through `get_page_data`.
pub struct IndexStage;

impl Stage for IndexStage {
    fn name(&self) -> &'static str {
        "index"
    }

    fn process(
        &self,
        ctx: &PipelineContext,
        state: &mut RequestState,
    ) -> Result<(), PipelineError> {
        let mut directory = anchor_directory(&state.file);
        ctx.fire(
            names::BEFORE_INDEX,
            &state.settings,
            &state.resolver,
            &mut HookPayload::BeforeIndex {
                directory: &mut directory,
            },
        )?;

        let mut pages = None;
        ctx.fire(
            names::GET_INDEX,
            &state.settings,
            &state.resolver,
            &mut HookPayload::GetIndex {
                directory: &directory,
                pages: &mut pages,
            },
        )?;

        state.index = match pages {
            Some(pages) => pages,
            None => {
                let settings = &state.settings;
                let resolver = &state.resolver;
                Indexer::new(settings, ctx.content_root, &state.headers, ctx.markup).build_index(
                    &directory,
                    |data, meta| {
                        ctx.fire(
                            names::GET_PAGE_DATA,
                            settings,
                            resolver,
                            &mut HookPayload::GetPageData { data, meta },
                        )
                    },
                )?
            }
        };
        state.neighbors = locate_neighbors(&state.index, &state.file);

        ctx.fire(
            names::AFTER_INDEX,
            &state.settings,
            &state.resolver,
            &mut HookPayload::AfterIndex {
                pages: &mut state.index,
                neighbors: &mut state.neighbors,
            },
        )?;
        Ok(())
    }
}
