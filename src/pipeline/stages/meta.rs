//! Metadata extraction stage.

use crate::content::read_file_meta;
use crate::hooks::{HookPayload, names};
use crate::pipeline::{PipelineContext, PipelineError, RequestState, Stage};

/// Stage that reads the page metadata from the content header.
///
/// `get_file_meta` subscribers may supply the metadata themselves, in
/// which case the header is not parsed.
pub struct FileMetaStage;

impl Stage for FileMetaStage {
    fn name(&self) -> &'static str {
        "file-meta"
    }

    fn process(
        &self,
        ctx: &PipelineContext,
        state: &mut RequestState,
    ) -> Result<(), PipelineError> {
        ctx.fire(
            names::BEFORE_FILE_META,
            &state.settings,
            &state.resolver,
            &mut HookPayload::BeforeFileMeta {
                content: &state.raw,
                headers: &mut state.headers,
            },
        )?;

        let mut meta = None;
        ctx.fire(
            names::GET_FILE_META,
            &state.settings,
            &state.resolver,
            &mut HookPayload::GetFileMeta {
                content: &state.raw,
                headers: &state.headers,
                meta: &mut meta,
            },
        )?;
        state.meta = meta.unwrap_or_else(|| {
            read_file_meta(&state.raw, &state.headers, &state.settings.date_format)
        });

        ctx.fire(
            names::AFTER_FILE_META,
            &state.settings,
            &state.resolver,
            &mut HookPayload::AfterFileMeta {
                content: &state.raw,
                meta: &mut state.meta,
            },
        )?;
        Ok(())
    }
}
