//! Request pipeline.
//!
//! A request passes through a fixed sequence of stages, each firing its
//! hooks around the work it does:
//! config → route → load content → file meta → parse content → index → render
//!
//! Custom stages can be inserted before or after any named stage.

mod context;
mod error;
mod profile;
mod stages;

pub use context::{PageStatus, PipelineContext, RenderOutcome, RequestState};
pub use error::PipelineError;
pub use profile::Profiler;
pub use stages::NOT_FOUND_PAGE;

use tracing::debug;

use stages::{
    ConfigStage, FileMetaStage, IndexStage, LoadContentStage, ParseContentStage, RenderStage,
    RouteStage,
};

/// A stage in the request pipeline.
///
/// Stages run in sequence on the same request state; each one reads what
/// earlier stages produced and fills in its own part.
pub trait Stage: Send + Sync {
    /// Unique name for this stage (used for insertion points and timing).
    fn name(&self) -> &'static str;

    /// Process the request.
    fn process(
        &self,
        ctx: &PipelineContext<'_>,
        state: &mut RequestState,
    ) -> Result<(), PipelineError>;
}

/// The request pipeline.
///
/// The default pipeline includes: load-config → route → load-content →
/// file-meta → parse-content → index → render.
///
/// # Extension Points
///
/// ```ignore
/// pipeline.insert_after("parse-content", MyCustomStage)?;
/// ```
pub struct Pipeline {
    stages: Vec<Box<dyn Stage>>,
}

impl Pipeline {
    /// Create an empty pipeline with no stages.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Create the default pipeline with standard stages.
    pub fn default_pipeline() -> Self {
        let mut pipeline = Self::new();
        pipeline.add_stage(ConfigStage);
        pipeline.add_stage(RouteStage);
        pipeline.add_stage(LoadContentStage);
        pipeline.add_stage(FileMetaStage);
        pipeline.add_stage(ParseContentStage);
        pipeline.add_stage(IndexStage);
        pipeline.add_stage(RenderStage);
        pipeline
    }

    /// Add a stage to the end of the pipeline.
    pub fn add_stage<S: Stage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Insert a stage before the named stage.
    pub fn insert_before<S: Stage + 'static>(
        &mut self,
        name: &str,
        stage: S,
    ) -> Result<&mut Self, PipelineError> {
        let pos = self.position(name)?;
        self.stages.insert(pos, Box::new(stage));
        Ok(self)
    }

    /// Insert a stage after the named stage.
    pub fn insert_after<S: Stage + 'static>(
        &mut self,
        name: &str,
        stage: S,
    ) -> Result<&mut Self, PipelineError> {
        let pos = self.position(name)?;
        self.stages.insert(pos + 1, Box::new(stage));
        Ok(self)
    }

    fn position(&self, name: &str) -> Result<usize, PipelineError> {
        self.stages
            .iter()
            .position(|s| s.name() == name)
            .ok_or_else(|| PipelineError::stage(name, "no such stage in pipeline"))
    }

    /// Run every stage for one request.
    pub fn run(
        &self,
        ctx: &PipelineContext<'_>,
        request_uri: &str,
    ) -> Result<RenderOutcome, PipelineError> {
        let mut state = RequestState::new(ctx, request_uri);
        let mut profiler = Profiler::start();

        for stage in &self.stages {
            debug!(stage = stage.name(), "running stage");
            stage.process(ctx, &mut state)?;
            profiler.mark(stage.name());
        }

        profiler.log(&state.route);
        Ok(state.into_outcome())
    }

    /// Get the names of all stages in order.
    pub fn stage_names(&self) -> Vec<&'static str> {
        self.stages.iter().map(|s| s.name()).collect()
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::default_pipeline()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;

    impl Stage for Noop {
        fn name(&self) -> &'static str {
            "noop"
        }

        fn process(
            &self,
            _ctx: &PipelineContext<'_>,
            _state: &mut RequestState,
        ) -> Result<(), PipelineError> {
            Ok(())
        }
    }

    #[test]
    fn test_default_stage_order() {
        assert_eq!(
            Pipeline::default_pipeline().stage_names(),
            vec![
                "load-config",
                "route",
                "load-content",
                "file-meta",
                "parse-content",
                "index",
                "render"
            ]
        );
    }

    #[test]
    fn test_insert_stages() {
        let mut pipeline = Pipeline::default_pipeline();
        pipeline.insert_after("parse-content", Noop).unwrap();
        assert_eq!(pipeline.stage_names()[5], "noop");

        pipeline.insert_before("load-config", Noop).unwrap();
        assert_eq!(pipeline.stage_names()[0], "noop");
    }

    #[test]
    fn test_insert_unknown_stage() {
        let mut pipeline = Pipeline::new();
        assert!(matches!(
            pipeline.insert_after("missing", Noop),
            Err(PipelineError::Stage { .. })
        ));
    }
}
