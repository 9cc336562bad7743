//! Typed payloads handed to hook subscribers.

use std::path::PathBuf;

use crate::config::Settings;
use crate::content::{ContentResolver, HeaderSpec, Neighbors, PageEntry, PageIndex, PageMetadata};

/// Read-only state available to every hook subscriber.
#[derive(Debug, Clone, Copy)]
pub struct HookContext<'a> {
    /// Settings in effect for this firing.
    ///
    /// During `config_loaded` these are the site settings; the request
    /// settings being resolved are in the payload.
    pub settings: &'a Settings,
    /// File resolution relative to the current request
    pub resolver: &'a ContentResolver,
}

/// The data a hook firing exposes to its subscribers.
///
/// Mutable fields are borrowed for the duration of one `fire` call: every
/// subscriber sees the writes of the ones before it, and the pipeline reads
/// the final values back once `fire` returns.
#[derive(Debug)]
pub enum HookPayload<'a> {
    PluginsLoaded {
        plugins: &'a [String],
    },
    BeforeTemplateRegister {
        theme_dir: &'a mut PathBuf,
    },
    ConfigLoaded {
        settings: &'a mut Settings,
    },
    RequestUrl {
        url: &'a mut String,
    },
    BeforeLoadContent {
        file: &'a mut PathBuf,
    },
    AfterLoadContent {
        file: &'a mut PathBuf,
        content: &'a mut String,
    },
    Before404LoadContent {
        file: &'a mut PathBuf,
    },
    After404LoadContent {
        file: &'a mut PathBuf,
        content: &'a mut String,
    },
    BeforeFileMeta {
        content: &'a str,
        headers: &'a mut HeaderSpec,
    },
    /// Setting `meta` skips the built-in header parser.
    GetFileMeta {
        content: &'a str,
        headers: &'a HeaderSpec,
        meta: &'a mut Option<PageMetadata>,
    },
    AfterFileMeta {
        content: &'a str,
        meta: &'a mut PageMetadata,
    },
    BeforeParseContent {
        content: &'a mut String,
    },
    /// Setting `html` skips the markdown renderer.
    ParseContent {
        content: &'a str,
        html: &'a mut Option<String>,
    },
    AfterParseContent {
        html: &'a mut String,
    },
    BeforeIndex {
        directory: &'a mut PathBuf,
    },
    /// Setting `pages` skips the built-in indexer.
    GetIndex {
        directory: &'a std::path::Path,
        pages: &'a mut Option<PageIndex>,
    },
    GetPageData {
        data: &'a mut PageEntry,
        meta: &'a PageMetadata,
    },
    AfterIndex {
        pages: &'a mut PageIndex,
        neighbors: &'a mut Neighbors,
    },
    BeforeRender {
        vars: &'a mut serde_json::Map<String, serde_json::Value>,
        template: &'a mut String,
    },
    AfterRender {
        output: &'a mut String,
    },
}
