//! Names of the extension points declared by the pipeline.

/// After all plugins have been loaded.
pub const PLUGINS_LOADED: &str = "plugins_loaded";
/// Before the template engine loads the theme.
pub const BEFORE_TEMPLATE_REGISTER: &str = "before_template_register";
/// After the request-scoped settings have been resolved.
pub const CONFIG_LOADED: &str = "config_loaded";
/// With the route taken from the request.
pub const REQUEST_URL: &str = "request_url";

pub const BEFORE_LOAD_CONTENT: &str = "before_load_content";
pub const AFTER_LOAD_CONTENT: &str = "after_load_content";
pub const BEFORE_404_LOAD_CONTENT: &str = "before_404_load_content";
pub const AFTER_404_LOAD_CONTENT: &str = "after_404_load_content";

pub const BEFORE_FILE_META: &str = "before_file_meta";
/// May supply the metadata and skip header parsing.
pub const GET_FILE_META: &str = "get_file_meta";
pub const AFTER_FILE_META: &str = "after_file_meta";

pub const BEFORE_PARSE_CONTENT: &str = "before_parse_content";
/// May supply the markup and skip the markdown renderer.
pub const PARSE_CONTENT: &str = "parse_content";
pub const AFTER_PARSE_CONTENT: &str = "after_parse_content";

pub const BEFORE_INDEX: &str = "before_index";
/// May supply the whole page index.
pub const GET_INDEX: &str = "get_index";
/// Once per indexed page, before it is added.
pub const GET_PAGE_DATA: &str = "get_page_data";
pub const AFTER_INDEX: &str = "after_index";

pub const BEFORE_RENDER: &str = "before_render";
pub const AFTER_RENDER: &str = "after_render";

/// Every hook the pipeline fires, in firing order.
pub const PIPELINE_HOOKS: &[&str] = &[
    PLUGINS_LOADED,
    BEFORE_TEMPLATE_REGISTER,
    CONFIG_LOADED,
    REQUEST_URL,
    BEFORE_LOAD_CONTENT,
    BEFORE_404_LOAD_CONTENT,
    AFTER_404_LOAD_CONTENT,
    AFTER_LOAD_CONTENT,
    BEFORE_FILE_META,
    GET_FILE_META,
    AFTER_FILE_META,
    BEFORE_PARSE_CONTENT,
    PARSE_CONTENT,
    AFTER_PARSE_CONTENT,
    BEFORE_INDEX,
    GET_INDEX,
    GET_PAGE_DATA,
    AFTER_INDEX,
    BEFORE_RENDER,
    AFTER_RENDER,
];
