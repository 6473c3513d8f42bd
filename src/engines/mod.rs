//! Search engine module
//!
//! Defines the SearchEngine trait, the registry, and the two engines.

mod loader;
mod registry;
mod traits;

// Engine implementations
pub mod duckduckgo;
pub mod page_text;
pub mod readability;

pub use duckduckgo::DuckDuckGoLite;
pub use loader::EngineLoader;
pub use page_text::PageText;
pub use registry::EngineRegistry;
pub use traits::*;

/// Backend identifier served by [`DuckDuckGoLite`] in the default setup
pub const DDG_SEARCH: &str = "DdgSearch";

/// Backend identifier served by [`PageText`] in the default setup
pub const PAGE_TEXT: &str = "PageText";
