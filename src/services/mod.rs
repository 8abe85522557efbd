// Clean Reader services
// Services provide the reading pipeline: locate, sanitize, extract metadata, render, persist.

pub mod locator;
pub mod metadata;
pub mod preference_store;
pub mod reader_view;
pub mod rules;
pub mod sanitizer;
pub mod theme_engine;
