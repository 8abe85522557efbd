// Clean Reader shared type definitions
// Each submodule defines types used across the application.

pub mod content;
pub mod errors;
pub mod messages;
pub mod reader;
