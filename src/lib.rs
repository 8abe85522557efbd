//! Clean Reader: a reader mode engine that swaps cluttered article pages for a
//! clean, themable reading view.
//!
//! This library crate exposes all modules for use by the binary and integration tests.

pub mod app;
pub mod control_surface;
pub mod dom;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod types;
