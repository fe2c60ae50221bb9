// ABOUTME: Library root for chatscout — re-exports all modules for integration testing.
// ABOUTME: The binary entry point is in main.rs, which uses this crate as a library.

pub mod app;
pub mod classify;
pub mod config;
pub mod navigate;
pub mod notify;
pub mod replay;
pub mod session;
pub mod surface;
pub mod watch;
