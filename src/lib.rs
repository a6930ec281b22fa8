// logcompact - lib.rs
//
// Library entry point, exposing every module for integration testing
// and programmatic use. The CLI in `main.rs` is a thin layer over
// `app::pipeline::run`.

pub mod app;
pub mod core;
pub mod platform;
pub mod util;
