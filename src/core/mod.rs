// logcompact - core/mod.rs
//
// Core business logic layer.
// Dependencies: standard library and regex only.
// Must NOT depend on: platform, app, or any file I/O.

pub mod compact;
pub mod model;
pub mod select;
pub mod split;
pub mod timestamp;
