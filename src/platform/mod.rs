// logcompact - platform/mod.rs
//
// Platform abstraction layer: filesystem access and config file location.
// Must NOT depend on: app.

pub mod config;
pub mod fs;
