// logcompact - app/mod.rs
//
// Application layer: wires the core stages to real files.
// Dependencies: core, platform, util.

pub mod pipeline;
pub mod writer;
