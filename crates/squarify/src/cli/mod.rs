//! Command handlers for the squarify CLI.

pub mod config;
pub mod normalize;
