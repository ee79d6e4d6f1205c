//! Command implementations for the holonet CLI

pub mod serve;

pub use serve::run_serve;
