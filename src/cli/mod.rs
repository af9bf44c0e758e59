//! Command implementations for the `pkgidx` binary.

pub mod commands;
