//! Support library for the `digraphgen` binary.
//!
//! Exposes the CLI and logging modules so doctests and unit tests can drive
//! the command pipeline without spawning a subprocess.

pub mod cli;
pub mod logging;
