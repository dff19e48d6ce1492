//! glint-vm: a golangci-lint version manager
//!
//! - [`detector`]: finds the golangci-lint version a project declares
//! - [`version`]: local version cache, installer, activation pointer and release index
//! - [`config`]: cache location, platform detection and build information
//! - [`logging`]: tracing subscriber setup for the binary

pub mod config;
pub mod detector;
pub mod logging;
pub mod version;
