//! Local version cache and the machinery that fills it
//!
//! ```text
//! ┌──────────────┐     ┌─────────────┐     ┌──────────────┐
//! │ ReleaseIndex │     │  Installer  │────▶│  CacheStore  │
//! │ (list-remote)│     │(fetch+verify│     │ (list/prune) │
//! └──────────────┘     │  +extract)  │     └──────────────┘
//!                      └─────────────┘            │
//!                                                 ▼
//!                                          ┌──────────────┐
//!                                          │  Activation  │
//!                                          │  (current/)  │
//!                                          └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`layout`]: directory contract of the cache root
//! - [`cache`]: enumeration, ordering and pruning of installed versions
//! - [`installer`]: download, checksum verification and atomic install
//! - [`archive`]: checksum and tarball helpers used by the installer
//! - [`activation`]: the `current/` pointer
//! - [`registry`]: release index trait and release type
//! - [`registries`]: GitHub Releases implementation
//! - [`semver`]: normalization, validation and ordering of version strings
//! - [`error`]: error types

pub mod activation;
pub mod archive;
pub mod cache;
pub mod error;
pub mod installer;
pub mod layout;
pub mod registries;
pub mod registry;
pub mod semver;
