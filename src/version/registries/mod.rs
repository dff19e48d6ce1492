//! Release index implementations

pub mod github;

pub use github::GitHubReleases;
