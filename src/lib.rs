//! Gitlite: minimal content-addressed version control for a single flat
//! working directory.
//!
//! The library exposes the repository engine — object store, staging area,
//! commit graph, working-tree sync, three-way merge, and filesystem remote
//! transfer — and the `gitlite` binary provides the CLI over it.

pub mod error;
pub mod fsutil;
pub mod history;
pub mod merge;
pub mod model;
pub mod objects;
pub mod refs;
pub mod remote;
pub mod repo;
pub mod staging;
pub mod status;
pub mod telemetry;
pub mod worktree;

pub use error::GitliteError;
pub use repo::Repository;
