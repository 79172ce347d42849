//! Layer diff materialization.
//!
//! This module copies a layer's diff tree to a new location. Two entry points are provided:
//!
//! 1. [`copy_tree`] - best-effort recursive copy
//!    - No-op when the destination already exists
//!    - Creates the label directory first when one is given
//!    - Skips symlinks, recreates FIFOs, preserves permission bits
//!    - Leaves a partial tree behind on failure
//!
//! 2. [`copy_tree_atomic`] - all-or-nothing wrapper
//!    - Copies into a staging directory next to the destination
//!    - Publishes the finished tree with a single rename
//!    - Removes the staging directory on failure
//!
//! Neither function serializes concurrent callers. Two calls racing on the same destination can
//! both see it missing; holding a per-destination lock is the caller's job.
//!
//! # Examples
//!
//! ```no_run
//! use std::path::Path;
//! use layerdirs::materialize;
//!
//! # fn example() -> layerdirs::LayerdirsResult<()> {
//! materialize::copy_tree(
//!     Path::new("/r/diff/abc"),
//!     Path::new("/r/diff/container_t/abc"),
//!     Some(Path::new("/r/diff/container_t")),
//! )?;
//! # Ok(())
//! # }
//! ```

mod copy;
mod modes;
mod publish;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use copy::*;
pub use modes::*;
pub use publish::*;
