//! `layerdirs` manages the on-disk identity, ancestry, and physical layout of immutable
//! filesystem layers in a copy-on-write storage driver.
//!
//! # Overview
//!
//! Every layer is named by an opaque id and lives under a storage root laid out as:
//!
//! ```text
//! <root>/mnt/<id>             mount point for layer <id>
//! <root>/diff/<id>            unlabeled diff content for layer <id>
//! <root>/diff/<label>/<id>    label-scoped diff content for layer <id>
//! <root>/layers/<id>          ancestry record, one ancestor id per non-empty line
//! ```
//!
//! The crate provides:
//! - **Enumeration**: listing the layer ids present under a directory
//! - **Ancestry**: reading a layer's parent chain from its record file
//! - **Paths**: pure functions deriving where a layer's content lives
//! - **Materialization**: copying a layer's diff tree to a new location
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use layerdirs::LayerStore;
//!
//! fn main() -> layerdirs::LayerdirsResult<()> {
//!     let store = LayerStore::new("/var/lib/layerdirs");
//!
//!     for id in store.ids()? {
//!         let parents = store.parent_ids(&id)?;
//!         println!("{id} -> {parents:?}");
//!     }
//!
//!     store.materialize_label("abc123", "container_t")?;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`ancestry`] - Ancestry record reading
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Store configuration and defaults
//! - [`enumerate`] - Layer id discovery
//! - [`materialize`] - Recursive tree copying and atomic publishing
//! - [`paths`] - Storage root path composition
//! - [`store`] - Root-bound facade over the above
//! - [`utils`] - Common utilities and helpers

#![warn(missing_docs)]

mod error;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub mod ancestry;
pub mod cli;
pub mod config;
pub mod enumerate;
pub mod materialize;
pub mod paths;
pub mod store;
pub mod utils;

pub use error::*;
pub use store::*;
