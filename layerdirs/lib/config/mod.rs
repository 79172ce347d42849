//! Store configuration and defaults.

mod defaults;
mod store_config;

//--------------------------------------------------------------------------------------------------
// Exports
//--------------------------------------------------------------------------------------------------

pub use defaults::*;
pub use store_config::*;
