//! CLI module
//!
//! Command-line interface: `mubi-export <USER_ID> [options]` exports the
//! watchlist and ratings of a user.

mod commands;
mod runner;

pub use commands::{Cli, CollectionArg};
pub use runner::Runner;
