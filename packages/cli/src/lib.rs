// ABOUTME: Library side of the usuario binary
// ABOUTME: Environment wiring and account operations shared by the subcommands

pub mod accounts;
pub mod context;
pub mod error;

pub use context::{AppContext, ContextSettings};
pub use error::{CliError, CliResult};
