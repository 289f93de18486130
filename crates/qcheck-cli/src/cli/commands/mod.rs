//! CLI command handlers.

mod check;
mod generate;

pub use check::run_check;
pub use generate::{print_completions, print_man};
