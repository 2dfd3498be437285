//! CLI command handlers, one file per command.

mod checksum;
mod completions;
mod delete;
mod download;
mod list;
mod path;
mod resolve;

pub use checksum::run_checksum;
pub use completions::{run_completions, run_man};
pub use delete::run_delete;
pub use download::run_download;
pub use list::run_list;
pub use path::run_path;
pub use resolve::run_resolve;
