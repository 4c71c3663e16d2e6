use std::env;
use std::path::PathBuf;

use ccws::color;
use ccws::error::{Error, Result};

pub mod init;
pub mod spawn;
pub mod squad;
pub mod standup;
pub mod status;
pub mod teardown;

pub use init::cmd_init;
pub use spawn::cmd_spawn;
pub use squad::cmd_squad;
pub use standup::cmd_standup;
pub use status::cmd_status;
pub use teardown::cmd_teardown;

fn current_dir() -> Result<PathBuf> {
    env::current_dir().map_err(|e| Error::io("failed to read current directory", e))
}

fn dry_run_line(command: &str) {
    println!("{} {}", color::dim("[dry-run] Would run:"), command);
}

fn warn_line(message: &str) {
    eprintln!("{} {}", color::warning("Warning:"), message);
}
