//! Configuration for ccws.
//!
//! Three layers: process-wide [`Settings`] (defaults plus `CCWS_*` env
//! overrides), the per-repository [`RepoConfig`] stored in
//! `.ccws/config.json`, and CLI flags which win over both.

mod cli;
mod env;
mod repo;
mod types;

pub use cli::{
    parse_args, Cli, Command, InitArgs, SpawnArgs, SquadArgs, StandupArgs, TeardownArgs,
};
pub use repo::{RepoConfig, CONFIG_SCHEMA_VERSION};
pub(crate) use repo::write_json;
pub use types::{Settings, DEFAULT_COMMAND_TIMEOUT_SECS, DEFAULT_STANDUP_FILES};
