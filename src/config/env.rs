use std::env;

use super::types::Settings;

pub(super) fn apply_env(settings: &mut Settings) {
    apply_env_from(settings, |key| env::var(key).ok());
}

/// Apply `CCWS_*` overrides from an arbitrary lookup.
pub(super) fn apply_env_from<F>(settings: &mut Settings, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(val) = lookup("CCWS_COMMAND_TIMEOUT_SECS") {
        if let Ok(n) = val.trim().parse() {
            settings.command_timeout_secs = n;
        }
    }
    if let Some(val) = lookup("CCWS_AGENT_CMD") {
        if !val.trim().is_empty() {
            settings.agent_command = val;
        }
    }
    if let Some(val) = lookup("CCWS_BRANCH_PREFIX") {
        settings.branch_prefix = val;
    }
    if let Some(val) = lookup("CCWS_GIT_BIN") {
        if !val.trim().is_empty() {
            settings.git_bin = val;
        }
    }
    if let Some(val) = lookup("CCWS_TMUX_BIN") {
        if !val.trim().is_empty() {
            settings.tmux_bin = val;
        }
    }
}
