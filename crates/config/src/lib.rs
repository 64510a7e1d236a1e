//! Configuration: schema, file discovery, and `${ENV_VAR}` substitution.
//!
//! Config lives in `switchboard.{toml,yaml,yml,json}`, project-local first,
//! then `~/.config/switchboard/`.

pub mod env_subst;
pub mod loader;
pub mod schema;

pub use {
    loader::{discover_and_load, load_config, set_config_dir},
    schema::SwitchboardConfig,
};
