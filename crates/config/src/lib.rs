//! Settings for the comet pipeline extensions.
//!
//! Config files: `comet.toml` or `comet.json`, searched in `./` then
//! `~/.config/comet/`. Supports `${ENV_VAR}` substitution in all string values.

pub mod env_subst;
pub mod error;
pub mod loader;
pub mod schema;

pub use {
    error::{ConfigError, Result},
    loader::{config_dir, discover_and_load, load_config, parse_config},
    schema::{
        CometConfig, InjectionConfig, InterceptorConfig, MESSAGE_OBJECT_ATTRIBUTE,
        ROOT_REGISTRY_ATTRIBUTE,
    },
};
