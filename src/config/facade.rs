//! Configuration loading facade.

use super::merge::merge_policy;
use super::sources::{env, global_file};
use super::StrataConfig;
use crate::error::ConfigError;
use config::File;
use std::path::Path;
use tracing::debug;

/// Loads [`StrataConfig`] from the layered sources
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from defaults, the global file, `explicit` (if any)
    /// and the environment, then validate it.
    pub fn load(explicit: Option<&Path>) -> Result<StrataConfig, ConfigError> {
        let mut builder = merge_policy::builder_with_defaults()?;
        builder = global_file::add_to_builder(builder)?;
        if let Some(path) = explicit {
            debug!(config_path = %path.display(), "Loading configuration file");
            builder = builder.add_source(File::from(path).required(true));
        }
        builder = env::add_to_builder(builder);

        let config: StrataConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load a single file on top of the defaults, ignoring other sources
    pub fn load_from_file(path: &Path) -> Result<StrataConfig, ConfigError> {
        let config: StrataConfig = merge_policy::builder_with_defaults()?
            .add_source(File::from(path).required(true))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}
