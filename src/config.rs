use config::{Config, ConfigError, File as ConfigFile};
use serde::Deserialize;

/// What to do when two source files land on the same destination name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionPolicy {
    /// Keep both: `name.ext`, `name_1.ext`, `name_2.ext`, ...
    #[default]
    Suffix,
    /// Last writer wins.
    Overwrite,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Worker threads shared by every dispatch level. 0 = available parallelism.
    pub workers: usize,
    pub collision_policy: CollisionPolicy,
    pub ignore_patterns: Vec<String>,
    pub prune_empty_dirs: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            collision_policy: CollisionPolicy::Suffix,
            ignore_patterns: Vec::new(),
            prune_empty_dirs: true,
        }
    }
}

pub fn load_configuration() -> Result<AppConfig, ConfigError> {
    let builder = Config::builder()
        .add_source(ConfigFile::with_name("Config").required(false))
        .build()?;
    builder.try_deserialize::<AppConfig>()
}
