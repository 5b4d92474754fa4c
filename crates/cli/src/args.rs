use std::path::PathBuf;

use clap::Parser;

use cmdb_infra::{ConfigError, ModelConfig};

#[derive(Parser, Debug, Clone)]
#[command(name = "cmdb-cli", about = "Apply a model definition and print what is stored", version)]
pub struct CliArgs {
    #[arg(value_name = "FILE", help = "Model definition document (JSON)")]
    pub definition: PathBuf,

    #[arg(
        long,
        env = "CMDB_CONFIG",
        value_name = "FILE",
        help = "Path to a configuration file (JSON)"
    )]
    pub config: Option<PathBuf>,
}

impl CliArgs {
    /// The config file when one was given, otherwise defaults; `CMDB_*`
    /// variables override either.
    pub fn load_config(&self) -> Result<ModelConfig, ConfigError> {
        match &self.config {
            Some(path) => ModelConfig::from_file(path),
            None => ModelConfig::from_env(),
        }
    }
}
