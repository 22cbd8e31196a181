//! Configuration inspection commands

use hearthloop_core::{error::Result, AdaptationConfig};
use std::path::{Path, PathBuf};

use super::helpers::load_config;

/// Print the effective configuration as TOML
pub fn show(config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let rendered = toml::to_string_pretty(&config)
        .map_err(|e| hearthloop_core::HearthloopError::InvalidConfig(e.to_string()))?;
    print!("{}", rendered);
    Ok(())
}

/// Write the default configuration to `output`
pub fn init(output: PathBuf, force: bool) -> Result<()> {
    if output.exists() && !force {
        return Err(hearthloop_core::HearthloopError::InvalidConfig(format!(
            "{} already exists (use --force to overwrite)",
            output.display()
        )));
    }
    AdaptationConfig::default().to_file(&output)?;
    println!("Wrote default configuration to {}", output.display());
    Ok(())
}

/// Check a configuration file without using it
pub fn validate(path: PathBuf) -> Result<()> {
    AdaptationConfig::from_file(&path)?;
    println!("Configuration is valid: {}", path.display());
    Ok(())
}
