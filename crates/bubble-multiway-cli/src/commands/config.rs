//! Config command implementation.

use anyhow::Result;
use bubble_multiway_ops::Config;

/// Show current configuration.
pub fn show(config: &Config) -> Result<()> {
    println!("Bubble-Multiway Configuration");
    println!("{:-<40}", "");
    for key in Config::KEYS {
        println!("{:<20} {}", key, config.get(key).unwrap_or_default());
    }

    if let Some(config_path) = Config::config_file_path() {
        println!("\nConfig file: {}", config_path.display());
    }

    Ok(())
}

/// Set a configuration value and save it.
pub fn set(config: &mut Config, key: &str, value: &str) -> Result<()> {
    config.set(key, value).map_err(|err| {
        anyhow::anyhow!("{}. Valid keys: {}", err, Config::KEYS.join(", "))
    })?;
    config.save()?;
    println!("Set {} to: {}", key, value);
    Ok(())
}

/// Get a configuration value.
pub fn get(config: &Config, key: &str) -> Result<()> {
    match config.get(key) {
        Some(value) => println!("{}", value),
        None => anyhow::bail!(
            "Unknown config key: {}. Valid keys: {}",
            key,
            Config::KEYS.join(", ")
        ),
    }
    Ok(())
}

/// Reset configuration to defaults.
pub fn reset() -> Result<()> {
    Config::reset()?;
    println!("Configuration reset to defaults");
    Ok(())
}
