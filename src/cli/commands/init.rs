use crate::config::Config;
use std::path::Path;

/// Writes the default config. Secrets stay in the environment, not the file.
pub fn cmd_init(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        println!("Config file already exists at {}", path.display());
        return Ok(());
    }

    Config::default().save_to_path(path)?;
    println!("✓ Config file created at {}. Edit it and run again.", path.display());
    Ok(())
}
