use std::path::Path;

use anyhow::{bail, Result};

use danmaku_core::DanmakuConfig;

pub fn show(path: &Path, config: &DanmakuConfig) -> Result<()> {
    println!("# {}", path.display());
    print!("{}", toml::to_string_pretty(config)?);
    Ok(())
}

pub fn init(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!(
            "Config file already exists at {}\nUse --force to overwrite it.",
            path.display()
        );
    }

    DanmakuConfig::default().save_to(path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}
