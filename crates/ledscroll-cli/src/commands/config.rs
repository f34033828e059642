use std::path::Path;

use anyhow::{anyhow, Result};

use ledscroll_core::AppConfig;

/// Print the effective configuration, or write it to `path`
pub fn run(config: &AppConfig, path: &Path, write: bool, force: bool) -> Result<()> {
    if !write {
        println!("# {}", path.display());
        print!("{}", toml::to_string_pretty(config)?);
        return Ok(());
    }

    if path.exists() && !force {
        return Err(anyhow!(
            "{} already exists.\nUse --force to overwrite it.",
            path.display()
        ));
    }
    config.save_to(path)?;
    println!("Configuration written to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_refuses_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let config = AppConfig::default();

        run(&config, &path, true, false).unwrap();
        assert!(path.exists());
        assert!(run(&config, &path, true, false).is_err());
        run(&config, &path, true, true).unwrap();
    }
}
