use anyhow::{Context, Result};
use indicators_core::config::IndicatorsConfig;
use std::path::Path;

/// Reads the TOML configuration, falling back to defaults when the file
/// does not exist.
pub fn load_config(file: &Path) -> Result<IndicatorsConfig> {
    let file_str = match std::fs::read_to_string(file) {
        Ok(s) => s,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(IndicatorsConfig::default());
        }
        Err(e) => return Err(e).context("Failed to read configuration file"),
    };

    let parsed = toml::from_str::<IndicatorsConfig>(&file_str)
        .context("Failed to parse TOML from configuration file")?;

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_default() -> Result<()> {
        let dir = TempDir::new()?;

        let config = load_config(&dir.path().join("config.toml"))?;
        assert_eq!(config, IndicatorsConfig::default());

        Ok(())
    }

    #[test]
    fn reads_glyphs() -> Result<()> {
        let dir = TempDir::new()?;
        let file = dir.path().join("config.toml");
        fs::write(
            &file,
            "[scratchpad]\nempty-glyph = \"-\"\noccupied-glyph = \"S\"\n",
        )?;

        let config = load_config(&file)?;
        assert_eq!(config.scratchpad.empty_glyph, "-");
        assert_eq!(config.scratchpad.occupied_glyph, "S");
        assert!(!config.general.print_close_errors);

        Ok(())
    }

    #[test]
    fn broken_toml_is_an_error() -> Result<()> {
        let dir = TempDir::new()?;
        let file = dir.path().join("config.toml");
        fs::write(&file, "[mode\nactive-glyph = ")?;

        let err = load_config(&file).expect_err("Config must not parse.");
        assert!(format!("{:#}", err).contains("Failed to parse TOML"));

        Ok(())
    }
}
