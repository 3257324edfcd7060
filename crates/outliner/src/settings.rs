use outline_core::OutlineConfig;

use crate::prelude::{println, *};

/// Effective configuration: the `--config` file (or defaults) with flag
/// overrides applied on top.
pub fn load(global: &crate::Global) -> Result<OutlineConfig> {
    let mut config = match &global.config {
        Some(path) => OutlineConfig::load(path)
            .wrap_err_with(|| f!("Failed to load configuration from {}", path.display()))?,
        None => OutlineConfig::default(),
    };

    if let Some(max_pages) = global.max_pages {
        config = config.with_max_pages(max_pages);
    }
    if let Some(y_threshold) = global.y_threshold {
        config = config.with_y_threshold(y_threshold);
    }

    config.validate()?;
    Ok(config)
}

pub fn print(global: &crate::Global) -> Result<()> {
    let config = load(global)?;
    println!("{}", config.to_toml_string()?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config = load(&crate::Global::default()).unwrap();
        assert_eq!(config, OutlineConfig::default());
    }

    #[test]
    fn test_flags_override_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("outliner.toml");
        std::fs::write(&path, "max_pages = 10\ny_threshold = 3.0\n").unwrap();

        let global = crate::Global {
            config: Some(path),
            max_pages: Some(2),
            y_threshold: None,
        };
        let config = load(&global).unwrap();
        assert_eq!(config.max_pages, 2);
        assert_eq!(config.y_threshold, 3.0);
    }

    #[test]
    fn test_invalid_override_rejected() {
        let global = crate::Global {
            max_pages: Some(0),
            ..Default::default()
        };
        assert!(load(&global).is_err());
    }

    #[test]
    fn test_missing_config_file() {
        let global = crate::Global {
            config: Some("/nonexistent/outliner.toml".into()),
            ..Default::default()
        };
        let err = load(&global).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/outliner.toml"));
    }
}
