//! Configuration loading and discovery for `tilescape.toml`

use super::schema::TilescapeConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name looked for when discovering configuration.
pub const CONFIG_FILE: &str = "tilescape.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse tilescape.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// Find `tilescape.toml` by walking up from the current working directory.
pub fn find_config() -> Option<PathBuf> {
    env::current_dir().ok().and_then(find_config_from)
}

/// Find `tilescape.toml` by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.exists() {
            return Some(config_path);
        }

        // Reached root, no config found
        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration.
///
/// If a path is provided, loads from that file. Otherwise, uses
/// [`find_config`] to locate one. With no file at all, returns the defaults
/// rooted at the current directory.
pub fn load_config(path: Option<&Path>) -> Result<TilescapeConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(default_config()),
    }
}

/// Load configuration from a specific file path.
pub fn load_config_file(path: &Path) -> Result<TilescapeConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let mut config: TilescapeConfig = toml::from_str(&contents)?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    config.base_dir = path.parent().map(Path::to_path_buf).unwrap_or_default();
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Default configuration rooted at the current directory.
pub fn default_config() -> TilescapeConfig {
    TilescapeConfig { base_dir: env::current_dir().unwrap_or_default(), ..Default::default() }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_config(dir: &Path, contents: &str) -> PathBuf {
        let path = dir.join(CONFIG_FILE);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_find_config_walks_up() {
        let temp = TempDir::new().unwrap();
        let config_path = write_config(temp.path(), "");
        let nested = temp.path().join("a/b/c");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_config_from(nested), Some(config_path));
    }

    #[test]
    fn test_find_config_missing() {
        let temp = TempDir::new().unwrap();
        // Only meaningful when no ancestor of the temp dir has a config
        if find_config_from(temp.path().parent().unwrap().to_path_buf()).is_none() {
            assert!(find_config_from(temp.path().to_path_buf()).is_none());
        }
    }

    #[test]
    fn test_load_sets_base_dir() {
        let temp = TempDir::new().unwrap();
        let path = write_config(temp.path(), "[render]\nframe_delay_ms = 250\n");
        let config = load_config(Some(&path)).unwrap();

        assert_eq!(config.render.frame_delay_ms, 250);
        assert_eq!(config.base_dir, temp.path());
        assert_eq!(config.asset_paths().root, temp.path().join("data"));
    }

    #[test]
    fn test_load_invalid_toml() {
        let temp = TempDir::new().unwrap();
        let path = write_config(temp.path(), "[render\nscale = ");
        assert!(matches!(load_config(Some(&path)), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_load_rejects_zero_scale() {
        let temp = TempDir::new().unwrap();
        let path = write_config(temp.path(), "[render]\nscale = 0\n");
        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("render.scale"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let temp = TempDir::new().unwrap();
        let result = load_config(Some(&temp.path().join("nope.toml")));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
