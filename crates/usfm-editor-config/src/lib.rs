use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// Editor settings. Every field is optional; command-line flags override them.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// A `.sty` file replacing the bundled marker taxonomy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stylesheet: Option<PathBuf>,
    /// Directory holding the project's `.usfm` files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_root: Option<PathBuf>,
}

impl Config {
    /// Read the config at `config_path`; `Ok(None)` when there is no file.
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content =
            std::fs::read_to_string(config_path).map_err(|source| ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            })?;
        Self::parse(&content)
            .map(Some)
            .map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        Self::load_from_path(Self::config_path())
    }

    /// Parse TOML text, expanding `~` and `$VARS` in the paths.
    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(content)?;
        Ok(Self {
            stylesheet: config.stylesheet.map(expanded),
            project_root: config.project_root.map(expanded),
        })
    }

    /// Command-line values win over the file's.
    pub fn with_overrides(self, stylesheet: Option<PathBuf>, project_root: Option<PathBuf>) -> Self {
        Self {
            stylesheet: stylesheet.or(self.stylesheet),
            project_root: project_root.or(self.project_root),
        }
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(config_path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to_path(Self::config_path())
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/usfm-editor");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }
}

/// `path` with shell variables and tilde expanded, or unchanged if a
/// variable is undefined.
fn expanded(path: PathBuf) -> PathBuf {
    match shellexpand::full(&path.to_string_lossy()) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use tempfile::TempDir;

    #[test]
    fn test_config_path() {
        let config_path = Config::config_path();
        let path_str = config_path.to_string_lossy();

        assert!(!path_str.starts_with('~'));
        assert!(path_str.ends_with(".config/usfm-editor/config.toml"));
    }

    #[test]
    fn test_empty_config_is_default() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(toml::to_string(&config).unwrap(), "");
    }

    #[test]
    fn test_tilde_is_expanded() {
        let config = Config::parse("stylesheet = \"~/styles/usfm.sty\"").unwrap();
        let stylesheet = config.stylesheet.unwrap();

        assert!(!stylesheet.to_string_lossy().starts_with('~'));
        assert!(stylesheet.ends_with("styles/usfm.sty"));
    }

    #[test]
    fn test_relative_and_unset_variable_paths_unchanged() {
        assert_eq!(expanded(PathBuf::from("relative/path")), PathBuf::from("relative/path"));

        let path = PathBuf::from("$USFM_EDITOR_SURELY_UNSET_VARIABLE/books");
        assert_eq!(expanded(path.clone()), path);
    }

    #[test]
    fn test_overrides_win() {
        let config = Config {
            stylesheet: Some(PathBuf::from("/etc/custom.sty")),
            project_root: Some(PathBuf::from("/srv/bible")),
        };

        let merged = config.with_overrides(None, Some(PathBuf::from("/tmp/other")));

        assert_eq!(merged.stylesheet, Some(PathBuf::from("/etc/custom.sty")));
        assert_eq!(merged.project_root, Some(PathBuf::from("/tmp/other")));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let non_existent_config = temp_dir.path().join("nonexistent.toml");

        assert!(Config::load_from_path(&non_existent_config).unwrap().is_none());
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("nested/dir/config.toml");
        let test_config = Config {
            stylesheet: Some(PathBuf::from("/tmp/custom.sty")),
            project_root: Some(PathBuf::from("/tmp/project")),
        };

        test_config.save_to_path(&config_file).unwrap();
        let loaded_config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(loaded_config, test_config);
    }

    #[test]
    fn test_config_with_env_var_in_toml() {
        unsafe {
            env::set_var("USFM_PROJECTS", "/custom/projects");
        }

        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "project_root = \"$USFM_PROJECTS/bible\"\n").unwrap();

        let config = Config::load_from_path(&config_file).unwrap().unwrap();

        assert_eq!(config.project_root, Some(PathBuf::from("/custom/projects/bible")));
        assert_eq!(config.stylesheet, None);

        unsafe {
            env::remove_var("USFM_PROJECTS");
        }
    }

    #[test]
    fn test_malformed_config_reports_path() {
        let temp_dir = TempDir::new().unwrap();
        let config_file = temp_dir.path().join("config.toml");
        std::fs::write(&config_file, "stylesheet = [").unwrap();

        let err = Config::load_from_path(&config_file).unwrap_err();

        assert!(matches!(err, ConfigError::ConfigParseError { .. }));
        assert!(err.to_string().contains("config.toml"));
    }
}
