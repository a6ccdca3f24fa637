use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_API_URL: &str = "https://api.github.com";
pub const LOCAL_CONFIG_FILE: &str = ".spellbot.toml";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Extra `wrong->right` lists loaded after the embedded one.
    #[serde(default)]
    pub dictionaries: Vec<PathBuf>,

    /// Words never reported, whatever the dictionaries say.
    #[serde(default)]
    pub ignore_words: Vec<String>,

    #[serde(default = "default_api_url")]
    pub api_url: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dictionaries: Vec::new(),
            ignore_words: Vec::new(),
            api_url: default_api_url(),
        }
    }
}

impl Config {
    /// Load configuration with priority: CLI args > local (or explicit) config
    /// > global config > defaults
    pub fn load(
        config_path: Option<&Path>,
        dictionaries: Vec<PathBuf>,
        ignore_words: Vec<String>,
        api_url: Option<String>,
    ) -> Result<Self> {
        let mut config = Self::default();

        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                config = config.merge(Self::from_file(&global_path)?);
            }
        }

        match config_path {
            Some(path) => {
                config = config.merge(Self::from_file(path)?);
            }
            None => {
                let local_path = PathBuf::from(LOCAL_CONFIG_FILE);
                if local_path.exists() {
                    config = config.merge(Self::from_file(&local_path)?);
                }
            }
        }

        config.dictionaries.extend(dictionaries);
        config.ignore_words.extend(ignore_words);
        if let Some(url) = api_url {
            config.api_url = url;
        }

        Ok(config)
    }

    /// Read a config file; relative dictionary paths resolve against the
    /// file's directory.
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config: Self = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        if let Some(base) = path.parent() {
            for dict in &mut config.dictionaries {
                if dict.is_relative() {
                    *dict = base.join(&*dict);
                }
            }
        }

        Ok(config)
    }

    fn merge(mut self, other: Self) -> Self {
        self.dictionaries.extend(other.dictionaries);
        self.ignore_words.extend(other.ignore_words);
        if other.api_url != DEFAULT_API_URL {
            self.api_url = other.api_url;
        }
        self
    }

    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "spellbot").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.api_url, "https://api.github.com");
        assert!(config.dictionaries.is_empty());
        assert!(config.ignore_words.is_empty());
    }

    #[test]
    fn test_merge_configs() {
        let base = Config {
            ignore_words: vec!["teh".to_string()],
            ..Default::default()
        };
        let override_config = Config {
            ignore_words: vec!["thsi".to_string()],
            api_url: "https://github.example.com/api/v3".to_string(),
            ..Default::default()
        };

        let merged = base.merge(override_config);
        assert_eq!(merged.ignore_words, vec!["teh", "thsi"]);
        assert_eq!(merged.api_url, "https://github.example.com/api/v3");

        let kept = merged.clone().merge(Config::default());
        assert_eq!(kept.api_url, "https://github.example.com/api/v3");
    }

    #[test]
    fn test_from_file_resolves_relative_dictionaries() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("spellbot.toml");
        fs::write(
            &path,
            "dictionaries = [\"words.txt\", \"/abs/list.txt\"]\nignore_words = [\"crate\"]\n",
        )
        .unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.dictionaries[0], dir.path().join("words.txt"));
        assert_eq!(config.dictionaries[1], PathBuf::from("/abs/list.txt"));
        assert_eq!(config.ignore_words, vec!["crate"]);
        assert_eq!(config.api_url, DEFAULT_API_URL);
    }

    #[test]
    fn test_load_applies_cli_overrides() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("spellbot.toml");
        fs::write(&path, "ignore_words = [\"one\"]\n").unwrap();

        let config = Config::load(
            Some(&path),
            vec![PathBuf::from("/tmp/extra.txt")],
            vec!["two".to_string()],
            Some("http://localhost:8080".to_string()),
        )
        .unwrap();

        assert!(config.ignore_words.ends_with(&["one".to_string(), "two".to_string()]));
        assert!(config.dictionaries.ends_with(&[PathBuf::from("/tmp/extra.txt")]));
        assert_eq!(config.api_url, "http://localhost:8080");
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let missing = Path::new("/nonexistent/spellbot.toml");
        assert!(Config::load(Some(missing), Vec::new(), Vec::new(), None).is_err());
    }
}
