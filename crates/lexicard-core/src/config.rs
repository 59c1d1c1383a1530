//! Application configuration.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::history::DEFAULT_HISTORY_LIMIT;
use crate::model::QuizMode;
use crate::quiz::QuizConfig;

/// Name of the per-directory config file.
pub const CONFIG_FILE_NAME: &str = "lexicard.toml";

/// Quiz-related settings, the `[quiz]` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizSection {
    /// Shuffle words at the start of each quiz.
    #[serde(default = "default_shuffle")]
    pub shuffle: bool,
    /// Mode used when none is given on the command line or remembered.
    #[serde(default)]
    pub default_mode: QuizMode,
    /// Fixed RNG seed for reproducible question order.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for QuizSection {
    fn default() -> Self {
        Self {
            shuffle: default_shuffle(),
            default_mode: QuizMode::default(),
            seed: None,
        }
    }
}

impl QuizSection {
    pub fn engine_config(&self) -> QuizConfig {
        QuizConfig {
            shuffle: self.shuffle,
            seed: self.seed,
        }
    }
}

/// Top-level lexicard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LexicardConfig {
    /// Directory holding the stored library, history and settings.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Maximum number of quiz records kept.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    #[serde(default)]
    pub quiz: QuizSection,
}

fn default_shuffle() -> bool {
    true
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("./lexicard-data")
}
fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

impl Default for LexicardConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            history_limit: default_history_limit(),
            quiz: QuizSection::default(),
        }
    }
}

/// Sample config written by `lexicard init`.
pub const SAMPLE_CONFIG: &str = r#"# lexicard configuration

# Where the word library, quiz history and settings are stored.
# ${VAR} references are expanded from the environment.
data_dir = "./lexicard-data"

# Number of finished quizzes kept in the history.
history_limit = 50

[quiz]
shuffle = true
default_mode = "en-to-zh"   # en-to-zh | zh-to-en | en-definition
# seed = 42                 # fixed question order
"#;

/// Replace `${VAR}` references with environment values. Unset variables expand to "".
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        let Some(end) = result[start..].find('}') else {
            break;
        };
        let value = std::env::var(&result[start + 2..start + end]).unwrap_or_default();
        result.replace_range(start..start + end + 1, &value);
    }
    result
}

/// Load configuration from the default locations.
pub fn load_config() -> Result<LexicardConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order:
/// 1. the explicit `path`, which must exist
/// 2. `lexicard.toml` in the current directory
/// 3. `~/.config/lexicard/config.toml`
///
/// Environment overrides: `LEXICARD_DATA_DIR`, `LEXICARD_SHUFFLE`.
pub fn load_config_from(path: Option<&Path>) -> Result<LexicardConfig> {
    let config_path = match path {
        Some(p) if p.exists() => Some(p.to_path_buf()),
        Some(p) => anyhow::bail!("config file not found: {}", p.display()),
        None => {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() {
                Some(local)
            } else {
                global_config_path().filter(|p| p.exists())
            }
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<LexicardConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => LexicardConfig::default(),
    };

    if let Ok(dir) = std::env::var("LEXICARD_DATA_DIR") {
        config.data_dir = PathBuf::from(dir);
    }
    if let Ok(shuffle) = std::env::var("LEXICARD_SHUFFLE") {
        config.quiz.shuffle = parse_bool(&shuffle)
            .with_context(|| format!("invalid LEXICARD_SHUFFLE value: {shuffle}"))?;
    }

    config.data_dir = PathBuf::from(resolve_env_vars(&config.data_dir.to_string_lossy()));
    Ok(config)
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// `~/.config/lexicard/config.toml`, when `HOME` is set.
pub fn global_config_path() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(|h| {
        PathBuf::from(h)
            .join(".config")
            .join("lexicard")
            .join("config.toml")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_LEXICARD_TEST_VAR", "words");
        assert_eq!(resolve_env_vars("${_LEXICARD_TEST_VAR}"), "words");
        assert_eq!(
            resolve_env_vars("/data/${_LEXICARD_TEST_VAR}/store"),
            "/data/words/store"
        );
        assert_eq!(resolve_env_vars("no ${closing"), "no ${closing");
        std::env::remove_var("_LEXICARD_TEST_VAR");
    }

    #[test]
    fn default_config() {
        let config = LexicardConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("./lexicard-data"));
        assert_eq!(config.history_limit, 50);
        assert!(config.quiz.shuffle);
        assert_eq!(config.quiz.default_mode, QuizMode::EnToZh);
    }

    #[test]
    fn sample_config_parses() {
        let config: LexicardConfig = toml::from_str(SAMPLE_CONFIG).unwrap();
        assert_eq!(config, LexicardConfig::default());
    }

    #[test]
    fn partial_config_uses_defaults() {
        let config: LexicardConfig = toml::from_str(
            r#"
[quiz]
default_mode = "en-definition"
seed = 7
"#,
        )
        .unwrap();
        assert_eq!(config.history_limit, 50);
        assert_eq!(config.quiz.default_mode, QuizMode::EnDefinition);
        assert_eq!(config.quiz.engine_config().seed, Some(7));
        assert!(config.quiz.engine_config().shuffle);
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let err = load_config_from(Some(Path::new("/definitely/not/here.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn explicit_path_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "history_limit = 5\n").unwrap();
        let config = load_config_from(Some(&path)).unwrap();
        assert_eq!(config.history_limit, 5);
    }

    #[test]
    fn parse_bool_accepts_common_spellings() {
        assert_eq!(parse_bool("Yes"), Some(true));
        assert_eq!(parse_bool("0"), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
