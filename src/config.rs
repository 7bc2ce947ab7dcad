use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BANK_PATH: &str = "questions.csv";
pub const DEFAULT_REVEAL_DELAY_MS: u64 = 250;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a non-negative integer, got {value:?}")]
    NotANumber { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub bank_path: PathBuf,
    pub reveal_delay: Duration,
    /// Sampler seed; `None` draws one from the OS.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bank_path: PathBuf::from(DEFAULT_BANK_PATH),
            reveal_delay: Duration::from_millis(DEFAULT_REVEAL_DELAY_MS),
            seed: None,
        }
    }
}

impl Config {
    /// Reads `QUIZ_BANK_PATH`, `QUIZ_REVEAL_DELAY_MS` and `QUIZ_SEED`.
    /// Call `dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();
        if let Some(path) = lookup("QUIZ_BANK_PATH").filter(|p| !p.trim().is_empty()) {
            config.bank_path = PathBuf::from(path);
        }
        if let Some(ms) = parse_number("QUIZ_REVEAL_DELAY_MS", lookup("QUIZ_REVEAL_DELAY_MS"))? {
            config.reveal_delay = Duration::from_millis(ms);
        }
        config.seed = parse_number("QUIZ_SEED", lookup("QUIZ_SEED"))?;
        Ok(config)
    }
}

fn parse_number(name: &'static str, value: Option<String>) -> Result<Option<u64>, ConfigError> {
    match value {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::NotANumber { name, value }),
    }
}
