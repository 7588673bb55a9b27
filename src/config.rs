use std::path::PathBuf;
use std::time::Duration;

pub const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_LANGUAGE: &str = "ko-KR";
pub const REQUEST_TIMEOUT_SECS: u64 = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub db_path: PathBuf,
    pub base_url: String,
    pub timeout: Duration,
    pub language: String,
    /// Used when no key is stored. Baked in from `TMDB_API_KEY` at build time.
    pub fallback_api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            db_path: PathBuf::from("nextflix.db"),
            base_url: TMDB_BASE_URL.to_owned(),
            timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            language: DEFAULT_LANGUAGE.to_owned(),
            fallback_api_key: option_env!("TMDB_API_KEY")
                .filter(|key| !key.is_empty())
                .map(str::to_owned),
        }
    }
}
