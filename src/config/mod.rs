use std::env;
use std::path::PathBuf;
use anyhow::{Result, Context};
use tracing::{info, warn};

pub const DEFAULT_JOB_DESCRIPTION: &str = "software engineer python machine learning";
pub const DEFAULT_LLM_MODEL: &str = "gemini-1.5-flash-001";
pub const DEFAULT_LLM_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl LogFormat {
    /// Read before the subscriber is installed, so it is not part of [`Config`].
    pub fn from_env() -> Self {
        match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub max_file_size_mb: usize,
    pub max_concurrent_requests: usize,
    pub llm_timeout_seconds: u64,
    pub storage_dir: PathBuf,
    pub gemini_api_key: Option<String>,
    pub llm_model: String,
    pub llm_base_url: String,
    pub job_description: String,
}

// Hand-written so the API key never reaches the logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("server_host", &self.server_host)
            .field("server_port", &self.server_port)
            .field("max_file_size_mb", &self.max_file_size_mb)
            .field("max_concurrent_requests", &self.max_concurrent_requests)
            .field("llm_timeout_seconds", &self.llm_timeout_seconds)
            .field("storage_dir", &self.storage_dir)
            .field("gemini_api_key", &self.gemini_api_key.as_ref().map(|_| "<redacted>"))
            .field("llm_model", &self.llm_model)
            .field("llm_base_url", &self.llm_base_url)
            .field("job_description", &self.job_description)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 8000,
            max_file_size_mb: 10,
            max_concurrent_requests: 100,
            llm_timeout_seconds: 60,
            storage_dir: PathBuf::from("extracted_resumes"),
            gemini_api_key: None,
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            llm_base_url: DEFAULT_LLM_BASE_URL.to_string(),
            job_description: DEFAULT_JOB_DESCRIPTION.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        let defaults = Config::default();

        let config = Config {
            server_host: Self::string_env_var("SERVER_HOST", &defaults.server_host),
            server_port: Self::parse_env_var("SERVER_PORT", defaults.server_port)
                .context("Failed to parse SERVER_PORT")?,
            max_file_size_mb: Self::parse_env_var("MAX_FILE_SIZE_MB", defaults.max_file_size_mb)
                .context("Failed to parse MAX_FILE_SIZE_MB")?,
            max_concurrent_requests: Self::parse_env_var(
                "MAX_CONCURRENT_REQUESTS",
                defaults.max_concurrent_requests,
            )
            .context("Failed to parse MAX_CONCURRENT_REQUESTS")?,
            llm_timeout_seconds: Self::parse_env_var("LLM_TIMEOUT_SECONDS", defaults.llm_timeout_seconds)
                .context("Failed to parse LLM_TIMEOUT_SECONDS")?,
            storage_dir: env::var("STORAGE_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.storage_dir),
            gemini_api_key: env::var("GEMINI_API_KEY")
                .ok()
                .map(|key| key.trim().to_string())
                .filter(|key| !key.is_empty()),
            llm_model: Self::string_env_var("LLM_MODEL", &defaults.llm_model),
            llm_base_url: Self::string_env_var("LLM_BASE_URL", &defaults.llm_base_url),
            job_description: Self::string_env_var("JOB_DESCRIPTION", &defaults.job_description),
        };

        config.validate()?;

        if config.gemini_api_key.is_none() {
            warn!("GEMINI_API_KEY not set; resume uploads will fail at the LLM step");
        }

        info!("Configuration loaded successfully: {:?}", config);
        Ok(config)
    }

    fn string_env_var(var_name: &str, default: &str) -> String {
        env::var(var_name).unwrap_or_else(|_| {
            info!("{} not set, using default: {}", var_name, default);
            default.to_string()
        })
    }

    fn parse_env_var<T>(var_name: &str, default: T) -> Result<T>
    where
        T: std::str::FromStr + Copy + std::fmt::Debug,
        T::Err: std::fmt::Display,
    {
        match env::var(var_name) {
            Ok(val) => match val.parse() {
                Ok(parsed) => Ok(parsed),
                Err(e) => {
                    warn!("Failed to parse {}: {} (using default: {:?})", var_name, e, default);
                    Ok(default)
                }
            },
            Err(_) => {
                info!("{} not set, using default: {:?}", var_name, default);
                Ok(default)
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.server_port == 0 {
            return Err(anyhow::anyhow!("SERVER_PORT must be greater than 0"));
        }
        if self.max_file_size_mb == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }
        if self.max_concurrent_requests == 0 {
            return Err(anyhow::anyhow!("MAX_CONCURRENT_REQUESTS must be greater than 0"));
        }
        if self.llm_timeout_seconds == 0 {
            return Err(anyhow::anyhow!("LLM_TIMEOUT_SECONDS must be greater than 0"));
        }
        Ok(())
    }

    pub fn max_file_size_bytes(&self) -> usize {
        self.max_file_size_mb * 1024 * 1024
    }
}
