use std::env;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr};
use std::str::FromStr;

pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_ANTHROPIC_MODEL: &str = "claude-haiku-4.5";
pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_ANTHROPIC_API_URL: &str = "https://api.anthropic.com";

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub enable_file_logs: bool,
    pub log_dir: String,
    pub cors_origin: String,
    pub ai: AiConfig,
}

/// Which generation backend the advisor talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiProvider {
    Gemini,
    Anthropic,
    None,
}

impl AiProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            AiProvider::Gemini => "gemini",
            AiProvider::Anthropic => "anthropic",
            AiProvider::None => "none",
        }
    }

    fn default_model(&self) -> &'static str {
        match self {
            AiProvider::Gemini => DEFAULT_GEMINI_MODEL,
            AiProvider::Anthropic => DEFAULT_ANTHROPIC_MODEL,
            AiProvider::None => "",
        }
    }
}

impl FromStr for AiProvider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gemini" | "google" => Ok(AiProvider::Gemini),
            "anthropic" | "claude" => Ok(AiProvider::Anthropic),
            "none" | "off" | "" => Ok(AiProvider::None),
            other => Err(format!("unknown AI provider: {other}")),
        }
    }
}

/// What a configured-but-failing backend degrades to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureFallback {
    ErrorPlan,
    MockPlan,
}

impl FailureFallback {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureFallback::ErrorPlan => "error",
            FailureFallback::MockPlan => "mock",
        }
    }
}

impl FromStr for FailureFallback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "error" => Ok(FailureFallback::ErrorPlan),
            "mock" => Ok(FailureFallback::MockPlan),
            other => Err(format!("unknown failure fallback: {other}")),
        }
    }
}

#[derive(Clone)]
pub struct AiConfig {
    pub provider: AiProvider,
    pub model: String,
    pub gemini_api_key: String,
    pub anthropic_api_key: String,
    pub gemini_api_url: String,
    pub anthropic_api_url: String,
    pub timeout_secs: u64,
    pub failure_fallback: FailureFallback,
}

impl fmt::Debug for AiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AiConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("gemini_api_key", &"***REDACTED***")
            .field("anthropic_api_key", &"***REDACTED***")
            .field("gemini_api_url", &self.gemini_api_url)
            .field("anthropic_api_url", &self.anthropic_api_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("failure_fallback", &self.failure_fallback)
            .finish()
    }
}

impl AiConfig {
    /// Provider actually in effect: a selected provider without its credential
    /// degrades to `None`.
    pub fn effective_provider(&self) -> AiProvider {
        match self.provider {
            AiProvider::Gemini if !self.gemini_api_key.trim().is_empty() => AiProvider::Gemini,
            AiProvider::Anthropic if !self.anthropic_api_key.trim().is_empty() => {
                AiProvider::Anthropic
            }
            _ => AiProvider::None,
        }
    }

    pub fn effective_model(&self) -> String {
        if self.model.trim().is_empty() {
            self.provider.default_model().to_string()
        } else {
            self.model.trim().to_string()
        }
    }

    /// Configuration with no backend, used when nothing is set in the environment.
    pub fn disabled() -> Self {
        Self {
            provider: AiProvider::None,
            model: String::new(),
            gemini_api_key: String::new(),
            anthropic_api_key: String::new(),
            gemini_api_url: DEFAULT_GEMINI_API_URL.to_string(),
            anthropic_api_url: DEFAULT_ANTHROPIC_API_URL.to_string(),
            timeout_secs: 30,
            failure_fallback: FailureFallback::ErrorPlan,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            host: env_or_parse("HOST", IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))),
            port: env_or_parse("PORT", 4000_u16),
            log_level: env_or("RUST_LOG", "info"),
            enable_file_logs: env_or_bool("ENABLE_FILE_LOGS", false),
            log_dir: env_or("LOG_DIR", "./logs"),
            cors_origin: env_or("CORS_ORIGIN", "http://localhost:5173"),
            ai: AiConfig {
                provider: env_or_variant("AI_PROVIDER", AiProvider::Gemini, AiProvider::None),
                model: env_or("AI_MODEL", ""),
                gemini_api_key: env_or("GEMINI_API_KEY", ""),
                anthropic_api_key: env_or("ANTHROPIC_API_KEY", ""),
                gemini_api_url: env_or("GEMINI_API_URL", DEFAULT_GEMINI_API_URL),
                anthropic_api_url: env_or("ANTHROPIC_API_URL", DEFAULT_ANTHROPIC_API_URL),
                timeout_secs: env_or_parse("AI_TIMEOUT_SECS", 30_u64),
                failure_fallback: env_or_variant(
                    "AI_FAILURE_FALLBACK",
                    FailureFallback::ErrorPlan,
                    FailureFallback::ErrorPlan,
                ),
            },
        }
    }
}

pub fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

pub fn env_or_parse<T>(key: &str, default: T) -> T
where
    T: FromStr + Copy,
{
    match env::var(key) {
        Ok(raw) => match raw.parse::<T>() {
            Ok(v) => v,
            Err(_) => {
                tracing::warn!(
                    key,
                    value = %raw,
                    "Failed to parse env var, using default"
                );
                default
            }
        },
        Err(_) => default,
    }
}

pub fn env_or_bool(key: &str, default: bool) -> bool {
    match env::var(key) {
        Ok(raw) => match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => default,
        },
        Err(_) => default,
    }
}

/// Like `env_or_parse`, but unrecognized values resolve to `unknown` instead of the default.
fn env_or_variant<T>(key: &str, default: T, unknown: T) -> T
where
    T: FromStr<Err = String>,
{
    match env::var(key) {
        Ok(raw) => match raw.parse::<T>() {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(key, value = %raw, error = %e, "Unrecognized env var value");
                unknown
            }
        },
        Err(_) => default,
    }
}
