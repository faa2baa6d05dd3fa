use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use std::{env, fmt, str::FromStr, time::Duration};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    /// Empty selects the in-memory store.
    #[serde(default)]
    pub database_url: String,

    #[serde(default = "default_max_connections")]
    pub database_max_connections: u32,

    #[serde(default = "default_true")]
    pub run_migrations: bool,

    #[serde(default)]
    pub seed_sample_data: bool,

    #[serde(default = "default_cors_origins")]
    pub cors_allowed_origins: Vec<String>,

    #[serde(default)]
    pub trust_x_forwarded_for: bool,

    #[serde(default = "default_log_format")]
    pub log_format: LogFormat,

    #[serde(default = "default_admin_email")]
    pub admin_email: String,

    #[serde(default = "default_mailer_from")]
    pub mailer_from: String,

    /// Mail relay endpoint; without one, emails are only logged.
    #[serde(default)]
    pub mailer_endpoint: Option<String>,

    #[serde(default)]
    pub mailer_api_key: Option<String>,

    #[serde(default = "default_mailer_timeout")]
    pub mailer_timeout_secs: u64,

    #[serde(default = "default_notification_attempts")]
    pub notification_max_attempts: u32,

    #[serde(default = "default_notification_retry_base")]
    pub notification_retry_base_ms: u64,

    #[serde(default = "default_shutdown_grace")]
    pub shutdown_grace_secs: u64,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Portfolio-API".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_max_connections() -> u32 {
    20
}
fn default_true() -> bool {
    true
}
fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}
fn default_log_format() -> LogFormat {
    LogFormat::Pretty
}
fn default_admin_email() -> String {
    "admin@portfolio.com".to_string()
}
fn default_mailer_from() -> String {
    "noreply@portfolio.com".to_string()
}
fn default_mailer_timeout() -> u64 {
    10
}
fn default_notification_attempts() -> u32 {
    5
}
fn default_notification_retry_base() -> u64 {
    500
}
fn default_shutdown_grace() -> u64 {
    10
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("cors_allowed_origins")
                    .try_parsing(true)
                    .ignore_empty(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        config.validate()?;
        Ok(config)
    }

    /// Baseline used by tests: memory store, no seeding, fast retries.
    pub fn for_testing() -> Self {
        AppConfig {
            env: AppEnvironment::Testing,
            name: "Portfolio-API-Test".to_string(),
            port: 0,
            host: "127.0.0.1".to_string(),
            worker_count: 1,
            database_url: String::new(),
            database_max_connections: 1,
            run_migrations: false,
            seed_sample_data: false,
            cors_allowed_origins: default_cors_origins(),
            trust_x_forwarded_for: true,
            log_format: LogFormat::Pretty,
            admin_email: default_admin_email(),
            mailer_from: default_mailer_from(),
            mailer_endpoint: None,
            mailer_api_key: None,
            mailer_timeout_secs: 1,
            notification_max_attempts: 3,
            notification_retry_base_ms: 1,
            shutdown_grace_secs: 1,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.is_production() && self.database_url.trim().is_empty() {
            errors.push("DATABASE_URL must be set in production");
        }
        if self.is_production() && self.cors_origins().iter().any(|o| o == "*") {
            errors.push("Wildcard CORS (*) is not allowed in production");
        }
        if self.notification_max_attempts == 0 {
            errors.push("NOTIFICATION_MAX_ATTEMPTS must be at least 1");
        }
        if self.admin_email.trim().is_empty() {
            errors.push("ADMIN_EMAIL cannot be empty");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn uses_database(&self) -> bool {
        !self.database_url.trim().is_empty()
    }

    /// Origins allowed by CORS. Outside production every origin is allowed.
    pub fn cors_origins(&self) -> Vec<String> {
        self.cors_allowed_origins
            .iter()
            .flat_map(|origin| origin.split(','))
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn allows_any_origin(&self) -> bool {
        !self.is_production() || self.cors_origins().iter().any(|o| o == "*")
    }

    pub fn mailer_timeout(&self) -> Duration {
        Duration::from_secs(self.mailer_timeout_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for str {
    fn redact(&self) -> &str {
        if self.is_empty() {
            "[MISSING]"
        } else {
            "[REDACTED]"
        }
    }
}

impl Redact for Option<String> {
    fn redact(&self) -> &str {
        self.as_deref().unwrap_or("").redact()
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("database_url", &self.database_url.as_str().redact())
            .field("database_max_connections", &self.database_max_connections)
            .field("run_migrations", &self.run_migrations)
            .field("seed_sample_data", &self.seed_sample_data)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("trust_x_forwarded_for", &self.trust_x_forwarded_for)
            .field("log_format", &self.log_format)
            .field("admin_email", &self.admin_email)
            .field("mailer_from", &self.mailer_from)
            .field("mailer_endpoint", &self.mailer_endpoint)
            .field("mailer_api_key", &self.mailer_api_key.redact())
            .field("notification_max_attempts", &self.notification_max_attempts)
            .field("notification_retry_base_ms", &self.notification_retry_base_ms)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn production_rejects_wildcard_cors_and_missing_database() {
        let mut config = AppConfig::for_testing();
        config.env = AppEnvironment::Production;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("DATABASE_URL"));
        assert!(err.contains("Wildcard CORS"));
    }

    #[test]
    fn cors_origins_split_comma_separated_entries() {
        let mut config = AppConfig::for_testing();
        config.cors_allowed_origins = vec!["https://a.dev, https://b.dev".into(), " ".into()];
        assert_eq!(config.cors_origins(), vec!["https://a.dev", "https://b.dev"]);
    }

    #[test]
    fn any_origin_is_allowed_outside_production() {
        let mut config = AppConfig::for_testing();
        config.cors_allowed_origins = vec!["https://a.dev".into()];
        assert!(config.allows_any_origin());

        config.env = AppEnvironment::Production;
        assert!(!config.allows_any_origin());
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let mut config = AppConfig::for_testing();
        config.database_url = "postgres://user:secret@db/portfolio".into();
        config.mailer_api_key = Some("key-123".into());

        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("secret"));
        assert!(!rendered.contains("key-123"));
    }
}
