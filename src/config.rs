use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub migrations_path: PathBuf,
    /// Base URL of the web frontend, used to build password reset links.
    pub frontend_url: String,
    pub session_ttl_days: i64,
    pub reset_ttl_minutes: i64,
    /// When set, outgoing mail is POSTed as JSON to this endpoint instead of
    /// being written to the log.
    pub mail_webhook_url: Option<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: env::var("SPENDWISE_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env_parse("SPENDWISE_PORT").unwrap_or(5000),
            database_path: env::var("SPENDWISE_DATABASE_URL")
                .map(|v| {
                    PathBuf::from(
                        v.strip_prefix("sqlite://")
                            .or_else(|| v.strip_prefix("sqlite:"))
                            .unwrap_or(&v),
                    )
                })
                .unwrap_or_else(|_| PathBuf::from("data/spendwise.db")),
            migrations_path: env::var("SPENDWISE_MIGRATIONS_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("migrations")),
            frontend_url: env::var("SPENDWISE_FRONTEND_URL")
                .unwrap_or_else(|_| "http://127.0.0.1:5500/index.html".into()),
            session_ttl_days: env_parse("SPENDWISE_SESSION_DAYS").unwrap_or(7),
            reset_ttl_minutes: env_parse("SPENDWISE_RESET_MINUTES").unwrap_or(15),
            mail_webhook_url: env::var("SPENDWISE_MAIL_WEBHOOK_URL")
                .ok()
                .filter(|v| !v.trim().is_empty()),
        }
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 5000,
            database_path: PathBuf::from(":memory:"),
            migrations_path: PathBuf::from("migrations"),
            frontend_url: "http://localhost/index.html".into(),
            session_ttl_days: 7,
            reset_ttl_minutes: 15,
            mail_webhook_url: None,
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}
