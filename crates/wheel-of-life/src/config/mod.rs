use secrecy::SecretString;
use std::env;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

/// Distinguishes runtime behavior for different stages of the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Development,
    Test,
    Production,
}

impl AppEnvironment {
    fn from_str(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "prod" | "production" => Self::Production,
            "test" | "ci" => Self::Test,
            _ => Self::Development,
        }
    }
}

/// Top-level configuration for the application.
#[derive(Debug)]
pub struct AppConfig {
    pub environment: AppEnvironment,
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub mail: MailConfig,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let environment = AppEnvironment::from_str(
            &env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
        );

        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse::<u16>()
            .map_err(|_| ConfigError::InvalidPort)?;

        let log_level = env::var("APP_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            environment,
            server: ServerConfig { host, port },
            telemetry: TelemetryConfig { log_level },
            mail: MailConfig::from_env()?,
        })
    }
}

/// Settings controlling the HTTP server binding.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        if self.host.eq_ignore_ascii_case("localhost") {
            return Ok(SocketAddr::new(IpAddr::from([127, 0, 0, 1]), self.port));
        }

        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|source| ConfigError::InvalidHost { source })?;

        Ok(SocketAddr::new(ip, self.port))
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";
pub const DEFAULT_SMTP_PORT: u16 = 465;
pub const DEFAULT_FROM_NAME: &str = "Wheel of Life";

/// Outbound mail settings. The sender account and its credential are both
/// optional here; [`MailConfig::sender`] refuses to hand out an identity
/// unless both are present.
#[derive(Debug)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub from_name: String,
    pub account: Option<String>,
    pub credential: Option<SecretString>,
    pub send_timeout: Option<Duration>,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            smtp_host: DEFAULT_SMTP_HOST.to_string(),
            smtp_port: DEFAULT_SMTP_PORT,
            from_name: DEFAULT_FROM_NAME.to_string(),
            account: None,
            credential: None,
            send_timeout: None,
        }
    }
}

impl MailConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let smtp_host = non_blank_var("SMTP_HOST").unwrap_or_else(|| DEFAULT_SMTP_HOST.to_string());
        let smtp_port = match non_blank_var("SMTP_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidSmtpPort)?,
            None => DEFAULT_SMTP_PORT,
        };
        let from_name =
            non_blank_var("EMAIL_FROM_NAME").unwrap_or_else(|| DEFAULT_FROM_NAME.to_string());
        let send_timeout = match non_blank_var("MAIL_SEND_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Some(Duration::from_secs(secs)),
                _ => return Err(ConfigError::InvalidMailTimeout { value: raw }),
            },
            None => None,
        };

        Ok(Self {
            smtp_host,
            smtp_port,
            from_name,
            account: non_blank_var("EMAIL_USER"),
            credential: non_blank_var("EMAIL_PASSWORD").map(SecretString::from),
            send_timeout,
        })
    }

    pub fn with_sender(
        mut self,
        account: impl Into<String>,
        credential: impl Into<String>,
    ) -> Self {
        self.account = Some(account.into());
        self.credential = Some(SecretString::from(credential.into()));
        self
    }

    pub fn is_configured(&self) -> bool {
        self.sender().is_ok()
    }

    /// Resolve the sending identity, or report which secret is missing.
    pub fn sender(&self) -> Result<SenderIdentity<'_>, MailNotConfigured> {
        let account = self
            .account
            .as_deref()
            .ok_or(MailNotConfigured {
                missing: "EMAIL_USER",
            })?;
        let credential = self.credential.as_ref().ok_or(MailNotConfigured {
            missing: "EMAIL_PASSWORD",
        })?;

        Ok(SenderIdentity {
            account,
            credential,
            display_name: &self.from_name,
        })
    }
}

/// Borrowed view of the configured sender, passed to a mail transport.
#[derive(Debug, Clone, Copy)]
pub struct SenderIdentity<'a> {
    pub account: &'a str,
    pub credential: &'a SecretString,
    pub display_name: &'a str,
}

/// Raised when a send is requested without both sender secrets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("email service is not configured ({missing} is not set)")]
pub struct MailNotConfigured {
    pub missing: &'static str,
}

fn non_blank_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidPort,
    InvalidHost { source: std::net::AddrParseError },
    InvalidSmtpPort,
    InvalidMailTimeout { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPort => write!(f, "APP_PORT must be a valid u16"),
            ConfigError::InvalidHost { .. } => {
                write!(f, "APP_HOST must parse to an IPv4 or IPv6 address")
            }
            ConfigError::InvalidSmtpPort => write!(f, "SMTP_PORT must be a valid u16"),
            ConfigError::InvalidMailTimeout { value } => write!(
                f,
                "MAIL_SEND_TIMEOUT_SECS must be a positive number of seconds, got '{}'",
                value
            ),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConfigError::InvalidHost { source } => Some(source),
            ConfigError::InvalidPort
            | ConfigError::InvalidSmtpPort
            | ConfigError::InvalidMailTimeout { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::env;
    use std::sync::{Mutex, OnceLock};

    fn env_guard() -> &'static Mutex<()> {
        static GUARD: OnceLock<Mutex<()>> = OnceLock::new();
        GUARD.get_or_init(|| Mutex::new(()))
    }

    fn reset_env() {
        for key in [
            "APP_ENV",
            "APP_HOST",
            "APP_PORT",
            "APP_LOG_LEVEL",
            "SMTP_HOST",
            "SMTP_PORT",
            "EMAIL_USER",
            "EMAIL_PASSWORD",
            "EMAIL_FROM_NAME",
            "MAIL_SEND_TIMEOUT_SECS",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    fn load_uses_defaults_when_env_missing() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        let config = AppConfig::load().expect("config loads with defaults");
        assert_eq!(config.environment, AppEnvironment::Development);
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.telemetry.log_level, "info");
        assert_eq!(config.mail.smtp_host, DEFAULT_SMTP_HOST);
        assert_eq!(config.mail.smtp_port, DEFAULT_SMTP_PORT);
        assert!(config.mail.send_timeout.is_none());
    }

    #[test]
    fn accepts_localhost_host() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("APP_HOST", "localhost");
        let config = AppConfig::load().expect("config loads");
        let addr = config.server.socket_addr().expect("localhost resolves");
        assert_eq!(addr, SocketAddr::new(IpAddr::from([127, 0, 0, 1]), 3000));
    }

    #[test]
    fn mail_requires_both_secrets() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("EMAIL_USER", "coach@example.com");
        env::set_var("EMAIL_PASSWORD", "   ");
        let config = AppConfig::load().expect("config loads");

        assert!(!config.mail.is_configured());
        assert_eq!(
            config.mail.sender().map(|sender| sender.account),
            Err(MailNotConfigured {
                missing: "EMAIL_PASSWORD"
            })
        );
    }

    #[test]
    fn mail_sender_resolves_when_configured() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("EMAIL_USER", "coach@example.com");
        env::set_var("EMAIL_PASSWORD", "app-password");
        env::set_var("MAIL_SEND_TIMEOUT_SECS", "15");
        let config = AppConfig::load().expect("config loads");

        let sender = config.mail.sender().expect("sender configured");
        assert_eq!(sender.account, "coach@example.com");
        assert_eq!(sender.credential.expose_secret(), "app-password");
        assert_eq!(sender.display_name, DEFAULT_FROM_NAME);
        assert_eq!(config.mail.send_timeout, Some(Duration::from_secs(15)));
    }

    #[test]
    fn rejects_invalid_mail_timeout() {
        let _lock = env_guard().lock().expect("env mutex poisoned");
        reset_env();
        env::set_var("MAIL_SEND_TIMEOUT_SECS", "0");
        assert!(matches!(
            AppConfig::load(),
            Err(ConfigError::InvalidMailTimeout { .. })
        ));
        reset_env();
    }
}
