use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use chrono_tz::Tz;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::hours::BusinessHours;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub whatsapp: WhatsAppConfig,
    pub hours: HoursConfig,
    pub feeds: FeedsConfig,
    pub server: ServerConfig,
    pub logging: LoggingConfig,
}

#[derive(Clone, Debug)]
pub struct WhatsAppConfig {
    pub verify_token: SecretString,
    pub access_token: SecretString,
    pub phone_number_id: String,
    /// Recipient of operator alerts. Unset disables alerting entirely.
    pub alert_recipient: Option<String>,
}

#[derive(Clone, Debug)]
pub struct HoursConfig {
    pub timezone: String,
    pub start_hour: u32,
    pub end_hour: u32,
}

impl HoursConfig {
    pub fn business_hours(&self) -> Result<BusinessHours, ConfigError> {
        let timezone = Tz::from_str(self.timezone.trim()).map_err(|_| {
            ConfigError::Validation(format!(
                "hours.timezone `{}` is not a known IANA timezone",
                self.timezone
            ))
        })?;
        Ok(BusinessHours::new(timezone, self.start_hour, self.end_hour))
    }
}

#[derive(Clone, Debug)]
pub struct FeedsConfig {
    /// Inventory feed URL. Unset disables the inventory lookup stage.
    pub inventory_url: Option<String>,
    pub inventory_ttl_secs: u64,
    /// Dynamic rule feed URL. Unset disables the rule stage.
    pub rules_url: Option<String>,
    pub rules_ttl_secs: u64,
}

impl FeedsConfig {
    pub fn inventory_ttl(&self) -> Duration {
        Duration::from_secs(self.inventory_ttl_secs)
    }

    pub fn rules_ttl(&self) -> Duration {
        Duration::from_secs(self.rules_ttl_secs)
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
}

#[derive(Clone, Debug)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(ConfigError::Validation(format!(
                "unsupported log format `{other}` (expected compact|pretty|json)"
            ))),
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct ConfigOverrides {
    pub verify_token: Option<String>,
    pub access_token: Option<String>,
    pub phone_number_id: Option<String>,
    pub alert_recipient: Option<String>,
    pub inventory_url: Option<String>,
    pub rules_url: Option<String>,
    pub log_level: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub struct LoadOptions {
    pub config_path: Option<PathBuf>,
    pub require_file: bool,
    pub overrides: ConfigOverrides,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file `{path}`: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },
    #[error("could not parse config file `{path}`: {source}")]
    ParseFile { path: PathBuf, source: toml::de::Error },
    #[error("required config file was not found: `{0}`")]
    MissingConfigFile(PathBuf),
    #[error("environment variable interpolation failed for `{var}`")]
    MissingEnvInterpolation { var: String },
    #[error("unterminated environment interpolation expression")]
    UnterminatedInterpolation,
    #[error("invalid environment override for `{key}`: `{value}`")]
    InvalidEnvOverride { key: String, value: String },
    #[error("configuration validation failed: {0}")]
    Validation(String),
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            whatsapp: WhatsAppConfig {
                verify_token: String::new().into(),
                access_token: String::new().into(),
                phone_number_id: String::new(),
                alert_recipient: None,
            },
            hours: HoursConfig {
                timezone: "America/Bogota".to_string(),
                start_hour: 9,
                end_hour: 18,
            },
            feeds: FeedsConfig {
                inventory_url: None,
                inventory_ttl_secs: 120,
                rules_url: None,
                rules_ttl_secs: 120,
            },
            server: ServerConfig { bind_address: "0.0.0.0".to_string(), port: 3000 },
            logging: LoggingConfig { level: "info".to_string(), format: LogFormat::Compact },
        }
    }
}

impl AppConfig {
    pub fn load(options: LoadOptions) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        let maybe_path = resolve_config_path(options.config_path.as_deref());

        if let Some(path) = maybe_path {
            let patch = read_patch(&path)?;
            config.apply_patch(patch);
        } else if options.require_file {
            let expected = options.config_path.unwrap_or_else(|| PathBuf::from("regalo.toml"));
            return Err(ConfigError::MissingConfigFile(expected));
        }

        config.apply_env_overrides()?;
        config.apply_overrides(options.overrides);
        config.validate()?;

        Ok(config)
    }

    fn apply_patch(&mut self, patch: ConfigPatch) {
        if let Some(whatsapp) = patch.whatsapp {
            if let Some(token) = whatsapp.verify_token {
                self.whatsapp.verify_token = token.into();
            }
            if let Some(token) = whatsapp.access_token {
                self.whatsapp.access_token = token.into();
            }
            if let Some(phone_number_id) = whatsapp.phone_number_id {
                self.whatsapp.phone_number_id = phone_number_id;
            }
            if let Some(alert_recipient) = whatsapp.alert_recipient {
                self.whatsapp.alert_recipient = Some(alert_recipient);
            }
        }

        if let Some(hours) = patch.hours {
            if let Some(timezone) = hours.timezone {
                self.hours.timezone = timezone;
            }
            if let Some(start_hour) = hours.start_hour {
                self.hours.start_hour = start_hour;
            }
            if let Some(end_hour) = hours.end_hour {
                self.hours.end_hour = end_hour;
            }
        }

        if let Some(feeds) = patch.feeds {
            if let Some(inventory_url) = feeds.inventory_url {
                self.feeds.inventory_url = Some(inventory_url);
            }
            if let Some(ttl) = feeds.inventory_ttl_secs {
                self.feeds.inventory_ttl_secs = ttl;
            }
            if let Some(rules_url) = feeds.rules_url {
                self.feeds.rules_url = Some(rules_url);
            }
            if let Some(ttl) = feeds.rules_ttl_secs {
                self.feeds.rules_ttl_secs = ttl;
            }
        }

        if let Some(server) = patch.server {
            if let Some(bind_address) = server.bind_address {
                self.server.bind_address = bind_address;
            }
            if let Some(port) = server.port {
                self.server.port = port;
            }
        }

        if let Some(logging) = patch.logging {
            if let Some(level) = logging.level {
                self.logging.level = level;
            }
            if let Some(format) = logging.format {
                self.logging.format = format;
            }
        }
    }

    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env("REGALO_WHATSAPP_VERIFY_TOKEN") {
            self.whatsapp.verify_token = value.into();
        }
        if let Some(value) = read_env("REGALO_WHATSAPP_ACCESS_TOKEN") {
            self.whatsapp.access_token = value.into();
        }
        if let Some(value) = read_env("REGALO_WHATSAPP_PHONE_NUMBER_ID") {
            self.whatsapp.phone_number_id = value;
        }
        if let Some(value) = read_env("REGALO_WHATSAPP_ALERT_RECIPIENT") {
            self.whatsapp.alert_recipient = Some(value);
        }

        if let Some(value) = read_env("REGALO_HOURS_TIMEZONE") {
            self.hours.timezone = value;
        }
        if let Some(value) = read_env("REGALO_HOURS_START_HOUR") {
            self.hours.start_hour = parse_u32("REGALO_HOURS_START_HOUR", &value)?;
        }
        if let Some(value) = read_env("REGALO_HOURS_END_HOUR") {
            self.hours.end_hour = parse_u32("REGALO_HOURS_END_HOUR", &value)?;
        }

        if let Some(value) = read_env("REGALO_FEEDS_INVENTORY_URL") {
            self.feeds.inventory_url = Some(value);
        }
        if let Some(value) = read_env("REGALO_FEEDS_INVENTORY_TTL_SECS") {
            self.feeds.inventory_ttl_secs = parse_u64("REGALO_FEEDS_INVENTORY_TTL_SECS", &value)?;
        }
        if let Some(value) = read_env("REGALO_FEEDS_RULES_URL") {
            self.feeds.rules_url = Some(value);
        }
        if let Some(value) = read_env("REGALO_FEEDS_RULES_TTL_SECS") {
            self.feeds.rules_ttl_secs = parse_u64("REGALO_FEEDS_RULES_TTL_SECS", &value)?;
        }

        if let Some(value) = read_env("REGALO_SERVER_BIND_ADDRESS") {
            self.server.bind_address = value;
        }
        if let Some(value) = read_env("REGALO_SERVER_PORT") {
            self.server.port = parse_u16("REGALO_SERVER_PORT", &value)?;
        }

        let log_level = read_env("REGALO_LOGGING_LEVEL").or_else(|| read_env("REGALO_LOG_LEVEL"));
        if let Some(value) = log_level {
            self.logging.level = value;
        }
        let log_format =
            read_env("REGALO_LOGGING_FORMAT").or_else(|| read_env("REGALO_LOG_FORMAT"));
        if let Some(value) = log_format {
            self.logging.format = value.parse()?;
        }

        Ok(())
    }

    fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(verify_token) = overrides.verify_token {
            self.whatsapp.verify_token = verify_token.into();
        }
        if let Some(access_token) = overrides.access_token {
            self.whatsapp.access_token = access_token.into();
        }
        if let Some(phone_number_id) = overrides.phone_number_id {
            self.whatsapp.phone_number_id = phone_number_id;
        }
        if let Some(alert_recipient) = overrides.alert_recipient {
            self.whatsapp.alert_recipient = Some(alert_recipient);
        }
        if let Some(inventory_url) = overrides.inventory_url {
            self.feeds.inventory_url = Some(inventory_url);
        }
        if let Some(rules_url) = overrides.rules_url {
            self.feeds.rules_url = Some(rules_url);
        }
        if let Some(log_level) = overrides.log_level {
            self.logging.level = log_level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_whatsapp(&self.whatsapp)?;
        validate_hours(&self.hours)?;
        validate_feeds(&self.feeds)?;
        validate_server(&self.server)?;
        validate_logging(&self.logging)?;
        Ok(())
    }
}

fn resolve_config_path(explicit_path: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit_path {
        return path.exists().then_some(path.to_path_buf());
    }

    [PathBuf::from("regalo.toml"), PathBuf::from("config/regalo.toml")]
        .into_iter()
        .find(|path| path.exists())
}

fn read_patch(path: &Path) -> Result<ConfigPatch, ConfigError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| ConfigError::ReadFile { path: path.to_path_buf(), source })?;

    let interpolated = interpolate_env_vars(&raw)?;
    toml::from_str::<ConfigPatch>(&interpolated)
        .map_err(|source| ConfigError::ParseFile { path: path.to_path_buf(), source })
}

fn interpolate_env_vars(input: &str) -> Result<String, ConfigError> {
    let mut output = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && matches!(chars.peek(), Some('{')) {
            chars.next();
            let mut key = String::new();

            loop {
                match chars.next() {
                    Some('}') => break,
                    Some(next) => key.push(next),
                    None => return Err(ConfigError::UnterminatedInterpolation),
                }
            }

            let value = env::var(&key)
                .map_err(|_| ConfigError::MissingEnvInterpolation { var: key.clone() })?;
            output.push_str(&value);
            continue;
        }

        output.push(ch);
    }

    Ok(output)
}

fn validate_whatsapp(whatsapp: &WhatsAppConfig) -> Result<(), ConfigError> {
    if whatsapp.verify_token.expose_secret().trim().is_empty() {
        return Err(ConfigError::Validation(
            "whatsapp.verify_token is required for the webhook verification handshake".to_string(),
        ));
    }
    if whatsapp.access_token.expose_secret().trim().is_empty() {
        return Err(ConfigError::Validation(
            "whatsapp.access_token is required to send messages via the Cloud API".to_string(),
        ));
    }
    if whatsapp.phone_number_id.trim().is_empty() {
        return Err(ConfigError::Validation(
            "whatsapp.phone_number_id is required to send messages via the Cloud API".to_string(),
        ));
    }
    Ok(())
}

fn validate_hours(hours: &HoursConfig) -> Result<(), ConfigError> {
    if hours.start_hour > 23 || hours.end_hour > 23 {
        return Err(ConfigError::Validation(
            "hours.start_hour and hours.end_hour must be in range 0..=23".to_string(),
        ));
    }
    if hours.start_hour >= hours.end_hour {
        return Err(ConfigError::Validation(
            "hours.start_hour must be earlier than hours.end_hour".to_string(),
        ));
    }
    hours.business_hours().map(|_| ())
}

fn validate_feeds(feeds: &FeedsConfig) -> Result<(), ConfigError> {
    for (key, url) in
        [("feeds.inventory_url", &feeds.inventory_url), ("feeds.rules_url", &feeds.rules_url)]
    {
        if let Some(url) = url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ConfigError::Validation(format!(
                    "{key} must start with http:// or https://"
                )));
            }
        }
    }
    Ok(())
}

fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
    if server.bind_address.trim().is_empty() {
        return Err(ConfigError::Validation("server.bind_address must not be empty".to_string()));
    }
    if server.port == 0 {
        return Err(ConfigError::Validation("server.port must be greater than zero".to_string()));
    }
    Ok(())
}

fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
    let level = logging.level.trim().to_ascii_lowercase();
    match level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
        _ => Err(ConfigError::Validation(
            "logging.level must be one of trace|debug|info|warn|error".to_string(),
        )),
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn parse_u16(key: &str, value: &str) -> Result<u16, ConfigError> {
    value.parse::<u16>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u32(key: &str, value: &str) -> Result<u32, ConfigError> {
    value.parse::<u32>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

fn parse_u64(key: &str, value: &str) -> Result<u64, ConfigError> {
    value.parse::<u64>().map_err(|_| ConfigError::InvalidEnvOverride {
        key: key.to_string(),
        value: value.to_string(),
    })
}

#[derive(Debug, Default, Deserialize)]
struct ConfigPatch {
    whatsapp: Option<WhatsAppPatch>,
    hours: Option<HoursPatch>,
    feeds: Option<FeedsPatch>,
    server: Option<ServerPatch>,
    logging: Option<LoggingPatch>,
}

#[derive(Debug, Default, Deserialize)]
struct WhatsAppPatch {
    verify_token: Option<String>,
    access_token: Option<String>,
    phone_number_id: Option<String>,
    alert_recipient: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct HoursPatch {
    timezone: Option<String>,
    start_hour: Option<u32>,
    end_hour: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
struct FeedsPatch {
    inventory_url: Option<String>,
    inventory_ttl_secs: Option<u64>,
    rules_url: Option<String>,
    rules_ttl_secs: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct ServerPatch {
    bind_address: Option<String>,
    port: Option<u16>,
}

#[derive(Debug, Default, Deserialize)]
struct LoggingPatch {
    level: Option<String>,
    format: Option<LogFormat>,
}
