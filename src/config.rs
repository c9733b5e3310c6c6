use std::env;
use std::path::PathBuf;

use chrono::{DateTime, TimeZone, Utc};
use tracing::warn;

/// The service being coordinated. Every field has a sensible default so a
/// bare checkout runs; env vars override them for the next event.
#[derive(Debug, Clone)]
pub struct EventConfig {
    pub title: String,
    pub description: String,
    pub location: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self {
            title: "Funeral - Fríkirkjan í Hafnarfirði".to_string(),
            description: "Funeral service at Fríkirkjan í Hafnarfirði. Please join us to \
                          remember and celebrate their life. Church website: \
                          https://www.frikirkja.is/"
                .to_string(),
            location: "Fríkirkjan í Hafnarfirði, Linnetsstígur 6, 220 Hafnarfjörður, Iceland"
                .to_string(),
            start: Utc.with_ymd_and_hms(2025, 6, 16, 13, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2025, 6, 16, 15, 0, 0).unwrap(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub uploads_dir: PathBuf,
    pub static_dir: PathBuf,
    /// When unset, the admin surface is open; nginx is expected to guard it.
    pub admin_token: Option<String>,
    /// Without a key the carpool matcher simply reports no matches.
    pub maps_api_key: Option<String>,
    pub maps_api_url: String,
    pub event: EventConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            data_dir: PathBuf::from("data"),
            uploads_dir: PathBuf::from("public/uploads"),
            static_dir: PathBuf::from("static"),
            admin_token: None,
            maps_api_key: None,
            maps_api_url: "https://maps.googleapis.com".to_string(),
            event: EventConfig::default(),
        }
    }
}

impl Config {
    pub fn load() -> Self {
        let defaults = Self::default();
        Self {
            host: env_or("HOST", defaults.host),
            port: env_parsed("PORT", defaults.port),
            data_dir: env_path_or("DATA_DIR", defaults.data_dir),
            uploads_dir: env_path_or("UPLOADS_DIR", defaults.uploads_dir),
            static_dir: env_path_or("STATIC_DIR", defaults.static_dir),
            admin_token: env_nonempty("ADMIN_TOKEN"),
            maps_api_key: env_nonempty("GOOGLE_MAPS_API_KEY"),
            maps_api_url: env_or("MAPS_API_URL", defaults.maps_api_url),
            event: EventConfig::load(defaults.event),
        }
    }
}

impl EventConfig {
    fn load(defaults: EventConfig) -> Self {
        Self {
            title: env_or("EVENT_TITLE", defaults.title),
            description: env_or("EVENT_DESCRIPTION", defaults.description),
            location: env_or("EVENT_LOCATION", defaults.location),
            start: env_datetime("EVENT_START", defaults.start),
            end: env_datetime("EVENT_END", defaults.end),
        }
    }
}

fn env_or(key: &str, default: String) -> String {
    env::var(key).unwrap_or(default)
}

fn env_nonempty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}

fn env_path_or(key: &str, default: PathBuf) -> PathBuf {
    env::var(key).map(PathBuf::from).unwrap_or(default)
}

fn env_parsed<T: std::str::FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("Invalid {} value {:?}, using default", key, raw);
            default
        }),
        Err(_) => default,
    }
}

fn env_datetime(key: &str, default: DateTime<Utc>) -> DateTime<Utc> {
    match env::var(key) {
        Ok(raw) => match DateTime::parse_from_rfc3339(&raw) {
            Ok(parsed) => parsed.with_timezone(&Utc),
            Err(err) => {
                warn!("Invalid {} value {:?} ({}), using default", key, raw, err);
                default
            }
        },
        Err(_) => default,
    }
}
