use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};

use lanes_client::{Session, Volume};

/// Heartbeat token used when `LANES_HEARTBEAT` is unset.
const DEFAULT_HEARTBEAT: &str = "--heartbeat--";

pub struct Config {
    pub base_url: String,
    pub ws_uri: String,
    pub heartbeat: String,
    pub session: Session,
    pub volume: Volume,
    pub session_cookie: Option<String>,
    pub page_data: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("LANES_BASE_URL").unwrap_or_else(|_| "http://127.0.0.1:8000".into());
        let ws_uri = required("LANES_WS_URI")?;
        let heartbeat = std::env::var("LANES_HEARTBEAT").unwrap_or_else(|_| DEFAULT_HEARTBEAT.into());

        let session = Session {
            my_id: required("LANES_USER_ID")?.parse().context("LANES_USER_ID")?,
            my_name: required("LANES_USER_NAME")?,
            is_admin: flag("LANES_IS_ADMIN", false),
            can_participate: flag("LANES_CAN_PARTICIPATE", true),
            room_id: required("LANES_ROOM_ID")?.parse().context("LANES_ROOM_ID")?,
            org: std::env::var("LANES_ORG").unwrap_or_default(),
        };

        let volume = match std::env::var("LANES_VOLUME") {
            Ok(v) => v.parse::<Volume>().map_err(|e| anyhow!("LANES_VOLUME: {}", e))?,
            Err(_) => Volume::default(),
        };

        Ok(Self {
            base_url,
            ws_uri,
            heartbeat,
            session,
            volume,
            session_cookie: std::env::var("LANES_SESSION").ok().filter(|s| !s.is_empty()),
            page_data: std::env::var("LANES_PAGE_DATA").ok().map(PathBuf::from),
        })
    }
}

fn required(name: &str) -> Result<String> {
    std::env::var(name).map_err(|_| anyhow!("{} must be set", name))
}

fn flag(name: &str, default: bool) -> bool {
    std::env::var(name).map_or(default, |v| parse_flag(&v).unwrap_or(default))
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags() {
        assert_eq!(parse_flag("True"), Some(true));
        assert_eq!(parse_flag(" 0 "), Some(false));
        assert_eq!(parse_flag("maybe"), None);
    }
}
