use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_INSTAGRAM_API_URL: &str = "https://i.instagram.com";

#[derive(Clone)]
pub struct Settings {
    pub port: u16,
    pub addr: SocketAddr,
    pub data_file: PathBuf,
    pub instagram: InstagramSettings,
}

/// Credentials for the follower lookup. Any of them may be missing,
/// in which case real-follower imports are unavailable.
#[derive(Clone)]
pub struct InstagramSettings {
    pub username: Option<String>,
    pub password: Option<String>,
    pub access_token: Option<String>,
    pub api_url: String,
    pub timeout: Duration,
}

impl Settings {
    pub fn new() -> Self {
        let port: u16 = env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(5000);
        let addr = SocketAddr::from(([0, 0, 0, 0], port));

        let data_file = env::var("DATA_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("bot_data.json"));

        let timeout_secs: u64 = env::var("INSTAGRAM_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(30);

        let instagram = InstagramSettings {
            username: non_empty_var("INSTAGRAM_USERNAME"),
            password: non_empty_var("INSTAGRAM_PASSWORD"),
            access_token: non_empty_var("INSTAGRAM_ACCESS_TOKEN"),
            api_url: env::var("INSTAGRAM_API_URL")
                .unwrap_or_else(|_| DEFAULT_INSTAGRAM_API_URL.to_string()),
            timeout: Duration::from_secs(timeout_secs),
        };

        Self {
            port,
            addr,
            data_file,
            instagram,
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::new()
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
