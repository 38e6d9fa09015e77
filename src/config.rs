use std::path::PathBuf;

use rocket::data::{ByteUnit, Limits, ToByteUnit};
use rocket::figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};


pub const DEFAULT_DATABASE_URL: &str = "disaster_app.db";
pub const DEFAULT_PORT: u16 = 5000;


/// Settings read once at ignition and shared read-only with every handler.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AppConfig {
    pub upload_dir: PathBuf,
    pub template_dir: PathBuf,
    /// Open the monitor page in a browser once the server is up.
    pub open_monitor: bool,
    /// Seconds to wait after liftoff before opening the monitor page.
    pub monitor_delay: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            upload_dir: PathBuf::from("uploads"),
            template_dir: PathBuf::from("templates"),
            open_monitor: cfg!(debug_assertions),
            monitor_delay: 2,
        }
    }
}


pub fn upload_limit() -> ByteUnit {
    100.mebibytes()
}

/// Rocket's defaults, then ours, then `Rocket.toml`, then `ROCKET_*`
/// environment variables.
pub fn figment() -> Figment {
    let limits = Limits::default()
        .limit("file", upload_limit())
        .limit("data-form", upload_limit());

    Figment::from(rocket::Config::default())
        .merge(("address", "0.0.0.0"))
        .merge(("port", DEFAULT_PORT))
        .merge(("limits", limits))
        .merge(("databases.disaster_db.url", DEFAULT_DATABASE_URL))
        .merge(Serialized::defaults(AppConfig::default()))
        .merge(Toml::file(Env::var_or("ROCKET_CONFIG", "Rocket.toml")).nested())
        .merge(Env::prefixed("ROCKET_").ignore(&["PROFILE"]).global())
}
