use std::{
    io,
    process::{Command, Stdio},
    time::Duration,
};

use log::{info, warn};
use rocket::{
    fairing::AdHoc,
    tokio::{self, time::sleep},
};

use crate::config::AppConfig;


/// Liftoff hook that announces the entry points and, when enabled, opens the
/// monitor page in the local browser after a short delay. The request
/// handlers never depend on it.
pub fn fairing() -> AdHoc {
    AdHoc::on_liftoff("Monitor Launcher", |rocket| Box::pin(async move {
        let base_url = format!("http://localhost:{}", rocket.config().port);
        info!("Main App: {}", base_url);
        info!("Admin Dashboard: {}/admin", base_url);
        info!("Emergency Monitor: {}/monitor", base_url);

        let config = match rocket.state::<AppConfig>() {
            Some(config) if config.open_monitor => config,
            _ => return,
        };

        let url = format!("{}/monitor", base_url);
        let delay = Duration::from_secs(config.monitor_delay);

        tokio::spawn(async move {
            sleep(delay).await;

            info!("Opening emergency monitor screen");
            if let Err(err) = open_browser(&url) {
                warn!("Fail to open {}: {}", url, err);
            }
        });
    }))
}

fn open_browser(url: &str) -> io::Result<()> {
    let mut command = if cfg!(target_os = "macos") {
        Command::new("open")
    }
    else if cfg!(target_os = "windows") {
        let mut command = Command::new("cmd");
        command.args(&["/C", "start", ""]);
        command
    }
    else {
        Command::new("xdg-open")
    };

    command.arg(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
}
