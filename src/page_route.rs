use log::info;
use rocket::{fs::NamedFile, State};

use crate::config::AppConfig;


async fn open_page(config: &AppConfig, page: &str) -> Option<NamedFile> {
    NamedFile::open(config.template_dir.join(page)).await.ok()
}

#[get("/")]
pub async fn index(config: &State<AppConfig>) -> Option<NamedFile> {
    info!("Serving main page");
    open_page(config, "index.html").await
}

#[get("/admin")]
pub async fn admin_page(config: &State<AppConfig>) -> Option<NamedFile> {
    info!("Admin dashboard accessed");
    open_page(config, "admin.html").await
}

#[get("/monitor")]
pub async fn monitor_page(config: &State<AppConfig>) -> Option<NamedFile> {
    info!("Emergency monitor screen accessed");
    open_page(config, "monitor.html").await
}
