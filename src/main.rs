#[macro_use] extern crate rocket;


mod config;
mod db;
mod error;
mod logger;
mod monitor;
mod util;
mod page_route;
mod safe_location_route;
mod report_route;
mod upload_route;

#[cfg(test)]
mod tests;


use log::{error, info};
use rocket::{
    fairing::{self, AdHoc},
    figment::Figment,
    http::Status,
    serde::json::Json,
    Build, Request, Rocket,
};
use serde_json::{json, Value as JsonValue};

use config::AppConfig;
use db::DbConn;


#[get("/status")]
fn get_status() -> Json<JsonValue> {
    info!("Status check requested");

    Json(json!({
        "status": "connected",
        "message": "Emergency system is online",
    }))
}

#[catch(default)]
fn default_catcher(status: Status, _req: &Request<'_>) -> (Status, Json<JsonValue>) {
    let body = json!({
        "status": "error",
        "message": status.reason().unwrap_or("Unknown error"),
    });

    (status, Json(body))
}


async fn setup_database(rocket: Rocket<Build>) -> fairing::Result {
    let conn = match DbConn::get_one(&rocket).await {
        Some(conn) => conn,
        None => {
            error!("No database connection available");
            return Err(rocket);
        },
    };

    match conn.run(|c| db::setup(c)).await {
        Ok(inserted) => {
            info!("Database ready, {} sample safe locations added", inserted);
            Ok(rocket)
        },
        Err(err) => {
            error!("Database setup failed: {}", err);
            Err(rocket)
        },
    }
}


pub fn build_rocket(figment: Figment) -> Rocket<Build> {
    rocket::custom(figment)
        .attach(AdHoc::config::<AppConfig>())
        .attach(DbConn::fairing())
        .attach(AdHoc::try_on_ignite("Database Setup", setup_database))
        .attach(AdHoc::try_on_ignite("Upload Directory", upload_route::prepare_upload_dir))
        .attach(monitor::fairing())
        .register("/", catchers![default_catcher])
        .mount("/", routes![
            page_route::index,
            page_route::admin_page,
            page_route::monitor_page,
        ])
        .mount("/api", routes![
            get_status,
            safe_location_route::get_safe_locations,
        ])
        .mount("/api", routes![
            report_route::post_emergency,
            report_route::get_emergency_reports,
            report_route::resolve_report,
            report_route::delete_report,
        ])
        .mount("/api", routes![
            upload_route::post_upload_video,
            upload_route::post_upload_video_fallback,
        ])
        .mount(upload_route::UPLOAD_MOUNT, routes![upload_route::get_uploaded_file])
}


#[rocket::main]
async fn main() -> Result<(), rocket::Error> {
    let _sentry = match logger::init() {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("Logger installation failed: {}", err);
            None
        },
    };

    info!("Starting Disaster Management App");

    let _rocket = build_rocket(config::figment())
        .launch()
        .await?;

    Ok(())
}
