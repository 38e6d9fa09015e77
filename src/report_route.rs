use chrono::{SecondsFormat, Utc};
use log::{info, warn};
use rocket::serde::json::Json;
use serde::Deserialize;
use serde_json::{json, Value as JsonValue};

use crate::db::{
    self, DbConn,
    models::{EmergencyReport, NewEmergencyReport, ReportStatus},
};
use crate::error::ApiResult;


const ANONYMOUS_USER: &str = "anonymous";
const DEFAULT_DESCRIPTION: &str = "Emergency alert activated";


/// Body of `POST /api/emergency`. Every field may be omitted or null.
#[derive(Deserialize, Debug)]
pub struct EmergencyAlert {
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub latitude: Option<f64>,
    #[serde(default)]
    pub longitude: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub video_path: Option<String>,
}

impl EmergencyAlert {
    pub fn user_id(&self) -> &str {
        self.user_id.as_deref().unwrap_or(ANONYMOUS_USER)
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or(DEFAULT_DESCRIPTION)
    }

    fn into_report(self, timestamp: String) -> NewEmergencyReport {
        NewEmergencyReport {
            user_id: self.user_id().to_owned(),
            description: self.description().to_owned(),
            latitude: self.latitude,
            longitude: self.longitude,
            timestamp,
            status: ReportStatus::Active,
            video_path: self.video_path,
        }
    }
}


/// UTC, fixed microsecond precision. Equal width keeps text order chronological.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn format_coord(value: Option<f64>) -> String {
    value.map_or_else(|| "?".into(), |v| v.to_string())
}

fn success(message: &str) -> Json<JsonValue> {
    Json(json!({
        "status": "success",
        "message": message,
    }))
}


#[post("/emergency", data = "<alert>")]
pub async fn post_emergency(conn: DbConn, alert: Json<EmergencyAlert>) -> ApiResult<Json<JsonValue>> {
    let alert = alert.into_inner();

    warn!("EMERGENCY ALERT: user {} at {}, {} - {}",
        alert.user_id(),
        format_coord(alert.latitude), format_coord(alert.longitude),
        alert.description());
    if let Some(video) = alert.video_path.as_deref().filter(|v| !v.is_empty()) {
        info!("Alert video: {}", video);
    }

    let report = alert.into_report(now_timestamp());
    conn.run(move |c| db::insert_report(c, &report)).await?;

    Ok(success("Emergency alert sent"))
}

#[get("/emergency-reports")]
pub async fn get_emergency_reports(conn: DbConn) -> ApiResult<Json<Vec<EmergencyReport>>> {
    let reports = conn.run(|c| db::get_recent_reports(c)).await?;
    Ok(Json(reports))
}

#[post("/resolve-report/<id>")]
pub async fn resolve_report(conn: DbConn, id: i32) -> ApiResult<Json<JsonValue>> {
    info!("Resolving report #{}", id);

    let updated = conn.run(move |c| db::resolve_report(c, id)).await?;
    if updated == 0 {
        info!("Report #{} not found, nothing resolved", id);
    }

    Ok(success("Report resolved"))
}

#[delete("/delete-report/<id>")]
pub async fn delete_report(conn: DbConn, id: i32) -> ApiResult<Json<JsonValue>> {
    info!("Deleting report #{}", id);

    let deleted = conn.run(move |c| db::delete_report(c, id)).await?;
    if deleted == 0 {
        info!("Report #{} not found, nothing deleted", id);
    }

    Ok(success("Report deleted"))
}
