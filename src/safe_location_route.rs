use log::info;
use rocket::serde::json::Json;

use crate::db::{self, DbConn, models::SafeLocation};
use crate::error::ApiResult;


#[get("/safe-locations")]
pub async fn get_safe_locations(conn: DbConn) -> ApiResult<Json<Vec<SafeLocation>>> {
    info!("Fetching safe locations");

    let locations = conn.run(|c| db::get_safe_locations(c)).await?;
    info!("Found {} safe locations", locations.len());

    Ok(Json(locations))
}
