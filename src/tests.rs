use std::{fs, path::Path};

use chrono::{DateTime, Utc};
use rocket::figment::Figment;
use rocket::http::{ContentType, Header, Status};
use rocket::local::blocking::{Client, LocalResponse};
use serde_json::{json, Value as JsonValue};
use tempfile::TempDir;

use super::{build_rocket, config};


const BOUNDARY: &str = "----disaster-test-boundary";


fn test_figment(dir: &Path) -> Figment {
    let db_path = dir.join("disaster_test.db");
    config::figment()
        .merge(("databases.disaster_db.url", db_path.to_string_lossy().into_owned()))
        .merge(("upload_dir", dir.join("uploads")))
        .merge(("open_monitor", false))
        .merge(("log_level", "off"))
}

fn client_in(dir: &Path) -> Client {
    Client::tracked(build_rocket(test_figment(dir))).expect("valid rocket instance")
}

fn test_client() -> (Client, TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let client = client_in(dir.path());
    (client, dir)
}

fn json_body(response: LocalResponse<'_>) -> JsonValue {
    response.into_json::<JsonValue>().expect("json body")
}

fn list_reports(client: &Client) -> Vec<JsonValue> {
    let response = client.get("/api/emergency-reports").dispatch();
    assert_eq!(response.status(), Status::Ok);

    match json_body(response) {
        JsonValue::Array(reports) => reports,
        other => panic!("expected array, got {}", other),
    }
}

fn send_alert(client: &Client, body: JsonValue) {
    let response = client.post("/api/emergency")
        .header(ContentType::JSON)
        .body(body.to_string())
        .dispatch();

    assert_eq!(response.status(), Status::Ok);
    assert_eq!(json_body(response)["status"], "success");
}

fn multipart(field: &str, file_name: Option<&str>, content: &[u8]) -> (Header<'static>, Vec<u8>) {
    let disposition = match file_name {
        Some(name) => format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: video/mp4\r\n",
            field, name),
        None => format!("Content-Disposition: form-data; name=\"{}\"\r\n", field),
    };

    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n{}\r\n", BOUNDARY, disposition).as_bytes());
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    let header = Header::new("Content-Type", format!("multipart/form-data; boundary={}", BOUNDARY));
    (header, body)
}

fn upload<'c>(client: &'c Client, field: &str, file_name: Option<&str>, content: &[u8])
    -> LocalResponse<'c> {
    let (header, body) = multipart(field, file_name, content);
    client.post("/api/upload-video")
        .header(header)
        .body(body)
        .dispatch()
}


#[test]
fn status_probe_reports_connected() {
    let (client, _dir) = test_client();
    let response = client.get("/api/status").dispatch();

    assert_eq!(response.status(), Status::Ok);
    assert_eq!(json_body(response)["status"], "connected");
}

#[test]
fn safe_locations_are_seeded_once() {
    let dir = tempfile::tempdir().unwrap();

    for _ in 0..2 {
        let client = client_in(dir.path());
        let response = client.get("/api/safe-locations").dispatch();
        assert_eq!(response.status(), Status::Ok);

        let locations = json_body(response);
        let locations = locations.as_array().unwrap();
        assert_eq!(locations.len(), 4);
        assert_eq!(locations[0]["name"], "Emergency Shelter Alpha");
        assert_eq!(locations[0]["type"], "shelter");
        assert_eq!(locations[0]["capacity"], 200);
        assert_eq!(locations[3]["contact"], "+1-555-0104");
    }
}

#[test]
fn submitted_alert_is_listed_as_active() {
    let (client, _dir) = test_client();
    send_alert(&client, json!({
        "user_id": "u1",
        "latitude": 1.0,
        "longitude": 2.0,
        "description": "fire",
    }));

    let reports = list_reports(&client);
    assert_eq!(reports.len(), 1);

    let report = &reports[0];
    assert_eq!(report["user_id"], "u1");
    assert_eq!(report["latitude"], 1.0);
    assert_eq!(report["longitude"], 2.0);
    assert_eq!(report["description"], "fire");
    assert_eq!(report["status"], "active");
    assert!(report["video_path"].is_null());

    let timestamp: DateTime<Utc> = report["timestamp"].as_str().unwrap().parse().unwrap();
    assert!(timestamp <= Utc::now());
}

#[test]
fn empty_alert_uses_defaults() {
    let (client, _dir) = test_client();
    send_alert(&client, json!({}));

    let reports = list_reports(&client);
    assert_eq!(reports[0]["user_id"], "anonymous");
    assert_eq!(reports[0]["description"], "Emergency alert activated");
    assert!(reports[0]["latitude"].is_null());
    assert!(reports[0]["longitude"].is_null());
}

#[test]
fn null_alert_fields_use_defaults() {
    let (client, _dir) = test_client();
    send_alert(&client, json!({
        "user_id": null,
        "description": null,
        "latitude": 1.0,
        "longitude": null,
        "video_path": null,
    }));

    let reports = list_reports(&client);
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0]["user_id"], "anonymous");
    assert_eq!(reports[0]["description"], "Emergency alert activated");
    assert_eq!(reports[0]["latitude"], 1.0);
    assert!(reports[0]["longitude"].is_null());
}

#[test]
fn malformed_alert_is_rejected_as_json() {
    let (client, _dir) = test_client();
    let response = client.post("/api/emergency")
        .header(ContentType::JSON)
        .body("not json")
        .dispatch();

    assert!(response.status().class().is_client_error());
    assert_eq!(json_body(response)["status"], "error");
    assert!(list_reports(&client).is_empty());
}

#[test]
fn listing_is_capped_and_newest_first() {
    let (client, _dir) = test_client();
    for i in 0..55 {
        send_alert(&client, json!({ "user_id": format!("user-{}", i) }));
    }

    let reports = list_reports(&client);
    assert_eq!(reports.len(), 50);
    assert_eq!(reports[0]["user_id"], "user-54");

    let timestamps: Vec<&str> = reports.iter()
        .map(|r| r["timestamp"].as_str().unwrap())
        .collect();
    assert!(timestamps.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn resolve_marks_report_resolved() {
    let (client, _dir) = test_client();
    send_alert(&client, json!({ "user_id": "a", "description": "flood" }));
    send_alert(&client, json!({ "user_id": "b" }));

    let before = list_reports(&client);
    let target = before.iter().find(|r| r["user_id"] == "a").unwrap().clone();
    let id = target["id"].as_i64().unwrap();

    for _ in 0..2 {
        let response = client.post(format!("/api/resolve-report/{}", id)).dispatch();
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(json_body(response)["message"], "Report resolved");
    }

    let after = list_reports(&client);
    let resolved = after.iter().find(|r| r["id"] == id).unwrap();
    let mut expected = target.clone();
    expected["status"] = json!("resolved");
    assert_eq!(resolved, &expected);

    let other = after.iter().find(|r| r["user_id"] == "b").unwrap();
    assert_eq!(other["status"], "active");
}

#[test]
fn unknown_ids_still_succeed() {
    let (client, _dir) = test_client();
    send_alert(&client, json!({ "user_id": "a" }));
    let before = list_reports(&client);

    let response = client.post("/api/resolve-report/4242").dispatch();
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(json_body(response)["status"], "success");

    let response = client.delete("/api/delete-report/4242").dispatch();
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(json_body(response)["status"], "success");

    assert_eq!(list_reports(&client), before);
}

#[test]
fn delete_removes_only_target() {
    let (client, _dir) = test_client();
    for user in &["a", "b", "c"] {
        send_alert(&client, json!({ "user_id": user }));
    }
    let target = list_reports(&client).iter()
        .find(|r| r["user_id"] == "b")
        .map(|r| r["id"].as_i64().unwrap())
        .unwrap();

    let response = client.delete(format!("/api/delete-report/{}", target)).dispatch();
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(json_body(response)["message"], "Report deleted");

    let users: Vec<JsonValue> = list_reports(&client).iter()
        .map(|r| r["user_id"].clone())
        .collect();
    assert_eq!(users.len(), 2);
    assert!(!users.contains(&json!("b")));
}

#[test]
fn upload_without_video_field_is_rejected() {
    let (client, _dir) = test_client();
    let response = upload(&client, "note", None, b"hello");

    assert_eq!(response.status(), Status::BadRequest);
    let body = json_body(response);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "No video file provided");
}

#[test]
fn upload_without_form_body_is_rejected() {
    let (client, _dir) = test_client();

    let response = client.post("/api/upload-video").dispatch();
    assert_eq!(response.status(), Status::BadRequest);
    assert_eq!(json_body(response)["message"], "No video file provided");

    let response = client.post("/api/upload-video")
        .header(ContentType::JSON)
        .body(r#"{"video": "clip.mp4"}"#)
        .dispatch();
    assert_eq!(response.status(), Status::BadRequest);
    assert_eq!(json_body(response)["message"], "No video file provided");
}

#[test]
fn video_sent_as_text_field_is_not_a_file() {
    let (client, _dir) = test_client();
    let response = upload(&client, "video", None, b"not a file");

    assert_eq!(response.status(), Status::BadRequest);
    assert_eq!(json_body(response)["message"], "No video file provided");
}

#[test]
fn oversized_video_is_rejected_with_413() {
    let dir = tempfile::tempdir().unwrap();
    let figment = test_figment(dir.path()).merge(("limits.file", 16));
    let client = Client::tracked(build_rocket(figment)).expect("valid rocket instance");

    let response = upload(&client, "video", Some("big.mp4"), &[7u8; 4096]);
    assert_eq!(response.status(), Status::PayloadTooLarge);

    let body = json_body(response);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "The file is too large");
    assert_eq!(fs::read_dir(dir.path().join("uploads")).unwrap().count(), 0);
}

#[test]
fn upload_with_empty_file_name_is_rejected() {
    let (client, _dir) = test_client();
    let response = upload(&client, "video", Some(""), b"");

    assert_eq!(response.status(), Status::BadRequest);
    assert_eq!(json_body(response)["status"], "error");
}

#[test]
fn uploaded_video_can_be_fetched_back() {
    let (client, dir) = test_client();
    let content = b"\x00\x00\x00\x18ftypmp42 fake video bytes";

    let response = upload(&client, "video", Some("street flood.mp4"), content);
    assert_eq!(response.status(), Status::Ok);

    let body = json_body(response);
    assert_eq!(body["status"], "success");
    let file_path = body["file_path"].as_str().unwrap().to_owned();

    let stored_name = file_path.strip_prefix("uploads/").unwrap();
    assert_ne!(stored_name, "street_flood.mp4");
    assert!(stored_name.ends_with("_street_flood.mp4"));
    assert!(dir.path().join("uploads").join(stored_name).is_file());

    let response = client.get(format!("/{}", file_path)).dispatch();
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(response.into_bytes().unwrap(), content.to_vec());
}

#[test]
fn repeated_uploads_get_distinct_names() {
    let (client, _dir) = test_client();

    let first = json_body(upload(&client, "video", Some("clip.mp4"), b"one"));
    let second = json_body(upload(&client, "video", Some("clip.mp4"), b"two"));

    assert_ne!(first["file_path"], second["file_path"]);
}

#[test]
fn traversal_in_file_name_stays_inside_upload_dir() {
    let (client, dir) = test_client();

    let response = upload(&client, "video", Some("../../evil.mp4"), b"payload");
    assert_eq!(response.status(), Status::Ok);

    let file_path = json_body(response)["file_path"].as_str().unwrap().to_owned();
    let stored_name = file_path.strip_prefix("uploads/").unwrap();
    assert!(stored_name.ends_with("_evil.mp4"));
    assert!(!stored_name.contains('/'));

    let entries: Vec<_> = fs::read_dir(dir.path().join("uploads")).unwrap().collect();
    assert_eq!(entries.len(), 1);
    assert!(!dir.path().join("evil.mp4").exists());
}

#[test]
fn serving_uploads_cannot_escape_directory() {
    let (client, _dir) = test_client();

    let response = client.get("/uploads/../disaster_test.db").dispatch();
    assert_eq!(response.status(), Status::NotFound);

    let response = client.get("/uploads/missing.mp4").dispatch();
    assert_eq!(response.status(), Status::NotFound);
    assert_eq!(json_body(response)["status"], "error");
}

#[test]
fn pages_are_served_as_html() {
    let (client, _dir) = test_client();

    for page in &["/", "/admin", "/monitor"] {
        let response = client.get(*page).dispatch();
        assert_eq!(response.status(), Status::Ok);
        assert_eq!(response.content_type(), Some(ContentType::HTML));
    }
}
