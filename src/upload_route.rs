use std::{
    io,
    path::{Path, PathBuf},
};

use log::{error, info, warn};
use rocket::{
    fairing,
    form::{error::ErrorKind, Errors, Form},
    fs::{NamedFile, TempFile},
    http::Status,
    serde::json::Json,
    tokio::fs,
    Build, Rocket, State,
};
use serde_json::{json, Value as JsonValue};

use crate::config::AppConfig;
use crate::error::{ApiError, ApiResult};
use crate::util;


/// Mount point of the uploaded files, also the prefix of returned paths.
pub const UPLOAD_MOUNT: &str = "/uploads";
const UPLOAD_ID_LENGTH: usize = 32;


#[derive(FromForm)]
pub struct VideoUpload<'r> {
    video: Result<TempFile<'r>, Errors<'r>>,
}


fn is_too_large(errors: &Errors<'_>) -> bool {
    errors.iter().any(|e| matches!(e.kind, ErrorKind::InvalidLength { min: None, max: Some(_) }))
        || errors.status() == Status::PayloadTooLarge
}


pub async fn prepare_upload_dir(rocket: Rocket<Build>) -> fairing::Result {
    let dir = match rocket.state::<AppConfig>() {
        Some(config) => config.upload_dir.clone(),
        None => return Err(rocket),
    };

    match fs::create_dir_all(&dir).await {
        Ok(()) => Ok(rocket),
        Err(err) => {
            error!("Fail to create upload directory {}: {}", dir.display(), err);
            Err(rocket)
        },
    }
}

/// Moves the upload into `dir` as `{random id}_{sanitized name}` and returns
/// the stored file name.
async fn store_video(file: &mut TempFile<'_>, original_name: &str, dir: &Path)
    -> io::Result<String> {

    let file_name = util::sanitize_filename(original_name);

    let (stored_name, path) = loop {
        let stored_name = format!("{}_{}", util::generate_rand_id(UPLOAD_ID_LENGTH), file_name);
        let path = dir.join(&stored_name);

        if fs::metadata(&path).await.is_err() {
            break (stored_name, path);
        }
    };

    file.move_copy_to(&path).await?;
    Ok(stored_name)
}


#[post("/upload-video", data = "<form>")]
pub async fn post_upload_video(form: Result<Form<VideoUpload<'_>>, Errors<'_>>,
    config: &State<AppConfig>) -> ApiResult<Json<JsonValue>> {

    info!("Video upload request received");

    let upload = match form {
        Ok(form) => form.into_inner(),
        Err(errors) if is_too_large(&errors) => return Err(ApiError::TooLarge),
        Err(errors) => {
            warn!("Unreadable upload form: {}", errors);
            return Err(ApiError::MissingVideo)
        },
    };

    let mut file = match upload.video {
        Ok(file) => file,
        Err(errors) if is_too_large(&errors) => return Err(ApiError::TooLarge),
        Err(_) => return Err(ApiError::MissingVideo),
    };

    // A part without a filename is a plain field, not a file.
    let original_name = file.raw_name()
        .map(|name| name.dangerous_unsafe_unsanitized_raw().as_str().to_owned())
        .ok_or(ApiError::MissingVideo)?;
    if original_name.is_empty() {
        return Err(ApiError::EmptyFileName);
    }

    let stored_name = store_video(&mut file, &original_name, &config.upload_dir).await?;
    let file_path = format!("{}/{}", UPLOAD_MOUNT.trim_start_matches('/'), stored_name);
    info!("Video saved: {}", file_path);

    Ok(Json(json!({
        "status": "success",
        "file_path": file_path,
    })))
}

/// Requests that are not multipart forms at all carry no video either.
#[post("/upload-video", rank = 2)]
pub fn post_upload_video_fallback() -> ApiResult<Json<JsonValue>> {
    info!("Video upload request without a form body");
    Err(ApiError::MissingVideo)
}

/// Segments containing `..` or hidden names never match, so only files
/// inside the upload directory are reachable.
#[get("/<file..>")]
pub async fn get_uploaded_file(file: PathBuf, config: &State<AppConfig>) -> Option<NamedFile> {
    NamedFile::open(config.upload_dir.join(file)).await.ok()
}
