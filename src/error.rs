use std::io;

use log::error;
use rocket::{
    http::Status,
    request::Request,
    response::{self, Responder},
    serde::json::Json,
};
use serde_json::json;


pub type ApiResult<T> = Result<T, ApiError>;


#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("No video file provided")]
    MissingVideo,
    #[error("No file selected")]
    EmptyFileName,
    #[error("The file is too large")]
    TooLarge,
    #[error("database query failed: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("file storage failed: {0}")]
    Io(#[from] io::Error),
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            ApiError::MissingVideo | ApiError::EmptyFileName => Status::BadRequest,
            ApiError::TooLarge => Status::PayloadTooLarge,
            ApiError::Database(_) | ApiError::Io(_) => Status::InternalServerError,
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();

        let message = if status.class().is_server_error() {
            error!("{} {} failed: {}", req.method(), req.uri(), self);
            "Internal server error".to_owned()
        }
        else {
            self.to_string()
        };

        let body = Json(json!({
            "status": "error",
            "message": message,
        }));

        (status, body).respond_to(req)
    }
}
