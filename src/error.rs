use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("error de base de datos: {0}")]
    Db(#[from] rusqlite::Error),

    #[error("{0}")]
    Validacion(String),

    #[error("sesión inválida o expirada")]
    NoAutorizado,

    #[error("{0}")]
    Prohibido(String),

    #[error("{0}")]
    NoEncontrado(String),

    #[error("{0}")]
    Interno(String),
}

impl Error {
    pub fn validacion(msg: impl Into<String>) -> Self {
        Error::Validacion(msg.into())
    }

    pub fn no_encontrado(msg: impl Into<String>) -> Self {
        Error::NoEncontrado(msg.into())
    }

    fn status(&self) -> StatusCode {
        match self {
            Error::Validacion(_) => StatusCode::BAD_REQUEST,
            Error::NoAutorizado => StatusCode::UNAUTHORIZED,
            Error::Prohibido(_) => StatusCode::FORBIDDEN,
            Error::NoEncontrado(_) => StatusCode::NOT_FOUND,
            Error::Db(_) | Error::Interno(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

// Un mutex envenenado no tiene recuperación razonable aquí.
impl<T> From<std::sync::PoisonError<T>> for Error {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        Error::Interno(format!("lock envenenado: {}", e))
    }
}
