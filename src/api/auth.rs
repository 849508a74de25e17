use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;

use super::AppState;
use crate::error::{Error, Result};

/// Token Bearer tal como llegó, para poder cerrar la sesión
#[derive(Clone)]
pub struct TokenBearer(pub String);

/// Middleware: resuelve el token Bearer a una sesión activa y la deja
/// en las extensions del request. Sin token válido responde 401.
pub async fn requerir_sesion(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or(Error::NoAutorizado)?
        .to_string();

    let sesion = state
        .sesiones
        .obtener(&token)?
        .ok_or(Error::NoAutorizado)?;

    req.extensions_mut().insert(sesion);
    req.extensions_mut().insert(TokenBearer(token));
    Ok(next.run(req).await)
}
