use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::{Extension, Json};
use serde::Deserialize;
use serde_json::json;

use super::auth::TokenBearer;
use super::AppState;
use crate::commands;
use crate::commands::reportes::{PedidosDia, ResumenGeneral};
use crate::error::Result;
use crate::models::{
    ActualizarPedido, Cliente, CostoEnvio, Credenciales, NuevoCliente, NuevoCostoEnvio,
    NuevoPedido, NuevoProveedor, NuevoUsuario, Pedido, PedidoCompleto, Producto, Proveedor,
    ResultadoImportacion, ResumenComisiones, SesionActiva, TokenSesion, UsuarioInfo,
    UsuariosPorRol, ROL_VENDEDOR,
};

#[derive(Debug, Deserialize)]
pub struct Paginacion {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Paginacion {
    fn limites(&self) -> (i64, i64) {
        (self.limit.unwrap_or(50), self.offset.unwrap_or(0))
    }
}

// --- Sesión / usuarios ---

pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(credenciales): Json<Credenciales>,
) -> Result<Json<TokenSesion>> {
    commands::usuarios::autenticar_usuario(&state.db, &state.sesiones, credenciales).map(Json)
}

pub async fn logout(
    State(state): State<Arc<AppState>>,
    Extension(token): Extension<TokenBearer>,
) -> Result<Json<serde_json::Value>> {
    commands::usuarios::cerrar_sesion(&state.sesiones, &token.0)?;
    Ok(Json(json!({ "ok": true })))
}

pub async fn usuario_actual(
    State(state): State<Arc<AppState>>,
    Extension(sesion): Extension<SesionActiva>,
) -> Result<Json<UsuarioInfo>> {
    commands::usuarios::obtener_usuario(&state.db, &sesion).map(Json)
}

#[derive(Debug, Deserialize)]
pub struct FiltroUsuarios {
    pub role: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub async fn listar_usuarios(
    State(state): State<Arc<AppState>>,
    Extension(sesion): Extension<SesionActiva>,
    Query(filtro): Query<FiltroUsuarios>,
) -> Result<Json<UsuariosPorRol>> {
    let role = filtro.role.as_deref().unwrap_or(ROL_VENDEDOR);
    commands::usuarios::obtener_usuarios_por_rol(
        &state.db,
        &sesion,
        role,
        filtro.limit.unwrap_or(50),
        filtro.offset.unwrap_or(0),
    )
    .map(Json)
}

pub async fn crear_usuario(
    State(state): State<Arc<AppState>>,
    Extension(sesion): Extension<SesionActiva>,
    Json(usuario): Json<NuevoUsuario>,
) -> Result<Json<UsuarioInfo>> {
    commands::usuarios::crear_usuario(&state.db, &sesion, usuario).map(Json)
}

pub async fn actualizar_usuario(
    State(state): State<Arc<AppState>>,
    Extension(sesion): Extension<SesionActiva>,
    Path(id): Path<i64>,
    Json(usuario): Json<NuevoUsuario>,
) -> Result<Json<UsuarioInfo>> {
    commands::usuarios::actualizar_usuario(&state.db, &sesion, id, usuario).map(Json)
}

// --- Clientes ---

pub async fn listar_clientes(
    State(state): State<Arc<AppState>>,
    Extension(sesion): Extension<SesionActiva>,
    Query(paginacion): Query<Paginacion>,
) -> Result<Json<Vec<Cliente>>> {
    let (limit, offset) = paginacion.limites();
    commands::clientes::listar_clientes(&state.db, &sesion, limit, offset).map(Json)
}

pub async fn crear_cliente(
    State(state): State<Arc<AppState>>,
    Extension(sesion): Extension<SesionActiva>,
    Json(cliente): Json<NuevoCliente>,
) -> Result<Json<Cliente>> {
    commands::clientes::crear_cliente(&state.db, &sesion, cliente).map(Json)
}

pub async fn obtener_cliente(
    State(state): State<Arc<AppState>>,
    Extension(sesion): Extension<SesionActiva>,
    Path(id): Path<i64>,
) -> Result<Json<Cliente>> {
    commands::clientes::obtener_cliente(&state.db, &sesion, id).map(Json)
}

pub async fn actualizar_cliente(
    State(state): State<Arc<AppState>>,
    Extension(sesion): Extension<SesionActiva>,
    Path(id): Path<i64>,
    Json(cliente): Json<NuevoCliente>,
) -> Result<Json<Cliente>> {
    commands::clientes::actualizar_cliente(&state.db, &sesion, id, cliente).map(Json)
}

// --- Proveedores ---

pub async fn listar_proveedores(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Proveedor>>> {
    commands::proveedores::listar_proveedores(&state.db).map(Json)
}

pub async fn crear_proveedor(
    State(state): State<Arc<AppState>>,
    Extension(sesion): Extension<SesionActiva>,
    Json(proveedor): Json<NuevoProveedor>,
) -> Result<Json<Proveedor>> {
    commands::proveedores::crear_proveedor(&state.db, &sesion, proveedor).map(Json)
}

pub async fn obtener_proveedor(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Proveedor>> {
    commands::proveedores::obtener_proveedor(&state.db, id).map(Json)
}

pub async fn actualizar_proveedor(
    State(state): State<Arc<AppState>>,
    Extension(sesion): Extension<SesionActiva>,
    Path(id): Path<i64>,
    Json(proveedor): Json<NuevoProveedor>,
) -> Result<Json<Proveedor>> {
    commands::proveedores::actualizar_proveedor(&state.db, &sesion, id, proveedor).map(Json)
}

pub async fn cambiar_estado_proveedor(
    State(state): State<Arc<AppState>>,
    Extension(sesion): Extension<SesionActiva>,
    Path(id): Path<i64>,
) -> Result<Json<Proveedor>> {
    commands::proveedores::cambiar_estado_proveedor(&state.db, &sesion, id).map(Json)
}

// --- Productos ---

#[derive(Debug, Deserialize)]
pub struct FiltroProductos {
    pub skuproveedor: Option<String>,
}

pub async fn listar_productos(
    State(state): State<Arc<AppState>>,
    Query(filtro): Query<FiltroProductos>,
) -> Result<Json<Vec<Producto>>> {
    match filtro.skuproveedor {
        Some(codigo) => commands::productos::productos_por_proveedor(&state.db, &codigo).map(Json),
        None => commands::productos::listar_productos(&state.db).map(Json),
    }
}

pub async fn crear_producto(
    State(state): State<Arc<AppState>>,
    Extension(sesion): Extension<SesionActiva>,
    Json(producto): Json<Producto>,
) -> Result<Json<Producto>> {
    commands::productos::crear_producto(&state.db, &sesion, producto).map(Json)
}

pub async fn obtener_producto(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Producto>> {
    commands::productos::obtener_producto(&state.db, id).map(Json)
}

pub async fn actualizar_producto(
    State(state): State<Arc<AppState>>,
    Extension(sesion): Extension<SesionActiva>,
    Path(id): Path<i64>,
    Json(producto): Json<Producto>,
) -> Result<Json<Producto>> {
    commands::productos::actualizar_producto(&state.db, &sesion, id, producto).map(Json)
}

/// El cuerpo es el CSV crudo (texto), no JSON
pub async fn importar_productos(
    State(state): State<Arc<AppState>>,
    Extension(sesion): Extension<SesionActiva>,
    contenido: String,
) -> Result<Json<ResultadoImportacion>> {
    commands::exportar::importar_productos_csv(&state.db, &sesion, &contenido).map(Json)
}

// --- Costos de envío ---

pub async fn listar_costos_envio(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CostoEnvio>>> {
    commands::envios::listar_costos_envio(&state.db).map(Json)
}

pub async fn nuevo_costo_envio(
    State(state): State<Arc<AppState>>,
    Extension(sesion): Extension<SesionActiva>,
    Json(rango): Json<NuevoCostoEnvio>,
) -> Result<Json<CostoEnvio>> {
    commands::envios::nuevo_costo_envio(&state.db, &sesion, rango).map(Json)
}

pub async fn eliminar_costo_envio(
    State(state): State<Arc<AppState>>,
    Extension(sesion): Extension<SesionActiva>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    commands::envios::eliminar_costo_envio(&state.db, &sesion, id)?;
    Ok(Json(json!({ "ok": true })))
}

// --- Pedidos ---

pub async fn listar_pedidos(
    State(state): State<Arc<AppState>>,
    Extension(sesion): Extension<SesionActiva>,
    Query(paginacion): Query<Paginacion>,
) -> Result<Json<Vec<Pedido>>> {
    let (limit, offset) = paginacion.limites();
    commands::pedidos::listar_pedidos(&state.db, &sesion, limit, offset).map(Json)
}

pub async fn crear_pedido(
    State(state): State<Arc<AppState>>,
    Extension(sesion): Extension<SesionActiva>,
    Json(pedido): Json<NuevoPedido>,
) -> Result<Json<PedidoCompleto>> {
    commands::pedidos::crear_pedido(&state.db, &sesion, pedido).map(Json)
}

pub async fn obtener_pedido(
    State(state): State<Arc<AppState>>,
    Extension(sesion): Extension<SesionActiva>,
    Path(id): Path<i64>,
) -> Result<Json<PedidoCompleto>> {
    commands::pedidos::obtener_pedido(&state.db, &sesion, id).map(Json)
}

pub async fn actualizar_pedido(
    State(state): State<Arc<AppState>>,
    Extension(sesion): Extension<SesionActiva>,
    Path(id): Path<i64>,
    Json(cambios): Json<ActualizarPedido>,
) -> Result<Json<PedidoCompleto>> {
    commands::pedidos::actualizar_pedido(&state.db, &sesion, id, cambios).map(Json)
}

pub async fn eliminar_pedido(
    State(state): State<Arc<AppState>>,
    Extension(sesion): Extension<SesionActiva>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    commands::pedidos::eliminar_pedido(&state.db, &sesion, id)?;
    Ok(Json(json!({ "ok": true })))
}

pub async fn exportar_pedidos(
    State(state): State<Arc<AppState>>,
    Extension(sesion): Extension<SesionActiva>,
) -> Result<impl IntoResponse> {
    let csv = commands::exportar::exportar_pedidos_csv(&state.db, &sesion)?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"pedidos.csv\"",
            ),
        ],
        csv,
    ))
}

// --- Comisiones y reportes ---

pub async fn marcar_comision_pagada(
    State(state): State<Arc<AppState>>,
    Extension(sesion): Extension<SesionActiva>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>> {
    commands::comisiones::marcar_comision_pagada(&state.db, &sesion, id)?;
    Ok(Json(json!({ "ok": true })))
}

pub async fn resumen_comisiones(
    State(state): State<Arc<AppState>>,
    Extension(sesion): Extension<SesionActiva>,
) -> Result<Json<ResumenComisiones>> {
    commands::comisiones::resumen_comisiones(&state.db, &sesion).map(Json)
}

pub async fn resumen_general(
    State(state): State<Arc<AppState>>,
    Extension(sesion): Extension<SesionActiva>,
) -> Result<Json<ResumenGeneral>> {
    commands::reportes::resumen_general(&state.db, &sesion).map(Json)
}

#[derive(Debug, Deserialize)]
pub struct FiltroDias {
    pub dias: Option<i64>,
}

pub async fn pedidos_por_dia(
    State(state): State<Arc<AppState>>,
    Extension(sesion): Extension<SesionActiva>,
    Query(filtro): Query<FiltroDias>,
) -> Result<Json<Vec<PedidosDia>>> {
    commands::reportes::pedidos_por_dia(&state.db, &sesion, filtro.dias.unwrap_or(7)).map(Json)
}
