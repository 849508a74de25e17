mod auth;
mod handlers;

use std::sync::Arc;

use axum::middleware;
use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::db::{Database, SesionState};

pub struct AppState {
    pub db: Database,
    pub sesiones: SesionState,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        AppState {
            db,
            sesiones: SesionState::default(),
        }
    }
}

pub fn crear_router(state: Arc<AppState>) -> Router {
    let protegidas = Router::new()
        // Sesión / usuarios
        .route("/logout", post(handlers::logout))
        .route("/usuario", get(handlers::usuario_actual))
        .route("/usuarios", get(handlers::listar_usuarios).post(handlers::crear_usuario))
        .route("/usuarios/:id", put(handlers::actualizar_usuario))
        // Clientes
        .route("/clientes", get(handlers::listar_clientes).post(handlers::crear_cliente))
        .route(
            "/clientes/:id",
            get(handlers::obtener_cliente).put(handlers::actualizar_cliente),
        )
        // Proveedores
        .route(
            "/proveedores",
            get(handlers::listar_proveedores).post(handlers::crear_proveedor),
        )
        .route(
            "/proveedores/:id",
            get(handlers::obtener_proveedor).put(handlers::actualizar_proveedor),
        )
        .route("/proveedores/:id/estado", post(handlers::cambiar_estado_proveedor))
        // Productos
        .route(
            "/productos",
            get(handlers::listar_productos).post(handlers::crear_producto),
        )
        .route(
            "/productos/:id",
            get(handlers::obtener_producto).put(handlers::actualizar_producto),
        )
        .route("/productos/importar", post(handlers::importar_productos))
        // Costos de envío
        .route(
            "/costosenvio",
            get(handlers::listar_costos_envio).post(handlers::nuevo_costo_envio),
        )
        .route("/costosenvio/:id", delete(handlers::eliminar_costo_envio))
        // Pedidos
        .route("/pedidos", get(handlers::listar_pedidos).post(handlers::crear_pedido))
        .route("/pedidos/exportar", get(handlers::exportar_pedidos))
        .route(
            "/pedidos/:id",
            get(handlers::obtener_pedido)
                .put(handlers::actualizar_pedido)
                .delete(handlers::eliminar_pedido),
        )
        .route(
            "/pedidos/:id/comision-pagada",
            post(handlers::marcar_comision_pagada),
        )
        // Comisiones y reportes
        .route("/comisiones", get(handlers::resumen_comisiones))
        .route("/reportes/resumen", get(handlers::resumen_general))
        .route("/reportes/pedidos-por-dia", get(handlers::pedidos_por_dia))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::requerir_sesion,
        ));

    Router::new()
        .route("/api/login", post(handlers::login))
        .nest("/api", protegidas)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
