use serde::{Deserialize, Serialize};

/// Estado de un pedido. No hay grafo de transiciones: cualquier estado
/// puede pasar a cualquier otro vía `actualizar_pedido`.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum EstadoPedido {
    Pendiente,
    Aprobado,
    Observado,
    Entregado,
}

impl EstadoPedido {
    pub fn as_str(&self) -> &'static str {
        match self {
            EstadoPedido::Pendiente => "Pendiente",
            EstadoPedido::Aprobado => "Aprobado",
            EstadoPedido::Observado => "Observado",
            EstadoPedido::Entregado => "Entregado",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pendiente" => Some(EstadoPedido::Pendiente),
            "Aprobado" => Some(EstadoPedido::Aprobado),
            "Observado" => Some(EstadoPedido::Observado),
            "Entregado" => Some(EstadoPedido::Entregado),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Pedido {
    pub id: Option<i64>,
    pub numeropedido: String,
    pub cliente_id: i64,
    pub vendedor_id: i64,
    pub proveedor_id: Option<i64>,
    pub subtotal: f64,
    pub envio: f64,
    pub total: f64,
    pub estado: EstadoPedido,
    pub comision_pagada: bool,
    pub notas: Option<String>,
    pub creado: Option<String>,
    /// Nombres resueltos vía JOIN para los listados
    pub cliente_nombre: Option<String>,
    pub proveedor_nombre: Option<String>,
}

/// Línea de pedido persistida, con el precio unitario capturado al crear
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PedidoDetalle {
    pub id: Option<i64>,
    pub pedido_id: Option<i64>,
    pub producto_id: i64,
    pub nombre_producto: Option<String>,
    pub cantidad: i64,
    pub precio: f64,
    pub subtotal: f64,
}

/// Línea entrante: sin precio explícito se usa el precio vigente del
/// producto, y 0 si el producto no tiene precio
#[derive(Debug, Deserialize, Clone)]
pub struct NuevoDetalle {
    pub producto_id: i64,
    pub cantidad: i64,
    pub precio: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct NuevoPedido {
    pub cliente_id: i64,
    pub proveedor_id: Option<i64>,
    pub items: Vec<NuevoDetalle>,
    pub notas: Option<String>,
}

/// Campos modificables de un pedido; los totales siempre se recalculan
#[derive(Debug, Deserialize)]
pub struct ActualizarPedido {
    pub items: Option<Vec<NuevoDetalle>>,
    pub estado: Option<EstadoPedido>,
    pub notas: Option<String>,
    pub proveedor_id: Option<i64>,
}

/// Pedido con sus líneas (vista de detalle)
#[derive(Debug, Serialize)]
pub struct PedidoCompleto {
    pub pedido: Pedido,
    pub detalles: Vec<PedidoDetalle>,
}

/// Comisión calculada de un pedido entregado y no pagado
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ComisionPedido {
    pub pedido_id: i64,
    pub numeropedido: String,
    pub comision: f64,
}

/// Resumen de comisiones pendientes del usuario en sesión
#[derive(Debug, Serialize)]
pub struct ResumenComisiones {
    pub total: f64,
    pub pedidos: Vec<ComisionPedido>,
}
