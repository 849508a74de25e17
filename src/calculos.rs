//! Núcleo de cálculo de pedidos: costo de envío por rangos, totales y
//! comisiones. Funciones puras sobre datos ya cargados en memoria; el
//! que llama es responsable de reinvocarlas cuando cambian las líneas
//! del pedido o la tabla de rangos.

use std::collections::HashMap;

use serde::Serialize;

use crate::models::{ComisionPedido, CostoEnvio, EstadoPedido, Pedido, PedidoDetalle};

/// Totales derivados de un pedido
#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct TotalesPedido {
    pub subtotal: f64,
    pub envio: f64,
    pub total: f64,
}

/// Resuelve el costo de envío para un subtotal dado.
///
/// Recorre los rangos en orden y retorna el `costo` del primero que
/// satisface `min_total <= subtotal <= max_total` (ambos extremos
/// inclusivos). Sin rango que calce, el envío es 0.
pub fn resolver_costo_envio(subtotal: f64, rangos: &[CostoEnvio]) -> f64 {
    rangos
        .iter()
        .find(|r| subtotal >= r.min_total && subtotal <= r.max_total)
        .map(|r| r.costo)
        .unwrap_or(0.0)
}

/// Calcula subtotal, envío y total de un conjunto de líneas.
///
/// `subtotal = Σ precio × cantidad`, `envio` sale de la tabla de rangos
/// y `total = subtotal + envio`. Se recalcula completo en cada llamada.
pub fn calcular_totales(items: &[PedidoDetalle], rangos: &[CostoEnvio]) -> TotalesPedido {
    let subtotal: f64 = items
        .iter()
        .map(|item| item.precio * item.cantidad as f64)
        .sum();
    let envio = resolver_costo_envio(subtotal, rangos);
    TotalesPedido {
        subtotal,
        envio,
        total: subtotal + envio,
    }
}

fn tasa_comision(pedido: &Pedido, tasas: &HashMap<i64, f64>) -> f64 {
    let Some(proveedor_id) = pedido.proveedor_id else {
        tracing::warn!(
            numeropedido = %pedido.numeropedido,
            "pedido sin proveedor, comisión contada como 0"
        );
        return 0.0;
    };
    match tasas.get(&proveedor_id) {
        Some(tasa) => *tasa,
        None => {
            tracing::warn!(
                numeropedido = %pedido.numeropedido,
                proveedor_id,
                "proveedor sin tasa de comisión, comisión contada como 0"
            );
            0.0
        }
    }
}

fn comisionable(pedido: &Pedido) -> bool {
    pedido.estado == EstadoPedido::Entregado && !pedido.comision_pagada
}

/// Comisión por pedido: solo pedidos entregados con comisión no pagada.
/// Un proveedor ausente de la tabla de tasas aporta 0 en vez de abortar.
pub fn comisiones_por_pedido(
    pedidos: &[Pedido],
    tasas: &HashMap<i64, f64>,
) -> Vec<ComisionPedido> {
    pedidos
        .iter()
        .filter(|p| comisionable(p))
        .map(|p| ComisionPedido {
            pedido_id: p.id.unwrap_or(0),
            numeropedido: p.numeropedido.clone(),
            comision: p.total * tasa_comision(p, tasas),
        })
        .collect()
}

/// Suma de comisiones pendientes sobre la lista visible de pedidos
pub fn calcular_comision_total(pedidos: &[Pedido], tasas: &HashMap<i64, f64>) -> f64 {
    comisiones_por_pedido(pedidos, tasas)
        .iter()
        .map(|c| c.comision)
        .sum()
}
