use std::collections::HashMap;

use rusqlite::Connection;

use crate::calculos;
use crate::commands::pedidos::pedidos_visibles;
use crate::commands::usuarios::verificar_admin;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{EstadoPedido, ResumenComisiones, SesionActiva};

/// Tabla proveedor -> tasa, cargada una sola vez por agregación en vez
/// de una consulta por pedido
fn cargar_tasas(conn: &Connection) -> Result<HashMap<i64, f64>> {
    let mut stmt = conn.prepare("SELECT id, comision FROM proveedores")?;
    let tasas = stmt
        .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, f64>(1)?)))?
        .collect::<rusqlite::Result<HashMap<_, _>>>()?;
    Ok(tasas)
}

/// Comisiones pendientes de los pedidos visibles para la sesión:
/// total y desglose por pedido
pub fn resumen_comisiones(db: &Database, sesion: &SesionActiva) -> Result<ResumenComisiones> {
    let conn = db.conn()?;
    let pedidos = pedidos_visibles(&conn, sesion)?;
    let tasas = cargar_tasas(&conn)?;

    let pedidos_comision = calculos::comisiones_por_pedido(&pedidos, &tasas);
    let total = pedidos_comision.iter().map(|c| c.comision).sum();

    Ok(ResumenComisiones {
        total,
        pedidos: pedidos_comision,
    })
}

/// Marca la comisión de un pedido como pagada. Solo administradores y
/// solo sobre pedidos entregados.
pub fn marcar_comision_pagada(db: &Database, sesion: &SesionActiva, pedido_id: i64) -> Result<()> {
    verificar_admin(sesion)?;

    let conn = db.conn()?;
    let estado: String = conn
        .query_row(
            "SELECT estado FROM pedidos WHERE id = ?1",
            rusqlite::params![pedido_id],
            |row| row.get(0),
        )
        .map_err(|_| Error::no_encontrado("Pedido no encontrado"))?;

    if EstadoPedido::parse(&estado) != Some(EstadoPedido::Entregado) {
        return Err(Error::validacion(
            "Solo se puede pagar la comisión de un pedido entregado",
        ));
    }

    conn.execute(
        "UPDATE pedidos SET comision_pagada = 1 WHERE id = ?1",
        rusqlite::params![pedido_id],
    )?;
    tracing::info!(pedido_id, "comisión marcada como pagada");
    Ok(())
}
