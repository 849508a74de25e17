use rusqlite::{Connection, Row};

use crate::calculos;
use crate::commands::envios::cargar_rangos;
use crate::commands::usuarios::verificar_admin;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{
    ActualizarPedido, EstadoPedido, NuevoDetalle, NuevoPedido, Pedido, PedidoCompleto,
    PedidoDetalle, SesionActiva,
};

const COLUMNAS_PEDIDO: &str = "p.id, p.numeropedido, p.cliente_id, p.vendedor_id, \
     p.proveedor_id, p.subtotal, p.envio, p.total, p.estado, p.comision_pagada, p.notas, \
     p.creado, c.nombre, pr.nombre";

const FROM_PEDIDO: &str = "FROM pedidos p
     LEFT JOIN clientes c ON c.id = p.cliente_id
     LEFT JOIN proveedores pr ON pr.id = p.proveedor_id";

fn pedido_desde_fila(row: &Row) -> rusqlite::Result<Pedido> {
    let estado_raw: String = row.get(8)?;
    let estado = EstadoPedido::parse(&estado_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            8,
            rusqlite::types::Type::Text,
            format!("estado desconocido: {}", estado_raw).into(),
        )
    })?;

    Ok(Pedido {
        id: Some(row.get(0)?),
        numeropedido: row.get(1)?,
        cliente_id: row.get(2)?,
        vendedor_id: row.get(3)?,
        proveedor_id: row.get(4)?,
        subtotal: row.get(5)?,
        envio: row.get(6)?,
        total: row.get(7)?,
        estado,
        comision_pagada: row.get::<_, i64>(9)? != 0,
        notas: row.get(10)?,
        creado: row.get(11)?,
        cliente_nombre: row.get(12)?,
        proveedor_nombre: row.get(13)?,
    })
}

/// Valida las líneas entrantes y captura el precio unitario vigente.
/// Sin precio explícito se usa el del producto (0 si no tiene).
fn construir_detalles(conn: &Connection, items: &[NuevoDetalle]) -> Result<Vec<PedidoDetalle>> {
    if items.is_empty() {
        return Err(Error::validacion(
            "El pedido debe tener al menos un producto",
        ));
    }

    let mut detalles = Vec::with_capacity(items.len());
    for item in items {
        if item.cantidad < 1 {
            return Err(Error::validacion(format!(
                "Cantidad inválida para el producto {}: debe ser al menos 1",
                item.producto_id
            )));
        }

        let (nombre, precio_producto): (String, f64) = conn
            .query_row(
                "SELECT nombre, precio FROM productos WHERE id = ?1",
                rusqlite::params![item.producto_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .map_err(|_| {
                Error::no_encontrado(format!("Producto {} no existe", item.producto_id))
            })?;

        let precio = item.precio.unwrap_or(precio_producto);
        if precio < 0.0 {
            return Err(Error::validacion(format!(
                "Precio inválido para el producto {}: no puede ser negativo",
                item.producto_id
            )));
        }

        detalles.push(PedidoDetalle {
            id: None,
            pedido_id: None,
            producto_id: item.producto_id,
            nombre_producto: Some(nombre),
            cantidad: item.cantidad,
            precio,
            subtotal: precio * item.cantidad as f64,
        });
    }
    Ok(detalles)
}

fn insertar_detalles(conn: &Connection, pedido_id: i64, detalles: &[PedidoDetalle]) -> Result<()> {
    for detalle in detalles {
        conn.execute(
            "INSERT INTO pedido_detalles (pedido_id, producto_id, cantidad, precio, subtotal)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![
                pedido_id,
                detalle.producto_id,
                detalle.cantidad,
                detalle.precio,
                detalle.subtotal,
            ],
        )?;
    }
    Ok(())
}

fn cargar_detalles(conn: &Connection, pedido_id: i64) -> Result<Vec<PedidoDetalle>> {
    let mut stmt = conn.prepare(
        "SELECT d.id, d.pedido_id, d.producto_id, pr.nombre, d.cantidad, d.precio, d.subtotal
         FROM pedido_detalles d
         LEFT JOIN productos pr ON pr.id = d.producto_id
         WHERE d.pedido_id = ?1
         ORDER BY d.id",
    )?;
    let detalles = stmt
        .query_map(rusqlite::params![pedido_id], |row| {
            Ok(PedidoDetalle {
                id: Some(row.get(0)?),
                pedido_id: Some(row.get(1)?),
                producto_id: row.get(2)?,
                nombre_producto: row.get(3)?,
                cantidad: row.get(4)?,
                precio: row.get(5)?,
                subtotal: row.get(6)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(detalles)
}

fn cargar_pedido(conn: &Connection, id: i64) -> Result<Pedido> {
    conn.query_row(
        &format!(
            "SELECT {} {} WHERE p.id = ?1",
            COLUMNAS_PEDIDO, FROM_PEDIDO
        ),
        rusqlite::params![id],
        pedido_desde_fila,
    )
    .map_err(|_| Error::no_encontrado("Pedido no encontrado"))
}

fn verificar_acceso(sesion: &SesionActiva, pedido: &Pedido) -> Result<()> {
    if !sesion.es_administrador() && pedido.vendedor_id != sesion.usuario_id {
        return Err(Error::Prohibido(
            "El pedido pertenece a otro vendedor".to_string(),
        ));
    }
    Ok(())
}

/// Crea un pedido para el vendedor en sesión. Valida cliente, proveedor
/// y líneas, calcula los totales con la tabla de envío vigente y asigna
/// el número correlativo PED-xxxxxx.
pub fn crear_pedido(db: &Database, sesion: &SesionActiva, pedido: NuevoPedido) -> Result<PedidoCompleto> {
    let conn = db.conn()?;

    // El cliente debe existir y pertenecer al vendedor (salvo admin)
    let vendedor_cliente: Option<i64> = conn
        .query_row(
            "SELECT vendedor_id FROM clientes WHERE id = ?1 AND activo = 1",
            rusqlite::params![pedido.cliente_id],
            |row| row.get(0),
        )
        .map_err(|_| Error::no_encontrado("Cliente no encontrado"))?;
    if !sesion.es_administrador() && vendedor_cliente != Some(sesion.usuario_id) {
        return Err(Error::Prohibido(
            "El cliente pertenece a otro vendedor".to_string(),
        ));
    }

    if let Some(proveedor_id) = pedido.proveedor_id {
        let activo: i64 = conn
            .query_row(
                "SELECT activo FROM proveedores WHERE id = ?1",
                rusqlite::params![proveedor_id],
                |row| row.get(0),
            )
            .map_err(|_| Error::no_encontrado("Proveedor no encontrado"))?;
        if activo == 0 {
            return Err(Error::validacion("El proveedor está inactivo"));
        }
    }

    let detalles = construir_detalles(&conn, &pedido.items)?;
    let rangos = cargar_rangos(&conn)?;
    let totales = calculos::calcular_totales(&detalles, &rangos);

    // Correlativo interno: PED-000017
    let secuencial: i64 = conn.query_row(
        "SELECT CAST(value AS INTEGER) FROM config WHERE key = 'secuencial_pedido'",
        [],
        |row| row.get(0),
    )?;
    let numeropedido = format!("PED-{:06}", secuencial);
    conn.execute(
        "UPDATE config SET value = CAST(?1 AS TEXT) WHERE key = 'secuencial_pedido'",
        rusqlite::params![secuencial + 1],
    )?;

    conn.execute(
        "INSERT INTO pedidos (numeropedido, cliente_id, vendedor_id, proveedor_id,
         subtotal, envio, total, estado, notas)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        rusqlite::params![
            numeropedido,
            pedido.cliente_id,
            sesion.usuario_id,
            pedido.proveedor_id,
            totales.subtotal,
            totales.envio,
            totales.total,
            EstadoPedido::Pendiente.as_str(),
            pedido.notas,
        ],
    )?;
    let pedido_id = conn.last_insert_rowid();

    insertar_detalles(&conn, pedido_id, &detalles)?;

    tracing::info!(numeropedido = %numeropedido, total = totales.total, "pedido creado");

    Ok(PedidoCompleto {
        pedido: cargar_pedido(&conn, pedido_id)?,
        detalles: cargar_detalles(&conn, pedido_id)?,
    })
}

pub fn obtener_pedido(db: &Database, sesion: &SesionActiva, id: i64) -> Result<PedidoCompleto> {
    let conn = db.conn()?;
    let pedido = cargar_pedido(&conn, id)?;
    verificar_acceso(sesion, &pedido)?;
    let detalles = cargar_detalles(&conn, id)?;
    Ok(PedidoCompleto { pedido, detalles })
}

/// Listado paginado, más recientes primero. El administrador ve todos los
/// pedidos; un vendedor solo los propios.
pub fn listar_pedidos(
    db: &Database,
    sesion: &SesionActiva,
    limit: i64,
    offset: i64,
) -> Result<Vec<Pedido>> {
    let conn = db.conn()?;
    let vendedor: Option<i64> = if sesion.es_administrador() {
        None
    } else {
        Some(sesion.usuario_id)
    };

    let mut stmt = conn.prepare(&format!(
        "SELECT {} {}
         WHERE (?1 IS NULL OR p.vendedor_id = ?1)
         ORDER BY p.creado DESC, p.id DESC
         LIMIT ?2 OFFSET ?3",
        COLUMNAS_PEDIDO, FROM_PEDIDO
    ))?;
    let pedidos = stmt
        .query_map(rusqlite::params![vendedor, limit, offset], pedido_desde_fila)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(pedidos)
}

/// Actualiza líneas, estado, notas o proveedor de un pedido. Los totales
/// se recalculan siempre contra la tabla de envío vigente.
pub fn actualizar_pedido(
    db: &Database,
    sesion: &SesionActiva,
    id: i64,
    cambios: ActualizarPedido,
) -> Result<PedidoCompleto> {
    let conn = db.conn()?;
    let pedido = cargar_pedido(&conn, id)?;
    verificar_acceso(sesion, &pedido)?;

    if let Some(items) = &cambios.items {
        let detalles = construir_detalles(&conn, items)?;
        conn.execute(
            "DELETE FROM pedido_detalles WHERE pedido_id = ?1",
            rusqlite::params![id],
        )?;
        insertar_detalles(&conn, id, &detalles)?;
    }

    if let Some(proveedor_id) = cambios.proveedor_id {
        conn.query_row(
            "SELECT id FROM proveedores WHERE id = ?1",
            rusqlite::params![proveedor_id],
            |row| row.get::<_, i64>(0),
        )
        .map_err(|_| Error::no_encontrado("Proveedor no encontrado"))?;
        conn.execute(
            "UPDATE pedidos SET proveedor_id = ?1 WHERE id = ?2",
            rusqlite::params![proveedor_id, id],
        )?;
    }

    if let Some(estado) = cambios.estado {
        conn.execute(
            "UPDATE pedidos SET estado = ?1 WHERE id = ?2",
            rusqlite::params![estado.as_str(), id],
        )?;
    }

    if let Some(notas) = &cambios.notas {
        conn.execute(
            "UPDATE pedidos SET notas = ?1 WHERE id = ?2",
            rusqlite::params![notas, id],
        )?;
    }

    // Recalcular siempre: las líneas o la tabla de rangos pudieron cambiar
    let detalles = cargar_detalles(&conn, id)?;
    let rangos = cargar_rangos(&conn)?;
    let totales = calculos::calcular_totales(&detalles, &rangos);
    conn.execute(
        "UPDATE pedidos SET subtotal = ?1, envio = ?2, total = ?3 WHERE id = ?4",
        rusqlite::params![totales.subtotal, totales.envio, totales.total, id],
    )?;

    Ok(PedidoCompleto {
        pedido: cargar_pedido(&conn, id)?,
        detalles,
    })
}

pub fn eliminar_pedido(db: &Database, sesion: &SesionActiva, id: i64) -> Result<()> {
    verificar_admin(sesion)?;

    let conn = db.conn()?;
    conn.execute(
        "DELETE FROM pedido_detalles WHERE pedido_id = ?1",
        rusqlite::params![id],
    )?;
    let eliminados = conn.execute("DELETE FROM pedidos WHERE id = ?1", rusqlite::params![id])?;
    if eliminados == 0 {
        return Err(Error::no_encontrado("Pedido no encontrado"));
    }
    Ok(())
}

/// Pedidos visibles para la sesión, sin paginar (comisiones y reportes)
pub(crate) fn pedidos_visibles(conn: &Connection, sesion: &SesionActiva) -> Result<Vec<Pedido>> {
    let vendedor: Option<i64> = if sesion.es_administrador() {
        None
    } else {
        Some(sesion.usuario_id)
    };

    let mut stmt = conn.prepare(&format!(
        "SELECT {} {}
         WHERE (?1 IS NULL OR p.vendedor_id = ?1)
         ORDER BY p.creado DESC, p.id DESC",
        COLUMNAS_PEDIDO, FROM_PEDIDO
    ))?;
    let pedidos = stmt
        .query_map(rusqlite::params![vendedor], pedido_desde_fila)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(pedidos)
}
