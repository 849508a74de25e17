use chrono::{Duration, Local};
use serde::{Deserialize, Serialize};

use crate::commands::comisiones;
use crate::db::Database;
use crate::error::Result;
use crate::models::SesionActiva;

#[derive(Debug, Serialize, Deserialize)]
pub struct ResumenGeneral {
    pub pedidos_pendientes: i64,
    pub pedidos_aprobados: i64,
    pub pedidos_observados: i64,
    pub pedidos_entregados: i64,
    pub total_vendido: f64,
    pub comisiones_pendientes: f64,
    pub num_clientes: i64,
    pub num_productos: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PedidosDia {
    pub fecha: String,
    pub cantidad: i64,
    pub total: f64,
}

/// Resumen para el dashboard; un vendedor solo ve sus propios números
pub fn resumen_general(db: &Database, sesion: &SesionActiva) -> Result<ResumenGeneral> {
    let vendedor: Option<i64> = if sesion.es_administrador() {
        None
    } else {
        Some(sesion.usuario_id)
    };

    let conn = db.conn()?;

    let contar = |estado: &str| -> Result<i64> {
        let n = conn.query_row(
            "SELECT COUNT(*) FROM pedidos
             WHERE estado = ?1 AND (?2 IS NULL OR vendedor_id = ?2)",
            rusqlite::params![estado, vendedor],
            |row| row.get(0),
        )?;
        Ok(n)
    };

    let pedidos_pendientes = contar("Pendiente")?;
    let pedidos_aprobados = contar("Aprobado")?;
    let pedidos_observados = contar("Observado")?;
    let pedidos_entregados = contar("Entregado")?;

    let total_vendido: f64 = conn.query_row(
        "SELECT COALESCE(SUM(total), 0) FROM pedidos
         WHERE estado = 'Entregado' AND (?1 IS NULL OR vendedor_id = ?1)",
        rusqlite::params![vendedor],
        |row| row.get(0),
    )?;

    let num_clientes: i64 = conn.query_row(
        "SELECT COUNT(*) FROM clientes
         WHERE activo = 1 AND (?1 IS NULL OR vendedor_id = ?1)",
        rusqlite::params![vendedor],
        |row| row.get(0),
    )?;

    let num_productos: i64 =
        conn.query_row("SELECT COUNT(*) FROM productos", [], |row| row.get(0))?;

    drop(conn);

    let comisiones_pendientes = comisiones::resumen_comisiones(db, sesion)?.total;

    Ok(ResumenGeneral {
        pedidos_pendientes,
        pedidos_aprobados,
        pedidos_observados,
        pedidos_entregados,
        total_vendido,
        comisiones_pendientes,
        num_clientes,
        num_productos,
    })
}

/// Pedidos por día de los últimos `dias` días, incluyendo días sin
/// movimiento, del más antiguo al más reciente
pub fn pedidos_por_dia(db: &Database, sesion: &SesionActiva, dias: i64) -> Result<Vec<PedidosDia>> {
    let vendedor: Option<i64> = if sesion.es_administrador() {
        None
    } else {
        Some(sesion.usuario_id)
    };

    let conn = db.conn()?;
    let hoy = Local::now().date_naive();

    let mut resultado = Vec::with_capacity(dias.max(0) as usize);
    for i in (0..dias).rev() {
        let fecha = (hoy - Duration::days(i)).format("%Y-%m-%d").to_string();

        let (cantidad, total): (i64, f64) = conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(total), 0) FROM pedidos
             WHERE date(creado) = date(?1) AND (?2 IS NULL OR vendedor_id = ?2)",
            rusqlite::params![fecha, vendedor],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )?;

        resultado.push(PedidosDia {
            fecha,
            cantidad,
            total,
        });
    }

    Ok(resultado)
}
