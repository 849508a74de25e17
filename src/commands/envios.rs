use rusqlite::Connection;

use crate::commands::usuarios::verificar_admin;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{CostoEnvio, NuevoCostoEnvio, SesionActiva};

/// Rangos en orden de inserción; ese orden define la precedencia del
/// resolutor de envío cuando hay solapes
pub(crate) fn cargar_rangos(conn: &Connection) -> Result<Vec<CostoEnvio>> {
    let mut stmt =
        conn.prepare("SELECT id, min_total, max_total, costo FROM costos_envio ORDER BY id")?;
    let rangos = stmt
        .query_map([], |row| {
            Ok(CostoEnvio {
                id: Some(row.get(0)?),
                min_total: row.get(1)?,
                max_total: row.get(2)?,
                costo: row.get(3)?,
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rangos)
}

pub fn listar_costos_envio(db: &Database) -> Result<Vec<CostoEnvio>> {
    let conn = db.conn()?;
    cargar_rangos(&conn)
}

/// Agrega un rango. Los rangos mal formados (min > max) no se rechazan:
/// simplemente nunca calzan en el resolutor.
pub fn nuevo_costo_envio(
    db: &Database,
    sesion: &SesionActiva,
    rango: NuevoCostoEnvio,
) -> Result<CostoEnvio> {
    verificar_admin(sesion)?;

    let conn = db.conn()?;
    conn.execute(
        "INSERT INTO costos_envio (min_total, max_total, costo) VALUES (?1, ?2, ?3)",
        rusqlite::params![rango.min_total, rango.max_total, rango.costo],
    )?;

    Ok(CostoEnvio {
        id: Some(conn.last_insert_rowid()),
        min_total: rango.min_total,
        max_total: rango.max_total,
        costo: rango.costo,
    })
}

pub fn eliminar_costo_envio(db: &Database, sesion: &SesionActiva, id: i64) -> Result<()> {
    verificar_admin(sesion)?;

    let conn = db.conn()?;
    let eliminados = conn.execute(
        "DELETE FROM costos_envio WHERE id = ?1",
        rusqlite::params![id],
    )?;
    if eliminados == 0 {
        return Err(Error::no_encontrado("Rango de envío no encontrado"));
    }
    Ok(())
}
