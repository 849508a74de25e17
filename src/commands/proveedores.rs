use rusqlite::Row;

use crate::commands::usuarios::verificar_admin;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{NuevoProveedor, Proveedor, SesionActiva};

fn proveedor_desde_fila(row: &Row) -> rusqlite::Result<Proveedor> {
    Ok(Proveedor {
        id: Some(row.get(0)?),
        codigo: row.get(1)?,
        rut: row.get(2)?,
        nombre: row.get(3)?,
        email: row.get(4)?,
        telefono: row.get(5)?,
        direccioncalle: row.get(6)?,
        comision: row.get(7)?,
        activo: row.get::<_, i64>(8)? != 0,
    })
}

const COLUMNAS_PROVEEDOR: &str =
    "id, codigo, rut, nombre, email, telefono, direccioncalle, comision, activo";

fn validar_proveedor(proveedor: &NuevoProveedor) -> Result<()> {
    if proveedor.nombre.trim().is_empty() {
        return Err(Error::validacion("El nombre no puede estar vacío"));
    }
    if proveedor.codigo.trim().is_empty() {
        return Err(Error::validacion("El código no puede estar vacío"));
    }
    if !(0.0..=1.0).contains(&proveedor.comision) {
        return Err(Error::validacion(
            "La comisión debe ser una fracción entre 0 y 1",
        ));
    }
    Ok(())
}

pub fn crear_proveedor(
    db: &Database,
    sesion: &SesionActiva,
    proveedor: NuevoProveedor,
) -> Result<Proveedor> {
    verificar_admin(sesion)?;
    validar_proveedor(&proveedor)?;

    let conn = db.conn()?;
    conn.execute(
        "INSERT INTO proveedores (codigo, rut, nombre, email, telefono, direccioncalle, comision)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        rusqlite::params![
            proveedor.codigo.trim(),
            proveedor.rut,
            proveedor.nombre.trim(),
            proveedor.email,
            proveedor.telefono,
            proveedor.direccioncalle,
            proveedor.comision,
        ],
    )
    .map_err(|e| match e {
        rusqlite::Error::SqliteFailure(f, _)
            if f.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Error::Validacion("Ya existe un proveedor con ese código".to_string())
        }
        otro => Error::Db(otro),
    })?;

    let id = conn.last_insert_rowid();
    conn.query_row(
        &format!("SELECT {} FROM proveedores WHERE id = ?1", COLUMNAS_PROVEEDOR),
        rusqlite::params![id],
        proveedor_desde_fila,
    )
    .map_err(Error::Db)
}

pub fn obtener_proveedor(db: &Database, id: i64) -> Result<Proveedor> {
    let conn = db.conn()?;
    conn.query_row(
        &format!("SELECT {} FROM proveedores WHERE id = ?1", COLUMNAS_PROVEEDOR),
        rusqlite::params![id],
        proveedor_desde_fila,
    )
    .map_err(|_| Error::no_encontrado("Proveedor no encontrado"))
}

pub fn actualizar_proveedor(
    db: &Database,
    sesion: &SesionActiva,
    id: i64,
    proveedor: NuevoProveedor,
) -> Result<Proveedor> {
    verificar_admin(sesion)?;
    validar_proveedor(&proveedor)?;

    let conn = db.conn()?;
    let actualizados = conn.execute(
        "UPDATE proveedores SET codigo=?1, rut=?2, nombre=?3, email=?4, telefono=?5,
         direccioncalle=?6, comision=?7, updated_at=datetime('now','localtime')
         WHERE id=?8",
        rusqlite::params![
            proveedor.codigo.trim(),
            proveedor.rut,
            proveedor.nombre.trim(),
            proveedor.email,
            proveedor.telefono,
            proveedor.direccioncalle,
            proveedor.comision,
            id,
        ],
    )?;
    if actualizados == 0 {
        return Err(Error::no_encontrado("Proveedor no encontrado"));
    }

    conn.query_row(
        &format!("SELECT {} FROM proveedores WHERE id = ?1", COLUMNAS_PROVEEDOR),
        rusqlite::params![id],
        proveedor_desde_fila,
    )
    .map_err(Error::Db)
}

/// Alterna el flag activo del proveedor
pub fn cambiar_estado_proveedor(
    db: &Database,
    sesion: &SesionActiva,
    id: i64,
) -> Result<Proveedor> {
    verificar_admin(sesion)?;

    let conn = db.conn()?;
    let cambiados = conn.execute(
        "UPDATE proveedores SET activo = 1 - activo, updated_at=datetime('now','localtime')
         WHERE id = ?1",
        rusqlite::params![id],
    )?;
    if cambiados == 0 {
        return Err(Error::no_encontrado("Proveedor no encontrado"));
    }

    conn.query_row(
        &format!("SELECT {} FROM proveedores WHERE id = ?1", COLUMNAS_PROVEEDOR),
        rusqlite::params![id],
        proveedor_desde_fila,
    )
    .map_err(Error::Db)
}

pub fn listar_proveedores(db: &Database) -> Result<Vec<Proveedor>> {
    let conn = db.conn()?;
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM proveedores ORDER BY nombre",
        COLUMNAS_PROVEEDOR
    ))?;
    let proveedores = stmt
        .query_map([], proveedor_desde_fila)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(proveedores)
}
