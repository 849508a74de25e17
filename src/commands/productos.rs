use rusqlite::{Connection, Row};

use crate::commands::usuarios::verificar_admin;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{Producto, SesionActiva};

fn producto_desde_fila(row: &Row) -> rusqlite::Result<Producto> {
    Ok(Producto {
        id: Some(row.get(0)?),
        sku: row.get(1)?,
        skuproveedor: row.get(2)?,
        nombre: row.get(3)?,
        descripcion: row.get(4)?,
        formato: row.get(5)?,
        precio: row.get(6)?,
        existencia: row.get(7)?,
    })
}

const COLUMNAS_PRODUCTO: &str =
    "id, sku, skuproveedor, nombre, descripcion, formato, precio, existencia";

fn validar_producto(producto: &Producto) -> Result<()> {
    if producto.sku.trim().is_empty() {
        return Err(Error::validacion("El SKU no puede estar vacío"));
    }
    if producto.nombre.trim().is_empty() {
        return Err(Error::validacion("El nombre no puede estar vacío"));
    }
    if producto.precio < 0.0 {
        return Err(Error::validacion("El precio no puede ser negativo"));
    }
    Ok(())
}

/// Inserta o actualiza un producto por SKU sobre una conexión ya tomada.
/// Lo comparte la importación CSV para no soltar el lock por fila.
pub(crate) fn upsert_producto(conn: &Connection, producto: &Producto) -> Result<Producto> {
    validar_producto(producto)?;

    conn.execute(
        "INSERT INTO productos (sku, skuproveedor, nombre, descripcion, formato, precio, existencia)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
         ON CONFLICT(sku) DO UPDATE SET
            skuproveedor = excluded.skuproveedor,
            nombre = excluded.nombre,
            descripcion = excluded.descripcion,
            formato = excluded.formato,
            precio = excluded.precio,
            existencia = excluded.existencia,
            updated_at = datetime('now','localtime')",
        rusqlite::params![
            producto.sku.trim(),
            producto.skuproveedor.trim(),
            producto.nombre.trim(),
            producto.descripcion,
            producto.formato,
            producto.precio,
            producto.existencia,
        ],
    )?;

    conn.query_row(
        &format!("SELECT {} FROM productos WHERE sku = ?1", COLUMNAS_PRODUCTO),
        rusqlite::params![producto.sku.trim()],
        producto_desde_fila,
    )
    .map_err(Error::Db)
}

pub fn crear_producto(
    db: &Database,
    sesion: &SesionActiva,
    producto: Producto,
) -> Result<Producto> {
    verificar_admin(sesion)?;
    let conn = db.conn()?;
    upsert_producto(&conn, &producto)
}

pub fn actualizar_producto(
    db: &Database,
    sesion: &SesionActiva,
    id: i64,
    producto: Producto,
) -> Result<Producto> {
    verificar_admin(sesion)?;
    validar_producto(&producto)?;

    let conn = db.conn()?;
    let actualizados = conn.execute(
        "UPDATE productos SET sku=?1, skuproveedor=?2, nombre=?3, descripcion=?4,
         formato=?5, precio=?6, existencia=?7, updated_at=datetime('now','localtime')
         WHERE id=?8",
        rusqlite::params![
            producto.sku.trim(),
            producto.skuproveedor.trim(),
            producto.nombre.trim(),
            producto.descripcion,
            producto.formato,
            producto.precio,
            producto.existencia,
            id,
        ],
    )?;
    if actualizados == 0 {
        return Err(Error::no_encontrado("Producto no encontrado"));
    }

    conn.query_row(
        &format!("SELECT {} FROM productos WHERE id = ?1", COLUMNAS_PRODUCTO),
        rusqlite::params![id],
        producto_desde_fila,
    )
    .map_err(Error::Db)
}

pub fn obtener_producto(db: &Database, id: i64) -> Result<Producto> {
    let conn = db.conn()?;
    conn.query_row(
        &format!("SELECT {} FROM productos WHERE id = ?1", COLUMNAS_PRODUCTO),
        rusqlite::params![id],
        producto_desde_fila,
    )
    .map_err(|_| Error::no_encontrado("Producto no encontrado"))
}

pub fn listar_productos(db: &Database) -> Result<Vec<Producto>> {
    let conn = db.conn()?;
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM productos ORDER BY nombre",
        COLUMNAS_PRODUCTO
    ))?;
    let productos = stmt
        .query_map([], producto_desde_fila)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(productos)
}

/// Catálogo de un proveedor: productos colgados de su código
pub fn productos_por_proveedor(db: &Database, skuproveedor: &str) -> Result<Vec<Producto>> {
    let conn = db.conn()?;
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM productos WHERE skuproveedor = ?1 ORDER BY nombre",
        COLUMNAS_PRODUCTO
    ))?;
    let productos = stmt
        .query_map(rusqlite::params![skuproveedor], producto_desde_fila)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(productos)
}
