use rusqlite::Row;

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{Cliente, NuevoCliente, SesionActiva};

fn cliente_desde_fila(row: &Row) -> rusqlite::Result<Cliente> {
    Ok(Cliente {
        id: Some(row.get(0)?),
        rut: row.get(1)?,
        nombre: row.get(2)?,
        email: row.get(3)?,
        telefono: row.get(4)?,
        direccioncalle: row.get(5)?,
        direccionnumero: row.get(6)?,
        direcciondepto: row.get(7)?,
        direccioncomuna: row.get(8)?,
        direccionregion: row.get(9)?,
        direccionprovincia: row.get(10)?,
        vendedor_id: row.get(11)?,
        activo: row.get::<_, i64>(12)? != 0,
    })
}

const COLUMNAS_CLIENTE: &str = "id, rut, nombre, email, telefono, direccioncalle, \
     direccionnumero, direcciondepto, direccioncomuna, direccionregion, direccionprovincia, \
     vendedor_id, activo";

/// Crea un cliente asignado al vendedor en sesión
pub fn crear_cliente(
    db: &Database,
    sesion: &SesionActiva,
    cliente: NuevoCliente,
) -> Result<Cliente> {
    if cliente.nombre.trim().is_empty() {
        return Err(Error::validacion("El nombre no puede estar vacío"));
    }

    let conn = db.conn()?;
    conn.execute(
        "INSERT INTO clientes (rut, nombre, email, telefono, direccioncalle, direccionnumero,
         direcciondepto, direccioncomuna, direccionregion, direccionprovincia, vendedor_id)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
        rusqlite::params![
            cliente.rut,
            cliente.nombre.trim(),
            cliente.email,
            cliente.telefono,
            cliente.direccioncalle,
            cliente.direccionnumero,
            cliente.direcciondepto,
            cliente.direccioncomuna,
            cliente.direccionregion,
            cliente.direccionprovincia,
            sesion.usuario_id,
        ],
    )
    .map_err(|e| match e {
        rusqlite::Error::SqliteFailure(f, _)
            if f.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            Error::Validacion("Ya existe un cliente con ese RUT".to_string())
        }
        otro => Error::Db(otro),
    })?;

    let id = conn.last_insert_rowid();
    conn.query_row(
        &format!("SELECT {} FROM clientes WHERE id = ?1", COLUMNAS_CLIENTE),
        rusqlite::params![id],
        cliente_desde_fila,
    )
    .map_err(Error::Db)
}

/// Retorna el cliente si la sesión puede verlo (admin o su vendedor)
pub fn obtener_cliente(db: &Database, sesion: &SesionActiva, id: i64) -> Result<Cliente> {
    let conn = db.conn()?;
    let cliente = conn
        .query_row(
            &format!("SELECT {} FROM clientes WHERE id = ?1", COLUMNAS_CLIENTE),
            rusqlite::params![id],
            cliente_desde_fila,
        )
        .map_err(|_| Error::no_encontrado("Cliente no encontrado"))?;

    if !sesion.es_administrador() && cliente.vendedor_id != Some(sesion.usuario_id) {
        return Err(Error::Prohibido(
            "El cliente pertenece a otro vendedor".to_string(),
        ));
    }
    Ok(cliente)
}

/// Actualiza los datos de un cliente (mismo control de acceso que obtener)
pub fn actualizar_cliente(
    db: &Database,
    sesion: &SesionActiva,
    id: i64,
    cliente: NuevoCliente,
) -> Result<Cliente> {
    // valida existencia y propiedad antes de escribir
    obtener_cliente(db, sesion, id)?;

    if cliente.nombre.trim().is_empty() {
        return Err(Error::validacion("El nombre no puede estar vacío"));
    }

    let conn = db.conn()?;
    conn.execute(
        "UPDATE clientes SET rut=?1, nombre=?2, email=?3, telefono=?4, direccioncalle=?5,
         direccionnumero=?6, direcciondepto=?7, direccioncomuna=?8, direccionregion=?9,
         direccionprovincia=?10, updated_at=datetime('now','localtime')
         WHERE id=?11",
        rusqlite::params![
            cliente.rut,
            cliente.nombre.trim(),
            cliente.email,
            cliente.telefono,
            cliente.direccioncalle,
            cliente.direccionnumero,
            cliente.direcciondepto,
            cliente.direccioncomuna,
            cliente.direccionregion,
            cliente.direccionprovincia,
            id,
        ],
    )?;

    conn.query_row(
        &format!("SELECT {} FROM clientes WHERE id = ?1", COLUMNAS_CLIENTE),
        rusqlite::params![id],
        cliente_desde_fila,
    )
    .map_err(Error::Db)
}

/// Listado paginado: el administrador ve todos los clientes, un vendedor
/// solamente los suyos
pub fn listar_clientes(
    db: &Database,
    sesion: &SesionActiva,
    limit: i64,
    offset: i64,
) -> Result<Vec<Cliente>> {
    let conn = db.conn()?;
    let vendedor: Option<i64> = if sesion.es_administrador() {
        None
    } else {
        Some(sesion.usuario_id)
    };

    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM clientes
         WHERE activo = 1 AND (?1 IS NULL OR vendedor_id = ?1)
         ORDER BY nombre LIMIT ?2 OFFSET ?3",
        COLUMNAS_CLIENTE
    ))?;
    let clientes = stmt
        .query_map(rusqlite::params![vendedor, limit, offset], cliente_desde_fila)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(clientes)
}
