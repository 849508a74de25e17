use rusqlite::Row;

use crate::db::{Database, SesionState};
use crate::error::{Error, Result};
use crate::models::{
    Credenciales, NuevoUsuario, SesionActiva, TokenSesion, UsuarioInfo, UsuariosPorRol,
    ROL_ADMINISTRADOR, ROL_VENDEDOR,
};
use crate::utils;

/// Verifica que la sesión sea de administrador
pub fn verificar_admin(sesion: &SesionActiva) -> Result<()> {
    if sesion.es_administrador() {
        Ok(())
    } else {
        Err(Error::Prohibido(
            "Se requiere rol de administrador".to_string(),
        ))
    }
}

fn usuario_desde_fila(row: &Row) -> rusqlite::Result<UsuarioInfo> {
    Ok(UsuarioInfo {
        id: row.get(0)?,
        rut: row.get(1)?,
        nombre: row.get(2)?,
        email: row.get(3)?,
        telefono: row.get(4)?,
        direccioncalle: row.get(5)?,
        direccionnumero: row.get(6)?,
        cuentabanconombre: row.get(7)?,
        cuentabanconumero: row.get(8)?,
        cuentabancotipocuenta: row.get(9)?,
        role: row.get(10)?,
        activo: row.get::<_, i64>(11)? != 0,
    })
}

const COLUMNAS_USUARIO: &str = "id, rut, nombre, email, telefono, direccioncalle, \
     direccionnumero, cuentabanconombre, cuentabanconumero, cuentabancotipocuenta, role, activo";

/// Verifica email y contraseña contra los usuarios activos.
/// Si coinciden, abre una sesión y retorna su token.
pub fn autenticar_usuario(
    db: &Database,
    sesiones: &SesionState,
    credenciales: Credenciales,
) -> Result<TokenSesion> {
    let conn = db.conn()?;

    let fila: Option<(i64, String, String)> = conn
        .query_row(
            "SELECT id, password_hash, password_salt FROM usuarios
             WHERE email = ?1 AND activo = 1",
            rusqlite::params![credenciales.email],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )
        .map(Some)
        .or_else(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => Ok(None),
            otro => Err(Error::Db(otro)),
        })?;

    let Some((id, hash, salt)) = fila else {
        return Err(Error::validacion("Email o contraseña incorrectos"));
    };

    if utils::hash_password(&salt, &credenciales.password) != hash {
        return Err(Error::validacion("Email o contraseña incorrectos"));
    }

    let usuario = conn.query_row(
        &format!("SELECT {} FROM usuarios WHERE id = ?1", COLUMNAS_USUARIO),
        rusqlite::params![id],
        usuario_desde_fila,
    )?;
    drop(conn);

    let token = sesiones.abrir(SesionActiva {
        usuario_id: usuario.id,
        nombre: usuario.nombre.clone(),
        role: usuario.role.clone(),
    })?;

    tracing::info!(usuario_id = usuario.id, "sesión iniciada");
    Ok(TokenSesion { token, usuario })
}

/// Cierra la sesión asociada al token
pub fn cerrar_sesion(sesiones: &SesionState, token: &str) -> Result<()> {
    sesiones.cerrar(token)
}

/// Datos del usuario en sesión
pub fn obtener_usuario(db: &Database, sesion: &SesionActiva) -> Result<UsuarioInfo> {
    let conn = db.conn()?;
    conn.query_row(
        &format!("SELECT {} FROM usuarios WHERE id = ?1", COLUMNAS_USUARIO),
        rusqlite::params![sesion.usuario_id],
        usuario_desde_fila,
    )
    .map_err(|_| Error::no_encontrado("Usuario no encontrado"))
}

fn validar_usuario(usuario: &NuevoUsuario) -> Result<()> {
    if usuario.nombre.trim().is_empty() {
        return Err(Error::validacion("El nombre no puede estar vacío"));
    }
    if !usuario.email.contains('@') {
        return Err(Error::validacion("Email inválido"));
    }
    if usuario.password.len() < 6 {
        return Err(Error::validacion(
            "La contraseña debe tener al menos 6 caracteres",
        ));
    }
    if usuario.role != ROL_ADMINISTRADOR && usuario.role != ROL_VENDEDOR {
        return Err(Error::validacion(
            "El rol debe ser administrador o vendedor",
        ));
    }
    Ok(())
}

/// Crea un nuevo usuario. Requiere sesión de administrador.
pub fn crear_usuario(
    db: &Database,
    sesion: &SesionActiva,
    usuario: NuevoUsuario,
) -> Result<UsuarioInfo> {
    verificar_admin(sesion)?;
    validar_usuario(&usuario)?;

    let conn = db.conn()?;

    let existe: i64 = conn.query_row(
        "SELECT COUNT(*) FROM usuarios WHERE email = ?1",
        rusqlite::params![usuario.email],
        |row| row.get(0),
    )?;
    if existe > 0 {
        return Err(Error::validacion("Ya existe un usuario con ese email"));
    }

    let salt = utils::generar_salt();
    let hash = utils::hash_password(&salt, &usuario.password);

    conn.execute(
        "INSERT INTO usuarios (rut, nombre, email, telefono, direccioncalle, direccionnumero,
         cuentabanconombre, cuentabanconumero, cuentabancotipocuenta,
         password_hash, password_salt, role)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        rusqlite::params![
            usuario.rut,
            usuario.nombre.trim(),
            usuario.email,
            usuario.telefono,
            usuario.direccioncalle,
            usuario.direccionnumero,
            usuario.cuentabanconombre,
            usuario.cuentabanconumero,
            usuario.cuentabancotipocuenta,
            hash,
            salt,
            usuario.role,
        ],
    )?;

    let id = conn.last_insert_rowid();
    conn.query_row(
        &format!("SELECT {} FROM usuarios WHERE id = ?1", COLUMNAS_USUARIO),
        rusqlite::params![id],
        usuario_desde_fila,
    )
    .map_err(Error::Db)
}

/// Actualiza un usuario. Un vendedor solo puede actualizarse a sí mismo
/// y no puede cambiar su propio rol.
pub fn actualizar_usuario(
    db: &Database,
    sesion: &SesionActiva,
    id: i64,
    usuario: NuevoUsuario,
) -> Result<UsuarioInfo> {
    if !sesion.es_administrador() {
        if sesion.usuario_id != id {
            return Err(Error::Prohibido(
                "Solo puede modificar su propio usuario".to_string(),
            ));
        }
        if usuario.role != sesion.role {
            return Err(Error::Prohibido("No puede cambiar su rol".to_string()));
        }
    }
    validar_usuario(&usuario)?;

    let salt = utils::generar_salt();
    let hash = utils::hash_password(&salt, &usuario.password);

    let conn = db.conn()?;
    let actualizados = conn.execute(
        "UPDATE usuarios SET rut=?1, nombre=?2, email=?3, telefono=?4, direccioncalle=?5,
         direccionnumero=?6, cuentabanconombre=?7, cuentabanconumero=?8,
         cuentabancotipocuenta=?9, password_hash=?10, password_salt=?11, role=?12
         WHERE id=?13",
        rusqlite::params![
            usuario.rut,
            usuario.nombre.trim(),
            usuario.email,
            usuario.telefono,
            usuario.direccioncalle,
            usuario.direccionnumero,
            usuario.cuentabanconombre,
            usuario.cuentabanconumero,
            usuario.cuentabancotipocuenta,
            hash,
            salt,
            usuario.role,
            id,
        ],
    )?;

    if actualizados == 0 {
        return Err(Error::no_encontrado("Usuario no encontrado"));
    }

    conn.query_row(
        &format!("SELECT {} FROM usuarios WHERE id = ?1", COLUMNAS_USUARIO),
        rusqlite::params![id],
        usuario_desde_fila,
    )
    .map_err(Error::Db)
}

/// Listado paginado de usuarios por rol, con el total para la paginación
pub fn obtener_usuarios_por_rol(
    db: &Database,
    sesion: &SesionActiva,
    role: &str,
    limit: i64,
    offset: i64,
) -> Result<UsuariosPorRol> {
    verificar_admin(sesion)?;
    let conn = db.conn()?;

    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM usuarios WHERE role = ?1 ORDER BY nombre LIMIT ?2 OFFSET ?3",
        COLUMNAS_USUARIO
    ))?;
    let usuarios = stmt
        .query_map(rusqlite::params![role, limit, offset], usuario_desde_fila)?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let total: i64 = conn.query_row(
        "SELECT COUNT(*) FROM usuarios WHERE role = ?1",
        rusqlite::params![role],
        |row| row.get(0),
    )?;

    Ok(UsuariosPorRol { usuarios, total })
}
