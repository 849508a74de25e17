pub mod schema;

use std::collections::HashMap;
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::Connection;

use crate::error::{Error, Result};
use crate::models::SesionActiva;
use crate::utils;

pub struct Database {
    pub conn: Mutex<Connection>,
}

impl Database {
    pub fn new(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).ok();
        }

        let conn = Connection::open(db_path).map_err(Error::Db)?;

        // Optimizaciones SQLite
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )
        .map_err(Error::Db)?;

        let db = Database {
            conn: Mutex::new(conn),
        };

        db.run_migrations()?;

        Ok(db)
    }

    /// Base en memoria para tests
    pub fn en_memoria() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(Error::Db)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;").map_err(Error::Db)?;
        let db = Database {
            conn: Mutex::new(conn),
        };
        db.run_migrations()?;
        Ok(db)
    }

    pub fn conn(&self) -> Result<MutexGuard<'_, Connection>> {
        Ok(self.conn.lock()?)
    }

    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn.lock()?;
        schema::create_tables(&conn)?;

        // Migraciones incrementales (safe: .ok() ignora si columna ya existe)
        conn.execute("ALTER TABLE pedidos ADD COLUMN notas TEXT", []).ok();
        conn.execute(
            "ALTER TABLE pedidos ADD COLUMN comision_pagada INTEGER NOT NULL DEFAULT 0",
            [],
        )
        .ok();
        conn.execute("ALTER TABLE productos ADD COLUMN formato TEXT", []).ok();

        // Secuencial de pedidos
        conn.execute(
            "INSERT OR IGNORE INTO config (key, value) VALUES ('secuencial_pedido', '1')",
            [],
        )?;

        Ok(())
    }

    /// Crea el usuario administrador inicial si la tabla está vacía
    pub fn asegurar_admin(&self, email: &str, password: &str) -> Result<()> {
        let conn = self.conn.lock()?;
        let existe: i64 = conn.query_row("SELECT COUNT(*) FROM usuarios", [], |row| row.get(0))?;
        if existe > 0 {
            return Ok(());
        }

        let salt = utils::generar_salt();
        let hash = utils::hash_password(&salt, password);
        conn.execute(
            "INSERT INTO usuarios (nombre, email, password_hash, password_salt, role)
             VALUES ('Administrador', ?1, ?2, ?3, 'administrador')",
            rusqlite::params![email, hash, salt],
        )?;
        tracing::info!(email, "usuario administrador inicial creado");
        Ok(())
    }
}

/// Sesiones activas en RAM, indexadas por token opaco
pub struct SesionState {
    pub sesiones: Mutex<HashMap<String, SesionActiva>>,
}

impl Default for SesionState {
    fn default() -> Self {
        SesionState {
            sesiones: Mutex::new(HashMap::new()),
        }
    }
}

impl SesionState {
    /// Registra la sesión y retorna su token
    pub fn abrir(&self, sesion: SesionActiva) -> Result<String> {
        let token = utils::generar_token();
        self.sesiones.lock()?.insert(token.clone(), sesion);
        Ok(token)
    }

    pub fn obtener(&self, token: &str) -> Result<Option<SesionActiva>> {
        Ok(self.sesiones.lock()?.get(token).cloned())
    }

    pub fn cerrar(&self, token: &str) -> Result<()> {
        self.sesiones.lock()?.remove(token);
        Ok(())
    }
}
