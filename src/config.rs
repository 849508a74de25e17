use std::path::PathBuf;

use crate::error::{Error, Result};

/// Configuración tomada del entorno, con defaults para desarrollo
#[derive(Debug, Clone)]
pub struct Config {
    pub puerto: u16,
    pub ruta_db: PathBuf,
    pub admin_email: String,
    pub admin_password: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        let puerto = match std::env::var("SIXBRIDGE_PUERTO") {
            Ok(v) => v
                .parse()
                .map_err(|_| Error::Interno(format!("SIXBRIDGE_PUERTO inválido: {}", v)))?,
            Err(_) => 4000,
        };

        let ruta_db = std::env::var("SIXBRIDGE_DB")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("six-bridge.db"));

        let admin_email = std::env::var("SIXBRIDGE_ADMIN_EMAIL")
            .unwrap_or_else(|_| "admin@sixbridge.cl".to_string());
        let admin_password =
            std::env::var("SIXBRIDGE_ADMIN_PASSWORD").unwrap_or_else(|_| "admin".to_string());

        Ok(Config {
            puerto,
            ruta_db,
            admin_email,
            admin_password,
        })
    }
}
