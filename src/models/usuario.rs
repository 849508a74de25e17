use serde::{Deserialize, Serialize};

pub const ROL_ADMINISTRADOR: &str = "administrador";
pub const ROL_VENDEDOR: &str = "vendedor";

/// Info de usuario para enviar al frontend (sin hash/salt)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UsuarioInfo {
    pub id: i64,
    pub rut: Option<String>,
    pub nombre: String,
    pub email: String,
    pub telefono: Option<String>,
    pub direccioncalle: Option<String>,
    pub direccionnumero: Option<String>,
    pub cuentabanconombre: Option<String>,
    pub cuentabanconumero: Option<String>,
    pub cuentabancotipocuenta: Option<String>,
    pub role: String,
    pub activo: bool,
}

/// Sesión activa (almacenada en RAM, indexada por token)
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct SesionActiva {
    pub usuario_id: i64,
    pub nombre: String,
    pub role: String,
}

impl SesionActiva {
    pub fn es_administrador(&self) -> bool {
        self.role == ROL_ADMINISTRADOR
    }
}

/// Datos para crear o actualizar un usuario
#[derive(Debug, Serialize, Deserialize)]
pub struct NuevoUsuario {
    pub rut: Option<String>,
    pub nombre: String,
    pub email: String,
    pub telefono: Option<String>,
    pub direccioncalle: Option<String>,
    pub direccionnumero: Option<String>,
    pub cuentabanconombre: Option<String>,
    pub cuentabanconumero: Option<String>,
    pub cuentabancotipocuenta: Option<String>,
    pub password: String,
    pub role: String,
}

/// Credenciales de login
#[derive(Debug, Deserialize)]
pub struct Credenciales {
    pub email: String,
    pub password: String,
}

/// Respuesta de login: token opaco + datos del usuario
#[derive(Debug, Serialize)]
pub struct TokenSesion {
    pub token: String,
    pub usuario: UsuarioInfo,
}

/// Listado paginado de usuarios por rol
#[derive(Debug, Serialize)]
pub struct UsuariosPorRol {
    pub usuarios: Vec<UsuarioInfo>,
    pub total: i64,
}
