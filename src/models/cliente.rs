use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Cliente {
    pub id: Option<i64>,
    pub rut: Option<String>,
    pub nombre: String,
    pub email: Option<String>,
    pub telefono: Option<String>,
    pub direccioncalle: Option<String>,
    pub direccionnumero: Option<String>,
    pub direcciondepto: Option<String>,
    pub direccioncomuna: Option<String>,
    pub direccionregion: Option<String>,
    pub direccionprovincia: Option<String>,
    pub vendedor_id: Option<i64>,
    pub activo: bool,
}

/// Datos de entrada para crear/actualizar un cliente.
/// El vendedor dueño se toma de la sesión, nunca del payload.
#[derive(Debug, Deserialize)]
pub struct NuevoCliente {
    pub rut: Option<String>,
    pub nombre: String,
    pub email: Option<String>,
    pub telefono: Option<String>,
    pub direccioncalle: Option<String>,
    pub direccionnumero: Option<String>,
    pub direcciondepto: Option<String>,
    pub direccioncomuna: Option<String>,
    pub direccionregion: Option<String>,
    pub direccionprovincia: Option<String>,
}
