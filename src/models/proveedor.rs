use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Proveedor {
    pub id: Option<i64>,
    /// Código corto del proveedor; los productos se cuelgan de él (skuproveedor)
    pub codigo: String,
    pub rut: Option<String>,
    pub nombre: String,
    pub email: Option<String>,
    pub telefono: Option<String>,
    pub direccioncalle: Option<String>,
    /// Comisión como fracción (0.05 = 5%)
    pub comision: f64,
    pub activo: bool,
}

#[derive(Debug, Deserialize)]
pub struct NuevoProveedor {
    pub codigo: String,
    pub rut: Option<String>,
    pub nombre: String,
    pub email: Option<String>,
    pub telefono: Option<String>,
    pub direccioncalle: Option<String>,
    pub comision: f64,
}
