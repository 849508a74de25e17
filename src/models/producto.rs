use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Producto {
    pub id: Option<i64>,
    pub sku: String,
    /// Código del proveedor al que pertenece el producto
    pub skuproveedor: String,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub formato: Option<String>,
    pub precio: f64,
    pub existencia: f64,
}

/// Resultado de una importación masiva de productos (upsert por sku)
#[derive(Debug, Serialize, Default)]
pub struct ResultadoImportacion {
    pub exitosos: Vec<Producto>,
    pub errores: Vec<String>,
}
