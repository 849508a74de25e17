use serde::{Deserialize, Serialize};

/// Rango de costo de envío: si `min_total <= subtotal <= max_total`,
/// el envío cuesta `costo`. Los rangos se evalúan en orden de inserción.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CostoEnvio {
    pub id: Option<i64>,
    pub min_total: f64,
    pub max_total: f64,
    pub costo: f64,
}

#[derive(Debug, Deserialize)]
pub struct NuevoCostoEnvio {
    pub min_total: f64,
    pub max_total: f64,
    pub costo: f64,
}
