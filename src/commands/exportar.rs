use crate::commands::productos::upsert_producto;
use crate::commands::usuarios::verificar_admin;
use crate::db::Database;
use crate::error::Result;
use crate::models::{Producto, ResultadoImportacion, SesionActiva};

/// BOM UTF-8 para que Excel abra correctamente caracteres especiales
const BOM: &str = "\u{feff}";
/// Separador de columnas (punto y coma para Excel en español)
const SEP: &str = ";";

fn escapar_csv(valor: &str) -> String {
    if valor.contains(';') || valor.contains('"') || valor.contains('\n') {
        format!("\"{}\"", valor.replace('"', "\"\""))
    } else {
        valor.to_string()
    }
}

/// Parte una línea CSV en campos, respetando comillas y comillas dobladas
fn parsear_linea_csv(linea: &str) -> Vec<String> {
    let mut campos = Vec::new();
    let mut actual = String::new();
    let mut entre_comillas = false;
    let mut chars = linea.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if entre_comillas => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    actual.push('"');
                } else {
                    entre_comillas = false;
                }
            }
            '"' => entre_comillas = true,
            ';' if !entre_comillas => {
                campos.push(actual.trim().to_string());
                actual = String::new();
            }
            _ => actual.push(c),
        }
    }
    campos.push(actual.trim().to_string());
    campos
}

/// Exporta todos los pedidos a CSV (solo administrador).
/// Retorna el contenido listo para descargar.
pub fn exportar_pedidos_csv(db: &Database, sesion: &SesionActiva) -> Result<String> {
    verificar_admin(sesion)?;

    let conn = db.conn()?;
    let mut stmt = conn.prepare(
        "SELECT p.numeropedido, p.creado, c.nombre, u.nombre, pr.nombre,
         p.estado, p.subtotal, p.envio, p.total, p.comision_pagada
         FROM pedidos p
         LEFT JOIN clientes c ON c.id = p.cliente_id
         LEFT JOIN usuarios u ON u.id = p.vendedor_id
         LEFT JOIN proveedores pr ON pr.id = p.proveedor_id
         ORDER BY p.creado DESC",
    )?;

    let filas: Vec<Vec<String>> = stmt
        .query_map([], |row| {
            Ok(vec![
                row.get::<_, String>(0).unwrap_or_default(),
                row.get::<_, String>(1).unwrap_or_default(),
                row.get::<_, String>(2).unwrap_or_default(),
                row.get::<_, String>(3).unwrap_or_default(),
                row.get::<_, String>(4).unwrap_or_default(),
                row.get::<_, String>(5).unwrap_or_default(),
                format!("{:.2}", row.get::<_, f64>(6).unwrap_or(0.0)),
                format!("{:.2}", row.get::<_, f64>(7).unwrap_or(0.0)),
                format!("{:.2}", row.get::<_, f64>(8).unwrap_or(0.0)),
                if row.get::<_, i64>(9).unwrap_or(0) != 0 {
                    "SI".to_string()
                } else {
                    "NO".to_string()
                },
            ])
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    let headers = [
        "Numero", "Fecha", "Cliente", "Vendedor", "Proveedor", "Estado", "Subtotal", "Envio",
        "Total", "Comision Pagada",
    ];

    let mut salida = String::from(BOM);
    salida.push_str(&headers.join(SEP));
    salida.push('\n');
    for fila in &filas {
        let linea: Vec<String> = fila.iter().map(|v| escapar_csv(v)).collect();
        salida.push_str(&linea.join(SEP));
        salida.push('\n');
    }

    Ok(salida)
}

/// Importa productos desde un CSV con columnas
/// sku;skuproveedor;nombre;descripcion;formato;precio;existencia.
/// Las filas con error se reportan y no detienen el resto.
pub fn importar_productos_csv(
    db: &Database,
    sesion: &SesionActiva,
    contenido: &str,
) -> Result<ResultadoImportacion> {
    verificar_admin(sesion)?;

    let conn = db.conn()?;
    let mut resultado = ResultadoImportacion::default();

    let contenido = contenido.trim_start_matches('\u{feff}');
    for (num, linea) in contenido.lines().enumerate() {
        let linea = linea.trim_end_matches('\r');
        if linea.trim().is_empty() {
            continue;
        }
        // Cabecera opcional
        if num == 0 && linea.to_lowercase().starts_with("sku") {
            continue;
        }

        let campos = parsear_linea_csv(linea);
        if campos.len() < 7 {
            resultado
                .errores
                .push(format!("Línea {}: se esperaban 7 columnas", num + 1));
            continue;
        }

        let precio: f64 = match campos[5].parse() {
            Ok(v) => v,
            Err(_) => {
                resultado
                    .errores
                    .push(format!("Línea {}: precio inválido '{}'", num + 1, campos[5]));
                continue;
            }
        };
        let existencia: f64 = match campos[6].parse() {
            Ok(v) => v,
            Err(_) => {
                resultado.errores.push(format!(
                    "Línea {}: existencia inválida '{}'",
                    num + 1,
                    campos[6]
                ));
                continue;
            }
        };

        let producto = Producto {
            id: None,
            sku: campos[0].clone(),
            skuproveedor: campos[1].clone(),
            nombre: campos[2].clone(),
            descripcion: if campos[3].is_empty() {
                None
            } else {
                Some(campos[3].clone())
            },
            formato: if campos[4].is_empty() {
                None
            } else {
                Some(campos[4].clone())
            },
            precio,
            existencia,
        };

        match upsert_producto(&conn, &producto) {
            Ok(guardado) => resultado.exitosos.push(guardado),
            Err(e) => resultado
                .errores
                .push(format!("Línea {}: {}", num + 1, e)),
        }
    }

    tracing::info!(
        exitosos = resultado.exitosos.len(),
        errores = resultado.errores.len(),
        "importación de productos terminada"
    );
    Ok(resultado)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapar_solo_cuando_hace_falta() {
        assert_eq!(escapar_csv("simple"), "simple");
        assert_eq!(escapar_csv("a;b"), "\"a;b\"");
        assert_eq!(escapar_csv("di\"jo"), "\"di\"\"jo\"");
    }

    #[test]
    fn parsear_respeta_comillas() {
        assert_eq!(parsear_linea_csv("a;b;c"), vec!["a", "b", "c"]);
        assert_eq!(parsear_linea_csv("\"a;b\";c"), vec!["a;b", "c"]);
        assert_eq!(parsear_linea_csv("\"di\"\"jo\";x"), vec!["di\"jo", "x"]);
    }

    #[test]
    fn parsear_e_escapar_son_inversos() {
        let original = vec!["PA-01", "texto; con separador", "di\"jo"];
        let linea = original
            .iter()
            .map(|v| escapar_csv(v))
            .collect::<Vec<_>>()
            .join(SEP);
        assert_eq!(parsear_linea_csv(&linea), original);
    }
}
