use pretty_assertions::assert_eq;

use six_bridge::commands::{clientes, envios, pedidos, productos, proveedores, usuarios};
use six_bridge::error::Error;
use six_bridge::models::{
    ActualizarPedido, EstadoPedido, NuevoCliente, NuevoCostoEnvio, NuevoDetalle, NuevoPedido,
    NuevoProveedor, NuevoUsuario, Producto, SesionActiva, ROL_ADMINISTRADOR, ROL_VENDEDOR,
};
use six_bridge::Database;

fn sesion_admin() -> SesionActiva {
    SesionActiva {
        usuario_id: 1,
        nombre: "Administrador".to_string(),
        role: ROL_ADMINISTRADOR.to_string(),
    }
}

fn preparar_db() -> (Database, SesionActiva) {
    let db = Database::en_memoria().expect("db en memoria");
    db.asegurar_admin("admin@test.cl", "secreto").expect("admin inicial");
    (db, sesion_admin())
}

fn crear_vendedor(db: &Database, admin: &SesionActiva, email: &str) -> SesionActiva {
    let usuario = usuarios::crear_usuario(
        db,
        admin,
        NuevoUsuario {
            rut: None,
            nombre: format!("Vendedor {}", email),
            email: email.to_string(),
            telefono: None,
            direccioncalle: None,
            direccionnumero: None,
            cuentabanconombre: None,
            cuentabanconumero: None,
            cuentabancotipocuenta: None,
            password: "vendedor123".to_string(),
            role: ROL_VENDEDOR.to_string(),
        },
    )
    .expect("crear vendedor");

    SesionActiva {
        usuario_id: usuario.id,
        nombre: usuario.nombre,
        role: usuario.role,
    }
}

fn crear_cliente_de(db: &Database, sesion: &SesionActiva, nombre: &str) -> i64 {
    clientes::crear_cliente(
        db,
        sesion,
        NuevoCliente {
            rut: None,
            nombre: nombre.to_string(),
            email: None,
            telefono: None,
            direccioncalle: None,
            direccionnumero: None,
            direcciondepto: None,
            direccioncomuna: None,
            direccionregion: None,
            direccionprovincia: None,
        },
    )
    .expect("crear cliente")
    .id
    .expect("id cliente")
}

fn crear_producto_con_precio(db: &Database, admin: &SesionActiva, sku: &str, precio: f64) -> i64 {
    productos::crear_producto(
        db,
        admin,
        Producto {
            id: None,
            sku: sku.to_string(),
            skuproveedor: "PROV1".to_string(),
            nombre: format!("Producto {}", sku),
            descripcion: None,
            formato: None,
            precio,
            existencia: 100.0,
        },
    )
    .expect("crear producto")
    .id
    .expect("id producto")
}

fn rangos_de_ejemplo(db: &Database, admin: &SesionActiva) {
    envios::nuevo_costo_envio(
        db,
        admin,
        NuevoCostoEnvio {
            min_total: 0.0,
            max_total: 20000.0,
            costo: 3000.0,
        },
    )
    .unwrap();
    envios::nuevo_costo_envio(
        db,
        admin,
        NuevoCostoEnvio {
            min_total: 20001.0,
            max_total: 50000.0,
            costo: 5000.0,
        },
    )
    .unwrap();
}

#[test]
fn crear_pedido_calcula_totales_y_correlativo() {
    let (db, admin) = preparar_db();
    rangos_de_ejemplo(&db, &admin);
    let cliente_id = crear_cliente_de(&db, &admin, "Almacén Central");
    let producto_id = crear_producto_con_precio(&db, &admin, "SKU-1", 10000.0);

    let completo = pedidos::crear_pedido(
        &db,
        &admin,
        NuevoPedido {
            cliente_id,
            proveedor_id: None,
            items: vec![NuevoDetalle {
                producto_id,
                cantidad: 2,
                precio: None,
            }],
            notas: None,
        },
    )
    .expect("crear pedido");

    // subtotal 20000 cae en el borde superior del primer rango
    assert_eq!(completo.pedido.numeropedido, "PED-000001");
    assert_eq!(completo.pedido.subtotal, 20000.0);
    assert_eq!(completo.pedido.envio, 3000.0);
    assert_eq!(completo.pedido.total, 23000.0);
    assert_eq!(completo.pedido.estado, EstadoPedido::Pendiente);
    assert!(!completo.pedido.comision_pagada);
    assert_eq!(completo.detalles.len(), 1);
    assert_eq!(completo.detalles[0].precio, 10000.0);

    // el correlativo avanza
    let segundo = pedidos::crear_pedido(
        &db,
        &admin,
        NuevoPedido {
            cliente_id,
            proveedor_id: None,
            items: vec![NuevoDetalle {
                producto_id,
                cantidad: 1,
                precio: None,
            }],
            notas: None,
        },
    )
    .unwrap();
    assert_eq!(segundo.pedido.numeropedido, "PED-000002");
}

#[test]
fn pedido_sin_rangos_tiene_envio_cero() {
    let (db, admin) = preparar_db();
    let cliente_id = crear_cliente_de(&db, &admin, "Cliente Uno");
    let producto_id = crear_producto_con_precio(&db, &admin, "SKU-1", 500.0);

    let completo = pedidos::crear_pedido(
        &db,
        &admin,
        NuevoPedido {
            cliente_id,
            proveedor_id: None,
            items: vec![NuevoDetalle {
                producto_id,
                cantidad: 3,
                precio: None,
            }],
            notas: None,
        },
    )
    .unwrap();

    assert_eq!(completo.pedido.envio, 0.0);
    assert_eq!(completo.pedido.total, completo.pedido.subtotal);
}

#[test]
fn precio_explicito_reemplaza_al_del_producto() {
    let (db, admin) = preparar_db();
    let cliente_id = crear_cliente_de(&db, &admin, "Cliente Uno");
    let producto_id = crear_producto_con_precio(&db, &admin, "SKU-1", 999.0);

    let completo = pedidos::crear_pedido(
        &db,
        &admin,
        NuevoPedido {
            cliente_id,
            proveedor_id: None,
            items: vec![NuevoDetalle {
                producto_id,
                cantidad: 4,
                precio: Some(100.0),
            }],
            notas: None,
        },
    )
    .unwrap();

    assert_eq!(completo.pedido.subtotal, 400.0);
}

#[test]
fn validaciones_de_lineas() {
    let (db, admin) = preparar_db();
    let cliente_id = crear_cliente_de(&db, &admin, "Cliente Uno");
    let producto_id = crear_producto_con_precio(&db, &admin, "SKU-1", 100.0);

    // sin items
    let err = pedidos::crear_pedido(
        &db,
        &admin,
        NuevoPedido {
            cliente_id,
            proveedor_id: None,
            items: vec![],
            notas: None,
        },
    )
    .unwrap_err();
    assert!(matches!(err, Error::Validacion(_)));

    // cantidad cero
    let err = pedidos::crear_pedido(
        &db,
        &admin,
        NuevoPedido {
            cliente_id,
            proveedor_id: None,
            items: vec![NuevoDetalle {
                producto_id,
                cantidad: 0,
                precio: None,
            }],
            notas: None,
        },
    )
    .unwrap_err();
    assert!(matches!(err, Error::Validacion(_)));

    // precio negativo
    let err = pedidos::crear_pedido(
        &db,
        &admin,
        NuevoPedido {
            cliente_id,
            proveedor_id: None,
            items: vec![NuevoDetalle {
                producto_id,
                cantidad: 1,
                precio: Some(-1.0),
            }],
            notas: None,
        },
    )
    .unwrap_err();
    assert!(matches!(err, Error::Validacion(_)));

    // producto inexistente
    let err = pedidos::crear_pedido(
        &db,
        &admin,
        NuevoPedido {
            cliente_id,
            proveedor_id: None,
            items: vec![NuevoDetalle {
                producto_id: 9999,
                cantidad: 1,
                precio: None,
            }],
            notas: None,
        },
    )
    .unwrap_err();
    assert!(matches!(err, Error::NoEncontrado(_)));
}

#[test]
fn actualizar_items_recalcula_totales() {
    let (db, admin) = preparar_db();
    rangos_de_ejemplo(&db, &admin);
    let cliente_id = crear_cliente_de(&db, &admin, "Cliente Uno");
    let producto_id = crear_producto_con_precio(&db, &admin, "SKU-1", 10000.0);

    let completo = pedidos::crear_pedido(
        &db,
        &admin,
        NuevoPedido {
            cliente_id,
            proveedor_id: None,
            items: vec![NuevoDetalle {
                producto_id,
                cantidad: 2,
                precio: None,
            }],
            notas: None,
        },
    )
    .unwrap();
    let pedido_id = completo.pedido.id.unwrap();
    assert_eq!(completo.pedido.total, 23000.0);

    // tres unidades: subtotal 30000 salta al segundo rango
    let actualizado = pedidos::actualizar_pedido(
        &db,
        &admin,
        pedido_id,
        ActualizarPedido {
            items: Some(vec![NuevoDetalle {
                producto_id,
                cantidad: 3,
                precio: None,
            }]),
            estado: None,
            notas: None,
            proveedor_id: None,
        },
    )
    .unwrap();

    assert_eq!(actualizado.pedido.subtotal, 30000.0);
    assert_eq!(actualizado.pedido.envio, 5000.0);
    assert_eq!(actualizado.pedido.total, 35000.0);
}

#[test]
fn cambiar_estado_no_tiene_grafo_de_transiciones() {
    let (db, admin) = preparar_db();
    let cliente_id = crear_cliente_de(&db, &admin, "Cliente Uno");
    let producto_id = crear_producto_con_precio(&db, &admin, "SKU-1", 100.0);

    let completo = pedidos::crear_pedido(
        &db,
        &admin,
        NuevoPedido {
            cliente_id,
            proveedor_id: None,
            items: vec![NuevoDetalle {
                producto_id,
                cantidad: 1,
                precio: None,
            }],
            notas: None,
        },
    )
    .unwrap();
    let pedido_id = completo.pedido.id.unwrap();

    for estado in [
        EstadoPedido::Entregado,
        EstadoPedido::Observado,
        EstadoPedido::Aprobado,
        EstadoPedido::Pendiente,
    ] {
        let actualizado = pedidos::actualizar_pedido(
            &db,
            &admin,
            pedido_id,
            ActualizarPedido {
                items: None,
                estado: Some(estado),
                notas: None,
                proveedor_id: None,
            },
        )
        .unwrap();
        assert_eq!(actualizado.pedido.estado, estado);
    }
}

#[test]
fn vendedor_solo_ve_sus_pedidos() {
    let (db, admin) = preparar_db();
    let vendedor_a = crear_vendedor(&db, &admin, "a@test.cl");
    let vendedor_b = crear_vendedor(&db, &admin, "b@test.cl");
    let producto_id = crear_producto_con_precio(&db, &admin, "SKU-1", 100.0);

    let cliente_a = crear_cliente_de(&db, &vendedor_a, "Cliente de A");
    let pedido_a = pedidos::crear_pedido(
        &db,
        &vendedor_a,
        NuevoPedido {
            cliente_id: cliente_a,
            proveedor_id: None,
            items: vec![NuevoDetalle {
                producto_id,
                cantidad: 1,
                precio: None,
            }],
            notas: None,
        },
    )
    .unwrap();
    let pedido_a_id = pedido_a.pedido.id.unwrap();

    // B no ve ni puede tocar el pedido de A
    assert!(pedidos::listar_pedidos(&db, &vendedor_b, 50, 0).unwrap().is_empty());
    assert!(matches!(
        pedidos::obtener_pedido(&db, &vendedor_b, pedido_a_id).unwrap_err(),
        Error::Prohibido(_)
    ));

    // B tampoco puede crear pedidos con clientes de A
    assert!(matches!(
        pedidos::crear_pedido(
            &db,
            &vendedor_b,
            NuevoPedido {
                cliente_id: cliente_a,
                proveedor_id: None,
                items: vec![NuevoDetalle {
                    producto_id,
                    cantidad: 1,
                    precio: None,
                }],
                notas: None,
            },
        )
        .unwrap_err(),
        Error::Prohibido(_)
    ));

    // el administrador ve todo
    assert_eq!(pedidos::listar_pedidos(&db, &admin, 50, 0).unwrap().len(), 1);

    // solo el administrador elimina
    assert!(matches!(
        pedidos::eliminar_pedido(&db, &vendedor_a, pedido_a_id).unwrap_err(),
        Error::Prohibido(_)
    ));
    pedidos::eliminar_pedido(&db, &admin, pedido_a_id).unwrap();
    assert!(pedidos::listar_pedidos(&db, &admin, 50, 0).unwrap().is_empty());
}

#[test]
fn pedido_con_proveedor_inactivo_se_rechaza() {
    let (db, admin) = preparar_db();
    let cliente_id = crear_cliente_de(&db, &admin, "Cliente Uno");
    let producto_id = crear_producto_con_precio(&db, &admin, "SKU-1", 100.0);

    let proveedor = proveedores::crear_proveedor(
        &db,
        &admin,
        NuevoProveedor {
            codigo: "PROV1".to_string(),
            rut: None,
            nombre: "Proveedor Uno".to_string(),
            email: None,
            telefono: None,
            direccioncalle: None,
            comision: 0.05,
        },
    )
    .unwrap();
    let proveedor_id = proveedor.id.unwrap();

    // desactivar
    let inactivo = proveedores::cambiar_estado_proveedor(&db, &admin, proveedor_id).unwrap();
    assert!(!inactivo.activo);

    let err = pedidos::crear_pedido(
        &db,
        &admin,
        NuevoPedido {
            cliente_id,
            proveedor_id: Some(proveedor_id),
            items: vec![NuevoDetalle {
                producto_id,
                cantidad: 1,
                precio: None,
            }],
            notas: None,
        },
    )
    .unwrap_err();
    assert!(matches!(err, Error::Validacion(_)));
}

#[test]
fn base_en_archivo_corre_migraciones() {
    let dir = tempfile::tempdir().unwrap();
    let ruta = dir.path().join("six-bridge-test.db");
    let db = Database::new(&ruta).unwrap();
    db.asegurar_admin("admin@test.cl", "secreto").unwrap();

    // reabrir sobre el mismo archivo no debe fallar ni duplicar el admin
    drop(db);
    let db = Database::new(&ruta).unwrap();
    db.asegurar_admin("admin@test.cl", "secreto").unwrap();

    let admin = sesion_admin();
    let listado = usuarios::obtener_usuarios_por_rol(&db, &admin, ROL_ADMINISTRADOR, 10, 0).unwrap();
    assert_eq!(listado.total, 1);
}
