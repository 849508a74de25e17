use rusqlite::Connection;

pub fn create_tables(conn: &Connection) -> Result<(), rusqlite::Error> {
    conn.execute_batch(
        "
        -- Configuración (secuenciales, etc.)
        CREATE TABLE IF NOT EXISTS config (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        -- Usuarios (administradores y vendedores)
        CREATE TABLE IF NOT EXISTS usuarios (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            rut TEXT,
            nombre TEXT NOT NULL,
            email TEXT UNIQUE NOT NULL,
            telefono TEXT,
            direccioncalle TEXT,
            direccionnumero TEXT,
            cuentabanconombre TEXT,
            cuentabanconumero TEXT,
            cuentabancotipocuenta TEXT,
            password_hash TEXT NOT NULL,
            password_salt TEXT NOT NULL,
            role TEXT NOT NULL DEFAULT 'vendedor',
            activo INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime'))
        );

        CREATE INDEX IF NOT EXISTS idx_usuarios_email ON usuarios(email);
        CREATE INDEX IF NOT EXISTS idx_usuarios_role ON usuarios(role);

        -- Clientes, asignados a un vendedor
        CREATE TABLE IF NOT EXISTS clientes (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            rut TEXT UNIQUE,
            nombre TEXT NOT NULL,
            email TEXT,
            telefono TEXT,
            direccioncalle TEXT,
            direccionnumero TEXT,
            direcciondepto TEXT,
            direccioncomuna TEXT,
            direccionregion TEXT,
            direccionprovincia TEXT,
            vendedor_id INTEGER,
            activo INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime')),
            FOREIGN KEY (vendedor_id) REFERENCES usuarios(id)
        );

        CREATE INDEX IF NOT EXISTS idx_clientes_nombre ON clientes(nombre);
        CREATE INDEX IF NOT EXISTS idx_clientes_vendedor ON clientes(vendedor_id);

        -- Proveedores
        CREATE TABLE IF NOT EXISTS proveedores (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            codigo TEXT UNIQUE NOT NULL,
            rut TEXT,
            nombre TEXT NOT NULL,
            email TEXT,
            telefono TEXT,
            direccioncalle TEXT,
            comision REAL NOT NULL DEFAULT 0,
            activo INTEGER NOT NULL DEFAULT 1,
            created_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime'))
        );

        CREATE INDEX IF NOT EXISTS idx_proveedores_codigo ON proveedores(codigo);

        -- Productos (catálogo por proveedor vía skuproveedor)
        CREATE TABLE IF NOT EXISTS productos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            sku TEXT UNIQUE NOT NULL,
            skuproveedor TEXT NOT NULL,
            nombre TEXT NOT NULL,
            descripcion TEXT,
            formato TEXT,
            precio REAL NOT NULL DEFAULT 0,
            existencia REAL NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now', 'localtime'))
        );

        CREATE INDEX IF NOT EXISTS idx_productos_sku ON productos(sku);
        CREATE INDEX IF NOT EXISTS idx_productos_skuproveedor ON productos(skuproveedor);
        CREATE INDEX IF NOT EXISTS idx_productos_nombre ON productos(nombre);

        -- Rangos de costo de envío; el orden de inserción define la
        -- precedencia cuando hay solapes
        CREATE TABLE IF NOT EXISTS costos_envio (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            min_total REAL NOT NULL,
            max_total REAL NOT NULL,
            costo REAL NOT NULL
        );

        -- Pedidos (cabecera)
        CREATE TABLE IF NOT EXISTS pedidos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            numeropedido TEXT UNIQUE NOT NULL,
            cliente_id INTEGER NOT NULL,
            vendedor_id INTEGER NOT NULL,
            proveedor_id INTEGER,
            subtotal REAL NOT NULL DEFAULT 0,
            envio REAL NOT NULL DEFAULT 0,
            total REAL NOT NULL DEFAULT 0,
            estado TEXT NOT NULL DEFAULT 'Pendiente',
            comision_pagada INTEGER NOT NULL DEFAULT 0,
            notas TEXT,
            creado TEXT NOT NULL DEFAULT (datetime('now', 'localtime')),
            FOREIGN KEY (cliente_id) REFERENCES clientes(id),
            FOREIGN KEY (vendedor_id) REFERENCES usuarios(id),
            FOREIGN KEY (proveedor_id) REFERENCES proveedores(id)
        );

        CREATE INDEX IF NOT EXISTS idx_pedidos_numero ON pedidos(numeropedido);
        CREATE INDEX IF NOT EXISTS idx_pedidos_vendedor ON pedidos(vendedor_id);
        CREATE INDEX IF NOT EXISTS idx_pedidos_estado ON pedidos(estado);
        CREATE INDEX IF NOT EXISTS idx_pedidos_creado ON pedidos(creado);

        -- Líneas de pedido
        CREATE TABLE IF NOT EXISTS pedido_detalles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            pedido_id INTEGER NOT NULL,
            producto_id INTEGER NOT NULL,
            cantidad INTEGER NOT NULL,
            precio REAL NOT NULL,
            subtotal REAL NOT NULL,
            FOREIGN KEY (pedido_id) REFERENCES pedidos(id) ON DELETE CASCADE,
            FOREIGN KEY (producto_id) REFERENCES productos(id)
        );

        CREATE INDEX IF NOT EXISTS idx_pedido_detalles_pedido ON pedido_detalles(pedido_id);
        ",
    )
}
