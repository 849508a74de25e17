pub mod clientes;
pub mod comisiones;
pub mod envios;
pub mod exportar;
pub mod pedidos;
pub mod productos;
pub mod proveedores;
pub mod reportes;
pub mod usuarios;
