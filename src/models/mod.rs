pub mod cliente;
pub mod envio;
pub mod pedido;
pub mod producto;
pub mod proveedor;
pub mod usuario;

pub use cliente::*;
pub use envio::*;
pub use pedido::*;
pub use producto::*;
pub use proveedor::*;
pub use usuario::*;
