// src/pedidos/mod.rs

pub mod checkout;
pub mod pedido_router;
pub mod pedido_structs;
