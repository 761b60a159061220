// src/clientes/mod.rs

pub mod cliente_router;
pub mod cliente_structs;
