// src/enderecos/mod.rs

pub mod endereco_router;
pub mod endereco_structs;
