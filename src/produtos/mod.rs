// src/produtos/mod.rs

pub mod produtos_router;
pub mod produtos_structs;
