// src/cupons/mod.rs

pub mod cupom_router;
pub mod cupom_structs;
