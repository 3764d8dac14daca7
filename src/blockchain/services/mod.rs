// src/blockchain/services/mod.rs

pub mod address;
pub mod blocks;
pub mod scanner;
pub mod transactions;
