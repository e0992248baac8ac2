//! Swap an input token on a Uniswap V3 style exchange and supply the proceeds
//! to an Aave V3 style lending pool.

pub mod approval;
pub mod chain;
pub mod config;
pub mod errors;
pub mod lending;
pub mod models;
pub mod pool;
pub mod swap;
pub mod utils;
pub mod workflow;
