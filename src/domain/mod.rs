//! Domain types shared by every layer: wallets, balances, change requests and the
//! storage port the engine writes through.

pub mod ports;
pub mod request;
pub mod wallet;
