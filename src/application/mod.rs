//! Application layer: the per-wallet serialized mutation engine.
//!
//! `WalletService` is the entry point. Every wallet with pending work owns a lane,
//! an unbounded FIFO channel drained by exactly one `tokio` task, so changes to a
//! wallet are applied one at a time and in arrival order while different wallets
//! never wait on each other.

pub mod lane;
pub mod receipt;
pub mod service;
mod worker;
