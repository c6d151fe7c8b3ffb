//! Batch plumbing around the engine: CSV in, CSV out.

pub mod csv;
