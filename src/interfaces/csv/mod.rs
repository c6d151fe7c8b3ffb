pub mod balance_writer;
pub mod request_reader;
pub mod seed_reader;
