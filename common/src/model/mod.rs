pub mod compliance;
pub mod connection;
pub mod reading;
