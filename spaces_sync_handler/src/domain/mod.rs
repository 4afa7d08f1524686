pub mod assignment;
pub mod key;
pub mod models;
pub mod ports;
pub mod service;
