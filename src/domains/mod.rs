pub mod envelope;
pub mod service;
