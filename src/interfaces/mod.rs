pub mod adapters;
pub mod reply;
