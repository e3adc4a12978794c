pub mod client;
pub mod reply;
pub mod router;
pub mod transport;
