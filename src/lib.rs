pub mod config;
pub mod credentials;
pub mod domains;
pub mod error;
pub mod factories;
pub mod interfaces;
pub mod providers;
pub mod services;

pub use crate::config::Config;
pub use crate::domains::envelope::{FailurePoint, ReplyEnvelope, RequestEnvelope};
pub use crate::error::{GatewayError, Result};
pub use crate::factories::gateway_factory::GatewayFactory;
pub use crate::services::router::ServiceRouter;
