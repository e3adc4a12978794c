pub mod gateway_factory;
