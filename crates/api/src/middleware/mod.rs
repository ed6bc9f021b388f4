pub mod admin;
pub mod cors;
pub mod request_tracing;
