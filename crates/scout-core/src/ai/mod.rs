//! Model gateway layer
//!
//! Uniform interface to a text-generation backend plus the wire types the
//! rest of the crate shares with it.

pub mod gateway;
pub mod http;
pub mod parser;
pub mod types;

pub use gateway::{GatewayError, ModelGateway};
pub use http::{HttpGateway, HttpGatewayConfig};
pub use parser::parse_tool_markers;
