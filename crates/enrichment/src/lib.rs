pub mod client;
pub mod error;
pub mod http;
pub mod service;

pub use client::*;
pub use error::*;
pub use service::*;
