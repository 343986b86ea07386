pub mod pin;
pub mod store;

pub use pin::*;
pub use store::*;
