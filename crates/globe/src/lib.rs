pub mod controller;
pub mod events;
pub mod feed;

pub use controller::*;
pub use events::*;
pub use feed::*;
