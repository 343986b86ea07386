pub mod drawable;
pub mod material;
pub mod transform;

pub use drawable::*;
pub use material::*;
pub use transform::*;
