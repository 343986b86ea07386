pub mod camera;
pub mod director;
pub mod renderer;

pub use camera::*;
pub use director::*;
pub use renderer::*;
