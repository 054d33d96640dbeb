mod aggregate;
mod generate;
mod render;

pub use aggregate::*;
pub use generate::*;
pub use render::*;
