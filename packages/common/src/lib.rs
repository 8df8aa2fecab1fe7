pub mod catalog;
pub mod conventions;

pub use catalog::*;
pub use conventions::*;
