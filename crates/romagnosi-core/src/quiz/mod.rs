pub mod bank;
pub mod category;
pub mod engine;

pub use bank::*;
pub use category::*;
pub use engine::*;
