pub mod animate;
pub mod chat;
pub mod quiz;
pub mod speak;
