//! Image-to-video generation: submit a long-running job, poll it with
//! bounded backoff, download the finished artifact.

pub mod backend;
pub mod client;
pub mod error;
pub mod policy;
pub mod types;
pub mod wire;

pub use backend::*;
pub use client::*;
pub use error::*;
pub use policy::*;
pub use types::*;
