//! Data models for the chat widget

mod message;
mod site;
mod topic;

pub use message::*;
pub use site::*;
pub use topic::*;
