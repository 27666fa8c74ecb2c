pub mod accounts;
pub mod admin;
pub mod network;
pub mod password;
pub mod store;
pub mod tier;

pub use crate::domain::model::{Contact, Node, NodeId, NodeView, Product, Tier, User};
pub use crate::domain::ports::{ConfigProvider, NodeLookup, Storage};
pub use crate::utils::error::Result;
