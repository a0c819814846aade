pub mod errors;
pub mod db;
pub mod entity;
pub mod message;

pub use entity::{Entity, EntityId};
pub use message::Message;
