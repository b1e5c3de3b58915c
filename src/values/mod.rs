pub mod message;
pub mod value;

pub use message::{Message, MessageType, Record};
pub use value::{BitString, Value};
