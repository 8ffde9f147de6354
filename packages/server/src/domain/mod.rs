//! Domain layer: value objects and errors shared by every other layer.

pub mod error;
pub mod value_object;

pub use error::{HubError, RoomError, ValueObjectError};
pub use value_object::{ClientId, RoomName};
