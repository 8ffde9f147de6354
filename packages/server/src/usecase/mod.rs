//! UseCase layer: routing decoded frames to the Hub and Rooms.

pub mod directory;
pub mod dispatch;
pub mod error;

pub use directory::RoomDirectory;
pub use dispatch::{DispatchOutcome, Dispatcher};
pub use error::DispatchError;
