pub mod requests;
pub mod responses;

pub use requests::{CreateGameRequest, ShotRequest};
pub use responses::{GameResponse, StreamMessage};
