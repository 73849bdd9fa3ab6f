pub mod constants;
pub mod game_registry;
pub mod score_keeper;
pub mod snapshot;
pub mod team;

pub use constants::*;
pub use game_registry::GameRegistry;
pub use score_keeper::ScoreKeeper;
pub use snapshot::Snapshot;
pub use team::Team;
