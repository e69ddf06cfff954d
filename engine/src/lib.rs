pub mod field;
pub mod logger;
pub mod session;
pub mod session_rng;
pub mod settings;
pub mod turn;
pub mod types;

pub use field::{Field, generate_start_field, get_free_coordinates};
pub use session::GameSession;
pub use session_rng::SessionRng;
pub use settings::GameSettings;
pub use turn::{TurnOutcome, calculate_turn, check_if_game_is_over};
pub use types::{Coordinate, Direction, Merger, Tile, TileId};
