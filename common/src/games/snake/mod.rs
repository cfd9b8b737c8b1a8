mod bot_controller;
mod difficulty;
mod entity;
mod events;
mod game_session;
mod session;
mod types;

pub use bot_controller::{BotController, SnakeBotType};
pub use difficulty::{Difficulty, DifficultyParams};
pub use entity::Snake;
pub use events::{EndReason, GameOverEvent, SessionEvent, TickEvent};
pub use game_session::GameSession;
pub use session::{SessionHandle, SnakeSession};
pub use types::{Cell, Direction, FieldSize, GameStatus};
