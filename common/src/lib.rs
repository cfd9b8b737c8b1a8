pub mod config;
pub mod games;
pub mod logger;
mod defaults;

pub use config::SnakeConfig;
pub use games::snake::{
    Cell, Difficulty, Direction, EndReason, FieldSize, GameOverEvent, GameSession, GameStatus,
    SessionEvent, TickEvent,
};
