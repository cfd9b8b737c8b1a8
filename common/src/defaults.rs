use crate::games::snake::{Difficulty, SnakeBotType};

pub const FIELD_WIDTH: u32 = 20;
pub const FIELD_HEIGHT: u32 = 20;
pub const MAX_FIELD_SIZE: u32 = 200;
pub const DIFFICULTY: Difficulty = Difficulty::Medium;
pub const AUTOPILOT: SnakeBotType = SnakeBotType::Efficient;
