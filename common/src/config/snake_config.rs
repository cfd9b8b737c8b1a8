use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::games::SessionRng;
use crate::games::snake::{Difficulty, FieldSize, GameSession, SnakeBotType};
use super::Validate;

#[derive(Debug, PartialEq, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct SnakeConfig {
    pub difficulty: Difficulty,
    pub field_width: u32,
    pub field_height: u32,
    /// Fixed RNG seed; a random one is drawn when absent.
    pub seed: Option<u64>,
    pub autopilot: SnakeBotType,
    pub max_ticks: Option<u64>,
}

impl SnakeConfig {
    pub fn field_size(&self) -> FieldSize {
        FieldSize::new(self.field_width as usize, self.field_height as usize)
    }

    pub fn create_rng(&self) -> SessionRng {
        match self.seed {
            Some(seed) => SessionRng::new(seed),
            None => SessionRng::from_random(),
        }
    }

    /// Builds a configured, not yet started session.
    pub fn create_session(&self) -> Result<GameSession, String> {
        self.validate()?;
        let mut session = GameSession::new(self.field_size(), self.create_rng());
        session.configure(self.difficulty)?;
        Ok(session)
    }
}

impl Validate for SnakeConfig {
    fn validate(&self) -> Result<(), String> {
        let max = defaults::MAX_FIELD_SIZE;
        if self.field_width == 0 || self.field_width > max {
            return Err(format!(
                "field_width must be between 1 and {}, got {}",
                max, self.field_width
            ));
        }
        if self.field_height == 0 || self.field_height > max {
            return Err(format!(
                "field_height must be between 1 and {}, got {}",
                max, self.field_height
            ));
        }
        if self.max_ticks == Some(0) {
            return Err("max_ticks must be greater than 0 when set".to_string());
        }
        Ok(())
    }
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self {
            difficulty: defaults::DIFFICULTY,
            field_width: defaults::FIELD_WIDTH,
            field_height: defaults::FIELD_HEIGHT,
            seed: None,
            autopilot: defaults::AUTOPILOT,
            max_ticks: None,
        }
    }
}
