use serde::{Deserialize, Serialize};

use crate::games::SessionRng;
use super::game_session::GameSession;
use super::types::{Cell, Direction, GameStatus};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SnakeBotType {
    None,
    Random,
    Efficient,
}

/// Autopilot standing in for the input collaborator in headless runs.
pub struct BotController;

impl BotController {
    pub fn calculate_move(
        bot_type: SnakeBotType,
        session: &GameSession,
        rng: &mut SessionRng,
    ) -> Option<Direction> {
        if session.status() != GameStatus::Running {
            return None;
        }
        match bot_type {
            SnakeBotType::Efficient => Self::efficient_pathfinding(session, rng),
            SnakeBotType::Random => Self::random_valid_move(session, rng),
            SnakeBotType::None => None,
        }
    }

    fn efficient_pathfinding(session: &GameSession, rng: &mut SessionRng) -> Option<Direction> {
        let head = session.snake().head();
        let Some(nearest_food) = Self::find_nearest_food(head, session) else {
            return Self::random_valid_move(session, rng);
        };

        Self::safe_directions(session)
            .into_iter()
            .filter_map(|dir| head.step(dir, session.field_size()).map(|next| (dir, next)))
            .min_by_key(|(_, next)| next.manhattan_distance(nearest_food))
            .map(|(dir, _)| dir)
            .or_else(|| Self::random_valid_move(session, rng))
    }

    fn random_valid_move(session: &GameSession, rng: &mut SessionRng) -> Option<Direction> {
        let safe = Self::safe_directions(session);
        match rng.pick(&safe) {
            Some(&dir) => Some(dir),
            None => Some(session.direction()),
        }
    }

    fn safe_directions(session: &GameSession) -> Vec<Direction> {
        let head = session.snake().head();
        let current = session.direction();
        Direction::ALL
            .into_iter()
            .filter(|dir| !dir.is_opposite(&current))
            .filter(|&dir| match head.step(dir, session.field_size()) {
                Some(next) => !session.snake().collides_on_move(&next),
                None => false,
            })
            .collect()
    }

    fn find_nearest_food(from: Cell, session: &GameSession) -> Option<Cell> {
        // Ties broken by cell order so the choice does not depend on hash order.
        session
            .food()
            .iter()
            .min_by_key(|food| (from.manhattan_distance(**food), **food))
            .copied()
    }
}
