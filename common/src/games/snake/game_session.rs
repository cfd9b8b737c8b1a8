use std::collections::HashSet;
use std::time::Duration;

use crate::games::SessionRng;
use crate::log;
use super::difficulty::{Difficulty, DifficultyParams};
use super::entity::Snake;
use super::events::{EndReason, GameOverEvent, SessionEvent, TickEvent};
use super::types::{Cell, Direction, FieldSize, GameStatus};

/// Single-player snake game advanced one tick at a time by an external
/// scheduler. All state is owned by the instance.
#[derive(Clone, Debug)]
pub struct GameSession {
    field_size: FieldSize,
    snake: Snake,
    direction: Direction,
    pending_direction: Option<Direction>,
    food_set: HashSet<Cell>,
    score: u32,
    difficulty: Option<Difficulty>,
    params: Option<DifficultyParams>,
    status: GameStatus,
    tick: u64,
    end_reason: Option<EndReason>,
    rng: SessionRng,
}

impl GameSession {
    pub fn new(field_size: FieldSize, rng: SessionRng) -> Self {
        Self {
            field_size,
            snake: Snake::new(Cell::ORIGIN),
            direction: Direction::Right,
            pending_direction: None,
            food_set: HashSet::new(),
            score: 0,
            difficulty: None,
            params: None,
            status: GameStatus::NotStarted,
            tick: 0,
            end_reason: None,
            rng,
        }
    }

    /// Selects the difficulty used by the next `start`. Leaves the board untouched.
    pub fn configure(&mut self, difficulty: Difficulty) -> Result<DifficultyParams, String> {
        if self.field_size.width == 0 || self.field_size.height == 0 {
            return Err(format!(
                "Field dimensions must be positive, got {}x{}",
                self.field_size.width, self.field_size.height
            ));
        }

        let params = difficulty.params();
        self.difficulty = Some(difficulty);
        self.params = Some(params);
        Ok(params)
    }

    /// Begins a new game and returns the tick interval for the scheduler.
    /// Does nothing while a game is running or before `configure`.
    pub fn start(&mut self) -> Option<Duration> {
        if self.status == GameStatus::Running {
            return None;
        }
        let params = self.params?;
        self.begin(params);
        Some(params.tick_interval)
    }

    /// Reconfigures and restarts regardless of the current status.
    pub fn reset(&mut self, difficulty: Difficulty) -> Result<Duration, String> {
        let params = self.configure(difficulty)?;
        self.begin(params);
        Ok(params.tick_interval)
    }

    /// Queues a turn for the next tick. Reversals are ignored.
    pub fn set_direction(&mut self, direction: Direction) -> bool {
        if self.status != GameStatus::Running || direction.is_opposite(&self.direction) {
            return false;
        }
        self.pending_direction = Some(direction);
        true
    }

    pub fn tick(&mut self) -> Option<SessionEvent> {
        if self.status != GameStatus::Running {
            return None;
        }

        if let Some(direction) = self.pending_direction.take() {
            self.direction = direction;
        }
        self.tick += 1;

        let Some(new_head) = self.snake.head().step(self.direction, &self.field_size) else {
            return Some(SessionEvent::GameOver(self.finish(EndReason::WallCollision)));
        };

        if self.snake.collides_on_move(&new_head) {
            return Some(SessionEvent::GameOver(self.finish(EndReason::SelfCollision)));
        }

        self.snake.push_head(new_head);

        if self.food_set.remove(&new_head) {
            self.score += 1;
            log!(
                "Food eaten at ({}, {}). Score: {}",
                new_head.row,
                new_head.col,
                self.score
            );
        } else {
            self.snake.pop_tail();
        }

        self.replenish_food();

        Some(SessionEvent::Tick(self.snapshot()))
    }

    /// Ends the game without evaluating collisions. Returns the game-over
    /// event only when this call ended a running game.
    pub fn stop(&mut self) -> Option<GameOverEvent> {
        match self.status {
            GameStatus::Running => Some(self.finish(EndReason::Stopped)),
            GameStatus::NotStarted => {
                self.status = GameStatus::GameOver;
                self.end_reason = Some(EndReason::Stopped);
                None
            }
            GameStatus::GameOver => None,
        }
    }

    pub fn snapshot(&self) -> TickEvent {
        let mut food: Vec<Cell> = self.food_set.iter().copied().collect();
        food.sort();
        TickEvent {
            tick: self.tick,
            snake: self.snake.to_vec(),
            food,
            score: self.score,
        }
    }

    pub fn game_over_event(&self) -> Option<GameOverEvent> {
        if self.status != GameStatus::GameOver {
            return None;
        }
        Some(GameOverEvent {
            tick: self.tick,
            score: self.score,
            reason: self.end_reason.unwrap_or(EndReason::Stopped),
        })
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_direction(&self) -> Option<Direction> {
        self.pending_direction
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> &HashSet<Cell> {
        &self.food_set
    }

    pub fn field_size(&self) -> &FieldSize {
        &self.field_size
    }

    pub fn difficulty(&self) -> Option<Difficulty> {
        self.difficulty
    }

    pub fn tick_interval(&self) -> Option<Duration> {
        self.params.map(|p| p.tick_interval)
    }

    pub fn food_limit(&self) -> Option<usize> {
        self.params.map(|p| p.food_limit)
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.end_reason
    }

    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    fn begin(&mut self, params: DifficultyParams) {
        self.snake = Snake::new(Cell::ORIGIN);
        self.direction = Direction::Right;
        self.pending_direction = None;
        self.food_set.clear();
        self.score = 0;
        self.tick = 0;
        self.end_reason = None;
        self.status = GameStatus::Running;
        self.replenish_food();

        log!(
            "Game started on {}x{} field ({}, {} ms, {} food, seed {})",
            self.field_size.width,
            self.field_size.height,
            self.difficulty.map(|d| d.to_string()).unwrap_or_default(),
            params.tick_interval.as_millis(),
            params.food_limit,
            self.rng.seed()
        );
    }

    fn finish(&mut self, reason: EndReason) -> GameOverEvent {
        self.status = GameStatus::GameOver;
        self.pending_direction = None;
        self.end_reason = Some(reason);
        log!(
            "Game over after {} ticks: {:?}. Score: {}",
            self.tick,
            reason,
            self.score
        );
        GameOverEvent {
            tick: self.tick,
            score: self.score,
            reason,
        }
    }

    fn replenish_food(&mut self) {
        let Some(params) = self.params else {
            return;
        };
        if self.food_set.len() >= params.food_limit {
            return;
        }

        let mut free: Vec<Cell> = self
            .field_size
            .cells()
            .filter(|cell| !self.snake.contains(cell) && !self.food_set.contains(cell))
            .collect();

        while self.food_set.len() < params.food_limit {
            if free.is_empty() {
                log!(
                    "No free cells left, food under-filled at {}/{}",
                    self.food_set.len(),
                    params.food_limit
                );
                break;
            }
            let idx = self.rng.random_range(0..free.len());
            self.food_set.insert(free.swap_remove(idx));
        }
    }

    #[cfg(test)]
    fn set_snake(&mut self, cells: &[Cell], direction: Direction) {
        self.snake = Snake::from_cells(cells).expect("test snake must be valid");
        self.direction = direction;
        self.pending_direction = None;
    }

    #[cfg(test)]
    fn set_food(&mut self, cells: &[Cell]) {
        self.food_set = cells.iter().copied().collect();
    }

    #[cfg(test)]
    fn set_score(&mut self, score: u32) {
        self.score = score;
    }
}
