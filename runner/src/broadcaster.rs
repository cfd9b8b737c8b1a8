use common::games::SessionBroadcaster;
use common::log;
use common::{GameOverEvent, TickEvent};

/// Writes session events to the log in place of a renderer.
#[derive(Clone)]
pub struct LogBroadcaster {
    verbose: bool,
}

impl LogBroadcaster {
    pub fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl SessionBroadcaster for LogBroadcaster {
    async fn broadcast_tick(&self, event: TickEvent) {
        if !self.verbose {
            return;
        }
        let Some(head) = event.snake.first() else {
            return;
        };
        log!(
            "tick {}: head ({}, {}), length {}, food {}, score {}",
            event.tick,
            head.row,
            head.col,
            event.snake.len(),
            event.food.len(),
            event.score
        );
    }

    async fn broadcast_game_over(&self, event: GameOverEvent) {
        log!(
            "Game over at tick {} ({:?}). Final score: {}",
            event.tick,
            event.reason,
            event.score
        );
    }
}
