use std::future::Future;

use super::snake::{GameOverEvent, TickEvent};

/// Render-side sink for session snapshots.
pub trait SessionBroadcaster: Send + Sync + Clone + 'static {
    fn broadcast_tick(&self, event: TickEvent) -> impl Future<Output = ()> + Send;

    fn broadcast_game_over(&self, event: GameOverEvent) -> impl Future<Output = ()> + Send;
}
