use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::games::{SessionBroadcaster, SessionRng};
use crate::log;
use super::bot_controller::{BotController, SnakeBotType};
use super::events::{EndReason, GameOverEvent, SessionEvent, TickEvent};
use super::game_session::GameSession;
use super::types::{Direction, GameStatus};

/// Shared access to a session from input and scheduler tasks. Every call holds
/// the lock for its whole duration, so ticks never interleave with each other
/// or with direction changes.
#[derive(Clone)]
pub struct SessionHandle {
    session: Arc<Mutex<GameSession>>,
}

impl SessionHandle {
    pub fn new(session: GameSession) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
        }
    }

    pub async fn set_direction(&self, direction: Direction) -> bool {
        self.session.lock().await.set_direction(direction)
    }

    pub async fn stop(&self) -> Option<GameOverEvent> {
        self.session.lock().await.stop()
    }

    pub async fn snapshot(&self) -> TickEvent {
        self.session.lock().await.snapshot()
    }

    pub async fn status(&self) -> GameStatus {
        self.session.lock().await.status()
    }
}

pub struct SnakeSession;

impl SnakeSession {
    /// Drives the session at its tick interval until it ends, publishing every
    /// event. Starts the game if it is not already running, unless it was
    /// stopped beforehand.
    pub async fn run(
        handle: SessionHandle,
        broadcaster: impl SessionBroadcaster,
        autopilot: SnakeBotType,
        mut bot_rng: SessionRng,
        max_ticks: Option<u64>,
    ) -> Result<GameOverEvent, String> {
        let tick_interval = {
            let mut session = handle.session.lock().await;

            if session.end_reason() == Some(EndReason::Stopped) {
                let game_over = session
                    .game_over_event()
                    .ok_or_else(|| "Stopped session is not over".to_string())?;
                drop(session);
                log!("Session was stopped before it could run");
                broadcaster.broadcast_game_over(game_over.clone()).await;
                return Ok(game_over);
            }

            match session.start() {
                Some(tick_interval) => tick_interval,
                None if session.status() == GameStatus::Running => session
                    .tick_interval()
                    .ok_or_else(|| "Running session has no tick interval".to_string())?,
                None => return Err("Session must be configured before it can run".to_string()),
            }
        };

        let mut timer = interval_at(Instant::now() + tick_interval, tick_interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            timer.tick().await;

            let event = {
                let mut session = handle.session.lock().await;

                if session.status() != GameStatus::Running {
                    let game_over = session
                        .game_over_event()
                        .ok_or_else(|| "Session left running state without ending".to_string())?;
                    drop(session);
                    broadcaster.broadcast_game_over(game_over.clone()).await;
                    return Ok(game_over);
                }

                if let Some(direction) = BotController::calculate_move(autopilot, &session, &mut bot_rng) {
                    session.set_direction(direction);
                }

                match session.tick() {
                    Some(SessionEvent::Tick(tick)) if max_ticks.is_some_and(|max| tick.tick >= max) => {
                        log!("Tick limit {} reached, stopping session", tick.tick);
                        let game_over = session.stop();
                        (Some(tick), game_over)
                    }
                    Some(SessionEvent::Tick(tick)) => (Some(tick), None),
                    Some(SessionEvent::GameOver(game_over)) => (None, Some(game_over)),
                    None => (None, session.game_over_event()),
                }
            };

            if let (Some(tick), _) = &event {
                broadcaster.broadcast_tick(tick.clone()).await;
            }
            if let (_, Some(game_over)) = event {
                broadcaster.broadcast_game_over(game_over.clone()).await;
                return Ok(game_over);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex as StdMutex;
    use crate::games::snake::{Cell, Difficulty, FieldSize};

    #[derive(Clone, Default)]
    struct RecordingBroadcaster {
        events: Arc<StdMutex<Vec<SessionEvent>>>,
    }

    impl RecordingBroadcaster {
        fn events(&self) -> Vec<SessionEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    impl SessionBroadcaster for RecordingBroadcaster {
        async fn broadcast_tick(&self, event: TickEvent) {
            self.events.lock().unwrap().push(SessionEvent::Tick(event));
        }

        async fn broadcast_game_over(&self, event: GameOverEvent) {
            self.events.lock().unwrap().push(SessionEvent::GameOver(event));
        }
    }

    fn create_handle(width: usize, height: usize, difficulty: Difficulty) -> SessionHandle {
        let mut session = GameSession::new(FieldSize::new(width, height), SessionRng::new(42));
        session.configure(difficulty).unwrap();
        SessionHandle::new(session)
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_until_wall() {
        let handle = create_handle(5, 5, Difficulty::Hard);
        let broadcaster = RecordingBroadcaster::default();

        let game_over = SnakeSession::run(
            handle.clone(),
            broadcaster.clone(),
            SnakeBotType::None,
            SessionRng::new(1),
            None,
        )
        .await
        .unwrap();

        assert_eq!(game_over.reason, EndReason::WallCollision);
        assert_eq!(game_over.tick, 5);

        let events = broadcaster.events();
        assert_eq!(events.len(), 5);
        assert!(matches!(events.last(), Some(SessionEvent::GameOver(_))));
        assert_eq!(handle.status().await, GameStatus::GameOver);
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_are_paced_by_difficulty() {
        let handle = create_handle(5, 5, Difficulty::Easy);
        let started = Instant::now();

        SnakeSession::run(
            handle,
            RecordingBroadcaster::default(),
            SnakeBotType::None,
            SessionRng::new(1),
            None,
        )
        .await
        .unwrap();

        assert!(started.elapsed() >= Duration::from_millis(5 * 200));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_from_other_task() {
        let handle = create_handle(20, 20, Difficulty::Easy);
        let broadcaster = RecordingBroadcaster::default();

        let runner = tokio::spawn(SnakeSession::run(
            handle.clone(),
            broadcaster.clone(),
            SnakeBotType::Efficient,
            SessionRng::new(1),
            None,
        ));

        tokio::time::sleep(Duration::from_millis(1_050)).await;
        handle.stop().await;

        let game_over = runner.await.unwrap().unwrap();
        assert_eq!(game_over.reason, EndReason::Stopped);
        assert!(game_over.tick >= 1);
        assert!(matches!(broadcaster.events().last(), Some(SessionEvent::GameOver(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_limit_stops_session() {
        let handle = create_handle(10, 10, Difficulty::Hard);
        let broadcaster = RecordingBroadcaster::default();

        let game_over = SnakeSession::run(
            handle,
            broadcaster.clone(),
            SnakeBotType::Efficient,
            SessionRng::new(1),
            Some(10),
        )
        .await
        .unwrap();

        assert_eq!(game_over.reason, EndReason::Stopped);
        assert_eq!(game_over.tick, 10);
        let ticks = broadcaster
            .events()
            .iter()
            .filter(|e| matches!(e, SessionEvent::Tick(_)))
            .count();
        assert_eq!(ticks, 10);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_before_run_is_kept() {
        let handle = create_handle(5, 5, Difficulty::Hard);
        let broadcaster = RecordingBroadcaster::default();
        handle.stop().await;

        let game_over = SnakeSession::run(
            handle.clone(),
            broadcaster.clone(),
            SnakeBotType::None,
            SessionRng::new(1),
            None,
        )
        .await
        .unwrap();

        assert_eq!(game_over.reason, EndReason::Stopped);
        assert_eq!(game_over.tick, 0);
        assert_eq!(broadcaster.events(), vec![SessionEvent::GameOver(game_over)]);
        assert_eq!(handle.status().await, GameStatus::GameOver);
    }

    #[tokio::test(start_paused = true)]
    async fn test_snapshot_between_ticks_sees_completed_tick() {
        let handle = create_handle(20, 20, Difficulty::Easy);

        let runner = tokio::spawn(SnakeSession::run(
            handle.clone(),
            RecordingBroadcaster::default(),
            SnakeBotType::None,
            SessionRng::new(1),
            None,
        ));

        tokio::time::sleep(Duration::from_millis(650)).await;
        let snapshot = handle.snapshot().await;

        assert_eq!(snapshot.tick, 3);
        assert_eq!(snapshot.snake[0], Cell::new(0, 3));
        let body: HashSet<Cell> = snapshot.snake.iter().copied().collect();
        assert_eq!(body.len(), snapshot.snake.len());
        assert_eq!(snapshot.food.len(), 7);
        assert!(snapshot.food.iter().all(|cell| !body.contains(cell)));

        handle.stop().await;
        let game_over = runner.await.unwrap().unwrap();
        assert_eq!(game_over.reason, EndReason::Stopped);
        assert_eq!(game_over.tick, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_direction_from_input_task_applies_next_tick() {
        let handle = create_handle(20, 20, Difficulty::Easy);

        let runner = tokio::spawn(SnakeSession::run(
            handle.clone(),
            RecordingBroadcaster::default(),
            SnakeBotType::None,
            SessionRng::new(1),
            None,
        ));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(handle.set_direction(Direction::Down).await);
        assert!(!handle.set_direction(Direction::Left).await);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(handle.snapshot().await.snake[0], Cell::new(1, 0));

        handle.stop().await;
        runner.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_unconfigured_session_is_rejected() {
        let handle = SessionHandle::new(GameSession::new(FieldSize::new(5, 5), SessionRng::new(1)));
        let result = SnakeSession::run(
            handle,
            RecordingBroadcaster::default(),
            SnakeBotType::None,
            SessionRng::new(1),
            None,
        )
        .await;
        assert!(result.is_err());
    }
}
