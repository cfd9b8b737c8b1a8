use super::types::Cell;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EndReason {
    WallCollision,
    SelfCollision,
    Stopped,
}

/// Board snapshot published after every completed tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TickEvent {
    pub tick: u64,
    /// Head first.
    pub snake: Vec<Cell>,
    /// Sorted row-major.
    pub food: Vec<Cell>,
    pub score: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameOverEvent {
    pub tick: u64,
    pub score: u32,
    pub reason: EndReason,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    Tick(TickEvent),
    GameOver(GameOverEvent),
}
