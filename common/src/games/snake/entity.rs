use std::collections::{HashSet, VecDeque};

use super::types::Cell;

/// Snake body, head at the front. `body_set` mirrors `body` for O(1) lookups.
#[derive(Clone, Debug)]
pub struct Snake {
    body: VecDeque<Cell>,
    body_set: HashSet<Cell>,
}

impl Snake {
    pub fn new(head: Cell) -> Self {
        Self {
            body: VecDeque::from([head]),
            body_set: HashSet::from([head]),
        }
    }

    /// Builds a snake from head-first cells. Returns `None` for an empty or
    /// self-overlapping body.
    pub fn from_cells(cells: &[Cell]) -> Option<Self> {
        let body: VecDeque<Cell> = cells.iter().copied().collect();
        let body_set: HashSet<Cell> = cells.iter().copied().collect();
        if body.is_empty() || body_set.len() != body.len() {
            return None;
        }
        Some(Self { body, body_set })
    }

    pub fn head(&self) -> Cell {
        *self.body.front().expect("Snake body should never be empty")
    }

    pub fn tail(&self) -> Cell {
        *self.body.back().expect("Snake body should never be empty")
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn contains(&self, cell: &Cell) -> bool {
        self.body_set.contains(cell)
    }

    /// Whether moving the head onto `cell` would hit the body. The tail is
    /// excluded since it leaves its cell on the same tick.
    pub fn collides_on_move(&self, cell: &Cell) -> bool {
        self.body_set.contains(cell) && *cell != self.tail()
    }

    pub fn push_head(&mut self, cell: Cell) {
        self.body.push_front(cell);
        self.body_set.insert(cell);
    }

    pub fn pop_tail(&mut self) -> Cell {
        let tail = self.body.pop_back().expect("Snake body should never be empty");
        // The new head may sit on the old tail cell; keep it in the set then.
        if self.body.front() != Some(&tail) {
            self.body_set.remove(&tail);
        }
        tail
    }

    pub fn to_vec(&self) -> Vec<Cell> {
        self.body.iter().copied().collect()
    }
}
