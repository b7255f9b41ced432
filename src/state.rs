#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Direction {
    Forward,
    Backward,
    None,
}

impl Direction {
    /// Index offset of one step in this direction.
    pub fn step(self) -> isize {
        match self {
            Direction::Forward => 1,
            Direction::Backward => -1,
            Direction::None => 0,
        }
    }
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Phase {
    Idle,                                              // No transition in flight
    Transitioning { step: Direction, elapsed: f32 },   // Accepted, completion pending
}

/// What the renderer reads every frame.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct TransitionState {
    pub active_index: usize,
    pub direction: Direction,
    pub phase: Phase,
}

impl TransitionState {
    pub fn new() -> Self {
        Self {
            active_index: 0,
            direction: Direction::None,
            phase: Phase::Idle,
        }
    }

    pub fn in_flight(&self) -> bool {
        self.phase != Phase::Idle
    }

    /// Seconds since the pending transition was accepted, if any.
    pub fn flight_elapsed(&self) -> Option<f32> {
        match self.phase {
            Phase::Idle => None,
            Phase::Transitioning { elapsed, .. } => Some(elapsed),
        }
    }
}

impl Default for TransitionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = TransitionState::new();
        assert_eq!(state.active_index, 0);
        assert_eq!(state.direction, Direction::None);
        assert!(!state.in_flight());
        assert_eq!(state.flight_elapsed(), None);
    }

    #[test]
    fn test_transitioning_is_in_flight() {
        let state = TransitionState {
            phase: Phase::Transitioning { step: Direction::Forward, elapsed: 0.25 },
            ..TransitionState::new()
        };
        assert!(state.in_flight());
        assert_eq!(state.flight_elapsed(), Some(0.25));
    }
}
