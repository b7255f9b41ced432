use log::{debug, info};

use crate::error::{Result, ShowcaseError};
use crate::state::{Direction, Phase, TransitionState};

/// A completed transition, handed back by [`TransitionController::tick`].
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Flip {
    pub from: usize,
    pub to: usize,
    pub direction: Direction,
}

/// Serializes index changes for every display region sharing one
/// [`TransitionState`].
///
/// Time only moves through [`tick`](Self::tick), called once per frame with
/// the frame time. A request accepted during a frame is visible to any other
/// request made in the same frame, so at most one transition is ever pending.
pub struct TransitionController {
    state: TransitionState,
    count: usize,
    flip_duration: f32,
    interval: Option<f32>,
    auto_timer: Option<f32>,
    running: bool,
}

impl TransitionController {
    /// `interval` of `None` disables the automatic advance.
    pub fn new(count: usize, flip_duration: f32, interval: Option<f32>) -> Result<Self> {
        if count == 0 {
            return Err(ShowcaseError::EmptyContent);
        }
        Ok(Self {
            state: TransitionState::new(),
            count,
            flip_duration,
            interval: interval.filter(|i| *i > 0.0),
            auto_timer: None,
            running: false,
        })
    }

    /// Arms the automatic advance timer and starts accepting requests.
    pub fn start(&mut self) {
        self.running = true;
        self.auto_timer = self.interval.map(|_| 0.0);
        info!(
            "Transition controller started ({} entries, auto advance {})",
            self.count,
            self.interval.map_or("off".to_string(), |i| format!("every {i}s"))
        );
    }

    /// Disarms the timer and forgets any pending transition.
    pub fn teardown(&mut self) {
        if self.state.in_flight() {
            debug!("Dropping pending transition on teardown");
        }
        self.running = false;
        self.auto_timer = None;
        self.state.phase = Phase::Idle;
    }

    pub fn state(&self) -> &TransitionState {
        &self.state
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn flip_duration(&self) -> f32 {
        self.flip_duration
    }

    /// Asks for a one step transition. Returns whether it was accepted;
    /// requests made while another transition is in flight are dropped.
    pub fn request_transition(&mut self, direction: Direction) -> bool {
        if !self.running || direction == Direction::None {
            return false;
        }
        if self.state.in_flight() {
            debug!("Transition {:?} dropped: another one is in flight", direction);
            return false;
        }
        self.state.phase = Phase::Transitioning { step: direction, elapsed: 0.0 };
        true
    }

    /// Advances the pending transition and the automatic timer by `dt`.
    pub fn tick(&mut self, dt: f32) -> Option<Flip> {
        if !self.running {
            return None;
        }

        let mut completed = None;
        if let Phase::Transitioning { step, elapsed } = self.state.phase {
            let elapsed = elapsed + dt;
            if elapsed >= self.flip_duration {
                completed = Some(self.complete(step));
            } else {
                self.state.phase = Phase::Transitioning { step, elapsed };
            }
        }

        if let (Some(interval), Some(timer)) = (self.interval, self.auto_timer.as_mut()) {
            *timer += dt;
            while *timer >= interval {
                *timer -= interval;
                if !self.state.in_flight() {
                    self.state.phase = Phase::Transitioning { step: Direction::Forward, elapsed: 0.0 };
                    debug!("Automatic advance");
                }
            }
        }

        completed
    }

    fn complete(&mut self, step: Direction) -> Flip {
        let from = self.state.active_index;
        let to = (from as isize + step.step()).rem_euclid(self.count as isize) as usize;
        self.state.active_index = to;
        self.state.direction = step;
        self.state.phase = Phase::Idle;
        debug!("Flip {:?}: {} -> {}", step, from, to);
        Flip { from, to, direction: step }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controller(count: usize) -> TransitionController {
        let mut controller = TransitionController::new(count, 0.6, None).unwrap();
        controller.start();
        controller
    }

    fn flip(controller: &mut TransitionController, direction: Direction) -> Option<Flip> {
        assert!(controller.request_transition(direction));
        controller.tick(1.0)
    }

    #[test]
    fn test_empty_content_is_rejected() {
        assert!(matches!(
            TransitionController::new(0, 0.6, None),
            Err(ShowcaseError::EmptyContent)
        ));
    }

    #[test]
    fn test_forward_visits_every_index_cyclically() {
        for count in 1..=6 {
            let mut controller = controller(count);
            let mut visited = vec![controller.state().active_index];
            for _ in 0..(2 * count) {
                flip(&mut controller, Direction::Forward);
                visited.push(controller.state().active_index);
            }
            let expected: Vec<usize> = (0..=2 * count).map(|i| i % count).collect();
            assert_eq!(visited, expected);
        }
    }

    #[test]
    fn test_four_entries_scenario() {
        let mut controller = controller(4);
        let mut sequence = Vec::new();
        for _ in 0..4 {
            flip(&mut controller, Direction::Forward);
            sequence.push(controller.state().active_index);
        }
        assert_eq!(sequence, vec![1, 2, 3, 0]);
    }

    #[test]
    fn test_single_entry_wraps_to_itself() {
        let mut controller = controller(1);
        let completed = flip(&mut controller, Direction::Forward);
        assert_eq!(completed, Some(Flip { from: 0, to: 0, direction: Direction::Forward }));
        assert_eq!(controller.state().active_index, 0);
        assert!(!controller.state().in_flight());
    }

    #[test]
    fn test_index_changes_only_on_completion() {
        let mut controller = controller(3);
        assert!(controller.request_transition(Direction::Forward));
        assert!(controller.state().in_flight());
        assert_eq!(controller.tick(0.3), None);
        assert_eq!(controller.state().active_index, 0);
        assert_eq!(controller.state().flight_elapsed(), Some(0.3));
        assert!(controller.tick(0.3).is_some());
        assert_eq!(controller.state().active_index, 1);
        assert_eq!(controller.state().direction, Direction::Forward);
    }

    #[test]
    fn test_second_request_while_in_flight_is_dropped() {
        let mut controller = controller(4);
        assert!(controller.request_transition(Direction::Forward));
        assert!(!controller.request_transition(Direction::Forward));
        assert!(!controller.request_transition(Direction::Backward));

        let completed = controller.tick(1.0);
        assert_eq!(completed, Some(Flip { from: 0, to: 1, direction: Direction::Forward }));
        // Nothing was queued behind the first transition
        assert!(!controller.state().in_flight());
        assert_eq!(controller.tick(1.0), None);
        assert_eq!(controller.state().active_index, 1);
    }

    #[test]
    fn test_forward_then_backward_round_trips() {
        let mut controller = controller(5);
        flip(&mut controller, Direction::Forward);
        flip(&mut controller, Direction::Backward);
        assert_eq!(controller.state().active_index, 0);
        assert_eq!(controller.state().direction, Direction::Backward);

        flip(&mut controller, Direction::Backward);
        assert_eq!(controller.state().active_index, 4);
    }

    #[test]
    fn test_direction_none_is_ignored() {
        let mut controller = controller(2);
        assert!(!controller.request_transition(Direction::None));
        assert!(!controller.state().in_flight());
    }

    #[test]
    fn test_auto_advance_fires_on_interval() {
        let mut controller = TransitionController::new(3, 0.5, Some(2.0)).unwrap();
        controller.start();

        assert_eq!(controller.tick(1.5), None);
        assert!(!controller.state().in_flight());
        assert_eq!(controller.tick(0.5), None);
        assert!(controller.state().in_flight());
        let completed = controller.tick(0.5);
        assert_eq!(completed, Some(Flip { from: 0, to: 1, direction: Direction::Forward }));
    }

    #[test]
    fn test_auto_advance_skips_while_in_flight() {
        let mut controller = TransitionController::new(4, 10.0, Some(1.0)).unwrap();
        controller.start();
        assert!(controller.request_transition(Direction::Forward));

        // The timer fires nine times during the long pending transition
        for _ in 0..9 {
            assert_eq!(controller.tick(1.0), None);
            assert_eq!(controller.state().active_index, 0);
        }
        let completed = controller.tick(1.0);
        assert_eq!(completed.map(|f| f.to), Some(1));
        assert_eq!(controller.state().active_index, 1);
    }

    #[test]
    fn test_auto_advance_keeps_cadence_after_manual_flip() {
        let mut controller = TransitionController::new(4, 0.5, Some(2.0)).unwrap();
        controller.start();
        controller.tick(1.0);
        assert!(controller.request_transition(Direction::Forward));
        assert!(controller.tick(0.5).is_some());
        assert!(!controller.state().in_flight());
        // Timer is at 1.5s; next firing is still at 2.0s
        controller.tick(0.5);
        assert!(controller.state().in_flight());
    }

    #[test]
    fn test_disabled_interval_never_advances() {
        let mut controller = TransitionController::new(2, 0.5, Some(0.0)).unwrap();
        controller.start();
        for _ in 0..100 {
            assert_eq!(controller.tick(1.0), None);
        }
        assert_eq!(controller.state().active_index, 0);
    }

    #[test]
    fn test_teardown_clears_pending_and_disarms_timer() {
        let mut controller = TransitionController::new(3, 0.5, Some(1.0)).unwrap();
        controller.start();
        assert!(controller.request_transition(Direction::Forward));
        controller.teardown();

        assert!(!controller.state().in_flight());
        assert_eq!(controller.tick(5.0), None);
        assert!(!controller.request_transition(Direction::Forward));
        assert_eq!(controller.state().active_index, 0);

        controller.start();
        assert!(controller.request_transition(Direction::Forward));
        assert!(controller.tick(0.5).is_some());
        assert_eq!(controller.state().active_index, 1);
    }

    #[test]
    fn test_requests_ignored_before_start() {
        let mut controller = TransitionController::new(3, 0.5, None).unwrap();
        assert!(!controller.request_transition(Direction::Forward));
        assert_eq!(controller.tick(1.0), None);
    }
}
