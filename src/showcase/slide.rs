use raylib::prelude::*;

use crate::state::Direction;

/// Start and end offsets, in region widths, of the incoming and outgoing
/// layers for a flip in `direction`. Forward content enters from the right.
pub fn slide_offsets(direction: Direction) -> ((f32, f32), (f32, f32)) {
    match direction {
        Direction::Forward => ((1.0, 0.0), (0.0, -1.0)),
        Direction::Backward => ((-1.0, 0.0), (0.0, 1.0)),
        Direction::None => ((0.0, 0.0), (0.0, 0.0)),
    }
}

/// Horizontal slide of one primary layer.
pub struct Slide {
    pub layer: usize,
    pub offset: f32,
    pub is_animating: bool,
    animation_timer: f32,
    duration: f32,
    tween: ease::Tween,
}

impl Slide {
    fn new(layer: usize, (start, end): (f32, f32), duration: f32) -> Self {
        Self {
            layer,
            offset: start,
            is_animating: true,
            animation_timer: 0.0,
            duration,
            tween: ease::Tween::new(ease::cubic_out, start, end, duration),
        }
    }

    pub fn update(&mut self, dt: f32) {
        if !self.is_animating {
            return;
        }
        self.offset = self.tween.apply(dt);
        self.animation_timer += dt;
        if self.animation_timer >= self.duration {
            self.is_animating = false;
        }
    }
}

/// The primary region's layers: the one settled on screen, plus the one
/// leaving it while a slide-out runs.
pub struct Stage {
    pub incoming: Slide,
    pub outgoing: Option<Slide>,
    duration: f32,
}

impl Stage {
    pub fn new(active: usize, duration: f32) -> Self {
        let mut incoming = Slide::new(active, (0.0, 0.0), duration);
        incoming.is_animating = false;
        Self { incoming, outgoing: None, duration }
    }

    /// Starts the slides for a completed flip from `from` to `to`. Returns the
    /// layer still sliding out from a previous flip, whose playback can stop.
    pub fn begin(&mut self, from: usize, to: usize, direction: Direction) -> Option<usize> {
        let (incoming, outgoing) = slide_offsets(direction);
        let replaced = self.outgoing.take().map(|slide| slide.layer);
        self.incoming = Slide::new(to, incoming, self.duration);
        if from != to {
            self.outgoing = Some(Slide::new(from, outgoing, self.duration));
        }
        replaced.filter(|layer| *layer != to && *layer != from)
    }

    /// Returns the layer that just finished sliding out, if any.
    pub fn update(&mut self, dt: f32) -> Option<usize> {
        self.incoming.update(dt);
        let slide = self.outgoing.as_mut()?;
        slide.update(dt);
        if slide.is_animating {
            return None;
        }
        self.outgoing.take().map(|slide| slide.layer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_enters_from_the_right() {
        let ((in_start, in_end), (out_start, out_end)) = slide_offsets(Direction::Forward);
        assert_eq!((in_start, in_end), (1.0, 0.0));
        assert_eq!((out_start, out_end), (0.0, -1.0));
    }

    #[test]
    fn test_backward_mirrors_forward() {
        let ((in_start, _), (_, out_end)) = slide_offsets(Direction::Backward);
        assert_eq!(in_start, -1.0);
        assert_eq!(out_end, 1.0);
    }

    #[test]
    fn test_stage_settles_after_duration() {
        let mut stage = Stage::new(0, 0.6);
        assert_eq!(stage.begin(0, 1, Direction::Forward), None);
        assert_eq!(stage.incoming.layer, 1);
        assert_eq!(stage.outgoing.as_ref().map(|s| s.layer), Some(0));

        assert_eq!(stage.update(0.3), None);
        assert!(stage.incoming.offset > 0.0 && stage.incoming.offset < 1.0);

        assert_eq!(stage.update(0.3), Some(0));
        assert!(stage.outgoing.is_none());
        assert!(!stage.incoming.is_animating);
        assert!(stage.incoming.offset.abs() < 1e-3);
    }

    #[test]
    fn test_single_entry_flip_has_no_outgoing_layer() {
        let mut stage = Stage::new(0, 0.6);
        assert_eq!(stage.begin(0, 0, Direction::Forward), None);
        assert!(stage.outgoing.is_none());
    }

    #[test]
    fn test_interrupted_slide_out_reports_replaced_layer() {
        let mut stage = Stage::new(0, 0.6);
        stage.begin(0, 1, Direction::Forward);
        stage.update(0.1);
        assert_eq!(stage.begin(1, 2, Direction::Forward), Some(0));
        assert_eq!(stage.outgoing.as_ref().map(|s| s.layer), Some(1));
    }
}
