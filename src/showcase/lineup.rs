use log::debug;

use crate::controller::Flip;
use crate::showcase::slide::Stage;

/// Playback controls of one slot, whatever draws it.
pub trait SlotPlayback {
    /// Rewinds and starts every player of the slot. Failures are logged.
    fn restart(&mut self);
    fn pause(&mut self);
}

pub struct EntryMedia<S> {
    pub primary: S,
    pub secondary: S,
}

impl<S: SlotPlayback> EntryMedia<S> {
    pub fn restart(&mut self) {
        self.primary.restart();
        self.secondary.restart();
    }

    pub fn pause(&mut self) {
        self.primary.pause();
        self.secondary.pause();
    }
}

/// The media of every entry plus the primary region's slide layers, and
/// which of them play.
///
/// The active entry plays. The previous primary keeps playing while it slides
/// out; the previous secondary stops as soon as the index changes.
pub struct Lineup<S> {
    entries: Vec<EntryMedia<S>>,
    stage: Stage,
}

impl<S: SlotPlayback> Lineup<S> {
    pub fn new(slide_duration: f32) -> Self {
        Self { entries: Vec::new(), stage: Stage::new(0, slide_duration) }
    }

    pub fn push(&mut self, entry: EntryMedia<S>) {
        self.entries.push(entry);
    }

    pub fn entry(&self, index: usize) -> Option<&EntryMedia<S>> {
        self.entries.get(index)
    }

    pub fn entries_mut(&mut self) -> impl Iterator<Item = &mut EntryMedia<S>> {
        self.entries.iter_mut()
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn start(&mut self, active: usize) {
        if let Some(entry) = self.entries.get_mut(active) {
            entry.restart();
        }
    }

    pub fn on_flip(&mut self, flip: &Flip) {
        if let Some(stale) = self.stage.begin(flip.from, flip.to, flip.direction) {
            if let Some(entry) = self.entries.get_mut(stale) {
                entry.primary.pause();
            }
        }
        if flip.from != flip.to {
            if let Some(entry) = self.entries.get_mut(flip.from) {
                entry.secondary.pause();
            }
        }
        if let Some(entry) = self.entries.get_mut(flip.to) {
            entry.restart();
        }
    }

    /// Advances the slides and pauses a primary layer once it has left the
    /// screen, unless it is `active` again.
    pub fn update_stage(&mut self, dt: f32, active: usize) {
        let Some(done) = self.stage.update(dt) else {
            return;
        };
        if done == active {
            return;
        }
        if let Some(entry) = self.entries.get_mut(done) {
            debug!("Entry {} slid out", done + 1);
            entry.primary.pause();
        }
    }

    pub fn pause_all(&mut self) {
        for entry in self.entries.iter_mut() {
            entry.pause();
        }
    }
}
