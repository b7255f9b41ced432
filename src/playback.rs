use log::warn;

use crate::error::Result;

/// A media element whose clock can be read, moved and started.
pub trait Player {
    /// Playback position in seconds.
    fn position(&self) -> f32;
    fn seek(&mut self, position: f32);
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self);
}

/// Rewinds `player` to zero and starts it. A start failure is logged and
/// swallowed; nothing retries it.
pub fn restart<P: Player + ?Sized>(player: &mut P, label: &str) {
    player.seek(0.0);
    if let Err(e) = player.play() {
        warn!("Autoplay failed for {}: {}", label, e);
    }
}

/// Paces a decoded frame stream against a playback timer.
///
/// The timer says which frame is due. The position reported to the phase
/// lock is the timestamp of the frame actually shown, so a stream that falls
/// behind its timer shows up as drift. Until the first frame after a seek is
/// shown, the timer stands in for the position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameClock {
    fps: f32,
    timer: f32,
    start: f32,
    frames_shown: u64,
}

impl FrameClock {
    pub fn new(fps: u32) -> Self {
        Self { fps: fps.max(1) as f32, timer: 0.0, start: 0.0, frames_shown: 0 }
    }

    pub fn advance(&mut self, dt: f32) {
        self.timer += dt;
    }

    /// Whether the next frame's timestamp has been reached by the timer.
    pub fn frame_due(&self) -> bool {
        self.start + self.frames_shown as f32 / self.fps <= self.timer
    }

    pub fn frame_shown(&mut self) {
        self.frames_shown += 1;
    }

    pub fn reset(&mut self, position: f32) {
        self.timer = position;
        self.start = position;
        self.frames_shown = 0;
    }

    /// Where the decode starts after the last reset.
    pub fn start(&self) -> f32 {
        self.start
    }

    pub fn shown_position(&self) -> f32 {
        match self.frames_shown {
            0 => self.timer,
            shown => self.start + (shown - 1) as f32 / self.fps,
        }
    }
}

/// Keeps a group of players on the same clock. Whenever one of them reports a
/// time update, every other player further than `tolerance` away is moved to
/// the reporter's position.
#[derive(Debug, Clone, Copy)]
pub struct PhaseLock {
    tolerance: f32,
}

impl PhaseLock {
    pub fn new(tolerance: f32) -> Self {
        Self { tolerance }
    }

    /// Returns how many followers were corrected.
    pub fn on_time_update<P: Player>(&self, players: &mut [P], leader: usize) -> usize {
        let Some(target) = players.get(leader).map(Player::position) else {
            return 0;
        };

        let mut corrected = 0;
        for (i, player) in players.iter_mut().enumerate() {
            if i != leader && (player.position() - target).abs() > self.tolerance {
                player.seek(target);
                corrected += 1;
            }
        }
        corrected
    }
}
