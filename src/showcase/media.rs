use std::path::Path;

use log::{debug, warn};
use raylib::prelude::*;

use crate::constants::*;
use crate::content::MediaRef;
use crate::error::{Result, ShowcaseError};
use crate::ffmpeg::{FfmpegDecoder, FrameGeometry};
use crate::playback::{restart, FrameClock, PhaseLock, Player};
use crate::showcase::layout::{cover_source, strip_source};
use crate::showcase::lineup::SlotPlayback;
use crate::texture_loader::{blank_texture, load_texture_with_exif_rotation};

/// Plays one video slot (or one strip of it) into a texture.
///
/// The clock only moves while playing. Decoded frames are uploaded once the
/// clock reaches their timestamp; the reported position is that of the frame
/// on screen.
pub struct VideoPlayer {
    source: String,
    geometry: FrameGeometry,
    texture: Texture2D,
    decoder: Option<FfmpegDecoder>,
    playing: bool,
    clock: FrameClock,
    has_frame: bool,
}

impl VideoPlayer {
    pub fn new(rl: &mut RaylibHandle, thread: &RaylibThread, source: &str, geometry: FrameGeometry) -> Result<Self> {
        let texture = blank_texture(rl, thread, geometry.strip_width, geometry.canvas_height)?;
        Ok(Self {
            source: source.to_string(),
            geometry,
            texture,
            decoder: None,
            playing: false,
            clock: FrameClock::new(VIDEO_FPS),
            has_frame: false,
        })
    }

    /// Advances the clock. Returns true when a new frame was shown, which is
    /// the player's time update.
    pub fn update(&mut self, dt: f32) -> bool {
        if !self.playing {
            return false;
        }
        self.clock.advance(dt);

        let Some(decoder) = self.decoder.as_mut() else {
            return false;
        };
        let mut latest = None;
        while self.clock.frame_due() {
            match decoder.try_frame() {
                Some(frame) => {
                    latest = Some(frame);
                    self.clock.frame_shown();
                }
                None => break,
            }
        }
        if decoder.is_exhausted() {
            warn!("Video {} stopped decoding", self.source);
            self.decoder = None;
        }

        match latest {
            Some(frame) => match self.texture.update_texture(&frame) {
                Ok(()) => {
                    self.has_frame = true;
                    true
                }
                Err(e) => {
                    warn!("Failed to upload frame of {}: {}", self.source, e);
                    false
                }
            },
            None => false,
        }
    }

    /// The latest decoded frame, already matching the player's geometry.
    pub fn frame(&self) -> Option<&Texture2D> {
        self.has_frame.then_some(&self.texture)
    }

    fn spawn_decoder(&mut self) -> Result<()> {
        self.decoder = None;
        self.decoder = Some(FfmpegDecoder::spawn(
            &self.source,
            self.geometry,
            VIDEO_FPS,
            self.clock.start(),
            DECODER_QUEUE,
        )?);
        Ok(())
    }
}

impl Player for VideoPlayer {
    fn position(&self) -> f32 {
        self.clock.shown_position()
    }

    fn seek(&mut self, position: f32) {
        self.clock.reset(position);
        if self.playing {
            if let Err(e) = self.spawn_decoder() {
                warn!("Seek of {} to {:.2}s failed: {}", self.source, position, e);
            }
        } else {
            self.decoder = None;
        }
    }

    fn play(&mut self) -> Result<()> {
        if self.decoder.is_none() {
            if let Err(e) = self.spawn_decoder() {
                self.playing = false;
                return Err(e);
            }
        }
        self.playing = true;
        Ok(())
    }

    fn pause(&mut self) {
        self.playing = false;
        self.decoder = None;
    }
}

/// Everything needed to draw one slot: a still (the image itself, or the
/// poster of a video) and, for videos, one player per drawn strip.
pub struct SlotMedia {
    label: String,
    still: Option<Texture2D>,
    players: Vec<VideoPlayer>,
    canvas_width: f32,
    canvas_height: f32,
    strips: Vec<(f32, f32)>,
}

impl SlotMedia {
    /// `strips` are the parts of one canvas drawn independently, all sharing
    /// the same canvas size. A single full-frame strip gives one player.
    pub fn load(
        rl: &mut RaylibHandle,
        thread: &RaylibThread,
        label: String,
        media: &MediaRef,
        compact: bool,
        strips: &[FrameGeometry],
    ) -> Self {
        let still_source = if media.is_video() { media.poster.as_deref() } else { Some(media.source_for(compact)) };
        let still = still_source.and_then(|source| match load_still(rl, thread, source) {
            Ok(texture) => Some(texture),
            Err(e) => {
                warn!("{}: {}", label, e);
                None
            }
        });

        let players = if media.is_video() {
            let created: Result<Vec<VideoPlayer>> = strips
                .iter()
                .map(|&geometry| VideoPlayer::new(rl, thread, media.source_for(compact), geometry))
                .collect();
            // Strips map to players by index, so it is all or nothing
            created.unwrap_or_else(|e| {
                warn!("{}: {}", label, e);
                Vec::new()
            })
        } else {
            Vec::new()
        };

        debug!("Loaded {} ({} players, still: {})", label, players.len(), still.is_some());
        let canvas = strips.first().map_or((0.0, 0.0), |g| (g.canvas_width as f32, g.canvas_height as f32));
        Self {
            label,
            still,
            players,
            canvas_width: canvas.0,
            canvas_height: canvas.1,
            strips: strips.iter().map(|g| (g.strip_x as f32, g.strip_width as f32)).collect(),
        }
    }

    /// Advances every player, then lets each one that showed a new frame pull
    /// the others into phase. Returns the number of corrections made.
    pub fn update(&mut self, dt: f32, lock: &PhaseLock) -> usize {
        let reporters: Vec<usize> = self
            .players
            .iter_mut()
            .enumerate()
            .filter_map(|(i, player)| player.update(dt).then_some(i))
            .collect();

        let mut corrected = 0;
        if self.players.len() > 1 {
            for leader in reporters {
                corrected += lock.on_time_update(&mut self.players, leader);
            }
        }
        if corrected > 0 {
            debug!("{}: resynchronized {} strips", self.label, corrected);
        }
        corrected
    }

    /// Visible texture and source rectangle for strip `index`.
    pub fn strip(&self, index: usize) -> Option<(&Texture2D, Rectangle)> {
        if let Some(frame) = self.players.get(index).and_then(VideoPlayer::frame) {
            let source = Rectangle::new(0.0, 0.0, frame.width() as f32, frame.height() as f32);
            return Some((frame, source));
        }

        let still = self.still.as_ref()?;
        let &(strip_x, strip_width) = self.strips.get(index)?;
        let cover = cover_source(still.width() as f32, still.height() as f32, self.canvas_width, self.canvas_height);
        Some((still, strip_source(cover, self.canvas_width, strip_x, strip_width)))
    }
}

impl SlotPlayback for SlotMedia {
    fn restart(&mut self) {
        for (i, player) in self.players.iter_mut().enumerate() {
            restart(player, &format!("{} strip {}", self.label, i));
        }
    }

    fn pause(&mut self) {
        for player in self.players.iter_mut() {
            player.pause();
        }
    }
}

fn load_still(rl: &mut RaylibHandle, thread: &RaylibThread, source: &str) -> Result<Texture2D> {
    if source.contains("://") {
        return Err(ShowcaseError::Texture {
            path: source.into(),
            message: "remote images are not supported, use a local file".to_string(),
        });
    }
    load_texture_with_exif_rotation(rl, thread, Path::new(source))
}
