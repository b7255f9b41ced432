use std::io::{Read, Write};
use std::process::{Child, ChildStdin, Command, Stdio};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread::{self, JoinHandle};

use log::{debug, error, warn};
use raylib::prelude::*;

use crate::error::{Result, ShowcaseError};

/// Which part of the decoded picture a player wants.
///
/// The source is scaled to cover `canvas_width` x `canvas_height`, then the
/// vertical strip starting at `strip_x` and `strip_width` wide is kept. A
/// full-frame player uses `strip_x = 0` and `strip_width = canvas_width`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameGeometry {
    pub canvas_width: i32,
    pub canvas_height: i32,
    pub strip_x: i32,
    pub strip_width: i32,
}

impl FrameGeometry {
    pub fn full(width: i32, height: i32) -> Self {
        Self { canvas_width: width, canvas_height: height, strip_x: 0, strip_width: width }
    }

    pub fn frame_len(&self) -> usize {
        (self.strip_width * self.canvas_height * 4) as usize // RGBA
    }

    fn filter(&self, fps: u32) -> String {
        let (cw, ch) = (self.canvas_width, self.canvas_height);
        format!(
            "scale={cw}:{ch}:force_original_aspect_ratio=increase,crop={cw}:{ch},crop={}:{ch}:{}:0,fps={fps}",
            self.strip_width, self.strip_x
        )
    }
}

/// Builds the ffmpeg arguments that decode `source` to raw RGBA frames on stdout.
pub fn decoder_args(source: &str, geometry: &FrameGeometry, fps: u32, start: f32) -> Vec<String> {
    let mut args: Vec<String> = vec!["-loglevel".into(), "error".into()];
    args.extend(["-stream_loop".into(), "-1".into()]);
    args.extend(["-i".into(), source.to_string()]);
    // Output-side seek: decodes and drops frames, which stays correct on a looped input
    if start > 0.0 {
        args.extend(["-ss".into(), format!("{start:.3}")]);
    }
    args.extend(["-an".into()]);
    args.extend(["-vf".into(), geometry.filter(fps)]);
    args.extend(["-f".into(), "rawvideo".into()]);
    args.extend(["-pix_fmt".into(), "rgba".into()]);
    args.push("-".into());
    args
}

/// A running `ffmpeg` process streaming decoded frames of one video.
pub struct FfmpegDecoder {
    process: Child,
    frames: Option<Receiver<Vec<u8>>>,
    reader: Option<JoinHandle<()>>,
    exhausted: bool,
}

impl FfmpegDecoder {
    pub fn spawn(source: &str, geometry: FrameGeometry, fps: u32, start: f32, queue: usize) -> Result<Self> {
        let mut process = Command::new("ffmpeg")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .args(decoder_args(source, &geometry, fps, start))
            .spawn()
            .map_err(|e| ShowcaseError::Playback {
                source_locator: source.to_string(),
                message: format!("failed to start ffmpeg: {e}"),
            })?;

        let mut stdout = process
            .stdout
            .take()
            .ok_or_else(|| ShowcaseError::Decoder("ffmpeg stdout was not captured".to_string()))?;

        let (tx, rx) = mpsc::sync_channel(queue);
        let frame_len = geometry.frame_len();
        let label = source.to_string();
        let reader = thread::spawn(move || {
            let mut decoded = 0usize;
            loop {
                let mut frame = vec![0u8; frame_len];
                if stdout.read_exact(&mut frame).is_err() {
                    break;
                }
                decoded += 1;
                if tx.send(frame).is_err() {
                    break;
                }
            }
            if decoded == 0 {
                warn!("Decoder for {} produced no frames", label);
            } else {
                debug!("Decoder for {} stopped after {} frames", label, decoded);
            }
        });

        debug!("Started decoder for {} at {:.3}s ({:?})", source, start, geometry);
        Ok(Self { process, frames: Some(rx), reader: Some(reader), exhausted: false })
    }

    /// Next decoded frame if one is ready. Never blocks.
    pub fn try_frame(&mut self) -> Option<Vec<u8>> {
        let frames = self.frames.as_ref()?;
        match frames.try_recv() {
            Ok(frame) => Some(frame),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.exhausted = true;
                None
            }
        }
    }

    /// True once the process stopped producing frames for good.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }
}

impl Drop for FfmpegDecoder {
    fn drop(&mut self) {
        // Unblock the reader first so it can observe the closed channel
        self.frames = None;
        if let Err(e) = self.process.kill() {
            debug!("ffmpeg decoder already gone: {}", e);
        }
        let _ = self.process.wait();
        if let Some(reader) = self.reader.take() {
            let _ = reader.join();
        }
    }
}

/// Pipes rendered frames into an `ffmpeg` encoder to record the showcase.
pub struct FfmpegRecorder {
    process: Child,
    stdin: Option<ChildStdin>,
}

impl FfmpegRecorder {
    pub fn new(width: i32, height: i32, fps: u32, video_name: &str) -> Result<FfmpegRecorder> {
        let mut process = Command::new("ffmpeg")
            .stdin(Stdio::piped())
            .args(["-loglevel", "error"])
            .arg("-y")
            .args(["-f", "rawvideo"])
            .args(["-pixel_format", "rgba"])
            .args(["-video_size", &format!("{}x{}", width, height)])
            .args(["-framerate", &format!("{}", fps)])
            .args(["-i", "-"])
            .args(["-c:v", "libx264"])
            .args(["-pix_fmt", "yuv420p"])
            .arg(video_name)
            .spawn()
            .map_err(|e| ShowcaseError::Decoder(format!("failed to start ffmpeg encoder: {e}")))?;
        let stdin = process.stdin.take();
        Ok(FfmpegRecorder { process, stdin })
    }

    pub fn write(&mut self, image: &Image) -> Result<()> {
        let Some(stdin) = self.stdin.as_mut() else {
            return Err(ShowcaseError::Decoder("ffmpeg encoder stdin is closed".to_string()));
        };

        let width = image.width() as usize;
        let height = image.height() as usize;
        let row_len = width * 4; // 4 bytes per pixel (RGBA)
        let image_slice = unsafe {
            std::slice::from_raw_parts(image.data() as *const u8, row_len * height)
        };

        // raylib hands render textures over bottom row first, ffmpeg wants top row first
        for y in 0..height {
            let row_start = (height - 1 - y) * row_len;
            stdin
                .write_all(&image_slice[row_start..row_start + row_len])
                .map_err(|e| ShowcaseError::Decoder(format!("ffmpeg encoder rejected a frame: {e}")))?;
        }
        Ok(())
    }
}

impl Drop for FfmpegRecorder {
    fn drop(&mut self) {
        // Close stdin pipe and wait for ffmpeg to finish
        self.stdin = None;
        if let Err(e) = self.process.wait() {
            error!("Failed to wait for ffmpeg encoder: {}", e);
        }
    }
}
