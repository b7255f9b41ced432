use anyhow::{anyhow, Context};
use clap::Parser;
use log::{error, info};
use raylib::prelude::*;

mod config;
mod constants;
mod content;
mod controller;
mod engine;
mod error;
mod ffmpeg;
mod playback;
mod showcase;
mod state;
mod texture_loader;

use crate::config::{Args, ShowcaseOptions};
use crate::constants::*;
use crate::content::Catalog;
use crate::engine::Engine;
use crate::ffmpeg::FfmpegRecorder;
use crate::showcase::engine::ShowcaseEngine;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    // --- Load the catalog before opening any window ---
    let mut catalog = Catalog::load(&args.catalog)
        .with_context(|| format!("Cannot start without a catalog ({})", args.catalog.display()))?;
    if args.shuffle {
        catalog.shuffle();
    }
    let options = ShowcaseOptions::from(&args);
    let mut engine = ShowcaseEngine::new(catalog, options)?;

    let mut builder = raylib::init();
    builder
        .size(RENDER_WIDTH / 2, RENDER_HEIGHT / 2)
        .title("Flip Showcase")
        .vsync()
        .resizable();
    if !args.windowed {
        builder.fullscreen();
    }
    let (mut rl, thread) = builder.build();
    rl.set_target_fps(FPS);
    rl.set_trace_log(TraceLogLevel::LOG_ERROR);

    engine.initialize(&mut rl, &thread)?;

    let mut framebuffer = rl
        .load_render_texture(&thread, RENDER_WIDTH as u32, RENDER_HEIGHT as u32)
        .map_err(|e| anyhow!("Failed to create render texture: {e}"))?;

    let mut recorder = match &args.record {
        Some(path) => {
            info!("Recording to {}", path.display());
            Some(FfmpegRecorder::new(RENDER_WIDTH, RENDER_HEIGHT, FPS, &path.to_string_lossy())?)
        }
        None => None,
    };

    // --- Main Loop ---
    while !rl.window_should_close() {
        // A recording needs a steady clock, a live show follows the real one
        let dt = if recorder.is_some() { FRAME_TIME } else { rl.get_frame_time() };

        engine.handle_input(&mut rl);
        engine.render_frame(dt, &mut rl, &thread, &mut framebuffer);

        // Draw the framebuffer to the screen, flipped back upright
        let mut d = rl.begin_drawing(&thread);
        let sw = d.get_screen_width() as f32;
        let sh = d.get_screen_height() as f32;
        d.draw_texture_pro(
            &framebuffer,
            Rectangle::new(0.0, 0.0, framebuffer.width() as f32, -(framebuffer.height() as f32)),
            Rectangle::new(0.0, 0.0, sw, sh),
            Vector2::new(0.0, 0.0),
            0.0,
            Color::WHITE,
        );
        drop(d);

        if let Some(active) = recorder.as_mut() {
            let written = framebuffer
                .load_image()
                .map_err(|e| anyhow!("Failed to read back framebuffer: {e}"))
                .and_then(|image| active.write(&image).map_err(anyhow::Error::from));
            if let Err(e) = written {
                error!("Recording stopped: {:#}", e);
                recorder = None;
            }
        }
    }

    engine.teardown();
    // Dropping the recorder closes ffmpeg's stdin and waits for the file
    drop(recorder);
    Ok(())
}
