use log::info;
use raylib::prelude::*;

use crate::config::ShowcaseOptions;
use crate::constants::*;
use crate::content::{active_entry, Catalog, ContentSource};
use crate::controller::{Flip, TransitionController};
use crate::error::Result;
use crate::playback::PhaseLock;
use crate::ffmpeg::FrameGeometry;
use crate::showcase::layout::{cell_geometries, cell_rect, flip_coverage, shifted_clip, wrap_text};
use crate::showcase::lineup::{EntryMedia, Lineup};
use crate::showcase::media::SlotMedia;
use crate::showcase::panel::Panel;
use crate::state::{Direction, TransitionState};

/// View root of the showcase. Owns the catalog, the transition controller
/// and every media player, from `initialize` until `teardown`.
pub struct ShowcaseEngine {
    catalog: Catalog,
    controller: TransitionController,
    options: ShowcaseOptions,
    lineup: Lineup<SlotMedia>,
    panel: Panel,
    lock: PhaseLock,
    primary_region: Rectangle,
    secondary_region: Rectangle,
}

impl ShowcaseEngine {
    pub fn new(catalog: Catalog, options: ShowcaseOptions) -> Result<Self> {
        let controller = TransitionController::new(catalog.count(), options.flip_duration, options.interval)?;
        let half = (RENDER_WIDTH / 2) as f32;
        Ok(Self {
            panel: Panel::new(catalog.count()),
            catalog,
            controller,
            options,
            lineup: Lineup::new(options.slide_duration),
            lock: PhaseLock::new(SYNC_TOLERANCE),
            primary_region: Rectangle::new(0.0, 0.0, half, RENDER_HEIGHT as f32),
            secondary_region: Rectangle::new(half, 0.0, RENDER_WIDTH as f32 - half, RENDER_HEIGHT as f32),
        })
    }

    pub fn state(&self) -> &TransitionState {
        self.controller.state()
    }

    fn on_flip(&mut self, flip: Flip) {
        info!("Showing entry {} of {}", flip.to + 1, self.catalog.count());
        self.lineup.on_flip(&flip);
    }

    fn update(&mut self, dt: f32) {
        if let Some(flip) = self.controller.tick(dt) {
            self.on_flip(flip);
        }

        let active = self.controller.state().active_index;
        self.lineup.update_stage(dt, active);

        for entry in self.lineup.entries_mut() {
            entry.primary.update(dt, &self.lock);
            entry.secondary.update(dt, &self.lock);
        }
    }

    fn draw(&self, d: &mut RaylibDrawHandle) {
        d.clear_background(Color::new(17, 24, 39, 255));

        let stage = self.lineup.stage();
        if let Some(outgoing) = &stage.outgoing {
            self.draw_primary_layer(d, outgoing.layer, outgoing.offset);
        }
        let incoming = &stage.incoming;
        self.draw_primary_layer(d, incoming.layer, incoming.offset);
        self.draw_secondary(d);

        // Border between the two regions
        let half = RENDER_WIDTH / 2;
        d.draw_rectangle(half - 4, 0, 8, RENDER_HEIGHT, Color::BLACK);

        if let Ok(entry) = active_entry(&self.catalog, self.state()) {
            if let Some(header) = entry.primary.caption.as_deref() {
                self.draw_header(d, header);
            }
            if let Some(caption) = entry.secondary.caption.as_deref() {
                let x = self.secondary_region.x as i32 + 32;
                let y = RENDER_HEIGHT - 32 - CAPTION_FONT_SIZE;
                d.draw_text(caption, x + 2, y + 2, CAPTION_FONT_SIZE, Color::BLACK);
                d.draw_text(caption, x, y, CAPTION_FONT_SIZE, Color::WHITE);
            }
        }
        self.draw_position(d);

        self.panel.draw(&self.catalog, d);
    }

    fn draw_primary_layer(&self, d: &mut RaylibDrawHandle, layer: usize, offset: f32) {
        let Some((texture, source)) = self.lineup.entry(layer).and_then(|e| e.primary.strip(0)) else {
            return;
        };
        if let Some((source, dest)) = shifted_clip(self.primary_region, source, offset) {
            d.draw_texture_pro(texture, source, dest, Vector2::new(0.0, 0.0), 0.0, Color::WHITE);
        }
    }

    fn draw_secondary(&self, d: &mut RaylibDrawHandle) {
        let cells = self.options.cells;
        let state = self.state();
        let Some(entry) = self.lineup.entry(state.active_index) else {
            return;
        };

        for i in 0..cells {
            let cell = cell_rect(self.secondary_region, cells, i);
            if let Some((texture, source)) = entry.secondary.strip(i) {
                d.draw_texture_pro(texture, source, cell, Vector2::new(0.0, 0.0), 0.0, Color::WHITE);
            }

            let Some(elapsed) = state.flight_elapsed() else {
                continue;
            };
            let coverage = flip_coverage(elapsed, i, cells, CELL_STAGGER, self.controller.flip_duration());
            if coverage > 0.0 {
                let width = cell.width * coverage;
                d.draw_rectangle(
                    (cell.x + (cell.width - width) * 0.5) as i32,
                    cell.y as i32,
                    width.ceil() as i32,
                    cell.height as i32,
                    Color::BLACK,
                );
            }
        }
    }

    fn draw_header(&self, d: &mut RaylibDrawHandle, header: &str) {
        let max_chars = (self.primary_region.width as i32 - 96) / (HEADER_FONT_SIZE / 2);
        let lines = wrap_text(header, max_chars.max(1) as usize);
        let line_height = HEADER_FONT_SIZE + 8;
        let mut y = (RENDER_HEIGHT - line_height * lines.len() as i32) / 2;
        for line in lines {
            d.draw_text(&line, 50, y + 3, HEADER_FONT_SIZE, Color::BLACK);
            d.draw_text(&line, 48, y, HEADER_FONT_SIZE, Color::WHITE);
            y += line_height;
        }
    }

    // One dot per entry under the header, the active one filled
    fn draw_position(&self, d: &mut RaylibDrawHandle) {
        let active = self.state().active_index;
        let y = RENDER_HEIGHT - 48;
        for i in 0..self.catalog.count() {
            let x = 48 + i as i32 * 28;
            if i == active {
                d.draw_circle(x, y, 8.0, Color::WHITE);
            } else {
                d.draw_circle_lines(x, y, 8.0, Color::WHITE);
            }
        }
    }
}

impl crate::engine::Engine for ShowcaseEngine {
    fn initialize(&mut self, rl: &mut RaylibHandle, thread: &RaylibThread) -> Result<()> {
        let primary = [FrameGeometry::full(self.primary_region.width as i32, self.primary_region.height as i32)];
        let strips = cell_geometries(self.secondary_region, self.options.cells);

        for (index, entry) in self.catalog.entries().iter().enumerate() {
            let media = EntryMedia {
                primary: SlotMedia::load(
                    rl,
                    thread,
                    format!("entry {} primary", index + 1),
                    &entry.primary,
                    self.options.compact,
                    &primary,
                ),
                secondary: SlotMedia::load(
                    rl,
                    thread,
                    format!("entry {} secondary", index + 1),
                    &entry.secondary,
                    self.options.compact,
                    &strips,
                ),
            };
            self.lineup.push(media);
        }

        self.controller.start();
        let active = self.state().active_index;
        self.lineup.start(active);
        Ok(())
    }

    fn handle_input(&mut self, rl: &mut RaylibHandle) {
        if rl.is_key_pressed(KeyboardKey::KEY_TAB) {
            self.panel.toggle();
        }

        if self.panel.open {
            if rl.is_key_pressed(KeyboardKey::KEY_DOWN) {
                self.panel.select_next();
            }
            if rl.is_key_pressed(KeyboardKey::KEY_UP) {
                self.panel.select_previous();
            }
            if rl.is_key_pressed(KeyboardKey::KEY_BACKSPACE) {
                self.panel.backspace(&mut self.catalog);
            }
            while let Some(c) = rl.get_char_pressed() {
                if !c.is_control() {
                    self.panel.type_char(&mut self.catalog, c);
                }
            }
            return;
        }

        // Typed characters are only meant for the panel
        while rl.get_char_pressed().is_some() {}

        if rl.is_key_pressed(KeyboardKey::KEY_RIGHT) || rl.is_key_pressed(KeyboardKey::KEY_SPACE) {
            self.controller.request_transition(Direction::Forward);
        }
        if rl.is_key_pressed(KeyboardKey::KEY_LEFT) {
            self.controller.request_transition(Direction::Backward);
        }
    }

    fn render_frame(&mut self, dt: f32, rl: &mut RaylibHandle, thread: &RaylibThread, framebuffer: &mut RenderTexture2D) {
        self.update(dt);

        rl.draw_texture_mode(thread, framebuffer, |mut tmd| {
            let mut d = tmd.begin_drawing(thread);
            self.draw(&mut d);
        });
    }

    fn teardown(&mut self) {
        self.controller.teardown();
        self.lineup.pause_all();
        info!("Showcase stopped");
    }
}
