use raylib::prelude::*;

use crate::constants::*;
use crate::content::{Catalog, ContentSource, MediaKind, Slot};

/// Side panel editing the caption of every slot.
pub struct Panel {
    pub open: bool,
    selected: usize,
    rows: usize,
}

impl Panel {
    pub fn new(entries: usize) -> Self {
        Self { open: false, selected: 0, rows: entries * 2 }
    }

    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn select_next(&mut self) {
        if self.rows > 0 {
            self.selected = (self.selected + 1) % self.rows;
        }
    }

    pub fn select_previous(&mut self) {
        if self.rows > 0 {
            self.selected = (self.selected + self.rows - 1) % self.rows;
        }
    }

    /// Entry index and slot of the selected row.
    pub fn selection(&self) -> (usize, Slot) {
        row_target(self.selected)
    }

    pub fn type_char(&self, catalog: &mut Catalog, c: char) {
        let (index, slot) = self.selection();
        let mut caption = current_caption(catalog, index, slot);
        caption.push(c);
        catalog.set_caption(index, slot, caption);
    }

    pub fn backspace(&self, catalog: &mut Catalog) {
        let (index, slot) = self.selection();
        let mut caption = current_caption(catalog, index, slot);
        if caption.pop().is_some() {
            catalog.set_caption(index, slot, caption);
        }
    }

    pub fn draw(&self, catalog: &Catalog, d: &mut RaylibDrawHandle) {
        if !self.open {
            return;
        }

        let x = RENDER_WIDTH - PANEL_WIDTH;
        let row_height = PANEL_FONT_SIZE + 16;
        d.draw_rectangle(x, 0, PANEL_WIDTH, RENDER_HEIGHT, Color::new(10, 10, 14, 230));
        d.draw_text("CAPTIONS", x + 24, 24, PANEL_FONT_SIZE + 4, Color::WHITE);
        d.draw_text(
            "Up/Down select, type to edit, Backspace delete, Tab close",
            x + 24,
            24 + PANEL_FONT_SIZE + 12,
            PANEL_FONT_SIZE - 6,
            Color::GRAY,
        );

        let top = 24 + 2 * (PANEL_FONT_SIZE + 16);
        for row in 0..self.rows {
            let (index, slot) = row_target(row);
            let Some(entry) = catalog.get(index) else {
                continue;
            };
            let media = entry.slot(slot);
            let y = top + row as i32 * row_height;
            if row == self.selected {
                d.draw_rectangle(x + 12, y - 6, PANEL_WIDTH - 24, row_height, Color::new(255, 255, 255, 40));
            }

            let kind = match media.kind {
                MediaKind::Image => "img",
                MediaKind::Video => "vid",
            };
            let caption = media.caption.as_deref().unwrap_or("");
            let cursor = if row == self.selected { "_" } else { "" };
            d.draw_text(
                &format!("{} [{}] {}{}", row_label(row), kind, caption, cursor),
                x + 24,
                y,
                PANEL_FONT_SIZE,
                Color::WHITE,
            );
        }
    }
}

/// `1a`, `1b`, `2a`, ...
pub fn row_label(row: usize) -> String {
    let (index, slot) = row_target(row);
    let letter = match slot {
        Slot::Primary => 'a',
        Slot::Secondary => 'b',
    };
    format!("{}{}", index + 1, letter)
}

fn row_target(row: usize) -> (usize, Slot) {
    let slot = if row % 2 == 0 { Slot::Primary } else { Slot::Secondary };
    (row / 2, slot)
}

fn current_caption(catalog: &Catalog, index: usize, slot: Slot) -> String {
    catalog
        .get(index)
        .and_then(|entry| entry.slot(slot).caption.clone())
        .unwrap_or_default()
}
