//! GameView: projects an engine [`Snapshot`] into a terminal framebuffer.
//!
//! The engine works in pixels; the view turns each rectangle back into a board column/row
//! and draws it `cell_w` x `cell_h` characters large. This module is pure (no I/O).

use crate::core::{PieceSnapshot, Snapshot};
use crate::fb::{CellStyle, FrameBuffer};
use crate::types::{Rgb, Step, Track};

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

const PLAYFIELD_BG: Rgb = Rgb::new(30, 30, 40);
const PANEL_BG: Rgb = Rgb::new(0, 0, 0);

/// A lightweight terminal renderer for the game.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 helps compensate for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
        }
    }

    /// Render a snapshot into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames and only resize when the terminal size
    /// changes.
    pub fn render_into(&self, snap: &Snapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().into_cell(' '));

        let board_w = snap.grid_width as u16 * self.cell_w;
        let board_h = snap.grid_height as u16 * self.cell_h;
        let frame_w = board_w + 2;
        let frame_h = board_h + 2;
        let start_x = viewport.width.saturating_sub(frame_w) / 2;
        let start_y = viewport.height.saturating_sub(frame_h) / 2;

        let bg = CellStyle::new(Rgb::new(80, 80, 90), PLAYFIELD_BG);
        fb.fill_rect(start_x + 1, start_y + 1, board_w, board_h, ' ', bg);
        self.draw_border(
            fb,
            start_x,
            start_y,
            frame_w,
            frame_h,
            CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG),
        );

        let origin = (start_x + 1, start_y + 1);
        for cell in &snap.cells {
            let (col, row) = snap.cell_position(&cell.rect);
            if cell.occupied {
                self.draw_block(fb, origin, snap, col, row, cell.color);
            } else {
                let dot = CellStyle {
                    dim: true,
                    ..CellStyle::new(Rgb::new(90, 90, 100), PLAYFIELD_BG)
                };
                self.fill_cell(fb, origin, col as u16, row as u16, '·', dot);
            }
        }

        if let Some(active) = &snap.active {
            for block in &active.blocks {
                let (col, row) = snap.cell_position(block);
                self.draw_block(fb, origin, snap, col, row, active.color);
            }
        }

        self.draw_side_panel(fb, snap, viewport, start_x + frame_w + 2, start_y);

        match snap.step {
            Step::Menu => {
                self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, "PRESS ENTER")
            }
            Step::Transition if snap.track == Track::Start => {
                self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, "READY")
            }
            Step::Transition | Step::GameOver => {
                self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, "GAME OVER")
            }
            _ => {}
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &Snapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
        if w < 2 || h < 2 {
            return;
        }

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    /// Draw one board block; anything outside the board (spawn rows above it) is skipped.
    fn draw_block(
        &self,
        fb: &mut FrameBuffer,
        origin: (u16, u16),
        snap: &Snapshot,
        col: i32,
        row: i32,
        color: Rgb,
    ) {
        if col < 0 || row < 0 || col >= snap.grid_width as i32 || row >= snap.grid_height as i32 {
            return;
        }
        let style = CellStyle {
            bold: true,
            ..CellStyle::new(color, PLAYFIELD_BG)
        };
        self.fill_cell(fb, origin, col as u16, row as u16, '█', style);
    }

    fn fill_cell(
        &self,
        fb: &mut FrameBuffer,
        origin: (u16, u16),
        col: u16,
        row: u16,
        ch: char,
        style: CellStyle,
    ) {
        let px = origin.0 + col * self.cell_w;
        let py = origin.1 + row * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &Snapshot,
        viewport: Viewport,
        panel_x: u16,
        start_y: u16,
    ) {
        if panel_x >= viewport.width || viewport.width - panel_x < 12 {
            return;
        }

        let label = CellStyle {
            bold: true,
            ..CellStyle::new(Rgb::new(220, 220, 220), PANEL_BG)
        };
        let value = CellStyle::new(Rgb::new(200, 200, 200), PANEL_BG);

        let mut y = start_y;
        fb.put_str(panel_x, y, "SCORE", label);
        fb.put_u64(panel_x, y + 1, snap.score, value);
        y += 3;

        fb.put_str(panel_x, y, "LEVEL", label);
        fb.put_u64(panel_x, y + 1, snap.level as u64, value);
        y += 3;

        fb.put_str(panel_x, y, "GRADE", label);
        fb.put_str(panel_x, y + 1, snap.grade, value);
        y += 3;

        fb.put_str(panel_x, y, "TIME", label);
        fb.put_str(panel_x, y + 1, &snap.run_time(), value);
        y += 3;

        if snap.combo > 1 {
            fb.put_str(panel_x, y, "COMBO", label);
            fb.put_u64(panel_x, y + 1, snap.combo as u64, value);
        }
        y += 3;

        fb.put_str(panel_x, y, "NEXT", label);
        if let Some(next) = &snap.next {
            self.draw_preview(fb, next, panel_x, y + 1);
        }
        y += 6;

        let dim = CellStyle { dim: true, ..value };
        fb.put_str(panel_x, y, "♪ ", dim);
        fb.put_str(panel_x + 2, y, snap.track.as_str(), dim);
    }

    /// Draw a catalog-sized piece, one character pair per block.
    fn draw_preview(&self, fb: &mut FrameBuffer, piece: &PieceSnapshot, x: u16, y: u16) {
        let style = CellStyle::new(piece.color, PANEL_BG);
        for block in &piece.blocks {
            if block.w <= 0 || block.x < 0 || block.y < 0 {
                continue;
            }
            let col = (block.x / block.w) as u16;
            let row = (block.y / block.w) as u16;
            fb.fill_rect(x + col * self.cell_w, y + row, self.cell_w, 1, '█', style);
        }
    }

    fn draw_overlay_text(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
        frame_h: u16,
        text: &str,
    ) {
        let mid_y = start_y.saturating_add(frame_h / 2);
        let text_w = text.chars().count() as u16;
        let x = start_x.saturating_add(frame_w.saturating_sub(text_w) / 2);
        let style = CellStyle {
            bold: true,
            ..CellStyle::new(Rgb::new(255, 255, 255), PANEL_BG)
        };
        fb.put_str(x, mid_y, text, style);
    }
}
