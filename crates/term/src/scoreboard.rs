//! ScoreboardView: maps a `core` roster snapshot into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::RosterSnapshot;
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{Roll, FINAL_FRAME_INDEX, PIN_COUNT};

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

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdapterStatusView {
    pub enabled: bool,
    pub client_count: u16,
    pub controller_id: Option<usize>,
    pub streaming_count: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

/// A lightweight terminal renderer for the bowling score sheet.
pub struct ScoreboardView {
    /// Name column width in terminal columns.
    name_w: u16,
    /// Regular frame cell width (two rolls).
    frame_w: u16,
    /// Final frame cell width (up to three rolls).
    final_frame_w: u16,
    /// Total column width.
    total_w: u16,
    anchor_y: AnchorY,
}

impl Default for ScoreboardView {
    fn default() -> Self {
        // "X 1 7" needs five columns in the final frame; totals cap at 300.
        Self {
            name_w: 10,
            frame_w: 4,
            final_frame_w: 6,
            total_w: 5,
            anchor_y: AnchorY::Center,
        }
    }
}

impl ScoreboardView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Render the current roster into an existing framebuffer.
    ///
    /// This is the allocation-free hot path. Callers can reuse a framebuffer
    /// across frames and only resize when the terminal size changes.
    pub fn render_into(&self, snap: &RosterSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        self.render_into_with_adapter(snap, None, viewport, fb);
    }

    pub fn render_into_with_adapter(
        &self,
        snap: &RosterSnapshot,
        adapter: Option<&AdapterStatusView>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().into_cell(' '));

        let sheet_w = self.sheet_width();
        let rows = if snap.players.is_empty() {
            1
        } else {
            snap.players.len() as u16 * 3
        };
        let sheet_h = rows + 2;

        let start_x = viewport.width.saturating_sub(sheet_w) / 2;
        let start_y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(sheet_h + 2) / 2,
            AnchorY::Top => 0,
        };

        let border = CellStyle {
            fg: Rgb::new(200, 200, 200),
            bg: Rgb::new(0, 0, 0),
            bold: false,
            dim: false,
        };
        let header = CellStyle {
            fg: Rgb::new(220, 220, 220),
            bg: Rgb::new(0, 0, 0),
            bold: true,
            dim: false,
        };
        let plain = CellStyle::default();
        let dim = CellStyle { dim: true, ..plain };

        self.draw_border(fb, start_x, start_y, sheet_w, sheet_h, border);
        self.draw_header_row(fb, start_x + 1, start_y + 1, header, dim);

        for (idx, player) in snap.players.iter().enumerate() {
            let rolls_y = start_y + 2 + (idx as u16) * 3;
            let score_y = rolls_y + 1;
            let at_the_line = idx == snap.current_player && !snap.finished;

            self.draw_separators(fb, start_x + 1, rolls_y, dim);
            self.draw_separators(fb, start_x + 1, score_y, dim);

            let name_style = if at_the_line { header } else { plain };
            if at_the_line {
                fb.put_char(start_x + 1, rolls_y, '▶', name_style);
            }
            fb.put_str(start_x + 2, rolls_y, &player.name, name_style);

            for (frame_idx, frame) in player.frames.iter().enumerate() {
                let cell_x = self.frame_cell_x(start_x + 1, frame_idx);
                for slot in 0..frame.rolls.len() {
                    let glyph = roll_glyph(&frame.rolls, slot);
                    fb.put_char(cell_x + (slot as u16) * 2, rolls_y, glyph, plain);
                }
                if !frame.rolls.is_empty() {
                    fb.put_u32(cell_x, score_y, frame.score, dim);
                }
            }

            let total_style = if at_the_line { header } else { plain };
            fb.put_u32(self.total_cell_x(start_x + 1), rolls_y, player.total, total_style);
        }

        self.draw_status_rows(fb, adapter, start_x, start_y + sheet_h, dim, plain);

        if snap.finished && !snap.players.is_empty() {
            self.draw_overlay_text(fb, start_x, start_y, sheet_w, sheet_h, "GAME OVER");
            self.draw_winner_line(fb, snap, start_x, start_y, sheet_w, sheet_h, header);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &RosterSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    pub fn render_with_adapter(
        &self,
        snap: &RosterSnapshot,
        adapter: Option<&AdapterStatusView>,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into_with_adapter(snap, adapter, viewport, &mut fb);
        fb
    }

    /// Outer width of the sheet box: name column, nine regular frames, the
    /// final frame, the total column, plus separators and borders.
    fn sheet_width(&self) -> u16 {
        self.name_w
            + 9 * (self.frame_w + 1)
            + (self.final_frame_w + 1)
            + (self.total_w + 1)
            + 2
    }

    /// X of the first glyph column of frame `idx`, given the interior origin.
    fn frame_cell_x(&self, inner_x: u16, idx: usize) -> u16 {
        let base = inner_x + self.name_w + 1;
        if idx < FINAL_FRAME_INDEX {
            base + (idx as u16) * (self.frame_w + 1)
        } else {
            base + 9 * (self.frame_w + 1)
        }
    }

    fn total_cell_x(&self, inner_x: u16) -> u16 {
        inner_x + self.name_w + 1 + 9 * (self.frame_w + 1) + self.final_frame_w + 1
    }

    fn draw_separators(&self, fb: &mut FrameBuffer, inner_x: u16, y: u16, style: CellStyle) {
        for idx in 0..=FINAL_FRAME_INDEX {
            fb.put_char(self.frame_cell_x(inner_x, idx) - 1, y, '│', style);
        }
        fb.put_char(self.total_cell_x(inner_x) - 1, y, '│', style);
    }

    fn draw_header_row(
        &self,
        fb: &mut FrameBuffer,
        inner_x: u16,
        y: u16,
        header: CellStyle,
        dim: CellStyle,
    ) {
        self.draw_separators(fb, inner_x, y, dim);
        fb.put_str(inner_x + 1, y, "PLAYER", header);
        for idx in 0..=FINAL_FRAME_INDEX {
            fb.put_u32(self.frame_cell_x(inner_x, idx), y, idx as u32 + 1, header);
        }
        fb.put_str(self.total_cell_x(inner_x), y, "TOTAL", header);
    }

    fn draw_status_rows(
        &self,
        fb: &mut FrameBuffer,
        adapter: Option<&AdapterStatusView>,
        start_x: u16,
        below_y: u16,
        dim: CellStyle,
        plain: CellStyle,
    ) {
        fb.put_str(
            start_x + 1,
            below_y.saturating_add(1),
            "[SPACE] roll  [A] add player  [R] restart  [P] auto  [Q] quit",
            dim,
        );

        let y = below_y.saturating_add(2);
        match adapter {
            Some(st) if st.enabled => {
                fb.put_str(start_x + 1, y, "AI ON", plain);
                fb.put_str(start_x + 8, y, "C", dim);
                fb.put_u32(start_x + 10, y, u32::from(st.client_count), plain);
                fb.put_str(start_x + 13, y, "S", dim);
                fb.put_u32(start_x + 15, y, u32::from(st.streaming_count), plain);
                fb.put_str(start_x + 18, y, "CTRL", dim);
                if let Some(id) = st.controller_id {
                    fb.put_u32(start_x + 23, y, id as u32, plain);
                } else {
                    fb.put_str(start_x + 23, y, "-", plain);
                }
            }
            _ => fb.put_str(start_x + 1, y, "AI OFF", dim),
        }
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
            fg: Rgb::new(255, 255, 255),
            bg: Rgb::new(0, 0, 0),
            bold: true,
            dim: false,
        };
        fb.put_str(x, mid_y, text, style);
    }

    fn draw_winner_line(
        &self,
        fb: &mut FrameBuffer,
        snap: &RosterSnapshot,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
        frame_h: u16,
        style: CellStyle,
    ) {
        // Ties go to the earliest seat.
        let Some(leader) = snap
            .players
            .iter()
            .reduce(|best, p| if p.total > best.total { p } else { best })
        else {
            return;
        };

        // Name, a space, then up to three digits of total.
        let name_w = leader.name.chars().count() as u16;
        let text_w = name_w + 1 + digits_u32(leader.total);
        let x = start_x.saturating_add(frame_w.saturating_sub(text_w) / 2);
        let y = start_y.saturating_add(frame_h / 2).saturating_add(1);
        fb.put_str(x, y, &leader.name, style);
        // Blank the gap so score digits underneath don't bleed through.
        fb.put_char(x + name_w, y, ' ', style);
        fb.put_u32(x + name_w + 1, y, leader.total, style);
    }
}

fn digits_u32(value: u32) -> u16 {
    let mut n = 1;
    let mut v = value;
    while v >= 10 {
        v /= 10;
        n += 1;
    }
    n
}

/// Glyph for one roll: `X` strike, `/` spare-completing roll, `-` gutter.
///
/// The spare check looks at the previous roll on the same rack, so the third
/// roll of the last frame notates correctly too (`X4/`, `X-/`).
pub fn roll_glyph(rolls: &[Roll], slot: usize) -> char {
    let pins = rolls[slot];
    // The rack resets after a strike; any other predecessor shares it.
    let completes_spare =
        slot > 0 && rolls[slot - 1] != PIN_COUNT && rolls[slot - 1] + pins == PIN_COUNT;
    if completes_spare {
        '/'
    } else if pins == PIN_COUNT {
        'X'
    } else if pins == 0 {
        '-'
    } else {
        char::from(b'0' + pins)
    }
}

trait IntoCell {
    fn into_cell(self, ch: char) -> crate::fb::Cell;
}

impl IntoCell for CellStyle {
    fn into_cell(self, ch: char) -> crate::fb::Cell {
        crate::fb::Cell { ch, style: self }
    }
}
