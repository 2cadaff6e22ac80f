//! GameView: maps `core::GameState` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.
//!
//! Each board cell is two columns wide and one row tall. Blocks are drawn
//! with upper-half glyphs, so every cell shows a 2x2 grid of colors: enough
//! for the bevel shading of solid shapes and a coarse sample of pixel art.

use crate::core::rng::RandomSource;
use crate::core::{Board, GameState, Paint, ShapeDefinition};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::Rect;

const UPPER_HALF: char = '▀';
const PLAY_BG: Rgb = Rgb::new(30, 30, 40);
const GRID_FG: Rgb = Rgb::new(90, 90, 100);

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
pub enum AnchorY {
    Center,
    Top,
}

/// A lightweight terminal renderer for the game.
#[derive(Debug, Clone)]
pub struct GameView {
    anchor_y: AnchorY,
    show_debug: bool,
}

impl Default for GameView {
    fn default() -> Self {
        Self {
            anchor_y: AnchorY::Center,
            show_debug: false,
        }
    }
}

/// Status word for the side panel.
pub fn status_label<R: RandomSource>(game: &GameState<R>) -> &'static str {
    if game.game_over() {
        "game over"
    } else if game.paused() {
        "paused"
    } else if game.running() {
        "running"
    } else {
        "ready"
    }
}

impl GameView {
    /// Board cell width in terminal columns.
    pub const CELL_W: u16 = 2;

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    pub fn with_debug(mut self, show: bool) -> Self {
        self.show_debug = show;
        self
    }

    pub fn show_debug(&self) -> bool {
        self.show_debug
    }

    pub fn toggle_debug(&mut self) {
        self.show_debug = !self.show_debug;
    }

    /// Terminal area covered by the play field (inside the border).
    ///
    /// Pointer input is hit-tested against this rectangle.
    pub fn board_rect(&self, board: &Board, viewport: Viewport) -> Rect {
        let w = (board.cols() as u16).saturating_mul(Self::CELL_W);
        let h = board.rows() as u16;
        let frame_w = w.saturating_add(2);
        let frame_h = h.saturating_add(2);
        let start_x = viewport.width.saturating_sub(frame_w) / 2;
        let start_y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
            AnchorY::Top => 0,
        };
        Rect::new(start_x + 1, start_y + 1, w, h)
    }

    /// Render the current game state into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames and only resize when the
    /// terminal size changes.
    pub fn render_into<R: RandomSource>(
        &self,
        game: &GameState<R>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().cell(' '));

        let area = self.board_rect(game.board(), viewport);
        let bg = CellStyle {
            dim: true,
            ..CellStyle::new(GRID_FG, PLAY_BG)
        };
        let border = CellStyle::new(Rgb::new(200, 200, 200), Rgb::BLACK);

        fb.fill_rect(area.x, area.y, area.w, area.h, ' ', bg);
        draw_border(
            fb,
            area.x.saturating_sub(1),
            area.y.saturating_sub(1),
            area.w + 2,
            area.h + 2,
            border,
        );

        // The board stays hidden while paused.
        if !game.paused() {
            self.draw_board(fb, game, area);
            self.draw_active(fb, game, area);
        }

        let panel_x = area.x.saturating_add(area.w).saturating_add(3);
        let y = self.draw_side_panel(fb, game, viewport, panel_x, area.y.saturating_sub(1));
        if self.show_debug {
            self.draw_debug_panel(fb, game, viewport, panel_x, y.saturating_add(1));
        }

        let overlay = if game.game_over() {
            Some("GAME OVER")
        } else if game.paused() {
            Some("PAUSED")
        } else if !game.running() {
            Some("PRESS ENTER")
        } else {
            None
        };
        if let Some(text) = overlay {
            draw_overlay_text(fb, area, text);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render<R: RandomSource>(&self, game: &GameState<R>, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(game, viewport, &mut fb);
        fb
    }

    fn draw_board<R: RandomSource>(&self, fb: &mut FrameBuffer, game: &GameState<R>, area: Rect) {
        let board = game.board();
        let shapes = game.shapes();
        for y in 0..board.rows() {
            for x in 0..board.cols() {
                let (px, py) = cell_origin(area, x, y);
                match board.get(x as i32, y as i32).flatten() {
                    Some(block) => match shapes.get(block.shape as usize) {
                        Some(shape) => {
                            let quad = block_colors(
                                shape,
                                block.rotation as usize,
                                block.cell_x as usize,
                                block.cell_y as usize,
                            );
                            draw_quad(fb, px, py, quad);
                        }
                        None => draw_quad(fb, px, py, [Rgb::WHITE; 4]),
                    },
                    None => {
                        let dot = CellStyle {
                            dim: true,
                            ..CellStyle::new(GRID_FG, PLAY_BG)
                        };
                        fb.put_char(px, py, '·', dot);
                    }
                }
            }
        }
    }

    fn draw_active<R: RandomSource>(&self, fb: &mut FrameBuffer, game: &GameState<R>, area: Rect) {
        let (Some(active), Some(shape)) = (game.active(), game.active_shape()) else {
            return;
        };
        let board = game.board();
        let in_board = |x: i32, y: i32| {
            x >= 0 && y >= 0 && (x as usize) < board.cols() && (y as usize) < board.rows()
        };

        // Glow tints the empty cells around the piece.
        if shape.style.glow.enabled && shape.style.glow.strength > 0.0 {
            let tint = mix(PLAY_BG, shape.color, shape.style.glow.strength * 0.5);
            for ((bx, by), _) in active.blocks(shape) {
                for (nx, ny) in [(bx - 1, by), (bx + 1, by), (bx, by - 1), (bx, by + 1)] {
                    if in_board(nx, ny) && !board.is_occupied(nx, ny) {
                        let (px, py) = cell_origin(area, nx as usize, ny as usize);
                        let style = CellStyle::new(GRID_FG, tint);
                        fb.fill_rect(px, py, GameView::CELL_W, 1, ' ', style);
                    }
                }
            }
        }

        // Cells above row 0 are not drawn.
        for ((bx, by), (cx, cy)) in active.blocks(shape) {
            if in_board(bx, by) {
                let (px, py) = cell_origin(area, bx as usize, by as usize);
                draw_quad(fb, px, py, block_colors(shape, active.rotation, cx, cy));
            }
        }
    }

    /// Returns the row below the last line written.
    fn draw_side_panel<R: RandomSource>(
        &self,
        fb: &mut FrameBuffer,
        game: &GameState<R>,
        viewport: Viewport,
        panel_x: u16,
        start_y: u16,
    ) -> u16 {
        if panel_x >= viewport.width || viewport.width - panel_x < 12 {
            return start_y;
        }

        let label = CellStyle {
            bold: true,
            ..CellStyle::default()
        };
        let value = CellStyle::new(Rgb::new(200, 200, 200), Rgb::BLACK);

        let mut y = start_y;
        for (name, number) in [
            ("SCORE", game.score()),
            ("LINES", game.lines()),
            ("LEVEL", game.level()),
        ] {
            fb.put_str(panel_x, y, name, label);
            fb.put_u32(panel_x, y + 1, number, value);
            y = y.saturating_add(3);
        }

        fb.put_str(panel_x, y, "STATUS", label);
        fb.put_str(panel_x, y + 1, status_label(game), value);
        y = y.saturating_add(3);

        fb.put_str(panel_x, y, "SHAPE", label);
        let name = game.active_shape().map_or("-", |s| s.name.as_str());
        fb.put_str(panel_x, y + 1, name, value);
        y = y.saturating_add(3);

        fb.put_str(panel_x, y, "NEXT", label);
        y = y.saturating_add(1);
        if let Some(next) = game.next_shape() {
            let silhouette = CellStyle::new(next.color, Rgb::BLACK);
            let matrix = next.rotation(0);
            for (row_idx, row) in matrix.rows().enumerate() {
                for (col_idx, &filled) in row.iter().enumerate() {
                    if filled {
                        let x = panel_x.saturating_add(col_idx as u16 * GameView::CELL_W);
                        fb.put_str(x, y + row_idx as u16, "██", silhouette);
                    }
                }
            }
            y = y.saturating_add(matrix.height() as u16);
        }
        y.saturating_add(1)
    }

    fn draw_debug_panel<R: RandomSource>(
        &self,
        fb: &mut FrameBuffer,
        game: &GameState<R>,
        viewport: Viewport,
        panel_x: u16,
        start_y: u16,
    ) {
        if panel_x >= viewport.width {
            return;
        }
        let label = CellStyle {
            bold: true,
            ..CellStyle::new(Rgb::new(140, 200, 255), Rgb::BLACK)
        };
        let value = CellStyle {
            dim: true,
            ..CellStyle::default()
        };
        let diag = game.diagnostics();

        let mut y = start_y;
        fb.put_str(panel_x, y, "DEBUG", label);
        y += 1;
        fb.put_str(panel_x, y, diag.zone.label(), value);
        y += 1;
        let difficulty = diag
            .active_difficulty
            .map_or_else(|| "-".to_string(), |d| format!("{d}"));
        fb.put_str(panel_x, y, &format!("difficulty {difficulty}"), value);
        y += 1;
        fb.put_str(
            panel_x,
            y,
            &format!("{} ms/row (level {})", diag.drop_interval_ms, diag.level),
            value,
        );
        y += 1;
        fb.put_str(
            panel_x,
            y,
            &format!("lock {} ms", diag.lock_threshold_ms),
            value,
        );
    }
}

/// Top-left terminal position of board cell `(x, y)`.
fn cell_origin(area: Rect, x: usize, y: usize) -> (u16, u16) {
    (
        area.x.saturating_add(x as u16 * GameView::CELL_W),
        area.y.saturating_add(y as u16),
    )
}

/// Colors of the four quadrants of a block: top-left, top-right, bottom-left,
/// bottom-right.
pub fn block_colors(
    shape: &ShapeDefinition,
    rotation: usize,
    cell_x: usize,
    cell_y: usize,
) -> [Rgb; 4] {
    match &shape.paint {
        Paint::Solid(base) => [
            *base,
            shape.style.shade_top_right,
            shape.style.shade_bottom_left,
            *base,
        ],
        Paint::Pixels { scale, .. } => {
            // Sample the middle of each quadrant of the block's pixel square.
            let k = *scale;
            let at = |qx: usize, qy: usize| {
                let px = (2 * qx + 1) * k / 4;
                let py = (2 * qy + 1) * k / 4;
                shape
                    .paint
                    .pixel(rotation, cell_x, cell_y, px, py)
                    .unwrap_or(shape.color)
            };
            [at(0, 0), at(1, 0), at(0, 1), at(1, 1)]
        }
    }
}

fn draw_quad(fb: &mut FrameBuffer, x: u16, y: u16, [tl, tr, bl, br]: [Rgb; 4]) {
    fb.put_char(x, y, UPPER_HALF, CellStyle::new(tl, bl));
    fb.put_char(x.saturating_add(1), y, UPPER_HALF, CellStyle::new(tr, br));
}

fn mix(a: Rgb, b: Rgb, t: f64) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let lerp = |x: u8, y: u8| (x as f64 + (y as f64 - x as f64) * t).round() as u8;
    Rgb::new(lerp(a.r, b.r), lerp(a.g, b.g), lerp(a.b, b.b))
}

fn draw_border(fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
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

fn draw_overlay_text(fb: &mut FrameBuffer, area: Rect, text: &str) {
    let mid_y = area.y.saturating_add(area.h / 2);
    let text_w = text.chars().count() as u16;
    let x = area.x.saturating_add(area.w.saturating_sub(text_w) / 2);
    let style = CellStyle {
        bold: true,
        ..CellStyle::new(Rgb::WHITE, Rgb::BLACK)
    };
    fb.put_str(x, mid_y, text, style);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{RawShape, RotationSpec, Sequence, ShapeRegistry};
    use crate::types::{GameConfig, InputEvent, Intent};

    fn game() -> GameState<Sequence> {
        let shapes = ShapeRegistry::load(
            &[RawShape::new("o", ["XX", "XX"])
                .with_name("Block")
                .with_color("#ff0000")
                .with_rotation(RotationSpec::Fixed)],
            10,
        )
        .unwrap();
        GameState::new(shapes, GameConfig::default(), Sequence::new([0.5])).unwrap()
    }

    fn screen_contains(fb: &FrameBuffer, needle: &str) -> bool {
        (0..fb.height()).any(|y| fb.row_text(y).contains(needle))
    }

    #[test]
    fn test_board_rect_is_centered() {
        let view = GameView::default();
        let g = game();
        let rect = view.board_rect(g.board(), Viewport::new(80, 30));
        assert_eq!(rect, Rect::new(30, 5, 20, 20));
    }

    #[test]
    fn test_ready_screen_shows_panel_and_overlay() {
        let view = GameView::default();
        let fb = view.render(&game(), Viewport::new(80, 30));
        assert!(screen_contains(&fb, "SCORE"));
        assert!(screen_contains(&fb, "ready"));
        assert!(screen_contains(&fb, "Block"));
        assert!(screen_contains(&fb, "PRESS ENTER"));
        assert!(!screen_contains(&fb, "DEBUG"));
    }

    #[test]
    fn test_active_piece_drawn_once_visible() {
        let view = GameView::default();
        let mut g = game();
        g.start();
        g.tick(850);
        g.tick(850);
        let vp = Viewport::new(80, 30);
        let fb = view.render(&g, vp);
        let rect = view.board_rect(g.board(), vp);
        // The block piece sits at columns 4-5, rows 0-1.
        let (px, py) = cell_origin(rect, 4, 0);
        let cell = fb.get(px, py).unwrap();
        assert_eq!(cell.ch, UPPER_HALF);
        assert_eq!(cell.style.fg, Rgb::new(255, 0, 0));
        assert!(!screen_contains(&fb, "PRESS ENTER"));
    }

    #[test]
    fn test_paused_hides_board() {
        let view = GameView::default();
        let mut g = game();
        g.start();
        g.tick(850);
        g.tick(850);
        g.apply(InputEvent::keyboard(Intent::Pause));
        let vp = Viewport::new(80, 30);
        let fb = view.render(&g, vp);
        let rect = view.board_rect(g.board(), vp);
        let (px, py) = cell_origin(rect, 4, 0);
        assert_ne!(fb.get(px, py).unwrap().ch, UPPER_HALF);
        assert!(screen_contains(&fb, "PAUSED"));
    }

    #[test]
    fn test_debug_panel() {
        let view = GameView::default().with_debug(true);
        let fb = view.render(&game(), Viewport::new(100, 40));
        assert!(screen_contains(&fb, "DEBUG"));
        assert!(screen_contains(&fb, "normal"));
        assert!(screen_contains(&fb, "850 ms/row (level 1)"));
    }

    #[test]
    fn test_solid_block_bevel() {
        let g = game();
        let shape = &g.shapes().shapes()[0];
        let [tl, tr, bl, br] = block_colors(shape, 0, 0, 0);
        assert_eq!(tl, Rgb::new(255, 0, 0));
        assert_eq!(br, tl);
        assert_eq!(tr, shape.style.shade_top_right);
        assert_eq!(bl, shape.style.shade_bottom_left);
    }

    #[test]
    fn test_mix() {
        assert_eq!(mix(Rgb::BLACK, Rgb::WHITE, 0.0), Rgb::BLACK);
        assert_eq!(mix(Rgb::BLACK, Rgb::WHITE, 1.0), Rgb::WHITE);
        assert_eq!(mix(Rgb::BLACK, Rgb::new(200, 100, 0), 0.5), Rgb::new(100, 50, 0));
    }

    #[test]
    fn test_tiny_viewport_does_not_panic() {
        let view = GameView::default().with_debug(true);
        let fb = view.render(&game(), Viewport::new(5, 3));
        assert_eq!(fb.width(), 5);
    }
}
