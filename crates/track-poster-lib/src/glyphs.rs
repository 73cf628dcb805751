//! Built-in block font used when no TrueType font is registered
//!
//! Each glyph is 7 rows tall; `#` marks an inked cell. Lowercase letters are drawn with their
//! uppercase glyph, and characters without a glyph advance like a space.

use plotters::style::Color;
use plotters_backend::{BackendCoord, BackendStyle, DrawingBackend, DrawingErrorKind};

/// Glyph height in cells
pub const GLYPH_ROWS: usize = 7;
/// Advance of a space (and of unknown characters) in cells
const SPACE_CELLS: i32 = 3;
/// Cap height of a font is roughly this share of its nominal size
const CAP_HEIGHT_RATIO: f64 = 0.7;

type Glyph = [&'static str; GLYPH_ROWS];

#[rustfmt::skip]
const GLYPHS: &[(char, Glyph)] = &[
    ('A', [".###.", "#...#", "#...#", "#####", "#...#", "#...#", "#...#"]),
    ('B', ["####.", "#...#", "#...#", "####.", "#...#", "#...#", "####."]),
    ('C', [".###.", "#...#", "#....", "#....", "#....", "#...#", ".###."]),
    ('D', ["###..", "#..#.", "#...#", "#...#", "#...#", "#..#.", "###.."]),
    ('E', ["#####", "#....", "#....", "####.", "#....", "#....", "#####"]),
    ('F', ["#####", "#....", "#....", "####.", "#....", "#....", "#...."]),
    ('G', [".###.", "#...#", "#....", "#.###", "#...#", "#...#", ".####"]),
    ('H', ["#...#", "#...#", "#...#", "#####", "#...#", "#...#", "#...#"]),
    ('I', ["###", ".#.", ".#.", ".#.", ".#.", ".#.", "###"]),
    ('J', ["..###", "...#.", "...#.", "...#.", "...#.", "#..#.", ".##.."]),
    ('K', ["#...#", "#..#.", "#.#..", "##...", "#.#..", "#..#.", "#...#"]),
    ('L', ["#....", "#....", "#....", "#....", "#....", "#....", "#####"]),
    ('M', ["#...#", "##.##", "#.#.#", "#...#", "#...#", "#...#", "#...#"]),
    ('N', ["#...#", "##..#", "#.#.#", "#..##", "#...#", "#...#", "#...#"]),
    ('O', [".###.", "#...#", "#...#", "#...#", "#...#", "#...#", ".###."]),
    ('P', ["####.", "#...#", "#...#", "####.", "#....", "#....", "#...."]),
    ('Q', [".###.", "#...#", "#...#", "#...#", "#.#.#", "#..#.", ".##.#"]),
    ('R', ["####.", "#...#", "#...#", "####.", "#.#..", "#..#.", "#...#"]),
    ('S', [".####", "#....", "#....", ".###.", "....#", "....#", "####."]),
    ('T', ["#####", "..#..", "..#..", "..#..", "..#..", "..#..", "..#.."]),
    ('U', ["#...#", "#...#", "#...#", "#...#", "#...#", "#...#", ".###."]),
    ('V', ["#...#", "#...#", "#...#", "#...#", ".#.#.", ".#.#.", "..#.."]),
    ('W', ["#...#", "#...#", "#...#", "#...#", "#.#.#", "##.##", "#...#"]),
    ('X', ["#...#", "#...#", ".#.#.", "..#..", ".#.#.", "#...#", "#...#"]),
    ('Y', ["#...#", "#...#", ".#.#.", "..#..", "..#..", "..#..", "..#.."]),
    ('Z', ["#####", "....#", "...#.", "..#..", ".#...", "#....", "#####"]),
    ('0', [".###.", "#...#", "#..##", "#.#.#", "##..#", "#...#", ".###."]),
    ('1', [".#.", "##.", ".#.", ".#.", ".#.", ".#.", "###"]),
    ('2', [".###.", "#...#", "....#", "...#.", "..#..", ".#...", "#####"]),
    ('3', ["####.", "....#", "....#", "..##.", "....#", "....#", "####."]),
    ('4', ["...#.", "..##.", ".#.#.", "#..#.", "#####", "...#.", "...#."]),
    ('5', ["#####", "#....", "####.", "....#", "....#", "#...#", ".###."]),
    ('6', [".###.", "#...#", "#....", "####.", "#...#", "#...#", ".###."]),
    ('7', ["#####", "....#", "...#.", "..#..", ".#...", ".#...", ".#..."]),
    ('8', [".###.", "#...#", "#...#", ".###.", "#...#", "#...#", ".###."]),
    ('9', [".###.", "#...#", "#...#", ".####", "....#", "#...#", ".###."]),
    ('.', [".", ".", ".", ".", ".", ".", "#"]),
    (',', ["..", "..", "..", "..", "..", ".#", "#."]),
    (':', [".", "#", ".", ".", ".", "#", "."]),
    ('\'', ["#", "#", ".", ".", ".", ".", "."]),
    ('!', ["#", "#", "#", "#", "#", ".", "#"]),
    ('?', [".###.", "#...#", "....#", "...#.", "..#..", ".....", "..#.."]),
    ('-', ["...", "...", "...", "###", "...", "...", "..."]),
    ('/', ["..#", "..#", ".#.", ".#.", ".#.", "#..", "#.."]),
    ('(', ["..#", ".#.", "#..", "#..", "#..", ".#.", "..#"]),
    (')', ["#..", ".#.", "..#", "..#", "..#", ".#.", "#.."]),
    ('•', ["...", "...", ".#.", "###", ".#.", "...", "..."]),
];

fn glyph(ch: char) -> Option<&'static Glyph> {
    let upper = ch.to_ascii_uppercase();
    GLYPHS.iter().find(|(c, _)| *c == upper).map(|(_, g)| g)
}

/// Advance of one character in cells, including the one-cell gap after a glyph
fn advance(ch: char) -> i32 {
    match glyph(ch) {
        Some(rows) => rows[0].len() as i32 + 1,
        None => SPACE_CELLS,
    }
}

/// Size of one glyph cell in pixels for a font of `font_size` pixels
pub fn cell_size(font_size: f64) -> i32 {
    ((font_size * CAP_HEIGHT_RATIO / GLYPH_ROWS as f64).round() as i32).max(1)
}

/// Rendered `(width, height)` of `text` in pixels
pub fn text_size(text: &str, font_size: f64) -> (i32, i32) {
    let cell = cell_size(font_size);
    let cells: i32 = text.chars().map(advance).sum();
    // No gap after the last glyph
    let width = if cells > 0 { cells - 1 } else { 0 };
    (width * cell, GLYPH_ROWS as i32 * cell)
}

/// Draw `text` centered on `center` with filled cell blocks
pub fn draw_centered<DB: DrawingBackend, C: Color + BackendStyle>(
    surface: &mut DB,
    text: &str,
    font_size: f64,
    color: &C,
    center: BackendCoord,
) -> Result<(), DrawingErrorKind<DB::ErrorType>> {
    let cell = cell_size(font_size);
    let (width, height) = text_size(text, font_size);
    let mut cursor_x = center.0 - width / 2;
    let top = center.1 - height / 2;

    for ch in text.chars() {
        if let Some(rows) = glyph(ch) {
            for (row, pattern) in rows.iter().enumerate() {
                for (col, _) in pattern.bytes().enumerate().filter(|(_, b)| *b == b'#') {
                    let x = cursor_x + col as i32 * cell;
                    let y = top + row as i32 * cell;
                    surface.draw_rect((x, y), (x + cell - 1, y + cell - 1), color, true)?;
                }
            }
        }
        cursor_x += advance(ch) * cell;
    }

    Ok(())
}
