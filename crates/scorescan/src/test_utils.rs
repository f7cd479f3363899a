//! Shared test utilities for synthetic staff images.
//!
//! Every stage test draws on the same page layout: white paper, one staff
//! with 1-pixel lines at [`STAFF_ROWS`], so the half-spacing step is 5 rows,
//! the scan window is 30 columns wide and the ladder runs from row 15 to 105.

use image::{GrayImage, Luma};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

pub(crate) const PAPER: u8 = 255;
pub(crate) const INK: u8 = 0;

/// Line rows of the standard test staff.
pub(crate) const STAFF_ROWS: [i32; 5] = [40, 50, 60, 70, 80];
/// Page height leaving room for the lowest ledger position (row 105).
pub(crate) const PAGE_HEIGHT: u32 = 130;
/// Ladder index of row 90, the first ledger line below the standard staff.
pub(crate) const LEDGER_KEY: usize = 15;
/// Top row of a note head centred on [`LEDGER_KEY`].
pub(crate) const LEDGER_HEAD_TOP: i32 = 85;

pub(crate) fn blank_page(w: u32, h: u32) -> GrayImage {
    GrayImage::from_pixel(w, h, Luma([PAPER]))
}

pub(crate) fn draw_ink_box(img: &mut GrayImage, x: i32, y: i32, w: u32, h: u32) {
    draw_filled_rect_mut(img, Rect::at(x, y).of_size(w, h), Luma([INK]));
}

fn draw_paper_box(img: &mut GrayImage, x: i32, y: i32, w: u32, h: u32) {
    draw_filled_rect_mut(img, Rect::at(x, y).of_size(w, h), Luma([PAPER]));
}

/// Horizontal lines across the full page width.
pub(crate) fn draw_staff_lines(img: &mut GrayImage, rows: &[i32], thickness: u32) {
    let w = img.width();
    for &row in rows {
        draw_ink_box(img, 0, row, w, thickness);
    }
}

/// White page of width `w` with the standard staff drawn on it.
pub(crate) fn staff_page(w: u32) -> GrayImage {
    let mut img = blank_page(w, PAGE_HEIGHT);
    draw_staff_lines(&mut img, &STAFF_ROWS, 1);
    img
}

/// Rectangular outline with walls `wall` pixels thick.
pub(crate) fn draw_hollow_head(img: &mut GrayImage, x: i32, y: i32, w: u32, h: u32, wall: u32) {
    draw_ink_box(img, x, y, w, h);
    draw_paper_box(
        img,
        x + wall as i32,
        y + wall as i32,
        w - 2 * wall,
        h - 2 * wall,
    );
}

/// Hollow 21x10 head on the ledger line below the standard staff.
///
/// Both boxes around row 90 hold 54 ink pixels for any 30-column window that
/// contains the whole head: 36% fill each, fill score 84.
pub(crate) fn draw_open_head(img: &mut GrayImage, x: i32) {
    draw_hollow_head(img, x, LEDGER_HEAD_TOP, 21, 10, 2);
}

/// Solid head of width `w` on the ledger line below the standard staff.
pub(crate) fn draw_filled_head(img: &mut GrayImage, x: i32, w: u32) {
    draw_ink_box(img, x, LEDGER_HEAD_TOP, w, 10);
}

/// Two-pixel-wide vertical stroke.
pub(crate) fn draw_stroke(img: &mut GrayImage, x: i32, top: i32, len: u32) {
    draw_ink_box(img, x, top, 2, len);
}
