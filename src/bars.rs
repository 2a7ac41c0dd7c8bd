//! Bars, bar windows and cursors over a tokenized scan line

use crate::color::Color;
use std::ops::Index;

/// One run of same-colored pixels along a scan line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bar {
    pub(crate) color: Color,
    pub(crate) len: u32,
}

impl Bar {
    pub(crate) fn new(color: Color, len: u32) -> Self {
        Bar { color, len }
    }

    pub fn color(self) -> Color {
        self.color
    }

    /// Length of the run in pixels
    pub fn width(self) -> u32 {
        self.len
    }

    #[inline]
    pub fn is_bar(self) -> bool {
        self.color.is_bar()
    }

    #[inline]
    pub fn is_space(self) -> bool {
        self.color.is_space()
    }
}

/// Consecutive bars under test, with running pixel sums
///
/// The sums always match the current members: every mutation goes through
/// `push` or `clear`.
#[derive(Debug, Clone, Default)]
pub(crate) struct BarWindow {
    bars: Vec<Bar>,
    black_px: u32,
    white_px: u32,
}

impl BarWindow {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn clear(&mut self) {
        self.bars.clear();
        self.black_px = 0;
        self.white_px = 0;
    }

    pub(crate) fn push(&mut self, bar: Bar) {
        match bar.color {
            Color::Bar => self.black_px += bar.len,
            Color::Space => self.white_px += bar.len,
        }
        self.bars.push(bar);
    }

    /// Drop the first bar of the window
    pub(crate) fn remove_first(&mut self) {
        let rest: Vec<Bar> = self.bars.iter().skip(1).copied().collect();
        self.clear();
        for bar in rest {
            self.push(bar);
        }
    }

    pub(crate) fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub(crate) fn len(&self) -> usize {
        self.bars.len()
    }

    /// Pixels covered by dark bars
    pub(crate) fn black_px(&self) -> u32 {
        self.black_px
    }

    /// Pixels covered by light bars
    pub(crate) fn white_px(&self) -> u32 {
        self.white_px
    }

    pub(crate) fn total_px(&self) -> u32 {
        self.black_px + self.white_px
    }

    /// Copy of the window with every dark bar grown by `dark` pixels and
    /// every light bar by `light` pixels
    pub(crate) fn nudged(&self, dark: i32, light: i32) -> BarWindow {
        let mut out = BarWindow::new();
        for bar in &self.bars {
            let delta = if bar.is_bar() { dark } else { light };
            out.push(Bar::new(bar.color, bar.len.saturating_add_signed(delta)));
        }
        out
    }
}

impl Index<usize> for BarWindow {
    type Output = Bar;

    fn index(&self, index: usize) -> &Bar {
        &self.bars[index]
    }
}

/// Read position within one tokenized scan line
///
/// Cursors are cheap copies. A decoder works on its own copy, so a rejected
/// attempt never moves the scanner's position.
#[derive(Debug, Clone, Copy)]
pub(crate) struct BarCursor<'a> {
    bars: &'a [Bar],
    pos: usize,
}

impl<'a> BarCursor<'a> {
    pub(crate) fn new(bars: &'a [Bar], pos: usize) -> Self {
        BarCursor { bars, pos }
    }

    /// Index of the next bar to be read
    pub(crate) fn position(&self) -> usize {
        self.pos
    }

    /// The next bar, without consuming it
    pub(crate) fn peek(&self) -> Option<Bar> {
        self.bars.get(self.pos).copied()
    }

    pub(crate) fn next_bar(&mut self) -> Option<Bar> {
        let bar = self.peek()?;
        self.pos += 1;
        Some(bar)
    }

    /// Replace the window contents with the next `n` bars
    pub(crate) fn fill(&mut self, window: &mut BarWindow, n: usize) -> Option<()> {
        window.clear();
        self.extend(window, n)
    }

    /// Append the next `n` bars to the window
    pub(crate) fn extend(&mut self, window: &mut BarWindow, n: usize) -> Option<()> {
        if self.pos + n > self.bars.len() {
            return None;
        }
        for _ in 0..n {
            window.push(self.next_bar()?);
        }
        Some(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line() -> Vec<Bar> {
        [(Color::Space, 9), (Color::Bar, 2), (Color::Space, 3), (Color::Bar, 4)]
            .into_iter()
            .map(|(c, l)| Bar::new(c, l))
            .collect()
    }

    #[test]
    fn test_window_aggregates() {
        let bars = line();
        let mut cursor = BarCursor::new(&bars, 1);
        let mut window = BarWindow::new();

        cursor.fill(&mut window, 2).unwrap();
        assert_eq!((window.black_px(), window.white_px()), (2, 3));

        cursor.extend(&mut window, 1).unwrap();
        assert_eq!(window.len(), 3);
        assert_eq!(window.total_px(), 9);

        window.remove_first();
        assert_eq!((window.black_px(), window.white_px()), (4, 3));
        assert_eq!(window[0], Bar::new(Color::Space, 3));
    }

    #[test]
    fn test_cursor_does_not_overrun() {
        let bars = line();
        let mut cursor = BarCursor::new(&bars, 2);
        let mut window = BarWindow::new();

        assert!(cursor.fill(&mut window, 3).is_none());
        // A failed fill leaves the cursor where it was
        assert_eq!(cursor.position(), 2);
        assert_eq!(cursor.peek(), Some(Bar::new(Color::Space, 3)));
    }

    #[test]
    fn test_nudged() {
        let bars = line();
        let mut window = BarWindow::new();
        BarCursor::new(&bars, 0).fill(&mut window, 4).unwrap();

        let grown = window.nudged(1, -1);
        assert_eq!(grown.black_px(), window.black_px() + 2);
        assert_eq!(grown.white_px(), window.white_px() - 2);
        assert_eq!(grown[0].len, 8);
    }
}
