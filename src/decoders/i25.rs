//! Interleaved 2 of 5 barcode decoder
//!
//! Digits come in pairs of ten runs: the dark runs carry the first digit and
//! the light runs the second. Two of the five runs of a digit are wide.
//! Narrow and wide are judged separately for dark and light runs, against the
//! pixel sum of each color, so print growth that widens every dark run does
//! not shift the classification.
//!
//! There is no check character; single observations are only reported when
//! the duplicate requirement is switched off.

use crate::{
    bars::{BarCursor, BarWindow},
    decoder::{Decoded, SymbologyDecoder},
    SymbolType,
};
use tracing::trace;

/// Narrow and wide bounds as divisors of the pixel sum of one color
const NARROW_LOW: f64 = 15.0;
const NARROW_HIGH: f64 = 5.3;
const WIDE_LOW: f64 = 5.2;
const WIDE_HIGH: f64 = 1.5;
const TOLERANCE: f64 = 0.2;

/// Digits by the run widths of one digit, wide = 1, first run in bit 4
const DIGITS: [(u8, u8); 10] = [
    (0x06, b'0'),
    (0x11, b'1'),
    (0x09, b'2'),
    (0x18, b'3'),
    (0x05, b'4'),
    (0x14, b'5'),
    (0x0c, b'6'),
    (0x03, b'7'),
    (0x12, b'8'),
    (0x0a, b'9'),
];

fn digit(key: u8) -> Option<u8> {
    DIGITS.iter().find(|&&(k, _)| k == key).map(|&(_, d)| d)
}

/// Classify one run against the pixel sum of its color
fn is_wide(len: u32, color_px: u32) -> Option<bool> {
    let (len, px) = (f64::from(len), f64::from(color_px));
    if px / WIDE_LOW <= len && len <= px / WIDE_HIGH {
        Some(true)
    } else if px / NARROW_LOW <= len && len <= px / NARROW_HIGH {
        Some(false)
    } else {
        None
    }
}

/// Digit keys of the dark and light runs of a ten run window
fn keys(b: &BarWindow, reverse: bool) -> Option<(u8, u8)> {
    let mut dark: u8 = 0;
    let mut light: u8 = 0;
    for i in 0..10 {
        let bar = if reverse { b[9 - i] } else { b[i] };
        if bar.is_bar() {
            dark = (dark << 1) | u8::from(is_wide(bar.len, b.black_px())?);
        } else {
            light = (light << 1) | u8::from(is_wide(bar.len, b.white_px())?);
        }
    }
    Some((dark, light))
}

/// Size checks of a ten run window
fn plausible_pair(b: &BarWindow, old_px: Option<u32>, dark_ratio: f64) -> bool {
    let total = f64::from(b.total_px());
    if let Some(old) = old_px {
        if (total - f64::from(old)).abs() >= 0.5 * f64::from(old) {
            return false;
        }
    }
    let expected = total * dark_ratio * 0.5;
    let dark = f64::from(b.black_px());
    dark >= (1.0 - TOLERANCE) * expected && dark <= (1.0 + TOLERANCE) * expected
}

fn within(value: f64, reference: f64, low: f64, high: f64) -> bool {
    value >= low * reference && value <= high * reference
}

/// The first two runs and the quiet zone in front of them
fn plausible_lead(b: &BarWindow, quiet_px: u32) -> bool {
    let (b0, b1) = (f64::from(b[0].len), f64::from(b[1].len));
    within(b0, b1, 0.7, 3.0) && f64::from(quiet_px) >= (b0 + b1) * 2.5
}

fn finish(digits: Vec<u8>, consumed: usize) -> Option<Decoded> {
    if digits.is_empty() {
        return None;
    }
    let text = String::from_utf8(digits).ok()?;
    trace!(%text, "decoded I2/5");
    Some(Decoded::new(SymbolType::I25, text, consumed))
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct I25Decoder;

impl SymbologyDecoder for I25Decoder {
    fn try_decode(&self, mut cursor: BarCursor<'_>, quiet_px: u32) -> Option<Decoded> {
        let start = cursor.position();
        let mut b = BarWindow::new();

        // start pattern: four narrow runs
        cursor.fill(&mut b, 2)?;
        if !plausible_lead(&b, quiet_px) {
            return None;
        }
        cursor.extend(&mut b, 2)?;
        let (b0, b1) = (f64::from(b[0].len), f64::from(b[1].len));
        if !within(b0, f64::from(b[2].len), 0.7, 1.3) || !within(b1, f64::from(b[3].len), 0.7, 1.3)
        {
            return None;
        }

        let half = f64::from(b.total_px()) * 0.5;
        let light_ratio = f64::from(b.white_px()) / half;
        let dark_ratio = f64::from(b.black_px()) / half;

        let mut digits = Vec::new();
        let mut old_px = None;
        loop {
            cursor.fill(&mut b, 3)?;

            // end pattern: wide, narrow, narrow, then the quiet zone
            let total = f64::from(b.total_px());
            let (e0, e1, e2) = (
                f64::from(b[0].len),
                f64::from(b[1].len),
                f64::from(b[2].len),
            );
            let end_like = e0 < e2 * 3.1 * 1.3
                && e0 > e2 * 2.0 * 0.7
                && e1 < total * 0.25 * (1.0 + TOLERANCE) * light_ratio
                && e1 > total * 0.18 * (1.0 - TOLERANCE) * light_ratio;
            if end_like && cursor.peek().map_or(true, |q| f64::from(q.len) > total * 1.3) {
                break;
            }

            cursor.extend(&mut b, 7)?;
            if !plausible_pair(&b, old_px, dark_ratio) || !b[0].is_bar() || b[9].is_bar() {
                return None;
            }
            old_px = Some(b.total_px());

            let (first, second) = keys(&b, false)?;
            digits.push(digit(first)?);
            digits.push(digit(second)?);
        }

        finish(digits, cursor.position() - start)
    }

    fn try_reverse_decode(&self, mut cursor: BarCursor<'_>, quiet_px: u32) -> Option<Decoded> {
        let start = cursor.position();
        let mut b = BarWindow::new();

        // mirrored end pattern: narrow, narrow, wide
        cursor.fill(&mut b, 2)?;
        if !plausible_lead(&b, quiet_px) {
            return None;
        }
        cursor.extend(&mut b, 1)?;
        if !within(f64::from(b[0].len), f64::from(b[2].len), 0.3 * 0.7, 0.5 * 1.3) {
            return None;
        }

        let dark_ratio = f64::from(b.black_px()) / (f64::from(b.total_px()) * 0.75);

        let mut digits = Vec::new();
        let mut old_px = None;
        loop {
            cursor.fill(&mut b, 4)?;

            // mirrored start pattern, then the quiet zone
            let total = f64::from(b.total_px());
            let expected = total * dark_ratio * 0.5;
            let dark = f64::from(b.black_px());
            let light = f64::from(b.white_px());
            let half_of = |px: f64, i: usize| within(px / f64::from(b[i].len), 2.0, 0.7, 1.3);
            let start_like = dark > (1.0 - TOLERANCE) * expected
                && dark < (1.0 + TOLERANCE) * expected
                && half_of(dark, 3)
                && half_of(light, 2)
                && half_of(dark, 1)
                && half_of(light, 0);
            if start_like && cursor.peek().map_or(true, |q| f64::from(q.len) > total) {
                break;
            }

            cursor.extend(&mut b, 6)?;
            if !plausible_pair(&b, old_px, dark_ratio) || b[0].is_bar() || !b[9].is_bar() {
                return None;
            }
            old_px = Some(b.total_px());

            // read backwards, so the pair comes out in order
            let (first, second) = keys(&b, true)?;
            digits.push(digit(second)?);
            digits.push(digit(first)?);
        }

        digits.reverse();
        finish(digits, cursor.position() - start)
    }
}
