//! Code 39 barcode decoder
//!
//! This module implements decoding for Code 39 barcodes.
//!
//! Each character is nine runs, three of them wide. Runs are classified
//! directly against the character's total pixel width instead of going
//! through module words, so any wide/narrow ratio between 2 and 3 works.

use crate::{
    bars::{BarCursor, BarWindow},
    config::internal::ChecksumConfig,
    decoder::{Decoded, SymbologyDecoder},
    SymbolType,
};
use tracing::trace;

/// Run widths of one character, wide = 1, first run in bit 8
type Key = u16;

const DELIMITER: Key = 0x094;

// ============================================================================
// Lookup tables
// ============================================================================

/// Character set in check value order
const CHARSET: &[u8; 43] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ-. $/+%";

/// Run patterns in [`CHARSET`] order
const PATTERNS: [Key; 43] = [
    0x034, 0x121, 0x061, 0x160, 0x031, 0x130, 0x070, 0x025, 0x124, 0x064, // 0-9
    0x109, 0x049, 0x148, 0x019, 0x118, 0x058, 0x00d, 0x10c, 0x04c, 0x01c, // A-J
    0x103, 0x043, 0x142, 0x013, 0x112, 0x052, 0x007, 0x106, 0x046, 0x016, // K-T
    0x181, 0x0c1, 0x1c0, 0x091, 0x190, 0x0d0, // U-Z
    0x085, 0x184, 0x0c4, 0x0a8, 0x0a2, 0x08a, 0x02a, // - . space $ / + %
];

/// What a key stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Symbol39 {
    Char(u8),
    Delimiter,
}

fn lookup(key: Key) -> Option<Symbol39> {
    if key == DELIMITER {
        return Some(Symbol39::Delimiter);
    }
    PATTERNS
        .iter()
        .position(|&p| p == key)
        .map(|i| Symbol39::Char(CHARSET[i]))
}

/// Position of a character in the check value order
fn check_value(c: u8) -> Option<usize> {
    CHARSET.iter().position(|&x| x == c)
}

/// Verify the trailing mod-43 check character, returning the text without it
pub(crate) fn strip_check_char(text: &str) -> Option<&str> {
    let (payload, check) = text.split_at(text.len().checked_sub(1)?);
    let sum: usize = payload
        .bytes()
        .map(check_value)
        .sum::<Option<usize>>()?;
    (CHARSET[sum % 43] == check.as_bytes()[0]).then_some(payload)
}

// ============================================================================
// Decoder
// ============================================================================

/// Key of a nine run window, read in `reverse` order if requested
fn key_of(b: &BarWindow, reverse: bool) -> Option<Key> {
    let total = f64::from(b.total_px());
    let (narrow_lo, narrow_hi) = (total / 30.0, total / 8.0);
    let (wide_lo, wide_hi) = (total / 7.9, total);

    let mut key: Key = 0;
    for i in 0..9 {
        let bar = if reverse { b[8 - i] } else { b[i] };
        let len = f64::from(bar.len);
        key <<= 1;
        if (wide_lo..=wide_hi).contains(&len) {
            key |= 1;
        } else if !(narrow_lo..=narrow_hi).contains(&len) {
            return None;
        }
    }
    Some(key)
}

/// Size and color checks of a nine run window
fn plausible_window(b: &BarWindow, old_px: Option<u32>) -> bool {
    if let Some(old) = old_px {
        let diff = (f64::from(b.total_px()) - f64::from(old)).abs();
        if diff >= 0.5 * f64::from(old) {
            return false;
        }
    }
    b[0].is_bar() && b[8].is_bar()
}

/// Consume the narrow gap between two characters
fn expect_gap(cursor: &mut BarCursor<'_>, old_px: u32) -> Option<()> {
    let gap = cursor.next_bar()?;
    let len = f64::from(gap.len);
    let old = f64::from(old_px);
    (gap.is_space() && len >= old / 30.0 && len <= old / 7.0).then_some(())
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Code39Decoder {
    checksum: ChecksumConfig,
}

impl Code39Decoder {
    pub(crate) fn new(checksum: ChecksumConfig) -> Self {
        Code39Decoder { checksum }
    }

    /// Read characters after the opening delimiter up to the closing one
    fn read(&self, mut cursor: BarCursor<'_>, quiet_px: u32, reverse: bool) -> Option<Decoded> {
        let start = cursor.position();
        let mut b = BarWindow::new();

        cursor.fill(&mut b, 2)?;
        let (b0, b1) = (f64::from(b[0].len), f64::from(b[1].len));
        let lead_ok = if reverse {
            b0 <= 1.8 * b1 && b1 <= 1.8 * b0
        } else {
            b0 <= 0.8 * b1 && b1 <= 3.5 * b0
        };
        if !lead_ok {
            return None;
        }
        cursor.extend(&mut b, 7)?;
        if !plausible_window(&b, None) {
            return None;
        }
        if f64::from(quiet_px) < 0.4 * f64::from(b.total_px()) {
            return None;
        }
        if key_of(&b, reverse).and_then(lookup) != Some(Symbol39::Delimiter) {
            return None;
        }

        let mut text = Vec::new();
        let mut old_px = b.total_px();
        loop {
            expect_gap(&mut cursor, old_px)?;
            cursor.fill(&mut b, 9)?;
            if !plausible_window(&b, Some(old_px)) {
                return None;
            }
            old_px = b.total_px();
            match lookup(key_of(&b, reverse)?)? {
                Symbol39::Delimiter => break,
                Symbol39::Char(c) => text.push(c),
            }
        }

        if reverse {
            text.reverse();
        }
        if text.is_empty() {
            return None;
        }
        let mut text = String::from_utf8(text).ok()?;

        if self.checksum.add_check {
            let payload_len = strip_check_char(&text)?.len();
            if payload_len == 0 {
                return None;
            }
            if !self.checksum.emit_check {
                text.truncate(payload_len);
            }
        }

        trace!(%text, "decoded Code 39");
        Some(Decoded::new(
            SymbolType::Code39,
            text,
            cursor.position() - start,
        ))
    }
}

impl SymbologyDecoder for Code39Decoder {
    fn try_decode(&self, cursor: BarCursor<'_>, quiet_px: u32) -> Option<Decoded> {
        self.read(cursor, quiet_px, false)
    }

    fn try_reverse_decode(&self, cursor: BarCursor<'_>, quiet_px: u32) -> Option<Decoded> {
        self.read(cursor, quiet_px, true)
    }
}
