//! EAN/UPC barcode decoder
//!
//! This module implements decoding for EAN-13, UPC-A and EAN-8 barcodes.
//!
//! Both halves of the symbol are read as 7-module digits between a start
//! guard, a centre guard and an end guard. The parity pattern of the left half
//! encodes the leading digit of an EAN-13, and the parity of the first digit
//! read tells whether the symbol was scanned backwards.

use crate::{
    bars::{BarCursor, BarWindow},
    decoder::{Decoded, SymbologyDecoder},
    module_word::{max_unit_width, module_word, parity, resolve, ModuleWord, ReadOrder},
    SymbolType,
};
use tracing::trace;

/// Minimum quiet zone in modules
const MIN_QUIET_MODULES: u32 = 5;

const NORMAL_GUARD: ModuleWord = 0b101;
const CENTER_GUARD: ModuleWord = 0b01010;
const ADD_ON_GUARD: ModuleWord = 0b1011;

// ============================================================================
// Lookup tables
// ============================================================================

/// Left-hand odd parity digit patterns (set A)
const SET_A: [ModuleWord; 10] = [
    0x0d, 0x19, 0x13, 0x3d, 0x23, 0x31, 0x2f, 0x3b, 0x37, 0x0b,
];

/// Right-hand patterns (set C), the complement of set A
const SET_C: [ModuleWord; 10] = {
    let mut c = [0; 10];
    let mut i = 0;
    while i < 10 {
        c[i] = !SET_A[i] & 0x7f;
        i += 1;
    }
    c
};

/// Left-hand even parity digit patterns (set B), set C mirrored
const SET_B: [ModuleWord; 10] = {
    let mut b = [0; 10];
    let mut i = 0;
    while i < 10 {
        b[i] = reverse7(SET_C[i]);
        i += 1;
    }
    b
};

const fn reverse7(word: ModuleWord) -> ModuleWord {
    let mut out = 0;
    let mut i = 0;
    while i < 7 {
        out = (out << 1) | ((word >> i) & 1);
        i += 1;
    }
    out
}

/// EAN-13 leading digit by left half parity pattern (1 = odd, first digit in
/// bit 5)
const LEADING_DIGIT: [(ModuleWord, u8); 10] = [
    (0x3f, b'0'),
    (0x34, b'1'),
    (0x32, b'2'),
    (0x31, b'3'),
    (0x2c, b'4'),
    (0x26, b'5'),
    (0x23, b'6'),
    (0x2a, b'7'),
    (0x29, b'8'),
    (0x25, b'9'),
];

fn find(table: &[ModuleWord; 10], word: ModuleWord) -> Option<u8> {
    table.iter().position(|&w| w == word).map(|d| b'0' + d as u8)
}

/// Left-half digit of either parity
fn left_digit(word: ModuleWord) -> Option<u8> {
    find(&SET_A, word).or_else(|| find(&SET_B, word))
}

fn leading_digit(parities: ModuleWord) -> Option<u8> {
    LEADING_DIGIT
        .iter()
        .find(|&&(p, _)| p == parities)
        .map(|&(_, d)| d)
}

/// Mod-10 check: weights 3 and 1 alternate from the right, starting next to
/// the check digit
pub(crate) fn checksum_ok(digits: &[u8]) -> bool {
    let Some((&check, payload)) = digits.split_last() else {
        return false;
    };
    let sum: u32 = payload
        .iter()
        .rev()
        .enumerate()
        .map(|(i, &d)| u32::from(d - b'0') * if i % 2 == 0 { 3 } else { 1 })
        .sum();
    (10 - sum % 10) % 10 == u32::from(check - b'0')
}

// ============================================================================
// Decoder
// ============================================================================

/// Which way the symbol has to be read for a window to be accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Reading {
    Normal,
    Mirrored,
}

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct EanDecoder;

impl SymbologyDecoder for EanDecoder {
    fn try_decode(&self, cursor: BarCursor<'_>, quiet_px: u32) -> Option<Decoded> {
        decode(cursor, quiet_px, Reading::Normal)
    }

    fn try_reverse_decode(&self, cursor: BarCursor<'_>, quiet_px: u32) -> Option<Decoded> {
        decode(cursor, quiet_px, Reading::Mirrored)
    }
}

fn decode(mut cursor: BarCursor<'_>, quiet_px: u32, wanted: Reading) -> Option<Decoded> {
    let start = cursor.position();
    let mut b = BarWindow::new();

    // cheap test on the first two bars
    cursor.fill(&mut b, 2)?;
    let (b0, b1) = (f64::from(b[0].len), f64::from(b[1].len));
    if b0 > 2.0 * b1 || b0 < 0.5 * b1 {
        return None;
    }
    cursor.extend(&mut b, 1)?;

    let mut u = f64::from(b.total_px()) / 3.0;
    if u > max_unit_width(quiet_px, MIN_QUIET_MODULES) {
        return None;
    }
    if resolve(&b, &mut u, 3, ReadOrder::Forward)? != NORMAL_GUARD {
        return None;
    }

    // left half, up to the centre guard
    let mut digits = Vec::with_capacity(13);
    let mut parities: ModuleWord = 0;
    let mut reading = Reading::Normal;
    loop {
        if digits.len() == 6 {
            break;
        }
        let mut lookahead = cursor;
        lookahead.fill(&mut b, 4)?;
        if digits.len() == 4 && module_word(b.bars(), u, 4, ReadOrder::Forward).is_some() {
            break;
        }
        cursor = lookahead;

        let mw = resolve(&b, &mut u, 7, ReadOrder::Forward)?;
        if digits.is_empty() && !parity(mw) {
            reading = Reading::Mirrored;
        }
        if reading != wanted {
            return None;
        }
        let digit = match reading {
            Reading::Normal => {
                parities = (parities << 1) | ModuleWord::from(parity(mw));
                left_digit(mw)?
            }
            // the right half read backwards is set B throughout
            Reading::Mirrored => find(&SET_B, mw)?,
        };
        digits.push(digit);
    }
    if digits.len() != 4 && digits.len() != 6 {
        return None;
    }

    cursor.fill(&mut b, 5)?;
    if resolve(&b, &mut u, 5, ReadOrder::Forward)? != CENTER_GUARD {
        return None;
    }

    // right half
    let count = digits.len();
    for _ in 0..count {
        cursor.fill(&mut b, 4)?;
        let mw = resolve(&b, &mut u, 7, ReadOrder::Forward)?;
        let complement = !mw & 0x7f;
        let digit = match reading {
            Reading::Normal => find(&SET_A, complement)?,
            Reading::Mirrored => {
                // the left half read backwards; recover its parity
                parities = (parities >> 1) | (ModuleWord::from(!parity(complement)) << 5);
                left_digit(complement)?
            }
        };
        digits.push(digit);
    }

    cursor.fill(&mut b, 3)?;
    if resolve(&b, &mut u, 3, ReadOrder::Forward)? != NORMAL_GUARD {
        return None;
    }

    if reading == Reading::Normal && has_add_on(cursor, u) {
        trace!("EAN add-on symbols are not supported");
        return None;
    }

    if reading == Reading::Mirrored {
        digits.reverse();
        // parities were collected from the last digit back, into bit 5
        parities >>= 6 - count;
    }

    let symbol_type = if count == 6 {
        match leading_digit(parities)? {
            b'0' => SymbolType::Upca,
            lead => {
                digits.insert(0, lead);
                SymbolType::Ean13
            }
        }
    } else {
        if parities & 0xf != 0xf {
            return None;
        }
        SymbolType::Ean8
    };

    if !checksum_ok(&digits) {
        return None;
    }

    let text = String::from_utf8(digits).ok()?;
    trace!(%symbol_type, %text, "decoded");
    Some(Decoded::new(
        symbol_type,
        text,
        cursor.position() - start,
    ))
}

/// Whether an add-on guard follows the end guard after a short gap
fn has_add_on(mut cursor: BarCursor<'_>, u: f64) -> bool {
    let Some(gap) = cursor.next_bar() else {
        return false;
    };
    let gap_modules = f64::from(gap.len) / u;
    if !(5.0..=15.0).contains(&gap_modules) {
        return false;
    }
    let mut b = BarWindow::new();
    if cursor.fill(&mut b, 3).is_none() {
        return false;
    }
    module_word(b.bars(), u, 4, ReadOrder::Forward) == Some(ADD_ON_GUARD)
}
