//! Code 128 barcode decoder
//!
//! This module implements decoding for Code 128 and GS1-128 barcodes.
//!
//! Symbols are 11 modules wide and resolved into module words. The key list,
//! from the start code to the check value, is decoded only once the stop
//! pattern has been seen, so a symbol read backwards can be collected first
//! and decoded in the same way.

use crate::{
    bars::{Bar, BarCursor, BarWindow},
    decoder::{Decoded, SymbologyDecoder},
    module_word::{max_unit_width, resolve, ModuleWord, ReadOrder},
    SymbolType,
};
use tracing::trace;

/// Minimum quiet zone in modules
const MIN_QUIET_MODULES: u32 = 5;

const START_A: u8 = 103;
const START_B: u8 = 104;
const START_C: u8 = 105;
const STOP: u8 = 106;

// ============================================================================
// Lookup tables
// ============================================================================

/// Module words of all symbol values, 0 to 106
///
/// The stop word covers the first 11 of its 13 modules; the trailing two
/// module bar is not part of it.
const PATTERNS: [ModuleWord; 107] = [
    0x6cc, 0x66c, 0x666, 0x498, 0x48c, 0x44c, 0x4c8, 0x4c4, // 0
    0x464, 0x648, 0x644, 0x624, 0x59c, 0x4dc, 0x4ce, 0x5cc, // 8
    0x4ec, 0x4e6, 0x672, 0x65c, 0x64e, 0x6e4, 0x674, 0x76e, // 16
    0x74c, 0x72c, 0x726, 0x764, 0x734, 0x732, 0x6d8, 0x6c6, // 24
    0x636, 0x518, 0x458, 0x446, 0x588, 0x468, 0x462, 0x688, // 32
    0x628, 0x622, 0x5b8, 0x58e, 0x46e, 0x5d8, 0x5c6, 0x476, // 40
    0x776, 0x68e, 0x62e, 0x6e8, 0x6e2, 0x6ee, 0x758, 0x746, // 48
    0x716, 0x768, 0x762, 0x71a, 0x77a, 0x642, 0x78a, 0x530, // 56
    0x50c, 0x4b0, 0x486, 0x42c, 0x426, 0x590, 0x584, 0x4d0, // 64
    0x4c2, 0x434, 0x432, 0x612, 0x650, 0x7ba, 0x614, 0x47a, // 72
    0x53c, 0x4bc, 0x49e, 0x5e4, 0x4f4, 0x4f2, 0x7a4, 0x794, // 80
    0x792, 0x6de, 0x6f6, 0x7b6, 0x578, 0x51e, 0x45e, 0x5e8, // 88
    0x5e2, 0x7a8, 0x7a2, 0x5de, 0x5ee, 0x75e, 0x7ae, 0x684, // 96
    0x690, 0x69c, 0x63a, // 104
];

/// Symbol value by module word, indexed by the word's 9 inner bits
///
/// Every word starts with a bar and ends with a space.
const VALUES: [u8; 512] = {
    let mut table = [u8::MAX; 512];
    let mut value = 0;
    while value < PATTERNS.len() {
        table[((PATTERNS[value] >> 1) & 0x1ff) as usize] = value as u8;
        value += 1;
    }
    table
};

fn value_of(word: ModuleWord) -> Option<u8> {
    if word & 0x401 != 0x400 {
        return None;
    }
    match VALUES[usize::from((word >> 1) & 0x1ff)] {
        u8::MAX => None,
        value => Some(value),
    }
}

// ============================================================================
// Code sets
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CodeSet {
    A,
    B,
    C,
}

impl CodeSet {
    fn shifted(self) -> Self {
        match self {
            CodeSet::A => CodeSet::B,
            CodeSet::B => CodeSet::A,
            CodeSet::C => CodeSet::C,
        }
    }
}

/// Meaning of a symbol value within a code set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Code {
    Char(u8),
    Digits(u8),
    Latch(CodeSet),
    Shift,
    Fnc1,
    /// FNC2, FNC3 and FNC4
    Function(u8),
    Start,
    Stop,
}

fn interpret(set: CodeSet, value: u8) -> Code {
    match (set, value) {
        (_, START_A..=START_C) => Code::Start,
        (_, STOP) => Code::Stop,
        (_, 102) => Code::Fnc1,

        (CodeSet::A, 0..=63) => Code::Char(value + 32),
        (CodeSet::A, 64..=95) => Code::Char(value - 64),
        (CodeSet::B, 0..=95) => Code::Char(value + 32),
        (CodeSet::A | CodeSet::B, 96) => Code::Function(3),
        (CodeSet::A | CodeSet::B, 97) => Code::Function(2),
        (CodeSet::A | CodeSet::B, 98) => Code::Shift,
        (CodeSet::A | CodeSet::B, 99) => Code::Latch(CodeSet::C),
        (CodeSet::A, 100) => Code::Latch(CodeSet::B),
        (CodeSet::A, 101) => Code::Function(4),
        (CodeSet::B, 100) => Code::Function(4),
        (CodeSet::B, 101) => Code::Latch(CodeSet::A),

        (CodeSet::C, 0..=99) => Code::Digits(value),
        (CodeSet::C, 100) => Code::Latch(CodeSet::B),
        (CodeSet::C, _) => Code::Latch(CodeSet::A),

        // values above 106 never leave the lookup table
        _ => Code::Stop,
    }
}

/// Decode a key list from the start value up to and including the check value
fn decode_values(values: &[u8]) -> Option<(SymbolType, String)> {
    let (&check, rest) = values.split_last()?;
    let (&start, data) = rest.split_first()?;
    if data.is_empty() {
        return None;
    }

    let sum = data
        .iter()
        .enumerate()
        .fold(u32::from(start), |acc, (pos, &value)| {
            acc + (pos as u32 + 1) * u32::from(value)
        });
    if sum % 103 != u32::from(check) {
        return None;
    }

    let mut set = match start {
        START_A => CodeSet::A,
        START_B => CodeSet::B,
        START_C => CodeSet::C,
        _ => return None,
    };
    let mut symbol_type = SymbolType::Code128;
    let mut text = String::new();
    let mut shift = false;

    for (pos, &value) in data.iter().enumerate() {
        let current = if shift { set.shifted() } else { set };
        shift = false;
        match interpret(current, value) {
            Code::Char(c) => text.push(char::from(c)),
            Code::Digits(d) => {
                text.push(char::from(b'0' + d / 10));
                text.push(char::from(b'0' + d % 10));
            }
            Code::Latch(next) => set = next,
            Code::Shift => shift = true,
            Code::Fnc1 if pos == 0 => symbol_type = SymbolType::Gs1_128,
            Code::Fnc1 => text.push('\x1d'),
            Code::Function(n) => trace!(n, "ignoring Code 128 function character"),
            Code::Start | Code::Stop => return None,
        }
    }

    Some((symbol_type, text))
}

// ============================================================================
// Decoder
// ============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Code128Decoder;

/// First two bars of a start code, or of a mirrored stop pattern
fn plausible_lead(b: &BarWindow) -> bool {
    let (b0, b1) = (f64::from(b[0].len), f64::from(b[1].len));
    b0 <= 3.0 * b1 && b0 >= 1.2 * b1
}

/// Two module bar that closes the stop pattern
fn is_closing_bar(bar: Bar, u: f64) -> bool {
    bar.is_bar() && (f64::from(bar.len) / u).round() == 2.0
}

fn finish(values: &[u8], consumed: usize) -> Option<Decoded> {
    let (symbol_type, text) = decode_values(values)?;
    trace!(%symbol_type, %text, "decoded");
    Some(Decoded::new(symbol_type, text, consumed))
}

impl SymbologyDecoder for Code128Decoder {
    fn try_decode(&self, mut cursor: BarCursor<'_>, quiet_px: u32) -> Option<Decoded> {
        let start = cursor.position();
        let mut b = BarWindow::new();

        cursor.fill(&mut b, 2)?;
        if !plausible_lead(&b) {
            return None;
        }
        cursor.extend(&mut b, 4)?;

        let mut u = f64::from(b.total_px()) / 11.0;
        if u > max_unit_width(quiet_px, MIN_QUIET_MODULES) {
            return None;
        }

        let value = value_of(resolve(&b, &mut u, 11, ReadOrder::Forward)?)?;
        if !(START_A..=START_C).contains(&value) {
            return None;
        }

        let mut values = vec![value];
        loop {
            cursor.fill(&mut b, 6)?;
            let value = value_of(resolve(&b, &mut u, 11, ReadOrder::Forward)?)?;
            if value == STOP {
                break;
            }
            values.push(value);
        }

        if !is_closing_bar(cursor.next_bar()?, u) {
            return None;
        }

        finish(&values, cursor.position() - start)
    }

    fn try_reverse_decode(&self, mut cursor: BarCursor<'_>, quiet_px: u32) -> Option<Decoded> {
        let start = cursor.position();
        let mut b = BarWindow::new();

        // the mirrored stop pattern opens with its two module bar
        cursor.fill(&mut b, 2)?;
        if !plausible_lead(&b) {
            return None;
        }
        cursor.extend(&mut b, 5)?;

        let mut u = f64::from(b.total_px()) / 13.0;
        if u > max_unit_width(quiet_px, MIN_QUIET_MODULES) {
            return None;
        }

        let closing = b[0];
        b.remove_first();
        if value_of(resolve(&b, &mut u, 11, ReadOrder::Reverse)?)? != STOP
            || !is_closing_bar(closing, u)
        {
            return None;
        }

        let mut values = Vec::new();
        loop {
            cursor.fill(&mut b, 6)?;
            let value = value_of(resolve(&b, &mut u, 11, ReadOrder::Reverse)?)?;
            values.insert(0, value);
            if (START_A..=START_C).contains(&value) {
                break;
            }
        }

        finish(&values, cursor.position() - start)
    }
}
