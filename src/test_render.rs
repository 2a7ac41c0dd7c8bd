//! Synthetic barcode renderings for tests
//!
//! Encoders turn text into module sequences (true = dark), renderers paint
//! them black on white with a given module width and quiet zone.

use crate::bars::Bar;
use crate::color::Color;
use ::image::{GrayImage, Luma};
use std::ops::Range;

/// EAN set A module widths, space first; set C is the same widths bar first
/// and set B the widths reversed, space first
const EAN_WIDTHS: [&str; 10] = [
    "3211", "2221", "2122", "1411", "1132", "1231", "1114", "1312", "1213", "3112",
];

/// EAN-13 left half parities by leading digit, 'A' odd and 'B' even
const EAN_PARITIES: [&str; 10] = [
    "AAAAAA", "AABABB", "AABBAB", "AABBBA", "ABAABB", "ABBAAB", "ABBBAA", "ABABAB", "ABABBA",
    "ABBABA",
];

/// Code 128 bar and space widths by value, bar first; the stop pattern
/// includes its closing bar
const CODE128_WIDTHS: [&str; 107] = [
    "212222", "222122", "222221", "121223", "121322", "131222", "122213", "122312", // 0
    "132212", "221213", "221312", "231212", "112232", "122132", "122231", "113222", // 8
    "123122", "123221", "223211", "221132", "221231", "213212", "223112", "312131", // 16
    "311222", "321122", "321221", "312212", "322112", "322211", "212123", "212321", // 24
    "232121", "111323", "131123", "131321", "112313", "132113", "132311", "211313", // 32
    "231113", "231311", "112133", "112331", "132131", "113123", "113321", "133121", // 40
    "313121", "211331", "231131", "213113", "213311", "213131", "311123", "311321", // 48
    "331121", "312113", "312311", "332111", "314111", "221411", "431111", "111224", // 56
    "111422", "121124", "121421", "141122", "141221", "112214", "112412", "122114", // 64
    "122411", "142112", "142211", "241211", "221114", "413111", "241112", "134111", // 72
    "111242", "121142", "121241", "114212", "124112", "124211", "411212", "421112", // 80
    "421211", "212141", "214121", "412121", "111143", "111341", "131141", "114113", // 88
    "114311", "411113", "411311", "113141", "114131", "311141", "411131", "211412", // 96
    "211214", "211232", "2331112", // 104
];

/// Code 39 characters followed by the delimiter
const CODE39_CHARS: &[u8; 44] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ-. $/+%*";

/// Code 39 runs, bar first, 'w' wide and 'n' narrow
const CODE39_RUNS: [&str; 44] = [
    "nnnwwnwnn", "wnnwnnnnw", "nnwwnnnnw", "wnwwnnnnn", "nnnwwnnnw", "wnnwwnnnn", "nnwwwnnnn",
    "nnnwnnwnw", "wnnwnnwnn", "nnwwnnwnn", "wnnnnwnnw", "nnwnnwnnw", "wnwnnwnnn", "nnnnwwnnw",
    "wnnnwwnnn", "nnwnwwnnn", "nnnnnwwnw", "wnnnnwwnn", "nnwnnwwnn", "nnnnwwwnn", "wnnnnnnww",
    "nnwnnnnww", "wnwnnnnwn", "nnnnwnnww", "wnnnwnnwn", "nnwnwnnwn", "nnnnnnwww", "wnnnnnwwn",
    "nnwnnnwwn", "nnnnwnwwn", "wwnnnnnnw", "nwwnnnnnw", "wwwnnnnnn", "nwnnwnnnw", "wwnnwnnnn",
    "nwwnwnnnn", "nwnnnnwnw", "wwnnnnwnn", "nwwnnnwnn", "nwnwnwnnn", "nwnwnnnwn", "nwnnnwnwn",
    "nnnwnwnwn", "nwnnwnwnn",
];

/// Interleaved 2 of 5 digit runs, 'w' wide and 'n' narrow
const I25_RUNS: [&str; 10] = [
    "nnwwn", "wnnnw", "nwnnw", "wwnnn", "nnwnw", "wnwnn", "nwwnn", "nnnww", "wnnwn", "nwnwn",
];

fn push_run(out: &mut Vec<bool>, dark: bool, modules: usize) {
    out.extend(std::iter::repeat(dark).take(modules));
}

/// Alternating runs from a string of module widths
fn push_widths(out: &mut Vec<bool>, widths: &str, dark_first: bool) {
    for (i, w) in widths.bytes().enumerate() {
        push_run(out, (i % 2 == 0) == dark_first, usize::from(w - b'0'));
    }
}

fn wide(run: u8) -> usize {
    if run == b'w' {
        3
    } else {
        1
    }
}

/// Bars of a module sequence, `unit` pixels per module
pub(crate) fn bars_from_modules(modules: &[bool], unit: u32) -> Vec<Bar> {
    let mut bars: Vec<Bar> = Vec::new();
    for &dark in modules {
        let color = Color::from_dark(dark);
        match bars.last_mut() {
            Some(bar) if bar.color == color => bar.len += unit,
            _ => bars.push(Bar::new(color, unit)),
        }
    }
    bars
}

pub(crate) fn mirror(modules: &[bool]) -> Vec<bool> {
    modules.iter().rev().copied().collect()
}

// ============================================================================
// Encoders
// ============================================================================

/// EAN-13 (13 digits, a leading 0 for UPC-A) or EAN-8, check digit included
pub(crate) fn ean_modules(digits: &str) -> Vec<bool> {
    let d: Vec<usize> = digits.bytes().map(|b| usize::from(b - b'0')).collect();
    let (parities, left, right) = match d.len() {
        13 => (EAN_PARITIES[d[0]], &d[1..7], &d[7..]),
        8 => ("AAAA", &d[..4], &d[4..]),
        n => panic!("no EAN variant has {n} digits"),
    };

    let mut m = Vec::new();
    push_widths(&mut m, "111", true);
    for (parity, &digit) in parities.bytes().zip(left) {
        if parity == b'A' {
            push_widths(&mut m, EAN_WIDTHS[digit], false);
        } else {
            let reversed: String = EAN_WIDTHS[digit].chars().rev().collect();
            push_widths(&mut m, &reversed, false);
        }
    }
    push_widths(&mut m, "11111", false);
    for &digit in right {
        push_widths(&mut m, EAN_WIDTHS[digit], true);
    }
    push_widths(&mut m, "111", true);
    m
}

/// Append the EAN check digit to `payload`
pub(crate) fn with_ean_check(payload: &str) -> String {
    let sum: u32 = payload
        .bytes()
        .rev()
        .enumerate()
        .map(|(i, b)| u32::from(b - b'0') * if i % 2 == 0 { 3 } else { 1 })
        .sum();
    format!("{payload}{}", (10 - sum % 10) % 10)
}

/// Code 128 values from the start code up to the check value
///
/// Even-length digit strings use code set C, everything else code set B
/// (printable ASCII only).
pub(crate) fn code128_values(text: &str, gs1: bool) -> Vec<u8> {
    let digits = !text.is_empty() && text.len() % 2 == 0 && text.bytes().all(|b| b.is_ascii_digit());
    let mut values = vec![if digits { 105 } else { 104 }];
    if gs1 {
        values.push(102);
    }
    if digits {
        values.extend(
            text.as_bytes()
                .chunks(2)
                .map(|pair| (pair[0] - b'0') * 10 + (pair[1] - b'0')),
        );
    } else {
        values.extend(text.bytes().map(|b| b - 32));
    }
    values.push(code128_check(&values));
    values
}

/// Check value of a start code and data values
pub(crate) fn code128_check(values: &[u8]) -> u8 {
    let sum = values
        .iter()
        .enumerate()
        .fold(0u32, |acc, (i, &v)| acc + i.max(1) as u32 * u32::from(v));
    (sum % 103) as u8
}

/// Modules of a full Code 128 symbol from its values, stop pattern included
pub(crate) fn code128_from_values(values: &[u8]) -> Vec<bool> {
    let mut m = Vec::new();
    for &v in values {
        push_widths(&mut m, CODE128_WIDTHS[usize::from(v)], true);
    }
    push_widths(&mut m, CODE128_WIDTHS[106], true);
    m
}

pub(crate) fn code128_modules(text: &str, gs1: bool) -> Vec<bool> {
    code128_from_values(&code128_values(text, gs1))
}

/// Code 39 with delimiters, wide runs three modules, one module gaps
pub(crate) fn code39_modules(text: &str) -> Vec<bool> {
    let mut m = Vec::new();
    for (n, c) in format!("*{text}*").bytes().enumerate() {
        if n > 0 {
            push_run(&mut m, false, 1);
        }
        let index = CODE39_CHARS.iter().position(|&x| x == c).unwrap();
        for (i, run) in CODE39_RUNS[index].bytes().enumerate() {
            push_run(&mut m, i % 2 == 0, wide(run));
        }
    }
    m
}

/// Interleaved 2 of 5 of an even number of digits, wide runs three modules
pub(crate) fn i25_modules(digits: &str) -> Vec<bool> {
    let runs = |d: u8| I25_RUNS[usize::from(d - b'0')].as_bytes();

    let mut m = Vec::new();
    push_widths(&mut m, "1111", true);
    for pair in digits.as_bytes().chunks(2) {
        for (dark, light) in runs(pair[0]).iter().zip(runs(pair[1])) {
            push_run(&mut m, true, wide(*dark));
            push_run(&mut m, false, wide(*light));
        }
    }
    push_widths(&mut m, "311", true);
    m
}

// ============================================================================
// Renderers
// ============================================================================

/// Paint `modules` left to right into the rows `rows` of a white canvas
pub(crate) fn render_band(
    modules: &[bool],
    unit: u32,
    quiet: u32,
    height: u32,
    rows: Range<u32>,
) -> GrayImage {
    let width = 2 * quiet + modules.len() as u32 * unit;
    GrayImage::from_fn(width, height, |x, y| {
        let dark = rows.contains(&y)
            && x >= quiet
            && modules
                .get(((x - quiet) / unit) as usize)
                .copied()
                .unwrap_or(false);
        Luma([if dark { 0 } else { 255 }])
    })
}

/// Paint `modules` left to right over the full height
pub(crate) fn render(modules: &[bool], unit: u32, quiet: u32, height: u32) -> GrayImage {
    render_band(modules, unit, quiet, height, 0..height)
}

/// Paint `modules` top to bottom over the full width
pub(crate) fn render_rotated(modules: &[bool], unit: u32, quiet: u32, width: u32) -> GrayImage {
    let upright = render(modules, unit, quiet, width);
    GrayImage::from_fn(width, upright.width(), |x, y| *upright.get_pixel(y, x))
}
