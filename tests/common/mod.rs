//! Encoders and renderers shared by the integration tests
#![allow(dead_code)]

use image::{GrayImage, Luma};
use std::ops::Range;

const EAN_A: [&str; 10] = [
    "0001101", "0011001", "0010011", "0111101", "0100011", "0110001", "0101111", "0111011",
    "0110111", "0001011",
];

/// Left half parity per leading digit, 'A' odd and 'B' even
const EAN_PARITY: [&str; 10] = [
    "AAAAAA", "AABABB", "AABBAB", "AABBBA", "ABAABB", "ABBAAB", "ABBBAA", "ABABAB", "ABABBA",
    "ABBABA",
];

const CODE39_CHARS: &str = "0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ-. $/+%*";

/// Narrow and wide runs per character, 'w' = wide
const CODE39_RUNS: [&str; 44] = [
    "nnnwwnwnn", "wnnwnnnnw", "nnwwnnnnw", "wnwwnnnnn", "nnnwwnnnw", "wnnwwnnnn", "nnwwwnnnn",
    "nnnwnnwnw", "wnnwnnwnn", "nnwwnnwnn", "wnnnnwnnw", "nnwnnwnnw", "wnwnnwnnn", "nnnnwwnnw",
    "wnnnwwnnn", "nnwnwwnnn", "nnnnnwwnw", "wnnnnwwnn", "nnwnnwwnn", "nnnnwwwnn", "wnnnnnnww",
    "nnwnnnnww", "wnwnnnnwn", "nnnnwnnww", "wnnnwnnwn", "nnwnwnnwn", "nnnnnnwww", "wnnnnnwwn",
    "nnwnnnwwn", "nnnnwnwwn", "wwnnnnnnw", "nwwnnnnnw", "wwwnnnnnn", "nwnnwnnnw", "wwnnwnnnn",
    "nwwnwnnnn", "nwnnnnwnw", "wwnnnnwnn", "nwwnnnwnn", "nwnwnwnnn", "nwnwnnnwn", "nwnnnwnwn",
    "nnnwnwnwn", "nwnnwnwnn",
];

fn bits(pattern: &str) -> impl Iterator<Item = bool> + '_ {
    pattern.bytes().map(|b| b == b'1')
}

fn invert(pattern: &str) -> String {
    pattern
        .chars()
        .map(|c| if c == '1' { '0' } else { '1' })
        .collect()
}

/// Modules of an EAN-13 symbol, true = dark
pub fn ean13(digits: &str) -> Vec<bool> {
    let d: Vec<usize> = digits.bytes().map(|b| (b - b'0') as usize).collect();
    assert_eq!(d.len(), 13);

    let mut modules: Vec<bool> = bits("101").collect();
    for (i, parity) in EAN_PARITY[d[0]].bytes().enumerate() {
        let a = EAN_A[d[1 + i]];
        let word = if parity == b'A' {
            a.to_string()
        } else {
            // set B is set C mirrored, set C the complement of set A
            invert(a).chars().rev().collect()
        };
        modules.extend(bits(&word));
    }
    modules.extend(bits("01010"));
    for &digit in &d[7..] {
        modules.extend(bits(&invert(EAN_A[digit])));
    }
    modules.extend(bits("101"));
    modules
}

/// Modules of a Code 39 symbol with its delimiters
pub fn code39(text: &str) -> Vec<bool> {
    let mut modules = Vec::new();
    for (n, c) in format!("*{text}*").chars().enumerate() {
        if n > 0 {
            modules.push(false);
        }
        let index = CODE39_CHARS.find(c).expect("character outside Code 39");
        for (i, run) in CODE39_RUNS[index].bytes().enumerate() {
            let width = if run == b'w' { 3 } else { 1 };
            modules.extend(std::iter::repeat(i % 2 == 0).take(width));
        }
    }
    modules
}

pub fn mirror(modules: &[bool]) -> Vec<bool> {
    modules.iter().rev().copied().collect()
}

/// White canvas of `width` x `height` with `modules` painted from
/// `(left, rows.start)`, `unit` pixels per module
pub fn render_at(
    modules: &[bool],
    unit: u32,
    left: u32,
    width: u32,
    height: u32,
    rows: Range<u32>,
) -> GrayImage {
    GrayImage::from_fn(width, height, |x, y| {
        let dark = rows.contains(&y)
            && x >= left
            && modules
                .get(((x - left) / unit) as usize)
                .copied()
                .unwrap_or(false);
        Luma([if dark { 0 } else { 255 }])
    })
}

/// `modules` centered horizontally with `quiet` pixels on either side
pub fn render(modules: &[bool], unit: u32, quiet: u32, height: u32) -> GrayImage {
    let width = 2 * quiet + modules.len() as u32 * unit;
    render_at(modules, unit, quiet, width, height, 0..height)
}

/// Rotate an image a quarter turn clockwise
pub fn rotate90(img: &GrayImage) -> GrayImage {
    image::imageops::rotate90(img)
}
