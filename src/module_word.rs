//! Module word resolution
//!
//! A module word packs one symbol's bars into bits, MSB first: each bar is
//! rounded to a whole number of modules and contributes that many ones (dark)
//! or zeros (light). The word then serves as a table key.
//!
//! Resolution is where print distortion is absorbed. If the window does not
//! add up with the current unit width, [`resolve`] walks a fixed ladder of
//! corrections before giving up.

use crate::bars::{Bar, BarWindow};

/// Bit-packed module pattern of one symbol
pub(crate) type ModuleWord = u16;

/// Direction in which a window is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ReadOrder {
    Forward,
    Reverse,
}

/// Maximum relative distance between a re-estimated unit width and the
/// current one
const UNIT_REESTIMATE_BAND: f64 = 0.4;

/// Largest module width a quiet zone of `quiet_px` pixels can vouch for
pub(crate) fn max_unit_width(quiet_px: u32, min_quiet_modules: u32) -> f64 {
    f64::from(quiet_px) / f64::from(min_quiet_modules) * (1.0 + 0.35)
}

/// Odd number of dark modules
#[inline]
pub(crate) fn parity(word: ModuleWord) -> bool {
    word.count_ones() & 1 == 1
}

fn pack<'b>(bars: impl Iterator<Item = &'b Bar>, u: f64, modules: u32) -> Option<ModuleWord> {
    let mut word: u32 = 0;
    let mut sum = 0;
    for bar in bars {
        let m = (f64::from(bar.len) / u).round();
        if !(1.0..=4.0).contains(&m) {
            return None;
        }
        let m = m as u32;
        sum += m;
        if sum > 16 {
            return None;
        }
        word <<= m;
        if bar.is_bar() {
            word |= (1 << m) - 1;
        }
    }
    // an all-light window has no dark module to key on
    if sum != modules || word == 0 {
        return None;
    }
    ModuleWord::try_from(word).ok()
}

/// Module word of `bars` at unit width `u`, if it spans exactly `modules`
pub(crate) fn module_word(
    bars: &[Bar],
    u: f64,
    modules: u32,
    order: ReadOrder,
) -> Option<ModuleWord> {
    match order {
        ReadOrder::Forward => pack(bars.iter(), u, modules),
        ReadOrder::Reverse => pack(bars.iter().rev(), u, modules),
    }
}

/// Module word of a window, correcting the unit width on failure
///
/// Tries, in order: `u` as given; the unit width re-estimated from the
/// window's own size (rejecting the window if that differs from `u` by more
/// than 40%, and otherwise keeping a weighted estimate in `u` for the
/// following symbols); `u` scaled by 0.75 and 1.25; dark bars grown by one
/// pixel against light bars, then the reverse.
pub(crate) fn resolve(
    window: &BarWindow,
    u: &mut f64,
    modules: u32,
    order: ReadOrder,
) -> Option<ModuleWord> {
    if let Some(word) = module_word(window.bars(), *u, modules, order) {
        return Some(word);
    }

    let estimate = f64::from(window.total_px()) / f64::from(modules);
    if estimate != *u {
        if (estimate - *u).abs() > UNIT_REESTIMATE_BAND * *u {
            return None;
        }
        *u = (2.0 * estimate + *u) / 3.0;
        if let Some(word) = module_word(window.bars(), *u, modules, order) {
            return Some(word);
        }
    }

    for scale in [0.75, 1.25] {
        if let Some(word) = module_word(window.bars(), *u * scale, modules, order) {
            return Some(word);
        }
    }

    // print growth, then print shrink
    for (dark, light) in [(1, -1), (-1, 1)] {
        let nudged = window.nudged(dark, light);
        if let Some(word) = module_word(nudged.bars(), *u, modules, order) {
            return Some(word);
        }
    }

    None
}
