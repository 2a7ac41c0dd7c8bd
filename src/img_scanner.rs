//! Image sweeps
//!
//! A [`Sweep`] walks the raster along one axis, one sampled line group at a
//! time, and offers every plausible quiet zone to the configured decoders.
//! Horizontal sweeps serve the left-right and right-left directions,
//! vertical sweeps top-down and bottom-up. A reverse direction never samples
//! the raster again: it is read by the decoders' reverse grammars from the
//! same bars.
//!
//! [`ImageScanner`] chains the sweeps into a lazy iterator of raw
//! observations.

use crate::bars::{Bar, BarCursor};
use crate::config::internal::DecoderState;
use crate::config::ScanDirections;
use crate::decoder::{Decoded, Decoder, SymbologyDecoder};
use crate::image::Raster;
use crate::line_scanner::Tokenizer;
use crate::sampler::Orientation;
use crate::symbol::Symbol;
use std::collections::VecDeque;
use tracing::trace;

/// Shortest light run that may serve as a quiet zone
pub(crate) const MIN_QUIET_PX: u32 = 7;

/// Whether a symbol was read in scan order or backwards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Grammar {
    Forward,
    Reverse,
}

// ============================================================================
// Sweep
// ============================================================================

/// One pass over the raster along one axis
pub(crate) struct Sweep<'a, R: Raster + ?Sized> {
    tokenizer: Tokenizer<'a, R>,
    forward: bool,
    reverse: bool,

    /// Tokens of the current line group
    bars: Vec<Bar>,
    /// Start pixel of every token, plus the end of the line
    offsets: Vec<u32>,
    /// Next token to test as a quiet zone
    pos: usize,
    /// First line of the current group
    line: u32,
}

impl<'a, R: Raster + ?Sized> Sweep<'a, R> {
    /// Sweep for `orientation`, or `None` if no direction of that axis is
    /// requested
    pub(crate) fn new(raster: &'a R, orientation: Orientation, state: &DecoderState) -> Option<Self> {
        let dirs = state.scanner.directions;
        let (forward, reverse) = match orientation {
            Orientation::Horizontal => (
                dirs.contains(ScanDirections::LEFT_RIGHT),
                dirs.contains(ScanDirections::RIGHT_LEFT),
            ),
            Orientation::Vertical => (
                dirs.contains(ScanDirections::TOP_DOWN),
                dirs.contains(ScanDirections::BOTTOM_UP),
            ),
        };
        if !forward && !reverse {
            return None;
        }

        Some(Sweep {
            tokenizer: Tokenizer::from_config(raster, orientation, &state.scanner),
            forward,
            reverse,
            bars: Vec::new(),
            offsets: Vec::new(),
            pos: 0,
            line: 0,
        })
    }

    /// Tokenize the next line group; false once the raster is exhausted
    fn load_line(&mut self) -> bool {
        let Some(line) = self.tokenizer.next_line(&mut self.bars) else {
            return false;
        };
        self.line = line;
        self.pos = 0;
        self.offsets.clear();
        let mut offset = 0;
        self.offsets.push(offset);
        for bar in &self.bars {
            offset += bar.len;
            self.offsets.push(offset);
        }
        true
    }

    /// Offer the bars after the quiet zone at `pos` to every decoder
    fn try_position(&self, decoders: &[Decoder], state: &DecoderState) -> Option<(Decoded, Grammar)> {
        let quiet = self.bars[self.pos];
        if !quiet.is_space() || quiet.len < MIN_QUIET_PX {
            return None;
        }
        let cursor = BarCursor::new(&self.bars, self.pos + 1);

        for decoder in decoders {
            let attempts = [
                (self.forward, Grammar::Forward),
                (self.reverse, Grammar::Reverse),
            ];
            for (wanted, grammar) in attempts {
                if !wanted {
                    continue;
                }
                let decoded = match grammar {
                    Grammar::Forward => decoder.try_decode(cursor, quiet.len),
                    Grammar::Reverse => decoder.try_reverse_decode(cursor, quiet.len),
                };
                let Some(d) = decoded else {
                    continue;
                };
                if state.accepts(d.symbol_type, &d.text) {
                    return Some((d, grammar));
                }
                trace!(
                    family = ?decoder.family(),
                    symbol_type = %d.symbol_type,
                    len = d.text.chars().count(),
                    "decode filtered by configuration"
                );
            }
        }
        None
    }

    /// Image coordinates of a symbol whose first bar is token `first`
    fn origin(&self, first: usize, grammar: Grammar) -> (u32, u32) {
        let along = match grammar {
            Grammar::Forward => self.offsets[first],
            Grammar::Reverse => self.offsets[first + 1].saturating_sub(1),
        };
        match self.tokenizer.orientation() {
            Orientation::Horizontal => (along, self.line),
            Orientation::Vertical => (self.line, along),
        }
    }

    /// Continue the sweep up to the next recognized symbol
    pub(crate) fn next_symbol(
        &mut self,
        decoders: &[Decoder],
        state: &DecoderState,
    ) -> Option<Symbol> {
        loop {
            if self.pos >= self.bars.len() && !self.load_line() {
                return None;
            }

            while self.pos < self.bars.len() {
                if let Some((decoded, grammar)) = self.try_position(decoders, state) {
                    let first = self.pos + 1;
                    let (x, y) = self.origin(first, grammar);
                    self.pos = first + decoded.consumed;
                    return Some(Symbol::new(decoded.symbol_type, decoded.text, x, y));
                }
                self.pos += 1;
            }
        }
    }
}

// ============================================================================
// Lazy scanning
// ============================================================================

/// Lazy iterator over the raw observations of a scan
///
/// Created by [`Scanner::scan_iter`](crate::Scanner::scan_iter). Scanning
/// suspends between calls to `next`. Observations are filtered by the
/// enabled symbologies and length limits but neither pooled nor deduplicated:
/// a symbol crossing several line groups is reported once per group.
pub struct ImageScanner<'a, R: Raster + ?Sized> {
    state: &'a DecoderState,
    decoders: &'a [Decoder],
    sweeps: VecDeque<Sweep<'a, R>>,
}

impl<'a, R: Raster + ?Sized> ImageScanner<'a, R> {
    pub(crate) fn new(raster: &'a R, state: &'a DecoderState, decoders: &'a [Decoder]) -> Self {
        let sweeps = [Orientation::Horizontal, Orientation::Vertical]
            .into_iter()
            .filter_map(|orientation| Sweep::new(raster, orientation, state))
            .collect();
        ImageScanner {
            state,
            decoders,
            sweeps,
        }
    }
}

impl<R: Raster + ?Sized> Iterator for ImageScanner<'_, R> {
    type Item = Symbol;

    fn next(&mut self) -> Option<Symbol> {
        while let Some(sweep) = self.sweeps.front_mut() {
            if let Some(symbol) = sweep.next_symbol(self.decoders, self.state) {
                return Some(symbol);
            }
            self.sweeps.pop_front();
        }
        None
    }
}
