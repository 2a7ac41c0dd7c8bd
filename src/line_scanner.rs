//! Scan line tokenizer
//!
//! This module turns the averaged sample stream of a [`PixelSampler`] into
//! alternating dark/light [`Bar`] tokens.
//!
//! The binarization threshold starts at the configured seed on every line and
//! is nudged toward the locally observed luminance whenever the current
//! classification and the running mean of the current run strongly disagree.
//! This follows gradual illumination changes across a line, e.g. a barcode on
//! a curved or unevenly lit surface. The margins involved are the
//! empirically tuned [`ThresholdTuning`] constants.
//!
//! Bar lengths get a subpixel correction: the sample that closes a run is
//! usually a partially covered pixel, and its luminance tells how much of it
//! still belongs to the run.

use crate::bars::Bar;
use crate::color::Color;
use crate::config::internal::{DecoderState, ScannerConfig};
use crate::config::{DecoderConfig, ThresholdTuning};
use crate::image::Raster;
use crate::sampler::{Orientation, PixelSampler};
use crate::Result;

/// Bar tokens of the scan lines of a raster
///
/// This is the stage below [`Scanner`](crate::Scanner): it yields the dark
/// and light runs that decoders read, one line group after another. Iterating
/// pulls single bars with the step tuning; [`next_line`](Tokenizer::next_line)
/// reads a full line with the line tuning.
///
/// # Example
/// ```
/// use bardecode::{DecoderConfig, Image, Orientation, Tokenizer};
///
/// let data = [255u8, 255, 255, 0, 0, 255, 255, 255];
/// let image = Image::from_gray(&data, 8, 1).unwrap();
/// let config = DecoderConfig::new().concurrent_lines(1);
/// let mut tokenizer = Tokenizer::new(&image, Orientation::Horizontal, &config).unwrap();
///
/// let mut bars = Vec::new();
/// assert_eq!(tokenizer.next_line(&mut bars), Some(0));
/// let widths: Vec<u32> = bars.iter().map(|bar| bar.width()).collect();
/// assert_eq!(widths, [3, 2, 3]);
/// ```
pub struct Tokenizer<'a, R: Raster + ?Sized> {
    sampler: PixelSampler<'a, R>,
    initial_threshold: f64,
    tuning: ThresholdTuning,
}

/// Length of a run of `samples` closed by a boundary sample of luminance `lum`
#[inline]
fn run_length(color: Color, samples: f64, lum: f64) -> u32 {
    let covered = match color {
        Color::Space => lum / 255.0,
        Color::Bar => 1.0 - lum / 255.0,
    };
    (samples + covered).round() as u32
}

impl<'a, R: Raster + ?Sized> Tokenizer<'a, R> {
    /// Tokenizer over `raster` along `orientation`
    ///
    /// Line averaging, line skip, seed threshold and threshold tuning come
    /// from `config`. Returns [`Error::InvalidConfig`](crate::Error::InvalidConfig)
    /// if the configuration does not validate.
    pub fn new(raster: &'a R, orientation: Orientation, config: &DecoderConfig) -> Result<Self> {
        config.validate()?;
        let state = DecoderState::from(config);
        Ok(Self::from_config(raster, orientation, &state.scanner))
    }

    pub(crate) fn from_config(raster: &'a R, orientation: Orientation, cfg: &ScannerConfig) -> Self {
        let sampler = PixelSampler::new(
            raster,
            orientation,
            cfg.concurrent_lines,
            cfg.line_skip,
            cfg.threshold,
        );
        Tokenizer {
            initial_threshold: cfg.threshold,
            sampler,
            tuning: cfg.tuning,
        }
    }

    /// Index of the line group read next
    pub fn line_index(&self) -> u32 {
        self.sampler.line()
    }

    /// Whether every line group has been read
    pub fn is_end(&self) -> bool {
        self.sampler.is_end()
    }

    pub fn orientation(&self) -> Orientation {
        self.sampler.orientation()
    }

    /// Current classification threshold
    pub fn threshold(&self) -> f64 {
        self.sampler.threshold()
    }

    /// Continue at sample `along` of line `line`
    ///
    /// Line groups after it follow the configured line skip.
    pub fn seek(&mut self, along: u32, line: u32) {
        self.sampler.seek(along, line);
    }

    fn retune(&mut self, threshold: f64) {
        self.sampler.set_threshold(
            threshold.clamp(self.tuning.min_threshold, self.tuning.max_threshold),
        );
    }

    /// Tokenize the rest of the current line into `bars`
    ///
    /// Returns the index of the line group that was read, or `None` once the
    /// raster is exhausted. The last bar of the line is emitted even though
    /// it may be cut off by the raster edge.
    pub fn next_line(&mut self, bars: &mut Vec<Bar>) -> Option<u32> {
        bars.clear();
        if self.sampler.is_end() {
            return None;
        }

        let line = self.sampler.line();
        let contrast = self.tuning.line_contrast;
        let drift = self.tuning.line_drift;
        let dark_reset = f64::from(self.tuning.line_dark_reset);

        self.sampler.set_threshold(self.initial_threshold);
        let mut color = Color::from_dark(self.sampler.is_dark());
        let mut count = 0.0;
        let mut sum = 0.0;
        let mut old_mean = self.sampler.luminance();

        loop {
            let lum = self.sampler.luminance();
            let thr = self.sampler.threshold();
            let n = count + 1.0;
            let mean = (sum + lum) / n;

            match color {
                Color::Space if lum > thr && lum < mean - contrast => {
                    self.retune(mean - contrast);
                }
                Color::Space if lum > thr && old_mean > 0.0 && lum < old_mean - drift => {
                    self.retune(old_mean - drift);
                }
                Color::Bar if lum < thr && lum > mean + contrast => {
                    self.retune(mean + contrast);
                }
                Color::Bar if lum < thr && old_mean > 0.0 && lum > old_mean + drift => {
                    self.retune(old_mean + drift);
                }
                // a long dark run getting darker still was background
                Color::Bar if n > dark_reset && lum < thr && lum < mean - contrast => {
                    self.retune(mean - contrast);
                }
                _ => {}
            }
            old_mean = mean;

            if Color::from_dark(self.sampler.is_dark()) != color {
                bars.push(Bar::new(color, run_length(color, count, lum)));
                color = !color;
                count = 1.0;
                sum = lum;
            } else {
                count = n;
                sum += lum;
            }

            if self.sampler.advance() {
                break;
            }
        }

        bars.push(Bar::new(color, count.round() as u32));
        Some(line)
    }
}

impl<R: Raster + ?Sized> Iterator for Tokenizer<'_, R> {
    type Item = Bar;

    /// Pull a single bar
    ///
    /// Bars never straddle two lines; the threshold is reset whenever a new
    /// line starts.
    fn next(&mut self) -> Option<Bar> {
        if self.sampler.is_end() {
            return None;
        }
        if self.sampler.position() == 0 {
            self.sampler.set_threshold(self.initial_threshold);
        }

        let contrast = self.tuning.step_contrast;
        let dark_reset = f64::from(self.tuning.step_dark_reset);

        let color = Color::from_dark(self.sampler.is_dark());
        let mut count = 0.0;
        let mut sum = 0.0;

        loop {
            sum += self.sampler.luminance();
            count += 1.0;
            if self.sampler.advance() {
                return Some(Bar::new(color, count as u32));
            }

            let lum = self.sampler.luminance();
            let thr = self.sampler.threshold();
            let mean = sum / count;
            match color {
                Color::Space if lum > thr && lum < mean - contrast => {
                    self.retune(mean - contrast);
                }
                Color::Bar if lum < thr && lum > mean + contrast => {
                    self.retune(mean + contrast);
                }
                Color::Bar if count > dark_reset && lum < thr && lum < mean - contrast => {
                    self.retune(mean - contrast);
                }
                _ => {}
            }

            if Color::from_dark(self.sampler.is_dark()) != color {
                return Some(Bar::new(color, run_length(color, count, lum)));
            }
        }
    }
}
