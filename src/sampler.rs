//! Averaged pixel sampling along scan lines
//!
//! A [`PixelSampler`] walks a raster one scan line at a time. Each sample is
//! the mean luminance of `concurrent_lines` adjacent parallel lines, which
//! suppresses print noise without blurring along the scan direction. After
//! the end of a line the sampler skips `line_skip` lines and starts over.
//!
//! Vertical scanning is the horizontal walk with coordinates transposed.

use crate::image::Raster;

/// Scan axis of a sampler
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Rows are scan lines (left-right and right-left sweeps)
    Horizontal,
    /// Columns are scan lines (top-down and bottom-up sweeps)
    Vertical,
}

pub(crate) struct PixelSampler<'a, R: Raster + ?Sized> {
    raster: &'a R,
    orientation: Orientation,
    concurrent_lines: u32,
    line_skip: u32,
    threshold: f64,

    /// Position along the current line
    pos: u32,
    /// First of the averaged lines
    line: u32,
    end: bool,

    /// Mean luminance at the current position, invalidated on moves
    cached: Option<f64>,
}

impl<'a, R: Raster + ?Sized> PixelSampler<'a, R> {
    pub(crate) fn new(
        raster: &'a R,
        orientation: Orientation,
        concurrent_lines: u32,
        line_skip: u32,
        threshold: f64,
    ) -> Self {
        let mut sampler = PixelSampler {
            raster,
            orientation,
            concurrent_lines: concurrent_lines.max(1),
            line_skip: line_skip.max(1),
            threshold,
            pos: 0,
            line: 0,
            end: false,
            cached: None,
        };
        sampler.end = sampler.line_length() == 0 || sampler.line_count() == 0;
        sampler
    }

    /// Number of samples on one scan line
    pub(crate) fn line_length(&self) -> u32 {
        match self.orientation {
            Orientation::Horizontal => self.raster.width(),
            Orientation::Vertical => self.raster.height(),
        }
    }

    /// Number of parallel lines in the raster
    pub(crate) fn line_count(&self) -> u32 {
        match self.orientation {
            Orientation::Horizontal => self.raster.height(),
            Orientation::Vertical => self.raster.width(),
        }
    }

    #[inline]
    fn pixel(&self, along: u32, across: u32) -> u8 {
        match self.orientation {
            Orientation::Horizontal => self.raster.luminance(along, across),
            Orientation::Vertical => self.raster.luminance(across, along),
        }
    }

    /// Mean luminance of the averaged lines at the current position
    pub(crate) fn luminance(&mut self) -> f64 {
        if let Some(lum) = self.cached {
            return lum;
        }

        let last = self.line_count().saturating_sub(1);
        let sum: u32 = (0..self.concurrent_lines)
            .map(|i| u32::from(self.pixel(self.pos, (self.line + i).min(last))))
            .sum();
        let lum = f64::from(sum) / f64::from(self.concurrent_lines);
        self.cached = Some(lum);
        lum
    }

    /// Classification of the current sample
    pub(crate) fn is_dark(&mut self) -> bool {
        self.luminance() < self.threshold
    }

    pub(crate) fn threshold(&self) -> f64 {
        self.threshold
    }

    pub(crate) fn set_threshold(&mut self, threshold: f64) {
        self.threshold = threshold;
    }

    /// Move to an arbitrary position
    pub(crate) fn seek(&mut self, pos: u32, line: u32) {
        self.pos = pos;
        self.line = line;
        self.end = pos >= self.line_length() || line >= self.line_count();
        self.cached = None;
    }

    /// Position along the current line
    pub(crate) fn position(&self) -> u32 {
        self.pos
    }

    /// First of the averaged lines
    pub(crate) fn line(&self) -> u32 {
        self.line
    }

    /// Whether lines are rows or columns of the raster
    pub(crate) fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub(crate) fn is_end(&self) -> bool {
        self.end
    }

    /// Step one sample forward
    ///
    /// Returns true when the step left the current line, either for the next
    /// line group or past the end of the raster.
    pub(crate) fn advance(&mut self) -> bool {
        if self.end {
            return true;
        }
        self.cached = None;

        if self.pos + 1 < self.line_length() {
            self.pos += 1;
            return false;
        }

        self.pos = 0;
        let remaining = (self.line_count() - 1) - self.line;
        if remaining <= self.line_skip {
            self.end = true;
        } else {
            // Past `line_skip + concurrent_lines - 1` the averaged rows clamp
            // to the last line.
            self.line += self.line_skip;
        }
        true
    }
}
