use crate::dataset::SParameterDataset;
use crate::frequency::Frequency;
use crate::trace::{TraceSelector, ViewMode};

/// Fraction of the value span added on each side of a proposed axis range
pub const VALUE_MARGIN: f64 = 0.1;
/// Margin used when every sample has the same value
pub const NOMINAL_MARGIN: f64 = 1.0;

/// Closed frequency and value intervals selected for display
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RangeBounds {
    freq: (f64, f64),
    value: (f64, f64),
}

impl RangeBounds {
    /// Reversed intervals are swapped so that `min <= max` always holds
    pub fn new(freq: (f64, f64), value: (f64, f64)) -> RangeBounds {
        RangeBounds {
            freq: ordered(freq),
            value: ordered(value),
        }
    }

    /// Full frequency extent and the proposed value range of one view
    pub fn full_extent(
        data: &SParameterDataset,
        trace: TraceSelector,
        mode: ViewMode,
    ) -> RangeBounds {
        let freq = data.freq().extent().unwrap_or((0.0, 0.0));
        let value = propose_value_bounds(&data.derive(trace, mode));
        RangeBounds { freq, value }
    }

    pub fn freq(&self) -> (f64, f64) {
        self.freq
    }

    pub fn value(&self) -> (f64, f64) {
        self.value
    }

    pub fn with_freq(self, min_hz: f64, max_hz: f64) -> RangeBounds {
        RangeBounds {
            freq: ordered((min_hz, max_hz)),
            ..self
        }
    }

    pub fn with_value(self, min: f64, max: f64) -> RangeBounds {
        RangeBounds {
            value: ordered((min, max)),
            ..self
        }
    }

    pub fn contains_freq(&self, f: f64) -> bool {
        self.freq.0 <= f && f <= self.freq.1
    }
}

fn ordered((a, b): (f64, f64)) -> (f64, f64) {
    if b < a {
        (b, a)
    } else {
        (a, b)
    }
}

/// Indices of the points inside `[min_hz, max_hz]`, in sweep order
pub fn indices_in_range(freq: &Frequency, min_hz: f64, max_hz: f64) -> Vec<usize> {
    freq.iter()
        .enumerate()
        .filter(|(_, f)| min_hz <= *f && *f <= max_hz)
        .map(|(i, _)| i)
        .collect()
}

/// Data extent widened by [`VALUE_MARGIN`] of the span on each side.
///
/// Non-finite values (a zero sample in dB) are skipped. A view without any
/// finite value proposes `(-1.0, 1.0)`.
pub fn propose_value_bounds(view: &[f64]) -> (f64, f64) {
    let finite = view.iter().copied().filter(|v| v.is_finite());
    let (min, max) = finite.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if min > max {
        return (-NOMINAL_MARGIN, NOMINAL_MARGIN);
    }

    let span = max - min;
    let margin = if span > 0.0 {
        VALUE_MARGIN * span
    } else {
        NOMINAL_MARGIN
    };
    (min - margin, max + margin)
}

/// Samples of one view restricted to a frequency interval
#[derive(Clone, Debug, PartialEq)]
pub struct VisibleTrace {
    pub trace: TraceSelector,
    pub mode: ViewMode,
    pub indices: Vec<usize>,
    pub freq_hz: Vec<f64>,
    pub values: Vec<f64>,
    pub bounds: RangeBounds,
}

impl VisibleTrace {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }
}

/// The value interval only sets the axis limits; samples outside it are kept
pub fn visible(
    data: &SParameterDataset,
    trace: TraceSelector,
    mode: ViewMode,
    bounds: RangeBounds,
) -> VisibleTrace {
    let view = data.derive(trace, mode);
    let (min_hz, max_hz) = bounds.freq();
    let indices = indices_in_range(data.freq(), min_hz, max_hz);
    let freq_hz = indices.iter().map(|&i| data.freq().freq_at(i)).collect();
    let values = indices.iter().map(|&i| view[i]).collect();

    VisibleTrace {
        trace,
        mode,
        indices,
        freq_hz,
        values,
        bounds,
    }
}
