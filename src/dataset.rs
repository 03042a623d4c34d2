use crate::error::SweepError;
use crate::frequency::Frequency;
use crate::trace::{TraceSelector, ViewMode};
use faer::complex_native::c64;

/// One completed two-port sweep.
///
/// Traces are stored row-major by (port_out, port_in) and are index-aligned
/// with the frequency points. There is no mutable access after construction;
/// a new sweep produces a new dataset.
#[derive(Clone, Debug, PartialEq)]
pub struct SParameterDataset {
    freq: Frequency,
    traces: [Vec<c64>; 4],
    name: String,
    comments: String,
}

impl SParameterDataset {
    /// Builds a dataset from traces given in [`TraceSelector::ACQUISITION_ORDER`]
    pub fn new(
        freq: Frequency,
        s11: Vec<c64>,
        s21: Vec<c64>,
        s12: Vec<c64>,
        s22: Vec<c64>,
    ) -> Result<SParameterDataset, SweepError> {
        let npts = freq.npts();
        if npts == 0 {
            return Err(SweepError::MalformedSweepData {
                expected: 1,
                found: 0,
            });
        }
        if !freq.is_strictly_increasing() {
            return Err(SweepError::InvalidSweepPlan(
                "frequencies must be strictly increasing".to_string(),
            ));
        }
        for trace in [&s11, &s21, &s12, &s22] {
            if trace.len() != npts {
                return Err(SweepError::MalformedSweepData {
                    expected: npts,
                    found: trace.len(),
                });
            }
        }

        Ok(SParameterDataset {
            freq,
            traces: [s11, s12, s21, s22],
            name: String::new(),
            comments: String::new(),
        })
    }

    pub fn with_name(mut self, name: &str) -> SParameterDataset {
        self.name = name.to_string();
        self
    }

    pub fn with_comments(mut self, comments: &str) -> SParameterDataset {
        self.comments = comments.to_string();
        self
    }

    pub fn comments(&self) -> &str {
        &self.comments
    }

    pub fn freq(&self) -> &Frequency {
        &self.freq
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn npts(&self) -> usize {
        self.freq.npts()
    }

    pub fn trace(&self, trace: TraceSelector) -> &[c64] {
        &self.traces[trace.index()]
    }

    /// S-matrix at one frequency point, `[[S11, S12], [S21, S22]]`
    pub fn point(&self, pt: usize) -> [[c64; 2]; 2] {
        [
            [self.traces[0][pt], self.traces[1][pt]],
            [self.traces[2][pt], self.traces[3][pt]],
        ]
    }

    pub fn derive(&self, trace: TraceSelector, mode: ViewMode) -> Vec<f64> {
        self.trace(trace).iter().map(|z| mode.apply(*z)).collect()
    }

    pub fn db(&self, trace: TraceSelector) -> Vec<f64> {
        self.derive(trace, ViewMode::AmplitudeDb)
    }

    pub fn deg(&self, trace: TraceSelector) -> Vec<f64> {
        self.derive(trace, ViewMode::PhaseDeg)
    }

    /// Views of all four traces in [`TraceSelector::DISPLAY_ORDER`]
    pub fn derive_all(&self, mode: ViewMode) -> [(TraceSelector, Vec<f64>); 4] {
        TraceSelector::DISPLAY_ORDER.map(|trace| (trace, self.derive(trace, mode)))
    }
}
