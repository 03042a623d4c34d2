use crate::error::SweepError;
use crate::scale::Scale;
use faer::Row;

// Frequency stores values in Hz
#[derive(Clone, Debug, PartialEq)]
pub struct Frequency {
    pts: Row<f64>,
}

impl Frequency {
    pub fn new(pts: Row<f64>) -> Frequency {
        Frequency { pts }
    }

    pub fn from_vec(f: Vec<f64>, unit: Scale) -> Frequency {
        let mut freq: Row<f64> = Row::zeros(f.len());
        for (i, val) in f.iter().enumerate() {
            freq.write(i, unit.unscale(*val));
        }
        Frequency { pts: freq }
    }

    pub fn freq(&self) -> &Row<f64> {
        &self.pts
    }

    pub fn freq_at(&self, pt: usize) -> f64 {
        self.pts.read(pt)
    }

    pub fn freq_scaled_at(&self, pt: usize, unit: Scale) -> f64 {
        unit.scale(self.pts.read(pt))
    }

    pub fn get_ghz(&self, pt: usize) -> f64 {
        self.freq_scaled_at(pt, Scale::Giga)
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.npts()).map(move |i| self.pts.read(i))
    }

    pub fn is_empty(&self) -> bool {
        self.npts() == 0
    }

    pub fn is_strictly_increasing(&self) -> bool {
        (1..self.npts()).all(|i| self.pts.read(i) > self.pts.read(i - 1))
    }

    /// First and last point, `None` for an empty sweep
    pub fn extent(&self) -> Option<(f64, f64)> {
        if self.is_empty() {
            return None;
        }
        Some((self.pts.read(0), self.pts.read(self.npts() - 1)))
    }

    pub fn npts(&self) -> usize {
        self.pts.ncols()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.iter().collect()
    }
}

/// Linear sweep requested from the analyzer
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrequencySweepPlan {
    start_hz: f64,
    stop_hz: f64,
    npts: usize,
}

impl FrequencySweepPlan {
    pub fn new(start_hz: f64, stop_hz: f64, npts: usize) -> Result<Self, SweepError> {
        if npts < 2 {
            return Err(SweepError::InvalidSweepPlan(format!(
                "point count must be at least 2, got {}",
                npts
            )));
        }
        if !start_hz.is_finite() || !stop_hz.is_finite() {
            return Err(SweepError::InvalidSweepPlan(format!(
                "sweep bounds must be finite, got {} to {} Hz",
                start_hz, stop_hz
            )));
        }
        if start_hz >= stop_hz {
            return Err(SweepError::InvalidSweepPlan(format!(
                "start frequency {} Hz must be below stop frequency {} Hz",
                start_hz, stop_hz
            )));
        }
        let plan = FrequencySweepPlan {
            start_hz,
            stop_hz,
            npts,
        };
        let step = plan.step_hz();
        if !step.is_finite() {
            return Err(SweepError::InvalidSweepPlan(format!(
                "span {} to {} Hz is not representable",
                start_hz, stop_hz
            )));
        }
        // a step below the float resolution at these frequencies repeats points
        let mut prev = start_hz;
        for i in 1..npts {
            let f = plan.point(i);
            if f <= prev {
                return Err(SweepError::InvalidSweepPlan(format!(
                    "{} points between {} and {} Hz are not distinct",
                    npts, start_hz, stop_hz
                )));
            }
            prev = f;
        }
        Ok(plan)
    }

    pub fn start_hz(&self) -> f64 {
        self.start_hz
    }

    pub fn stop_hz(&self) -> f64 {
        self.stop_hz
    }

    pub fn npts(&self) -> usize {
        self.npts
    }

    pub fn step_hz(&self) -> f64 {
        (self.stop_hz - self.start_hz) / (self.npts - 1) as f64
    }

    // the last point is pinned so rounding never moves the stop frequency
    fn point(&self, i: usize) -> f64 {
        if i == self.npts - 1 {
            self.stop_hz
        } else {
            self.start_hz + (i as f64) * self.step_hz()
        }
    }

    pub fn frequencies(&self) -> Frequency {
        Frequency::new(Row::<f64>::from_fn(self.npts, |i| self.point(i)))
    }
}
