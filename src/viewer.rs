//! Selection state behind an interactive sweep viewer.
//!
//! Widgets translate user events into calls on [`Viewer`]; rendering reads
//! the result of [`Viewer::plot`]. The viewer never mutates a loaded
//! dataset, it swaps in a new one.

use crate::dataset::SParameterDataset;
use crate::error::SweepError;
use crate::export::export_csv;
use crate::file::NetworkLoader;
use crate::filter::{visible, RangeBounds, VisibleTrace};
use crate::probe::{nearest_sample, Probe};
use crate::trace::{TraceSelector, ViewMode};
use log::{info, warn};
use std::path::Path;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct Viewer {
    data: Option<Arc<SParameterDataset>>,
    trace: TraceSelector,
    mode: ViewMode,
    bounds: Option<RangeBounds>,
}

impl Default for Viewer {
    fn default() -> Self {
        Viewer {
            data: None,
            trace: TraceSelector::S11,
            mode: ViewMode::AmplitudeDb,
            bounds: None,
        }
    }
}

impl Viewer {
    pub fn new() -> Viewer {
        Viewer::default()
    }

    /// Replaces the dataset only when the load succeeds
    pub fn load<L: NetworkLoader>(&mut self, loader: &L, path: &Path) -> Result<(), SweepError> {
        match loader.load(path) {
            Ok(data) => {
                info!("Loaded {} points from {}", data.npts(), path.display());
                self.set_dataset(Arc::new(data));
                Ok(())
            }
            Err(e) => {
                warn!("Keeping previous sweep, load failed: {e}");
                Err(e)
            }
        }
    }

    /// Shows a dataset and resets both ranges to its extent
    pub fn set_dataset(&mut self, data: Arc<SParameterDataset>) {
        self.data = Some(data);
        self.reset_bounds();
    }

    pub fn dataset(&self) -> Option<&Arc<SParameterDataset>> {
        self.data.as_ref()
    }

    pub fn trace(&self) -> TraceSelector {
        self.trace
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn bounds(&self) -> Option<RangeBounds> {
        self.bounds
    }

    pub fn select_trace(&mut self, trace: TraceSelector) {
        self.trace = trace;
        self.reset_bounds();
    }

    pub fn select_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
        self.reset_bounds();
    }

    /// Bounds outside the data extent are kept as given
    pub fn set_freq_range(&mut self, min_hz: f64, max_hz: f64) {
        if let Some(bounds) = self.bounds {
            self.bounds = Some(bounds.with_freq(min_hz, max_hz));
        }
    }

    pub fn set_value_range(&mut self, min: f64, max: f64) {
        if let Some(bounds) = self.bounds {
            self.bounds = Some(bounds.with_value(min, max));
        }
    }

    fn reset_bounds(&mut self) {
        self.bounds = self
            .data
            .as_ref()
            .map(|data| RangeBounds::full_extent(data, self.trace, self.mode));
    }

    /// Samples to draw for the current selection, `None` before a load
    pub fn plot(&self) -> Option<VisibleTrace> {
        let data = self.data.as_ref()?;
        let bounds = self.bounds?;
        Some(visible(data, self.trace, self.mode, bounds))
    }

    /// Sample of the selected view nearest to `freq_hz`
    pub fn probe(&self, freq_hz: f64) -> Option<Probe> {
        let data = self.data.as_ref()?;
        let view = data.derive(self.trace, self.mode);
        nearest_sample(data.freq(), &view, freq_hz)
    }

    /// Table of the current mode over the selected frequency range
    pub fn export(&self) -> Option<String> {
        let data = self.data.as_ref()?;
        let freq_range = self.bounds.map(|b| b.freq());
        Some(export_csv(data, self.mode, freq_range))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::frequency::FrequencySweepPlan;
    use crate::trace::from_polar;
    use faer::complex_native::c64;

    struct FixedLoader(Option<SParameterDataset>);

    impl NetworkLoader for FixedLoader {
        fn load(&self, path: &Path) -> Result<SParameterDataset, SweepError> {
            self.0
                .clone()
                .ok_or_else(|| SweepError::FileLoadError(format!("{}", path.display())))
        }
    }

    fn sweep() -> SParameterDataset {
        let freq = FrequencySweepPlan::new(1e9, 5e9, 5).unwrap().frequencies();
        let s11: Vec<c64> = (0..5)
            .map(|k| from_polar(0.1 * (k + 1) as f64, 0.0))
            .collect();
        let s21 = vec![c64 { re: 0.0, im: 1.0 }; 5];
        SParameterDataset::new(freq, s11.clone(), s21.clone(), s21, s11).unwrap()
    }

    #[test]
    fn viewer_empty() {
        let viewer = Viewer::new();
        assert!(viewer.plot().is_none());
        assert!(viewer.probe(1e9).is_none());
        assert!(viewer.export().is_none());
        assert!(viewer.bounds().is_none());
    }

    #[test]
    fn viewer_load_resets_bounds() {
        let mut viewer = Viewer::new();
        viewer.load(&FixedLoader(Some(sweep())), Path::new("a.s2p")).unwrap();
        let bounds = viewer.bounds().unwrap();
        assert_eq!((1e9, 5e9), bounds.freq());
        let plot = viewer.plot().unwrap();
        assert_eq!(5, plot.len());
        assert_eq!(TraceSelector::S11, plot.trace);
    }

    #[test]
    fn viewer_failed_load_keeps_dataset() {
        let mut viewer = Viewer::new();
        viewer.load(&FixedLoader(Some(sweep())), Path::new("a.s2p")).unwrap();
        viewer.set_freq_range(2e9, 3e9);
        let before = viewer.dataset().cloned();

        let err = viewer.load(&FixedLoader(None), Path::new("broken.s2p"));
        assert!(matches!(err, Err(SweepError::FileLoadError(_))));
        assert_eq!(before, viewer.dataset().cloned());
        assert_eq!((2e9, 3e9), viewer.bounds().unwrap().freq());
    }

    #[test]
    fn viewer_selection_resets_value_range() {
        let mut viewer = Viewer::new();
        viewer.set_dataset(Arc::new(sweep()));
        viewer.set_value_range(-5.0, 5.0);
        viewer.set_freq_range(2e9, 4e9);

        viewer.select_mode(ViewMode::PhaseDeg);
        viewer.select_trace(TraceSelector::S21);
        let bounds = viewer.bounds().unwrap();
        assert_eq!((1e9, 5e9), bounds.freq());
        assert_eq!((89.0, 91.0), bounds.value());
    }

    #[test]
    fn viewer_out_of_range_frequency() {
        let mut viewer = Viewer::new();
        viewer.set_dataset(Arc::new(sweep()));
        viewer.set_freq_range(10e9, 20e9);
        let plot = viewer.plot().unwrap();
        assert!(plot.is_empty());
        assert_eq!((10e9, 20e9), plot.bounds.freq());
        assert_eq!(1, viewer.export().unwrap().lines().count());
    }

    #[test]
    fn viewer_probe() {
        let mut viewer = Viewer::new();
        viewer.set_dataset(Arc::new(sweep()));
        let probe = viewer.probe(2.9e9).unwrap();
        assert_eq!(2, probe.index);
        assert_eq!(3e9, probe.freq_hz);
        assert_eq!(viewer.dataset().unwrap().db(TraceSelector::S11)[2], probe.value);
    }
}
