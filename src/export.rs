use crate::dataset::SParameterDataset;
use crate::error::SweepError;
use crate::filter::indices_in_range;
use crate::trace::ViewMode;
use log::info;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

pub const DELIMITER: char = ';';
/// Decimal places of the frequency column (GHz)
pub const FREQ_PRECISION: usize = 6;
/// Decimal places of the value columns
pub const VALUE_PRECISION: usize = 4;

/// Delimited table of all four traces in one view mode.
///
/// Rows cover the samples inside `freq_range` (Hz, closed); `None` exports
/// the whole sweep. Columns follow the viewer order S11, S12, S21, S22.
pub fn export_csv(data: &SParameterDataset, mode: ViewMode, freq_range: Option<(f64, f64)>) -> String {
    let views = data.derive_all(mode);
    let (min_hz, max_hz) = freq_range
        .or_else(|| data.freq().extent())
        .unwrap_or((0.0, 0.0));

    let mut out = String::from("Frequency (GHz)");
    for (trace, _) in views.iter() {
        let _ = write!(out, "{}{} ({})", DELIMITER, trace, mode.unit());
    }
    out.push('\n');

    for i in indices_in_range(data.freq(), min_hz, max_hz) {
        let _ = write!(out, "{:.*}", FREQ_PRECISION, data.freq().get_ghz(i));
        for (_, view) in views.iter() {
            let _ = write!(out, "{}{:.*}", DELIMITER, VALUE_PRECISION, view[i]);
        }
        out.push('\n');
    }
    out
}

pub fn write_csv<P: AsRef<Path>>(
    data: &SParameterDataset,
    mode: ViewMode,
    freq_range: Option<(f64, f64)>,
    file_path: P,
) -> Result<(), SweepError> {
    let path = file_path.as_ref();
    let table = export_csv(data, mode, freq_range);
    fs::write(path, table)
        .map_err(|e| SweepError::FileWriteError(format!("{}: {}", path.display(), e)))?;
    info!("Exported {} to {}", mode, path.display());
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::frequency::Frequency;
    use crate::scale::Scale;
    use crate::util::comp_line;
    use faer::complex_native::c64;

    fn sample() -> SParameterDataset {
        SParameterDataset::new(
            Frequency::from_vec(vec![0.0003, 10.0, 20.0], Scale::Giga),
            vec![c64 { re: 1.0, im: 0.0 }; 3],
            vec![c64 { re: 0.1, im: 0.0 }; 3],
            vec![c64 { re: 0.0, im: -1.0 }; 3],
            vec![c64 { re: 0.0, im: 0.0 }; 3],
        )
        .unwrap()
    }

    #[test]
    fn export_db_table() {
        let table = export_csv(&sample(), ViewMode::AmplitudeDb, None);
        let exemplar = "Frequency (GHz);S11 (dB);S12 (dB);S21 (dB);S22 (dB)
0.000300;0.0000;0.0000;-20.0000;-inf
10.000000;0.0000;0.0000;-20.0000;-inf
20.000000;0.0000;0.0000;-20.0000;-inf";
        comp_line(exemplar, &table, "export_csv(dB)");
    }

    #[test]
    fn export_phase_range() {
        let table = export_csv(&sample(), ViewMode::PhaseDeg, Some((5e9, 25e9)));
        let exemplar = "Frequency (GHz);S11 (deg);S12 (deg);S21 (deg);S22 (deg)
10.000000;0.0000;-90.0000;0.0000;0.0000
20.000000;0.0000;-90.0000;0.0000;0.0000";
        comp_line(exemplar, &table, "export_csv(deg)");
    }

    #[test]
    fn export_empty_range() {
        let table = export_csv(&sample(), ViewMode::PhaseDeg, Some((30e9, 40e9)));
        assert_eq!(1, table.lines().count());
    }

    #[test]
    fn write_csv_unwritable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("sweep.csv");
        let err = write_csv(&sample(), ViewMode::AmplitudeDb, None, &path).unwrap_err();
        assert!(matches!(err, SweepError::FileWriteError(_)));
    }
}
