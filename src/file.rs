use crate::dataset::SParameterDataset;
use crate::error::SweepError;
use crate::frequency::Frequency;
use crate::scale::Scale;
use crate::trace::{ComplexFormat, TraceSelector};
use faer::complex_native::c64;
use log::{debug, info};
use regex::Regex;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use std::str::FromStr;

/// Source of previously saved sweeps for the viewer
pub trait NetworkLoader {
    fn load(&self, path: &Path) -> Result<SParameterDataset, SweepError>;
}

/// Two-port Touchstone (`.s2p`) reader
#[derive(Clone, Copy, Debug, Default)]
pub struct TouchstoneLoader;

impl NetworkLoader for TouchstoneLoader {
    fn load(&self, path: &Path) -> Result<SParameterDataset, SweepError> {
        read_touchstone(path)
    }
}

fn load_err(msg: String) -> SweepError {
    SweepError::FileLoadError(msg)
}

pub fn read_touchstone<P: AsRef<Path>>(file_path: P) -> Result<SParameterDataset, SweepError> {
    let path = file_path.as_ref();
    let re_file_ext = Regex::new(r"(?i)^s(\d+)p$").expect("Invalid regex!");

    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        if let Some(caps) = re_file_ext.captures(ext) {
            if &caps[1] != "2" {
                return Err(load_err(format!(
                    "{}: only two-port files are supported",
                    path.display()
                )));
            }
        }
    }

    let content = fs::read_to_string(path)
        .map_err(|e| load_err(format!("{}: {}", path.display(), e)))?;
    let name = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default();
    info!("Loading {}", path.display());
    parse_touchstone(&content).map(|data| data.with_name(name))
}

/// Parses Touchstone v1 text holding a two-port S-parameter sweep.
///
/// Data rows are `f S11 S21 S12 S22`, each parameter as a pair in the format
/// named by the option line. Noise parameters following the sweep are skipped.
pub fn parse_touchstone(content: &str) -> Result<SParameterDataset, SweepError> {
    let re_file_opts = Regex::new(
        r"(?i)^#\s*(?<freq>[kmgt]?hz)?\s*(?<param>[ghsyz])?\s*(?<format>db|ma|ri)?\s*(?:r\s+(?<impedance>\d+\.?\d*))?\s*$",
    )
    .expect("Invalid regex!");

    let mut freq_unit = Scale::Giga;
    let mut format = ComplexFormat::MA;
    let mut option_seen = false;
    let mut comments = String::new();
    let mut freq_tmp: Vec<f64> = vec![];
    let mut traces: [Vec<c64>; 4] = Default::default();

    for (lineno, raw) in content.lines().enumerate() {
        let (line, comment) = match raw.split_once('!') {
            Some((data, comment)) => (data.trim(), Some(comment.trim_end())),
            None => (raw.trim(), None),
        };
        if let Some(comment) = comment {
            if freq_tmp.is_empty() && line.is_empty() {
                if !comments.is_empty() {
                    comments += "\n";
                }
                comments += comment.trim_start();
            }
        }
        if line.is_empty() {
            continue;
        }

        if line.starts_with('#') {
            // only the first option line counts
            if option_seen {
                continue;
            }
            option_seen = true;
            let Some(vals) = re_file_opts.captures(line) else {
                return Err(load_err(format!(
                    "line {}: invalid option line '{}'",
                    lineno + 1,
                    line
                )));
            };
            if let Some(unit) = vals.name("freq") {
                freq_unit = Scale::from_str(unit.as_str())
                    .map_err(|e| load_err(format!("line {}: {}", lineno + 1, e)))?;
            }
            if let Some(param) = vals.name("param") {
                if !param.as_str().eq_ignore_ascii_case("s") {
                    return Err(load_err(format!(
                        "{}-parameters are not supported",
                        param.as_str().to_uppercase()
                    )));
                }
            }
            if let Some(fmt) = vals.name("format") {
                format = ComplexFormat::from_str(fmt.as_str())
                    .map_err(|e| load_err(format!("line {}: {}", lineno + 1, e)))?;
            }
            continue;
        }

        let fields = line
            .split_whitespace()
            .map(|v| v.parse::<f64>())
            .collect::<Result<Vec<f64>, _>>()
            .map_err(|e| load_err(format!("line {}: {}", lineno + 1, e)))?;

        let f = fields[0];
        if let Some(last) = freq_tmp.last() {
            if f <= *last && fields.len() == 5 {
                debug!("Noise data starts at line {}, stopping", lineno + 1);
                break;
            }
        }
        if fields.len() != 9 {
            return Err(load_err(format!(
                "line {}: expected 9 values for a two-port row, found {}",
                lineno + 1,
                fields.len()
            )));
        }

        freq_tmp.push(freq_unit.unscale(f));
        for (k, trace) in TraceSelector::ACQUISITION_ORDER.iter().enumerate() {
            traces[trace.index()].push(format.parse(fields[1 + 2 * k], fields[2 + 2 * k]));
        }
    }

    if freq_tmp.is_empty() {
        return Err(load_err("file holds no data rows".to_string()));
    }

    let [s11, s12, s21, s22] = traces;
    SParameterDataset::new(Frequency::from_vec(freq_tmp, Scale::Base), s11, s21, s12, s22)
        .map(|data| data.with_comments(&comments))
        .map_err(|e| load_err(e.to_string()))
}

/// Touchstone text in real/imaginary form with frequencies in Hz
pub fn to_touchstone_string(data: &SParameterDataset) -> String {
    let mut out = String::new();
    for line in data.comments().lines() {
        let _ = writeln!(out, "! {}", line);
    }
    out += "# HZ S RI R 50\n";
    for i in 0..data.npts() {
        let _ = write!(out, "{}", data.freq().freq_at(i));
        for trace in TraceSelector::ACQUISITION_ORDER {
            let z = data.trace(trace)[i];
            let _ = write!(out, " {} {}", z.re, z.im);
        }
        out += "\n";
    }
    out
}

pub fn write_touchstone<P: AsRef<Path>>(
    data: &SParameterDataset,
    file_path: P,
) -> Result<(), SweepError> {
    let path = file_path.as_ref();
    fs::write(path, to_touchstone_string(data))
        .map_err(|e| SweepError::FileWriteError(format!("{}: {}", path.display(), e)))?;
    info!("Wrote {} points to {}", data.npts(), path.display());
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::util::{comp_c64, comp_line};
    use float_cmp::F64Margin;

    const S2P: &str = "! Created by rfsweep
! DUT = thru
# GHz S RI R 50
0.5 0.98 -0.13 0.001 0.011 -7.36 0.67 0.55 -0.066
1.0 0.95 -0.26 0.003 0.021 -7.13 1.32 0.54 -0.128 ! inline comment
1.5 0.91 -0.38 0.008 0.031 -6.91 1.80 0.52 -0.188
";

    #[test]
    fn parse_s2p_ri() {
        let data = parse_touchstone(S2P).unwrap();
        assert_eq!(3, data.npts());
        assert_eq!(0.5e9, data.freq().freq_at(0));
        assert_eq!(1.5e9, data.freq().freq_at(2));
        assert_eq!(c64 { re: 0.98, im: -0.13 }, data.trace(TraceSelector::S11)[0]);
        assert_eq!(c64 { re: 0.003, im: 0.021 }, data.trace(TraceSelector::S21)[1]);
        assert_eq!(c64 { re: -6.91, im: 1.80 }, data.trace(TraceSelector::S12)[2]);
        assert_eq!(c64 { re: 0.54, im: -0.128 }, data.trace(TraceSelector::S22)[1]);
        comp_line("Created by rfsweep\nDUT = thru", data.comments(), "comments");
    }

    #[test]
    fn parse_s2p_db_mhz() {
        let content = "# MHZ S DB R 50\n100 0 0 -20 90 -20 -90 -6 180\n";
        let data = parse_touchstone(content).unwrap();
        assert_eq!(100e6, data.freq().freq_at(0));
        let margin = F64Margin {
            epsilon: 1e-15,
            ulps: 4,
        };
        comp_c64(
            &c64 { re: 1.0, im: 0.0 },
            &data.trace(TraceSelector::S11)[0],
            margin,
            "DB",
            "S11",
        );
        comp_c64(
            &c64 { re: 0.0, im: 0.1 },
            &data.trace(TraceSelector::S21)[0],
            margin,
            "DB",
            "S21",
        );
    }

    #[test]
    fn parse_default_options() {
        let data = parse_touchstone("#\n1 1 0 1 0 1 0 1 0\n2 1 0 1 0 1 0 1 0\n").unwrap();
        assert_eq!(1e9, data.freq().freq_at(0));
        assert_eq!(c64 { re: 1.0, im: 0.0 }, data.trace(TraceSelector::S11)[1]);
    }

    #[test]
    fn parse_skips_noise_data() {
        let content = format!("{}1.0 1.2 0.5 45 0.3\n1.5 1.4 0.5 50 0.3\n", S2P);
        let data = parse_touchstone(&content).unwrap();
        assert_eq!(3, data.npts());
    }

    #[test]
    fn parse_rejects_bad_rows() {
        assert!(matches!(
            parse_touchstone("# GHZ S RI R 50\n1.0 0.1 0.2\n"),
            Err(SweepError::FileLoadError(_))
        ));
        assert!(matches!(
            parse_touchstone("# GHZ S RI R 50\n1.0 a b c d e f g h\n"),
            Err(SweepError::FileLoadError(_))
        ));
        assert!(matches!(
            parse_touchstone("# GHZ Y RI R 50\n1 1 0 1 0 1 0 1 0\n"),
            Err(SweepError::FileLoadError(_))
        ));
        assert!(matches!(
            parse_touchstone("# GHZ S RI R 50\n! nothing here\n"),
            Err(SweepError::FileLoadError(_))
        ));
        assert!(matches!(
            parse_touchstone("# GHZ S RI R 50\n2 1 0 1 0 1 0 1 0\n1 1 0 1 0 1 0 1 0\n"),
            Err(SweepError::FileLoadError(_))
        ));
    }

    #[test]
    fn touchstone_string_reparses() {
        let data = parse_touchstone(S2P).unwrap();
        let text = to_touchstone_string(&data);
        assert!(text.starts_with("! Created by rfsweep\n! DUT = thru\n# HZ S RI R 50\n"));
        assert_eq!(data, parse_touchstone(&text).unwrap());
    }

    #[test]
    fn read_rejects_other_port_counts() {
        let err = read_touchstone("sweep.s3p").unwrap_err();
        assert!(matches!(err, SweepError::FileLoadError(_)));
    }

    #[test]
    fn read_missing_file() {
        let err = TouchstoneLoader
            .load(Path::new("definitely/not/here.s2p"))
            .unwrap_err();
        assert!(matches!(err, SweepError::FileLoadError(_)));
    }

    #[test]
    fn write_unwritable() {
        let data = parse_touchstone(S2P).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("sweep.s2p");
        let err = write_touchstone(&data, &path).unwrap_err();
        assert!(matches!(err, SweepError::FileWriteError(_)));
    }
}
