use faer::complex_native::c64;
use simple_error::{bail, SimpleError};
use std::{fmt, str::FromStr};

/// One of the four two-port scattering parameters
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum TraceSelector {
    S11,
    S21,
    S12,
    S22,
}

impl TraceSelector {
    /// Order in which the analyzer measures and windows the traces
    pub const ACQUISITION_ORDER: [TraceSelector; 4] = [
        TraceSelector::S11,
        TraceSelector::S21,
        TraceSelector::S12,
        TraceSelector::S22,
    ];

    /// Column order of exported tables and of the viewer selector
    pub const DISPLAY_ORDER: [TraceSelector; 4] = [
        TraceSelector::S11,
        TraceSelector::S12,
        TraceSelector::S21,
        TraceSelector::S22,
    ];

    pub fn from_ports(port_out: usize, port_in: usize) -> Option<TraceSelector> {
        match (port_out, port_in) {
            (1, 1) => Some(TraceSelector::S11),
            (2, 1) => Some(TraceSelector::S21),
            (1, 2) => Some(TraceSelector::S12),
            (2, 2) => Some(TraceSelector::S22),
            _ => None,
        }
    }

    /// (port_out, port_in), 1-indexed
    pub fn ports(&self) -> (usize, usize) {
        match self {
            TraceSelector::S11 => (1, 1),
            TraceSelector::S21 => (2, 1),
            TraceSelector::S12 => (1, 2),
            TraceSelector::S22 => (2, 2),
        }
    }

    /// Row-major position in the 2x2 matrix
    pub fn index(&self) -> usize {
        let (m, n) = self.ports();
        (m - 1) * 2 + (n - 1)
    }

    pub fn to_str(&self) -> &str {
        match self {
            TraceSelector::S11 => "S11",
            TraceSelector::S21 => "S21",
            TraceSelector::S12 => "S12",
            TraceSelector::S22 => "S22",
        }
    }
}

impl FromStr for TraceSelector {
    type Err = SimpleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "s11" => Ok(TraceSelector::S11),
            "s21" => Ok(TraceSelector::S21),
            "s12" => Ok(TraceSelector::S12),
            "s22" => Ok(TraceSelector::S22),
            _ => bail!("trace '{}' not recognized", s),
        }
    }
}

impl fmt::Display for TraceSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// Real-valued view of a complex trace
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum ViewMode {
    #[default]
    AmplitudeDb,
    PhaseDeg,
}

impl ViewMode {
    /// Zero magnitude maps to negative infinity in dB
    pub fn apply(&self, z: c64) -> f64 {
        match self {
            ViewMode::AmplitudeDb => 20.0 * z.re.hypot(z.im).log10(),
            ViewMode::PhaseDeg => phase_deg(z),
        }
    }

    pub fn unit(&self) -> &str {
        match self {
            ViewMode::AmplitudeDb => "dB",
            ViewMode::PhaseDeg => "deg",
        }
    }

    pub fn to_str(&self) -> &str {
        match self {
            ViewMode::AmplitudeDb => "Amplitude (dB)",
            ViewMode::PhaseDeg => "Phase (deg)",
        }
    }

    /// Axis label for a trace, e.g. "|S21| (dB)"
    pub fn label(&self, trace: TraceSelector) -> String {
        match self {
            ViewMode::AmplitudeDb => format!("|{}| (dB)", trace),
            ViewMode::PhaseDeg => format!("Phase {} (deg)", trace),
        }
    }
}

// atan2 yields [-180, 180]; -180 is folded onto 180
fn phase_deg(z: c64) -> f64 {
    let deg = z.im.atan2(z.re).to_degrees();
    if deg <= -180.0 {
        deg + 360.0
    } else {
        deg
    }
}

impl FromStr for ViewMode {
    type Err = SimpleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "amplitude (db)" | "amplitude" | "db" | "mag" => Ok(ViewMode::AmplitudeDb),
            "phase (deg)" | "phase" | "deg" => Ok(ViewMode::PhaseDeg),
            _ => bail!("view mode '{}' not recognized", s),
        }
    }
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

/// Complex number layout of a Touchstone data line
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum ComplexFormat {
    #[default]
    RI,
    MA,
    DB,
}

impl ComplexFormat {
    pub fn to_str(&self) -> &str {
        match self {
            ComplexFormat::RI => "RI",
            ComplexFormat::MA => "MA",
            ComplexFormat::DB => "DB",
        }
    }

    pub fn parse(&self, x: f64, y: f64) -> c64 {
        match self {
            ComplexFormat::RI => c64 { re: x, im: y },
            ComplexFormat::MA => from_polar(x, y.to_radians()),
            ComplexFormat::DB => from_polar(10_f64.powf(x / 20.0), y.to_radians()),
        }
    }
}

impl FromStr for ComplexFormat {
    type Err = SimpleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ri" => Ok(ComplexFormat::RI),
            "ma" => Ok(ComplexFormat::MA),
            "db" => Ok(ComplexFormat::DB),
            _ => bail!("complex format '{}' not recognized", s),
        }
    }
}

impl fmt::Display for ComplexFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

pub fn from_polar(r: f64, theta: f64) -> c64 {
    c64 {
        re: r * theta.cos(),
        im: r * theta.sin(),
    }
}
