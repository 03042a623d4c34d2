use simple_error::{bail, SimpleError};
use std::{fmt, str::FromStr};

/// Descriptor of scaling
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Scale {
    #[default]
    Base,
    Kilo,
    Mega,
    Giga,
    Tera,
}

impl Scale {
    pub fn to_str(&self) -> &str {
        match self {
            Scale::Base => "",
            Scale::Kilo => "k",
            Scale::Mega => "M",
            Scale::Giga => "G",
            Scale::Tera => "T",
        }
    }

    /// Provides multiplier for scale
    /// Scale::Giga = 1e9
    pub fn multiplier(&self) -> f64 {
        match self {
            Scale::Base => 1.0,
            Scale::Kilo => 1e3,
            Scale::Mega => 1e6,
            Scale::Giga => 1e9,
            Scale::Tera => 1e12,
        }
    }

    pub fn scale(&self, val: f64) -> f64 {
        val / self.multiplier()
    }

    pub fn unscale(&self, val: f64) -> f64 {
        val * self.multiplier()
    }
}

impl FromStr for Scale {
    type Err = SimpleError;

    // Accepts the prefix alone or the prefix of a frequency unit ("GHz")
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let prefix = s.trim().trim_end_matches(&['z', 'Z'][..]).trim_end_matches(&['h', 'H'][..]);
        match prefix.to_lowercase().as_str() {
            "" => Ok(Scale::Base),
            "k" | "kilo" => Ok(Scale::Kilo),
            "m" | "mega" => Ok(Scale::Mega),
            "g" | "giga" => Ok(Scale::Giga),
            "t" | "tera" => Ok(Scale::Tera),
            _ => bail!("frequency scale '{}' not recognized", s),
        }
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn scale_from_str() {
        assert_eq!(Scale::from_str("GHz").unwrap(), Scale::Giga);
        assert_eq!(Scale::from_str("ghz").unwrap(), Scale::Giga);
        assert_eq!(Scale::from_str("MHZ").unwrap(), Scale::Mega);
        assert_eq!(Scale::from_str("k").unwrap(), Scale::Kilo);
        assert_eq!(Scale::from_str("Hz").unwrap(), Scale::Base);
        assert_eq!(Scale::from_str("").unwrap(), Scale::Base);
        assert!(Scale::from_str("parsec").is_err());
    }

    #[test]
    fn scale_round_trip() {
        assert_eq!(Scale::Giga.scale(20e9), 20.0);
        assert_eq!(Scale::Mega.unscale(300.0), 300e6);
        assert_eq!(Scale::Giga.to_string(), "G");
    }
}
