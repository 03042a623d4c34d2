use crate::frequency::Frequency;

/// Sample closest to a probed frequency
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Probe {
    pub index: usize,
    pub freq_hz: f64,
    pub value: f64,
}

/// Linear scan for the point minimizing `|f - query|`; ties go to the lower index.
///
/// Returns `None` only when the view is empty. Views shorter than the
/// frequency vector are scanned over their own length.
pub fn nearest_sample(freq: &Frequency, view: &[f64], query: f64) -> Option<Probe> {
    let mut best: Option<(usize, f64)> = None;
    for (i, f) in freq.iter().take(view.len()).enumerate() {
        let dist = (f - query).abs();
        match best {
            Some((_, d)) if dist >= d => {}
            _ => best = Some((i, dist)),
        }
    }

    best.map(|(index, _)| Probe {
        index,
        freq_hz: freq.freq_at(index),
        value: view[index],
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::scale::Scale;

    fn freq() -> Frequency {
        Frequency::from_vec(vec![1.0, 2.0, 3.0, 4.0], Scale::Giga)
    }

    #[test]
    fn nearest_exact() {
        let view = [-1.0, -2.0, -3.0, -4.0];
        for k in 0..4 {
            let probe = nearest_sample(&freq(), &view, freq().freq_at(k)).unwrap();
            assert_eq!(k, probe.index);
            assert_eq!(view[k], probe.value);
        }
    }

    #[test]
    fn nearest_between() {
        let view = [10.0, 20.0, 30.0, 40.0];
        let probe = nearest_sample(&freq(), &view, 2.4e9).unwrap();
        assert_eq!(
            Probe {
                index: 1,
                freq_hz: 2e9,
                value: 20.0
            },
            probe
        );
        assert_eq!(2, nearest_sample(&freq(), &view, 2.6e9).unwrap().index);
    }

    #[test]
    fn nearest_tie_lowest_index() {
        let view = [10.0, 20.0, 30.0, 40.0];
        assert_eq!(1, nearest_sample(&freq(), &view, 2.5e9).unwrap().index);
    }

    #[test]
    fn nearest_out_of_range() {
        let view = [10.0, 20.0, 30.0, 40.0];
        assert_eq!(0, nearest_sample(&freq(), &view, -1e12).unwrap().index);
        assert_eq!(3, nearest_sample(&freq(), &view, 1e12).unwrap().index);
    }

    #[test]
    fn nearest_empty() {
        assert_eq!(None, nearest_sample(&freq(), &[], 1e9));
    }
}
