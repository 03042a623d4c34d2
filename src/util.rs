use faer::complex_native::c64;
use float_cmp::{approx_eq, F64Margin};

pub fn comp_line(exemplar: &str, calc: &str, test: &str) {
    let mut i: usize = 0;
    let mut exemplar_iter = exemplar.lines();
    let mut calc_iter = calc.lines();
    loop {
        let (exemplar_line, calc_line) = match (exemplar_iter.next(), calc_iter.next()) {
            (None, None) => break,
            (Some(e), Some(c)) => (e, c),
            _ => panic!("test {} number of lines does not match >{}", test, i),
        };
        i += 1;
        assert!(
            exemplar_line == calc_line,
            "test {} line {} does not match\n  exemplar: {}\n      calc: {}",
            test,
            i,
            exemplar_line,
            calc_line
        );
    }
}

pub fn comp_f64(exemplar: &f64, calc: &f64, precision: F64Margin, test: &str, idx: &str) {
    if exemplar == calc {
        return;
    }
    assert!(
        approx_eq!(f64, *exemplar, *calc, precision),
        " Failed test {} at location {}\n  exemplar: {}\n      calc: {}",
        test,
        idx,
        exemplar,
        calc
    );
}

pub fn comp_c64(exemplar: &c64, calc: &c64, precision: F64Margin, test: &str, idx: &str) {
    comp_f64(
        &exemplar.re,
        &calc.re,
        precision,
        test,
        format!("re({})", idx).as_str(),
    );
    comp_f64(
        &exemplar.im,
        &calc.im,
        precision,
        test,
        format!("im({})", idx).as_str(),
    );
}

pub fn comp_vec_f64(exemplar: &[f64], calc: &[f64], precision: F64Margin, test: &str) {
    assert_eq!(
        exemplar.len(),
        calc.len(),
        "test {} length does not match",
        test
    );
    for (i, (e, c)) in exemplar.iter().zip(calc.iter()).enumerate() {
        comp_f64(e, c, precision, test, format!("{}", i).as_str());
    }
}
