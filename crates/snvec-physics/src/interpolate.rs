//! Table interpolation and special functions.

/// Index `i` of the interval `[x[i], x[i+1]]` containing `x_new`.
///
/// `x` must be ascending with at least two points and `x_new` inside it.
fn bracket(x: &[f64], x_new: f64) -> usize {
    let mut low = 0usize;
    let mut high = x.len() - 1;
    while high - low > 1 {
        let mid = (low + high) >> 1;
        if x[mid] <= x_new {
            low = mid;
        } else {
            high = mid;
        }
    }
    low
}

/// Linear interpolation clamped to the end values.
pub fn interpolate_linear(x: &[f64], y: &[f64], x_new: f64) -> f64 {
    if x.is_empty() {
        return 0.0;
    }
    if x.len() == 1 || x_new <= x[0] {
        return y[0];
    }
    if x_new >= x[x.len() - 1] {
        return y[y.len() - 1];
    }
    let i = bracket(x, x_new);
    let (x0, x1) = (x[i], x[i + 1]);
    if x1 == x0 {
        return y[i];
    }
    y[i] + (y[i + 1] - y[i]) * (x_new - x0) / (x1 - x0)
}

/// Linear interpolation that vanishes outside the tabulated range.
pub fn interpolate_linear_or_zero(x: &[f64], y: &[f64], x_new: f64) -> f64 {
    match (x.first(), x.last()) {
        (Some(&lo), Some(&hi)) if x_new >= lo && x_new <= hi => interpolate_linear(x, y, x_new),
        _ => 0.0,
    }
}

/// Log-log interpolation that vanishes outside the tabulated range.
///
/// Intervals with a non-positive endpoint fall back to linear.
pub fn interpolate_log_log_or_zero(x: &[f64], y: &[f64], x_new: f64) -> f64 {
    let (lo, hi) = match (x.first(), x.last()) {
        (Some(&lo), Some(&hi)) => (lo, hi),
        _ => return 0.0,
    };
    if x_new < lo || x_new > hi {
        return 0.0;
    }
    if x.len() == 1 || x_new == hi {
        return y[y.len() - 1];
    }
    let i = bracket(x, x_new);
    let (x0, x1, y0, y1) = (x[i], x[i + 1], y[i], y[i + 1]);
    if x0 <= 0.0 || y0 <= 0.0 || y1 <= 0.0 || x1 == x0 {
        return interpolate_linear(x, y, x_new);
    }
    let slope = (y1 / y0).ln() / (x1 / x0).ln();
    y0 * (x_new / x0).powf(slope)
}

const LANCZOS_G: f64 = 7.0;
const LANCZOS_COEFFICIENTS: [f64; 9] = [
    0.999_999_999_999_809_9,
    676.520_368_121_885_1,
    -1_259.139_216_722_402_8,
    771.323_428_777_653_1,
    -176.615_029_162_140_6,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_572e-6,
    1.505_632_735_149_311_6e-7,
];

/// Natural log of the gamma function for `x > 0` (Lanczos approximation).
pub fn ln_gamma(x: f64) -> f64 {
    if x < 0.5 {
        // Reflection formula.
        let pi = std::f64::consts::PI;
        return (pi / (pi * x).sin()).ln() - ln_gamma(1.0 - x);
    }
    let x = x - 1.0;
    let mut a = LANCZOS_COEFFICIENTS[0];
    let t = x + LANCZOS_G + 0.5;
    for (i, c) in LANCZOS_COEFFICIENTS.iter().enumerate().skip(1) {
        a += c / (x + i as f64);
    }
    0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + a.ln()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_hits_midpoints() {
        let x = [0.0, 1.0, 3.0];
        let y = [0.0, 2.0, 6.0];
        assert!((interpolate_linear(&x, &y, 2.0) - 4.0).abs() < 1e-12);
        assert_eq!(interpolate_linear(&x, &y, -1.0), 0.0);
        assert_eq!(interpolate_linear(&x, &y, 10.0), 6.0);
        assert_eq!(interpolate_linear_or_zero(&x, &y, 10.0), 0.0);
    }

    #[test]
    fn log_log_reproduces_power_laws() {
        let x = [1.0, 10.0, 100.0];
        let y = [1.0, 100.0, 10_000.0];
        assert!((interpolate_log_log_or_zero(&x, &y, 5.0) - 25.0).abs() < 1e-9);
        assert_eq!(interpolate_log_log_or_zero(&x, &y, 0.5), 0.0);
    }

    #[test]
    fn gamma_matches_factorials() {
        assert!(ln_gamma(1.0).abs() < 1e-12);
        assert!((ln_gamma(5.0) - 24f64.ln()).abs() < 1e-10);
        assert!((ln_gamma(0.5) - std::f64::consts::PI.sqrt().ln()).abs() < 1e-10);
    }
}
