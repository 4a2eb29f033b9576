//! One-dimensional refinement methods.

/// Inverse of the golden ratio.
const INVERSE_PHI: f64 = 0.618_033_988_749_894_9;

/// Finds a root of `f` in `[a, b]` by Brent's method.
///
/// `fa` and `fb` are `f(a)` and `f(b)` and must have opposite signs. The
/// iteration stops when the bracket is narrower than `tolerance` (plus a
/// few ulps of the root) or after `max_iterations` evaluations.
pub fn brent<F>(f: &mut F, a: f64, b: f64, fa: f64, fb: f64, tolerance: f64, max_iterations: usize) -> f64
where
    F: FnMut(f64) -> f64,
{
    let (mut a, mut b, mut fa, mut fb) = (a, b, fa, fb);
    let (mut c, mut fc) = (b, fb);
    let mut d = b - a;
    let mut e = d;

    for _ in 0..max_iterations {
        if (fb > 0.0 && fc > 0.0) || (fb < 0.0 && fc < 0.0) {
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        let tol = 2.0 * f64::EPSILON * b.abs() + 0.5 * tolerance;
        let m = 0.5 * (c - b);
        if m.abs() <= tol || fb == 0.0 {
            return b;
        }

        if e.abs() >= tol && fa.abs() > fb.abs() {
            // Inverse quadratic interpolation, or secant when a == c.
            let s = fb / fa;
            let (mut p, mut q) = if a == c {
                (2.0 * m * s, 1.0 - s)
            } else {
                let q = fa / fc;
                let r = fb / fc;
                (
                    s * (2.0 * m * q * (q - r) - (b - a) * (r - 1.0)),
                    (q - 1.0) * (r - 1.0) * (s - 1.0),
                )
            };
            if p > 0.0 {
                q = -q;
            } else {
                p = -p;
            }
            if 2.0 * p < (3.0 * m * q - (tol * q).abs()).min((e * q).abs()) {
                e = d;
                d = p / q;
            } else {
                d = m;
                e = m;
            }
        } else {
            d = m;
            e = m;
        }

        a = b;
        fa = fb;
        b += if d.abs() > tol { d } else { tol.copysign(m) };
        fb = f(b);
    }
    b
}

/// Abscissa of the minimum of `|f|` in `[a, b]`, by golden-section search.
///
/// The function is assumed unimodal on the interval.
pub fn golden_section_minimum<F>(f: &mut F, a: f64, b: f64, tolerance: f64, max_iterations: usize) -> f64
where
    F: FnMut(f64) -> f64,
{
    let (mut a, mut b) = (a, b);
    let mut c = b - INVERSE_PHI * (b - a);
    let mut d = a + INVERSE_PHI * (b - a);
    let mut fc = f(c).abs();
    let mut fd = f(d).abs();

    for _ in 0..max_iterations {
        if (b - a).abs() <= tolerance * (1.0 + c.abs()) {
            break;
        }
        if fc < fd {
            b = d;
            d = c;
            fd = fc;
            c = b - INVERSE_PHI * (b - a);
            fc = f(c).abs();
        } else {
            a = c;
            c = d;
            fc = fd;
            d = a + INVERSE_PHI * (b - a);
            fd = f(d).abs();
        }
    }
    0.5 * (a + b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brent_square_root() {
        let mut f = |x: f64| x * x - 2.0;
        let root = brent(&mut f, 0.0, 2.0, -2.0, 2.0, 1e-15, 100);
        assert!((root - std::f64::consts::SQRT_2).abs() < 1e-14);
    }

    #[test]
    fn test_brent_transcendental() {
        let mut f = |x: f64| x.cos() - x;
        let root = brent(&mut f, 0.0, 1.0, 1.0, 1.0_f64.cos() - 1.0, 1e-15, 100);
        assert!((root - 0.739_085_133_215_160_6).abs() < 1e-14);
    }

    #[test]
    fn test_brent_counts_evaluations() {
        let mut calls = 0;
        let mut f = |x: f64| {
            calls += 1;
            x.powi(3) - x - 1.0
        };
        let root = brent(&mut f, 1.0, 2.0, -1.0, 5.0, 1e-15, 100);
        assert!((root.powi(3) - root - 1.0).abs() < 1e-12);
        assert!(calls < 50);
    }

    #[test]
    fn test_golden_section() {
        let mut f = |x: f64| (x - 0.3) * (x - 0.3);
        let x = golden_section_minimum(&mut f, 0.0, 1.0, 1e-12, 200);
        assert!((x - 0.3).abs() < 1e-7);
    }
}
