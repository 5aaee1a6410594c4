// extensions/hermite.rs
//
// Cubic Hermite interpolation over a discrete sequence.
// Independent of the tracer, just math.

use glam::DVec2;

/// Hermite basis weights `(h00, h10, h01, h11)` at `t` in [0, 1].
#[inline]
pub fn basis(t: f64) -> (f64, f64, f64, f64) {
    let t2 = t * t;
    let t3 = t2 * t;
    (
        2.0 * t3 - 3.0 * t2 + 1.0,
        t3 - 2.0 * t2 + t,
        -2.0 * t3 + 3.0 * t2,
        t3 - t2,
    )
}

/// Cubic Hermite segment between `p0` and `p1` with tangents `m0`, `m1`.
///
/// Written as `p0 + (p1 - p0)·h01 + m0·h10 + m1·h11`, which equals the textbook
/// form because `h00 = 1 - h01`, and returns `p0` bit-for-bit when the
/// segment is flat.
#[inline]
pub fn hermite(p0: DVec2, p1: DVec2, m0: DVec2, m1: DVec2, t: f64) -> DVec2 {
    let (_, h10, h01, h11) = basis(t);
    p0 + (p1 - p0) * h01 + m0 * h10 + m1 * h11
}

/// Clamp a possibly out-of-range index into `[0, len - 1]`.
#[inline]
pub fn clamp_index(k: isize, len: usize) -> usize {
    k.clamp(0, len as isize - 1) as usize
}

/// Sample a sequence of `len` values at continuous position `t`, using
/// central-difference tangents `(v[k+1] - v[k-1]) / 2` with indices clamped
/// at both ends. `len` must be at least 1.
pub fn sample<F>(value_at: F, len: usize, t: f64) -> DVec2
where
    F: Fn(usize) -> DVec2,
{
    let k = t.floor();
    let frac = t - k;
    let k = k as isize;
    let at = |i: isize| value_at(clamp_index(i, len));

    let p0 = at(k);
    let p1 = at(k + 1);
    let m0 = (p1 - at(k - 1)) * 0.5;
    let m1 = (at(k + 2) - p0) * 0.5;
    hermite(p0, p1, m0, m1, frac)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basis_endpoints() {
        assert_eq!(basis(0.0), (1.0, 0.0, 0.0, 0.0));
        assert_eq!(basis(1.0), (0.0, 0.0, 1.0, 0.0));
    }

    #[test]
    fn basis_partition_of_unity() {
        for i in 0..=10 {
            let t = i as f64 / 10.0;
            let (h00, _, h01, _) = basis(t);
            assert!((h00 + h01 - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn hermite_hits_endpoints() {
        let p0 = DVec2::new(1.0, 2.0);
        let p1 = DVec2::new(3.0, -1.0);
        let m = DVec2::new(0.5, 0.5);
        assert_eq!(hermite(p0, p1, m, m, 0.0), p0);
        let end = hermite(p0, p1, m, m, 1.0);
        assert!((end - p1).length() < 1e-12);
    }

    #[test]
    fn matches_textbook_form() {
        let p0 = DVec2::new(0.2, 1.0);
        let p1 = DVec2::new(1.7, -0.4);
        let m0 = DVec2::new(0.3, -0.9);
        let m1 = DVec2::new(-1.1, 0.25);
        for i in 0..=20 {
            let t = i as f64 / 20.0;
            let (h00, h10, h01, h11) = basis(t);
            let textbook = p0 * h00 + m0 * h10 + p1 * h01 + m1 * h11;
            assert!((hermite(p0, p1, m0, m1, t) - textbook).length() < 1e-12);
        }
    }

    #[test]
    fn flat_sequence_is_exact() {
        let v = DVec2::new(5.0, 7.0);
        for i in 0..50 {
            let t = i as f64 * 0.137;
            assert_eq!(sample(|_| v, 8, t), v);
        }
    }

    #[test]
    fn linear_sequence_interpolates_linearly_inside() {
        // Central differences are exact for a line away from the clamped ends.
        let line = |i: usize| DVec2::new(i as f64, 2.0 * i as f64);
        let p = sample(line, 10, 4.25);
        assert!((p - DVec2::new(4.25, 8.5)).length() < 1e-12, "{p:?}");
    }

    #[test]
    fn indices_clamp_at_both_ends() {
        assert_eq!(clamp_index(-1, 5), 0);
        assert_eq!(clamp_index(7, 5), 4);
        assert_eq!(clamp_index(3, 5), 3);
        let seq = |i: usize| DVec2::splat(i as f64);
        // Past the last index the sample holds the final value.
        assert_eq!(sample(seq, 4, 3.0), DVec2::splat(3.0));
    }
}
