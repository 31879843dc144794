//! Angle arithmetic shared by the sphere and split modules.

/// Wraps `angle_deg` into `[lower_deg, lower_deg + 360)`.
///
/// Uses a true modulo, so negative inputs and inputs many periods away
/// land in the window. Inputs already inside the window, and the closing
/// edge `lower_deg + 360`, are returned unchanged.
pub(crate) fn wrap_deg(angle_deg: f64, lower_deg: f64) -> f64 {
    // In-window values pass through untouched so wrapping is idempotent.
    if angle_deg >= lower_deg && angle_deg <= lower_deg + 360.0 {
        return angle_deg;
    }
    let wrapped = (angle_deg - lower_deg).rem_euclid(360.0) + lower_deg;
    // rem_euclid may round up to exactly 360 for tiny negative offsets.
    if wrapped >= lower_deg + 360.0 {
        lower_deg
    } else {
        wrapped
    }
}

/// True when `a` and `b` differ by less than `tolerance_sq` in squared terms.
pub(crate) fn near_sq(a: f64, b: f64, tolerance_sq: f64) -> bool {
    let diff = a - b;
    diff * diff < tolerance_sq
}

/// Evenly spaced samples over `[start, stop]`, both ends included.
pub(crate) fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            (0..num)
                .map(|i| {
                    if i == num - 1 {
                        stop
                    } else {
                        start + step * i as f64
                    }
                })
                .collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{linspace, near_sq, wrap_deg};

    #[test]
    fn wrap_deg_uses_true_modulo() {
        assert_eq!(wrap_deg(-190.0, -180.0), 170.0);
        assert_eq!(wrap_deg(-1.0, 0.0), 359.0);
        assert_eq!(wrap_deg(725.0, 0.0), 5.0);
        assert_eq!(wrap_deg(-1085.0, -180.0), -5.0);
    }

    #[test]
    fn wrap_deg_keeps_closing_edge() {
        assert_eq!(wrap_deg(360.0, 0.0), 360.0);
        assert_eq!(wrap_deg(180.0, -180.0), 180.0);
        assert_eq!(wrap_deg(540.0, -180.0), -180.0);
    }

    #[test]
    fn wrap_deg_never_reaches_upper_bound_from_below() {
        let wrapped = wrap_deg(-1e-15, 0.0);
        assert!((0.0..360.0).contains(&wrapped));
    }

    #[test]
    fn near_sq_compares_squared_difference() {
        assert!(near_sq(360.0, 360.0 + 1e-6, 1e-10));
        assert!(!near_sq(0.0, 1e-4, 1e-10));
    }

    #[test]
    fn linspace_hits_both_ends() {
        let v = linspace(-90.0, 90.0, 91);
        assert_eq!(v.len(), 91);
        assert_eq!(v[0], -90.0);
        assert_eq!(v[45], 0.0);
        assert_eq!(v[90], 90.0);
        assert!(linspace(0.0, 1.0, 0).is_empty());
    }
}
