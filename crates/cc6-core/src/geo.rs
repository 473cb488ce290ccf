//! Longitude helpers.
//!
//! Inputs are 1-D longitude axes or flattened 2-D longitude fields in any
//! convention (`[-180, 180)`, `[0, 360)` or unwrapped).

/// Map longitudes into `[0, 360)`.
pub fn convert_lon_360(lon: &[f64]) -> Vec<f64> {
    lon.iter().map(|x| x.rem_euclid(360.0)).collect()
}

/// Map longitudes into `[-180, 180)`.
pub fn convert_lon_180(lon: &[f64]) -> Vec<f64> {
    lon.iter().map(|x| (x + 180.0).rem_euclid(360.0) - 180.0).collect()
}

/// True if the domain covered by `lon` contains the 0° meridian.
pub fn crosses_zero_meridian(lon: &[f64]) -> bool {
    crosses(lon, 0.0)
}

/// True if the domain covered by `lon` contains the 180° meridian.
pub fn crosses_anti_meridian(lon: &[f64]) -> bool {
    crosses(lon, 180.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Coverage {
    Global,
    /// Eastward from `start` to `end`; `end` may exceed 360.
    Regional { start: f64, end: f64 },
}

/// The covered arc is everything except the largest gap between sampled
/// longitudes, unless no gap stands out from the grid spacing.
fn coverage(lon: &[f64]) -> Option<Coverage> {
    let mut values: Vec<f64> = lon
        .iter()
        .filter(|x| x.is_finite())
        .map(|x| x.rem_euclid(360.0))
        .collect();
    values.sort_by(f64::total_cmp);
    values.dedup();
    if values.len() < 2 {
        return None;
    }

    let n = values.len();
    let gaps: Vec<f64> = (0..n)
        .map(|i| {
            let next = if i + 1 < n { values[i + 1] } else { values[0] + 360.0 };
            next - values[i]
        })
        .collect();

    let (largest, max_gap) = gaps
        .iter()
        .copied()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(&b.1))?;
    let mut sorted = gaps.clone();
    sorted.sort_by(f64::total_cmp);
    let median = sorted[(n - 1) / 2];

    if max_gap <= 2.0 * median {
        return Some(Coverage::Global);
    }
    let (start, end) = if largest + 1 < n {
        (values[largest + 1], values[largest] + 360.0)
    } else {
        (values[0], values[n - 1])
    };
    Some(Coverage::Regional { start, end })
}

fn crosses(lon: &[f64], meridian: f64) -> bool {
    match coverage(lon) {
        Some(Coverage::Global) => true,
        Some(Coverage::Regional { start, end }) => [meridian, meridian + 360.0]
            .iter()
            .any(|m| start < *m && *m < end),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(start: i32, end: i32) -> Vec<f64> {
        (start..end).map(f64::from).collect()
    }

    #[test]
    fn convert_to_360() {
        let lon = [
            -360.0, -170.0, -125.0, -90.0, -10.0, 0.0, 10.0, 100.0, 180.0, 270.0, 360.0, 370.0,
            720.0, 1000.0,
        ];
        let expected = [
            0.0, 190.0, 235.0, 270.0, 350.0, 0.0, 10.0, 100.0, 180.0, 270.0, 0.0, 10.0, 0.0, 280.0,
        ];
        assert_eq!(convert_lon_360(&lon), expected);
    }

    #[test]
    fn convert_to_180() {
        let lon = [
            -400.0, -360.0, -270.0, -180.0, -170.0, -130.0, -75.0, -10.0, 35.0, 105.0, 170.0,
            180.0, 190.0, 270.0, 280.0, 520.0, 720.0, 1000.0,
        ];
        let expected = [
            -40.0, 0.0, 90.0, -180.0, -170.0, -130.0, -75.0, -10.0, 35.0, 105.0, 170.0, -180.0,
            -170.0, -90.0, -80.0, 160.0, 0.0, -80.0,
        ];
        assert_eq!(convert_lon_180(&lon), expected);
    }

    #[test]
    fn only_zero_meridian() {
        let lon = [-5.0, -2.0, 0.0, 2.0, 5.0];
        assert!(crosses_zero_meridian(&lon));
        assert!(!crosses_anti_meridian(&lon));

        let lon = range(-160, 160);
        assert!(crosses_zero_meridian(&lon));
        assert!(!crosses_anti_meridian(&lon));
    }

    #[test]
    fn neither_meridian() {
        let lon = [50.0, 55.0, 60.0, 65.0];
        assert!(!crosses_zero_meridian(&lon));
        assert!(!crosses_anti_meridian(&lon));

        let lon = range(-160, 0);
        assert!(!crosses_zero_meridian(&lon));
        assert!(!crosses_anti_meridian(&lon));
    }

    #[test]
    fn only_anti_meridian() {
        let lon = [170.0, 175.0, 179.0, -179.0, -175.0];
        assert!(!crosses_zero_meridian(&lon));
        assert!(crosses_anti_meridian(&lon));

        let lon = range(0, 300);
        assert!(!crosses_zero_meridian(&lon));
        assert!(crosses_anti_meridian(&lon));
    }

    #[test]
    fn both_meridians() {
        let mut lon = range(175, 360);
        lon.extend(range(0, 5));
        assert!(crosses_zero_meridian(&lon));
        assert!(crosses_anti_meridian(&lon));

        let mut lon = range(175, 180);
        lon.extend(range(-180, 6));
        assert!(crosses_zero_meridian(&lon));
        assert!(crosses_anti_meridian(&lon));

        for lon in [range(0, 360), range(-180, 180)] {
            assert!(crosses_zero_meridian(&lon));
            assert!(crosses_anti_meridian(&lon));
        }
    }

    #[test]
    fn flattened_rotated_grid() {
        let lon = [
            358.0, 359.0, 0.0, 1.0, 355.0, 356.0, 2.0, 3.0, 352.0, 353.0, 5.0, 6.0, 349.0, 350.0,
            8.0, 9.0, 346.0, 347.0, 11.0, 12.0, 343.0, 344.0, 14.0, 15.0,
        ];
        assert!(crosses_zero_meridian(&lon));
        assert!(!crosses_anti_meridian(&lon));
    }

    #[test]
    fn degenerate_inputs() {
        assert!(!crosses_zero_meridian(&[]));
        assert!(!crosses_anti_meridian(&[10.0]));
        assert!(!crosses_zero_meridian(&[f64::NAN, 10.0]));
    }
}
