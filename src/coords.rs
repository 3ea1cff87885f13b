//! Pure transforms between spherical (range, azimuth, elevation) and local
//! Cartesian (x, y, z) frames.
//!
//! Azimuth follows the east-of-north navigation convention — measured from
//! +y toward +x — not the mathematical convention measured from +x toward
//! +y.

use crate::types::MeasVec;
use std::f64::consts::FRAC_PI_2;

/// Spherical (azimuth/elevation in degrees, range in meters) to Cartesian.
pub fn sph_to_cart(az_deg: f64, el_deg: f64, r: f64) -> MeasVec {
    let az = az_deg.to_radians();
    let el = el_deg.to_radians();
    let x = r * el.cos() * az.sin();
    let y = r * el.cos() * az.cos();
    let z = r * el.sin();
    MeasVec::new(x, y, z)
}

/// Cartesian to spherical, returning (range, azimuth_deg, elevation_deg).
/// Azimuth is wrapped into `[0, 360)`.
pub fn cart_to_sph(v: &MeasVec) -> (f64, f64, f64) {
    let (x, y, z) = (v[0], v[1], v[2]);
    let r = (x * x + y * y + z * z).sqrt();
    let el = z.atan2((x * x + y * y).sqrt());

    let az = y.atan2(x);
    let az = if x > 0.0 {
        FRAC_PI_2 - az
    } else {
        3.0 * FRAC_PI_2 - az
    };
    let az_deg = az.to_degrees().rem_euclid(360.0);

    (r, az_deg, el.to_degrees())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn round_trips_for_interior_angles() {
        let cases = [
            (45.0, 10.0, 1000.0),
            (0.0, 0.0, 1.0),
            (359.0, -45.0, 500.0),
            (90.0, 89.0, 12000.0),
            (270.0, -89.0, 42.0),
        ];
        for (az, el, r) in cases {
            let v = sph_to_cart(az, el, r);
            let (r2, az2, el2) = cart_to_sph(&v);
            assert_relative_eq!(r2, r, max_relative = 1e-9);
            assert_relative_eq!(az2, az, max_relative = 1e-9);
            assert_relative_eq!(el2, el, max_relative = 1e-9);
        }
    }

    #[test]
    fn azimuth_wraps_into_0_360() {
        let v = sph_to_cart(359.999, 0.0, 100.0);
        let (_, az, _) = cart_to_sph(&v);
        assert!((0.0..360.0).contains(&az));
    }

    #[test]
    fn known_point_north() {
        // Azimuth 0 (north) with zero elevation lies entirely on +y.
        let v = sph_to_cart(0.0, 0.0, 100.0);
        assert_relative_eq!(v[0], 0.0, epsilon = 1e-9);
        assert_relative_eq!(v[1], 100.0, epsilon = 1e-9);
        assert_relative_eq!(v[2], 0.0, epsilon = 1e-9);
    }

    #[test]
    fn known_point_east() {
        // Azimuth 90 (east) lies entirely on +x.
        let v = sph_to_cart(90.0, 0.0, 100.0);
        assert_relative_eq!(v[0], 100.0, epsilon = 1e-9);
        assert_relative_eq!(v[1], 0.0, epsilon = 1e-9);
    }
}
