//! Great-circle distance
//!
//! Haversine formula on a sphere of radius 6371 km.

use crate::constants::geo::EARTH_RADIUS_KM;

/// Distance between two points in kilometres
///
/// # Arguments
/// * `lng1`, `lat1` - First point, in degrees
/// * `lng2`, `lat2` - Second point, in degrees
///
/// # Returns
/// Non-negative distance in km; symmetric in its arguments
pub fn distance_km(lng1: f64, lat1: f64, lng2: f64, lat2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lng / 2.0).sin().powi(2);
    // Rounding can push `a` just past 1 for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const BEIJING: (f64, f64) = (116.397428, 39.90923);
    const SHANGHAI: (f64, f64) = (121.473701, 31.230416);

    #[test]
    fn test_identical_points() {
        assert_eq!(distance_km(BEIJING.0, BEIJING.1, BEIJING.0, BEIJING.1), 0.0);
    }

    #[test]
    fn test_symmetric() {
        let ab = distance_km(BEIJING.0, BEIJING.1, SHANGHAI.0, SHANGHAI.1);
        let ba = distance_km(SHANGHAI.0, SHANGHAI.1, BEIJING.0, BEIJING.1);
        assert_abs_diff_eq!(ab, ba, epsilon = 1e-9);
    }

    #[test]
    fn test_beijing_shanghai() {
        let d = distance_km(BEIJING.0, BEIJING.1, SHANGHAI.0, SHANGHAI.1);
        assert!(
            (d - 1067.0).abs() < 1.5,
            "Beijing-Shanghai distance {} should be about 1067 km",
            d
        );
    }

    #[test]
    fn test_one_degree_of_latitude() {
        let d = distance_km(0.0, 0.0, 0.0, 1.0);
        assert_abs_diff_eq!(d, 111.19, epsilon = 0.01);
    }

    #[test]
    fn test_antipodal() {
        let d = distance_km(0.0, 0.0, 180.0, 0.0);
        assert_abs_diff_eq!(d, std::f64::consts::PI * EARTH_RADIUS_KM, epsilon = 1e-6);
    }

    #[test]
    fn test_antipodal_pairs_stay_finite() {
        let half_circumference = std::f64::consts::PI * EARTH_RADIUS_KM;
        for i in 0..2000 {
            let lat = -89.5 + (i as f64 * 0.0895) % 179.0;
            let lng = -179.5 + (i as f64 * 7.3179) % 359.0;
            let other = if lng > 0.0 { lng - 180.0 } else { lng + 180.0 };

            let d = distance_km(lng, lat, other, -lat);
            assert!(d.is_finite(), "({}, {}) gave {}", lng, lat, d);
            assert_abs_diff_eq!(d, half_circumference, epsilon = 1e-3);
        }
    }

    #[test]
    fn test_known_antipodal_point() {
        let d = distance_km(-178.7321, -79.7609, 1.2679, 79.7609);
        assert!(d.is_finite());
        assert_abs_diff_eq!(d, std::f64::consts::PI * EARTH_RADIUS_KM, epsilon = 1e-3);
    }
}
