use super::GeoPoint;
use crate::constants::EARTH_RADIUS_M;

const MAX_ITERATIONS: usize = 200;
const CONVERGENCE: f64 = 1e-12;

/// Great-circle distance in meters on the mean-radius sphere (haversine).
pub(crate) fn great_circle_m(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let (lat1, lat2) = (a.lat_radians(), b.lat_radians());
    let dlat = lat2 - lat1;
    let dlng = b.lng_radians() - a.lng_radians();
    let s1 = (dlat / 2.0).sin();
    let s2 = (dlng / 2.0).sin();
    let h = (s1 * s1 + lat1.cos() * lat2.cos() * s2 * s2).min(1.0);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Geodesic distance in meters on the ellipsoid with semi-axes `major`/`minor`
/// (Vincenty inverse).
///
/// Returns `None` when the iteration does not converge, which only happens
/// for nearly antipodal pairs.
pub(crate) fn vincenty_m(major: f64, minor: f64, a: &GeoPoint, b: &GeoPoint) -> Option<f64> {
    let f = (major - minor) / major;

    let l = b.lng_radians() - a.lng_radians();
    let u1 = ((1.0 - f) * a.lat_radians().tan()).atan();
    let u2 = ((1.0 - f) * b.lat_radians().tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    for _ in 0..MAX_ITERATIONS {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        let sin_sigma = ((cos_u2 * sin_lambda).powi(2)
            + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
        .sqrt();
        if sin_sigma == 0.0 {
            return Some(0.0);
        }
        let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        let sigma = sin_sigma.atan2(cos_sigma);
        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        let cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
        // Equatorial lines have cos²α = 0.
        let cos_2sigma_m = if cos_sq_alpha == 0.0 {
            0.0
        } else {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        };
        let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));
        let previous = lambda;
        lambda = l
            + (1.0 - c)
                * f
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))));

        if (lambda - previous).abs() < CONVERGENCE {
            let u_sq = cos_sq_alpha * (major * major - minor * minor) / (minor * minor);
            let big_a =
                1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
            let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
            let delta_sigma = big_b
                * sin_sigma
                * (cos_2sigma_m
                    + big_b / 4.0
                        * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m.powi(2))
                            - big_b / 6.0
                                * cos_2sigma_m
                                * (-3.0 + 4.0 * sin_sigma.powi(2))
                                * (-3.0 + 4.0 * cos_2sigma_m.powi(2))));
            return Some(minor * big_a * (sigma - delta_sigma));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::{great_circle_m, vincenty_m};
    use crate::geo::GeoPoint;

    const WGS84_MAJOR: f64 = 6_378_137.0;
    const WGS84_MINOR: f64 = 6_356_752.314_245;

    fn point(lat: f64, lng: f64) -> GeoPoint {
        GeoPoint::from_lat_lng(lat, lng).expect("valid point")
    }

    #[test]
    fn one_degree_of_equator_matches_reference_lengths() {
        let a = point(0.0, 0.0);
        let b = point(0.0, 1.0);
        // WGS84 equatorial degree is 111 319.49 m; sphere degree is 111 194.93 m.
        let ellipsoidal = vincenty_m(WGS84_MAJOR, WGS84_MINOR, &a, &b).expect("converges");
        assert!((ellipsoidal - 111_319.49).abs() < 2.0, "{ellipsoidal}");
        assert!((great_circle_m(&a, &b) - 111_194.93).abs() < 2.0);
    }

    #[test]
    fn meridian_degree_is_shorter_at_the_equator_than_near_the_pole() {
        let equator = vincenty_m(WGS84_MAJOR, WGS84_MINOR, &point(0.0, 10.0), &point(1.0, 10.0))
            .expect("converges");
        let polar = vincenty_m(WGS84_MAJOR, WGS84_MINOR, &point(88.0, 10.0), &point(89.0, 10.0))
            .expect("converges");
        assert!(equator < polar);
    }

    #[test]
    fn coincident_points_are_zero_apart() {
        let a = point(51.5, -0.12);
        assert_eq!(vincenty_m(WGS84_MAJOR, WGS84_MINOR, &a, &a), Some(0.0));
        assert!(great_circle_m(&a, &a).abs() < 1e-9);
    }

    #[test]
    fn distances_are_symmetric() {
        let a = point(37.7749, -122.4194);
        let b = point(34.0522, -118.2437);
        let ab = vincenty_m(WGS84_MAJOR, WGS84_MINOR, &a, &b).expect("converges");
        let ba = vincenty_m(WGS84_MAJOR, WGS84_MINOR, &b, &a).expect("converges");
        assert!((ab - ba).abs() < 1e-6);
        assert!((great_circle_m(&a, &b) - great_circle_m(&b, &a)).abs() < 1e-6);
    }
}
