use map_3d::Ellipsoid;

use super::{GeoPoint, geodesic};

/// Pairwise distances between coordinates of type `C`.
///
/// `proxy` only has to rank candidates: a smaller proxy must never mean a
/// larger `distance`. The itinerary engine compares proxies and never
/// interprets their units; `distance` is used for tour reporting.
pub trait DistanceOracle<C> {
    fn proxy(&self, a: &C, b: &C) -> f64;

    fn distance(&self, a: &C, b: &C) -> f64;
}

/// Sphere of mean Earth radius.
#[derive(Clone, Copy, Debug, Default)]
pub struct SphericalOracle;

impl DistanceOracle<GeoPoint> for SphericalOracle {
    #[inline]
    fn proxy(&self, a: &GeoPoint, b: &GeoPoint) -> f64 {
        a.chord_sq(b)
    }

    fn distance(&self, a: &GeoPoint, b: &GeoPoint) -> f64 {
        geodesic::great_circle_m(a, b)
    }
}

/// Reference ellipsoid (WGS84 unless built with [`EllipsoidOracle::new`]).
#[derive(Clone, Copy, Debug)]
pub struct EllipsoidOracle {
    major: f64,
    minor: f64,
}

impl EllipsoidOracle {
    pub fn new(ellipsoid: Ellipsoid) -> Self {
        let (major, minor, ..) = ellipsoid.parameters();
        Self { major, minor }
    }
}

impl Default for EllipsoidOracle {
    fn default() -> Self {
        Self::new(Ellipsoid::default())
    }
}

impl DistanceOracle<GeoPoint> for EllipsoidOracle {
    /// Squared chord between surface normals: ranks like the geodesic
    /// without any trigonometry.
    #[inline]
    fn proxy(&self, a: &GeoPoint, b: &GeoPoint) -> f64 {
        a.chord_sq(b)
    }

    fn distance(&self, a: &GeoPoint, b: &GeoPoint) -> f64 {
        geodesic::vincenty_m(self.major, self.minor, a, b).unwrap_or_else(|| {
            log::trace!("geodesic: no convergence a={a} b={b}, using great circle");
            geodesic::great_circle_m(a, b)
        })
    }
}
