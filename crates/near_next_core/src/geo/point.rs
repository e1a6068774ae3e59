use std::fmt;

use super::LocationToken;
use crate::Result;

/// A decoded location: the token it was read from plus the derived
/// representations the distance oracles work on.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    token: LocationToken,
    lat: f64,
    lng: f64,
    /// Unit surface normal `(x, y, z)` for the geodetic latitude/longitude.
    normal: [f64; 3],
}

impl GeoPoint {
    pub fn from_token(token: LocationToken) -> Result<Self> {
        let (lat, lng) = token.to_lat_lng()?;
        let (phi, lambda) = (lat.to_radians(), lng.to_radians());
        Ok(Self {
            token,
            lat,
            lng,
            normal: [
                phi.cos() * lambda.cos(),
                phi.cos() * lambda.sin(),
                phi.sin(),
            ],
        })
    }

    /// Snaps degrees to the token grid, so `lat()`/`lng()` report the cell center.
    pub fn from_lat_lng(lat: f64, lng: f64) -> Result<Self> {
        Self::from_token(LocationToken::from_lat_lng(lat, lng)?)
    }

    pub fn token(&self) -> LocationToken {
        self.token
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    pub(crate) fn lat_radians(&self) -> f64 {
        self.lat.to_radians()
    }

    pub(crate) fn lng_radians(&self) -> f64 {
        self.lng.to_radians()
    }

    /// Squared chord between the unit normals; 0 for coincident points, 4 for antipodes.
    pub fn chord_sq(&self, rhs: &Self) -> f64 {
        let dx = self.normal[0] - rhs.normal[0];
        let dy = self.normal[1] - rhs.normal[1];
        let dz = self.normal[2] - rhs.normal[2];
        dx * dx + dy * dy + dz * dz
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut b1 = ryu::Buffer::new();
        let mut b2 = ryu::Buffer::new();
        write!(f, "{},{}", b1.format(self.lat), b2.format(self.lng))
    }
}

#[cfg(test)]
mod tests {
    use super::GeoPoint;

    #[test]
    fn chord_is_zero_for_same_point_and_four_for_antipodes() {
        let a = GeoPoint::from_lat_lng(10.0, 20.0).expect("point");
        let b = GeoPoint::from_lat_lng(-10.0, -160.0).expect("point");
        assert!(a.chord_sq(&a).abs() < 1e-12);
        assert!((a.chord_sq(&b) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn chord_grows_with_separation() {
        let origin = GeoPoint::from_lat_lng(0.0, 0.0).expect("point");
        let near = GeoPoint::from_lat_lng(0.0, 1.0).expect("point");
        let far = GeoPoint::from_lat_lng(0.0, 2.0).expect("point");
        assert!(origin.chord_sq(&near) < origin.chord_sq(&far));
    }

    #[test]
    fn token_is_preserved() {
        let p = GeoPoint::from_lat_lng(45.0, 7.5).expect("point");
        let again = GeoPoint::from_token(p.token()).expect("decode");
        assert_eq!(p, again);
    }

    #[test]
    fn display_formats_as_lat_lng() {
        let p = GeoPoint::from_lat_lng(1.5, -2.25).expect("point");
        let text = p.to_string();
        let (lat, lng) = text.split_once(',').expect("comma separated");
        assert!((lat.parse::<f64>().expect("lat") - 1.5).abs() < 1e-5);
        assert!((lng.parse::<f64>().expect("lng") + 2.25).abs() < 1e-5);
    }
}
