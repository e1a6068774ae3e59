use std::fmt;

use h3o::{CellIndex, LatLng, Resolution};

use crate::{Error, Result, constants::RECORD_SIZE};

/// Finest H3 resolution, roughly half a square meter per cell.
const TOKEN_RESOLUTION: Resolution = Resolution::Fifteen;

/// Compact, comparable point coordinate: the 64-bit index of the H3 cell
/// containing the location.
///
/// H3 indices nest children under their parent digits, so sorting tokens
/// numerically keeps most neighbours adjacent in the array. The engine never
/// looks inside a token; only [`GeoPoint`](super::GeoPoint) decodes it.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct LocationToken(u64);

impl LocationToken {
    /// Encodes latitude/longitude in degrees.
    pub fn from_lat_lng(lat: f64, lng: f64) -> Result<Self> {
        let ll = LatLng::new(lat, lng)
            .map_err(|e| Error::invalid_data(format!("lat={lat} lng={lng}: {e}")))?;
        Ok(Self(u64::from(ll.to_cell(TOKEN_RESOLUTION))))
    }

    /// Wraps a raw value without validation; see [`LocationToken::to_lat_lng`].
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Decodes to the cell center as `(lat, lng)` in degrees.
    pub fn to_lat_lng(self) -> Result<(f64, f64)> {
        let cell = CellIndex::try_from(self.0)
            .map_err(|e| Error::invalid_data(format!("token {self}: {e}")))?;
        let ll = LatLng::from(cell);
        Ok((ll.lat(), ll.lng()))
    }

    pub fn from_le_bytes(bytes: [u8; RECORD_SIZE]) -> Self {
        Self(u64::from_le_bytes(bytes))
    }

    pub fn to_le_bytes(self) -> [u8; RECORD_SIZE] {
        self.0.to_le_bytes()
    }
}

impl fmt::Display for LocationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::LocationToken;

    #[test]
    fn lat_lng_survives_encoding_within_a_meter() {
        let token = LocationToken::from_lat_lng(-21.2333, -45.0).expect("encode");
        let (lat, lng) = token.to_lat_lng().expect("decode");
        assert!((lat + 21.2333).abs() < 1e-5);
        assert!((lng + 45.0).abs() < 1e-5);
    }

    #[test]
    fn invalid_coordinates_are_rejected() {
        assert!(LocationToken::from_lat_lng(f64::NAN, 0.0).is_err());
        assert!(LocationToken::from_lat_lng(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn garbage_raw_values_fail_to_decode() {
        let err = LocationToken::from_raw(0)
            .to_lat_lng()
            .expect_err("zero is not a cell index");
        assert!(err.to_string().contains("token 0000000000000000"));
    }

    #[test]
    fn little_endian_bytes_round_trip_the_raw_value() {
        let token = LocationToken::from_raw(0x0102_0304_0506_0708);
        assert_eq!(
            token.to_le_bytes(),
            [0x08, 0x07, 0x06, 0x05, 0x04, 0x03, 0x02, 0x01]
        );
        assert_eq!(LocationToken::from_le_bytes(token.to_le_bytes()), token);
    }

    #[test]
    fn display_is_sixteen_hex_digits() {
        assert_eq!(LocationToken::from_raw(0xabc).to_string(), "0000000000000abc");
    }
}
