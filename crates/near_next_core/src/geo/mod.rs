mod geodesic;
mod oracle;
mod point;
mod token;

pub use oracle::{DistanceOracle, EllipsoidOracle, SphericalOracle};
pub use point::GeoPoint;
pub use token::LocationToken;
