//! Windowed nearest-neighbor itineraries over locality-sorted location records.
//! Includes the record codecs, the brute-force baseline and tour reporting.

mod commands;
pub mod constants;
mod error;
pub mod geo;
pub mod interrupt;
pub mod io;
pub mod itinerary;
pub mod logging;
pub mod tour;

pub use commands::{ItinerarySummary, build_itinerary, encode_csv, run};
pub use error::{Error, Result};
pub use geo::{DistanceOracle, EllipsoidOracle, GeoPoint, LocationToken, SphericalOracle};
pub use io::options::ItineraryOptions;
pub use itinerary::{ItineraryDriver, LocationStore, OutputSequencer, SearchStats, WindowSize};
pub use tour::{Tour, TourMetrics};
