//! Windowed nearest-neighbor itinerary construction.
//!
//! The store is an index arena: locations never move while the driver runs,
//! and array positions are the only references between components.

mod driver;
mod outward;
mod sequencer;
mod store;
mod window;

pub use driver::{ItineraryDriver, SearchStats};
pub use outward::OutwardFallbackSearch;
pub use sequencer::OutputSequencer;
pub use store::{Location, LocationStore, Record};
pub use window::{WindowSearch, WindowSize};
