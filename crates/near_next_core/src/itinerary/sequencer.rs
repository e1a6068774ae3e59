use super::LocationStore;
use crate::{Error, Result};

/// Puts a completed store into visiting order.
pub struct OutputSequencer;

impl OutputSequencer {
    /// Sorts locations by visit order in place. Running it again on an
    /// arranged store changes nothing.
    pub fn arrange<C>(store: &mut LocationStore<C>) -> Result<()> {
        if store.visited_count() != store.len() {
            return Err(Error::invariant(format!(
                "sequencer: {} of {} locations visited",
                store.visited_count(),
                store.len()
            )));
        }
        store.locations_mut().sort_unstable_by_key(|l| l.order());
        Ok(())
    }

    /// Consumes the store, returning coordinates in visiting order.
    pub fn reorder<C>(mut store: LocationStore<C>) -> Result<Vec<C>> {
        Self::arrange(&mut store)?;
        Ok(store
            .into_locations()
            .into_iter()
            .map(|l| l.into_coordinate())
            .collect())
    }
}
