use std::{fs, path::Path};

use crate::{
    Error, Result,
    itinerary::{LocationStore, Record},
};

/// Reads a record file into a fresh, fully unvisited store.
pub fn read_store<C: Record>(path: &Path) -> Result<LocationStore<C>> {
    let bytes = fs::read(path).map_err(|e| Error::file(path, e))?;
    log::debug!("records: read path={} bytes={}", path.display(), bytes.len());
    LocationStore::load(&bytes)
}

/// Reads a record file keeping the on-disk order.
pub fn read_records<C: Record>(path: &Path) -> Result<Vec<C>> {
    Ok(read_store(path)?
        .into_locations()
        .into_iter()
        .map(|l| l.into_coordinate())
        .collect())
}

/// Replaces `path` with `records`. The file is only created once the whole
/// payload is encoded.
pub fn write_records<C: Record>(path: &Path, records: &[C]) -> Result<()> {
    let mut out = Vec::with_capacity(records.len() * C::SIZE);
    for record in records {
        record.encode(&mut out);
    }
    fs::write(path, &out).map_err(|e| Error::file(path, e))?;
    log::debug!(
        "records: wrote path={} records={} bytes={}",
        path.display(),
        records.len(),
        out.len()
    );
    Ok(())
}
