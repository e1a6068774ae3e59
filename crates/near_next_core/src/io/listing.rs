use std::fmt::Write;

use crate::{Error, Result, geo::LocationToken};

/// Renders `lat lng token` lines for a sorted, duplicate-free token file.
///
/// Stops after `limit` lines when `limit > 0`. A duplicate, a descending
/// token or an undecodable token fails the whole listing.
pub fn render_listing(tokens: &[LocationToken], limit: usize) -> Result<String> {
    let take = if limit == 0 {
        tokens.len()
    } else {
        limit.min(tokens.len())
    };

    let mut out = String::with_capacity(take * 36);
    let mut prev: Option<LocationToken> = None;
    for (line, &token) in tokens[..take].iter().enumerate() {
        if let Some(prev) = prev {
            if token == prev {
                return Err(Error::invalid_data(format!(
                    "record {line}: duplicate token {token}"
                )));
            }
            if token < prev {
                return Err(Error::invalid_data(format!(
                    "record {line}: token {token} sorts before {prev}"
                )));
            }
        }
        let (lat, lng) = token
            .to_lat_lng()
            .map_err(|e| Error::invalid_data(format!("record {line}: {e}")))?;
        writeln!(out, "{lat:8.4} {lng:9.4} {token}")
            .map_err(|e| Error::other(format!("listing format failed: {e}")))?;
        prev = Some(token);
    }

    log::debug!("list: records={} listed={take}", tokens.len());
    Ok(out)
}
