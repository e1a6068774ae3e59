use rayon::prelude::*;

use crate::{Error, Result, geo::LocationToken};

/// Encoded contents of a CSV file.
#[derive(Debug, Default)]
pub struct EncodedLines {
    /// Ascending and duplicate-free.
    pub tokens: Vec<LocationToken>,
    pub lines: usize,
    pub duplicates: usize,
}

/// Parses `lat,lng[,...]` lines (degrees) into sorted, unique tokens.
///
/// Blank lines and lines starting with `#` are skipped, as is a first line
/// whose latitude field is not a number (a header).
pub fn encode_lines(text: &str) -> Result<EncodedLines> {
    let lines: Vec<(usize, &str)> = text.lines().enumerate().collect();

    let parsed = lines
        .par_iter()
        .map(|&(idx, line)| parse_line(idx, line))
        .collect::<Result<Vec<Option<LocationToken>>>>()?;

    let mut tokens: Vec<LocationToken> = parsed.into_iter().flatten().collect();
    let parsed_count = tokens.len();
    tokens.par_sort_unstable();
    tokens.dedup();

    let encoded = EncodedLines {
        duplicates: parsed_count - tokens.len(),
        lines: lines.len(),
        tokens,
    };
    log::debug!(
        "encode: lines={} tokens={} duplicates={}",
        encoded.lines,
        encoded.tokens.len(),
        encoded.duplicates
    );
    Ok(encoded)
}

fn parse_line(idx: usize, line: &str) -> Result<Option<LocationToken>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut fields = line.split(',').map(str::trim);
    let lat_raw = fields.next().unwrap_or_default();
    let Ok(lat) = lat_raw.parse::<f64>() else {
        if idx == 0 {
            return Ok(None);
        }
        return Err(Error::invalid_data(format!(
            "line {}: bad latitude {lat_raw:?}",
            idx + 1
        )));
    };
    let lng_raw = fields.next().ok_or_else(|| {
        Error::invalid_data(format!("line {}: missing longitude", idx + 1))
    })?;
    let lng = lng_raw.parse::<f64>().map_err(|_| {
        Error::invalid_data(format!("line {}: bad longitude {lng_raw:?}", idx + 1))
    })?;

    LocationToken::from_lat_lng(lat, lng)
        .map(Some)
        .map_err(|e| Error::invalid_data(format!("line {}: {e}", idx + 1)))
}

#[cfg(test)]
mod tests {
    use super::encode_lines;
    use crate::{Error, geo::LocationToken};

    #[test]
    fn tokens_come_out_sorted_and_unique() {
        let text = "lat,lng\n45.0,-75.0\n-33.9,151.2\n\n# comment\n45.0,-75.0,extra\n51.5,-0.1\n";
        let encoded = encode_lines(text).expect("encode");

        assert_eq!(encoded.lines, 7);
        assert_eq!(encoded.tokens.len(), 3);
        assert_eq!(encoded.duplicates, 1);
        assert!(encoded.tokens.windows(2).all(|w| w[0] < w[1]));

        let ottawa = LocationToken::from_lat_lng(45.0, -75.0).expect("token");
        assert!(encoded.tokens.contains(&ottawa));
    }

    #[test]
    fn header_is_only_skipped_on_the_first_line() {
        let err = encode_lines("1.0,2.0\nlat,lng\n").expect_err("header in the middle");
        assert!(matches!(err, Error::InvalidData(_)));
        assert!(err.to_string().contains("line 2: bad latitude \"lat\""));
    }

    #[test]
    fn missing_or_bad_longitude_is_rejected() {
        let err = encode_lines("10.0\n").expect_err("one field");
        assert!(err.to_string().contains("line 1: missing longitude"));

        let err = encode_lines("10.0,east\n").expect_err("text longitude");
        assert!(err.to_string().contains("line 1: bad longitude \"east\""));
    }

    #[test]
    fn out_of_range_degrees_are_rejected() {
        let err = encode_lines("0,0\nNaN,0\n").expect_err("nan latitude");
        assert!(err.to_string().contains("line 2:"));
    }

    #[test]
    fn empty_text_encodes_nothing() {
        let encoded = encode_lines("").expect("encode");
        assert!(encoded.tokens.is_empty());
        assert_eq!(encoded.lines, 0);
    }
}
