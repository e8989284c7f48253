#![allow(clippy::missing_errors_doc)]

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use lifeline_core::{rows_to_grid, Grid, LifeError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const SNAPSHOT_DOMAIN: &str = "life";
const SNAPSHOT_VERSION: &str = "v1";

/// Identifier prefix emitted before the encoded snapshot payload.
pub(crate) const SNAPSHOT_HEADER: &str = "life:v1";
/// Delimiter used to separate the prefix, grid dimensions and payload.
const FIELD_DELIMITER: char = ':';

/// Snapshot of a grid that can be shared as a single line of text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct PatternSnapshot {
    grid: Grid,
}

impl PatternSnapshot {
    /// Captures the provided grid.
    #[must_use]
    pub(crate) fn from_grid(grid: Grid) -> Self {
        Self { grid }
    }

    /// Releases the captured grid.
    #[must_use]
    pub(crate) fn into_grid(self) -> Grid {
        self.grid
    }

    /// Encodes the snapshot into a single-line string suitable for clipboard transfer.
    pub(crate) fn encode(&self) -> Result<String, PatternTransferError> {
        let payload = SerializablePattern {
            rows: self
                .grid
                .iter_rows()
                .map(|row| row.iter().map(|state| state.as_char()).collect())
                .collect(),
        };
        let json = serde_json::to_vec(&payload).map_err(PatternTransferError::InvalidPayload)?;
        let encoded = STANDARD_NO_PAD.encode(json);
        Ok(format!(
            "{SNAPSHOT_HEADER}:{}x{}:{encoded}",
            self.grid.columns(),
            self.grid.rows()
        ))
    }

    /// Decodes a snapshot from the provided string representation.
    pub(crate) fn decode(value: &str) -> Result<Self, PatternTransferError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(PatternTransferError::EmptyPayload);
        }

        let mut parts = trimmed.split(FIELD_DELIMITER);
        let domain = parts.next().ok_or(PatternTransferError::MissingPrefix)?;
        let version = parts.next().ok_or(PatternTransferError::MissingVersion)?;
        let dimensions = parts.next().ok_or(PatternTransferError::MissingDimensions)?;
        let payload = parts.next().ok_or(PatternTransferError::MissingPayload)?;
        if let Some(extra) = parts.next() {
            return Err(PatternTransferError::UnexpectedField(extra.to_owned()));
        }

        if domain != SNAPSHOT_DOMAIN {
            return Err(PatternTransferError::InvalidPrefix(domain.to_owned()));
        }
        if version != SNAPSHOT_VERSION {
            return Err(PatternTransferError::UnsupportedVersion(version.to_owned()));
        }

        let (columns, rows) = parse_dimensions(dimensions)?;
        let bytes = STANDARD_NO_PAD
            .decode(payload.as_bytes())
            .map_err(PatternTransferError::InvalidEncoding)?;
        let decoded: SerializablePattern =
            serde_json::from_slice(&bytes).map_err(PatternTransferError::InvalidPayload)?;

        let grid = rows_to_grid(&decoded.rows)?;
        if grid.dimensions() != (rows, columns) {
            return Err(PatternTransferError::DimensionMismatch {
                declared: (rows, columns),
                found: grid.dimensions(),
            });
        }

        Ok(Self { grid })
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct SerializablePattern {
    rows: Vec<String>,
}

/// Errors that can occur while encoding or decoding pattern transfer strings.
#[derive(Debug, Error)]
pub(crate) enum PatternTransferError {
    /// The provided string was empty or contained only whitespace.
    #[error("pattern payload was empty")]
    EmptyPayload,
    /// The prefix segment was missing from the encoded snapshot.
    #[error("pattern string is missing the prefix")]
    MissingPrefix,
    /// The encoded snapshot did not contain a version segment.
    #[error("pattern string is missing the version")]
    MissingVersion,
    /// The encoded snapshot did not include grid dimensions.
    #[error("pattern string is missing the grid dimensions")]
    MissingDimensions,
    /// The encoded snapshot did not include the payload segment.
    #[error("pattern string is missing the payload")]
    MissingPayload,
    /// The encoded snapshot carried a segment after the payload.
    #[error("pattern string has an unexpected trailing segment '{0}'")]
    UnexpectedField(String),
    /// The encoded snapshot used an unexpected prefix segment.
    #[error("pattern prefix '{0}' is not supported")]
    InvalidPrefix(String),
    /// The encoded snapshot used an unsupported version identifier.
    #[error("pattern version '{0}' is not supported")]
    UnsupportedVersion(String),
    /// The grid dimensions could not be parsed from the encoded snapshot.
    #[error("could not parse grid dimensions '{0}'")]
    InvalidDimensions(String),
    /// The base64 payload could not be decoded.
    #[error("could not decode pattern payload: {0}")]
    InvalidEncoding(#[source] base64::DecodeError),
    /// The payload could not be serialised or deserialised.
    #[error("could not parse pattern payload: {0}")]
    InvalidPayload(#[source] serde_json::Error),
    /// The decoded rows were not a valid pattern.
    #[error(transparent)]
    InvalidPattern(#[from] LifeError),
    /// The decoded rows disagreed with the declared dimensions.
    #[error("pattern declares {declared:?} rows and columns but contains {found:?}")]
    DimensionMismatch {
        /// Rows and columns named in the header.
        declared: (u32, u32),
        /// Rows and columns of the decoded grid.
        found: (u32, u32),
    },
}

fn parse_dimensions(dimensions: &str) -> Result<(u32, u32), PatternTransferError> {
    let (columns, rows) = dimensions
        .split_once(['x', 'X'])
        .ok_or_else(|| PatternTransferError::InvalidDimensions(dimensions.to_owned()))?;

    let columns = columns
        .trim()
        .parse::<u32>()
        .map_err(|_| PatternTransferError::InvalidDimensions(dimensions.to_owned()))?;
    let rows = rows
        .trim()
        .parse::<u32>()
        .map_err(|_| PatternTransferError::InvalidDimensions(dimensions.to_owned()))?;

    if columns == 0 || rows == 0 {
        return Err(PatternTransferError::InvalidDimensions(
            dimensions.to_owned(),
        ));
    }

    Ok((columns, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glider() -> Grid {
        rows_to_grid(&["00100", "00010", "01110"]).expect("valid pattern")
    }

    #[test]
    fn header_names_columns_before_rows() {
        let encoded = PatternSnapshot::from_grid(glider())
            .encode()
            .expect("snapshot encodes");
        assert!(encoded.starts_with(&format!("{SNAPSHOT_HEADER}:5x3:")));

        let decoded = PatternSnapshot::decode(&encoded).expect("snapshot decodes");
        assert_eq!(decoded.into_grid(), glider());
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let encoded = PatternSnapshot::from_grid(glider())
            .encode()
            .expect("snapshot encodes");
        let padded = format!("  {encoded}\n");
        assert!(PatternSnapshot::decode(&padded).is_ok());
    }

    #[test]
    fn rejects_foreign_prefixes_and_versions() {
        assert!(matches!(
            PatternSnapshot::decode("rle:v1:5x3:abc"),
            Err(PatternTransferError::InvalidPrefix(prefix)) if prefix == "rle"
        ));
        assert!(matches!(
            PatternSnapshot::decode("life:v2:5x3:abc"),
            Err(PatternTransferError::UnsupportedVersion(version)) if version == "v2"
        ));
        assert!(matches!(
            PatternSnapshot::decode("   "),
            Err(PatternTransferError::EmptyPayload)
        ));
        assert!(matches!(
            PatternSnapshot::decode("life:v1:5x3"),
            Err(PatternTransferError::MissingPayload)
        ));
    }

    #[test]
    fn rejects_segments_after_the_payload() {
        let encoded = PatternSnapshot::from_grid(glider())
            .encode()
            .expect("snapshot encodes");
        let extended = format!("{encoded}:junk");

        assert!(matches!(
            PatternSnapshot::decode(&extended),
            Err(PatternTransferError::UnexpectedField(field)) if field == "junk"
        ));
    }

    #[test]
    fn rejects_zero_or_malformed_dimensions() {
        assert!(matches!(
            PatternSnapshot::decode("life:v1:0x3:abc"),
            Err(PatternTransferError::InvalidDimensions(_))
        ));
        assert!(matches!(
            PatternSnapshot::decode("life:v1:five:abc"),
            Err(PatternTransferError::InvalidDimensions(_))
        ));
    }

    #[test]
    fn rejects_payloads_that_disagree_with_the_header() {
        let encoded = PatternSnapshot::from_grid(glider())
            .encode()
            .expect("snapshot encodes");
        let tampered = encoded.replacen(":5x3:", ":3x5:", 1);

        assert!(matches!(
            PatternSnapshot::decode(&tampered),
            Err(PatternTransferError::DimensionMismatch {
                declared: (5, 3),
                found: (3, 5),
            })
        ));
    }

    #[test]
    fn rejects_rows_with_foreign_characters() {
        let json = br#"{"rows":["01","0x"]}"#;
        let value = format!("life:v1:2x2:{}", STANDARD_NO_PAD.encode(json));

        assert!(matches!(
            PatternSnapshot::decode(&value),
            Err(PatternTransferError::InvalidPattern(
                LifeError::InvalidPatternFormat(_)
            ))
        ));
    }
}
