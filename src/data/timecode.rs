use std::num::ParseIntError;

use thiserror::Error;

// ---------------------------------------------------------------------------
// HH:MM:SS <-> seconds
// ---------------------------------------------------------------------------

/// Why a time string could not be turned into seconds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TimeFormatError {
    #[error("expected HH:MM:SS, got {0:?}")]
    FieldCount(String),

    #[error("invalid {field} in {text:?}: {source}")]
    Field {
        field: &'static str,
        text: String,
        #[source]
        source: ParseIntError,
    },

    #[error("time {0:?} is too large")]
    Overflow(String),
}

const FIELD_NAMES: [&str; 3] = ["hours", "minutes", "seconds"];

/// Parse `HH:MM:SS` into a total number of seconds.
///
/// Fields are not range-checked: `00:75:00` is 4500 seconds.
pub fn to_seconds(text: &str) -> Result<u64, TimeFormatError> {
    let fields: Vec<&str> = text.split(':').collect();
    if fields.len() != 3 {
        return Err(TimeFormatError::FieldCount(text.to_string()));
    }

    let mut parsed = [0u64; 3];
    for (slot, (field, name)) in parsed.iter_mut().zip(fields.iter().zip(FIELD_NAMES)) {
        *slot = field
            .trim()
            .parse::<u64>()
            .map_err(|source| TimeFormatError::Field {
                field: name,
                text: text.to_string(),
                source,
            })?;
    }

    let [h, m, s] = parsed;
    h.checked_mul(3600)
        .zip(m.checked_mul(60))
        .and_then(|(h, m)| h.checked_add(m))
        .and_then(|hm| hm.checked_add(s))
        .ok_or_else(|| TimeFormatError::Overflow(text.to_string()))
}

/// Format seconds as zero-padded `HH:MM:SS`. Hours grow past two digits.
pub fn to_text(seconds: u64) -> String {
    let h = seconds / 3600;
    let m = (seconds % 3600) / 60;
    let s = seconds % 60;
    format!("{h:02}:{m:02}:{s:02}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn parses_plain_times() {
        assert_eq!(to_seconds("00:00:05"), Ok(5));
        assert_eq!(to_seconds("01:02:03"), Ok(3723));
        assert_eq!(to_seconds("00:75:00"), Ok(4500));
    }

    #[test]
    fn formats_with_padding() {
        assert_eq!(to_text(0), "00:00:00");
        assert_eq!(to_text(9), "00:00:09");
        assert_eq!(to_text(3723), "01:02:03");
        assert_eq!(to_text(360_000), "100:00:00");
    }

    #[test]
    fn rejects_wrong_field_count() {
        assert!(matches!(
            to_seconds("00:05"),
            Err(TimeFormatError::FieldCount(_))
        ));
        assert!(matches!(
            to_seconds("00:00:00:01"),
            Err(TimeFormatError::FieldCount(_))
        ));
    }

    #[test]
    fn rejects_non_numeric_fields() {
        match to_seconds("00:xx:05") {
            Err(TimeFormatError::Field { field, .. }) => assert_eq!(field, "minutes"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(to_seconds("-1:00:00").is_err());
        assert!(to_seconds("::").is_err());
    }

    #[test]
    fn rejects_overflowing_times() {
        assert!(matches!(
            to_seconds("99999999999999999:00:00"),
            Err(TimeFormatError::Overflow(_))
        ));
        assert!(matches!(
            to_seconds("5124095576030432:00:00"),
            Err(TimeFormatError::Overflow(_))
        ));
        assert_eq!(to_seconds("00:00:18446744073709551615"), Ok(u64::MAX));
        assert!(matches!(
            to_seconds("00:01:18446744073709551615"),
            Err(TimeFormatError::Overflow(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_text_roundtrip(s in 0u64..10_000_000_000) {
            prop_assert_eq!(to_seconds(&to_text(s)), Ok(s));
        }
    }
}
