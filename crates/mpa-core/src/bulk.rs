//! Positional bulk update of active staff counts.
//!
//! Ordering contract: token `i` belongs to the `i`-th record of the
//! [`RecordSet`], i.e. the order markets first appear in the store. Nothing
//! here sorts or matches by name; the caller is responsible for producing
//! tokens in that order.

use crate::error::MarketError;
use crate::market::RecordSet;
use crate::store::parse_staff_count;

/// Split operator input into count tokens on any whitespace.
#[must_use]
pub fn parse_count_tokens(input: &str) -> Vec<&str> {
    input.split_whitespace().collect()
}

/// Overwrite every record's staff count with the matching token.
///
/// Returns a new set; `set` is never modified. Either every token is applied
/// or none is.
///
/// # Errors
///
/// Returns [`MarketError::CountMismatch`] if there is not exactly one token
/// per record, or [`MarketError::Validation`] naming the first token that is
/// not a non-negative integer.
pub fn apply_bulk<T: AsRef<str>>(set: &RecordSet, counts: &[T]) -> Result<RecordSet, MarketError> {
    if counts.len() != set.len() {
        return Err(MarketError::CountMismatch {
            expected: set.len(),
            actual: counts.len(),
        });
    }

    let parsed = counts
        .iter()
        .enumerate()
        .map(|(i, token)| {
            parse_staff_count(token.as_ref()).map_err(|e| {
                let market = &set.records()[i].name;
                MarketError::Validation(format!("count #{} ({market}): {e}", i + 1))
            })
        })
        .collect::<Result<Vec<u32>, _>>()?;

    let mut updated = set.clone();
    for (index, count) in parsed.into_iter().enumerate() {
        updated.set_staff_count(index, count);
    }
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::market::MarketRecord;

    fn set() -> RecordSet {
        RecordSet::from_records(
            ["Aiken", "Columbia", "Sumter"]
                .iter()
                .enumerate()
                .map(|(i, name)| MarketRecord {
                    name: (*name).to_string(),
                    latitude: 33.0 + f64::from(u8::try_from(i).unwrap()),
                    longitude: -81.0,
                    active_staff_count: 1,
                    manager: String::new(),
                })
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn applies_counts_positionally() {
        let updated = apply_bulk(&set(), &["4", "0", "2"]).unwrap();
        let counts: Vec<u32> = updated.iter().map(|r| r.active_staff_count).collect();
        assert_eq!(counts, vec![4, 0, 2]);
    }

    #[test]
    fn length_mismatch_is_rejected() {
        let original = set();
        let err = apply_bulk(&original, &["4", "0"]).unwrap_err();
        assert!(matches!(
            err,
            MarketError::CountMismatch {
                expected: 3,
                actual: 2
            }
        ));
        assert_eq!(err.kind(), ErrorKind::CountMismatch);
    }

    #[test]
    fn bad_token_rejects_whole_update() {
        let original = set();
        let err = apply_bulk(&original, &["4", "x", "2"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("Columbia"));
        assert!(original.iter().all(|r| r.active_staff_count == 1));
    }

    #[test]
    fn negative_token_is_rejected_not_clamped() {
        let err = apply_bulk(&set(), &["1", "1", "-3"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }

    #[test]
    fn tokens_split_on_any_whitespace() {
        assert_eq!(parse_count_tokens(" 3 0\t1\n2 "), vec!["3", "0", "1", "2"]);
        assert!(parse_count_tokens("   ").is_empty());
    }
}
