//! Human-readable sequential identifiers (`RES-0001`, `HH-0001`).
//!
//! This module only does the arithmetic. Serialising "read the last
//! identifier, then insert the next one" is the store's job; see
//! [`crate::store::RegistryStore`].

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Longest identifier a record may carry, prefix included.
pub const MAX_IDENTIFIER_LEN: usize = 20;

/// Most digits a caller-supplied identifier may carry. Any sequence number
/// of this width can still be incremented within `u64`.
pub const MAX_SEQUENCE_DIGITS: usize = 16;

/// The two record kinds that carry a generated identifier.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  strum::Display,
  strum::EnumString,
  strum::AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum EntityKind {
  Resident,
  Household,
}

impl EntityKind {
  /// The identifier prefix, without the trailing `-`.
  pub fn prefix(self) -> &'static str {
    match self {
      Self::Resident => "RES",
      Self::Household => "HH",
    }
  }

  /// Format sequence number `n` as an identifier of this kind.
  ///
  /// Zero-padded to four digits; larger numbers simply grow wider.
  pub fn format(self, n: u64) -> String { format!("{}-{n:04}", self.prefix()) }

  /// Whether `candidate` looks like an identifier of this kind:
  /// `<PREFIX>-` followed by 4 to [`MAX_SEQUENCE_DIGITS`] ASCII digits.
  pub fn is_well_formed(self, candidate: &str) -> bool {
    candidate
      .strip_prefix(self.prefix())
      .and_then(|rest| rest.strip_prefix('-'))
      .is_some_and(|digits| {
        (4..=MAX_SEQUENCE_DIGITS).contains(&digits.len())
          && digits.bytes().all(|b| b.is_ascii_digit())
      })
  }
}

/// Parse the numeric part of a stored identifier: the segment between the
/// first and second `-`. Anything after a second `-` is ignored.
pub fn parse_sequence(identifier: &str) -> Result<u64> {
  identifier
    .split('-')
    .nth(1)
    .and_then(|digits| digits.parse::<u64>().ok())
    .ok_or_else(|| Error::InvalidIdentifierFormat(identifier.to_owned()))
}

/// Compute the identifier that follows `last`, the identifier of the most
/// recently inserted record of `kind`. Starts at 1 when there is none.
pub fn next_identifier(kind: EntityKind, last: Option<&str>) -> Result<String> {
  let next = match last {
    Some(id) => parse_sequence(id)?
      .checked_add(1)
      .ok_or_else(|| Error::InvalidIdentifierFormat(id.to_owned()))?,
    None => 1,
  };
  Ok(kind.format(next))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn first_identifier_starts_at_one() {
    assert_eq!(
      next_identifier(EntityKind::Resident, None).unwrap(),
      "RES-0001"
    );
    assert_eq!(
      next_identifier(EntityKind::Household, None).unwrap(),
      "HH-0001"
    );
  }

  #[test]
  fn increments_last_identifier() {
    assert_eq!(
      next_identifier(EntityKind::Resident, Some("RES-0041")).unwrap(),
      "RES-0042"
    );
  }

  #[test]
  fn grows_past_four_digits() {
    assert_eq!(
      next_identifier(EntityKind::Household, Some("HH-9999")).unwrap(),
      "HH-10000"
    );
    assert_eq!(
      next_identifier(EntityKind::Household, Some("HH-10000")).unwrap(),
      "HH-10001"
    );
  }

  #[test]
  fn malformed_suffix_is_an_error() {
    let err = next_identifier(EntityKind::Resident, Some("RES-00A1")).unwrap_err();
    assert!(matches!(err, Error::InvalidIdentifierFormat(ref s) if s == "RES-00A1"));

    let err = next_identifier(EntityKind::Resident, Some("RES0001")).unwrap_err();
    assert!(matches!(err, Error::InvalidIdentifierFormat(_)));
  }

  #[test]
  fn well_formed_check() {
    assert!(EntityKind::Resident.is_well_formed("RES-0001"));
    assert!(EntityKind::Resident.is_well_formed("RES-12345"));
    assert!(!EntityKind::Resident.is_well_formed("RES-001"));
    assert!(!EntityKind::Resident.is_well_formed("HH-0001"));
    assert!(!EntityKind::Household.is_well_formed("HH-00x1"));
  }

  #[test]
  fn well_formed_caps_digit_count() {
    let widest = format!("HH-{}", "9".repeat(MAX_SEQUENCE_DIGITS));
    assert!(EntityKind::Household.is_well_formed(&widest));
    assert!(widest.len() <= MAX_IDENTIFIER_LEN);

    let wider = format!("HH-{}", "9".repeat(MAX_SEQUENCE_DIGITS + 1));
    assert!(!EntityKind::Household.is_well_formed(&wider));
    assert!(!EntityKind::Household.is_well_formed("HH-18446744073709551615"));
    assert!(!EntityKind::Household.is_well_formed("HH-99999999999999999999"));
  }

  #[test]
  fn widest_accepted_identifier_can_be_incremented() {
    let widest = format!("RES-{}", "9".repeat(MAX_SEQUENCE_DIGITS));
    let next = next_identifier(EntityKind::Resident, Some(&widest)).unwrap();
    assert_eq!(next, format!("RES-1{}", "0".repeat(MAX_SEQUENCE_DIGITS)));
    assert!(next_identifier(EntityKind::Resident, Some(&next)).is_ok());
  }

  #[test]
  fn sequence_overflow_is_an_error() {
    let last = format!("HH-{}", u64::MAX);
    let err = next_identifier(EntityKind::Household, Some(&last)).unwrap_err();
    assert!(matches!(err, Error::InvalidIdentifierFormat(ref s) if *s == last));

    let err = next_identifier(EntityKind::Household, Some("HH-99999999999999999999"))
      .unwrap_err();
    assert!(matches!(err, Error::InvalidIdentifierFormat(_)));
  }

  #[test]
  fn only_the_second_segment_is_parsed() {
    assert_eq!(parse_sequence("RES-0001-A").unwrap(), 1);
    assert_eq!(
      next_identifier(EntityKind::Resident, Some("RES-0007-OLD")).unwrap(),
      "RES-0008"
    );
  }

  #[test]
  fn kind_display_is_lowercase() {
    assert_eq!(EntityKind::Resident.to_string(), "resident");
    assert_eq!("household".parse::<EntityKind>().unwrap(), EntityKind::Household);
  }
}
