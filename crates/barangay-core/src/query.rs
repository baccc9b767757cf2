//! List queries: filters, scope, ordering and pagination.

use serde::{Deserialize, Serialize};

use crate::resident::Gender;

/// Fixed number of rows per list page.
pub const PAGE_SIZE: u32 = 20;

// ─── Scope ───────────────────────────────────────────────────────────────────

/// Which rows a query may see.
///
/// Every read defaults to [`Scope::Active`]; seeing soft-deleted rows has to
/// be asked for explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
  #[default]
  Active,
  All,
}

// ─── Ordering ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListOrder {
  /// Most recently created first; what list pages show.
  #[default]
  Newest,
  /// Residents by `(last_name, first_name)`, households by `household_id`.
  Canonical,
}

// ─── Queries ─────────────────────────────────────────────────────────────────

/// Parameters for [`crate::store::RegistryStore::list_residents`].
#[derive(Debug, Clone, Default)]
pub struct ResidentQuery {
  /// Case-insensitive substring over first name, last name, resident ID and
  /// phone number.
  pub search: Option<String>,
  pub purok:  Option<String>,
  pub gender: Option<Gender>,
  pub scope:  Scope,
  pub order:  ListOrder,
  pub page:   PageRequest,
}

/// Parameters for [`crate::store::RegistryStore::list_households`].
#[derive(Debug, Clone, Default)]
pub struct HouseholdQuery {
  /// Case-insensitive substring over household ID, street and the head's
  /// first or last name.
  pub search: Option<String>,
  pub purok:  Option<String>,
  pub scope:  Scope,
  pub order:  ListOrder,
  pub page:   PageRequest,
}

/// Drop blank filter values so `?purok=` means "no filter".
pub fn non_blank(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_owned())
    .filter(|v| !v.is_empty())
}

// ─── Pagination ──────────────────────────────────────────────────────────────

/// A 1-indexed page number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageRequest(pub u32);

impl Default for PageRequest {
  fn default() -> Self { Self(1) }
}

impl PageRequest {
  pub fn number(self) -> u32 { self.0 }

  /// Row offset for this page, or `None` for page 0 which holds nothing.
  pub fn offset(self) -> Option<u64> {
    self
      .0
      .checked_sub(1)
      .map(|n| u64::from(n) * u64::from(PAGE_SIZE))
  }
}

/// One page of results plus the size of the whole filtered set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
  pub items:       Vec<T>,
  pub total_count: u64,
  pub page:        u32,
  pub page_size:   u32,
  pub num_pages:   u32,
}

impl<T> Page<T> {
  pub fn new(items: Vec<T>, total_count: u64, page: PageRequest) -> Self {
    let num_pages = total_count.div_ceil(u64::from(PAGE_SIZE));
    Self {
      items,
      total_count,
      page: page.number(),
      page_size: PAGE_SIZE,
      num_pages: u32::try_from(num_pages).unwrap_or(u32::MAX),
    }
  }

  pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
    Page {
      items:       self.items.into_iter().map(f).collect(),
      total_count: self.total_count,
      page:        self.page,
      page_size:   self.page_size,
      num_pages:   self.num_pages,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn offsets_are_one_indexed() {
    assert_eq!(PageRequest(0).offset(), None);
    assert_eq!(PageRequest(1).offset(), Some(0));
    assert_eq!(PageRequest(3).offset(), Some(40));
  }

  #[test]
  fn page_counts_round_up() {
    let page = Page::new(Vec::<()>::new(), 41, PageRequest(1));
    assert_eq!(page.num_pages, 3);
    let page = Page::new(Vec::<()>::new(), 0, PageRequest(1));
    assert_eq!(page.num_pages, 0);
  }

  #[test]
  fn blank_filters_are_dropped() {
    assert_eq!(non_blank(Some("  ".into())), None);
    assert_eq!(non_blank(Some(" 2 ".into())), Some("2".into()));
  }
}
