//! WHERE-clause builder for list queries.

use barangay_core::query::Scope;
use rusqlite::types::Value;

/// Accumulates `AND`-joined conditions with positional parameters.
pub struct Filter {
  clauses: Vec<String>,
  params:  Vec<Value>,
}

impl Filter {
  /// Start a filter over table alias `alias`, restricted by `scope`.
  pub fn new(alias: &str, scope: Scope) -> Self {
    let mut clauses = Vec::new();
    if scope == Scope::Active {
      clauses.push(format!("{alias}.is_active = 1"));
    }
    Self { clauses, params: Vec::new() }
  }

  /// `column = value`.
  pub fn eq(&mut self, column: &str, value: impl Into<Value>) -> &mut Self {
    self.clauses.push(format!("{column} = ?"));
    self.params.push(value.into());
    self
  }

  /// Case-insensitive substring match of `term` against any of `columns`.
  pub fn search(&mut self, columns: &[&str], term: &str) -> &mut Self {
    let pattern = format!("%{}%", escape_like(term));
    let alternatives = columns
      .iter()
      .map(|c| format!("{c} LIKE ? ESCAPE '\\'"))
      .collect::<Vec<_>>()
      .join(" OR ");
    self.clauses.push(format!("({alternatives})"));
    self
      .params
      .extend(columns.iter().map(|_| Value::Text(pattern.clone())));
    self
  }

  /// `WHERE ...`, or the empty string when there are no conditions.
  pub fn where_clause(&self) -> String {
    if self.clauses.is_empty() {
      String::new()
    } else {
      format!("WHERE {}", self.clauses.join(" AND "))
    }
  }

  pub fn params(&self) -> rusqlite::ParamsFromIter<std::slice::Iter<'_, Value>> {
    rusqlite::params_from_iter(self.params.iter())
  }
}

/// Escape LIKE wildcards so user input matches literally.
fn escape_like(term: &str) -> String {
  let mut out = String::with_capacity(term.len());
  for c in term.chars() {
    if matches!(c, '\\' | '%' | '_') {
      out.push('\\');
    }
    out.push(c);
  }
  out
}
