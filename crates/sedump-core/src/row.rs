//! Attribute bag for one `<row/>` element and the [`FromRow`] contract.
//!
//! A decoder fills a [`RowAttrs`] with the raw (already unescaped) attribute
//! values of a row and hands it to `T::from_row`. Absence of an attribute and
//! an empty attribute are different things: `optional_str` returns `None` for
//! the former and `Some("")` for the latter.

use chrono::NaiveDateTime;

use crate::{
  Error, Result,
  value::{parse_bool, parse_int, parse_timestamp},
};

/// Raw attributes of a single row, in document order.
#[derive(Debug, Clone, Default)]
pub struct RowAttrs {
  attrs: Vec<(String, String)>,
}

impl RowAttrs {
  pub fn new() -> Self { Self::default() }

  pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
    self.attrs.push((name.into(), value.into()));
  }

  /// Drop all attributes, keeping the allocation for the next row.
  pub fn clear(&mut self) { self.attrs.clear(); }

  /// Exact, case-sensitive lookup.
  pub fn get(&self, name: &str) -> Option<&str> {
    self
      .attrs
      .iter()
      .find(|(n, _)| n == name)
      .map(|(_, v)| v.as_str())
  }

  fn require(&self, field: &'static str) -> Result<&str> {
    self.get(field).ok_or(Error::MissingField { field })
  }

  pub fn required_str(&self, field: &'static str) -> Result<String> {
    self.require(field).map(str::to_owned)
  }

  pub fn optional_str(&self, field: &'static str) -> Option<String> {
    self.get(field).map(str::to_owned)
  }

  pub fn required_int(&self, field: &'static str) -> Result<i64> {
    parse_int(field, self.require(field)?)
  }

  pub fn optional_int(&self, field: &'static str) -> Result<Option<i64>> {
    self.get(field).map(|raw| parse_int(field, raw)).transpose()
  }

  pub fn required_bool(&self, field: &'static str) -> Result<bool> {
    parse_bool(field, self.require(field)?)
  }

  pub fn required_timestamp(&self, field: &'static str) -> Result<NaiveDateTime> {
    parse_timestamp(field, self.require(field)?)
  }

  pub fn optional_timestamp(
    &self,
    field: &'static str,
  ) -> Result<Option<NaiveDateTime>> {
    self
      .get(field)
      .map(|raw| parse_timestamp(field, raw))
      .transpose()
  }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for RowAttrs {
  fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
    let mut row = RowAttrs::new();
    for (n, v) in iter {
      row.push(n, v);
    }
    row
  }
}

/// A record that can be built from the attributes of one row element.
///
/// Implementations use a fixed attribute-name-to-field mapping and ignore
/// attributes they do not know.
pub trait FromRow: Sized {
  fn from_row(row: &RowAttrs) -> Result<Self>;
}
