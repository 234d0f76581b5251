//! Field maps and selections
//!
//! A `FieldMap` is the caller's column -> value mapping for inserts and
//! updates. Values are dynamically typed, like SQLite's own storage classes,
//! and are coerced to the type a validation rule needs.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, Value, ValueRef};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::contract::{COLUMN_ID, Packaging};

/// A single column value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Read the value as a string; null has no string form
    pub fn as_string(&self) -> Option<String> {
        match self {
            FieldValue::Null => None,
            FieldValue::Integer(i) => Some(i.to_string()),
            FieldValue::Real(f) => Some(f.to_string()),
            FieldValue::Text(s) => Some(s.clone()),
        }
    }

    /// Read the value as an integer.
    ///
    /// Reals are truncated and text must hold a decimal integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            FieldValue::Null => None,
            FieldValue::Integer(i) => Some(*i),
            // Truncates toward zero; NaN, infinities and out-of-range reals have no integer
            FieldValue::Real(f) if f.is_finite() && *f >= i64::MIN as f64 && *f < i64::MAX as f64 => {
                Some(f.trunc() as i64)
            }
            FieldValue::Real(_) => None,
            FieldValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Null => write!(f, "null"),
            FieldValue::Integer(i) => write!(f, "{}", i),
            FieldValue::Real(r) => write!(f, "{}", r),
            FieldValue::Text(s) => write!(f, "{}", s),
        }
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Integer(value.into())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Real(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<Packaging> for FieldValue {
    fn from(value: Packaging) -> Self {
        FieldValue::Integer(value.code())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

impl ToSql for FieldValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            FieldValue::Null => ToSqlOutput::Owned(Value::Null),
            FieldValue::Integer(i) => ToSqlOutput::Owned(Value::Integer(*i)),
            FieldValue::Real(f) => ToSqlOutput::Owned(Value::Real(*f)),
            FieldValue::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
        })
    }
}

impl FromSql for FieldValue {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Null => Ok(FieldValue::Null),
            ValueRef::Integer(i) => Ok(FieldValue::Integer(i)),
            ValueRef::Real(f) => Ok(FieldValue::Real(f)),
            ValueRef::Text(bytes) => std::str::from_utf8(bytes)
                .map(|s| FieldValue::Text(s.to_string()))
                .map_err(|e| FromSqlError::Other(Box::new(e))),
            ValueRef::Blob(_) => Err(FromSqlError::InvalidType),
        }
    }
}

/// Column name -> value mapping used for inserts and updates
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMap {
    values: BTreeMap<String, FieldValue>,
}

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style `put`
    pub fn with(mut self, column: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.put(column, value);
        self
    }

    /// Set a column, replacing any previous value
    pub fn put(&mut self, column: impl Into<String>, value: impl Into<FieldValue>) {
        self.values.insert(column.into(), value.into());
    }

    pub fn remove(&mut self, column: &str) -> Option<FieldValue> {
        self.values.remove(column)
    }

    pub fn get(&self, column: &str) -> Option<&FieldValue> {
        self.values.get(column)
    }

    pub fn contains_key(&self, column: &str) -> bool {
        self.values.contains_key(column)
    }

    /// Value of `column` as a string, `None` if absent or null
    pub fn get_as_string(&self, column: &str) -> Option<String> {
        self.get(column).and_then(FieldValue::as_string)
    }

    /// Value of `column` as an integer, `None` if absent, null or not numeric
    pub fn get_as_integer(&self, column: &str) -> Option<i64> {
        self.get(column).and_then(FieldValue::as_integer)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = FieldMap::new();
        for (k, v) in iter {
            map.put(k, v);
        }
        map
    }
}

/// Filter clause plus its positional arguments.
///
/// The clause is SQL placed after `WHERE`; each `?` in it binds the next
/// argument in order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    pub clause: Option<String>,
    pub args: Vec<FieldValue>,
}

impl Selection {
    /// Matches every row
    pub fn all() -> Self {
        Self::default()
    }

    pub fn new(clause: impl Into<String>) -> Self {
        Self {
            clause: Some(clause.into()),
            args: Vec::new(),
        }
    }

    /// Append a positional argument
    pub fn arg(mut self, value: impl Into<FieldValue>) -> Self {
        self.args.push(value.into());
        self
    }

    /// Equality filter on `_id`
    pub fn by_id(id: i64) -> Self {
        Self::new(format!("{} = ?", COLUMN_ID)).arg(id)
    }

    /// The clause, if it filters anything
    pub fn where_clause(&self) -> Option<&str> {
        self.clause
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_coercion() {
        assert_eq!(FieldValue::Integer(4).as_integer(), Some(4));
        assert_eq!(FieldValue::Real(2.9).as_integer(), Some(2));
        assert_eq!(FieldValue::from(" 240 ").as_integer(), Some(240));
        assert_eq!(FieldValue::from("-5").as_integer(), Some(-5));
        assert_eq!(FieldValue::from("two").as_integer(), None);
        assert_eq!(FieldValue::Null.as_integer(), None);
    }

    #[test]
    fn test_unrepresentable_reals_have_no_integer() {
        assert_eq!(FieldValue::Real(f64::NAN).as_integer(), None);
        assert_eq!(FieldValue::Real(f64::INFINITY).as_integer(), None);
        assert_eq!(FieldValue::Real(f64::NEG_INFINITY).as_integer(), None);
        assert_eq!(FieldValue::Real(1e30).as_integer(), None);
        assert_eq!(FieldValue::Real(-1e30).as_integer(), None);
        assert_eq!(FieldValue::Real(-2.9).as_integer(), Some(-2));
    }

    #[test]
    fn test_string_coercion() {
        assert_eq!(FieldValue::from("Arborio").as_string().as_deref(), Some("Arborio"));
        assert_eq!(FieldValue::Integer(12).as_string().as_deref(), Some("12"));
        assert_eq!(FieldValue::Null.as_string(), None);
    }

    #[test]
    fn test_field_map_builder() {
        let map = FieldMap::new()
            .with("name", "Carnaroli")
            .with("packaging", Packaging::Bag)
            .with("breed", None::<String>);

        assert_eq!(map.len(), 3);
        assert_eq!(map.get_as_string("name").as_deref(), Some("Carnaroli"));
        assert_eq!(map.get_as_integer("packaging"), Some(3));
        assert!(map.contains_key("breed"));
        assert_eq!(map.get_as_string("breed"), None);
        assert_eq!(map.get_as_integer("price"), None);
    }

    #[test]
    fn test_field_map_json() {
        let map: FieldMap =
            serde_json::from_str(r#"{"name":"Venere","breed":null,"packaging":1,"price":310}"#).unwrap();
        assert_eq!(map.get("breed"), Some(&FieldValue::Null));
        assert_eq!(map.get("price"), Some(&FieldValue::Integer(310)));
        assert_eq!(map.get("name"), Some(&FieldValue::Text("Venere".to_string())));
    }

    #[test]
    fn test_selection() {
        assert_eq!(Selection::all().where_clause(), None);
        assert_eq!(Selection::new("  ").where_clause(), None);

        let by_id = Selection::by_id(9);
        assert_eq!(by_id.where_clause(), Some("_id = ?"));
        assert_eq!(by_id.args, vec![FieldValue::Integer(9)]);
    }
}
