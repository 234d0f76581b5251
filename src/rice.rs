//! Rice rows and query results

use serde::{Deserialize, Serialize};

use crate::contract::{
    COLUMN_BREED, COLUMN_ID, COLUMN_NAME, COLUMN_PACKAGING, COLUMN_PRICE, Packaging,
};
use crate::field::{FieldMap, FieldValue};
use crate::{Error, Result};

/// One product in the inventory (a full row of the `rices` table)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RiceItem {
    /// Store-assigned identifier
    pub id: i64,
    /// Commercial name
    pub name: String,
    /// Rice variety
    pub breed: Option<String>,
    pub packaging: Packaging,
    /// Price in cents
    pub price: i64,
}

impl RiceItem {
    /// Field map holding every column but `_id`, ready for insert or update
    pub fn to_fields(&self) -> FieldMap {
        FieldMap::new()
            .with(COLUMN_NAME, self.name.as_str())
            .with(COLUMN_BREED, self.breed.clone())
            .with(COLUMN_PACKAGING, self.packaging)
            .with(COLUMN_PRICE, self.price)
    }
}

/// Materialised result of a query: column names plus rows of values
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Cursor {
    columns: Vec<String>,
    rows: Vec<Vec<FieldValue>>,
}

impl Cursor {
    pub fn new(columns: Vec<String>, rows: Vec<Vec<FieldValue>>) -> Self {
        Self { columns, rows }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<FieldValue>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Value at `row` for `column`
    pub fn get(&self, row: usize, column: &str) -> Option<&FieldValue> {
        let index = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(index))
    }

    /// Convert every row to a RiceItem.
    ///
    /// Needs the `_id`, `name`, `packaging` and `price` columns; `breed` is
    /// read as absent when it was not projected.
    pub fn to_items(&self) -> Result<Vec<RiceItem>> {
        let required = |column: &str| {
            self.column_index(column)
                .ok_or_else(|| Error::MissingColumn(column.to_string()))
        };
        let id_idx = required(COLUMN_ID)?;
        let name_idx = required(COLUMN_NAME)?;
        let packaging_idx = required(COLUMN_PACKAGING)?;
        let price_idx = required(COLUMN_PRICE)?;
        let breed_idx = self.column_index(COLUMN_BREED);

        self.rows
            .iter()
            .map(|row| {
                let id = row[id_idx]
                    .as_integer()
                    .ok_or_else(|| Error::MissingColumn(COLUMN_ID.to_string()))?;
                let packaging = row[packaging_idx]
                    .as_integer()
                    .and_then(Packaging::from_code)
                    .ok_or(Error::Validation {
                        field: COLUMN_PACKAGING,
                        message: "invalid packaging",
                    })?;

                Ok(RiceItem {
                    id,
                    name: row[name_idx].as_string().unwrap_or_default(),
                    breed: breed_idx.and_then(|i| row[i].as_string()),
                    packaging,
                    price: row[price_idx].as_integer().unwrap_or(0),
                })
            })
            .collect()
    }

    /// First row as a RiceItem, if any
    pub fn first_item(&self) -> Result<Option<RiceItem>> {
        Ok(self.to_items()?.into_iter().next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_columns() -> Vec<String> {
        crate::contract::ALL_COLUMNS.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_cursor_to_items() {
        let cursor = Cursor::new(
            full_columns(),
            vec![vec![
                FieldValue::Integer(1),
                FieldValue::from("Conad Integrale"),
                FieldValue::from("Parboiled Integrale"),
                FieldValue::Integer(2),
                FieldValue::Integer(240),
            ]],
        );

        assert_eq!(cursor.len(), 1);
        assert_eq!(cursor.get(0, "price"), Some(&FieldValue::Integer(240)));
        assert_eq!(cursor.get(0, "description"), None);

        let item = cursor.first_item().unwrap().unwrap();
        assert_eq!(item.id, 1);
        assert_eq!(item.name, "Conad Integrale");
        assert_eq!(item.breed.as_deref(), Some("Parboiled Integrale"));
        assert_eq!(item.packaging, Packaging::VacuumCarton);
        assert_eq!(item.price, 240);
    }

    #[test]
    fn test_cursor_missing_column() {
        let cursor = Cursor::new(vec!["name".to_string()], vec![vec![FieldValue::from("Roma")]]);
        assert!(matches!(cursor.to_items(), Err(Error::MissingColumn(c)) if c == "_id"));
    }

    #[test]
    fn test_item_to_fields() {
        let item = RiceItem {
            id: 3,
            name: "Baldo".to_string(),
            breed: None,
            packaging: Packaging::Carton,
            price: 199,
        };
        let fields = item.to_fields();
        assert!(!fields.contains_key("_id"));
        assert_eq!(fields.get("breed"), Some(&FieldValue::Null));
        assert_eq!(fields.get_as_integer("packaging"), Some(1));
    }
}
