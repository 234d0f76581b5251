use tabled::{builder::Builder, settings::Style, Table, Tabled};

use crate::contract::{COLUMN_PACKAGING, COLUMN_PRICE, Packaging};
use crate::field::FieldValue;
use crate::rice::{Cursor, RiceItem};

#[derive(Tabled)]
struct RiceRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Breed")]
    breed: String,
    #[tabled(rename = "Packaging")]
    packaging: String,
    #[tabled(rename = "Price")]
    price: String,
}

#[derive(Tabled)]
struct StatRow {
    #[tabled(rename = "Metric")]
    metric: String,
    #[tabled(rename = "Value")]
    value: String,
}

/// Render cents as `units.cents`, e.g. 240 -> `2.40`
pub fn format_price(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs / 100, abs % 100)
}

pub fn rice_table(items: &[RiceItem]) -> String {
    if items.is_empty() {
        return String::new();
    }

    let rows: Vec<RiceRow> = items
        .iter()
        .map(|item| RiceRow {
            id: item.id,
            name: item.name.clone(),
            breed: item.breed.clone().unwrap_or_default(),
            packaging: item.packaging.to_string(),
            price: format_price(item.price),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

/// Render any projection of the table, naming packaging codes and
/// formatting prices where those columns appear
pub fn cursor_table(cursor: &Cursor) -> String {
    if cursor.is_empty() {
        return String::new();
    }

    let mut builder = Builder::default();
    builder.push_record(cursor.columns().iter().cloned());
    for row in cursor.rows() {
        let cells = cursor.columns().iter().zip(row).map(|(column, value)| {
            match (column.as_str(), value) {
                (_, FieldValue::Null) => String::new(),
                (COLUMN_PACKAGING, FieldValue::Integer(code)) => Packaging::from_code(*code)
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| code.to_string()),
                (COLUMN_PRICE, FieldValue::Integer(cents)) => format_price(*cents),
                (_, other) => other.to_string(),
            }
        });
        builder.push_record(cells);
    }

    builder.build().with(Style::rounded()).to_string()
}

pub fn stats_table(stats: &[(&str, &str)]) -> String {
    let rows: Vec<StatRow> = stats
        .iter()
        .map(|(metric, value)| StatRow {
            metric: metric.to_string(),
            value: value.to_string(),
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(240), "2.40");
        assert_eq!(format_price(5), "0.05");
        assert_eq!(format_price(0), "0.00");
        assert_eq!(format_price(-130), "-1.30");
    }

    #[test]
    fn test_cursor_table_names_packaging() {
        let cursor = Cursor::new(
            vec!["name".to_string(), "packaging".to_string(), "price".to_string()],
            vec![vec![FieldValue::from("Roma"), FieldValue::Integer(3), FieldValue::Integer(199)]],
        );
        let rendered = cursor_table(&cursor);
        assert!(rendered.contains("bag"));
        assert!(rendered.contains("1.99"));
        assert!(cursor_table(&Cursor::default()).is_empty());
    }

    #[test]
    fn test_rice_table() {
        let items = vec![RiceItem {
            id: 1,
            name: "Conad Integrale".to_string(),
            breed: Some("Parboiled Integrale".to_string()),
            packaging: Packaging::VacuumCarton,
            price: 240,
        }];
        let rendered = rice_table(&items);
        assert!(rendered.contains("Conad Integrale"));
        assert!(rendered.contains("vacuum_carton"));
        assert!(rendered.contains("2.40"));
    }
}
