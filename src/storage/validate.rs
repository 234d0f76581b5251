//! Write-path validation
//!
//! Turns a caller's `FieldMap` into the list of column values that may be
//! written. Nothing reaches SQLite unless every present field passes.

use crate::contract::{
    ALL_COLUMNS, COLUMN_BREED, COLUMN_ID, COLUMN_NAME, COLUMN_PACKAGING, COLUMN_PRICE,
    is_known_column, is_valid_packaging,
};
use crate::field::{FieldMap, FieldValue};
use crate::{Error, Result};

/// Validated column values, in table column order
pub(crate) type Assignments = Vec<(&'static str, FieldValue)>;

/// Validate a field map for insert: name and packaging are required.
pub(crate) fn for_insert(fields: &FieldMap) -> Result<Assignments> {
    check_columns(fields)?;
    validate_name(fields.get(COLUMN_NAME).unwrap_or(&FieldValue::Null))?;
    if !fields.contains_key(COLUMN_PACKAGING) {
        return Err(packaging_error());
    }
    assignments(fields)
}

/// Validate a field map for update: only the present keys are checked.
pub(crate) fn for_update(fields: &FieldMap) -> Result<Assignments> {
    check_columns(fields)?;
    assignments(fields)
}

fn check_columns(fields: &FieldMap) -> Result<()> {
    for (column, _) in fields.iter() {
        if column == COLUMN_ID {
            return Err(Error::Validation {
                field: COLUMN_ID,
                message: "id is assigned by the store",
            });
        }
        if !is_known_column(column) {
            return Err(Error::UnknownColumn(column.to_string()));
        }
    }
    Ok(())
}

fn assignments(fields: &FieldMap) -> Result<Assignments> {
    let mut out = Assignments::new();
    for &column in ALL_COLUMNS {
        let Some(value) = fields.get(column) else {
            continue;
        };
        let value = match column {
            COLUMN_NAME => validate_name(value)?,
            COLUMN_PACKAGING => validate_packaging(value)?,
            COLUMN_PRICE => validate_price(value)?,
            COLUMN_BREED => value.clone(),
            _ => continue,
        };
        out.push((column, value));
    }
    Ok(out)
}

fn validate_name(value: &FieldValue) -> Result<FieldValue> {
    match value.as_string() {
        Some(name) if !name.trim().is_empty() => Ok(FieldValue::Text(name)),
        _ => Err(name_error()),
    }
}

fn validate_packaging(value: &FieldValue) -> Result<FieldValue> {
    match value.as_integer() {
        Some(code) if is_valid_packaging(code) => Ok(FieldValue::Integer(code)),
        _ => Err(packaging_error()),
    }
}

fn validate_price(value: &FieldValue) -> Result<FieldValue> {
    match value.as_integer() {
        Some(price) if price >= 0 => Ok(FieldValue::Integer(price)),
        _ => Err(Error::Validation {
            field: COLUMN_PRICE,
            message: "invalid price",
        }),
    }
}

fn name_error() -> Error {
    Error::Validation {
        field: COLUMN_NAME,
        message: "name required",
    }
}

fn packaging_error() -> Error {
    Error::Validation {
        field: COLUMN_PACKAGING,
        message: "invalid packaging",
    }
}
