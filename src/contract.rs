//! Rice contract - table, column and packaging definitions
//!
//! Everything that touches the `rices` table names it through this module:
//! - `TABLE_NAME` and the column constants
//! - `Packaging`: the closed set of packaging codes
//! - The content authority and MIME markers used by addresses

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Authority part of `content://` addresses
pub const CONTENT_AUTHORITY: &str = "com.dandandin.android.risi";

/// Path segment of the rice collection
pub const PATH_RICES: &str = "rices";

/// Name of the single table
pub const TABLE_NAME: &str = "rices";

pub const COLUMN_ID: &str = "_id";
pub const COLUMN_NAME: &str = "name";
pub const COLUMN_BREED: &str = "breed";
pub const COLUMN_PACKAGING: &str = "packaging";
/// Selling price in minor currency units (cents)
pub const COLUMN_PRICE: &str = "price";

/// All columns in table order
pub const ALL_COLUMNS: &[&str] = &[
    COLUMN_ID,
    COLUMN_NAME,
    COLUMN_BREED,
    COLUMN_PACKAGING,
    COLUMN_PRICE,
];

/// MIME marker for a response carrying a list of rices
pub const CONTENT_LIST_TYPE: &str = "vnd.android.cursor.dir/com.dandandin.android.risi/rices";

/// MIME marker for a response carrying a single rice
pub const CONTENT_ITEM_TYPE: &str = "vnd.android.cursor.item/com.dandandin.android.risi/rices";

/// Returns true if `column` is one of the table's columns
pub fn is_known_column(column: &str) -> bool {
    ALL_COLUMNS.contains(&column)
}

/// How a rice product is packaged.
///
/// The discriminants are the integer codes persisted in the `packaging`
/// column and must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum Packaging {
    Vacuum = 0,
    Carton = 1,
    VacuumCarton = 2,
    Bag = 3,
}

impl Packaging {
    /// Persisted integer code
    pub fn code(&self) -> i64 {
        *self as i64
    }

    /// Map a persisted code back to a packaging type
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Packaging::Vacuum),
            1 => Some(Packaging::Carton),
            2 => Some(Packaging::VacuumCarton),
            3 => Some(Packaging::Bag),
            _ => None,
        }
    }

    /// Get the string representation of the packaging type
    pub fn as_str(&self) -> &'static str {
        match self {
            Packaging::Vacuum => "vacuum",
            Packaging::Carton => "carton",
            Packaging::VacuumCarton => "vacuum_carton",
            Packaging::Bag => "bag",
        }
    }

    /// Get all packaging types, in code order
    pub fn all() -> &'static [Packaging] {
        &[
            Packaging::Vacuum,
            Packaging::Carton,
            Packaging::VacuumCarton,
            Packaging::Bag,
        ]
    }
}

/// Returns whether or not the given packaging code is valid
pub fn is_valid_packaging(code: i64) -> bool {
    Packaging::from_code(code).is_some()
}

impl FromStr for Packaging {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if let Ok(code) = s.parse::<i64>() {
            return Packaging::from_code(code).ok_or_else(|| Error::Validation {
                field: COLUMN_PACKAGING,
                message: "invalid packaging",
            });
        }
        match s.to_lowercase().replace('-', "_").as_str() {
            "vacuum" => Ok(Packaging::Vacuum),
            "carton" => Ok(Packaging::Carton),
            "vacuum_carton" | "vacuumcarton" => Ok(Packaging::VacuumCarton),
            "bag" => Ok(Packaging::Bag),
            _ => Err(Error::Validation {
                field: COLUMN_PACKAGING,
                message: "invalid packaging",
            }),
        }
    }
}

impl TryFrom<i64> for Packaging {
    type Error = String;

    fn try_from(code: i64) -> std::result::Result<Self, Self::Error> {
        Packaging::from_code(code).ok_or_else(|| format!("invalid packaging code: {}", code))
    }
}

impl From<Packaging> for i64 {
    fn from(packaging: Packaging) -> Self {
        packaging.code()
    }
}

impl std::fmt::Display for Packaging {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_packaging_codes() {
        for code in 0..=3 {
            assert!(is_valid_packaging(code));
        }
        assert!(!is_valid_packaging(-1));
        assert!(!is_valid_packaging(4));
        assert!(!is_valid_packaging(9));
    }

    #[test]
    fn test_packaging_codes_are_stable() {
        assert_eq!(Packaging::Vacuum.code(), 0);
        assert_eq!(Packaging::Carton.code(), 1);
        assert_eq!(Packaging::VacuumCarton.code(), 2);
        assert_eq!(Packaging::Bag.code(), 3);
        for packaging in Packaging::all() {
            assert_eq!(Packaging::from_code(packaging.code()), Some(*packaging));
        }
    }

    #[test]
    fn test_packaging_from_str() {
        assert_eq!(Packaging::from_str("bag").unwrap(), Packaging::Bag);
        assert_eq!(Packaging::from_str("Vacuum-Carton").unwrap(), Packaging::VacuumCarton);
        assert_eq!(Packaging::from_str("1").unwrap(), Packaging::Carton);
        assert!(Packaging::from_str("9").is_err());
        assert!(Packaging::from_str("crate").is_err());
    }

    #[test]
    fn test_packaging_serde_uses_codes() {
        assert_eq!(serde_json::to_string(&Packaging::VacuumCarton).unwrap(), "2");
        let parsed: Packaging = serde_json::from_str("3").unwrap();
        assert_eq!(parsed, Packaging::Bag);
        assert!(serde_json::from_str::<Packaging>("7").is_err());
    }

    #[test]
    fn test_known_columns() {
        assert!(is_known_column("_id"));
        assert!(is_known_column("price"));
        assert!(!is_known_column("description"));
    }
}
