//! Rice address - logical address of the collection or of one rice
//!
//! Accepted forms:
//! - `rices` / `rices/<id>`
//! - `/rices` / `/rices/<id>`
//! - `content://com.dandandin.android.risi/rices[/<id>]`

use crate::contract::{CONTENT_AUTHORITY, CONTENT_ITEM_TYPE, CONTENT_LIST_TYPE, PATH_RICES};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Address of the data a store operation works on.
///
/// Parsing happens once, at the boundary; store operations match
/// exhaustively on the two variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RiceAddress {
    /// The whole `rices` table, optionally filtered by a selection
    Collection,
    /// Exactly the row with this `_id`
    Item(i64),
}

impl RiceAddress {
    /// Address of a single rice
    pub fn item(id: i64) -> Self {
        RiceAddress::Item(id)
    }

    /// Parse an address string into a RiceAddress
    pub fn parse(address: &str) -> Result<Self> {
        let invalid = || Error::InvalidAddress(address.to_string());

        let path = match address.strip_prefix("content://") {
            Some(rest) => {
                let (authority, path) = rest.split_once('/').ok_or_else(invalid)?;
                if authority != CONTENT_AUTHORITY {
                    return Err(invalid());
                }
                path
            }
            None => address.strip_prefix('/').unwrap_or(address),
        };

        let mut segments = path.split('/');
        if segments.next() != Some(PATH_RICES) {
            return Err(invalid());
        }

        let address = match (segments.next(), segments.next()) {
            (None, _) => RiceAddress::Collection,
            (Some(id), None) if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) => {
                let id: i64 = id.parse().map_err(|_| invalid())?;
                RiceAddress::Item(id)
            }
            _ => return Err(invalid()),
        };

        Ok(address)
    }

    /// The id of an item address
    pub fn id(&self) -> Option<i64> {
        match self {
            RiceAddress::Collection => None,
            RiceAddress::Item(id) => Some(*id),
        }
    }

    /// MIME marker for responses to this address
    pub fn mime_type(&self) -> &'static str {
        match self {
            RiceAddress::Collection => CONTENT_LIST_TYPE,
            RiceAddress::Item(_) => CONTENT_ITEM_TYPE,
        }
    }

    /// Render the full `content://` form
    pub fn to_content_uri(&self) -> String {
        format!("content://{}/{}", CONTENT_AUTHORITY, self)
    }
}

impl fmt::Display for RiceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiceAddress::Collection => write!(f, "{}", PATH_RICES),
            RiceAddress::Item(id) => write!(f, "{}/{}", PATH_RICES, id),
        }
    }
}

impl FromStr for RiceAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for RiceAddress {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for RiceAddress {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        RiceAddress::parse(&s).map_err(serde::de::Error::custom)
    }
}
