//! The fixed set of icon glyphs a diagram needs before it can be painted.

use std::{fmt, str::FromStr};

/// Identifies one of the four icons drawn on entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum IconKey {
    /// Drawn in every entity header
    Table,
    /// Drawn on primary-key rows
    PrimaryKey,
    /// Drawn on rows whose column accepts NULL
    Nullable,
    /// Drawn on rows whose column rejects NULL
    NotNullable,
}

impl IconKey {
    /// Every key, in a stable order.
    pub const ALL: [IconKey; 4] = [
        IconKey::Table,
        IconKey::PrimaryKey,
        IconKey::Nullable,
        IconKey::NotNullable,
    ];

    /// Returns the external name of this key as used in documents and configuration.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Table => "tableIcon",
            Self::PrimaryKey => "primaryKeyIcon",
            Self::Nullable => "nullableIcon",
            Self::NotNullable => "notNullableIcon",
        }
    }

    /// Selects the nullability icon variant for a row.
    pub fn for_nullability(not_nullable: bool) -> Self {
        if not_nullable {
            Self::NotNullable
        } else {
            Self::Nullable
        }
    }
}

impl fmt::Display for IconKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IconKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IconKey::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "invalid icon key `{s}`, valid values: tableIcon, primaryKeyIcon, nullableIcon, notNullableIcon"
                )
            })
    }
}
