//! Core types used throughout add-model
//!
//! This module contains the closed type-tag table that maps Sequelize
//! `DataTypes` tags onto TypeScript primitive types.

use std::fmt;

// ============================================================================
// TypeScript Types
// ============================================================================

/// TypeScript primitive a column is exposed as in generated code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TsType {
    String,
    Number,
    Boolean,
    Date,
}

impl TsType {
    /// The TypeScript spelling of this type
    pub fn as_str(&self) -> &'static str {
        match self {
            TsType::String => "string",
            TsType::Number => "number",
            TsType::Boolean => "boolean",
            TsType::Date => "Date",
        }
    }

    /// The spelling with an optional `| null` suffix
    pub fn annotation(&self, nullable: bool) -> String {
        if nullable {
            format!("{} | null", self.as_str())
        } else {
            self.as_str().to_string()
        }
    }
}

impl fmt::Display for TsType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Data Types
// ============================================================================

/// Column data types recognised in migrations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    // Text
    /// Variable-length string (VARCHAR)
    String,
    /// Long-form text content
    Text,
    /// Fixed-length string
    Char,
    /// Case-insensitive text (PostgreSQL)
    CiText,
    /// UUID column
    Uuid,
    /// UUID v4 default generator used as a type
    UuidV4,
    /// Enumeration stored as text
    Enum,

    // Numbers
    /// Untyped number
    Number,
    /// 32-bit integer
    Integer,
    /// 8-bit integer
    TinyInt,
    /// 16-bit integer
    SmallInt,
    /// 24-bit integer
    MediumInt,
    /// 64-bit integer
    BigInt,
    /// Single precision float
    Float,
    /// Double precision float
    Double,
    /// Real
    Real,
    /// Fixed precision decimal, exposed as a string to keep precision
    Decimal,

    // Other primitives
    /// Boolean true/false
    Boolean,
    /// Date and time
    Date,
    /// Date without time, exposed as `YYYY-MM-DD` string
    DateOnly,
    /// Time without date
    Time,

    // Structured
    /// JSON document, exposed as its serialized string
    Json,
    /// Binary JSON (PostgreSQL), exposed as its serialized string
    Jsonb,
}

impl DataType {
    /// Every recognised tag, in table order
    pub const ALL: [DataType; 23] = [
        DataType::String,
        DataType::Text,
        DataType::Char,
        DataType::CiText,
        DataType::Uuid,
        DataType::UuidV4,
        DataType::Enum,
        DataType::Number,
        DataType::Integer,
        DataType::TinyInt,
        DataType::SmallInt,
        DataType::MediumInt,
        DataType::BigInt,
        DataType::Float,
        DataType::Double,
        DataType::Real,
        DataType::Decimal,
        DataType::Boolean,
        DataType::Date,
        DataType::DateOnly,
        DataType::Time,
        DataType::Json,
        DataType::Jsonb,
    ];

    /// Look up a Sequelize tag such as `STRING` or `DECIMAL`.
    ///
    /// Tags are matched exactly; `string` is not `STRING`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|dt| dt.tag() == tag)
    }

    /// The Sequelize tag for this type
    pub fn tag(&self) -> &'static str {
        match self {
            DataType::String => "STRING",
            DataType::Text => "TEXT",
            DataType::Char => "CHAR",
            DataType::CiText => "CITEXT",
            DataType::Uuid => "UUID",
            DataType::UuidV4 => "UUIDV4",
            DataType::Enum => "ENUM",
            DataType::Number => "NUMBER",
            DataType::Integer => "INTEGER",
            DataType::TinyInt => "TINYINT",
            DataType::SmallInt => "SMALLINT",
            DataType::MediumInt => "MEDIUMINT",
            DataType::BigInt => "BIGINT",
            DataType::Float => "FLOAT",
            DataType::Double => "DOUBLE",
            DataType::Real => "REAL",
            DataType::Decimal => "DECIMAL",
            DataType::Boolean => "BOOLEAN",
            DataType::Date => "DATE",
            DataType::DateOnly => "DATEONLY",
            DataType::Time => "TIME",
            DataType::Json => "JSON",
            DataType::Jsonb => "JSONB",
        }
    }

    /// Convert to the TypeScript type used in interfaces and parameters
    pub fn ts_type(&self) -> TsType {
        match self {
            DataType::String
            | DataType::Text
            | DataType::Char
            | DataType::CiText
            | DataType::Uuid
            | DataType::UuidV4
            | DataType::Enum
            | DataType::DateOnly
            | DataType::Time => TsType::String,
            DataType::Number
            | DataType::Integer
            | DataType::TinyInt
            | DataType::SmallInt
            | DataType::MediumInt
            | DataType::BigInt
            | DataType::Float
            | DataType::Double
            | DataType::Real => TsType::Number,
            DataType::Decimal | DataType::Json | DataType::Jsonb => TsType::String,
            DataType::Boolean => TsType::Boolean,
            DataType::Date => TsType::Date,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_tag_round_trips_every_variant() {
        for dt in DataType::ALL {
            assert_eq!(DataType::from_tag(dt.tag()), Some(dt));
        }
    }

    #[test]
    fn test_from_tag_is_exact() {
        assert_eq!(DataType::from_tag("STRING"), Some(DataType::String));
        assert_eq!(DataType::from_tag("string"), None);
        assert_eq!(DataType::from_tag("MONEY"), None);
        assert_eq!(DataType::from_tag(""), None);
    }

    #[test]
    fn test_ts_type_mapping() {
        assert_eq!(DataType::String.ts_type(), TsType::String);
        assert_eq!(DataType::Boolean.ts_type(), TsType::Boolean);
        assert_eq!(DataType::Integer.ts_type(), TsType::Number);
        assert_eq!(DataType::Number.ts_type(), TsType::Number);
        assert_eq!(DataType::Date.ts_type(), TsType::Date);
        assert_eq!(DataType::Decimal.ts_type(), TsType::String);
        assert_eq!(DataType::Json.ts_type(), TsType::String);
        assert_eq!(DataType::DateOnly.ts_type(), TsType::String);
    }

    #[test]
    fn test_ts_annotation() {
        assert_eq!(TsType::String.annotation(true), "string | null");
        assert_eq!(TsType::Date.annotation(false), "Date");
        assert_eq!(TsType::Number.to_string(), "number");
    }
}
