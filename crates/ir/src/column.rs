//! Column definitions recovered from a migration
//!
//! A [`ColumnSpec`] is the ordered list of columns declared in the
//! migration's column block, each with a canonical camelCase name, a mapped
//! data type and a nullability flag.

use modelgen_core::{DataType, ScaffoldError, ScaffoldResult, TsType};

use crate::literal::Value;
use crate::names::column_identifier;

/// Column names managed by the ORM; they are part of the model's fields but
/// never of create parameters or payloads.
pub const RESERVED_COLUMNS: [&str; 3] = ["id", "createdAt", "updatedAt"];

// ============================================================================
// Column
// ============================================================================

/// A single column of the migrated table
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Canonical camelCase identifier
    pub name: String,

    /// Key as written in the migration
    pub source_key: String,

    /// Mapped data type
    pub data_type: DataType,

    /// Whether the column accepts `null`
    pub allow_null: bool,

    /// The full descriptor as parsed
    pub descriptor: Value,
}

impl Column {
    /// Build a column from one `key: descriptor` member of the column block
    pub fn from_descriptor(key: &str, descriptor: &Value) -> ScaffoldResult<Self> {
        let name = column_identifier(key);
        if name.is_empty() {
            return Err(ScaffoldError::malformed(format!(
                "column key '{}' has no identifier characters",
                key
            )));
        }

        let (type_value, allow_null) = match descriptor {
            Value::Object(_) => {
                let type_value = descriptor.get("type").ok_or_else(|| {
                    ScaffoldError::malformed(format!("column '{}' has no type", key))
                })?;
                let allow_null = match descriptor.get("allowNull") {
                    None => false,
                    Some(v) => v.as_bool().ok_or_else(|| {
                        ScaffoldError::malformed(format!(
                            "column '{}' has a non-boolean allowNull ({})",
                            key,
                            v.kind_name()
                        ))
                    })?,
                };
                (type_value, allow_null)
            }
            // Shorthand `name: DataTypes.STRING`
            Value::Expr(_) => (descriptor, false),
            other => {
                return Err(ScaffoldError::malformed(format!(
                    "column '{}' is described by a {}, expected an object",
                    key,
                    other.kind_name()
                )));
            }
        };

        let tag = type_value
            .as_expr()
            .and_then(|expr| expr.last_segment())
            .ok_or_else(|| {
                ScaffoldError::malformed(format!(
                    "column '{}' has a {} type, expected a DataTypes tag",
                    key,
                    type_value.kind_name()
                ))
            })?;

        let data_type =
            DataType::from_tag(tag).ok_or_else(|| ScaffoldError::unknown_type(&name, tag))?;

        Ok(Self {
            name,
            source_key: key.to_string(),
            data_type,
            allow_null,
            descriptor: descriptor.clone(),
        })
    }

    /// TypeScript type of the column
    pub fn ts_type(&self) -> TsType {
        self.data_type.ts_type()
    }

    /// TypeScript annotation including `| null` for nullable columns
    pub fn annotation(&self) -> String {
        self.ts_type().annotation(self.allow_null)
    }

    /// Whether the ORM manages this column
    pub fn is_reserved(&self) -> bool {
        RESERVED_COLUMNS.contains(&self.name.as_str())
    }
}

// ============================================================================
// ColumnSpec
// ============================================================================

/// Ordered, name-unique columns of one migration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnSpec {
    columns: Vec<Column>,
}

impl ColumnSpec {
    /// Build the column list from a parsed column block
    pub fn from_block(block: &Value) -> ScaffoldResult<Self> {
        let members = block.as_object().ok_or_else(|| {
            ScaffoldError::malformed(format!(
                "column block is a {}, expected an object",
                block.kind_name()
            ))
        })?;

        let mut spec = Self::default();
        for (key, descriptor) in members {
            spec.push(Column::from_descriptor(key, descriptor)?)?;
        }
        Ok(spec)
    }

    /// Append a column, rejecting duplicate identifiers
    pub fn push(&mut self, column: Column) -> ScaffoldResult<()> {
        if let Some(existing) = self.get(&column.name) {
            return Err(ScaffoldError::malformed(format!(
                "columns '{}' and '{}' both normalize to '{}'",
                existing.source_key, column.source_key, column.name
            )));
        }
        self.columns.push(column);
        Ok(())
    }

    /// Look up a column by canonical name
    pub fn get(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// All columns in declaration order; the model's field list
    pub fn fields(&self) -> &[Column] {
        &self.columns
    }

    /// Columns a caller supplies on create (reserved columns excluded)
    pub fn create_params(&self) -> impl Iterator<Item = &Column> {
        self.columns.iter().filter(|c| !c.is_reserved())
    }

    /// Reserved columns that this migration declares, in `RESERVED_COLUMNS` order
    pub fn reserved_present(&self) -> Vec<&str> {
        RESERVED_COLUMNS
            .iter()
            .copied()
            .filter(|name| self.get(name).is_some())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::literal::parse_literal;

    fn spec(src: &str) -> ScaffoldResult<ColumnSpec> {
        ColumnSpec::from_block(&parse_literal(src).unwrap())
    }

    #[test]
    fn test_columns_keep_declaration_order() {
        let spec = spec(
            "{ id: { type: DataTypes.INTEGER }, user_id: { type: DataTypes.INTEGER }, \
             total: { type: DataTypes.DECIMAL(10, 2), allowNull: true } }",
        )
        .unwrap();

        let names: Vec<&str> = spec.fields().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "userId", "total"]);

        let total = spec.get("total").unwrap();
        assert_eq!(total.data_type, DataType::Decimal);
        assert!(total.allow_null);
        assert_eq!(total.annotation(), "string | null");
    }

    #[test]
    fn test_allow_null_defaults_to_false() {
        let spec = spec("{ name: { type: STRING } }").unwrap();
        let name = spec.get("name").unwrap();
        assert!(!name.allow_null);
        assert_eq!(name.annotation(), "string");
    }

    #[test]
    fn test_shorthand_descriptor() {
        let spec = spec("{ active: DataTypes.BOOLEAN }").unwrap();
        assert_eq!(spec.get("active").unwrap().data_type, DataType::Boolean);
    }

    #[test]
    fn test_reserved_columns_excluded_from_create_params() {
        let spec = spec(
            "{ id: { type: INTEGER }, name: { type: STRING }, \
             created_at: { type: DATE }, updated_at: { type: DATE } }",
        )
        .unwrap();

        assert_eq!(spec.len(), 4);
        let params: Vec<&str> = spec.create_params().map(|c| c.name.as_str()).collect();
        assert_eq!(params, vec!["name"]);
        assert_eq!(spec.reserved_present(), vec!["id", "createdAt", "updatedAt"]);
    }

    #[test]
    fn test_unknown_type_tag() {
        let err = spec("{ price: { type: DataTypes.MONEY } }").unwrap_err();
        match err {
            ScaffoldError::UnknownTypeTag { column, tag } => {
                assert_eq!(column, "price");
                assert_eq!(tag, "MONEY");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_or_invalid_type() {
        assert!(spec("{ a: { allowNull: true } }").unwrap_err().is_parse());
        assert!(spec("{ a: { type: 'STRING' } }").unwrap_err().is_parse());
        assert!(spec("{ a: { type: STRING, allowNull: 'yes' } }").unwrap_err().is_parse());
        assert!(spec("{ a: 42 }").unwrap_err().is_parse());
    }

    #[test]
    fn test_duplicate_after_normalization() {
        let err = spec("{ created_at: { type: DATE }, createdAt: { type: DATE } }").unwrap_err();
        assert!(err.to_string().contains("createdAt"));
    }

    #[test]
    fn test_empty_block() {
        let spec = spec("{}").unwrap();
        assert!(spec.is_empty());
        assert_eq!(spec.create_params().count(), 0);
    }
}
