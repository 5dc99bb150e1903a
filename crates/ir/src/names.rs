//! Name forms derived from a migration's table name
//!
//! Every generated identifier, file name and registry key comes from the
//! single raw table literal found in the migration.

use heck::{ToLowerCamelCase, ToPascalCase};

/// The naming variants of one table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameForms {
    /// The table literal exactly as written (`orders`)
    pub raw: String,

    /// Singular stem used for file names (`order`)
    pub singular: String,

    /// PascalCase model name (`Order`)
    pub model: String,

    /// PascalCase of the unsingularized table, the key in the database
    /// initializer (`Orders`)
    pub registry_key: String,
}

impl NameForms {
    /// Derive all forms from a raw table name
    pub fn from_raw(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let singular = singularize(&raw).to_string();
        let model = singular.to_pascal_case();
        let registry_key = raw.to_pascal_case();

        Self {
            raw,
            singular,
            model,
            registry_key,
        }
    }

    /// Base name of every generated file (`order` in `order.model.ts`)
    pub fn file_stem(&self) -> &str {
        &self.singular
    }

    /// Class name with a suffix, e.g. `OrderService`
    pub fn class(&self, suffix: &str) -> String {
        format!("{}{}", self.model, suffix)
    }

    /// Instance name with a suffix, e.g. `orderService`
    pub fn instance(&self, suffix: &str) -> String {
        uncapitalize(&self.class(suffix))
    }
}

/// Drop one trailing plural `s` unless the name ends in `ss`.
///
/// This is a heuristic, not linguistics: `status` becomes `statu` and
/// `categories` becomes `categorie`. A name that would become empty is kept.
pub fn singularize(raw: &str) -> &str {
    match raw.strip_suffix('s') {
        Some(stem) if !stem.is_empty() && !stem.ends_with('s') => stem,
        _ => raw,
    }
}

/// Canonical camelCase identifier for a column key
///
/// Keys are split on `-`, `_`, spaces and case boundaries, so `created_at`,
/// `created-at` and `createdAt` all normalize to `createdAt`.
pub fn column_identifier(key: &str) -> String {
    key.to_lower_camel_case()
}

/// Lowercase the first character
pub fn uncapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_forms_orders() {
        let names = NameForms::from_raw("orders");
        assert_eq!(names.raw, "orders");
        assert_eq!(names.singular, "order");
        assert_eq!(names.model, "Order");
        assert_eq!(names.registry_key, "Orders");
        assert_eq!(names.file_stem(), "order");
    }

    #[test]
    fn test_name_forms_snake_case_table() {
        let names = NameForms::from_raw("order_items");
        assert_eq!(names.singular, "order_item");
        assert_eq!(names.model, "OrderItem");
        assert_eq!(names.registry_key, "OrderItems");
        assert_eq!(names.class("Repo"), "OrderItemRepo");
        assert_eq!(names.instance("Service"), "orderItemService");
    }

    #[test]
    fn test_singularize_single_s() {
        assert_eq!(singularize("users"), "user");
        assert_eq!(singularize("status"), "statu");
    }

    #[test]
    fn test_singularize_double_s_kept() {
        assert_eq!(singularize("address"), "address");
        assert_eq!(singularize("addresses"), "addresse");
    }

    #[test]
    fn test_singularize_without_s() {
        assert_eq!(singularize("person"), "person");
        assert_eq!(singularize("s"), "s");
        assert_eq!(singularize(""), "");
    }

    #[test]
    fn test_column_identifier() {
        assert_eq!(column_identifier("created_at"), "createdAt");
        assert_eq!(column_identifier("order-total"), "orderTotal");
        assert_eq!(column_identifier("createdAt"), "createdAt");
        assert_eq!(column_identifier("id"), "id");
        assert_eq!(column_identifier("User_ID"), "userId");
    }

    #[test]
    fn test_uncapitalize() {
        assert_eq!(uncapitalize("OrderRepo"), "orderRepo");
        assert_eq!(uncapitalize(""), "");
    }

    #[test]
    fn test_forms_are_pure() {
        assert_eq!(NameForms::from_raw("statuses"), NameForms::from_raw("statuses"));
    }
}
