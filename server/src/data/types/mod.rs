//! Shared data types for the storage layer
//!
//! Row structs mirror SQLite column types directly (TEXT ids, INTEGER unix
//! timestamps). Role and Scope are closed enums; free-form strings from the
//! wire are parsed at the boundary and rejected when unknown.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::constants::{ROLE_ADMIN, ROLE_USER};

// ============================================================================
// Role
// ============================================================================

/// User role. Closed set; stored as TEXT with a CHECK constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => ROLE_USER,
            Self::Admin => ROLE_ADMIN,
        }
    }

    /// Parse a role name, rejecting unknown values
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            ROLE_USER => Some(Self::User),
            ROLE_ADMIN => Some(Self::Admin),
            _ => None,
        }
    }

    /// Convert a stored column value. The schema CHECK constraint guarantees
    /// the value is valid; anything else is treated as the least privilege.
    pub fn from_db(s: &str) -> Self {
        Self::parse(s).unwrap_or(Self::User)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Scope
// ============================================================================

/// Token scope. Closed registry; unknown names are rejected at issuance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Scope {
    StockRead,
    StockWrite,
    MovementsRead,
    MovementsWrite,
    Profile,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StockRead => "stock:read",
            Self::StockWrite => "stock:write",
            Self::MovementsRead => "movements:read",
            Self::MovementsWrite => "movements:write",
            Self::Profile => "profile",
        }
    }

    /// Parse a single scope name against the registry
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "stock:read" => Some(Self::StockRead),
            "stock:write" => Some(Self::StockWrite),
            "movements:read" => Some(Self::MovementsRead),
            "movements:write" => Some(Self::MovementsWrite),
            "profile" => Some(Self::Profile),
            _ => None,
        }
    }

    /// Parse a space-delimited scope list, failing on the first unknown name
    pub fn parse_list(s: &str) -> Result<Vec<Self>, String> {
        let mut scopes = Vec::new();
        for name in s.split_whitespace() {
            let scope = Self::parse(name).ok_or_else(|| name.to_string())?;
            if !scopes.contains(&scope) {
                scopes.push(scope);
            }
        }
        Ok(scopes)
    }

    /// Format a scope list as the space-delimited claim value
    pub fn format_list(scopes: &[Self]) -> String {
        scopes
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Row types
// ============================================================================

/// Product (wine) row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ProductRow {
    pub id: String,
    pub name: String,
    pub vintage: Option<i64>,
    pub region: Option<String>,
    pub grape_variety: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Branch row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct BranchRow {
    pub id: String,
    pub name: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Stock ledger row, unique per (product_id, branch_id)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct StockRow {
    pub id: String,
    pub product_id: String,
    pub branch_id: String,
    pub quantity: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Immutable movement audit record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MovementRow {
    pub id: String,
    pub product_id: String,
    pub quantity: i64,
    pub origin_branch_id: String,
    pub destination_branch_id: String,
    pub user_id: String,
    pub notes: Option<String>,
    pub created_at: i64,
}

/// User row. The password hash never leaves the data layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRow {
    pub id: String,
    pub username: String,
    pub name: String,
    pub email: Option<String>,
    pub password_hash: String,
    pub role: Role,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Client (customer) row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct ClientRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Registered OAuth API consumer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OAuthClientRow {
    pub id: String,
    pub client_id: String,
    pub client_secret_hash: String,
    pub name: String,
    pub created_at: i64,
    pub updated_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse() {
        assert_eq!(Role::parse("user"), Some(Role::User));
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse("superuser"), None);
        assert_eq!(Role::parse("Admin"), None);
    }

    #[test]
    fn test_role_from_db_defaults_to_user() {
        assert_eq!(Role::from_db("admin"), Role::Admin);
        assert_eq!(Role::from_db("garbage"), Role::User);
    }

    #[test]
    fn test_scope_parse_list() {
        let scopes = Scope::parse_list("stock:read movements:write").unwrap();
        assert_eq!(scopes, vec![Scope::StockRead, Scope::MovementsWrite]);
    }

    #[test]
    fn test_scope_parse_list_rejects_unknown() {
        let err = Scope::parse_list("stock:read launch:missiles").unwrap_err();
        assert_eq!(err, "launch:missiles");
    }

    #[test]
    fn test_scope_parse_list_dedupes() {
        let scopes = Scope::parse_list("profile profile").unwrap();
        assert_eq!(scopes, vec![Scope::Profile]);
    }

    #[test]
    fn test_scope_parse_list_empty() {
        assert!(Scope::parse_list("").unwrap().is_empty());
        assert!(Scope::parse_list("   ").unwrap().is_empty());
    }

    #[test]
    fn test_scope_format_list_roundtrip() {
        let scopes = vec![Scope::StockWrite, Scope::Profile];
        let formatted = Scope::format_list(&scopes);
        assert_eq!(formatted, "stock:write profile");
        assert_eq!(Scope::parse_list(&formatted).unwrap(), scopes);
    }
}
