use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqlx::FromRow;

use crate::services::TenantError;

/// Postgres truncates identifiers beyond this many bytes
const MAX_IDENTIFIER_LEN: usize = 63;

/// Tenant record as stored in the catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Tenant {
    pub id: i32,
    pub name: String,
    pub subdomain: String,
    pub database_name: String,
}

/// Tenant as submitted for creation; the catalog assigns the id
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTenant {
    pub name: String,
    pub subdomain: String,
    #[serde(default)]
    pub database_name: Option<String>,
}

impl NewTenant {
    pub fn new(
        name: impl Into<String>,
        subdomain: impl Into<String>,
        database_name: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            subdomain: subdomain.into(),
            database_name: Some(database_name.into()),
        }
    }

    /// Trim fields, derive a database name when none was given, and validate.
    pub fn normalize(self) -> Result<NewTenant, TenantError> {
        let name = self.name.trim().to_string();
        let subdomain = self.subdomain.trim().to_lowercase();

        if name.is_empty() {
            return Err(TenantError::InvalidField("name", "must not be empty".to_string()));
        }
        if subdomain.is_empty() {
            return Err(TenantError::InvalidField("subdomain", "must not be empty".to_string()));
        }
        if !subdomain.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(TenantError::InvalidField(
                "subdomain",
                "can only contain letters, numbers and hyphens".to_string(),
            ));
        }

        let database_name = match self.database_name.as_deref().map(str::trim) {
            Some(db) if !db.is_empty() => db.to_string(),
            _ => derive_database_name(&name),
        };
        if !is_valid_database_name(&database_name) {
            return Err(TenantError::InvalidField(
                "database_name",
                format!("'{}' is not a valid database identifier", database_name),
            ));
        }

        Ok(NewTenant {
            name,
            subdomain,
            database_name: Some(database_name),
        })
    }

    /// Database name after `normalize`; empty before.
    pub fn database_name(&self) -> &str {
        self.database_name.as_deref().unwrap_or_default()
    }
}

/// Hash tenant name to a stable database name
pub fn derive_database_name(name: &str) -> String {
    let hash = Sha256::digest(name.as_bytes());
    let hash_str = format!("{:x}", hash);

    // First 16 characters keep the name short and still collision-resistant
    format!("tenant_{}", &hash_str[..16])
}

/// Database names are interpolated into DDL, so only plain identifiers pass:
/// ASCII letters, digits and underscores, not starting with a digit.
pub fn is_valid_database_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    name.len() <= MAX_IDENTIFIER_LEN && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_db_names() {
        assert!(is_valid_database_name("tenant7db"));
        assert!(is_valid_database_name("tenant_123abc_DEF"));
        assert!(is_valid_database_name("_scratch"));
        assert!(!is_valid_database_name(""));
        assert!(!is_valid_database_name("7tenant"));
        assert!(!is_valid_database_name("tenant-123"));
        assert!(!is_valid_database_name("tenant_; DROP DATABASE"));
        assert!(!is_valid_database_name(&"a".repeat(64)));
    }

    #[test]
    fn derives_stable_database_name() {
        let a = derive_database_name("Acme Corp");
        assert_eq!(a, derive_database_name("Acme Corp"));
        assert_ne!(a, derive_database_name("Globex"));
        assert!(a.starts_with("tenant_"));
        assert_eq!(a.len(), "tenant_".len() + 16);
        assert!(is_valid_database_name(&a));
    }

    #[test]
    fn normalize_fills_in_database_name() {
        let tenant = NewTenant {
            name: "  Acme ".to_string(),
            subdomain: "ACME".to_string(),
            database_name: None,
        }
        .normalize()
        .unwrap();

        assert_eq!(tenant.name, "Acme");
        assert_eq!(tenant.subdomain, "acme");
        assert_eq!(tenant.database_name(), derive_database_name("Acme"));
    }

    #[test]
    fn normalize_rejects_empty_fields() {
        let err = NewTenant::new("", "acme", "acme_db").normalize().unwrap_err();
        assert!(matches!(err, TenantError::InvalidField("name", _)));

        let err = NewTenant::new("Acme", " ", "acme_db").normalize().unwrap_err();
        assert!(matches!(err, TenantError::InvalidField("subdomain", _)));
    }

    #[test]
    fn normalize_rejects_unsafe_database_name() {
        let err = NewTenant::new("Acme", "acme", "acme\"; DROP")
            .normalize()
            .unwrap_err();
        assert!(matches!(err, TenantError::InvalidField("database_name", _)));
    }
}
