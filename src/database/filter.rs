use serde::{Deserialize, Serialize};
use sqlx::{Postgres, QueryBuilder};

use super::models::Tenant;

/// Conjunction of equality predicates over tenant fields.
///
/// Evaluated in memory through [`TenantFilter::matches`] and rendered to SQL
/// through [`TenantFilter::push_where`], so every catalog backend agrees on
/// what a filter selects. An empty filter matches every tenant.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TenantFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subdomain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_name: Option<String>,
}

impl TenantFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn by_id(id: i32) -> Self {
        Self::default().id(id)
    }

    pub fn by_subdomain(subdomain: impl Into<String>) -> Self {
        Self::default().subdomain(subdomain)
    }

    pub fn by_database_name(database_name: impl Into<String>) -> Self {
        Self::default().database_name(database_name)
    }

    pub fn id(mut self, id: i32) -> Self {
        self.id = Some(id);
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn subdomain(mut self, subdomain: impl Into<String>) -> Self {
        self.subdomain = Some(subdomain.into());
        self
    }

    pub fn database_name(mut self, database_name: impl Into<String>) -> Self {
        self.database_name = Some(database_name.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn matches(&self, tenant: &Tenant) -> bool {
        self.id.map_or(true, |id| tenant.id == id)
            && self.name.as_deref().map_or(true, |v| tenant.name == v)
            && self.subdomain.as_deref().map_or(true, |v| tenant.subdomain == v)
            && self
                .database_name
                .as_deref()
                .map_or(true, |v| tenant.database_name == v)
    }

    /// Append ` WHERE ...` (or nothing for an empty filter) with bound parameters
    pub fn push_where<'a>(&'a self, builder: &mut QueryBuilder<'a, Postgres>) {
        let mut first = true;
        let mut next = |builder: &mut QueryBuilder<'a, Postgres>, column: &str| {
            builder.push(if first { " WHERE " } else { " AND " });
            builder.push(column);
            builder.push(" = ");
            first = false;
        };

        if let Some(id) = self.id {
            next(builder, "id");
            builder.push_bind(id);
        }
        if let Some(name) = &self.name {
            next(builder, "name");
            builder.push_bind(name.as_str());
        }
        if let Some(subdomain) = &self.subdomain {
            next(builder, "subdomain");
            builder.push_bind(subdomain.as_str());
        }
        if let Some(database_name) = &self.database_name {
            next(builder, "database_name");
            builder.push_bind(database_name.as_str());
        }
    }
}

impl std::fmt::Display for TenantFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut parts = Vec::new();
        if let Some(id) = self.id {
            parts.push(format!("id={}", id));
        }
        if let Some(v) = &self.name {
            parts.push(format!("name={}", v));
        }
        if let Some(v) = &self.subdomain {
            parts.push(format!("subdomain={}", v));
        }
        if let Some(v) = &self.database_name {
            parts.push(format!("database_name={}", v));
        }
        if parts.is_empty() {
            write!(f, "*")
        } else {
            write!(f, "{}", parts.join(","))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tenant() -> Tenant {
        Tenant {
            id: 7,
            name: "Acme".to_string(),
            subdomain: "acme".to_string(),
            database_name: "tenant7db".to_string(),
        }
    }

    #[test]
    fn empty_filter_matches_everything() {
        assert!(TenantFilter::all().is_empty());
        assert!(TenantFilter::all().matches(&tenant()));
    }

    #[test]
    fn all_predicates_must_hold() {
        assert!(TenantFilter::by_id(7).subdomain("acme").matches(&tenant()));
        assert!(!TenantFilter::by_id(7).subdomain("globex").matches(&tenant()));
        assert!(!TenantFilter::by_id(8).matches(&tenant()));
        assert!(TenantFilter::by_database_name("tenant7db").matches(&tenant()));
    }

    #[test]
    fn renders_parameterized_where_clause() {
        let filter = TenantFilter::by_id(7).database_name("tenant7db");
        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM tenants");
        filter.push_where(&mut builder);
        assert_eq!(
            builder.sql(),
            "SELECT * FROM tenants WHERE id = $1 AND database_name = $2"
        );
    }

    #[test]
    fn empty_filter_renders_no_where_clause() {
        let filter = TenantFilter::all();
        let mut builder = QueryBuilder::<Postgres>::new("SELECT * FROM tenants");
        filter.push_where(&mut builder);
        assert_eq!(builder.sql(), "SELECT * FROM tenants");
    }

    #[test]
    fn displays_compactly() {
        assert_eq!(TenantFilter::all().to_string(), "*");
        assert_eq!(TenantFilter::by_id(3).name("Acme").to_string(), "id=3,name=Acme");
    }
}
