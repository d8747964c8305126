//! User model, capabilities and authentication claims

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::error::AppError;

/// Named permission required to perform a mutating action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Capability {
    /// Renew loans, see every loan, and create/update/delete catalog entries
    #[serde(rename = "catalog.manage")]
    CatalogManage,
}

impl Capability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::CatalogManage => "catalog.manage",
        }
    }
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "catalog.manage" => Ok(Capability::CatalogManage),
            _ => Err(format!("Unknown capability: {}", s)),
        }
    }
}

/// Parse stored capability names, skipping names this server does not know
pub fn parse_capabilities(names: &[String]) -> Vec<Capability> {
    names.iter().filter_map(|n| n.parse().ok()).collect()
}

/// Internal row structure for database queries
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    id: i32,
    username: String,
    password_hash: String,
    first_name: String,
    last_name: String,
    email: Option<String>,
    capabilities: Vec<String>,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            username: row.username,
            password_hash: row.password_hash,
            first_name: row.first_name,
            last_name: row.last_name,
            email: row.email,
            capabilities: parse_capabilities(&row.capabilities),
            created_at: row.created_at,
        }
    }
}

/// Full user model
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct User {
    pub id: i32,
    pub username: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub capabilities: Vec<Capability>,
    pub created_at: DateTime<Utc>,
}

/// Short user representation, used for borrowers
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct UserShort {
    pub id: i32,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

/// JWT claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub capabilities: Vec<Capability>,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.capabilities.contains(&capability)
    }

    pub fn require(&self, capability: Capability) -> Result<(), AppError> {
        if self.has(capability) {
            Ok(())
        } else {
            tracing::warn!(user_id = self.user_id, %capability, "capability missing");
            Err(AppError::Authorization(format!(
                "The '{}' capability is required",
                capability
            )))
        }
    }

    pub fn require_catalog_manage(&self) -> Result<(), AppError> {
        self.require(Capability::CatalogManage)
    }
}
