use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;
use crate::tenant::TenantRef;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    Admin,
    Customer,
}

/// The user as cached by the client session. Replaced wholesale, never patched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl UserSummary {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl LoginCredentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        validate_email(&self.email)?;
        if self.password.is_empty() {
            return Err(ModelError::Validation("password required".into()));
        }
        Ok(())
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Successful login/refresh body. Tokens travel as HttpOnly cookies and are never read here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_slug: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant: Option<TenantRef>,
}

impl AuthResponse {
    /// Tenant slug carried by the envelope, top-level field first.
    pub fn tenant_identifier(&self) -> Option<&str> {
        let present = |s: &&str| !s.trim().is_empty();
        self.tenant_slug
            .as_deref()
            .filter(present)
            .or_else(|| self.tenant.as_ref().map(|t| t.slug.as_str()).filter(present))
    }
}

/// Public merchant sign-up: creates the tenant and its first admin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterInput {
    pub tenant_name: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl RegisterInput {
    /// Trim fields, drop an empty phone, then validate.
    pub fn normalized(mut self) -> Result<Self, ModelError> {
        self.tenant_name = self.tenant_name.trim().to_string();
        self.name = self.name.trim().to_string();
        self.email = self.email.trim().to_string();
        self.phone = self.phone.map(|p| p.trim().to_string()).filter(|p| !p.is_empty());
        validate_name(&self.tenant_name).map_err(|_| ModelError::Validation("tenant name required".into()))?;
        validate_name(&self.name)?;
        validate_email(&self.email)?;
        Ok(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    #[serde(default)]
    pub tenant: Option<TenantRef>,
    #[serde(default)]
    pub user: Option<UserSummary>,
}

pub fn validate_email(email: &str) -> Result<(), ModelError> {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ModelError::Validation("invalid email".into())),
    }
}

pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::Validation("name required".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_decodes_backend_shape() {
        let user: UserSummary = serde_json::from_value(json!({
            "id": "u1", "name": "Ana", "email": "a@b.com", "role": "ADMIN",
            "isActive": true, "tenantId": "t1",
            "createdAt": "2024-01-01T00:00:00Z", "updatedAt": "2024-01-02T00:00:00Z"
        }))
        .unwrap();
        assert!(user.is_admin());
        assert_eq!(user.tenant_id.as_deref(), Some("t1"));
        assert!(user.created_at.is_some());
    }

    #[test]
    fn credentials_debug_hides_password() {
        let c = LoginCredentials::new("a@b.com", "hunter2");
        let dbg = format!("{c:?}");
        assert!(dbg.contains("a@b.com"));
        assert!(!dbg.contains("hunter2"));
    }

    #[test]
    fn auth_response_tenant_from_either_field() {
        let user = json!({"id": "1", "name": "A", "email": "a@b.com", "role": "CUSTOMER", "isActive": true});
        let top: AuthResponse = serde_json::from_value(json!({"user": user, "tenantSlug": "acme"})).unwrap();
        assert_eq!(top.tenant_identifier(), Some("acme"));
        let nested: AuthResponse = serde_json::from_value(json!({"user": user, "tenant": {"slug": "beta"}})).unwrap();
        assert_eq!(nested.tenant_identifier(), Some("beta"));
        let none: AuthResponse = serde_json::from_value(json!({"user": user, "tenantSlug": ""})).unwrap();
        assert_eq!(none.tenant_identifier(), None);
    }

    #[test]
    fn blank_top_level_slug_falls_back_to_nested() {
        let user = json!({"id": "1", "name": "A", "email": "a@b.com", "role": "ADMIN", "isActive": true});
        let blank: AuthResponse =
            serde_json::from_value(json!({"user": user, "tenantSlug": " ", "tenant": {"slug": "beta"}})).unwrap();
        assert_eq!(blank.tenant_identifier(), Some("beta"));
        let both_blank: AuthResponse =
            serde_json::from_value(json!({"user": user, "tenantSlug": "", "tenant": {"slug": ""}})).unwrap();
        assert_eq!(both_blank.tenant_identifier(), None);
    }

    #[test]
    fn register_input_normalizes_and_validates() {
        let input = RegisterInput {
            tenant_name: "  Pizzaria  ".into(),
            name: "Ana".into(),
            email: " ana@pizza.com ".into(),
            phone: Some("  ".into()),
        }
        .normalized()
        .unwrap();
        assert_eq!(input.tenant_name, "Pizzaria");
        assert_eq!(input.email, "ana@pizza.com");
        assert!(input.phone.is_none());

        let bad = RegisterInput { tenant_name: "".into(), name: "Ana".into(), email: "a@b.com".into(), phone: None };
        assert!(bad.normalized().is_err());
        assert!(validate_email("nope").is_err());
        assert!(validate_email("@x").is_err());
    }
}
