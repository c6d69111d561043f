//! Error-message localisation.
//!
//! Only the messages this crate surfaces are catalogued; unknown error codes
//! fall back to the backend's message.

use std::collections::HashMap;
use std::str::FromStr;

use client::ApiError;
use common::types::ErrorParams;
use once_cell::sync::Lazy;
use serde_json::Value;

use crate::errors::ServiceError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Locale {
    #[default]
    PtBr,
    EnUs,
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pt-BR" | "pt" => Ok(Locale::PtBr),
            "en-US" | "en" => Ok(Locale::EnUs),
            other => Err(format!("unsupported locale {other}")),
        }
    }
}

static PT_BR: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("error.INTERNAL_SERVER_ERROR", "Erro interno. Tente novamente."),
        ("error.NETWORK_ERROR", "Não foi possível conectar ao servidor."),
        ("error.INVALID_CREDENTIALS", "E-mail ou senha inválidos."),
        ("error.CATEGORY_ALREADY_EXISTS", "Já existe uma categoria com este nome."),
        ("error.CATEGORY_NOT_FOUND", "Categoria não encontrada."),
        ("error.TENANT_NOT_FOUND", "Restaurante não encontrado."),
        ("error.EMAIL_ALREADY_IN_USE", "Este e-mail já está em uso."),
        ("error.PLAN_LIMIT_REACHED", "Seu plano permite no máximo {max} itens."),
        ("auth.tenant_slug_missing", "Restaurante não identificado. Faça o cadastro ou login novamente."),
    ])
});

static EN_US: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("error.INTERNAL_SERVER_ERROR", "Internal error. Please try again."),
        ("error.NETWORK_ERROR", "Could not reach the server."),
        ("error.INVALID_CREDENTIALS", "Invalid email or password."),
        ("error.CATEGORY_ALREADY_EXISTS", "A category with this name already exists."),
        ("error.CATEGORY_NOT_FOUND", "Category not found."),
        ("error.TENANT_NOT_FOUND", "Restaurant not found."),
        ("error.EMAIL_ALREADY_IN_USE", "This email is already in use."),
        ("error.PLAN_LIMIT_REACHED", "Your plan allows at most {max} items."),
        ("auth.tenant_slug_missing", "Restaurant not identified. Please register or log in again."),
    ])
});

fn dictionary(locale: Locale) -> &'static HashMap<&'static str, &'static str> {
    match locale {
        Locale::PtBr => &PT_BR,
        Locale::EnUs => &EN_US,
    }
}

/// Look up `key` and replace `{name}` placeholders. Unknown keys come back verbatim.
pub fn t(locale: Locale, key: &str, vars: Option<&ErrorParams>) -> String {
    let template = dictionary(locale).get(key).copied().unwrap_or(key);
    let Some(vars) = vars else {
        return template.to_string();
    };
    vars.iter().fold(template.to_string(), |acc, (k, v)| {
        let rendered = match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        acc.replace(&format!("{{{k}}}"), &rendered)
    })
}

/// Translate a backend error code, falling back to the given message and
/// then to the generic internal-error text.
pub fn translate_error(
    locale: Locale,
    error_code: Option<&str>,
    fallback: Option<&str>,
    vars: Option<&ErrorParams>,
) -> String {
    let fallback = fallback.filter(|f| !f.is_empty());
    let Some(code) = error_code else {
        return fallback
            .map(str::to_string)
            .unwrap_or_else(|| t(locale, "error.INTERNAL_SERVER_ERROR", None));
    };
    let key = format!("error.{code}");
    let translated = t(locale, &key, vars);
    if translated == key {
        fallback.map(str::to_string).unwrap_or(translated)
    } else {
        translated
    }
}

/// Message to show next to a form or in a banner.
pub fn user_message(locale: Locale, err: &ServiceError) -> String {
    match err {
        ServiceError::Api(ApiError::Structured(e)) => {
            translate_error(locale, e.error_code.as_deref(), Some(&e.message), e.params.as_ref())
        }
        ServiceError::Api(ApiError::MissingTenant) => t(locale, "auth.tenant_slug_missing", None),
        ServiceError::Api(ApiError::Transport(_)) => t(locale, "error.NETWORK_ERROR", None),
        ServiceError::Validation(e) => e.to_string(),
        _ => t(locale, "error.INTERNAL_SERVER_ERROR", None),
    }
}
