use crate::error::{RelayError, Result};

/// Default base URL of the trace/metadata provider API.
pub const DEFAULT_API_BASE: &str = "https://api.tenderly.co/api/v1";

/// Secrets resolved once at invocation start and passed explicitly through
/// the pipeline entry points. There is no ambient configuration; each
/// invocation is a function of its trigger plus this value.
#[derive(Debug, Clone)]
pub struct Secrets {
    pub webhook_url: String,
    pub bearer: String,
    pub account_slug: String,
    pub project_slug: String,
    pub event_name: String,
    pub api_base_url: String,
}

impl Secrets {
    /// Resolve secrets from process environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Resolve secrets through an arbitrary lookup, so tests can inject
    /// values without touching the process environment. Every key except
    /// `TRACE_API_URL` is required; a missing key aborts before any
    /// network call is made.
    pub fn from_source<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| -> Result<String> {
            match get(key) {
                Some(value) if !value.is_empty() => Ok(value),
                _ => Err(RelayError::Configuration(format!(
                    "{} not found in environment variables",
                    key
                ))),
            }
        };

        let webhook_url = required("WEBHOOK_URL")?;
        let bearer = required("BEARER")?;
        let account_slug = required("ACCOUNT_SLUG")?;
        let project_slug = required("PROJECT_SLUG")?;
        let event_name = required("EVENT_NAME")?;

        Ok(Self {
            webhook_url,
            bearer,
            account_slug,
            project_slug,
            event_name,
            api_base_url: get("TRACE_API_URL").unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        })
    }
}
