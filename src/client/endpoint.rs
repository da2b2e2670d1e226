//! Endpoint hosts and URL composition

use crate::{Error, ErrorContext, Result};
use serde_json::Value;
use url::Url;

pub const PRODUCTION_HOST: &str = "soa-gw.canadapost.ca";
pub const DEVELOPMENT_HOST: &str = "ct.soa-gw.canadapost.ca";

/// Which carrier gateway a client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Production,
    #[default]
    Development,
}

impl Environment {
    pub fn host(&self) -> &'static str {
        match self {
            Environment::Production => PRODUCTION_HOST,
            Environment::Development => DEVELOPMENT_HOST,
        }
    }

    pub fn base_url(&self) -> Result<Url> {
        parse_base_url(&format!("https://{}", self.host()))
    }
}

pub(crate) fn parse_base_url(raw: &str) -> Result<Url> {
    Url::parse(raw).map_err(|e| {
        Error::configuration_with_context(
            format!("Invalid base URL {raw}: {e}"),
            ErrorContext::new()
                .with_field_path("base_url")
                .with_source("endpoint"),
        )
    })
}

/// Resolve the path for a call.
///
/// An explicit prefix wins, then the configured customer, then the bare call.
pub fn resolve_path(call: &str, path_prefix: Option<&str>, customer: Option<&str>) -> String {
    match (path_prefix, customer) {
        (Some(prefix), _) => format!("/{prefix}/{call}"),
        (None, Some(customer)) => format!("/rs/{customer}/{call}"),
        (None, None) => format!("/{call}"),
    }
}

/// Compose the target URL on `base`.
pub fn compose_url(
    base: &Url,
    call: &str,
    path_prefix: Option<&str>,
    customer: Option<&str>,
    query: Option<&[(String, String)]>,
) -> Url {
    let mut url = base.clone();
    url.set_path(&resolve_path(call, path_prefix, customer));
    url.set_query(None);
    if let Some(pairs) = query.filter(|pairs| !pairs.is_empty()) {
        url.query_pairs_mut()
            .extend_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    }
    url
}

/// Flatten GET parameters into query pairs.
///
/// Scalars are stringified, arrays repeat their key, and nulls are skipped. Nested objects
/// cannot be expressed in a query string.
pub fn query_pairs(params: &Value) -> Result<Vec<(String, String)>> {
    let map = params.as_object().ok_or_else(|| {
        Error::usage_with_context(
            "Query parameters must be an object",
            ErrorContext::new()
                .with_field_path("request.params")
                .with_source("endpoint"),
        )
    })?;

    let mut pairs = Vec::with_capacity(map.len());
    for (key, value) in map {
        push_query_value(&mut pairs, key, value)?;
    }
    Ok(pairs)
}

fn push_query_value(pairs: &mut Vec<(String, String)>, key: &str, value: &Value) -> Result<()> {
    match value {
        Value::Null => {}
        Value::String(text) => pairs.push((key.to_string(), text.clone())),
        Value::Bool(_) | Value::Number(_) => pairs.push((key.to_string(), value.to_string())),
        Value::Array(items) => {
            for item in items {
                push_query_value(pairs, key, item)?;
            }
        }
        Value::Object(_) => {
            return Err(Error::usage_with_context(
                format!("Query parameter {key} cannot be a nested object"),
                ErrorContext::new()
                    .with_field_path(format!("request.params.{key}"))
                    .with_source("endpoint"),
            ))
        }
    }
    Ok(())
}
