//! Configuration loader for the catalog enricher
//!
//! Loads the three YAML documents of a run:
//! - Endpoint (tile service and time entries)
//! - Collection (name, title, GeoJSON overlay)
//! - Catalog (id and build directory)
//!
//! Supports environment variable substitution using ${VAR} syntax.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use tile_catalog::{CatalogConfig, CollectionConfig, EndpointConfig};

// ============================================================================
// Loaders
// ============================================================================

/// Load and validate an endpoint configuration.
pub fn load_endpoint_config<P: AsRef<Path>>(path: P) -> Result<EndpointConfig> {
    let config: EndpointConfig = load_yaml(path.as_ref(), "endpoint")?;
    config
        .validate()
        .with_context(|| format!("Invalid endpoint config {:?}", path.as_ref()))?;
    Ok(config)
}

/// Load a collection configuration.
///
/// A relative `geojson_source` is resolved against the file's directory.
pub fn load_collection_config<P: AsRef<Path>>(path: P) -> Result<CollectionConfig> {
    let mut config: CollectionConfig = load_yaml(path.as_ref(), "collection")?;
    if let (Some(source), Some(dir)) = (config.geojson_source.as_mut(), path.as_ref().parent()) {
        if source.is_relative() {
            *source = dir.join(&*source);
        }
    }
    Ok(config)
}

pub fn load_catalog_config<P: AsRef<Path>>(path: P) -> Result<CatalogConfig> {
    load_yaml(path.as_ref(), "catalog")
}

fn load_yaml<T: DeserializeOwned>(path: &Path, kind: &str) -> Result<T> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {} config from {:?}", kind, path))?;

    let expanded = expand_env_vars(&content)?;

    serde_yaml::from_str(&expanded)
        .with_context(|| format!("Failed to parse {} config from {:?}", kind, path))
}

// ============================================================================
// Environment Variable Expansion
// ============================================================================

/// Substitute `${VAR}` and `${VAR:-default}` references.
///
/// A reference without a default must name a set variable. `{...}` without
/// a leading `$` (URL templates such as `{cog_url}`) is left alone.
fn expand_env_vars(content: &str) -> Result<String> {
    let mut expanded = String::with_capacity(content.len());
    let mut rest = content;

    while let Some(start) = rest.find("${") {
        expanded.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let Some(end) = after.find('}') else {
            anyhow::bail!("Unterminated ${{...}} reference near {:?}", truncate(&rest[start..]));
        };
        expanded.push_str(&lookup_var(&after[..end])?);
        rest = &after[end + 1..];
    }
    expanded.push_str(rest);

    Ok(expanded)
}

/// Value of `NAME` or `NAME:-default`; an empty variable takes the default.
fn lookup_var(reference: &str) -> Result<String> {
    let (name, default) = match reference.split_once(":-") {
        Some((name, default)) => (name.trim(), Some(default)),
        None => (reference.trim(), None),
    };
    if name.is_empty() {
        anyhow::bail!("Empty variable name in ${{{}}}", reference);
    }

    match (std::env::var(name), default) {
        (Ok(value), Some(default)) if value.is_empty() => Ok(default.to_string()),
        (Ok(value), _) => Ok(value),
        (Err(_), Some(default)) => Ok(default.to_string()),
        (Err(_), None) => Err(anyhow::anyhow!(
            "Config references ${{{}}} but it is not set and has no default",
            name
        )),
    }
}

fn truncate(text: &str) -> &str {
    match text.char_indices().nth(32) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}
