//! Tile service query construction.
//!
//! Parameter order is fixed: `url`, every `bidx`, every `rescale`, then
//! `reproject`. Two builds from equivalent configuration produce
//! byte-identical query strings.

use crate::config::{AssetLocator, RenderOptions};

/// Longest edge of thumbnails, in pixels.
pub const THUMBNAIL_MAX_SIZE: u32 = 512;

/// A tile service base URL plus its ordered query parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct TileUrlSpec {
    base: String,
    params: Vec<(&'static str, String)>,
}

impl TileUrlSpec {
    /// Build the parameter sequence for one source raster.
    ///
    /// The rescale pair is repeated once per band in band order; without
    /// configured bands a single implicit band gets one rescale and no
    /// `bidx` is written.
    pub fn build(base: &str, locator: &AssetLocator, render: &RenderOptions) -> Self {
        let mut params = Vec::with_capacity(2 + render.bands.len() * 2);

        let source = locator.as_source();
        let url_value = if locator.is_url() {
            percent_encode(&source)
        } else {
            source
        };
        params.push(("url", url_value));

        for band in &render.bands {
            params.push(("bidx", band.to_string()));
        }

        if let Some([min, max]) = render.rescale {
            let pair = format!("{}%2C{}", min, max);
            let repeats = render.bands.len().max(1);
            for _ in 0..repeats {
                params.push(("rescale", pair.clone()));
            }
        }

        if let Some(method) = &render.reproject {
            params.push(("reproject", method.clone()));
        }

        Self {
            base: base.trim_end_matches('/').to_string(),
            params,
        }
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    /// Parameters in emission order.
    pub fn params(&self) -> &[(&'static str, String)] {
        &self.params
    }

    /// The `key=value&...` query string.
    pub fn query(&self) -> String {
        self.params
            .iter()
            .map(|(key, value)| format!("{}={}", key, value))
            .collect::<Vec<_>>()
            .join("&")
    }

    /// XYZ tile template with `{z}/{x}/{y}` placeholders.
    pub fn tile_url(&self) -> String {
        format!("{}/cog/tiles/{{z}}/{{x}}/{{y}}.png?{}", self.base, self.query())
    }

    pub fn info_url(&self) -> String {
        format!("{}/cog/info?{}", self.base, self.query())
    }

    pub fn preview_url(&self) -> String {
        format!("{}/cog/preview?{}", self.base, self.query())
    }

    pub fn thumbnail_url(&self) -> String {
        format!(
            "{}/cog/preview.png?{}&max_size={}",
            self.base,
            self.query(),
            THUMBNAIL_MAX_SIZE
        )
    }
}

/// Percent-encode everything outside the RFC 3986 unreserved set.
pub fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len() * 3);
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}
