//! Tile links and asset descriptors derived from a tile URL.

use catalog_common::{media_types, rel, Asset, Link};
use serde_json::json;

use crate::config::{AssetSpec, LinkSpec};
use crate::tile_url::TileUrlSpec;

/// EPSG code of the web-mercator tiles the `data` asset serves.
pub const WEB_MERCATOR_EPSG: u32 = 3857;

pub const DATA_ASSET: &str = "data";
pub const INFO_ASSET: &str = "info";
pub const PREVIEW_ASSET: &str = "preview";
pub const THUMBNAIL_ASSET: &str = "thumbnail";

/// Metadata carried onto a synthesized tile link.
#[derive(Debug, Clone, Copy)]
pub struct LinkMetadata<'a> {
    pub title: &'a str,
    pub media_type: &'a str,
    /// EPSG code advertised as `proj:epsg`.
    pub projection: Option<u32>,
}

/// A tile link plus the assets that describe the same rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesizedTile {
    pub link: Link,
    /// `(key, asset)` pairs; `data` first.
    pub assets: Vec<(String, Asset)>,
}

/// Build the `xyz` link and `data`/`info`/`preview`/`thumbnail` assets.
pub fn synthesize(spec: &TileUrlSpec, meta: &LinkMetadata<'_>, auxiliary: bool) -> SynthesizedTile {
    let tile_url = spec.tile_url();
    let link = tile_link(&tile_url, meta);

    let mut assets = vec![(DATA_ASSET.to_string(), data_asset(&tile_url, meta.media_type))];
    if auxiliary {
        assets.push((
            INFO_ASSET.to_string(),
            Asset::new(spec.info_url())
                .with_type(media_types::JSON)
                .with_role("metadata"),
        ));
        assets.push((
            PREVIEW_ASSET.to_string(),
            Asset::new(spec.preview_url())
                .with_type(media_types::PNG)
                .with_role("overview"),
        ));
        assets.push((
            THUMBNAIL_ASSET.to_string(),
            Asset::new(spec.thumbnail_url())
                .with_type(media_types::PNG)
                .with_role("thumbnail"),
        ));
    }

    SynthesizedTile { link, assets }
}

/// An `xyz` link with `role: ["data"]`, which viewers use to detect
/// renderable layers.
pub fn tile_link(href: &str, meta: &LinkMetadata<'_>) -> Link {
    let mut link = Link::new(href, rel::XYZ)
        .with_type(meta.media_type)
        .with_title(meta.title)
        .with_field("role", json!(["data"]));
    if let Some(epsg) = meta.projection {
        link = link.with_field("proj:epsg", epsg);
    }
    link
}

/// Asset mirror of a tile URL, so the item stays renderable for viewers
/// that only look at assets.
pub fn data_asset(href: &str, media_type: &str) -> Asset {
    Asset::new(href)
        .with_type(media_type)
        .with_role("data")
        .with_field("proj:epsg", WEB_MERCATOR_EPSG)
}

/// Asset for a configured source file. `None` when no `File` is set.
pub fn configured_asset(spec: &AssetSpec) -> Option<(String, Asset)> {
    let file = spec.file.as_deref().filter(|f| !f.is_empty())?;
    let mut asset = Asset::new(file)
        .with_type(spec.media_type.as_deref().unwrap_or(media_types::GEOTIFF))
        .with_role("data");
    if let Some(title) = &spec.title {
        asset = asset.with_title(title);
    }
    Some((spec.identifier.clone(), asset))
}

/// A link configured on a time entry.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfiguredLink {
    /// Pre-built tile URL, treated like a synthesized one.
    Tile(Link),
    /// Any other relation, attached as written.
    Plain(Link),
}

/// Convert a configured link. `None` when it has no URL or relation.
pub fn configured_link(spec: &LinkSpec, projection: Option<u32>) -> Option<ConfiguredLink> {
    let url = spec.url.as_deref().filter(|u| !u.is_empty())?;
    let relation = spec.relation.as_deref().filter(|r| !r.is_empty())?;
    let media_type = spec.media_type.as_deref().unwrap_or(media_types::PNG);

    if relation == rel::XYZ {
        let meta = LinkMetadata {
            title: spec.title.as_deref().unwrap_or(""),
            media_type,
            projection,
        };
        return Some(ConfiguredLink::Tile(tile_link(url, &meta)));
    }

    let mut link = Link::new(url, relation).with_type(media_type);
    if let Some(title) = &spec.title {
        link = link.with_title(title);
    }
    Some(ConfiguredLink::Plain(link))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AssetLocator, RenderOptions};

    fn spec() -> TileUrlSpec {
        TileUrlSpec::build(
            "https://titiler.example.com",
            &AssetLocator::Url("https://data.example.com/scene.tif".to_string()),
            &RenderOptions {
                bands: vec![1],
                rescale: None,
                reproject: None,
            },
        )
    }

    fn meta() -> LinkMetadata<'static> {
        LinkMetadata {
            title: "Titiler XYZ Tiles",
            media_type: "image/png",
            projection: Some(4326),
        }
    }

    #[test]
    fn test_tile_link_is_renderable() {
        let tile = synthesize(&spec(), &meta(), true);
        assert_eq!(tile.link.rel, "xyz");
        assert_eq!(tile.link.href, spec().tile_url());
        assert_eq!(tile.link.media_type.as_deref(), Some("image/png"));
        assert!(tile.link.has_data_role());
        assert_eq!(tile.link.extra["proj:epsg"], 4326);
    }

    #[test]
    fn test_projection_is_optional() {
        let meta = LinkMetadata {
            projection: None,
            ..meta()
        };
        let link = tile_link("https://t/{z}/{x}/{y}.png", &meta);
        assert!(!link.extra.contains_key("proj:epsg"));
        assert!(link.has_data_role());
    }

    #[test]
    fn test_asset_set() {
        let tile = synthesize(&spec(), &meta(), true);
        let keys: Vec<&str> = tile.assets.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["data", "info", "preview", "thumbnail"]);

        let (_, data) = &tile.assets[0];
        assert_eq!(data.href, tile.link.href);
        assert!(data.has_role("data"));
        assert_eq!(data.extra["proj:epsg"], 3857);

        let (_, info) = &tile.assets[1];
        assert_eq!(info.media_type.as_deref(), Some("application/json"));
        assert!(info.has_role("metadata"));

        let (_, preview) = &tile.assets[2];
        assert_eq!(preview.media_type.as_deref(), Some("image/png"));
        assert!(preview.has_role("overview"));

        let (_, thumbnail) = &tile.assets[3];
        assert!(thumbnail.href.ends_with("&max_size=512"));
        assert!(thumbnail.has_role("thumbnail"));
    }

    #[test]
    fn test_without_auxiliary_assets() {
        let tile = synthesize(&spec(), &meta(), false);
        assert_eq!(tile.assets.len(), 1);
        assert_eq!(tile.assets[0].0, "data");
    }

    #[test]
    fn test_configured_asset() {
        let spec = AssetSpec {
            identifier: "rgb".to_string(),
            file: Some("s3://b/k.tif".to_string()),
            media_type: None,
            title: None,
        };
        let (key, asset) = configured_asset(&spec).unwrap();
        assert_eq!(key, "rgb");
        assert_eq!(asset.media_type.as_deref(), Some("image/tiff"));
        assert!(asset.has_role("data"));

        let no_file = AssetSpec { file: None, ..spec };
        assert!(configured_asset(&no_file).is_none());
    }

    #[test]
    fn test_configured_links() {
        let xyz = LinkSpec {
            relation: Some("xyz".to_string()),
            url: Some("https://tiles/{z}/{x}/{y}.png".to_string()),
            media_type: None,
            title: Some("First pass".to_string()),
        };
        match configured_link(&xyz, None) {
            Some(ConfiguredLink::Tile(link)) => {
                assert!(link.has_data_role());
                assert_eq!(link.title.as_deref(), Some("First pass"));
                assert_eq!(link.media_type.as_deref(), Some("image/png"));
            }
            other => panic!("expected tile link, got {:?}", other),
        }

        let license = LinkSpec {
            relation: Some("license".to_string()),
            url: Some("https://example.com/license".to_string()),
            media_type: Some("text/html".to_string()),
            title: None,
        };
        assert!(matches!(
            configured_link(&license, None),
            Some(ConfiguredLink::Plain(_))
        ));

        let no_url = LinkSpec {
            relation: Some("xyz".to_string()),
            ..LinkSpec::default()
        };
        assert!(configured_link(&no_url, None).is_none());
    }
}
