//! Garment template sources.
//!
//! The garment silhouette is fetched asynchronously by id. A bundled shirt
//! template is always available; file-backed and in-memory sources cover
//! custom silhouettes and tests.

use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use merchmagic_core::constants::GARMENT_TEMPLATE_ID;
use merchmagic_core::{AssetError, Rgba};

use crate::assets::VectorGraphic;

/// Bundled t-shirt silhouette (560 x 640).
pub const SHIRT_BASE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg"
     width="560" height="640" viewBox="0 0 560 640">
  <path id="body" fill="#ffffff" stroke="#0f172a" stroke-opacity="0.18" stroke-width="2"
        d="M140 40 L215 18 Q280 64 345 18 L420 40 L545 140 L490 250 L450 222
           L450 624 L110 624 L110 222 L70 250 L15 140 Z"/>
  <path id="collar" fill="#ffffff" stroke="#0f172a" stroke-opacity="0.12" stroke-width="1.5"
        d="M215 18 Q280 64 345 18 Q280 86 215 18 Z"/>
  <path id="seam-left" fill="none" stroke="#0f172a" stroke-opacity="0.08"
        stroke-width="1.5" d="M110 222 L140 40"/>
  <path id="seam-right" fill="none" stroke="#0f172a" stroke-opacity="0.08"
        stroke-width="1.5" d="M450 222 L420 40"/>
</svg>"##;

/// Asynchronous provider of vector templates.
#[async_trait]
pub trait TemplateSource: Send + Sync {
    /// Fetches the markup for `id`.
    async fn fetch(&self, id: &str) -> Result<String, AssetError>;
}

/// Serves the bundled shirt template.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedTemplateSource;

#[async_trait]
impl TemplateSource for EmbeddedTemplateSource {
    async fn fetch(&self, id: &str) -> Result<String, AssetError> {
        if id == GARMENT_TEMPLATE_ID {
            Ok(SHIRT_BASE_SVG.to_string())
        } else {
            Err(AssetError::load(id, "no bundled template with this id"))
        }
    }
}

/// Reads templates from a directory; ids are paths relative to the root.
#[derive(Debug, Clone)]
pub struct FileTemplateSource {
    root: PathBuf,
}

impl FileTemplateSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl TemplateSource for FileTemplateSource {
    async fn fetch(&self, id: &str) -> Result<String, AssetError> {
        let path = self.root.join(id);
        tracing::debug!("Fetching template {}", path.display());
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| AssetError::load(id, e.to_string()))
    }
}

/// Templates held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryTemplateSource {
    templates: HashMap<String, String>,
}

impl MemoryTemplateSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_template(mut self, id: impl Into<String>, markup: impl Into<String>) -> Self {
        self.insert(id, markup);
        self
    }

    pub fn insert(&mut self, id: impl Into<String>, markup: impl Into<String>) {
        self.templates.insert(id.into(), markup.into());
    }
}

#[async_trait]
impl TemplateSource for MemoryTemplateSource {
    async fn fetch(&self, id: &str) -> Result<String, AssetError> {
        self.templates
            .get(id)
            .cloned()
            .ok_or_else(|| AssetError::load(id, "template not found"))
    }
}

/// Fetches, parses and recolours a garment template.
pub async fn fetch_garment(
    source: &dyn TemplateSource,
    template_id: &str,
    color: Rgba,
) -> Result<VectorGraphic, AssetError> {
    let markup = source.fetch(template_id).await?;
    let mut graphic = VectorGraphic::parse(template_id, &markup)?;
    let recolored = graphic.recolor(color);
    tracing::debug!(
        "Garment template '{}' recoloured to {} ({} shapes)",
        template_id,
        color,
        recolored
    );
    Ok(graphic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_embedded_template_parses() {
        let graphic = fetch_garment(&EmbeddedTemplateSource, GARMENT_TEMPLATE_ID, Rgba::WHITE)
            .await
            .unwrap();
        assert_eq!(graphic.size().width, 560.0);
        assert_eq!(graphic.shapes().len(), 4);
    }

    #[tokio::test]
    async fn test_recolor_applies_to_fillable_shapes() {
        let red = Rgba::opaque(0xdc, 0x26, 0x26);
        let graphic = fetch_garment(&EmbeddedTemplateSource, GARMENT_TEMPLATE_ID, red)
            .await
            .unwrap();
        let fills: Vec<_> = graphic.shapes().iter().filter_map(|s| s.fill).collect();
        assert_eq!(fills, vec![red, red]);
    }

    #[tokio::test]
    async fn test_unknown_template_is_load_error() {
        let err = EmbeddedTemplateSource.fetch("mockups/hoodie.svg").await.unwrap_err();
        assert!(matches!(err, AssetError::Load { .. }));
    }

    #[tokio::test]
    async fn test_empty_template_is_parse_error() {
        let source = MemoryTemplateSource::new().with_template("blank.svg", "");
        let err = fetch_garment(&source, "blank.svg", Rgba::WHITE).await.unwrap_err();
        assert!(matches!(err, AssetError::Parse { .. }));
    }

    #[tokio::test]
    async fn test_file_source_reads_relative_ids() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("mockups")).unwrap();
        std::fs::write(dir.path().join("mockups/shirt_base.svg"), SHIRT_BASE_SVG).unwrap();

        let source = FileTemplateSource::new(dir.path());
        let markup = source.fetch(GARMENT_TEMPLATE_ID).await.unwrap();
        assert_eq!(markup, SHIRT_BASE_SVG);

        let err = source.fetch("missing.svg").await.unwrap_err();
        assert!(matches!(err, AssetError::Load { .. }));
    }
}
