//! Layer settings: the small per-layer config document every tool in the
//! pipeline reads and writes.
//!
//! `layersettings.json` is the canonical, machine-read copy (loaded via
//! `serde_json`); `layersettings.xml` is written alongside it purely for
//! compatibility with tools that expect the original XML layout.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

/// The kind of data a layer holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerType {
	Image,
	Elevation,
}

/// On-disk pixel/point encoding for a layer's tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerFormat {
	Png,
	Jpg,
	Json,
	Raw,
}

/// Inclusive tile-coordinate extent `[tx0, ty0, tx1, ty1]` at `maxlod`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerExtent {
	pub tx0: i64,
	pub ty0: i64,
	pub tx1: i64,
	pub ty1: i64,
}

impl LayerExtent {
	pub fn new(tx0: i64, ty0: i64, tx1: i64, ty1: i64) -> Self {
		LayerExtent { tx0, ty0, tx1, ty1 }
	}

	pub fn contains(&self, tx: i64, ty: i64) -> bool {
		(self.tx0..=self.tx1).contains(&tx) && (self.ty0..=self.ty1).contains(&ty)
	}
}

/// A processed layer's persisted metadata, one per layer directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSettings {
	pub name: String,
	#[serde(rename = "type")]
	pub layer_type: LayerType,
	pub format: LayerFormat,
	pub maxlod: u32,
	pub srs: String,
	pub extent: [i64; 4],
}

impl LayerSettings {
	pub fn new(name: impl Into<String>, layer_type: LayerType, format: LayerFormat, maxlod: u32, extent: LayerExtent) -> Self {
		LayerSettings {
			name: name.into(),
			layer_type,
			format,
			maxlod,
			srs: "EPSG:3857".to_string(),
			extent: [extent.tx0, extent.ty0, extent.tx1, extent.ty1],
		}
	}

	pub fn extent(&self) -> LayerExtent {
		LayerExtent::new(self.extent[0], self.extent[1], self.extent[2], self.extent[3])
	}

	pub fn validate(&self) -> Result<()> {
		if self.srs != "EPSG:3857" {
			bail!("unsupported SRS {:?}, only EPSG:3857 is implemented", self.srs);
		}
		let extent = self.extent();
		if extent.tx0 > extent.tx1 || extent.ty0 > extent.ty1 {
			bail!("layer extent is inverted: {:?}", self.extent);
		}
		Ok(())
	}

	/// Reads `layersettings.json` from `dir`.
	pub fn load(dir: &Path) -> Result<Self> {
		let path = dir.join("layersettings.json");
		let text = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
		let settings: LayerSettings = serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))?;
		settings.validate()?;
		Ok(settings)
	}

	/// Writes both `layersettings.json` (canonical) and `layersettings.xml`
	/// (compatibility mirror) into `dir`.
	pub fn save(&self, dir: &Path) -> Result<()> {
		self.validate()?;
		fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

		let json_path = dir.join("layersettings.json");
		let json = serde_json::to_string_pretty(self)?;
		fs::write(&json_path, json).with_context(|| format!("writing {}", json_path.display()))?;

		let xml_path = dir.join("layersettings.xml");
		fs::write(&xml_path, self.to_xml()).with_context(|| format!("writing {}", xml_path.display()))?;

		Ok(())
	}

	fn to_xml(&self) -> String {
		let layer_type = match self.layer_type {
			LayerType::Image => "image",
			LayerType::Elevation => "elevation",
		};
		let format = match self.format {
			LayerFormat::Png => "png",
			LayerFormat::Jpg => "jpg",
			LayerFormat::Json => "json",
			LayerFormat::Raw => "raw",
		};
		format!(
			"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
			 <layersettings>\n\
			 \t<name>{}</name>\n\
			 \t<type>{layer_type}</type>\n\
			 \t<format>{format}</format>\n\
			 \t<maxlod>{}</maxlod>\n\
			 \t<srs>{}</srs>\n\
			 \t<extent>{},{},{},{}</extent>\n\
			 </layersettings>\n",
			xml_escape(&self.name),
			self.maxlod,
			self.srs,
			self.extent[0],
			self.extent[1],
			self.extent[2],
			self.extent[3],
		)
	}
}

fn xml_escape(value: &str) -> String {
	value.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::tempdir;

	fn sample() -> LayerSettings {
		LayerSettings::new("elevation_base", LayerType::Elevation, LayerFormat::Raw, 12, LayerExtent::new(0, 0, 3, 3))
	}

	#[test]
	fn round_trips_through_json() {
		let dir = tempdir().unwrap();
		let settings = sample();
		settings.save(dir.path()).unwrap();

		let loaded = LayerSettings::load(dir.path()).unwrap();
		assert_eq!(loaded, settings);
	}

	#[test]
	fn writes_xml_mirror_alongside_json() {
		let dir = tempdir().unwrap();
		sample().save(dir.path()).unwrap();
		assert!(dir.path().join("layersettings.json").exists());
		let xml = fs::read_to_string(dir.path().join("layersettings.xml")).unwrap();
		assert!(xml.contains("<type>elevation</type>"));
		assert!(xml.contains("<extent>0,0,3,3</extent>"));
	}

	#[test]
	fn rejects_unsupported_srs() {
		let mut settings = sample();
		settings.srs = "EPSG:4326".to_string();
		assert!(settings.validate().is_err());
	}

	#[test]
	fn rejects_inverted_extent() {
		let mut settings = sample();
		settings.extent = [3, 3, 0, 0];
		assert!(settings.validate().is_err());
	}

	#[test]
	fn extent_contains_checks_inclusive_bounds() {
		let extent = LayerExtent::new(1, 1, 4, 4);
		assert!(extent.contains(1, 1));
		assert!(extent.contains(4, 4));
		assert!(!extent.contains(0, 1));
		assert!(!extent.contains(4, 5));
	}
}
