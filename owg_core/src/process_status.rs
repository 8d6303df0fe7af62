//! Bookkeeping of which input datasets have been processed into the tile
//! store, so a restarted run can tell finished work from orphaned work.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// One input dataset's processing record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetRecord {
	pub filename: String,
	pub start_time: Option<String>,
	pub finish_time: Option<String>,
	pub status: String,
	pub finished: bool,
	pub processing: bool,
	pub lod: u32,
	pub extent: [i64; 4],
}

impl DatasetRecord {
	pub fn started(filename: impl Into<String>, lod: u32, extent: [i64; 4]) -> Self {
		DatasetRecord {
			filename: filename.into(),
			start_time: Some(now_rfc3339()),
			finish_time: None,
			status: "processing".to_string(),
			finished: false,
			processing: true,
			lod,
			extent,
		}
	}

	pub fn mark_finished(&mut self, status: impl Into<String>) {
		self.finish_time = Some(now_rfc3339());
		self.status = status.into();
		self.finished = true;
		self.processing = false;
	}

	/// A record left `processing` with no `finished` flag is a crashed or
	/// killed run; a subsequent run should redo it.
	pub fn is_orphaned(&self) -> bool {
		self.processing && !self.finished
	}
}

/// The full set of dataset records for one layer, persisted as
/// `ProcessStatus.json`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessStatus {
	pub datasets: Vec<DatasetRecord>,
}

impl ProcessStatus {
	pub fn load(dir: &Path) -> Result<Self> {
		let path = dir.join("ProcessStatus.json");
		if !path.exists() {
			return Ok(ProcessStatus::default());
		}
		let text = fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
		serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
	}

	pub fn save(&self, dir: &Path) -> Result<()> {
		fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
		let path = dir.join("ProcessStatus.json");
		let json = serde_json::to_string_pretty(self)?;
		fs::write(&path, json).with_context(|| format!("writing {}", path.display()))
	}

	pub fn record_for(&self, filename: &str) -> Option<&DatasetRecord> {
		self.datasets.iter().find(|d| d.filename == filename)
	}

	pub fn record_for_mut(&mut self, filename: &str) -> Option<&mut DatasetRecord> {
		self.datasets.iter_mut().find(|d| d.filename == filename)
	}

	pub fn upsert(&mut self, record: DatasetRecord) {
		if let Some(existing) = self.record_for_mut(&record.filename) {
			*existing = record;
		} else {
			self.datasets.push(record);
		}
	}

	/// Datasets left `processing` with no `finished` flag from a previous,
	/// interrupted run.
	pub fn orphaned(&self) -> impl Iterator<Item = &DatasetRecord> {
		self.datasets.iter().filter(|d| d.is_orphaned())
	}

	/// True if `filename` has already completed successfully.
	pub fn is_finished(&self, filename: &str) -> bool {
		self.record_for(filename).is_some_and(|d| d.finished)
	}
}

fn now_rfc3339() -> String {
	OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default()
}

#[cfg(test)]
mod tests {
	use super::*;
	use tempfile::tempdir;

	#[test]
	fn new_status_has_no_orphans() {
		let status = ProcessStatus::default();
		assert_eq!(status.orphaned().count(), 0);
	}

	#[test]
	fn started_record_is_orphan_until_finished() {
		let mut record = DatasetRecord::started("dem_01.tif", 14, [0, 0, 7, 7]);
		assert!(record.is_orphaned());
		record.mark_finished("ok");
		assert!(!record.is_orphaned());
		assert!(record.finished);
	}

	#[test]
	fn upsert_replaces_existing_record() {
		let mut status = ProcessStatus::default();
		status.upsert(DatasetRecord::started("a.tif", 10, [0, 0, 1, 1]));
		let mut second = DatasetRecord::started("a.tif", 10, [0, 0, 1, 1]);
		second.mark_finished("ok");
		status.upsert(second);

		assert_eq!(status.datasets.len(), 1);
		assert!(status.is_finished("a.tif"));
	}

	#[test]
	fn round_trips_through_json() {
		let dir = tempdir().unwrap();
		let mut status = ProcessStatus::default();
		status.upsert(DatasetRecord::started("a.tif", 10, [0, 0, 1, 1]));
		status.save(dir.path()).unwrap();

		let loaded = ProcessStatus::load(dir.path()).unwrap();
		assert_eq!(loaded.datasets.len(), 1);
		assert!(loaded.orphaned().count() == 1);
	}

	#[test]
	fn load_missing_file_is_empty() {
		let dir = tempdir().unwrap();
		let status = ProcessStatus::load(dir.path()).unwrap();
		assert!(status.datasets.is_empty());
	}
}
