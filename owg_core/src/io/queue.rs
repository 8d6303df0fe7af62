//! Append-only binary work queue.
//!
//! Jobs are fixed-size records appended to a single file under an exclusive
//! lock. A sibling `<queue>.seek` file tracks how far a consumer has
//! *unread from the tail*: [`fetch`] walks backward from the seek pointer
//! toward byte 0, decrementing it as records are consumed, so concurrent
//! producers can keep appending to the head of the file without disturbing
//! an in-progress drain.

use std::fs::{self, File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, ensure};

use crate::io::lock_exclusive;

/// A fixed-size binary work queue backed by `path`, with its cursor kept in
/// `path` + `.seek`.
pub struct JobQueue {
	path: PathBuf,
	seek_path: PathBuf,
	record_len: usize,
}

impl JobQueue {
	pub fn new(path: impl Into<PathBuf>, record_len: usize) -> Self {
		let path = path.into();
		let seek_path = append_extension(&path, "seek");
		JobQueue { path, seek_path, record_len }
	}

	/// Appends `jobs` to the queue file. Each job must be exactly
	/// `record_len` bytes; shorter jobs are zero-padded, matching the
	/// original fixed-record layout.
	pub fn commit(&self, jobs: &[Vec<u8>]) -> Result<()> {
		if let Some(parent) = self.path.parent() {
			fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
		}
		let mut file = OpenOptions::new()
			.create(true)
			.append(true)
			.open(&self.path)
			.with_context(|| format!("opening {}", self.path.display()))?;
		lock_exclusive(&file)?;

		for job in jobs {
			ensure!(
				job.len() <= self.record_len,
				"job of {} bytes exceeds the queue's {}-byte record size",
				job.len(),
				self.record_len
			);
			let mut record = vec![0u8; self.record_len];
			record[..job.len()].copy_from_slice(job);
			file.write_all(&record)?;
		}
		file.flush().with_context(|| format!("flushing {}", self.path.display()))
	}

	/// Consumes up to `amount` records from the tail, returning them in the
	/// order they were originally appended (oldest-of-the-batch first).
	/// Returns an empty vector once the queue is exhausted.
	pub fn fetch(&self, amount: usize) -> Result<Vec<Vec<u8>>> {
		let file_len = match fs::metadata(&self.path) {
			Ok(meta) => meta.len() as i64,
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
			Err(err) => return Err(err).with_context(|| format!("stat {}", self.path.display())),
		};

		let mut seek_pointer = self.read_seek_pointer(file_len)?;
		if seek_pointer <= 0 {
			return Ok(Vec::new());
		}

		let record_len = self.record_len as i64;
		let mut file = File::open(&self.path).with_context(|| format!("opening {}", self.path.display()))?;
		lock_exclusive(&file)?;

		let mut jobs = Vec::with_capacity(amount);
		for _ in 0..amount {
			if seek_pointer <= 0 {
				break;
			}
			seek_pointer -= record_len;
			let offset = seek_pointer.max(0);
			file.seek(SeekFrom::Start(offset as u64))?;
			let mut record = vec![0u8; self.record_len];
			file.read_exact(&mut record)?;
			jobs.push(record);
		}
		jobs.reverse();

		self.write_seek_pointer(seek_pointer.max(0))?;
		Ok(jobs)
	}

	/// Resets the cursor to the end of the queue file, so a subsequent
	/// [`fetch`](Self::fetch) re-drains everything currently committed.
	pub fn reset_cursor(&self) -> Result<()> {
		let file_len = fs::metadata(&self.path).map(|m| m.len() as i64).unwrap_or(0);
		self.write_seek_pointer(file_len)
	}

	fn read_seek_pointer(&self, default_to_file_end: i64) -> Result<i64> {
		match fs::read_to_string(&self.seek_path) {
			Ok(text) => text.trim().parse::<i64>().with_context(|| format!("parsing {}", self.seek_path.display())),
			Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(default_to_file_end),
			Err(err) => Err(err).with_context(|| format!("reading {}", self.seek_path.display())),
		}
	}

	fn write_seek_pointer(&self, value: i64) -> Result<()> {
		fs::write(&self.seek_path, value.to_string()).with_context(|| format!("writing {}", self.seek_path.display()))
	}
}

fn append_extension(path: &Path, ext: &str) -> PathBuf {
	let mut name = path.file_name().map(|n| n.to_owned()).unwrap_or_default();
	name.push(".");
	name.push(ext);
	path.with_file_name(name)
}
