//! `*.pts` point-set files: little-endian records of four `f64`s
//! (`x, y, elevation, weight`) in Mercator units, read until EOF.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use anyhow::{Context, Result, ensure};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

use crate::elevation_point::ElevationPoint;

const RECORD_LEN: usize = 4 * 8;

/// Reads every record in `path`. A missing file is treated as an empty
/// point set rather than an error, since a neighbor tile may simply never
/// have been populated.
pub fn read_pts(path: &Path) -> Result<Vec<ElevationPoint>> {
	let file = match File::open(path) {
		Ok(file) => file,
		Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
		Err(err) => return Err(err).with_context(|| format!("opening {}", path.display())),
	};

	let len = file.metadata().with_context(|| format!("stat {}", path.display()))?.len();
	ensure!(
		len % RECORD_LEN as u64 == 0,
		"{} has {len} bytes, not a multiple of the {RECORD_LEN}-byte record size",
		path.display()
	);

	let mut reader = BufReader::new(file);
	let mut points = Vec::with_capacity((len / RECORD_LEN as u64) as usize);
	loop {
		let x = match reader.read_f64::<LittleEndian>() {
			Ok(value) => value,
			Err(err) if err.kind() == std::io::ErrorKind::UnexpectedEof => break,
			Err(err) => return Err(err).with_context(|| format!("reading {}", path.display())),
		};
		let y = reader.read_f64::<LittleEndian>()?;
		let elevation = reader.read_f64::<LittleEndian>()?;
		let weight = reader.read_f64::<LittleEndian>()?;
		points.push(ElevationPoint::new(x, y, elevation, weight));
	}

	Ok(points)
}

/// Writes `points` to `path` as a sequence of little-endian records,
/// truncating any existing content.
pub fn write_pts(path: &Path, points: &[ElevationPoint]) -> Result<()> {
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
	}
	let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
	let mut writer = BufWriter::new(file);
	for point in points {
		writer.write_f64::<LittleEndian>(point.x)?;
		writer.write_f64::<LittleEndian>(point.y)?;
		writer.write_f64::<LittleEndian>(point.elevation)?;
		writer.write_f64::<LittleEndian>(point.weight)?;
	}
	writer.flush().with_context(|| format!("flushing {}", path.display()))?;
	Ok(())
}
