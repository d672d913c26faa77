use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use dispersion::{AnnotatedPick, ReferenceCurve, Signal, ZeroTable};

use crate::config::OutputFormat;

/// Parses whitespace-separated numeric rows, keeping the first `columns` fields.
///
/// Blank lines and `#` comments are skipped, as is a single non-numeric header line
/// before the first data row.
fn parse_rows(content: &str, columns: usize, source: &str) -> Result<Vec<Vec<f64>>> {
	let mut rows = Vec::new();
	let mut header_allowed = true;

	for (number, line) in content.lines().enumerate() {
		let line = line.trim();
		if line.is_empty() || line.starts_with('#') {
			continue;
		}

		let fields: Result<Vec<f64>, _> = line.split_whitespace().take(columns).map(str::parse::<f64>).collect();
		match fields {
			Ok(fields) if fields.len() == columns => {
				rows.push(fields);
				header_allowed = false;
			},
			Err(_) if header_allowed => header_allowed = false,
			_ => anyhow::bail!("{source}:{}: expected {columns} numeric columns, got {line:?}", number + 1),
		}
	}

	Ok(rows)
}

fn read(path: &Path) -> Result<String> {
	fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

pub fn parse_spectrum(content: &str, source: &str) -> Result<Signal> {
	let rows = parse_rows(content, 2, source)?;
	let (frequency, amplitude) = rows.into_iter().map(|row| (row[0], row[1])).unzip();

	Signal::new(frequency, amplitude).with_context(|| format!("Invalid spectrum in {source}"))
}

/// Reference velocities are scaled on load; non-positive velocities are dropped.
pub fn parse_reference(content: &str, velocity_scale: f64, source: &str) -> Result<ReferenceCurve> {
	let rows = parse_rows(content, 2, source)?;
	let (frequency, velocity) =
		rows.into_iter().map(|row| (row[0], row[1] * velocity_scale)).filter(|&(_, v)| v > 0.0).unzip();

	ReferenceCurve::new(frequency, velocity).with_context(|| format!("Invalid reference curve in {source}"))
}

pub fn parse_zero_table(content: &str, source: &str) -> Result<ZeroTable> {
	let zeros = parse_rows(content, 1, source)?.into_iter().map(|row| row[0]).collect();

	ZeroTable::new(zeros).with_context(|| format!("Invalid zero table in {source}"))
}

pub fn read_spectrum(path: &Path) -> Result<Signal> {
	parse_spectrum(&read(path)?, &path.display().to_string())
}

pub fn read_reference(path: &Path, velocity_scale: f64) -> Result<ReferenceCurve> {
	parse_reference(&read(path)?, velocity_scale, &path.display().to_string())
}

pub fn read_zero_table(path: &Path) -> Result<ZeroTable> {
	parse_zero_table(&read(path)?, &path.display().to_string())
}

pub fn render_picks(picks: &[AnnotatedPick], format: OutputFormat) -> Result<String> {
	match format {
		OutputFormat::Text => {
			let mut out = String::new();
			for pick in picks {
				writeln!(out, "{pick}")?;
			}
			Ok(out)
		},
		OutputFormat::Json => serde_json::to_string_pretty(picks).context("Failed to serialize picks"),
	}
}

pub fn write_picks(path: &Path, picks: &[AnnotatedPick], format: OutputFormat) -> Result<()> {
	let content = render_picks(picks, format)?;
	fs::write(path, content).with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
	use dispersion::{Feature, Pick};

	use super::*;

	#[test]
	fn test_skips_comments_and_header() {
		let content = "# station pair AAA-BBB\nfrequency amplitude\n0.0 1.0\n\n0.1 -0.5\n0.2 0.25 extra\n";
		let signal = parse_spectrum(content, "test").unwrap();

		assert_eq!(signal.len(), 3);
		assert!((signal.amplitude_at(2) - 0.25).abs() < 1e-12);
	}

	#[test]
	fn test_rejects_garbage_after_data() {
		let content = "0.0 1.0\nnot numbers\n0.2 0.5\n";
		assert!(parse_spectrum(content, "test").is_err());
	}

	#[test]
	fn test_reference_scale_and_filter() {
		let content = "0.01 3000\n0.02 -1\n0.03 3500\n";
		let reference = parse_reference(content, 0.001, "test").unwrap();

		assert_eq!(reference.domain(), (0.01, 0.03));
		assert!((reference.velocity(0.02).unwrap() - 3.25).abs() < 1e-12);
		assert!((reference.velocity(0.03).unwrap() - 3.5).abs() < 1e-12);
	}

	#[test]
	fn test_zero_table_from_single_column() {
		let table = parse_zero_table("2.404825557695773\n5.520078110286311\n", "test").unwrap();
		assert_eq!(table.len(), 2);
	}

	#[test]
	fn test_render_text_lines() {
		let pick = Pick { feature: Feature::Peak, frequency: 0.1, velocity: 3.0, order: 5 };
		let picks = [AnnotatedPick { pick, error: 0.5 }];

		let text = render_picks(&picks, OutputFormat::Text).unwrap();
		assert_eq!(text, "    0.100000000     3.000000000 1    5     0.500000000\n");

		let json = render_picks(&picks, OutputFormat::Json).unwrap();
		assert!(json.contains("\"feature\": \"peak\""));
		assert!(json.contains("\"order\": 5"));
	}
}
