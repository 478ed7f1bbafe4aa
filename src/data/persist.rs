use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use super::model::Interval;
use super::timecode::to_text;

/// Write intervals to both output files and return a status line.
pub fn save(intervals: &[Interval], json_path: &Path, txt_path: &Path) -> Result<String> {
    save_json(intervals, json_path)?;
    save_txt(intervals, txt_path)?;
    log::info!(
        "Saved {} intervals to {} and {}",
        intervals.len(),
        json_path.display(),
        txt_path.display()
    );
    Ok(format!(
        "Markup saved to {} and {}",
        json_path.display(),
        txt_path.display()
    ))
}

/// `[{"start": .., "end": .., "description": ..}, ...]`, 4-space indented.
pub fn save_json(intervals: &[Interval], path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);

    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut out, formatter);
    intervals
        .serialize(&mut ser)
        .with_context(|| format!("writing JSON to {}", path.display()))?;

    out.flush()
        .with_context(|| format!("flushing {}", path.display()))
}

/// Two marker lines per interval, readable by the annotation loader.
pub fn save_txt(intervals: &[Interval], path: &Path) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut out = BufWriter::new(file);
    write_markers(intervals, &mut out).with_context(|| format!("writing {}", path.display()))?;
    out.flush()
        .with_context(|| format!("flushing {}", path.display()))
}

fn write_markers<W: Write>(intervals: &[Interval], out: &mut W) -> std::io::Result<()> {
    for (i, interval) in intervals.iter().enumerate() {
        let pos = i + 1;
        writeln!(out, "{pos}  {}  {}1", to_text(interval.start), interval.description)?;
        writeln!(out, "{pos}  {}    {}2", to_text(interval.end), interval.description)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_annotations;

    fn sample() -> Vec<Interval> {
        vec![
            Interval::new(5, 9, "swd"),
            Interval::new(3600, 3725, "is"),
            Interval::new(2, 2, "ds"),
            Interval::new(100, 200, "custom"),
        ]
    }

    #[test]
    fn writes_marker_lines() {
        let mut buf = Vec::new();
        write_markers(&[Interval::new(5, 9, "swd")], &mut buf).unwrap();
        assert_eq!(
            String::from_utf8(buf).unwrap(),
            "1  00:00:05  swd1\n1  00:00:09    swd2\n"
        );
    }

    #[test]
    fn txt_roundtrips_through_loader() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("markup.json");
        let txt = dir.path().join("markup.txt");

        let status = save(&sample(), &json, &txt).unwrap();
        assert!(status.starts_with("Markup saved to "));

        assert_eq!(load_annotations(&txt).unwrap(), sample());
    }

    #[test]
    fn json_holds_flat_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("markup.json");
        save_json(&sample(), &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\n    {\n        \"start\": 5,"));

        let back: Vec<Interval> = serde_json::from_str(&text).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn empty_list_writes_empty_files() {
        let dir = tempfile::tempdir().unwrap();
        let json = dir.path().join("a.json");
        let txt = dir.path().join("a.txt");
        save(&[], &json, &txt).unwrap();

        assert_eq!(std::fs::read_to_string(&json).unwrap(), "[]");
        assert_eq!(std::fs::read_to_string(&txt).unwrap(), "");
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let bad = dir.path().join("missing").join("markup.json");
        assert!(save_json(&sample(), &bad).is_err());
    }
}
