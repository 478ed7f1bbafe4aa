use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use edfplus::{EdfError, EdfReader};

use super::model::{Channel, Interval, Marker, Recording};
use super::timecode;

/// EDF+ stores durations in units of 100 ns.
const EDF_TIME_UNITS_PER_SECOND: f64 = 10_000_000.0;

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Load a recording and its annotation file. Fails on the first error.
pub fn load_session(
    recording_path: &Path,
    annotations_path: &Path,
) -> Result<(Recording, Vec<Interval>)> {
    let recording = load_recording(recording_path)?;
    let intervals = load_annotations(annotations_path)?;
    Ok((recording, intervals))
}

/// Decode every signal channel of an EDF+ file into memory.
///
/// Only EDF+ (`EDF+C`) headers are accepted; plain EDF and BDF files fail
/// with a message saying so.
pub fn load_recording(path: &Path) -> Result<Recording> {
    let mut reader = EdfReader::open(path).map_err(|e| {
        let what = match e {
            EdfError::UnsupportedFileType(_) => format!(
                "{} is not an EDF+ recording (plain EDF and BDF are not supported)",
                path.display()
            ),
            _ => format!("opening EDF file {}", path.display()),
        };
        anyhow::Error::new(e).context(what)
    })?;

    let record_seconds = {
        let duration = reader.header().datarecord_duration;
        if duration > 0 {
            duration as f64 / EDF_TIME_UNITS_PER_SECOND
        } else {
            1.0
        }
    };

    let params: Vec<(String, i64, i32)> = reader
        .header()
        .signals
        .iter()
        .map(|s| (s.label.trim().to_string(), s.samples_in_file, s.samples_per_record))
        .collect();

    let mut channels = Vec::with_capacity(params.len());
    for (idx, (label, samples_in_file, samples_per_record)) in params.into_iter().enumerate() {
        let count = samples_in_file.max(0) as usize;
        let samples = reader
            .read_physical_samples(idx, count)
            .with_context(|| format!("reading signal {idx} ({label})"))?;

        channels.push(Channel {
            label,
            samples,
            sample_rate: samples_per_record as f64 / record_seconds,
        });
    }

    let recording = Recording { channels };
    if recording.is_empty() {
        log::warn!("No signals found in {}", path.display());
    } else {
        log::info!("Signals loaded: {:?}", recording.labels());
    }
    Ok(recording)
}

/// Read an annotation text file and pair its markers into intervals.
pub fn load_annotations(path: &Path) -> Result<Vec<Interval>> {
    let file = File::open(path)
        .with_context(|| format!("opening annotation file {}", path.display()))?;
    let markers = read_markers(BufReader::new(file))
        .with_context(|| format!("reading annotation file {}", path.display()))?;

    let intervals = pair_markers(&markers);
    log::info!(
        "Intervals created: {} from {} markers",
        intervals.len(),
        markers.len()
    );
    Ok(intervals)
}

// ---------------------------------------------------------------------------
// Marker parsing
// ---------------------------------------------------------------------------

/// Parse `index time label` lines. Malformed lines are skipped with a warning.
pub fn read_markers<R: BufRead>(reader: R) -> Result<Vec<Marker>> {
    let mut markers = Vec::new();

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("line {}", line_no + 1))?;
        let parts: Vec<&str> = line.split_whitespace().collect();

        let [_index, time, label] = parts.as_slice() else {
            log::warn!("Skipping invalid line {}: {line:?}", line_no + 1);
            continue;
        };

        match timecode::to_seconds(time) {
            Ok(time) => markers.push(Marker::new(time, *label)),
            Err(e) => {
                log::warn!("Skipping line {} with invalid values: {line:?} ({e})", line_no + 1);
            }
        }
    }

    Ok(markers)
}

// ---------------------------------------------------------------------------
// Pairing
// ---------------------------------------------------------------------------

/// Pair markers two at a time: `(0,1)`, `(2,3)`, …
///
/// A pair becomes an interval only when both share a base label and the
/// first ends in `1`, the second in `2`. Anything else is dropped and the
/// walk does not resynchronise, so one stray marker shifts every later pair.
pub fn pair_markers(markers: &[Marker]) -> Vec<Interval> {
    markers
        .chunks_exact(2)
        .filter_map(|pair| {
            let (open, close) = (&pair[0], &pair[1]);
            let (open_base, open_tag) = open.split_suffix()?;
            let (close_base, close_tag) = close.split_suffix()?;

            if open_base != close_base || open_tag != '1' || close_tag != '2' {
                return None;
            }
            if close.time < open.time {
                log::warn!(
                    "Dropping {open_base} pair ending before it starts ({} > {})",
                    timecode::to_text(open.time),
                    timecode::to_text(close.time)
                );
                return None;
            }
            Some(Interval::new(open.time, close.time, open_base))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use edfplus::{EdfWriter, SignalParam};

    use super::*;

    fn markers(text: &str) -> Vec<Marker> {
        read_markers(Cursor::new(text)).unwrap()
    }

    #[test]
    fn reads_well_formed_lines() {
        let m = markers("1  00:00:05  swd1\n1  00:00:09  swd2\n");
        assert_eq!(m, vec![Marker::new(5, "swd1"), Marker::new(9, "swd2")]);
    }

    #[test]
    fn skips_malformed_lines_and_keeps_going() {
        let text = "\
1  00:00:05  swd1
garbage
1  00:00:09
2  xx:00:10  is1
1  00:00:09  swd2
3  00:01:00  ds1 extra
";
        let m = markers(text);
        assert_eq!(m, vec![Marker::new(5, "swd1"), Marker::new(9, "swd2")]);
    }

    #[test]
    fn skips_overflowing_time_between_valid_lines() {
        let text = "\
1  00:00:05  swd1
1  99999999999999999:00:00  swd2
1  00:00:09  swd2
";
        let m = markers(text);
        assert_eq!(m, vec![Marker::new(5, "swd1"), Marker::new(9, "swd2")]);
        assert_eq!(pair_markers(&m), vec![Interval::new(5, 9, "swd")]);
    }

    #[test]
    fn pairs_matching_open_close() {
        let intervals = pair_markers(&[Marker::new(5, "swd1"), Marker::new(9, "swd2")]);
        assert_eq!(intervals, vec![Interval::new(5, 9, "swd")]);
    }

    #[test]
    fn drops_mismatched_pair() {
        assert!(pair_markers(&[Marker::new(5, "swd1"), Marker::new(9, "ds2")]).is_empty());
        assert!(pair_markers(&[Marker::new(5, "swd2"), Marker::new(9, "swd1")]).is_empty());
        assert!(pair_markers(&[Marker::new(5, "swd1"), Marker::new(9, "swd1")]).is_empty());
    }

    #[test]
    fn stray_marker_misaligns_later_pairs() {
        let m = vec![
            Marker::new(1, "is1"),
            Marker::new(2, "swd1"),
            Marker::new(3, "swd2"),
            Marker::new(4, "ds1"),
            Marker::new(5, "ds2"),
        ];
        // (is1, swd1) and (swd2, ds1) are discarded, ds2 is left over.
        assert!(pair_markers(&m).is_empty());
    }

    #[test]
    fn ignores_trailing_odd_marker() {
        let m = vec![
            Marker::new(1, "is1"),
            Marker::new(4, "is2"),
            Marker::new(7, "ds1"),
        ];
        assert_eq!(pair_markers(&m), vec![Interval::new(1, 4, "is")]);
    }

    #[test]
    fn drops_inverted_pair() {
        assert!(pair_markers(&[Marker::new(9, "swd1"), Marker::new(5, "swd2")]).is_empty());
    }

    #[test]
    fn loads_annotation_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ann.txt");
        std::fs::write(
            &path,
            "1  00:00:05  swd1\n1  00:00:09  swd2\n2  00:01:00  ds1\n2  00:01:30  ds2\n",
        )
        .unwrap();

        let intervals = load_annotations(&path).unwrap();
        assert_eq!(
            intervals,
            vec![Interval::new(5, 9, "swd"), Interval::new(60, 90, "ds")]
        );
    }

    #[test]
    fn missing_annotation_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_annotations(&dir.path().join("absent.txt")).unwrap_err();
        assert!(format!("{err:#}").contains("absent.txt"));
    }

    fn signal(label: &str, samples_per_record: i32) -> SignalParam {
        SignalParam {
            label: label.to_string(),
            samples_in_file: 0,
            physical_max: 100.0,
            physical_min: -100.0,
            digital_max: 32767,
            digital_min: -32768,
            samples_per_record,
            physical_dimension: "uV".to_string(),
            prefilter: String::new(),
            transducer: String::new(),
        }
    }

    #[test]
    fn decodes_edf_channels() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rec.edf");

        let mut writer = EdfWriter::create(&path).unwrap();
        writer.set_patient_info("P001", "M", "01-JAN-1990", "Test").unwrap();
        writer.add_signal(signal("EEG1", 256)).unwrap();
        writer.add_signal(signal("EEG2", 128)).unwrap();
        for _ in 0..3 {
            writer
                .write_samples(&[vec![10.0; 256], vec![-20.0; 128]])
                .unwrap();
        }
        writer.finalize().unwrap();

        let recording = load_recording(&path).unwrap();
        assert_eq!(recording.labels(), vec!["EEG1".to_string(), "EEG2".to_string()]);

        let eeg1 = recording.channel("EEG1").unwrap();
        assert_eq!(eeg1.samples.len(), 768);
        assert!((eeg1.sample_rate - 256.0).abs() < 1e-9);
        assert!((eeg1.samples[0] - 10.0).abs() < 0.01);

        let eeg2 = recording.channel("EEG2").unwrap();
        assert_eq!(eeg2.samples.len(), 384);
        assert!((eeg2.sample_rate - 128.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_plain_edf_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plain.edf");

        let mut writer = EdfWriter::create(&path).unwrap();
        writer.set_patient_info("P001", "M", "01-JAN-1990", "Test").unwrap();
        writer.add_signal(signal("EEG1", 16)).unwrap();
        writer.write_samples(&[vec![1.0; 16]]).unwrap();
        writer.finalize().unwrap();

        // Plain EDF leaves the reserved header field blank.
        let mut bytes = std::fs::read(&path).unwrap();
        bytes[192..236].fill(b' ');
        std::fs::write(&path, bytes).unwrap();

        let err = load_recording(&path).unwrap_err();
        assert!(format!("{err:#}").contains("not an EDF+ recording"), "{err:#}");
    }

    #[test]
    fn rejects_non_edf_recording() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bogus.edf");
        std::fs::write(&path, b"not an edf file").unwrap();
        assert!(load_recording(&path).is_err());
    }
}
