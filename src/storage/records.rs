//! Text record parsing
//!
//! Every input artifact holds one value per line. A point record is the value and
//! nothing else. Centroid records only use their first token (tokens are separated
//! by tabs or spaces), which lets the same reader consume both the initial
//! centroid file and round output partitions, where the centroid is followed by
//! its member points.

use super::RecordError;
use std::fs;
use std::path::Path;

/// Read a point source: every non-blank record must be exactly one value
pub fn read_points(path: &Path) -> Result<Vec<f64>, RecordError> {
    parse_points(&read_text(path)?, path)
}

/// Read a centroid source or round partition
pub fn read_values(path: &Path) -> Result<Vec<f64>, RecordError> {
    parse_values(&read_text(path)?, path)
}

/// Parse point records from text, reporting errors against `path`
pub fn parse_points(content: &str, path: &Path) -> Result<Vec<f64>, RecordError> {
    parse_records(content, path, parse_whole_value)
}

/// Parse the leading value of each record, reporting errors against `path`
///
/// Blank lines are skipped. Line numbers in errors are 1-based.
pub fn parse_values(content: &str, path: &Path) -> Result<Vec<f64>, RecordError> {
    parse_records(content, path, parse_leading_value)
}

fn read_text(path: &Path) -> Result<String, RecordError> {
    fs::read_to_string(path).map_err(|source| RecordError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_records(
    content: &str,
    path: &Path,
    parse: fn(&str) -> Option<f64>,
) -> Result<Vec<f64>, RecordError> {
    let mut values = Vec::new();

    for (idx, line) in content.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match parse(trimmed) {
            Some(value) => values.push(value),
            None => {
                return Err(RecordError::Malformed {
                    path: path.to_path_buf(),
                    line: idx + 1,
                    record: line.to_string(),
                })
            }
        }
    }

    Ok(values)
}

/// Parse a trimmed record that must hold a single value
fn parse_whole_value(record: &str) -> Option<f64> {
    finite(record.parse().ok()?)
}

/// Parse the first tab/space separated token of a record
fn parse_leading_value(record: &str) -> Option<f64> {
    let token = record.split(|c: char| c == '\t' || c == ' ').next()?;
    finite(token.parse().ok()?)
}

/// Non-finite values (`NaN`, `inf`) have no nearest centroid and would poison
/// every mean they enter.
fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn parse(content: &str) -> Result<Vec<f64>, RecordError> {
        parse_values(content, Path::new("points.txt"))
    }

    #[test]
    fn test_parse_plain_values() {
        let values = parse("1\n2.5\n-3e2\n").unwrap();
        assert_eq!(values, vec![1.0, 2.5, -300.0]);
    }

    #[test]
    fn test_parse_skips_blank_lines_and_whitespace() {
        let values = parse("\n  4.0  \n\n\t5\n").unwrap();
        assert_eq!(values, vec![4.0, 5.0]);
    }

    #[test]
    fn test_parse_takes_first_token() {
        // Output partitions carry member points after the centroid
        let values = parse("2.0\t 1.0 2.0 3.0\n10\t9 10 11\n").unwrap();
        assert_eq!(values, vec![2.0, 10.0]);
    }

    #[test]
    fn test_parse_reports_line_of_bad_record() {
        match parse("1\n\nabc\n4\n") {
            Err(RecordError::Malformed { path, line, record }) => {
                assert_eq!(path, PathBuf::from("points.txt"));
                assert_eq!(line, 3);
                assert_eq!(record, "abc");
            }
            other => panic!("Expected malformed record, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_rejects_non_finite() {
        assert!(matches!(parse("NaN\n"), Err(RecordError::Malformed { line: 1, .. })));
        assert!(matches!(parse("1\ninf\n"), Err(RecordError::Malformed { line: 2, .. })));
    }

    #[test]
    fn test_points_must_be_single_values() {
        let path = Path::new("points.txt");
        assert_eq!(parse_points(" 1\n\n-2.5\t\n", path).unwrap(), vec![1.0, -2.5]);

        match parse_points("1 2\n3\n", path) {
            Err(RecordError::Malformed { line, record, .. }) => {
                assert_eq!(line, 1);
                assert_eq!(record, "1 2");
            }
            other => panic!("Expected malformed record, got {:?}", other),
        }
        assert!(matches!(
            parse_points("1\n3 abc\n", path),
            Err(RecordError::Malformed { line: 2, .. })
        ));
        assert!(matches!(parse_points("4\t5\n", path), Err(RecordError::Malformed { line: 1, .. })));
        assert!(matches!(parse_points("-inf\n", path), Err(RecordError::Malformed { line: 1, .. })));
    }

    #[test]
    fn test_read_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("centroids.txt");
        match read_values(&missing) {
            Err(RecordError::Io { path, .. }) => assert_eq!(path, missing),
            other => panic!("Expected IO error, got {:?}", other),
        }
    }

    #[test]
    fn test_read_values_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("points.txt");
        std::fs::write(&path, "1\n2\n3\n").unwrap();
        assert_eq!(read_values(&path).unwrap(), vec![1.0, 2.0, 3.0]);
        assert_eq!(read_points(&path).unwrap(), vec![1.0, 2.0, 3.0]);
    }
}
