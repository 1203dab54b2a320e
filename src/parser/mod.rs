//! Line-oriented parsing of numeric input files.
//!
//! Each non-empty line must hold exactly one floating-point number.
//! Lines that do not parse are collected with their 1-indexed position
//! instead of aborting the file.

use crate::error::{PipelineError, Result};
use crate::models::{LineError, ParsedFile};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use tracing::debug;

/// Parse every line from `reader`, returning accepted values and rejected lines.
///
/// Blank lines are skipped but still counted for line numbering. Lines that
/// are not valid UTF-8 are rejected with a lossy copy of their text. The only
/// error is an I/O failure of the reader itself.
pub fn parse_lines<R: BufRead>(reader: R) -> io::Result<(Vec<f64>, Vec<LineError>)> {
    let mut values = Vec::new();
    let mut errors = Vec::new();

    for (index, chunk) in reader.split(b'\n').enumerate() {
        let mut bytes = chunk?;
        if bytes.last() == Some(&b'\r') {
            bytes.pop();
        }

        let line_number = index + 1;
        let raw = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                errors.push(LineError {
                    line_number,
                    raw: String::from_utf8_lossy(e.as_bytes()).into_owned(),
                });
                continue;
            }
        };

        let trimmed = raw.trim();
        if trimmed.is_empty() {
            continue;
        }

        match parse_value(trimmed) {
            Some(value) => values.push(value),
            None => errors.push(LineError { line_number, raw }),
        }
    }

    Ok((values, errors))
}

/// Parse a single trimmed field. Non-finite values (`NaN`, `inf`) are refused.
pub fn parse_value(field: &str) -> Option<f64> {
    field.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Open and parse one input file.
///
/// Fails with [`PipelineError::FileAccess`] when the file cannot be opened
/// or a read fails midway; the handle is released before returning.
pub fn parse_file(path: &Path) -> Result<ParsedFile> {
    let file = File::open(path).map_err(|source| PipelineError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;

    let (values, errors) =
        parse_lines(BufReader::new(file)).map_err(|source| PipelineError::FileAccess {
            path: path.to_path_buf(),
            source,
        })?;

    debug!(
        "Parsed {}: {} values, {} rejected lines",
        path.display(),
        values.len(),
        errors.len()
    );

    Ok(ParsedFile {
        source: path.display().to_string(),
        values,
        errors,
    })
}

/// Turn the rejected lines of a parsed file into typed errors for reporting.
pub fn line_errors(parsed: &ParsedFile) -> impl Iterator<Item = PipelineError> + '_ {
    parsed.errors.iter().map(move |e| PipelineError::LineParse {
        path: parsed.source.clone().into(),
        line: e.line_number,
        raw: e.raw.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::TempDir;

    #[test]
    fn test_parse_valid_lines_in_order() {
        let input = "1.5\n-2\n3e2\n  4  \n";
        let (values, errors) = parse_lines(Cursor::new(input)).unwrap();
        assert_eq!(values, vec![1.5, -2.0, 300.0, 4.0]);
        assert!(errors.is_empty());
    }

    #[test]
    fn test_blank_lines_skipped_but_counted() {
        let input = "1\n\n   \nabc\n2";
        let (values, errors) = parse_lines(Cursor::new(input)).unwrap();
        assert_eq!(values, vec![1.0, 2.0]);
        assert_eq!(
            errors,
            vec![LineError {
                line_number: 4,
                raw: "abc".to_string()
            }]
        );
    }

    #[test]
    fn test_each_bad_line_reported_once() {
        let input = "x\n1\ny z\n2\n3,4\n";
        let (values, errors) = parse_lines(Cursor::new(input)).unwrap();
        assert_eq!(values, vec![1.0, 2.0]);
        let lines: Vec<usize> = errors.iter().map(|e| e.line_number).collect();
        assert_eq!(lines, vec![1, 3, 5]);
        assert_eq!(errors[1].raw, "y z");
    }

    #[test]
    fn test_crlf_and_raw_text_preserved() {
        let input = "1\r\n bad \r\n2\r\n";
        let (values, errors) = parse_lines(Cursor::new(input)).unwrap();
        assert_eq!(values, vec![1.0, 2.0]);
        assert_eq!(errors[0].line_number, 2);
        assert_eq!(errors[0].raw, " bad ");
    }

    #[test]
    fn test_non_finite_rejected() {
        let (values, errors) = parse_lines(Cursor::new("nan\ninf\n-infinity\n5")).unwrap();
        assert_eq!(values, vec![5.0]);
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn test_invalid_utf8_is_line_error() {
        let input: &[u8] = b"1\n\xff\xfe\n2\n";
        let (values, errors) = parse_lines(Cursor::new(input)).unwrap();
        assert_eq!(values, vec![1.0, 2.0]);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].line_number, 2);
    }

    #[test]
    fn test_parse_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("data.txt");
        std::fs::write(&path, "10\n20\noops\n30\n").unwrap();

        let parsed = parse_file(&path).unwrap();
        assert_eq!(parsed.values, vec![10.0, 20.0, 30.0]);
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.source, path.display().to_string());

        let typed: Vec<_> = line_errors(&parsed).collect();
        assert!(matches!(typed[0], PipelineError::LineParse { line: 3, .. }));
    }

    #[test]
    fn test_parse_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let err = parse_file(&temp_dir.path().join("absent.txt")).unwrap_err();
        assert!(matches!(err, PipelineError::FileAccess { .. }));
    }

    #[test]
    fn test_parse_directory_is_file_access_error() {
        let temp_dir = TempDir::new().unwrap();
        let err = parse_file(temp_dir.path()).unwrap_err();
        assert!(matches!(err, PipelineError::FileAccess { .. }));
    }
}
