//! CSV report writer
//!
//! One row per retrieved record, fixed three-column layout. Rows are written
//! in the order records arrive and never rewritten.

use std::fs::File;
use std::io;
use std::path::Path;

use tracing::debug;

use sbxlog_types::LogRecord;

use crate::error::Result;

/// Fixed report header
pub const CSV_HEADER: [&str; 3] = ["User ID", "Timestamp", "Verify Mode"];

/// Write the report to any writer, returning the number of rows written
///
/// The header goes out even when the record stream is empty. A record-level
/// error (e.g. a drain cap hit) stops the run mid-file; rows already written
/// stay written.
pub fn write_csv<W, I>(writer: W, records: I) -> Result<usize>
where
    W: io::Write,
    I: IntoIterator<Item = Result<LogRecord>>,
{
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(CSV_HEADER)?;

    let mut count = 0usize;
    for record in records {
        let record = record?;
        out.write_record(&[
            record.user_id.to_string(),
            record.timestamp.to_string(),
            record.verify_mode.to_string(),
        ])?;
        count += 1;
    }

    out.flush()?;
    debug!("Wrote {} report rows", count);
    Ok(count)
}

/// Write the report to a file, truncating any existing one
pub fn write_csv_path<I>(path: impl AsRef<Path>, records: I) -> Result<usize>
where
    I: IntoIterator<Item = Result<LogRecord>>,
{
    let file = File::create(path)?;
    write_csv(file, records)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use sbxlog_types::LogTimestamp;

    use super::*;
    use crate::error::Error;

    fn record(user_id: i32, verify_mode: i32, ts: LogTimestamp) -> Result<LogRecord> {
        Ok(LogRecord {
            terminal: 1,
            user_id,
            origin_terminal: 1,
            verify_mode,
            timestamp: ts,
        })
    }

    fn render<I: IntoIterator<Item = Result<LogRecord>>>(records: I) -> (String, usize) {
        let mut buf = Vec::new();
        let count = write_csv(&mut buf, records).unwrap();
        (String::from_utf8(buf).unwrap(), count)
    }

    #[test]
    fn test_header_only_for_empty_stream() {
        let (csv, count) = render(Vec::new());
        assert_eq!(csv, "User ID,Timestamp,Verify Mode\n");
        assert_eq!(count, 0);
    }

    #[test]
    fn test_row_formatting() {
        let (csv, count) = render(vec![record(42, 3, LogTimestamp::new(2024, 3, 5, 9, 7, 1))]);
        assert_eq!(
            csv,
            "User ID,Timestamp,Verify Mode\n42,2024-03-05 09:07:01,3\n"
        );
        assert_eq!(count, 1);
    }

    #[test]
    fn test_rows_preserve_input_order() {
        let (csv, count) = render(vec![
            record(7, 1, LogTimestamp::new(2024, 1, 2, 8, 0, 0)),
            record(3, 2, LogTimestamp::new(2023, 12, 31, 23, 59, 58)),
        ]);

        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(count, 2);
        assert_eq!(lines[0], "User ID,Timestamp,Verify Mode");
        assert_eq!(lines[1], "7,2024-01-02 08:00:00,1");
        assert_eq!(lines[2], "3,2023-12-31 23:59:58,2");
    }

    #[test]
    fn test_record_error_stops_mid_file() {
        let records = vec![
            record(1, 1, LogTimestamp::new(2024, 1, 1, 0, 0, 0)),
            Err(Error::RecordLimit { limit: 1 }),
        ];

        let mut buf = Vec::new();
        assert!(write_csv(&mut buf, records).is_err());
    }

    #[test]
    fn test_write_csv_path_truncates() {
        let dir = std::env::temp_dir();
        let path = dir.join("sbxlog_report_test.csv");

        let count = write_csv_path(
            &path,
            vec![record(42, 3, LogTimestamp::new(2024, 3, 5, 9, 7, 1))],
        )
        .unwrap();
        assert_eq!(count, 1);

        // Second run overwrites the first
        let count = write_csv_path(&path, Vec::new()).unwrap();
        assert_eq!(count, 0);

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "User ID,Timestamp,Verify Mode\n");

        let _ = std::fs::remove_file(&path);
    }
}
