use std::fs::{self, File, OpenOptions};
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use serde_json::Value;
use tracing::{debug, warn};

use switchcost_core::config::EVENT_LOG_FILE_NAME;
use switchcost_core::{parse_timestamp, EventLog, EventLogError, TransitionEvent};

const TAIL_CHUNK_SIZE: u64 = 4096;

/// Newline-delimited JSON event log, one transition per line.
///
/// Every append opens the file in append mode, writes the whole record with
/// a single `write_all` and closes it again, so concurrent readers only ever
/// see complete lines.
pub struct NdjsonEventLog {
    path: PathBuf,
}

impl NdjsonEventLog {
    /// Creates `directory` if needed and targets `events.ndjson` inside it.
    pub fn open(directory: &Path) -> Result<Self, EventLogError> {
        fs::create_dir_all(directory)?;

        Ok(Self {
            path: directory.join(EVENT_LOG_FILE_NAME),
        })
    }

    /// Targets an existing log file without touching the filesystem.
    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventLog for NdjsonEventLog {
    fn append(&self, event: &TransitionEvent) -> Result<(), EventLogError> {
        let mut record = serde_json::to_string(event)?;
        record.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(record.as_bytes())?;
        file.flush()?;

        Ok(())
    }

    fn last_timestamp(&self) -> Option<NaiveDateTime> {
        let line = match read_last_line(&self.path) {
            Ok(line) => line?,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return None,
            Err(error) => {
                warn!(%error, path = %self.path.display(), "failed to read event log tail");
                return None;
            }
        };

        let timestamp = serde_json::from_str::<Value>(&line)
            .ok()
            .and_then(|record| {
                record
                    .get("timestamp")
                    .and_then(Value::as_str)
                    .and_then(parse_timestamp)
            });

        if timestamp.is_none() {
            debug!(path = %self.path.display(), "last event record is malformed, treating log as empty");
        }

        timestamp
    }

    fn read_all(&self) -> Result<Vec<TransitionEvent>, EventLogError> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(error.into()),
        };

        let mut events = Vec::new();

        for (index, line) in BufReader::new(file).split(b'\n').enumerate() {
            let line = line?;
            if line.iter().all(u8::is_ascii_whitespace) {
                continue;
            }

            match serde_json::from_slice::<TransitionEvent>(&line) {
                Ok(event) => events.push(event),
                Err(error) => {
                    warn!(line = index + 1, %error, "skipping malformed event record");
                }
            }
        }

        Ok(events)
    }
}

/// Returns the last non-blank line of the file, reading backwards from the end.
fn read_last_line(path: &Path) -> io::Result<Option<String>> {
    let mut file = File::open(path)?;
    let mut end = file.metadata()?.len();
    let mut tail: Vec<u8> = Vec::new();

    while end > 0 {
        let start = end.saturating_sub(TAIL_CHUNK_SIZE);
        let mut chunk = vec![0u8; (end - start) as usize];
        file.seek(SeekFrom::Start(start))?;
        file.read_exact(&mut chunk)?;
        chunk.append(&mut tail);
        tail = chunk;
        end = start;

        let content_end = content_length(&tail);
        if let Some(newline) = tail[..content_end].iter().rposition(|&byte| byte == b'\n') {
            return Ok(Some(
                String::from_utf8_lossy(&tail[newline + 1..content_end]).into_owned(),
            ));
        }
    }

    let content_end = content_length(&tail);
    if content_end == 0 {
        return Ok(None);
    }

    Ok(Some(String::from_utf8_lossy(&tail[..content_end]).into_owned()))
}

fn content_length(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .rposition(|byte| !byte.is_ascii_whitespace())
        .map_or(0, |index| index + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use switchcost_core::Elapsed;
    use tempfile::tempdir;

    fn at(second: i64) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(16, 0, 0)
            .unwrap()
            + Duration::seconds(second)
    }

    fn write_raw(log: &NdjsonEventLog, content: &str) {
        fs::write(log.path(), content).unwrap();
    }

    #[test]
    fn open_creates_missing_directories() {
        let root = tempdir().unwrap();
        let directory = root.path().join("nested").join("switchcost");

        let log = NdjsonEventLog::open(&directory).unwrap();

        assert!(directory.is_dir());
        assert_eq!(log.path(), directory.join("events.ndjson"));
    }

    #[test]
    fn open_is_idempotent() {
        let root = tempdir().unwrap();

        NdjsonEventLog::open(root.path()).unwrap();
        let reopened = NdjsonEventLog::open(root.path());

        assert!(reopened.is_ok());
    }

    #[test]
    fn open_fails_when_a_file_blocks_the_directory() {
        let root = tempdir().unwrap();
        let blocker = root.path().join("switchcost");
        fs::write(&blocker, "not a directory").unwrap();

        let result = NdjsonEventLog::open(&blocker.join("data"));

        assert!(matches!(result, Err(EventLogError::Io { .. })));
    }

    #[test]
    fn append_writes_one_line_per_event() {
        let root = tempdir().unwrap();
        let log = NdjsonEventLog::open(root.path()).unwrap();

        log.append(&TransitionEvent::new(at(0), "", "Firefox", None))
            .unwrap();
        log.append(&TransitionEvent::new(at(90), "Firefox", "Terminal", Some(at(0))))
            .unwrap();

        let content = fs::read_to_string(log.path()).unwrap();
        let lines: Vec<&str> = content.lines().collect();

        assert!(content.ends_with('\n'));
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            r#"{"timestamp":"2024-03-01 16:00:00.000000","from":"","to":"Firefox","duration":"0"}"#
        );
        assert_eq!(
            lines[1],
            r#"{"timestamp":"2024-03-01 16:01:30.000000","from":"Firefox","to":"Terminal","duration":"0:01:30"}"#
        );
    }

    #[test]
    fn append_fails_when_the_directory_disappeared() {
        let root = tempdir().unwrap();
        let directory = root.path().join("gone");
        let log = NdjsonEventLog::open(&directory).unwrap();
        fs::remove_dir(&directory).unwrap();

        let result = log.append(&TransitionEvent::new(at(0), "", "A", None));

        assert!(matches!(result, Err(EventLogError::Io { .. })));
    }

    #[test]
    fn read_all_returns_events_in_append_order() {
        let root = tempdir().unwrap();
        let log = NdjsonEventLog::open(root.path()).unwrap();
        let first = TransitionEvent::new(at(0), "", "A", None);
        let second = TransitionEvent::new(at(60), "A", "B", Some(at(0)));

        log.append(&first).unwrap();
        log.append(&second).unwrap();

        assert_eq!(log.read_all().unwrap(), vec![first, second]);
    }

    #[test]
    fn read_all_is_stable_for_an_unmodified_file() {
        let root = tempdir().unwrap();
        let log = NdjsonEventLog::open(root.path()).unwrap();
        log.append(&TransitionEvent::new(at(0), "", "A", None)).unwrap();
        log.append(&TransitionEvent::new(at(5), "A", "B", Some(at(0))))
            .unwrap();

        assert_eq!(log.read_all().unwrap(), log.read_all().unwrap());
    }

    #[test]
    fn read_all_on_missing_file_is_empty() {
        let root = tempdir().unwrap();
        let log = NdjsonEventLog::open(root.path()).unwrap();

        assert!(log.read_all().unwrap().is_empty());
    }

    #[test]
    fn read_all_skips_blank_and_malformed_lines() {
        let root = tempdir().unwrap();
        let log = NdjsonEventLog::open(root.path()).unwrap();
        write_raw(
            &log,
            concat!(
                r#"{"timestamp": "2024-03-01 16:00:00.000000", "from": "", "to": "A", "duration": "0"}"#,
                "\n\n",
                "{\"timestamp\": \"2024-03-01 16:00:0",
                "\n",
                r#"{"timestamp": "2024-03-01 16:01:00.000000", "from": "A", "to": "B", "duration": "0:01:00"}"#,
                "\n",
            ),
        );

        let events = log.read_all().unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[1].to, "B");
        assert_eq!(events[1].duration, Some(Elapsed::from_seconds(60)));
    }

    #[test]
    fn read_all_skips_records_with_out_of_range_durations() {
        let root = tempdir().unwrap();
        let log = NdjsonEventLog::open(root.path()).unwrap();
        write_raw(
            &log,
            concat!(
                r#"{"timestamp": "2024-03-01 16:00:00.000000", "from": "", "to": "A", "duration": "0"}"#,
                "\n",
                r#"{"timestamp": "2024-03-01 16:00:30.000000", "from": "A", "to": "B", "duration": "99999999999999 days, 0:00:00"}"#,
                "\n",
                r#"{"timestamp": "2024-03-01 16:01:00.000000", "from": "B", "to": "A", "duration": "0:00:30"}"#,
                "\n",
            ),
        );

        let events = log.read_all().unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].to, "A");
        assert_eq!(events[1].from, "B");
        assert_eq!(events[1].duration, Some(Elapsed::from_seconds(30)));
    }

    #[test]
    fn last_timestamp_of_missing_file_is_none() {
        let root = tempdir().unwrap();
        let log = NdjsonEventLog::open(root.path()).unwrap();

        assert_eq!(log.last_timestamp(), None);
    }

    #[test]
    fn last_timestamp_of_empty_file_is_none() {
        let root = tempdir().unwrap();
        let log = NdjsonEventLog::open(root.path()).unwrap();
        write_raw(&log, "");

        assert_eq!(log.last_timestamp(), None);
    }

    #[test]
    fn last_timestamp_of_blank_file_is_none() {
        let root = tempdir().unwrap();
        let log = NdjsonEventLog::open(root.path()).unwrap();
        write_raw(&log, "\n\n  \n");

        assert_eq!(log.last_timestamp(), None);
    }

    #[test]
    fn last_timestamp_ignores_earlier_records_when_last_is_malformed() {
        let root = tempdir().unwrap();
        let log = NdjsonEventLog::open(root.path()).unwrap();
        log.append(&TransitionEvent::new(at(0), "", "A", None)).unwrap();
        fs::OpenOptions::new()
            .append(true)
            .open(log.path())
            .unwrap()
            .write_all(b"{\"timestamp\": \"2024-03")
            .unwrap();

        assert_eq!(log.last_timestamp(), None);
    }

    #[test]
    fn last_timestamp_of_single_malformed_line_is_none() {
        let root = tempdir().unwrap();
        let log = NdjsonEventLog::open(root.path()).unwrap();
        write_raw(&log, "garbage\n");

        assert_eq!(log.last_timestamp(), None);
    }

    #[test]
    fn last_timestamp_reads_the_final_record() {
        let root = tempdir().unwrap();
        let log = NdjsonEventLog::open(root.path()).unwrap();
        log.append(&TransitionEvent::new(at(0), "", "A", None)).unwrap();
        log.append(&TransitionEvent::new(at(42), "A", "B", Some(at(0))))
            .unwrap();

        assert_eq!(log.last_timestamp(), Some(at(42)));
    }

    #[test]
    fn last_timestamp_tolerates_trailing_blank_lines_and_missing_newline() {
        let root = tempdir().unwrap();
        let log = NdjsonEventLog::open(root.path()).unwrap();
        write_raw(
            &log,
            r#"{"timestamp": "2024-03-01 16:00:07", "from": "", "to": "A", "duration": "0"}"#,
        );
        assert_eq!(log.last_timestamp(), Some(at(7)));

        write_raw(
            &log,
            "{\"timestamp\": \"2024-03-01 16:00:08.000000\", \"from\": \"\", \"to\": \"A\", \"duration\": \"0\"}\n\n",
        );
        assert_eq!(log.last_timestamp(), Some(at(8)));
    }

    #[test]
    fn last_timestamp_handles_records_longer_than_one_chunk() {
        let root = tempdir().unwrap();
        let log = NdjsonEventLog::open(root.path()).unwrap();
        let long_name = "x".repeat(3 * TAIL_CHUNK_SIZE as usize);
        log.append(&TransitionEvent::new(at(0), "", "A", None)).unwrap();
        log.append(&TransitionEvent::new(at(9), "A", long_name, Some(at(0))))
            .unwrap();

        assert_eq!(log.last_timestamp(), Some(at(9)));
    }
}
