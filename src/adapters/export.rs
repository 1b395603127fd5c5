use crate::domain::model::{CheckInEvent, VisitorEntry};
use crate::utils::error::Result;
use chrono::{DateTime, Local};
use serde::{Serialize, Serializer};
use std::io::Write;

pub const EXPORT_FORMATS: [&str; 2] = ["csv", "json"];

/// Visitor registrations and checkpoint verifications of one shift.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EntryLog {
    pub visitors: Vec<VisitorEntry>,
    pub check_ins: Vec<CheckInEvent>,
}

#[derive(Debug, Serialize)]
struct LogRow<'a> {
    kind: &'static str,
    #[serde(serialize_with = "rfc3339")]
    timestamp: DateTime<Local>,
    reference: &'a str,
    name: &'a str,
    id_number: &'a str,
    detail: &'a str,
}

fn rfc3339<S: Serializer>(
    at: &DateTime<Local>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&at.to_rfc3339())
}

impl EntryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_visitor(&mut self, entry: VisitorEntry) {
        self.visitors.push(entry);
    }

    pub fn record_check_in(&mut self, event: CheckInEvent) {
        self.check_ins.push(event);
    }

    pub fn is_empty(&self) -> bool {
        self.visitors.is_empty() && self.check_ins.is_empty()
    }

    fn rows(&self) -> Vec<LogRow<'_>> {
        let mut rows: Vec<LogRow<'_>> = self
            .visitors
            .iter()
            .map(|v| LogRow {
                kind: "visitor",
                timestamp: v.logged_at,
                reference: &v.badge,
                name: &v.full_name,
                id_number: &v.id_number,
                detail: &v.purpose,
            })
            .collect();

        rows.extend(self.check_ins.iter().map(|c| LogRow {
            kind: "checkpoint",
            timestamp: c.verified_at,
            reference: &c.checkpoint_id,
            name: &c.name,
            id_number: "",
            detail: "",
        }));

        rows.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        rows
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for row in self.rows() {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn write_json<W: Write>(&self, mut writer: W) -> Result<()> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    pub fn write_as<W: Write>(&self, format: &str, writer: W) -> Result<()> {
        match format {
            "json" => self.write_json(writer),
            _ => self.write_csv(writer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    fn sample_log() -> EntryLog {
        let mut log = EntryLog::new();
        log.record_check_in(CheckInEvent {
            checkpoint_id: "3".to_string(),
            name: "Loading Dock".to_string(),
            verified_at: Local.with_ymd_and_hms(2026, 10, 19, 10, 30, 0).unwrap(),
        });
        log.record_visitor(VisitorEntry {
            badge: "VIS-AB12".to_string(),
            full_name: "John Doe".to_string(),
            id_number: "8001015009087".to_string(),
            phone: String::new(),
            company: "Acme".to_string(),
            purpose: "Delivery".to_string(),
            host_name: String::new(),
            logged_at: Local.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap(),
        });
        log
    }

    #[test]
    fn test_csv_rows_in_time_order() {
        let mut buffer = Vec::new();
        sample_log().write_csv(&mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "kind,timestamp,reference,name,id_number,detail");
        assert!(lines[1].starts_with("visitor,"));
        assert!(lines[1].contains("VIS-AB12,John Doe,8001015009087,Delivery"));
        assert!(lines[2].starts_with("checkpoint,"));
        assert!(lines[2].ends_with("3,Loading Dock,,"));
    }

    #[test]
    fn test_json_export() {
        let mut buffer = Vec::new();
        sample_log().write_as("json", &mut buffer).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buffer).unwrap();
        assert_eq!(value["visitors"][0]["badge"], "VIS-AB12");
        assert_eq!(value["check_ins"][0]["checkpoint_id"], "3");
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Err(std::io::Error::new(std::io::ErrorKind::Other, "disk full"))
        }
    }

    #[test]
    fn test_export_reports_write_failure() {
        let log = sample_log();
        let buffered = std::io::BufWriter::new(FailingWriter);
        assert!(log.write_as("json", buffered).is_err());

        let buffered = std::io::BufWriter::new(FailingWriter);
        assert!(log.write_as("csv", buffered).is_err());
    }

    #[test]
    fn test_rows_ordered_by_instant_across_offsets() {
        use chrono::FixedOffset;

        // 08:30 at +00:00 is later than 09:00 at +02:00
        let utc = FixedOffset::east_opt(0).unwrap();
        let sast = FixedOffset::east_opt(2 * 3600).unwrap();
        let later = utc.with_ymd_and_hms(2026, 3, 29, 8, 30, 0).unwrap();
        let earlier = sast.with_ymd_and_hms(2026, 3, 29, 9, 0, 0).unwrap();

        let mut log = EntryLog::new();
        log.record_check_in(CheckInEvent {
            checkpoint_id: "late".to_string(),
            name: "Rear Gate".to_string(),
            verified_at: later.with_timezone(&Local),
        });
        log.record_check_in(CheckInEvent {
            checkpoint_id: "early".to_string(),
            name: "Main Entrance".to_string(),
            verified_at: earlier.with_timezone(&Local),
        });

        let references: Vec<&str> = log.rows().iter().map(|r| r.reference).collect();
        assert_eq!(references, vec!["early", "late"]);
    }

    #[test]
    fn test_empty_log() {
        assert!(EntryLog::new().is_empty());
        assert!(!sample_log().is_empty());
    }
}
