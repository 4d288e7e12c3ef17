use std::path::Path;

use colored::Colorize;
use models::ReservationReport;
use serde::Serialize;

use crate::prelude::{AvailabilityError, TimeWindow};

const INDENT: &[u8] = b"    ";

/// Serializes the report as a pretty JSON array.
///
/// Four space indent, `": "` between keys and values, entries and keys in
/// insertion order. An empty report is `[]`.
pub fn assemble(report: &ReservationReport) -> Result<String, AvailabilityError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    report.serialize(&mut serializer)?;

    Ok(String::from_utf8(buf)?)
}

/// Overwrites `path` with `document`.
pub fn write_report(path: &Path, document: &str) -> Result<(), AvailabilityError> {
    std::fs::write(path, document).map_err(|e| AvailabilityError::Output {
        path: path.display().to_string(),
        source: e,
    })?;

    tracing::info!("Wrote {} bytes to {}", document.len(), path.display());
    Ok(())
}

pub fn print_summary(report: &ReservationReport, window: &TimeWindow, output: &Path) {
    println!("{}", "Resource Availability:".white().bold().underline());
    println!(
        " {} {} - {} (GMT)",
        "Window:".cyan().bold(),
        window.start_wire(),
        window.end_wire()
    );

    if report.is_empty() {
        println!(" {}", "No matching resources".dimmed());
    }

    for entry in &report.entries {
        println!(
            "  - {} {}",
            entry.category.green(),
            format!("({} reservations)", entry.segments.len()).dimmed()
        );
    }

    println!(
        " {} {} ({} resources, {} reservations)",
        "Written:".green().bold(),
        output.display(),
        report.len(),
        report.segment_count()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::{Reservation, ReservationReportEntry};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_report_is_bare_brackets() {
        assert_eq!(assemble(&ReservationReport::new()).unwrap(), "[]");
    }

    #[test]
    fn test_layout() {
        let report = ReservationReport::from(vec![
            ReservationReportEntry::new(
                "Router-1",
                vec![Reservation {
                    start: "2024-01-01 10:00".into(),
                    end: "2024-01-01 12:00".into(),
                    id: "r1".into(),
                    name: "demo".into(),
                    owner: "alice".into(),
                }],
            ),
            ReservationReportEntry::new("Router-2", vec![]),
        ]);

        let expected = r#"[
    {
        "category": "Router-1",
        "segments": [
            {
                "start": "2024-01-01 10:00",
                "end": "2024-01-01 12:00",
                "id": "r1",
                "name": "demo",
                "owner": "alice"
            }
        ]
    },
    {
        "category": "Router-2",
        "segments": []
    }
]"#;
        assert_eq!(assemble(&report).unwrap(), expected);
    }

    #[test]
    fn test_write_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("availability.json");
        std::fs::write(&path, "old contents that are longer").unwrap();

        write_report(&path, "[]").unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn test_write_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("availability.json");

        let err = write_report(&path, "[]").unwrap_err();
        assert!(matches!(err, AvailabilityError::Output { .. }));
    }
}
