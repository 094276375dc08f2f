use crate::models::{FileReport, RepairSummary};
use serde_json::json;

pub fn generate_report(reports: &[FileReport]) -> String {
    let summary = RepairSummary::from_reports(reports);

    let payload = json!({
        "summary": summary,
        "files": reports,
    });

    let mut rendered = serde_json::to_string_pretty(&payload).unwrap_or_default();
    rendered.push('\n');
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FileReport, FileStatus};
    use std::path::Path;

    #[test]
    fn report_carries_summary_and_per_file_entries() {
        let reports = vec![
            FileReport::repaired(
                Path::new("a.tsx"),
                2,
                "0011223344556677".into(),
                "8899aabbccddeeff".into(),
                None,
            ),
            FileReport::skipped(Path::new("b.tsx")),
        ];

        let rendered = generate_report(&reports);
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();

        assert_eq!(parsed["summary"]["repaired"], 1);
        assert_eq!(parsed["summary"]["skipped"], 1);
        assert_eq!(parsed["summary"]["failed"], 0);
        assert_eq!(parsed["files"][0]["path"], "a.tsx");
        assert_eq!(parsed["files"][0]["status"], "repaired");
        assert_eq!(parsed["files"][0]["replacements"], 2);
        assert_eq!(parsed["files"][1]["status"], "skipped");
    }

    #[test]
    fn failed_entries_carry_their_message() {
        let err = crate::error::RepairError::InvalidUtf8 {
            path: Path::new("c.bin").to_path_buf(),
        };
        let reports = vec![FileReport::failed(Path::new("c.bin"), &err)];
        assert!(matches!(reports[0].status, FileStatus::Failed { .. }));

        let rendered = generate_report(&reports);
        let parsed: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert!(
            parsed["files"][0]["status"]["failed"]["message"]
                .as_str()
                .unwrap()
                .contains("not valid UTF-8")
        );
    }
}
