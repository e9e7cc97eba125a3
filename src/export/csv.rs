use crate::errors::ServiceError;

use super::TableReport;

/// Render a report as CSV bytes, header row first.
pub fn write_csv(report: &TableReport) -> Result<Vec<u8>, ServiceError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer
        .write_record(&report.headers)
        .map_err(|e| ServiceError::InternalError(format!("csv write failed: {e}")))?;
    for row in &report.rows {
        writer
            .write_record(row)
            .map_err(|e| ServiceError::InternalError(format!("csv write failed: {e}")))?;
    }
    writer
        .into_inner()
        .map_err(|e| ServiceError::InternalError(format!("csv flush failed: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_rows() {
        let report = TableReport::new(
            "Inventory",
            &["sku", "name", "quantity"],
            vec![
                vec!["W-001".into(), "Widget".into(), "12".into()],
                vec!["B-002".into(), "Bracket, steel".into(), "3".into()],
            ],
        );
        let bytes = write_csv(&report).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("sku,name,quantity"));
        assert_eq!(lines.next(), Some("W-001,Widget,12"));
        // Field with a comma gets quoted.
        assert_eq!(lines.next(), Some("B-002,\"Bracket, steel\",3"));
        assert_eq!(lines.next(), None);
    }
}
