pub mod csv;
pub mod pdf;

/// A flat table ready for export: a document title, column headers, and
/// stringified rows. Handlers build one of these from entity models and pick
/// a writer.
#[derive(Debug, Clone)]
pub struct TableReport {
    pub title: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableReport {
    pub fn new(
        title: impl Into<String>,
        headers: &[&str],
        rows: Vec<Vec<String>>,
    ) -> Self {
        Self {
            title: title.into(),
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows,
        }
    }
}
