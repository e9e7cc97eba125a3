use super::TableReport;

// Page geometry for an A4 portrait report.
const PAGE_WIDTH: f32 = 595.0;
const PAGE_HEIGHT: f32 = 842.0;
const MARGIN: f32 = 50.0;
const TITLE_SIZE: f32 = 14.0;
const BODY_SIZE: f32 = 9.0;
const LINE_HEIGHT: f32 = 13.0;

/// Render a report as a minimal PDF 1.4 document, one text line per table
/// row, paginated. Only Helvetica and plain `Tj` text operators are used so
/// the output needs no external assets.
pub fn write_pdf(report: &TableReport) -> Vec<u8> {
    let mut lines: Vec<String> = Vec::with_capacity(report.rows.len() + 1);
    lines.push(report.headers.join(" | "));
    for row in &report.rows {
        lines.push(row.join(" | "));
    }

    let rows_per_page =
        ((PAGE_HEIGHT - 2.0 * MARGIN - 2.0 * LINE_HEIGHT) / LINE_HEIGHT) as usize;
    let pages: Vec<&[String]> = lines.chunks(rows_per_page.max(1)).collect();
    let page_count = pages.len().max(1);

    // Object layout: 1 catalog, 2 page tree, 3 font, then a page object and
    // a content stream per page.
    let mut doc = PdfWriter::new();
    let kids: Vec<String> = (0..page_count)
        .map(|i| format!("{} 0 R", 4 + 2 * i))
        .collect();
    doc.add_object(1, "<< /Type /Catalog /Pages 2 0 R >>".to_string());
    doc.add_object(
        2,
        format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids.join(" "),
            page_count
        ),
    );
    doc.add_object(
        3,
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica >>".to_string(),
    );

    for (i, page_lines) in pages.iter().enumerate() {
        let page_id = 4 + 2 * i;
        let content_id = page_id + 1;
        doc.add_object(
            page_id,
            format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
                 /Resources << /Font << /F1 3 0 R >> >> /Contents {content_id} 0 R >>"
            ),
        );

        let mut content = String::new();
        content.push_str("BT\n");
        let mut y = PAGE_HEIGHT - MARGIN;
        if i == 0 {
            content.push_str(&format!(
                "/F1 {TITLE_SIZE} Tf\n1 0 0 1 {MARGIN} {y} Tm\n({}) Tj\n",
                escape_text(&report.title)
            ));
            y -= 2.0 * LINE_HEIGHT;
        }
        content.push_str(&format!("/F1 {BODY_SIZE} Tf\n"));
        for line in page_lines.iter() {
            content.push_str(&format!(
                "1 0 0 1 {MARGIN} {y} Tm\n({}) Tj\n",
                escape_text(line)
            ));
            y -= LINE_HEIGHT;
        }
        content.push_str("ET\n");
        doc.add_stream_object(content_id, content.as_bytes());
    }

    doc.finish(3 + 2 * page_count)
}

/// Escape the characters with meaning inside a PDF literal string.
fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            '\\' => out.push_str("\\\\"),
            '\n' | '\r' => out.push(' '),
            c if c.is_ascii() => out.push(c),
            // Non-ASCII is not representable in the standard encoding here.
            _ => out.push('?'),
        }
    }
    out
}

/// Accumulates numbered objects and emits the cross-reference table. Objects
/// must be added in ascending id order starting at 1.
struct PdfWriter {
    buf: Vec<u8>,
    offsets: Vec<usize>,
}

impl PdfWriter {
    fn new() -> Self {
        Self {
            buf: b"%PDF-1.4\n".to_vec(),
            offsets: Vec::new(),
        }
    }

    fn add_object(&mut self, id: usize, body: String) {
        debug_assert_eq!(id, self.offsets.len() + 1);
        self.offsets.push(self.buf.len());
        self.buf
            .extend_from_slice(format!("{id} 0 obj\n{body}\nendobj\n").as_bytes());
    }

    fn add_stream_object(&mut self, id: usize, stream: &[u8]) {
        debug_assert_eq!(id, self.offsets.len() + 1);
        self.offsets.push(self.buf.len());
        self.buf.extend_from_slice(
            format!("{id} 0 obj\n<< /Length {} >>\nstream\n", stream.len()).as_bytes(),
        );
        self.buf.extend_from_slice(stream);
        self.buf.extend_from_slice(b"\nendstream\nendobj\n");
    }

    fn finish(mut self, object_count: usize) -> Vec<u8> {
        let xref_offset = self.buf.len();
        self.buf
            .extend_from_slice(format!("xref\n0 {}\n", object_count + 1).as_bytes());
        self.buf.extend_from_slice(b"0000000000 65535 f \n");
        for offset in &self.offsets {
            self.buf
                .extend_from_slice(format!("{offset:010} 00000 n \n").as_bytes());
        }
        self.buf.extend_from_slice(
            format!(
                "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_offset}\n%%EOF\n",
                object_count + 1
            )
            .as_bytes(),
        );
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report(rows: usize) -> TableReport {
        TableReport::new(
            "Inventory Report",
            &["sku", "name", "quantity"],
            (0..rows)
                .map(|i| vec![format!("SKU-{i}"), format!("Item {i}"), i.to_string()])
                .collect(),
        )
    }

    #[test]
    fn produces_well_formed_document() {
        let bytes = write_pdf(&sample_report(5));
        assert!(bytes.starts_with(b"%PDF-1.4"));
        let text = String::from_utf8_lossy(&bytes);
        assert!(text.contains("/Type /Catalog"));
        assert!(text.contains("/BaseFont /Helvetica"));
        assert!(text.contains("(Inventory Report) Tj"));
        assert!(text.trim_end().ends_with("%%EOF"));
    }

    #[test]
    fn long_reports_span_multiple_pages() {
        let bytes = write_pdf(&sample_report(200));
        let text = String::from_utf8_lossy(&bytes);
        let count_line = text
            .lines()
            .find(|l| l.contains("/Count"))
            .unwrap()
            .to_string();
        assert!(!count_line.contains("/Count 1 "), "expected pagination: {count_line}");
    }

    #[test]
    fn escapes_string_delimiters() {
        assert_eq!(escape_text("a(b)c\\d"), "a\\(b\\)c\\\\d");
    }
}
