//! Rendering per-read alignment reports.
//!
//! A report names the read and its template, then shows the wrapped
//! alignment as three-row blocks: read with its position range, match
//! markers, template with its position range.

use crate::error::{Result, SeqrepError};
use crate::overhang::ExtendedAlignment;
use crate::wrap::{wrap_alignment, ReportLine};
use serde::Serialize;
use std::fmt::Write;
use std::path::Path;

const CSS: &str = "<style>
body {
    font-family: monospace;
}
p {
    margin: 0;
    -pdf-keep-with-next: true;
}
</style>";

/// Smallest width of the zero-padded positions.
const MIN_POSITION_WIDTH: usize = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Html,
    Text,
    Json,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Html => "html",
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct ReportDocument<'a> {
    pub read: &'a str,
    pub template: &'a str,
    pub reverse_complemented: bool,
    pub lines: Vec<ReportLine<'a>>,
}

impl<'a> ReportDocument<'a> {
    pub fn new(
        read: &'a str,
        template: &'a str,
        reverse_complemented: bool,
        extended: &'a ExtendedAlignment,
        line_length: usize,
    ) -> Result<Self> {
        let lines = wrap_alignment(extended, line_length)?.collect();
        Ok(ReportDocument {
            read,
            template,
            reverse_complemented,
            lines,
        })
    }

    fn position_width(&self) -> usize {
        let max = self
            .lines
            .iter()
            .flat_map(|l| [l.query_range.end, l.target_range.end])
            .max()
            .unwrap_or(0);
        max.to_string().len().max(MIN_POSITION_WIDTH)
    }

    pub fn render(&self, format: ReportFormat) -> Result<String> {
        match format {
            ReportFormat::Html => Ok(self.render_html()),
            ReportFormat::Text => Ok(self.render_text()),
            ReportFormat::Json => {
                serde_json::to_string_pretty(self).map_err(|source| SeqrepError::Json {
                    read: self.read.to_string(),
                    source,
                })
            }
        }
    }

    fn orientation_note(&self) -> &'static str {
        if self.reverse_complemented {
            " (reverse complement)"
        } else {
            ""
        }
    }

    pub fn render_text(&self) -> String {
        let width = self.position_width();
        let indent = " ".repeat(width + 4);
        let mut out = String::new();
        let _ = writeln!(out, "Sequence: {}{}", self.read, self.orientation_note());
        let _ = writeln!(out, "Template sequence: {}", self.template);
        for line in &self.lines {
            let _ = writeln!(out);
            let _ = writeln!(
                out,
                "  {:0w$}  {}  {:0w$}",
                line.query_range.start,
                line.query_text,
                line.query_range.end,
                w = width
            );
            let _ = writeln!(out, "{}{}", indent, line.match_text);
            let _ = writeln!(
                out,
                "  {:0w$}  {}  {:0w$}",
                line.target_range.start,
                line.target_text,
                line.target_range.end,
                w = width
            );
        }
        out
    }

    pub fn render_html(&self) -> String {
        let width = self.position_width();
        let pad = "&nbsp;&nbsp;";
        let indent = "&nbsp;".repeat(width + 4);
        let mut out = String::new();
        let _ = writeln!(out, "<html><head>{}</head><body>", CSS);
        let _ = writeln!(
            out,
            "<p>Sequence: {}{}</p><br>",
            escape_html(self.read),
            self.orientation_note()
        );
        let _ = writeln!(
            out,
            "<p>Template sequence: {}.</p><br>",
            escape_html(self.template)
        );
        for line in &self.lines {
            let _ = writeln!(
                out,
                "<p><br>{pad}{:0w$}{pad}{}{pad}{:0w$}<br>",
                line.query_range.start,
                line.query_text,
                line.query_range.end,
                pad = pad,
                w = width
            );
            let _ = writeln!(out, "{}{}<br>", indent, line.match_text);
            let _ = writeln!(
                out,
                "{pad}{:0w$}{pad}{}{pad}{:0w$}</p>",
                line.target_range.start,
                line.target_text,
                line.target_range.end,
                pad = pad,
                w = width
            );
        }
        out.push_str("</body></html>\n");
        out
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Report file name for a read: its file stem plus the format's extension.
pub fn report_filename(read_filename: &str, format: ReportFormat) -> String {
    let stem = Path::new(read_filename)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| read_filename.to_string());
    format!("{}.{}", stem, format.extension())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::overhang::match_string;

    fn extended(
        query: &str,
        target: &str,
        query_start: usize,
        target_start: usize,
    ) -> ExtendedAlignment {
        ExtendedAlignment {
            extended_query: query.to_string(),
            extended_target: target.to_string(),
            match_string: match_string(query, target),
            start_overhang: 0,
            end_overhang: 0,
            query_start,
            target_start,
        }
    }

    #[test]
    fn test_text_layout() {
        let ext = extended("acgtacgt", "acgtacgt", 1, 1);
        let doc = ReportDocument::new("a_fwd.seq", "template.txt", false, &ext, 4).unwrap();
        let text = doc.render_text();
        let expected = "Sequence: a_fwd.seq\n\
                        Template sequence: template.txt\n\
                        \n  0001  acgt  0004\n        ||||\n  0001  acgt  0004\n\
                        \n  0005  acgt  0008\n        ||||\n  0005  acgt  0008\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_position_width_grows() {
        let ext = extended("ac", "ac", 9999, 20);
        let doc = ReportDocument::new("r.seq", "t.txt", false, &ext, 60).unwrap();
        assert_eq!(doc.position_width(), 5);
        assert!(doc.render_text().contains("  09999  ac  10000\n"));
    }

    #[test]
    fn test_html_blocks() {
        let ext = extended("ac-t", "acgt", 3, 7);
        let doc = ReportDocument::new("x<rev>.seq", "t.txt", true, &ext, 60).unwrap();
        let html = doc.render_html();
        assert!(html.contains("font-family: monospace"));
        assert!(html.contains("<p>Sequence: x&lt;rev&gt;.seq (reverse complement)</p>"));
        assert!(html.contains("<p>Template sequence: t.txt.</p>"));
        assert!(html.contains("&nbsp;&nbsp;0003&nbsp;&nbsp;ac-t&nbsp;&nbsp;0005<br>"));
        assert!(html.contains("&nbsp;&nbsp;0007&nbsp;&nbsp;acgt&nbsp;&nbsp;0010</p>"));
        assert!(html.contains("||-|<br>"));
        assert_eq!(html.matches("<p><br>").count(), 1);
    }

    #[test]
    fn test_json_document() {
        let ext = extended("acgt", "acgt", 1, 1);
        let doc = ReportDocument::new("r.seq", "t.txt", false, &ext, 2).unwrap();
        let json = doc.render(ReportFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["read"], "r.seq");
        assert_eq!(value["lines"].as_array().unwrap().len(), 2);
        assert_eq!(value["lines"][1]["query_text"], "gt");
        assert_eq!(value["lines"][1]["query_range"]["start"], 3);
        assert_eq!(value["lines"][1]["target_range"]["end"], 4);
    }

    #[test]
    fn test_report_filename() {
        assert_eq!(report_filename("sample_rev.seq", ReportFormat::Html), "sample_rev.html");
        // Only the last extension is dropped.
        assert_eq!(report_filename("clone.1.ab1.txt", ReportFormat::Text), "clone.1.ab1.txt");
        assert_ne!(
            report_filename("clone.1.seq", ReportFormat::Html),
            report_filename("clone.2.seq", ReportFormat::Html)
        );
        assert_eq!(report_filename("noext", ReportFormat::Json), "noext.json");
    }
}
