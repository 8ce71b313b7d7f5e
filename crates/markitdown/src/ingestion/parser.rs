//! Multi-format file parser

use std::path::Path;

use crate::error::{Error, Result};
use crate::types::FileType;

use super::html::html_to_text;

/// How long pdf-extract gets before the lopdf fallback takes over
const PDF_EXTRACT_TIMEOUT_SECS: u64 = 60;

/// Glyph names some PDF fonts leak into extracted text
const GLYPH_NAMES: &[(&str, char)] = &[
    ("uni2010", '\u{2010}'),
    ("uni2011", '\u{2011}'),
    ("uni2013", '\u{2013}'),
    ("uni2014", '\u{2014}'),
    ("uni2018", '\u{2018}'),
    ("uni2019", '\u{2019}'),
    ("uni201C", '\u{201C}'),
    ("uni201D", '\u{201D}'),
    ("uni2022", '\u{2022}'),
    ("uni2026", '\u{2026}'),
    ("uni00A0", '\u{00A0}'),
    ("uni2212", '\u{2212}'),
    ("uni20AC", '\u{20AC}'),
    ("uni00A9", '\u{00A9}'),
    ("uni00AE", '\u{00AE}'),
    ("uni2122", '\u{2122}'),
];

/// Typographic characters flattened to plain ASCII
const ASCII_FOLDS: &[(char, &str)] = &[
    ('\u{2010}', "-"),
    ('\u{2011}', "-"),
    ('\u{2013}', "-"),
    ('\u{2014}', "--"),
    ('\u{2212}', "-"),
    ('\u{2018}', "'"),
    ('\u{2019}', "'"),
    ('\u{201C}', "\""),
    ('\u{201D}', "\""),
    ('\u{2022}', "* "),
    ('\u{2026}', "..."),
    ('\u{00A0}', " "),
    ('\u{FB00}', "ff"),
    ('\u{FB01}', "fi"),
    ('\u{FB02}', "fl"),
    ('\u{FB03}', "ffi"),
    ('\u{FB04}', "ffl"),
];

/// Replace leaked glyph names, fold typographic characters, drop NULs,
/// trim lines and remove blank ones
fn cleanup_pdf_text(text: &str) -> String {
    let mut result = text.replace('\0', "");

    for (glyph_name, ch) in GLYPH_NAMES {
        if result.contains(glyph_name) {
            let ch = ch.to_string();
            result = result
                .replace(&format!("({})", glyph_name), &ch)
                .replace(&format!("<{}>", glyph_name), &ch)
                .replace(glyph_name, &ch);
        }
    }

    for (ch, ascii) in ASCII_FOLDS {
        if result.contains(*ch) {
            result = result.replace(*ch, ascii);
        }
    }

    result
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parsed document with extracted text
#[derive(Debug, Clone)]
pub struct ParsedDocument {
    /// File type
    pub file_type: FileType,
    /// Extracted text content
    pub content: String,
    /// Total pages (PDF only)
    pub total_pages: Option<u32>,
}

impl ParsedDocument {
    fn text(file_type: FileType, content: String) -> Self {
        Self {
            file_type,
            content,
            total_pages: None,
        }
    }
}

/// Multi-format file parser
pub struct FileParser;

impl FileParser {
    /// Parse a file based on its extension
    pub fn parse(filename: &str, data: &[u8]) -> Result<ParsedDocument> {
        let file_type = FileType::from_path(Path::new(filename));

        match file_type {
            FileType::Pdf => Self::parse_pdf(filename, data),
            FileType::Docx => Self::parse_docx(filename, data),
            FileType::Csv => Self::parse_csv(filename, data),
            FileType::Txt | FileType::Markdown => {
                Ok(ParsedDocument::text(file_type, decode_text(data)))
            }
            FileType::Html => Ok(Self::parse_html(data)),
            FileType::Json => Ok(Self::parse_json(filename, data)),
            FileType::Unknown(_) => {
                tracing::warn!(
                    "Unrecognized file extension for {}. Trying as text file.",
                    filename
                );
                Ok(ParsedDocument::text(file_type, decode_text(data)))
            }
        }
    }

    /// Parse PDF document
    fn parse_pdf(filename: &str, data: &[u8]) -> Result<ParsedDocument> {
        let content = Self::extract_pdf_with_timeout(filename, data)?;
        let content = cleanup_pdf_text(&content);

        if content.is_empty() {
            return Err(Error::file_parse(
                filename,
                "No text content could be extracted from PDF",
            ));
        }

        let total_pages = lopdf::Document::load_mem(data)
            .ok()
            .map(|doc| doc.get_pages().len() as u32);
        if let Some(pages) = total_pages {
            tracing::debug!("{}: {} pages", filename, pages);
        }

        Ok(ParsedDocument {
            file_type: FileType::Pdf,
            content,
            total_pages,
        })
    }

    /// Run pdf-extract on a worker thread; fonts with broken encodings can
    /// make it spin, and a panic there must not take the process down
    fn extract_pdf_with_timeout(filename: &str, data: &[u8]) -> Result<String> {
        use std::sync::mpsc;
        use std::thread;
        use std::time::Duration;

        let data_vec = data.to_vec();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = pdf_extract::extract_text_from_mem(&data_vec);
            let _ = tx.send(result.map_err(|e| e.to_string()));
        });

        match rx.recv_timeout(Duration::from_secs(PDF_EXTRACT_TIMEOUT_SECS)) {
            Ok(Ok(text)) if !text.trim().is_empty() => Ok(text),
            Ok(Ok(_)) => {
                tracing::warn!("pdf-extract found no text in {}, trying fallback", filename);
                Self::extract_pdf_text_fallback(filename, data)
            }
            Ok(Err(e)) => {
                tracing::warn!("pdf-extract failed on {}: {}, trying fallback", filename, e);
                Self::extract_pdf_text_fallback(filename, data)
            }
            Err(mpsc::RecvTimeoutError::Timeout) => {
                tracing::error!(
                    "PDF extraction of {} timed out after {}s, trying fallback",
                    filename,
                    PDF_EXTRACT_TIMEOUT_SECS
                );
                Self::extract_pdf_text_fallback(filename, data)
            }
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                tracing::error!("PDF extraction thread crashed on {}", filename);
                Self::extract_pdf_text_fallback(filename, data)
            }
        }
    }

    /// Fallback PDF text extraction straight from page content streams
    fn extract_pdf_text_fallback(filename: &str, data: &[u8]) -> Result<String> {
        let doc = lopdf::Document::load_mem(data)
            .map_err(|e| Error::file_parse(filename, format!("Failed to load PDF: {}", e)))?;

        let mut all_text = String::new();
        for (page_num, page_id) in doc.get_pages() {
            match doc.get_page_content(page_id) {
                Ok(content) => {
                    let text = extract_text_from_content(&content);
                    if !text.is_empty() {
                        all_text.push_str(&text);
                        all_text.push('\n');
                    }
                }
                Err(e) => {
                    tracing::debug!("Could not get content for page {}: {}", page_num, e);
                }
            }
        }

        if all_text.trim().is_empty() {
            return Err(Error::file_parse(
                filename,
                "PDF appears to be image-based or has no extractable text",
            ));
        }

        Ok(all_text)
    }

    /// Parse DOCX document: paragraph text one per line, table rows as
    /// comma-separated cells
    fn parse_docx(filename: &str, data: &[u8]) -> Result<ParsedDocument> {
        use docx_rs::DocumentChild;

        let doc = docx_rs::read_docx(data).map_err(|e| Error::file_parse(filename, e.to_string()))?;

        let mut lines = Vec::new();
        for child in &doc.document.children {
            match child {
                DocumentChild::Paragraph(p) => lines.push(paragraph_text(p)),
                DocumentChild::Table(table) => table_lines(table, &mut lines),
                _ => {}
            }
        }

        Ok(ParsedDocument::text(FileType::Docx, lines.join("\n")))
    }

    /// Parse CSV file: every record (header included) becomes one line
    fn parse_csv(filename: &str, data: &[u8]) -> Result<ParsedDocument> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(data);

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record.map_err(|e| Error::file_parse(filename, e.to_string()))?;
            rows.push(record.iter().collect::<Vec<_>>().join(", "));
        }

        Ok(ParsedDocument::text(FileType::Csv, rows.join("\n")))
    }

    /// Parse HTML file with the same cleanup as fetched pages
    fn parse_html(data: &[u8]) -> ParsedDocument {
        ParsedDocument::text(FileType::Html, html_to_text(&decode_text(data)))
    }

    /// Pretty-print JSON; invalid JSON is passed through as text
    fn parse_json(filename: &str, data: &[u8]) -> ParsedDocument {
        let raw = decode_text(data);
        let content = match serde_json::from_str::<serde_json::Value>(&raw) {
            Ok(value) => serde_json::to_string_pretty(&value).unwrap_or(raw),
            Err(e) => {
                tracing::warn!("{} is not valid JSON ({}); using raw text", filename, e);
                raw
            }
        };
        ParsedDocument::text(FileType::Json, content)
    }
}

/// Decode bytes as UTF-8, falling back to Latin-1
pub fn decode_text(data: &[u8]) -> String {
    match std::str::from_utf8(data) {
        Ok(text) => text.to_string(),
        Err(_) => {
            tracing::debug!("Input is not valid UTF-8, decoding as Latin-1");
            data.iter().map(|&b| char::from(b)).collect()
        }
    }
}

fn paragraph_text(paragraph: &docx_rs::Paragraph) -> String {
    use docx_rs::{ParagraphChild, RunChild};

    let mut text = String::new();
    for child in &paragraph.children {
        if let ParagraphChild::Run(run) = child {
            for run_child in &run.children {
                match run_child {
                    RunChild::Text(t) => text.push_str(&t.text),
                    RunChild::Tab(_) => text.push('\t'),
                    RunChild::Break(_) => text.push('\n'),
                    _ => {}
                }
            }
        }
    }
    text
}

fn table_lines(table: &docx_rs::Table, lines: &mut Vec<String>) {
    use docx_rs::{TableCellContent, TableChild, TableRowChild};

    for row in &table.rows {
        #[allow(unreachable_patterns)]
        let cells = match row {
            TableChild::TableRow(row) => &row.cells,
            _ => continue,
        };

        let mut row_text = Vec::new();
        for cell in cells {
            #[allow(unreachable_patterns)]
            let cell = match cell {
                TableRowChild::TableCell(cell) => cell,
                _ => continue,
            };

            let cell_text = cell
                .children
                .iter()
                .filter_map(|content| match content {
                    TableCellContent::Paragraph(p) => Some(paragraph_text(p)),
                    _ => None,
                })
                .collect::<Vec<_>>()
                .join(" ");
            row_text.push(cell_text.trim().to_string());
        }

        if row_text.iter().any(|c| !c.is_empty()) {
            lines.push(row_text.join(", "));
        }
    }
}

/// Pull string operands of text-showing operators out of a content stream
fn extract_text_from_content(content: &[u8]) -> String {
    let content_str = String::from_utf8_lossy(content);
    let mut text = String::new();
    let mut in_text_block = false;
    let mut current_text = String::new();

    for line in content_str.lines() {
        let line = line.trim();

        match line {
            "BT" => {
                in_text_block = true;
                continue;
            }
            "ET" => {
                in_text_block = false;
                if !current_text.is_empty() {
                    text.push_str(&current_text);
                    text.push(' ');
                    current_text.clear();
                }
                continue;
            }
            _ => {}
        }

        if in_text_block && (line.ends_with("Tj") || line.ends_with("TJ")) {
            if let (Some(start), Some(end)) = (line.find('('), line.rfind(')')) {
                if start < end {
                    let decoded = line[start + 1..end]
                        .replace("\\n", "\n")
                        .replace("\\r", "\r")
                        .replace("\\t", "\t")
                        .replace("\\(", "(")
                        .replace("\\)", ")")
                        .replace("\\\\", "\\");
                    current_text.push_str(&decoded);
                }
            }
        }
    }

    text.trim_end().to_string()
}
