use crate::file::TextExtractor;
use crate::models::ExtractOptions;
use anyhow::{Context, Result};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::Read;
use std::path::Path;

/// Word document handler (.docx)
pub struct DocxExtractor;

impl DocxExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Collect paragraph texts from a WordprocessingML body, in document order
    ///
    /// Paragraphs whose text is blank are dropped. Paragraphs nested in tables
    /// or text boxes are kept. A paragraph nested inside another one (text box
    /// content) is emitted right after its enclosing paragraph.
    pub fn paragraphs_from_xml(xml: &str) -> Result<Vec<String>> {
        let mut reader = Reader::from_str(xml);
        // Each open paragraph holds its own text plus the finished paragraphs nested in it
        let mut open: Vec<(String, Vec<String>)> = Vec::new();
        let mut paragraphs = Vec::new();
        let mut in_text = false;

        loop {
            match reader.read_event().context("Malformed document.xml")? {
                Event::Start(e) => match e.name().as_ref() {
                    b"w:p" => open.push((String::new(), Vec::new())),
                    b"w:t" => in_text = true,
                    _ => {}
                },
                Event::End(e) => match e.name().as_ref() {
                    b"w:p" => {
                        if let Some((text, nested)) = open.pop() {
                            let mut finished = Vec::with_capacity(nested.len() + 1);
                            if !text.trim().is_empty() {
                                finished.push(text);
                            }
                            finished.extend(nested);
                            match open.last_mut() {
                                Some((_, parent_nested)) => parent_nested.extend(finished),
                                None => paragraphs.extend(finished),
                            }
                        }
                    }
                    b"w:t" => in_text = false,
                    _ => {}
                },
                Event::Empty(e) => {
                    if let Some((current, _)) = open.last_mut() {
                        match e.name().as_ref() {
                            b"w:tab" => current.push('\t'),
                            b"w:br" | b"w:cr" => current.push('\n'),
                            _ => {}
                        }
                    }
                }
                Event::Text(t) if in_text => {
                    if let Some((current, _)) = open.last_mut() {
                        current.push_str(&t.unescape().context("Invalid text run")?);
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        Ok(paragraphs)
    }
}

impl Default for DocxExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for DocxExtractor {
    fn extract(&self, path: &Path, _options: &ExtractOptions) -> Result<String> {
        let file = std::fs::File::open(path)
            .with_context(|| format!("Failed to open DOCX file: {}", path.display()))?;
        let mut archive = zip::ZipArchive::new(file)
            .with_context(|| format!("Failed to read DOCX package: {}", path.display()))?;

        let mut xml = String::new();
        archive
            .by_name("word/document.xml")
            .context("DOCX package has no word/document.xml")?
            .read_to_string(&mut xml)
            .context("Failed to read word/document.xml")?;

        Ok(Self::paragraphs_from_xml(&xml)?.join("\n"))
    }

    fn name(&self) -> &'static str {
        "docx"
    }
}
