use crate::file::TextExtractor;
use crate::models::ExtractOptions;
use anyhow::{Context, Result};
use lopdf::Document;
use std::path::Path;
use tracing::debug;

/// PDF handler
///
/// Pages are read with lopdf in document order. A page without a text layer
/// (scanned image, broken content stream) contributes nothing and extraction
/// moves on to the next page.
pub struct PdfExtractor;

impl PdfExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract_pages(doc: &Document, options: &ExtractOptions) -> Vec<String> {
        let mut texts = Vec::new();

        // get_pages() is keyed by 1-based page number, in document order
        for (index, page_number) in doc.get_pages().keys().enumerate() {
            if !options.includes_page(index) {
                continue;
            }
            match doc.extract_text(&[*page_number]) {
                Ok(page_text) if !page_text.trim().is_empty() => {
                    texts.push(page_text.trim_end().to_string());
                }
                Ok(_) => debug!(page = index, "PDF page has no text layer"),
                Err(e) => debug!(page = index, error = %e, "Skipping unreadable PDF page"),
            }
        }

        texts
    }
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl TextExtractor for PdfExtractor {
    fn extract(&self, path: &Path, options: &ExtractOptions) -> Result<String> {
        let doc = Document::load(path)
            .with_context(|| format!("Failed to load PDF: {}", path.display()))?;

        let text = Self::extract_pages(&doc, options).join("\n");

        if text.trim().is_empty() && options.pages.is_none() {
            // Fallback: pdf-extract handles some font encodings lopdf does not
            return match pdf_extract::extract_text(path) {
                Ok(text) => Ok(text.trim().to_string()),
                Err(e) => {
                    debug!(error = %e, "pdf-extract fallback produced no text");
                    Ok(String::new())
                }
            };
        }

        Ok(text)
    }

    fn name(&self) -> &'static str {
        "lopdf"
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Object, Stream};
    use tempfile::NamedTempFile;

    /// Write a PDF with one page per entry of `page_texts`
    pub(crate) fn write_test_pdf(path: &Path, page_texts: &[&str]) {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                "F1" => font_id,
            },
        });

        let mut kids: Vec<Object> = Vec::new();
        for text in page_texts {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), 24.into()]),
                    Operation::new("Td", vec![72.into(), 700.into()]),
                    Operation::new("Tj", vec![Object::string_literal(*text)]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id =
                doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
                "Resources" => resources_id,
                "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
            });
            kids.push(page_id.into());
        }

        let pages = dictionary! {
            "Type" => "Pages",
            "Count" => kids.len() as i64,
            "Kids" => kids,
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.save(path).unwrap();
    }

    #[test]
    fn test_pdf_extracts_all_pages_in_order() {
        let temp_file = NamedTempFile::new().unwrap();
        write_test_pdf(temp_file.path(), &["Alpha page", "Beta page", "Gamma page"]);

        let text = PdfExtractor::new()
            .extract(temp_file.path(), &ExtractOptions::default())
            .unwrap();

        let alpha = text.find("Alpha").unwrap();
        let beta = text.find("Beta").unwrap();
        let gamma = text.find("Gamma").unwrap();
        assert!(alpha < beta && beta < gamma, "got: {text}");
    }

    #[test]
    fn test_pdf_page_filter() {
        let temp_file = NamedTempFile::new().unwrap();
        write_test_pdf(temp_file.path(), &["Alpha page", "Beta page", "Gamma page"]);

        let options = ExtractOptions::default().with_pages([0, 2]);
        let text = PdfExtractor::new().extract(temp_file.path(), &options).unwrap();

        assert!(text.contains("Alpha"), "got: {text}");
        assert!(!text.contains("Beta"), "got: {text}");
        assert!(text.contains("Gamma"), "got: {text}");
        assert!(text.find("Alpha").unwrap() < text.find("Gamma").unwrap());
        assert_eq!(text.lines().filter(|l| !l.trim().is_empty()).count(), 2);
    }

    #[test]
    fn test_pdf_page_filter_out_of_range_yields_empty() {
        let temp_file = NamedTempFile::new().unwrap();
        write_test_pdf(temp_file.path(), &["Only page"]);

        let options = ExtractOptions::default().with_pages([5]);
        let text = PdfExtractor::new().extract(temp_file.path(), &options).unwrap();
        assert!(text.trim().is_empty());
    }

    #[test]
    fn test_pdf_corrupt_file_is_error() {
        let temp_file = NamedTempFile::new().unwrap();
        std::fs::write(temp_file.path(), b"this is not a pdf").unwrap();

        let result = PdfExtractor::new().extract(temp_file.path(), &ExtractOptions::default());
        assert!(result.is_err());
    }
}
