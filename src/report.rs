//! Write a summary out as a minimal Word document.
//!
//! The package holds only the parts Word needs to open it: content types,
//! the package relationship, a style sheet with a Title style, and the body.

use anyhow::{Context, Result};
use quick_xml::escape::escape;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/></Types>"#;

const PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const DOCUMENT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/></Relationships>"#;

const STYLES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/></w:style><w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/><w:rPr><w:b/><w:sz w:val="48"/></w:rPr></w:style></w:styles>"#;

fn paragraph(text: &str, style: Option<&str>) -> String {
    let properties = style
        .map(|id| format!(r#"<w:pPr><w:pStyle w:val="{}"/></w:pPr>"#, id))
        .unwrap_or_default();
    if text.is_empty() {
        return format!("<w:p>{}</w:p>", properties);
    }
    format!(
        r#"<w:p>{}<w:r><w:t xml:space="preserve">{}</w:t></w:r></w:p>"#,
        properties,
        escape(text)
    )
}

fn document_xml(title: &str, summary: &str) -> String {
    let mut body = paragraph(title, Some("Title"));
    for line in summary.lines() {
        body.push_str(&paragraph(line.trim_end(), None));
    }
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{}</w:body></w:document>"#,
        body
    )
}

/// Output path used when none is given: `<stem>_summary.docx` next to the input
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("document");
    input.with_file_name(format!("{}_summary.docx", stem))
}

/// Write `summary` under a `title` heading as a .docx file at `path`
pub fn write_summary_docx(path: &Path, title: &str, summary: &str) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    let parts = [
        ("[Content_Types].xml", CONTENT_TYPES.to_string()),
        ("_rels/.rels", PACKAGE_RELS.to_string()),
        ("word/_rels/document.xml.rels", DOCUMENT_RELS.to_string()),
        ("word/styles.xml", STYLES.to_string()),
        ("word/document.xml", document_xml(title, summary)),
    ];

    for (name, content) in parts {
        zip.start_file(name, options)
            .with_context(|| format!("Failed to add {} to {}", name, path.display()))?;
        zip.write_all(content.as_bytes())
            .with_context(|| format!("Failed to write {} to {}", name, path.display()))?;
    }

    zip.finish()
        .with_context(|| format!("Failed to finalize {}", path.display()))?;

    info!(path = %path.display(), "Wrote summary document");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::file::{DocxExtractor, TextExtractor};
    use crate::models::ExtractOptions;
    use tempfile::TempDir;

    #[test]
    fn test_summary_docx_reads_back() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("summary.docx");

        write_summary_docx(
            &path,
            "Paper Summary",
            "- Accuracy improves by 4%\n- Cost <halved> & latency flat",
        )
        .unwrap();

        let text = DocxExtractor::new()
            .extract(&path, &ExtractOptions::default())
            .unwrap();
        assert_eq!(
            text,
            "Paper Summary\n- Accuracy improves by 4%\n- Cost <halved> & latency flat"
        );
    }

    #[test]
    fn test_title_uses_title_style() {
        let xml = document_xml("Paper Summary", "body");
        assert!(xml.contains(r#"<w:pStyle w:val="Title"/>"#));
        assert!(xml.find(">Paper Summary<").unwrap() < xml.find(">body<").unwrap());
    }

    #[test]
    fn test_default_output_path_uses_input_stem() {
        assert_eq!(
            default_output_path(Path::new("/papers/attention.pdf")),
            PathBuf::from("/papers/attention_summary.docx")
        );
        assert_eq!(
            default_output_path(Path::new("results.v2.xlsx")),
            PathBuf::from("results.v2_summary.docx")
        );
    }

    #[test]
    fn test_write_into_missing_directory_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("summary.docx");
        let err = write_summary_docx(&path, "Paper Summary", "text").unwrap_err();
        assert!(err.to_string().contains("Failed to create"));
    }
}
