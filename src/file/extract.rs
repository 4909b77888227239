//! Extraction orchestration: validation, dispatch, normalization, result assembly.
//!
//! Every function here returns an [`ExtractionResult`]; failures are reported
//! in the result, never raised.

use crate::constants::LARGE_FILE_WARN_BYTES;
use crate::error::ExtractError;
use crate::file::ExtractorRegistry;
use crate::models::{ExtractOptions, ExtractionInput, ExtractionResult, ExtractionSource};
use crate::utils;
use serde_json::{Map, Value};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Check that `path` exists, is a regular file, and can be opened for reading
///
/// Returns the file size in bytes.
pub fn validate_file(path: &Path) -> Result<u64, ExtractError> {
    let invalid = |reason: &str| ExtractError::FileValidation {
        path: path.to_path_buf(),
        reason: reason.to_string(),
    };

    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(invalid("file does not exist"))
        }
        Err(e) => return Err(invalid(&e.to_string())),
    };

    if !metadata.is_file() {
        return Err(invalid("path is not a file"));
    }

    std::fs::File::open(path).map_err(|e| invalid(&format!("file is not readable: {}", e)))?;

    Ok(metadata.len())
}

/// Extract, normalize and validate the text of a file on disk
pub async fn extract_file(
    registry: &Arc<ExtractorRegistry>,
    path: &Path,
    options: &ExtractOptions,
) -> ExtractionResult {
    let mut metadata = Map::new();
    metadata.insert("file_path".into(), Value::from(path.display().to_string()));

    let size = match validate_file(path) {
        Ok(size) => size,
        Err(e) => return fail(&e, metadata),
    };

    let file_type = utils::get_extension(path);
    metadata.insert("file_size_bytes".into(), Value::from(size));
    metadata.insert("file_size_mb".into(), Value::from(utils::size_in_mb(size)));
    metadata.insert("file_type".into(), Value::from(file_type.clone()));

    if size > LARGE_FILE_WARN_BYTES {
        warn!(
            path = %path.display(),
            size_mb = utils::size_in_mb(size),
            "Large file detected, extraction may be slow"
        );
    }

    // Fail before touching the blocking pool when nothing can parse this file
    if let Err(e) = registry.resolve(path) {
        return fail(&e, metadata);
    }

    info!(path = %path.display(), format = %file_type, "Extracting text");

    let dispatched = {
        let registry = Arc::clone(registry);
        let path = path.to_path_buf();
        let options = options.clone();
        tokio::task::spawn_blocking(move || registry.dispatch(&path, &options)).await
    };

    let (raw, method) = match dispatched {
        Ok(Ok(extracted)) => extracted,
        Ok(Err(e)) => return fail(&e, metadata),
        Err(join_error) => {
            let e = ExtractError::Parse {
                extension: file_type,
                source: anyhow::anyhow!("extractor task aborted: {}", join_error),
            };
            return fail(&e, metadata);
        }
    };
    metadata.insert("extraction_method".into(), Value::from(method));

    let content = utils::normalize_whitespace(&raw);
    if content.is_empty() {
        let e = ExtractError::EmptyContent {
            path: path.to_path_buf(),
        };
        return fail(&e, metadata);
    }

    metadata.insert("content_length".into(), Value::from(content.chars().count()));
    info!(
        path = %path.display(),
        characters = content.chars().count(),
        "Successfully extracted text"
    );

    ExtractionResult::success(content, metadata)
}

/// Extract text from uploaded bytes
///
/// The bytes are staged in a temporary file carrying the original extension.
/// Writing and removing it run on the blocking pool.
/// The file is removed when this call returns, whatever the outcome; a failed
/// removal is logged and does not change the result.
pub async fn extract_from_bytes(
    registry: &Arc<ExtractorRegistry>,
    bytes: &[u8],
    filename: &str,
    options: &ExtractOptions,
) -> ExtractionResult {
    let mut upload_metadata = Map::new();
    upload_metadata.insert("original_filename".into(), Value::from(filename));

    let extension = utils::get_extension(Path::new(filename));

    // Unknown formats never need a temporary file
    if registry.get(&extension).is_none() {
        let e = ExtractError::UnsupportedFormat { extension };
        return fail(&e, upload_metadata);
    }

    let staged = {
        let bytes = bytes.to_vec();
        let extension = extension.clone();
        tokio::task::spawn_blocking(move || stage_bytes(&bytes, &extension)).await
    };
    let temp_path = match staged {
        Ok(Ok(temp_path)) => temp_path,
        Ok(Err(e)) => return fail(&e, upload_metadata),
        Err(join_error) => {
            let e = ExtractError::TempFile(std::io::Error::other(join_error.to_string()));
            return fail(&e, upload_metadata);
        }
    };

    let mut result = extract_file(registry, &temp_path, options).await;

    let staged_path = temp_path.to_path_buf();
    match tokio::task::spawn_blocking(move || temp_path.close()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            warn!(path = %staged_path.display(), error = %e, "Failed to clean up temporary file")
        }
        Err(e) => {
            warn!(path = %staged_path.display(), error = %e, "Temporary file cleanup task aborted")
        }
    }

    result.insert_metadata("original_filename", filename);
    result.insert_metadata("temp_file_used", true);
    result
}

fn stage_bytes(bytes: &[u8], extension: &str) -> Result<tempfile::TempPath, ExtractError> {
    let mut temp_file = tempfile::Builder::new()
        .prefix("docsum-upload-")
        .suffix(extension)
        .tempfile()
        .map_err(ExtractError::TempFile)?;
    temp_file.write_all(bytes).map_err(ExtractError::TempFile)?;
    temp_file.flush().map_err(ExtractError::TempFile)?;
    // Dropping the TempPath deletes the file, so a panic further down still cleans up
    Ok(temp_file.into_temp_path())
}

/// Extract from either a path or uploaded bytes
pub async fn extract(registry: &Arc<ExtractorRegistry>, input: &ExtractionInput) -> ExtractionResult {
    match &input.source {
        ExtractionSource::Path(path) => extract_file(registry, path, &input.options).await,
        ExtractionSource::Bytes { data, filename } => {
            extract_from_bytes(registry, data, filename, &input.options).await
        }
    }
}

fn fail(error: &ExtractError, metadata: Map<String, Value>) -> ExtractionResult {
    error!(kind = %error.kind(), "{}", error);
    ExtractionResult::failure(error, metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::file::types::pdf::tests::write_test_pdf;
    use crate::file::TextExtractor;
    use tempfile::TempDir;

    fn registry() -> Arc<ExtractorRegistry> {
        Arc::new(ExtractorRegistry::with_defaults())
    }

    #[test]
    fn test_validate_missing_file() {
        let err = validate_file(Path::new("/no/such/file.pdf")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileValidation);
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn test_validate_directory() {
        let temp_dir = TempDir::new().unwrap();
        let err = validate_file(temp_dir.path()).unwrap_err();
        assert!(err.to_string().contains("not a file"));
    }

    #[tokio::test]
    async fn test_extract_file_success_normalizes_whitespace() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("notes.txt");
        std::fs::write(&path, "Deep   learning\n\n\tmethods ").unwrap();

        let result = extract_file(&registry(), &path, &ExtractOptions::default()).await;
        assert!(result.success);
        assert_eq!(result.content, "Deep learning methods");
        assert_eq!(result.metadata["file_type"], ".txt");
        assert_eq!(result.metadata["extraction_method"], "text");
        assert_eq!(result.metadata["content_length"], 21);
        assert!(result.error_message.is_none());
    }

    #[tokio::test]
    async fn test_extract_file_whitespace_only_is_empty_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("blank.txt");
        std::fs::write(&path, " \n\t \r\n ").unwrap();

        let result = extract_file(&registry(), &path, &ExtractOptions::default()).await;
        assert!(!result.success);
        assert_eq!(result.content, "");
        assert_eq!(result.error_kind, Some(ErrorKind::EmptyContent));
        assert!(result.error_message.is_some());
    }

    #[tokio::test]
    async fn test_extract_file_missing_is_validation_failure() {
        let result = extract_file(
            &registry(),
            Path::new("/no/such/paper.pdf"),
            &ExtractOptions::default(),
        )
        .await;
        assert!(!result.success);
        assert_eq!(result.error_kind, Some(ErrorKind::FileValidation));
    }

    #[tokio::test]
    async fn test_extract_file_unsupported_extension() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("slides.pptx");
        std::fs::write(&path, "content").unwrap();

        let result = extract_file(&registry(), &path, &ExtractOptions::default()).await;
        assert_eq!(result.error_kind, Some(ErrorKind::UnsupportedFormat));
        assert!(result.error_message.unwrap().contains(".pptx"));
    }

    #[tokio::test]
    async fn test_extract_file_corrupt_document() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.docx");
        std::fs::write(&path, "not a zip").unwrap();

        let result = extract_file(&registry(), &path, &ExtractOptions::default()).await;
        assert_eq!(result.error_kind, Some(ErrorKind::Extraction));
    }

    #[tokio::test]
    async fn test_extract_from_bytes_latin1_txt() {
        let result = extract_from_bytes(
            &registry(),
            b"Na\xefve approach",
            "upload.TXT",
            &ExtractOptions::default(),
        )
        .await;
        assert!(result.success, "{:?}", result.error_message);
        assert_eq!(result.content, "Naïve approach");
        assert_eq!(result.metadata["original_filename"], "upload.TXT");
        assert_eq!(result.metadata["temp_file_used"], true);
    }

    #[tokio::test]
    async fn test_extract_from_bytes_removes_temp_file() {
        let result = extract_from_bytes(
            &registry(),
            b"some words",
            "paper.txt",
            &ExtractOptions::default(),
        )
        .await;
        let staged = result.metadata["file_path"].as_str().unwrap().to_string();
        assert!(!Path::new(&staged).exists());
    }

    #[tokio::test]
    async fn test_extract_from_bytes_removes_temp_file_on_failure() {
        struct Failing;
        impl TextExtractor for Failing {
            fn extract(&self, _: &Path, _: &ExtractOptions) -> anyhow::Result<String> {
                anyhow::bail!("cannot parse")
            }
            fn name(&self) -> &'static str {
                "failing"
            }
        }

        let mut registry = ExtractorRegistry::new();
        registry.register(".bin", Arc::new(Failing));
        let registry = Arc::new(registry);

        let result =
            extract_from_bytes(&registry, b"\x00\x01", "blob.bin", &ExtractOptions::default())
                .await;
        assert_eq!(result.error_kind, Some(ErrorKind::Extraction));
        let staged = result.metadata["file_path"].as_str().unwrap().to_string();
        assert!(!Path::new(&staged).exists());
    }

    #[tokio::test]
    async fn test_extract_from_bytes_unsupported_skips_staging() {
        let result =
            extract_from_bytes(&registry(), b"data", "archive.zip", &ExtractOptions::default())
                .await;
        assert_eq!(result.error_kind, Some(ErrorKind::UnsupportedFormat));
        assert!(result.metadata.get("file_path").is_none());
    }

    #[tokio::test]
    async fn test_extract_input_pdf_with_page_filter() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("paper.pdf");
        write_test_pdf(&path, &["Abstract text", "Methods text", "Conclusion text"]);

        let input = ExtractionInput::from_path(&path)
            .with_options(ExtractOptions::default().with_pages([0, 2]));
        let result = extract(&registry(), &input).await;

        assert!(result.success, "{:?}", result.error_message);
        assert!(result.content.contains("Abstract"));
        assert!(!result.content.contains("Methods"));
        assert!(result.content.contains("Conclusion"));
        assert!(result.content.find("Abstract").unwrap() < result.content.find("Conclusion").unwrap());
    }

    #[tokio::test]
    async fn test_extract_file_large_file_still_extracted() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("large.txt");
        std::fs::write(&path, "Large dataset notes").unwrap();
        let file = std::fs::OpenOptions::new().write(true).open(&path).unwrap();
        file.set_len(LARGE_FILE_WARN_BYTES + 1).unwrap();
        drop(file);

        let result = extract_file(&registry(), &path, &ExtractOptions::default()).await;
        assert!(result.success, "{:?}", result.error_message);
        assert!(result.content.starts_with("Large dataset notes"));
        assert_eq!(result.metadata["file_size_bytes"], LARGE_FILE_WARN_BYTES + 1);
        assert_eq!(result.metadata["file_size_mb"], 50.0);
    }

    #[cfg(unix)]
    #[test]
    fn test_validate_unreadable_file() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("locked.txt");
        std::fs::write(&path, "secret").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o000)).unwrap();

        // root ignores file permissions
        if std::fs::File::open(&path).is_ok() {
            return;
        }

        let err = validate_file(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileValidation);
        assert!(err.to_string().contains("not readable"), "got: {err}");
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_concurrent_uploads_on_single_thread_runtime() {
        let registry = registry();
        let options = ExtractOptions::default();
        let (first, second) = tokio::join!(
            extract_from_bytes(&registry, b"first upload", "a.txt", &options),
            extract_from_bytes(&registry, b"second upload", "b.csv", &options),
        );

        assert_eq!(first.content, "first upload");
        assert_eq!(second.content, "second upload");
        for result in [&first, &second] {
            let staged = result.metadata["file_path"].as_str().unwrap();
            assert!(!Path::new(staged).exists());
        }
    }
}
