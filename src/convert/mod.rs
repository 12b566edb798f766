//! Document services: create RTF files from markup and edit existing ones.
//!
//! Every request is self-contained: it parses, renders and touches only the
//! file it names, so independent requests may run concurrently. Results are
//! values carrying a success flag and message rather than errors.
//!
//! # Example
//!
//! ```no_run
//! use rtfmark::convert::{apply_formatting, create_document, FormatOperation, OperationType};
//!
//! let created = create_document("Budget is ==approved==.", "/tmp/notes.rtf", "business");
//! assert!(created.success);
//!
//! let ops = [FormatOperation::new(OperationType::Bold, 0, 6)];
//! let edited = apply_formatting("/tmp/notes.rtf", &ops);
//! println!("{}", edited.message);
//! ```

mod create;
mod format;

pub use create::{create_document, create_document_with_options, expand_path, CreateResult};
pub use format::{
    apply_formatting, apply_operations, EditReport, FormatOperation, FormatResult, OperationType,
    SkippedOperation,
};

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::parser::ParseOptions;
use crate::render::RenderOptions;
use crate::template::Template;

/// Options for document creation.
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    /// Markup parsing options (template, metadata)
    pub parse: ParseOptions,

    /// RTF rendering options
    pub render: RenderOptions,
}

impl ConvertOptions {
    /// Create new conversion options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set parsing options.
    pub fn with_parse_options(mut self, options: ParseOptions) -> Self {
        self.parse = options;
        self
    }

    /// Set rendering options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render = options;
        self
    }

    /// Set the template.
    pub fn with_template(mut self, template: Template) -> Self {
        self.parse.template = template;
        self
    }

    /// Set the template by name; unknown names fall back to business.
    pub fn with_template_name(mut self, name: &str) -> Self {
        self.parse.template = Template::from_name(name);
        self
    }

    /// Set the document title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.parse.title = Some(title.into());
        self
    }
}

/// One document creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateRequest {
    /// Markup text
    pub content: String,

    /// Target file path (`~` is expanded)
    pub output_path: String,

    /// Template name
    #[serde(default)]
    pub template: String,
}

impl CreateRequest {
    /// Create a request.
    pub fn new(
        content: impl Into<String>,
        output_path: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            content: content.into(),
            output_path: output_path.into(),
            template: template.into(),
        }
    }
}

/// Run independent creation requests in parallel.
///
/// Results are returned in request order. Requests naming the same path race
/// and the last writer wins.
pub fn create_documents(requests: &[CreateRequest]) -> Vec<CreateResult> {
    log::debug!("Creating {} documents", requests.len());
    requests
        .par_iter()
        .map(|r| create_document(&r.content, &r.output_path, &r.template))
        .collect()
}

/// Async wrappers running the blocking services on tokio's blocking pool.
#[cfg(feature = "async")]
pub mod nonblocking {
    use super::{CreateResult, FormatOperation, FormatResult};

    /// Async version of [`create_document`](super::create_document).
    pub async fn create_document(
        markup: String,
        output_path: String,
        template: String,
    ) -> CreateResult {
        let task = tokio::task::spawn_blocking(move || {
            super::create_document(&markup, &output_path, &template)
        });
        task.await.unwrap_or_else(|e| CreateResult {
            success: false,
            path: String::new(),
            message: format!("Failed to write file: task failed: {}", e),
        })
    }

    /// Async version of [`apply_formatting`](super::apply_formatting).
    pub async fn apply_formatting(
        file_path: String,
        operations: Vec<FormatOperation>,
    ) -> FormatResult {
        let task =
            tokio::task::spawn_blocking(move || super::apply_formatting(&file_path, &operations));
        task.await.unwrap_or_else(|e| FormatResult {
            success: false,
            message: format!("Failed to apply formatting: task failed: {}", e),
            applied: 0,
            skipped: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_options_builder() {
        let options = ConvertOptions::new()
            .with_template_name("meeting")
            .with_title("Standup")
            .with_render_options(RenderOptions::new().with_info(false));

        assert_eq!(options.parse.template, Template::Meeting);
        assert_eq!(options.parse.title.as_deref(), Some("Standup"));
        assert!(!options.render.include_info);
    }

    #[test]
    fn test_create_documents_parallel() {
        let dir = tempfile::tempdir().unwrap();
        let requests: Vec<CreateRequest> = (0..8)
            .map(|i| {
                let path = dir.path().join(format!("doc{}.rtf", i));
                CreateRequest::new(
                    format!("# Doc {}", i),
                    path.to_string_lossy(),
                    "technical",
                )
            })
            .collect();

        let results = create_documents(&requests);
        assert_eq!(results.len(), 8);
        for (i, result) in results.iter().enumerate() {
            assert!(result.success, "{}", result.message);
            assert!(result.path.ends_with(&format!("doc{}.rtf", i)));
        }
    }

    #[test]
    fn test_create_request_serde() {
        let request: CreateRequest =
            serde_json::from_str(r#"{"content":"x","output_path":"/tmp/x.rtf"}"#).unwrap();
        assert_eq!(request.template, "");
    }

    #[cfg(feature = "async")]
    #[tokio::test]
    async fn test_nonblocking_services() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("async.rtf").to_string_lossy().to_string();

        let created =
            nonblocking::create_document("Hello".into(), path.clone(), "business".into()).await;
        assert!(created.success, "{}", created.message);

        let ops = vec![FormatOperation::new(OperationType::Bold, 0, 5)];
        let formatted = nonblocking::apply_formatting(path, ops).await;
        assert!(formatted.success, "{}", formatted.message);
        assert_eq!(formatted.applied, 1);
    }
}
