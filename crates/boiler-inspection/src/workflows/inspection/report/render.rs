use std::fmt::Write as _;

use super::views::{ReportDocument, SectionBody};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("failed to format report: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Output port turning a projected document into a printable artifact.
pub trait DocumentRenderer: Send + Sync {
    fn extension(&self) -> &'static str;
    fn content_type(&self) -> mime::Mime;
    fn render(&self, document: &ReportDocument) -> Result<Vec<u8>, RenderError>;
}

/// Rendered bytes plus the download name derived from the document.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub filename: String,
    pub content_type: mime::Mime,
    pub bytes: Vec<u8>,
}

impl RenderedReport {
    pub fn render<D: DocumentRenderer + ?Sized>(
        renderer: &D,
        document: &ReportDocument,
    ) -> Result<Self, RenderError> {
        Ok(Self {
            filename: document.filename(renderer.extension()),
            content_type: renderer.content_type(),
            bytes: renderer.render(document)?,
        })
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PlainTextRenderer;

impl PlainTextRenderer {
    pub fn render_string(&self, document: &ReportDocument) -> Result<String, RenderError> {
        let mut out = String::new();
        writeln!(out, "{}", document.title)?;
        writeln!(out, "{}", "=".repeat(32))?;

        for section in &document.sections {
            writeln!(out)?;
            writeln!(out, "[{}]", section.heading)?;
            match &section.body {
                SectionBody::Fields(fields) => {
                    for field in fields {
                        writeln!(out, "{}: {}", field.label, field.value)?;
                    }
                }
                SectionBody::Checklist(rows) => {
                    for row in rows {
                        writeln!(out, "{}", row.line())?;
                    }
                }
                SectionBody::Text(text) => writeln!(out, "{text}")?,
            }
        }

        Ok(out)
    }
}

impl DocumentRenderer for PlainTextRenderer {
    fn extension(&self) -> &'static str {
        "txt"
    }

    fn content_type(&self) -> mime::Mime {
        mime::TEXT_PLAIN_UTF_8
    }

    fn render(&self, document: &ReportDocument) -> Result<Vec<u8>, RenderError> {
        self.render_string(document).map(String::into_bytes)
    }
}
