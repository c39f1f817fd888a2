//! Check report rendering.
//!
//! One fixed-layout A4 page per check: pass/fail headline, the check
//! details, an outcome paragraph and the list attribution. Reports are
//! keyed by check id so concurrent checks never share an output file.

use crate::error::ApiError;
use chrono::{DateTime, Local, Utc};
use printpdf::{BuiltinFont, Mm, PdfDocument};
use std::path::{Path, PathBuf};
use uuid::Uuid;

const MATCH_BODY: &str = "A match was found on the sanctions list. \
Please contact your money laundering officer immediately.";

const SOURCE_LINE: &str = "Source: UK SANCTIONS LIST";

// printpdf draws single lines; the body paragraph wraps at this width.
const BODY_WRAP_CHARS: usize = 80;

/// Everything the report layout needs about one check.
#[derive(Debug, Clone)]
pub struct ReportInput {
    pub check_id: Uuid,
    pub full_name: String,
    pub staff: String,
    pub matched: bool,
    pub checked_at: DateTime<Utc>,
}

pub struct ReportGenerator {
    output_dir: PathBuf,
    notification_email: String,
}

impl ReportGenerator {
    pub fn new(
        output_dir: impl Into<PathBuf>,
        notification_email: impl Into<String>,
    ) -> Result<Self, ApiError> {
        let output_dir = output_dir.into();
        std::fs::create_dir_all(&output_dir)?;

        Ok(Self {
            output_dir,
            notification_email: notification_email.into(),
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn file_name(check_id: &Uuid) -> String {
        format!("{}.pdf", check_id)
    }

    /// Renders the report and returns only once the file write has
    /// completed, so callers never hand out a URL to a partial file.
    pub async fn generate(&self, input: &ReportInput) -> Result<PathBuf, ApiError> {
        let bytes = self.render(input)?;
        let path = self.output_dir.join(Self::file_name(&input.check_id));

        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| ApiError::Report(format!("Failed to write report file: {}", e)))?;

        tracing::debug!(report = %path.display(), "report written");

        Ok(path)
    }

    fn render(&self, input: &ReportInput) -> Result<Vec<u8>, ApiError> {
        let (doc, page, layer) =
            PdfDocument::new("Sanctions Check Report", Mm(210.0), Mm(297.0), "Layer 1");

        let bold = doc
            .add_builtin_font(BuiltinFont::HelveticaBold)
            .map_err(|e| ApiError::Report(e.to_string()))?;
        let regular = doc
            .add_builtin_font(BuiltinFont::Helvetica)
            .map_err(|e| ApiError::Report(e.to_string()))?;

        let layer = doc.get_page(page).get_layer(layer);

        // Both headline variants are six characters, so one fixed offset
        // keeps either centered.
        let headline = if input.matched { "FAILED" } else { "PASSED" };
        layer.use_text(headline, 24.0, Mm(86.0), Mm(250.0), &bold);

        let mut y = 230.0;
        let details = [
            format!("Name: {}", input.full_name),
            format!("Checked by: {}", input.staff),
            format!(
                "Date: {}",
                input
                    .checked_at
                    .with_timezone(&Local)
                    .format("%d/%m/%Y %H:%M:%S")
            ),
        ];
        for line in details {
            layer.use_text(line, 14.0, Mm(20.0), Mm(y), &regular);
            y -= 8.0;
        }

        y -= 8.0;
        for line in wrap_text(&self.body_text(input.matched), BODY_WRAP_CHARS) {
            layer.use_text(line, 12.0, Mm(20.0), Mm(y), &regular);
            y -= 7.0;
        }

        y -= 7.0;
        layer.use_text(SOURCE_LINE, 12.0, Mm(20.0), Mm(y), &regular);

        doc.save_to_bytes()
            .map_err(|e| ApiError::Report(e.to_string()))
    }

    fn body_text(&self, matched: bool) -> String {
        if matched {
            MATCH_BODY.to_string()
        } else {
            format!(
                "We have not found any matches against the sanctions list. \
                 This name will now be monitored. Should the name be added, \
                 we will notify {}.",
                self.notification_email
            )
        }
    }
}

/// Greedy word wrap; words longer than the limit get a line of their own.
fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
        } else if current.len() + 1 + word.len() <= max_chars {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines
}
