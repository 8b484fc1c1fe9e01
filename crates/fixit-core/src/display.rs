//! Display implementations for repair documents.
//!
//! Markdown-formatted output for rich terminal display, separated from the
//! model definitions to keep data structures and presentation apart. The
//! CLI feeds these strings through its terminal renderer.

use std::fmt;

use jiff::{tz::TimeZone, Timestamp};

use crate::models::{RepairDocument, RepairStep};

/// A wrapper around `Timestamp` that formats in the system timezone as
/// `YYYY-MM-DD HH:MM:SS TZ`.
pub struct LocalDateTime<'a>(pub &'a Timestamp);

impl fmt::Display for LocalDateTime<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            self.0
                .to_zoned(TimeZone::system())
                .strftime("%Y-%m-%d %H:%M:%S %Z")
        )
    }
}

impl fmt::Display for RepairStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let visual = if self.generated_image_url.is_some() {
            "🖼 visual available"
        } else {
            "visual unavailable"
        };
        writeln!(f, "### Step {}. {}", self.step_number, self.instruction)?;
        writeln!(f)?;
        writeln!(f, "- {visual}")?;
        writeln!(f)?;
        Ok(())
    }
}

impl fmt::Display for RepairDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "# {}: {}",
            self.analysis.object_name, self.analysis.issue_type
        )?;
        writeln!(f)?;

        // Metadata section
        writeln!(f, "- ID: {}", self.repair_id)?;
        writeln!(f, "- Status: {}", self.analysis.status.with_icon())?;
        writeln!(f, "- Category: {}", self.analysis.category.as_str())?;
        writeln!(f, "- Created: {}", LocalDateTime(&self.timestamp))?;
        writeln!(
            f,
            "- Visibility: {}",
            if self.is_public { "public" } else { "private" }
        )?;
        match self.is_successful {
            Some(true) => writeln!(f, "- Outcome: repaired")?,
            Some(false) => writeln!(f, "- Outcome: not repaired")?,
            None => writeln!(f, "- Outcome: ongoing")?,
        }
        if let Some(url) = &self.manual_url {
            writeln!(f, "- Manual: {url}")?;
        }

        if let Some(warning) = &self.analysis.safety_warning {
            writeln!(f)?;
            writeln!(f, "**⚠ Safety**: {warning}")?;
        }

        writeln!(f)?;
        writeln!(f, "Ideal view: {}", self.analysis.ideal_view_instruction)?;

        writeln!(f, "\n## Steps")?;
        writeln!(f)?;
        for step in self.steps() {
            write!(f, "{step}")?;
        }

        Ok(())
    }
}

/// Newtype wrapper for displaying collections of repair documents as
/// compact summaries. Handles empty collections gracefully.
pub struct DocumentSummaries(pub Vec<RepairDocument>);

impl DocumentSummaries {
    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of documents in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Display for DocumentSummaries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            writeln!(f, "No repairs found.")?;
            return Ok(());
        }

        for doc in &self.0 {
            writeln!(
                f,
                "## {}: {} (ID: {})",
                doc.analysis.object_name, doc.analysis.issue_type, doc.repair_id
            )?;
            writeln!(f)?;
            writeln!(f, "- **Category**: {}", doc.analysis.category.as_str())?;
            writeln!(f, "- **Steps**: {}", doc.steps().len())?;
            writeln!(f, "- **Created**: {}", LocalDateTime(&doc.timestamp))?;
            if doc.is_public {
                writeln!(f, "- **Public**")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
