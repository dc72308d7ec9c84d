//! Markdown presenter for the finished ideas.
//!
//! The last chain step is a pure formatter: it never calls the model and the
//! output never contains raw JSON.

use crate::campaign::Idea;

/// Renders the final Markdown, one section per idea in label order A, B, C.
///
/// Ideas with labels outside A-C are dropped; a missing label is skipped
/// rather than rendered empty. Compliance notes appear in italics when the
/// compliance step added them and later steps preserved them.
pub fn present_markdown(ideas: &[Idea]) -> String {
    let mut sections = Vec::new();
    for wanted in ["A", "B", "C"] {
        // Duplicate labels: the last occurrence wins.
        let Some(idea) = ideas
            .iter()
            .filter(|i| i.label.eq_ignore_ascii_case(wanted))
            .last()
        else {
            continue;
        };
        let notes = idea.compliance_notes.trim();
        let compliance_section = if notes.is_empty() {
            String::new()
        } else {
            format!("\n\n*Compliance Notes: {notes}*")
        };
        sections.push(format!(
            "### Option {}\n#### {}\n\n> {}\n\n**Captions**\n- **IG**: {}\n- **X**: {}\n\n**CTA**: {}{}\n",
            wanted,
            idea.tagline.trim(),
            idea.script_30s.trim(),
            idea.captions.instagram.trim(),
            idea.captions.x.trim(),
            idea.cta.trim(),
            compliance_section,
        ));
    }
    sections.join("\n\n")
}
