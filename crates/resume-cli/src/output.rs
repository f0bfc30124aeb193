use std::io::Write;

use owo_colors::OwoColorize;
use resume_core::{CanonicalField, ExtractedText, FieldKind, ParsedResume};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print which backend won and how long each candidate was.
pub fn print_extraction_summary(
    w: &mut dyn Write,
    pdf_name: &str,
    extracted: &ExtractedText,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w, "Extracting text from {}...", pdf_name)?;
    let chars = extracted.text.chars().count();
    if color.enabled() {
        writeln!(
            w,
            "Method: {} ({} chars)",
            extracted.method.to_string().bold(),
            chars
        )?;
    } else {
        writeln!(w, "Method: {} ({} chars)", extracted.method, chars)?;
    }

    for candidate in &extracted.candidates {
        let line = format!("  {:<20} {:>7} chars", candidate.method.to_string(), candidate.length);
        if color.enabled() {
            writeln!(w, "{}", line.dimmed())?;
        } else {
            writeln!(w, "{}", line)?;
        }
    }

    if extracted.low_content {
        let warning = "Warning: very little text extracted; the PDF may be image-only";
        if color.enabled() {
            writeln!(w, "{}", warning.yellow())?;
        } else {
            writeln!(w, "{}", warning)?;
        }
    }
    writeln!(w)?;
    Ok(())
}

/// Print the first `max_chars` characters of the cleaned text.
pub fn print_preview(
    w: &mut dyn Write,
    extracted: &ExtractedText,
    max_chars: usize,
    color: ColorMode,
) -> std::io::Result<()> {
    let header = format!("--- Text preview (first {} chars) ---", max_chars);
    if color.enabled() {
        writeln!(w, "{}", header.cyan())?;
    } else {
        writeln!(w, "{}", header)?;
    }
    writeln!(w, "{}", extracted.preview(max_chars))?;
    writeln!(w)?;
    Ok(())
}

/// One line per populated canonical field, plus dynamic field counts.
pub fn print_field_summary(
    w: &mut dyn Write,
    resume: &ParsedResume,
    color: ColorMode,
) -> std::io::Result<()> {
    let mut filled = 0;
    for field in CanonicalField::ALL {
        let rendered = match field.kind() {
            FieldKind::Scalar => resume
                .scalar(field)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            FieldKind::List => resume
                .list(field)
                .filter(|l| !l.is_empty())
                .map(|l| format!("{} item(s)", l.len())),
        };
        let Some(rendered) = rendered else { continue };
        filled += 1;
        if color.enabled() {
            writeln!(w, "  {:<22} {}", field.as_str().green(), rendered)?;
        } else {
            writeln!(w, "  {:<22} {}", field.as_str(), rendered)?;
        }
    }

    let total = CanonicalField::ALL.len();
    if color.enabled() {
        writeln!(w, "{}", format!("{}/{} fields populated", filled, total).bold())?;
    } else {
        writeln!(w, "{}/{} fields populated", filled, total)?;
    }

    if let Some(dynamic) = &resume.dynamic_fields {
        writeln!(
            w,
            "Dynamic: {} custom section(s), {} key-value pair(s), {} term(s), {} cluster(s), {} entity type(s), {} topic(s)",
            dynamic.custom_sections.len(),
            dynamic.key_value_pairs.len(),
            dynamic.domain_terminology.len(),
            dynamic.content_clusters.len(),
            dynamic.entities.len(),
            dynamic.topics.len()
        )?;
    }
    writeln!(w)?;
    Ok(())
}
