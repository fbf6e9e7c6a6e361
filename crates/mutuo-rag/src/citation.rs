//! Source-citation grouping and display formatting.
//!
//! Retrieval returns one [`SourceRef`] per chunk; for display they are grouped
//! by source document (first-seen order) and rendered one line per document,
//! listing every page/offset occurrence. Occurrence components whose value is
//! absent or zero are omitted, and an occurrence with nothing renderable is
//! dropped entirely — a document with no renderable occurrences still gets a
//! line with the file name alone.

use mutuo_types::SourceRef;

/// One occurrence of a source document among the retrieved chunks.
type Occurrence = (Option<u32>, Option<u32>);

/// Formats retrieved source references into display lines.
pub fn format_citations(sources: &[SourceRef]) -> Vec<String> {
    group_by_source(sources)
        .into_iter()
        .map(|(source, occurrences)| format_source_line(&source, &occurrences))
        .collect()
}

/// Groups occurrences by backslash-normalized source path, preserving the
/// order sources first appear in.
fn group_by_source(sources: &[SourceRef]) -> Vec<(String, Vec<Occurrence>)> {
    let mut groups: Vec<(String, Vec<Occurrence>)> = Vec::new();
    for source_ref in sources {
        let normalized = source_ref.source.replace('\\', "/");
        let occurrence = (source_ref.page, source_ref.start_index);
        match groups.iter_mut().find(|(source, _)| *source == normalized) {
            Some((_, occurrences)) => occurrences.push(occurrence),
            None => groups.push((normalized, vec![occurrence])),
        }
    }
    groups
}

/// Renders one display line for a source and its occurrences.
fn format_source_line(source: &str, occurrences: &[Occurrence]) -> String {
    let file_name = source.rsplit('/').next().unwrap_or(source);

    let rendered: Vec<String> = occurrences
        .iter()
        .filter_map(|occ| format_occurrence(*occ))
        .collect();

    if rendered.is_empty() {
        file_name.to_string()
    } else {
        format!("{} ({})", file_name, rendered.join(" - "))
    }
}

/// Renders a single occurrence, or `None` when neither component is
/// renderable. Zero means "unset" in the upstream metadata.
fn format_occurrence((page, start_index): Occurrence) -> Option<String> {
    let mut parts = Vec::new();
    if let Some(p) = page.filter(|p| *p != 0) {
        parts.push(format!("pagina {}", p));
    }
    if let Some(r) = start_index.filter(|r| *r != 0) {
        parts.push(format!("riga {}", r));
    }
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_by_source_and_joins_occurrences() {
        let sources = vec![
            SourceRef::new("docs/guida_mutui.pdf").with_page(2).with_start_index(40),
            SourceRef::new("docs/tassi.pdf").with_page(1),
            SourceRef::new("docs/guida_mutui.pdf").with_page(5),
        ];
        assert_eq!(
            format_citations(&sources),
            vec![
                "guida_mutui.pdf (pagina 2, riga 40 - pagina 5)".to_string(),
                "tassi.pdf (pagina 1)".to_string(),
            ]
        );
    }

    #[test]
    fn backslash_paths_collapse_into_one_group() {
        let sources = vec![
            SourceRef::new("docs\\guida.pdf").with_page(1),
            SourceRef::new("docs/guida.pdf").with_page(2),
        ];
        assert_eq!(
            format_citations(&sources),
            vec!["guida.pdf (pagina 1 - pagina 2)".to_string()]
        );
    }

    #[test]
    fn zero_and_none_components_are_omitted() {
        // Mixed null/zero/non-zero values: empty components must vanish and
        // no separator may dangle.
        let sources = vec![
            SourceRef::new("a.txt").with_page(0).with_start_index(7),
            SourceRef::new("b.txt").with_page(3).with_start_index(0),
            SourceRef::new("c.txt").with_page(0).with_start_index(0),
        ];
        let lines = format_citations(&sources);
        assert_eq!(
            lines,
            vec![
                "a.txt (riga 7)".to_string(),
                "b.txt (pagina 3)".to_string(),
                "c.txt".to_string(),
            ]
        );
        for line in &lines {
            assert!(!line.contains("( "), "dangling open: {}", line);
            assert!(!line.contains(", )"), "dangling comma: {}", line);
            assert!(!line.contains(" - )"), "dangling dash: {}", line);
            assert!(!line.contains("()"), "empty parens: {}", line);
        }
    }

    #[test]
    fn source_without_any_occurrence_info_lists_file_name_alone() {
        let sources = vec![SourceRef::new("docs/faq.txt")];
        assert_eq!(format_citations(&sources), vec!["faq.txt".to_string()]);
    }

    #[test]
    fn unrenderable_occurrences_are_dropped_but_renderable_ones_stay() {
        let sources = vec![
            SourceRef::new("d.txt"),
            SourceRef::new("d.txt").with_page(9),
        ];
        assert_eq!(format_citations(&sources), vec!["d.txt (pagina 9)".to_string()]);
    }
}
