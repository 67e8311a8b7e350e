//! Search for a pattern inside a highlighted function and every function it
//! reaches through the call graph.

use regex::{Regex, RegexBuilder};
use serde::Serialize;
use tracing::debug;
use crate::ast::{AbstractAST, FunctionDef, Span};
use crate::error::SearchError;
use crate::graph::CallGraph;
use crate::query::GraphQuery;

/// Longest line excerpt reported for a match
pub const MAX_LINE_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchMatch {
    pub function: String,
    /// 1-based
    pub line: usize,
    pub text: String,
    pub in_highlighted: bool,
}

/// Compile a case-insensitive search pattern
///
/// # Errors
///
/// Returns an error if the pattern is not a valid regular expression.
pub fn compile_pattern(pattern: &str) -> Result<Regex, SearchError> {
    Ok(RegexBuilder::new(pattern).case_insensitive(true).build()?)
}

/// Matches of `pattern` in `highlighted` first, then in its nested calls.
///
/// Matches inside nested functions that lie within the highlighted
/// function's own span are reported once, as highlighted matches.
///
/// # Errors
///
/// Returns an error if `highlighted` is not defined in `ast`, or has no
/// source span (the `<module>` pseudo function).
pub fn recursive_search(
    source: &str,
    ast: &AbstractAST,
    graph: &CallGraph,
    highlighted: &str,
    pattern: &Regex,
) -> Result<Vec<SearchMatch>, SearchError> {
    let selected = ast
        .get_function(highlighted)
        .or_else(|| ast.functions.iter().find(|f| f.short_name() == highlighted))
        .ok_or_else(|| SearchError::HighlightedNotFound(highlighted.to_string()))?;
    let selected_span = selected
        .span
        .ok_or_else(|| SearchError::NoSpan(selected.name.clone()))?;

    let mut matches = Vec::new();
    let mut seen: Vec<(usize, usize)> = Vec::new();
    collect_matches(source, selected, selected_span, pattern, true, |_, _| true, &mut seen, &mut matches);

    let nested = graph.nested_calls(&selected.fn_id())?;
    debug!(function = %selected.name, nested = nested.len(), "searching nested calls");

    for id in nested {
        let Some(node) = graph.get_node(&id) else { continue };
        if node.is_external || node.metadata.name == selected.name {
            continue;
        }
        let Some(span) = node.metadata.span else { continue };
        collect_matches(
            source,
            &node.metadata,
            span,
            pattern,
            false,
            |start, end| !selected_span.contains(start, end),
            &mut seen,
            &mut matches,
        );
    }

    Ok(matches)
}

#[allow(clippy::too_many_arguments)]
fn collect_matches(
    source: &str,
    func: &FunctionDef,
    span: Span,
    pattern: &Regex,
    in_highlighted: bool,
    keep: impl Fn(usize, usize) -> bool,
    seen: &mut Vec<(usize, usize)>,
    out: &mut Vec<SearchMatch>,
) {
    let Some(content) = source.get(span.start_byte..span.end_byte) else {
        return;
    };

    for found in pattern.find_iter(content) {
        if found.as_str().is_empty() {
            continue;
        }
        let start = span.start_byte + found.start();
        let end = span.start_byte + found.end();
        if !keep(start, end) || seen.contains(&(start, end)) {
            continue;
        }
        seen.push((start, end));

        let line = span.start_line + content[..found.start()].matches('\n').count();
        out.push(SearchMatch {
            function: func.name.clone(),
            line,
            text: line_for_match(content, found.start(), found.len(), MAX_LINE_LENGTH),
            in_highlighted,
        });
    }
}

/// The trimmed line holding a match, shortened around the match when longer
/// than `max_len` characters
#[must_use]
pub fn line_for_match(text: &str, index: usize, match_len: usize, max_len: usize) -> String {
    let line_start = text[..index].rfind('\n').map_or(0, |i| i + 1);
    let line_end = text[index + match_len..]
        .find('\n')
        .map_or(text.len(), |i| index + match_len + i);
    let line: Vec<char> = text[line_start..line_end].chars().collect();

    if line.len() <= max_len {
        return line.iter().collect::<String>().trim().to_string();
    }

    let offset_in_line = text[line_start..index].chars().count();
    let start = offset_in_line.saturating_sub(max_len / 2);
    let end = (start + max_len).min(line.len());

    let mut excerpt = String::new();
    if start > 0 {
        excerpt.push_str("...");
    }
    excerpt.extend(&line[start..end]);
    if end < line.len() {
        excerpt.push_str("...");
    }
    excerpt.trim().to_string()
}
