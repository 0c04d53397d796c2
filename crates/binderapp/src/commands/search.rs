//! Full-text search across every notebook, and navigation over the results.
//!
//! Matching is a case-insensitive substring scan over:
//!
//! - the page title (first occurrence only),
//! - the plain text of the page body (every non-overlapping occurrence),
//! - the plain text of each copy block (every non-overlapping occurrence).
//!
//! Results are listed in discovery order: notebook, section, page, then field
//! (title, body, copy blocks by index), then offset.
//!
//! Results are a snapshot of the moment the search ran. Mutations never
//! refresh them; a jump to a match whose page has since been deleted is
//! ignored.

use super::selection;
use crate::model::{AppState, MatchField, Page, SearchMatch, Snapshot};
use crate::text::{find_all, find_first, fold, plain_text, preview};

pub const DEFAULT_PREVIEW_RADIUS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOptions {
    /// Chars of context kept on each side of a match in its preview.
    pub preview_radius: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            preview_radius: DEFAULT_PREVIEW_RADIUS,
        }
    }
}

/// What [`perform`] did, so the caller can give feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The term was blank; search state was reset.
    Cleared,
    Found(usize),
    NotFound,
}

struct Owners<'a> {
    notebook_id: &'a str,
    section_id: &'a str,
    page_id: &'a str,
}

impl Owners<'_> {
    fn found(
        &self,
        field: MatchField,
        copy_area_index: Option<usize>,
        start: usize,
        preview: String,
    ) -> SearchMatch {
        let id = match (field, copy_area_index) {
            (MatchField::Title, _) => format!("{}-title-{}", self.page_id, start),
            (MatchField::Content, _) => format!("{}-content-{}", self.page_id, start),
            (MatchField::CopyArea, index) => {
                format!("{}-copyArea-{}-{}", self.page_id, index.unwrap_or(0), start)
            }
        };
        SearchMatch {
            id,
            notebook_id: self.notebook_id.to_string(),
            section_id: self.section_id.to_string(),
            page_id: self.page_id.to_string(),
            field_name: field,
            copy_area_index,
            start,
            preview,
        }
    }
}

/// Scans the whole forest for `term`. A blank term finds nothing.
pub fn find_matches(snapshot: &Snapshot, term: &str, options: &SearchOptions) -> Vec<SearchMatch> {
    let needle = fold(term);
    if needle.is_empty() {
        return Vec::new();
    }

    let mut matches = Vec::new();
    for notebook in &snapshot.notebooks {
        for section in &notebook.sections {
            for page in &section.pages {
                let owners = Owners {
                    notebook_id: &notebook.id,
                    section_id: &section.id,
                    page_id: &page.id,
                };
                scan_page(page, &owners, &needle, options, &mut matches);
            }
        }
    }
    matches
}

fn scan_page(
    page: &Page,
    owners: &Owners<'_>,
    needle: &[char],
    options: &SearchOptions,
    matches: &mut Vec<SearchMatch>,
) {
    let radius = options.preview_radius;

    let title: Vec<char> = page.title.chars().collect();
    if let Some(start) = find_first(&fold(&page.title), needle) {
        let window = preview(&title, start, needle.len(), radius);
        matches.push(owners.found(MatchField::Title, None, start, window));
    }

    let body = plain_text(&page.content);
    let chars: Vec<char> = body.chars().collect();
    for start in find_all(&fold(&body), needle) {
        let window = preview(&chars, start, needle.len(), radius);
        matches.push(owners.found(MatchField::Content, None, start, window));
    }

    for (index, block) in page.copy_areas.iter().enumerate() {
        let text = plain_text(&block.content);
        let chars: Vec<char> = text.chars().collect();
        for start in find_all(&fold(&text), needle) {
            let window = preview(&chars, start, needle.len(), radius);
            matches.push(owners.found(MatchField::CopyArea, Some(index), start, window));
        }
    }
}

/// Runs a search and jumps to the first hit. A blank term clears the search.
pub fn perform(mut state: AppState, term: &str, options: &SearchOptions) -> (AppState, SearchOutcome) {
    if term.trim().is_empty() {
        return (clear(state), SearchOutcome::Cleared);
    }

    let results = find_matches(&state.snapshot, term, options);
    state.search_term = term.to_string();
    let Some(first) = results.first().cloned() else {
        state.search_results = Vec::new();
        state.current_search_result_index = None;
        return (state, SearchOutcome::NotFound);
    };

    let count = results.len();
    state.search_results = results;
    state.current_search_result_index = Some(0);
    (jump_to(state, &first), SearchOutcome::Found(count))
}

pub fn clear(mut state: AppState) -> AppState {
    state.search_term.clear();
    state.search_results.clear();
    state.current_search_result_index = None;
    state
}

/// Advances to the next result, wrapping after the last, and jumps to it.
pub fn next(mut state: AppState) -> AppState {
    let count = state.search_results.len();
    if count == 0 {
        return state;
    }
    let index = state
        .current_search_result_index
        .map_or(0, |i| (i + 1) % count);
    state.current_search_result_index = Some(index);
    let target = state.search_results[index].clone();
    jump_to(state, &target)
}

/// Selects the page a match points at, with its section and notebook. The
/// term and the result list are left alone; the current index follows the
/// match when it is one of the listed results.
pub fn jump_to(mut state: AppState, found: &SearchMatch) -> AppState {
    if state.snapshot.find_page(&found.page_id).is_none() {
        return state;
    }
    state.snapshot = selection::set_active_page(state.snapshot, &found.page_id);
    if let Some(index) = state.search_results.iter().position(|m| m.id == found.id) {
        state.current_search_result_index = Some(index);
    }
    state
}

pub fn jump_to_index(state: AppState, index: usize) -> AppState {
    match state.search_results.get(index).cloned() {
        Some(found) => jump_to(state, &found),
        None => state,
    }
}
