//! Terminal output for the binder CLI.
//!
//! Every `render_*` function returns a `String` so the layout can be tested
//! without a terminal; `print_messages` is the only function that writes.
//!
//! Tree rows share one column layout:
//!
//! ```text
//! <indent><marker> <id>     <title, truncated>            <modified>
//! ```
//!
//! The marker flags the active section and page, the id column shows the
//! first [`ID_WIDTH`] chars of the entity id, and only pages carry a
//! modification time.

use binderapp::commands::{CmdMessage, MessageLevel};
use binderapp::model::{AppState, Page, Section, SidebarItemKind, Snapshot};
use binderapp::text::plain_text;
use chrono::{DateTime, Utc};
use colored::{ColoredString, Colorize};
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 16;
const ID_WIDTH: usize = 8;
const ACTIVE_MARKER: &str = "›";
const EXPANDED_GLYPH: &str = "▾";
const COLLAPSED_GLYPH: &str = "▸";
const RULE: &str = "--------------------------------";

pub(super) fn print_messages(messages: &[CmdMessage]) {
    for message in messages {
        match message.level {
            MessageLevel::Info => println!("{}", message.content.dimmed()),
            MessageLevel::Success => println!("{}", message.content.green()),
            MessageLevel::Warning => println!("{}", message.content.yellow()),
            MessageLevel::Error => println!("{}", message.content.red()),
        }
    }
}

/// The id column: an id cut to [`ID_WIDTH`] chars.
pub fn short_id(id: &str) -> String {
    id.chars().take(ID_WIDTH).collect()
}

struct Row<'a> {
    depth: usize,
    active: bool,
    id: &'a str,
    title: &'a str,
    modified: Option<i64>,
}

impl Row<'_> {
    fn render(&self, paint: impl Fn(&str) -> ColoredString) -> String {
        let indent = "  ".repeat(self.depth);
        let marker = if self.active { ACTIVE_MARKER } else { " " };
        let id = format!("{:<width$}", short_id(self.id), width = ID_WIDTH);
        let time = self.modified.map(format_time_ago).unwrap_or_default();

        let fixed = indent.width() + marker.width() + 1 + id.width() + 1 + time.width();
        let available = LINE_WIDTH.saturating_sub(fixed);
        let title = truncate_to_width(self.title, available);
        let padding = if time.is_empty() {
            0
        } else {
            available.saturating_sub(title.width())
        };

        format!(
            "{}{} {} {}{}{}\n",
            indent,
            marker.green().bold(),
            id.dimmed(),
            paint(&title),
            " ".repeat(padding),
            time.dimmed()
        )
    }
}

/// The active notebook as a tree: sidebar items in order, group members
/// under their group, pages under their section with subpages indented.
pub fn render_tree(snapshot: &Snapshot) -> String {
    let Some(notebook) = snapshot.active_notebook() else {
        return "No notebook selected.\n".to_string();
    };

    let mut out = Row {
        depth: 0,
        active: false,
        id: &notebook.id,
        title: &notebook.title,
        modified: None,
    }
    .render(|t| t.bold().underline());

    if notebook.sidebar_order.is_empty() {
        out.push_str(&format!("  {}\n", "No sections.".dimmed()));
    }

    for item in &notebook.sidebar_order {
        match item.kind {
            SidebarItemKind::Section => {
                if let Some(section) = notebook.section(&item.id) {
                    render_section(&mut out, snapshot, section, 1);
                }
            }
            SidebarItemKind::Group => {
                let Some(group) = notebook.group(&item.id) else {
                    continue;
                };
                let members: Vec<&Section> = notebook.group_members(&group.id).collect();
                let title = if group.is_collapsed {
                    format!(
                        "{} {} ({} sections)",
                        COLLAPSED_GLYPH,
                        group.title,
                        members.len()
                    )
                } else {
                    format!("{} {}", EXPANDED_GLYPH, group.title)
                };
                out.push_str(
                    &Row {
                        depth: 1,
                        active: false,
                        id: &group.id,
                        title: &title,
                        modified: None,
                    }
                    .render(|t| t.cyan().bold()),
                );
                if !group.is_collapsed {
                    for section in members {
                        render_section(&mut out, snapshot, section, 2);
                    }
                }
            }
        }
    }
    out
}

fn render_section(out: &mut String, snapshot: &Snapshot, section: &Section, depth: usize) {
    let active = snapshot.active_section_id.as_deref() == Some(section.id.as_str());
    out.push_str(
        &Row {
            depth,
            active,
            id: &section.id,
            title: &section.title,
            modified: None,
        }
        .render(|t| paint_section(t, &section.color)),
    );

    if section.pages.is_empty() {
        out.push_str(&format!(
            "{}{}\n",
            "  ".repeat(depth + 1),
            "(no pages)".dimmed()
        ));
    }

    for page in &section.pages {
        let active = snapshot.active_page_id.as_deref() == Some(page.id.as_str());
        let depth = depth + 1 + usize::from(page.is_subpage);
        out.push_str(
            &Row {
                depth,
                active,
                id: &page.id,
                title: page.display_title(),
                modified: Some(page.last_modified),
            }
            .render(|t| if active { t.bold() } else { t.normal() }),
        );
    }
}

/// One page in full: header, plain-text body, then each copy block.
pub fn render_page(section: &Section, page: &Page) -> String {
    let mut out = format!(
        "{} {}\n",
        short_id(&page.id).dimmed(),
        page.display_title().bold()
    );
    out.push_str(&format!(
        "{} {} {}\n",
        paint_section(&section.title, &section.color),
        "·".dimmed(),
        format_time_ago(page.last_modified).trim().dimmed()
    ));
    out.push_str(RULE);
    out.push('\n');

    let body = plain_text(&page.content);
    let body = body.trim();
    if body.is_empty() {
        out.push_str(&format!("{}\n", "(empty page)".dimmed()));
    } else {
        out.push_str(body);
        out.push('\n');
    }

    out.push_str(RULE);
    out.push('\n');
    for (i, block) in page.copy_areas.iter().enumerate() {
        out.push_str(&format!(
            "{:>2}. {} {}\n",
            i + 1,
            short_id(&block.id).dimmed(),
            block.display_title().yellow()
        ));
        let content = plain_text(&block.content);
        for line in content.lines() {
            out.push_str(&format!("    {}\n", line));
        }
    }
    out
}

/// Numbered search results; the current result carries the active marker.
pub fn render_search(state: &AppState) -> String {
    let mut out = String::new();
    for (i, found) in state.search_results.iter().enumerate() {
        let current = state.current_search_result_index == Some(i);
        let marker = if current { ACTIVE_MARKER } else { " " };
        let page_title = state
            .snapshot
            .find_page(&found.page_id)
            .map(|(_, page)| page.display_title())
            .unwrap_or_default();

        let prefix = format!("{}{:>3}. ", marker, i + 1);
        let label = format!(" [{}]", found.label());
        let available = LINE_WIDTH.saturating_sub(prefix.width() + page_title.width() + label.width() + 1);
        let preview = truncate_to_width(&found.preview.replace('\n', " "), available);

        out.push_str(&format!(
            "{}{}{} {}\n",
            prefix.green(),
            page_title.bold(),
            label.dimmed(),
            preview
        ));
    }
    out
}

fn paint_section(title: &str, color: &str) -> ColoredString {
    match parse_hex(color) {
        Some((r, g, b)) => title.truecolor(r, g, b).bold(),
        None => title.bold(),
    }
}

/// `#rrggbb` to its channels.
fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(millis: i64) -> String {
    let modified = DateTime::<Utc>::from_timestamp_millis(millis).unwrap_or_else(Utc::now);
    let elapsed = Utc::now()
        .signed_duration_since(modified)
        .to_std()
        .unwrap_or_default();

    let time_str = Formatter::new().convert(elapsed);
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use binderapp::model::{
        CopyBlock, MatchField, Notebook, SearchMatch, SectionGroup, SidebarItem,
    };

    fn plain() {
        colored::control::set_override(false);
    }

    fn page(id: &str, title: &str, is_subpage: bool) -> Page {
        Page {
            id: id.to_string(),
            title: title.to_string(),
            is_subpage,
            ..Page::new()
        }
    }

    fn snapshot() -> Snapshot {
        let mut notebook = Notebook::new("Work");
        notebook.id = "nb-000001".to_string();

        let mut loose = Section::new("Inbox", "#3b82f6");
        loose.id = "sec-inbox".to_string();
        loose.pages = vec![page("pg-lead", "Lead", false), page("pg-sub", "Detail", true)];

        let mut group = SectionGroup::new("Archive");
        group.id = "grp-archive".to_string();
        let mut member = Section::new("Old", "not-a-color");
        member.id = "sec-old".to_string();
        member.group_id = Some(group.id.clone());

        notebook.sidebar_order = vec![SidebarItem::section(&loose.id), SidebarItem::group(&group.id)];
        notebook.sections = vec![loose, member];
        notebook.section_groups = vec![group];

        Snapshot {
            active_notebook_id: Some(notebook.id.clone()),
            active_section_id: Some("sec-inbox".to_string()),
            active_page_id: Some("pg-sub".to_string()),
            notebooks: vec![notebook],
        }
    }

    #[test]
    fn tree_nests_groups_and_subpages() {
        plain();
        let tree = render_tree(&snapshot());
        let lines: Vec<&str> = tree.lines().collect();

        assert!(lines[0].starts_with("  nb-00000 Work"));
        assert!(lines[1].starts_with("  › sec-inbo Inbox"));
        assert!(lines[2].starts_with("      pg-lead  Lead"));
        assert!(lines[3].starts_with("      › pg-sub   Detail"));
        assert!(lines[4].starts_with("    grp-arch ▾ Archive"));
        assert!(lines[5].starts_with("      sec-old  Old"));
        assert!(lines[6].contains("(no pages)"));
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn collapsed_groups_hide_members() {
        plain();
        let mut snapshot = snapshot();
        snapshot.notebooks[0].section_groups[0].is_collapsed = true;
        let tree = render_tree(&snapshot);

        assert!(tree.contains("▸ Archive (1 sections)"));
        assert!(!tree.contains("sec-old"));
    }

    #[test]
    fn rows_stay_within_the_line_width() {
        plain();
        let mut snapshot = snapshot();
        snapshot.notebooks[0].sections[0].pages[0].title = "界".repeat(80);
        let tree = render_tree(&snapshot);

        let row = tree.lines().find(|l| l.contains("pg-lead")).unwrap();
        assert!(row.contains('…'));
        assert!(row.width() <= LINE_WIDTH);
    }

    #[test]
    fn page_view_lists_copy_blocks() {
        plain();
        let snapshot = snapshot();
        let (_, section) = snapshot.find_section("sec-inbox").unwrap();
        let mut page = page("pg-lead", "Lead", false);
        page.content = "<p>Hello &amp; welcome</p>".to_string();
        page.copy_areas = vec![
            CopyBlock {
                id: "cb-one".to_string(),
                title: String::new(),
                content: "first\nsecond".to_string(),
            },
            CopyBlock {
                id: "cb-two".to_string(),
                title: "Signature".to_string(),
                content: String::new(),
            },
        ];

        let out = render_page(section, &page);
        assert!(out.starts_with("pg-lead Lead\n"));
        assert!(out.contains("Hello & welcome\n"));
        assert!(out.contains(" 1. cb-one Copy Block\n    first\n    second\n"));
        assert!(out.contains(" 2. cb-two Signature\n"));
    }

    #[test]
    fn search_results_mark_the_current_one() {
        plain();
        let mut state = AppState::new(snapshot());
        let found = |start: usize, field: MatchField, block: Option<usize>| SearchMatch {
            id: format!("pg-lead-x-{}", start),
            notebook_id: "nb-000001".to_string(),
            section_id: "sec-inbox".to_string(),
            page_id: "pg-lead".to_string(),
            field_name: field,
            copy_area_index: block,
            start,
            preview: "a needle here".to_string(),
        };
        state.search_results = vec![
            found(0, MatchField::Title, None),
            found(3, MatchField::CopyArea, Some(1)),
        ];
        state.current_search_result_index = Some(1);

        let out = render_search(&state);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "   1. Lead [title] a needle here");
        assert_eq!(lines[1], "›  2. Lead [copy-block-2] a needle here");
    }

    #[test]
    fn parses_hex_colors() {
        assert_eq!(parse_hex("#8b5cf6"), Some((0x8b, 0x5c, 0xf6)));
        assert_eq!(parse_hex("8b5cf6"), None);
        assert_eq!(parse_hex("#fff"), None);
        assert_eq!(parse_hex("#zzzzzz"), None);
    }

    #[test]
    fn truncation_counts_display_width() {
        assert_eq!(truncate_to_width("hello", 10), "hello");
        assert_eq!(truncate_to_width("hello world", 6), "hello…");
        assert_eq!(truncate_to_width("日本語テキスト", 7), "日本語…");
    }
}
