//! Rendering port. The state layer produces a [`PageView`]; anything that can show
//! one implements [`ViewRenderer`].

use crate::filters::ALL;
use crate::i18n::{t, t_with_args};
use crate::record::Record;
use crate::state::{LoadStatus, ViewState};
use anyhow::Result;
use std::collections::BTreeSet;

pub trait ViewRenderer {
    fn render(&mut self, view: &PageView) -> Result<()>;
}

/// Column message keys, in display order.
pub const COLUMNS: [&str; 8] = [
    "column_year",
    "column_rank",
    "column_title",
    "column_channel",
    "column_tags",
    "column_runtime",
    "column_uploaded",
    "column_format",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub text: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    pub year: String,
    pub rank: String,
    pub title: Link,
    pub channel: Link,
    pub tags: Vec<String>,
    pub run_time: String,
    pub upload_date: String,
    pub format: String,
}

impl From<&Record> for RowView {
    fn from(record: &Record) -> Self {
        Self {
            year: record.year.to_string(),
            rank: record.rank.to_string(),
            title: Link {
                text: record.title.clone(),
                href: record.url.clone(),
            },
            channel: Link {
                text: record.channel.clone(),
                href: record.channel_url.clone(),
            },
            tags: record.tags.clone(),
            run_time: record.run_time.clone(),
            upload_date: record.upload_date.clone(),
            format: record.format.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableBody {
    Loading,
    Failed(String),
    /// Single placeholder row spanning every column.
    NoResults,
    Rows(Vec<RowView>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Empty for the "all" option.
    pub value: String,
    pub selected: bool,
}

impl SelectOption {
    pub fn is_all(&self) -> bool {
        self.value == ALL
    }

    /// `all_key` names the message used for the "all" option.
    pub fn label(&self, all_key: &str) -> String {
        if self.is_all() {
            t(all_key)
        } else {
            self.value.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub total_videos: usize,
    pub total_runtime: String,
}

/// One materialized frame of the viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub summary: Option<Summary>,
    pub year_options: Vec<SelectOption>,
    pub format_options: Vec<SelectOption>,
    pub search: String,
    pub body: TableBody,
    pub current_page: usize,
    pub total_pages: usize,
    pub item_count: usize,
    /// Zero-based dataset position of the first row on this page.
    pub first_index: usize,
    pub previous_enabled: bool,
    pub next_enabled: bool,
}

impl PageView {
    pub fn build(state: &ViewState) -> Self {
        let pager = state.pager();
        let criteria = state.criteria();

        let body = match state.status() {
            LoadStatus::Loading => TableBody::Loading,
            LoadStatus::Failed(message) => TableBody::Failed(message.clone()),
            LoadStatus::Ready => {
                let rows: Vec<RowView> = state
                    .page_records()
                    .into_iter()
                    .map(RowView::from)
                    .collect();
                if rows.is_empty() {
                    TableBody::NoResults
                } else {
                    TableBody::Rows(rows)
                }
            }
        };

        let (year_options, format_options) = if state.is_ready() {
            (
                select_options(&state.options().years, &criteria.years),
                select_options(&state.options().formats, &criteria.formats),
            )
        } else {
            (Vec::new(), Vec::new())
        };

        Self {
            summary: state.stats().map(|stats| Summary {
                total_videos: stats.total_videos,
                total_runtime: stats.total_runtime(),
            }),
            year_options,
            format_options,
            search: criteria.search.clone(),
            body,
            current_page: pager.current_page(),
            total_pages: pager.display_pages(),
            item_count: pager.total_items(),
            first_index: pager.range().start,
            previous_enabled: pager.has_previous(),
            next_enabled: pager.has_next(),
        }
    }

    pub fn page_info(&self) -> String {
        t_with_args(
            "page_info",
            &[
                ("current", &self.current_page.to_string()),
                ("total", &self.total_pages.to_string()),
            ],
        )
    }

    pub fn item_count_text(&self) -> String {
        t_with_args("item_count", &[("count", &self.item_count.to_string())])
    }

    pub fn rows(&self) -> &[RowView] {
        match &self.body {
            TableBody::Rows(rows) => rows,
            _ => &[],
        }
    }
}

/// The "all" option comes first and is selected when nothing narrower is.
fn select_options(values: &[String], selected: &BTreeSet<String>) -> Vec<SelectOption> {
    let all_selected = selected.is_empty() || selected.contains(ALL);
    std::iter::once(SelectOption {
        value: ALL.to_string(),
        selected: all_selected,
    })
    .chain(values.iter().map(|value| SelectOption {
        value: value.clone(),
        selected: !all_selected && selected.contains(value),
    }))
    .collect()
}

/// Criteria expressed by a set of selector options.
pub fn selection_of(options: &[SelectOption]) -> BTreeSet<String> {
    if options.iter().any(|o| o.is_all() && o.selected) {
        return BTreeSet::new();
    }
    options
        .iter()
        .filter(|o| o.selected)
        .map(|o| o.value.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::Dataset;
    use crate::record::sample;
    use crate::state::{reduce, Action};

    fn state_with(len: usize) -> ViewState {
        let records = (0..len)
            .map(|i| sample(2020 + (i % 3) as i64, i as i64 + 1, &format!("Video {}", i + 1), "Essay"))
            .collect();
        reduce(
            ViewState::loading(),
            Action::Loaded(Dataset::from_records(records)),
        )
    }

    #[test]
    fn first_page_of_twenty_five() {
        let view = PageView::build(&state_with(25));

        assert_eq!(view.rows().len(), 20);
        assert_eq!(view.rows()[0].title.text, "Video 1");
        assert_eq!(view.rows()[19].title.text, "Video 20");
        assert_eq!(view.current_page, 1);
        assert_eq!(view.total_pages, 2);
        assert_eq!(view.item_count, 25);
        assert!(!view.previous_enabled);
        assert!(view.next_enabled);
        assert_eq!(view.summary.as_ref().map(|s| s.total_videos), Some(25));
        assert_eq!(view.summary.as_ref().map(|s| s.total_runtime.as_str()), Some("4:10:00"));
    }

    #[test]
    fn second_page_starts_at_twenty() {
        let view = PageView::build(&reduce(state_with(25), Action::NextPage));
        assert_eq!(view.first_index, 20);
        assert_eq!(view.rows().len(), 5);
        assert!(view.previous_enabled);
        assert!(!view.next_enabled);
    }

    #[test]
    fn empty_result_is_one_placeholder_row() {
        let state = reduce(state_with(25), Action::SetSearch("zzz".to_string()));
        let view = PageView::build(&state);

        assert_eq!(view.body, TableBody::NoResults);
        assert!(view.rows().is_empty());
        assert_eq!(view.total_pages, 1);
        assert!(!view.previous_enabled);
        assert!(!view.next_enabled);
    }

    #[test]
    fn empty_dataset_is_one_placeholder_row() {
        let view = PageView::build(&state_with(0));
        assert_eq!(view.body, TableBody::NoResults);
        assert_eq!(view.summary.as_ref().map(|s| s.total_runtime.as_str()), Some("0:00:00"));
    }

    #[test]
    fn failed_load_renders_error_without_totals_or_options() {
        let err = Dataset::from_json(b"[1, 2]").unwrap_err();
        let view = PageView::build(&ViewState::failed(&err));

        assert!(matches!(view.body, TableBody::Failed(_)));
        assert!(view.rows().is_empty());
        assert!(view.summary.is_none());
        assert!(view.year_options.is_empty());
        assert!(view.format_options.is_empty());
    }

    #[test]
    fn options_mark_the_active_selection() {
        let view = PageView::build(&state_with(6));
        let years: Vec<&str> = view.year_options.iter().map(|o| o.value.as_str()).collect();
        assert_eq!(years, vec!["", "2022", "2021", "2020"]);
        assert!(view.year_options[0].selected);

        let selected: BTreeSet<String> = ["2021".to_string()].into();
        let state = reduce(state_with(6), Action::SetYears(selected.clone()));
        let view = PageView::build(&state);
        assert!(!view.year_options[0].selected);
        assert!(view.year_options[2].selected);
        assert_eq!(selection_of(&view.year_options), selected);
        assert_eq!(&selection_of(&view.year_options), &state.criteria().years);
    }

    #[test]
    fn rows_carry_links_and_tags() {
        let mut record = sample(2020, 4, "Title", "Essay");
        record.tags = vec!["one".to_string(), "two".to_string()];
        let row = RowView::from(&record);

        assert_eq!(row.title.href, record.url);
        assert_eq!(row.channel.text, "Some Channel");
        assert_eq!(row.channel.href, record.channel_url);
        assert_eq!(row.tags, vec!["one", "two"]);
        assert_eq!(row.rank, "4");
    }
}
