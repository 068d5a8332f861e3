use crate::filters::{apply_filters, FilterCriteria, FilterOptions};
use crate::loader::{Dataset, LoadError};
use crate::pager::Pager;
use crate::record::Record;
use crate::render::{PageView, ViewRenderer};
use crate::stats::DatasetStats;
use anyhow::Result;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Ready,
    Failed(String),
}

/// Everything the view shows, as a plain value.
///
/// `filtered` holds indices into `records`, so the filtered set is always a
/// subset of the full dataset and keeps its order.
#[derive(Debug, Clone)]
pub struct ViewState {
    records: Arc<[Record]>,
    filtered: Vec<usize>,
    criteria: FilterCriteria,
    pager: Pager,
    stats: Option<DatasetStats>,
    options: FilterOptions,
    status: LoadStatus,
}

impl Default for ViewState {
    fn default() -> Self {
        Self::loading()
    }
}

impl ViewState {
    pub fn loading() -> Self {
        Self {
            records: Arc::from(Vec::new()),
            filtered: Vec::new(),
            criteria: FilterCriteria::default(),
            pager: Pager::first(0),
            stats: None,
            options: FilterOptions::default(),
            status: LoadStatus::Loading,
        }
    }

    pub fn ready(dataset: Dataset) -> Self {
        let Dataset { records, stats } = dataset;
        let options = FilterOptions::derive(&records);
        let filtered: Vec<usize> = (0..records.len()).collect();
        Self {
            pager: Pager::first(filtered.len()),
            records: Arc::from(records),
            filtered,
            criteria: FilterCriteria::default(),
            stats: Some(stats),
            options,
            status: LoadStatus::Ready,
        }
    }

    /// Totals stay unset and selectors stay empty.
    pub fn failed(error: &LoadError) -> Self {
        Self {
            status: LoadStatus::Failed(error.to_string()),
            ..Self::loading()
        }
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn is_ready(&self) -> bool {
        self.status == LoadStatus::Ready
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn stats(&self) -> Option<&DatasetStats> {
        self.stats.as_ref()
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    pub fn pager(&self) -> Pager {
        self.pager
    }

    pub fn current_page(&self) -> usize {
        self.pager.current_page()
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn filtered_records(&self) -> impl Iterator<Item = &Record> + '_ {
        self.filtered.iter().map(move |&idx| &self.records[idx])
    }

    pub fn page_records(&self) -> Vec<&Record> {
        let range = self.pager.range();
        self.filtered_records()
            .skip(range.start)
            .take(range.len())
            .collect()
    }

    fn with_criteria(mut self, criteria: FilterCriteria) -> Self {
        self.filtered = apply_filters(&self.records, &criteria);
        self.pager = Pager::first(self.filtered.len());
        debug!(
            matches = self.filtered.len(),
            total = self.records.len(),
            "filters applied"
        );
        self.criteria = criteria;
        self
    }
}

#[derive(Debug)]
pub enum Action {
    Loaded(Result<Dataset, LoadError>),
    SetYears(BTreeSet<String>),
    SetFormats(BTreeSet<String>),
    SetSearch(String),
    NextPage,
    PreviousPage,
    /// Jumps straight to a page; out-of-range values land on the nearest valid page.
    GoToPage(usize),
    ResetFilters,
}

/// Pure transition. Filter changes always land on page 1; paging past either end is a no-op.
pub fn reduce(state: ViewState, action: Action) -> ViewState {
    match action {
        Action::Loaded(Ok(dataset)) => ViewState::ready(dataset),
        Action::Loaded(Err(err)) => {
            warn!(error = %err, "dataset failed to load");
            ViewState::failed(&err)
        }
        _ if !state.is_ready() => state,
        Action::SetYears(years) => {
            let criteria = FilterCriteria {
                years,
                ..state.criteria.clone()
            };
            state.with_criteria(criteria)
        }
        Action::SetFormats(formats) => {
            let criteria = FilterCriteria {
                formats,
                ..state.criteria.clone()
            };
            state.with_criteria(criteria)
        }
        Action::SetSearch(search) => {
            let criteria = FilterCriteria {
                search,
                ..state.criteria.clone()
            };
            state.with_criteria(criteria)
        }
        Action::ResetFilters => state.with_criteria(FilterCriteria::default()),
        Action::NextPage => ViewState {
            pager: state.pager.next(),
            ..state
        },
        Action::PreviousPage => ViewState {
            pager: state.pager.previous(),
            ..state
        },
        Action::GoToPage(page) => ViewState {
            pager: Pager::new(page, state.filtered.len()),
            ..state
        },
    }
}

/// Owns the state and pushes a fresh [`PageView`] to its renderer after every dispatch.
pub struct ViewStore<R: ViewRenderer> {
    state: ViewState,
    renderer: R,
}

impl<R: ViewRenderer> ViewStore<R> {
    pub fn new(state: ViewState, mut renderer: R) -> Result<Self> {
        renderer.render(&PageView::build(&state))?;
        Ok(Self { state, renderer })
    }

    pub fn dispatch(&mut self, action: Action) -> Result<()> {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action);
        self.renderer.render(&PageView::build(&self.state))
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }
}
