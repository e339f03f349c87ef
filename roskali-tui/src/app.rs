use std::sync::Arc;

use roskali_core::{
    model::{BinRecord, BinSnapshot, Classification, FillStatus, SourceId},
    route::RouteSequence,
    service::RoskaliService,
};

#[derive(Debug, Clone, Copy)]
pub(crate) enum Screen {
    SourceSelect,
    BinMonitor,
    Classify,
    RouteView,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StatusFilter {
    All,
    Low,
    Medium,
    High,
}

impl StatusFilter {
    pub(crate) fn next(self) -> Self {
        match self {
            StatusFilter::All => StatusFilter::Low,
            StatusFilter::Low => StatusFilter::Medium,
            StatusFilter::Medium => StatusFilter::High,
            StatusFilter::High => StatusFilter::All,
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "All",
            StatusFilter::Low => "Low (<50%)",
            StatusFilter::Medium => "Medium (50-80%)",
            StatusFilter::High => "High (>=80%)",
        }
    }

    pub(crate) fn matches(self, bin: &BinRecord) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Low => bin.status() == FillStatus::Low,
            StatusFilter::Medium => bin.status() == FillStatus::Medium,
            StatusFilter::High => bin.status() == FillStatus::High,
        }
    }
}

pub(crate) struct App {
    pub service: Arc<RoskaliService>,

    pub screen: Screen,
    pub sources: Vec<(SourceId, String)>,
    pub source_list_index: usize,
    pub selected_source: Option<SourceId>,

    pub snapshot: Option<BinSnapshot>,
    pub status_filter: StatusFilter,

    pub image_path_input: String,
    pub classification: Option<Classification>,

    pub threshold: f64,
    pub route: Option<RouteSequence>,

    pub is_loading: bool,
    pub error_message: Option<String>,
}

impl App {
    pub(crate) fn new(service: Arc<RoskaliService>) -> Self {
        let sources = service.sources();
        Self {
            service,
            screen: Screen::SourceSelect,
            sources,
            source_list_index: 0,
            selected_source: None,
            snapshot: None,
            status_filter: StatusFilter::All,
            image_path_input: String::new(),
            classification: None,
            threshold: 80.0,
            route: None,
            is_loading: false,
            error_message: None,
        }
    }

    pub(crate) fn select_current_source(&mut self) -> Option<SourceId> {
        let (id, _name) = self.sources.get(self.source_list_index)?;
        self.selected_source = Some(id.clone());
        self.screen = Screen::BinMonitor;
        Some(id.clone())
    }

    /// Bins of the current snapshot matching the monitor filter, fullest
    /// first.
    pub(crate) fn filtered_bins(&self) -> Vec<&BinRecord> {
        let Some(snapshot) = &self.snapshot else {
            return Vec::new();
        };

        let mut bins: Vec<&BinRecord> = snapshot
            .bins
            .iter()
            .filter(|bin| self.status_filter.matches(bin))
            .collect();
        bins.sort_by(|left, right| {
            right
                .fill_level
                .partial_cmp(&left.fill_level)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        bins
    }

    pub(crate) fn adjust_threshold(&mut self, delta: f64) {
        self.threshold = (self.threshold + delta).clamp(0.0, 100.0);
    }
}
