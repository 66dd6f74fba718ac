use crate::data::columns;
use crate::data::filter::{self, FilterSelection};
use crate::data::model::Table;
use crate::theme::ChartTheme;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Chart pages of the central panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Overview,
    Correlations,
    WorkingHours,
    Sleep,
    Health,
    Demographics,
}

impl Tab {
    pub const ALL: [Tab; 6] = [
        Tab::Overview,
        Tab::Correlations,
        Tab::WorkingHours,
        Tab::Sleep,
        Tab::Health,
        Tab::Demographics,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Tab::Overview => "Overview",
            Tab::Correlations => "Correlations",
            Tab::WorkingHours => "Working Hours",
            Tab::Sleep => "Sleep",
            Tab::Health => "Health",
            Tab::Demographics => "Demographics",
        }
    }
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until the user opens a file).
    pub dataset: Option<Table>,

    /// The three filter controls.
    pub selection: FilterSelection,

    /// Observed experience range of the loaded data, bounding the sliders.
    pub experience_bounds: (i64, i64),

    /// The filtered view (cached; rebuilt on every control change).
    pub filtered: Option<Table>,

    /// Active chart page.
    pub active_tab: Tab,

    /// Chart styling passed to every renderer.
    pub theme: ChartTheme,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// Whether a file loading operation is in progress.
    pub loading: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            dataset: None,
            selection: FilterSelection::unrestricted((0, 40)),
            experience_bounds: (0, 40),
            filtered: None,
            active_tab: Tab::Overview,
            theme: ChartTheme::default(),
            status_message: None,
            loading: false,
        }
    }
}

impl AppState {
    /// Ingest a newly loaded dataset and reset the filters to "show all".
    pub fn set_dataset(&mut self, dataset: Table) {
        self.experience_bounds = dataset
            .integer_bounds(columns::EXPERIENCE_YEARS)
            .unwrap_or((0, 40));
        self.selection = FilterSelection::unrestricted(self.experience_bounds);
        self.filtered = Some(dataset.clone());
        self.dataset = Some(dataset);
        self.status_message = None;
        self.loading = false;
    }

    /// The table the charts should read: the filtered view once a dataset
    /// is loaded.
    pub fn view(&self) -> Option<&Table> {
        self.filtered.as_ref()
    }

    /// Recompute the filtered view after a control change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            let filtered = filter::apply(ds, &self.selection);
            log::debug!(
                "Filter change: {} of {} records match",
                filtered.len(),
                ds.len()
            );
            self.filtered = Some(filtered);
        }
    }

    /// Toggle one department in the multi-select.
    pub fn toggle_department(&mut self, value: &str) {
        if !self.selection.departments.remove(value) {
            self.selection.departments.insert(value.to_string());
        }
        self.refilter();
    }

    /// Toggle one gender in the multi-select.
    pub fn toggle_gender(&mut self, value: &str) {
        if !self.selection.genders.remove(value) {
            self.selection.genders.insert(value.to_string());
        }
        self.refilter();
    }

    /// Empty the department selection; empty means "no restriction".
    pub fn clear_departments(&mut self) {
        self.selection.departments.clear();
        self.refilter();
    }

    /// Empty the gender selection; empty means "no restriction".
    pub fn clear_genders(&mut self) {
        self.selection.genders.clear();
        self.refilter();
    }

    /// Update the experience range, keeping lo ≤ hi within the data bounds.
    pub fn set_experience(&mut self, lo: i64, hi: i64) {
        let (min, max) = self.experience_bounds;
        let lo = lo.clamp(min, max);
        let hi = hi.clamp(lo, max);
        self.selection.experience = (lo, hi);
        self.refilter();
    }
}
