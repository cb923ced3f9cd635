use studio_engine::{ResolutionState, option_for_value};
use studio_types::SelectOption;

/// Spinner frames shown while options are loading.
pub const THROBBER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// UI state for the option picker.
#[derive(Debug, Clone)]
pub struct PickerState {
    title: String,
    resolution: ResolutionState,
    query: String,
    /// Indices into the ready option list that match `query`, in list order.
    filtered: Vec<usize>,
    pub selected_index: usize,
    current_value: Option<String>,
    throbber_idx: usize,
}

impl PickerState {
    /// Build a picker for a field, remembering the value it holds today.
    pub fn new(title: impl Into<String>, current_value: Option<String>) -> Self {
        Self {
            title: title.into(),
            resolution: ResolutionState::Idle,
            query: String::new(),
            filtered: Vec::new(),
            selected_index: 0,
            current_value: current_value.filter(|value| !value.is_empty()),
            throbber_idx: 0,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn resolution(&self) -> &ResolutionState {
        &self.resolution
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn current_value(&self) -> Option<&str> {
        self.current_value.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.resolution, ResolutionState::Loading)
    }

    /// Take a newly published resolution state.
    ///
    /// When options arrive the selection lands on the field's current value
    /// if it is among them.
    pub fn apply_resolution(&mut self, state: ResolutionState) {
        let became_ready = matches!(state, ResolutionState::Ready(_));
        self.resolution = state;
        self.refilter();
        if became_ready {
            self.highlight_current_value();
        }
    }

    /// Every option of the ready list, ignoring the query.
    pub fn all_options(&self) -> &[SelectOption] {
        self.resolution.options().unwrap_or_default()
    }

    /// Options matching the query, in list order.
    pub fn visible_options(&self) -> Vec<&SelectOption> {
        let options = self.all_options();
        self.filtered.iter().filter_map(|&index| options.get(index)).collect()
    }

    /// Option under the cursor, if any.
    pub fn selected_option(&self) -> Option<&SelectOption> {
        let index = *self.filtered.get(self.selected_index)?;
        self.all_options().get(index)
    }

    pub fn select_next(&mut self) {
        if self.filtered.is_empty() {
            return;
        }
        self.selected_index = (self.selected_index + 1) % self.filtered.len();
    }

    pub fn select_previous(&mut self) {
        if self.filtered.is_empty() {
            return;
        }
        if self.selected_index == 0 {
            self.selected_index = self.filtered.len() - 1;
        } else {
            self.selected_index -= 1;
        }
    }

    pub fn push_query_char(&mut self, character: char) {
        self.query.push(character);
        self.refilter();
    }

    pub fn pop_query_char(&mut self) {
        if self.query.pop().is_some() {
            self.refilter();
        }
    }

    /// Advance the spinner. Returns `true` when a redraw is needed.
    pub fn tick(&mut self) -> bool {
        if !self.is_loading() {
            return false;
        }
        self.throbber_idx = (self.throbber_idx + 1) % THROBBER_FRAMES.len();
        true
    }

    pub fn throbber_frame(&self) -> &'static str {
        THROBBER_FRAMES[self.throbber_idx % THROBBER_FRAMES.len()]
    }

    /// Recompute the filtered indices, keeping the cursor on the same option when it survives.
    fn refilter(&mut self) {
        let previously_selected = self.filtered.get(self.selected_index).copied();
        let needle = self.query.trim().to_lowercase();
        self.filtered = self
            .all_options()
            .iter()
            .enumerate()
            .filter(|(_, option)| {
                needle.is_empty() || option.label.to_lowercase().contains(&needle) || option.value.to_lowercase().contains(&needle)
            })
            .map(|(index, _)| index)
            .collect();
        self.selected_index = previously_selected
            .and_then(|index| self.filtered.iter().position(|&candidate| candidate == index))
            .unwrap_or(0);
    }

    fn highlight_current_value(&mut self) {
        let Some(current) = option_for_value(self.all_options(), self.current_value.as_deref()) else {
            return;
        };
        let current = current.value.clone();
        let options = self.all_options();
        let position = self
            .filtered
            .iter()
            .position(|&index| options.get(index).is_some_and(|option| option.value == current));
        if let Some(position) = position {
            self.selected_index = position;
        }
    }
}
