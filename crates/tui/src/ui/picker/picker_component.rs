use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use studio_engine::{ResolutionState, select};
use studio_types::{FieldPatch, SelectOption};

use super::state::PickerState;
use crate::ui::theme::Theme;
use crate::ui::theme::theme_helpers as th;

const QUERY_PLACEHOLDER: &str = "Search for a model";

/// What the picker asks its host to do after a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerAction {
    /// Write the patch to the field and close.
    Commit(FieldPatch),
    /// Close without touching the field.
    Cancel,
}

/// Option picker controller.
#[derive(Debug, Default)]
pub struct PickerComponent;

impl PickerComponent {
    pub fn handle_key_events(&mut self, state: &mut PickerState, key: KeyEvent) -> Option<PickerAction> {
        match key.code {
            KeyCode::Esc => return Some(PickerAction::Cancel),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => return Some(PickerAction::Cancel),
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Some(PickerAction::Commit(select(None)));
            }
            KeyCode::Delete => return Some(PickerAction::Commit(select(None))),
            KeyCode::Enter => {
                return state.selected_option().map(|option| PickerAction::Commit(select(Some(option))));
            }
            KeyCode::Up => state.select_previous(),
            KeyCode::Down | KeyCode::Tab => state.select_next(),
            KeyCode::Backspace => state.pop_query_char(),
            KeyCode::Char(character) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                state.push_query_char(character);
            }
            _ => {}
        }
        None
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, state: &PickerState, theme: &dyn Theme) {
        let block = th::block(theme, Some(state.title()), true);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let segments = Layout::vertical([Constraint::Length(1), Constraint::Min(3), Constraint::Length(1)]).split(inner);

        let query_line = if state.query().is_empty() {
            Line::from(Span::styled(QUERY_PLACEHOLDER, theme.text_muted_style()))
        } else {
            Line::from(Span::styled(state.query().to_string(), theme.text_primary_style()))
        };
        frame.render_widget(Paragraph::new(query_line), segments[0]);

        match state.resolution() {
            ResolutionState::Idle => {
                let line = Line::from(Span::styled("Waiting for an option source.", theme.text_muted_style()));
                frame.render_widget(Paragraph::new(line), segments[1]);
            }
            ResolutionState::Loading => {
                let line = Line::from(vec![
                    Span::styled(format!("{} ", state.throbber_frame()), theme.accent_emphasis_style()),
                    Span::styled("Loading options…", theme.text_secondary_style()),
                ]);
                frame.render_widget(Paragraph::new(line), segments[1]);
            }
            ResolutionState::Failed(error) => {
                let lines = vec![
                    Line::from(Span::styled(
                        "There has been an error",
                        theme.status_error().add_modifier(Modifier::BOLD),
                    )),
                    Line::from(Span::styled(error.to_string(), theme.text_muted_style())),
                ];
                let panel = Paragraph::new(lines)
                    .wrap(Wrap { trim: true })
                    .block(Block::default().borders(Borders::LEFT).border_style(theme.status_error()));
                frame.render_widget(panel, segments[1]);
            }
            ResolutionState::Ready(_) => self.render_options(frame, segments[1], state, theme),
        }

        let hints = th::build_hint_spans(
            theme,
            &[
                (" ↑/↓", " Navigate  "),
                (" Enter", " Select  "),
                (" Ctrl+U", " Unset  "),
                (" Esc", " Cancel "),
            ],
        );
        frame.render_widget(Paragraph::new(Line::from(hints)), segments[2]);
    }

    fn render_options(&self, frame: &mut Frame, area: Rect, state: &PickerState, theme: &dyn Theme) {
        let visible = state.visible_options();
        if visible.is_empty() {
            let message = if state.all_options().is_empty() {
                "No options available."
            } else {
                "No options match the filter."
            };
            frame.render_widget(Paragraph::new(Span::styled(message, theme.text_muted_style())), area);
            return;
        }

        let items: Vec<ListItem> = visible
            .iter()
            .enumerate()
            .map(|(index, option)| Self::build_option_line(option, state, index == state.selected_index, theme))
            .collect();

        let mut list_state = ListState::default();
        list_state.select(Some(state.selected_index));
        let list = List::new(items).highlight_style(theme.selection_style()).highlight_symbol("");
        frame.render_stateful_widget(list, area, &mut list_state);
    }

    fn build_option_line<'a>(option: &SelectOption, state: &PickerState, is_selected: bool, theme: &dyn Theme) -> ListItem<'a> {
        let prefix = if is_selected { "> " } else { "  " };
        let mut label_style = theme.text_primary_style();
        if is_selected {
            label_style = label_style.add_modifier(Modifier::BOLD);
        }

        let mut spans = vec![
            Span::styled(prefix, theme.text_secondary_style()),
            Span::styled(option.label.clone(), label_style),
            Span::styled(format!("  ({})", option.value), theme.text_muted_style()),
        ];
        if option.image.is_some() {
            spans.push(Span::styled("  [image]", theme.text_muted_style()));
        }
        if state.current_value() == Some(option.value.as_str()) {
            spans.push(Span::styled("  ● Current", theme.status_success()));
        }
        ListItem::new(Line::from(spans))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::theme::NordTheme;
    use ratatui::{Terminal, backend::TestBackend};
    use studio_engine::ResolveError;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ready_state(current: Option<&str>) -> PickerState {
        let mut state = PickerState::new("Hero Equipment", current.map(str::to_string));
        state.apply_resolution(ResolutionState::Ready(vec![
            SelectOption::new("X1", "x1"),
            SelectOption::new("X2", "x2").with_image("https://cdn.example.com/x2.png"),
        ]));
        state
    }

    fn rendered_text(state: &PickerState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(60, 10)).unwrap();
        let theme = NordTheme::new();
        terminal
            .draw(|frame| {
                let area = frame.area();
                PickerComponent.render(frame, area, state, &theme);
            })
            .unwrap();
        terminal.backend().buffer().content().iter().map(|cell| cell.symbol()).collect()
    }

    #[test]
    fn enter_commits_selected_value() {
        let mut state = ready_state(None);
        let mut component = PickerComponent;
        assert_eq!(component.handle_key_events(&mut state, key(KeyCode::Down)), None);
        assert_eq!(
            component.handle_key_events(&mut state, key(KeyCode::Enter)),
            Some(PickerAction::Commit(FieldPatch::Set("x2".into())))
        );
    }

    #[test]
    fn unset_and_cancel_keys() {
        let mut state = ready_state(Some("x1"));
        let mut component = PickerComponent;
        assert_eq!(
            component.handle_key_events(&mut state, KeyEvent::new(KeyCode::Char('u'), KeyModifiers::CONTROL)),
            Some(PickerAction::Commit(FieldPatch::Unset))
        );
        assert_eq!(
            component.handle_key_events(&mut state, key(KeyCode::Delete)),
            Some(PickerAction::Commit(FieldPatch::Unset))
        );
        assert_eq!(component.handle_key_events(&mut state, key(KeyCode::Esc)), Some(PickerAction::Cancel));
    }

    #[test]
    fn enter_does_nothing_while_loading() {
        let mut state = PickerState::new("Hero Equipment", None);
        state.apply_resolution(ResolutionState::Loading);
        assert_eq!(PickerComponent.handle_key_events(&mut state, key(KeyCode::Enter)), None);
    }

    #[test]
    fn typing_filters_options() {
        let mut state = ready_state(None);
        PickerComponent.handle_key_events(&mut state, key(KeyCode::Char('2')));
        assert_eq!(state.query(), "2");
        assert_eq!(state.visible_options().len(), 1);
    }

    #[test]
    fn failed_state_renders_error_panel() {
        let mut state = PickerState::new("Hero Equipment", None);
        state.apply_resolution(ResolutionState::Failed(ResolveError::Decode("expected value".into())));
        let text = rendered_text(&state);
        assert!(text.contains("There has been an error"));
        assert!(!text.contains("X1"));
    }

    #[test]
    fn ready_state_marks_current_value() {
        let text = rendered_text(&ready_state(Some("x2")));
        assert!(text.contains("X1"));
        assert!(text.contains("● Current"));
        assert!(text.contains("[image]"));
    }

    #[test]
    fn placeholder_gives_way_to_query() {
        let mut state = ready_state(None);
        assert!(rendered_text(&state).contains("Search for a model"));

        PickerComponent.handle_key_events(&mut state, key(KeyCode::Char('x')));
        let text = rendered_text(&state);
        assert!(!text.contains("Search for a model"));
        assert!(text.contains("X1"));
    }

    #[test]
    fn loading_state_shows_spinner() {
        let mut state = PickerState::new("Hero Equipment", None);
        state.apply_resolution(ResolutionState::Loading);
        let text = rendered_text(&state);
        assert!(text.contains("Loading options"));
        assert!(text.contains(state.throbber_frame()));
    }
}
