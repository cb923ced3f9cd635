//! Runtime: event loop for the option picker.
//!
//! - Owns the terminal lifecycle (alternate screen, raw mode).
//! - Waits on terminal input, resolver state changes, and a spinner tick in
//!   a single `tokio::select!` loop.
//! - Redraws only when something visible changed.
//!
//! The resolver lives for exactly as long as the picker; leaving the loop
//! drops it, which discards any response still in flight.

use std::io::Stdout;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::StreamExt;
use ratatui::{Terminal, prelude::CrosstermBackend};
use studio_engine::{OptionFetcher, OptionSource, RemoteOptionResolver, ResolutionState};
use studio_types::FieldPatch;
use tokio::{
    sync::watch,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, warn};

use crate::ui::picker::{PickerAction, PickerComponent, PickerState};
use crate::ui::theme::{NordTheme, Theme};

type PickerTerminal = Terminal<CrosstermBackend<Stdout>>;

/// How the picker session ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerOutcome {
    /// The user chose an option or cleared the field.
    Committed(FieldPatch),
    /// The user closed the picker without a change.
    Cancelled,
}

/// Put the terminal into raw mode and enter the alternate screen.
fn setup_terminal() -> Result<PickerTerminal> {
    enable_raw_mode()?;
    undo_raw_mode_on_error(
        || {
            let mut stdout = std::io::stdout();
            execute!(stdout, EnterAlternateScreen)?;
            Ok(Terminal::new(CrosstermBackend::new(stdout))?)
        },
        disable_raw_mode,
    )
}

/// Run the steps that follow `enable_raw_mode`, leaving raw mode again if they fail.
fn undo_raw_mode_on_error<T>(
    steps: impl FnOnce() -> Result<T>,
    leave_raw_mode: impl FnOnce() -> std::io::Result<()>,
) -> Result<T> {
    let entered = steps();
    if entered.is_err()
        && let Err(error) = leave_raw_mode()
    {
        warn!(error = %error, "failed to leave raw mode after terminal setup error");
    }
    entered
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut PickerTerminal) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn render(terminal: &mut PickerTerminal, component: &mut PickerComponent, state: &PickerState, theme: &dyn Theme) -> Result<()> {
    terminal.draw(|frame| {
        let area = frame.area();
        component.render(frame, area, state, theme);
    })?;
    Ok(())
}

/// Entry point for the picker: resolves `source` while the user browses and
/// returns the committed patch, if any.
pub async fn run_picker(
    title: &str,
    source: OptionSource,
    fetcher: Arc<dyn OptionFetcher>,
    current_value: Option<String>,
) -> Result<PickerOutcome> {
    let mut resolver = RemoteOptionResolver::new(fetcher);
    let mut state = PickerState::new(title, current_value);
    let mut updates = resolver.resolve(source);
    state.apply_resolution(updates.borrow_and_update().clone());

    let mut terminal = setup_terminal()?;
    let outcome = event_loop(&mut terminal, &mut state, &mut updates).await;
    if let Err(error) = cleanup_terminal(&mut terminal) {
        warn!(error = %error, "failed to restore terminal");
    }
    drop(resolver);
    outcome
}

async fn event_loop(
    terminal: &mut PickerTerminal,
    state: &mut PickerState,
    updates: &mut watch::Receiver<ResolutionState>,
) -> Result<PickerOutcome> {
    let theme = NordTheme::new();
    let mut component = PickerComponent;
    let mut events = EventStream::new();
    let mut ticker = time::interval(Duration::from_millis(100));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut watching = true;

    render(terminal, &mut component, state, &theme)?;

    loop {
        let mut needs_render = false;
        tokio::select! {
            maybe_event = events.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                        if let Some(action) = component.handle_key_events(state, key) {
                            debug!(?action, "picker closed");
                            return Ok(match action {
                                PickerAction::Commit(patch) => PickerOutcome::Committed(patch),
                                PickerAction::Cancel => PickerOutcome::Cancelled,
                            });
                        }
                        needs_render = true;
                    }
                    Some(Ok(Event::Resize(_, _))) => needs_render = true,
                    Some(Ok(_)) => {}
                    Some(Err(error)) => return Err(error.into()),
                    None => return Ok(PickerOutcome::Cancelled),
                }
            }

            changed = updates.changed(), if watching => {
                if changed.is_ok() {
                    state.apply_resolution(updates.borrow_and_update().clone());
                    needs_render = true;
                } else {
                    watching = false;
                }
            }

            _ = ticker.tick(), if state.is_loading() => {
                needs_render = state.tick();
            }
        }

        if needs_render {
            render(terminal, &mut component, state, &theme)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn failed_setup_leaves_raw_mode() {
        let left = Cell::new(false);
        let result: Result<()> = undo_raw_mode_on_error(
            || Err(anyhow::anyhow!("alternate screen unavailable")),
            || {
                left.set(true);
                Ok(())
            },
        );
        assert!(result.is_err());
        assert!(left.get());
    }

    #[test]
    fn successful_setup_keeps_raw_mode() {
        let left = Cell::new(false);
        let result = undo_raw_mode_on_error(
            || Ok(7),
            || {
                left.set(true);
                Ok(())
            },
        );
        assert_eq!(result.unwrap(), 7);
        assert!(!left.get());
    }
}
