//! Resolution state machine for one option-backed field.
//!
//! A [`RemoteOptionResolver`] belongs to a single consuming control. Each
//! distinct [`OptionSource`] starts a resolution cycle
//! (`Idle -> Loading -> Ready | Failed`) executed by a Tokio task. A panic in
//! the fetcher or transform settles the cycle as `Failed`. Every cycle gets a
//! generation number; a task may only publish its result while its
//! generation is still current, and that check happens under the same lock as
//! the write, so a superseded or torn-down cycle can never overwrite newer
//! state.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use futures_util::FutureExt;
use studio_types::{FieldPatch, SelectOption};
use studio_util::{redact_sensitive, redact_url, truncate_for_summary};
use tokio::{sync::watch, task::JoinHandle};
use tracing::{debug, info, warn};
use url::Url;

use super::{error::ResolveError, fetch::OptionFetcher, selection, source::OptionSource};

/// Current lifecycle phase of a resolver.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum ResolutionState {
    /// Nothing has been resolved yet.
    #[default]
    Idle,
    /// A request for the current source is in flight.
    Loading,
    /// The full option list for the current source.
    Ready(Vec<SelectOption>),
    /// The current source could not be resolved.
    Failed(ResolveError),
}

impl ResolutionState {
    /// `true` for `Ready` and `Failed`.
    pub fn is_settled(&self) -> bool {
        matches!(self, ResolutionState::Ready(_) | ResolutionState::Failed(_))
    }

    pub fn options(&self) -> Option<&[SelectOption]> {
        match self {
            ResolutionState::Ready(options) => Some(options),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ResolveError> {
        match self {
            ResolutionState::Failed(error) => Some(error),
            _ => None,
        }
    }
}

/// Fetch and shape the options for `source` once.
///
/// Unconfigured sources return an empty list without calling the fetcher.
pub async fn resolve_options(fetcher: &dyn OptionFetcher, source: &OptionSource) -> Result<Vec<SelectOption>, ResolveError> {
    if source.is_unconfigured() {
        return Ok(Vec::new());
    }
    let raw = fetcher.fetch(source.url.trim()).await?;
    source.format.apply(&raw)
}

/// Best-effort text of a caught panic payload.
fn panic_detail(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("no message")
}

/// URL form safe to put in logs.
fn loggable_url(raw: &str) -> String {
    Url::parse(raw.trim())
        .map(|url| redact_url(&url))
        .unwrap_or_else(|_| redact_sensitive(raw))
}

/// State slot shared between a resolver and its in-flight task.
#[derive(Debug)]
struct ResolutionSlot {
    generation: AtomicU64,
    state: watch::Sender<ResolutionState>,
}

impl ResolutionSlot {
    fn new() -> Self {
        let (state, _) = watch::channel(ResolutionState::Idle);
        Self {
            generation: AtomicU64::new(0),
            state,
        }
    }

    /// Start a new cycle with `initial` as its first state and return its generation.
    fn begin(&self, initial: ResolutionState) -> u64 {
        let mut generation = 0;
        self.state.send_modify(|state| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *state = initial;
        });
        generation
    }

    /// Publish `next` if `generation` is still current. Returns whether it was applied.
    fn settle(&self, generation: u64, next: ResolutionState) -> bool {
        self.state.send_if_modified(|state| {
            if self.generation.load(Ordering::SeqCst) != generation {
                return false;
            }
            *state = next;
            true
        })
    }

    /// Invalidate whatever cycle is in flight without touching the state.
    fn retire(&self) {
        self.state.send_if_modified(|_| {
            self.generation.fetch_add(1, Ordering::SeqCst);
            false
        });
    }
}

/// Turns option sources into an observable [`ResolutionState`].
///
/// Must be driven from within a Tokio runtime: `resolve` spawns the fetch.
/// Dropping the resolver aborts the in-flight fetch and discards its result.
pub struct RemoteOptionResolver {
    fetcher: Arc<dyn OptionFetcher>,
    slot: Arc<ResolutionSlot>,
    current: Option<OptionSource>,
    in_flight: Option<JoinHandle<()>>,
}

impl std::fmt::Debug for RemoteOptionResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteOptionResolver")
            .field("current", &self.current)
            .field("state", &*self.slot.state.borrow())
            .finish()
    }
}

impl RemoteOptionResolver {
    pub fn new(fetcher: Arc<dyn OptionFetcher>) -> Self {
        Self {
            fetcher,
            slot: Arc::new(ResolutionSlot::new()),
            current: None,
            in_flight: None,
        }
    }

    /// Receiver observing every state published from now on.
    pub fn subscribe(&self) -> watch::Receiver<ResolutionState> {
        self.slot.state.subscribe()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ResolutionState {
        self.slot.state.borrow().clone()
    }

    /// The source the current state belongs to, if any.
    pub fn source(&self) -> Option<&OptionSource> {
        self.current.as_ref()
    }

    /// Resolve `source`, superseding any cycle still in flight.
    ///
    /// - Same `(url, format)` as the current source: nothing happens.
    /// - Unconfigured source: settles into `Ready([])` immediately, no request.
    /// - Otherwise: `Loading` is published before this returns and a task
    ///   performs the single GET.
    pub fn resolve(&mut self, source: OptionSource) -> watch::Receiver<ResolutionState> {
        let already_started = !matches!(*self.slot.state.borrow(), ResolutionState::Idle);
        if already_started && self.current.as_ref() == Some(&source) {
            debug!(url = %loggable_url(&source.url), "option source unchanged; keeping current resolution");
            return self.subscribe();
        }

        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }

        if source.is_unconfigured() {
            self.slot.begin(ResolutionState::Ready(Vec::new()));
            self.current = Some(source);
            debug!("option source has no URL; resolved to an empty list");
            return self.subscribe();
        }

        let generation = self.slot.begin(ResolutionState::Loading);
        self.current = Some(source.clone());
        let shown_url = loggable_url(&source.url);
        debug!(url = %shown_url, generation, "option resolution started");

        let fetcher = Arc::clone(&self.fetcher);
        let slot = Arc::clone(&self.slot);
        self.in_flight = Some(tokio::spawn(async move {
            let outcome = AssertUnwindSafe(resolve_options(fetcher.as_ref(), &source))
                .catch_unwind()
                .await
                .unwrap_or_else(|payload| {
                    Err(ResolveError::Format(format!(
                        "option resolution panicked: {}",
                        panic_detail(payload.as_ref())
                    )))
                });
            let next = match outcome {
                Ok(options) => {
                    info!(url = %shown_url, option_count = options.len(), "option resolution completed");
                    ResolutionState::Ready(options)
                }
                Err(error) => {
                    warn!(
                        url = %shown_url,
                        error = %truncate_for_summary(&error.to_string(), 200),
                        "option resolution failed"
                    );
                    ResolutionState::Failed(error)
                }
            };
            if !slot.settle(generation, next) {
                debug!(url = %shown_url, generation, "discarding stale option response");
            }
        }));

        self.subscribe()
    }

    /// Wait until the current cycle leaves `Loading` and return that state.
    ///
    /// Returns immediately when nothing is in flight.
    pub async fn settled(&self) -> ResolutionState {
        let mut receiver = self.subscribe();
        match receiver.wait_for(|state| !matches!(state, ResolutionState::Loading)).await {
            Ok(state) => state.clone(),
            Err(_) => self.state(),
        }
    }

    /// Map a chosen option (or none) to the patch committed to the field.
    pub fn select(&self, option: Option<&SelectOption>) -> FieldPatch {
        selection::select(option)
    }
}

impl Drop for RemoteOptionResolver {
    fn drop(&mut self) {
        self.slot.retire();
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}
