//! Per-panel search state with last-submission-wins ordering.
//!
//! Every submission takes a [`Ticket`]. A completion is committed only when
//! its ticket is the most recent one issued; anything older is a stale
//! response and is dropped, however late it arrives.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

use crate::{
    alert::{Alert, derive_alerts},
    client::WeatherClient,
    error::WeatherError,
    model::{SearchCriteria, WeatherResult},
};

/// Monotonically increasing submission number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    pub fn get(self) -> u64 {
        self.0
    }
}

/// What the panel shows. At most one [`WeatherResult`] lives here.
#[derive(Debug, Clone, Default)]
pub enum SearchState {
    #[default]
    Idle,
    /// A submission is in flight; the previous result stays on screen.
    Loading { ticket: Ticket, shown: Option<WeatherResult> },
    Success(WeatherResult),
    /// The latest submission failed; the previous result stays on screen.
    Failed { error: WeatherError, shown: Option<WeatherResult> },
}

impl SearchState {
    pub fn displayed(&self) -> Option<&WeatherResult> {
        match self {
            SearchState::Idle => None,
            SearchState::Loading { shown, .. } | SearchState::Failed { shown, .. } => {
                shown.as_ref()
            }
            SearchState::Success(result) => Some(result),
        }
    }

    pub fn error(&self) -> Option<&WeatherError> {
        match self {
            SearchState::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SearchState::Loading { .. })
    }

    /// Alert banners for whatever is on screen.
    pub fn alerts(&self) -> Vec<Alert> {
        self.displayed().map(derive_alerts).unwrap_or_default()
    }

    fn into_displayed(self) -> Option<WeatherResult> {
        match self {
            SearchState::Idle => None,
            SearchState::Loading { shown, .. } | SearchState::Failed { shown, .. } => shown,
            SearchState::Success(result) => Some(result),
        }
    }
}

/// Whether a completion made it onto the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Committed,
    /// A newer submission had already been issued.
    Stale { latest: Ticket },
}

/// The synchronous state machine behind [`WeatherPanel`].
#[derive(Debug, Default)]
pub struct SearchSession {
    state: SearchState,
    issued: u64,
}

impl SearchSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &SearchState {
        &self.state
    }

    pub fn latest_ticket(&self) -> Option<Ticket> {
        (self.issued > 0).then_some(Ticket(self.issued))
    }

    /// Start a submission. Supersedes anything still in flight.
    pub fn begin(&mut self) -> Ticket {
        self.issued += 1;
        let ticket = Ticket(self.issued);
        let shown = std::mem::take(&mut self.state).into_displayed();
        self.state = SearchState::Loading { ticket, shown };
        ticket
    }

    /// Finish the submission holding `ticket`.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        outcome: Result<WeatherResult, WeatherError>,
    ) -> Completion {
        let latest = Ticket(self.issued);
        if ticket != latest {
            warn!(ticket = ticket.0, latest = latest.0, "discarding stale weather response");
            return Completion::Stale { latest };
        }

        let shown = std::mem::take(&mut self.state).into_displayed();
        self.state = match outcome {
            Ok(result) => {
                info!(ticket = ticket.0, mode = %result.mode(), place = ?result.place_name(), "weather result updated");
                SearchState::Success(result)
            }
            Err(error) => {
                warn!(ticket = ticket.0, %error, "weather search failed");
                SearchState::Failed { error, shown }
            }
        };
        Completion::Committed
    }
}

/// The weather lookup panel: a client plus the search session it feeds.
#[derive(Debug)]
pub struct WeatherPanel {
    client: Arc<WeatherClient>,
    session: Mutex<SearchSession>,
}

impl WeatherPanel {
    pub fn new(client: Arc<WeatherClient>) -> Self {
        Self { client, session: Mutex::new(SearchSession::new()) }
    }

    pub fn client(&self) -> &WeatherClient {
        &self.client
    }

    /// Run one search end to end and commit it unless a newer one was
    /// submitted meanwhile. Errors end up in the state, never returned.
    pub async fn submit(&self, criteria: SearchCriteria) -> Completion {
        let ticket = self.session().begin();
        let outcome = self.client.fetch_weather(&criteria).await;
        self.session().complete(ticket, outcome)
    }

    pub fn state(&self) -> SearchState {
        self.session().state().clone()
    }

    // The lock is never held across an await, so a poisoned guard still
    // holds a consistent state.
    fn session(&self) -> MutexGuard<'_, SearchSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
