// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Dashboard state with last-selection-wins refreshes.
//!
//! Every selection takes a [`Ticket`]. When an aggregation finishes its
//! result is applied only if no newer selection (or sign-out) happened in the
//! meantime; older results are dropped instead of overwriting fresher ones.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::aggregate::aggregate;
use crate::error::AggregateError;
use crate::models::FinancialSummary;
use crate::period::Period;
use crate::session::{Session, SessionProvider};
use crate::store::TransactionQuery;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ticket {
    generation: u64,
    user_id: String,
    period: Period,
}

impl Ticket {
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn period(&self) -> Period {
        self.period
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardView {
    pub user_id: String,
    pub period: Period,
    pub summary: FinancialSummary,
}

/// User-facing message raised instead of an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    SignedOut,
    LoadFailed { period: Period, detail: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Notice::SignedOut => write!(f, "Sign in to see your dashboard"),
            Notice::LoadFailed { period, detail } => write!(
                f,
                "Could not load the dashboard for {}: {}",
                period.label(),
                detail
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Refresh {
    Updated(FinancialSummary),
    /// A newer selection superseded this one; the result was discarded.
    Stale,
    /// Nobody is signed in; nothing was queried.
    Skipped,
    Failed(Notice),
}

/// Undelivered notices kept before the oldest are dropped.
pub const MAX_NOTICES: usize = 8;

#[derive(Debug, Default)]
pub struct Dashboard {
    generation: AtomicU64,
    view: Mutex<Option<DashboardView>>,
    notices: Mutex<Vec<Notice>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a selection for `period`. Returns `None`, clearing the view,
    /// when there is no session.
    pub fn select(&self, session: Option<&Session>, period: Period) -> Option<Ticket> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let Some(session) = session else {
            info!(period = %period, "no session, dashboard refresh skipped");
            *lock(&self.view) = None;
            self.notify(Notice::SignedOut);
            return None;
        };
        debug!(generation, user = %session.user_id, period = %period, "selection started");
        Some(Ticket {
            generation,
            user_id: session.user_id.clone(),
            period,
        })
    }

    /// Applies a finished aggregation if `ticket` is still the newest.
    pub fn complete(
        &self,
        ticket: Ticket,
        result: Result<FinancialSummary, AggregateError>,
    ) -> Refresh {
        let mut view = lock(&self.view);
        if self.generation.load(Ordering::SeqCst) != ticket.generation {
            debug!(generation = ticket.generation, period = %ticket.period, "stale result dropped");
            return Refresh::Stale;
        }
        match result {
            Ok(summary) => {
                *view = Some(DashboardView {
                    user_id: ticket.user_id,
                    period: ticket.period,
                    summary: summary.clone(),
                });
                Refresh::Updated(summary)
            }
            Err(e) => {
                warn!(period = %ticket.period, error = %e, "dashboard refresh failed");
                *view = None;
                let notice = Notice::LoadFailed {
                    period: ticket.period,
                    detail: e.to_string(),
                };
                self.notify(notice.clone());
                Refresh::Failed(notice)
            }
        }
    }

    /// Selects `period` for the current session and aggregates it.
    pub fn refresh<Q: TransactionQuery + ?Sized>(
        &self,
        sessions: &dyn SessionProvider,
        period: Period,
        query: &Q,
    ) -> Refresh {
        let session = sessions.current_session();
        let Some(ticket) = self.select(session.as_ref(), period) else {
            return Refresh::Skipped;
        };
        let result = aggregate(ticket.user_id(), &ticket.period(), query);
        self.complete(ticket, result)
    }

    pub fn current(&self) -> Option<DashboardView> {
        lock(&self.view).clone()
    }

    fn notify(&self, notice: Notice) {
        let mut notices = lock(&self.notices);
        if notices.len() >= MAX_NOTICES {
            notices.remove(0);
        }
        notices.push(notice);
    }

    /// Drains pending notices, oldest first.
    pub fn take_notices(&self) -> Vec<Notice> {
        std::mem::take(&mut *lock(&self.notices))
    }
}
