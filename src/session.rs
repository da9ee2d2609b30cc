// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

/// An authenticated user as seen by the dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub access_token: Option<String>,
}

impl Session {
    pub fn new(user_id: impl Into<String>) -> Self {
        Session {
            user_id: user_id.into(),
            access_token: None,
        }
    }
}

pub trait SessionProvider {
    /// The signed-in user, if any.
    fn current_session(&self) -> Option<Session>;
}

/// A session fixed at construction, e.g. from CLI flags.
#[derive(Debug, Clone, Default)]
pub struct StaticSession(pub Option<Session>);

impl SessionProvider for StaticSession {
    fn current_session(&self) -> Option<Session> {
        self.0.clone()
    }
}

impl StaticSession {
    /// Builds a session from an explicit user id, falling back to
    /// `CASHMONTH_USER`. Blank ids count as signed out.
    pub fn from_user_or_env(user: Option<&str>) -> Self {
        let user_id = user
            .map(str::to_string)
            .or_else(|| std::env::var("CASHMONTH_USER").ok())
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        StaticSession(user_id.map(|user_id| Session {
            user_id,
            access_token: std::env::var("CASHMONTH_ACCESS_TOKEN")
                .ok()
                .filter(|t| !t.is_empty()),
        }))
    }
}
