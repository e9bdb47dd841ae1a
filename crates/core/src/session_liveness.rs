//! Session liveness: decides when a logged-in dashboard session has ended.
//!
//! A [`SessionMonitor`] combines independent signals (inactivity, tab
//! visibility, window focus, remote validation, page unload, explicit
//! logout) into a two-state machine. `Active` moves to `Ended` on the first
//! trigger; `Ended` is terminal and every later trigger is a no-op, so
//! racing triggers are harmless.
//!
//! Time is always passed in. The monitor never reads a clock, which keeps it
//! deterministic and lets the server drive it from request handlers and a
//! background sweeper alike.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::types::Timestamp;

/// Thresholds for the liveness heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LivenessConfig {
    /// No interaction for this long ends the session.
    pub inactivity_timeout: Duration,
    /// A tab still hidden this long after hiding ends the session.
    /// `None` disables the grace check, leaving only [`Self::long_hidden`].
    pub hidden_grace: Option<Duration>,
    /// A tab that becomes visible after being hidden longer than this ends
    /// the session retroactively.
    pub long_hidden: Duration,
    /// A window regaining focus after being blurred longer than this ends
    /// the session.
    pub long_blur: Duration,
    /// How often the session row is re-fetched to detect remote logout.
    pub validation_interval: Duration,
}

impl Default for LivenessConfig {
    fn default() -> Self {
        Self {
            inactivity_timeout: Duration::minutes(30),
            hidden_grace: Some(Duration::seconds(10)),
            long_hidden: Duration::minutes(5),
            long_blur: Duration::minutes(10),
            validation_interval: Duration::minutes(2),
        }
    }
}

/// Browser-side events reported by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionSignal {
    /// Any user interaction (pointer, key, scroll, touch).
    Activity,
    TabHidden,
    TabVisible,
    WindowBlur,
    WindowFocus,
    PageUnload,
    Logout,
}

/// Why a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndReason {
    Inactivity,
    TabHidden,
    LongTabHidden,
    LongWindowBlur,
    SessionInvalid,
    LoggedOutElsewhere,
    PageUnload,
    Manual,
}

impl EndReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inactivity => "inactivity",
            Self::TabHidden => "tab_hidden",
            Self::LongTabHidden => "long_tab_hidden",
            Self::LongWindowBlur => "long_window_blur",
            Self::SessionInvalid => "session_invalid",
            Self::LoggedOutElsewhere => "logged_out_elsewhere",
            Self::PageUnload => "page_unload",
            Self::Manual => "manual",
        }
    }

    /// Whether the store already reflects this ending, so no logout write
    /// is needed.
    pub fn is_remote(&self) -> bool {
        matches!(self, Self::SessionInvalid | Self::LoggedOutElsewhere)
    }
}

/// Current liveness state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum LivenessState {
    Active,
    Ended { reason: EndReason, at: Timestamp },
}

/// What remote validation found for the session row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteSession {
    /// The row no longer exists.
    Missing,
    /// The row exists and has no `logout_time`.
    Open,
    /// The row already carries a `logout_time`.
    Closed { logout_time: Timestamp },
}

/// A transition out of `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ended {
    pub reason: EndReason,
    pub at: Timestamp,
}

/// Liveness state machine for one session.
#[derive(Debug, Clone)]
pub struct SessionMonitor {
    config: LivenessConfig,
    state: LivenessState,
    last_activity: Timestamp,
    hidden_since: Option<Timestamp>,
    blurred_since: Option<Timestamp>,
    last_validated: Timestamp,
}

impl SessionMonitor {
    /// Start monitoring a session that logged in at `now`.
    pub fn new(config: LivenessConfig, now: Timestamp) -> Self {
        Self {
            config,
            state: LivenessState::Active,
            last_activity: now,
            hidden_since: None,
            blurred_since: None,
            last_validated: now,
        }
    }

    pub fn state(&self) -> LivenessState {
        self.state
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, LivenessState::Active)
    }

    /// Feed a browser signal. Elapsed deadlines are applied first, so a
    /// timer that expired before the signal arrived wins.
    pub fn signal(&mut self, signal: SessionSignal, now: Timestamp) -> Option<Ended> {
        if let Some(ended) = self.check(now) {
            return Some(ended);
        }
        if !self.is_active() {
            return None;
        }

        match signal {
            SessionSignal::Activity => {
                self.last_activity = now;
                None
            }
            SessionSignal::TabHidden => {
                self.hidden_since.get_or_insert(now);
                None
            }
            SessionSignal::TabVisible => match self.hidden_since.take() {
                Some(since) if now - since > self.config.long_hidden => {
                    self.end(EndReason::LongTabHidden, now)
                }
                _ => None,
            },
            SessionSignal::WindowBlur => {
                self.blurred_since.get_or_insert(now);
                None
            }
            SessionSignal::WindowFocus => match self.blurred_since.take() {
                Some(since) if now - since > self.config.long_blur => {
                    self.end(EndReason::LongWindowBlur, now)
                }
                _ => None,
            },
            SessionSignal::PageUnload => self.end(EndReason::PageUnload, now),
            SessionSignal::Logout => self.end(EndReason::Manual, now),
        }
    }

    /// Apply any timer whose deadline is at or before `now`. When several
    /// have elapsed, the earliest deadline wins and is used as the end time.
    pub fn check(&mut self, now: Timestamp) -> Option<Ended> {
        if !self.is_active() {
            return None;
        }

        let inactivity = (
            self.last_activity + self.config.inactivity_timeout,
            EndReason::Inactivity,
        );
        let hidden = self
            .hidden_since
            .zip(self.config.hidden_grace)
            .map(|(since, grace)| (since + grace, EndReason::TabHidden));

        let (deadline, reason) = match hidden {
            Some(h) if h.0 < inactivity.0 => h,
            _ => inactivity,
        };

        if deadline <= now {
            self.end(reason, deadline)
        } else {
            None
        }
    }

    /// Earliest instant at which [`Self::check`] could end the session.
    pub fn next_deadline(&self) -> Option<Timestamp> {
        if !self.is_active() {
            return None;
        }
        let inactivity = self.last_activity + self.config.inactivity_timeout;
        let hidden = self
            .hidden_since
            .zip(self.config.hidden_grace)
            .map(|(since, grace)| since + grace);
        Some(hidden.map_or(inactivity, |h| h.min(inactivity)))
    }

    /// Whether the session row is due for a remote re-fetch.
    pub fn needs_validation(&self, now: Timestamp) -> bool {
        self.is_active() && now - self.last_validated >= self.config.validation_interval
    }

    /// Apply the result of re-fetching the session row.
    pub fn apply_remote(&mut self, remote: RemoteSession, now: Timestamp) -> Option<Ended> {
        self.last_validated = now;
        match remote {
            RemoteSession::Open => None,
            RemoteSession::Missing => self.end(EndReason::SessionInvalid, now),
            RemoteSession::Closed { logout_time } => {
                self.end(EndReason::LoggedOutElsewhere, logout_time)
            }
        }
    }

    /// Move to `Ended`. Returns `None` if the session had already ended.
    pub fn end(&mut self, reason: EndReason, at: Timestamp) -> Option<Ended> {
        if !self.is_active() {
            return None;
        }
        self.state = LivenessState::Ended { reason, at };
        self.hidden_since = None;
        self.blurred_since = None;
        Some(Ended { reason, at })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn t0() -> Timestamp {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }

    fn secs(n: i64) -> Timestamp {
        t0() + Duration::seconds(n)
    }

    fn monitor() -> SessionMonitor {
        SessionMonitor::new(LivenessConfig::default(), t0())
    }

    #[test]
    fn inactivity_ends_session_at_deadline() {
        let mut m = monitor();
        assert!(m.check(secs(29 * 60)).is_none());
        let ended = m.check(secs(31 * 60)).expect("should end");
        assert_eq!(ended.reason, EndReason::Inactivity);
        assert_eq!(ended.at, secs(30 * 60));
    }

    #[test]
    fn activity_resets_inactivity_timer() {
        let mut m = monitor();
        m.signal(SessionSignal::Activity, secs(20 * 60));
        assert!(m.check(secs(40 * 60)).is_none());
        assert_eq!(m.next_deadline(), Some(secs(50 * 60)));
    }

    #[test]
    fn hidden_tab_ends_after_grace() {
        let mut m = monitor();
        m.signal(SessionSignal::TabHidden, secs(100));
        assert!(m.check(secs(105)).is_none());
        let ended = m.check(secs(111)).expect("should end");
        assert_eq!(ended.reason, EndReason::TabHidden);
        assert_eq!(ended.at, secs(110));
    }

    #[test]
    fn tab_visible_within_grace_keeps_session() {
        let mut m = monitor();
        m.signal(SessionSignal::TabHidden, secs(100));
        assert!(m.signal(SessionSignal::TabVisible, secs(105)).is_none());
        assert!(m.check(secs(200)).is_none());
        assert!(m.is_active());
    }

    #[test]
    fn long_hidden_tab_ends_when_grace_disabled() {
        let config = LivenessConfig {
            hidden_grace: None,
            ..LivenessConfig::default()
        };
        let mut m = SessionMonitor::new(config, t0());
        m.signal(SessionSignal::TabHidden, secs(0));
        assert!(m.check(secs(4 * 60)).is_none());
        let ended = m.signal(SessionSignal::TabVisible, secs(6 * 60)).unwrap();
        assert_eq!(ended.reason, EndReason::LongTabHidden);
    }

    #[test]
    fn long_window_blur_ends_on_focus() {
        let mut m = monitor();
        m.signal(SessionSignal::WindowBlur, secs(0));
        m.signal(SessionSignal::Activity, secs(60));
        assert!(m.signal(SessionSignal::WindowFocus, secs(5 * 60)).is_none());

        m.signal(SessionSignal::WindowBlur, secs(6 * 60));
        m.signal(SessionSignal::Activity, secs(15 * 60));
        let ended = m.signal(SessionSignal::WindowFocus, secs(17 * 60)).unwrap();
        assert_eq!(ended.reason, EndReason::LongWindowBlur);
    }

    #[test]
    fn remote_closed_session_triggers_local_logout() {
        let mut m = monitor();
        assert!(m.needs_validation(secs(2 * 60)));
        let ended = m
            .apply_remote(RemoteSession::Closed { logout_time: secs(90) }, secs(120))
            .unwrap();
        assert_eq!(ended.reason, EndReason::LoggedOutElsewhere);
        assert!(ended.reason.is_remote());
        assert!(!m.is_active());
    }

    #[test]
    fn remote_missing_session_is_invalid() {
        let mut m = monitor();
        let ended = m.apply_remote(RemoteSession::Missing, secs(120)).unwrap();
        assert_eq!(ended.reason, EndReason::SessionInvalid);
    }

    #[test]
    fn remote_open_defers_next_validation() {
        let mut m = monitor();
        assert!(m.apply_remote(RemoteSession::Open, secs(120)).is_none());
        assert!(!m.needs_validation(secs(180)));
        assert!(m.needs_validation(secs(240)));
    }

    #[test]
    fn ended_is_terminal_and_idempotent() {
        let mut m = monitor();
        let first = m.signal(SessionSignal::PageUnload, secs(10)).unwrap();
        assert_eq!(first.reason, EndReason::PageUnload);

        assert!(m.signal(SessionSignal::Logout, secs(11)).is_none());
        assert!(m.check(secs(99 * 60)).is_none());
        assert!(m
            .apply_remote(RemoteSession::Missing, secs(12))
            .is_none());
        assert_eq!(
            m.state(),
            LivenessState::Ended {
                reason: EndReason::PageUnload,
                at: secs(10)
            }
        );
        assert!(!m.needs_validation(secs(99 * 60)));
        assert!(m.next_deadline().is_none());
    }

    #[test]
    fn expired_timer_wins_over_late_signal() {
        let mut m = monitor();
        let ended = m.signal(SessionSignal::Logout, secs(45 * 60)).unwrap();
        assert_eq!(ended.reason, EndReason::Inactivity);
    }

    #[test]
    fn signal_names_use_snake_case() {
        let signal: SessionSignal = serde_json::from_str("\"tab_hidden\"").unwrap();
        assert_eq!(signal, SessionSignal::TabHidden);
        assert_eq!(
            serde_json::to_string(&EndReason::LoggedOutElsewhere).unwrap(),
            "\"logged_out_elsewhere\""
        );
    }
}
