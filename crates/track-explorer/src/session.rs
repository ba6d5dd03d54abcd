//! Explorer Sessions
//!
//! `render` is a pure function of (session, action, tracks), split into the
//! cheap [`advance`] and the chart-building [`build_view`] so a host can update
//! its registry under a lock and build charts outside it.

use crate::error::ExplorerError;
use crate::insights::{build_insight, Insight};
use crate::questions::InsightKey;
use record_set::RecordSet;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Charts a visitor has opened, in the order they were picked
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExplorerSession {
    shown: Vec<InsightKey>,
}

impl ExplorerSession {
    /// Keys already shown
    pub fn shown(&self) -> &[InsightKey] {
        &self.shown
    }

    /// Whether a key has been shown
    pub fn has_shown(&self, key: InsightKey) -> bool {
        self.shown.contains(&key)
    }
}

/// Visitor interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Pop a question bubble
    Show(InsightKey),
    /// Forget everything shown
    Reset,
    /// Re-render without changes
    Refresh,
}

/// A question still on offer
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Question {
    pub key: InsightKey,
    pub text: &'static str,
}

/// One rendered chart, or why it could not be built
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InsightPanel {
    pub key: InsightKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insight: Option<Insight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Everything the page shows after an action
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExplorerView {
    pub remaining: Vec<Question>,
    pub panels: Vec<InsightPanel>,
    pub all_explored: bool,
}

/// Apply an action to the session state
pub fn advance(mut session: ExplorerSession, action: Action) -> ExplorerSession {
    match action {
        Action::Show(key) => {
            if !session.has_shown(key) {
                session.shown.push(key);
            }
        }
        Action::Reset => session.shown.clear(),
        Action::Refresh => {}
    }
    session
}

/// Build the view for a session: open questions plus one panel per shown key
pub fn build_view(session: &ExplorerSession, tracks: &RecordSet) -> ExplorerView {
    let remaining: Vec<Question> = InsightKey::ALL
        .into_iter()
        .filter(|key| !session.has_shown(*key))
        .map(|key| Question {
            key,
            text: key.question(),
        })
        .collect();

    let panels = session
        .shown
        .iter()
        .map(|&key| match build_insight(key, tracks) {
            Ok(insight) => InsightPanel {
                key,
                insight: Some(insight),
                error: None,
            },
            Err(e) => InsightPanel {
                key,
                insight: None,
                error: Some(e.to_string()),
            },
        })
        .collect();

    ExplorerView {
        all_explored: remaining.is_empty(),
        remaining,
        panels,
    }
}

/// Apply an action and render the resulting view
pub fn render(
    session: ExplorerSession,
    action: Action,
    tracks: &RecordSet,
) -> (ExplorerSession, ExplorerView) {
    let session = advance(session, action);
    let view = build_view(&session, tracks);
    (session, view)
}

/// Registry limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Sessions idle longer than this are evicted (seconds)
    pub idle_timeout_seconds: u64,
    /// Maximum live sessions; the least recently used is evicted beyond this
    pub max_sessions: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            idle_timeout_seconds: 3600,
            max_sessions: 256,
        }
    }
}

/// Stored state for one visitor
#[derive(Debug, Clone)]
struct SessionEntry {
    tracks: Arc<RecordSet>,
    session: ExplorerSession,
    last_seen: Instant,
}

/// Session state after an action, with the tracks it renders against
#[derive(Debug, Clone)]
pub struct SessionSnapshot {
    pub session: ExplorerSession,
    pub tracks: Arc<RecordSet>,
}

impl SessionSnapshot {
    /// Build the charts for this snapshot
    pub fn view(&self) -> ExplorerView {
        build_view(&self.session, &self.tracks)
    }
}

/// Session id → (prepared tracks, explorer state)
pub struct SessionRegistry {
    config: RegistryConfig,
    entries: HashMap<String, SessionEntry>,
}

impl SessionRegistry {
    /// Create an empty registry
    pub fn new(config: RegistryConfig) -> Self {
        info!("Creating explorer session registry with config: {:?}", config);
        Self {
            config,
            entries: HashMap::new(),
        }
    }

    /// Register prepared tracks under a new id; returns the fresh session
    pub fn open(&mut self, id: String, tracks: Arc<RecordSet>) -> SessionSnapshot {
        self.evict_idle();
        while self.entries.len() >= self.config.max_sessions.max(1) {
            let oldest = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_seen)
                .map(|(id, _)| id.clone());
            match oldest {
                Some(oldest) => {
                    debug!("Evicting least recently used session {}", oldest);
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }

        info!("Opened explorer session {} with {} tracks", id, tracks.len());
        self.entries.insert(
            id,
            SessionEntry {
                tracks: Arc::clone(&tracks),
                session: ExplorerSession::default(),
                last_seen: Instant::now(),
            },
        );
        SessionSnapshot {
            session: ExplorerSession::default(),
            tracks,
        }
    }

    /// Apply an action to a registered session and mark it as seen
    ///
    /// Only the session state changes here; charts are built from the
    /// returned snapshot.
    pub fn apply(&mut self, id: &str, action: Action) -> Result<SessionSnapshot, ExplorerError> {
        let entry = self
            .entries
            .get_mut(id)
            .ok_or_else(|| ExplorerError::SessionNotFound(id.to_string()))?;

        entry.session = advance(std::mem::take(&mut entry.session), action);
        entry.last_seen = Instant::now();
        debug!("Session {} applied {:?}", id, action);
        Ok(SessionSnapshot {
            session: entry.session.clone(),
            tracks: Arc::clone(&entry.tracks),
        })
    }

    /// Drop a session
    pub fn close(&mut self, id: &str) -> bool {
        self.entries.remove(id).is_some()
    }

    /// Remove sessions idle past the timeout; returns how many were removed
    pub fn evict_idle(&mut self) -> usize {
        let timeout = Duration::from_secs(self.config.idle_timeout_seconds);
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.last_seen.elapsed() < timeout);
        let removed = before - self.entries.len();
        if removed > 0 {
            info!("Evicted {} idle explorer sessions", removed);
        }
        removed
    }

    /// Number of live sessions
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no sessions are live
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new(RegistryConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use record_set::{from_bytes, ReadOptions};

    fn tracks() -> Arc<RecordSet> {
        Arc::new(data())
    }

    fn data() -> RecordSet {
        from_bytes(
            b"year,duration_min,danceability,energy,valence,tempo,decade\n\
              1990,3.0,0.5,0.4,0.6,100,1990\n",
            &ReadOptions::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_initial_view_offers_everything() {
        let (session, view) = render(ExplorerSession::default(), Action::Refresh, &data());
        assert!(session.shown().is_empty());
        assert_eq!(view.remaining.len(), 8);
        assert!(view.panels.is_empty());
        assert!(!view.all_explored);
    }

    #[test]
    fn test_show_removes_one_question() {
        let data = data();
        let (session, view) = render(
            ExplorerSession::default(),
            Action::Show(InsightKey::HistFeatures),
            &data,
        );
        assert_eq!(view.remaining.len(), 7);
        assert_eq!(view.panels.len(), 1);
        assert!(view.panels[0].insight.is_some());

        // Showing the same key again changes nothing
        let (session, view) = render(session, Action::Show(InsightKey::HistFeatures), &data);
        assert_eq!(session.shown().len(), 1);
        assert_eq!(view.remaining.len(), 7);
    }

    #[test]
    fn test_all_explored_then_reset() {
        let data = data();
        let mut session = ExplorerSession::default();
        for key in InsightKey::ALL {
            session = render(session, Action::Show(key), &data).0;
        }
        let (session, view) = render(session, Action::Refresh, &data);
        assert!(view.all_explored);
        assert_eq!(view.panels.len(), 8);

        let (session, view) = render(session, Action::Reset, &data);
        assert!(session.shown().is_empty());
        assert_eq!(view.remaining.len(), 8);
    }

    #[test]
    fn test_panels_keep_pick_order() {
        let data = data();
        let (session, _) = render(
            ExplorerSession::default(),
            Action::Show(InsightKey::LineDecadeTrends),
            &data,
        );
        let (_, view) = render(session, Action::Show(InsightKey::ScatterEnergyValence), &data);
        let keys: Vec<InsightKey> = view.panels.iter().map(|p| p.key).collect();
        assert_eq!(
            keys,
            vec![InsightKey::LineDecadeTrends, InsightKey::ScatterEnergyValence]
        );
    }

    #[test]
    fn test_missing_column_becomes_panel_error() {
        let data = from_bytes(b"energy\n0.5\n", &ReadOptions::default()).unwrap();
        let (_, view) = render(
            ExplorerSession::default(),
            Action::Show(InsightKey::ScatterEnergyValence),
            &data,
        );
        assert!(view.panels[0].insight.is_none());
        assert_eq!(
            view.panels[0].error.as_deref(),
            Some("Dataset has no `valence` column")
        );
    }

    #[test]
    fn test_registry_lifecycle() {
        let mut registry = SessionRegistry::default();
        let view = registry.open("s1".into(), tracks()).view();
        assert_eq!(view.remaining.len(), 8);
        assert_eq!(registry.len(), 1);

        let snapshot = registry
            .apply("s1", Action::Show(InsightKey::HistTempoDecade))
            .unwrap();
        assert_eq!(snapshot.session.shown(), &[InsightKey::HistTempoDecade]);
        assert_eq!(snapshot.view().remaining.len(), 7);

        // the registry keeps the advanced state for the next request
        let snapshot = registry.apply("s1", Action::Refresh).unwrap();
        assert_eq!(snapshot.view().panels.len(), 1);

        assert!(matches!(
            registry.apply("nope", Action::Refresh),
            Err(ExplorerError::SessionNotFound(_))
        ));
        assert!(registry.close("s1"));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_advance_does_not_build_charts() {
        let session = advance(ExplorerSession::default(), Action::Show(InsightKey::HistFeatures));
        let session = advance(session, Action::Show(InsightKey::HistFeatures));
        assert_eq!(session.shown(), &[InsightKey::HistFeatures]);
        assert!(advance(session, Action::Reset).shown().is_empty());
    }

    #[test]
    fn test_snapshot_shares_tracks() {
        let mut registry = SessionRegistry::default();
        let shared = tracks();
        registry.open("s1".into(), Arc::clone(&shared));
        let snapshot = registry.apply("s1", Action::Refresh).unwrap();
        assert!(Arc::ptr_eq(&snapshot.tracks, &shared));
    }

    #[test]
    fn test_registry_capacity() {
        let mut registry = SessionRegistry::new(RegistryConfig {
            max_sessions: 2,
            ..Default::default()
        });
        registry.open("a".into(), tracks());
        registry.open("b".into(), tracks());
        registry.open("c".into(), tracks());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_zero_timeout_evicts() {
        let mut registry = SessionRegistry::new(RegistryConfig {
            idle_timeout_seconds: 0,
            ..Default::default()
        });
        registry.open("a".into(), tracks());
        assert_eq!(registry.evict_idle(), 1);
    }
}
