//! Instructional video suggestions shown beside an evaluation result.

use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, warn};

use practice_core::model::{Video, VideoId, VideoQuery};

use crate::api::{PracticeApiClient, VideoRecommender};
use crate::error::VideoError;

/// What the recommendations area should render.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum VideoPanel {
    /// Nothing requested yet; render nothing.
    #[default]
    Idle,
    Loading,
    /// Inline message; never affects the practice session.
    Failed(String),
    /// The search found nothing; render nothing.
    Empty,
    Ready {
        videos: Vec<Video>,
        /// The one video whose player is mounted.
        selected: Option<VideoId>,
    },
}

impl VideoPanel {
    #[must_use]
    pub fn is_visible(&self) -> bool {
        !matches!(self, VideoPanel::Idle | VideoPanel::Empty)
    }

    /// The video whose player should be mounted, if any.
    #[must_use]
    pub fn player(&self) -> Option<&Video> {
        match self {
            VideoPanel::Ready {
                videos,
                selected: Some(id),
            } => videos.iter().find(|video| &video.id == id),
            _ => None,
        }
    }
}

/// How a `request` call was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// No feedback and no weaknesses; nothing to search on.
    Skipped,
    /// This exact query already fired for this instance, possibly earlier
    /// than the most recent one.
    AlreadyRequested,
    Applied,
    /// A newer query started while this one was in flight.
    Superseded,
}

#[derive(Debug, Default)]
struct PanelState {
    panel: VideoPanel,
    fired: HashSet<VideoQuery>,
    generation: u64,
}

/// Fetch guard and presentation state for one hosting view.
///
/// Each distinct query fires at most once per instance, even when it comes
/// back after a different one. The latch is set before the request starts, so
/// re-invocations while it is pending are no-ops, and a newer query makes
/// older responses stale.
pub struct VideoRecommendations {
    recommender: Arc<dyn VideoRecommender>,
    limit: usize,
    state: Mutex<PanelState>,
}

impl VideoRecommendations {
    #[must_use]
    pub fn new(recommender: Arc<dyn VideoRecommender>, limit: usize) -> Self {
        Self {
            recommender,
            limit: limit.max(1),
            state: Mutex::new(PanelState::default()),
        }
    }

    /// Use the client's configured video limit.
    #[must_use]
    pub fn with_client(client: Arc<PracticeApiClient>) -> Self {
        let limit = client.config().video_limit;
        Self::new(client, limit)
    }

    #[must_use]
    pub fn panel(&self) -> VideoPanel {
        self.state().panel.clone()
    }

    /// Fetch recommendations for `query` unless it already fired.
    ///
    /// # Errors
    ///
    /// Returns `VideoError` when the fetch fails; the panel shows it inline.
    pub async fn request(&self, query: VideoQuery) -> Result<FetchOutcome, VideoError> {
        if query.is_empty() {
            debug!("no feedback or weaknesses, skipping video fetch");
            return Ok(FetchOutcome::Skipped);
        }

        let generation = {
            let mut state = self.state();
            if !state.fired.insert(query.clone()) {
                return Ok(FetchOutcome::AlreadyRequested);
            }
            state.generation += 1;
            state.panel = VideoPanel::Loading;
            state.generation
        };

        debug!(skill = %query.skill_type(), weaknesses = query.weaknesses().len(), "fetching videos");
        let outcome = self.recommender.recommend(&query, self.limit).await;

        let mut state = self.state();
        if state.generation != generation {
            return Ok(FetchOutcome::Superseded);
        }
        match outcome {
            Ok(mut videos) => {
                videos.truncate(self.limit);
                debug!(count = videos.len(), "videos received");
                state.panel = if videos.is_empty() {
                    VideoPanel::Empty
                } else {
                    VideoPanel::Ready {
                        videos,
                        selected: None,
                    }
                };
                Ok(FetchOutcome::Applied)
            }
            Err(err) => {
                let error = VideoError::from(err);
                warn!(error = ?error, "video fetch failed");
                state.panel = VideoPanel::Failed(error.to_string());
                Err(error)
            }
        }
    }

    /// Mount the player for `id`, or unmount it if it is already playing.
    ///
    /// Returns whether a player is mounted afterwards.
    pub fn toggle(&self, id: &VideoId) -> bool {
        let mut state = self.state();
        let VideoPanel::Ready { videos, selected } = &mut state.panel else {
            return false;
        };
        if selected.as_ref() == Some(id) {
            *selected = None;
        } else if videos.iter().any(|video| &video.id == id) {
            *selected = Some(id.clone());
        }
        selected.is_some()
    }

    fn state(&self) -> MutexGuard<'_, PanelState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for VideoRecommendations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VideoRecommendations")
            .field("limit", &self.limit)
            .field("state", &*self.state())
            .finish_non_exhaustive()
    }
}
