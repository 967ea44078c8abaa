#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use practice_core::model::{
    CatalogEntry, EvaluationResult, EvaluationScores, Topic, TopicCatalog, TopicId, TopicType,
    Video, VideoId, VideoQuery, parse_video_url, weakness_tags,
};
use services::{Evaluator, PracticeApiError, TopicProvider, VideoRecommender};

pub fn upstream(message: &str) -> PracticeApiError {
    PracticeApiError::Service {
        status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
        message: message.to_string(),
        kind: None,
    }
}

pub fn essay_of(words: usize) -> String {
    (0..words)
        .map(|i| format!("word{i}"))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn topic_id(raw: &str) -> TopicId {
    TopicId::new(raw).unwrap()
}

#[derive(Clone, Debug)]
pub enum Behavior {
    Succeed,
    Fail(String),
    Cancel,
}

impl Behavior {
    fn error(&self) -> Option<PracticeApiError> {
        match self {
            Behavior::Succeed => None,
            Behavior::Fail(message) => Some(upstream(message)),
            Behavior::Cancel => Some(PracticeApiError::Cancelled),
        }
    }
}

//
// ─── TOPICS ────────────────────────────────────────────────────────────────────
//

pub struct FakeTopics {
    pub catalog_behavior: Behavior,
    pub topic_behavior: Mutex<Behavior>,
    pub list_calls: AtomicUsize,
    pub fetches: Mutex<Vec<(TopicType, Option<String>, Option<String>)>>,
    pub gate: Option<Arc<Notify>>,
}

impl FakeTopics {
    pub fn ok() -> Self {
        Self {
            catalog_behavior: Behavior::Succeed,
            topic_behavior: Mutex::new(Behavior::Succeed),
            list_calls: AtomicUsize::new(0),
            fetches: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            catalog_behavior: Behavior::Fail(message.to_string()),
            topic_behavior: Mutex::new(Behavior::Fail(message.to_string())),
            ..Self::ok()
        }
    }

    pub fn cancelling() -> Self {
        Self {
            catalog_behavior: Behavior::Cancel,
            topic_behavior: Mutex::new(Behavior::Cancel),
            ..Self::ok()
        }
    }

    /// Change how later topic fetches resolve.
    pub fn set_topic_behavior(&self, behavior: Behavior) {
        *self.topic_behavior.lock().unwrap() = behavior;
    }

    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::ok()
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.lock().unwrap().len()
    }
}

#[async_trait]
impl TopicProvider for FakeTopics {
    async fn list_topics(&self) -> Result<TopicCatalog, PracticeApiError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.catalog_behavior.error() {
            return Err(err);
        }
        Ok(TopicCatalog {
            exam: vec![CatalogEntry {
                id: topic_id("t1"),
                name: "Cambridge 17 Test 1".into(),
            }],
            ..TopicCatalog::default()
        })
    }

    async fn fetch_topic(
        &self,
        topic_type: TopicType,
        id: Option<&TopicId>,
        category: Option<&str>,
    ) -> Result<Topic, PracticeApiError> {
        let call = {
            let mut fetches = self.fetches.lock().unwrap();
            fetches.push((
                topic_type,
                id.map(|id| id.as_str().to_string()),
                category.map(str::to_string),
            ));
            fetches.len()
        };
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        let failure = self.topic_behavior.lock().unwrap().error();
        if let Some(err) = failure {
            return Err(err);
        }
        let id = id.cloned().unwrap_or_else(|| topic_id(&format!("gen-{call}")));
        Ok(
            Topic::new(id, topic_type, "Some people think cities are better than villages.")
                .with_category(category.map(str::to_string)),
        )
    }
}

//
// ─── EVALUATOR ─────────────────────────────────────────────────────────────────
//

pub struct FakeEvaluator {
    pub behavior: Behavior,
    pub calls: Mutex<Vec<(String, String, String)>>,
    pub gate: Option<Arc<Notify>>,
}

impl FakeEvaluator {
    pub fn ok() -> Self {
        Self {
            behavior: Behavior::Succeed,
            calls: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    pub fn with(behavior: Behavior) -> Self {
        Self {
            behavior,
            ..Self::ok()
        }
    }

    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::ok()
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl Evaluator for FakeEvaluator {
    async fn evaluate(
        &self,
        topic_id: &TopicId,
        context: &str,
        essay: &str,
    ) -> Result<EvaluationResult, PracticeApiError> {
        self.calls.lock().unwrap().push((
            topic_id.as_str().to_string(),
            context.to_string(),
            essay.to_string(),
        ));
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if let Some(err) = self.behavior.error() {
            return Err(err);
        }
        Ok(EvaluationResult::new(
            topic_id.clone(),
            EvaluationScores {
                task_achievement: 6.5,
                coherence_cohesion: 7.0,
                lexical_resource: 6.0,
                grammar_accuracy: 5.5,
                overall: 6.5,
            },
            "Good structure",
            weakness_tags(["tense"]),
            Vec::new(),
        ))
    }
}

//
// ─── VIDEOS ────────────────────────────────────────────────────────────────────
//

pub fn video(id: &str, title: &str) -> Video {
    Video {
        id: VideoId::new(id).unwrap(),
        title: title.to_string(),
        channel: "English Lab".into(),
        description: String::new(),
        thumbnail: Some(parse_video_url(&format!("https://img.example.com/{id}.jpg")).unwrap()),
        embed_url: parse_video_url(&format!("https://www.youtube.com/embed/{id}")).unwrap(),
        url: parse_video_url(&format!("https://www.youtube.com/watch?v={id}")).unwrap(),
    }
}

pub struct FakeRecommender {
    pub behavior: Behavior,
    pub videos: Vec<Video>,
    pub calls: Mutex<Vec<(VideoQuery, usize)>>,
    pub gate: Option<Arc<Notify>>,
}

impl FakeRecommender {
    pub fn returning(videos: Vec<Video>) -> Self {
        Self {
            behavior: Behavior::Succeed,
            videos,
            calls: Mutex::new(Vec::new()),
            gate: None,
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            behavior: Behavior::Fail(message.to_string()),
            ..Self::returning(Vec::new())
        }
    }

    pub fn gated(videos: Vec<Video>, gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::returning(videos)
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl VideoRecommender for FakeRecommender {
    async fn recommend(
        &self,
        query: &VideoQuery,
        limit: usize,
    ) -> Result<Vec<Video>, PracticeApiError> {
        self.calls.lock().unwrap().push((query.clone(), limit));
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if let Some(err) = self.behavior.error() {
            return Err(err);
        }
        // Tag each result with the query so superseded responses are detectable.
        Ok(self
            .videos
            .iter()
            .cloned()
            .map(|mut video| {
                video.description = query.feedback().to_string();
                video
            })
            .collect())
    }
}
