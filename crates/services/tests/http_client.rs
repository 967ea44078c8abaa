mod support;

use std::sync::{Arc, Mutex};

use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use practice_core::model::{SkillType, TopicType, VideoQuery, weakness_tags};
use services::{
    PracticeApiClient, PracticeApiConfig, PracticeApiError, PracticeMode, PracticeSession,
    UpstreamErrorKind,
};
use support::{essay_of, topic_id};

type Captured = Arc<Mutex<Vec<Value>>>;

async fn serve(router: Router) -> PracticeApiClient {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    PracticeApiClient::new(PracticeApiConfig::new(format!("http://{addr}/")))
}

fn capturing(path: &str, captured: &Captured, reply: Value) -> Router {
    let captured = captured.clone();
    Router::new().route(
        path,
        post(move |Json(body): Json<Value>| {
            let captured = captured.clone();
            let reply = reply.clone();
            async move {
                captured.lock().unwrap().push(body);
                Json(reply)
            }
        }),
    )
}

fn failing(path: &str, status: StatusCode, body: Value) -> Router {
    Router::new().route(
        path,
        post(move || {
            let body = body.clone();
            async move { (status, Json(body)) }
        }),
    )
}

#[tokio::test]
async fn writing_topic_sends_type_and_id() {
    let captured = Captured::default();
    let client = serve(capturing(
        "/writing/topic",
        &captured,
        json!({
            "topic_id": "t1",
            "topic_type": "exam",
            "test_name": "Cambridge 17",
            "question_type": "Opinion",
            "context": "Some people think cities are better than villages."
        }),
    ))
    .await;

    let topic = client
        .writing_topic(TopicType::Exam, Some(&topic_id("t1")), None)
        .await
        .unwrap();

    assert_eq!(topic.id().as_str(), "t1");
    assert_eq!(topic.topic_type(), TopicType::Exam);
    assert_eq!(topic.test_name(), Some("Cambridge 17"));
    assert_eq!(topic.question_type(), "Opinion");
    assert_eq!(
        captured.lock().unwrap().as_slice(),
        &[json!({"topic_type": "exam", "topic_id": "t1", "category": null})]
    );
}

#[tokio::test]
async fn generated_topic_falls_back_to_requested_type() {
    let captured = Captured::default();
    let client = serve(capturing(
        "/writing/topic",
        &captured,
        json!({"topic_id": "gen-1", "context": "Describe a festival."}),
    ))
    .await;

    let topic = client
        .writing_topic(TopicType::Generated, None, Some("Culture"))
        .await
        .unwrap();

    assert_eq!(topic.topic_type(), TopicType::Generated);
    assert_eq!(
        captured.lock().unwrap()[0],
        json!({"topic_type": "generated", "topic_id": null, "category": "Culture"})
    );
}

#[tokio::test]
async fn exam_lookup_without_id_never_reaches_the_service() {
    let captured = Captured::default();
    let client = serve(capturing("/writing/topic", &captured, json!({}))).await;

    let err = client
        .writing_topic(TopicType::Exam, None, None)
        .await
        .unwrap_err();

    assert!(matches!(err, PracticeApiError::MissingTopicId(TopicType::Exam)));
    assert!(captured.lock().unwrap().is_empty());
}

#[tokio::test]
async fn topic_list_is_decoded_into_a_catalog() {
    let router = Router::new().route(
        "/topics",
        get(|| async {
            Json(json!({
                "speaking_topics": [{"id": "s1", "name": "Hometown"}],
                "writing_exam_topics": [{"id": "t1", "name": "Cambridge 17 Test 1"}],
                "writing_custom_topics": [
                    {"id": "custom_0", "category": "Environment", "type": "opinion"},
                    {"id": "custom_1", "category": null, "type": null},
                    {"id": "custom_2", "category": "Education", "type": "discussion"}
                ],
                "total": 5
            }))
        }),
    );
    let client = serve(router).await;

    let catalog = client.topics().await.unwrap();

    assert!(!catalog.is_empty());
    assert_eq!(catalog.speaking.len(), 1);
    assert_eq!(catalog.writing_len(TopicType::Exam), 1);
    assert_eq!(catalog.writing_len(TopicType::Custom), 3);
    assert_eq!(catalog.custom[0].kind, "opinion");
    assert_eq!(catalog.custom[1].kind, "");
    assert_eq!(catalog.custom_categories(), ["Environment", "Education"]);
}

#[tokio::test]
async fn evaluation_request_and_flat_scores() {
    let captured = Captured::default();
    let client = serve(capturing(
        "/writing/evaluate",
        &captured,
        json!({
            "topic_id": "t1",
            "essay": "My essay",
            "word_count": 2,
            "task_achievement_score": 6.0,
            "coherence_cohesion_score": 7.0,
            "lexical_resource_score": 6.5,
            "grammar_accuracy_score": 5.5,
            "overall_score": 6.5,
            "feedback": "Clear position throughout.",
            "errors": [
                {"type": "grammar", "text": "he go", "correction": "he goes", "explanation": "Third person singular"},
                {"type": "strength", "text": "varied linking words", "correction": "", "explanation": "Good cohesion"}
            ],
            "suggestions": ["Use more examples"],
            "improved_version": ""
        }),
    ))
    .await;

    let result = client
        .evaluate_writing(&topic_id("t1"), "Cities or villages?", "My essay")
        .await
        .unwrap();

    assert_eq!(
        captured.lock().unwrap()[0],
        json!({"topic_id": "t1", "topic_context": "Cities or villages?", "essay": "My essay"})
    );
    assert!((result.scores().overall - 6.5).abs() < f32::EPSILON);
    assert!((result.scores().grammar_accuracy - 5.5).abs() < f32::EPSILON);
    assert_eq!(result.feedback(), "Clear position throughout.");
    assert_eq!(result.errors().count(), 1);
    assert_eq!(
        result
            .weaknesses()
            .iter()
            .map(|tag| tag.as_str())
            .collect::<Vec<_>>(),
        vec!["grammar"]
    );
    assert_eq!(result.suggestions(), ["Use more examples".to_string()]);
    assert_eq!(result.improved_version(), None);
    let strength = result.issues().iter().find(|issue| issue.is_strength()).unwrap();
    assert_eq!(strength.correction, None);
}

#[tokio::test]
async fn service_detail_is_surfaced_verbatim() {
    let client = serve(failing(
        "/writing/evaluate",
        StatusCode::BAD_GATEWAY,
        json!({"detail": "Upstream model timed out"}),
    ))
    .await;

    let err = client
        .evaluate_writing(&topic_id("t1"), "ctx", "essay")
        .await
        .unwrap_err();

    match err {
        PracticeApiError::Service {
            status,
            message,
            kind,
        } => {
            assert_eq!(status.as_u16(), 502);
            assert_eq!(message, "Upstream model timed out");
            assert_eq!(kind, None);
        }
        other => panic!("unexpected error {other:?}"),
    }
}

#[tokio::test]
async fn structured_error_kind_is_read() {
    let client = serve(failing(
        "/writing/evaluate",
        StatusCode::SERVICE_UNAVAILABLE,
        json!({"message": "model offline", "error_kind": "configuration"}),
    ))
    .await;

    let err = client
        .evaluate_writing(&topic_id("t1"), "ctx", "essay")
        .await
        .unwrap_err();

    assert_eq!(err.upstream_kind(), Some(UpstreamErrorKind::Configuration));
    assert_eq!(err.to_string(), "model offline");
}

#[tokio::test]
async fn session_reports_missing_model_key_as_configuration() {
    let topic_router = Router::new().route(
        "/writing/topic",
        post(|| async {
            Json(json!({
                "topic_id": "t1",
                "topic_type": "exam",
                "context": "Some people think cities are better than villages."
            }))
        }),
    );
    let router = topic_router.merge(failing(
        "/writing/evaluate",
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"detail": "No Groq API key configured"}),
    ));
    let client = Arc::new(serve(router).await);
    let session = PracticeSession::with_client(client);

    session.select_topic(Some(topic_id("t1")), None).await.unwrap();
    session.set_essay(essay_of(60));
    let err = session.submit_essay().await.unwrap_err();

    assert!(err.is_configuration());
    let snapshot = session.snapshot();
    assert_eq!(snapshot.mode, PracticeMode::Writing);
    assert_eq!(snapshot.word_count, 60);
    assert!(snapshot.error.is_some_and(|error| error.is_configuration()));
}

#[tokio::test]
async fn video_request_carries_skill_and_limit() {
    let captured = Captured::default();
    let video = |id: &str, thumbnail: &str| {
        json!({
            "video_id": id,
            "title": format!("Lesson {id}"),
            "description": "Past tense explained",
            "thumbnail": thumbnail,
            "channel": "English Lab",
            "url": format!("https://www.youtube.com/watch?v={id}"),
            "embed_url": format!("https://www.youtube.com/embed/{id}"),
            "search_query": "english past tense"
        })
    };
    let client = serve(capturing(
        "/youtube/recommendations",
        &captured,
        json!({
            "videos": [
                video("a", ""),
                video("b", "https://i.ytimg.com/vi/b/mqdefault.jpg"),
                video("c", "https://i.ytimg.com/vi/c/mqdefault.jpg")
            ],
            "queries_used": ["english past tense"]
        }),
    ))
    .await;
    let query = VideoQuery::new("Good structure", weakness_tags(["tense"]), SkillType::Writing);

    let videos = client.video_recommendations(&query, 2).await.unwrap();

    assert_eq!(videos.len(), 2);
    assert_eq!(videos[0].id.as_str(), "a");
    assert_eq!(videos[0].thumbnail, None);
    assert_eq!(videos[1].embed_url.as_str(), "https://www.youtube.com/embed/b");
    assert_eq!(
        captured.lock().unwrap()[0],
        json!({
            "feedback": "Good structure",
            "weaknesses": ["tense"],
            "skill_type": "writing",
            "max_videos": 2
        })
    );
}

#[tokio::test]
async fn health_check_reports_ready() {
    let router = Router::new().route(
        "/health",
        get(|| async {
            Json(json!({"status": "ok", "minio_connected": false, "data_loaded": true}))
        }),
    );
    let client = serve(router).await;

    let health = client.health().await.unwrap();

    assert_eq!(health.status, "ok");
    assert!(health.data_loaded);
    assert!(!health.minio_connected);
    assert!(health.is_ready());
}

#[tokio::test]
async fn speaking_evaluation_reported_failure_is_an_error() {
    let captured = Captured::default();
    let client = serve(capturing(
        "/speaking/evaluate-full",
        &captured,
        json!({
            "topic_id": "s1",
            "success": false,
            "transcript": null,
            "error": "Transcript was empty",
            "layers": {},
            "scores": null,
            "feedback": null
        }),
    ))
    .await;

    let err = client
        .evaluate_speaking(&topic_id("s1"), "", Some("Describe your hometown"))
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Transcript was empty");
    assert_eq!(captured.lock().unwrap()[0]["topic_context"], "Describe your hometown");
}

#[tokio::test]
async fn speaking_evaluation_improvements_become_weaknesses() {
    let captured = Captured::default();
    let client = serve(capturing(
        "/speaking/evaluate-full",
        &captured,
        json!({
            "topic_id": "s1",
            "success": true,
            "transcript": "I live in a small town",
            "error": null,
            "layers": {
                "pronunciation_fluency": {"pronunciation_score": 6.0, "fluency_score": 6.5},
                "topic_matching": {"topic_matching_score": 8.0, "is_off_topic": false}
            },
            "scores": {
                "pronunciation": 6.0,
                "fluency": 6.5,
                "grammar": 6.0,
                "vocabulary": 5.5,
                "content": 6.0,
                "topic_matching": 8.0,
                "overall": 6.5,
                "is_off_topic": 0.0
            },
            "feedback": {
                "summary": "Fluent but simple",
                "strengths": ["pace"],
                "improvements": ["vocabulary range", "pronunciation"],
                "vietnamese_tips": [],
                "errors": [],
                "suggestions": [],
                "is_off_topic": false,
                "off_topic_warning": "",
                "topic_analysis": {
                    "topic_question": "Describe your hometown",
                    "user_response": "I live in a small town",
                    "matching_explanation": "On topic",
                    "score": 8
                }
            }
        }),
    ))
    .await;

    let evaluation = client
        .evaluate_speaking(&topic_id("s1"), "I live in a small town", None)
        .await
        .unwrap();

    assert_eq!(evaluation.overall(), Some(6.5));
    assert!(!evaluation.is_off_topic());
    assert_eq!(evaluation.transcript(), "I live in a small town");
    assert_eq!(captured.lock().unwrap()[0]["topic_context"], Value::Null);
    let query = VideoQuery::from_speaking(&evaluation);
    assert_eq!(query.skill_type(), SkillType::Speaking);
    assert_eq!(query.feedback(), "Fluent but simple");
    assert_eq!(query.weaknesses().len(), 2);
}
