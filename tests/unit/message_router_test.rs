//! Unit tests for the wire protocol and the channel router.

use std::sync::Arc;

use seekmark::message_router::{
    CommandAck, ContextId, CurrentVideo, Message, Response, Router,
};
use seekmark::types::errors::RouterError;

// === Wire format ===

#[test]
fn test_messages_round_trip_their_wire_tags() {
    let cases = vec![
        (
            Message::New {
                video_id: "abc123".to_string(),
            },
            r#"{"type":"NEW","videoId":"abc123"}"#,
        ),
        (Message::Play { value: 42.5 }, r#"{"type":"PLAY","value":42.5}"#),
        (
            Message::Delete { value: 50.0 },
            r#"{"type":"DELETE","value":50.0}"#,
        ),
        (Message::GetVideoData, r#"{"type":"GET_VIDEO_DATA"}"#),
        (Message::GetCurrentVideo, r#"{"type":"GET_CURRENT_VIDEO"}"#),
        (
            Message::RefreshContentScript,
            r#"{"type":"REFRESH_CONTENT_SCRIPT"}"#,
        ),
    ];

    for (message, wire) in cases {
        assert_eq!(serde_json::to_string(&message).unwrap(), wire);
        assert_eq!(Message::from_json(wire).unwrap(), message);
    }
}

#[test]
fn test_unknown_wire_tag_fails_parse() {
    assert!(Message::from_json(r#"{"type":"SHRUG"}"#).is_err());
    assert!(Message::from_json(r#"{"no_type":true}"#).is_err());
    assert!(Message::from_json("not json").is_err());
}

#[test]
fn test_malformed_payload_fails_parse() {
    // PLAY without its value is not a valid message.
    assert!(Message::from_json(r#"{"type":"PLAY"}"#).is_err());
    assert!(Message::from_json(r#"{"type":"NEW"}"#).is_err());
}

#[test]
fn test_ack_serialization_omits_absent_error() {
    let ok = serde_json::to_string(&CommandAck::ok()).unwrap();
    assert_eq!(ok, r#"{"success":true}"#);

    let failed = serde_json::to_string(&CommandAck::failed("nope")).unwrap();
    assert_eq!(failed, r#"{"success":false,"error":"nope"}"#);
}

#[test]
fn test_current_video_serialization() {
    let some = CurrentVideo {
        video_id: Some("abc123".to_string()),
    };
    assert_eq!(
        serde_json::to_string(&some).unwrap(),
        r#"{"videoId":"abc123"}"#
    );

    let none = CurrentVideo { video_id: None };
    assert_eq!(serde_json::to_string(&none).unwrap(), "{}");
}

// === Routing ===

#[tokio::test]
async fn test_send_to_unregistered_context_is_unavailable() {
    let router = Router::new();
    let err = router
        .send(ContextId::Page, Message::GetVideoData)
        .await
        .unwrap_err();
    assert!(matches!(err, RouterError::ContextUnavailable(_)));
}

#[tokio::test]
async fn test_request_reaches_handler_and_returns_reply() {
    let router = Arc::new(Router::new());
    let mut inbox = router.register(ContextId::Tracker);

    tokio::spawn(async move {
        while let Some(envelope) = inbox.recv().await {
            if let Some(reply) = envelope.reply {
                let _ = reply.send(Response::CurrentVideo(CurrentVideo {
                    video_id: Some("abc123".to_string()),
                }));
            }
        }
    });

    let response = router
        .request(ContextId::Tracker, Message::GetCurrentVideo)
        .await
        .unwrap();
    assert_eq!(
        response,
        Response::CurrentVideo(CurrentVideo {
            video_id: Some("abc123".to_string())
        })
    );
}

#[tokio::test]
async fn test_request_to_dropped_context_is_unavailable() {
    let router = Router::new();
    let inbox = router.register(ContextId::Page);
    drop(inbox);

    let err = router
        .request(ContextId::Page, Message::GetVideoData)
        .await
        .unwrap_err();
    assert!(matches!(err, RouterError::ContextUnavailable(_)));
}

#[tokio::test]
async fn test_handler_dropping_reply_is_reported() {
    let router = Arc::new(Router::new());
    let mut inbox = router.register(ContextId::Page);

    tokio::spawn(async move {
        while let Some(envelope) = inbox.recv().await {
            // Drop the reply channel without answering.
            drop(envelope.reply);
        }
    });

    let err = router
        .request(ContextId::Page, Message::GetVideoData)
        .await
        .unwrap_err();
    assert!(matches!(err, RouterError::ReplyDropped(_)));
}

#[tokio::test]
async fn test_deregistered_context_becomes_unavailable() {
    let router = Router::new();
    let _inbox = router.register(ContextId::Popup);
    router.deregister(ContextId::Popup);

    let err = router
        .send(ContextId::Popup, Message::GetVideoData)
        .await
        .unwrap_err();
    assert!(matches!(err, RouterError::ContextUnavailable(_)));
}

#[tokio::test]
async fn test_fire_and_forget_delivery() {
    let router = Arc::new(Router::new());
    let mut inbox = router.register(ContextId::Page);

    router
        .send(
            ContextId::Page,
            Message::New {
                video_id: "abc123".to_string(),
            },
        )
        .await
        .unwrap();

    let envelope = inbox.recv().await.expect("envelope delivered");
    assert!(envelope.reply.is_none());
    assert_eq!(
        envelope.message,
        Message::New {
            video_id: "abc123".to_string()
        }
    );
}
