/////////////////////////////////////////////////////////////////////////////////////////////////
// TESTS
/////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod tests {
    use crate::ai::error::{AiError, Disposition};
    use crate::ai::gateway::{AiGateway, ModelPolicy};
    use crate::ai::test_support::{ScriptedTransport, fast_policy, gateway_with};
    use crate::ai::transport::{ChatTransport, provider_message};
    use crate::ai::types::{ChatMessage, CompletionRequest, TaskProfiles};
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::time::Instant;

    fn question() -> Vec<ChatMessage> {
        vec![ChatMessage::user("What is an isotope?")]
    }

    #[tokio::test]
    async fn test_first_model_success() {
        let transport = Arc::new(ScriptedTransport::replying("Atoms with extra neutrons."));
        let gateway = gateway_with(transport.clone());
        let profiles = TaskProfiles::default();
        let answer = gateway
            .complete(&question(), profiles.assistant_chat)
            .await
            .unwrap();
        assert_eq!(answer, "Atoms with extra neutrons.");
        let calls = transport.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].model, "primary/model");
        assert_eq!(calls[0].max_tokens, 2000);
        assert!(!calls[0].stream);
    }

    #[tokio::test]
    async fn test_unauthorized_fails_fast() {
        let transport = Arc::new(ScriptedTransport::failing(AiError::Unauthorized(401)));
        let gateway = gateway_with(transport.clone());
        let result = gateway
            .complete(&question(), TaskProfiles::default().assistant_chat)
            .await;
        assert_eq!(result, Err(AiError::Unauthorized(401)));
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_key_fails_fast() {
        let transport = Arc::new(ScriptedTransport::unconfigured());
        let gateway = gateway_with(transport.clone());
        assert!(!gateway.is_configured());
        let result = gateway.assistant_chat("hello").await;
        assert_eq!(result, Err(AiError::MissingApiKey));
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_rate_limited_model_exhausts_retries_then_falls_back() {
        let transport = Arc::new(ScriptedTransport::new(|request, _| {
            if request.model == "primary/model" {
                Err(AiError::RateLimited)
            } else {
                Ok("answer from fallback".to_string())
            }
        }));
        let gateway = gateway_with(transport.clone());
        let answer = gateway.assistant_chat("hello").await.unwrap();
        assert_eq!(answer, "answer from fallback");
        assert_eq!(
            transport.models_called(),
            vec!["primary/model", "primary/model", "primary/model", "fallback/model"]
        );
    }

    #[tokio::test]
    async fn test_transient_error_recovers_on_same_model() {
        let transport = Arc::new(ScriptedTransport::new(|_, index| match index {
            0 => Err(AiError::Server(502)),
            1 => Err(AiError::ServiceUnavailable),
            _ => Ok("third time lucky".to_string()),
        }));
        let gateway = gateway_with(transport.clone());
        let answer = gateway.assistant_chat("hello").await.unwrap();
        assert_eq!(answer, "third time lucky");
        assert_eq!(
            transport.models_called(),
            vec!["primary/model", "primary/model", "primary/model"]
        );
    }

    #[tokio::test]
    async fn test_rejected_model_skips_retries() {
        let transport = Arc::new(ScriptedTransport::new(|request, _| {
            if request.model == "primary/model" {
                Err(AiError::Rejected(402))
            } else {
                Ok("ok".to_string())
            }
        }));
        let gateway = gateway_with(transport.clone());
        gateway.assistant_chat("hello").await.unwrap();
        assert_eq!(
            transport.models_called(),
            vec!["primary/model", "fallback/model"]
        );
    }

    #[tokio::test]
    async fn test_all_models_exhausted() {
        let transport = Arc::new(ScriptedTransport::failing(AiError::ServiceUnavailable));
        let gateway = gateway_with(transport.clone());
        let result = gateway.assistant_chat("hello").await;
        assert_eq!(
            result,
            Err(AiError::Exhausted(Box::new(AiError::ServiceUnavailable)))
        );
        assert_eq!(transport.calls().len(), 6);
    }

    #[tokio::test]
    async fn test_explicit_model_list() {
        let transport = Arc::new(ScriptedTransport::replying("fine"));
        let gateway = gateway_with(transport.clone());
        let models = vec!["other/model".to_string()];
        gateway
            .complete_with(&question(), &models, TaskProfiles::default().element_explanation)
            .await
            .unwrap();
        assert_eq!(transport.models_called(), vec!["other/model"]);
        assert_eq!(
            gateway
                .complete_with(&question(), &[], TaskProfiles::default().element_explanation)
                .await,
            Err(AiError::NoModels)
        );
    }

    #[tokio::test]
    async fn test_task_profiles_reach_the_transport() {
        let transport = Arc::new(ScriptedTransport::replying("{}"));
        let gateway = gateway_with(transport.clone());
        gateway
            .analyze_reaction::<serde_json::Value>(&[
                "H (Hydrogen)".to_string(),
                "Be (Beryllium)".to_string(),
            ])
            .await
            .unwrap();
        let calls = transport.calls();
        assert_eq!(calls[0].max_tokens, 1000);
        assert!((calls[0].temperature - 0.3).abs() < 1e-6);
        assert_eq!(calls[0].messages[0].role, "system");
        assert!(calls[0].messages[1].content.contains("H (Hydrogen), Be (Beryllium)"));
    }

    #[derive(Debug, serde::Deserialize, PartialEq)]
    struct Verdict {
        feasible: bool,
    }

    #[tokio::test]
    async fn test_unreadable_reply_is_retried() {
        let transport = Arc::new(ScriptedTransport::new(|_, index| match index {
            0 => Ok("Let me think about that.".to_string()),
            1 => Ok(r#"{"verdict": "maybe"}"#.to_string()),
            _ => Ok(r#"Sure: {"feasible": true}"#.to_string()),
        }));
        let gateway = gateway_with(transport.clone());
        let verdict: Verdict = gateway
            .complete_parsed(&question(), TaskProfiles::default().reaction_analysis)
            .await
            .unwrap();
        assert_eq!(verdict, Verdict { feasible: true });
        assert_eq!(
            transport.models_called(),
            vec!["primary/model", "primary/model", "primary/model"]
        );
    }

    #[tokio::test]
    async fn test_unreadable_replies_move_to_next_model() {
        let transport = Arc::new(ScriptedTransport::new(|request, _| {
            if request.model == "primary/model" {
                Ok("no json here".to_string())
            } else {
                Ok(r#"{"feasible": false}"#.to_string())
            }
        }));
        let gateway = gateway_with(transport.clone());
        let verdict: Verdict = gateway
            .complete_parsed(&question(), TaskProfiles::default().reaction_analysis)
            .await
            .unwrap();
        assert!(!verdict.feasible);
        assert_eq!(transport.calls().len(), 4);

        let always_prose = Arc::new(ScriptedTransport::replying("no json here"));
        let result: Result<Verdict, _> = gateway_with(always_prose)
            .complete_parsed(&question(), TaskProfiles::default().reaction_analysis)
            .await;
        assert!(matches!(
            result,
            Err(AiError::Exhausted(last)) if matches!(*last, AiError::MalformedResponse(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_sleeps_between_attempts() {
        let stamps = Arc::new(Mutex::new(Vec::new()));
        let recorded = stamps.clone();
        let transport = Arc::new(ScriptedTransport::new(move |_, _| {
            recorded.lock().unwrap().push(Instant::now());
            Err(AiError::RateLimited)
        }));
        let policy = ModelPolicy {
            models: vec!["primary/model".to_string()],
            attempts_per_model: 3,
            base_delay: Duration::from_secs(1),
            request_timeout: Duration::from_secs(30),
        };
        let gateway = AiGateway::new(transport, policy, TaskProfiles::default());
        let result = gateway.assistant_chat("hello").await;
        assert_eq!(
            result,
            Err(AiError::Exhausted(Box::new(AiError::RateLimited)))
        );

        let stamps = stamps.lock().unwrap();
        assert_eq!(stamps.len(), 3);
        let first_gap = stamps[1] - stamps[0];
        let second_gap = stamps[2] - stamps[1];
        assert!(first_gap >= Duration::from_secs(1));
        assert!(first_gap < Duration::from_millis(1100));
        assert!(second_gap >= Duration::from_secs(2));
        assert!(second_gap < Duration::from_millis(2100));
    }

    struct SlowTransport;

    #[async_trait]
    impl ChatTransport for SlowTransport {
        async fn complete(&self, _request: &CompletionRequest) -> Result<String, AiError> {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok("too late".to_string())
        }
    }

    #[tokio::test]
    async fn test_attempts_are_bounded_by_timeout() {
        let policy = ModelPolicy {
            models: vec!["slow/model".to_string()],
            attempts_per_model: 2,
            base_delay: Duration::ZERO,
            request_timeout: Duration::from_millis(20),
        };
        let gateway = AiGateway::new(Arc::new(SlowTransport), policy, TaskProfiles::default());
        let result = gateway.assistant_chat("hello").await;
        assert_eq!(
            result,
            Err(AiError::Exhausted(Box::new(AiError::Timeout(
                Duration::from_millis(20)
            ))))
        );
    }

    #[test]
    fn test_backoff_doubles() {
        let policy = ModelPolicy {
            base_delay: Duration::from_millis(1000),
            ..fast_policy()
        };
        assert_eq!(policy.backoff_delay(0), Duration::from_millis(1000));
        assert_eq!(policy.backoff_delay(1), Duration::from_millis(2000));
        assert_eq!(policy.backoff_delay(2), Duration::from_millis(4000));
    }

    #[test]
    fn test_status_classification() {
        assert_eq!(AiError::from_status(401), AiError::Unauthorized(401));
        assert_eq!(AiError::from_status(403), AiError::Unauthorized(403));
        assert_eq!(AiError::from_status(429), AiError::RateLimited);
        assert_eq!(AiError::from_status(503), AiError::ServiceUnavailable);
        assert_eq!(AiError::from_status(500), AiError::Server(500));
        assert_eq!(AiError::from_status(402), AiError::Rejected(402));
        assert_eq!(AiError::Unauthorized(401).disposition(), Disposition::Abort);
        assert_eq!(AiError::RateLimited.disposition(), Disposition::Retry);
        assert_eq!(AiError::Server(504).disposition(), Disposition::Retry);
        assert_eq!(AiError::Rejected(404).disposition(), Disposition::NextModel);
    }

    #[test]
    fn test_provider_message() {
        let body = r#"{"error": {"message": "Invalid model", "code": 400}}"#;
        assert_eq!(provider_message(body), "Invalid model");
        assert_eq!(provider_message("<html>bad gateway</html>"), "<html>bad gateway</html>");
    }
}
