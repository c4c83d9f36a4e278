//! Tests for the backend client

#[cfg(test)]
mod tests {
    use crate::client::{JournalBackend, RestBackend};
    use crate::config::BackendConfig;
    use crate::error::JournalError;
    use crate::types::TradeQuery;
    use axum::{
        extract::Query,
        http::{HeaderMap, StatusCode},
        response::{IntoResponse, Json},
        routing::{get, post},
        Router,
    };
    use parking_lot::Mutex;
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::Arc;

    type Params = HashMap<String, String>;

    /// Serve `router` on an ephemeral local port, returning its base URL
    async fn serve(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn backend_at(url: &str, access_token: Option<&str>) -> RestBackend {
        RestBackend::new(&BackendConfig {
            url: url.to_string(),
            timeout_secs: 5,
            ..backend_config(access_token)
        })
        .unwrap()
    }

    fn row(id: usize) -> Value {
        json!({"id": format!("t{}", id), "pnl_neto": 1, "fecha": "2024-03-04"})
    }

    fn backend_config(access_token: Option<&str>) -> BackendConfig {
        BackendConfig {
            url: "http://127.0.0.1:9/".to_string(),
            api_key: "anon-key".to_string(),
            access_token: access_token.map(String::from),
            table: "trades".to_string(),
            timeout_secs: 1,
        }
    }

    #[test]
    fn test_session_from_config() {
        let backend = RestBackend::new(&backend_config(Some("user-jwt"))).unwrap();
        assert!(backend.has_session());

        let backend = RestBackend::new(&backend_config(None)).unwrap();
        assert!(!backend.has_session());
    }

    #[tokio::test]
    async fn test_sign_out_without_session_is_local() {
        // no session means no request, so the unreachable URL is never hit
        let backend = RestBackend::new(&backend_config(None)).unwrap();
        tokio_test::assert_ok!(backend.sign_out().await);
        assert!(!backend.has_session());
    }

    #[tokio::test]
    async fn test_unreachable_backend_surfaces_http_error() {
        let backend = RestBackend::new(&backend_config(Some("user-jwt"))).unwrap();

        let err = backend
            .fetch_trades(&crate::types::TradeQuery::all())
            .await
            .unwrap_err();
        assert!(err.is_backend());

        // a failed revoke keeps the session
        assert!(backend.sign_out().await.is_err());
        assert!(backend.has_session());
    }

    #[tokio::test]
    async fn test_fetch_sends_credentials_and_order() {
        let seen: Arc<Mutex<Option<(HeaderMap, Params)>>> = Arc::default();
        let captured = seen.clone();
        let router = Router::new().route(
            "/rest/v1/trades",
            get(move |headers: HeaderMap, Query(params): Query<Params>| async move {
                *captured.lock() = Some((headers, params));
                Json(json!([{"id": "a1", "pnl_neto": "12.5", "fecha": "2024-03-04"}]))
            }),
        );
        let backend = backend_at(&serve(router).await, Some("user-jwt"));

        let trades = backend.fetch_trades(&TradeQuery::all()).await.unwrap();
        assert_eq!(trades.len(), 1);
        assert_eq!(trades[0].id, "a1");

        let (headers, params) = seen.lock().take().unwrap();
        assert_eq!(headers["apikey"], "anon-key");
        assert_eq!(headers["authorization"], "Bearer user-jwt");
        assert_eq!(params["order"], "fecha.asc");
        assert_eq!(params["offset"], "0");
    }

    #[tokio::test]
    async fn test_error_status_maps_to_backend_error() {
        let router = Router::new().route(
            "/rest/v1/trades",
            get(|| async {
                (
                    StatusCode::FORBIDDEN,
                    Json(json!({"code": "42501", "message": "permission denied for table trades"})),
                )
            }),
        );
        let backend = backend_at(&serve(router).await, Some("user-jwt"));

        let err = backend.fetch_trades(&TradeQuery::all()).await.unwrap_err();
        match err {
            JournalError::Backend { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "permission denied for table trades");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_fetch_pages_through_row_cap() {
        let requests: Arc<Mutex<Vec<Params>>> = Arc::default();
        let log = requests.clone();
        let router = Router::new().route(
            "/rest/v1/trades",
            get(move |Query(params): Query<Params>| async move {
                let offset: usize = params["offset"].parse().unwrap();
                let limit: usize = params["limit"].parse().unwrap();
                log.lock().push(params);

                let rows: Vec<Value> = (offset..(offset + limit).min(1500)).map(row).collect();
                Json(Value::Array(rows))
            }),
        );
        let backend = backend_at(&serve(router).await, None);

        let trades = backend.fetch_trades(&TradeQuery::all()).await.unwrap();
        assert_eq!(trades.len(), 1500);
        assert_eq!(trades[1499].id, "t1499");

        let offsets: Vec<String> = requests.lock().iter().map(|p| p["offset"].clone()).collect();
        assert_eq!(offsets, vec!["0", "1000"]);
    }

    #[tokio::test]
    async fn test_limited_fetch_is_single_page() {
        let requests: Arc<Mutex<Vec<Params>>> = Arc::default();
        let log = requests.clone();
        let router = Router::new().route(
            "/rest/v1/trades",
            get(move |Query(params): Query<Params>| async move {
                let limit: usize = params["limit"].parse().unwrap();
                log.lock().push(params);
                Json(Value::Array((0..limit).map(row).collect()))
            }),
        );
        let backend = backend_at(&serve(router).await, None);

        let trades = backend.fetch_trades(&TradeQuery::recent(5)).await.unwrap();
        assert_eq!(trades.len(), 5);

        let requests = requests.lock();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0]["limit"], "5");
        assert_eq!(requests[0]["order"], "fecha.desc");
    }

    #[tokio::test]
    async fn test_delete_without_match_is_not_found() {
        let router = Router::new().route(
            "/rest/v1/trades",
            axum::routing::delete(|Query(params): Query<Params>| async move {
                assert_eq!(params["id"], "eq.missing");
                Json(json!([]))
            }),
        );
        let backend = backend_at(&serve(router).await, Some("user-jwt"));

        let err = backend.delete_trade("missing").await.unwrap_err();
        assert!(matches!(err, JournalError::NotFound(id) if id == "missing"));
    }

    #[tokio::test]
    async fn test_sign_out_with_expired_session_clears_it() {
        let router = Router::new().route(
            "/auth/v1/logout",
            post(|| async { StatusCode::UNAUTHORIZED.into_response() }),
        );
        let backend = backend_at(&serve(router).await, Some("expired-jwt"));

        tokio_test::assert_ok!(backend.sign_out().await);
        assert!(!backend.has_session());
    }

    #[tokio::test]
    async fn test_sign_out_server_error_keeps_session() {
        let router = Router::new().route(
            "/auth/v1/logout",
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "upstream down") }),
        );
        let backend = backend_at(&serve(router).await, Some("user-jwt"));

        let err = backend.sign_out().await.unwrap_err();
        assert!(matches!(err, JournalError::Backend { status: 500, .. }));
        assert!(backend.has_session());
    }
}
