use axum::extract::State;
use axum::Json;

use super::PrevisaoState;
use crate::models::HealthStatus;

/// GET /health. Always 200; the body tells ready apart from degraded.
pub async fn health(State(state): State<PrevisaoState>) -> Json<HealthStatus> {
    if state.artifacts().is_some() {
        Json(HealthStatus::operational())
    } else {
        Json(HealthStatus::degraded())
    }
}

#[cfg(test)]
mod tests {
    use crate::forecast::testutil;
    use crate::routes::{previsao_router, PrevisaoState};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    async fn get_health(router: Router) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).expect("request"))
            .await
            .expect("response");

        let status = response.status();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("body")
            .to_bytes();

        (status, serde_json::from_slice(&body).expect("json body"))
    }

    #[tokio::test]
    async fn test_health_reports_ok_when_loaded() {
        let router = previsao_router(PrevisaoState::new(Some(testutil::constant_artifacts(
            0.5, 5.0, 20.0,
        ))));

        let (status, body) = get_health(router).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["message"], "Modelo carregado e API operacional.");
    }

    #[tokio::test]
    async fn test_health_reports_error_when_degraded_still_200() {
        let router = previsao_router(PrevisaoState::new(None));

        let (status, body) = get_health(router).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Modelo ou scaler não carregado.");
    }
}
