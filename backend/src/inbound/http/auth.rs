//! Session login and logout.
//!
//! ```text
//! POST /api/auth/login  {"email":"cook@example.com","password":"…"}
//! POST /api/auth/logout
//! ```
//!
//! Credential checks live behind the `LoginService` port; these handlers
//! only validate the payload and manage the session cookie.

use actix_web::{HttpResponse, post, web};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{DomainError, LoginCredentials, LoginValidationError};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Login request body.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "cook@example.com")]
    pub email: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = DomainError),
        (status = 401, description = "Invalid credentials", body = DomainError),
        (status = 503, description = "Storage unavailable", body = DomainError)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = LoginCredentials::try_from(payload.into_inner())?;
    let user_id = state.login.authenticate(&credentials).await?;
    session.persist_user(&user_id)?;
    Ok(HttpResponse::Ok().finish())
}

/// Drop the session cookie.
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    if let Ok(Some(user_id)) = session.user_id() {
        debug!(%user_id, "session closed");
    }
    session.purge();
    HttpResponse::NoContent().finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockLoginService;
    use crate::domain::{ErrorCode, UserId};
    use crate::inbound::http::test_utils::{session_cookie, test_app_with_login};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::{Value, json};
    use std::sync::Arc;

    #[rstest]
    #[case(json!({"email": "not-an-email", "password": "secret"}), "email")]
    #[case(json!({"email": "cook@example.com", "password": ""}), "password")]
    #[actix_web::test]
    async fn malformed_credentials_are_rejected_before_the_port(
        #[case] body: Value,
        #[case] field: &str,
    ) {
        let mut login_port = MockLoginService::new();
        login_port.expect_authenticate().never();
        let app = actix_test::init_service(test_app_with_login(Arc::new(login_port))).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(&body)
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value["details"]["field"], field);
    }

    #[actix_web::test]
    async fn rejected_credentials_are_unauthorised() {
        let mut login_port = MockLoginService::new();
        login_port
            .expect_authenticate()
            .times(1)
            .returning(|_| Err(DomainError::unauthorized("invalid credentials")));
        let app = actix_test::init_service(test_app_with_login(Arc::new(login_port))).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(json!({"email": "cook@example.com", "password": "wrong"}))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(value["code"], json!(ErrorCode::Unauthorized));
    }

    #[actix_web::test]
    async fn login_sets_cookie_and_logout_clears_it() {
        let mut login_port = MockLoginService::new();
        login_port
            .expect_authenticate()
            .times(1)
            .returning(|_| Ok(UserId::random()));
        let app = actix_test::init_service(test_app_with_login(Arc::new(login_port))).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/auth/login")
                .set_json(json!({"email": "cook@example.com", "password": "secret"}))
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = session_cookie(&response);

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/auth/logout")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(session_cookie(&response).value(), "");
    }
}
