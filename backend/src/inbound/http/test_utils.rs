//! Test helpers for inbound HTTP components.
//!
//! Apps built here run the real handlers and services against an
//! [`InMemoryStore`], with the shared-password login adapter accepting
//! [`TEST_PASSWORD`].

use std::sync::Arc;

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::{Value, json};
use zeroize::Zeroizing;

use crate::Trace;
use crate::domain::ports::LoginService;
use crate::domain::{SharedPasswordLoginService, UserId};
use crate::inbound::http::api_routes;
use crate::inbound::http::state::HttpState;
use crate::outbound::memory::InMemoryStore;

pub const TEST_PASSWORD: &str = "open-sesame";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
#[must_use]
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// The session cookie set on `response`.
#[must_use]
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(|cookie| cookie.into_owned())
        .expect("session cookie set")
}

/// Full API app over the given state.
#[must_use]
pub fn test_app_with_state(
    state: HttpState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(Trace)
        .service(
            web::scope("/api")
                .wrap(test_session_middleware())
                .configure(api_routes),
        )
}

/// Full API app over `store`.
#[must_use]
pub fn test_app(
    store: &InMemoryStore,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    let repositories = store.repositories();
    let login_port = Arc::new(SharedPasswordLoginService::new(
        repositories.users.clone(),
        Some(Zeroizing::new(TEST_PASSWORD.to_owned())),
    ));
    test_app_with_state(HttpState::new(login_port, &repositories))
}

/// Full API app with a substitute login port and an empty store.
#[must_use]
pub fn test_app_with_login(
    login: Arc<dyn LoginService>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    > + use<>,
> {
    let repositories = InMemoryStore::new().repositories();
    test_app_with_state(HttpState::new(login, &repositories))
}

/// Register `username` through the API, log in, and return the id and
/// session cookie.
pub async fn sign_up<S, B>(app: &S, username: &str) -> (UserId, Cookie<'static>)
where
    S: Service<Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    let email = format!("{username}@example.com");
    let created = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/users")
            .set_json(json!({
                "email": email,
                "username": username,
                "firstName": "Test",
                "lastName": "Cook",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(created.status(), StatusCode::CREATED, "registration failed");
    let body: Value = test::read_body_json(created).await;
    let id: UserId = body["id"]
        .as_str()
        .and_then(|raw| raw.parse().ok())
        .expect("user id in response");

    let logged_in = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": email, "password": TEST_PASSWORD }))
            .to_request(),
    )
    .await;
    assert_eq!(logged_in.status(), StatusCode::OK, "login failed");
    (id, session_cookie(&logged_in))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[actix_web::test]
    async fn app_outlives_the_borrowed_store() {
        let app = {
            let store = InMemoryStore::new();
            test_app(&store)
        };
        let app = test::init_service(app).await;
        let (id, cookie) = sign_up(&app, "keeper").await;

        let response = test::call_service(
            &app,
            test::TestRequest::get()
                .uri(&format!("/api/users/{id}"))
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = test::read_body_json(response).await;
        assert_eq!(body["username"], "keeper");
    }
}
