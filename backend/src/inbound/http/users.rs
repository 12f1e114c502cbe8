//! Identity API handlers: signup, login, logout.
//!
//! ```text
//! POST /api/v1/signup {"username":"dispatcher","password":"secret"}
//! POST /api/v1/login  {"username":"dispatcher","password":"secret"}
//! POST /api/v1/logout
//! ```

use actix_web::{post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{CredentialValidationError, Credentials, DomainError, UserId};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Credential payload shared by signup and login.
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct CredentialsRequest {
    /// Login name; unique across the system.
    pub username: String,
    /// Password; never stored in plaintext.
    pub password: String,
}

impl TryFrom<CredentialsRequest> for Credentials {
    type Error = CredentialValidationError;

    fn try_from(value: CredentialsRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

/// Response body carrying the established identity.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionUserResponse {
    /// The authenticated user.
    pub user_id: UserId,
}

fn map_credential_validation_error(err: CredentialValidationError) -> DomainError {
    match err {
        CredentialValidationError::Username(inner) => {
            DomainError::invalid_request(inner.to_string())
                .with_details(json!({ "field": "username" }))
        }
        CredentialValidationError::EmptyPassword => {
            DomainError::invalid_request("password must not be empty")
                .with_details(json!({ "field": "password" }))
        }
    }
}

/// Create an account and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/signup",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account created", body = SessionUserResponse),
        (status = 400, description = "Invalid request", body = DomainError),
        (status = 409, description = "Username already taken", body = DomainError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["identity"],
    operation_id = "signup",
    security([])
)]
#[post("/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        Credentials::try_from(payload.into_inner()).map_err(map_credential_validation_error)?;
    let user_id = state.identity.register(&credentials).await?;
    session.persist_user(user_id)?;
    Ok(HttpResponse::Created().json(SessionUserResponse { user_id }))
}

/// Authenticate and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Login success", body = SessionUserResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = DomainError),
        (status = 401, description = "Invalid credentials", body = DomainError),
        (status = 500, description = "Internal server error")
    ),
    tags = ["identity"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        Credentials::try_from(payload.into_inner()).map_err(map_credential_validation_error)?;
    let user_id = state.identity.authenticate(&credentials).await?;
    session.persist_user(user_id)?;
    Ok(HttpResponse::Ok().json(SessionUserResponse { user_id }))
}

/// End the session.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses(
        (status = 204, description = "Session ended"),
    ),
    tags = ["identity"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockIdentityService;
    use actix_web::http::StatusCode;
    use actix_web::{test as actix_test, App};
    use rstest::rstest;
    use serde_json::Value;
    use std::sync::Arc;

    fn fixture_app_state() -> web::Data<HttpState> {
        web::Data::new(HttpState::fixtures())
    }

    fn app_with_state(
        state: web::Data<HttpState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(state)
            .wrap(crate::inbound::http::test_utils::test_session_middleware())
            .service(
                web::scope("/api/v1")
                    .service(signup)
                    .service(login)
                    .service(logout),
            )
    }

    fn credentials_json(username: &str, password: &str) -> CredentialsRequest {
        CredentialsRequest {
            username: username.into(),
            password: password.into(),
        }
    }

    #[actix_web::test]
    async fn signup_sets_a_session_and_returns_the_user() {
        let app = actix_test::init_service(app_with_state(fixture_app_state())).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/signup")
                .set_json(credentials_json("dispatcher", "hunter2"))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::CREATED);
        assert!(response
            .response()
            .cookies()
            .any(|cookie| cookie.name() == "session"));
        let body: SessionUserResponse = actix_test::read_body_json(response).await;
        assert_eq!(body.user_id, UserId::new(1));
    }

    #[actix_web::test]
    async fn duplicate_signup_is_a_conflict() {
        let app = actix_test::init_service(app_with_state(fixture_app_state())).await;

        let first = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/signup")
                .set_json(credentials_json("dispatcher", "hunter2"))
                .to_request(),
        )
        .await;
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/signup")
                .set_json(credentials_json("dispatcher", "other"))
                .to_request(),
        )
        .await;
        assert_eq!(second.status(), StatusCode::CONFLICT);
    }

    #[rstest]
    #[case("", "pw", "username")]
    #[case("user", "", "password")]
    #[actix_web::test]
    async fn invalid_payloads_are_bad_requests_with_field_details(
        #[case] username: &str,
        #[case] password: &str,
        #[case] field: &str,
    ) {
        let app = actix_test::init_service(app_with_state(fixture_app_state())).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(credentials_json(username, password))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let value: Value = actix_test::read_body_json(response).await;
        assert_eq!(
            value
                .get("details")
                .and_then(|details| details.get("field"))
                .and_then(Value::as_str),
            Some(field)
        );
    }

    #[actix_web::test]
    async fn login_failure_does_not_set_a_session() {
        let mut identity = MockIdentityService::new();
        identity
            .expect_authenticate()
            .returning(|_| Err(DomainError::unauthorized("invalid username or password")));
        let state = HttpState {
            identity: Arc::new(identity),
            ..HttpState::fixtures()
        };
        let app = actix_test::init_service(app_with_state(web::Data::new(state))).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/login")
                .set_json(credentials_json("dispatcher", "wrong"))
                .to_request(),
        )
        .await;

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(!response
            .response()
            .cookies()
            .any(|cookie| cookie.name() == "session"));
    }

    #[actix_web::test]
    async fn logout_always_succeeds() {
        let app = actix_test::init_service(app_with_state(fixture_app_state())).await;

        let response = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/api/v1/logout")
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }
}
