//! Login endpoint and the request extractor guarding every other route.
//!
//! ```text
//! POST /api/v1/auth/login {"username":"admin","password":"password"}
//! ```
//!
//! The issued token is returned in the body and set as the HTTP-only
//! `access_token` cookie. Protected handlers take an [`AuthenticatedCaller`],
//! which accepts either that cookie or an `Authorization: Bearer` header.

use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, HttpResponse, dev::Payload, post, web};
use chrono::{DateTime, Utc};
use futures_util::future::{Ready, ready};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{
    AccessToken, AuthenticatedUser, Error, LoginCredentials, LoginValidationError,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Cookie carrying the access token.
pub const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Login request body for `POST /api/v1/auth/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[schema(example = "admin")]
    pub username: String,
    #[schema(example = "password")]
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.username, &value.password)
    }
}

/// Token issued by a successful login.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl From<&AccessToken> for LoginResponse {
    fn from(token: &AccessToken) -> Self {
        Self {
            access_token: token.as_str().to_owned(),
            expires_at: token.expires_at(),
        }
    }
}

fn map_login_validation_error(err: LoginValidationError) -> Error {
    match err {
        LoginValidationError::EmptyUsername => Error::invalid_request("username must not be empty")
            .with_details(json!({ "field": "username", "code": "empty_username" })),
        LoginValidationError::EmptyPassword => Error::invalid_request("password must not be empty")
            .with_details(json!({ "field": "password", "code": "empty_password" })),
    }
}

fn access_token_cookie(token: &AccessToken, secure: bool) -> Cookie<'static> {
    let lifetime = (token.expires_at() - Utc::now()).num_seconds().max(0);
    Cookie::build(ACCESS_TOKEN_COOKIE, token.as_str().to_owned())
        .path("/")
        .http_only(true)
        .secure(secure)
        .same_site(SameSite::Strict)
        .max_age(CookieDuration::seconds(lifetime))
        .finish()
}

/// Authenticate against the configured users and issue an access token.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = LoginResponse,
            headers(("Set-Cookie" = String, description = "access_token cookie"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let token = state.login.login(&credentials).await?;
    Ok(HttpResponse::Ok()
        .cookie(access_token_cookie(&token, state.cookie_secure))
        .json(LoginResponse::from(&token)))
}

/// The user a request was authenticated as.
///
/// Extraction fails with `401 Unauthorized` when no token is presented or
/// the token does not verify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedCaller(pub AuthenticatedUser);

impl AuthenticatedCaller {
    /// Name of the authenticated user.
    pub fn username(&self) -> &str {
        self.0.username()
    }
}

/// Token from the `Authorization: Bearer` header, else the cookie.
fn presented_token(req: &HttpRequest) -> Option<String> {
    let bearer = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_owned);
    bearer.or_else(|| {
        req.cookie(ACCESS_TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_owned())
            .filter(|token| !token.is_empty())
    })
}

fn authenticate(req: &HttpRequest) -> Result<AuthenticatedCaller, Error> {
    let state = req
        .app_data::<web::Data<HttpState>>()
        .ok_or_else(|| Error::internal("HTTP state is not configured"))?;
    let token = presented_token(req).ok_or_else(|| Error::unauthorized("login required"))?;
    state.tokens.verify(&token).map(AuthenticatedCaller)
}

impl FromRequest for AuthenticatedCaller {
    type Error = Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::FIXTURE_TOKEN;
    use crate::test_support::http::InMemoryBackend;
    use actix_web::cookie::Cookie;
    use actix_web::http::StatusCode;
    use actix_web::{App, get, test as actix_test};
    use rstest::rstest;
    use serde_json::Value;

    #[get("/whoami")]
    async fn whoami(caller: AuthenticatedCaller) -> HttpResponse {
        HttpResponse::Ok().body(caller.username().to_owned())
    }

    fn test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .app_data(web::Data::new(InMemoryBackend::new().state()))
            .service(web::scope("/api/v1").service(login).service(whoami))
    }

    #[rstest]
    #[actix_web::test]
    async fn login_sets_http_only_cookie_and_returns_token() {
        let app = actix_test::init_service(test_app()).await;
        let request = actix_test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(&LoginRequest {
                username: "admin".into(),
                password: "password".into(),
            })
            .to_request();

        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = response
            .response()
            .cookies()
            .find(|cookie| cookie.name() == ACCESS_TOKEN_COOKIE)
            .expect("access_token cookie");
        assert_eq!(cookie.value(), FIXTURE_TOKEN);
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Strict));

        let body: LoginResponse = actix_test::read_body_json(response).await;
        assert_eq!(body.access_token, FIXTURE_TOKEN);
    }

    #[rstest]
    #[case("   ", "password", "empty_username")]
    #[case("admin", "", "empty_password")]
    #[actix_web::test]
    async fn login_rejects_blank_fields(
        #[case] username: &str,
        #[case] password: &str,
        #[case] code: &str,
    ) {
        let app = actix_test::init_service(test_app()).await;
        let request = actix_test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(&LoginRequest {
                username: username.into(),
                password: password.into(),
            })
            .to_request();

        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["code"], "invalid_request");
        assert_eq!(body["details"]["code"], code);
    }

    #[rstest]
    #[actix_web::test]
    async fn login_rejects_wrong_password() {
        let app = actix_test::init_service(test_app()).await;
        let request = actix_test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(&LoginRequest {
                username: "admin".into(),
                password: "wrong".into(),
            })
            .to_request();

        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[actix_web::test]
    async fn extractor_accepts_bearer_header() {
        let app = actix_test::init_service(test_app()).await;
        let request = actix_test::TestRequest::get()
            .uri("/api/v1/whoami")
            .insert_header((header::AUTHORIZATION, format!("Bearer {FIXTURE_TOKEN}")))
            .to_request();

        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = actix_test::read_body(response).await;
        assert_eq!(body.as_ref(), b"admin");
    }

    #[rstest]
    #[actix_web::test]
    async fn extractor_accepts_access_token_cookie() {
        let app = actix_test::init_service(test_app()).await;
        let request = actix_test::TestRequest::get()
            .uri("/api/v1/whoami")
            .cookie(Cookie::new(ACCESS_TOKEN_COOKIE, FIXTURE_TOKEN))
            .to_request();

        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[rstest]
    #[case(None)]
    #[case(Some("Bearer forged"))]
    #[case(Some("Basic YWRtaW46cGFzc3dvcmQ="))]
    #[actix_web::test]
    async fn extractor_rejects_missing_or_invalid_tokens(#[case] authorization: Option<&str>) {
        let app = actix_test::init_service(test_app()).await;
        let mut request = actix_test::TestRequest::get().uri("/api/v1/whoami");
        if let Some(value) = authorization {
            request = request.insert_header((header::AUTHORIZATION, value));
        }

        let response = actix_test::call_service(&app, request.to_request()).await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body: Value = actix_test::read_body_json(response).await;
        assert_eq!(body["code"], "unauthorized");
    }
}
