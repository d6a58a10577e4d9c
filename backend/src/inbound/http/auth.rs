//! Login and logout endpoints.
//!
//! `POST /login` exchanges form credentials for a session cookie carrying
//! the authenticated actor and their starting project; `POST /logout`
//! invalidates the cookie. Both answer `204 No Content` so the client side
//! decides where to navigate next.

use actix_web::{post, web, HttpResponse};
use serde::Deserialize;
use tracing::info;

use crate::domain::{Error, LoginCredentials};

use super::session::SessionContext;
use super::state::HttpState;
use super::ApiResult;

/// Form body accepted by [`login`].
#[derive(Debug, Clone, Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
}

fn credentials_from(form: &LoginForm) -> ApiResult<LoginCredentials> {
    LoginCredentials::try_from_parts(&form.username, &form.password)
        .map_err(|err| Error::invalid_request(err.to_string()))
}

/// Authenticate form credentials and start a session.
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    form: web::Form<LoginForm>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let credentials = credentials_from(&form)?;
    let actor = state.login.authenticate(&credentials).await?;
    info!(user = %actor.id(), "login succeeded");
    session.persist_actor(actor)?;
    session.persist_project(state.default_project)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Drop every session entry and invalidate the cookie.
///
/// Always answers `204`, signed in or not.
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

#[cfg(test)]
mod tests {
    use actix_web::http::StatusCode;
    use actix_web::{test as actix_test, App};
    use rstest::rstest;
    use rstest_bdd_macros::{given, then, when};

    use super::*;
    use crate::domain::{ErrorCode, ProjectId};
    use crate::inbound::http::session::current_project;
    use crate::inbound::http::test_utils;

    #[given("a filled login form")]
    fn a_filled_login_form() -> LoginForm {
        LoginForm {
            username: "admin".to_owned(),
            password: "password".to_owned(),
        }
    }

    #[given("a login form without a password")]
    fn a_login_form_without_a_password() -> LoginForm {
        LoginForm {
            username: "admin".to_owned(),
            password: String::new(),
        }
    }

    #[when("the form is turned into credentials")]
    fn the_form_is_turned_into_credentials(form: LoginForm) -> ApiResult<LoginCredentials> {
        credentials_from(&form)
    }

    #[then("the credentials carry the username")]
    fn the_credentials_carry_the_username(result: ApiResult<LoginCredentials>) {
        let credentials = result.expect("credentials parse");
        assert_eq!(credentials.username(), "admin");
    }

    #[then("the form is rejected as invalid")]
    fn the_form_is_rejected_as_invalid(result: ApiResult<LoginCredentials>) {
        let error = result.expect_err("should be an error");
        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    fn login_forms_become_credentials() {
        let form = a_filled_login_form();
        let result = the_form_is_turned_into_credentials(form);
        the_credentials_carry_the_username(result);
    }

    #[rstest]
    fn empty_passwords_never_reach_the_authenticator() {
        let form = a_login_form_without_a_password();
        let result = the_form_is_turned_into_credentials(form);
        the_form_is_rejected_as_invalid(result);
    }

    fn auth_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(test_utils::test_session_middleware())
            .app_data(web::Data::new(test_utils::fixture_http_state()))
            .service(login)
            .service(logout)
            .route(
                "/whoami",
                web::get().to(|session: SessionContext| async move {
                    let actor = session.require_actor()?;
                    let store = session.fragment_session();
                    let project = current_project(&store, ProjectId::new(99));
                    Ok::<_, Error>(HttpResponse::Ok().body(format!("{} {project}", actor.id())))
                }),
            )
    }

    #[actix_web::test]
    async fn login_persists_the_actor_and_starting_project() {
        let app = actix_test::init_service(auth_app()).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/login")
                .set_form([("username", "admin"), ("password", "password")])
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::NO_CONTENT);
        let cookie = res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned();

        let whoami = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/whoami")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(whoami.status(), StatusCode::OK);
        let body = actix_test::read_body(whoami).await;
        assert_eq!(body, "123e4567-e89b-12d3-a456-426614174000 1");
    }

    #[actix_web::test]
    async fn rejected_credentials_answer_unauthorised() {
        let app = actix_test::init_service(auth_app()).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/login")
                .set_form([("username", "admin"), ("password", "nope")])
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn blank_passwords_are_rejected_before_authentication() {
        let app = actix_test::init_service(auth_app()).await;

        let res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/login")
                .set_form([("username", "admin"), ("password", "")])
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn logout_purges_the_session() {
        let app = actix_test::init_service(auth_app()).await;

        let login_res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/login")
                .set_form([("username", "admin"), ("password", "password")])
                .to_request(),
        )
        .await;
        let cookie = login_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned();

        let logout_res = actix_test::call_service(
            &app,
            actix_test::TestRequest::post()
                .uri("/logout")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(logout_res.status(), StatusCode::NO_CONTENT);
        let cleared = logout_res
            .response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie cleared")
            .into_owned();

        let whoami = actix_test::call_service(
            &app,
            actix_test::TestRequest::get()
                .uri("/whoami")
                .cookie(cleared)
                .to_request(),
        )
        .await;
        assert_eq!(whoami.status(), StatusCode::UNAUTHORIZED);
    }
}
