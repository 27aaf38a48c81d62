use std::sync::Arc;

use axum::{
    extract::{Form, Path, State},
    http::header::SET_COOKIE,
    response::{AppendHeaders, Html, IntoResponse, Redirect},
};
use rand::thread_rng;
use serde::Deserialize;
use tracing::info;

use crate::{
    auth::{self, AdminSession},
    database::Draw,
    draw::{compute_draw, spin_labels, Winner},
    error::AppError,
    pages::{self, DashboardView, ResultView},
    state::AppState,
    utils::{new_draw_id, now_timestamp, parse_amounts, parse_names, parse_winner_count},
};

const RECENT_DRAWS_LIMIT: u32 = 50;

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Deserialize)]
pub struct CreateForm {
    #[serde(default)]
    title: String,
    #[serde(default)]
    names: String,
    #[serde(default)]
    amounts: String,
    #[serde(default)]
    winners: String,
}

pub async fn root_handler() -> Redirect {
    Redirect::to("/admin/login")
}

pub async fn login_form_handler() -> Html<String> {
    Html(pages::login_page(None))
}

pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, AppError> {
    auth::check_credentials(&state.config, &form.username, &form.password).await?;

    let token = auth::mint_session(&state.config.session_secret);
    Ok((
        AppendHeaders([(SET_COOKIE, auth::session_cookie(&token))]),
        Redirect::to("/admin"),
    ))
}

pub async fn logout_handler() -> impl IntoResponse {
    (
        AppendHeaders([(SET_COOKIE, auth::clear_session_cookie())]),
        Redirect::to("/admin/login"),
    )
}

pub async fn dashboard_handler(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
) -> Result<Html<String>, AppError> {
    let draws = state.db.list_recent_draws(RECENT_DRAWS_LIMIT).await?;

    Ok(Html(pages::dashboard_page(&DashboardView { draws })))
}

/// Validation and winner selection happen before any write, so a rejected
/// submission persists nothing.
pub async fn create_handler(
    _session: AdminSession,
    State(state): State<Arc<AppState>>,
    Form(form): Form<CreateForm>,
) -> Result<Redirect, AppError> {
    let title = form.title.trim().to_string();
    let names = parse_names(&form.names);
    let amounts = parse_amounts(&form.amounts);
    let winner_count = parse_winner_count(&form.winners);

    let winners = compute_draw(&names, &amounts, winner_count, &mut thread_rng())?;

    let id = new_draw_id();
    let created_at = now_timestamp();
    let winners_count = winners.len() as i64;
    let draw = Draw {
        id: id.clone(),
        title: if title.is_empty() { None } else { Some(title) },
        created_at: created_at.clone(),
        winners_count,
        result_json: serde_json::to_string(&winners).map_err(|e| AppError::Internal(e.into()))?,
    };

    state.db.create_draw(draw).await?;
    state.db.append_audit(id.clone(), "create", created_at).await?;

    info!("created draw {id} with {winners_count} winners");

    Ok(Redirect::to(&format!("/r/{id}")))
}

pub async fn result_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Html<String>, AppError> {
    let draw = state.db.get_draw(id).await?;

    let winners: Vec<Winner> =
        serde_json::from_str(&draw.result_json).map_err(|e| AppError::Internal(e.into()))?;
    let labels = spin_labels(&winners);

    let view = ResultView {
        title: draw.title.unwrap_or_else(|| "Draw Result".to_string()),
        winners,
        labels,
    };

    Ok(Html(pages::result_page(&view)))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use axum::{
        body::Body,
        http::{
            header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
            Method, Request, StatusCode,
        },
        Router,
    };
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::*;
    use crate::{app, config::Config, database::Db};

    const PASSWORD: &str = "s3cret";

    fn test_state() -> Arc<AppState> {
        let config = Config {
            port: 0,
            admin_user: "admin".to_string(),
            admin_pass_hash: bcrypt::hash(PASSWORD, 4).unwrap(),
            session_secret: "test-secret".to_string(),
            database_path: PathBuf::from(":memory:"),
        };

        Arc::new(AppState {
            config,
            db: Db::in_memory().unwrap(),
        })
    }

    fn test_app() -> (Router, Arc<AppState>) {
        let state = test_state();
        (app(state.clone()), state)
    }

    async fn body_string(res: axum::response::Response) -> String {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn form_request(uri: &str, body: String, cookie: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            builder = builder.header(COOKIE, cookie);
        }
        builder.body(Body::from(body)).unwrap()
    }

    /// Logs in with the test credentials and returns the session cookie.
    async fn login(app: &Router) -> String {
        let res = app
            .clone()
            .oneshot(form_request(
                "/admin/login",
                format!("username=admin&password={PASSWORD}"),
                None,
            ))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()[LOCATION], "/admin");

        let set_cookie = res.headers()[SET_COOKIE].to_str().unwrap();
        set_cookie
            .split(';')
            .next()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn root_redirects_to_login() {
        let (app, _) = test_app();

        let res = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()[LOCATION], "/admin/login");
    }

    #[tokio::test]
    async fn login_rejects_bad_credentials_with_a_generic_message() {
        let (app, _) = test_app();

        for body in [
            "username=admin&password=wrong".to_string(),
            format!("username=root&password={PASSWORD}"),
        ] {
            let res = app
                .clone()
                .oneshot(form_request("/admin/login", body, None))
                .await
                .unwrap();

            assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
            let html = body_string(res).await;
            assert!(html.contains("Invalid username or password"));
            assert!(!html.contains("password was wrong"));
        }
    }

    #[tokio::test]
    async fn admin_routes_redirect_anonymous_requests_to_login() {
        let (app, _) = test_app();

        let res = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/admin")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()[LOCATION], "/admin/login");

        let res = app
            .oneshot(form_request(
                "/admin/create",
                "names=Ali&winners=1".to_string(),
                Some("session=forged.deadbeef"),
            ))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()[LOCATION], "/admin/login");
    }

    #[tokio::test]
    async fn logout_expires_the_session_cookie() {
        let (app, _) = test_app();

        let res = app
            .oneshot(
                Request::builder()
                    .uri("/admin/logout")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(res.headers()[LOCATION], "/admin/login");
        let set_cookie = res.headers()[SET_COOKIE].to_str().unwrap();
        assert!(set_cookie.contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn dashboard_shows_the_creation_form_after_login() {
        let (app, _) = test_app();
        let cookie = login(&app).await;

        let res = app
            .oneshot(
                Request::builder()
                    .uri("/admin")
                    .header(COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::OK);
        let html = body_string(res).await;
        assert!(html.contains("action=\"/admin/create\""));
        assert!(html.contains("Recent Draws"));
    }

    #[tokio::test]
    async fn create_then_read_back_the_same_result() {
        let (app, state) = test_app();
        let cookie = login(&app).await;

        let res = app
            .clone()
            .oneshot(form_request(
                "/admin/create",
                "title=Test&names=Ali%0AVeli%0ACan&amounts=100%2C200&winners=2".to_string(),
                Some(&cookie),
            ))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        let location = res.headers()[LOCATION].to_str().unwrap().to_string();
        let id = location.strip_prefix("/r/").unwrap().to_string();

        let stored = state.db.get_draw(id.clone()).await.unwrap();
        assert_eq!(stored.winners_count, 2);
        let winners: Vec<Winner> = serde_json::from_str(&stored.result_json).unwrap();
        assert_eq!(winners.len(), 2);
        assert_ne!(winners[0].name, winners[1].name);
        for winner in &winners {
            assert!(["Ali", "Veli", "Can"].contains(&winner.name.as_str()));
            assert!([100, 200].contains(&winner.amount));
        }

        let first = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri(&location)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = app
            .oneshot(
                Request::builder()
                    .uri(&location)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        // the public page re-renders the stored outcome, never a fresh one
        assert_eq!(body_string(first).await, body_string(second).await);
    }

    #[tokio::test]
    async fn winner_count_clamps_and_amounts_default() {
        let (app, state) = test_app();
        let cookie = login(&app).await;

        let res = app
            .oneshot(form_request(
                "/admin/create",
                "names=A&amounts=&winners=5".to_string(),
                Some(&cookie),
            ))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        let location = res.headers()[LOCATION].to_str().unwrap();
        let id = location.strip_prefix("/r/").unwrap().to_string();

        let stored = state.db.get_draw(id).await.unwrap();
        assert_eq!(stored.winners_count, 1);
        let winners: Vec<Winner> = serde_json::from_str(&stored.result_json).unwrap();
        assert_eq!(winners, vec![Winner { name: "A".to_string(), amount: 100 }]);
    }

    #[tokio::test]
    async fn empty_name_list_renders_400_and_persists_nothing() {
        let (app, state) = test_app();
        let cookie = login(&app).await;

        let res = app
            .oneshot(form_request(
                "/admin/create",
                "names=+%0A++%0A&amounts=100&winners=3".to_string(),
                Some(&cookie),
            ))
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let html = body_string(res).await;
        assert!(html.contains("name list cannot be empty"));

        assert!(state.db.list_recent_draws(50).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_result_id_is_not_found_not_a_server_error() {
        let (app, _) = test_app();

        let res = app
            .oneshot(
                Request::builder()
                    .uri("/r/nope1234")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        let html = body_string(res).await;
        assert!(html.contains("Draw not found"));
    }
}
