use crate::handlers::{
    auth::{login, login_form, register},
    health::health_check,
    photo::{download_photo, list_user_photos, upload_photo},
    post::{create_post, get_post, list_user_posts},
    profile::profile_page,
    user::me,
};
use crate::middleware::rate_limit;
use crate::state::AppState;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    handler::Handler,
    routing::{get, post},
};
use tower_governor::GovernorLayer;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

pub fn create_routes(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let login_conf = rate_limit::create_login_config();

    let auth_routes = Router::new()
        .route("/register", post(register))
        .route(
            "/login",
            post(login.layer(GovernorLayer::new(login_conf.clone()))),
        )
        .route(
            "/login/form",
            post(login_form.layer(GovernorLayer::new(login_conf))),
        );

    let post_routes = Router::new()
        .route("/", post(create_post))
        .route("/{pid}", get(get_post))
        .route("/user/{uid}", get(list_user_posts));

    let photo_routes = Router::new()
        .route(
            "/",
            // 2MB limit. Plenty for a photo, small enough that nobody can
            // fill the disk in one request.
            post(upload_photo.layer(DefaultBodyLimit::max(2 * 1024 * 1024))),
        )
        .route("/{id}", get(download_photo))
        .route("/user/{uid}", get(list_user_photos));

    Router::new()
        .route("/health", get(health_check))
        .route("/users/me", get(me))
        .nest("/auth", auth_routes)
        .nest("/posts", post_routes)
        .nest("/photos", photo_routes)
        // Server-rendered profile page. Static routes above take precedence
        // over the capture.
        .route("/{uid}", get(profile_page))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
