use axum::Router;
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderName, HeaderValue, Method};
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use welfare_core::AppError;

use crate::state::AppState;
use crate::{handlers, middleware};

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let protected_routes = Router::new()
        .route("/api/access/me", get(handlers::access::me_handler))
        .route(
            "/api/access/me/check",
            get(handlers::access::check_permission_handler),
        )
        .route(
            "/api/access/roles",
            get(handlers::access::role_catalog_handler),
        )
        .route(
            "/api/access/preview",
            post(handlers::access::preview_access_handler),
        )
        .route(
            "/api/role-assignments",
            get(handlers::role_assignments::list_role_assignments_handler),
        )
        .route(
            "/api/role-assignments/{subject}",
            get(handlers::role_assignments::get_role_assignment_handler)
                .put(handlers::role_assignments::assign_roles_handler),
        )
        .route_layer(from_fn_with_state(
            app_state.clone(),
            middleware::require_identity,
        ));

    let cors_layer = CorsLayer::new()
        .allow_origin(
            HeaderValue::from_str(frontend_url)
                .map_err(|error| AppError::Internal(format!("invalid FRONTEND_URL: {error}")))?,
        )
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers(cors_allowed_headers());

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(app_state))
}

// Identity headers are set by the gateway only, so browsers may not send them.
fn cors_allowed_headers() -> [HeaderName; 1] {
    [CONTENT_TYPE]
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderName;

    use crate::middleware::{
        DISPLAY_NAME_HEADER, EMAIL_HEADER, GATEWAY_SECRET_HEADER, SUBJECT_HEADER,
    };

    use super::cors_allowed_headers;

    #[test]
    fn browsers_cannot_send_gateway_headers() {
        let allowed = cors_allowed_headers();
        for name in [
            GATEWAY_SECRET_HEADER,
            SUBJECT_HEADER,
            DISPLAY_NAME_HEADER,
            EMAIL_HEADER,
        ] {
            assert!(!allowed.contains(&HeaderName::from_static(name)));
        }
    }
}
