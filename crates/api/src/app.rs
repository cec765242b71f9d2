use std::time::Duration;

use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    extract::State,
    http::{
        header::{HeaderValue, CONTENT_TYPE},
        Method, StatusCode,
    },
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::error::AppError;
use crate::gql::AppSchema;
use crate::state::AppState;

/// Build the Axum router with the health endpoint and GraphQL.
pub fn build_router(state: AppState, schema: AppSchema) -> Router {
    let origins: Vec<HeaderValue> = state
        .config()
        .allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    Router::new()
        // Simple liveness check; also proves DB connectivity.
        .route("/health", get(health))
        .route(
            "/graphql",
            post(move |req: GraphQLRequest| graphql_handler(schema, req)),
        )
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(30),
        ))
        .layer(
            CorsLayer::new()
                .allow_origin(origins)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([CONTENT_TYPE]),
        )
}

async fn graphql_handler(schema: AppSchema, req: GraphQLRequest) -> GraphQLResponse {
    schema.execute(req.into_inner()).await.into()
}

/// Liveness + quick DB probe.
async fn health(State(state): State<AppState>) -> Result<&'static str, AppError> {
    let _one: i32 = sqlx::query_scalar("SELECT 1").fetch_one(&state.db).await?;
    Ok("ok")
}
