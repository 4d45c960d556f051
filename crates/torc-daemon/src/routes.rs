//! Axum routers and all HTTP handlers for torc-daemon.
//!
//! Two surfaces share one `AppState`:
//! - `build_public_router`: menu, order taking, session select, popularity.
//! - `build_admin_router`: session management, per-session order view,
//!   popularity.
//!
//! Middleware layers (CORS, tracing) are **not** applied here; `main.rs`
//! attaches them so tests can use the bare routers.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::de::DeserializeOwned;
use torc_schemas::{
    AdminOrdersResponse, CreateOrderRequest, CurrentSessionResponse, MenuResponse, Order,
    OrdersResponse, PopularResponse, SessionNameRequest, SessionStatusResponse, SessionsResponse,
};
use torc_store::{OrderError, OrderService};
use tower_http::services::ServeDir;
use tracing::error;

use crate::{
    api_types::{HealthResponse, OrdersQuery},
    state::AppState,
};

// ---------------------------------------------------------------------------
// Routers
// ---------------------------------------------------------------------------

pub fn build_public_router(state: Arc<AppState>) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .route("/menu", get(menu))
        .route("/session/create", post(create_session))
        .route("/session/switch", post(switch_session))
        .route("/session/current", get(current_session))
        .route("/order", post(create_order))
        .route("/orders", get(list_active_orders))
        .route("/popular", get(popular));

    let router = match &state.public_static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };
    router.with_state(state)
}

pub fn build_admin_router(state: Arc<AppState>) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .route("/api/sessions", get(admin_sessions))
        .route("/api/session/create", post(create_session))
        .route("/api/session/switch", post(switch_session))
        .route("/api/orders", get(admin_orders))
        .route("/api/popular", get(popular));

    let router = match &state.admin_static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };
    router.with_state(state)
}

// ---------------------------------------------------------------------------
// Error mapping
// ---------------------------------------------------------------------------

/// Plain-text failure response; the UIs show `res.text()` verbatim.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_json() -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: "invalid JSON body".to_string(),
        }
    }
}

impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        let status = match &err {
            OrderError::Validation(_) | OrderError::NotOnMenu(_) | OrderError::NoActiveSession => {
                StatusCode::BAD_REQUEST
            }
            OrderError::NotFound(_) => StatusCode::NOT_FOUND,
            OrderError::Storage(e) => {
                error!(op = e.op(), path = %e.path().display(), %e, "storage failure");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

/// Run a blocking order-service call off the async executor.
async fn blocking<T, F>(st: &AppState, f: F) -> ApiResult<T>
where
    F: FnOnce(&OrderService) -> Result<T, OrderError> + Send + 'static,
    T: Send + 'static,
{
    let svc = Arc::clone(&st.orders);
    match tokio::task::spawn_blocking(move || f(&svc)).await {
        Ok(res) => res.map_err(ApiError::from),
        Err(join_err) => {
            error!(%join_err, "blocking order task failed");
            Err(ApiError {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: "internal error".to_string(),
            })
        }
    }
}

/// Lenient JSON body: no Content-Type requirement, any decode failure is 400.
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> ApiResult<T> {
    serde_json::from_slice(body).map_err(|_| ApiError::bad_json())
}

fn by_timestamp(mut orders: Vec<Order>) -> Vec<Order> {
    orders.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.order_id.cmp(&b.order_id)));
    orders
}

// ---------------------------------------------------------------------------
// GET /health
// ---------------------------------------------------------------------------

pub(crate) async fn health(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    Json(HealthResponse {
        ok: true,
        service: st.build.service.to_string(),
        version: st.build.version.to_string(),
        active_session: st.orders.active_session(),
    })
}

// ---------------------------------------------------------------------------
// GET /menu
// ---------------------------------------------------------------------------

pub(crate) async fn menu(State(st): State<Arc<AppState>>) -> ApiResult<Json<MenuResponse>> {
    let menu = blocking(&st, |svc| Ok(svc.menu())).await?;
    Ok(Json(MenuResponse { menu }))
}

// ---------------------------------------------------------------------------
// POST /session/create, /api/session/create
// ---------------------------------------------------------------------------

pub(crate) async fn create_session(
    State(st): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<SessionStatusResponse>> {
    let req: SessionNameRequest = parse_body(&body)?;
    let session_name =
        blocking(&st, move |svc| svc.create_or_ensure_session(&req.session_name)).await?;
    Ok(Json(SessionStatusResponse {
        session_name,
        status: "created".to_string(),
    }))
}

// ---------------------------------------------------------------------------
// POST /session/switch, /api/session/switch
// ---------------------------------------------------------------------------

pub(crate) async fn switch_session(
    State(st): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<Json<SessionStatusResponse>> {
    let req: SessionNameRequest = parse_body(&body)?;
    let session_name = blocking(&st, move |svc| svc.switch_session(&req.session_name)).await?;
    Ok(Json(SessionStatusResponse {
        session_name,
        status: "switched".to_string(),
    }))
}

// ---------------------------------------------------------------------------
// GET /session/current
// ---------------------------------------------------------------------------

pub(crate) async fn current_session(State(st): State<Arc<AppState>>) -> impl IntoResponse {
    Json(CurrentSessionResponse {
        session_name: st.orders.active_session(),
    })
}

// ---------------------------------------------------------------------------
// POST /order
// ---------------------------------------------------------------------------

pub(crate) async fn create_order(
    State(st): State<Arc<AppState>>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<Order>)> {
    // No session beats a bad body, matching what the order UI expects.
    if st.orders.active_session().is_empty() {
        return Err(OrderError::NoActiveSession.into());
    }
    let req: CreateOrderRequest = parse_body(&body)?;
    let order = blocking(&st, move |svc| {
        svc.submit_order(&req.drink, &req.customer_name, &req.instructions)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(order)))
}

// ---------------------------------------------------------------------------
// GET /orders
// ---------------------------------------------------------------------------

pub(crate) async fn list_active_orders(
    State(st): State<Arc<AppState>>,
) -> ApiResult<Json<OrdersResponse>> {
    let listed = blocking(&st, |svc| svc.list_orders(None)).await?;
    Ok(Json(OrdersResponse {
        orders: by_timestamp(listed.orders),
    }))
}

// ---------------------------------------------------------------------------
// GET /popular, /api/popular
// ---------------------------------------------------------------------------

pub(crate) async fn popular(State(st): State<Arc<AppState>>) -> ApiResult<Json<PopularResponse>> {
    let items = blocking(&st, |svc| svc.popularity_snapshot()).await?;
    Ok(Json(PopularResponse { items }))
}

// ---------------------------------------------------------------------------
// GET /api/sessions
// ---------------------------------------------------------------------------

pub(crate) async fn admin_sessions(
    State(st): State<Arc<AppState>>,
) -> ApiResult<Json<SessionsResponse>> {
    let sessions = blocking(&st, |svc| svc.list_sessions()).await?;
    Ok(Json(SessionsResponse {
        sessions,
        selected_session: st.orders.active_session(),
    }))
}

// ---------------------------------------------------------------------------
// GET /api/orders?sessionName=
// ---------------------------------------------------------------------------

pub(crate) async fn admin_orders(
    State(st): State<Arc<AppState>>,
    Query(q): Query<OrdersQuery>,
) -> ApiResult<Json<AdminOrdersResponse>> {
    let listed = blocking(&st, move |svc| svc.list_orders(q.session_name.as_deref())).await?;
    Ok(Json(AdminOrdersResponse {
        session_name: listed.session_name,
        orders: by_timestamp(listed.orders),
    }))
}
