//! Route capability table and the per-route authorization layer.

use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};
use tracing::warn;

use service::auth::domain::Role;
use service::auth::token::Claims;

use super::auth::{authenticate, ServerState};
use crate::errors::JsonApiError;

/// Every route that requires a verified identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtectedRoute {
    UpsertProfile,
    OwnProfile,
    OwnFinancials,
    ReplaceFinancials,
}

impl ProtectedRoute {
    pub const ALL: [ProtectedRoute; 4] = [
        ProtectedRoute::UpsertProfile,
        ProtectedRoute::OwnProfile,
        ProtectedRoute::OwnFinancials,
        ProtectedRoute::ReplaceFinancials,
    ];

    pub fn permitted_roles(&self) -> &'static [Role] {
        match self {
            ProtectedRoute::UpsertProfile
            | ProtectedRoute::OwnProfile
            | ProtectedRoute::OwnFinancials
            | ProtectedRoute::ReplaceFinancials => &[Role::Business],
        }
    }

    pub fn permits(&self, role: Role) -> bool {
        self.permitted_roles().contains(&role)
    }
}

/// Second stage: expects claims attached by [`authenticate`]. Missing claims are a 401.
pub async fn authorize(route: ProtectedRoute, req: Request, next: Next) -> Result<Response, JsonApiError> {
    let Some(claims) = req.extensions().get::<Claims>() else {
        warn!(?route, "authorize reached without claims");
        return Err(JsonApiError::unauthorized("No token provided"));
    };
    // unrecognised roles decode as None and are never permitted
    if !claims.role.is_some_and(|role| route.permits(role)) {
        warn!(?route, user_id = %claims.sub, role = ?claims.role, "access denied");
        return Err(JsonApiError::forbidden("Access denied"));
    }
    Ok(next.run(req).await)
}

/// Wrap a method router with `authenticate` then `authorize(route)`.
pub fn guard(state: &ServerState, route: ProtectedRoute, handler: MethodRouter<ServerState>) -> MethodRouter<ServerState> {
    handler
        .route_layer(middleware::from_fn(move |req: Request, next: Next| authorize(route, req, next)))
        .route_layer(middleware::from_fn_with_state(state.clone(), authenticate))
}
