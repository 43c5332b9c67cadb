//! Event routing.
//!
//! An inbound event is dispatched on its exact HTTP method and its path
//! suffix. Anything unmatched gets the fixed invalid-request response.

pub mod health;
pub mod history;
pub mod proxy;
pub mod query;

use crate::dtos::ApiGatewayEvent;
use crate::error::HandlerError;
use crate::response::ApiResponse;
use crate::startup::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    SubmitQuery,
    GetHistory,
    DeleteHistory,
}

pub fn route(method: &str, path: &str) -> Option<Route> {
    match method {
        "POST" if path.ends_with("/query") => Some(Route::SubmitQuery),
        "GET" if path.ends_with("/history") => Some(Route::GetHistory),
        "DELETE" if path.ends_with("/history") => Some(Route::DeleteHistory),
        _ => None,
    }
}

/// Process one inbound event end to end. Never fails: every error is
/// converted into an envelope here.
#[tracing::instrument(skip(state, event), fields(method = %event.http_method, path = %event.path))]
pub async fn handle_event(state: &AppState, event: ApiGatewayEvent) -> ApiResponse {
    let result = match route(&event.http_method, &event.path) {
        Some(Route::SubmitQuery) => query::submit_query(state, &event).await,
        Some(Route::GetHistory) => history::get_history(state, &event).await,
        Some(Route::DeleteHistory) => history::delete_history(state, &event).await,
        None => Err(HandlerError::Routing),
    };

    result.unwrap_or_else(HandlerError::into_response)
}
