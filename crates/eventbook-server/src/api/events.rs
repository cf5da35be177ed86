// ABOUTME: Event API handlers for listing, filtering, creating, fetching, and deleting events.
// ABOUTME: Each handler validates raw input through the catalog and shapes an explicit JSON response.

use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Form, FromRequest, Path, Query, Request, State};
use axum::http::header;
use eventbook_core::Event;
use serde::{Deserialize, Serialize};

use crate::app_state::SharedState;
use crate::error::ApiError;

pub const CREATED_MESSAGE: &str = "The event has been added!";
pub const DELETED_MESSAGE: &str = "The event has been deleted!";

/// An event as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventView {
    pub id: i64,
    pub event: String,
    pub date: String,
}

impl From<&Event> for EventView {
    fn from(event: &Event) -> Self {
        Self {
            id: event.id,
            event: event.name.clone(),
            date: event.date_string(),
        }
    }
}

fn views(events: &[Event]) -> Vec<EventView> {
    events.iter().map(EventView::from).collect()
}

/// Query parameters for the list endpoint. Kept as raw strings so the
/// catalog can report which bound was malformed.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

/// Fields accepted when creating an event. Both are optional at the decoding
/// stage so that a missing field becomes a per-field validation error.
#[derive(Debug, Default, Deserialize)]
pub struct CreateEventRequest {
    pub event: Option<String>,
    pub date: Option<String>,
}

/// Response body after creating an event.
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub message: &'static str,
    pub event: String,
    pub date: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Extracts a CreateEventRequest from either a urlencoded form or a JSON body.
/// An empty body decodes to a request with no fields.
pub struct CreateEventBody(pub CreateEventRequest);

impl<S> FromRequest<S> for CreateEventBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(body) = Form::<CreateEventRequest>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadBody(e.body_text()))?;
            return Ok(Self(body));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::BadBody(e.body_text()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self(CreateEventRequest::default()));
        }
        serde_json::from_slice(&bytes)
            .map(Self)
            .map_err(|e| ApiError::BadBody(e.to_string()))
    }
}

/// GET /event - List all events, or those within `[start_date, end_date]`.
pub async fn list_events(
    State(state): State<SharedState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<EventView>>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::BadQuery(e.body_text()))?;
    let events = state
        .catalog
        .list(params.start_date.as_deref(), params.end_date.as_deref())?;
    Ok(Json(views(&events)))
}

/// GET /event/today - List events dated today.
pub async fn today_events(
    State(state): State<SharedState>,
) -> Result<Json<Vec<EventView>>, ApiError> {
    let events = state.catalog.today()?;
    Ok(Json(views(&events)))
}

/// POST /event - Create an event.
pub async fn create_event(
    State(state): State<SharedState>,
    CreateEventBody(req): CreateEventBody,
) -> Result<Json<CreatedResponse>, ApiError> {
    let event = state
        .catalog
        .create(req.event.as_deref(), req.date.as_deref())?;
    Ok(Json(CreatedResponse {
        message: CREATED_MESSAGE,
        date: event.date_string(),
        event: event.name,
    }))
}

/// GET /event/{id} - Fetch a single event.
pub async fn get_event(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<EventView>, ApiError> {
    let id = eventbook_core::validate::parse_event_id(&id)?;
    let event = state.catalog.get(id)?;
    Ok(Json(EventView::from(&event)))
}

/// DELETE /event/{id} - Delete a single event.
pub async fn delete_event(
    State(state): State<SharedState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = eventbook_core::validate::parse_event_id(&id)?;
    state.catalog.delete(id)?;
    Ok(Json(MessageResponse {
        message: DELETED_MESSAGE,
    }))
}
