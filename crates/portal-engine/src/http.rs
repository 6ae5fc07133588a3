//! Async HTTP client for the portal backend.

use std::time::Duration;

use portal_core::{
  ApiError,
  api::{PortalApi, Scope},
  session::Identity,
  suggestion::{NewSuggestion, StatusUpdate, Suggestion, SuggestionId},
};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

/// Connection settings for the portal backend.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  /// Transport-level timeout for each request.
  pub timeout:  Duration,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: "http://localhost:5000".to_string(),
      timeout:  Duration::from_secs(30),
    }
  }
}

/// [`PortalApi`] over reqwest.
///
/// Cheap to clone: the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct HttpApi {
  client: Client,
  config: ApiConfig,
}

#[derive(Serialize)]
struct TokenBody<'a> {
  token: &'a str,
}

#[derive(Deserialize)]
struct ErrorBody {
  error: String,
}

impl HttpApi {
  pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
    let client = Client::builder()
      .timeout(config.timeout)
      .build()
      .map_err(|e| ApiError::Transport(format!("failed to build HTTP client: {e}")))?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.config.base_url.trim_end_matches('/'), path)
  }

  /// [`url`](Self::url) with `id` appended as one escaped path segment.
  fn url_for(&self, path: &str, id: &SuggestionId) -> Result<Url, ApiError> {
    let mut url = Url::parse(&self.url(path))
      .map_err(|e| ApiError::Transport(format!("invalid base URL: {e}")))?;
    url
      .path_segments_mut()
      .map_err(|()| ApiError::Transport("base URL cannot take a path".into()))?
      .push(id.as_str());
    Ok(url)
  }

  fn scoped(scope: Scope) -> &'static str {
    match scope {
      Scope::Admin => "/admin",
      Scope::Student => "/student",
    }
  }

  /// Send `req`, mapping connection failures and non-2xx statuses.
  async fn send(req: RequestBuilder, what: &str) -> Result<Response, ApiError> {
    tracing::debug!("{what}");
    let resp = req
      .send()
      .await
      .map_err(|e| ApiError::Transport(format!("{what} failed: {e}")))?;

    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }

    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
      .map(|b| b.error)
      .unwrap_or_else(|_| format!("Request failed with status {}", status.as_u16()));
    Err(ApiError::Rejected { status: status.as_u16(), message })
  }

  async fn send_json<T: DeserializeOwned>(req: RequestBuilder, what: &str) -> Result<T, ApiError> {
    let resp = Self::send(req, what).await?;
    resp
      .json()
      .await
      .map_err(|e| ApiError::Transport(format!("decoding {what} response: {e}")))
  }

  /// Like [`send_json`](Self::send_json) but the body is only checked for
  /// well-formedness; an empty body is accepted.
  async fn send_ack(req: RequestBuilder, what: &str) -> Result<(), ApiError> {
    let resp = Self::send(req, what).await?;
    let text = resp
      .text()
      .await
      .map_err(|e| ApiError::Transport(format!("reading {what} response: {e}")))?;
    if text.trim().is_empty() {
      return Ok(());
    }
    serde_json::from_str::<serde_json::Value>(&text)
      .map(drop)
      .map_err(|e| ApiError::Transport(format!("decoding {what} response: {e}")))
  }
}

impl PortalApi for HttpApi {
  async fn exchange_token(&self, token: &str) -> Result<Identity, ApiError> {
    let req = self.client.post(self.url("/auth/google")).json(&TokenBody { token });
    Self::send_json(req, "POST /auth/google").await
  }

  async fn list_suggestions(&self, scope: Scope, email: &str) -> Result<Vec<Suggestion>, ApiError> {
    let path = format!("{}/suggestions", Self::scoped(scope));
    let req = self.client.get(self.url(&path)).query(&[("email", email)]);
    Self::send_json(req, &format!("GET {path}")).await
  }

  async fn create_suggestion(&self, body: &NewSuggestion) -> Result<(), ApiError> {
    let req = self.client.post(self.url("/suggestions")).json(body);
    Self::send_ack(req, "POST /suggestions").await
  }

  async fn delete_suggestion(&self, id: &SuggestionId) -> Result<(), ApiError> {
    let url = self.url_for("/student/suggestions", id)?;
    let what = format!("DELETE {}", url.path());
    Self::send_ack(self.client.delete(url), &what).await
  }

  async fn update_status(&self, id: &SuggestionId, body: &StatusUpdate) -> Result<Suggestion, ApiError> {
    let url = self.url_for("/admin/suggestions", id)?;
    let what = format!("PATCH {}", url.path());
    Self::send_json(self.client.patch(url).json(body), &what).await
  }

  async fn view_suggestion(
    &self,
    scope: Scope,
    id: &SuggestionId,
    email: &str,
  ) -> Result<Suggestion, ApiError> {
    let url = self.url_for(&format!("{}/suggestions/view", Self::scoped(scope)), id)?;
    let what = format!("GET {}", url.path());
    let mut req = self.client.get(url);
    if scope == Scope::Student {
      req = req.query(&[("email", email)]);
    }
    Self::send_json(req, &what).await
  }
}

#[cfg(test)]
mod tests {
  use std::sync::{Arc, Mutex};

  use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, patch, post},
  };
  use portal_core::{suggestion::Category, workflow::Status};
  use serde_json::{Value, json};
  use tokio::net::TcpListener;

  use super::*;

  /// Requests seen by the mock backend, as `"METHOD path?query body"`.
  type Log = Arc<Mutex<Vec<String>>>;

  fn record(id: &str, status: &str) -> Value {
    json!({
      "_id": id,
      "title": "Projector broken",
      "description": "Room 204",
      "category": "technology",
      "status": status,
      "email": "s@college.edu",
      "createdAt": "2024-05-01T08:00:00Z"
    })
  }

  fn query_string(q: &std::collections::HashMap<String, String>) -> String {
    q.get("email").map(|e| format!("?email={e}")).unwrap_or_default()
  }

  async fn spawn_backend() -> (HttpApi, Log) {
    let log: Log = Arc::default();

    let app = Router::new()
      .route(
        "/api/auth/google",
        post(|State(log): State<Log>, Json(body): Json<Value>| async move {
          log.lock().unwrap().push(format!("POST /auth/google {body}"));
          if body["token"] == "good" {
            Json(json!({
              "email": "hod@college.edu",
              "isAdmin": true,
              "isPrincipal": false,
              "department": "CSE"
            }))
            .into_response()
          } else {
            (StatusCode::UNAUTHORIZED, Json(json!({ "error": "Invalid token" }))).into_response()
          }
        }),
      )
      .route(
        "/api/admin/suggestions",
        get(|State(log): State<Log>, Query(q): Query<std::collections::HashMap<String, String>>| async move {
          log.lock().unwrap().push(format!("GET /admin/suggestions{}", query_string(&q)));
          Json(json!([record("a1", "pending"), record("a2", "resolved")]))
        }),
      )
      .route(
        "/api/student/suggestions",
        get(|State(log): State<Log>, Query(q): Query<std::collections::HashMap<String, String>>| async move {
          log.lock().unwrap().push(format!("GET /student/suggestions{}", query_string(&q)));
          (StatusCode::OK, "not json")
        }),
      )
      .route(
        "/api/suggestions",
        post(|State(log): State<Log>, Json(body): Json<Value>| async move {
          log.lock().unwrap().push(format!("POST /suggestions {body}"));
          (StatusCode::CREATED, Json(json!({ "message": "created" })))
        }),
      )
      .route(
        "/api/student/suggestions/{id}",
        delete(|State(log): State<Log>, Path(id): Path<String>| async move {
          log.lock().unwrap().push(format!("DELETE /student/suggestions/{id}"));
          if id == "gone" {
            (StatusCode::NOT_FOUND, "plain text").into_response()
          } else {
            StatusCode::NO_CONTENT.into_response()
          }
        }),
      )
      .route(
        "/api/admin/suggestions/{id}",
        patch(|State(log): State<Log>, Path(id): Path<String>, Json(body): Json<Value>| async move {
          log.lock().unwrap().push(format!("PATCH /admin/suggestions/{id} {body}"));
          let mut r = record(&id, body["status"].as_str().unwrap_or("pending"));
          r["updatedBy"] = body["updatedBy"].clone();
          Json(r)
        }),
      )
      .route(
        "/api/admin/suggestions/view/{id}",
        get(|State(log): State<Log>, Path(id): Path<String>, Query(q): Query<std::collections::HashMap<String, String>>| async move {
          log.lock().unwrap().push(format!("GET /admin/suggestions/view/{id}{}", query_string(&q)));
          Json(record(&id, "in-progress"))
        }),
      )
      .route(
        "/api/student/suggestions/view/{id}",
        get(|State(log): State<Log>, Path(id): Path<String>, Query(q): Query<std::collections::HashMap<String, String>>| async move {
          log.lock().unwrap().push(format!("GET /student/suggestions/view/{id}{}", query_string(&q)));
          (StatusCode::FORBIDDEN, Json(json!({ "error": "Not your suggestion" })))
        }),
      )
      .with_state(log.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
      axum::serve(listener, app).await.unwrap();
    });

    let api = HttpApi::new(ApiConfig {
      base_url: format!("http://{addr}/"),
      timeout:  Duration::from_secs(5),
    })
    .unwrap();
    (api, log)
  }

  fn last(log: &Log) -> String { log.lock().unwrap().last().cloned().unwrap_or_default() }

  #[tokio::test]
  async fn exchange_token_decodes_identity() {
    let (api, log) = spawn_backend().await;
    let id = api.exchange_token("good").await.unwrap();
    assert_eq!(id.email, "hod@college.edu");
    assert!(id.is_admin);
    assert_eq!(last(&log), r#"POST /auth/google {"token":"good"}"#);
  }

  #[tokio::test]
  async fn rejected_login_surfaces_server_error() {
    let (api, _) = spawn_backend().await;
    let err = api.exchange_token("bad").await.unwrap_err();
    assert_eq!(
      err,
      ApiError::Rejected { status: 401, message: "Invalid token".into() }
    );
  }

  #[tokio::test]
  async fn admin_list_passes_email_query() {
    let (api, log) = spawn_backend().await;
    let items = api.list_suggestions(Scope::Admin, "hod@college.edu").await.unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[1].status, Status::Resolved);
    assert_eq!(last(&log), "GET /admin/suggestions?email=hod@college.edu");
  }

  #[tokio::test]
  async fn malformed_json_is_a_transport_error() {
    let (api, log) = spawn_backend().await;
    let err = api.list_suggestions(Scope::Student, "s@college.edu").await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "{err:?}");
    assert_eq!(last(&log), "GET /student/suggestions?email=s@college.edu");
  }

  #[tokio::test]
  async fn create_accepts_json_ack() {
    let (api, log) = spawn_backend().await;
    let body = NewSuggestion::new("s@college.edu", Category::Technology, "Wifi", "Slow in hostel");
    api.create_suggestion(&body).await.unwrap();
    let line = last(&log);
    assert!(line.starts_with("POST /suggestions "), "{line}");
    assert!(line.contains(r#""category":"technology""#), "{line}");
  }

  #[tokio::test]
  async fn delete_accepts_empty_body_and_maps_non_json_errors() {
    let (api, log) = spawn_backend().await;
    api.delete_suggestion(&SuggestionId::from("s1")).await.unwrap();
    assert_eq!(last(&log), "DELETE /student/suggestions/s1");

    let err = api.delete_suggestion(&SuggestionId::from("gone")).await.unwrap_err();
    assert_eq!(
      err,
      ApiError::Rejected { status: 404, message: "Request failed with status 404".into() }
    );
  }

  #[tokio::test]
  async fn ids_are_escaped_as_one_path_segment() {
    let (api, log) = spawn_backend().await;
    api.delete_suggestion(&SuggestionId::from("a/b?c#d")).await.unwrap();
    assert_eq!(last(&log), "DELETE /student/suggestions/a/b?c#d");

    let rec = api
      .view_suggestion(Scope::Admin, &SuggestionId::from("x y/z"), "hod@college.edu")
      .await
      .unwrap();
    assert_eq!(rec.id, SuggestionId::from("x y/z"));
    assert_eq!(last(&log), "GET /admin/suggestions/view/x y/z");
  }

  #[tokio::test]
  async fn update_status_sends_camel_case_body() {
    let (api, log) = spawn_backend().await;
    let updated = api
      .update_status(
        &SuggestionId::from("a1"),
        &StatusUpdate { status: Status::InProgress, updated_by: "HOD".into() },
      )
      .await
      .unwrap();
    assert_eq!(updated.status, Status::InProgress);
    assert_eq!(updated.updated_by.as_deref(), Some("HOD"));
    assert_eq!(
      last(&log),
      r#"PATCH /admin/suggestions/a1 {"status":"in-progress","updatedBy":"HOD"}"#
    );
  }

  #[tokio::test]
  async fn view_uses_scope_specific_paths() {
    let (api, log) = spawn_backend().await;
    let id = SuggestionId::from("a9");

    let rec = api.view_suggestion(Scope::Admin, &id, "hod@college.edu").await.unwrap();
    assert_eq!(rec.id, id);
    assert_eq!(last(&log), "GET /admin/suggestions/view/a9");

    let err = api.view_suggestion(Scope::Student, &id, "s@college.edu").await.unwrap_err();
    assert_eq!(
      err,
      ApiError::Rejected { status: 403, message: "Not your suggestion".into() }
    );
    assert_eq!(last(&log), "GET /student/suggestions/view/a9?email=s@college.edu");
  }

  #[tokio::test]
  async fn connection_refused_is_a_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = HttpApi::new(ApiConfig {
      base_url: format!("http://{addr}"),
      timeout:  Duration::from_secs(2),
    })
    .unwrap();
    let err = api.exchange_token("good").await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "{err:?}");
  }
}
