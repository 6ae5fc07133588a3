//! The `PortalApi` trait, the boundary between the board controller and the
//! backend.
//!
//! The HTTP implementation lives in `portal-engine`. Tests substitute an
//! in-memory fake. Scoping of what a caller may see is enforced by the
//! backend; the client only picks the endpoint family via [`Scope`].

use std::future::Future;

use crate::{
  ApiError,
  session::Identity,
  suggestion::{NewSuggestion, StatusUpdate, Suggestion, SuggestionId},
};

/// Which endpoint family a request goes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
  /// `/api/admin/...`: everything routed to the admin's department, or all
  /// departments for the principal.
  Admin,
  /// `/api/student/...`: only the caller's own submissions.
  Student,
}

/// Abstraction over the portal backend.
///
/// All methods return `Send` futures so implementations can be driven from a
/// multi-threaded tokio runtime.
pub trait PortalApi: Send + Sync {
  /// `POST /api/auth/google`: exchange an identity-provider token.
  fn exchange_token<'a>(
    &'a self,
    token: &'a str,
  ) -> impl Future<Output = Result<Identity, ApiError>> + Send + 'a;

  /// `GET /api/{admin,student}/suggestions?email=`
  fn list_suggestions<'a>(
    &'a self,
    scope: Scope,
    email: &'a str,
  ) -> impl Future<Output = Result<Vec<Suggestion>, ApiError>> + Send + 'a;

  /// `POST /api/suggestions`. Only acknowledgement matters; callers reload.
  fn create_suggestion<'a>(
    &'a self,
    body: &'a NewSuggestion,
  ) -> impl Future<Output = Result<(), ApiError>> + Send + 'a;

  /// `DELETE /api/student/suggestions/:id`
  fn delete_suggestion<'a>(
    &'a self,
    id: &'a SuggestionId,
  ) -> impl Future<Output = Result<(), ApiError>> + Send + 'a;

  /// `PATCH /api/admin/suggestions/:id`. Returns the authoritative record.
  fn update_status<'a>(
    &'a self,
    id: &'a SuggestionId,
    body: &'a StatusUpdate,
  ) -> impl Future<Output = Result<Suggestion, ApiError>> + Send + 'a;

  /// `GET /api/admin/suggestions/view/:id` or
  /// `GET /api/student/suggestions/view/:id?email=`
  fn view_suggestion<'a>(
    &'a self,
    scope: Scope,
    id: &'a SuggestionId,
    email: &'a str,
  ) -> impl Future<Output = Result<Suggestion, ApiError>> + Send + 'a;
}
