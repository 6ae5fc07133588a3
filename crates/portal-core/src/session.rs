//! Session state: who is signed in and with which role.

use serde::{Deserialize, Serialize};

/// Role flags as reported by the auth exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Role {
  pub is_admin:     bool,
  pub is_principal: bool,
}

/// Success body of `POST /api/auth/google`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
  pub email:        String,
  #[serde(default)]
  pub is_admin:     bool,
  #[serde(default)]
  pub is_principal: bool,
  #[serde(default)]
  pub department:   Option<String>,
}

/// The signed-in user, or nobody.
///
/// Fields are private so the only ways in are [`Session::from_identity`] and
/// [`Session::clear`]; an unauthenticated session therefore never carries a
/// stale email, role or department.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
  email:         String,
  role:          Role,
  department:    Option<String>,
  authenticated: bool,
}

impl Session {
  /// Populate every field at once from a completed credential exchange.
  pub fn from_identity(identity: Identity) -> Self {
    Self {
      email:         identity.email,
      role:          Role {
        is_admin:     identity.is_admin,
        is_principal: identity.is_principal,
      },
      department:    identity.department.filter(|d| !d.is_empty()),
      authenticated: true,
    }
  }

  pub fn clear(&mut self) { *self = Self::default(); }

  pub fn is_authenticated(&self) -> bool { self.authenticated }

  /// The signed-in email; empty when signed out.
  pub fn email(&self) -> &str { &self.email }

  pub fn role(&self) -> Role { self.role }

  pub fn department(&self) -> Option<&str> { self.department.as_deref() }
}
