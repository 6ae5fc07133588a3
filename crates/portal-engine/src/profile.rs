//! Capability profiles: what the signed-in role may do and which endpoints
//! it talks to.

use portal_core::{api::Scope, session::Role, workflow::Status};

/// The two capability sets the UI distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
  /// Triages suggestions. `principal` widens the scope beyond a single
  /// department and changes the `updatedBy` stamp.
  Admin { principal: bool },
  /// Submits suggestions and may delete their own.
  Student,
}

impl Profile {
  /// `is_principal` without `is_admin` is treated as a student.
  pub fn from_role(role: Role) -> Self {
    if role.is_admin {
      Self::Admin { principal: role.is_principal }
    } else {
      Self::Student
    }
  }

  pub fn scope(self) -> Scope {
    match self {
      Self::Admin { .. } => Scope::Admin,
      Self::Student => Scope::Student,
    }
  }

  pub fn can_submit(self) -> bool { matches!(self, Self::Student) }

  pub fn can_delete(self) -> bool { matches!(self, Self::Student) }

  pub fn can_change_status(self) -> bool { matches!(self, Self::Admin { .. }) }

  /// The `updatedBy` value sent with a status change; `None` for students.
  pub fn updated_by(self) -> Option<&'static str> {
    match self {
      Self::Admin { principal: true } => Some("Principal"),
      Self::Admin { principal: false } => Some("HOD"),
      Self::Student => None,
    }
  }

  /// Transitions to offer for a record currently in `status`.
  pub fn transitions(self, status: Status) -> &'static [Status] {
    if self.can_change_status() { status.transitions() } else { &[] }
  }

  pub fn label(self) -> &'static str {
    match self {
      Self::Admin { principal: true } => "Principal",
      Self::Admin { principal: false } => "HOD",
      Self::Student => "Student",
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn role(is_admin: bool, is_principal: bool) -> Role { Role { is_admin, is_principal } }

  #[test]
  fn admin_roles_change_status_but_never_delete() {
    for principal in [false, true] {
      let p = Profile::from_role(role(true, principal));
      assert!(p.can_change_status());
      assert!(!p.can_delete());
      assert_eq!(p.scope(), Scope::Admin);
    }
  }

  #[test]
  fn students_delete_but_never_change_status() {
    let p = Profile::from_role(role(false, false));
    assert_eq!(p, Profile::Student);
    assert!(p.can_delete());
    assert!(p.can_submit());
    assert!(!p.can_change_status());
    assert_eq!(p.updated_by(), None);
    assert!(p.transitions(Status::Pending).is_empty());
  }

  #[test]
  fn updated_by_follows_principal_flag() {
    assert_eq!(Profile::from_role(role(true, true)).updated_by(), Some("Principal"));
    assert_eq!(Profile::from_role(role(true, false)).updated_by(), Some("HOD"));
  }

  #[test]
  fn principal_flag_alone_is_not_admin() {
    assert_eq!(Profile::from_role(role(false, true)), Profile::Student);
  }

  #[test]
  fn admins_get_no_actions_on_terminal_records() {
    let p = Profile::Admin { principal: false };
    assert!(p.transitions(Status::Resolved).is_empty());
    assert!(p.transitions(Status::Invalid).is_empty());
    assert_eq!(p.transitions(Status::InProgress), &[Status::Resolved, Status::Invalid]);
  }
}
