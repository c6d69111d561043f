use models::user::UserSummary;

/// Lifecycle of the local session.
///
/// `Anonymous -> Authenticating -> Authenticated -> Anonymous`; a failed
/// login or refresh lands back in `Anonymous`.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    #[default]
    Anonymous,
    Authenticating,
    Authenticated(UserSummary),
}

impl SessionState {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, SessionState::Authenticated(_))
    }

    pub fn user(&self) -> Option<&UserSummary> {
        match self {
            SessionState::Authenticated(u) => Some(u),
            _ => None,
        }
    }
}
