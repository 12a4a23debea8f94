//! Auth context seam

use mtrack_model::User;

/// Source of the current signed-in identity
pub trait AuthContext: Send + Sync {
    /// Current user, `None` when nobody is signed in
    fn current_user(&self) -> Option<User>;
}

/// Auth context holding a fixed identity
#[derive(Debug, Clone, Default)]
pub struct StaticAuth {
    user: Option<User>,
}

impl StaticAuth {
    /// Signed in as `user`
    #[inline]
    #[must_use]
    pub fn signed_in(user: User) -> Self {
        Self { user: Some(user) }
    }

    /// Nobody signed in
    #[inline]
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl AuthContext for StaticAuth {
    fn current_user(&self) -> Option<User> {
        self.user.clone()
    }
}
