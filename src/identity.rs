use serde::{Deserialize, Serialize};

/// Signed-in user as seen by a collection method.
///
/// Methods receive `Option<Identity>`. The dispatcher does not look users up
/// and does not enforce login, so the value is currently always `None`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    pub email: String,
    pub admin: bool,
}

impl Identity {
    pub fn new(id: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            admin: false,
        }
    }

    pub fn with_admin(mut self, admin: bool) -> Self {
        self.admin = admin;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_identity_is_not_admin() {
        let identity = Identity::new("185804764220139124118", "test@example.com");
        assert!(!identity.admin);
        assert!(identity.with_admin(true).admin);
    }
}
