//! Login and registration forms.

use crate::auth::SessionStore;
use crate::router::Route;

pub const LOGIN_FAILED: &str = "Invalid email or password. Please try again.";
pub const REGISTER_FAILED: &str = "Registration failed. Try different credentials.";
pub const REGISTER_SUCCEEDED: &str = "Registration successful! Redirecting to login...";

/// Maximum length for a single text field
pub const MAX_FIELD_LENGTH: usize = 128;

/// Check if a typed character should be accepted into a field of `current_len`
pub fn can_add_char(current_len: usize, c: char) -> bool {
    current_len < MAX_FIELD_LENGTH && !c.is_control()
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub error: Option<String>,
}

impl LoginForm {
    pub fn with_email(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Self::default()
        }
    }

    /// Log in with the form's fields. Returns where to go on success.
    pub async fn submit(&mut self, session: &mut SessionStore) -> Option<Route> {
        self.error = None;
        if self.email.trim().is_empty() || self.password.is_empty() {
            self.error = Some("Email and password are required.".to_string());
            return None;
        }

        if session.login(self.email.trim(), &self.password).await {
            self.password.clear();
            Some(Route::Projects)
        } else {
            self.error = Some(LOGIN_FAILED.to_string());
            None
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub is_freelancer: bool,
    pub error: Option<String>,
    pub success: Option<String>,
}

impl RegisterForm {
    /// Create the account. On success returns the login route; the new
    /// account is not logged in.
    pub async fn submit(&mut self, session: &SessionStore) -> Option<Route> {
        self.error = None;
        self.success = None;
        if self.username.trim().is_empty()
            || self.email.trim().is_empty()
            || self.password.is_empty()
        {
            self.error = Some("Username, email and password are required.".to_string());
            return None;
        }

        let ok = session
            .register(
                self.username.trim(),
                self.email.trim(),
                &self.password,
                self.is_freelancer,
            )
            .await;
        if ok {
            self.password.clear();
            self.success = Some(REGISTER_SUCCEEDED.to_string());
            Some(Route::Login)
        } else {
            self.error = Some(REGISTER_FAILED.to_string());
            None
        }
    }
}
