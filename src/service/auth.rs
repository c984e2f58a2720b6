use crate::error::app_error::AppError;
use crate::models::session::LoginRequest;
use tracing::{debug, info};
use validator::Validate;

/// What happened during a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The session is open; the client continues to `redirect_to`.
    Authenticated { redirect_to: String },
}

/// The login screen's gate.
///
/// There is no credential store behind this: a submission that passes the form checks
/// (an email address and a non-empty password) is always let through. Callers must not
/// treat `Authenticated` as proof of who the user is.
pub struct SessionGate<'a> {
    expenses_path: &'a str,
}

impl<'a> SessionGate<'a> {
    pub fn new(expenses_path: &'a str) -> Self {
        SessionGate { expenses_path }
    }

    pub fn submit(&self, request: &LoginRequest) -> Result<LoginOutcome, AppError> {
        request.validate()?;

        debug!(email = %request.email, "login form accepted");
        info!("session opened without credential check");

        Ok(LoginOutcome::Authenticated {
            redirect_to: self.expenses_path.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn any_well_formed_login_is_accepted() {
        let gate = SessionGate::new("/api/expenses");
        for password in ["hunter2", "wrong", "x"] {
            let outcome = gate
                .submit(&LoginRequest {
                    email: "rohan@example.com".to_string(),
                    password: password.to_string(),
                })
                .expect("login should pass");
            assert_eq!(
                outcome,
                LoginOutcome::Authenticated {
                    redirect_to: "/api/expenses".to_string()
                }
            );
        }
    }

    #[test]
    fn malformed_form_is_rejected_before_the_gate() {
        let gate = SessionGate::new("/api/expenses");
        let err = gate
            .submit(&LoginRequest {
                email: String::new(),
                password: String::new(),
            })
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }
}
