use crate::common::{Alert, ScreenId};

use super::copy;
use super::security::SecureCredential;

/// Which form the authentication screen shows. Exactly one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum AuthMode {
    #[default]
    SignIn,
    SignUp,
    ForgotPassword,
}

impl AuthMode {
    pub fn required_fields(&self) -> &'static [AuthField] {
        match self {
            AuthMode::SignIn => &[AuthField::Email, AuthField::Password],
            AuthMode::SignUp => &[
                AuthField::Email,
                AuthField::Password,
                AuthField::FirstName,
                AuthField::LastName,
            ],
            AuthMode::ForgotPassword => &[AuthField::Email],
        }
    }

    /// Fields the form shows in this mode, required or not.
    pub fn visible_fields(&self) -> &'static [AuthField] {
        match self {
            AuthMode::SignUp => &[
                AuthField::FirstName,
                AuthField::LastName,
                AuthField::Phone,
                AuthField::Email,
                AuthField::Password,
            ],
            other => other.required_fields(),
        }
    }

    /// Mode transitions reachable from UI triggers. SignUp and
    /// ForgotPassword are never connected directly.
    pub fn can_transition_to(&self, target: AuthMode) -> bool {
        matches!(
            (self, target),
            (AuthMode::SignIn, AuthMode::SignUp)
                | (AuthMode::SignIn, AuthMode::ForgotPassword)
                | (AuthMode::SignUp, AuthMode::SignIn)
                | (AuthMode::ForgotPassword, AuthMode::SignIn)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthField {
    Email,
    Password,
    FirstName,
    LastName,
    Phone,
}

impl AuthField {
    pub fn label(&self) -> &'static str {
        match self {
            AuthField::Email => "Email",
            AuthField::Password => "Senha",
            AuthField::FirstName => "Nome",
            AuthField::LastName => "Sobrenome",
            AuthField::Phone => "Telefone",
        }
    }
}

/// Field values shared by all three modes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthForm {
    pub email: String,
    pub password: SecureCredential,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
}

impl AuthForm {
    pub fn value(&self, field: AuthField) -> &str {
        match field {
            AuthField::Email => &self.email,
            AuthField::Password => self.password.as_str(),
            AuthField::FirstName => &self.first_name,
            AuthField::LastName => &self.last_name,
            AuthField::Phone => &self.phone,
        }
    }

    /// Store the raw keystroke value; nothing is validated here.
    pub fn set(&mut self, field: AuthField, value: String) {
        match field {
            AuthField::Email => self.email = value,
            AuthField::Password => self.password.replace(value),
            AuthField::FirstName => self.first_name = value,
            AuthField::LastName => self.last_name = value,
            AuthField::Phone => self.phone = value,
        }
    }

    pub fn clear(&mut self) {
        self.email.clear();
        self.password.clear();
        self.first_name.clear();
        self.last_name.clear();
        self.phone.clear();
    }

    pub fn is_empty(&self) -> bool {
        [
            AuthField::Email,
            AuthField::Password,
            AuthField::FirstName,
            AuthField::LastName,
            AuthField::Phone,
        ]
        .iter()
        .all(|field| self.value(*field).is_empty())
    }

    /// Whitespace-only counts as blank.
    pub fn is_blank(&self, field: AuthField) -> bool {
        match field {
            AuthField::Password => self.password.is_blank(),
            other => self.value(other).trim().is_empty(),
        }
    }

    /// Required fields for `mode` that are blank after trimming.
    pub fn missing_fields(&self, mode: AuthMode) -> Vec<AuthField> {
        mode.required_fields()
            .iter()
            .copied()
            .filter(|field| self.is_blank(*field))
            .collect()
    }

    /// Phone is optional; blank becomes `None`.
    pub fn phone_number(&self) -> Option<String> {
        let phone = self.phone.trim();
        (!phone.is_empty()).then(|| phone.to_string())
    }
}

/// Follow-up applied when the user acknowledges an auth alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlertAction {
    #[default]
    Dismiss,
    /// Clear every field and go back to sign-in (account created).
    ResetToSignIn,
    /// Go back to sign-in keeping the fields (reset email sent).
    ReturnToSignIn,
}

pub type AuthAlert = Alert<AlertAction>;

/// State of one mounted authentication screen.
///
/// Created when the login route mounts and dropped when it unmounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUiState {
    pub screen: ScreenId,
    pub mode: AuthMode,
    pub form: AuthForm,
    /// True while a provider call is in flight; the submit control is
    /// disabled meanwhile.
    pub is_submitting: bool,
    pub alert: Option<AuthAlert>,
}

impl AuthUiState {
    pub fn new(screen: ScreenId) -> Self {
        Self {
            screen,
            mode: AuthMode::SignIn,
            form: AuthForm::default(),
            is_submitting: false,
            alert: None,
        }
    }

    pub fn can_submit(&self) -> bool {
        !self.is_submitting
    }

    /// Submit button caption; switches to the progress form while in flight.
    pub fn submit_label(&self) -> &'static str {
        match (self.mode, self.is_submitting) {
            (AuthMode::SignIn, false) => copy::SUBMIT_SIGN_IN,
            (AuthMode::SignIn, true) => copy::SUBMITTING_SIGN_IN,
            (AuthMode::SignUp, false) => copy::SUBMIT_SIGN_UP,
            (AuthMode::SignUp, true) => copy::SUBMITTING_SIGN_UP,
            (AuthMode::ForgotPassword, false) => copy::SUBMIT_RESET,
            (AuthMode::ForgotPassword, true) => copy::SUBMITTING_RESET,
        }
    }

    /// Switch mode through a UI trigger. Returns false for transitions the
    /// screen does not offer.
    pub fn transition(&mut self, target: AuthMode) -> bool {
        if !self.mode.can_transition_to(target) {
            return false;
        }
        // Leaving SignUp or ForgotPassword goes through "back to login",
        // which resets the form.
        if target == AuthMode::SignIn {
            self.form.clear();
        }
        self.mode = target;
        true
    }

    /// Unconditional reset to an empty sign-in form.
    pub fn reset_to_sign_in(&mut self) {
        self.form.clear();
        self.mode = AuthMode::SignIn;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled_sign_up() -> AuthUiState {
        let mut ui = AuthUiState::new(ScreenId(1));
        ui.transition(AuthMode::SignUp);
        ui.form.set(AuthField::Email, "a@b.com".into());
        ui.form.set(AuthField::Password, "secret1".into());
        ui.form.set(AuthField::FirstName, "Ana".into());
        ui.form.set(AuthField::LastName, "Silva".into());
        ui
    }

    #[test]
    fn transition_table_is_one_way_through_sign_in() {
        use AuthMode::*;
        for (from, to, allowed) in [
            (SignIn, SignUp, true),
            (SignIn, ForgotPassword, true),
            (SignUp, SignIn, true),
            (ForgotPassword, SignIn, true),
            (SignUp, ForgotPassword, false),
            (ForgotPassword, SignUp, false),
            (SignIn, SignIn, false),
        ] {
            assert_eq!(from.can_transition_to(to), allowed, "{from:?} -> {to:?}");
        }
    }

    #[test]
    fn back_to_login_resets_fields() {
        let mut ui = filled_sign_up();
        assert!(ui.transition(AuthMode::SignIn));
        assert_eq!(ui.mode, AuthMode::SignIn);
        assert!(ui.form.is_empty());
    }

    #[test]
    fn rejected_transition_keeps_state() {
        let mut ui = filled_sign_up();
        let before = ui.clone();
        assert!(!ui.transition(AuthMode::ForgotPassword));
        assert_eq!(ui, before);
    }

    #[test]
    fn submit_label_tracks_mode_and_progress() {
        let mut ui = filled_sign_up();
        assert_eq!(ui.submit_label(), "Criar Conta");
        ui.is_submitting = true;
        assert_eq!(ui.submit_label(), "Criando Conta...");
    }

    #[test]
    fn whitespace_counts_as_missing() {
        let mut form = AuthForm::default();
        form.set(AuthField::Email, "  ".into());
        form.set(AuthField::Password, "pw".into());
        assert_eq!(form.missing_fields(AuthMode::SignIn), vec![AuthField::Email]);
        assert_eq!(
            form.missing_fields(AuthMode::SignUp),
            vec![AuthField::Email, AuthField::FirstName, AuthField::LastName]
        );

        form.set(AuthField::Email, "a@b.com".into());
        form.set(AuthField::Password, " \t ".into());
        assert!(form.is_blank(AuthField::Password));
        assert_eq!(form.missing_fields(AuthMode::SignIn), vec![AuthField::Password]);
    }

    #[test]
    fn phone_is_optional_and_trimmed() {
        let mut form = AuthForm::default();
        assert_eq!(form.phone_number(), None);
        form.set(AuthField::Phone, " (11) 91234-5678 ".into());
        assert_eq!(form.phone_number().as_deref(), Some("(11) 91234-5678"));
    }
}
