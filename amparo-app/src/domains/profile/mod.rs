//! Profile and account settings.
//!
//! The profile of the signed-in user is loaded whenever the session user
//! changes and refreshed when Home or Settings mount. Settings owns the edit
//! form and the sign-out confirmation.

pub mod copy;
pub mod messages;
pub mod update;

use amparo_model::{Profile, UserId};

use crate::common::{Alert, ScreenId};

pub use messages::{ProfileField, ProfileMessage};

pub type ProfileAlert = Alert<()>;

/// Edit buffer for the settings form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileEditor {
    pub name: String,
    pub last_name: String,
    pub phone: String,
}

impl ProfileEditor {
    pub fn from_profile(profile: Option<&Profile>) -> Self {
        let field = |value: Option<&String>| value.cloned().unwrap_or_default();
        Self {
            name: field(profile.and_then(|p| p.name.as_ref())),
            last_name: field(profile.and_then(|p| p.last_name.as_ref())),
            phone: field(profile.and_then(|p| p.phone_number.as_ref())),
        }
    }

    pub fn set(&mut self, field: ProfileField, value: String) {
        match field {
            ProfileField::Name => self.name = value,
            ProfileField::LastName => self.last_name = value,
            ProfileField::Phone => self.phone = value,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignOutState {
    #[default]
    Idle,
    /// "Tem certeza?" prompt visible.
    Confirming,
    InFlight,
}

/// State of one mounted settings screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsScreen {
    pub screen: ScreenId,
    /// `Some` while editing.
    pub editor: Option<ProfileEditor>,
    pub is_saving: bool,
    pub sign_out: SignOutState,
    pub alert: Option<ProfileAlert>,
}

impl SettingsScreen {
    pub fn new(screen: ScreenId) -> Self {
        Self {
            screen,
            editor: None,
            is_saving: false,
            sign_out: SignOutState::Idle,
            alert: None,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.editor.is_some()
    }
}

#[derive(Debug, Default)]
pub struct ProfileDomainState {
    pub profile: Option<Profile>,
    pub is_loading: bool,
    /// User the current `profile` (or in-flight load) belongs to.
    pub loaded_for: Option<UserId>,
    pub settings: Option<SettingsScreen>,
    /// Alert not tied to one screen, shown over whichever tab is visible.
    pub notice: Option<ProfileAlert>,
}

impl ProfileDomainState {
    /// Home screen greeting for the loaded profile.
    pub fn greeting(&self) -> String {
        Profile::greeting(self.profile.as_ref())
    }

    pub fn clear(&mut self) {
        self.profile = None;
        self.is_loading = false;
        self.loaded_for = None;
        self.notice = None;
    }
}
