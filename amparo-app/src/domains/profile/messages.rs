use amparo_model::{Profile, UserId};

use crate::common::ScreenId;
use crate::infra::services::ProviderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProfileField {
    Name,
    LastName,
    Phone,
}

#[derive(Clone, Debug)]
pub enum ProfileMessage {
    /// (Re)load the profile of the signed-in user.
    Load,
    Loaded {
        user: UserId,
        result: Result<Option<Profile>, ProviderError>,
    },

    // Settings form
    BeginEdit,
    CancelEdit,
    UpdateField(ProfileField, String),
    Save,
    Saved(ScreenId, Result<Profile, ProviderError>),

    // Sign-out
    RequestSignOut,
    CancelSignOut,
    ConfirmSignOut,
    SignOutCompleted(ScreenId, Result<(), ProviderError>),

    DismissAlert,
    DismissNotice,
}

impl ProfileMessage {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Load => "Profile::Load",
            Self::Loaded { .. } => "Profile::Loaded",
            Self::BeginEdit => "Profile::BeginEdit",
            Self::CancelEdit => "Profile::CancelEdit",
            Self::UpdateField(..) => "Profile::UpdateField",
            Self::Save => "Profile::Save",
            Self::Saved(..) => "Profile::Saved",
            Self::RequestSignOut => "Profile::RequestSignOut",
            Self::CancelSignOut => "Profile::CancelSignOut",
            Self::ConfirmSignOut => "Profile::ConfirmSignOut",
            Self::SignOutCompleted(..) => "Profile::SignOutCompleted",
            Self::DismissAlert => "Profile::DismissAlert",
            Self::DismissNotice => "Profile::DismissNotice",
        }
    }
}
