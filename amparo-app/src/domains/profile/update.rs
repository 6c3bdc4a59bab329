use std::sync::Arc;

use amparo_model::{Profile, ProfileUpdate, UserId};
use chrono::Utc;

use crate::common::messages::{CrossDomainEvent, DomainMessage, DomainUpdateResult};
use crate::common::{Alert, AlertKind, ScreenId, Task};
use crate::domains::navigation::Route;
use crate::infra::services::{AuthProvider, ProfileRepository, ProviderError};
use crate::state::State;

use super::messages::ProfileMessage;
use super::{ProfileEditor, SettingsScreen, SignOutState, copy};

macro_rules! wrap_task {
    ($task:expr) => {
        DomainUpdateResult::task($task.map(DomainMessage::Profile))
    };
}

pub fn update_profile(
    state: &mut State,
    message: ProfileMessage,
) -> DomainUpdateResult {
    match message {
        ProfileMessage::Load => wrap_task!(load(state)),
        ProfileMessage::Loaded { user, result } => {
            handle_loaded(state, user, result);
            DomainUpdateResult::none()
        }

        ProfileMessage::BeginEdit => {
            let profile = state.domains.profile.profile.clone();
            if let Some(settings) = state.domains.profile.settings.as_mut()
                && !settings.is_editing()
            {
                settings.editor = Some(ProfileEditor::from_profile(profile.as_ref()));
            }
            DomainUpdateResult::none()
        }
        ProfileMessage::CancelEdit => {
            if let Some(settings) = state.domains.profile.settings.as_mut()
                && !settings.is_saving
            {
                settings.editor = None;
            }
            DomainUpdateResult::none()
        }
        ProfileMessage::UpdateField(field, value) => {
            if let Some(editor) = state
                .domains
                .profile
                .settings
                .as_mut()
                .and_then(|settings| settings.editor.as_mut())
            {
                editor.set(field, value);
            }
            DomainUpdateResult::none()
        }
        ProfileMessage::Save => wrap_task!(handle_save(state)),
        ProfileMessage::Saved(screen, result) => {
            handle_saved(state, screen, result);
            DomainUpdateResult::none()
        }

        ProfileMessage::RequestSignOut => {
            if let Some(settings) = state.domains.profile.settings.as_mut()
                && settings.sign_out == SignOutState::Idle
            {
                settings.sign_out = SignOutState::Confirming;
            }
            DomainUpdateResult::none()
        }
        ProfileMessage::CancelSignOut => {
            if let Some(settings) = state.domains.profile.settings.as_mut()
                && settings.sign_out == SignOutState::Confirming
            {
                settings.sign_out = SignOutState::Idle;
            }
            DomainUpdateResult::none()
        }
        ProfileMessage::ConfirmSignOut => wrap_task!(handle_confirm_sign_out(state)),
        ProfileMessage::SignOutCompleted(screen, result) => {
            handle_sign_out_completed(state, screen, result)
        }

        ProfileMessage::DismissAlert => {
            if let Some(settings) = state.domains.profile.settings.as_mut() {
                settings.alert = None;
            }
            DomainUpdateResult::none()
        }
        ProfileMessage::DismissNotice => {
            state.domains.profile.notice = None;
            DomainUpdateResult::none()
        }
    }
}

pub fn raise_notice(
    state: &mut State,
    title: String,
    message: String,
) -> Task<DomainMessage> {
    state.domains.profile.notice = Some(Alert::error(title, message));
    Task::none()
}

/// Load (or drop) the profile whenever the signed-in identity changes.
pub fn on_session_user_changed(
    state: &mut State,
    current: Option<UserId>,
) -> Task<DomainMessage> {
    match current {
        Some(_) => load(state).map(DomainMessage::Profile),
        None => {
            log::debug!("[Profile] Signed out, clearing profile");
            state.domains.profile.clear();
            Task::none()
        }
    }
}

/// Mount the settings screen when its tab becomes visible and refresh the
/// profile on the screens that display it.
pub fn on_route_changed(
    state: &mut State,
    from: Route,
    to: Route,
) -> Task<DomainMessage> {
    if from == Route::Settings && state.domains.profile.settings.take().is_some() {
        log::debug!("[Profile] Settings screen unmounted");
    }
    if to == Route::Settings {
        let screen = state.next_screen_id();
        log::debug!("[Profile] Settings screen mounted as {screen}");
        state.domains.profile.settings = Some(SettingsScreen::new(screen));
    }
    match to {
        // A load already in flight for the same user covers this refresh.
        Route::Home | Route::Settings if !state.domains.profile.is_loading => {
            load(state).map(DomainMessage::Profile)
        }
        _ => Task::none(),
    }
}

fn mounted_settings(state: &mut State, screen: ScreenId) -> Option<&mut SettingsScreen> {
    match state.domains.profile.settings.as_mut() {
        Some(settings) if settings.screen == screen => Some(settings),
        _ => {
            log::debug!("[Profile] Dropping completion for unmounted {screen}");
            None
        }
    }
}

fn load(state: &mut State) -> Task<ProfileMessage> {
    let Some(user) = state.domains.session.store.user_id() else {
        return Task::none();
    };
    let profile = &mut state.domains.profile;
    if profile.loaded_for != Some(user) {
        profile.profile = None;
    }
    profile.loaded_for = Some(user);
    profile.is_loading = true;

    let profiles = Arc::clone(&state.services.profiles);
    Task::perform(
        async move { profiles.fetch_profile(user).await },
        move |result| ProfileMessage::Loaded { user, result },
    )
}

fn handle_loaded(
    state: &mut State,
    user: UserId,
    result: Result<Option<Profile>, ProviderError>,
) {
    let profile = &mut state.domains.profile;
    if profile.loaded_for != Some(user) {
        log::debug!("[Profile] Ignoring profile of previous user {user}");
        return;
    }
    profile.is_loading = false;
    match result {
        Ok(loaded) => profile.profile = loaded,
        // The greeting falls back to its anonymous form.
        Err(err) => log::warn!("[Profile] Failed to load profile of {user}: {err}"),
    }
}

fn handle_save(state: &mut State) -> Task<ProfileMessage> {
    let user = state.domains.session.store.user_id();
    let profiles = Arc::clone(&state.services.profiles);

    let Some(settings) = state.domains.profile.settings.as_mut() else {
        return Task::none();
    };
    if settings.is_saving {
        log::debug!("[Profile] Save ignored: already saving");
        return Task::none();
    }
    let Some(editor) = settings.editor.as_ref() else {
        return Task::none();
    };
    let Some(user) = user else {
        log::warn!("[Profile] Save without a session");
        return Task::none();
    };

    let name = editor.name.trim();
    let last_name = editor.last_name.trim();
    if name.is_empty() || last_name.is_empty() {
        settings.alert = Some(Alert::error(copy::TITLE_ERROR, copy::NAME_REQUIRED));
        return Task::none();
    }
    let phone = editor.phone.trim();
    let update = ProfileUpdate {
        name: name.to_string(),
        last_name: last_name.to_string(),
        phone_number: (!phone.is_empty()).then(|| phone.to_string()),
        updated_at: Utc::now(),
    };

    settings.is_saving = true;
    settings.alert = None;
    let screen = settings.screen;
    log::info!("[Profile] Saving profile of {user}");
    Task::perform(save(profiles, user, update), move |result| {
        ProfileMessage::Saved(screen, result)
    })
}

/// Write the update, then read the row back.
///
/// A failed read-back after a successful write still counts as saved; the
/// written values are used instead.
pub async fn save(
    profiles: Arc<dyn ProfileRepository>,
    user: UserId,
    update: ProfileUpdate,
) -> Result<Profile, ProviderError> {
    profiles.update_profile(user, update.clone()).await?;
    match profiles.fetch_profile(user).await {
        Ok(Some(profile)) => Ok(profile),
        Ok(None) | Err(_) => {
            log::warn!("[Profile] Saved profile of {user} could not be read back");
            Ok(Profile {
                id: user,
                name: Some(update.name),
                last_name: Some(update.last_name),
                phone_number: update.phone_number,
                updated_at: Some(update.updated_at),
            })
        }
    }
}

fn handle_saved(
    state: &mut State,
    screen: ScreenId,
    result: Result<Profile, ProviderError>,
) {
    let Some(settings) = mounted_settings(state, screen) else {
        return;
    };
    settings.is_saving = false;
    match result {
        Ok(profile) => {
            settings.editor = None;
            settings.alert = Some(Alert::new(
                AlertKind::Success,
                copy::TITLE_SUCCESS,
                copy::PROFILE_UPDATED,
                (),
            ));
            state.domains.profile.profile = Some(profile);
        }
        Err(err) => {
            log::warn!("[Profile] Profile update failed: {err}");
            let message = match err.to_string() {
                text if text.trim().is_empty() => copy::PROFILE_UPDATE_FAILED.to_string(),
                text => text,
            };
            settings.alert = Some(Alert::error(copy::TITLE_ERROR, message));
        }
    }
}

fn handle_confirm_sign_out(state: &mut State) -> Task<ProfileMessage> {
    let auth: Arc<dyn AuthProvider> = Arc::clone(&state.services.auth);
    let Some(settings) = state.domains.profile.settings.as_mut() else {
        return Task::none();
    };
    if settings.sign_out != SignOutState::Confirming {
        return Task::none();
    }
    settings.sign_out = SignOutState::InFlight;
    let screen = settings.screen;
    log::info!("[Profile] Signing out");
    Task::perform(async move { auth.sign_out().await }, move |result| {
        ProfileMessage::SignOutCompleted(screen, result)
    })
}

fn handle_sign_out_completed(
    state: &mut State,
    screen: ScreenId,
    result: Result<(), ProviderError>,
) -> DomainUpdateResult {
    match result {
        Ok(()) => {
            if let Some(settings) = mounted_settings(state, screen) {
                settings.sign_out = SignOutState::Idle;
            }
            DomainUpdateResult::event(CrossDomainEvent::UserSignedOut)
        }
        Err(err) => {
            log::warn!("[Profile] Sign-out failed: {err}");
            if let Some(settings) = mounted_settings(state, screen) {
                settings.sign_out = SignOutState::Idle;
                settings.alert =
                    Some(Alert::error(copy::TITLE_ERROR, copy::SIGN_OUT_FAILED));
            }
            DomainUpdateResult::none()
        }
    }
}
