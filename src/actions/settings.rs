//! Project and user settings orchestration.
//!
//! Both scopes are single-instance: the project settings document lives
//! in the shared settings collection under the project id, user
//! settings in the per-user key/value store under the unique name. A
//! missing document yields scope defaults rather than an error.

use tracing::debug;

use crate::actions::capture;
use crate::client::{self, SETTINGS_COLLECTION, Scope};
use crate::error::Result;
use crate::events::SettingsEvent;
use crate::model::records::{ProjectSettings, UserSettings};
use crate::session::Session;
use crate::store::ErrorKey;

/// Load project settings unless already cached or in flight.
pub fn initialize_project_settings(session: &mut Session) {
    if session.settings.is_loading_project() {
        return;
    }
    if session.settings.project().is_some() {
        session.settings.apply(&SettingsEvent::Unchanged);
        return;
    }
    refresh_project_settings(session);
}

/// Force-reload project settings.
pub fn refresh_project_settings(session: &mut Session) {
    if session.settings.is_loading_project() {
        return;
    }
    session.settings.set_loading_project(true);
    match fetch_project(session) {
        Ok(settings) => session.settings.apply(&SettingsEvent::ProjectLoaded(settings)),
        Err(e) => {
            session.settings.set_loading_project(false);
            capture(session, ErrorKey::BugBashSettings, &e);
        }
    }
}

/// Persist the project's media repository setting.
pub fn save_project_settings(session: &mut Session, git_media_repo: &str) {
    let mut settings = session
        .settings
        .project()
        .cloned()
        .unwrap_or_else(|| ProjectSettings {
            id: session.config.project_id.clone(),
            ..Default::default()
        });
    settings.git_media_repo = git_media_repo.to_string();

    match persist_project(session, &settings) {
        Ok(saved) => {
            debug!(etag = saved.etag, "saved project settings");
            session.settings.apply(&SettingsEvent::ProjectSaved(saved));
        }
        Err(e) => capture(session, ErrorKey::BugBashSettings, &e),
    }
}

/// Load user settings unless already cached or in flight.
pub fn initialize_user_settings(session: &mut Session) {
    if session.settings.is_loading_user() {
        return;
    }
    if session.settings.user().is_some() {
        session.settings.apply(&SettingsEvent::Unchanged);
        return;
    }
    refresh_user_settings(session);
}

/// Force-reload user settings.
pub fn refresh_user_settings(session: &mut Session) {
    if session.settings.is_loading_user() {
        return;
    }
    session.settings.set_loading_user(true);
    match fetch_user(session) {
        Ok(settings) => session.settings.apply(&SettingsEvent::UserLoaded(settings)),
        Err(e) => {
            session.settings.set_loading_user(false);
            capture(session, ErrorKey::BugBashSettings, &e);
        }
    }
}

/// Persist the current user's associated team.
pub fn save_user_settings(session: &mut Session, associated_team: &str) {
    let mut settings = session
        .settings
        .user()
        .cloned()
        .unwrap_or_else(|| UserSettings {
            id: session.config.identity.unique_name.clone(),
            ..Default::default()
        });
    settings.associated_team = associated_team.to_string();

    match persist_user(session, &settings) {
        Ok(saved) => {
            debug!("saved user settings");
            session.settings.apply(&SettingsEvent::UserSaved(saved));
        }
        Err(e) => capture(session, ErrorKey::BugBashSettings, &e),
    }
}

fn fetch_project(session: &Session) -> Result<ProjectSettings> {
    let project_id = &session.config.project_id;
    session
        .client
        .read_document(SETTINGS_COLLECTION, project_id, Scope::Shared)?
        .map_or_else(
            || {
                Ok(ProjectSettings {
                    id: project_id.clone(),
                    ..Default::default()
                })
            },
            |document| client::decode(SETTINGS_COLLECTION, document),
        )
}

fn persist_project(session: &mut Session, settings: &ProjectSettings) -> Result<ProjectSettings> {
    let document = client::encode(settings)?;
    let saved = session
        .client
        .upsert_document(SETTINGS_COLLECTION, document, Scope::Shared)?;
    client::decode(SETTINGS_COLLECTION, saved)
}

fn fetch_user(session: &Session) -> Result<UserSettings> {
    let unique_name = &session.config.identity.unique_name;
    session.client.read_user_setting(unique_name)?.map_or_else(
        || {
            Ok(UserSettings {
                id: unique_name.clone(),
                ..Default::default()
            })
        },
        |document| client::decode("usersettings", document),
    )
}

fn persist_user(session: &mut Session, settings: &UserSettings) -> Result<UserSettings> {
    let key = session.config.identity.unique_name.clone();
    let document = client::encode(settings)?;
    let saved = session.client.write_user_setting(&key, document)?;
    client::decode("usersettings", saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::testing::test_session;

    #[test]
    fn missing_project_settings_default() {
        let (mut session, _) = test_session();
        initialize_project_settings(&mut session);

        let settings = session.settings.project().unwrap();
        assert_eq!(settings.id, "proj");
        assert_eq!(settings.git_media_repo, "");
    }

    #[test]
    fn project_settings_save_and_reload() {
        let (mut session, _) = test_session();
        save_project_settings(&mut session, "media-repo");
        assert_eq!(
            session.settings.project().unwrap().git_media_repo,
            "media-repo"
        );

        // A save while cached advances the stored version.
        save_project_settings(&mut session, "media-repo-2");
        assert_eq!(session.settings.project().unwrap().etag, 1);

        refresh_project_settings(&mut session);
        assert_eq!(
            session.settings.project().unwrap().git_media_repo,
            "media-repo-2"
        );
    }

    #[test]
    fn user_settings_round_trip_under_the_unique_name() {
        let (mut session, _) = test_session();
        initialize_user_settings(&mut session);
        assert_eq!(session.settings.user().unwrap().associated_team, "");

        save_user_settings(&mut session, "team1");
        refresh_user_settings(&mut session);
        let user = session.settings.user().unwrap();
        assert_eq!(user.associated_team, "team1");
        assert_eq!(user.id, "ada@example.com");
    }

    #[test]
    fn overlapping_initializes_fetch_once() {
        let (mut session, reads) = test_session();
        initialize_project_settings(&mut session);
        initialize_project_settings(&mut session);
        assert_eq!(reads.get(), 1);
    }
}
