//! Cache of project and user settings, single instance per scope.

use crate::events::SettingsEvent;
use crate::hub::{Hub, Subscription};
use crate::model::records::{ProjectSettings, UserSettings};

pub struct SettingsStore {
    project: Option<ProjectSettings>,
    user: Option<UserSettings>,
    loading_project: bool,
    loading_user: bool,
    changed: Hub<()>,
}

impl SettingsStore {
    #[must_use]
    pub fn new() -> Self {
        Self {
            project: None,
            user: None,
            loading_project: false,
            loading_user: false,
            changed: Hub::new(),
        }
    }

    #[must_use]
    pub fn project(&self) -> Option<&ProjectSettings> {
        self.project.as_ref()
    }

    #[must_use]
    pub fn user(&self) -> Option<&UserSettings> {
        self.user.as_ref()
    }

    #[must_use]
    pub const fn is_loading_project(&self) -> bool {
        self.loading_project
    }

    #[must_use]
    pub const fn is_loading_user(&self) -> bool {
        self.loading_user
    }

    pub(crate) fn set_loading_project(&mut self, loading: bool) {
        self.loading_project = loading;
    }

    pub(crate) fn set_loading_user(&mut self, loading: bool) {
        self.loading_user = loading;
    }

    /// Mutate the cache for one event and emit a single changed
    /// notification. Never fails.
    pub fn apply(&mut self, event: &SettingsEvent) {
        match event {
            SettingsEvent::ProjectLoaded(settings) | SettingsEvent::ProjectSaved(settings) => {
                self.loading_project = false;
                self.project = Some(settings.clone());
            }
            SettingsEvent::UserLoaded(settings) | SettingsEvent::UserSaved(settings) => {
                self.loading_user = false;
                self.user = Some(settings.clone());
            }
            SettingsEvent::Unchanged => {}
        }
        self.changed.publish(&());
    }

    pub fn on_changed(&mut self, callback: impl FnMut(&()) + 'static) -> Subscription {
        self.changed.subscribe(callback)
    }

    pub fn unsubscribe(&mut self, subscription: Subscription) {
        self.changed.unsubscribe(subscription);
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new()
    }
}
