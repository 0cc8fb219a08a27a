//! Host-supplied reference data cache.

use std::collections::HashMap;

use crate::model::refdata::{FieldDef, ReferenceLookup, Team, WorkItemTypeDef};

/// Teams, work item types, and field definitions known to the host.
///
/// Seeded once at session start. Lookups against an unseeded store
/// fail, which is what keeps model validity from passing on references
/// to data that was never loaded.
#[derive(Debug, Default)]
pub struct RefDataStore {
    teams: HashMap<String, Team>,
    work_item_types: HashMap<String, WorkItemTypeDef>,
    fields: HashMap<String, FieldDef>,
    loaded: bool,
}

impl RefDataStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace all reference data with the host's current view.
    pub fn load(&mut self, teams: Vec<Team>, types: Vec<WorkItemTypeDef>, fields: Vec<FieldDef>) {
        self.teams = teams.into_iter().map(|t| (t.id.clone(), t)).collect();
        self.work_item_types = types
            .into_iter()
            .map(|t| (t.name.to_lowercase(), t))
            .collect();
        self.fields = fields
            .into_iter()
            .map(|f| (f.reference_name.to_lowercase(), f))
            .collect();
        self.loaded = true;
    }

    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    #[must_use]
    pub fn team(&self, team_id: &str) -> Option<&Team> {
        self.teams.get(team_id)
    }

    #[must_use]
    pub fn teams(&self) -> Vec<&Team> {
        let mut all: Vec<&Team> = self.teams.values().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        all
    }
}

impl ReferenceLookup for RefDataStore {
    fn team_exists(&self, team_id: &str) -> bool {
        self.teams.contains_key(team_id)
    }

    fn work_item_type_exists(&self, name: &str) -> bool {
        self.work_item_types.contains_key(&name.to_lowercase())
    }

    fn field(&self, reference_name: &str) -> Option<&FieldDef> {
        self.fields.get(&reference_name.to_lowercase())
    }
}
