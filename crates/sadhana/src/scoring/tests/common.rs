use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::scoring::criteria::ResolvedCriteria;
use crate::scoring::domain::{SadhanaEntry, UserId, UserProfile};
use crate::scoring::repository::{
    ConfigurationStore, EntryRepository, ProfileRepository, RepositoryError,
};
use crate::scoring::service::SadhanaService;

pub(super) fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn devotee() -> UserId {
    UserId::new("dev-108")
}

pub(super) fn nakula() -> ResolvedCriteria {
    ResolvedCriteria::builtin("nakula")
}

/// The worked nakula example: 15 + 15 + 150 + 20 + 20 + 15 = 235.
pub(super) fn nakula_scenario_entry() -> SadhanaEntry {
    let mut entry = SadhanaEntry::new(devotee(), day(2025, 3, 12));
    entry.wake_up_time = Some("04:10".to_string());
    entry.sleep_time = Some("22:15".to_string());
    entry.reading_minutes = 200;
    entry.day_sleep_duration = Some(50);
    entry.chanting_completion_time = Some("08:30".to_string());
    entry.mangala_arati = true;
    entry.guru_puja = true;
    entry
}

/// Scores exactly 50 against sahadev: wake 20 + sleep 20 + reading 10.
pub(super) fn fifty_point_entry(date: NaiveDate) -> SadhanaEntry {
    let mut entry = SadhanaEntry::new(devotee(), date);
    entry.wake_up_time = Some("04:30".to_string());
    entry.sleep_time = Some("21:00".to_string());
    entry.reading_minutes = 10;
    entry
}

pub(super) fn week_of(
    start: NaiveDate,
    build: impl Fn(NaiveDate) -> SadhanaEntry,
) -> Vec<SadhanaEntry> {
    start.iter_days().take(7).map(build).collect()
}

#[derive(Default, Clone)]
pub(super) struct MemoryEntries {
    records: Arc<Mutex<HashMap<(UserId, NaiveDate), SadhanaEntry>>>,
}

impl MemoryEntries {
    pub(super) fn with_entries(entries: Vec<SadhanaEntry>) -> Self {
        let repository = Self::default();
        for entry in entries {
            repository.upsert(entry).expect("seed entry");
        }
        repository
    }

    pub(super) fn len(&self) -> usize {
        self.records.lock().expect("entries mutex poisoned").len()
    }
}

impl EntryRepository for MemoryEntries {
    fn upsert(&self, entry: SadhanaEntry) -> Result<SadhanaEntry, RepositoryError> {
        let mut guard = self.records.lock().expect("entries mutex poisoned");
        guard.insert((entry.user_id.clone(), entry.date), entry.clone());
        Ok(entry)
    }

    fn fetch(
        &self,
        user_id: &UserId,
        date: NaiveDate,
    ) -> Result<Option<SadhanaEntry>, RepositoryError> {
        let guard = self.records.lock().expect("entries mutex poisoned");
        Ok(guard.get(&(user_id.clone(), date)).cloned())
    }

    fn range(
        &self,
        user_id: &UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<SadhanaEntry>, RepositoryError> {
        let guard = self.records.lock().expect("entries mutex poisoned");
        Ok(guard
            .values()
            .filter(|entry| &entry.user_id == user_id && entry.date >= start && entry.date <= end)
            .cloned()
            .collect())
    }
}

/// Fails every range query for one user; everyone else is served normally.
pub(super) struct FlakyEntries {
    pub(super) inner: MemoryEntries,
    pub(super) failing_user: UserId,
}

impl EntryRepository for FlakyEntries {
    fn upsert(&self, entry: SadhanaEntry) -> Result<SadhanaEntry, RepositoryError> {
        self.inner.upsert(entry)
    }

    fn fetch(
        &self,
        user_id: &UserId,
        date: NaiveDate,
    ) -> Result<Option<SadhanaEntry>, RepositoryError> {
        self.inner.fetch(user_id, date)
    }

    fn range(
        &self,
        user_id: &UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<SadhanaEntry>, RepositoryError> {
        if user_id == &self.failing_user {
            return Err(RepositoryError::Unavailable("entries shard offline".to_string()));
        }
        self.inner.range(user_id, start, end)
    }
}

pub(super) struct UnavailableEntries;

impl EntryRepository for UnavailableEntries {
    fn upsert(&self, _entry: SadhanaEntry) -> Result<SadhanaEntry, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(
        &self,
        _user_id: &UserId,
        _date: NaiveDate,
    ) -> Result<Option<SadhanaEntry>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn range(
        &self,
        _user_id: &UserId,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<Vec<SadhanaEntry>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryProfiles {
    profiles: Arc<Mutex<HashMap<UserId, UserProfile>>>,
}

impl MemoryProfiles {
    pub(super) fn with_profiles(profiles: Vec<UserProfile>) -> Self {
        let repository = Self::default();
        {
            let mut guard = repository.profiles.lock().expect("profiles mutex poisoned");
            for profile in profiles {
                guard.insert(profile.user_id.clone(), profile);
            }
        }
        repository
    }
}

impl ProfileRepository for MemoryProfiles {
    fn profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, RepositoryError> {
        let guard = self.profiles.lock().expect("profiles mutex poisoned");
        Ok(guard.get(user_id).cloned())
    }
}

#[derive(Default, Clone)]
pub(super) struct MemoryStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub(super) fn with_value(key: &str, value: &str) -> Self {
        let store = Self::default();
        store
            .write(key, value.to_string())
            .expect("seed configuration value");
        store
    }

    pub(super) fn raw(&self, key: &str) -> Option<String> {
        self.values
            .lock()
            .expect("store mutex poisoned")
            .get(key)
            .cloned()
    }
}

impl ConfigurationStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        Ok(self.raw(key))
    }

    fn write(&self, key: &str, value: String) -> Result<(), RepositoryError> {
        self.values
            .lock()
            .expect("store mutex poisoned")
            .insert(key.to_string(), value);
        Ok(())
    }
}

pub(super) struct UnavailableStore;

impl ConfigurationStore for UnavailableStore {
    fn read(&self, _key: &str) -> Result<Option<String>, RepositoryError> {
        Err(RepositoryError::Unavailable("settings offline".to_string()))
    }

    fn write(&self, _key: &str, _value: String) -> Result<(), RepositoryError> {
        Err(RepositoryError::Unavailable("settings offline".to_string()))
    }
}

pub(super) type MemoryService = SadhanaService<MemoryEntries, MemoryProfiles, MemoryStore>;

pub(super) fn build_service(
    profiles: Vec<UserProfile>,
) -> (Arc<MemoryService>, MemoryEntries, MemoryStore) {
    let entries = MemoryEntries::default();
    let store = MemoryStore::default();
    let service = Arc::new(SadhanaService::new(
        Arc::new(entries.clone()),
        Arc::new(MemoryProfiles::with_profiles(profiles)),
        Arc::new(store.clone()),
    ));
    (service, entries, store)
}

pub(super) fn nakula_profile() -> UserProfile {
    UserProfile::new(devotee()).with_batch("Nakula")
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("valid json body")
}
