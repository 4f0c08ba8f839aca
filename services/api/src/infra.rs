use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use sadhana::error::AppError;
use sadhana::scoring::criteria::BatchCriteria;
use sadhana::scoring::{
    ConfigurationStore, EntryRepository, ProfileRepository, RepositoryError, SadhanaEntry,
    SadhanaService, UserId, UserProfile,
};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

pub(crate) type ApiService =
    SadhanaService<InMemoryEntryRepository, InMemoryProfileRepository, InMemoryConfigurationStore>;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryEntryRepository {
    records: Arc<Mutex<HashMap<(UserId, NaiveDate), SadhanaEntry>>>,
}

impl EntryRepository for InMemoryEntryRepository {
    fn upsert(&self, entry: SadhanaEntry) -> Result<SadhanaEntry, RepositoryError> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("entry store poisoned".to_string()))?;
        guard.insert((entry.user_id.clone(), entry.date), entry.clone());
        Ok(entry)
    }

    fn fetch(
        &self,
        user_id: &UserId,
        date: NaiveDate,
    ) -> Result<Option<SadhanaEntry>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("entry store poisoned".to_string()))?;
        Ok(guard.get(&(user_id.clone(), date)).cloned())
    }

    fn range(
        &self,
        user_id: &UserId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<SadhanaEntry>, RepositoryError> {
        let guard = self
            .records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("entry store poisoned".to_string()))?;
        Ok(guard
            .values()
            .filter(|entry| &entry.user_id == user_id && entry.date >= start && entry.date <= end)
            .cloned()
            .collect())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryProfileRepository {
    profiles: Arc<Mutex<HashMap<UserId, UserProfile>>>,
}

impl InMemoryProfileRepository {
    pub(crate) fn with_profiles(profiles: Vec<UserProfile>) -> Self {
        let repository = Self::default();
        if let Ok(mut guard) = repository.profiles.lock() {
            guard.extend(
                profiles
                    .into_iter()
                    .map(|profile| (profile.user_id.clone(), profile)),
            );
        }
        repository
    }
}

impl ProfileRepository for InMemoryProfileRepository {
    fn profile(&self, user_id: &UserId) -> Result<Option<UserProfile>, RepositoryError> {
        let guard = self
            .profiles
            .lock()
            .map_err(|_| RepositoryError::Unavailable("profile store poisoned".to_string()))?;
        Ok(guard.get(user_id).cloned())
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryConfigurationStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl ConfigurationStore for InMemoryConfigurationStore {
    fn read(&self, key: &str) -> Result<Option<String>, RepositoryError> {
        let guard = self
            .values
            .lock()
            .map_err(|_| RepositoryError::Unavailable("settings store poisoned".to_string()))?;
        Ok(guard.get(key).cloned())
    }

    fn write(&self, key: &str, value: String) -> Result<(), RepositoryError> {
        let mut guard = self
            .values
            .lock()
            .map_err(|_| RepositoryError::Unavailable("settings store poisoned".to_string()))?;
        guard.insert(key.to_string(), value);
        Ok(())
    }
}

pub(crate) fn build_service(profiles: Vec<UserProfile>) -> ApiService {
    SadhanaService::new(
        Arc::new(InMemoryEntryRepository::default()),
        Arc::new(InMemoryProfileRepository::with_profiles(profiles)),
        Arc::new(InMemoryConfigurationStore::default()),
    )
}

/// Reads a JSON map of batch name to criteria.
pub(crate) fn load_criteria_file(path: &Path) -> Result<BTreeMap<String, BatchCriteria>, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Reads a JSON array of profiles.
pub(crate) fn load_profiles_file(path: &Path) -> Result<Vec<UserProfile>, AppError> {
    let raw = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&raw)?)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn temp_file(name: &str, contents: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("sadhana-api-{}-{name}", std::process::id()));
        let mut file = std::fs::File::create(&path).expect("temp file created");
        file.write_all(contents.as_bytes()).expect("temp file written");
        path
    }

    #[test]
    fn entry_repository_upserts_by_user_and_day() {
        let repository = InMemoryEntryRepository::default();
        let day = parse_date("2025-03-12").expect("valid date");
        let user = UserId::new("dev-1");

        let mut entry = SadhanaEntry::new(user.clone(), day);
        repository.upsert(entry.clone()).expect("insert");
        entry.reading_minutes = 40;
        repository.upsert(entry).expect("replace");

        let week = repository
            .range(&user, day, day)
            .expect("range query");
        assert_eq!(week.len(), 1);
        assert_eq!(week[0].reading_minutes, 40);
    }

    #[test]
    fn criteria_file_parses_into_override_map() {
        let path = temp_file(
            "criteria.json",
            r#"{"Nakula": {"name": "Nakula", "readingMinimum": 90}}"#,
        );
        let overrides = load_criteria_file(&path).expect("criteria file parses");
        std::fs::remove_file(&path).ok();

        assert_eq!(overrides["Nakula"].reading_minimum, 90);
    }

    #[test]
    fn profiles_file_must_be_json() {
        let path = temp_file("profiles.json", "user,batch\n");
        let result = load_profiles_file(&path);
        std::fs::remove_file(&path).ok();

        assert!(matches!(result, Err(AppError::Payload(_))));
    }

    #[test]
    fn parse_date_rejects_other_formats() {
        assert!(parse_date(" 2025-03-12 ").is_ok());
        assert!(parse_date("12/03/2025").is_err());
    }
}
