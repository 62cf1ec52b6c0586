use boiler_inspection::config::StoreBackend;
use boiler_inspection::workflows::inspection::{
    newest_first, Inspection, InspectionId, InspectionPatch, InspectionRecord,
    InspectionRepository, RepositoryError,
};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryInspectionRepository {
    records: Arc<Mutex<HashMap<InspectionId, Inspection>>>,
}

impl InMemoryInspectionRepository {
    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, HashMap<InspectionId, Inspection>>, RepositoryError>
    {
        self.records
            .lock()
            .map_err(|_| RepositoryError::Unavailable("repository mutex poisoned".to_string()))
    }
}

impl InspectionRepository for InMemoryInspectionRepository {
    fn list(&self) -> Result<Vec<Inspection>, RepositoryError> {
        let guard = self.lock()?;
        let mut inspections: Vec<Inspection> = guard.values().cloned().collect();
        inspections.sort_by(newest_first);
        Ok(inspections)
    }

    fn fetch(&self, id: &InspectionId) -> Result<Option<Inspection>, RepositoryError> {
        Ok(self.lock()?.get(id).cloned())
    }

    fn save(&self, inspection: Inspection) -> Result<Inspection, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.contains_key(inspection.id()) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(inspection.id().clone(), inspection.clone());
        Ok(inspection)
    }

    fn update(
        &self,
        id: &InspectionId,
        patch: &InspectionPatch,
    ) -> Result<Inspection, RepositoryError> {
        let mut guard = self.lock()?;
        let current = guard.get(id).ok_or(RepositoryError::NotFound)?;
        let updated = current.with_patch(patch);
        guard.insert(id.clone(), updated.clone());
        Ok(updated)
    }

    fn replace(&self, inspection: Inspection) -> Result<Inspection, RepositoryError> {
        let mut guard = self.lock()?;
        if !guard.contains_key(inspection.id()) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(inspection.id().clone(), inspection.clone());
        Ok(inspection)
    }

    fn delete(&self, id: &InspectionId) -> Result<(), RepositoryError> {
        match self.lock()?.remove(id) {
            Some(_) => Ok(()),
            None => Err(RepositoryError::NotFound),
        }
    }
}

/// One JSON array of persisted records, newest first. Every write replaces
/// the file through a sibling temp file and a rename so readers never see a
/// partial array.
pub(crate) struct JsonFileInspectionRepository {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileInspectionRepository {
    pub(crate) fn open(path: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let repository = Self {
            path: path.into(),
            lock: Mutex::new(()),
        };
        let existing = repository.read_all()?;
        debug!(path = %repository.path.display(), records = existing.len(), "opened inspection store");
        Ok(repository)
    }

    fn read_all(&self) -> Result<Vec<Inspection>, RepositoryError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(unavailable(&self.path, err)),
        };
        if raw.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        let records: Vec<InspectionRecord> =
            serde_json::from_slice(&raw).map_err(|err| unavailable(&self.path, err))?;
        let legacy = records.iter().filter(|record| record.is_legacy()).count();
        if legacy > 0 {
            warn!(path = %self.path.display(), legacy, "upgrading legacy inspection records");
        }

        let mut inspections: Vec<Inspection> = records.into_iter().map(Inspection::from).collect();
        inspections.sort_by(newest_first);
        Ok(inspections)
    }

    fn write_all(&self, inspections: &mut Vec<Inspection>) -> Result<(), RepositoryError> {
        inspections.sort_by(newest_first);
        let records: Vec<InspectionRecord> =
            inspections.iter().map(InspectionRecord::from).collect();
        let payload =
            serde_json::to_vec_pretty(&records).map_err(|err| unavailable(&self.path, err))?;

        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| unavailable(&self.path, err))?;
        }
        let staging = self.staging_path();
        let mut file = fs::File::create(&staging).map_err(|err| unavailable(&staging, err))?;
        file.write_all(&payload)
            .and_then(|()| file.sync_all())
            .map_err(|err| unavailable(&staging, err))?;
        fs::rename(&staging, &self.path).map_err(|err| unavailable(&self.path, err))
    }

    fn staging_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn transaction<T>(
        &self,
        apply: impl FnOnce(&mut Vec<Inspection>) -> Result<T, RepositoryError>,
    ) -> Result<T, RepositoryError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))?;
        let mut inspections = self.read_all()?;
        let outcome = apply(&mut inspections)?;
        self.write_all(&mut inspections)?;
        Ok(outcome)
    }
}

impl InspectionRepository for JsonFileInspectionRepository {
    fn list(&self) -> Result<Vec<Inspection>, RepositoryError> {
        let _guard = self
            .lock
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))?;
        self.read_all()
    }

    fn fetch(&self, id: &InspectionId) -> Result<Option<Inspection>, RepositoryError> {
        Ok(self
            .list()?
            .into_iter()
            .find(|inspection| inspection.id() == id))
    }

    fn save(&self, inspection: Inspection) -> Result<Inspection, RepositoryError> {
        self.transaction(|inspections| {
            if inspections.iter().any(|existing| existing.id() == inspection.id()) {
                return Err(RepositoryError::Conflict);
            }
            inspections.push(inspection.clone());
            Ok(inspection)
        })
    }

    fn update(
        &self,
        id: &InspectionId,
        patch: &InspectionPatch,
    ) -> Result<Inspection, RepositoryError> {
        self.transaction(|inspections| {
            let slot = inspections
                .iter_mut()
                .find(|inspection| inspection.id() == id)
                .ok_or(RepositoryError::NotFound)?;
            *slot = slot.with_patch(patch);
            Ok(slot.clone())
        })
    }

    fn replace(&self, inspection: Inspection) -> Result<Inspection, RepositoryError> {
        self.transaction(|inspections| {
            let slot = inspections
                .iter_mut()
                .find(|existing| existing.id() == inspection.id())
                .ok_or(RepositoryError::NotFound)?;
            *slot = inspection.clone();
            Ok(inspection)
        })
    }

    fn delete(&self, id: &InspectionId) -> Result<(), RepositoryError> {
        self.transaction(|inspections| {
            let before = inspections.len();
            inspections.retain(|inspection| inspection.id() != id);
            if inspections.len() == before {
                Err(RepositoryError::NotFound)
            } else {
                Ok(())
            }
        })
    }
}

/// Store chosen at startup from `INSPECTION_STORE_PATH`.
pub(crate) enum InspectionStore {
    Memory(InMemoryInspectionRepository),
    JsonFile(JsonFileInspectionRepository),
}

impl InspectionStore {
    pub(crate) fn open(backend: &StoreBackend) -> Result<Self, RepositoryError> {
        match backend {
            StoreBackend::Memory => Ok(Self::Memory(InMemoryInspectionRepository::default())),
            StoreBackend::JsonFile(path) => {
                JsonFileInspectionRepository::open(path.clone()).map(Self::JsonFile)
            }
        }
    }

    pub(crate) fn describe(&self) -> &'static str {
        match self {
            Self::Memory(_) => "memory",
            Self::JsonFile(_) => "json-file",
        }
    }

    fn backend(&self) -> &dyn InspectionRepository {
        match self {
            Self::Memory(repository) => repository,
            Self::JsonFile(repository) => repository,
        }
    }
}

impl InspectionRepository for InspectionStore {
    fn list(&self) -> Result<Vec<Inspection>, RepositoryError> {
        self.backend().list()
    }

    fn fetch(&self, id: &InspectionId) -> Result<Option<Inspection>, RepositoryError> {
        self.backend().fetch(id)
    }

    fn save(&self, inspection: Inspection) -> Result<Inspection, RepositoryError> {
        self.backend().save(inspection)
    }

    fn update(
        &self,
        id: &InspectionId,
        patch: &InspectionPatch,
    ) -> Result<Inspection, RepositoryError> {
        self.backend().update(id, patch)
    }

    fn replace(&self, inspection: Inspection) -> Result<Inspection, RepositoryError> {
        self.backend().replace(inspection)
    }

    fn delete(&self, id: &InspectionId) -> Result<(), RepositoryError> {
        self.backend().delete(id)
    }
}

fn unavailable(path: &Path, err: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::Unavailable(format!("{}: {err}", path.display()))
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}

/// Accepts RFC 3339 timestamps or plain dates (midnight UTC).
pub(crate) fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, String> {
    let trimmed = raw.trim();
    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(timestamp.with_timezone(&Utc));
    }
    parse_date(trimmed)
        .map(|date| Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN)))
        .map_err(|_| format!("failed to parse '{raw}' as an RFC 3339 timestamp or YYYY-MM-DD"))
}
