use serde::{de::DeserializeOwned, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::StorageConfig;
use crate::models::{Event, User, UserBooking};

pub type Users = BTreeMap<String, User>;
pub type Events = BTreeMap<String, Event>;
pub type BookingHistory = BTreeMap<String, Vec<UserBooking>>;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("malformed document {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Flat JSON documents, each read and written whole.
#[derive(Debug, Clone)]
pub struct Storage {
    users: PathBuf,
    events: PathBuf,
    bookings: PathBuf,
    data_dir: PathBuf,
}

impl Storage {
    pub fn new(config: &StorageConfig) -> Self {
        Storage {
            users: config.data_dir.join(&config.users_file),
            events: config.data_dir.join(&config.events_file),
            bookings: config.data_dir.join(&config.bookings_file),
            data_dir: config.data_dir.clone(),
        }
    }

    /// Creates the data directory if it does not exist yet.
    pub fn init(&self) -> Result<(), StorageError> {
        fs::create_dir_all(&self.data_dir).map_err(|source| StorageError::Io {
            path: self.data_dir.clone(),
            source,
        })?;
        info!("Data directory ready at {}", self.data_dir.display());
        Ok(())
    }

    pub fn load_users(&self) -> Result<Users, StorageError> {
        load(&self.users)
    }

    pub fn save_users(&self, users: &Users) -> Result<(), StorageError> {
        save(&self.users, users)
    }

    pub fn load_events(&self) -> Result<Events, StorageError> {
        load(&self.events)
    }

    pub fn save_events(&self, events: &Events) -> Result<(), StorageError> {
        save(&self.events, events)
    }

    pub fn load_bookings(&self) -> Result<BookingHistory, StorageError> {
        load(&self.bookings)
    }

    pub fn save_bookings(&self, bookings: &BookingHistory) -> Result<(), StorageError> {
        save(&self.bookings, bookings)
    }
}

// A missing document is an empty one
fn load<T: DeserializeOwned + Default>(path: &Path) -> Result<T, StorageError> {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!("{} not found, starting empty", path.display());
            return Ok(T::default());
        }
        Err(source) => {
            return Err(StorageError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    serde_json::from_str(&raw).map_err(|source| StorageError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn save<T: Serialize>(path: &Path, value: &T) -> Result<(), StorageError> {
    let json = serde_json::to_string_pretty(value).map_err(|source| StorageError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    fs::write(path, json).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Saved {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::allocation::EntityAllocation;
    use crate::config::Config;
    use crate::models::Role;

    fn storage(dir: &Path) -> Storage {
        let storage = Storage::new(&Config::with_data_dir(dir).storage);
        storage.init().unwrap();
        storage
    }

    #[test]
    fn missing_documents_load_empty() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(dir.path());

        assert!(storage.load_users().unwrap().is_empty());
        assert!(storage.load_events().unwrap().is_empty());
        assert!(storage.load_bookings().unwrap().is_empty());
    }

    #[test]
    fn documents_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(dir.path());

        let mut users = Users::new();
        users.insert("bob".into(), User::new("bob", "Bob", "pw", Role::Vendor));
        storage.save_users(&users).unwrap();
        assert_eq!(storage.load_users().unwrap(), users);

        let mut events = Events::new();
        events.insert(
            "E1".into(),
            Event {
                event_id: "E1".into(),
                name: "Spring Carnival".into(),
                date: "2025-04-01".into(),
                location: "Main Square".into(),
                description: String::new(),
                allocation: EntityAllocation::new(20.0, 2, 2, 1).unwrap(),
            },
        );
        storage.save_events(&events).unwrap();
        assert_eq!(storage.load_events().unwrap(), events);
    }

    #[test]
    fn corrupt_document_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(dir.path());
        fs::write(dir.path().join("events.json"), "{ not json").unwrap();

        let err = storage.load_events().unwrap_err();
        assert!(matches!(err, StorageError::Json { .. }));
        assert!(err.to_string().contains("events.json"));
    }

    #[test]
    fn init_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        storage(&nested);
        assert!(nested.is_dir());
    }
}
