//! Storage layer for gastrohealth.
//!
//! A single JSON document on disk, keyed by email. Every mutation reads the
//! whole document, changes one record and writes the whole document back.
//! Callers that share a [`Storage`] across tasks must serialize access; the
//! server keeps it behind a mutex.

pub mod record;

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::model::{SymptomLog, UserProfile};

pub use record::{Document, UserRecord};

/// Flat-file store of user records.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
}

impl Storage {
    /// Open or create a database at the given path.
    ///
    /// Creates the parent directories and an empty document if the file
    /// doesn't exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the directories or file cannot be created, or if
    /// an existing file is not a valid document.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let storage = Self { path };
        if storage.path.exists() {
            // Fail early on a corrupt file rather than on the first request.
            storage.read()?;
        } else {
            debug!("Creating empty database at {}", storage.path.display());
            storage.write(&Document::new())?;
        }

        info!("Database opened at {}", storage.path.display());
        Ok(storage)
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole document.
    ///
    /// A missing file reads as an empty document and is recreated.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn read(&self) -> Result<Document> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => serde_json::from_str(&text).map_err(|source| Error::StoreCorrupt {
                path: self.path.clone(),
                source,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let document = Document::new();
                self.write(&document)?;
                Ok(document)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Replace the whole document.
    ///
    /// Writes to a sibling temporary file first and renames it into place.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or any file operation fails.
    pub fn write(&self, document: &Document) -> Result<()> {
        let text = serde_json::to_string_pretty(document)?;
        let tmp = self.tmp_path();
        std::fs::write(&tmp, text)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Log a user in, registering the email on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read or written.
    pub fn login(&self, email: &str) -> Result<UserRecord> {
        let mut document = self.read()?;
        if let Some(record) = document.get(email) {
            debug!("Existing user logged in");
            return Ok(record.clone());
        }

        let record = UserRecord::default();
        document.insert(email.to_string(), record.clone());
        self.write(&document)?;
        info!("Registered new user");
        Ok(record)
    }

    /// Replace a user's profile.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UserNotFound`] for an unknown email, or an error if
    /// the document cannot be read or written.
    pub fn save_profile(&self, email: &str, profile: UserProfile) -> Result<UserProfile> {
        let mut document = self.read()?;
        let record = document
            .get_mut(email)
            .ok_or_else(|| Error::user_not_found(email))?;

        record.user_profile = Some(profile.clone());
        self.write(&document)?;
        debug!("Saved profile");
        Ok(profile)
    }

    /// Append a symptom to a user's journal and return the whole journal.
    ///
    /// An entry without an id gets one derived from its content. An entry
    /// whose id is already recorded is not appended again.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UserNotFound`] for an unknown email, or an error if
    /// the document cannot be read or written.
    pub fn append_symptom(&self, email: &str, mut symptom: SymptomLog) -> Result<Vec<SymptomLog>> {
        let mut document = self.read()?;
        let record = document
            .get_mut(email)
            .ok_or_else(|| Error::user_not_found(email))?;

        if symptom.id.trim().is_empty() {
            symptom.id = symptom.derive_id(email);
        }

        if record.contains_symptom(&symptom.id) {
            debug!("Skipping duplicate symptom with id {}", symptom.id);
            return Ok(record.symptoms.clone());
        }

        record.symptoms.push(symptom);
        let symptoms = record.symptoms.clone();
        self.write(&document)?;
        debug!("Appended symptom, journal now has {} entries", symptoms.len());
        Ok(symptoms)
    }

    /// Get a user's record.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read.
    pub fn get_user(&self, email: &str) -> Result<Option<UserRecord>> {
        Ok(self.read()?.remove(email))
    }

    /// List registered emails in sorted order.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be read.
    pub fn users(&self) -> Result<Vec<String>> {
        Ok(self.read()?.into_keys().collect())
    }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(std::ffi::OsStr::to_os_string)
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
