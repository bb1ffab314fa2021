//! Document shapes persisted in the flat-file database.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::model::{SymptomLog, UserProfile};

/// Everything stored for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    /// Survey answers, absent until onboarding is completed.
    #[serde(default)]
    pub user_profile: Option<UserProfile>,
    /// Symptom journal in insertion order.
    #[serde(default)]
    pub symptoms: Vec<SymptomLog>,
}

impl UserRecord {
    /// Whether the user has completed onboarding.
    #[must_use]
    pub fn has_profile(&self) -> bool {
        self.user_profile.is_some()
    }

    /// Whether a symptom with this id is already recorded.
    #[must_use]
    pub fn contains_symptom(&self, id: &str) -> bool {
        self.symptoms.iter().any(|s| s.id == id)
    }
}

/// The whole database: one record per email.
pub type Document = BTreeMap<String, UserRecord>;
