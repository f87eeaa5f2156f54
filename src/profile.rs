use anyhow::{Context, Result};
use log::warn;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DietType {
    Omnivorous,
    Vegetarian,
    Vegan,
    Pescatarian,
    Flexitarian,
}

/// How much time the user wants to spend cooking on a normal day.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TimePreference {
    Low,
    Medium,
    High,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BudgetTier {
    Budget,
    Standard,
    Premium,
}

/// The onboarding survey result. The suggestion prompt is built from this;
/// the two planning cores never read it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct UserProfile {
    pub name: String,
    pub household_size: u32,
    pub has_children: bool,
    pub diet_type: DietType,
    pub goals: Vec<String>,
    pub allergies: Vec<String>,
    pub cooking_time: TimePreference,
    pub budget: BudgetTier,
    pub is_onboarded: bool,
}

/// Single-value JSON store for the profile: read once at startup, written on
/// every change. An absent file means onboarding has not happened yet.
#[derive(Debug, Clone)]
pub struct ProfileStore {
    path: PathBuf,
}

impl ProfileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ProfileStore { path: path.into() }
    }

    /// `None` when no profile has been saved yet. A file that no longer
    /// parses is treated the same way, so the user re-onboards instead of
    /// the application failing to start.
    pub fn load(&self) -> Result<Option<UserProfile>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read profile file {:?}", self.path))?;
        match serde_json::from_str::<UserProfile>(&content) {
            Ok(profile) => Ok(Some(profile)),
            Err(e) => {
                warn!("profile file {:?} is unreadable ({}), ignoring it", self.path, e);
                Ok(None)
            }
        }
    }

    pub fn save(&self, profile: &UserProfile) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create profile directory {:?}", parent))?;
            }
        }
        let content = serde_json::to_string_pretty(profile)
            .context("Failed to serialize user profile")?;
        fs::write(&self.path, content)
            .with_context(|| format!("Failed to write profile file {:?}", self.path))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn sample_profile() -> UserProfile {
        UserProfile {
            name: "Alex".to_string(),
            household_size: 2,
            has_children: false,
            diet_type: DietType::Vegetarian,
            goals: vec!["eat more greens".to_string()],
            allergies: vec!["peanuts".to_string()],
            cooking_time: TimePreference::Medium,
            budget: BudgetTier::Standard,
            is_onboarded: true,
        }
    }

    #[test]
    fn test_load_missing_file_means_not_onboarded() {
        let dir = tempdir().unwrap();
        let store = ProfileStore::new(dir.path().join("profile.json"));
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = tempdir().unwrap();
        let store = ProfileStore::new(dir.path().join("profile.json"));
        let profile = sample_profile();

        store.save(&profile).unwrap();
        assert_eq!(store.load().unwrap(), Some(profile));
    }

    #[test]
    fn test_save_creates_parent_directories() {
        let dir = tempdir().unwrap();
        let store = ProfileStore::new(dir.path().join("nested/state/profile.json"));
        store.save(&sample_profile()).unwrap();
        assert!(store.load().unwrap().is_some());
    }

    #[test]
    fn test_corrupt_file_degrades_to_onboarding() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("profile.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = ProfileStore::new(path);
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn test_profile_serializes_enums_lowercase() {
        let json = serde_json::to_string(&sample_profile()).unwrap();
        assert!(json.contains("\"vegetarian\""));
        assert!(json.contains("\"medium\""));
        assert!(json.contains("\"standard\""));
    }
}
