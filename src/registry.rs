//! Image registry for a cloud profile
//!
//! Images are kept in insertion order. Their passwords live in a separate
//! map keyed by source name, matching how the profile stores them.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::models::{AzureCloudImageDetails, CloudImageDetails, CloudImagePasswordDetails};
use crate::{Error, Result};

/// Somewhere image passwords can be looked up by source name
#[cfg_attr(test, mockall::automock)]
pub trait PasswordSource {
    fn password_for(&self, source_name: &str) -> Option<String>;
}

/// Passwords keyed by image source name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordMap(HashMap<String, String>);

impl PasswordMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, source_name: impl Into<String>, password: impl Into<String>) {
        self.0.insert(source_name.into(), password.into());
    }

    pub fn remove(&mut self, source_name: &str) -> Option<String> {
        self.0.remove(source_name)
    }

    pub fn contains(&self, source_name: &str) -> bool {
        self.0.contains_key(source_name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl PasswordSource for PasswordMap {
    fn password_for(&self, source_name: &str) -> Option<String> {
        self.0.get(source_name).cloned()
    }
}

/// Set passwords on images from a password source.
///
/// Images without an entry keep whatever password they had. Returns the
/// number of images that received a password.
pub fn apply_passwords(images: &mut [AzureCloudImageDetails], source: &dyn PasswordSource) -> usize {
    let mut applied = 0;
    for image in images.iter_mut() {
        if let Some(password) = source.password_for(&image.source_name()) {
            image.set_password(Some(password));
            applied += 1;
        }
    }
    applied
}

#[derive(Default)]
struct RegistryState {
    images: Vec<AzureCloudImageDetails>,
    passwords: PasswordMap,
}

impl RegistryState {
    fn position(&self, source_name: &str) -> Option<usize> {
        self.images.iter().position(|i| i.source_name() == source_name)
    }

    fn with_password(&self, image: &AzureCloudImageDetails) -> AzureCloudImageDetails {
        let mut image = image.clone();
        image.set_password(self.passwords.password_for(&image.source_name()));
        image
    }
}

/// Thread-safe collection of the images configured for a profile
#[derive(Clone, Default)]
pub struct ImageRegistry {
    state: Arc<RwLock<RegistryState>>,
}

impl ImageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from an image list and a password map.
    ///
    /// Passwords already set on the images are moved into the map unless
    /// the map has an entry for that image.
    pub fn from_parts(images: Vec<AzureCloudImageDetails>, mut passwords: PasswordMap) -> Self {
        let images = images
            .into_iter()
            .map(|mut image| {
                let key = image.source_name();
                if let Some(password) = image.password() {
                    if !passwords.contains(&key) {
                        passwords.insert(key, password);
                    }
                }
                image.set_password(None);
                image
            })
            .collect();

        Self {
            state: Arc::new(RwLock::new(RegistryState { images, passwords })),
        }
    }

    /// Parse the serialized image list and password map.
    ///
    /// Blank input is treated as an empty list or map.
    pub fn from_json(images_data: &str, passwords_data: &str) -> Result<Self> {
        let images: Vec<AzureCloudImageDetails> = if images_data.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(images_data)?
        };
        let passwords: PasswordMap = if passwords_data.trim().is_empty() {
            PasswordMap::new()
        } else {
            serde_json::from_str(passwords_data)?
        };

        tracing::debug!(images = images.len(), passwords = passwords.len(), "Loaded image registry");
        Ok(Self::from_parts(images, passwords))
    }

    pub fn images_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.state.read().images)?)
    }

    pub fn passwords_json(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.state.read().passwords)?)
    }

    /// Add a new image, or replace `original` when given.
    ///
    /// Replacing drops the password stored for the original source name.
    /// The given password is stored under the new source name, `None`
    /// removes any entry. Returns the new source name.
    pub fn save(
        &self,
        original: Option<&str>,
        mut image: AzureCloudImageDetails,
        password: Option<String>,
    ) -> Result<String> {
        let source = image.source_name();
        image.set_password(None);

        let mut state = self.state.write();
        match original {
            Some(original) => {
                let index = state
                    .position(original)
                    .ok_or_else(|| Error::ImageNotFound(original.to_string()))?;
                if original != source && state.position(&source).is_some() {
                    return Err(Error::ImageAlreadyExists(source));
                }
                state.images[index] = image;
                state.passwords.remove(original);
                tracing::info!(image = %source, replaced = %original, "Image updated");
            }
            None => {
                if state.position(&source).is_some() {
                    return Err(Error::ImageAlreadyExists(source));
                }
                state.images.push(image);
                tracing::info!(image = %source, "Image added");
            }
        }

        match password {
            Some(password) => state.passwords.insert(source.clone(), password),
            None => {
                state.passwords.remove(&source);
            }
        }

        Ok(source)
    }

    /// Remove an image and its password
    pub fn delete(&self, source_name: &str) -> Result<AzureCloudImageDetails> {
        let mut state = self.state.write();
        let index = state
            .position(source_name)
            .ok_or_else(|| Error::ImageNotFound(source_name.to_string()))?;

        let mut image = state.images.remove(index);
        image.set_password(state.passwords.remove(source_name));
        tracing::info!(image = %source_name, "Image deleted");
        Ok(image)
    }

    /// Get an image with its password applied
    pub fn get(&self, source_name: &str) -> Option<AzureCloudImageDetails> {
        let state = self.state.read();
        state
            .position(source_name)
            .map(|index| state.with_password(&state.images[index]))
    }

    /// All images in insertion order, passwords applied
    pub fn list(&self) -> Vec<AzureCloudImageDetails> {
        let state = self.state.read();
        state.images.iter().map(|i| state.with_password(i)).collect()
    }

    pub fn set_password(&self, source_name: &str, password: Option<String>) -> Result<()> {
        let mut state = self.state.write();
        if state.position(source_name).is_none() {
            return Err(Error::ImageNotFound(source_name.to_string()));
        }

        match password {
            Some(password) => state.passwords.insert(source_name, password),
            None => {
                state.passwords.remove(source_name);
            }
        }
        tracing::debug!(image = %source_name, "Image password updated");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.state.read().images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.read().images.is_empty()
    }
}
