//! Image model - a source VHD and the VMs provisioned from it

use serde::{Deserialize, Serialize};

use super::CloneBehaviour;

/// Rust field name to serialized profile key
pub const SERIALIZED_KEYS: &[(&str, &str)] = &[
    ("group_id", "groupId"),
    ("storage_id", "storageId"),
    ("image_path", "imagePath"),
    ("max_instances", "maxInstances"),
    ("vm_size", "vmSize"),
    ("vm_prefix", "vmNamePrefix"),
    ("username", "vmUsername"),
];

/// Look up the serialized key of a field
pub fn serialized_key(field: &str) -> Option<&'static str> {
    SERIALIZED_KEYS
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, key)| *key)
}

/// Details shared by every cloud image kind
pub trait CloudImageDetails {
    /// Location of the image the instances are cloned from
    fn source_name(&self) -> String;

    fn behaviour(&self) -> CloneBehaviour;
}

/// Cloud image that provisions an administrator account
pub trait CloudImagePasswordDetails: CloudImageDetails {
    fn username(&self) -> &str;

    fn password(&self) -> Option<&str>;

    /// Replace the password; `None` clears it
    fn set_password(&mut self, password: Option<String>);
}

/// Azure ARM cloud image details
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AzureCloudImageDetails {
    /// Resource group owning the image
    #[serde(rename = "groupId")]
    group_id: String,
    /// Storage account name
    #[serde(rename = "storageId")]
    storage_id: String,
    /// Blob path of the VHD inside the storage account
    #[serde(rename = "imagePath")]
    image_path: String,
    #[serde(rename = "maxInstances")]
    max_instances: u32,
    #[serde(rename = "vmSize")]
    vm_size: String,
    #[serde(rename = "vmNamePrefix")]
    vm_prefix: String,
    #[serde(rename = "vmUsername")]
    username: String,
    /// Kept out of the image list, passwords are stored by source name
    #[serde(skip)]
    password: Option<String>,
}

impl AzureCloudImageDetails {
    pub fn new(
        group_id: impl Into<String>,
        storage_id: impl Into<String>,
        image_path: impl Into<String>,
        vm_name_prefix: impl Into<String>,
        vm_size: impl Into<String>,
        max_instances: u32,
        username: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            storage_id: storage_id.into(),
            image_path: image_path.into(),
            max_instances,
            vm_size: vm_size.into(),
            vm_prefix: vm_name_prefix.into(),
            username: username.into(),
            password: None,
        }
    }

    pub fn group_id(&self) -> &str {
        &self.group_id
    }

    pub fn storage_id(&self) -> &str {
        &self.storage_id
    }

    pub fn image_path(&self) -> &str {
        &self.image_path
    }

    pub fn vm_prefix(&self) -> &str {
        &self.vm_prefix
    }

    pub fn vm_size(&self) -> &str {
        &self.vm_size
    }

    pub fn max_instances(&self) -> u32 {
        self.max_instances
    }
}

/// Blob URL of a VHD in a storage account, no escaping applied
pub fn source_name(storage_id: &str, image_path: &str) -> String {
    format!("https://{}.blob.core.windows.net/{}", storage_id, image_path)
}

impl CloudImageDetails for AzureCloudImageDetails {
    fn source_name(&self) -> String {
        source_name(&self.storage_id, &self.image_path)
    }

    fn behaviour(&self) -> CloneBehaviour {
        CloneBehaviour::FreshClone
    }
}

impl CloudImagePasswordDetails for AzureCloudImageDetails {
    fn username(&self) -> &str {
        &self.username
    }

    fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    fn set_password(&mut self, password: Option<String>) {
        self.password = password;
    }
}

impl std::fmt::Debug for AzureCloudImageDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureCloudImageDetails")
            .field("group_id", &self.group_id)
            .field("storage_id", &self.storage_id)
            .field("image_path", &self.image_path)
            .field("max_instances", &self.max_instances)
            .field("vm_size", &self.vm_size)
            .field("vm_prefix", &self.vm_prefix)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}
