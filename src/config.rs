//! Image configuration with builder pattern and profile validation

use serde::{Deserialize, Serialize};

use crate::models::{serialized_key, AzureCloudImageDetails, CloudImagePasswordDetails};
use crate::{Error, Result};

/// Instance limit used when none is given
pub const DEFAULT_MAX_INSTANCES: u32 = 1;

/// Check an image the way the profile editor does before saving it
pub fn validate_image(image: &AzureCloudImageDetails) -> Result<()> {
    let required = [
        ("group_id", image.group_id()),
        ("storage_id", image.storage_id()),
        ("image_path", image.image_path()),
        ("vm_prefix", image.vm_prefix()),
        ("vm_size", image.vm_size()),
        ("username", image.username()),
    ];

    for (field, value) in required {
        if value.trim().is_empty() {
            let key = serialized_key(field).unwrap_or(field);
            return Err(Error::validation(key, "cannot be empty"));
        }
    }

    if image.max_instances() < 1 {
        return Err(Error::validation("maxInstances", "must be at least 1"));
    }

    Ok(())
}

/// Passwords are required; blank ones count as missing
pub fn validate_password(password: Option<&str>) -> Result<()> {
    match password {
        Some(p) if !p.trim().is_empty() => Ok(()),
        _ => Err(Error::validation("vmPassword", "is required")),
    }
}

#[derive(Debug, Clone)]
pub struct ImageDetailsBuilder {
    group_id: String,
    storage_id: String,
    image_path: String,
    vm_prefix: String,
    vm_size: String,
    max_instances: u32,
    username: String,
    password: Option<String>,
}

impl Default for ImageDetailsBuilder {
    fn default() -> Self {
        Self {
            group_id: String::new(),
            storage_id: String::new(),
            image_path: String::new(),
            vm_prefix: String::new(),
            vm_size: String::new(),
            max_instances: DEFAULT_MAX_INSTANCES,
            username: String::new(),
            password: None,
        }
    }
}

impl AzureCloudImageDetails {
    pub fn builder() -> ImageDetailsBuilder {
        ImageDetailsBuilder::default()
    }
}

impl ImageDetailsBuilder {
    pub fn group_id(mut self, id: impl Into<String>) -> Self {
        self.group_id = id.into();
        self
    }

    pub fn storage_id(mut self, id: impl Into<String>) -> Self {
        self.storage_id = id.into();
        self
    }

    pub fn image_path(mut self, path: impl Into<String>) -> Self {
        self.image_path = path.into();
        self
    }

    pub fn vm_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.vm_prefix = prefix.into();
        self
    }

    pub fn vm_size(mut self, size: impl Into<String>) -> Self {
        self.vm_size = size.into();
        self
    }

    pub fn max_instances(mut self, n: u32) -> Self {
        self.max_instances = n;
        self
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }

    pub fn build(self) -> AzureCloudImageDetails {
        let mut image = AzureCloudImageDetails::new(
            self.group_id,
            self.storage_id,
            self.image_path,
            self.vm_prefix,
            self.vm_size,
            self.max_instances,
            self.username,
        );
        image.set_password(self.password);
        image
    }

    pub fn build_validated(self) -> Result<AzureCloudImageDetails> {
        let image = self.build();
        validate_image(&image)?;
        validate_password(image.password())?;
        Ok(image)
    }
}

/// Service principal used by the cloud profile to reach Azure
#[derive(Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArmCredentials {
    pub tenant_id: String,
    pub client_id: String,
    pub client_secret: String,
    pub subscription_id: String,
}

impl ArmCredentials {
    pub fn new(
        tenant_id: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        subscription_id: impl Into<String>,
    ) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            subscription_id: subscription_id.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let required = [
            ("tenantId", &self.tenant_id),
            ("clientId", &self.client_id),
            ("clientSecret", &self.client_secret),
            ("subscriptionId", &self.subscription_id),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(Error::validation(key, "is required"));
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for ArmCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArmCredentials")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .field("subscription_id", &self.subscription_id)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CloudImageDetails;

    fn valid_builder() -> ImageDetailsBuilder {
        AzureCloudImageDetails::builder()
            .group_id("rg1")
            .storage_id("acct1")
            .image_path("images/base.vhd")
            .vm_prefix("agent-")
            .vm_size("Standard_D2")
            .username("admin")
            .password("secret")
    }

    #[test]
    fn test_builder_defaults() {
        let image = AzureCloudImageDetails::builder()
            .storage_id("acct1")
            .image_path("images/base.vhd")
            .build();
        assert_eq!(image.max_instances(), DEFAULT_MAX_INSTANCES);
        assert!(image.password().is_none());
        assert_eq!(
            image.source_name(),
            "https://acct1.blob.core.windows.net/images/base.vhd"
        );
    }

    #[test]
    fn test_builder_password() {
        let image = valid_builder().max_instances(3).build();
        assert_eq!(image.password(), Some("secret"));
        assert_eq!(image.max_instances(), 3);
    }

    #[test]
    fn test_validation() {
        assert!(valid_builder().build_validated().is_ok());

        let err = valid_builder().vm_size("").build_validated().unwrap_err();
        match err {
            Error::Validation { field, .. } => assert_eq!(field, "vmSize"),
            other => panic!("unexpected error: {other}"),
        }

        let err = valid_builder().username("  ").build_validated().unwrap_err();
        assert!(err.to_string().contains("vmUsername"));

        let err = valid_builder().max_instances(0).build_validated().unwrap_err();
        assert!(err.to_string().contains("maxInstances"));

        let err = valid_builder().password("").build_validated().unwrap_err();
        assert!(err.to_string().contains("vmPassword"));
    }

    #[test]
    fn test_build_validated_requires_password() {
        let no_password = AzureCloudImageDetails::builder()
            .group_id("rg1")
            .storage_id("acct1")
            .image_path("images/base.vhd")
            .vm_prefix("agent-")
            .vm_size("Standard_D2")
            .username("admin");
        let err = no_password.clone().build_validated().unwrap_err();
        match err {
            Error::Validation { field, .. } => assert_eq!(field, "vmPassword"),
            other => panic!("unexpected error: {other}"),
        }

        let err = no_password.password("   ").build_validated().unwrap_err();
        assert!(err.to_string().contains("vmPassword"));
    }

    #[test]
    fn test_build_skips_validation() {
        let image = AzureCloudImageDetails::builder().max_instances(0).build();
        assert!(validate_image(&image).is_err());
        assert_eq!(image.source_name(), "https://.blob.core.windows.net/");
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password(Some("x")).is_ok());
        assert!(validate_password(Some("")).is_err());
        assert!(validate_password(Some(" \t ")).is_err());
        assert!(validate_password(Some(" padded ")).is_ok());
        assert!(validate_password(None).is_err());
    }

    #[test]
    fn test_credentials() {
        let creds = ArmCredentials::new("tenant", "client", "s3cr3t-value", "sub");
        assert!(creds.validate().is_ok());

        let debug = format!("{:?}", creds);
        assert!(!debug.contains("s3cr3t-value"));
        assert!(debug.contains("***"));

        let json = serde_json::to_value(&creds).unwrap();
        assert_eq!(json["subscriptionId"], "sub");

        let mut missing = creds.clone();
        missing.client_secret = String::new();
        assert!(missing.validate().unwrap_err().to_string().contains("clientSecret"));
    }
}
