//! Azure ARM cloud images
//!
//! Configuration for the Azure ARM images of a build agent cloud profile.
//! Each image points at a VHD blob in a storage account and describes the
//! VMs cloned from it: resource group, size, name prefix, instance limit
//! and the administrator account.
//!
//! # Example
//!
//! ```
//! use azure_arm_images::models::{
//!     AzureCloudImageDetails, CloneBehaviour, CloudImageDetails, CloudImagePasswordDetails,
//! };
//! use azure_arm_images::ImageRegistry;
//!
//! let image = AzureCloudImageDetails::builder()
//!     .group_id("rg1")
//!     .storage_id("acct1")
//!     .image_path("images/base.vhd")
//!     .vm_prefix("agent-")
//!     .vm_size("Standard_D2")
//!     .max_instances(5)
//!     .username("admin")
//!     .password("secret")
//!     .build_validated()?;
//!
//! assert_eq!(image.source_name(), "https://acct1.blob.core.windows.net/images/base.vhd");
//! assert_eq!(image.behaviour(), CloneBehaviour::FreshClone);
//!
//! let registry = ImageRegistry::new();
//! let password = image.password().map(str::to_string);
//! registry.save(None, image, password)?;
//! # Ok::<(), azure_arm_images::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod models;
pub mod registry;
pub mod store;

pub use config::{validate_image, validate_password, ArmCredentials, ImageDetailsBuilder};
pub use error::{Error, Result};
pub use models::{AzureCloudImageDetails, CloneBehaviour, CloudImageDetails, CloudImagePasswordDetails};
pub use registry::{apply_passwords, ImageRegistry, PasswordMap, PasswordSource};
pub use store::ImageStore;
