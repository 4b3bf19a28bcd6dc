//! azure-arm-images CLI - manage the Azure ARM images of a cloud profile

use std::path::PathBuf;

use azure_arm_images::models::source_name;
use azure_arm_images::{
    validate_image, validate_password, AzureCloudImageDetails, CloudImageDetails,
    CloudImagePasswordDetails, ImageStore,
};
use clap::{Args, Parser, Subcommand};
use tabled::{Table, Tabled};

#[derive(Parser)]
#[command(name = "azure-arm-images")]
#[command(about = "Manage Azure ARM cloud images for build agents")]
#[command(version)]
struct Cli {
    /// Directory holding images.json and passwords.json
    #[arg(long, global = true, default_value = ".")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List configured images
    List,
    /// Add an image
    Add {
        #[command(flatten)]
        image: ImageArgs,
    },
    /// Replace an image, moving its password to the new source name
    Edit {
        /// Source name of the image to replace
        source_name: String,
        #[command(flatten)]
        image: ImageArgs,
    },
    /// Set or clear the password of an image
    SetPassword {
        source_name: String,
        /// New password, omit to clear
        #[arg(long)]
        password: Option<String>,
    },
    /// Remove an image by source name
    Remove {
        source_name: String,
    },
    /// Check all images
    Validate,
    /// Print the blob URL for a storage account and VHD path
    SourceName {
        #[arg(long)]
        storage: String,
        #[arg(long)]
        path: String,
    },
}

#[derive(Args)]
struct ImageArgs {
    /// Resource group
    #[arg(long)]
    group: String,
    /// Storage account
    #[arg(long)]
    storage: String,
    /// VHD path inside the storage account
    #[arg(long)]
    path: String,
    /// VM name prefix
    #[arg(long)]
    prefix: String,
    /// VM size
    #[arg(long)]
    size: String,
    /// Maximum number of instances
    #[arg(long, default_value = "1")]
    max_instances: u32,
    /// Administrator username
    #[arg(long)]
    username: String,
    /// Administrator password
    #[arg(long)]
    password: String,
}

impl ImageArgs {
    fn into_image(self) -> azure_arm_images::Result<AzureCloudImageDetails> {
        AzureCloudImageDetails::builder()
            .group_id(self.group)
            .storage_id(self.storage)
            .image_path(self.path)
            .vm_prefix(self.prefix)
            .vm_size(self.size)
            .max_instances(self.max_instances)
            .username(self.username)
            .password(self.password)
            .build_validated()
    }
}

#[derive(Tabled)]
struct ImageRow {
    #[tabled(rename = "Source")]
    source: String,
    #[tabled(rename = "Group")]
    group: String,
    #[tabled(rename = "Size")]
    size: String,
    #[tabled(rename = "Prefix")]
    prefix: String,
    #[tabled(rename = "Max")]
    max_instances: u32,
    #[tabled(rename = "User")]
    username: String,
    #[tabled(rename = "Password")]
    password: String,
}

impl From<&AzureCloudImageDetails> for ImageRow {
    fn from(image: &AzureCloudImageDetails) -> Self {
        Self {
            source: image.source_name(),
            group: image.group_id().to_string(),
            size: image.vm_size().to_string(),
            prefix: image.vm_prefix().to_string(),
            max_instances: image.max_instances(),
            username: image.username().to_string(),
            password: if image.password().is_some() { "Yes" } else { "No" }.to_string(),
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("azure_arm_images=info".parse()?),
        )
        .init();

    let cli = Cli::parse();
    let store = ImageStore::in_dir(&cli.data_dir);

    match cli.command {
        Commands::List => {
            let images = store.load()?.list();
            if images.is_empty() {
                println!("No images configured.");
                return Ok(());
            }
            let rows: Vec<ImageRow> = images.iter().map(ImageRow::from).collect();
            println!("{}", Table::new(rows));
        }
        Commands::Add { image } => {
            let image = image.into_image()?;
            let password = image.password().map(str::to_string);

            let registry = store.load()?;
            let source = registry.save(None, image, password)?;
            store.save(&registry)?;
            println!("Image added: {}", source);
        }
        Commands::Edit { source_name, image } => {
            let image = image.into_image()?;
            let password = image.password().map(str::to_string);

            let registry = store.load()?;
            let source = registry.save(Some(&source_name), image, password)?;
            store.save(&registry)?;
            println!("Image updated: {}", source);
        }
        Commands::SetPassword { source_name, password } => {
            if password.is_some() {
                validate_password(password.as_deref())?;
            }
            let cleared = password.is_none();

            let registry = store.load()?;
            registry.set_password(&source_name, password)?;
            store.save(&registry)?;
            if cleared {
                println!("Password cleared: {}", source_name);
            } else {
                println!("Password set: {}", source_name);
            }
        }
        Commands::Remove { source_name } => {
            let registry = store.load()?;
            registry.delete(&source_name)?;
            store.save(&registry)?;
            println!("Image removed: {}", source_name);
        }
        Commands::Validate => {
            let images = store.load()?.list();
            let mut failures = 0;
            for image in &images {
                let checked = validate_image(image).and_then(|_| validate_password(image.password()));
                if let Err(e) = checked {
                    failures += 1;
                    println!("{}: {}", image.source_name(), e);
                }
            }
            if failures > 0 {
                println!("{} of {} images invalid.", failures, images.len());
                std::process::exit(1);
            }
            println!("All {} images valid.", images.len());
        }
        Commands::SourceName { storage, path } => {
            println!("{}", source_name(&storage, &path));
        }
    }

    Ok(())
}
