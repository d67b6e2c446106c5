//! Command-line surface for the Eve data provider.

use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use evebridge_provider::ProviderConfig;
use evebridge_types::{
    CreateParams, DeleteManyParams, DeleteParams, GetManyParams, GetOneParams, Identifier,
    ListParams, Operation, Pagination, Record, ReferenceParams, Sort, UpdateManyParams,
    UpdateParams,
};
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "evebridge")]
#[command(about = "Run data-access operations against an Eve REST API")]
pub struct Args {
    /// Base URL of the API. Overrides the config file.
    #[arg(long, env = "EVEBRIDGE_API_URL")]
    pub api_url: Option<String>,

    /// Path to a JSON provider config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose debug logging
    #[arg(short, long)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Paging, sorting and filtering shared by the listing commands.
#[derive(ClapArgs, Debug, Clone)]
pub struct ListingArgs {
    /// 1-based page number
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Page size
    #[arg(long, default_value_t = 25)]
    pub per_page: u32,

    /// Field to sort on
    #[arg(long, default_value = "_id")]
    pub sort: String,

    /// Sort descending
    #[arg(long)]
    pub desc: bool,

    /// Filter as a JSON object
    #[arg(long, default_value = "{}", value_parser = parse_record)]
    pub filter: Record,
}

impl ListingArgs {
    fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }

    fn sort(&self) -> Sort {
        if self.desc {
            Sort::descending(self.sort.clone())
        } else {
            Sort::ascending(self.sort.clone())
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List a page of records
    List {
        resource: String,
        #[command(flatten)]
        listing: ListingArgs,
    },
    /// Fetch one record
    Get {
        resource: String,
        #[arg(value_parser = parse_identifier)]
        id: Identifier,
    },
    /// Fetch several records by id
    GetMany {
        resource: String,
        #[arg(required = true, value_parser = parse_identifier)]
        ids: Vec<Identifier>,
    },
    /// List the records whose TARGET field references ID
    Reference {
        resource: String,
        #[arg(long)]
        target: String,
        #[arg(long, value_parser = parse_identifier)]
        id: Identifier,
        #[command(flatten)]
        listing: ListingArgs,
    },
    /// Create a record
    Create {
        resource: String,
        /// Record as a JSON object
        #[arg(long, value_parser = parse_record)]
        data: Record,
    },
    /// Replace a record
    Update {
        resource: String,
        #[arg(value_parser = parse_identifier)]
        id: Identifier,
        /// Record as a JSON object
        #[arg(long, value_parser = parse_record)]
        data: Record,
    },
    /// Apply the same partial update to several records
    UpdateMany {
        resource: String,
        #[arg(required = true, value_parser = parse_identifier)]
        ids: Vec<Identifier>,
        /// Fields to set, as a JSON object
        #[arg(long, value_parser = parse_record)]
        data: Record,
    },
    /// Delete a record
    Delete {
        resource: String,
        #[arg(value_parser = parse_identifier)]
        id: Identifier,
    },
    /// Delete several records
    DeleteMany {
        resource: String,
        #[arg(required = true, value_parser = parse_identifier)]
        ids: Vec<Identifier>,
    },
}

impl Command {
    /// Splits the command into the target resource and the operation to run.
    pub fn into_operation(self) -> (String, Operation) {
        match self {
            Command::List { resource, listing } => (
                resource,
                Operation::GetList(ListParams {
                    pagination: listing.pagination(),
                    sort: listing.sort(),
                    filter: listing.filter,
                }),
            ),
            Command::Get { resource, id } => (resource, Operation::GetOne(GetOneParams { id })),
            Command::GetMany { resource, ids } => {
                (resource, Operation::GetMany(GetManyParams { ids }))
            }
            Command::Reference {
                resource,
                target,
                id,
                listing,
            } => (
                resource,
                Operation::GetManyReference(ReferenceParams {
                    target,
                    id,
                    pagination: listing.pagination(),
                    sort: listing.sort(),
                    filter: listing.filter,
                }),
            ),
            Command::Create { resource, data } => {
                (resource, Operation::Create(CreateParams { data }))
            }
            Command::Update { resource, id, data } => (
                resource,
                Operation::Update(UpdateParams {
                    id,
                    data,
                    previous_data: None,
                }),
            ),
            Command::UpdateMany {
                resource,
                ids,
                data,
            } => (resource, Operation::UpdateMany(UpdateManyParams { ids, data })),
            Command::Delete { resource, id } => (
                resource,
                Operation::Delete(DeleteParams {
                    id,
                    previous_data: None,
                }),
            ),
            Command::DeleteMany { resource, ids } => {
                (resource, Operation::DeleteMany(DeleteManyParams { ids }))
            }
        }
    }
}

/// Builds the provider config: defaults, then the config file, then
/// `--api-url`.
pub fn load_config(args: &Args) -> Result<ProviderConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            ProviderConfig::from_json(&json)
                .with_context(|| format!("Failed to parse config file {}", path.display()))?
        }
        None => ProviderConfig::default(),
    };

    if let Some(api_url) = &args.api_url {
        config.api_url = api_url.clone();
    }
    Ok(config)
}

fn parse_record(s: &str) -> Result<Record, String> {
    serde_json::from_str(s).map_err(|e| format!("expected a JSON object: {e}"))
}

/// Integer-looking ids become numbers, everything else stays text.
fn parse_identifier(s: &str) -> Result<Identifier, String> {
    s.parse::<Identifier>().map_err(|e| match e {})
}
