use clap::{Args, Parser, Subcommand, ValueEnum};

pub mod add;
pub mod dashboard;
pub mod delete;
pub mod display;
pub mod duplicate;
pub mod edit;
pub mod export;
pub mod fields;
pub mod history;
pub mod import;
pub mod insights;
pub mod list;
pub mod lookup;
pub mod settings;
pub mod show;
pub mod ui;

pub use add::{run_add, run_register};
pub use dashboard::run_dashboard;
pub use delete::run_delete;
pub use duplicate::run_duplicate;
pub use edit::run_edit;
pub use export::run_export;
pub use history::run_history;
pub use import::run_import;
pub use insights::run_insights;
pub use list::run_list;
pub use lookup::run_lookup;
pub use settings::run_config;
pub use show::run_show;

#[derive(Parser)]
#[command(name = "partnerhub")]
#[command(about = "Partner relationship management for the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List partners, optionally filtered
    List(ListArgs),
    /// Show full details for a partner
    Show(ShowArgs),
    /// Add a new partner (interactive when no fields are given)
    Add(AddArgs),
    /// Public registration form: account owner is preset
    Register(AddArgs),
    /// Change fields of an existing partner
    Edit(EditArgs),
    /// Copy a partner under a new ID
    Duplicate(ShowArgs),
    /// Delete a partner
    Delete(DeleteArgs),
    /// Log or review interactions with a partner
    History(HistoryArgs),
    /// Statistics, upcoming follow-ups and known contacts
    Dashboard,
    /// Write a CSV or HTML report
    Export(ExportArgs),
    /// Import records exported from the browser dashboard
    Import(ImportArgs),
    /// Query the registry, postal-code or geocoding services
    Lookup(LookupArgs),
    /// AI-generated strategic summary of the partner network
    Insights,
    /// Show or change settings
    Config(ConfigArgs),
}

/// Filter criteria shared by `list` and `export`.
#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// Match name or document number
    #[arg(short, long)]
    pub search: Option<String>,
    /// active or inactive
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long, value_name = "PERCENT")]
    pub min_commission: Option<f64>,
    #[arg(long, value_name = "PERCENT")]
    pub max_commission: Option<f64>,
    /// Registered on or after (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub from: Option<String>,
    /// Registered on or before (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub to: Option<String>,
    /// Partnership contact contains
    #[arg(long, value_name = "NAME")]
    pub partner_contact: Option<String>,
    /// Account owner contains
    #[arg(long, value_name = "NAME")]
    pub owner: Option<String>,
}

#[derive(Args)]
pub struct ListArgs {
    #[command(flatten)]
    pub filter: FilterArgs,
    /// Print JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Partner name, UUID or UUID prefix
    pub identifier: String,
}

/// Every editable field of a partner record.
#[derive(Args, Debug, Default, Clone)]
pub struct CompanyFields {
    #[arg(short, long)]
    pub name: Option<String>,
    /// cnpj, cpf or license
    #[arg(long, value_name = "KIND")]
    pub doc_type: Option<String>,
    /// CNPJ, CPF or license number
    #[arg(short, long)]
    pub document: Option<String>,
    /// License region code (UF)
    #[arg(long, value_name = "UF")]
    pub license_region: Option<String>,
    #[arg(long, value_name = "CEP")]
    pub postal_code: Option<String>,
    #[arg(long)]
    pub street: Option<String>,
    #[arg(long)]
    pub number: Option<String>,
    #[arg(long)]
    pub complement: Option<String>,
    #[arg(long)]
    pub neighborhood: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    /// Address region code (UF)
    #[arg(long, value_name = "UF")]
    pub region: Option<String>,
    #[arg(long, allow_hyphen_values = true)]
    pub lat: Option<f64>,
    #[arg(long, allow_hyphen_values = true)]
    pub lng: Option<f64>,
    #[arg(long)]
    pub responsible: Option<String>,
    #[arg(long, value_name = "NAME")]
    pub partner_contact: Option<String>,
    /// Internal account owner
    #[arg(long, value_name = "NAME")]
    pub owner: Option<String>,
    #[arg(short, long)]
    pub website: Option<String>,
    #[arg(short, long)]
    pub email: Option<String>,
    #[arg(short, long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub brokers: Option<u32>,
    /// Commission percentage
    #[arg(long, value_name = "PERCENT")]
    pub commission: Option<f64>,
    /// active or inactive
    #[arg(long)]
    pub status: Option<String>,
    #[arg(long, value_name = "DATE")]
    pub last_contact: Option<String>,
    /// phone, chat, email, meeting or video
    #[arg(long, value_name = "CHANNEL")]
    pub last_channel: Option<String>,
    #[arg(long)]
    pub contact_summary: Option<String>,
    /// Follow-up date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub next_contact: Option<String>,
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Args)]
pub struct AddArgs {
    #[command(flatten)]
    pub fields: CompanyFields,
    /// Fill name and address from the CNPJ registry
    #[arg(long)]
    pub lookup: bool,
}

#[derive(Args)]
pub struct EditArgs {
    /// Partner name, UUID or UUID prefix
    pub identifier: String,
    #[command(flatten)]
    pub fields: CompanyFields,
    /// Clear an optional field (repeatable)
    #[arg(long, value_name = "FIELD")]
    pub clear: Vec<String>,
}

#[derive(Args)]
pub struct DeleteArgs {
    /// Partner name, UUID or UUID prefix
    pub identifier: String,
    /// Skip confirmation
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args)]
pub struct HistoryArgs {
    #[command(subcommand)]
    pub command: HistoryCommand,
}

#[derive(Subcommand)]
pub enum HistoryCommand {
    /// Log an interaction
    Add {
        /// Partner name, UUID or UUID prefix
        identifier: String,
        /// What was discussed
        #[arg(short, long)]
        summary: Option<String>,
        /// phone, chat, email, meeting or video
        #[arg(short, long, default_value = "phone")]
        channel: String,
        /// Interaction date (default: today)
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
        /// Follow-up date (YYYY-MM-DD)
        #[arg(short, long)]
        follow_up: Option<String>,
    },
    /// List logged interactions, newest first
    List {
        /// Partner name, UUID or UUID prefix
        identifier: String,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    /// Coordinates of every partner, for map tools
    Csv,
    /// Summary table as CSV
    Summary,
    /// Standalone HTML report
    Html,
}

#[derive(Args)]
pub struct ExportArgs {
    pub format: ExportFormat,
    /// Output file (default: timestamped name in the current directory, `-` for stdout)
    #[arg(short, long)]
    pub output: Option<String>,
    #[command(flatten)]
    pub filter: FilterArgs,
}

#[derive(Args)]
pub struct ImportArgs {
    /// JSON file exported from the browser dashboard
    pub path: String,
    /// Show what would be imported without saving
    #[arg(short = 'n', long)]
    pub dry_run: bool,
    /// Replace the current collection instead of appending
    #[arg(long)]
    pub replace: bool,
}

#[derive(Args)]
pub struct LookupArgs {
    #[command(subcommand)]
    pub command: LookupCommand,
}

#[derive(Subcommand)]
pub enum LookupCommand {
    /// Company data for a CNPJ
    Cnpj { number: String },
    /// Address for a postal code
    Cep { code: String },
    /// Coordinates for a free-text address
    Geo {
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,
    },
}

#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: Option<ConfigCommand>,
}

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show every setting and where its value comes from
    Show,
    /// Store a setting (blank value removes it)
    Set { key: String, value: String },
    /// Remove every stored setting
    Clear,
}
