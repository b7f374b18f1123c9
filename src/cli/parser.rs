use crate::core::certificate::CertificateType;
use crate::core::export::ExportFormat;
use crate::models::Collection;
use crate::models::audio::AudioCategory;
use crate::models::person::Role;
use crate::models::schedule::ScheduleKind;
use crate::models::social::SocialNetwork;
use clap::{Args, Parser, Subcommand, ValueEnum};

/// Command-line interface definition for rchurch
/// Church administration console over a local document store
#[derive(Parser, Debug)]
#[command(
    name = "rchurch",
    version = env!("CARGO_PKG_VERSION"),
    about = "Church administration CLI: members, schedules, news, certificates and push notifications",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    /// National ID to authenticate with for this command
    #[arg(global = true, long = "user", env = "RCHURCH_USER")]
    pub user: Option<String>,

    /// Secret for --user (prompted when missing)
    #[arg(global = true, long = "pass", env = "RCHURCH_PASS", hide_env_values = true)]
    pub pass: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing fields with their defaults")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(long = "editor", help = "Specify the editor to use (vim, nano, or custom path)")]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,

        #[arg(long = "op", help = "Only operations starting with this prefix")]
        operation: Option<String>,

        #[arg(long = "last", help = "Only the last N rows")]
        last: Option<usize>,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long)]
        compress: bool,

        #[arg(long, short = 'y', help = "Overwrite without asking")]
        yes: bool,
    },

    /// Export the member directory
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Import a JSON array of documents into a collection
    Import {
        #[arg(long, value_enum)]
        collection: Collection,

        #[arg(long, value_name = "FILE")]
        file: String,
    },

    /// Check credentials and start a session
    Login {
        /// National ID (cédula)
        national_id: String,
    },

    /// End the current session
    Logout,

    /// Show the current session
    Whoami,

    /// Interactive shell keeping one session and one cache open
    Shell,

    /// Members (Personas)
    Person {
        #[command(subcommand)]
        action: PersonCmd,
    },

    /// Weekly activities and worship services
    Schedule {
        #[command(subcommand)]
        action: ScheduleCmd,
    },

    /// One-time activities
    Event {
        #[command(subcommand)]
        action: EventCmd,
    },

    /// News items
    News {
        #[command(subcommand)]
        action: NewsCmd,
    },

    /// Audio resources
    Audio {
        #[command(subcommand)]
        action: AudioCmd,
    },

    /// Social network links
    Social {
        #[command(subcommand)]
        action: SocialCmd,
    },

    /// Church contacts
    Contact {
        #[command(subcommand)]
        action: ContactCmd,
    },

    /// Daily devotional messages
    Devotional {
        #[command(subcommand)]
        action: DevotionalCmd,
    },

    /// Push notifications
    Push {
        #[command(subcommand)]
        action: PushCmd,
    },

    /// QR certificates
    Cert {
        #[command(subcommand)]
        action: CertCmd,
    },
}

/// Member fields shared by `person add` and `person edit`.
#[derive(Args, Debug, Default, Clone)]
pub struct PersonFields {
    #[arg(long = "first-names")]
    pub first_names: Option<String>,
    #[arg(long = "last-names")]
    pub last_names: Option<String>,
    #[arg(long = "id", help = "National ID (cédula)")]
    pub national_id: Option<String>,
    #[arg(long = "birth-date", help = "YYYY-MM-DD")]
    pub birth_date: Option<String>,
    #[arg(long)]
    pub sex: Option<String>,
    #[arg(long = "marital-status")]
    pub marital_status: Option<String>,
    #[arg(long)]
    pub spouse: Option<String>,
    #[arg(long)]
    pub country: Option<String>,
    #[arg(long)]
    pub city: Option<String>,
    #[arg(long)]
    pub address: Option<String>,
    #[arg(long)]
    pub phone: Option<String>,
    #[arg(long)]
    pub mobile: Option<String>,
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long = "church-role", help = "Position in the church (Cargo)")]
    pub church_role: Option<String>,
    #[arg(long = "water-baptized")]
    pub water_baptized: Option<bool>,
    #[arg(long = "baptism-date", help = "YYYY-MM-DD")]
    pub baptism_date: Option<String>,
    #[arg(long = "officiant")]
    pub officiant: Option<String>,
    #[arg(long = "baptism-church")]
    pub baptism_church: Option<String>,
    #[arg(long = "spirit-baptized")]
    pub spirit_baptized: Option<bool>,
    #[arg(long = "church-married")]
    pub church_married: Option<bool>,
    #[arg(long = "marriage-date", help = "YYYY-MM-DD")]
    pub marriage_date: Option<String>,
    #[arg(long = "marriage-church")]
    pub marriage_church: Option<String>,
    #[arg(long, value_enum)]
    pub role: Option<Role>,
    #[arg(long = "password", help = "Login secret (stored hashed)")]
    pub password: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum PersonCmd {
    /// Register a member
    Add {
        #[command(flatten)]
        fields: PersonFields,

        #[arg(long = "no-welcome", help = "Do not queue the welcome mail")]
        no_welcome: bool,
    },
    /// List members
    List {
        #[arg(long, value_enum)]
        role: Option<Role>,
        #[arg(long, help = "Match names or ID")]
        search: Option<String>,
    },
    /// Show one member (by national ID or document id)
    Show { key: String },
    /// Change member fields
    Edit {
        key: String,
        #[command(flatten)]
        fields: PersonFields,
    },
    /// Replace or remove the member photo
    Photo {
        key: String,
        #[arg(long, value_name = "FILE", conflicts_with = "remove")]
        set: Option<String>,
        #[arg(long)]
        remove: bool,
    },
    /// Delete a member
    Del {
        key: String,
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OrderArg {
    /// Sunday to Saturday
    Fixed,
    /// Starting today
    Today,
}

#[derive(Subcommand, Debug)]
pub enum ScheduleCmd {
    /// Add a weekly slot
    Add {
        #[arg(long, value_enum, default_value = "activity")]
        kind: ScheduleKind,
        #[arg(long, help = "0-6 (Sunday=0) or a day name")]
        day: String,
        #[arg(long)]
        subject: String,
        #[arg(long, help = "HH:MM")]
        start: String,
        #[arg(long, help = "HH:MM")]
        end: String,
        #[arg(long, help = "#RRGGBB")]
        color: Option<String>,
    },
    /// Show the week
    List {
        #[arg(long, value_enum, default_value = "activity")]
        kind: ScheduleKind,
        #[arg(long, value_enum)]
        order: Option<OrderArg>,
    },
    /// Delete a slot
    Del {
        #[arg(long, value_enum, default_value = "activity")]
        kind: ScheduleKind,
        id: String,
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum EventCmd {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        place: String,
        #[arg(long, help = "YYYY-MM-DD")]
        start: String,
        #[arg(long, help = "YYYY-MM-DD (defaults to start)")]
        end: Option<String>,
    },
    List {
        #[arg(long, help = "Hide events that already started")]
        upcoming: bool,
    },
    Del {
        id: String,
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum NewsCmd {
    Add {
        #[arg(long)]
        title: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, help = "YYYY-MM-DD (defaults to today)")]
        date: Option<String>,
        #[arg(long, value_name = "FILE")]
        photo: Option<String>,
    },
    List,
    Del {
        id: String,
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum AudioCmd {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
        #[arg(long, value_enum)]
        category: AudioCategory,
        #[arg(long)]
        url: String,
    },
    List {
        #[arg(long, value_enum)]
        category: Option<AudioCategory>,
    },
    Del {
        id: String,
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum SocialCmd {
    Add {
        #[arg(long, value_enum)]
        network: SocialNetwork,
        #[arg(long)]
        name: String,
        #[arg(long, help = "URL or handle")]
        link: String,
    },
    List,
    Del {
        id: String,
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ContactCmd {
    Add {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        role: String,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    List,
    Del {
        id: String,
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Lang {
    Es,
    En,
}

#[derive(Subcommand, Debug)]
pub enum DevotionalCmd {
    Add {
        #[arg(long)]
        title: String,
        #[arg(long = "ref-es")]
        reference_es: String,
        #[arg(long = "ref-en", default_value = "")]
        reference_en: String,
        #[arg(long = "text-es")]
        text_es: String,
        #[arg(long = "text-en", default_value = "")]
        text_en: String,
        #[arg(long)]
        day: u32,
        #[arg(long)]
        month: u32,
    },
    /// Today's message
    Today {
        #[arg(long, value_enum, default_value = "es")]
        lang: Lang,
        #[arg(long, help = "Look up another date (YYYY-MM-DD)")]
        date: Option<String>,
    },
    List,
    Del {
        id: String,
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum PushCmd {
    /// Register a device token
    Register { token: String },
    /// Remove a device token
    Unregister { token: String },
    /// List registered tokens
    List,
    /// Send a notification to every registered device
    Send {
        #[arg(long)]
        title: String,
        #[arg(long)]
        body: String,
        #[arg(long, help = "Build the batches without contacting the gateway")]
        dry_run: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum CertCmd {
    /// Print the QR payload for a member
    Issue {
        key: String,
        #[arg(long = "type", value_enum, default_value = "carnet")]
        kind: CertificateType,
    },
    /// Validate one scanned payload
    Verify { payload: String },
    /// Validate payloads read line by line from stdin
    Scan,
}
