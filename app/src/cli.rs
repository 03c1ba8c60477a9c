use clap::{Args, Parser, Subcommand, ValueEnum};
use echomind_core::connectors::ConnectorType;
use echomind_core::google::{AuthMode, GoogleService};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "echomind", version, about = "Command-line client for the EchoMind API")]
pub struct Cli {
    /// Overrides ECHOMIND_API_URL and echomind.yaml.
    #[arg(long, global = true)]
    pub base_url: Option<String>,
    /// Overrides ECHOMIND_TOKEN and echomind.yaml.
    #[arg(long, global = true)]
    pub token: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Probe the EchoMind integration through the web backend.
    Health,
    #[command(subcommand)]
    Google(GoogleCommand),
    /// Upload a local file as a new document.
    Upload {
        path: PathBuf,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        connector_id: Option<i64>,
    },
    /// Abort an upload session that will not be completed.
    UploadAbort { upload_id: String },
    #[command(subcommand)]
    Documents(DocumentsCommand),
    #[command(subcommand)]
    Connectors(ConnectorsCommand),
    #[command(subcommand)]
    Assistants(AssistantsCommand),
    #[command(subcommand)]
    Llms(LlmsCommand),
    #[command(subcommand)]
    EmbeddingModels(EmbeddingModelsCommand),
    #[command(subcommand)]
    Users(UsersCommand),
    #[command(subcommand)]
    Teams(TeamsCommand),
    /// Run a batch evaluation over recent conversations.
    Evaluate {
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        min_messages: Option<u32>,
    },
    #[command(subcommand)]
    Projector(ProjectorCommand),
}

#[derive(Subcommand, Debug)]
pub enum GoogleCommand {
    /// Whether the server has Google OAuth credentials.
    Configured,
    Status,
    /// Print the consent URL for a service.
    Url {
        service: GoogleService,
        #[arg(long, value_enum, default_value_t = ModeArg::Popup)]
        mode: ModeArg,
    },
    Revoke,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum ModeArg {
    Popup,
    Redirect,
}

impl From<ModeArg> for AuthMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Popup => AuthMode::Popup,
            ModeArg::Redirect => AuthMode::Redirect,
        }
    }
}

#[derive(Args, Debug, Clone, Copy, Default)]
pub struct PageArgs {
    #[arg(long)]
    pub page: Option<u32>,
    #[arg(long)]
    pub page_size: Option<u32>,
}

#[derive(Subcommand, Debug)]
pub enum DocumentsCommand {
    List {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        connector_id: Option<i64>,
    },
    Get { id: i64 },
    Delete { id: i64 },
    Search {
        query: String,
        #[arg(long)]
        connector_id: Option<i64>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        min_score: Option<f32>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConnectorsCommand {
    List {
        #[command(flatten)]
        page: PageArgs,
        /// e.g. `google-drive`, `web`, `gmail`.
        #[arg(long = "type")]
        connector_type: Option<ConnectorType>,
    },
    Get { id: i64 },
    Delete { id: i64 },
    Sync { id: i64 },
    Status { id: i64 },
    /// Create a connector, checking Google authorization first.
    Create {
        name: String,
        #[arg(long = "type")]
        connector_type: ConnectorType,
        #[arg(long)]
        drive_id: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum AssistantsCommand {
    List {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long)]
        visible: Option<bool>,
    },
}

#[derive(Subcommand, Debug)]
pub enum LlmsCommand {
    List {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long)]
        active: Option<bool>,
    },
    Test { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum EmbeddingModelsCommand {
    List,
    Active,
    Activate { id: i64 },
}

#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    Me,
}

#[derive(Subcommand, Debug)]
pub enum TeamsCommand {
    List {
        #[command(flatten)]
        page: PageArgs,
        #[arg(long)]
        member_count: bool,
    },
    Mine,
}

#[derive(Subcommand, Debug)]
pub enum ProjectorCommand {
    Stats,
}
