use crate::cli::{
    AssistantsCommand, Cli, Command, ConnectorsCommand, DocumentsCommand, EmbeddingModelsCommand,
    GoogleCommand, LlmsCommand, PageArgs, ProjectorCommand, TeamsCommand, UsersCommand,
};
use crate::output::{print_json, progress_line};
use anyhow::{anyhow, Context, Result};
use echomind_core::assistants::ListAssistantsParams;
use echomind_core::connectors::ListConnectorsParams;
use echomind_core::documents::{DocumentSearch, ListDocumentsParams};
use echomind_core::evaluation::BatchEvaluationRequest;
use echomind_core::google::{PopupFeatures, PopupHandle, PopupLauncher};
use echomind_core::llms::ListLlmsParams;
use echomind_core::teams::ListTeamsParams;
use echomind_core::upload::{UploadCoordinator, UploadFile, UploadOptions};
use echomind_core::{
    ApiClient, ClientSettings, ConnectorDraft, ConnectorSetup, MessageBus, OAuthCoordinator,
    PageRequest, SetupError,
};
use std::sync::Arc;
use tracing::{debug, info};

/// There is no browser behind a terminal, so every popup counts as blocked.
struct TerminalLauncher;

impl PopupLauncher for TerminalLauncher {
    fn open(
        &self,
        url: &str,
        _target: &str,
        _features: &PopupFeatures,
    ) -> Option<Arc<dyn PopupHandle>> {
        info!(url, "cannot open a consent popup from the terminal");
        None
    }
}

impl From<PageArgs> for PageRequest {
    fn from(args: PageArgs) -> Self {
        PageRequest {
            page: args.page,
            page_size: args.page_size,
        }
    }
}

/// Flags win over environment and file settings.
pub fn resolve_settings(cli: &Cli) -> Result<ClientSettings> {
    let mut settings = ClientSettings::load().map_err(|err| anyhow!(err.user_message()))?;
    if let Some(base_url) = &cli.base_url {
        settings.base_url = base_url.trim_end_matches('/').to_string();
    }
    if let Some(token) = &cli.token {
        settings.token = Some(token.clone());
    }
    Ok(settings)
}

pub async fn run(cli: Cli) -> Result<()> {
    let settings = resolve_settings(&cli)?;
    debug!(base_url = %settings.base_url, "resolved EchoMind settings");
    let client = ApiClient::from_settings(&settings).map_err(|err| anyhow!(err.user_message()))?;

    // Everything except the public probes needs a caller identity.
    if !matches!(
        cli.command,
        Command::Health | Command::Google(GoogleCommand::Configured)
    ) {
        settings
            .require_token()
            .map_err(|err| anyhow!(err.user_message()))?;
    }

    match cli.command {
        Command::Health => print_json(&client.echomind_health().await?),
        Command::Google(command) => google(&client, command).await,
        Command::Upload {
            path,
            title,
            connector_id,
        } => {
            let file = UploadFile::from_path(&path)
                .await
                .with_context(|| format!("failed to read {}", path.display()))?;
            let options = UploadOptions {
                title,
                connector_id,
                ..UploadOptions::default()
            }
            .on_progress(progress_line);
            let document = UploadCoordinator::new(client)
                .upload_document(&file, options)
                .await?;
            print_json(&document)
        }
        Command::UploadAbort { upload_id } => {
            let response = UploadCoordinator::new(client).abort(&upload_id).await?;
            print_json(&response)
        }
        Command::Documents(command) => documents(&client, command).await,
        Command::Connectors(command) => connectors(&client, command).await,
        Command::Assistants(AssistantsCommand::List { page, visible }) => {
            let params = ListAssistantsParams {
                page: page.into(),
                is_visible: visible,
            };
            print_json(&client.list_assistants(&params).await?)
        }
        Command::Llms(LlmsCommand::List { page, active }) => {
            let params = ListLlmsParams {
                page: page.into(),
                is_active: active,
            };
            print_json(&client.list_llms(&params).await?)
        }
        Command::Llms(LlmsCommand::Test { id }) => print_json(&client.test_llm(id).await?),
        Command::EmbeddingModels(command) => match command {
            EmbeddingModelsCommand::List => print_json(&client.list_embedding_models().await?),
            EmbeddingModelsCommand::Active => print_json(&client.active_embedding_model().await?),
            EmbeddingModelsCommand::Activate { id } => {
                print_json(&client.activate_embedding_model(id).await?)
            }
        },
        Command::Users(UsersCommand::Me) => print_json(&client.current_user().await?),
        Command::Teams(TeamsCommand::List { page, member_count }) => {
            let params = ListTeamsParams {
                page: page.into(),
                include_member_count: member_count,
            };
            print_json(&client.list_teams(&params).await?)
        }
        Command::Teams(TeamsCommand::Mine) => print_json(&client.my_teams().await?),
        Command::Evaluate {
            limit,
            min_messages,
        } => {
            let request = BatchEvaluationRequest {
                limit,
                min_messages,
            };
            print_json(&client.run_batch_evaluation(&request).await?)
        }
        Command::Projector(ProjectorCommand::Stats) => print_json(&client.projector_stats().await?),
    }
}

async fn google(client: &ApiClient, command: GoogleCommand) -> Result<()> {
    match command {
        GoogleCommand::Configured => print_json(&client.check_google_oauth_configured().await),
        GoogleCommand::Status => print_json(&client.google_auth_status().await?),
        GoogleCommand::Url { service, mode } => {
            let auth = client.google_auth_url(service, mode.into()).await?;
            println!("{}", auth.url);
            Ok(())
        }
        GoogleCommand::Revoke => {
            client.revoke_google_auth().await?;
            println!("Google access revoked");
            Ok(())
        }
    }
}

async fn documents(client: &ApiClient, command: DocumentsCommand) -> Result<()> {
    match command {
        DocumentsCommand::List {
            page,
            limit,
            connector_id,
        } => {
            let params = ListDocumentsParams {
                page,
                limit,
                connector_id,
                doc_status: None,
            };
            print_json(&client.list_documents(&params).await?)
        }
        DocumentsCommand::Get { id } => print_json(&client.get_document(id).await?),
        DocumentsCommand::Delete { id } => {
            client.delete_document(id).await?;
            println!("Deleted document {id}");
            Ok(())
        }
        DocumentsCommand::Search {
            query,
            connector_id,
            limit,
            min_score,
        } => {
            let search = DocumentSearch {
                query,
                connector_id,
                limit,
                min_score,
            };
            print_json(&client.search_documents(&search).await?)
        }
    }
}

async fn connectors(client: &ApiClient, command: ConnectorsCommand) -> Result<()> {
    match command {
        ConnectorsCommand::List {
            page,
            connector_type,
        } => {
            let params = ListConnectorsParams {
                page: page.into(),
                connector_type,
                status: None,
            };
            print_json(&client.list_connectors(&params).await?)
        }
        ConnectorsCommand::Get { id } => print_json(&client.get_connector(id).await?),
        ConnectorsCommand::Delete { id } => {
            client.delete_connector(id).await?;
            println!("Deleted connector {id}");
            Ok(())
        }
        ConnectorsCommand::Sync { id } => print_json(&client.trigger_connector_sync(id).await?),
        ConnectorsCommand::Status { id } => print_json(&client.connector_status(id).await?),
        ConnectorsCommand::Create {
            name,
            connector_type,
            drive_id,
        } => {
            let oauth = OAuthCoordinator::new(
                client.clone(),
                Arc::new(TerminalLauncher),
                MessageBus::new(),
            );
            let setup = ConnectorSetup::new(client.clone(), oauth);
            let draft = ConnectorDraft {
                name,
                connector_type,
                drive_id,
            };
            match setup.submit(&draft).await {
                Ok(connector) => print_json(&connector),
                Err(SetupError::GoogleNotAuthorized(service)) => Err(anyhow!(
                    "Google {service} is not authorized. Open the URL from \
                     `echomind google url {service}` in a browser, then retry."
                )),
                Err(err) => Err(err.into()),
            }
        }
    }
}
