use std::path::PathBuf;

use campusfix_client::{view::IssueFilter, Backend, BackendInfo, Client, Draft};
use campusfix_files::UploadFile;
use campusfix_models::v0::{DataEditIssueStatus, IssueStatus, LoginProvider, SortBy, User};
use campusfix_result::Result;
use clap::{Parser, Subcommand};

mod render;

#[derive(Parser)]
#[command(name = "campusfix")]
#[command(about = "Report and triage campus maintenance issues", long_about = None)]
#[command(version)]
struct Cli {
    /// API to talk to (defaults to `hosts.api` from the configuration)
    #[arg(long, global = true)]
    api: Option<String>,

    /// Use an in-memory backend instead of the API
    #[arg(long, global = true, conflicts_with = "api")]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List issues
    List {
        /// Order issues by `priority` or `newest`
        #[arg(short, long)]
        sort: Option<SortBy>,

        /// Only show issues in this category
        #[arg(short, long)]
        category: Option<String>,

        /// Only show issues with this status
        #[arg(long)]
        status: Option<IssueStatus>,
    },

    /// Report a new issue
    Submit {
        /// Where the issue is
        #[arg(short, long)]
        location: String,

        /// What is wrong
        #[arg(short, long)]
        description: String,

        /// Short title
        #[arg(short, long, default_value = "")]
        summary: String,

        /// Photo of the issue
        #[arg(short, long, value_name = "FILE")]
        photo: Option<PathBuf>,
    },

    /// Upvote an issue
    Upvote { id: i64 },

    /// Change the status of an issue
    Status {
        id: i64,

        /// `New`, `Open`, `In Progress` or `Resolved`
        status: IssueStatus,

        /// URL of a photo taken after the fix
        #[arg(long, value_name = "URL")]
        resolution_image: Option<String>,
    },

    /// Show aggregate counts
    Analytics,

    /// Show where issues are located
    Heatmap,

    /// Show the signed in user
    Me,

    /// Print the URL to open in a browser to sign in
    LoginUrl {
        /// `google` or `github`
        #[arg(default_value = "google")]
        provider: LoginProvider,
    },

    /// End the current session
    Logout,

    /// Anonymous safety reports
    #[command(subcommand)]
    Safety(SafetyCommands),
}

#[derive(Subcommand)]
enum SafetyCommands {
    /// File a safety report
    Report {
        #[arg(short, long)]
        location: String,

        #[arg(short, long)]
        description: String,

        /// Photo or video of the incident
        #[arg(short, long, value_name = "FILE")]
        media: Option<PathBuf>,
    },

    /// List every report (administrators only)
    List,

    /// Show the community feed
    Community,
}

impl Cli {
    fn backend_info(&self) -> BackendInfo {
        if self.offline {
            BackendInfo::Reference
        } else if let Some(base_url) = &self.api {
            BackendInfo::Rest {
                base_url: base_url.clone(),
            }
        } else {
            BackendInfo::Auto
        }
    }

    /// Connect, signing in a local administrator when offline
    async fn connect(&self) -> Result<Client> {
        let backend = self.backend_info().connect().await?;
        if let Backend::Reference(reference) = &backend {
            reference
                .sign_in(
                    User {
                        sub: "offline".to_string(),
                        name: "Offline".to_string(),
                        email: None,
                        picture: None,
                    },
                    true,
                )
                .await;
        }

        Ok(Client::from_backend(backend).await)
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Configure logging and environment
    campusfix_config::configure!(client);
    campusfix_config::init().await;

    match run(cli).await {
        Ok(output) => print!("{output}"),
        Err(error) => {
            log::error!("{error}");
            eprintln!("error: {}", error.error_type);
            std::process::exit(1);
        }
    }
}

/// Run a command and return what it prints
async fn run(cli: Cli) -> Result<String> {
    let client = cli.connect().await?;

    let output = match cli.command {
        Commands::List {
            sort,
            category,
            status,
        } => {
            if let Some(sort) = sort {
                client.issues().set_sort(sort);
            }

            client.issues().refresh().await?;
            render::issues(&client.dashboard.visible(&IssueFilter { category, status }))
        }
        Commands::Submit {
            location,
            description,
            summary,
            photo,
        } => {
            let mut draft = Draft::new(summary, location, description);
            if let Some(path) = photo {
                draft.select(UploadFile::from_path(path).await?);
            }

            render::issue(&client.submitter.submit(&mut draft).await?)
        }
        Commands::Upvote { id } => {
            let response = client.issues().upvote(id).await?;
            format!("Issue #{id} now has {} upvotes\n", response.upvotes)
        }
        Commands::Status {
            id,
            status,
            resolution_image,
        } => {
            client.issues().refresh().await?;
            client
                .issues()
                .edit_status(
                    id,
                    DataEditIssueStatus {
                        status,
                        resolution_image_url: resolution_image,
                    },
                )
                .await?;

            match client.issues().get(id) {
                Some(issue) => render::issue(&issue),
                None => format!("Issue #{id} is now {status}\n"),
            }
        }
        Commands::Analytics => {
            client.dashboard.analytics.refresh().await?;
            render::analytics(&client.dashboard.analytics.snapshot())
        }
        Commands::Heatmap => client
            .dashboard
            .heatmap()
            .await?
            .into_iter()
            .map(|point| {
                format!(
                    "#{:<5} {:<9} {}\n",
                    point.id,
                    point.severity.as_str(),
                    point.location
                )
            })
            .collect(),
        Commands::Me => match client.session.load().await {
            Some(user) => {
                let admin = client.session.is_admin().await.unwrap_or_default();
                format!(
                    "{}{}\n",
                    render::user(&user),
                    if admin { " (admin)" } else { "" }
                )
            }
            None => "Not signed in\n".to_string(),
        },
        Commands::LoginUrl { provider } => format!("{}\n", client.session.login_url(provider)),
        Commands::Logout => {
            client.session.logout().await?;
            "Signed out\n".to_string()
        }
        Commands::Safety(SafetyCommands::Report {
            location,
            description,
            media,
        }) => {
            let media = match media {
                Some(path) => Some(UploadFile::from_path(path).await?),
                None => None,
            };

            let report = client.safety.report(&description, &location, media).await?;
            render::safety_reports(&[report])
        }
        Commands::Safety(SafetyCommands::List) => {
            render::safety_reports(&client.safety.reports().await?)
        }
        Commands::Safety(SafetyCommands::Community) => {
            render::safety_reports(&client.safety.community().await?)
        }
    };

    Ok(output)
}
