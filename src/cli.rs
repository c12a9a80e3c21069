//! Command-line front-end.
//!
//! Each subcommand maps to one portal workflow; results are printed as
//! pretty JSON so they can be piped into other tools.

use clap::{Parser, Subcommand};
use serde::Serialize;
use serde_json::json;

use crate::api::ListQuery;
use crate::portal::{Portal, PriceFilter, RegistrationForm};

/// Energy trading portal client.
#[derive(Parser, Debug)]
#[command(name = "energy-portal", version, about)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Portal subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Sign in and store the session
    Login {
        /// Account name
        username: String,
        /// Password (or set PORTAL_PASSWORD)
        #[arg(long, env = "PORTAL_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Create an account
    Register {
        /// Account name
        #[arg(long)]
        username: String,
        /// Password (or set PORTAL_PASSWORD)
        #[arg(long, env = "PORTAL_PASSWORD", hide_env_values = true)]
        password: String,
        /// Password again
        #[arg(long)]
        confirm_password: String,
        /// Contact email
        #[arg(long)]
        email: String,
        /// Home region
        #[arg(long)]
        region: String,
        /// Trading product of interest (repeatable)
        #[arg(long = "product")]
        products: Vec<String>,
        /// Company name
        #[arg(long)]
        company: Option<String>,
    },

    /// List regions and trading products offered at registration
    Options,

    /// Forget the stored session
    Logout,

    /// Show the stored session
    Status,

    /// Upgrade to the paid tier
    Upgrade,

    /// Fetch the profile from the server
    Profile,

    /// Show or add user tags
    Tags {
        /// Tag to add (repeatable); lists tags when omitted
        #[arg(long = "add")]
        add: Vec<String>,
    },

    /// List system users
    SystemUsers,

    /// Dashboard overview counters
    Overview,

    /// Latest news
    News {
        /// Page size
        #[arg(long, default_value = "20")]
        limit: u32,
        /// Page number
        #[arg(long)]
        page: Option<u32>,
        /// News category
        #[arg(long)]
        category: Option<String>,
    },

    /// One news item
    NewsDetail {
        /// News item id
        id: String,
    },

    /// Price history
    Prices {
        /// Look-back window in days
        #[arg(long, default_value = "7")]
        days: u32,
        /// Trading product
        #[arg(long)]
        product: Option<String>,
        /// Region
        #[arg(long)]
        region: Option<String>,
    },

    /// Latest price per product and region
    LatestPrices,

    /// Recent deals
    Deals {
        /// Page size
        #[arg(long)]
        limit: Option<u32>,
        /// Look-back window in days
        #[arg(long)]
        days: Option<u32>,
        /// Trading product
        #[arg(long)]
        product: Option<String>,
    },

    /// Research reports
    Reports {
        /// Page size
        #[arg(long)]
        limit: Option<u32>,
        /// Report type
        #[arg(long)]
        report_type: Option<String>,
    },

    /// Energy indexes
    Indexes {
        /// Look-back window in days
        #[arg(long)]
        days: Option<u32>,
        /// Index name
        #[arg(long)]
        index_name: Option<String>,
    },

    /// Recommendations
    Recommend {
        /// Which feed
        #[command(subcommand)]
        kind: RecommendKind,
    },

    /// Record that the AI assistant was opened
    Assistant {
        /// Assistant flavor
        #[arg(long, default_value = "general")]
        assistant_type: String,
        /// Company shown to the assistant
        #[arg(long)]
        company: Option<String>,
    },

    /// Record an arbitrary behavior event
    Behavior {
        /// Event tag (view, search, click, ...)
        behavior_type: String,
        /// Details as a JSON object
        #[arg(long, default_value = "{}")]
        details: String,
    },
}

/// Recommendation feeds.
#[derive(Subcommand, Debug, Clone)]
pub enum RecommendKind {
    /// Based on tags, region and products
    Personalized,
    /// Based on recent browsing
    Guess,
    /// Most viewed news and largest deals
    Hot,
}

/// Result of CLI command execution.
pub struct CliResult {
    /// Exit code (0 = success)
    pub exit_code: i32,
    /// Output message
    pub message: String,
}

impl CliResult {
    /// Create a success result with the given message.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            message: message.into(),
        }
    }

    /// Create an error result with the given message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            exit_code: 1,
            message: message.into(),
        }
    }
}

fn render<T: Serialize, E: std::fmt::Display>(result: Result<T, E>) -> CliResult {
    match result {
        Ok(value) => match serde_json::to_string_pretty(&value) {
            Ok(text) => CliResult::success(text),
            Err(e) => CliResult::error(format!("Failed to format output: {}", e)),
        },
        Err(e) => CliResult::error(e.to_string()),
    }
}

/// Execute a portal CLI command.
pub async fn execute_command(command: Commands, portal: &Portal) -> CliResult {
    match command {
        Commands::Login { username, password } => {
            render(portal.login(&username, &password).await)
        }
        Commands::Register {
            username,
            password,
            confirm_password,
            email,
            region,
            products,
            company,
        } => {
            let form = RegistrationForm {
                username,
                password,
                confirm_password,
                email,
                region,
                trading_products: products,
                company_name: company,
            };
            match portal.register(&form).await {
                Ok(response) => CliResult::success(
                    response
                        .message
                        .unwrap_or_else(|| "Registration succeeded".to_string()),
                ),
                Err(e) => CliResult::error(e.to_string()),
            }
        }
        Commands::Options => render(portal.registration_options().await),
        Commands::Logout => match portal.logout().await {
            Ok(()) => CliResult::success("Logged out"),
            Err(e) => CliResult::error(e.to_string()),
        },
        Commands::Status => execute_status(portal),
        Commands::Upgrade => match portal.upgrade().await {
            Ok(Some(user)) => render::<_, String>(Ok(user)),
            Ok(None) => CliResult::success("Upgrade succeeded"),
            Err(e) => CliResult::error(e.to_string()),
        },
        Commands::Profile => render(portal.profile().await),
        Commands::Tags { add } => {
            if add.is_empty() {
                render(portal.tags().await)
            } else {
                match portal.add_tags(add).await {
                    Ok(()) => CliResult::success("Tags updated"),
                    Err(e) => CliResult::error(e.to_string()),
                }
            }
        }
        Commands::SystemUsers => render(portal.client().system_users().await),
        Commands::Overview => render(portal.overview().await),
        Commands::News {
            limit,
            page,
            category,
        } => {
            let mut query = ListQuery::new().with_limit(limit);
            if let Some(page) = page {
                query = query.with_page(page);
            }
            if let Some(category) = category {
                query = query.with_category(category);
            }
            render(portal.news_feed(&query).await)
        }
        Commands::NewsDetail { id } => render(portal.news_detail(&id).await),
        Commands::Prices {
            days,
            product,
            region,
        } => {
            let filter = PriceFilter {
                days,
                product_type: product,
                region,
            };
            render(portal.price_board(&filter).await)
        }
        Commands::LatestPrices => render(portal.latest_prices().await),
        Commands::Deals {
            limit,
            days,
            product,
        } => {
            let query = ListQuery {
                limit,
                days,
                product_type: product,
                ..ListQuery::default()
            };
            render(portal.deals(&query).await)
        }
        Commands::Reports { limit, report_type } => {
            let query = ListQuery {
                limit,
                report_type,
                ..ListQuery::default()
            };
            render(portal.reports(&query).await)
        }
        Commands::Indexes { days, index_name } => {
            let query = ListQuery {
                days,
                index_name,
                ..ListQuery::default()
            };
            render(portal.indexes(&query).await)
        }
        Commands::Recommend { kind } => match kind {
            RecommendKind::Personalized => render(portal.personalized().await),
            RecommendKind::Guess => render(portal.guess_you_like().await),
            RecommendKind::Hot => render(portal.hot_topics().await),
        },
        Commands::Assistant {
            assistant_type,
            company,
        } => {
            if !portal.session().is_logged_in() {
                return CliResult::success("Not logged in; nothing recorded");
            }
            portal.open_ai_assistant(&assistant_type, company.as_deref());
            CliResult::success("Assistant event queued")
        }
        Commands::Behavior {
            behavior_type,
            details,
        } => {
            let details: serde_json::Value = match serde_json::from_str(&details) {
                Ok(value @ serde_json::Value::Object(_)) => value,
                Ok(_) => return CliResult::error("--details must be a JSON object"),
                Err(e) => return CliResult::error(format!("Invalid --details JSON: {}", e)),
            };
            if !portal.session().is_logged_in() {
                return CliResult::success("Not logged in; nothing recorded");
            }
            portal.record(behavior_type, details);
            CliResult::success("Behavior event queued")
        }
    }
}

/// Execute status command.
fn execute_status(portal: &Portal) -> CliResult {
    let session = portal.session().session();
    let status = json!({
        "logged_in": session.is_logged_in(),
        "user": session.user_info,
        "behavior": portal.behavior().stats(),
    });
    render::<_, String>(Ok(status))
}
