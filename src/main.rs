use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use showroom::app::{App, AppMode};
use showroom::client::CatalogClient;
use showroom::config::Config;
use showroom::logging;
use showroom::rest::{self, ApiDoc, ApiState};

#[derive(Parser)]
#[command(name = "showroom")]
#[command(about = "Furniture catalog API, terminal browser and quote requests")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file path
    #[arg(short, long)]
    config: Option<String>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the catalog REST API server
    Serve {
        /// Port to listen on (default: 7010)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Browse the catalog in the terminal
    Browse {
        /// Open this category directly
        #[arg(long)]
        category: Option<i64>,
    },

    /// Fill in a quote request and print the chat link
    Quote,

    /// Manage the homepage featured products
    Featured {
        #[command(subcommand)]
        action: FeaturedAction,
    },

    /// Write the effective configuration to ./showroom.toml
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the OpenAPI document
    Openapi {
        /// Output YAML instead of JSON
        #[arg(long)]
        yaml: bool,
    },
}

#[derive(Subcommand)]
enum FeaturedAction {
    /// List the featured products in display order
    List,
    /// Replace the featured set; order is display order
    Set {
        /// Product ids
        #[arg(required = true, num_args = 1..)]
        ids: Vec<i64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (needed for logging setup)
    let config = Config::load(cli.config.as_deref())?;

    let is_tui_mode = matches!(cli.command, Commands::Browse { .. } | Commands::Quote);

    // Initialize logging (file-based for TUI, stderr for CLI)
    let logging_handle = logging::init_logging(&config, is_tui_mode, cli.debug)?;

    match cli.command {
        Commands::Serve { port } => cmd_serve(config, port).await?,
        Commands::Browse { category } => {
            run_tui(config, AppMode::Browse { category }, logging_handle.log_file_path).await?;
        }
        Commands::Quote => {
            run_tui(config, AppMode::QuoteOnly, logging_handle.log_file_path).await?;
        }
        Commands::Featured { action } => cmd_featured(&config, action).await?,
        Commands::Init { force } => cmd_init(&config, force)?,
        Commands::Openapi { yaml } => cmd_openapi(yaml)?,
    }

    Ok(())
}

async fn run_tui(config: Config, mode: AppMode, log_file_path: Option<PathBuf>) -> Result<()> {
    let app = App::new(config, mode)?;
    let result = app.run().await;

    if let Some(log_path) = log_file_path {
        if let Ok(metadata) = log_path.metadata() {
            if metadata.len() > 0 {
                eprintln!("Session log: {}", log_path.display());
            }
        }
    }

    for submission in result? {
        println!("{}", submission.message);
        println!();
        println!("Send your request: {}", submission.link);
    }

    Ok(())
}

async fn cmd_serve(config: Config, port: Option<u16>) -> Result<()> {
    let port = port.unwrap_or(config.server.port);
    let bind = config.server.bind.clone();

    println!("Starting showroom API...");
    println!("  Address: http://{}:{}", bind, port);
    println!("  Endpoints:");
    println!("    GET  /api/categorias                 List categories");
    println!("    GET  /api/productos/:categoryId      Paginated category listing");
    println!("    GET  /api/productos/detalle/:id      Product detail");
    println!("    GET  /api/productos-destacados       Featured products");
    println!("    POST /api/productos-destacados       Replace featured products");
    println!("    GET  /api/openapi.json               OpenAPI document");
    println!();

    let state = ApiState::from_config(config).await?;
    rest::serve(state, &bind, port).await
}

async fn cmd_featured(config: &Config, action: FeaturedAction) -> Result<()> {
    let client = CatalogClient::from_config(&config.client)?;

    match action {
        FeaturedAction::List => {
            let products = client
                .featured()
                .await
                .with_context(|| format!("Failed to reach {}", client.base_url()))?;
            if products.is_empty() {
                println!("No featured products");
                return Ok(());
            }
            println!("Featured products ({})", products.len());
            println!("{}", "─".repeat(60));
            for (i, product) in products.iter().enumerate() {
                println!("{}. [{}] {} ({})", i + 1, product.id, product.name, product.category);
            }
        }
        FeaturedAction::Set { ids } => {
            if ids.len() > config.catalog.max_featured {
                bail!(
                    "At most {} featured products are allowed",
                    config.catalog.max_featured
                );
            }
            let stored = client
                .set_featured(&ids)
                .await
                .context("Failed to update featured products")?;
            println!("Featured products updated: {:?}", stored);
        }
    }

    Ok(())
}

fn cmd_init(config: &Config, force: bool) -> Result<()> {
    let path = Config::local_config_path();
    if path.exists() && !force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }
    config.save(&path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

fn cmd_openapi(yaml: bool) -> Result<()> {
    let document = if yaml {
        ApiDoc::yaml().context("Failed to render OpenAPI YAML")?
    } else {
        ApiDoc::json().context("Failed to render OpenAPI JSON")?
    };
    println!("{document}");
    Ok(())
}
