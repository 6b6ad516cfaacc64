mod catalog;
mod rates;

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "otlist")]
#[command(about = "Marketplace catalog listing from the command line")]
struct Cli {
    /// OTAPI instance key (falls back to `OTAPI_INSTANCE_KEY`)
    #[arg(long, global = true, env = "OTAPI_INSTANCE_KEY", hide_env_values = true)]
    instance_key: Option<String>,

    /// Response language (defaults to `OTAPI_DEFAULT_LANGUAGE`)
    #[arg(long, global = true)]
    language: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// List one page of a category's products
    List {
        /// Category id (e.g. otc-3035)
        #[arg(long)]
        category: String,
        /// Sort code: Ranksales, Rankprice_asc, Rankprice_desc, Ranknew
        #[arg(long, default_value = "Ranksales")]
        sort: String,
        /// Products per page (1-200)
        #[arg(long, default_value_t = 20)]
        page_size: usize,
    },
    /// Show the normalized detail of one item
    Item {
        /// Item id
        #[arg(long)]
        id: String,
    },
    /// Show the category tree, or one category's children
    Tree {
        /// Parent category id; omit for the two-level root tree
        #[arg(long)]
        parent: Option<String>,
    },
    /// Show the current CNY exchange rates
    Rates,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = otlist_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    // stdout carries the JSON output only.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let access = catalog::Access::resolve(&config, cli.instance_key, cli.language);
    match cli.command {
        Some(Commands::List {
            category,
            sort,
            page_size,
        }) => catalog::run_list(&config, access, &category, &sort, page_size).await,
        Some(Commands::Item { id }) => catalog::run_item(&config, access, &id).await,
        Some(Commands::Tree { parent }) => {
            catalog::run_tree(&config, access, parent.as_deref()).await
        }
        Some(Commands::Rates) => rates::run_rates(&config).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests;
