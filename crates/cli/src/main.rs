use crate::{
    conn::{ConnectionPinger, PostgresConnectionPinger},
    env::resolve_database_url,
    error::CliError,
    input::ColumnSpec,
};
use clap::Parser;
use commands::Commands;
use connectors::{
    ConnectionContext, InsertOptions, LoaderConfig, PgCopyLoader, bulk_insert, bulk_insert_raw,
    sql::postgres::{
        connect::connect_client,
        payload::{encode_records, encode_rows},
    },
};
use tracing::info;
use tracing_subscriber::EnvFilter;

mod commands;
mod conn;
mod env;
mod error;
mod input;

#[derive(Parser)]
#[command(
    name = "bulkload",
    version = "0.1.0",
    about = "Bulk-load rows into PostgreSQL with COPY"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    // Initialize logger
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Load {
            table,
            columns,
            input,
            url,
            env_file,
            chunk_size,
            no_tz,
        } => {
            let url = resolve_database_url(url, env_file.as_deref())?;
            let specs = input::parse_columns(&columns)?;
            let mut config = LoaderConfig {
                use_tz: !no_tz,
                ..LoaderConfig::default()
            };
            if let Some(chunk_size) = chunk_size {
                config.chunk_size = chunk_size;
            }
            load(&url, &table, &specs, &input, config).await?;
        }
        Commands::Encode {
            columns,
            input,
            no_tz,
        } => {
            let specs = input::parse_columns(&columns)?;
            let ctx = ConnectionContext { use_tz: !no_tz };
            let payload = encode(&specs, &input, &ctx).await?;
            print!("{payload}");
        }
        Commands::TestConn { url, env_file } => {
            let url = resolve_database_url(url, env_file.as_deref())?;
            PostgresConnectionPinger { url }.ping().await?;
        }
    }

    Ok(())
}

async fn load(
    url: &str,
    table: &str,
    specs: &[ColumnSpec],
    path: &str,
    config: LoaderConfig,
) -> Result<(), CliError> {
    let names = input::column_names(specs);
    let content = tokio::fs::read_to_string(path).await?;
    let rows = input::parse_rows(&content, &names)?;

    let mut client = connect_client(url).await?;
    let tx = client.transaction().await?;
    {
        let loader = PgCopyLoader::with_config(&tx, config);
        if input::is_typed(specs) {
            let meta = input::row_model(table, specs);
            let records = input::to_records(table, &names, rows);
            bulk_insert(&loader, &meta, &records, &InsertOptions::default()).await?;
        } else {
            bulk_insert_raw(&loader, table, &rows, &names).await?;
        }
    }
    tx.commit().await?;

    info!("Loaded {} into {}", path, table);
    Ok(())
}

async fn encode(
    specs: &[ColumnSpec],
    path: &str,
    ctx: &ConnectionContext,
) -> Result<String, CliError> {
    let names = input::column_names(specs);
    let content = tokio::fs::read_to_string(path).await?;
    let rows = input::parse_rows(&content, &names)?;

    let payload = if input::is_typed(specs) {
        let meta = input::row_model("stdin", specs);
        let fields = meta.resolve_fields::<&str>(None)?;
        let records = input::to_records("stdin", &names, rows);
        encode_records(&records, &fields, true, ctx)?
    } else {
        encode_rows(&rows, &names)?
    };
    Ok(payload)
}
