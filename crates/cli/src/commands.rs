use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Bulk-load JSON-lines rows into a table with a single COPY
    Load {
        #[arg(long, help = "Target table, optionally schema-qualified")]
        table: String,

        #[arg(
            long,
            help = "Comma-separated target columns, each `name` or `name:type` (e.g. `tags:text[]`)"
        )]
        columns: String,

        #[arg(long, help = "JSON-lines file; each line an array or an object keyed by column")]
        input: String,

        #[arg(long, help = "PostgreSQL connection URL, defaults to DATABASE_URL")]
        url: Option<String>,

        #[arg(long, help = "Optional KEY=VALUE file consulted for DATABASE_URL")]
        env_file: Option<String>,

        #[arg(long, help = "Bytes per COPY data message")]
        chunk_size: Option<usize>,

        #[arg(long, help = "Store timestamp-with-time-zone columns as naive UTC")]
        no_tz: bool,
    },
    /// Print the COPY payload for JSON-lines rows without touching a database
    Encode {
        #[arg(long, help = "Comma-separated columns, each `name` or `name:type`")]
        columns: String,

        #[arg(long, help = "JSON-lines file; each line an array or an object keyed by column")]
        input: String,

        #[arg(long, help = "Store timestamp-with-time-zone columns as naive UTC")]
        no_tz: bool,
    },
    /// Test a PostgreSQL connection with `SELECT 1`
    TestConn {
        #[arg(long, help = "PostgreSQL connection URL, defaults to DATABASE_URL")]
        url: Option<String>,

        #[arg(long, help = "Optional KEY=VALUE file consulted for DATABASE_URL")]
        env_file: Option<String>,
    },
}
