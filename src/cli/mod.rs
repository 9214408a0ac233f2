use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server exposing POST /api/search
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "7071", env = "ANATOMEDIA_PORT")]
        port: u16,

        /// Bind to 0.0.0.0 instead of 127.0.0.1, exposing the server on all network interfaces
        #[arg(long)]
        public: bool,
    },

    /// Resolve videos and images for a query and print them as JSON
    Query {
        text: String,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },

    /// Print the anatomy terms extracted from a query
    Terms {
        text: String,
    },
}
