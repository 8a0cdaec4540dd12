use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "gmgn-relay",
    version,
    about = "Authenticated facade over the GMGN token-data API"
)]
pub struct Cli {
    /// Address to bind the HTTP server on
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind the HTTP server on
    #[arg(long, default_value_t = 8080)]
    pub port: u16,
}
