use clap::{Parser, Subcommand};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde_json::{json, Value};

#[derive(Parser)]
#[command(name = "geo-cli")]
#[command(about = "Client for the geo-gateway API", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080")]
    url: String,

    /// Bearer token for the address routes (as printed by `login`, with or without "Bearer ")
    #[arg(short, long, env = "GEO_GATEWAY_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the API answers
    Probe,
    /// Create a user and print its token
    Register { login: String, password: String },
    /// Log in and print a token
    Login { login: String, password: String },
    /// Search addresses by free text
    Search { query: String },
    /// Find addresses near a point
    Geocode { lat: String, lng: String },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let client = reqwest::Client::new();
    let base = cli.url.trim_end_matches('/');

    match cli.command {
        Commands::Probe => {
            let res = client.get(format!("{}/api/", base)).send().await?;
            let status = res.status();
            let text = res.text().await?;
            if status.is_success() {
                println!("{}", text);
            } else {
                eprintln!("Error: API returned status {}", status);
                eprintln!("Response: {}", text);
            }
        }
        Commands::Register { login, password } => {
            let res = client
                .post(format!("{}/api/register", base))
                .json(&json!({ "login": login, "password": password }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Login { login, password } => {
            let res = client
                .post(format!("{}/api/login", base))
                .json(&json!({ "login": login, "password": password }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Search { query } => {
            let res = client
                .post(format!("{}/api/address/search", base))
                .headers(auth_headers(cli.token.as_deref())?)
                .json(&json!({ "query": query }))
                .send()
                .await?;
            print_response(res).await?;
        }
        Commands::Geocode { lat, lng } => {
            let res = client
                .post(format!("{}/api/address/geocode", base))
                .headers(auth_headers(cli.token.as_deref())?)
                .json(&json!({ "lat": lat, "lng": lng }))
                .send()
                .await?;
            print_response(res).await?;
        }
    }

    Ok(())
}

fn auth_headers(token: Option<&str>) -> Result<HeaderMap, Box<dyn std::error::Error>> {
    let token = token.ok_or("a token is required: pass --token or set GEO_GATEWAY_TOKEN")?;
    let token = token.strip_prefix("Bearer ").unwrap_or(token);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", token))?);
    Ok(headers)
}

async fn print_response(res: reqwest::Response) -> Result<(), Box<dyn std::error::Error>> {
    let status = res.status();
    if !status.is_success() {
        eprintln!("Error: API returned status {}", status);
        if let Ok(text) = res.text().await {
            eprintln!("Response: {}", text);
        }
        return Ok(());
    }

    let json: Value = res.json().await?;
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}
