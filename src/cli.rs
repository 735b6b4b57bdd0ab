use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use crate::api::{self, Components};
use crate::types::ApiResponse;

#[derive(Parser)]
#[command(name = "storefront", version, about = "Product-listing extraction (JSON only)")]
pub struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scrape a listing URL and print the normalized products
    Scrape(ScrapeArgs),
}

#[derive(Args)]
struct ScrapeArgs {
    /// The listing URL. Quotes, percent-encoding and a missing scheme are
    /// tolerated.
    url: String,
    /// Surface blocked/failed scrapes as errors instead of an empty list
    #[arg(long)]
    strict: bool,
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let components = Components::new().context("failed to initialize http client")?;

    match cli.cmd {
        Command::Scrape(ScrapeArgs { url, strict }) => {
            if strict {
                finish(api::scrape_listing(&url, &components));
            } else {
                print_json(ApiResponse::ok(api::scrape(&url, &components)));
            }
        }
    }
    Ok(())
}

fn finish<T: serde::Serialize>(res: crate::Result<T>) {
    match res {
        Ok(v) => print_json(ApiResponse::ok(v)),
        Err(e) => print_json(ApiResponse::<()>::err(e.to_string())),
    }
}

fn print_json<T: serde::Serialize>(val: T) {
    // pretty JSON output
    println!("{}", serde_json::to_string_pretty(&val).unwrap());
}
