use colored::Colorize;
use commands::command_argument_builder;
use indicatif::{ProgressBar, ProgressStyle};
use reqwest::Client;
use sitemapper::handlers::{crawl_target, print_reply, prompt_for_url, request_sitemap};
use std::time::Duration;

mod commands;

#[tokio::main]
async fn main() {
    let matches = command_argument_builder().get_matches();
    let server = matches
        .get_one::<String>("server")
        .map(String::as_str)
        .unwrap_or("http://localhost:8080");

    let input = match matches.get_one::<String>("url") {
        Some(url) => url.clone(),
        None => match prompt_for_url() {
            Ok(url) => url,
            Err(e) => {
                eprintln!("{} {:#}", "✗".red().bold(), e);
                std::process::exit(1);
            }
        },
    };

    let target = crawl_target(&input);

    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}") {
        spinner.set_style(style);
    }
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner.set_message(format!("Crawling {}...", target));

    let client = Client::new();
    let reply = request_sitemap(&client, server, &target).await;
    spinner.finish_and_clear();

    match reply {
        Ok(reply) => print_reply(&reply),
        Err(e) => {
            eprintln!("{} {:#}", "✗".red().bold(), e);
            std::process::exit(1);
        }
    }
}

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);
