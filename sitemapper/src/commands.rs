use crate::CLAP_STYLING;
use clap::arg;

pub(crate) fn command_argument_builder() -> clap::Command {
    clap::Command::new("sitemapper")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("sitemapper")
        .about("Ask a sitemapper server to crawl a site and print its sitemap")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-u --"url" <URL>)
                .required(false)
                .help("The URL to crawl (prompted for when omitted)"),
        )
        .arg(
            arg!(-s --"server" <ADDRESS>)
                .required(false)
                .help("Base address of the crawl server")
                .default_value("http://localhost:8080"),
        )
}
