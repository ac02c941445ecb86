use clap::arg;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("sitemapper-server")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("sitemapper-server")
        .about("Serve single-domain sitemap crawls over HTTP")
        .styles(CLAP_STYLING)
        .arg(
            arg!(--"host" <HOST>)
                .required(false)
                .help("Address to listen on")
                .default_value("0.0.0.0"),
        )
        .arg(
            arg!(-p --"port" <PORT>)
                .required(false)
                .help("Port to listen on")
                .value_parser(clap::value_parser!(u16))
                .default_value("8080"),
        )
        .arg(
            arg!(--"timeout" <SECONDS>)
                .required(false)
                .help("Per-request timeout when fetching pages")
                .value_parser(clap::value_parser!(u64))
                .default_value("10"),
        )
        .arg(
            arg!(--"max-depth" <DEPTH>)
                .required(false)
                .help("Stop following links this many hops from the seed (default: unbounded)")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            arg!(--"max-concurrency" <NUM_FETCHES>)
                .required(false)
                .help("Maximum page fetches in flight per crawl (default: unbounded)")
                .value_parser(clap::value_parser!(usize)),
        )
}
