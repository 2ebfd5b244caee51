use clap::{ArgAction, arg, command};
use sitemap_ping_notifier::client::DEFAULT_TIMEOUT_SECS;

pub const CLAP_STYLING: clap::builder::styling::Styles = clap::builder::styling::Styles::styled()
    .header(clap_cargo::style::HEADER)
    .usage(clap_cargo::style::USAGE)
    .literal(clap_cargo::style::LITERAL)
    .placeholder(clap_cargo::style::PLACEHOLDER)
    .error(clap_cargo::style::ERROR)
    .valid(clap_cargo::style::VALID)
    .invalid(clap_cargo::style::INVALID);

pub fn command_argument_builder() -> clap::Command {
    clap::Command::new("sitemap-ping")
        .version(env!("CARGO_PKG_VERSION"))
        .bin_name("sitemap-ping")
        .about("Notify search engines of a fresh sitemap after a successful deploy")
        .styles(CLAP_STYLING)
        .arg(
            arg!(-q --"quiet" "Only log warnings and skip the banner and summary")
                .required(false)
                .global(true),
        )
        .arg(
            arg!(-v --"verbose" "Log every request and resolved setting")
                .required(false)
                .global(true)
                .conflicts_with("quiet"),
        )
        .subcommand_required(true)
        .subcommand(
            command!("ping")
                .about(
                    "Find the sitemap in the build output and ping every search engine with its \
                URL. Never fails the deploy.",
                )
                .arg(site_url_arg())
                .arg(sitemap_path_arg())
                .arg(
                    arg!(-d --"publish-dir" <DIR>)
                        .required(false)
                        .help("Build output directory (default: $PUBLISH_DIR, then the current directory)"),
                )
                .arg(
                    arg!(-t --"timeout" <SECS>)
                        .required(false)
                        .help(format!("Per-request timeout in seconds (default: {})", DEFAULT_TIMEOUT_SECS))
                        .value_parser(clap::value_parser!(u64).range(1..)),
                )
                .arg(
                    arg!(--"concurrent")
                        .required(false)
                        .help("Ping all targets at once instead of one after another")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    arg!(--"dry-run")
                        .required(false)
                        .help("Log the ping URLs without sending any request")
                        .action(ArgAction::SetTrue),
                )
                .arg(target_arg())
                .arg(no_default_targets_arg())
                .arg(
                    arg!(-f --"format" <FORMAT>)
                        .required(false)
                        .help("Summary format: text, json")
                        .value_parser(["text", "json"])
                        .default_value("text"),
                ),
        )
        .subcommand(
            command!("targets")
                .about("List the ping targets, and the URLs they would receive for a site")
                .arg(site_url_arg())
                .arg(sitemap_path_arg())
                .arg(target_arg())
                .arg(no_default_targets_arg()),
        )
}

fn site_url_arg() -> clap::Arg {
    arg!(-u --"site-url" <URL>)
        .required(false)
        .help("Public site URL (default: $URL)")
}

fn sitemap_path_arg() -> clap::Arg {
    arg!(-s --"sitemap-path" <PATH>)
        .required(false)
        .help("Sitemap path relative to the site root (default: /sitemap-index.xml)")
}

fn target_arg() -> clap::Arg {
    arg!(--"target" <NAME_URL>)
        .required(false)
        .help("Extra target as NAME=URL, the sitemap URL is appended to URL. Repeatable.")
        .action(ArgAction::Append)
}

fn no_default_targets_arg() -> clap::Arg {
    arg!(--"no-default-targets")
        .required(false)
        .help("Skip the built-in Google, Bing and Yandex targets")
        .action(ArgAction::SetTrue)
}
