use sitemap_ping::commands::command_argument_builder;
use sitemap_ping::handlers::{Verbosity, handle_ping, handle_targets};

#[tokio::main]
async fn main() {
    let cmd = command_argument_builder();
    let chosen_command = cmd.get_matches();
    let verbosity = Verbosity::from_flags(
        chosen_command.get_flag("quiet"),
        chosen_command.get_flag("verbose"),
    );

    match chosen_command.subcommand() {
        Some(("ping", primary_command)) => handle_ping(primary_command, verbosity).await,
        Some(("targets", primary_command)) => handle_targets(primary_command),
        _ => unreachable!("clap should ensure we don't get here"),
    }
}
