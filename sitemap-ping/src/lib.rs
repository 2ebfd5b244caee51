pub mod commands;
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    PingArgs, ReportFormat, Verbosity, contain, handle_ping, handle_targets, log_colors, parse_ping_args,
    run_hook, target_lines,
};
