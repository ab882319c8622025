use esgflow::cli::{parse_args, run, CliError, Command, USAGE};
use esgflow::config::CONFIG;
use esgflow::logging::init_logging;
use esgflow::EsgApp;
use esg_core::CoreError;
use esg_persistence::{build_dev_pool_from_env, PgEsgStore};

fn fail(err: CliError) -> ! {
    eprintln!("[esg] {err}");
    if matches!(err, CliError::Usage(_)) {
        eprintln!("{USAGE}");
    }
    std::process::exit(err.exit_code());
}

fn main() {
    init_logging(&CONFIG.log_filter);
    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_args(&args).unwrap_or_else(|e| fail(e));
    if command == Command::Help {
        println!("{USAGE}");
        return;
    }

    let pool = build_dev_pool_from_env().unwrap_or_else(|e| fail(e.into()));
    let app = EsgApp::with_seeded_users(PgEsgStore::from_pool(pool), &CONFIG);
    tracing::debug!(user = app.current_user(), "esg: comando {:?}", command);
    match run(&app, command) {
        Ok(out) => match serde_json::to_string_pretty(&out) {
            Ok(text) => println!("{text}"),
            Err(e) => fail(CliError::Core(CoreError::Storage(format!("salida JSON: {e}")))),
        },
        Err(e) => fail(e),
    }
}
