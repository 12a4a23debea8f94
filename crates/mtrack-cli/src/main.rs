//! `mtrack`: drive the machine scan view from a terminal

use anyhow::Context;
use clap::{Arg, ArgMatches, Command};
use mtrack_data::{AuthContext, InMemoryStore, StaticAuth};
use mtrack_model::User;
use mtrack_scanner::{CommandScanSource, ScanSource, ScriptedScanSource};
use mtrack_view::{MachineScanView, SubmitOutcome, ViewConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

fn machines_arg() -> Arg {
    Arg::new("machines")
        .long("machines")
        .required(true)
        .value_parser(clap::value_parser!(PathBuf))
        .help("JSON machine catalog")
}

fn config_arg() -> Arg {
    Arg::new("config")
        .long("config")
        .value_parser(clap::value_parser!(PathBuf))
        .help("TOML view configuration")
}

fn user_args(required: bool) -> [Arg; 3] {
    [
        Arg::new("user-id")
            .long("user-id")
            .required(required)
            .requires("user-name")
            .requires("role")
            .help("Signed-in user id"),
        Arg::new("user-name")
            .long("user-name")
            .required(required)
            .help("Signed-in user display name"),
        Arg::new("role")
            .long("role")
            .required(required)
            .help("Signed-in user role"),
    ]
}

fn cli() -> Command {
    Command::new("mtrack")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Scan machine QR codes and raise maintenance complaints")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("lookup")
                .about("Resolve a QR code or machine id and show its details")
                .arg(machines_arg())
                .arg(config_arg())
                .arg(Arg::new("code").required(true).help("QR code or machine id")),
        )
        .subcommand(
            Command::new("complain")
                .about("Raise a complaint against a machine")
                .arg(machines_arg())
                .arg(config_arg())
                .args(user_args(true))
                .arg(Arg::new("code").required(true).help("QR code or machine id"))
                .arg(Arg::new("text").required(true).help("Complaint description")),
        )
        .subcommand(
            Command::new("scan")
                .about("Scan a QR code with the camera, then raise a complaint from stdin")
                .arg(machines_arg())
                .arg(config_arg())
                .arg(
                    Arg::new("device")
                        .long("device")
                        .help("Capture device, overrides the config file"),
                )
                .args(user_args(false)),
        )
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &ArgMatches) -> anyhow::Result<ViewConfig> {
    let mut config = match args.get_one::<PathBuf>("config") {
        Some(path) => ViewConfig::from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => ViewConfig::default(),
    };
    if let Ok(Some(device)) = args.try_get_one::<String>("device") {
        config = config.with_device(device.clone());
    }
    Ok(config)
}

fn load_store(args: &ArgMatches) -> anyhow::Result<Arc<InMemoryStore>> {
    let path = args
        .get_one::<PathBuf>("machines")
        .context("--machines is required")?;
    let store = InMemoryStore::from_json_file(path)
        .with_context(|| format!("loading machines from {}", path.display()))?;
    Ok(Arc::new(store))
}

fn auth_from(args: &ArgMatches) -> StaticAuth {
    match (
        args.get_one::<String>("user-id"),
        args.get_one::<String>("user-name"),
        args.get_one::<String>("role"),
    ) {
        (Some(id), Some(name), Some(role)) => StaticAuth::signed_in(User::new(id, name, role)),
        _ => StaticAuth::anonymous(),
    }
}

fn build_view(
    store: Arc<InMemoryStore>,
    auth: impl AuthContext + 'static,
    source: Arc<dyn ScanSource>,
    config: ViewConfig,
) -> MachineScanView {
    MachineScanView::new(store, Arc::new(auth), source, config)
}

/// Why a submit was skipped
fn skip_reason(view: &MachineScanView) -> &'static str {
    if view.current_machine().is_none() {
        "no machine matched"
    } else if view.state().complaint_text.is_empty() {
        "complaint text is empty"
    } else {
        "no signed-in user"
    }
}

/// Exit code for the final view state
fn exit_code(view: &MachineScanView) -> i32 {
    i32::from(view.state().error.is_some())
}

fn lookup(args: &ArgMatches) -> anyhow::Result<i32> {
    let store = load_store(args)?;
    let config = load_config(args)?;
    let code = args.get_one::<String>("code").context("missing code")?;

    let mut view = build_view(
        store,
        StaticAuth::anonymous(),
        Arc::new(ScriptedScanSource::new()),
        config,
    );
    view.set_manual_id(code.clone());
    view.submit_manual_id();

    print!("{}", view.render());
    Ok(if view.current_machine().is_some() { 0 } else { 2 })
}

async fn complain(args: &ArgMatches) -> anyhow::Result<i32> {
    let store = load_store(args)?;
    let config = load_config(args)?;
    let code = args.get_one::<String>("code").context("missing code")?;
    let text = args.get_one::<String>("text").context("missing text")?;

    let mut view = build_view(
        Arc::clone(&store),
        auth_from(args),
        Arc::new(ScriptedScanSource::new()),
        config,
    );
    view.set_manual_id(code.clone());
    view.submit_manual_id();
    view.set_complaint_text(text.clone());

    let outcome = view.submit_complaint().await;
    print!("{}", view.render());

    match outcome {
        SubmitOutcome::Raised(complaint) => {
            println!("{}", serde_json::to_string_pretty(&complaint)?);
            Ok(0)
        }
        SubmitOutcome::Failed => Ok(exit_code(&view)),
        SubmitOutcome::Skipped => {
            tracing::warn!(code = %code, "Nothing submitted: {}", skip_reason(&view));
            Ok(2)
        }
    }
}

async fn scan(args: &ArgMatches) -> anyhow::Result<i32> {
    let store = load_store(args)?;
    let config = load_config(args)?;
    let source = Arc::new(CommandScanSource::new(config.scanner.decoder.clone()));

    let mut view = build_view(store, auth_from(args), source, config);

    view.start_scanning().await;
    if !view.state().scanning {
        print!("{}", view.render());
        return Ok(exit_code(&view));
    }
    eprintln!("Point the camera at a machine QR label (Ctrl-C to quit)...");

    let code = tokio::select! {
        code = view.await_scan() => code,
        _ = tokio::signal::ctrl_c() => None,
    };
    view.stop_scanning();
    print!("{}", view.render());

    if code.is_none() || view.current_machine().is_none() {
        return Ok(exit_code(&view));
    }

    eprintln!("Describe the issue (empty line to skip):");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let text = lines.next_line().await?.unwrap_or_default();
    if text.trim().is_empty() {
        return Ok(0);
    }

    view.set_complaint_text(text);
    if let SubmitOutcome::Raised(complaint) = view.submit_complaint().await {
        println!("{}", serde_json::to_string_pretty(&complaint)?);
    }
    print!("{}", view.render());
    Ok(exit_code(&view))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let matches = cli().get_matches();

    let code = match matches.subcommand() {
        Some(("lookup", args)) => lookup(args)?,
        Some(("complain", args)) => complain(args).await?,
        Some(("scan", args)) => scan(args).await?,
        _ => 0,
    };

    std::process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_is_well_formed() {
        cli().debug_assert();
    }

    #[test]
    fn complain_requires_user() {
        let result = cli().try_get_matches_from([
            "mtrack",
            "complain",
            "--machines",
            "machines.json",
            "QR1",
            "Leak",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn scan_user_is_optional() {
        let matches = cli()
            .try_get_matches_from(["mtrack", "scan", "--machines", "machines.json"])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        assert!(auth_from(args).current_user().is_none());
    }

    #[test]
    fn device_flag_overrides_config() {
        let matches = cli()
            .try_get_matches_from([
                "mtrack",
                "scan",
                "--machines",
                "machines.json",
                "--device",
                "/dev/video4",
            ])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        let config = load_config(args).unwrap();
        assert_eq!(config.scanner.device, "/dev/video4");
    }

    #[tokio::test]
    async fn skip_reason_names_the_missing_input() {
        let machine = mtrack_model::Machine::new("m1", "QR1", "Press A");
        let store = Arc::new(InMemoryStore::with_machines(vec![machine]));
        let user = StaticAuth::signed_in(User::new("u1", "Dana", "operator"));
        let mut view = build_view(
            store,
            user,
            Arc::new(ScriptedScanSource::new()),
            ViewConfig::default(),
        );

        view.set_manual_id("unknown");
        view.submit_manual_id();
        assert_eq!(skip_reason(&view), "no machine matched");

        view.set_manual_id("QR1");
        view.submit_manual_id();
        assert_eq!(view.submit_complaint().await, SubmitOutcome::Skipped);
        assert_eq!(skip_reason(&view), "complaint text is empty");
    }

    #[test]
    fn lookup_ignores_missing_device_flag() {
        let matches = cli()
            .try_get_matches_from(["mtrack", "lookup", "--machines", "m.json", "QR1"])
            .unwrap();
        let (_, args) = matches.subcommand().unwrap();
        assert_eq!(load_config(args).unwrap(), ViewConfig::default());
    }
}
