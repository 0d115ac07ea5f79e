//! pstop - top-like view of MySQL performance_schema.
//!
//! Usage:
//!   pstop                               # table I/O latency, 1 second interval
//!   pstop --view file_io_latency        # start on another view
//!   pstop --interval 5 --relative       # deltas since start, 5 second ticks
//!   pstop --defaults-file ~/.my.cnf     # connection from a client defaults file
//!   pstop --use-environment             # connection from MYSQL_DSN

use std::ffi::OsStr;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use clap::Parser;
use tracing::{Level, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::Directive;

use pstop::collector::{
    CompatibilityFlag, DatabaseFilter, FileNameSimplifier, GlobalVariables, MySqlClient,
    ServerContext, ServerInfo,
};
use pstop::connection::ConnectionSettings;
use pstop::munge::{Anonymiser, MungeRules, NameKind, NameRewriter};
use pstop::tui::{
    App, EventStreams, MIN_INTERVAL, PollScheduler, TerminalRenderer, shutdown_signal,
    spawn_terminal_reader,
};
use pstop::view::{ViewKind, ViewRegistry, ViewSources, standard_views};

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Live performance_schema dashboard.
#[derive(Parser)]
#[command(name = "pstop", version, about = "Top-like view of MySQL performance_schema")]
struct Args {
    /// View to show first.
    #[arg(long, default_value_t = ViewKind::default())]
    view: ViewKind,

    /// Initial poll interval in seconds.
    #[arg(
        long,
        default_value_t = 1,
        value_parser = clap::value_parser!(u64).range(MIN_INTERVAL..)
    )]
    interval: u64,

    /// Start in relative mode (deltas since the first collection).
    #[arg(long)]
    relative: bool,

    /// Replace schema, table, file, user and host names with generated ones.
    #[arg(long)]
    anonymise: bool,

    /// Comma-separated list of schemas to restrict table views to.
    #[arg(long, value_name = "DB1,DB2", default_value = "")]
    database_filter: String,

    /// MySQL host to connect to.
    #[arg(long)]
    host: Option<String>,

    /// MySQL port (default: 3306).
    #[arg(long)]
    port: Option<u16>,

    /// MySQL user (default: $USER).
    #[arg(long)]
    user: Option<String>,

    #[arg(long)]
    password: Option<String>,

    /// Unix socket of a local server.
    #[arg(long)]
    socket: Option<String>,

    /// Client defaults file read instead of ~/.my.cnf.
    #[arg(long, value_name = "PATH")]
    defaults_file: Option<PathBuf>,

    /// Connect using MYSQL_DSN (Go driver DSN or mysql:// URL).
    #[arg(long)]
    use_environment: bool,

    /// Write debug logging to the log file.
    #[arg(long)]
    debug: bool,

    /// Log file used with --debug or RUST_LOG.
    #[arg(long, value_name = "PATH", default_value = "pstop.log")]
    log_file: PathBuf,
}

impl Args {
    fn connection_settings(&self) -> ConnectionSettings {
        ConnectionSettings {
            host: self.host.clone(),
            port: self.port,
            user: self.user.clone(),
            password: self.password.clone(),
            socket: self.socket.clone(),
            defaults_file: self.defaults_file.clone(),
            use_environment: self.use_environment,
        }
    }
}

/// Directory and file name for the appender; a bare name lives in `.`.
fn log_target(path: &Path) -> Option<(&Path, &OsStr)> {
    let name = path.file_name()?;
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    Some((dir, name))
}

/// Sends tracing output to the log file; the terminal belongs to the dashboard.
/// Nothing is installed unless `--debug` is given or `RUST_LOG` is set.
///
/// The returned guard flushes the background writer when dropped.
fn init_logging(args: &Args) -> Result<Option<WorkerGuard>, Box<dyn std::error::Error>> {
    let env_set = std::env::var_os(EnvFilter::DEFAULT_ENV).is_some();
    if !args.debug && !env_set {
        return Ok(None);
    }

    let mut filter = EnvFilter::from_default_env();
    if args.debug {
        let directive = format!("pstop={}", Level::DEBUG).parse::<Directive>()?;
        filter = filter.add_directive(directive);
    }

    let (dir, name) = log_target(&args.log_file).ok_or("log file has no file name")?;
    // Start each run with an empty file; the appender only appends.
    File::create(dir.join(name))?;

    let appender = tracing_appender::rolling::never(dir, name);
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .with_target(false)
        .init();
    Ok(Some(guard))
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let opts = args.connection_settings().to_opts()?;
    let client = MySqlClient::connect(opts)?.into_shared();

    let flag = CompatibilityFlag::global();
    let variables = GlobalVariables::load(&client, flag)?;

    let rewriter = Rc::new(NameRewriter::new(
        MungeRules::load_default(),
        Anonymiser::new(args.anonymise),
    ));

    let mut server = ServerContext::new(client.clone(), &variables);
    if args.anonymise {
        let host = rewriter.anonymiser.anonymise(NameKind::Host, server.hostname());
        server = server.with_hostname(host);
    }

    let sources = ViewSources {
        client,
        rewriter,
        filter: DatabaseFilter::new(&args.database_filter),
        simplifier: FileNameSimplifier::new(variables.get("datadir"), variables.get("relay_log")),
    };
    let mut registry =
        ViewRegistry::new(standard_views(sources)).ok_or("no views available")?;
    registry.select(args.view);

    let scheduler = PollScheduler::new(args.interval);
    let events = EventStreams::new(
        scheduler.spawn_ticker(),
        spawn_terminal_reader(),
        shutdown_signal()?,
    );

    let renderer = TerminalRenderer::new()?;
    let app = App::new(
        registry,
        Box::new(server),
        scheduler,
        renderer,
        args.relative,
    );
    app.run(events)?;
    info!("exiting");
    Ok(())
}

fn main() {
    let args = Args::parse();

    let guard = match init_logging(&args) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: cannot set up logging to {}: {}", args.log_file.display(), e);
            std::process::exit(1);
        }
    };

    let result = run(args);
    // exit() skips destructors; flush the log first.
    drop(guard);
    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
