//! Smile Press CLI
//!
//! Runs one smile session: waits for a sustained smile, takes the photo
//! and writes the newspaper print to disk. Without a real camera it
//! uses the mock camera and a scripted classifier.

use clap::Parser;
use smile_press::{
    capture::{Camera, FileConfig, MockCamera},
    classifier::{parse_script, ScriptedClassifier},
    effect::RngSource,
    metrics::MetricsRegistry,
    presentation::FilePresenter,
    session::{Session, SessionOutcome},
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

/// Happiness readings replayed when no script is given.
const DEMO_SCRIPT: &str = "0.1,0.35,-,0.6,0.85,0.9,x,0.93,0.95,0.97,0.99";

#[derive(Debug, Parser)]
#[command(name = "smile-press", version, about = "Smile-triggered newspaper photo booth")]
struct Args {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Where to write the photo (overrides the config file).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Seed for the print noise, for reproducible output.
    #[arg(long)]
    seed: Option<u64>,

    /// Scripted classifier readings: a float is a face, `-` no face, `x` a failure.
    #[arg(long, default_value = DEMO_SCRIPT)]
    script: String,

    /// Use the real camera with this index (needs the `camera` feature).
    #[arg(long)]
    device: Option<u32>,

    /// Serve Prometheus metrics on this port (needs the `metrics` feature).
    #[arg(long)]
    metrics_port: Option<u16>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let args = Args::parse();
    info!("Smile Press v{}", smile_press::VERSION);

    let mut config = match &args.config {
        Some(path) => match FileConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path.display(), e);
                std::process::exit(2);
            }
        },
        None => FileConfig::default(),
    };
    if let Some(output) = args.output.clone() {
        config.output.path = output;
    }
    if let Some(seed) = args.seed {
        config.output.seed = Some(seed);
    }
    if let Some(port) = args.metrics_port {
        config.output.metrics_port = port;
    }
    if let Some(device) = args.device {
        config.capture.device_id = device;
    }

    let steps = match parse_script(&args.script) {
        Ok(steps) => steps,
        Err(e) => {
            eprintln!("Invalid --script: {}", e);
            std::process::exit(2);
        }
    };
    let classifier = ScriptedClassifier::new(steps);

    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&shutdown);
    if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
        warn!("Failed to install Ctrl-C handler: {}", e);
    }

    let metrics = match MetricsRegistry::new() {
        Ok(registry) => Some(Arc::new(registry)),
        Err(e) => {
            warn!("Metrics disabled: {}", e);
            None
        }
    };
    serve_metrics(&config, metrics.as_ref());

    let code = if args.device.is_some() {
        run_with_device(&config, classifier, shutdown, metrics).await
    } else {
        info!("Using mock camera input");
        run(MockCamera::new(), &config, classifier, shutdown, metrics).await
    };
    std::process::exit(code);
}

#[cfg(feature = "camera")]
async fn run_with_device(
    config: &FileConfig,
    classifier: ScriptedClassifier,
    shutdown: Arc<AtomicBool>,
    metrics: Option<Arc<MetricsRegistry>>,
) -> i32 {
    let camera = smile_press::capture::NokhwaCamera::new();
    run(camera, config, classifier, shutdown, metrics).await
}

#[cfg(not(feature = "camera"))]
async fn run_with_device(
    _config: &FileConfig,
    _classifier: ScriptedClassifier,
    _shutdown: Arc<AtomicBool>,
    _metrics: Option<Arc<MetricsRegistry>>,
) -> i32 {
    eprintln!("--device needs a build with the `camera` feature");
    2
}

#[cfg(feature = "metrics")]
fn serve_metrics(config: &FileConfig, metrics: Option<&Arc<MetricsRegistry>>) {
    use smile_press::metrics::{MetricsServer, MetricsServerConfig};

    let (port, registry) = match (config.output.metrics_port, metrics) {
        (0, _) | (_, None) => return,
        (port, Some(registry)) => (port, Arc::clone(registry)),
    };
    let server = MetricsServer::new(MetricsServerConfig::with_port(port), registry);
    tokio::spawn(async move {
        if let Err(e) = server.run().await {
            warn!("Metrics server stopped: {}", e);
        }
    });
}

#[cfg(not(feature = "metrics"))]
fn serve_metrics(config: &FileConfig, _metrics: Option<&Arc<MetricsRegistry>>) {
    if config.output.metrics_port != 0 {
        warn!("Ignoring metrics port: built without the `metrics` feature");
    }
}

async fn run<C: Camera>(
    camera: C,
    config: &FileConfig,
    classifier: ScriptedClassifier,
    shutdown: Arc<AtomicBool>,
    metrics: Option<Arc<MetricsRegistry>>,
) -> i32 {
    let presenter = FilePresenter::new(config.output.path.clone());
    let mut session = match Session::new(camera, classifier, presenter, config) {
        Ok(session) => session.with_shutdown(shutdown),
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            return 2;
        }
    };
    if let Some(registry) = metrics {
        session = session.with_metrics(registry);
    }

    let mut rng = match config.output.seed {
        Some(seed) => RngSource::seeded(seed),
        None => RngSource::from_os_entropy(),
    };

    match session.run(&mut rng).await {
        Ok(SessionOutcome::Captured(photo)) => {
            let stats = session.stats();
            info!(
                ticks = stats.ticks,
                no_face_ticks = stats.no_face_ticks,
                oracle_failures = stats.oracle_failures,
                "Session complete"
            );
            match session.presenter().written() {
                Some(path) => {
                    println!("{} ({})", path.display(), photo.dateline());
                    0
                }
                None => 1,
            }
        }
        Ok(SessionOutcome::Cancelled) => 130,
        Err(_) => 1,
    }
}
