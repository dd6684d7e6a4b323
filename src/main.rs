//! Attendance Client CLI
//!
//! Command-line front end for the enrollment and attendance screens.

use attendance_client::{
    capture::{Camera, MockCamera},
    config::FileConfig,
    enrollment::{EnrollmentController, EnrollmentForm, IntervalTicker},
    metrics::MetricsRegistry,
    screen::{self, Screen},
    AttendanceController, AttendanceForm, HttpBackend, Notification, Severity,
};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "attendance-client", version, about = "Student enrollment and attendance client")]
struct Cli {
    /// TOML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the backend base address.
    #[arg(long, global = true)]
    backend_url: Option<String>,

    /// Print Prometheus metrics on exit.
    #[arg(long, global = true)]
    print_metrics: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Show the landing screen.
    Home,
    /// Capture 30 webcam frames and enroll a student.
    Enroll {
        /// Student PRN number.
        #[arg(long, default_value = "")]
        prn: String,
        /// Student name.
        #[arg(long, default_value = "")]
        name: String,
        /// Use synthetic frames instead of a camera.
        #[arg(long)]
        mock: bool,
    },
    /// Upload a group photograph to mark attendance.
    Mark {
        #[arg(long, default_value = "")]
        subject: String,
        #[arg(long, default_value = "")]
        class_no: String,
        #[arg(long, default_value = "")]
        department: String,
        #[arg(long, default_value = "")]
        year: String,
        /// Group image (png, jpg or jpeg).
        #[arg(long)]
        image: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!("Attendance Client v{}", attendance_client::VERSION);

    let mut config = match &cli.config {
        Some(path) => match FileConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => FileConfig::default(),
    };
    if let Some(url) = &cli.backend_url {
        config.backend.base_url = url.clone();
    }
    if let Err(e) = config.validate() {
        eprintln!("Invalid configuration: {}", e);
        return ExitCode::FAILURE;
    }

    let metrics = match MetricsRegistry::new() {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Failed to create metrics registry: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let outcome = match cli.command.unwrap_or(Command::Home) {
        Command::Home => {
            print!("{}", screen::render_home());
            Ok(None)
        }
        Command::Enroll { prn, name, mock } => {
            enroll(&config, &metrics, EnrollmentForm::new(prn, name), mock).map(Some)
        }
        Command::Mark {
            subject,
            class_no,
            department,
            year,
            image,
        } => {
            let form = AttendanceForm {
                subject,
                class_no,
                department,
                year,
                image,
            };
            mark(&config, &metrics, form).map(Some)
        }
    };

    if cli.print_metrics {
        match metrics.encode() {
            Ok(text) => print!("{}", text),
            Err(e) => warn!("Failed to encode metrics: {}", e),
        }
    }

    match outcome {
        Ok(None) => ExitCode::SUCCESS,
        Ok(Some(alert)) => {
            println!("{}", alert);
            if alert.severity == Severity::Success {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(message) => {
            eprintln!("{}", message);
            ExitCode::FAILURE
        }
    }
}

#[cfg(feature = "camera")]
fn open_camera(mock: bool) -> Box<dyn Camera> {
    if mock {
        Box::new(MockCamera::new())
    } else {
        Box::new(attendance_client::capture::NativeCamera::new())
    }
}

#[cfg(not(feature = "camera"))]
fn open_camera(mock: bool) -> Box<dyn Camera> {
    if !mock {
        warn!("Built without the `camera` feature; using synthetic frames");
    }
    Box::new(MockCamera::new())
}

fn enroll(
    config: &FileConfig,
    metrics: &MetricsRegistry,
    form: EnrollmentForm,
    mock: bool,
) -> Result<Notification, String> {
    info!("Opening {} ({})", Screen::AddStudent, Screen::AddStudent.route());

    let backend =
        HttpBackend::new(&config.backend).map_err(|e| format!("Failed to create client: {}", e))?;

    // Ctrl-C aborts the capture; the camera is still released.
    let interrupt = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&interrupt);
    if let Err(e) = ctrlc::set_handler(move || flag.store(true, Ordering::SeqCst)) {
        warn!("Failed to install Ctrl-C handler: {}", e);
    }
    let ticker = IntervalTicker::with_interrupt(config.capture.frame_interval(), interrupt);

    let mut controller =
        EnrollmentController::new(open_camera(mock), ticker, backend, config.capture.clone())
            .with_metrics(metrics.clone());
    *controller.form_mut() = form;

    let _ = controller.start_camera_and_capture(|progress| {
        eprint!(
            "\rCapturing Images ({:.0}%) [{}/{}]",
            progress.percent(),
            progress.captured,
            progress.target
        );
        let _ = std::io::stderr().flush();
        if progress.is_complete() {
            eprintln!();
        }
    });

    controller
        .state()
        .alert
        .clone()
        .ok_or_else(|| "Enrollment finished without a result".to_string())
}

fn mark(
    config: &FileConfig,
    metrics: &MetricsRegistry,
    form: AttendanceForm,
) -> Result<Notification, String> {
    info!("Opening {} ({})", Screen::MarkAttendance, Screen::MarkAttendance.route());

    let backend =
        HttpBackend::new(&config.backend).map_err(|e| format!("Failed to create client: {}", e))?;

    let mut controller = AttendanceController::new(backend, config.backend.max_upload_bytes)
        .with_metrics(metrics.clone());
    *controller.form_mut() = form;

    let _ = controller.submit();

    controller
        .alert()
        .cloned()
        .ok_or_else(|| "Upload finished without a result".to_string())
}
