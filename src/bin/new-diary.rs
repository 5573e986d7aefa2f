//! CLI binary for new-diary.
//!
//! A thin shim over the library crate: flags fill the form, `--photo`
//! plays the image picker, and the terminal stands in for the screen's
//! progress indicator and notices.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use new_diary::config::{DEFAULT_BASE_URL, DEFAULT_ENDPOINT, DEFAULT_LINE_LENGTH};
use new_diary::{
    Collaborators, ContentFieldsDelegate, DecodeFailurePolicy, FormField, ImagePickerDelegate,
    Notice, NoticeKind, Photo, PhotoRemoval, StringTable, SubmissionConfig, SubmissionController,
    SubmissionPresenter, SubmitOutcome,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── Terminal collaborators ───────────────────────────────────────────────────

/// Spinner while the request is out; notices printed to stderr.
struct TerminalPresenter {
    spinner: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl TerminalPresenter {
    fn new(quiet: bool) -> Arc<Self> {
        Arc::new(Self {
            spinner: Mutex::new(None),
            quiet,
        })
    }
}

impl SubmissionPresenter for TerminalPresenter {
    fn show_progress(&self, message: &str) {
        if self.quiet {
            return;
        }
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}  {elapsed:.dim}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        if let Ok(mut slot) = self.spinner.lock() {
            *slot = Some(bar);
        }
    }

    fn hide_progress(&self) {
        if let Ok(mut slot) = self.spinner.lock() {
            if let Some(bar) = slot.take() {
                bar.finish_and_clear();
            }
        }
    }

    fn show_notice(&self, notice: &Notice) {
        let mark = match notice.kind {
            NoticeKind::Success => green("✔"),
            NoticeKind::Failure => red("✘"),
        };
        eprintln!("{} {}", mark, bold(&notice.title));
        eprintln!("  {}", notice.message);
    }
}

/// Echoes each pick, numbered by attachment slot.
struct PickerEcho {
    slots: AtomicUsize,
    quiet: bool,
}

impl ImagePickerDelegate for PickerEcho {
    fn did_select(&self, photo: Option<&Photo>) {
        let slot = self.slots.fetch_add(1, Ordering::SeqCst);
        if self.quiet {
            return;
        }
        match photo {
            Some(p) => eprintln!(
                "  {} photo {:>2}  {}",
                green("+"),
                slot,
                dim(&format!("{}×{}", p.width(), p.height()))
            ),
            None => eprintln!("  {} photo {:>2}  {}", dim("·"), slot, dim("cancelled")),
        }
    }
}

struct ContentEcho {
    quiet: bool,
}

impl ContentFieldsDelegate for ContentEcho {
    fn clear_contents(&self) {
        if !self.quiet {
            eprintln!("{}", dim("Form cleared."));
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Submit an entry with two photos
  new-diary -f comments="First swim" -f area=lake --today \
            --photo lake.jpg --photo towel.png

  # Remove the second photo again before submitting
  new-diary -f tags=summer --photo a.png --photo b.png --remove 1

  # Against a local server, acknowledging without a prompt
  new-diary --base-url http://localhost:8080 --yes --photo a.png

  # Print the server's confirmation as JSON
  new-diary --json --yes --photo a.png

FIELDS:
  comments, date, area, category, tags, event

ENVIRONMENT VARIABLES:
  NEW_DIARY_BASE_URL      Server root (default https://reqres.in/)
  NEW_DIARY_ENDPOINT      Endpoint path (default api/users)
  NEW_DIARY_STRINGS       Path to a .strings file with translated notices
  RUST_LOG                Override the log filter
"#;

/// Fill in a diary entry and submit it.
#[derive(Parser, Debug)]
#[command(
    name = "new-diary",
    version,
    about = "Fill in a diary entry with photos and submit it",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Set a form field: NAME=VALUE (repeatable).
    #[arg(short, long = "field", value_name = "NAME=VALUE", value_parser = parse_field)]
    fields: Vec<(FormField, String)>,

    /// Fill the date field with today's date, as the date picker would.
    #[arg(long)]
    today: bool,

    /// Attach a photo (PNG or JPEG, repeatable).
    #[arg(short, long = "photo", value_name = "PATH")]
    photos: Vec<PathBuf>,

    /// Remove the attached photo at this index before submitting (repeatable).
    #[arg(long = "remove", value_name = "INDEX")]
    removals: Vec<usize>,

    /// Server root URL.
    #[arg(long, env = "NEW_DIARY_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Endpoint path joined onto the base URL.
    #[arg(long, env = "NEW_DIARY_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Base64 line width for photos (0 disables wrapping).
    #[arg(long, env = "NEW_DIARY_LINE_LENGTH", default_value_t = DEFAULT_LINE_LENGTH)]
    line_length: usize,

    /// Request timeout in seconds (default: none).
    #[arg(long, env = "NEW_DIARY_TIMEOUT")]
    timeout: Option<u64>,

    /// Show a failure notice when the reply cannot be decoded.
    #[arg(long, env = "NEW_DIARY_REPORT_DECODE_ERRORS")]
    report_decode_errors: bool,

    /// Make --remove also drop the photo from the submitted data.
    #[arg(long, env = "NEW_DIARY_SYNC_REMOVALS")]
    sync_removals: bool,

    /// Path to a .strings file with translated notices.
    #[arg(long, env = "NEW_DIARY_STRINGS")]
    strings: Option<PathBuf>,

    /// Acknowledge notices without waiting for Enter.
    #[arg(short, long)]
    yes: bool,

    /// Print the server's confirmation as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "NEW_DIARY_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "NEW_DIARY_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build controller ─────────────────────────────────────────────────
    let config = build_config(&cli)?;
    let strings = match cli.strings {
        Some(ref path) => StringTable::load(path).context("Failed to load strings")?,
        None => StringTable::english(),
    };

    let presenter = TerminalPresenter::new(cli.quiet);
    let collaborators = Collaborators {
        presenter: Arc::clone(&presenter) as Arc<dyn SubmissionPresenter>,
        picker: Arc::new(PickerEcho {
            slots: AtomicUsize::new(0),
            quiet: cli.quiet,
        }),
        content: Arc::new(ContentEcho { quiet: cli.quiet }),
        strings: Arc::new(strings),
    };
    let mut controller = SubmissionController::from_config(config, collaborators)
        .context("Failed to set up the submission client")?;

    // ── Fill the form ────────────────────────────────────────────────────
    for (field, value) in &cli.fields {
        controller.set_field(*field, value.clone());
    }
    if cli.today {
        controller.set_date(chrono::Local::now().date_naive());
    }
    for path in &cli.photos {
        let photo =
            Photo::open(path).with_context(|| format!("Failed to attach {}", path.display()))?;
        controller.did_pick_photo(Some(photo));
    }
    for &index in &cli.removals {
        controller
            .remove_photo(index)
            .with_context(|| format!("Failed to remove photo {index}"))?;
    }

    // ── Submit ───────────────────────────────────────────────────────────
    let outcome = controller
        .submit()
        .await
        .context("Submission could not start")?;

    match outcome {
        SubmitOutcome::Rejected => {
            dismiss(&mut controller, cli.yes || cli.quiet)?;
            anyhow::bail!("Nothing was submitted: attach at least one photo with --photo");
        }
        SubmitOutcome::Confirmed(confirmation) => {
            if cli.json {
                let json = serde_json::to_string_pretty(&confirmation)
                    .context("Failed to serialise confirmation")?;
                println!("{json}");
            }
            if controller.pending_notice().is_none() && !cli.quiet {
                eprintln!("{}", dim("Server replied without an id; form kept."));
            }
            dismiss(&mut controller, cli.yes || cli.quiet)?;
            Ok(())
        }
        SubmitOutcome::Failed(e) => {
            dismiss(&mut controller, cli.yes || cli.quiet)?;
            Err(anyhow::Error::new(e).context("Submission failed"))
        }
        SubmitOutcome::Unanswered(e) => {
            presenter.hide_progress();
            Err(anyhow::Error::new(e).context(
                "No confirmation received; re-run with --report-decode-errors to get a notice",
            ))
        }
    }
}

/// Map CLI args to `SubmissionConfig`.
fn build_config(cli: &Cli) -> Result<SubmissionConfig> {
    let mut builder = SubmissionConfig::builder()
        .base_url(cli.base_url.clone())
        .endpoint(cli.endpoint.clone())
        .line_length(cli.line_length);

    if let Some(secs) = cli.timeout {
        builder = builder.timeout_secs(secs);
    }
    if cli.report_decode_errors {
        builder = builder.decode_failure(DecodeFailurePolicy::Report);
    }
    if cli.sync_removals {
        builder = builder.photo_removal(PhotoRemoval::Synchronized);
    }

    builder.build().context("Invalid configuration")
}

/// Parse `--field NAME=VALUE`.
fn parse_field(s: &str) -> std::result::Result<(FormField, String), String> {
    let (name, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected NAME=VALUE, got '{s}'"))?;
    let field = name.parse::<FormField>().map_err(|e| e.to_string())?;
    Ok((field, value.to_string()))
}

/// Wait for Enter (unless `auto`), then acknowledge the notice on screen.
fn dismiss(controller: &mut SubmissionController, auto: bool) -> Result<()> {
    let Some(notice) = controller.pending_notice() else {
        return Ok(());
    };

    if !auto {
        eprint!("  [{}] ", bold(&notice.confirm_label));
        io::stderr().flush().ok();
        let mut line = String::new();
        tokio::task::block_in_place(|| io::stdin().read_line(&mut line))
            .context("Failed to read acknowledgment from stdin")?;
    }

    controller.acknowledge();
    Ok(())
}
