use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tdspay::application::workflow::{ThreeDSecurePayment, WorkflowConfig};
use tdspay::domain::gateway::THREE_D_SECURE_VERSION;
use tdspay::infrastructure::scripted::{GatewayScript, ScriptedGateway};
use tdspay::interfaces::json::checkout_reader::CheckoutReader;
use tdspay::interfaces::json::report_writer::{PaymentReport, ReportWriter};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Checkout form JSON file (token, amount, card, billing)
    input: PathBuf,

    /// Gateway script JSON file replayed in place of a live gateway
    #[arg(long)]
    script: PathBuf,

    /// 3-D Secure protocol version requested from the gateway
    #[arg(long, default_value_t = THREE_D_SECURE_VERSION)]
    three_d_secure_version: u8,

    /// How long verification waits for the lookup to be resumed, in milliseconds
    #[arg(long, default_value_t = 5000)]
    resume_timeout_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let file = File::open(&cli.input).into_diagnostic()?;
    let payload = CheckoutReader::new(file).read_payload().into_diagnostic()?;

    let script: GatewayScript =
        serde_json::from_reader(File::open(&cli.script).into_diagnostic()?).into_diagnostic()?;
    let gateway = ScriptedGateway::new(script)
        .with_resume_timeout(Duration::from_millis(cli.resume_timeout_ms));

    let config = WorkflowConfig {
        three_d_secure_version: cli.three_d_secure_version,
        ..WorkflowConfig::default()
    };
    let payment = ThreeDSecurePayment::with_config(Box::new(gateway), config);

    let (tx, rx) = tokio::sync::oneshot::channel();
    let run = payment
        .run_payment(Some(payload), move |outcome| {
            let _ = tx.send(outcome);
        })
        .into_diagnostic()?;
    run.await;
    let outcome = rx.await.into_diagnostic()?;

    let stdout = io::stdout();
    let mut writer = ReportWriter::new(stdout.lock());
    writer
        .write_report(&PaymentReport::from(&outcome))
        .into_diagnostic()?;

    outcome.map(|_| ()).into_diagnostic()
}
