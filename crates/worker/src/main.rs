use anyhow::Context;
use clap::Parser;
use digest_core::domain::keywords::DigestConfig;
use digest_core::error::DigestError;
use digest_core::ingest::naver::NaverDatalabClient;
use digest_core::notify::{Notifier, StdoutNotifier, TelegramNotifier};
use digest_core::report::Locale;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "digest_worker")]
struct Args {
    /// Last date to request (YYYY-MM-DD). Defaults to yesterday in KST.
    #[arg(long)]
    end_date: Option<String>,

    /// Print the digest instead of sending it.
    #[arg(long)]
    dry_run: bool,

    /// Report language (ko or en).
    #[arg(long, default_value = "ko")]
    locale: Locale,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = digest_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();

    let result = run(&args, &settings).await;
    if let Err(err) = &result {
        sentry_anyhow::capture_anyhow(err);
        let diag = err.downcast_ref::<DigestError>();
        let error_kind = diag.map(DigestError::kind).unwrap_or("internal");
        let raw_body = diag.and_then(DigestError::raw_body).unwrap_or_default();
        tracing::error!(
            error_kind,
            raw_body,
            error = %format!("{err:#}"),
            "digest run failed"
        );
    }
    result
}

async fn run(args: &Args, settings: &digest_core::config::Settings) -> anyhow::Result<()> {
    settings.validate(!args.dry_run)?;
    let config = DigestConfig::from_env()?;

    let end_date = digest_core::time::kst::resolve_end_date(
        args.end_date.as_deref(),
        chrono::Utc::now(),
    )?;

    tracing::info!(
        start_date = %config.start_date,
        %end_date,
        groups = config.groups.len(),
        keywords = config.keyword_count(),
        dry_run = args.dry_run,
        "starting search trend digest"
    );

    let provider = NaverDatalabClient::from_settings(settings)?;
    let notifier: Box<dyn Notifier> = if args.dry_run {
        Box::new(StdoutNotifier)
    } else {
        Box::new(TelegramNotifier::from_settings(settings).context("telegram setup failed")?)
    };

    digest_core::pipeline::run_digest(
        &provider,
        notifier.as_ref(),
        &config,
        end_date,
        args.locale,
    )
    .await?;

    Ok(())
}

fn init_sentry(settings: &digest_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}
