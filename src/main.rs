use clap::Parser;
use onboard_scan::config::OnboardingConfig;
use onboard_scan::render::{render_description, render_snapshot};
use onboard_scan::{Onboarding, OnboardingSession};

mod args;
use args::Args;

#[tokio::main]
async fn main() {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    let onboarding = match build(&args) {
        Ok(onboarding) => onboarding,
        Err(e) => {
            ::log::error!("Failed to load configuration: {}", e);
            std::process::exit(2);
        }
    };

    let session = match onboarding.build() {
        Ok(session) => session,
        Err(e) => {
            ::log::error!("Failed to set up onboarding: {}", e);
            std::process::exit(2);
        }
    };

    if args.describe {
        describe(&session, &args.base_url).await;
    }

    if let Err(e) = scan(&session, &args.base_url).await {
        ::log::error!("Website analysis failed: {}", e);
        std::process::exit(1);
    }
}

fn build(args: &Args) -> onboard_scan::Result<Onboarding> {
    let mut onboarding = match &args.config {
        Some(path) => Onboarding::from_config_file(path)?,
        None => Onboarding::new(OnboardingConfig::default().with_env_overrides()?),
    };
    if let Some(delay_ms) = args.delay_ms {
        onboarding = onboarding.with_scan_delay_ms(delay_ms);
    }
    if args.announce_scraping {
        onboarding = onboarding.with_announce_scraping(true);
    }
    Ok(onboarding)
}

async fn describe(session: &OnboardingSession, url: &str) {
    let Some(handle) = session.describer.on_url_changed(url) else {
        ::log::info!("Skipping description lookup for {}", url);
        return;
    };
    println!("{}", render_description(&session.describer.field()));
    if let Err(e) = handle.wait().await {
        ::log::warn!("Description lookup failed: {}", e);
    }
    println!("{}", render_description(&session.describer.field()));
}

async fn scan(session: &OnboardingSession, base_url: &str) -> onboard_scan::Result<()> {
    let mut rx = session.tracker.subscribe();
    let handle = session.tracker.start_scan(base_url)?;
    let start_time = std::time::Instant::now();

    loop {
        let snapshot = rx.borrow_and_update().clone();
        println!("{}", render_snapshot(&snapshot));
        if !snapshot.in_progress || rx.changed().await.is_err() {
            break;
        }
    }

    let summary = handle.wait().await?;
    ::log::info!(
        "Analysis complete - {} pages completed, {} failed in {:.2} seconds",
        summary.completed,
        summary.failed,
        start_time.elapsed().as_secs_f64()
    );
    Ok(())
}
