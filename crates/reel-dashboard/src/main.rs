//! Dashboard binary: follows the signed-in user's jobs and logs every change.

use anyhow::Context;
use tracing::{error, info};

use reel_dashboard::telemetry::init_tracing;
use reel_dashboard::{ActiveJobsBadge, DashboardConfig, DashboardSession, DashboardState};
use reel_firestore::{FirestoreClient, MovieRepository};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Dashboard failed: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    // Install rustls crypto provider (required for TLS/HTTPS)
    rustls::crypto::ring::default_provider()
        .install_default()
        .map_err(|_| anyhow::anyhow!("Failed to install rustls crypto provider"))?;

    dotenvy::dotenv().ok();
    init_tracing()?;

    info!("Starting reel-dashboard");

    let config = DashboardConfig::from_env()?;
    info!("Dashboard config: {:?}", config);

    let client = FirestoreClient::from_env().context("Failed to create Firestore client")?;
    let repo = MovieRepository::new(client);

    let mut session = DashboardSession::open(repo.clone(), &config.user_id, config.poll_interval);
    let mut badge = ActiveJobsBadge::open(&repo, &config.user_id, config.poll_interval);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal");
                break;
            }
            state = session.next() => match state {
                Some(DashboardState::Ready(cards)) => {
                    info!(jobs = cards.len(), "Job list updated");
                    for card in &cards {
                        info!(
                            job_id = %card.job_id,
                            status = card.status_text,
                            progress = card.view.progress_percent,
                            stage = card.view.active_stage.map(|s| s.label()).unwrap_or("-"),
                            "{}",
                            card.title
                        );
                    }
                }
                Some(DashboardState::Loading) => {}
                None => break,
            },
            count = badge.next() => match count {
                Some(count) => info!(active = count, "Active jobs"),
                None => break,
            },
        }
    }

    badge.close().await;
    session.close().await;
    info!("Dashboard shutdown complete");
    Ok(())
}
