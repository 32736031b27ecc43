use chrono::DateTime;
use clap::Parser;
use prism_feed::{
    CategoryRegistry, FeedController, FeedError, FetchConfig, HttpTransport, Sink, Story,
};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "prism-feed", about = "Unified hot-items feed across Hacker News, Reddit and RSS")]
struct Cli {
    /// Category to load.
    #[arg(short, long, default_value = "tech")]
    category: String,

    /// How many batches to pull before stopping.
    #[arg(short, long, default_value_t = 3)]
    pages: usize,

    /// List available categories and exit.
    #[arg(long)]
    list: bool,
}

/// Renders delivered stories as plain text lines.
struct StdoutSink;

impl Sink for StdoutSink {
    fn render(&self, story: &Story, position: usize) {
        let time = DateTime::from_timestamp(story.time, 0)
            .map(|t| t.format("%H:%M").to_string())
            .unwrap_or_else(|| "--:--".to_string());

        println!(
            "{:>3}. [{}] {} ({})",
            position + 1,
            time,
            story.title,
            story.domain
        );
        println!(
            "     {} points, by {} | {}",
            format_score(story.score),
            if story.author.is_empty() { "anonymous" } else { story.author.as_str() },
            story.comments_url
        );
    }

    fn on_exhausted(&self) {
        println!("-- end of feed --");
    }

    fn on_error(&self, err: &FeedError) {
        eprintln!("feed error: {err}");
    }
}

fn format_score(score: u32) -> String {
    if score >= 1000 {
        format!("{:.1}k", score as f64 / 1000.0)
    } else {
        score.to_string()
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let registry = CategoryRegistry::with_defaults();

    if cli.list {
        for key in registry.keys() {
            println!("{key}");
        }
        return Ok(());
    }

    let transport = Arc::new(HttpTransport::new(&FetchConfig::default()));
    let controller = FeedController::new(registry, transport, Arc::new(StdoutSink));

    info!(category = %cli.category, "loading feed");
    controller.activate_category(&cli.category).await?;

    for _ in 1..cli.pages {
        if !controller.request_more().await? {
            break;
        }
    }

    if let Some(session) = controller.session().await {
        info!(
            delivered = session.delivered,
            exhausted = session.exhausted,
            "done"
        );
    }

    Ok(())
}
