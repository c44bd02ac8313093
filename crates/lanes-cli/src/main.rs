mod commands;
mod config;
mod render;

use std::time::{Duration, Instant};

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use lanes_client::{Completion, HttpApi, Intent, Room, TracingNotifier, transport};
use lanes_types::models::PageData;

use commands::View;
use config::Config;

/// How often banners are aged.
const TICK: Duration = Duration::from_millis(250);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lanes=debug,lanes_client=debug".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    let api = HttpApi::new(&config.base_url, config.session.room_id, config.session_cookie.clone())?;

    let mut room = Room::new(config.session.clone(), config.volume, Box::new(TracingNotifier));
    if let Some(path) = &config.page_data {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading {}", path.display()))?;
        let page: PageData = serde_json::from_str(&raw).context("parsing page data")?;
        info!(posts = page.post_history.len(), pinned = page.pinned.len(), "Hydrating room");
        room.bootstrap(page);
    }

    let (frame_tx, mut frame_rx) = mpsc::unbounded_channel::<String>();
    let (done_tx, mut done_rx) = mpsc::unbounded_channel::<Completion>();

    let ws_uri = config.ws_uri.clone();
    let heartbeat = config.heartbeat.clone();
    let mut push = tokio::spawn(async move { transport::run(&ws_uri, &heartbeat, frame_tx).await });

    info!(room = config.session.room_id, user = %config.session.my_name, "Joined room, /help for commands");
    print!("{}", render::feed(&room));
    print!("{}", render::pinned(&room));
    println!("{}", render::status(&room));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut ticker = tokio::time::interval(TICK);
    let mut last_shown = room.feed().iter().last().map(|m| m.id);

    loop {
        tokio::select! {
            Some(frame) = frame_rx.recv() => {
                if room.receive_frame(&frame) {
                    let newest = room.feed().iter().last();
                    if let Some(message) = newest.filter(|m| Some(m.id) != last_shown) {
                        println!("{}", render::message_line(message));
                        last_shown = Some(message.id);
                    }
                }
            }

            Some(done) = done_rx.recv() => {
                room.on_completion(done, Instant::now());
                println!("{}", render::status(&room));
            }

            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if line.trim().is_empty() {
                    continue;
                }
                match commands::parse(&line) {
                    Ok(command) => {
                        let outcome = commands::run(&mut room, command);
                        for intent in outcome.intents {
                            dispatch(&api, &done_tx, intent);
                        }
                        match outcome.show {
                            Some(View::Feed) => print!("{}", render::feed(&room)),
                            Some(View::Pinned) => print!("{}", render::pinned(&room)),
                            Some(View::Users) => print!("{}", render::users(&room)),
                            Some(View::Help) => println!("{}", commands::HELP),
                            None => {}
                        }
                        println!("{}", render::status(&room));
                    }
                    Err(e) => println!("{}", e),
                }
            }

            _ = ticker.tick() => room.tick(Instant::now()),

            result = &mut push => {
                match result {
                    Ok(Ok(())) => info!("Push channel closed"),
                    Ok(Err(e)) => warn!("Push channel failed: {}", e),
                    Err(e) => warn!("Push task aborted: {}", e),
                }
                break;
            }
        }
    }

    push.abort();
    Ok(())
}

/// Run one request in the background and hand its completion back to the loop.
fn dispatch(api: &HttpApi, done: &mpsc::UnboundedSender<Completion>, intent: Intent) {
    let api = api.clone();
    let done = done.clone();
    tokio::spawn(async move {
        let _ = done.send(api.execute(intent).await);
    });
}
