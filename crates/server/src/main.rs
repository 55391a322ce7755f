mod config;
mod events;
mod server;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use config::ServerConfig;
use events::ServerEvent;
use rally::{MatchRules, MatchSettings};
use server::GameServer;

const MAX_IDLE: Duration = Duration::from_millis(10);

#[derive(Parser)]
#[command(name = "rally-server")]
#[command(about = "Authoritative two-player tennis server")]
struct Args {
    #[arg(long, default_value = "0.0.0.0")]
    bind: String,

    #[arg(short, long, default_value_t = rally::DEFAULT_PORT)]
    port: u16,

    #[arg(short, long, help = "Log at debug level")]
    debug_log: bool,

    #[arg(long, default_value_t = rally::DEFAULT_TICK_RATE)]
    tick_rate: u32,

    #[arg(
        long,
        default_value_t = rally::score::DEFAULT_SETS_TO_WIN,
        value_parser = clap::value_parser!(u32).range(1..=rally::score::MAX_SETS_TO_WIN as i64)
    )]
    sets_to_win: u32,

    #[arg(
        long,
        default_value_t = rally::score::DEFAULT_GAMES_TO_WIN_SET,
        value_parser = clap::value_parser!(u32).range(1..)
    )]
    games_per_set: u32,

    #[arg(long, help = "Wait for a new pair of players after a match instead of exiting")]
    rematch: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.debug_log { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    let rules = MatchRules {
        games_to_win_set: args.games_per_set,
        sets_to_win: args.sets_to_win,
    };
    rules.validate().context("invalid match rules")?;

    let config = ServerConfig {
        tick_rate: args.tick_rate,
        match_settings: MatchSettings {
            rules,
            ..Default::default()
        },
        rematch: args.rematch,
    };

    let bind_addr = format!("{}:{}", args.bind, args.port);
    let mut server = GameServer::new(&bind_addr, config)
        .with_context(|| format!("failed to bind {}", bind_addr))?;

    log::info!("Server started on {}", server.local_addr());

    let running = server.running();
    spawn_signal_watcher(Arc::clone(&running))?;

    while running.load(Ordering::SeqCst) {
        server.tick_once();

        for event in server.drain_events() {
            log_event(event);
        }

        thread::sleep(idle_time(server.time_to_next_tick()));
    }

    let stats = server.stats();
    server.shutdown_connections();
    for event in server.drain_events() {
        log_event(event);
    }

    let net = stats.network_stats;
    log::info!(
        "Served {} match(es) over {} ticks, stopped in {} with {} client(s) and score {}",
        stats.matches_played,
        stats.tick,
        stats.phase.as_str(),
        stats.client_count,
        server.state().score.summary()
    );
    log::info!(
        "Network: {} packets / {} bytes sent, {} packets / {} bytes received, {} dropped",
        net.packets_sent,
        net.bytes_sent,
        net.packets_received,
        net.bytes_received,
        net.packets_dropped
    );
    log::info!("Server shutting down");

    Ok(())
}

/// Sleep until the next tick, but wake often enough to accept new clients promptly.
fn idle_time(until_tick: Duration) -> Duration {
    until_tick.min(MAX_IDLE)
}

/// Waits for Ctrl-C on its own thread and clears `running`.
fn spawn_signal_watcher(running: Arc<AtomicBool>) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to build signal runtime")?;

    thread::Builder::new()
        .name("signal-watcher".into())
        .spawn(move || {
            match runtime.block_on(tokio::signal::ctrl_c()) {
                Ok(()) => {
                    log::info!("Interrupt received");
                    running.store(false, Ordering::SeqCst);
                }
                Err(e) => log::error!("Failed to listen for Ctrl-C: {}", e),
            }
        })
        .context("failed to spawn signal watcher")?;

    Ok(())
}

fn log_event(event: ServerEvent) {
    match event {
        ServerEvent::ClientConnected { player_id, addr } => {
            log::info!("Player {} connected from {}", player_id, addr);
        }
        ServerEvent::ClientDisconnected { player_id, reason } => {
            log::info!("Player {} {}", player_id, reason.as_str());
        }
        ServerEvent::ConnectionDenied { addr } => {
            log::warn!("Connection denied to {}: both player slots are taken", addr);
        }
        ServerEvent::PacketDropped { player_id, reason } => {
            log::warn!("Dropped packet from player {}: {}", player_id, reason);
        }
        ServerEvent::MatchEnded { winner } => log::info!("Player {} wins the match", winner),
        ServerEvent::Error { message } => log::error!("{}", message),
    }
}
