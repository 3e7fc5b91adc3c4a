//! RPS Arbiter
//!
//! Runs a demo match against a fresh engine: Alice creates, Bob joins,
//! Paper beats Rock, Alice redeems her victory token.

use tracing::info;
use tracing_subscriber::EnvFilter;

use rps_arbiter::{Address, Arbiter, ArbiterConfig, Move, VERSION};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ArbiterConfig::from_env();

    info!("RPS Arbiter v{}", VERSION);
    info!("Collection: {} ({})", config.collection.name, config.collection.symbol);
    info!("Self-join allowed: {}", config.allow_self_join);

    demo_match(config)
}

/// Demo function to exercise the engine end to end.
fn demo_match(config: ArbiterConfig) -> anyhow::Result<()> {
    info!("=== Starting Demo Match ===");

    let mut arbiter = Arbiter::new(config);
    let alice = Address::from_label("alice");
    let bob = Address::from_label("bob");

    info!("Alice: {}", alice);
    info!("Bob:   {}", bob);

    arbiter.create_game(alice);
    let game_id = arbiter.game_counter();
    info!("Game created with id {}", game_id);

    arbiter.join_game(game_id, bob)?;
    info!("Bob joined game {}", game_id);

    arbiter.submit_move(game_id, alice, Move::Paper as u8)?;
    info!("Alice played Paper");

    arbiter.submit_move(game_id, bob, Move::Rock as u8)?;
    info!("Bob played Rock");

    let game = arbiter.get_game(game_id)?;
    match game.winner {
        Some(winner) => info!("Winner: {}", winner),
        None => info!("Draw"),
    }

    let uri = "ipfs://victory1";
    let token_id = arbiter.redeem_victory_nft(game_id, uri, alice)?;
    info!("Token minted with id {}", token_id);
    info!("Owner: {}", arbiter.owner_of(token_id)?);
    info!("Token URI: {}", arbiter.token_uri(token_id)?);

    // Event log as observers would receive it
    for event in arbiter.take_events() {
        info!("Event {}", event.to_json()?);
    }

    info!("=== Verifying Determinism ===");
    let hash = arbiter.compute_hash();
    info!("Final State Hash: {}", hex::encode(hash));

    let restored = Arbiter::restore(arbiter.config().clone(), &arbiter.snapshot()?)?;
    let restored_hash = restored.compute_hash();
    info!("Restored State Hash: {}", hex::encode(restored_hash));

    anyhow::ensure!(hash == restored_hash, "snapshot restore changed the state digest");
    info!("DETERMINISM VERIFIED: Hashes match!");

    Ok(())
}
