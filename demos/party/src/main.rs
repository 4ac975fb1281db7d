//! Three players on one device: a full round against the in-memory store.
//!
//! Run with `RUST_LOG=debug cargo run -p party` to watch the snapshots.

use std::sync::Arc;

use imposter::prelude::*;

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

fn render(who: &str, view: &ClientView) {
    match view {
        ClientView::Loading => println!("[{who}] ..."),
        ClientView::SignInFailed { message } => println!("[{who}] !! {message}"),
        ClientView::Landing { name, error } => {
            println!("[{who}] landing as {name:?}");
            if let Some(e) = error {
                println!("[{who}]   ! {e}");
            }
        }
        ClientView::Lobby {
            code,
            players,
            category,
            can_start,
            min_players,
            ..
        } => {
            let names: Vec<_> = players
                .iter()
                .map(|p| match (p.is_host, p.is_you) {
                    (true, true) => format!("{}* (Du)", p.name),
                    (true, false) => format!("{}*", p.name),
                    (false, true) => format!("{} (Du)", p.name),
                    (false, false) => p.name.clone(),
                })
                .collect();
            println!("[{who}] room {code} [{category}] {}", names.join(", "));
            if !can_start && players.len() < *min_players {
                println!("[{who}]   Mindestens {min_players} Spieler benötigt");
            }
        }
        ClientView::Playing { elapsed, role, .. } => match role {
            None => println!("[{who}] {elapsed} role hidden"),
            Some(Role::Imposter) => println!("[{who}] {elapsed} IMPOSTER"),
            Some(Role::Word { word, category }) => {
                println!("[{who}] {elapsed} {word} ({category})")
            }
        },
        ClientView::Revealed {
            imposter_name,
            secret_word,
            ..
        } => println!("[{who}] the imposter was {imposter_name}, the word was {secret_word}"),
    }
}

fn show(clients: &mut [(&str, GameClient<MemoryStore>)]) {
    for (who, client) in clients.iter_mut() {
        client.drain_events();
        render(who, &client.view());
    }
}

// ---------------------------------------------------------------------------
// The round
// ---------------------------------------------------------------------------

async fn player(store: &Arc<MemoryStore>, name: &str) -> Result<GameClient<MemoryStore>, ImposterError> {
    let ctx = ClientContextBuilder::new()
        .in_memory_preferences()
        .build(Arc::clone(store), Arc::new(AnonymousIdentity))
        .await?;
    let mut client = GameClient::new(ctx);
    client.wait_ready().await?;
    client.set_name(name);
    Ok(client)
}

/// Plays one round with `ticks` timer ticks and returns the host's view
/// at the reveal.
async fn play(store: Arc<MemoryStore>, ticks: usize) -> Result<ClientView, ImposterError> {
    let mut host = player(&store, "Ana").await?;
    let code = host.create_room().await?;
    tracing::info!(%code, "room open");

    let mut ben = player(&store, "Ben").await?;
    let mut cem = player(&store, "Cem").await?;

    // Too early: only the host is in.
    if let Err(e) = host.start_game().await {
        println!("[Ana] ! {}", e.user_message());
    }

    ben.join_room(&code.as_str().to_lowercase()).await?;
    cem.join_room(code.as_str()).await?;

    let mut table = [("Ana", host), ("Ben", ben), ("Cem", cem)];
    show(&mut table);

    table[0].1.change_category("Essen").await?;
    table[0].1.start_game().await?;
    show(&mut table);

    for (_, client) in table.iter_mut() {
        client.toggle_role();
    }
    show(&mut table);

    let host = &mut table[0].1;
    for _ in 0..ticks {
        if let Some(ClientEvent::Tick(secs)) = host.next_event().await {
            println!("[Ana] {}", format_elapsed(secs));
        }
    }

    host.reveal().await?;
    show(&mut table);
    let revealed = table[0].1.view();

    table[0].1.reset_game().await?;
    show(&mut table);

    for (_, client) in table {
        client.dispose();
    }
    Ok(revealed)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    play(Arc::new(MemoryStore::new()), 3).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_demo_round_reaches_reveal() {
        let store = Arc::new(MemoryStore::new());
        let view = play(Arc::clone(&store), 2).await.unwrap();

        match view {
            ClientView::Revealed {
                imposter_name,
                secret_word,
                is_host,
                ..
            } => {
                assert!(["Ana", "Ben", "Cem"].contains(&imposter_name.as_str()));
                let catalog = Catalog::builtin();
                assert!(catalog.words("Essen").unwrap().contains(&secret_word));
                assert!(is_host);
            }
            other => panic!("expected the reveal, got {other:?}"),
        }
    }
}
