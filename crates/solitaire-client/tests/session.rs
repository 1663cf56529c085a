//! End-to-end tests for the session client against an in-process stub
//! game server.
//!
//! The stub speaks the same JSON surface as the real engine server and
//! can be switched into failure modes (truncated bodies, missing keys)
//! to exercise the error taxonomy.

use std::collections::BTreeMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::State;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use serde_json::{Value, json};

use solitaire_client::config::SessionConfig;
use solitaire_client::error::ClientError;
use solitaire_client::session::SessionClient;
use solitaire_core::protocol::{Card, GameVariant, Suit};
use solitaire_core::snapshot::PileId;

// ---------------------------------------------------------------------------
// Stub server
// ---------------------------------------------------------------------------

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Behave like the real server.
    Ok,
    /// Answer every request with syntactically broken JSON.
    Malformed,
    /// Answer with valid JSON lacking the `variant`/`state` keys.
    MissingKeys,
}

struct Stub {
    mode: Mode,
    games_created: usize,
    state_hits: usize,
    piles: Option<BTreeMap<String, Vec<Card>>>,
}

type Shared = Arc<Mutex<Stub>>;

/// Standard Klondike deal from an unshuffled deck: seven tableau columns
/// of 1..=7 cards with the last one face-up, 24 face-down stock cards,
/// empty waste and foundations.
fn deal() -> BTreeMap<String, Vec<Card>> {
    let mut deck: Vec<Card> = Suit::ALL
        .iter()
        .flat_map(|&suit| {
            (1..=13).map(move |rank| Card {
                rank,
                suit,
                face_up: false,
            })
        })
        .collect();

    let mut piles = BTreeMap::new();
    for i in 0..7u8 {
        let mut column: Vec<Card> = deck.drain(..i as usize + 1).collect();
        if let Some(last) = column.last_mut() {
            last.face_up = true;
        }
        piles.insert(format!("tableau_{i}"), column);
    }
    piles.insert("stock".to_string(), deck);
    piles.insert("waste".to_string(), Vec::new());
    for i in 0..4 {
        piles.insert(format!("foundation_{i}"), Vec::new());
    }
    piles
}

fn state_json(piles: &BTreeMap<String, Vec<Card>>) -> Value {
    // Match the real encoder's layout: stock and waste are top-level keys
    // of `state`, only foundations and tableaus go under `piles`.
    let named: serde_json::Map<String, Value> = piles
        .iter()
        .filter(|(name, _)| name.as_str() != "stock" && name.as_str() != "waste")
        .map(|(name, cards)| (name.clone(), json!({"name": name, "cards": cards})))
        .collect();
    let empty = Vec::new();
    let stock = piles.get("stock").unwrap_or(&empty);
    let waste = piles.get("waste").unwrap_or(&empty);
    json!({
        "piles": named,
        "stock": {"name": "stock", "cards": stock},
        "waste": {"name": "waste", "cards": waste},
        "score": 0,
        "moves_count": 0,
        "time_elapsed": 0
    })
}

fn ok(v: Value) -> Response {
    axum::Json(v).into_response()
}

fn malformed() -> Response {
    ([(header::CONTENT_TYPE, "application/json")], r#"{"success": tr"#).into_response()
}

fn no_game() -> Response {
    (
        StatusCode::NOT_FOUND,
        axum::Json(json!({"success": false, "error": "No active game"})),
    )
        .into_response()
}

async fn new_handler(State(s): State<Shared>, body: String) -> Response {
    let mut stub = s.lock().unwrap();
    match stub.mode {
        Mode::Malformed => return malformed(),
        Mode::MissingKeys => return ok(json!({"success": true})),
        Mode::Ok => {}
    }
    stub.games_created += 1;
    stub.piles = Some(deal());
    let variant = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v.get("variant").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| "klondike".to_string());
    ok(json!({"success": true, "variant": variant, "score": 0, "moves": 0}))
}

async fn state_handler(State(s): State<Shared>) -> Response {
    let mut stub = s.lock().unwrap();
    stub.state_hits += 1;
    match stub.mode {
        Mode::Malformed => return malformed(),
        Mode::MissingKeys => return ok(json!({"success": true, "score": 0})),
        Mode::Ok => {}
    }
    match &stub.piles {
        Some(piles) => ok(
            json!({"success": true, "state": state_json(piles), "score": 0, "moves": 0}),
        ),
        None => no_game(),
    }
}

async fn variants_handler() -> Response {
    ok(json!({
        "success": true,
        "variants": ["klondike", "klondike-3"],
        "default": "klondike"
    }))
}

async fn draw_handler(State(s): State<Shared>) -> Response {
    let mut stub = s.lock().unwrap();
    let Some(piles) = stub.piles.as_mut() else {
        return no_game();
    };
    let Some(mut card) = piles.get_mut("stock").and_then(|p| p.pop()) else {
        return ok(json!({"success": false, "error": "Stock is empty"}));
    };
    card.face_up = true;
    piles.get_mut("waste").unwrap().push(card);
    let state = state_json(piles);
    ok(json!({"success": true, "state": state, "score": 0, "moves": 1}))
}

async fn move_handler(State(s): State<Shared>, _body: String) -> Response {
    let stub = s.lock().unwrap();
    if stub.piles.is_none() {
        return no_game();
    }
    // This stub never accepts a move; exercises the rejection path.
    ok(json!({"success": false, "error": "Illegal move"}))
}

async fn noop_action_handler(State(s): State<Shared>) -> Response {
    let stub = s.lock().unwrap();
    let Some(piles) = stub.piles.as_ref() else {
        return no_game();
    };
    ok(json!({"success": true, "state": state_json(piles), "score": 0, "moves": 0}))
}

async fn auto_move_handler(State(s): State<Shared>, body: String) -> Response {
    let stub = s.lock().unwrap();
    let Some(piles) = stub.piles.as_ref() else {
        return no_game();
    };
    let from = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| v.get("from").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| "waste".to_string());
    ok(json!({
        "success": true,
        "move": {"from": from, "to": "foundation_0", "count": 1},
        "state": state_json(piles),
        "score": 5,
        "moves": 2
    }))
}

async fn hint_handler(State(s): State<Shared>) -> Response {
    let stub = s.lock().unwrap();
    if stub.piles.is_none() {
        return no_game();
    }
    ok(json!({"success": false, "error": "No hints available"}))
}

async fn check_win_handler(State(s): State<Shared>) -> Response {
    let stub = s.lock().unwrap();
    if stub.piles.is_none() {
        return no_game();
    }
    ok(json!({"success": true, "game_won": false, "score": 0}))
}

async fn spawn_stub(mode: Mode) -> (SocketAddr, Shared) {
    let shared: Shared = Arc::new(Mutex::new(Stub {
        mode,
        games_created: 0,
        state_hits: 0,
        piles: None,
    }));
    let app = Router::new()
        .route("/new", post(new_handler))
        .route("/state", get(state_handler))
        .route("/variants", get(variants_handler))
        .route("/draw", post(draw_handler))
        .route("/move", post(move_handler))
        .route("/undo", post(noop_action_handler))
        .route("/redo", post(noop_action_handler))
        .route("/auto_move", post(auto_move_handler))
        .route("/hint", post(hint_handler))
        .route("/check_win", post(check_win_handler))
        .with_state(shared.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, shared)
}

fn client_for(addr: SocketAddr) -> SessionClient {
    SessionClient::new(SessionConfig::new(
        format!("http://{addr}"),
        GameVariant::Klondike,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_then_fetch_mirrors_the_deal() {
    let (addr, _stub) = spawn_stub(Mode::Ok).await;
    let mut client = client_for(addr);

    let snapshot = client.new_game().await.unwrap();
    assert_eq!(client.variant(), Some(GameVariant::Klondike));

    let stock = snapshot.cards(PileId::Stock);
    assert!(stock.len() <= 24, "stock has {} cards", stock.len());
    assert_eq!(snapshot.total_cards(), 52);

    for i in 0..4 {
        assert!(
            snapshot
                .cards(PileId::Foundation(i))
                .iter()
                .all(|c| c.face_up)
        );
    }
    for i in 0..7 {
        let column = snapshot.cards(PileId::Tableau(i));
        assert_eq!(column.len(), i as usize + 1);
        assert!(column.last().unwrap().face_up);
    }

    let summary = client.summarize().unwrap();
    assert_eq!(summary.stock_size, stock.len());
    assert_eq!(summary.stock_top.as_ref(), stock.last());
    assert_eq!(summary.tableau[6].total, 7);
    assert_eq!(summary.tableau[6].face_up, 1);
}

#[tokio::test]
async fn creating_twice_starts_a_fresh_game() {
    let (addr, stub) = spawn_stub(Mode::Ok).await;
    let mut client = client_for(addr);

    let first = client.new_game().await.unwrap();
    let second = client.new_game().await.unwrap();
    // No idempotency: each call produced an independent server-side game.
    assert_eq!(stub.lock().unwrap().games_created, 2);
    assert_eq!(first.total_cards(), 52);
    assert_eq!(second.total_cards(), 52);
}

#[tokio::test]
async fn malformed_state_body_leaves_snapshot_intact() {
    let (addr, stub) = spawn_stub(Mode::Ok).await;
    let mut client = client_for(addr);
    client.new_game().await.unwrap();

    stub.lock().unwrap().mode = Mode::Malformed;
    let err = client.fetch_state().await.unwrap_err();
    assert!(matches!(err, ClientError::Decode(_)), "{err}");
    assert_eq!(client.snapshot().unwrap().total_cards(), 52);
}

#[tokio::test]
async fn missing_keys_are_shape_mismatch_not_a_crash() {
    let (addr, stub) = spawn_stub(Mode::Ok).await;
    let mut client = client_for(addr);
    client.new_game().await.unwrap();

    stub.lock().unwrap().mode = Mode::MissingKeys;
    let err = client.fetch_state().await.unwrap_err();
    assert!(matches!(err, ClientError::ShapeMismatch(_)), "{err}");
    assert_eq!(client.snapshot().unwrap().total_cards(), 52);
}

#[tokio::test]
async fn failed_create_short_circuits_the_pipeline() {
    let (addr, stub) = spawn_stub(Mode::MissingKeys).await;
    let mut client = client_for(addr);

    // The /new answer lacks the `variant` discriminator, so the session
    // is never considered created and /state must not be contacted.
    let err = client.new_game().await.unwrap_err();
    assert!(matches!(err, ClientError::ShapeMismatch(_)), "{err}");
    assert_eq!(stub.lock().unwrap().state_hits, 0);
    assert!(client.snapshot().is_none());
    assert_eq!(client.variant(), None);
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    // Bind a port and drop the listener so the address refuses connections.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut client = client_for(addr);
    let err = client.new_game().await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)), "{err}");
    assert!(client.snapshot().is_none());
}

#[tokio::test]
async fn draw_moves_a_card_to_the_waste() {
    let (addr, _stub) = spawn_stub(Mode::Ok).await;
    let mut client = client_for(addr);
    client.new_game().await.unwrap();

    let outcome = client.draw().await.unwrap();
    assert_eq!(outcome.meta.moves, 1);

    let snapshot = client.snapshot().unwrap();
    assert_eq!(snapshot.cards(PileId::Stock).len(), 23);
    let waste = snapshot.cards(PileId::Waste);
    assert_eq!(waste.len(), 1);
    assert!(waste[0].face_up);
    assert_eq!(snapshot.total_cards(), 52);
}

#[tokio::test]
async fn rejected_action_leaves_snapshot_alone() {
    let (addr, _stub) = spawn_stub(Mode::Ok).await;
    let mut client = client_for(addr);
    client.new_game().await.unwrap();

    let err = client
        .move_cards(PileId::Waste, PileId::Foundation(0), 1)
        .await
        .unwrap_err();
    match err {
        ClientError::Rejected { message, status } => {
            assert_eq!(message, "Illegal move");
            assert_eq!(status, 200);
        }
        other => panic!("expected Rejected, got {other}"),
    }
    assert!(client.snapshot().unwrap().cards(PileId::Waste).is_empty());
}

#[tokio::test]
async fn hint_absence_is_not_an_error() {
    let (addr, _stub) = spawn_stub(Mode::Ok).await;
    let mut client = client_for(addr);
    client.new_game().await.unwrap();
    assert_eq!(client.hint().await.unwrap(), None);
}

#[tokio::test]
async fn auto_move_reports_the_chosen_move() {
    let (addr, _stub) = spawn_stub(Mode::Ok).await;
    let mut client = client_for(addr);
    client.new_game().await.unwrap();

    let chosen = client.auto_move(PileId::Waste).await.unwrap();
    assert_eq!(chosen.from, "waste");
    assert_eq!(chosen.to, "foundation_0");
    assert_eq!(client.meta().score, 5);
    assert_eq!(client.meta().moves, 2);
}

#[tokio::test]
async fn undo_and_redo_refresh_the_snapshot() {
    let (addr, _stub) = spawn_stub(Mode::Ok).await;
    let mut client = client_for(addr);
    client.new_game().await.unwrap();

    client.undo().await.unwrap();
    client.redo().await.unwrap();
    assert_eq!(client.snapshot().unwrap().total_cards(), 52);
}

#[tokio::test]
async fn variants_listing_requires_no_session() {
    let (addr, _stub) = spawn_stub(Mode::Ok).await;
    let client = client_for(addr);

    let list = client.list_variants().await.unwrap();
    assert_eq!(list.variants, vec!["klondike", "klondike-3"]);
    assert_eq!(list.default_variant, "klondike");
}

#[tokio::test]
async fn check_win_reports_an_unfinished_game() {
    let (addr, _stub) = spawn_stub(Mode::Ok).await;
    let mut client = client_for(addr);
    client.new_game().await.unwrap();

    let status = client.check_win().await.unwrap();
    assert!(!status.game_won);
}
