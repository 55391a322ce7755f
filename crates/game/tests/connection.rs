use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::sync::atomic::{AtomicU16, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use rally::net::{FRAME_SIZE, Frame};
use rally::{
    ClientMessage, ConnectionError, ConnectionManager, GameState, MoveInput, NetworkEndpoint,
    Packet, PacketError, PacketType, PlayerId, ServerMessage, simulation,
};

static PORT_COUNTER: AtomicU16 = AtomicU16::new(41000);

fn next_port() -> u16 {
    PORT_COUNTER.fetch_add(10, Ordering::SeqCst)
}

fn bind_server() -> (NetworkEndpoint, SocketAddr) {
    let addr: SocketAddr = format!("127.0.0.1:{}", next_port()).parse().unwrap();
    let endpoint = NetworkEndpoint::bind(addr).unwrap();
    let local = endpoint.local_addr();
    (endpoint, local)
}

fn connect(addr: SocketAddr) -> TcpStream {
    let stream = TcpStream::connect(addr).unwrap();
    stream
        .set_read_timeout(Some(Duration::from_millis(500)))
        .unwrap();
    stream
}

fn accept_one(
    endpoint: &NetworkEndpoint,
    connections: &mut ConnectionManager,
    timeout_ms: u64,
) -> Option<PlayerId> {
    let start = Instant::now();
    while start.elapsed() < Duration::from_millis(timeout_ms) {
        if let Some((stream, addr)) = endpoint.accept_pending().unwrap().into_iter().next() {
            return connections.attach(stream, addr).unwrap();
        }
        thread::sleep(Duration::from_millis(1));
    }
    panic!("no connection accepted");
}

fn wait_for_frame(
    connections: &mut ConnectionManager,
    player_id: PlayerId,
    timeout_ms: u64,
) -> Result<Option<Frame>, ConnectionError> {
    let start = Instant::now();
    while start.elapsed() < Duration::from_millis(timeout_ms) {
        let conn = connections.get_mut(player_id).unwrap();
        if let Some(frame) = conn.poll_frame()? {
            return Ok(Some(frame));
        }
        thread::sleep(Duration::from_millis(1));
    }
    Ok(None)
}

fn read_server_message(stream: &mut TcpStream) -> ServerMessage {
    let mut frame = [0u8; FRAME_SIZE];
    stream.read_exact(&mut frame).unwrap();
    let packet = Packet::decode(&frame).unwrap();
    ServerMessage::from_packet(&packet).unwrap()
}

#[test]
fn test_short_swing_is_dropped_and_connection_survives() {
    let (endpoint, addr) = bind_server();
    let mut connections = ConnectionManager::new();
    let mut client = connect(addr);

    let player_id = accept_one(&endpoint, &mut connections, 500).unwrap();
    assert_eq!(player_id, 0);

    let mut state = GameState::default();
    state.set_connected(player_id, true);
    let start_x = state.players[player_id].position.x;

    let short_swing = Packet::new(PacketType::PlayerSwing, &[0u8; 12]).unwrap();
    let input = ClientMessage::Input(MoveInput::RIGHT).to_packet();
    client.write_all(&short_swing.encode()).unwrap();
    client.write_all(&input.encode()).unwrap();

    let frame = wait_for_frame(&mut connections, player_id, 500)
        .unwrap()
        .expect("no frame received");
    let err = Packet::decode(&frame)
        .and_then(|p| ClientMessage::from_packet(&p))
        .unwrap_err();
    assert!(matches!(
        err,
        PacketError::SizeMismatch {
            packet_type: PacketType::PlayerSwing,
            ..
        }
    ));
    connections.get_mut(player_id).unwrap().record_dropped();
    assert!(connections.is_connected(player_id));

    let frame = wait_for_frame(&mut connections, player_id, 500)
        .unwrap()
        .expect("no frame received");
    let message = ClientMessage::from_packet(&Packet::decode(&frame).unwrap()).unwrap();
    assert!(simulation::apply_client_message(
        &mut state,
        player_id,
        &message,
        1.0 / 60.0
    ));
    assert!(state.players[player_id].position.x > start_x);

    let stats = connections.stats();
    assert_eq!(stats.packets_received, 2);
    assert_eq!(stats.packets_dropped, 1);
}

#[test]
fn test_third_client_is_closed_immediately() {
    let (endpoint, addr) = bind_server();
    let mut connections = ConnectionManager::new();

    let _first = connect(addr);
    assert_eq!(accept_one(&endpoint, &mut connections, 500), Some(0));
    let _second = connect(addr);
    assert_eq!(accept_one(&endpoint, &mut connections, 500), Some(1));

    let mut third = connect(addr);
    assert_eq!(accept_one(&endpoint, &mut connections, 500), None);
    assert_eq!(connections.connected_count(), 2);

    let mut buf = [0u8; 8];
    let read = third.read(&mut buf).unwrap_or(0);
    assert_eq!(read, 0);
}

#[test]
fn test_disconnect_frees_slot() {
    let (endpoint, addr) = bind_server();
    let mut connections = ConnectionManager::new();

    let first = connect(addr);
    assert_eq!(accept_one(&endpoint, &mut connections, 500), Some(0));
    let _second = connect(addr);
    assert_eq!(accept_one(&endpoint, &mut connections, 500), Some(1));

    drop(first);
    let result = wait_for_frame(&mut connections, 0, 500);
    assert!(matches!(result, Err(ConnectionError::Closed)));

    connections.disconnect(0);
    assert_eq!(connections.free_slot(), Some(0));
    assert!(connections.is_connected(1));

    let _returning = connect(addr);
    assert_eq!(accept_one(&endpoint, &mut connections, 500), Some(0));
}

#[test]
fn test_server_messages_reach_client() {
    let (endpoint, addr) = bind_server();
    let mut connections = ConnectionManager::new();
    let mut client = connect(addr);
    let player_id = accept_one(&endpoint, &mut connections, 500).unwrap();

    let state = GameState::default();
    connections
        .send_to(player_id, &ServerMessage::SetPlayerId(player_id).to_packet())
        .unwrap();
    let failed = connections.broadcast(&ServerMessage::BallState(state.ball.clone()).to_packet());
    assert!(failed.is_empty());

    assert_eq!(
        read_server_message(&mut client),
        ServerMessage::SetPlayerId(player_id)
    );
    match read_server_message(&mut client) {
        ServerMessage::BallState(ball) => assert_eq!(ball.position, state.ball.position),
        other => panic!("expected BallState, got {:?}", other),
    }

    assert_eq!(connections.stats().packets_sent, 2);
}
