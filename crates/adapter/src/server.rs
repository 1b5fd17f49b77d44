//! Stream server for the headless adapter
//!
//! [`AdapterSession`] is the synchronous protocol state machine: one request
//! line in, zero or more reply messages out. [`run`] drives it over any async
//! byte stream (stdio in the `cascade-adapter` binary, `tokio::io::duplex` in
//! tests).

use anyhow::Context;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::AdapterConfig;
use crate::core::{CascadeEngine, EngineError, SessionConfig, SwapOutcome};
use crate::engine::find_swaps;
use crate::protocol::*;

/// A reply queued for the client
#[derive(Debug, Clone)]
pub enum Outbound {
    Welcome(WelcomeMessage),
    Ack(AckMessage),
    Events(EventsMessage),
    Observation(ObservationMessage),
    Hint(HintMessage),
    Error(ErrorMessage),
}

impl Outbound {
    /// Serialize into `buf` without the trailing newline
    pub fn write_json(&self, buf: &mut Vec<u8>) -> serde_json::Result<()> {
        match self {
            Outbound::Welcome(m) => serde_json::to_writer(buf, m),
            Outbound::Ack(m) => serde_json::to_writer(buf, m),
            Outbound::Events(m) => serde_json::to_writer(buf, m),
            Outbound::Observation(m) => serde_json::to_writer(buf, m),
            Outbound::Hint(m) => serde_json::to_writer(buf, m),
            Outbound::Error(m) => serde_json::to_writer(buf, m),
        }
    }

    pub fn error_code(&self) -> Option<ErrorCode> {
        match self {
            Outbound::Error(e) => Some(e.code),
            _ => None,
        }
    }
}

fn error(seq: u64, code: ErrorCode, message: &str) -> Outbound {
    Outbound::Error(create_error(seq, code, message))
}

/// Protocol state for one client stream
pub struct AdapterSession {
    config: SessionConfig,
    engine: CascadeEngine,
    handshaken: bool,
    last_seq: Option<u64>,
}

impl AdapterSession {
    pub fn new(config: SessionConfig) -> Result<Self, EngineError> {
        Ok(Self {
            config,
            engine: Self::fresh_engine(config)?,
            handshaken: false,
            last_seq: None,
        })
    }

    fn fresh_engine(config: SessionConfig) -> Result<CascadeEngine, EngineError> {
        let mut engine = CascadeEngine::new(config)?;
        // Population events are not part of any reply
        engine.drain_events();
        Ok(engine)
    }

    pub fn engine(&self) -> &CascadeEngine {
        &self.engine
    }

    pub fn is_handshaken(&self) -> bool {
        self.handshaken
    }

    /// Handle one request line.
    pub fn handle_line(&mut self, line: &str) -> Vec<Outbound> {
        let msg = match parse_message(line) {
            Ok(msg) => msg,
            Err(e) => {
                warn!(error = %e, "malformed message");
                return vec![error(
                    extract_seq(line),
                    ErrorCode::InvalidMessage,
                    &format!("malformed message: {}", e),
                )];
            }
        };
        let seq = msg.seq();

        if !self.handshaken && !matches!(msg, ParsedMessage::Hello(_)) {
            return vec![error(
                seq,
                ErrorCode::HandshakeRequired,
                "send hello before any other message",
            )];
        }

        // Sequencing: enforce monotonic seq per stream.
        if let Some(prev) = self.last_seq {
            if seq <= prev {
                return vec![error(
                    seq,
                    ErrorCode::StaleSeq,
                    "seq must be strictly increasing",
                )];
            }
        }
        self.last_seq = Some(seq);

        match msg {
            ParsedMessage::Hello(hello) => {
                self.handshaken = true;
                if let Some(client) = hello.client.as_ref() {
                    info!(client = %client.name, version = %client.version, "client hello");
                }
                let board = self.engine.board();
                vec![Outbound::Welcome(create_welcome(
                    seq,
                    board.width(),
                    board.height(),
                ))]
            }
            ParsedMessage::Swap(swap) => self.handle_swap(swap),
            ParsedMessage::Hint(_) => {
                let hints = find_swaps(&self.engine);
                vec![Outbound::Hint(create_hint(seq, &hints))]
            }
            ParsedMessage::Observe(_) => {
                vec![Outbound::Observation(create_observation(
                    seq,
                    &self.engine.snapshot(),
                ))]
            }
            ParsedMessage::Restart(restart) => self.handle_restart(restart),
            ParsedMessage::Unknown(unknown) => vec![error(
                seq,
                ErrorCode::InvalidMessage,
                &format!("unknown message type {}", unknown.msg_type),
            )],
        }
    }

    fn handle_swap(&mut self, swap: SwapMessage) -> Vec<Outbound> {
        let [x1, y1] = swap.from;
        let [x2, y2] = swap.to;
        let result = self.engine.request_swap(x1, y1, x2, y2);
        let events = self.engine.drain_events();

        match result {
            Ok(SwapOutcome::Resolved { path, report }) => {
                debug!(
                    seq = swap.seq,
                    path = path.as_str(),
                    rounds = report.rounds,
                    "swap resolved"
                );
                vec![
                    Outbound::Ack(create_ack(
                        swap.seq,
                        path,
                        report,
                        self.engine.moves_remaining(),
                    )),
                    Outbound::Events(create_events(swap.seq, events)),
                ]
            }
            Ok(SwapOutcome::Rejected(reason)) => {
                vec![error(swap.seq, reason.into(), reason.message())]
            }
            Err(e) => {
                if e.is_fatal() {
                    warn!(error = %e, "session aborted");
                }
                vec![error(swap.seq, ErrorCode::from(&e), &e.to_string())]
            }
        }
    }

    fn handle_restart(&mut self, restart: RestartMessage) -> Vec<Outbound> {
        let config = match restart.seed {
            Some(seed) => self.config.with_seed(seed),
            None => self.config,
        };
        match Self::fresh_engine(config) {
            Ok(engine) => {
                info!(seed = config.seed, "session restarted");
                self.engine = engine;
                vec![Outbound::Observation(create_observation(
                    restart.seq,
                    &self.engine.snapshot(),
                ))]
            }
            Err(e) => vec![error(restart.seq, ErrorCode::from(&e), &e.to_string())],
        }
    }
}

/// Append every line sent on the returned channel to `path`.
///
/// The task ends once the sender is dropped and the file is flushed.
fn spawn_wire_log(path: String) -> (mpsc::UnboundedSender<Vec<u8>>, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::unbounded_channel::<Vec<u8>>();
    let handle = tokio::spawn(async move {
        use tokio::fs::OpenOptions;

        let mut file = match OpenOptions::new().create(true).append(true).open(&path).await {
            Ok(f) => f,
            Err(e) => {
                warn!(error = %e, path = %path, "wire log disabled");
                return;
            }
        };

        while let Some(mut line) = rx.recv().await {
            line.push(b'\n');
            if file.write_all(&line).await.is_err() {
                break;
            }
        }

        if let Err(e) = file.flush().await {
            warn!(error = %e, path = %path, "wire log flush failed");
        }
    });
    (tx, handle)
}

/// Serve one client until its input stream ends.
///
/// With a wire log configured, returns only after every logged line has
/// reached the file.
pub async fn run<R, W>(config: AdapterConfig, reader: R, mut writer: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut session =
        AdapterSession::new(config.session).context("invalid session configuration")?;
    let wire_log = config.log_path.clone().map(spawn_wire_log);

    info!(
        width = config.session.width,
        height = config.session.height,
        seed = config.session.seed,
        "adapter ready"
    );

    let served = serve_lines(
        &mut session,
        reader,
        &mut writer,
        wire_log.as_ref().map(|(tx, _)| tx),
    )
    .await;

    if let Some((tx, handle)) = wire_log {
        drop(tx);
        if let Err(e) = handle.await {
            warn!(error = %e, "wire log task failed");
        }
    }

    info!(moves_made = session.engine().state().moves_made, "client disconnected");
    served
}

async fn serve_lines<R, W>(
    session: &mut AdapterSession,
    reader: R,
    writer: &mut W,
    wire_log: Option<&mpsc::UnboundedSender<Vec<u8>>>,
) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = reader.lines();
    let mut buf: Vec<u8> = Vec::with_capacity(4096);

    while let Some(line) = lines.next_line().await? {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if let Some(tx) = wire_log {
            let _ = tx.send(trimmed.as_bytes().to_vec());
        }

        for reply in session.handle_line(trimmed) {
            buf.clear();
            if let Err(e) = reply.write_json(&mut buf) {
                warn!(error = %e, "failed to encode reply");
                continue;
            }
            if let Some(tx) = wire_log {
                let _ = tx.send(buf.clone());
            }
            buf.push(b'\n');
            writer.write_all(&buf).await?;
        }
        writer.flush().await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SessionOutcome;

    fn session() -> AdapterSession {
        AdapterSession::new(SessionConfig::default()).unwrap()
    }

    fn hello(s: &mut AdapterSession) {
        let out = s.handle_line(r#"{"type":"hello","seq":1}"#);
        assert!(matches!(out.as_slice(), [Outbound::Welcome(_)]));
    }

    #[test]
    fn test_handshake_required_before_commands() {
        let mut s = session();
        let out = s.handle_line(r#"{"type":"observe","seq":1}"#);
        assert_eq!(out[0].error_code(), Some(ErrorCode::HandshakeRequired));
        assert!(!s.is_handshaken());

        hello(&mut s);
        assert!(s.is_handshaken());
    }

    #[test]
    fn test_stale_seq_is_rejected() {
        let mut s = session();
        hello(&mut s);
        let out = s.handle_line(r#"{"type":"observe","seq":1}"#);
        assert_eq!(out[0].error_code(), Some(ErrorCode::StaleSeq));
        let out = s.handle_line(r#"{"type":"observe","seq":2}"#);
        assert!(matches!(out.as_slice(), [Outbound::Observation(_)]));
    }

    #[test]
    fn test_rejected_swap_keeps_move_budget() {
        let mut s = session();
        hello(&mut s);
        let out = s.handle_line(r#"{"type":"swap","seq":2,"from":[0,0],"to":[2,0]}"#);
        assert_eq!(out[0].error_code(), Some(ErrorCode::NotAdjacent));
        assert_eq!(s.engine().moves_remaining(), 30);
    }

    #[test]
    fn test_out_of_bounds_swap() {
        let mut s = session();
        hello(&mut s);
        let out = s.handle_line(r#"{"type":"swap","seq":2,"from":[0,0],"to":[-1,0]}"#);
        assert_eq!(out[0].error_code(), Some(ErrorCode::InvalidCoordinate));
    }

    #[test]
    fn test_hinted_swap_is_acked_with_events() {
        let (mut s, h) = (1..50)
            .find_map(|seed| {
                let s = AdapterSession::new(SessionConfig::default().with_seed(seed)).unwrap();
                let h = find_swaps(s.engine()).first().copied()?;
                Some((s, h))
            })
            .expect("some seed has a valid swap");
        hello(&mut s);
        let line = format!(
            r#"{{"type":"swap","seq":2,"from":[{},{}],"to":[{},{}]}}"#,
            h.from.x, h.from.y, h.to.x, h.to.y
        );
        let out = s.handle_line(&line);
        match out.as_slice() {
            [Outbound::Ack(ack), Outbound::Events(ev)] => {
                assert_eq!(ack.moves_remaining, 29);
                assert_eq!(ack.path, PathLower::from(h.path));
                assert!(!ev.events.is_empty());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_restart_with_seed_resets_session() {
        let mut s = session();
        hello(&mut s);
        let out = s.handle_line(r#"{"type":"restart","seq":2,"seed":42}"#);
        match out.as_slice() {
            [Outbound::Observation(obs)] => {
                assert_eq!(obs.seed, 42);
                assert_eq!(obs.moves_remaining, 30);
                assert_eq!(obs.outcome, SessionOutcome::Playing.as_str());
                assert_eq!(obs.board.len(), 8);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_unknown_and_malformed_messages() {
        let mut s = session();
        hello(&mut s);
        let out = s.handle_line(r#"{"type":"dance","seq":2}"#);
        assert_eq!(out[0].error_code(), Some(ErrorCode::InvalidMessage));
        let out = s.handle_line("{not json");
        assert_eq!(out[0].error_code(), Some(ErrorCode::InvalidMessage));
    }

    #[tokio::test]
    async fn test_run_over_duplex() {
        let (client, server) = tokio::io::duplex(64 * 1024);
        let (server_r, server_w) = tokio::io::split(server);
        let task = tokio::spawn(run(
            AdapterConfig::default(),
            tokio::io::BufReader::new(server_r),
            server_w,
        ));

        let (client_r, mut client_w) = tokio::io::split(client);
        client_w
            .write_all(b"{\"type\":\"hello\",\"seq\":1}\n{\"type\":\"observe\",\"seq\":2}\n")
            .await
            .unwrap();
        client_w.shutdown().await.unwrap();

        let mut lines = tokio::io::BufReader::new(client_r).lines();
        let welcome = lines.next_line().await.unwrap().unwrap();
        let obs = lines.next_line().await.unwrap().unwrap();
        assert!(welcome.contains("\"type\":\"welcome\""));
        assert!(obs.contains("\"type\":\"observation\""));

        task.await.unwrap().unwrap();
    }
}
