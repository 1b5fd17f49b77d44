//! Protocol module - JSON message types for the headless adapter
//!
//! Line-delimited JSON, one object per line. Every message has `type` and
//! `seq`; replies echo the `seq` of the request they answer.

use serde::{Deserialize, Serialize};

use crate::core::{CascadeReport, EngineError, SessionSnapshot};
use crate::engine::SwapHint;
use crate::types::{GameEvent, Pos, ResolutionPath, SwapRejection};

/// Protocol version announced in `welcome`
pub const PROTOCOL_VERSION: &str = "1.0.0";

// ============== Client -> Adapter Messages ==============

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

/// Client hello message (first message on the stream)
#[derive(Debug, Clone, Deserialize)]
pub struct HelloMessage {
    pub seq: u64,
    #[serde(default)]
    pub client: Option<ClientInfo>,
}

/// Swap request; coordinates are signed so the adapter can report bad ones
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SwapMessage {
    pub seq: u64,
    pub from: [i16; 2],
    pub to: [i16; 2],
}

/// `hint` and `observe` carry nothing beyond their sequence number
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct SeqOnlyMessage {
    pub seq: u64,
}

/// Start a new session; without a seed the configured one is reused
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RestartMessage {
    pub seq: u64,
    #[serde(default)]
    pub seed: Option<u32>,
}

/// Parsed incoming message
#[derive(Debug, Clone)]
pub enum ParsedMessage {
    Hello(HelloMessage),
    Swap(SwapMessage),
    Hint(SeqOnlyMessage),
    Observe(SeqOnlyMessage),
    Restart(RestartMessage),
    Unknown(UnknownMessage),
}

impl ParsedMessage {
    pub fn seq(&self) -> u64 {
        match self {
            ParsedMessage::Hello(m) => m.seq,
            ParsedMessage::Swap(m) => m.seq,
            ParsedMessage::Hint(m) | ParsedMessage::Observe(m) => m.seq,
            ParsedMessage::Restart(m) => m.seq,
            ParsedMessage::Unknown(m) => m.seq,
        }
    }
}

/// Well-formed JSON with a `type` the adapter does not know
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMessage {
    pub seq: u64,
    pub msg_type: String,
}

/// Parse one protocol line.
///
/// Unknown `type` values are not a parse error; they come back as
/// [`ParsedMessage::Unknown`] so the caller can answer with the right `seq`.
pub fn parse_message(json: &str) -> Result<ParsedMessage, serde_json::Error> {
    #[derive(Debug, Deserialize)]
    #[serde(tag = "type", rename_all = "snake_case")]
    enum InboundMessage {
        Hello(HelloMessage),
        Swap(SwapMessage),
        Hint(SeqOnlyMessage),
        Observe(SeqOnlyMessage),
        Restart(RestartMessage),
    }

    const KNOWN: [&str; 5] = ["hello", "swap", "hint", "observe", "restart"];

    match serde_json::from_str::<InboundMessage>(json) {
        Ok(InboundMessage::Hello(m)) => Ok(ParsedMessage::Hello(m)),
        Ok(InboundMessage::Swap(m)) => Ok(ParsedMessage::Swap(m)),
        Ok(InboundMessage::Hint(m)) => Ok(ParsedMessage::Hint(m)),
        Ok(InboundMessage::Observe(m)) => Ok(ParsedMessage::Observe(m)),
        Ok(InboundMessage::Restart(m)) => Ok(ParsedMessage::Restart(m)),
        Err(e) => {
            #[derive(Debug, Deserialize)]
            struct Envelope {
                #[serde(rename = "type")]
                msg_type: Option<String>,
                seq: Option<u64>,
            }
            let envelope = serde_json::from_str::<Envelope>(json)?;
            match envelope.msg_type {
                Some(t) if !KNOWN.contains(&t.as_str()) => {
                    Ok(ParsedMessage::Unknown(UnknownMessage {
                        seq: envelope.seq.unwrap_or(0),
                        msg_type: t,
                    }))
                }
                _ => Err(e),
            }
        }
    }
}

/// Best-effort `seq` of a line that failed to parse, for the error reply
pub fn extract_seq(json: &str) -> u64 {
    serde_json::from_str::<serde_json::Value>(json)
        .ok()
        .and_then(|v| v.get("seq").and_then(|s| s.as_u64()))
        .unwrap_or(0)
}

// ============== Adapter -> Client Messages ==============

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WelcomeType {
    #[serde(rename = "welcome")]
    Welcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckType {
    #[serde(rename = "ack")]
    Ack,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AckStatus {
    #[serde(rename = "ok")]
    Ok,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventsType {
    #[serde(rename = "events")]
    Events,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObservationType {
    #[serde(rename = "observation")]
    Observation,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HintType {
    #[serde(rename = "hint")]
    Hint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorType {
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    HandshakeRequired,
    InvalidMessage,
    StaleSeq,
    InvalidCoordinate,
    NotAdjacent,
    BlockerEndpoint,
    EmptyEndpoint,
    NotPlaying,
    NoMovesLeft,
    NoMatch,
    SessionAborted,
}

impl From<SwapRejection> for ErrorCode {
    fn from(value: SwapRejection) -> Self {
        match value {
            SwapRejection::NotAdjacent => ErrorCode::NotAdjacent,
            SwapRejection::BlockerEndpoint => ErrorCode::BlockerEndpoint,
            SwapRejection::EmptyEndpoint => ErrorCode::EmptyEndpoint,
            SwapRejection::NotPlaying => ErrorCode::NotPlaying,
            SwapRejection::NoMovesLeft => ErrorCode::NoMovesLeft,
            SwapRejection::NoMatch => ErrorCode::NoMatch,
        }
    }
}

impl From<&EngineError> for ErrorCode {
    fn from(value: &EngineError) -> Self {
        match value {
            EngineError::InvalidCoordinate { .. } => ErrorCode::InvalidCoordinate,
            EngineError::InvalidConfig(_) | EngineError::InvalidLayout(_) => {
                ErrorCode::InvalidMessage
            }
            EngineError::Invariant(_) => ErrorCode::SessionAborted,
        }
    }
}

/// Welcome message (response to hello)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WelcomeMessage {
    #[serde(rename = "type")]
    pub msg_type: WelcomeType,
    pub seq: u64,
    pub protocol_version: String,
    pub width: u8,
    pub height: u8,
}

/// Accepted swap
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AckMessage {
    #[serde(rename = "type")]
    pub msg_type: AckType,
    pub seq: u64,
    pub status: AckStatus,
    pub path: PathLower,
    pub moves_remaining: u32,
    pub report: ReportPayload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathLower {
    Line,
    Wildcard,
    Match,
}

impl From<ResolutionPath> for PathLower {
    fn from(value: ResolutionPath) -> Self {
        match value {
            ResolutionPath::LineActivation => PathLower::Line,
            ResolutionPath::WildcardActivation => PathLower::Wildcard,
            ResolutionPath::Match => PathLower::Match,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPayload {
    pub rounds: u32,
    pub tiles_destroyed: u32,
    pub blockers_destroyed: u32,
    pub specials_spawned: u32,
}

impl From<CascadeReport> for ReportPayload {
    fn from(r: CascadeReport) -> Self {
        Self {
            rounds: r.rounds,
            tiles_destroyed: r.tiles_destroyed,
            blockers_destroyed: r.blockers_destroyed,
            specials_spawned: r.specials_spawned,
        }
    }
}

/// Core events produced while handling one request, in emission order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsMessage {
    #[serde(rename = "type")]
    pub msg_type: EventsType,
    pub seq: u64,
    pub events: Vec<EventPayload>,
}

/// Wire form of a [`GameEvent`]; tiles use their one-character text code
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EventPayload {
    TileDestroyed { pos: [u8; 2], tile: char },
    TileSpawned { pos: [u8; 2], tile: char },
    TileMoved { from: [u8; 2], to: [u8; 2], tile: char },
    MoveConsumed { moves_remaining: u32 },
    SessionEnded { outcome: String },
    SwapRejected { from: [u8; 2], to: [u8; 2], reason: String },
    CascadeSettled { rounds: u32 },
}

fn xy(pos: Pos) -> [u8; 2] {
    [pos.x, pos.y]
}

impl From<GameEvent> for EventPayload {
    fn from(value: GameEvent) -> Self {
        match value {
            GameEvent::TileDestroyed { pos, tile } => EventPayload::TileDestroyed {
                pos: xy(pos),
                tile: tile.as_char(),
            },
            GameEvent::TileSpawned { pos, tile } => EventPayload::TileSpawned {
                pos: xy(pos),
                tile: tile.as_char(),
            },
            GameEvent::TileMoved { from, to, tile } => EventPayload::TileMoved {
                from: xy(from),
                to: xy(to),
                tile: tile.as_char(),
            },
            GameEvent::MoveConsumed { moves_remaining } => {
                EventPayload::MoveConsumed { moves_remaining }
            }
            GameEvent::SessionEnded { outcome } => EventPayload::SessionEnded {
                outcome: outcome.as_str().to_string(),
            },
            GameEvent::SwapRejected { from, to, reason } => EventPayload::SwapRejected {
                from: xy(from),
                to: xy(to),
                reason: reason.code().to_string(),
            },
            GameEvent::CascadeSettled { rounds } => EventPayload::CascadeSettled { rounds },
        }
    }
}

/// Session state; `board` rows run top to bottom
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservationMessage {
    #[serde(rename = "type")]
    pub msg_type: ObservationType,
    pub seq: u64,
    pub width: u8,
    pub height: u8,
    pub board: Vec<String>,
    pub moves_remaining: u32,
    pub moves_made: u32,
    pub blockers_remaining: u32,
    pub outcome: String,
    pub seed: u32,
    pub board_hash: StateHash,
}

/// 64-bit hash rendered as a fixed-width hex string (JSON numbers lose precision)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateHash(pub u64);

impl Serialize for StateHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&format!("{:016x}", self.0))
    }
}

impl<'de> Deserialize<'de> for StateHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        u64::from_str_radix(&s, 16)
            .map(StateHash)
            .map_err(|_| serde::de::Error::custom("invalid state hash"))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HintMessage {
    #[serde(rename = "type")]
    pub msg_type: HintType,
    pub seq: u64,
    pub swaps: Vec<HintSwap>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HintSwap {
    pub from: [u8; 2],
    pub to: [u8; 2],
    pub path: PathLower,
    pub tiles_destroyed: u32,
    pub blockers_destroyed: u32,
}

impl From<&SwapHint> for HintSwap {
    fn from(h: &SwapHint) -> Self {
        Self {
            from: xy(h.from),
            to: xy(h.to),
            path: h.path.into(),
            tiles_destroyed: h.report.tiles_destroyed,
            blockers_destroyed: h.report.blockers_destroyed,
        }
    }
}

/// Error message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorMessage {
    #[serde(rename = "type")]
    pub msg_type: ErrorType,
    pub seq: u64,
    pub code: ErrorCode,
    pub message: String,
}

// ============== Utility Functions ==============

pub fn create_welcome(seq: u64, width: u8, height: u8) -> WelcomeMessage {
    WelcomeMessage {
        msg_type: WelcomeType::Welcome,
        seq,
        protocol_version: PROTOCOL_VERSION.to_string(),
        width,
        height,
    }
}

pub fn create_ack(
    seq: u64,
    path: ResolutionPath,
    report: CascadeReport,
    moves_remaining: u32,
) -> AckMessage {
    AckMessage {
        msg_type: AckType::Ack,
        seq,
        status: AckStatus::Ok,
        path: path.into(),
        moves_remaining,
        report: report.into(),
    }
}

pub fn create_events(seq: u64, events: impl IntoIterator<Item = GameEvent>) -> EventsMessage {
    EventsMessage {
        msg_type: EventsType::Events,
        seq,
        events: events.into_iter().map(EventPayload::from).collect(),
    }
}

pub fn create_observation(seq: u64, snap: &SessionSnapshot) -> ObservationMessage {
    ObservationMessage {
        msg_type: ObservationType::Observation,
        seq,
        width: snap.width,
        height: snap.height,
        board: snap.rows_top_down(),
        moves_remaining: snap.moves_remaining,
        moves_made: snap.moves_made,
        blockers_remaining: snap.blockers_remaining,
        outcome: snap.outcome.as_str().to_string(),
        seed: snap.seed,
        board_hash: StateHash(snap.board_hash),
    }
}

pub fn create_hint(seq: u64, hints: &[SwapHint]) -> HintMessage {
    HintMessage {
        msg_type: HintType::Hint,
        seq,
        swaps: hints.iter().map(HintSwap::from).collect(),
    }
}

pub fn create_error(seq: u64, code: ErrorCode, message: &str) -> ErrorMessage {
    ErrorMessage {
        msg_type: ErrorType::Error,
        seq,
        code,
        message: message.to_string(),
    }
}
