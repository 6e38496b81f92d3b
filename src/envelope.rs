//! Outbound message envelopes
//!
//! Every line the operator types is wrapped into a fixed-shape JSON record
//! before it goes on the wire. Apart from the timestamp and the echoed text
//! all fields are constants; the records are test data for the server on the
//! other end, not a negotiated protocol.

use serde::Serialize;
use std::time::{SystemTime, UNIX_EPOCH};

const SELF_ID: u64 = 1234567890;
const MESSAGE_ID: u64 = 112233;
const USER_ID: u64 = 9876543210;
const FONT: u32 = 123;

const SENDER_NICKNAME: &str = "小明";
const SENDER_SEX: &str = "male";
const SENDER_AGE: u32 = 18;

/// Which envelope wraps operator text.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum EnvelopeKind {
    /// Private chat message event with a sender profile.
    #[default]
    Private,
    /// Bare `user_input` record with a fractional timestamp.
    Plain,
}

/// Private chat message carrying the operator's text.
#[derive(Debug, Serialize)]
pub struct OutboundEnvelope<'a> {
    pub time: u64,
    pub self_id: u64,
    pub post_type: &'static str,
    pub message_type: &'static str,
    pub sub_type: &'static str,
    pub message_id: u64,
    pub user_id: u64,
    pub message: [MessageSegment<'a>; 1],
    pub raw_message: &'a str,
    pub font: u32,
    pub sender: SenderProfile,
}

#[derive(Debug, Serialize)]
pub struct MessageSegment<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub data: TextData<'a>,
}

#[derive(Debug, Serialize)]
pub struct TextData<'a> {
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
pub struct SenderProfile {
    pub user_id: u64,
    pub nickname: &'static str,
    pub sex: &'static str,
    pub age: u32,
}

impl<'a> OutboundEnvelope<'a> {
    pub fn new(text: &'a str, time: u64) -> Self {
        Self {
            time,
            self_id: SELF_ID,
            post_type: "message",
            message_type: "private",
            sub_type: "friend",
            message_id: MESSAGE_ID,
            user_id: USER_ID,
            message: [MessageSegment {
                kind: "text",
                data: TextData { text },
            }],
            raw_message: text,
            font: FONT,
            sender: SenderProfile {
                user_id: USER_ID,
                nickname: SENDER_NICKNAME,
                sex: SENDER_SEX,
                age: SENDER_AGE,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PingEnvelope {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub timestamp: f64,
}

impl PingEnvelope {
    pub fn new(timestamp: f64) -> Self {
        Self {
            kind: "ping",
            timestamp,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PlainEnvelope<'a> {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub timestamp: f64,
    pub message: &'a str,
}

impl<'a> PlainEnvelope<'a> {
    pub fn new(text: &'a str, timestamp: f64) -> Self {
        Self {
            kind: "user_input",
            timestamp,
            message: text,
        }
    }
}

/// Serialize operator text with the chosen envelope, stamped with the current time.
pub fn encode_text(kind: EnvelopeKind, text: &str) -> serde_json::Result<String> {
    match kind {
        EnvelopeKind::Private => {
            serde_json::to_string(&OutboundEnvelope::new(text, unix_seconds()))
        }
        EnvelopeKind::Plain => {
            serde_json::to_string(&PlainEnvelope::new(text, unix_seconds_f64()))
        }
    }
}

pub fn encode_ping() -> serde_json::Result<String> {
    serde_json::to_string(&PingEnvelope::new(unix_seconds_f64()))
}

fn since_epoch() -> std::time::Duration {
    // A clock before 1970 is treated as the epoch itself.
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
}

pub fn unix_seconds() -> u64 {
    since_epoch().as_secs()
}

pub fn unix_seconds_f64() -> f64 {
    since_epoch().as_secs_f64()
}
