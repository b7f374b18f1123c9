//! Push notification fan-out.
//!
//! One message per registered token, chunked into batches of
//! `PUSH_BATCH_LIMIT`, posted to the gateway one batch after another.
//! The first failing batch stops the run; batches already accepted stay sent.

use crate::config::Config;
use crate::core::generation::Ticket;
use crate::db::store::DocumentStore;
use crate::errors::{AppError, AppResult};
use crate::models::Collection;
use crate::models::push_token::PushToken;
use serde::Serialize;
use serde_json::{Value, json};
use std::time::Duration;

/// Gateway limit on messages per request.
pub const PUSH_BATCH_LIMIT: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PushMessage {
    pub to: String,
    pub sound: String,
    pub title: String,
    pub body: String,
    #[serde(rename = "channelId")]
    pub channel_id: String,
    pub data: Value,
}

/// Where batches go. The HTTP gateway is the production implementation.
pub trait PushGateway {
    fn send_batch(&mut self, batch: &[PushMessage]) -> AppResult<()>;
}

pub struct HttpPushGateway {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpPushGateway {
    pub fn new(url: &str, timeout: Duration) -> AppResult<Self> {
        let client = reqwest::blocking::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.to_string(),
        })
    }

    pub fn from_config(cfg: &Config) -> AppResult<Self> {
        Self::new(
            &cfg.push_gateway_url,
            Duration::from_secs(cfg.push_timeout_secs),
        )
    }
}

impl PushGateway for HttpPushGateway {
    fn send_batch(&mut self, batch: &[PushMessage]) -> AppResult<()> {
        let resp = self
            .client
            .post(&self.url)
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .json(batch)
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().unwrap_or_default();
            return Err(AppError::Gateway(format!("{} {}", status, text.trim())));
        }
        Ok(())
    }
}

/// Message options that are the same for every token.
#[derive(Debug, Clone)]
pub struct PushOptions {
    pub sound: String,
    pub channel_id: String,
    pub data: Value,
}

impl Default for PushOptions {
    fn default() -> Self {
        Self {
            sound: "default".into(),
            channel_id: "default".into(),
            data: json!({}),
        }
    }
}

impl PushOptions {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            sound: cfg.push_sound.clone(),
            channel_id: cfg.push_channel_id.clone(),
            data: json!({}),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DispatchReport {
    pub tokens: usize,
    pub batches_sent: usize,
    pub messages_sent: usize,
    /// Set when a stale ticket stopped the run before all batches went out.
    pub cancelled: bool,
}

pub struct PushDispatcher<'a, G: PushGateway> {
    gateway: &'a mut G,
    options: PushOptions,
}

impl<'a, G: PushGateway> PushDispatcher<'a, G> {
    pub fn new(gateway: &'a mut G, options: PushOptions) -> Self {
        Self { gateway, options }
    }

    /// Build one message per token.
    pub fn messages(&self, tokens: &[String], title: &str, body: &str) -> Vec<PushMessage> {
        tokens
            .iter()
            .map(|t| PushMessage {
                to: t.clone(),
                sound: self.options.sound.clone(),
                title: title.to_string(),
                body: body.to_string(),
                channel_id: self.options.channel_id.clone(),
                data: self.options.data.clone(),
            })
            .collect()
    }

    pub fn dispatch(
        &mut self,
        tokens: &[String],
        title: &str,
        body: &str,
        ticket: &Ticket,
    ) -> AppResult<DispatchReport> {
        if title.trim().is_empty() || body.trim().is_empty() {
            return Err(AppError::InvalidInput(
                "notification title and body are required".into(),
            ));
        }

        let mut report = DispatchReport {
            tokens: tokens.len(),
            ..DispatchReport::default()
        };

        let messages = self.messages(tokens, title, body);
        let total = messages.len().div_ceil(PUSH_BATCH_LIMIT);

        for (n, batch) in messages.chunks(PUSH_BATCH_LIMIT).enumerate() {
            if !ticket.is_current() {
                log::info!("push dispatch abandoned after {}/{} batches", n, total);
                report.cancelled = true;
                break;
            }

            if let Err(e) = self.gateway.send_batch(batch) {
                log::error!("push batch {}/{} failed: {}", n + 1, total, e);
                return Err(AppError::PartialSend {
                    sent: report.batches_sent,
                    total,
                    source: Box::new(e),
                });
            }

            report.batches_sent += 1;
            report.messages_sent += batch.len();
        }

        Ok(report)
    }
}

/// Distinct registered tokens, oldest registration first.
pub fn registered_tokens(store: &mut DocumentStore) -> AppResult<Vec<String>> {
    let mut out: Vec<String> = Vec::new();
    for t in store.list::<PushToken>()? {
        let token = t.data.token.trim().to_string();
        if !token.is_empty() && !out.contains(&token) {
            out.push(token);
        }
    }
    Ok(out)
}

/// Store a device token once. Returns false when it was already registered.
pub fn register_token(store: &mut DocumentStore, token: &str) -> AppResult<bool> {
    let token = token.trim();
    if token.is_empty() {
        return Err(AppError::InvalidInput("token must not be empty".into()));
    }

    if !store.find_where::<PushToken>("Token", &json!(token))?.is_empty() {
        return Ok(false);
    }

    store.insert(&PushToken {
        token: token.to_string(),
    })?;
    Ok(true)
}

/// Remove every document holding `token`. Returns how many were removed.
pub fn unregister_token(store: &mut DocumentStore, token: &str) -> AppResult<usize> {
    let found = store.find_where::<PushToken>("Token", &json!(token.trim()))?;
    for t in &found {
        store.delete(Collection::PushTokens, &t.id)?;
    }
    Ok(found.len())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::core::generation::Generation;

    /// Records batches; fails the batch at `fail_at` (0-based) if set.
    #[derive(Default)]
    pub(crate) struct FakeGateway {
        pub batches: Vec<Vec<PushMessage>>,
        pub fail_at: Option<usize>,
    }

    impl PushGateway for FakeGateway {
        fn send_batch(&mut self, batch: &[PushMessage]) -> AppResult<()> {
            if self.fail_at == Some(self.batches.len()) {
                return Err(AppError::Gateway("503 Service Unavailable".into()));
            }
            self.batches.push(batch.to_vec());
            Ok(())
        }
    }

    fn tokens(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("ExponentPushToken[{i}]")).collect()
    }

    #[test]
    fn batches_cover_every_token_once() {
        for n in [1usize, 99, 100, 101, 250] {
            let mut gw = FakeGateway::default();
            let input = tokens(n);
            let report = PushDispatcher::new(&mut gw, PushOptions::default())
                .dispatch(&input, "Culto", "Hoy a las 19:00", &Ticket::detached())
                .unwrap();

            assert_eq!(gw.batches.len(), n.div_ceil(100), "n = {n}");
            assert!(gw.batches.iter().all(|b| b.len() <= PUSH_BATCH_LIMIT));

            let sent: Vec<String> = gw.batches.concat().into_iter().map(|m| m.to).collect();
            assert_eq!(sent, input);
            assert_eq!(report.messages_sent, n);
            assert!(!report.cancelled);
        }
    }

    #[test]
    fn no_tokens_means_no_requests() {
        let mut gw = FakeGateway::default();
        let report = PushDispatcher::new(&mut gw, PushOptions::default())
            .dispatch(&[], "t", "b", &Ticket::detached())
            .unwrap();
        assert_eq!(report, DispatchReport::default());
        assert!(gw.batches.is_empty());
    }

    #[test]
    fn title_and_body_are_required() {
        let mut gw = FakeGateway::default();
        let mut d = PushDispatcher::new(&mut gw, PushOptions::default());
        assert!(matches!(
            d.dispatch(&tokens(3), " ", "b", &Ticket::detached()),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            d.dispatch(&tokens(3), "t", "", &Ticket::detached()),
            Err(AppError::InvalidInput(_))
        ));
        assert!(gw.batches.is_empty());
    }

    #[test]
    fn first_failure_stops_remaining_batches() {
        let mut gw = FakeGateway {
            fail_at: Some(1),
            ..FakeGateway::default()
        };
        let res = PushDispatcher::new(&mut gw, PushOptions::default()).dispatch(
            &tokens(350),
            "t",
            "b",
            &Ticket::detached(),
        );
        match res {
            Err(AppError::PartialSend { sent, total, source }) => {
                assert_eq!((sent, total), (1, 4));
                assert!(matches!(*source, AppError::Gateway(_)));
            }
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(gw.batches.len(), 1);
    }

    #[test]
    fn stale_ticket_skips_the_rest() {
        let generation = Generation::new();
        let ticket = generation.ticket();
        generation.advance();

        let mut gw = FakeGateway::default();
        let report = PushDispatcher::new(&mut gw, PushOptions::default())
            .dispatch(&tokens(150), "t", "b", &ticket)
            .unwrap();
        assert!(report.cancelled);
        assert_eq!(report.batches_sent, 0);
        assert!(gw.batches.is_empty());
    }

    #[test]
    fn messages_carry_configured_sound_and_channel() {
        let mut gw = FakeGateway::default();
        let opts = PushOptions {
            sound: "bell".into(),
            channel_id: "avisos".into(),
            data: json!({"kind": "news"}),
        };
        let d = PushDispatcher::new(&mut gw, opts);
        let m = &d.messages(&tokens(1), "t", "b")[0];

        let wire = serde_json::to_value(m).unwrap();
        assert_eq!(wire["sound"], "bell");
        assert_eq!(wire["channelId"], "avisos");
        assert_eq!(wire["data"]["kind"], "news");
    }

    #[test]
    fn registration_is_idempotent() {
        let mut store = DocumentStore::open_in_memory().unwrap();
        assert!(register_token(&mut store, "ExponentPushToken[a]").unwrap());
        assert!(!register_token(&mut store, " ExponentPushToken[a] ").unwrap());
        assert!(register_token(&mut store, "ExponentPushToken[b]").unwrap());
        assert!(matches!(
            register_token(&mut store, ""),
            Err(AppError::InvalidInput(_))
        ));

        assert_eq!(registered_tokens(&mut store).unwrap().len(), 2);
        assert_eq!(unregister_token(&mut store, "ExponentPushToken[a]").unwrap(), 1);
        assert_eq!(registered_tokens(&mut store).unwrap(), ["ExponentPushToken[b]"]);
    }
}
