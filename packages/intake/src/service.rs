//! The intake service: one entry point per inbound message.
//!
//! Owns the session store, the extraction pipeline, and the publish
//! workflow, and dispatches each message along a fixed priority
//! order: restart, media attach, confirm, edit, bulk extraction,
//! single-field collection.

use std::sync::Arc;

use tracing::{info, warn};

use crate::error::{IntakeError, Result};
use crate::pipeline::ExtractionPipeline;
use crate::publish::generate_confirmation_code;
use crate::session_store::SessionStore;
use crate::text::{is_affirmative, normalize_phone};
use crate::traits::publisher::JobPublisher;
use crate::traits::store::JobStore;
use crate::types::fields::{review_summary, spec_for, template_prompt, FieldKey};
use crate::types::message::{InboundMessage, OutboundMessage};
use crate::types::payload::JobPayload;
use crate::types::session::{CollectionMode, Session, SessionState};

/// Greetings and commands that always start a fresh session.
const RESTART_TRIGGERS: &[&str] = &["hi", "hello", "restart", "start"];

/// Conversational intake service.
pub struct IntakeService {
    sessions: SessionStore,
    pipeline: ExtractionPipeline,
    publisher: Arc<dyn JobPublisher>,
    jobs: Option<Arc<dyn JobStore>>,
    source_channel: String,
    listing_base_url: Option<String>,
}

impl IntakeService {
    pub fn new(pipeline: ExtractionPipeline, publisher: Arc<dyn JobPublisher>) -> Self {
        Self {
            sessions: SessionStore::new(),
            pipeline,
            publisher,
            jobs: None,
            source_channel: "wa".to_string(),
            listing_base_url: None,
        }
    }

    /// Persist published jobs to `store` (best effort).
    pub fn with_job_store(mut self, store: Arc<dyn JobStore>) -> Self {
        self.jobs = Some(store);
        self
    }

    /// Tag payloads with a source channel other than the default.
    pub fn with_source_channel(mut self, channel: impl Into<String>) -> Self {
        self.source_channel = channel.into();
        self
    }

    /// Base URL for the confirmation link embedded in the reply.
    pub fn with_listing_base_url(mut self, url: impl Into<String>) -> Self {
        self.listing_base_url = Some(url.into());
        self
    }

    /// Replace the session store (custom TTL, mostly for tests).
    pub fn with_session_store(mut self, sessions: SessionStore) -> Self {
        self.sessions = sessions;
        self
    }

    /// The persistence backend, if one is configured.
    pub fn job_store(&self) -> Option<Arc<dyn JobStore>> {
        self.jobs.clone()
    }

    /// Number of live (possibly expired but unswept) sessions.
    pub fn active_sessions(&self) -> usize {
        self.sessions.active_count()
    }

    /// Handle one inbound message and produce the reply.
    pub async fn handle(&self, msg: InboundMessage) -> Result<OutboundMessage> {
        let key = msg.conversation_key.clone();
        let text_lower = msg.text_lower();

        let is_restart = RESTART_TRIGGERS.contains(&text_lower.as_str());
        let mut session = match self.sessions.get(&key) {
            // Explicit greeting or restart always discards progress.
            _ if is_restart => {
                let session = self.sessions.start(&key);
                return Ok(self.reply(&session, template_prompt()));
            }
            Some(session) => session,
            // First contact with actual content goes straight into the
            // bulk path; otherwise greet with the template.
            None => {
                let mut session = self.sessions.start(&key);
                if !msg.has_text() {
                    session.media.extend(msg.media.clone());
                    let reply = self.reply(&session, template_prompt());
                    self.sessions.save(session);
                    return Ok(reply);
                }
                session
            }
        };
        session.touch();

        // Media-only: attach the photos. In per-field mode this counts
        // as the answer for the cursor field; in bulk mode the details
        // are still expected in one message.
        if !msg.media.is_empty() && !msg.has_text() {
            session.media.extend(msg.media.clone());
            if session.mode == CollectionMode::Bulk && session.state == SessionState::Collecting {
                let count = session.media.len();
                let reply = self.reply(
                    &session,
                    format!("Got {count} photo(s). Please send the job details."),
                );
                self.sessions.save(session);
                return Ok(reply);
            }
            return Ok(self.advance_or_review(session));
        }

        // Confirmation of the review summary.
        if session.state == SessionState::Review && is_affirmative(&text_lower) {
            return self.confirm(session).await;
        }

        // Edit command naming a known field.
        if let Some(rest) = text_lower.strip_prefix("edit ") {
            if let Ok(field) = rest.split_whitespace().next().unwrap_or_default().parse::<FieldKey>() {
                session.edit_field(field);
                let prompt = format!("Okay, update {}:\n{}", field, spec_for(field).prompt);
                let reply = self.reply(&session, prompt);
                self.sessions.save(session);
                return Ok(reply);
            }
        }

        // Bulk path: one free-text message through the tiered pipeline.
        if session.mode == CollectionMode::Bulk
            && session.state == SessionState::Collecting
            && msg.has_text()
        {
            let text = msg.text.as_deref().unwrap_or_default();
            let outcome = self.pipeline.run(text).await;
            session.media.extend(msg.media.clone());

            if !outcome.missing.is_empty() {
                let names: Vec<&str> = outcome.missing.iter().map(|f| f.as_str()).collect();
                let reply = self.reply(
                    &session,
                    format!(
                        "I couldn't find these fields: {}. Please resend all details \
                         in one message using the template.\n\n{}",
                        names.join(", "),
                        template_prompt()
                    ),
                );
                self.sessions.save(session);
                return Ok(reply);
            }

            session.fields = outcome.fields;
            session.state = SessionState::Review;
            let summary = review_summary(&session.fields, session.media.len());
            let reply = self.reply(&session, summary);
            self.sessions.save(session);
            return Ok(reply);
        }

        // Anything else during review: repeat the summary with the
        // available actions instead of treating it as a field answer.
        if session.state == SessionState::Review {
            let summary = review_summary(&session.fields, session.media.len());
            let reply = self.reply(
                &session,
                format!("I didn't understand that.\n\n{summary}"),
            );
            self.sessions.save(session);
            return Ok(reply);
        }

        // Multi-turn fallback: store the answer for the cursor field.
        let Some(current) = session.current_field() else {
            // No current field and not in review: unrecoverable for
            // this conversation.
            self.sessions.end(&key);
            return Err(IntakeError::InconsistentSession {
                conversation_key: key,
            });
        };

        let answer = msg.text.as_deref().unwrap_or_default().trim();
        if current == FieldKey::ContactPhone {
            match normalize_phone(answer) {
                Some(phone) => {
                    session.fields.insert(current, phone);
                }
                None => {
                    let hint = format!(
                        "Please provide a valid phone number (e.g., +15551234567).\n{}",
                        session.current_prompt()
                    );
                    let reply = self.reply(&session, hint);
                    self.sessions.save(session);
                    return Ok(reply);
                }
            }
        } else {
            session.fields.insert(current, answer.to_string());
        }

        Ok(self.advance_or_review(session))
    }

    /// Advance the cursor, then either summarize for review or prompt
    /// for the next field. A session already in review stays there and
    /// gets the summary again.
    fn advance_or_review(&self, mut session: Session) -> OutboundMessage {
        if session.state == SessionState::Collecting {
            session.advance();
        }
        let reply = if session.state == SessionState::Review {
            review_summary(&session.fields, session.media.len())
        } else {
            session.current_prompt()
        };
        let outbound = self.reply(&session, reply);
        self.sessions.save(session);
        outbound
    }

    /// Publish a reviewed session.
    async fn confirm(&self, mut session: Session) -> Result<OutboundMessage> {
        let key = session.conversation_key.clone();
        let code = generate_confirmation_code();
        let payload = match JobPayload::from_fields(
            &code,
            &self.source_channel,
            &key,
            &session.fields,
            session.media.clone(),
        ) {
            Ok(payload) => payload,
            Err(missing) => {
                // Review invariant was violated; fall back to
                // re-collecting the missing fields in bulk.
                let names: Vec<&str> = missing.iter().map(|f| f.as_str()).collect();
                session.state = SessionState::Collecting;
                session.mode = CollectionMode::Bulk;
                let reply = self.reply(
                    &session,
                    format!(
                        "I still need these fields: {}. Please resend all details \
                         in one message using the template.\n\n{}",
                        names.join(", "),
                        template_prompt()
                    ),
                );
                self.sessions.save(session);
                return Ok(reply);
            }
        };

        match self.publisher.publish(&payload).await {
            Ok(outcome) => {
                // Persistence is additive; its failure never masks a
                // successful publish.
                if let Some(jobs) = &self.jobs {
                    if let Err(error) = jobs.upsert(&payload).await {
                        warn!(%error, confirmation_code = %code, "job persistence failed");
                    }
                }
                self.sessions.end(&key);
                info!(confirmation_code = %code, ?outcome, "job published");

                let mut reply =
                    format!("Thanks! Your job is published with confirmation code {code}.");
                if let Some(base) = &self.listing_base_url {
                    reply.push_str(&format!("\nView it here: {base}?ref={code}"));
                }
                Ok(OutboundMessage {
                    conversation_key: key,
                    reply,
                    state: SessionState::Confirmed,
                    collected: payload.collected(),
                })
            }
            Err(error) => {
                // Keep the session in review so YES can be retried
                // without re-collecting anything.
                session.state = SessionState::Review;
                let reply = self.reply(
                    &session,
                    format!("Could not publish right now: {error}. Please reply YES to retry."),
                );
                self.sessions.save(session);
                Ok(reply)
            }
        }
    }

    fn reply(&self, session: &Session, reply: String) -> OutboundMessage {
        OutboundMessage {
            conversation_key: session.conversation_key.clone(),
            reply,
            state: session.state,
            collected: session.collected(),
        }
    }
}
