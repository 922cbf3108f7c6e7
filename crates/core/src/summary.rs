//! Summary generation pipeline.
//!
//! Resolution order per `(meeting, user)`: durable record, in-process cache,
//! then generation. A summary is generated at most once; every later request
//! is served from one of the first two tiers. LLM failures degrade to a
//! synthetic summary with the classification attached.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use tracing::{debug, warn};

use meetsync_domain::{
    Meeting, Result, SummaryPayload, SummaryRecord, PROMPT_ATTENDEE_LIMIT,
    PROMPT_DESCRIPTION_LIMIT,
};

use crate::analytics::EventLog;
use crate::classify::classify;
use crate::ports::{LlmClient, SummaryStore};
use crate::synthetic;

pub(crate) const SYSTEM_PROMPT: &str = "You are an AI assistant that generates insightful, \
professional meeting summaries based on calendar event metadata. \n\nYour summaries should:\n\
- Be concise but informative (3-5 sentences)\n\
- Highlight the meeting's likely purpose based on title and attendees\n\
- Mention key logistical details (duration, platform, attendees)\n\
- Infer potential topics or outcomes based on context\n\
- Use professional business language\n\
- Be realistic about what can be inferred from calendar data alone\n\n\
Do not:\n\
- Make up specific discussion points or decisions\n\
- Claim knowledge of actual meeting content\n\
- Use overly formal or robotic language\n\
- Simply restate the meeting title";

pub struct SummaryPipeline {
    store: Option<Arc<dyn SummaryStore>>,
    llm: Option<Arc<dyn LlmClient>>,
    events: EventLog,
    memory: DashMap<String, SummaryPayload>,
}

impl SummaryPipeline {
    pub fn new(
        store: Option<Arc<dyn SummaryStore>>,
        llm: Option<Arc<dyn LlmClient>>,
        events: EventLog,
    ) -> Self {
        Self { store, llm, events, memory: DashMap::new() }
    }

    pub async fn summarize(&self, meeting: &Meeting, user_id: &str) -> SummaryPayload {
        if let Some(record) = self.load_record(&meeting.id, user_id).await {
            debug!(meeting_id = %meeting.id, user_id, "serving stored summary");
            return SummaryPayload::from_record(&record);
        }

        let key = cache_key(&meeting.id, user_id);
        if let Some(hit) = self.memory.get(&key) {
            debug!(meeting_id = %meeting.id, user_id, "serving in-process summary");
            let mut payload = hit.clone();
            payload.cached = true;
            return payload;
        }

        let Some(llm) = &self.llm else {
            debug!(meeting_id = %meeting.id, "LLM not configured, generating synthetic summary");
            let text = synthetic::sample_summary(meeting);
            let payload = SummaryPayload::mock(text);
            self.persist(meeting, user_id, &payload).await;
            self.memory.insert(key, payload.clone());
            self.events
                .log(
                    user_id,
                    "summary_generated",
                    serde_json::json!({ "meetingId": meeting.id, "type": "mock" }),
                )
                .await;
            return payload;
        };

        match llm.complete(SYSTEM_PROMPT, &build_prompt(meeting)).await {
            Ok(completion) => {
                let payload = SummaryPayload::generated(completion.text, completion.tokens_used);
                self.persist(meeting, user_id, &payload).await;
                self.memory.insert(key, payload.clone());
                self.events
                    .log(
                        user_id,
                        "summary_generated",
                        serde_json::json!({
                            "meetingId": meeting.id,
                            "type": "ai",
                            "tokensUsed": completion.tokens_used,
                        }),
                    )
                    .await;
                payload
            }
            Err(err) => {
                warn!(meeting_id = %meeting.id, error = %err, "summary generation failed");
                let info = classify(&err);
                let payload = SummaryPayload::mock(synthetic::sample_summary(meeting));
                self.persist(meeting, user_id, &payload).await;
                payload.with_error(info)
            }
        }
    }

    async fn load_record(&self, meeting_id: &str, user_id: &str) -> Option<SummaryRecord> {
        let store = self.store.as_ref()?;
        match store.get_summary(meeting_id, user_id).await {
            Ok(record) => record,
            Err(err) => {
                warn!(meeting_id, user_id, error = %err, "summary lookup failed");
                None
            }
        }
    }

    async fn persist(&self, meeting: &Meeting, user_id: &str, payload: &SummaryPayload) {
        let Some(store) = &self.store else { return };
        let record = SummaryRecord {
            meeting_id: meeting.id.clone(),
            user_id: user_id.to_owned(),
            summary_text: payload.summary.clone(),
            is_mock: payload.is_mock,
            created_at: Utc::now(),
        };
        if let Err(err) = store.save_summary(&record).await {
            warn!(meeting_id = %meeting.id, user_id, error = %err, "failed to persist summary");
        }
    }
}

fn cache_key(meeting_id: &str, user_id: &str) -> String {
    format!("{meeting_id}-{user_id}")
}

/// Render the meeting metadata as the LLM user prompt.
pub fn build_prompt(meeting: &Meeting) -> String {
    let duration = synthetic::format_duration(meeting.start, meeting.end);
    let tod = synthetic::time_of_day(meeting.start);

    let mut prompt = String::from(
        "Generate a professional meeting summary based on the following calendar event:\n\n",
    );
    prompt.push_str(&format!("**Meeting Title:** {}\n", meeting.title));
    prompt.push_str(&format!(
        "**Date & Time:** {} at {} ({tod})\n",
        meeting.start.format("%A, %B %-d, %Y"),
        meeting.start.format("%-I:%M %p"),
    ));
    prompt.push_str(&format!("**Duration:** {duration}\n"));

    if !meeting.attendees.is_empty() {
        let count = meeting.attendees.len();
        let plural = if count > 1 { "s" } else { "" };
        prompt.push_str(&format!("**Attendees:** {count} participant{plural}\n"));
        for attendee in meeting.attendees.iter().take(PROMPT_ATTENDEE_LIMIT) {
            prompt.push_str(&format!("  - {}\n", attendee.name));
        }
        if count > PROMPT_ATTENDEE_LIMIT {
            prompt.push_str(&format!("  - And {} more...\n", count - PROMPT_ATTENDEE_LIMIT));
        }
    }

    if !meeting.location.is_empty() {
        prompt.push_str(&format!("**Location:** {}\n", meeting.location));
    }
    if !meeting.meet_link.is_empty() {
        prompt.push_str("**Format:** Virtual meeting (Google Meet)\n");
    }

    if !meeting.description.is_empty() {
        let truncated: String =
            meeting.description.chars().take(PROMPT_DESCRIPTION_LIMIT).collect();
        let ellipsis =
            if meeting.description.chars().count() > PROMPT_DESCRIPTION_LIMIT { "..." } else { "" };
        prompt.push_str(&format!("**Description:** {truncated}{ellipsis}\n"));
    }

    if let Some(organizer) = &meeting.organizer {
        let name = organizer.name.as_deref().unwrap_or(&organizer.email);
        prompt.push_str(&format!("**Organized by:** {name}\n"));
    }

    prompt.push_str(
        "\nProvide a concise, insightful summary that captures the likely purpose and context \
         of this meeting.",
    );
    prompt
}
