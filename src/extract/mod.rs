//! Structured ticket extraction from free-form model output.
//!
//! Two schemas exist. The chat schema accepts the five labelled fields
//! anywhere in the reply, labels case-insensitive. The voice schema demands
//! the five fields in strict sequential order. Both either yield a fully
//! populated [`ParsedFields`] or nothing - a required field is never silently
//! defaulted. The caller owns the fallback decision.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    High,
    Medium,
    Low,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Severity::High),
            "medium" => Ok(Severity::Medium),
            "low" => Ok(Severity::Low),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedFields {
    pub subject: String,
    pub description: String,
    pub priority: Severity,
    pub churn_risk: Severity,
    pub eta_hours: i32,
}

static CHAT_SUBJECT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)SUBJECT:\s*(.+)").expect("chat subject regex"));
static CHAT_DESCRIPTION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)DESCRIPTION:\s*(.+?)PRIORITY:").expect("chat description regex"));
static CHAT_PRIORITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)PRIORITY:\s*(high|medium|low)").expect("chat priority regex"));
static CHAT_CHURN_RISK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)CHURN RISK:\s*(high|medium|low)").expect("chat churn regex"));
static CHAT_ETA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)ETA:\s*(\d+)").expect("chat eta regex"));

// One pass, each label immediately following the previous capture.
static VOICE_REPLY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?is)Subject:\s*(.+?)\n+Description:\s*(.+?)\n+Priority:\s*(.+?)\n+Churn Risk:\s*(.+?)\n+ETA:\s*(\d+)",
    )
    .expect("voice reply regex")
});

/// Ticket-chat schema: all five fields must be present somewhere in the
/// reply, in any order of surrounding text; the description runs non-greedily
/// up to the PRIORITY label.
pub fn parse_chat_reply(text: &str) -> Option<ParsedFields> {
    let subject = CHAT_SUBJECT.captures(text)?.get(1)?.as_str().trim().to_string();
    let description = CHAT_DESCRIPTION
        .captures(text)?
        .get(1)?
        .as_str()
        .trim()
        .to_string();
    let priority = CHAT_PRIORITY.captures(text)?.get(1)?.as_str().parse().ok()?;
    let churn_risk = CHAT_CHURN_RISK.captures(text)?.get(1)?.as_str().parse().ok()?;
    let eta_hours = CHAT_ETA.captures(text)?.get(1)?.as_str().parse().ok()?;

    Some(ParsedFields {
        subject,
        description,
        priority,
        churn_risk,
        eta_hours,
    })
}

/// Voice schema: strict Subject -> Description -> Priority -> Churn Risk ->
/// ETA sequence. Any deviation in order or labels, or a priority/churn value
/// outside {high, medium, low}, is a mismatch.
pub fn parse_voice_reply(text: &str) -> Option<ParsedFields> {
    let caps = VOICE_REPLY.captures(text)?;

    let priority: Severity = caps.get(3)?.as_str().parse().ok()?;
    let churn_risk: Severity = caps.get(4)?.as_str().parse().ok()?;
    let eta_hours: i32 = caps.get(5)?.as_str().parse().ok()?;

    Some(ParsedFields {
        subject: caps.get(1)?.as_str().trim().to_string(),
        description: caps.get(2)?.as_str().trim().to_string(),
        priority,
        churn_risk,
        eta_hours,
    })
}

/// Defaults for the voice path when the model reply does not match the
/// schema or the model is unreachable. The original complaint text goes into
/// the description verbatim. The chat path deliberately has no counterpart.
pub fn voice_fallback(complaint: &str) -> ParsedFields {
    ParsedFields {
        subject: "Voice Complaint".to_string(),
        description: complaint.to_string(),
        priority: Severity::Medium,
        churn_risk: Severity::Medium,
        eta_hours: 24,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VOICE_REPLY_OK: &str = "Subject: Broken export\n\
Description: The CSV export button returns an empty file.\n\
Priority: High\n\
Churn Risk: medium\n\
ETA: 12";

    #[test]
    fn test_voice_reply_exact_match() {
        let fields = parse_voice_reply(VOICE_REPLY_OK).unwrap();
        assert_eq!(fields.subject, "Broken export");
        assert_eq!(
            fields.description,
            "The CSV export button returns an empty file."
        );
        assert_eq!(fields.priority, Severity::High);
        assert_eq!(fields.churn_risk, Severity::Medium);
        assert_eq!(fields.eta_hours, 12);
    }

    #[test]
    fn test_voice_reply_out_of_order_is_mismatch() {
        let reply = "Description: something\nSubject: swapped\nPriority: low\nChurn Risk: low\nETA: 4";
        assert!(parse_voice_reply(reply).is_none());
    }

    #[test]
    fn test_voice_reply_severity_outside_set_is_mismatch() {
        let reply = "Subject: s\nDescription: d\nPriority: urgent\nChurn Risk: low\nETA: 4";
        assert!(parse_voice_reply(reply).is_none());
    }

    #[test]
    fn test_voice_fallback_defaults() {
        let fields = voice_fallback("my printer is on fire");
        assert_eq!(fields.subject, "Voice Complaint");
        assert_eq!(fields.description, "my printer is on fire");
        assert_eq!(fields.priority, Severity::Medium);
        assert_eq!(fields.churn_risk, Severity::Medium);
        assert_eq!(fields.eta_hours, 24);
    }

    #[test]
    fn test_chat_reply_with_surrounding_text() {
        let reply = "Thanks for the details!\n\n\
SUBJECT: Login loop\n\
DESCRIPTION: User is redirected back to the login page\nafter entering valid credentials.\n\
PRIORITY: high\n\
CHURN RISK: High\n\
ETA: 48\n\
RESPONSE: An agent will be assigned to you shortly.";
        let fields = parse_chat_reply(reply).unwrap();
        assert_eq!(fields.subject, "Login loop");
        assert!(fields.description.starts_with("User is redirected"));
        assert!(fields.description.ends_with("valid credentials."));
        assert_eq!(fields.priority, Severity::High);
        assert_eq!(fields.churn_risk, Severity::High);
        assert_eq!(fields.eta_hours, 48);
    }

    #[test]
    fn test_chat_reply_labels_are_case_insensitive() {
        let reply = "subject: a\ndescription: b\npriority: LOW\nchurn risk: Medium\neta: 1";
        let fields = parse_chat_reply(reply).unwrap();
        assert_eq!(fields.priority, Severity::Low);
        assert_eq!(fields.churn_risk, Severity::Medium);
    }

    #[test]
    fn test_chat_reply_missing_one_field_is_mismatch() {
        let reply = "SUBJECT: a\nDESCRIPTION: b\nPRIORITY: high\nCHURN RISK: low";
        assert!(parse_chat_reply(reply).is_none());
    }

    #[test]
    fn test_chat_reply_conversational_text_is_mismatch() {
        assert!(parse_chat_reply("Could you tell me more about the issue?").is_none());
    }

    #[test]
    fn test_chat_description_stops_at_priority_label() {
        let reply =
            "SUBJECT: s\nDESCRIPTION: first part.\nPRIORITY: low\nCHURN RISK: low\nETA: 2";
        let fields = parse_chat_reply(reply).unwrap();
        assert_eq!(fields.description, "first part.");
    }

    #[test]
    fn test_severity_round_trip() {
        assert_eq!("HIGH".parse::<Severity>().unwrap().as_str(), "high");
        assert!("critical".parse::<Severity>().is_err());
    }
}
