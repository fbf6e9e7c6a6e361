//! Contact/summary extraction from a fetched transcript.
//!
//! The transcript is filtered down to the caller's own turns, and the joined
//! text is submitted inside a fixed Italian instruction template asking the
//! chat model for three labeled fields (email, phone, structured summary) with
//! a "Non trovato" sentinel for anything absent. The model's response is
//! returned verbatim: it is presentation content, never parsed.

use crate::error::ConvaiError;
use mutuo_llm::{ChatClient, ChatMessage};
use mutuo_types::TranscriptTurn;

/// Instruction template for the extraction call. `{transcript}` is replaced
/// with the newline-joined user turns.
///
/// The "chiocciola" rule normalizes the spoken rendering of the at-sign into a
/// literal "@" so dictated email addresses come out usable.
const CONTACT_PROMPT_TEMPLATE: &str = "\
Analizza la seguente trascrizione di una conversazione tra un utente e un agente virtuale.
Estrai, se presenti, l'indirizzo email e il numero di telefono dell'utente e un Riassumi dettagliatamente in maniera strutturata con tutti i dettagli rilevanti per la richiesta di un mutuo.
Rispondi nel seguente formato:
Email: <indirizzo email>
Telefono: <numero di telefono>
Riassunto: <riassunto dettagliato>

Se non trovi alcun dato, indica \"Non trovato\".
Se vedi qualche termine simile a \"chiocciola\" si tratta di un'email e cambiala con il carattere \"@\".

Trascrizione:
{transcript}
";

/// Outcome of an extraction attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionOutcome {
    /// The model's raw labeled-field response, displayed as-is.
    Contacts(String),
    /// The transcript contained no user turns; no model call was made.
    NoUserMessages,
}

/// Joins the messages of user-authored turns with newlines, preserving order.
///
/// Agent turns and unrecognized roles are dropped entirely.
pub fn user_transcript_text(transcript: &[TranscriptTurn]) -> String {
    transcript
        .iter()
        .filter(|turn| turn.role.is_user())
        .map(|turn| turn.message.as_str())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Substitutes the user transcript text into the instruction template.
pub fn build_contact_prompt(transcript_text: &str) -> String {
    CONTACT_PROMPT_TEMPLATE.replace("{transcript}", transcript_text)
}

/// Runs the extraction pass over a transcript.
///
/// Short-circuits with [`ExtractionOutcome::NoUserMessages`] when the filtered
/// transcript is blank — the model is never invoked in that case.
pub async fn extract_contacts(
    llm: &ChatClient,
    transcript: &[TranscriptTurn],
) -> Result<ExtractionOutcome, ConvaiError> {
    let transcript_text = user_transcript_text(transcript);
    if transcript_text.trim().is_empty() {
        tracing::info!("transcript has no user messages, skipping extraction");
        return Ok(ExtractionOutcome::NoUserMessages);
    }

    let prompt = build_contact_prompt(&transcript_text);
    let contact_info = llm
        .complete(&[ChatMessage::user(prompt)])
        .await
        .map_err(|e| ConvaiError::Session(format!("contact extraction failed: {}", e)))?;
    Ok(ExtractionOutcome::Contacts(contact_info))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mutuo_types::Role;

    fn turn(role: Role, message: &str) -> TranscriptTurn {
        TranscriptTurn::new(role, message, 0.0)
    }

    #[test]
    fn filters_to_user_turns_in_order() {
        let transcript = vec![
            turn(Role::Agent, "Buongiorno, come posso aiutarla?"),
            turn(Role::User, "Vorrei informazioni su un mutuo."),
            turn(Role::Agent, "Certo."),
            turn(Role::User, "Il mio numero è 333 1234567."),
        ];
        assert_eq!(
            user_transcript_text(&transcript),
            "Vorrei informazioni su un mutuo.\nIl mio numero è 333 1234567."
        );
    }

    #[test]
    fn agent_only_transcript_yields_empty_text() {
        let transcript = vec![turn(Role::Agent, "grazie")];
        assert_eq!(user_transcript_text(&transcript), "");
    }

    #[test]
    fn unknown_roles_are_dropped() {
        let transcript = vec![
            turn(Role::Unknown, "noise"),
            turn(Role::User, "solo questo"),
        ];
        assert_eq!(user_transcript_text(&transcript), "solo questo");
    }

    #[test]
    fn prompt_embeds_transcript_and_normalization_rule() {
        // The documented end-to-end scenario: a dictated email address where
        // the at-sign is spoken as "chiocciola".
        let transcript = vec![
            turn(Role::User, "la mia email è mario chiocciola test punto it"),
            turn(Role::Agent, "grazie"),
        ];
        let text = user_transcript_text(&transcript);
        assert_eq!(text, "la mia email è mario chiocciola test punto it");

        let prompt = build_contact_prompt(&text);
        assert!(prompt.contains("la mia email è mario chiocciola test punto it"));
        assert!(prompt.contains("chiocciola"));
        assert!(prompt.contains("\"@\""));
        assert!(prompt.contains("Non trovato"));
        assert!(!prompt.contains("{transcript}"));
    }
}
