//! Protocol messages between a question server and a remote repository.
//!
//! All messages are serialized as JSON over WebSocket.

use serde::{Deserialize, Serialize};

use crate::models::QuestionRecord;

/// Messages sent from a repository client to the question server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// Request every question of a test.
    FetchTest { test_id: String },
}

/// Messages sent from the question server to a repository client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// Rows of the requested test, in bank order.
    Questions {
        test_id: String,
        records: Vec<QuestionRecord>,
    },

    /// The bank has no rows for this test.
    TestNotFound { test_id: String },

    /// The request could not be served.
    Failed { reason: String },
}

/// Default question server port.
pub const DEFAULT_PORT: u16 = 4000;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_serialization() {
        let msg = ClientMessage::FetchTest {
            test_id: "3".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"FetchTest\""));
        assert!(json.contains("\"test_id\":\"3\""));

        let msg = ServerMessage::TestNotFound {
            test_id: "3".to_string(),
        };
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"type\":\"TestNotFound\""));
    }

    #[test]
    fn test_questions_carry_bank_columns() {
        let json = r#"{"type":"Questions","test_id":"1","records":[
            {"exam":"1","exam_question_index":"1","question_text":"Q",
             "A":"a","B":"b","C":"c","D":"d","correct":"D"}]}"#;
        let ServerMessage::Questions { records, .. } = serde_json::from_str(json).unwrap() else {
            panic!("expected Questions");
        };
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].correct, "D");
    }
}
