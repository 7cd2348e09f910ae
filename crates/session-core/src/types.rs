use serde::{Deserialize, Serialize};

/// Interview question category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    Behavioral,
    Technical,
    Scenario,
}

/// One interview question as supplied by the session backend. Immutable;
/// the orchestrator only advances a cursor over the ordered sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    pub question: String,
}

/// Per-dimension score with a short note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredNote {
    pub score: u8,
    pub feedback: String,
}

/// STAR breakdown of a behavioral answer, when the backend produced one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StarAnalysis {
    pub situation: String,
    pub task: String,
    pub action: String,
    pub result: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerFeedback {
    pub clarity: ScoredNote,
    pub relevance: ScoredNote,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub star_method_analysis: Option<StarAnalysis>,
    pub overall_suggestion: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportItem {
    pub question: String,
    pub answer_text: String,
    pub feedback: AnswerFeedback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetrics {
    pub avg_clarity: f64,
    pub avg_relevance: f64,
    pub duration_sec: u64,
}

/// Final assessment returned by the report backend after a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub report_id: String,
    pub summary: String,
    pub metrics: ReportMetrics,
    pub items: Vec<ReportItem>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_wire_shape_matches_the_backend() {
        let json = r#"{"id":"q_1","type":"behavioral","question":"Tell me about a challenge."}"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.kind, QuestionKind::Behavioral);
        assert_eq!(q.question, "Tell me about a challenge.");
        let back = serde_json::to_string(&q).unwrap();
        assert!(back.contains(r#""type":"behavioral""#));
    }

    #[test]
    fn report_serializes_camel_case_and_omits_absent_star_analysis() {
        let report = Report {
            report_id: "rep_1".to_string(),
            summary: "ok".to_string(),
            metrics: ReportMetrics {
                avg_clarity: 8.5,
                avg_relevance: 9.0,
                duration_sec: 120,
            },
            items: vec![ReportItem {
                question: "q".to_string(),
                answer_text: "a".to_string(),
                feedback: AnswerFeedback {
                    clarity: ScoredNote {
                        score: 8,
                        feedback: "clear".to_string(),
                    },
                    relevance: ScoredNote {
                        score: 9,
                        feedback: "relevant".to_string(),
                    },
                    star_method_analysis: None,
                    overall_suggestion: "good".to_string(),
                },
            }],
        };
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains(r#""reportId":"rep_1""#));
        assert!(json.contains(r#""avgClarity":8.5"#));
        assert!(json.contains(r#""answerText":"a""#));
        assert!(!json.contains("starMethodAnalysis"));
    }
}
