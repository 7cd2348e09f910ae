use crate::{
    evaluate_environment, AnswerFeedback, CreatedSession, EnvironmentCheck, PreCheckOutcome,
    Question, QuestionKind, Report, ReportItem, ReportMetrics, Result, ScoredNote, SessionBackend,
    StarAnalysis,
};
use uuid::Uuid;

fn question_texts(role: &str) -> [String; 3] {
    [
        format!("Tell me about a time you had to deal with a difficult stakeholder as a {role}."),
        format!("What are the core principles of accessibility you apply in your work as a {role}?"),
        format!(
            "Imagine you're tasked with a project with a tight deadline and unclear \
             requirements. How would you approach this as a {role}?"
        ),
    ]
}

/// Canned backend: three role-templated questions and a fixed report, so
/// the whole session protocol runs without network access.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockBackend;

impl MockBackend {
    pub fn new() -> Self {
        Self
    }
}

impl SessionBackend for MockBackend {
    fn create_session(&mut self, role: &str) -> Result<CreatedSession> {
        let [behavioral, technical, scenario] = question_texts(role);
        Ok(CreatedSession {
            session_id: format!("sess_mock_{}", Uuid::new_v4()),
            questions: vec![
                Question {
                    id: "q_mock_1".to_string(),
                    kind: QuestionKind::Behavioral,
                    question: behavioral,
                },
                Question {
                    id: "q_mock_2".to_string(),
                    kind: QuestionKind::Technical,
                    question: technical,
                },
                Question {
                    id: "q_mock_3".to_string(),
                    kind: QuestionKind::Scenario,
                    question: scenario,
                },
            ],
        })
    }

    fn finish_session(&mut self, _session_id: &str, role: &str) -> Result<Report> {
        let [behavioral, technical, scenario] = question_texts(role);
        Ok(Report {
            report_id: format!("rep_mock_{}", Uuid::new_v4()),
            summary: "Solid performance overall. You demonstrated clear communication and \
                      provided relevant examples. To improve, focus on structuring your \
                      behavioral answers more consistently using the STAR method and providing \
                      more quantifiable results."
                .to_string(),
            metrics: ReportMetrics {
                avg_clarity: 8.7,
                avg_relevance: 9.0,
                duration_sec: 542,
            },
            items: vec![
                ReportItem {
                    question: behavioral,
                    answer_text: "I explained the technical constraints and we found a \
                                  compromise."
                        .to_string(),
                    feedback: AnswerFeedback {
                        clarity: ScoredNote {
                            score: 8,
                            feedback: "Your explanation was clear and easy to follow."
                                .to_string(),
                        },
                        relevance: ScoredNote {
                            score: 9,
                            feedback: "The example was highly relevant to the question."
                                .to_string(),
                        },
                        star_method_analysis: Some(StarAnalysis {
                            situation: "A stakeholder wanted a feature that was technically \
                                        complex and would delay the project."
                                .to_string(),
                            task: "To align on a feasible solution without compromising the \
                                   deadline."
                                .to_string(),
                            action: "I created a simplified prototype, presented data on the \
                                     engineering cost, and proposed a phased approach."
                                .to_string(),
                            result: "The stakeholder agreed to the phased approach, and we \
                                     delivered the core feature on time."
                                .to_string(),
                        }),
                        overall_suggestion: "Excellent use of the STAR method. You clearly \
                                             articulated the situation and the positive outcome."
                            .to_string(),
                    },
                },
                ReportItem {
                    question: technical,
                    answer_text: "I use semantic HTML, ARIA attributes, and ensure keyboard \
                                  navigation."
                        .to_string(),
                    feedback: AnswerFeedback {
                        clarity: ScoredNote {
                            score: 9,
                            feedback: "You listed key principles concisely.".to_string(),
                        },
                        relevance: ScoredNote {
                            score: 10,
                            feedback: "Directly answered the technical question with accurate \
                                       information."
                                .to_string(),
                        },
                        star_method_analysis: None,
                        overall_suggestion: "Great answer. You could enhance it by mentioning \
                                             WCAG guidelines or specific tools you use for \
                                             testing."
                            .to_string(),
                    },
                },
                ReportItem {
                    question: scenario,
                    answer_text: "I would ask for clarification and start with the most \
                                  important features."
                        .to_string(),
                    feedback: AnswerFeedback {
                        clarity: ScoredNote {
                            score: 9,
                            feedback: "Your approach is logical and well-stated.".to_string(),
                        },
                        relevance: ScoredNote {
                            score: 8,
                            feedback: "You addressed the core challenges of the scenario."
                                .to_string(),
                        },
                        star_method_analysis: None,
                        overall_suggestion: "Strong response. Consider mentioning specific \
                                             agile practices like creating user stories or \
                                             building an MVP to make your process more concrete."
                            .to_string(),
                    },
                },
            ],
        })
    }
}

/// Frame analysis stub reporting a fixed person count.
#[derive(Debug, Clone, Copy)]
pub struct MockEnvironmentCheck {
    person_count: u32,
}

impl MockEnvironmentCheck {
    pub fn new(person_count: u32) -> Self {
        Self { person_count }
    }

    pub fn outcome(&self) -> PreCheckOutcome {
        evaluate_environment(self.person_count)
    }
}

impl Default for MockEnvironmentCheck {
    fn default() -> Self {
        Self::new(1)
    }
}

impl EnvironmentCheck for MockEnvironmentCheck {
    fn analyze_frame(&mut self, _frame: &[u8]) -> Result<u32> {
        Ok(self.person_count)
    }
}
