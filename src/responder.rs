//! Scripted insights assistant.
//!
//! Queries are matched against an ordered list of keyword rules. The first
//! rule with a keyword contained in the lower-cased query decides the reply;
//! anything else gets the fallback text.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intent {
    FailedStudents,
    PerfectSgpa,
    SubjectDifficulty,
    DepartmentComparison,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentRow {
    pub name: String,
    pub roll_no: String,
    pub sgpa: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stat {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotReply {
    pub intent: Intent,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<Vec<StudentRow>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stats: Option<Vec<Stat>>,
}

pub struct Rule {
    pub intent: Intent,
    pub keywords: &'static [&'static str],
}

impl Rule {
    fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k))
    }
}

/// Evaluated top to bottom; earlier rules win.
pub static RULES: &[Rule] = &[
    Rule {
        intent: Intent::FailedStudents,
        keywords: &["failed", "fail"],
    },
    Rule {
        intent: Intent::PerfectSgpa,
        keywords: &["10 sgpa", "sgpa"],
    },
    Rule {
        intent: Intent::SubjectDifficulty,
        keywords: &["difficulty", "tough"],
    },
    Rule {
        intent: Intent::DepartmentComparison,
        keywords: &["department", "compare"],
    },
];

pub const QUICK_SUGGESTIONS: [&str; 4] = [
    "Failed students",
    "10 SGPA students",
    "Subject difficulty",
    "Department comparison",
];

pub const GREETING: &str = "Hello! I'm your AI Academic Assistant. Ask me anything about result analytics, student performance, or subject insights.";

const FALLBACK_TEXT: &str = "I can help you analyze student performance, subject difficulty, pass/fail rates, and department comparisons. Try asking about failed students, top performers, or subject insights.";

pub fn intent_for(query: &str) -> Intent {
    let lowered = query.to_lowercase();
    RULES
        .iter()
        .find(|rule| rule.matches(&lowered))
        .map(|rule| rule.intent)
        .unwrap_or(Intent::Fallback)
}

pub fn classify(query: &str) -> BotReply {
    let intent = intent_for(query);
    tracing::debug!(?intent, "classified query");
    reply_for(intent)
}

pub fn reply_for(intent: Intent) -> BotReply {
    match intent {
        Intent::FailedStudents => BotReply {
            intent,
            text: "Here are the students who failed in S3 Computer Science Engineering:".to_string(),
            table: Some(rows(&[
                ("Rahul Krishnan", "CSE21001", "4.2"),
                ("Priya Nair", "CSE21045", "4.8"),
                ("Arjun Menon", "CSE21078", "4.5"),
            ])),
            stats: None,
        },
        Intent::PerfectSgpa => BotReply {
            intent,
            text: "Students with 10 SGPA in S3 Computer Science Engineering:".to_string(),
            table: Some(rows(&[
                ("Anjali Thomas", "CSE21012", "10.0"),
                ("Vishnu Prasad", "CSE21023", "10.0"),
                ("Sneha Warrier", "CSE21056", "10.0"),
            ])),
            stats: None,
        },
        Intent::SubjectDifficulty => BotReply {
            intent,
            text: "Subject difficulty analysis for S3 Computer Science Engineering:".to_string(),
            table: None,
            stats: Some(stats(&[
                ("Toughest Subject", "Discrete Mathematics (32% failure)"),
                ("Easiest Subject", "Data Structures (6% failure)"),
                ("Average Pass Rate", "87.2%"),
            ])),
        },
        Intent::DepartmentComparison => BotReply {
            intent,
            text: "Department-wise pass percentage comparison:".to_string(),
            table: None,
            stats: Some(stats(&[
                ("Computer Science Engg.", "87.2%"),
                ("Electrical & Electronics", "84.5%"),
                ("Mechanical Engg.", "79.8%"),
                ("Civil Engg.", "82.1%"),
            ])),
        },
        Intent::Fallback => BotReply {
            intent,
            text: FALLBACK_TEXT.to_string(),
            table: None,
            stats: None,
        },
    }
}

fn rows(data: &[(&str, &str, &str)]) -> Vec<StudentRow> {
    data.iter()
        .map(|&(name, roll_no, sgpa)| StudentRow {
            name: name.to_string(),
            roll_no: roll_no.to_string(),
            sgpa: sgpa.to_string(),
        })
        .collect()
}

pub(crate) fn stats(data: &[(&str, &str)]) -> Vec<Stat> {
    data.iter()
        .map(|&(label, value)| Stat {
            label: label.to_string(),
            value: value.to_string(),
        })
        .collect()
}
