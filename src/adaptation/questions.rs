//! Applying adaptation parameters to candidate questions and prompts.

use crate::types::{AdaptationParameters, DetailLevel, QuestionCount};
use serde::{Deserialize, Serialize};

/// Question priority as assigned by the template that produced it
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Medium,
    Low,
}

/// A candidate follow-up question
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simplified_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detailed_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub simplified_options: Option<Vec<String>>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub topics: Vec<String>,
    /// Event types this question applies to; empty means all
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relevant_to: Vec<String>,
    /// Always kept and never demoted
    #[serde(default)]
    pub essential: bool,
}

impl Question {
    pub fn new(id: impl Into<String>, text: impl Into<String>, priority: Priority) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            priority,
            ..Default::default()
        }
    }

    fn has_topic_in<'a>(&self, areas: impl IntoIterator<Item = &'a String>) -> bool {
        areas
            .into_iter()
            .any(|area| self.topics.iter().any(|t| t.eq_ignore_ascii_case(area)))
    }

    fn relevant_for(&self, event_type: Option<&str>) -> bool {
        self.relevant_to.is_empty()
            || event_type.map_or(false, |et| self.relevant_to.iter().any(|r| r == et))
    }
}

/// Reshapes question lists and prompts according to adaptation parameters
#[derive(Debug, Clone, Default)]
pub struct QuestionAdapter {
    params: AdaptationParameters,
}

impl QuestionAdapter {
    pub fn new(params: AdaptationParameters) -> Self {
        Self { params }
    }

    pub fn parameters(&self) -> &AdaptationParameters {
        &self.params
    }

    /// Filter, reorder and rephrase `questions` for the active event type.
    /// The input is left untouched.
    pub fn adapt(&self, questions: &[Question], event_type: Option<&str>) -> Vec<Question> {
        let kept: Vec<&Question> = match self.params.question_count {
            QuestionCount::Fewer => questions
                .iter()
                .filter(|q| match q.priority {
                    Priority::High => true,
                    Priority::Medium => q.essential || q.relevant_for(event_type),
                    Priority::Low => q.essential,
                })
                .collect(),
            // More does not synthesize extra questions
            QuestionCount::Default | QuestionCount::More => questions.iter().collect(),
        };

        // Stable three-way partition: focus, neutral, avoid
        let mut focus = Vec::new();
        let mut neutral = Vec::new();
        let mut avoid = Vec::new();
        for question in kept {
            if question.has_topic_in(&self.params.focus_areas) {
                focus.push(question);
            } else if !question.essential && question.has_topic_in(&self.params.avoid_areas) {
                avoid.push(question);
            } else {
                neutral.push(question);
            }
        }

        focus
            .into_iter()
            .chain(neutral)
            .chain(avoid)
            .map(|q| self.rephrase(q))
            .collect()
    }

    fn rephrase(&self, question: &Question) -> Question {
        let mut adapted = question.clone();
        match self.params.detail_level {
            DetailLevel::Simpler => {
                if let Some(text) = &question.simplified_text {
                    adapted.text = text.clone();
                }
                if question.options.is_some() {
                    if let Some(options) = &question.simplified_options {
                        adapted.options = Some(options.clone());
                    }
                }
            }
            DetailLevel::Detailed => {
                if let Some(text) = &question.detailed_text {
                    adapted.text = text.clone();
                }
            }
            DetailLevel::Default => {}
        }
        adapted
    }

    /// Natural-language directives for the response generator's prompt
    pub fn prompt_adaptations(&self) -> Vec<String> {
        let mut directives = Vec::new();

        match self.params.question_count {
            QuestionCount::Fewer => directives.push(
                "Ask only the questions that are essential; keep follow-ups to a minimum.".to_string(),
            ),
            QuestionCount::More => directives.push(
                "Ask clarifying questions whenever details are missing.".to_string(),
            ),
            QuestionCount::Default => {}
        }

        match self.params.detail_level {
            DetailLevel::Simpler => {
                directives.push("Keep responses concise and use simple language.".to_string())
            }
            DetailLevel::Detailed => directives.push(
                "Give thorough responses with specific details and next steps.".to_string(),
            ),
            DetailLevel::Default => {}
        }

        for topic in &self.params.focus_areas {
            directives.push(format!(
                "Emphasize {} topics; this user finds them especially helpful.",
                topic
            ));
        }
        for topic in &self.params.avoid_areas {
            directives.push(format!(
                "Be extra clear and careful when discussing {}; earlier answers on it were not well received.",
                topic
            ));
        }

        directives
    }
}
