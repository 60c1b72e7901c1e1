//! Prompt templates for the analysis tasks.
//!
//! Each task is a fixed (prefix, suffix) pair around the transcript body. The
//! suffixes all end with an explicit JSON instruction and an opening fence to
//! bias the model toward syntactically valid JSON.

use serde_json::{Map, Value};

const SUMMARY_PREFIX_HEAD: &str = "Your task is to answer 3 things from a customer support call \
for a company that sells puppies. \
1. Summary of the call transcript, in at most ";
const SUMMARY_PREFIX_TAIL: &str = " words. \
2. The name of the representative. \
3. Did a purchase happen during the call? Only answer with Yes or No. \
Analyze the phone call transcript below, delimited by triple backticks.\n```";
const SUMMARY_SUFFIX: &str = "```\n\
Output in json format with Summary, Rep_name, Sale_status as keys.\n```json\n";

const QUESTION_PREFIX: &str = "Your task is to analyze a customer service call \
for a company that sells puppies. \
First, provide 3 areas that customers have questions/concerns about to the business owner, \
focusing on any aspects that are relevant to the sale, \
for example: Location of the puppy, Price of the puppy, etc. Output as a list. \
Then find 3 example quotes that represent the questions/concerns, output as a list. \
The phone call transcript is delimited by triple dashes.\nTranscript:\n---";
const QUESTION_SUFFIX: &str = "---\n\
Output as a json object below, only include Concerns and Quotes as keys.\n```json\n";

const FEEDBACK_PREFIX: &str = "Your task is to analyze a customer service call \
for a company that sells puppies, \
to give feedback to the customer representative for 3 areas of improvement as a list, \
focusing on any aspect that is about the sale. \
And output 3 quotes that are relevant as a list. \
The phone call transcript is delimited by triple dashes.\nTranscript:\n---";
const FEEDBACK_SUFFIX: &str = "---\n\
Output as a json object below, only include Improvements and Improvement_Quotes as keys.\n```json\n";

/// The three per-call analysis tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Summary,
    QuestionExtraction,
    Feedback,
}

impl TaskKind {
    /// All tasks, in the order the passes run.
    pub fn all() -> [TaskKind; 3] {
        [Self::Summary, Self::QuestionExtraction, Self::Feedback]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::QuestionExtraction => "questions",
            Self::Feedback => "feedback",
        }
    }

    /// Keys the task's JSON response must carry. The report layer relies on
    /// every record containing exactly these keys.
    pub fn schema_keys(&self) -> &'static [&'static str] {
        match self {
            Self::Summary => &["Summary", "Rep_name", "Sale_status"],
            Self::QuestionExtraction => &["Concerns", "Quotes"],
            Self::Feedback => &["Improvements", "Improvement_Quotes"],
        }
    }

    /// Instruction block placed before the transcript.
    pub fn prompt_prefix(&self, summary_words: usize) -> String {
        match self {
            Self::Summary => {
                format!("{SUMMARY_PREFIX_HEAD}{summary_words}{SUMMARY_PREFIX_TAIL}")
            }
            Self::QuestionExtraction => QUESTION_PREFIX.to_string(),
            Self::Feedback => FEEDBACK_PREFIX.to_string(),
        }
    }

    /// Instruction block placed after the transcript.
    pub fn prompt_suffix(&self) -> &'static str {
        match self {
            Self::Summary => SUMMARY_SUFFIX,
            Self::QuestionExtraction => QUESTION_SUFFIX,
            Self::Feedback => FEEDBACK_SUFFIX,
        }
    }

    /// Template text around the transcript, used for token budgeting.
    pub fn prompt_overhead(&self, summary_words: usize) -> String {
        let mut overhead = self.prompt_prefix(summary_words);
        overhead.push_str(self.prompt_suffix());
        overhead
    }

    /// Full prompt: prefix + transcript + suffix.
    pub fn build_prompt(&self, transcript: &str, summary_words: usize) -> String {
        let mut prompt = self.prompt_prefix(summary_words);
        prompt.push_str(transcript);
        prompt.push_str(self.prompt_suffix());
        prompt
    }

    /// All-null record substituted when a response cannot be parsed.
    pub fn placeholder(&self) -> Map<String, Value> {
        self.schema_keys()
            .iter()
            .map(|key| ((*key).to_string(), Value::Null))
            .collect()
    }
}

/// Prompt asking for the top 5 topics in a concern/feedback corpus.
pub fn build_topic_ranking_prompt(corpus: &str) -> String {
    format!(
        "The following text includes top concerns from sales calls for a puppy company. \
Help me summarize what are the top 5 topics and what % of total each makes up. \
If there is more than one topic in a sentence, break them into two. \
Merge topics if they are similar and relevant.\n\
Text:\n---\n{corpus}\n---\n\
Output as one json object with Topic and Percentage as keys.\n```json\n"
    )
}

/// Prompt asking for three quotes related to a ranked topic.
pub fn build_quote_prompt(topic: &str, corpus: &str) -> String {
    format!(
        "The following text includes example questions from sales calls for a puppy company. \
Output three quotes that are highly related to '{topic}'.\n\
Text:\n---\n{corpus}\n---\n\
Output the 3 quotes as a json list.\n```json\n"
    )
}
