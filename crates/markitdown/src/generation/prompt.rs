//! Prompt templates for document processing

/// System message sent with every request
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that processes documents.";

/// Instruction used to merge per-chunk results into one answer
pub const COMBINE_INSTRUCTION: &str =
    "Combine the following summaries into a coherent single summary, removing redundancies:";

/// Prompt builder for summaries and custom queries
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the user prompt: the default summary request, or the caller's
    /// query followed by the content. An empty query counts as none.
    pub fn build(content: &str, query: Option<&str>) -> String {
        match query.filter(|q| !q.is_empty()) {
            Some(query) => Self::build_query_prompt(query, content),
            None => Self::build_summary_prompt(content),
        }
    }

    /// Build a summarization prompt
    pub fn build_summary_prompt(content: &str) -> String {
        format!("Please summarize the following content concisely:\n\n{content}")
    }

    /// Build a custom query prompt
    pub fn build_query_prompt(query: &str, content: &str) -> String {
        format!("{query}\n\nContent:\n{content}")
    }

    /// Build the prompt that merges partial results
    pub fn build_combine_prompt(partial_results: &[String]) -> String {
        Self::build_query_prompt(COMBINE_INSTRUCTION, &partial_results.join("\n\n"))
    }
}
