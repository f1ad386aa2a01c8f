use std::sync::Arc;

use super::engine::ReviewWorkflow;
use super::pipeline::ContentPipeline;
use crate::agent::Agent;
use crate::config::AgentConfig;
use crate::llm::LLMRouter;

pub const WRITER_NAME: &str = "writer_agent";
pub const FINAL_EDITOR_NAME: &str = "final_editor_agent";

const WRITER_INSTRUCTIONS: &str = "You are an excellent content writer. \
Create clear, engaging content based on the user's request. \
Focus on clarity, accuracy, and proper structure. \
Keep your drafts concise (3-5 sentences).";

const FINAL_EDITOR_INSTRUCTIONS: &str = "You are an editor who polishes marketing copy after human approval. \
Correct any legal or factual issues. Return the final version even if no changes are made.";

pub fn writer_agent(router: Arc<LLMRouter>, config: AgentConfig) -> Agent {
    Agent::new(WRITER_NAME, WRITER_INSTRUCTIONS, config, router)
}

pub fn final_editor_agent(router: Arc<LLMRouter>, config: AgentConfig) -> Agent {
    Agent::new(FINAL_EDITOR_NAME, FINAL_EDITOR_INSTRUCTIONS, config, router)
}

/// Writer/editor pair sharing one router.
pub fn build_review_workflow(router: Arc<LLMRouter>, config: AgentConfig) -> ReviewWorkflow {
    ReviewWorkflow::new(
        Arc::new(writer_agent(router.clone(), config.clone())),
        Arc::new(final_editor_agent(router, config)),
    )
}

const CONTENT_WRITER_INSTRUCTIONS: &str = "You are an excellent content writer. \
Create clear, engaging content based on the user's request. \
Focus on clarity, accuracy, and proper structure.";

const REVIEWER_INSTRUCTIONS: &str = "You are an expert content reviewer. \
Evaluate the writer's content based on:\n\
1. Clarity - Is it easy to understand?\n\
2. Completeness - Does it fully address the topic?\n\
3. Accuracy - Is the information correct?\n\
4. Structure - Is it well-organized?\n\n\
Return a JSON object with:\n\
- score: overall quality (0-100)\n\
- feedback: concise, actionable feedback\n\
- clarity, completeness, accuracy, structure: individual scores (0-100)";

const EDITOR_INSTRUCTIONS: &str = "You are a skilled editor. \
You will receive content along with review feedback. \
Improve the content by addressing all the issues mentioned in the feedback. \
Maintain the original intent while enhancing clarity, completeness, accuracy, and structure.";

const PUBLISHER_INSTRUCTIONS: &str = "You are a publishing agent. \
You receive either approved content or edited content. \
Format it for publication with proper headings and structure.";

const SUMMARIZER_INSTRUCTIONS: &str = "You are a summarizer agent. \
Create a final publication report that includes:\n\
1. A brief summary of the published content\n\
2. The workflow path taken (direct approval or edited)\n\
3. Key highlights and takeaways\n\
Keep it concise and professional.";

/// Five-agent publishing chain; the reviewer replies in JSON mode.
pub fn build_content_pipeline(router: Arc<LLMRouter>, config: AgentConfig) -> ContentPipeline {
    let agent = |name: &str, instructions: &str| Agent::new(name, instructions, config.clone(), router.clone());
    ContentPipeline::new(
        Arc::new(agent("Writer", CONTENT_WRITER_INSTRUCTIONS)),
        Arc::new(agent("Reviewer", REVIEWER_INSTRUCTIONS).with_json_output()),
        Arc::new(agent("Editor", EDITOR_INSTRUCTIONS)),
        Arc::new(agent("Publisher", PUBLISHER_INSTRUCTIONS)),
        Arc::new(agent("Summarizer", SUMMARIZER_INSTRUCTIONS)),
    )
}
