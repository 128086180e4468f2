//! Static single-prompt descriptor (spec §4.6): `explore-graph`.

use kgraph_mcp_core::{GetPromptResponse, Prompt, PromptArgument};
use kgraph_mcp_core::types::prompts::{PromptContent, PromptMessage, PromptRole};

use crate::error::DispatchError;

const PROMPT_NAME: &str = "explore-graph";

pub fn list_prompts() -> Vec<Prompt> {
    vec![Prompt {
        name: PROMPT_NAME.to_string(),
        description: Some(
            "Suggests how to explore the knowledge graph starting from a topic of interest."
                .to_string(),
        ),
        arguments: Some(vec![PromptArgument {
            name: "topic".to_string(),
            description: Some("Topic or concept to start exploring from".to_string()),
            required: Some(false),
        }]),
    }]
}

pub fn get_prompt(name: &str, arguments: Option<&serde_json::Value>) -> Result<GetPromptResponse, DispatchError> {
    if name != PROMPT_NAME {
        return Err(DispatchError::Validation(format!("Unknown prompt: {name}")));
    }

    let topic = arguments
        .and_then(|args| args.get("topic"))
        .and_then(|v| v.as_str())
        .unwrap_or("a topic of your choice");

    let text = format!(
        "Start by running `search` with query=\"{topic}\" to find candidate concepts, \
         then use `concept` action=\"details\" on the most relevant result to inspect its \
         grounding and evidence, and `concept` action=\"related\" or \"connect\" to explore \
         how it links to the rest of the graph."
    );

    Ok(GetPromptResponse {
        description: Some("Suggested exploration path for a topic".to_string()),
        messages: vec![PromptMessage {
            role: PromptRole::User,
            content: PromptContent::Text { text },
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_prompt_is_registered() {
        assert_eq!(list_prompts().len(), 1);
        assert_eq!(list_prompts()[0].name, "explore-graph");
    }

    #[test]
    fn unknown_prompt_name_is_rejected() {
        assert!(get_prompt("nope", None).is_err());
    }

    #[test]
    fn missing_topic_argument_falls_back_to_a_default_phrase() {
        let response = get_prompt("explore-graph", None).unwrap();
        assert_eq!(response.messages.len(), 1);
    }
}
