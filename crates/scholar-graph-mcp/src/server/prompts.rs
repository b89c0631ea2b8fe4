//! Prompt templates served through `prompts/list` and `prompts/get`.

use serde_json::{Map, Value, json};

struct PromptArg {
    name: &'static str,
    description: &'static str,
    required: bool,
}

struct Prompt {
    name: &'static str,
    description: &'static str,
    arguments: &'static [PromptArg],
}

const PROMPTS: &[Prompt] = &[
    Prompt {
        name: "paper_search_prompt",
        description: "Plan a paper search on a topic",
        arguments: &[
            PromptArg { name: "topic", description: "Research topic", required: true },
            PromptArg {
                name: "requirements",
                description: "Extra constraints (years, venues, ...)",
                required: false,
            },
        ],
    },
    Prompt {
        name: "paper_analysis_prompt",
        description: "Analyze a specific paper",
        arguments: &[
            PromptArg { name: "paper_id", description: "Paper ID or external ID", required: true },
            PromptArg {
                name: "analysis_type",
                description: "Kind of analysis (default: summary)",
                required: false,
            },
        ],
    },
    Prompt {
        name: "author_research_prompt",
        description: "Research an author and their work",
        arguments: &[
            PromptArg { name: "author_name", description: "Author name", required: true },
            PromptArg {
                name: "research_focus",
                description: "Aspect of their work to focus on",
                required: false,
            },
        ],
    },
];

/// Entries for `prompts/list`.
#[must_use]
pub fn list() -> Value {
    let prompts: Vec<Value> = PROMPTS
        .iter()
        .map(|p| {
            let arguments: Vec<Value> = p
                .arguments
                .iter()
                .map(|a| {
                    json!({"name": a.name, "description": a.description, "required": a.required})
                })
                .collect();
            json!({"name": p.name, "description": p.description, "arguments": arguments})
        })
        .collect();
    json!({ "prompts": prompts })
}

/// Render a prompt.
///
/// # Errors
///
/// Returns a message when the prompt is unknown or a required argument is missing.
pub fn get(name: &str, arguments: &Map<String, Value>) -> Result<Value, String> {
    let prompt = PROMPTS
        .iter()
        .find(|p| p.name == name)
        .ok_or_else(|| format!("Unknown prompt: {name}"))?;

    let arg = |key: &str| arguments.get(key).and_then(Value::as_str).unwrap_or_default();
    for required in prompt.arguments.iter().filter(|a| a.required) {
        if arg(required.name).trim().is_empty() {
            return Err(format!("Missing required argument '{}' for {name}", required.name));
        }
    }

    let messages = match name {
        "paper_search_prompt" => vec![user(format!(
            "I need to search for academic papers on the topic: {topic}\n\n\
             Please help me:\n\
             1. Identify relevant search terms and keywords\n\
             2. Suggest appropriate filters (publication year, citation count, etc.)\n\
             3. Recommend the most useful fields to retrieve\n\
             4. Plan a comprehensive search strategy\n\n\
             Additional requirements: {requirements}\n\n\
             Use the search_papers tool to find relevant papers, then analyze the results \
             to provide insights and recommendations.",
            topic = arg("topic"),
            requirements = arg("requirements"),
        ))],
        "paper_analysis_prompt" => {
            let analysis_type = match arg("analysis_type") {
                "" => "summary",
                other => other,
            };
            vec![
                user(format!("I need to analyze paper ID: {}", arg("paper_id"))),
                user(format!("Analysis type: {analysis_type}")),
                assistant(
                    "I'll help you analyze this paper. Let me retrieve the paper details first, \
                     then provide a comprehensive analysis.",
                ),
                user(
                    "Please use the get_paper_details tool to fetch the paper information, then \
                     provide insights based on the analysis type requested.",
                ),
            ]
        }
        _ => vec![user(format!(
            "I need to research the author: {author}\n\n\
             Research focus: {focus}\n\n\
             Please help me:\n\
             1. Find the author using search_authors\n\
             2. Get detailed information about their work\n\
             3. Analyze their most cited papers\n\
             4. Identify their research areas and contributions\n\
             5. Provide a comprehensive overview of their academic profile\n\n\
             Use the appropriate tools to gather this information and provide a detailed analysis.",
            author = arg("author_name"),
            focus = arg("research_focus"),
        ))],
    };

    Ok(json!({ "description": prompt.description, "messages": messages }))
}

fn user(text: impl Into<String>) -> Value {
    message("user", text.into())
}

fn assistant(text: impl Into<String>) -> Value {
    message("assistant", text.into())
}

fn message(role: &str, text: String) -> Value {
    json!({"role": role, "content": {"type": "text", "text": text}})
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_has_three_prompts() {
        assert_eq!(list()["prompts"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_analysis_defaults_to_summary() {
        let mut args = Map::new();
        args.insert("paper_id".into(), json!("abc123"));
        let rendered = get("paper_analysis_prompt", &args).unwrap();
        let messages = rendered["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[1]["content"]["text"], "Analysis type: summary");
        assert_eq!(messages[2]["role"], "assistant");
    }

    #[test]
    fn test_missing_required_argument() {
        let err = get("paper_search_prompt", &Map::new()).unwrap_err();
        assert!(err.contains("topic"));
        assert!(get("nope", &Map::new()).is_err());
    }
}
