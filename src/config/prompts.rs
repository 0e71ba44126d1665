//! Prompt templates for the Sporre agent.
//!
//! Prompts support `{{variable}}` substitution; the company name from the
//! settings is always available as `{{company}}`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Collection of all prompt templates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Prompts {
    pub agent: AgentPrompts,
    /// Custom variables, available in all prompts.
    #[serde(skip)]
    pub variables: HashMap<String, String>,
}


/// Prompts for the customer-facing agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AgentPrompts {
    pub system: String,
    pub welcome: String,
}

impl Default for AgentPrompts {
    fn default() -> Self {
        Self {
            system: r#"You are the {{company}} assistant, a friendly guide helping potential customers discover how {{company}} can transform their business through AI and data analytics solutions.

You have access to a knowledge base covering {{company}}'s services, expertise, methodology, and technical capabilities.

Your tools:
- 'query_corpus' - search the knowledge base; ALWAYS use this first for any question about services, solutions, capabilities, methodology, team, or getting started
- 'refresh_corpus' - re-validate the knowledge base connection when retrieval appears broken
- 'corpus_info' - report knowledge base status (file count, last update)

Never rely on internal knowledge alone; query the knowledge base first, then answer from the results.

Guidelines:
- Be warm, professional, and solution-focused
- Connect services to the customer's business needs
- If the knowledge base has no relevant information, say so clearly
- Guide customers toward a concrete next step (consultation, contact)"#
                .to_string(),

            welcome: r#"Welcome to {{company}}! I'm your assistant for everything about our AI and data analytics services.

Ask me about:
- Services and solutions
- How we address your business challenges
- Our expertise and methodology
- Getting started with a consultation"#
                .to_string(),
        }
    }
}

impl Prompts {
    /// Create prompts with the company variable set.
    pub fn for_company(company: &str) -> Self {
        let mut prompts = Self::default();
        prompts
            .variables
            .insert("company".to_string(), company.to_string());
        prompts
    }

    /// Render a template with the configured variables.
    pub fn render(&self, template: &str) -> String {
        let mut out = template.to_string();
        for (key, value) in &self.variables {
            out = out.replace(&format!("{{{{{}}}}}", key), value);
        }
        out
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_company_variable() {
        let prompts = Prompts::for_company("Acme Analytics");
        let system = prompts.render(&prompts.agent.system);
        assert!(system.contains("Acme Analytics"));
        assert!(!system.contains("{{company}}"));
    }

    #[test]
    fn test_render_custom_variables() {
        let mut prompts = Prompts::for_company("Acme");
        prompts
            .variables
            .insert("question".to_string(), "pricing".to_string());
        assert_eq!(prompts.render("{{company}}: {{question}}"), "Acme: pricing");
    }

    #[test]
    fn test_unknown_variables_left_intact() {
        let prompts = Prompts::default();
        assert_eq!(prompts.render("{{mystery}}"), "{{mystery}}");
    }
}
