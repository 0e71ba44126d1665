//! Doctor command - verify credentials and configuration.

use crate::cli::Output;
use crate::config::Settings;
use crate::env_file::{self, CORPUS_NAME_VAR};
use console::style;

/// Check result for a single item.
#[derive(Debug)]
pub struct CheckResult {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
    pub hint: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckResult {
    fn ok(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Ok,
            message: message.to_string(),
            hint: None,
        }
    }

    fn warning(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Warning,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn error(name: &str, message: &str, hint: &str) -> Self {
        Self {
            name: name.to_string(),
            status: CheckStatus::Error,
            message: message.to_string(),
            hint: Some(hint.to_string()),
        }
    }

    fn print(&self) {
        let symbol = match self.status {
            CheckStatus::Ok => style("✓").green(),
            CheckStatus::Warning => style("!").yellow(),
            CheckStatus::Error => style("✗").red(),
        };
        println!("  {} {} - {}", symbol, style(&self.name).bold(), self.message);

        if let Some(hint) = &self.hint {
            println!("    {} {}", style("→").dim(), style(hint).dim());
        }
    }
}

/// Run all diagnostic checks.
pub fn run_doctor(settings: &Settings) -> anyhow::Result<()> {
    Output::header("Sporre Doctor");
    println!();
    println!("Checking credentials and configuration...\n");

    let mut checks = Vec::new();

    println!("{}", style("API Configuration").bold());
    let api_checks = vec![
        check_llm_api_key(),
        check_corpus_token(),
        check_project(settings),
    ];
    for check in &api_checks {
        check.print();
    }
    checks.extend(api_checks);

    println!();

    println!("{}", style("Corpus").bold());
    let corpus_checks = check_corpus_handle(settings);
    for check in &corpus_checks {
        check.print();
    }
    checks.extend(corpus_checks);

    println!();

    println!("{}", style("Configuration").bold());
    let config_check = check_config_file();
    config_check.print();
    checks.push(config_check);

    println!();

    // Summary
    let errors = checks.iter().filter(|c| c.status == CheckStatus::Error).count();
    let warnings = checks.iter().filter(|c| c.status == CheckStatus::Warning).count();

    if errors > 0 {
        Output::error(&format!(
            "{} error(s) found. Please fix them before using Sporre.",
            errors
        ));
        std::process::exit(1);
    } else if warnings > 0 {
        Output::warning(&format!("All checks passed with {} warning(s).", warnings));
    } else {
        Output::success("All checks passed! Sporre is ready to use.");
    }

    Ok(())
}

/// Check if the LLM API key is configured.
fn check_llm_api_key() -> CheckResult {
    match std::env::var("OPENAI_API_KEY") {
        Ok(key) if key.starts_with("sk-") && key.len() > 20 => {
            let masked = format!("{}...{}", &key[..7], &key[key.len() - 4..]);
            CheckResult::ok("OPENAI_API_KEY", &format!("configured ({})", masked))
        }
        Ok(key) if key.is_empty() => CheckResult::error(
            "OPENAI_API_KEY",
            "empty",
            "Set with: export OPENAI_API_KEY='sk-...'",
        ),
        Ok(_) => CheckResult::warning(
            "OPENAI_API_KEY",
            "set but format looks unusual",
            "Expected format: sk-... (OpenAI API key)",
        ),
        Err(_) => CheckResult::error(
            "OPENAI_API_KEY",
            "not set",
            "Set with: export OPENAI_API_KEY='sk-...'",
        ),
    }
}

/// Check if the corpus service token is configured.
fn check_corpus_token() -> CheckResult {
    for var in ["CORPUS_API_TOKEN", "GOOGLE_ACCESS_TOKEN"] {
        if let Ok(token) = std::env::var(var) {
            if !token.is_empty() {
                return CheckResult::ok(var, "configured");
            }
        }
    }
    CheckResult::error(
        "CORPUS_API_TOKEN",
        "not set",
        "Set with: export CORPUS_API_TOKEN=\"$(gcloud auth print-access-token)\"",
    )
}

/// Check the cloud project.
fn check_project(settings: &Settings) -> CheckResult {
    match settings.corpus.project_id() {
        Some(project) => CheckResult::ok("Project", &project),
        None => CheckResult::error(
            "Project",
            "not configured",
            "Set corpus.project_id in config, or export GOOGLE_CLOUD_PROJECT",
        ),
    }
}

/// Check the env file and corpus handle.
fn check_corpus_handle(settings: &Settings) -> Vec<CheckResult> {
    let mut results = Vec::new();
    let env_path = settings.env_file();

    if env_path.exists() {
        results.push(CheckResult::ok(
            "Env file",
            &format!("{}", env_path.display()),
        ));
    } else {
        results.push(CheckResult::warning(
            "Env file",
            &format!("{} (not created yet)", env_path.display()),
            "Created automatically by 'sporre corpus create'",
        ));
    }

    let handle = env_file::read_var(&env_path, CORPUS_NAME_VAR)
        .ok()
        .flatten()
        .filter(|h| !h.trim().is_empty())
        .or_else(|| std::env::var(CORPUS_NAME_VAR).ok().filter(|h| !h.is_empty()));

    match handle {
        Some(name) => results.push(CheckResult::ok("Corpus handle", &name)),
        None => results.push(CheckResult::warning(
            "Corpus handle",
            "none configured",
            "Create one with: sporre corpus create",
        )),
    }

    results
}

/// Check if config file exists.
fn check_config_file() -> CheckResult {
    let config_path = Settings::default_config_path();
    if config_path.exists() {
        CheckResult::ok("Config file", &format!("{}", config_path.display()))
    } else {
        CheckResult::warning(
            "Config file",
            "using defaults",
            "Create with: sporre init",
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_result_ok() {
        let result = CheckResult::ok("test", "passed");
        assert_eq!(result.status, CheckStatus::Ok);
        assert!(result.hint.is_none());
    }

    #[test]
    fn test_check_result_error() {
        let result = CheckResult::error("test", "failed", "fix it");
        assert_eq!(result.status, CheckStatus::Error);
        assert_eq!(result.hint, Some("fix it".to_string()));
    }
}
