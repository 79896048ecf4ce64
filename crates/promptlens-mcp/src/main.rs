use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::{CallToolResult, Content, ServerCapabilities, ServerInfo},
    schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt,
};
use promptlens_core::{
    AiSettings, AnalysisResult, AnalysisStore, SavedAnalysis, TechnologyCategory,
};
use serde::Deserialize;

// --- Request types ---

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct AnalyzePromptRequest {
    /// Free-text description of the web application idea (10 to 10000 characters)
    prompt: String,
    /// Save the reconciled analysis under this name (letters, digits, '-', '_', '.')
    save_as: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct AnalysisDataRequest {
    /// An analysis result as a JSON string ({overallScore, dimensions, technologies, architecture, ...}). Markdown code fences are tolerated.
    data: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct ClassifyRequest {
    /// Architecture component name, e.g. "React Client" or "Edge Functions"
    name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct NamedAnalysisRequest {
    /// Name of the saved analysis
    name: String,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct RoadmapRequest {
    /// Name of a saved analysis to plan from
    name: Option<String>,
    /// Or an analysis result as a JSON string
    data: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
struct ConfigureAiRequest {
    /// "openai", "anthropic", "google", "ollama", "groq", "mistral", "deepseek", or "gateway" (OpenAI-compatible HTTP endpoint)
    provider: String,
    /// Model identifier for the provider
    model: String,
    /// API key. Omit to keep the stored key; not needed for ollama.
    api_key: Option<String>,
    /// Base URL, required for "gateway" (e.g. "https://gateway.example.com/v1")
    base_url: Option<String>,
    /// Request timeout in seconds (default 55)
    timeout_secs: Option<u64>,
}

// --- Server ---

#[derive(Clone)]
pub struct PromptlensServer {
    store: AnalysisStore,
    tool_router: ToolRouter<Self>,
}

fn text_ok(text: impl Into<String>) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::success(vec![Content::text(text.into())]))
}

fn text_err(text: impl Into<String>) -> Result<CallToolResult, McpError> {
    Ok(CallToolResult::error(vec![Content::text(text.into())]))
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("Serialization error: {}", e))
}

#[tool_router]
impl PromptlensServer {
    pub fn new(store: AnalysisStore) -> Self {
        Self {
            store,
            tool_router: Self::tool_router(),
        }
    }

    #[tool(
        description = "Analyze a web app prompt with the configured AI provider. Returns {result, isSynced, corrections}: the structured critique (scores, dimensions, strengths/weaknesses, technology stack, architecture, best practices, optimized prompt) with the architecture already reconciled against the technology stack. `corrections` lists every component technology that was overwritten. Pass save_as to keep the analysis for get_analysis/get_roadmap."
    )]
    async fn analyze_prompt(
        &self,
        Parameters(req): Parameters<AnalyzePromptRequest>,
    ) -> Result<CallToolResult, McpError> {
        let settings = promptlens_core::read_settings();
        let outcome = match promptlens_suggest::analyze(&req.prompt, &settings).await {
            Ok(o) => o,
            Err(e) => {
                let hint = if e.is_retryable() { " (retry later)" } else { "" };
                return text_err(format!("Analysis failed: {}{}", e, hint));
            }
        };

        if let Some(name) = &req.save_as {
            let saved = SavedAnalysis {
                prompt: req.prompt.trim().to_string(),
                outcome: outcome.clone(),
            };
            if let Err(e) = self.store.write(name, &saved) {
                return text_err(format!("Analysis succeeded but saving '{}' failed: {}", name, e));
            }
        }

        text_ok(to_json(&outcome))
    }

    #[tool(
        description = "Reconcile an analysis result so every architecture component's technology matches the primary technology of its category in the stack. Component categories are inferred from their names by keyword (frontend, backend, database, authentication). Returns {result, isSynced, corrections}."
    )]
    fn reconcile_analysis(
        &self,
        Parameters(req): Parameters<AnalysisDataRequest>,
    ) -> Result<CallToolResult, McpError> {
        match promptlens_suggest::parse_analysis(&req.data) {
            Ok(result) => text_ok(to_json(&promptlens_core::reconcile(result))),
            Err(e) => text_err(e.to_string()),
        }
    }

    #[tool(description = "Classify an architecture component name into a stack category")]
    fn classify_component(
        &self,
        Parameters(req): Parameters<ClassifyRequest>,
    ) -> Result<CallToolResult, McpError> {
        let text = match promptlens_core::classify_component(&req.name) {
            Some(category) => category.label().to_string(),
            None => format!("No category matches '{}'", req.name),
        };
        text_ok(text)
    }

    #[tool(
        description = "Build an architecture component list from the technology stack of an analysis result: one component per known category, wired frontend→backend→database with auth alongside. Returns the components as a JSON array."
    )]
    fn derive_architecture(
        &self,
        Parameters(req): Parameters<AnalysisDataRequest>,
    ) -> Result<CallToolResult, McpError> {
        match promptlens_suggest::parse_analysis(&req.data) {
            Ok(result) => text_ok(to_json(&promptlens_core::derive_architecture(
                &result.technologies,
            ))),
            Err(e) => text_err(e.to_string()),
        }
    }

    #[tool(
        description = "Generate an implementation roadmap (ordered milestones with tasks, dependencies, deliverables, risks and day ranges) from the architecture of a saved analysis (name) or an analysis JSON (data). Data is reconciled first, and a missing architecture is derived from the stack."
    )]
    fn get_roadmap(
        &self,
        Parameters(req): Parameters<RoadmapRequest>,
    ) -> Result<CallToolResult, McpError> {
        let result: AnalysisResult = match (&req.name, &req.data) {
            (Some(name), _) => match self.store.read(name) {
                Ok(saved) => saved.outcome.result,
                Err(e) => return text_err(format!("Failed to read analysis '{}': {}", name, e)),
            },
            (None, Some(data)) => match promptlens_suggest::parse_analysis(data) {
                Ok(result) => promptlens_suggest::finish(result).result,
                Err(e) => return text_err(e.to_string()),
            },
            (None, None) => return text_err("Provide either name or data"),
        };

        let milestones = promptlens_core::generate_roadmap(&result.architecture);
        let total = promptlens_core::total_duration_days(&milestones);
        text_ok(to_json(&serde_json::json!({
            "milestones": milestones,
            "totalDays": total,
        })))
    }

    #[tool(description = "List all saved analyses")]
    fn list_analyses(&self) -> Result<CallToolResult, McpError> {
        match self.store.list() {
            Ok(names) if names.is_empty() => {
                text_ok("No saved analyses. Use analyze_prompt with save_as to create one.")
            }
            Ok(names) => text_ok(names.join("\n")),
            Err(e) => text_err(e.to_string()),
        }
    }

    #[tool(description = "Get a saved analysis: {prompt, outcome: {result, isSynced, corrections}}")]
    fn get_analysis(
        &self,
        Parameters(req): Parameters<NamedAnalysisRequest>,
    ) -> Result<CallToolResult, McpError> {
        match self.store.read(&req.name) {
            Ok(saved) => text_ok(to_json(&saved)),
            Err(e) => text_err(format!("Failed to read analysis '{}': {}", req.name, e)),
        }
    }

    #[tool(description = "Delete a saved analysis")]
    fn delete_analysis(
        &self,
        Parameters(req): Parameters<NamedAnalysisRequest>,
    ) -> Result<CallToolResult, McpError> {
        match self.store.delete(&req.name) {
            Ok(()) => text_ok(format!("Deleted '{}'", req.name)),
            Err(e) => text_err(e.to_string()),
        }
    }

    #[tool(
        description = "List the technology stack categories and the name keywords used to infer each one, in match order"
    )]
    fn get_categories(&self) -> Result<CallToolResult, McpError> {
        let mut out = String::new();
        for category in TechnologyCategory::ALL {
            let keywords = promptlens_core::component_keywords(category);
            out.push_str(category.label());
            if keywords.is_empty() {
                out.push_str(": (not inferred from component names)\n");
            } else {
                out.push_str(": ");
                out.push_str(&keywords.join(", "));
                out.push('\n');
            }
        }
        text_ok(out)
    }

    #[tool(description = "Show the AI provider settings. The API key is never returned.")]
    fn get_ai_settings(&self) -> Result<CallToolResult, McpError> {
        let settings = promptlens_core::read_settings();
        text_ok(to_json(&serde_json::json!({
            "provider": settings.provider,
            "model": settings.model,
            "baseUrl": settings.base_url,
            "timeoutSecs": settings.timeout_secs(),
            "hasKey": !settings.api_key.is_empty(),
            "configured": promptlens_core::ai_configured(&settings),
        })))
    }

    #[tool(description = "Configure the AI provider used by analyze_prompt")]
    fn configure_ai(
        &self,
        Parameters(req): Parameters<ConfigureAiRequest>,
    ) -> Result<CallToolResult, McpError> {
        let current = promptlens_core::read_settings();
        let settings = AiSettings {
            provider: req.provider,
            model: req.model,
            api_key: req.api_key.unwrap_or(current.api_key),
            base_url: req.base_url.or(current.base_url),
            timeout_secs: req.timeout_secs.or(current.timeout_secs),
        };
        if settings.provider == "gateway" && settings.base_url.is_none() {
            return text_err("The gateway provider requires base_url");
        }
        match promptlens_core::write_settings(&settings) {
            Ok(()) if promptlens_core::ai_configured(&settings) => text_ok("AI settings saved."),
            Ok(()) => text_ok("AI settings saved, but an API key is still missing."),
            Err(e) => text_err(e.to_string()),
        }
    }
}

const INSTRUCTIONS: &str = r#"promptlens reviews web application prompts and returns an engineering critique: dimension scores, strengths and weaknesses, a recommended technology stack (Frontend, Styling, Backend, Database, Autenticazione, Hosting), an architecture component list, best practices, and an optimized rewrite of the prompt.

## Workflow
1. Run `get_ai_settings`; if not configured, ask the user for a provider and call `configure_ai`.
2. Call `analyze_prompt` with the user's idea. Use `save_as` when the user wants to come back to it.
3. The architecture in every result is reconciled with the stack: each component whose name implies a category (see `get_categories`) carries that category's primary technology. `corrections` shows what was overwritten; `isSynced` is true when nothing was.
4. Use `get_roadmap` to turn the architecture into implementation milestones.

For results produced elsewhere, `reconcile_analysis` applies the same consistency pass and `derive_architecture` builds components from a stack alone."#;

#[tool_handler]
impl ServerHandler for PromptlensServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

/// Log to stderr; stdout carries the MCP protocol.
fn init_logging() {
    let level = std::env::var("PROMPTLENS_LOG")
        .ok()
        .and_then(|v| v.parse::<tracing::Level>().ok())
        .unwrap_or(tracing::Level::INFO);
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let store = AnalysisStore::default();
    tracing::info!(root = %store.root().display(), "starting promptlens-mcp");

    let service = PromptlensServer::new(store)
        .serve(rmcp::transport::io::stdio())
        .await
        .inspect_err(|e| tracing::error!(error = %e, "MCP server error"))?;
    service.waiting().await?;
    Ok(())
}
