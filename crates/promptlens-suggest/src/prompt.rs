use promptlens_core::TechnologyCategory;

const DIMENSIONS: &[(&str, &str)] = &[
    ("Goal Clarity", "🎯"),
    ("Functional Completeness", "📋"),
    ("Target User Definition", "👥"),
    ("Technical Constraints", "⚙️"),
    ("Scalability Considerations", "📈"),
    ("Security Considerations", "🔒"),
    ("Maintainability", "🔧"),
    ("Architectural Awareness", "🏗️"),
];

const CATEGORY_EXAMPLES: &[(TechnologyCategory, &str)] = &[
    (TechnologyCategory::Frontend, "React, Next.js, Vue, Angular"),
    (TechnologyCategory::Styling, "Tailwind CSS, CSS Modules, Styled Components"),
    (TechnologyCategory::Backend, "Node.js, Edge Functions, Express"),
    (TechnologyCategory::Database, "PostgreSQL, Supabase, MongoDB"),
    (TechnologyCategory::Authentication, "Supabase Auth, Clerk, Auth0"),
    (TechnologyCategory::Hosting, "Vercel, Netlify, AWS"),
];

const OPTIMIZED_PROMPT_OUTLINE: &str = "\
# [Project Name]: Complete Technical Specification\n\
## 1. Project Overview (main goal, problem solved, value proposition)\n\
## 2. Target Users (primary user profile, needs, pain points; 4-6 use cases as \
\"As a [user], I want [action] so that [benefit]\")\n\
## 3. Core Features (5-8 MVP features, 2-3 step-by-step user flows)\n\
## 4. Non-Functional Requirements (performance targets, security, scalability)\n\
## 5. Recommended Technology Stack (summary with reasons)\n\
## 6. Constraints and Integrations\n\
## 7. Success Criteria (at least 3-4 KPIs)";

pub fn system_prompt() -> String {
    let dimensions: String = DIMENSIONS
        .iter()
        .enumerate()
        .map(|(i, (name, icon))| format!("{}. {} ({})\n", i + 1, name, icon))
        .collect();

    let categories: String = CATEGORY_EXAMPLES
        .iter()
        .enumerate()
        .map(|(i, (category, examples))| {
            format!("{}. \"{}\" - {}\n", i + 1, category.label(), examples)
        })
        .collect();

    let schema = serde_json::to_string_pretty(&promptlens_core::analysis_schema())
        .unwrap_or_default();

    format!(
        "You are a Senior Software Engineer and Product Architect who reviews technical \
specifications for web applications. Analyze the user's prompt and return a structured, \
professional assessment.\n\n\
Return ONLY a JSON object matching this JSON Schema:\n{schema}\n\n\
DIMENSIONS TO SCORE (all required, score 1-10, maxScore 10):\n{dimensions}\n\
TECHNOLOGY STACK CATEGORIES (all required, exactly these six labels, one entry each):\n{categories}\n\
ARCHITECTURE: one component per deployable or logical piece. Name components by role \
(\"Web Client\", \"API Server\", \"Database\", \"Identity Provider\") and set each \
component's technology to the primary technology chosen for its category.\n\n\
optimizedPrompt: a complete, detailed markdown specification (at least 800 words, \
several times longer than the original) following this outline:\n{OPTIMIZED_PROMPT_OUTLINE}\n\n\
GENERAL RULES:\n\
- Use exactly the category labels above\n\
- Identify at least 3 strengths and 3 weaknesses\n\
- Keep dimension fields short (max 2 sentences each)\n\
- Respond with valid JSON only, no text before or after"
    )
}

pub fn user_message(prompt: &str) -> String {
    format!("Analyze this web app prompt:\n\n{}", prompt)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_lists_every_category_label() {
        let prompt = system_prompt();
        for category in TechnologyCategory::ALL {
            assert!(prompt.contains(&format!("\"{}\"", category.label())), "{category}");
        }
        assert!(prompt.contains("8. Architectural Awareness"));
        assert!(prompt.contains("\"technologies\""));
    }

    #[test]
    fn user_message_embeds_prompt() {
        assert_eq!(
            user_message("A recipe sharing app"),
            "Analyze this web app prompt:\n\nA recipe sharing app"
        );
    }
}
