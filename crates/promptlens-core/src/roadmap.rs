//! Rule-based implementation roadmap derived from the architecture
//! component list.

use serde::{Deserialize, Serialize};

use crate::ArchitectureComponent;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct DayRange {
    pub min: u32,
    pub max: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Milestone {
    pub id: String,
    pub phase: usize,
    pub title: String,
    pub description: String,
    pub duration: DayRange,
    pub tasks: Vec<String>,
    /// IDs of milestones that must finish first
    pub dependencies: Vec<String>,
    pub deliverables: Vec<String>,
    pub risks: Vec<String>,
}

struct Template {
    id: &'static str,
    title: &'static str,
    description: &'static str,
    days: (u32, u32),
    /// Preferred predecessors; the first one present in the plan is used.
    after: &'static [&'static str],
    tasks: &'static [&'static str],
    deliverables: &'static [&'static str],
    risks: &'static [&'static str],
}

const SETUP: Template = Template {
    id: "setup",
    title: "Setup & Planning",
    description: "Prepare the development environment and write down the initial architecture",
    days: (1, 2),
    after: &[],
    tasks: &[
        "Initialize the Git repository",
        "Configure the local development environment",
        "Define the folder structure",
        "Configure linting, formatting and type checking",
        "Write the architecture document",
    ],
    deliverables: &["Configured repository", "Working local environment", "Initial documentation"],
    risks: &[],
};

const DATABASE: Template = Template {
    id: "database",
    title: "Database & Schema",
    description: "Design and implement the database schema",
    days: (2, 3),
    after: &["setup"],
    tasks: &[
        "Design the entity-relationship schema",
        "Create the core tables",
        "Define relations between entities",
        "Implement migrations",
        "Configure automatic backups",
    ],
    deliverables: &["Complete database schema", "Working migrations", "Seed data for development"],
    risks: &[
        "A denormalized schema causes problems later",
        "Missing indexes degrade performance",
    ],
};

const AUTH: Template = Template {
    id: "auth",
    title: "Authentication & Security",
    description: "Implement authentication and authorization",
    days: (2, 4),
    after: &["database", "setup"],
    tasks: &[
        "Configure the authentication provider",
        "Implement sign-in and registration",
        "Handle JWT tokens",
        "Implement row level security",
        "Configure user roles",
    ],
    deliverables: &["Working sign-in", "Protected routes", "Session management"],
    risks: &[
        "Untested access policies can expose sensitive data",
        "Mishandled tokens create vulnerabilities",
    ],
};

const BACKEND: Template = Template {
    id: "backend",
    title: "Backend & API",
    description: "Build the API and the business logic",
    days: (3, 5),
    after: &["auth", "database", "setup"],
    tasks: &[
        "Define the API endpoints",
        "Implement input validation",
        "Write the handlers",
        "Implement error handling",
        "Write API tests",
    ],
    deliverables: &["Documented API (OpenAPI)", "Test coverage above 80%", "Consistent error handling"],
    risks: &[
        "An unversioned API breaks clients",
        "Missing rate limiting invites abuse",
    ],
};

const FRONTEND: Template = Template {
    id: "frontend-core",
    title: "Frontend Core",
    description: "Build the main user interface",
    days: (4, 7),
    after: &["backend", "auth", "setup"],
    tasks: &[
        "Set up the design system",
        "Create the base components",
        "Implement the main layout",
        "Configure routing",
        "Implement state management",
    ],
    deliverables: &["Documented design system", "Reusable components", "Responsive layout"],
    risks: &[
        "Inaccessible components exclude users",
        "Poor performance on mobile",
    ],
};

const FEATURES: Template = Template {
    id: "features",
    title: "Core Features",
    description: "Implement the core functionality of the application",
    days: (5, 10),
    after: &["frontend-core", "backend", "setup"],
    tasks: &[
        "Implement the MVP features",
        "Integrate frontend and backend",
        "Handle edge cases",
        "Add user feedback (toasts, loading states)",
        "Optimize performance",
    ],
    deliverables: &["Working MVP", "Complete user flows", "Visual feedback for every action"],
    risks: &["Scope creep delays the release", "Untested bugs reach production"],
};

const TESTING: Template = Template {
    id: "testing",
    title: "Testing & QA",
    description: "Thorough testing and quality control",
    days: (2, 4),
    after: &["features"],
    tasks: &[
        "Write end-to-end tests",
        "Accessibility testing",
        "Performance testing",
        "Basic security audit",
        "Bug fixing",
    ],
    deliverables: &["Test coverage report", "Lighthouse score above 90", "No critical vulnerabilities"],
    risks: &[
        "Insufficient tests let bugs into production",
        "No monitoring after release",
    ],
};

const DEPLOY: Template = Template {
    id: "deploy",
    title: "Deploy & Launch",
    description: "Production deployment and go-live",
    days: (1, 2),
    after: &["testing"],
    tasks: &[
        "Configure CI/CD",
        "Set up monitoring and alerting",
        "Configure domain and TLS",
        "Deploy to staging",
        "Deploy to production",
    ],
    deliverables: &["Application in production", "Active monitoring", "Incident runbook"],
    risks: &[
        "Downtime during deployment",
        "Configuration drift between staging and production",
    ],
};

fn name_has(c: &ArchitectureComponent, needles: &[&str]) -> bool {
    let name = c.name.to_lowercase();
    needles.iter().any(|n| name.contains(n))
}

fn tech_has(c: &ArchitectureComponent, needles: &[&str]) -> bool {
    let tech = c.technology.to_lowercase();
    needles.iter().any(|n| tech.contains(n))
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Milestones in execution order. Setup, features, testing and deploy are
/// always present; database, auth, backend and frontend phases appear only
/// when the architecture has a matching component. A milestone depends on
/// its first preferred predecessor that made it into the plan.
pub fn generate_roadmap(components: &[ArchitectureComponent]) -> Vec<Milestone> {
    let has_database = components
        .iter()
        .any(|c| name_has(c, &["database", "db"]) || tech_has(c, &["postgres", "supabase"]));
    let has_auth = components.iter().any(|c| name_has(c, &["auth", "identity"]));
    let has_backend = components
        .iter()
        .any(|c| name_has(c, &["backend", "api", "server", "edge"]));
    let has_frontend = components
        .iter()
        .any(|c| name_has(c, &["frontend", "ui"]) || tech_has(c, &["react", "next"]));

    let plan: [(&Template, bool); 8] = [
        (&SETUP, true),
        (&DATABASE, has_database),
        (&AUTH, has_auth),
        (&BACKEND, has_backend),
        (&FRONTEND, has_frontend),
        (&FEATURES, true),
        (&TESTING, true),
        (&DEPLOY, true),
    ];

    let mut milestones: Vec<Milestone> = Vec::new();
    for (template, included) in plan {
        if !included {
            continue;
        }
        let dependencies: Vec<String> = template
            .after
            .iter()
            .find(|id| milestones.iter().any(|m| m.id == **id))
            .map(|id| vec![id.to_string()])
            .unwrap_or_default();
        milestones.push(Milestone {
            id: template.id.to_string(),
            phase: milestones.len(),
            title: template.title.to_string(),
            description: template.description.to_string(),
            duration: DayRange {
                min: template.days.0,
                max: template.days.1,
            },
            tasks: strings(template.tasks),
            dependencies,
            deliverables: strings(template.deliverables),
            risks: strings(template.risks),
        });
    }
    milestones
}

/// Upper-bound estimate: the sum of every milestone's maximum days.
pub fn total_duration_days(milestones: &[Milestone]) -> u32 {
    milestones.iter().map(|m| m.duration.max).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(name: &str, technology: &str) -> ArchitectureComponent {
        ArchitectureComponent {
            id: name.to_lowercase(),
            name: name.to_string(),
            technology: technology.to_string(),
            ..Default::default()
        }
    }

    fn ids(milestones: &[Milestone]) -> Vec<&str> {
        milestones.iter().map(|m| m.id.as_str()).collect()
    }

    #[test]
    fn bare_architecture_gets_fixed_phases() {
        let milestones = generate_roadmap(&[]);
        assert_eq!(ids(&milestones), vec!["setup", "features", "testing", "deploy"]);
        assert_eq!(milestones[1].dependencies, vec!["setup"]);
        assert_eq!(total_duration_days(&milestones), 2 + 10 + 4 + 2);
    }

    #[test]
    fn full_stack_gets_every_phase_in_order() {
        let milestones = generate_roadmap(&[
            component("React Client", "React"),
            component("Edge Functions", "Deno"),
            component("Database", "PostgreSQL"),
            component("Auth", "Supabase Auth"),
        ]);
        assert_eq!(
            ids(&milestones),
            vec!["setup", "database", "auth", "backend", "frontend-core", "features", "testing", "deploy"]
        );
        for (i, m) in milestones.iter().enumerate() {
            assert_eq!(m.phase, i);
        }
        assert_eq!(milestones[2].dependencies, vec!["database"]);
        assert_eq!(milestones[3].dependencies, vec!["auth"]);
        assert_eq!(milestones[4].dependencies, vec!["backend"]);
        assert_eq!(total_duration_days(&milestones), 37);
    }

    #[test]
    fn technology_hints_count() {
        // Database detected from technology, frontend from a Next.js label.
        let milestones = generate_roadmap(&[
            component("Storage", "Supabase"),
            component("Site", "Next.js"),
        ]);
        assert_eq!(
            ids(&milestones),
            vec!["setup", "database", "frontend-core", "features", "testing", "deploy"]
        );
        // Frontend skips over the database phase straight to setup.
        assert_eq!(milestones[2].dependencies, vec!["setup"]);
        assert_eq!(milestones[3].dependencies, vec!["frontend-core"]);
    }
}
