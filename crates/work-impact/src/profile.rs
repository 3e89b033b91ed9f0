// Copyright (c) 2026 - present work-impact contributors
// SPDX-License-Identifier: MIT

//! Developer profile template and the interactive setup questions

use std::io::{self, BufRead, Write};

use serde_json::{Value, json};

/// Answers collected by `setup`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetupAnswers {
    /// Author email for `collect`
    pub git_email: String,
    /// Repository path for `collect`
    pub repo_path: String,
    /// Job title
    pub role: String,
    /// Years of experience, free text
    pub experience: String,
    /// Main tech stack
    pub focus: String,
    /// Primary project or product
    pub primary_project: String,
}

/// Ask the setup questions on `output`, reading one line per answer
///
/// A closed input yields empty answers for the remaining questions.
///
/// # Errors
///
/// Returns any I/O error from reading or writing.
pub fn ask_setup<R: BufRead, W: Write>(input: &mut R, output: &mut W) -> io::Result<SetupAnswers> {
    let mut ask = |question: &str| -> io::Result<String> {
        write!(output, "{question}")?;
        output.flush()?;
        let mut line = String::new();
        input.read_line(&mut line)?;
        Ok(line.trim().to_string())
    };

    Ok(SetupAnswers {
        git_email: ask("Your Git email: ")?,
        repo_path: ask("Repo path: ")?,
        role: ask("Your role (e.g., Senior Frontend Developer): ")?,
        experience: ask("Years of experience: ")?,
        focus: ask("Main tech stack (comma separated): ")?,
        primary_project: ask("Primary project/product name: ")?,
    })
}

fn or_default<'a>(answer: &'a str, default: &'a str) -> &'a str {
    if answer.is_empty() { default } else { answer }
}

/// Profile built from setup answers, with placeholders for the rest
#[must_use]
pub fn profile_from_answers(answers: &SetupAnswers) -> Value {
    let project = or_default(&answers.primary_project, "Project Name");
    let your_role = format!(
        "Summarize what you do on {}.",
        or_default(&answers.primary_project, "this project")
    );

    let mut profile = template_profile();
    profile["role"] = json!(or_default(&answers.role, "Frontend Developer"));
    profile["experience"] = json!(or_default(&answers.experience, "4 years"));
    profile["focus"] = json!(or_default(&answers.focus, "React, TypeScript"));
    profile["projects"][0]["name"] = json!(project);
    profile["projects"][0]["description"] =
        json!("Describe the product or initiative (update me in data/profile.json).");
    profile["projects"][0]["yourRole"] = json!(your_role);
    profile
}

/// Placeholder profile written by `init`
#[must_use]
pub fn template_profile() -> Value {
    json!({
        "role": "Frontend Developer",
        "experience": "4 years",
        "focus": "React, TypeScript, Frontend Architecture",
        "projects": [
            {
                "name": "Project Name",
                "description": "Describe the product or initiative.",
                "users": "Who benefits from the work?",
                "impact": "What business or user value does it unlock?",
                "yourRole": "Summarize what you do on this project.",
                "teamContext": {
                    "size": "Team composition (e.g., 2 FE, 3 BE, 1 PM)",
                    "yourPosition": "Where you sit within the team hierarchy",
                    "responsibilities": [
                        "List 2-3 key responsibilities",
                        "Call out any leadership or mentorship work"
                    ]
                }
            }
        ],
        "techStack": {
            "frontend": ["React", "TypeScript"],
            "tools": ["Git", "GitHub", "ESLint"],
            "architecture": ["Component-driven design", "API contract layering"],
            "expertise": ["State management", "Code review", "Type safety"]
        },
        "technicalChallenges": [
            "Describe the recurring technical challenge you are tackling",
            "Mention any architecture or quality hurdles"
        ],
        "currentGoals": [
            {
                "goal": "Example goal: Improve codebase maintainability",
                "why": "Why does this goal matter?",
                "metrics": ["Metric or heuristic you track", "Another tangible indicator"],
                "progress": "Quick note on how it's going"
            }
        ],
        "personalContext": {
            "careerStage": "Summarize your experience and aspirations",
            "nextStep": "What title/role are you aiming for next?",
            "motivations": ["What keeps you motivated?"],
            "frustrations": ["What makes the current setup hard?"],
            "proving": ["What proof points are you building toward?"]
        },
        "marketContext": {
            "location": "City / remote context",
            "industry": "Current industry focus",
            "lookingFor": "What kind of roles are you targeting?",
            "targetCompanies": ["Company 1", "Company 2"]
        }
    })
}
