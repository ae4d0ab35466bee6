// All LLM prompt templates for the analysis module.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::analysis::models::{AnalysisRequest, SummaryRewriteRequest};
use crate::llm_client::prompts::{fill_template, JSON_ONLY_SYSTEM};

pub const REVIEWER_PERSONA: &str = "You are a professional ATS resume reviewer and career coach.";

pub const WRITER_PERSONA: &str = "You are a professional resume writer.";

/// Clause used when the caller names a target role. Replace `{job_role}`.
pub const ROLE_CLAUSE_TEMPLATE: &str = "TARGET ROLE: The candidate is applying for the role of \
\"{job_role}\". Tailor the score, the missing keywords and every suggestion to that role.";

/// Clause used when no target role is given.
pub const FRESHER_CLAUSE: &str = "TARGET ROLE: None given. Assume the candidate is a student or \
fresher and give general-purpose feedback.";

/// Analysis prompt. Replace: {audience_clause}, {resume_text}
pub const ANALYSIS_PROMPT_TEMPLATE: &str = r#"Analyze the resume text provided below and return a JSON object with exactly these seven fields:

1. "resumeStrengthScore": overall strength as a string of the form "N/10", e.g. "7/10".
2. "atsCompatibility": how well the resume will pass automated screening. Exactly one of "Poor", "Average", "Strong".
3. "originalSummary": the professional summary exactly as it appears in the resume. Use an empty string if there is none.
4. "improvedSummary": an improved professional summary, 3-4 lines long. You may call the generateImprovedSummary tool to produce it.
5. "skillsToAddOrImprove": an array of skills to add or improve, one skill per entry.
6. "atsKeywordsMissing": an array of important keywords missing from the resume, one keyword per entry.
7. "sectionWiseSuggestions": an object with the keys "summary", "skills", "experience", "projects" and "education". Each value is an array of short suggestions for that section. Where it helps, include a brief "before" and "after" example.

{audience_clause}

RULES:
- Keep all suggestions concise and practical.
- Do not rewrite the entire resume.
- Return ONLY the JSON object with the fields above, nothing else.

RESUME TEXT:
{resume_text}"#;

/// Improved summary prompt. Replace: {resume_text}
pub const IMPROVED_SUMMARY_PROMPT_TEMPLATE: &str = r#"Analyze the following resume text and decide whether its professional summary is weak or could be improved.

- If it can be improved, write a new professional summary that is 3-4 lines long.
- If the summary is already strong, return it as is without modifications.

Return a JSON object: {"improvedSummary": "..."}

RESUME TEXT:
{resume_text}"#;

/// Summary splice prompt. Replace: {resume_text}, {improved_summary}
pub const SUMMARY_REWRITE_PROMPT_TEMPLATE: &str = r#"You will be given the original resume text and a new, improved professional summary.

Replace the professional summary section of the resume with the new one.

- The original summary may be labeled "Professional Summary", "Summary", "Profile" or something similar.
- Replace the entire original summary section with the new summary.
- Keep every other part of the resume text exactly the same.
- Return the full, updated resume text.

Return a JSON object: {"improvedResumeText": "..."}

ORIGINAL RESUME TEXT:
{resume_text}

NEW IMPROVED SUMMARY:
{improved_summary}"#;

/// Persona followed by the JSON-only rules.
pub fn system_prompt(persona: &str) -> String {
    format!("{persona} {JSON_ONLY_SYSTEM}")
}

/// Renders the analysis prompt. The resume text is embedded verbatim; exactly
/// one of the role clause or the fresher clause is included.
pub fn build_analysis_prompt(request: &AnalysisRequest) -> String {
    let audience_clause = match request.job_role.as_deref() {
        Some(role) => fill_template(ROLE_CLAUSE_TEMPLATE, &[("job_role", role)]),
        None => FRESHER_CLAUSE.to_string(),
    };

    fill_template(
        ANALYSIS_PROMPT_TEMPLATE,
        &[
            ("audience_clause", audience_clause.as_str()),
            ("resume_text", request.resume_text.as_str()),
        ],
    )
}

pub fn build_improved_summary_prompt(resume_text: &str) -> String {
    fill_template(IMPROVED_SUMMARY_PROMPT_TEMPLATE, &[("resume_text", resume_text)])
}

pub fn build_summary_rewrite_prompt(request: &SummaryRewriteRequest) -> String {
    fill_template(
        SUMMARY_REWRITE_PROMPT_TEMPLATE,
        &[
            ("resume_text", request.resume_text.as_str()),
            ("improved_summary", request.improved_summary.as_str()),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "John Doe\nSoftware Engineer\nBuilt {things} with Rust & Go.";

    fn request(job_role: Option<&str>) -> AnalysisRequest {
        AnalysisRequest {
            resume_text: RESUME.to_string(),
            job_role: job_role.map(String::from),
        }
    }

    #[test]
    fn test_prompt_contains_resume_verbatim() {
        assert!(build_analysis_prompt(&request(None)).contains(RESUME));
        assert!(build_analysis_prompt(&request(Some("SRE"))).contains(RESUME));
    }

    #[test]
    fn test_prompt_with_role_names_role_and_skips_fresher_clause() {
        let prompt = build_analysis_prompt(&request(Some("Software Engineer")));
        assert!(prompt.contains("\"Software Engineer\""));
        assert!(!prompt.contains(FRESHER_CLAUSE));
    }

    #[test]
    fn test_prompt_without_role_uses_fresher_clause_only() {
        let prompt = build_analysis_prompt(&request(None));
        assert!(prompt.contains(FRESHER_CLAUSE));
        assert!(!prompt.contains("applying for the role of"));
    }

    #[test]
    fn test_prompt_keeps_placeholder_lookalikes_in_user_text() {
        let prompt = build_analysis_prompt(&AnalysisRequest {
            resume_text: "Skills: {audience_clause}".to_string(),
            job_role: Some("{resume_text}".to_string()),
        });
        assert!(prompt.contains("Skills: {audience_clause}"));
        assert!(prompt.contains("\"{resume_text}\""));
    }

    #[test]
    fn test_prompt_enumerates_seven_output_fields() {
        let prompt = build_analysis_prompt(&request(None));
        for field in [
            "resumeStrengthScore",
            "atsCompatibility",
            "originalSummary",
            "improvedSummary",
            "skillsToAddOrImprove",
            "atsKeywordsMissing",
            "sectionWiseSuggestions",
        ] {
            assert!(prompt.contains(field), "prompt is missing {field}");
        }
        assert!(prompt.contains("Do not rewrite the entire resume."));
        assert!(prompt.contains("Keep all suggestions concise"));
    }

    #[test]
    fn test_rewrite_prompt_contains_both_inputs() {
        let prompt = build_summary_rewrite_prompt(&SummaryRewriteRequest {
            resume_text: RESUME.to_string(),
            improved_summary: "Backend engineer focused on reliability.".to_string(),
        });
        assert!(prompt.contains(RESUME));
        assert!(prompt.contains("Backend engineer focused on reliability."));
    }

    #[test]
    fn test_system_prompt_demands_json() {
        let system = system_prompt(REVIEWER_PERSONA);
        assert!(system.starts_with(REVIEWER_PERSONA));
        assert!(system.contains("valid JSON only"));
    }
}
