//! Request/response records for the analysis round trips.
//!
//! Field names are camelCase on the wire: the same names are used in the
//! prompt, the JSON schema handed to the model, and the HTTP API.

use serde::{Deserialize, Serialize};

/// Denominator every strength score must use.
pub const MAX_STRENGTH_SCORE: f64 = 10.0;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    pub resume_text: String,
    #[serde(default)]
    pub job_role: Option<String>,
}

/// ATS compatibility classification. Any other string is a schema violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AtsCompatibility {
    Poor,
    Average,
    Strong,
}

impl AtsCompatibility {
    pub const ALL: [AtsCompatibility; 3] = [Self::Poor, Self::Average, Self::Strong];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Poor => "Poor",
            Self::Average => "Average",
            Self::Strong => "Strong",
        }
    }
}

/// Resume sections that receive suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Summary,
    Skills,
    Experience,
    Projects,
    Education,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Self::Summary,
        Self::Skills,
        Self::Experience,
        Self::Projects,
        Self::Education,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Skills => "skills",
            Self::Experience => "experience",
            Self::Projects => "projects",
            Self::Education => "education",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionSuggestions {
    pub summary: Vec<String>,
    pub skills: Vec<String>,
    pub experience: Vec<String>,
    pub projects: Vec<String>,
    pub education: Vec<String>,
}

impl SectionSuggestions {
    pub fn get(&self, section: Section) -> &[String] {
        match section {
            Section::Summary => &self.summary,
            Section::Skills => &self.skills,
            Section::Experience => &self.experience,
            Section::Projects => &self.projects,
            Section::Education => &self.education,
        }
    }
}

/// A score string such as `"7/10"`.
///
/// The original text is kept and serialized back unchanged; the parsed
/// numbers are only used for the gauge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StrengthScore {
    raw: String,
    score: f64,
    max_score: f64,
}

impl StrengthScore {
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn gauge(&self) -> ScoreGauge {
        let percentage = if self.max_score > 0.0 {
            self.score * 100.0 / self.max_score
        } else {
            0.0
        };
        ScoreGauge {
            score: self.score,
            max_score: self.max_score,
            percentage,
        }
    }
}

impl TryFrom<String> for StrengthScore {
    type Error = String;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        let (score, max_score) = raw
            .split_once('/')
            .ok_or_else(|| format!("strength score '{raw}' is not of the form N/10"))?;

        let score: f64 = score
            .trim()
            .parse()
            .map_err(|_| format!("strength score '{raw}' has a non-numeric score"))?;
        let max_score: f64 = max_score
            .trim()
            .parse()
            .map_err(|_| format!("strength score '{raw}' has a non-numeric maximum"))?;

        if max_score != MAX_STRENGTH_SCORE {
            return Err(format!("strength score '{raw}' must be out of 10"));
        }
        if !score.is_finite() || !(0.0..=max_score).contains(&score) {
            return Err(format!("strength score '{raw}' is out of range"));
        }

        Ok(Self {
            raw,
            score,
            max_score,
        })
    }
}

impl From<StrengthScore> for String {
    fn from(score: StrengthScore) -> Self {
        score.raw
    }
}

/// Numbers behind the score gauge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreGauge {
    pub score: f64,
    pub max_score: f64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AnalysisResult {
    pub resume_strength_score: StrengthScore,
    pub ats_compatibility: AtsCompatibility,
    pub original_summary: String,
    pub improved_summary: String,
    pub skills_to_add_or_improve: Vec<String>,
    pub ats_keywords_missing: Vec<String>,
    pub section_wise_suggestions: SectionSuggestions,
}

/// Input of the improved-summary round trip (also the tool's argument shape).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ImprovedSummaryInput {
    pub resume_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ImprovedSummary {
    pub improved_summary: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRewriteRequest {
    pub resume_text: String,
    pub improved_summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ImprovedResumeText {
    pub improved_resume_text: String,
}
