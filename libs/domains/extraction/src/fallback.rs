//! Deterministic rule-based extraction.
//!
//! Used when the extraction model responds but under-delivers. Trades
//! confidence for availability: keyword/regex matching against a skill
//! vocabulary plus seniority/education heuristics always produces a result
//! for valid input.

use crate::result::{CompanyInfo, ExtractionResult};
use regex::Regex;
use std::sync::OnceLock;

const TECHNICAL_SKILLS: &[&str] = &[
    "rust",
    "python",
    "javascript",
    "typescript",
    "java",
    "kotlin",
    "c++",
    "c#",
    "go",
    "ruby",
    "php",
    "sql",
    "postgresql",
    "mysql",
    "mongodb",
    "redis",
    "elasticsearch",
    "kafka",
    "nats",
    "rabbitmq",
    "docker",
    "kubernetes",
    "terraform",
    "aws",
    "gcp",
    "azure",
    "react",
    "angular",
    "vue",
    "node.js",
    "spring",
    "django",
    "flask",
    ".net",
    "graphql",
    "rest",
    "grpc",
    "linux",
    "git",
    "ci/cd",
    "machine learning",
    "pytorch",
    "tensorflow",
    "spark",
    "airflow",
];

const SOFT_SKILLS: &[&str] = &[
    "communication",
    "leadership",
    "teamwork",
    "collaboration",
    "problem solving",
    "problem-solving",
    "mentoring",
    "ownership",
    "adaptability",
    "time management",
    "attention to detail",
    "stakeholder management",
];

const BENEFIT_KEYWORDS: &[&str] = &[
    "health insurance",
    "dental",
    "vision",
    "401k",
    "pension",
    "remote work",
    "remote-first",
    "flexible hours",
    "flexible schedule",
    "paid time off",
    "pto",
    "parental leave",
    "equity",
    "stock options",
    "bonus",
    "learning budget",
    "conference budget",
    "gym membership",
];

const INDUSTRY_KEYWORDS: &[(&str, &str)] = &[
    ("fintech", "Financial Technology"),
    ("financial services", "Financial Services"),
    ("healthcare", "Healthcare"),
    ("healthtech", "Healthcare"),
    ("e-commerce", "E-commerce"),
    ("ecommerce", "E-commerce"),
    ("saas", "SaaS"),
    ("gaming", "Gaming"),
    ("education", "Education"),
    ("edtech", "Education"),
    ("logistics", "Logistics"),
    ("cybersecurity", "Cybersecurity"),
    ("insurance", "Insurance"),
];

const RESPONSIBILITY_VERBS: &[&str] = &[
    "design",
    "build",
    "develop",
    "implement",
    "maintain",
    "lead",
    "own",
    "collaborate",
    "write",
    "review",
    "deploy",
    "monitor",
    "optimize",
    "architect",
    "investigate",
    "partner",
    "support",
    "drive",
    "mentor",
    "deliver",
    "contribute",
    "ship",
];

fn experience_range_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(\d{1,2})\s*(?:-|–|to)\s*(\d{1,2})\s*(?:years?|yrs?)")
            .expect("experience range regex is valid")
    })
}

fn experience_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)(\d{1,2})\s*\+?\s*(?:years?|yrs?)").expect("experience regex is valid")
    })
}

fn employee_count_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)([\d,]+)\s*\+?\s*employees").expect("employee count regex is valid")
    })
}

/// Keyword/regex extraction over sanitized job-description text.
#[derive(Debug, Clone, Default)]
pub struct RuleBasedExtractor;

impl RuleBasedExtractor {
    pub fn new() -> Self {
        Self
    }

    /// Extract a best-effort result and a confidence score in [0.5, 0.7].
    ///
    /// Confidence scales with how many categories the heuristics managed to
    /// fill.
    pub fn extract(&self, job_title: &str, text: &str) -> (ExtractionResult, f64) {
        let haystack = format!("{} {}", job_title, text).to_lowercase();

        let technical_skills = match_vocabulary(&haystack, TECHNICAL_SKILLS);
        let soft_skills = match_vocabulary(&haystack, SOFT_SKILLS);
        let experience_range = extract_experience(&haystack);
        let education_level = extract_education(&haystack);
        let responsibilities = extract_responsibilities(text);
        let benefits = match_vocabulary(&haystack, BENEFIT_KEYWORDS);
        let company = extract_company(&haystack);

        let filled = [
            !technical_skills.is_empty(),
            !soft_skills.is_empty(),
            experience_range != "not specified",
            education_level != "not specified",
            !responsibilities.is_empty(),
            !benefits.is_empty(),
        ]
        .iter()
        .filter(|&&f| f)
        .count();

        let confidence = (0.5 + 0.04 * filled as f64).min(0.7);

        let result = ExtractionResult {
            technical_skills,
            soft_skills,
            experience_range,
            education_level,
            responsibilities,
            benefits,
            company,
        };

        (result, confidence)
    }
}

/// Match vocabulary terms against a lowercased haystack with non-alphanumeric
/// boundaries, so "go" matches " Go, " but not "going".
fn match_vocabulary(haystack: &str, vocabulary: &[&str]) -> Vec<String> {
    vocabulary
        .iter()
        .filter(|term| contains_term(haystack, term))
        .map(|term| term.to_string())
        .collect()
}

fn contains_term(haystack: &str, term: &str) -> bool {
    let pattern = format!(r"(?:^|[^a-z0-9]){}(?:$|[^a-z0-9])", regex::escape(term));
    Regex::new(&pattern)
        .map(|re| re.is_match(haystack))
        .unwrap_or(false)
}

fn extract_experience(haystack: &str) -> String {
    if let Some(caps) = experience_range_re().captures(haystack) {
        return format!("{}-{} years", &caps[1], &caps[2]);
    }

    if let Some(caps) = experience_re().captures(haystack) {
        return format!("{}+ years", &caps[1]);
    }

    // Seniority wording as a proxy when no explicit number appears
    if ["senior", "lead", "principal", "staff"]
        .iter()
        .any(|w| contains_term(haystack, w))
    {
        return "5+ years".to_string();
    }
    if ["junior", "entry level", "entry-level", "graduate"]
        .iter()
        .any(|w| contains_term(haystack, w))
    {
        return "0-2 years".to_string();
    }

    "not specified".to_string()
}

fn extract_education(haystack: &str) -> String {
    if haystack.contains("phd") || haystack.contains("doctorate") {
        "PhD".to_string()
    } else if haystack.contains("master") {
        "Master's degree".to_string()
    } else if haystack.contains("bachelor") || haystack.contains("undergraduate") {
        "Bachelor's degree".to_string()
    } else if haystack.contains("degree") {
        "Degree required".to_string()
    } else {
        "not specified".to_string()
    }
}

/// Sentences that open with an action verb read as responsibilities.
fn extract_responsibilities(text: &str) -> Vec<String> {
    text.split(['.', ';', '•'])
        .map(str::trim)
        .filter(|sentence| sentence.len() >= 20)
        .filter(|sentence| {
            let first_word = sentence
                .split_whitespace()
                .next()
                .unwrap_or_default()
                .to_lowercase();
            RESPONSIBILITY_VERBS.contains(&first_word.as_str())
        })
        .take(10)
        .map(|sentence| sentence.to_string())
        .collect()
}

fn extract_company(haystack: &str) -> CompanyInfo {
    let industry = INDUSTRY_KEYWORDS
        .iter()
        .find(|(keyword, _)| haystack.contains(keyword))
        .map(|(_, label)| label.to_string());

    let size = if let Some(caps) = employee_count_re().captures(haystack) {
        Some(format!("{} employees", caps[1].replace(',', "")))
    } else if haystack.contains("startup") {
        Some("startup".to_string())
    } else if haystack.contains("enterprise") {
        Some("enterprise".to_string())
    } else {
        None
    };

    CompanyInfo {
        name: None,
        industry,
        size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // JD fixture: startup backend role
    const BACKEND_JD: &str = "Backend Engineer at a fast-paced fintech startup. \
        Build and maintain distributed services in Rust and PostgreSQL. \
        Design event-driven pipelines on Kafka and deploy to Kubernetes. \
        Requirements: 5+ years of backend experience, strong communication skills, \
        Bachelor's degree in Computer Science or equivalent. \
        We offer equity, health insurance, and flexible hours.";

    #[test]
    fn test_extracts_technical_skills() {
        let (result, _) = RuleBasedExtractor::new().extract("Backend Engineer", BACKEND_JD);
        assert!(result.technical_skills.contains(&"rust".to_string()));
        assert!(result.technical_skills.contains(&"postgresql".to_string()));
        assert!(result.technical_skills.contains(&"kafka".to_string()));
        assert!(result.technical_skills.contains(&"kubernetes".to_string()));
    }

    #[test]
    fn test_word_boundaries_avoid_substrings() {
        let (result, _) = RuleBasedExtractor::new()
            .extract("Engineer", "We are going to outgrow our legacy golang-free stack soon, at least 200 words of text here");
        assert!(!result.technical_skills.contains(&"go".to_string()));

        let (result, _) =
            RuleBasedExtractor::new().extract("Engineer", "Experience with Go and Rust required");
        assert!(result.technical_skills.contains(&"go".to_string()));
    }

    #[test]
    fn test_extracts_experience_range() {
        let (result, _) = RuleBasedExtractor::new().extract("Engineer", "3-5 years of experience");
        assert_eq!(result.experience_range, "3-5 years");

        let (result, _) = RuleBasedExtractor::new().extract("Engineer", "at least 7 years of Java");
        assert_eq!(result.experience_range, "7+ years");

        let (result, _) =
            RuleBasedExtractor::new().extract("Senior Engineer", "deep systems background");
        assert_eq!(result.experience_range, "5+ years");

        let (result, _) = RuleBasedExtractor::new().extract("Engineer", "nothing about tenure");
        assert_eq!(result.experience_range, "not specified");
    }

    #[test]
    fn test_extracts_education_level() {
        let (result, _) =
            RuleBasedExtractor::new().extract("Scientist", "PhD in machine learning preferred");
        assert_eq!(result.education_level, "PhD");

        let (result, _) =
            RuleBasedExtractor::new().extract("Engineer", "Bachelor's degree required");
        assert_eq!(result.education_level, "Bachelor's degree");
    }

    #[test]
    fn test_extracts_responsibilities() {
        let (result, _) = RuleBasedExtractor::new().extract("Backend Engineer", BACKEND_JD);
        assert!(!result.responsibilities.is_empty());
        assert!(result
            .responsibilities
            .iter()
            .any(|r| r.starts_with("Build and maintain")));
    }

    #[test]
    fn test_extracts_benefits_and_company() {
        let (result, _) = RuleBasedExtractor::new().extract("Backend Engineer", BACKEND_JD);
        assert!(result.benefits.contains(&"equity".to_string()));
        assert!(result.benefits.contains(&"health insurance".to_string()));
        assert_eq!(
            result.company.industry.as_deref(),
            Some("Financial Technology")
        );
        assert_eq!(result.company.size.as_deref(), Some("startup"));
    }

    #[test]
    fn test_confidence_bounds() {
        let (_, confidence) = RuleBasedExtractor::new().extract("Backend Engineer", BACKEND_JD);
        assert!(confidence >= 0.5);
        assert!(confidence <= 0.7);

        // Nothing to find: confidence stays at the floor
        let (_, low) = RuleBasedExtractor::new().extract("x", "y");
        assert!((low - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_employee_count() {
        let (result, _) = RuleBasedExtractor::new()
            .extract("Engineer", "Global enterprise with 50,000 employees");
        assert_eq!(result.company.size.as_deref(), Some("50000 employees"));
    }
}
