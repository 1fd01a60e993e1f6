use crate::llm_client::prompts::{truncate_chars, PLAIN_TEXT_INSTRUCTION};

/// Resume text beyond this many characters is not sent to the reviewer.
pub const MAX_RESUME_CHARS: usize = 8000;
/// Job description budget inside the review prompt.
pub const MAX_JOB_DESCRIPTION_CHARS: usize = 3000;

pub const ATS_REVIEW_SYSTEM: &str = "You are an expert ATS (Applicant Tracking System) analyzer \
    and resume optimization specialist. You respond with a single JSON object and nothing else.";

const ATS_REVIEW_TEMPLATE: &str = r#"Analyze the following resume and provide a comprehensive, detailed analysis.

Resume Text:
{resume_text}

{job_section}

Provide a detailed analysis in JSON format with the following structure:
{
    "ats_score": <number 0-100>,
    "match_percentage": <number 0-100>,
    "keyword_analysis": {
        "found": ["keyword1", "keyword2"],
        "missing": ["keyword3", "keyword4"],
        "density": <number 0-100>
    },
    "section_analysis": [
        {"name": "Contact", "present": true, "score": <0-100>, "feedback": "detailed feedback"},
        {"name": "Summary", "present": true, "score": <0-100>, "feedback": "detailed feedback"},
        {"name": "Experience", "present": true, "score": <0-100>, "feedback": "detailed feedback"},
        {"name": "Education", "present": true, "score": <0-100>, "feedback": "detailed feedback"},
        {"name": "Skills", "present": true, "score": <0-100>, "feedback": "detailed feedback"}
    ],
    "strengths": ["strength1", "strength2"],
    "weaknesses": ["weakness1", "weakness2"],
    "recommendations": ["recommendation1", "recommendation2"]
}

Personal data in the resume has been replaced by tokens such as [EMAIL] or [PHONE]; treat a
token as the information being present.

Be specific, actionable, and detailed in your analysis. Focus on ATS compatibility, keyword
optimization, and resume structure."#;

/// Builds the ATS review prompt. An empty job description asks for a general review.
pub fn build_ats_review_prompt(resume_text: &str, job_description: &str) -> String {
    let job_section = if job_description.trim().is_empty() {
        "Note: No specific job description provided. Provide general ATS analysis.".to_string()
    } else {
        format!(
            "Job Description/Requirements:\n{}",
            truncate_chars(job_description, MAX_JOB_DESCRIPTION_CHARS)
        )
    };

    let body = ATS_REVIEW_TEMPLATE
        .replace("{resume_text}", truncate_chars(resume_text, MAX_RESUME_CHARS))
        .replace("{job_section}", &job_section);
    format!("{body}\n\n{PLAIN_TEXT_INSTRUCTION}")
}
