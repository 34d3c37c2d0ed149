// Prompt constants for relevance scoring.

/// System prompt for job-fit scoring.
pub const SCORING_SYSTEM: &str = "You are an expert technical recruiter who assesses \
    how well a candidate fits a job. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences.";

/// Scoring prompt. Replace: {job_json}, {profile_json}
pub const SCORING_PROMPT_TEMPLATE: &str = r#"Analyze the match between this job and candidate profile.

JOB:
{job_json}

CANDIDATE:
{profile_json}

Return a JSON object with these scores, each a number from 0.0 to 1.0:
{
  "overall_score": 0.0,
  "skill_match": 0.0,
  "experience_match": 0.0,
  "location_match": 0.0,
  "reasoning": "One or two sentences explaining the scores"
}

Scoring guidance:
- skill_match: overlap between the job's required / nice-to-have skills and the candidate's skills, weighted by proficiency
- experience_match: candidate years of experience and current title against the experience the job asks for
- location_match: job country, city and remote flag against the candidate's preferred countries, cities and remote preference
- overall_score: your overall judgement of fit, not necessarily an average

All four scores are required."#;
