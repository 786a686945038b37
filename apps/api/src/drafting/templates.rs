/// Fixed job-description summary returned by the template writer.
pub const SUMMARY_TEMPLATE: &str = r#"
### 📝 JD Summary

**1. Key Responsibilities**:
- Define and build AI-driven product features
- Collaborate with engineering, design, and research
- Prioritize roadmap and ship at scale

**2. Required Skills**:
- Python, SQL, prompt engineering
- Experience with LLM APIs, Streamlit

**3. Ideal Candidate**:
- Product thinker with technical fluency
- Passion for building consumer-grade AI tools

**4. Domain / Team**:
- Gemini AI Assistant | Google Workspace
"#;

/// Recruiter email draft. Placeholders: `{job_title}`, `{company_name}`, `{sender_name}`.
// The sign-off line ends in two spaces (a markdown line break).
pub const EMAIL_TEMPLATE: &str = r#"
Hi [Recruiter],

I’m applying for the **{job_title}** role at **{company_name}**, and I believe it’s an incredible match with my background in AI-powered product design.

With 3+ years of experience building tools that leverage LLMs and personalization, and as a current MBA candidate at Cornell Tech, I’m excited to bring energy and expertise to your team.

Looking forward to connecting!

Best,  
{sender_name}
"#;
