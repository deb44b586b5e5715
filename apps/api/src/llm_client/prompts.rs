// Cross-cutting prompt fragments.
// Each module that calls the LLM keeps its own prompts.rs alongside it and
// pulls shared instructions from here.

/// Prepended to every generation prompt.
pub const GROUNDING_INSTRUCTION: &str = "\
    CRITICAL: Every statement you write must be supported by the candidate information \
    or the existing content provided below. Do NOT invent employers, dates, degrees, \
    certifications, figures, or technologies. \
    If the information does not support a claim, leave it out.";

/// Keeps seniority and ownership wording honest.
pub const SCOPE_INSTRUCTION: &str = "\
    Describe the candidate's role at the level the source supports: \
    'Led', 'Architected', 'Owned' only where the source says so; \
    otherwise 'Contributed to', 'Worked on', 'Supported'. \
    NEVER upgrade team contributions to sole ownership.";
