// src/generation/prompts.rs

pub fn intro_prompt(job_description: &str, num_questions: usize, persona: &str) -> String {
    format!(
        "Can you give me an interview introduction script, please keep it short, in the first person (as the interviewer), and keep it brief. \
Saying, hello, I am {persona} from the interviewing company. \
This interview is for the role in the job listing. \
Please do not leave any placeholders like [Your Name] or [Interviewer's Name] or [Company Name] in the script. \
You will ask {num_questions} questions, and the interview will need to be recorded to provide feedback. \
Ask the candidate to click the button that will come up in a second, which will take them to the interview. \
Advise them to start the recording straight away so the whole interview is captured. \
The interview questions will be in separate videos, and they should answer them chronologically, one at a time. \
Wish them the best of luck and say, 'Let's get started!' \
If details for the script are missing, fill in appropriate and realistic values based on the job description {job_description}."
    )
}

/// Asks for one question fewer than requested; the closing question is
/// appended afterwards.
pub fn questions_prompt(job_description: &str, num_questions: usize, complexity: &str, persona: &str) -> String {
    format!(
        "Generate a list of {count} interview questions. \
They will be asked by {persona}, the interviewer. \
These questions should be at a {complexity} level and should be presented as a clean list, with no extra text or introduction, or symbols. \
Please ensure the final question is NOT anything related to 'Do you have any questions for me?'. \
The first question can be 'Tell me about yourself and why you are a good fit for this job'. \
Return the list with one question per line, without explanations or other commentary. \
Based on the following job description: {job_description}.",
        count = num_questions.saturating_sub(1),
    )
}

pub fn feedback_prompt(job_description: &str) -> String {
    format!(
        "This is a test interview mp4 for the following role: {job_description}. Please provide feedback on \
body language, communication skills, and the relevance of the answers to the job description. This should be a learning experience. \
Highlight both positive (and not so positive) aspects and areas for improvement, and how the responses could be better. \
Present the feedback in a way that would render well in a HTML <p></p> paragraph, no unnecessary markup, and without any html <p></p> tags."
    )
}
