/// Instructions sent to the language model. `{n}` and `{text}` are filled in
/// by [`render_prompt`].
pub const PROMPT_TEMPLATE: &str = "
Generate {n} multiple-choice questions from the following text.
Format your output as a JSON list, where each item has:
- question: string
- options: list of 4 strings
- answer: the correct option (must match one of the options exactly)

Transcript:
{text}
";

pub fn render_prompt(text: &str, count: usize) -> String {
    PROMPT_TEMPLATE
        .replacen("{n}", &count.to_string(), 1)
        .replacen("{text}", text, 1)
}
