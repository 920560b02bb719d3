//! Prompt assembly.
//!
//! Turns the collected content and diff blocks into the single prompt
//! string sent to the analysis service. Sections, in order: full content
//! of newly seen files (omitted entirely when there are none), diffs for
//! every in-scope file, the caller's instruction, and a fixed directive
//! asking for Markdown output.

use indexmap::IndexMap;

use crate::constants::{MAX_PROMPT_CHARS, TRUNCATION_MARKER};

/// Closing directive so the answer renders cleanly as a comment.
const FORMAT_DIRECTIVE: &str = "Format your entire response as GitHub-flavored Markdown.";

/// Assemble the analysis prompt.
///
/// The result never exceeds [`MAX_PROMPT_CHARS`]: over-long prompts are
/// cut from the end and terminated with a visible truncation marker, so
/// the service sees partial context instead of rejecting the request.
pub fn assemble(
    code_blocks: &IndexMap<String, String>,
    diff_blocks: &IndexMap<String, String>,
    instruction: &str,
) -> String {
    assemble_with_limit(code_blocks, diff_blocks, instruction, MAX_PROMPT_CHARS)
}

/// Same as [`assemble`] with an explicit cap. Split out for testing.
pub fn assemble_with_limit(
    code_blocks: &IndexMap<String, String>,
    diff_blocks: &IndexMap<String, String>,
    instruction: &str,
    max_chars: usize,
) -> String {
    let mut prompt = String::new();

    if !code_blocks.is_empty() {
        prompt.push_str("## Content of affected files\n\n");
        for (path, content) in code_blocks {
            prompt.push_str(&format!("### File: {path}\n\n```\n{content}\n```\n\n"));
        }
    }

    prompt.push_str("## Diffs\n\n");
    for (path, patch) in diff_blocks {
        prompt.push_str(&format!("### Diff: {path}\n\n```diff\n{patch}\n```\n\n"));
    }

    prompt.push_str("## Instructions\n\n");
    prompt.push_str(instruction.trim());
    prompt.push_str("\n\n");
    prompt.push_str(FORMAT_DIRECTIVE);
    prompt.push('\n');

    truncate_to(prompt, max_chars)
}

/// Deterministic prefix truncation: keep the head, drop the tail, end
/// with the marker. The returned string is exactly `max_chars` characters
/// when truncation happens.
fn truncate_to(prompt: String, max_chars: usize) -> String {
    if prompt.chars().count() <= max_chars {
        return prompt;
    }

    let marker_len = TRUNCATION_MARKER.chars().count();
    let keep = max_chars.saturating_sub(marker_len);
    let mut truncated: String = prompt.chars().take(keep).collect();
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn blocks(entries: &[(&str, &str)]) -> IndexMap<String, String> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn sections_appear_in_order() {
        let code = blocks(&[("src/app.ts", "const x = 1;")]);
        let diffs = blocks(&[("src/app.ts", "+const x = 1;")]);
        let prompt = assemble(&code, &diffs, "Summarise the change.");

        let content_pos = prompt.find("## Content of affected files").unwrap();
        let diff_pos = prompt.find("## Diffs").unwrap();
        let instr_pos = prompt.find("## Instructions").unwrap();
        let directive_pos = prompt.find(FORMAT_DIRECTIVE).unwrap();
        assert!(content_pos < diff_pos);
        assert!(diff_pos < instr_pos);
        assert!(instr_pos < directive_pos);
    }

    #[test]
    fn content_section_omitted_when_empty() {
        let diffs = blocks(&[("src/app.ts", "+const x = 1;")]);
        let prompt = assemble(&IndexMap::new(), &diffs, "Summarise.");
        assert!(!prompt.contains("## Content of affected files"));
        assert!(prompt.contains("## Diffs"));
    }

    #[test]
    fn blocks_are_fenced_per_file() {
        let code = blocks(&[("a.rs", "fn a() {}")]);
        let diffs = blocks(&[("a.rs", "+fn a() {}")]);
        let prompt = assemble(&code, &diffs, "x");
        assert!(prompt.contains("### File: a.rs\n\n```\nfn a() {}\n```"));
        assert!(prompt.contains("### Diff: a.rs\n\n```diff\n+fn a() {}\n```"));
    }

    #[test]
    fn instruction_text_included_trimmed() {
        let diffs = blocks(&[("a.rs", "+x")]);
        let prompt = assemble(&IndexMap::new(), &diffs, "  Do the thing.  \n");
        assert!(prompt.contains("## Instructions\n\nDo the thing.\n"));
    }

    #[test]
    fn truncation_is_exact_and_marked() {
        let big = "x".repeat(500);
        let code = blocks(&[("big.rs", big.as_str())]);
        let diffs = blocks(&[("big.rs", "+x")]);
        let max = 200;
        let prompt = assemble_with_limit(&code, &diffs, "instr", max);
        assert_eq!(prompt.chars().count(), max);
        assert!(prompt.ends_with(TRUNCATION_MARKER));
    }

    #[test]
    fn truncation_is_deterministic() {
        let big = "y".repeat(400);
        let code = blocks(&[("big.rs", big.as_str())]);
        let diffs = blocks(&[("big.rs", "+y")]);
        let a = assemble_with_limit(&code, &diffs, "instr", 150);
        let b = assemble_with_limit(&code, &diffs, "instr", 150);
        assert_eq!(a, b);
    }

    #[test]
    fn short_prompt_is_untouched() {
        let diffs = blocks(&[("a.rs", "+x")]);
        let prompt = assemble(&IndexMap::new(), &diffs, "short");
        assert!(!prompt.contains(TRUNCATION_MARKER.trim()));
    }

    #[test]
    fn deterministic_block_order_follows_insertion() {
        let code = blocks(&[("b.rs", "bbb"), ("a.rs", "aaa")]);
        let diffs = blocks(&[("b.rs", "+b"), ("a.rs", "+a")]);
        let prompt = assemble(&code, &diffs, "x");
        let b_pos = prompt.find("### File: b.rs").unwrap();
        let a_pos = prompt.find("### File: a.rs").unwrap();
        assert!(b_pos < a_pos, "IndexMap order must be preserved");
    }
}
