//! Prompt text helpers shared by every node that combines free text.

/// Normalize a prompt fragment.
///
/// Leading and trailing whitespace is trimmed, every internal whitespace run
/// becomes a single space, and leading/trailing commas are stripped together
/// with any whitespace they were hiding.
pub fn normalize(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed
        .trim_matches(|c: char| c == ',' || c.is_whitespace())
        .to_string()
}

/// Join prompt parts with `sep`, skipping parts that normalize to nothing.
///
/// The separator is trimmed and followed by a single space, so `","` joins as
/// `"a, b"`.
pub fn join_strings<S: AsRef<str>>(sep: &str, parts: &[S]) -> String {
    let glue = format!("{} ", sep.trim());
    parts
        .iter()
        .map(|part| normalize(part.as_ref()))
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(&glue)
}

/// Replace `[1]`, `[2]`, ... in `pattern` with the matching argument.
///
/// Placeholders without a matching argument are left untouched.
pub fn format_pattern<S: AsRef<str>>(pattern: &str, args: &[S]) -> String {
    let mut out = pattern.to_string();
    for (i, arg) in args.iter().enumerate() {
        out = out.replace(&format!("[{}]", i + 1), arg.as_ref());
    }
    out
}

/// Split multi-line text into normalized, non-empty prompt lines.
pub fn split_prompt_lines(text: &str) -> Vec<String> {
    text.split('\n')
        .map(normalize)
        .filter(|line| !line.is_empty())
        .collect()
}
