use regex::Regex;
use std::sync::LazyLock;

/// `[label](https://url)`, allowing one level of brackets inside the label.
static MARKDOWN_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[((?:[^\[\]]|\[[^\]]*\])*)\]\((https?://\S+)\)").unwrap()
});

/// `https://url (label)`
static TRAILING_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(https?://\S+)\s+\(([^\)]+)\)").unwrap()
});

/// Strip both link conventions down to their labels, for table cells.
///
/// Repeats until nothing matches, so the result is a fixed point: every
/// replacement shortens the text, which bounds the loop.
pub fn sanitize(content: &str) -> String {
    let mut current = content.to_string();
    loop {
        let next = MARKDOWN_LINK_RE.replace_all(&current, "${1}");
        let next = TRAILING_LABEL_RE.replace_all(&next, "${2}").into_owned();
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Keep the URL visible by padding it inside the parentheses, for the
/// detail view: `[label](url)` becomes `[label]( url )`.
pub fn annotate(content: &str) -> String {
    MARKDOWN_LINK_RE
        .replace_all(content, "[${1}]( ${2} )")
        .into_owned()
}
