//! Content canonicalization for equivalence checks.

/// Canonicalize text so that formatting-only differences compare equal.
///
/// Line endings are unified to `\n`, each line is trimmed with internal
/// whitespace runs collapsed to a single space, and lines left empty are
/// dropped. The result never has a trailing newline. Idempotent.
#[must_use]
pub fn normalize(text: &str) -> String {
    let unified = text.replace("\r\n", "\n").replace('\r', "\n");

    let mut lines = Vec::new();
    for line in unified.split('\n') {
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if !collapsed.is_empty() {
            lines.push(collapsed);
        }
    }
    lines.join("\n")
}
