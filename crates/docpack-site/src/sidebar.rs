//! Navigation sidebar generation.

use std::cmp::Ordering;

use crate::bundle::{DocumentationFile, README};

/// File name of the generated sidebar in the archive.
pub const SIDEBAR_FILE: &str = "_sidebar.md";

/// First line of every sidebar.
pub const SIDEBAR_HEADING: &str = "# Navigation";

/// Trailing attribution block.
pub const ATTRIBUTION: &str = "- [Built with docpack](https://github.com/docpack/docpack)";

/// Build `_sidebar.md` from the generated markdown files.
///
/// `README.md` always comes first, the rest follow alphabetically.
pub fn build_sidebar(files: &[DocumentationFile]) -> String {
    let mut sorted: Vec<&DocumentationFile> = files.iter().collect();
    sorted.sort_by(|a, b| compare_names(&a.name, &b.name));

    let mut sidebar = format!("{}\n\n", SIDEBAR_HEADING);

    for file in sorted {
        sidebar.push_str(&format!(
            "- [{}](/{})\n",
            display_name(&file.name),
            file.name
        ));
    }

    sidebar.push_str("\n---\n\n");
    sidebar.push_str(ATTRIBUTION);
    sidebar.push('\n');

    sidebar
}

/// Link text for a file: `.md` dropped, underscores as spaces.
pub fn display_name(name: &str) -> String {
    name.strip_suffix(".md").unwrap_or(name).replace('_', " ")
}

/// Punctuation in collation order; all of it sorts before digits and letters.
const PUNCTUATION_ORDER: &str = "_-,;:!?.'\"()[]{}@*/\\&#%`^+<=>|~$";

// Locale-style ordering: whitespace, punctuation, symbols, digits, then
// letters ignoring case. On a tie lowercase sorts before uppercase.
fn compare_names(a: &str, b: &str) -> Ordering {
    match (a == README, b == README) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a
            .chars()
            .map(primary_weight)
            .cmp(b.chars().map(primary_weight))
            .then_with(|| case_order(a, b))
            .then_with(|| a.cmp(b)),
    }
}

fn primary_weight(c: char) -> (u8, u32) {
    if c.is_whitespace() {
        (0, c as u32)
    } else if let Some(rank) = PUNCTUATION_ORDER.find(c) {
        (1, rank as u32)
    } else if let Some(digit) = c.to_digit(10) {
        (3, digit)
    } else if c.is_alphabetic() {
        (4, c.to_lowercase().next().unwrap_or(c) as u32)
    } else {
        (2, c as u32)
    }
}

fn case_order(a: &str, b: &str) -> Ordering {
    a.chars()
        .zip(b.chars())
        .find(|(x, y)| x != y)
        .map(|(x, y)| match (x.is_lowercase(), y.is_lowercase()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            _ => Ordering::Equal,
        })
        .unwrap_or(Ordering::Equal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn files(names: &[&str]) -> Vec<DocumentationFile> {
        names
            .iter()
            .map(|n| DocumentationFile::new(*n, "# content"))
            .collect()
    }

    fn link_lines(sidebar: &str) -> Vec<&str> {
        sidebar
            .lines()
            .filter(|l| l.starts_with("- [") && !l.contains("docpack"))
            .collect()
    }

    #[test]
    fn readme_always_first() {
        let sidebar = build_sidebar(&files(&["B.md", "README.md", "A.md"]));

        assert_eq!(
            link_lines(&sidebar),
            vec![
                "- [README](/README.md)",
                "- [A](/A.md)",
                "- [B](/B.md)",
            ]
        );
    }

    #[test]
    fn sorts_case_insensitively() {
        let sidebar = build_sidebar(&files(&["faq.md", "API.md", "Setup.md", "README.md"]));

        assert_eq!(
            link_lines(&sidebar),
            vec![
                "- [README](/README.md)",
                "- [API](/API.md)",
                "- [faq](/faq.md)",
                "- [Setup](/Setup.md)",
            ]
        );
    }

    #[test]
    fn punctuation_sorts_before_digits_and_letters() {
        let sidebar = build_sidebar(&files(&[
            "API.md",
            "1.md",
            "README.md",
            "API_REFERENCE.md",
            "_x.md",
            "api.md",
        ]));

        assert_eq!(
            link_lines(&sidebar),
            vec![
                "- [README](/README.md)",
                "- [ x](/_x.md)",
                "- [1](/1.md)",
                "- [API REFERENCE](/API_REFERENCE.md)",
                "- [api](/api.md)",
                "- [API](/API.md)",
            ]
        );
    }

    #[test]
    fn display_names_drop_extension_and_underscores() {
        assert_eq!(display_name("GETTING_STARTED.md"), "GETTING STARTED");
        assert_eq!(display_name("notes.txt"), "notes.txt");
        assert_eq!(display_name("README.md"), "README");
    }

    #[test]
    fn full_layout() {
        let sidebar = build_sidebar(&files(&["README.md"]));

        assert_eq!(
            sidebar,
            format!(
                "# Navigation\n\n- [README](/README.md)\n\n---\n\n{}\n",
                ATTRIBUTION
            )
        );
    }
}
