//! URL normalization for known document hosts.

use url::Url;

/// Rewrite a human-facing document URL into a raw-text endpoint.
///
/// Rules are checked in order and the first match wins:
/// - Google Docs `/document/d/{id}/...` becomes the plain-text export URL.
/// - GitHub `/blob/` file views point at `raw.githubusercontent.com`.
/// - Codeberg `/{owner}/{repo}/src/...` file views become `/raw/` on the same host.
///
/// Anything else, including input that does not parse as a URL, is returned
/// unchanged. Normalizing an already normalized URL yields the same URL.
pub fn normalize_source_url(raw: &str) -> String {
    let Ok(parsed) = Url::parse(raw) else {
        return raw.to_string();
    };

    google_doc_export(&parsed)
        .or_else(|| github_raw(&parsed))
        .or_else(|| codeberg_raw(&parsed))
        .unwrap_or_else(|| raw.to_string())
}

fn google_doc_export(url: &Url) -> Option<String> {
    if url.host_str() != Some("docs.google.com") {
        return None;
    }

    let segments: Vec<&str> = url.path_segments()?.collect();
    let id = segments
        .windows(3)
        .find(|w| w[0] == "document" && w[1] == "d" && !w[2].is_empty())
        .map(|w| w[2])?;

    Some(format!(
        "https://docs.google.com/document/d/{}/export?format=txt",
        id
    ))
}

fn github_raw(url: &Url) -> Option<String> {
    if url.host_str() != Some("github.com") || !url.path().contains("/blob/") {
        return None;
    }

    let raw_path = url.path().replacen("/blob/", "/", 1);
    Some(format!("https://raw.githubusercontent.com{}", raw_path))
}

fn codeberg_raw(url: &Url) -> Option<String> {
    if url.host_str() != Some("codeberg.org") {
        return None;
    }

    // Only the view segment right after owner/repo is rewritten, so a
    // `src` directory deeper in the file path never triggers a second pass.
    let mut segments: Vec<&str> = url.path_segments()?.collect();
    if segments.len() < 4 || segments[2] != "src" {
        return None;
    }
    segments[2] = "raw";

    Some(format!("https://codeberg.org/{}", segments.join("/")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn rewrites_google_doc_to_text_export() {
        assert_eq!(
            normalize_source_url("https://docs.google.com/document/d/abc123/edit?usp=sharing"),
            "https://docs.google.com/document/d/abc123/export?format=txt"
        );
    }

    #[test]
    fn rewrites_github_blob_to_raw_host() {
        assert_eq!(
            normalize_source_url("https://github.com/owner/repo/blob/main/docs/README.md"),
            "https://raw.githubusercontent.com/owner/repo/main/docs/README.md"
        );
    }

    #[test]
    fn rewrites_codeberg_src_to_raw() {
        assert_eq!(
            normalize_source_url("https://codeberg.org/owner/repo/src/branch/main/README.md"),
            "https://codeberg.org/owner/repo/raw/branch/main/README.md"
        );
    }

    #[test]
    fn leaves_unknown_hosts_alone() {
        let url = "https://example.com/blob/readme.txt";
        assert_eq!(normalize_source_url(url), url);

        let repo_root = "https://github.com/owner/repo";
        assert_eq!(normalize_source_url(repo_root), repo_root);
    }

    #[test]
    fn returns_unparseable_input_unchanged() {
        assert_eq!(normalize_source_url("not a url"), "not a url");
        assert_eq!(normalize_source_url(""), "");
        assert_eq!(normalize_source_url("github.com/o/r/blob/x"), "github.com/o/r/blob/x");
    }

    #[test]
    fn normalization_is_idempotent() {
        let inputs = [
            "https://docs.google.com/document/d/abc123/edit",
            "https://docs.google.com/document/d/abc123/export?format=txt",
            "https://github.com/owner/repo/blob/main/blob/notes.md",
            "https://codeberg.org/owner/repo/src/branch/main/src/lib.rs",
            "https://codeberg.org/owner/repo/raw/branch/main/README.md",
            "https://example.com/a/b",
            "::not-a-url::",
        ];

        for input in inputs {
            let once = normalize_source_url(input);
            assert_eq!(normalize_source_url(&once), once, "input: {}", input);
        }
    }
}
