//! File names for rendered memory images.
//!
//! Titles become lowercase hyphenated stems like "grandmas-70th-birthday".

use std::path::{Path, PathBuf};

/// Longest stem kept from a title.
const MAX_SLUG_LEN: usize = 60;

/// Stem used when a title has no usable characters.
pub const FALLBACK_SLUG: &str = "memory";

/// Turn a title into a file-safe stem.
///
/// Keeps ASCII letters and digits, collapses everything else to single
/// hyphens, and drops apostrophes so "Grandma's" becomes "grandmas".
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_hyphen = false;

    for ch in title.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(ch.to_ascii_lowercase());
        } else if ch == '\'' || ch == '\u{2019}' {
            continue;
        } else {
            pending_hyphen = true;
        }
        if slug.len() >= MAX_SLUG_LEN {
            break;
        }
    }

    let slug = slug.trim_end_matches('-').to_string();
    if slug.is_empty() {
        FALLBACK_SLUG.to_string()
    } else {
        slug
    }
}

/// First free path `dir/{stem}{suffix}`, then `{stem}-2{suffix}`, `-3`, ...
pub fn unique_output_path(dir: &Path, stem: &str, suffix: &str) -> PathBuf {
    let candidate = dir.join(format!("{}{}", stem, suffix));
    if !candidate.exists() {
        return candidate;
    }

    let mut counter = 2u32;
    loop {
        let candidate = dir.join(format!("{}-{}{}", stem, counter, suffix));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}
