//! Featured project extraction from README text.
//!
//! A repository opts into the portfolio by placing a comment block in its README:
//!
//! ```text
//! <!-- PORTFOLIO-FEATURED
//! Título: Home Service
//! Descrição: Scheduling platform for home services
//! Tecnologias: Go, Rust
//! Demo: https://example.com
//! Destaque: Built in a weekend
//! Imagem: docs/screenshot.png
//! -->
//! ```
//!
//! Labels may be Portuguese or English, with or without accents.

use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::models::project::keys;
use crate::models::{FeaturedMetadata, FeaturedProject, Repository};

/// Marker token that opens a featured block.
pub const FEATURED_MARKER: &str = "PORTFOLIO-FEATURED";

static BLOCK_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    let pattern = format!(r"(?is)<!--[ \t]*{}(.*?)-->", regex::escape(FEATURED_MARKER));
    Regex::new(&pattern).expect("valid featured block pattern")
});

static FIELD_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*([\w-]+)[ \t]*:[ \t]*(.+)$").expect("valid featured field pattern")
});

/// Parse the featured block out of a README.
///
/// Returns `None` when the README carries no marker block. A block without any
/// `label: value` lines yields empty metadata, which still marks the
/// repository as featured.
pub fn extract_featured_metadata(readme: &str) -> Option<FeaturedMetadata> {
    let block = BLOCK_PATTERN.captures(readme)?.get(1)?.as_str();

    let mut metadata = FeaturedMetadata::default();
    for caps in FIELD_PATTERN.captures_iter(block) {
        let key = normalize_label(&caps[1]);
        let value = caps[2].trim();
        if key.is_empty() {
            continue;
        }
        metadata.insert(key, value.to_string());
    }

    Some(metadata)
}

/// Map a label to its canonical key.
///
/// Labels are decomposed (NFD) and stripped of combining marks, so composed
/// and decomposed spellings of an accented label map to the same key.
pub fn normalize_label(label: &str) -> String {
    let folded: String = label
        .trim()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase();

    match folded.as_str() {
        "titulo" => keys::TITLE.to_string(),
        "descricao" => keys::DESCRIPTION.to_string(),
        "tecnologias" => keys::TECHNOLOGIES.to_string(),
        "destaque" => keys::HIGHLIGHT.to_string(),
        "imagem" => keys::IMAGE.to_string(),
        "demonstracao" => keys::DEMO.to_string(),
        _ => folded,
    }
}

/// Build a project card for a repository whose README carries a featured block.
///
/// Returns `None` when the repository has no README or the README has no block.
/// Missing metadata falls back to the repository's own fields.
pub fn build_featured_project(repo: &Repository, raw_base: &str) -> Option<FeaturedProject> {
    let readme = repo.readme_content.as_deref()?;
    let meta = extract_featured_metadata(readme)?;

    let image_url = meta.image().map(|image| {
        if is_absolute_url(image) {
            image.to_string()
        } else {
            raw_content_url(raw_base, &repo.owner.login, &repo.name, repo.branch(), image)
        }
    });

    Some(FeaturedProject {
        id: repo.id,
        name: meta.title().unwrap_or(&repo.name).to_string(),
        description: meta
            .description()
            .map(str::to_string)
            .or_else(|| repo.description.clone())
            .unwrap_or_default(),
        technologies: meta.technologies(),
        demo_url: meta.demo().map(str::to_string),
        github_url: repo.html_url.clone(),
        highlight: meta.highlight().map(str::to_string),
        image_url,
        stars: repo.stargazers_count,
        forks: repo.forks_count,
        updated_at: repo.updated_at,
        readme_content: Some(readme.to_string()),
    })
}

/// Absolute URL for a file inside a repository on the raw content host.
///
/// Every path segment is percent-encoded; `/` separators in the branch and
/// the file path are preserved.
pub fn raw_content_url(raw_base: &str, owner: &str, repo: &str, branch: &str, path: &str) -> String {
    let path = path.trim_start_matches("./").trim_start_matches('/');
    format!(
        "{}/{}/{}/{}/{}",
        raw_base.trim_end_matches('/'),
        urlencoding::encode(owner),
        urlencoding::encode(repo),
        encode_segments(branch),
        encode_segments(path)
    )
}

fn encode_segments(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn is_absolute_url(s: &str) -> bool {
    let lower = s.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}
