//! Language aggregation: GitHub language bytes to skill percentages.

use std::collections::BTreeMap;

use futures_util::StreamExt;
use futures_util::stream;
use tracing::{debug, warn};

use crate::models::{Repository, Skill};
use crate::services::github::GitHubClient;

/// Color used for languages missing from the palette.
pub const DEFAULT_SKILL_COLOR: &str = "#6b7280";

/// Total bytes per language across a set of repositories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageStats {
    bytes: BTreeMap<String, u64>,
}

impl LanguageStats {
    /// Add one repository's language map to the running totals.
    pub fn add(&mut self, languages: &BTreeMap<String, u64>) {
        for (name, bytes) in languages {
            *self.bytes.entry(name.clone()).or_insert(0) += bytes;
        }
    }

    /// Sum of all observed bytes.
    pub fn total(&self) -> u64 {
        self.bytes.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Convert totals into skills.
    ///
    /// Percentages are rounded half-up, entries that round to 0% are dropped
    /// and the result is ordered by percentage (descending) then name. No
    /// observed bytes yields an empty list.
    pub fn into_skills(self) -> Vec<Skill> {
        let total = self.total();
        if total == 0 {
            return Vec::new();
        }

        let mut skills: Vec<Skill> = self
            .bytes
            .into_iter()
            .map(|(name, bytes)| {
                let percentage = (bytes as f64 * 100.0 / total as f64).round() as u32;
                let color = skill_color(&name).to_string();
                Skill {
                    name,
                    percentage,
                    color,
                }
            })
            .filter(|skill| skill.percentage > 0)
            .collect();

        skills.sort_by(|a, b| {
            b.percentage
                .cmp(&a.percentage)
                .then_with(|| a.name.cmp(&b.name))
        });
        skills
    }
}

impl FromIterator<BTreeMap<String, u64>> for LanguageStats {
    fn from_iter<I: IntoIterator<Item = BTreeMap<String, u64>>>(iter: I) -> Self {
        let mut stats = LanguageStats::default();
        for languages in iter {
            stats.add(&languages);
        }
        stats
    }
}

/// Fetch language maps for every repository and sum them.
///
/// Up to `concurrency` requests run at once. A repository whose languages
/// cannot be fetched is logged and left out; it never fails the batch.
pub async fn collect_language_stats(
    client: &GitHubClient,
    repos: &[Repository],
    concurrency: usize,
) -> LanguageStats {
    let maps: Vec<Option<BTreeMap<String, u64>>> = stream::iter(repos)
        .map(|repo| async move {
            match client.get_languages(&repo.languages_url).await {
                Ok(languages) => {
                    debug!(repo = %repo.name, count = languages.len(), "Fetched languages");
                    Some(languages)
                }
                Err(e) => {
                    warn!(repo = %repo.name, "Skipping repository languages: {}", e);
                    None
                }
            }
        })
        .buffered(concurrency.max(1))
        .collect()
        .await;

    maps.into_iter().flatten().collect()
}

/// Display color for a language, framework or tool.
pub fn skill_color(name: &str) -> &'static str {
    match name {
        // Programming languages
        "JavaScript" => "#f7df1e",
        "TypeScript" => "#3178c6",
        "Python" => "#3776ab",
        "Java" => "#ed8b00",
        "C++" => "#00599c",
        "C#" => "#239120",
        "PHP" => "#777bb4",
        "Ruby" => "#cc342d",
        "Go" => "#00add8",
        "Rust" => "#ce422b",
        "Swift" => "#ffac45",
        "Kotlin" => "#7f52ff",
        "Dart" => "#0175C2",
        "Scala" => "#DC322F",
        "Perl" => "#0298c3",
        "Shell" => "#89e051",
        "Objective-C" => "#438eff",

        // Frontend
        "React" => "#61dafb",
        "Vue" => "#4fc08d",
        "Angular" => "#dd0031",
        "Next.js" => "#000000",
        "Nuxt.js" => "#00DC82",
        "Svelte" => "#FF3E00",
        "Tailwind CSS" => "#06b6d4",
        "CSS" => "#1572b6",
        "HTML" => "#e34f26",

        // Backend and frameworks
        "Node.js" => "#339933",
        "Express" => "#000000",
        "Django" => "#092e20",
        "Flask" => "#000000",
        "FastAPI" => "#009688",
        "Spring" => "#6DB33F",
        "Laravel" => "#FF2D20",
        "Symfony" => "#000000",
        "ASP.NET" => "#512BD4",

        // Databases
        "MySQL" => "#4479A1",
        "PostgreSQL" => "#336791",
        "SQLite" => "#003B57",
        "MongoDB" => "#47A248",
        "Redis" => "#DC382D",
        "MariaDB" => "#003545",
        "Oracle" => "#F80000",

        // DevOps and tooling
        "Docker" => "#2496ED",
        "Kubernetes" => "#326CE5",
        "Git" => "#F05032",
        "GitHub" => "#181717",
        "GitLab" => "#FC6D26",
        "Jenkins" => "#D24939",
        "Terraform" => "#844FBA",

        // Mobile
        "Flutter" => "#02569B",
        "React Native" => "#61dafb",
        "Android" => "#3DDC84",
        "iOS" => "#000000",

        _ => DEFAULT_SKILL_COLOR,
    }
}
