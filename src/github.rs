//! GitHub repository listing for Circuit Canvas
//! Background fetch of public repos with a static sample fallback

use std::fmt;
use std::sync::mpsc::{self, Receiver};
use std::thread;

use chrono::{DateTime, TimeZone, Utc};
use serde::Deserialize;

use crate::config::GithubConfig;

pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// One repository row in the projects panel.
/// `description` and `language` are nullable in the API.
#[derive(Clone, PartialEq, Deserialize, Debug)]
pub struct RepoSummary {
    pub id: u64,
    pub name: String,
    pub html_url: String,
    pub description: Option<String>,
    pub stargazers_count: u32,
    pub language: Option<String>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ListingSource {
    Live,
    Fallback,
}

/// The resolved listing handed to the UI. Never empty on a failed fetch.
#[derive(Clone, PartialEq, Debug)]
pub struct RepoListing {
    pub repos: Vec<RepoSummary>,
    pub source: ListingSource,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub enum FetchError {
    Status(u16),
    Transport(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Status(code) => write!(f, "GitHub returned status {}", code),
            FetchError::Transport(err) => write!(f, "request failed: {}", err),
        }
    }
}

impl From<ureq::Error> for FetchError {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => FetchError::Status(code),
            other => FetchError::Transport(other.to_string()),
        }
    }
}

/// Fetches a user's public repositories, most recently updated first per the
/// API's own ordering. Non-2xx responses surface as `FetchError::Status`.
pub fn fetch_user_repos(
    base_url: &str,
    username: &str,
    per_page: usize,
) -> Result<Vec<RepoSummary>, FetchError> {
    let url = format!(
        "{}/users/{}/repos?sort=updated&per_page={}",
        base_url, username, per_page
    );

    let agent = ureq::Agent::new_with_defaults();
    let mut response = agent
        .get(&url)
        .header("Accept", "application/vnd.github+json")
        .header("User-Agent", "circuit-canvas")
        .call()?;

    let repos = response.body_mut().read_json::<Vec<RepoSummary>>()?;
    Ok(repos)
}

/// Newest update first.
pub fn sort_by_updated(repos: &mut [RepoSummary]) {
    repos.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}

/// Applies the fallback policy: every failure still yields a usable listing.
pub fn resolve_listing(result: Result<Vec<RepoSummary>, FetchError>) -> RepoListing {
    match result {
        Ok(mut repos) => {
            sort_by_updated(&mut repos);
            RepoListing {
                repos,
                source: ListingSource::Live,
            }
        }
        Err(FetchError::Status(code)) if code == 403 || code == 404 => {
            log::warn!(
                "GitHub returned {} (rate limit or unknown user), showing sample projects",
                code
            );
            RepoListing {
                repos: fallback_repos(),
                source: ListingSource::Fallback,
            }
        }
        Err(err) => {
            log::error!("GitHub fetch failed: {}", err);
            RepoListing {
                repos: fallback_repos(),
                source: ListingSource::Fallback,
            }
        }
    }
}

/// Sample projects shown whenever the live fetch is unavailable.
pub fn fallback_repos() -> Vec<RepoSummary> {
    vec![
        RepoSummary {
            id: 1,
            name: "portfolio-nextjs".to_string(),
            html_url: "https://github.com".to_string(),
            description: Some("My personal portfolio built with Next.js and Tailwind.".to_string()),
            stargazers_count: 120,
            language: Some("TypeScript".to_string()),
            updated_at: Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap(),
        },
        RepoSummary {
            id: 2,
            name: "react-component-lib".to_string(),
            html_url: "https://github.com".to_string(),
            description: Some("A comprehensive UI library for React applications.".to_string()),
            stargazers_count: 85,
            language: Some("TypeScript".to_string()),
            updated_at: Utc.with_ymd_and_hms(2024, 2, 15, 0, 0, 0).unwrap(),
        },
        RepoSummary {
            id: 3,
            name: "audit-tool-cli".to_string(),
            html_url: "https://github.com".to_string(),
            description: Some("CLI tool for auditing website performance locally.".to_string()),
            stargazers_count: 45,
            language: Some("JavaScript".to_string()),
            updated_at: Utc.with_ymd_and_hms(2024, 1, 20, 0, 0, 0).unwrap(),
        },
    ]
}

/// Fires the fetch on a worker thread; the resolved listing arrives on the
/// returned channel. The render loop polls it with `try_recv`.
pub fn spawn_fetch(config: GithubConfig) -> Receiver<RepoListing> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = fetch_user_repos(GITHUB_API_BASE, &config.username, config.per_page);
        let _ = tx.send(resolve_listing(result));
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use tiny_http::{Header, Response, Server};

    fn sample(id: u64, name: &str, updated: &str) -> RepoSummary {
        RepoSummary {
            id,
            name: name.to_string(),
            html_url: format!("https://github.com/octocat/{}", name),
            description: None,
            stargazers_count: 1,
            language: None,
            updated_at: updated.parse().unwrap(),
        }
    }

    #[test]
    fn test_fallback_repos_contents() {
        let repos = fallback_repos();
        let names: Vec<&str> = repos.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(
            names,
            ["portfolio-nextjs", "react-component-lib", "audit-tool-cli"]
        );
        assert_eq!(repos[0].stargazers_count, 120);
        assert_eq!(repos[2].language.as_deref(), Some("JavaScript"));
        assert!(repos.iter().all(|r| r.html_url == "https://github.com"));
    }

    #[test]
    fn test_rate_limit_and_unknown_user_fall_back() {
        for code in [403, 404] {
            let listing = resolve_listing(Err(FetchError::Status(code)));
            assert_eq!(listing.source, ListingSource::Fallback);
            assert_eq!(listing.repos, fallback_repos());
        }
    }

    #[test]
    fn test_other_failures_fall_back() {
        let listing = resolve_listing(Err(FetchError::Status(500)));
        assert_eq!(listing.repos, fallback_repos());

        let listing = resolve_listing(Err(FetchError::Transport("connection refused".into())));
        assert_eq!(listing.source, ListingSource::Fallback);
        assert_eq!(listing.repos, fallback_repos());
    }

    #[test]
    fn test_live_listing_sorted_newest_first() {
        let repos = vec![
            sample(1, "older", "2023-05-01T08:00:00Z"),
            sample(2, "newest", "2025-02-11T09:30:00Z"),
            sample(3, "middle", "2024-08-20T16:45:00Z"),
        ];

        let listing = resolve_listing(Ok(repos));
        assert_eq!(listing.source, ListingSource::Live);
        let names: Vec<&str> = listing.repos.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["newest", "middle", "older"]);
    }

    #[test]
    fn test_decodes_api_payload_with_nulls_and_extras() {
        let body = r#"[{
            "id": 1296269,
            "node_id": "MDEwOlJlcG9zaXRvcnkxMjk2MjY5",
            "name": "Hello-World",
            "full_name": "octocat/Hello-World",
            "html_url": "https://github.com/octocat/Hello-World",
            "description": null,
            "fork": false,
            "stargazers_count": 80,
            "language": null,
            "updated_at": "2011-01-26T19:14:43Z"
        }]"#;

        let repos: Vec<RepoSummary> = serde_json::from_str(body).unwrap();
        assert_eq!(repos.len(), 1);
        assert_eq!(repos[0].name, "Hello-World");
        assert_eq!(repos[0].description, None);
        assert_eq!(repos[0].language, None);
    }

    #[test]
    fn test_loopback_404_resolves_to_fallback() {
        let server = Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let handle = std::thread::spawn(move || {
            let request = server.recv().unwrap();
            assert_eq!(request.url(), "/users/ghost/repos?sort=updated&per_page=10");
            request
                .respond(Response::from_string("{\"message\":\"Not Found\"}").with_status_code(404))
                .unwrap();
        });

        let result = fetch_user_repos(&format!("http://{}", addr), "ghost", 10);
        handle.join().unwrap();
        assert_eq!(result, Err(FetchError::Status(404)));

        let listing = resolve_listing(result);
        assert_eq!(listing.source, ListingSource::Fallback);
        assert_eq!(listing.repos, fallback_repos());
    }

    #[test]
    fn test_loopback_success_resolves_to_sorted_live_listing() {
        let body = r#"[
            {"id": 7, "name": "dotfiles", "html_url": "https://github.com/octocat/dotfiles",
             "description": "Shell setup", "stargazers_count": 4, "language": "Shell",
             "updated_at": "2024-03-01T10:00:00Z"},
            {"id": 8, "name": "rust-toys", "html_url": "https://github.com/octocat/rust-toys",
             "description": null, "stargazers_count": 12, "language": "Rust",
             "updated_at": "2025-01-15T18:20:00Z"}
        ]"#;

        let server = Server::http("127.0.0.1:0").unwrap();
        let addr = server.server_addr().to_ip().unwrap();
        let handle = std::thread::spawn(move || {
            let request = server.recv().unwrap();
            let json_header =
                Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap();
            request
                .respond(Response::from_string(body).with_header(json_header))
                .unwrap();
        });

        let result = fetch_user_repos(&format!("http://{}", addr), "octocat", 10);
        handle.join().unwrap();

        let listing = resolve_listing(result);
        assert_eq!(listing.source, ListingSource::Live);
        let names: Vec<&str> = listing.repos.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["rust-toys", "dotfiles"]);
    }
}
