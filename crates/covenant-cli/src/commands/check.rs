//! The `covenant check` subcommand.
//!
//! Evaluates the pull request named by the Actions event payload and fails
//! the step if any human author is missing from the signer registry.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Duration;

use clap::Args;
use color_eyre::eyre::{Result, bail};
use covenant_core::Outcome;
use covenant_github::client::DEFAULT_API_URL;
use covenant_github::{
    Evaluation, GateRequest, GitHubClient, PullRequestEvent, PullRequestRef, RegistryLocation,
    RepoRef, evaluate,
};
use tracing::info;

use crate::actions;

/// Name of the step output listing missing signers.
const MISSING_OUTPUT: &str = "missing";

/// Arguments for `covenant check`.
#[derive(Args)]
pub struct CheckArgs {
    /// Token used to read commits and the registry. Falls back to
    /// `GITHUB_TOKEN`.
    #[arg(long, env = "INPUT_GITHUB-TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// Path of the signer registry file within the registry repository.
    #[arg(long, env = "INPUT_CONTRIBUTORS-FILE", value_name = "PATH")]
    pub contributors_file: String,

    /// Owner of the repository holding the registry [default: the pull
    /// request's base repository owner].
    #[arg(long, env = "INPUT_CONTRIBUTORS-REPOSITORY-OWNER", value_name = "OWNER")]
    pub contributors_repository_owner: Option<String>,

    /// Name of the repository holding the registry [default: the pull
    /// request's base repository name].
    #[arg(long, env = "INPUT_CONTRIBUTORS-REPOSITORY-NAME", value_name = "NAME")]
    pub contributors_repository_name: Option<String>,

    /// Path to the JSON payload of the triggering event.
    #[arg(long, env = "GITHUB_EVENT_PATH", value_name = "PATH")]
    pub event_path: PathBuf,

    /// Repository the pull request belongs to [default: the pull request's
    /// base repository].
    #[arg(long, env = "GITHUB_REPOSITORY", value_name = "OWNER/NAME")]
    pub repository: Option<String>,

    /// GitHub REST API root.
    #[arg(long, env = "GITHUB_API_URL", value_name = "URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// File receiving step outputs.
    #[arg(long, env = "GITHUB_OUTPUT", value_name = "PATH")]
    pub output_file: Option<PathBuf>,

    /// Per-request timeout in seconds.
    #[arg(long, value_name = "SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Output the evaluation as JSON.
    #[arg(long)]
    pub json: bool,
}

/// Execute the check command.
pub async fn execute(args: &CheckArgs) -> Result<()> {
    let event = PullRequestEvent::from_file(&args.event_path)?;
    let token = resolve_token(args.github_token.clone())?;
    let request = build_request(args, &event)?;
    info!(
        pull_request = %request.pull_request,
        registry = %request.registry,
        "evaluating pull request"
    );

    let api_url =
        non_empty(Some(args.api_url.clone())).unwrap_or_else(|| DEFAULT_API_URL.to_owned());
    let client = GitHubClient::new(&api_url, &token, Duration::from_secs(args.timeout_secs))?;
    let evaluation = evaluate(&client, &client, &request).await?;

    let mut stdout = std::io::stdout().lock();
    let passed = publish(
        &evaluation,
        args.json,
        args.output_file.as_deref(),
        &mut stdout,
    )?;
    if !passed {
        process::exit(1);
    }

    Ok(())
}

/// Report the evaluation to `out` and set step outputs. Returns whether the
/// gate passed. A satisfied run writes nothing unless `json` is set.
fn publish(
    evaluation: &Evaluation,
    json: bool,
    output_file: Option<&Path>,
    out: &mut impl Write,
) -> Result<bool> {
    let passed = evaluation.outcome.is_satisfied();

    if json {
        let report = serde_json::json!({
            "passed": passed,
            "authors": evaluation.authors,
            "signers": evaluation.signers,
            "missing": evaluation.outcome.missing(),
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    }

    match &evaluation.outcome {
        Outcome::Satisfied => {
            info!(
                authors = evaluation.authors.len(),
                "all contributors have signed the CLA"
            );
        }
        Outcome::Unsatisfied(missing) => {
            if !json {
                writeln!(
                    out,
                    "Not all contributors have signed the CLA. Missing: {}",
                    missing.names()
                )?;
            }
            actions::set_output(output_file, MISSING_OUTPUT, &missing.mentions())?;
        }
    }

    Ok(passed)
}

fn build_request(args: &CheckArgs, event: &PullRequestEvent) -> Result<GateRequest> {
    let Some(contributors_file) = non_empty(Some(args.contributors_file.clone())) else {
        bail!("the contributors-file input must not be empty");
    };

    let repo = match non_empty(args.repository.clone()) {
        Some(raw) => raw.parse::<RepoRef>()?,
        None => event.base.clone(),
    };

    Ok(GateRequest {
        pull_request: PullRequestRef {
            repo,
            number: event.number,
        },
        registry: RegistryLocation::resolve(
            &event.base,
            non_empty(args.contributors_repository_owner.clone()),
            non_empty(args.contributors_repository_name.clone()),
            contributors_file,
        ),
        expected_commits: Some(event.commits),
    })
}

fn resolve_token(input: Option<String>) -> Result<String> {
    let Some(token) = non_empty(input).or_else(|| non_empty(std::env::var("GITHUB_TOKEN").ok()))
    else {
        bail!("missing GitHub token: set the github-token input or GITHUB_TOKEN");
    };
    Ok(token)
}

/// Actions passes unset optional inputs as empty strings.
fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use covenant_core::{AuthorSet, CommitAuthorship, Identity, MissingSet, SignerRegistry};

    fn id(name: &str) -> Identity {
        Identity::new(name).expect("valid identity")
    }

    fn evaluation(commits: &[CommitAuthorship], signers: &[&str]) -> Evaluation {
        let authors = AuthorSet::from_commits(commits).expect("linked");
        let signers: SignerRegistry = signers.iter().map(|s| id(s)).collect();
        let outcome = Outcome::from_missing(MissingSet::between(&authors, &signers));
        Evaluation {
            authors,
            signers,
            outcome,
        }
    }

    fn args(event_path: PathBuf) -> CheckArgs {
        CheckArgs {
            github_token: Some("t".to_owned()),
            contributors_file: ".github/contributors.yml".to_owned(),
            contributors_repository_owner: None,
            contributors_repository_name: None,
            event_path,
            repository: None,
            api_url: DEFAULT_API_URL.to_owned(),
            output_file: None,
            timeout_secs: 30,
            json: false,
        }
    }

    fn event() -> PullRequestEvent {
        PullRequestEvent {
            number: 5,
            base: RepoRef::new("upstream", "project"),
            commits: 3,
        }
    }

    #[test]
    fn unsatisfied_writes_missing_output_and_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let output = dir.path().join("github_output");
        let eval = evaluation(
            &[
                CommitAuthorship::human("1", id("alice")),
                CommitAuthorship::human("2", id("bob")),
                CommitAuthorship::automated("3", id("ci-bot")),
            ],
            &["alice"],
        );

        let mut out = Vec::new();
        let passed = publish(&eval, false, Some(&output), &mut out).expect("publish");
        assert!(!passed);
        assert_eq!(
            String::from_utf8(out).expect("utf-8"),
            "Not all contributors have signed the CLA. Missing: bob\n"
        );

        let written = std::fs::read_to_string(&output).expect("output written");
        assert!(written.starts_with("missing<<"), "{written}");
        assert!(written.contains("\n@bob\n"), "{written}");
    }

    #[test]
    fn satisfied_writes_no_output() {
        let dir = tempfile::tempdir().expect("tempdir");
        let output = dir.path().join("github_output");
        let eval = evaluation(&[CommitAuthorship::human("1", id("alice"))], &["alice", "bob"]);

        let mut out = Vec::new();
        let passed = publish(&eval, false, Some(&output), &mut out).expect("publish");
        assert!(passed);
        assert!(out.is_empty(), "satisfied run printed {:?}", String::from_utf8_lossy(&out));
        assert!(!output.exists(), "no output file expected when satisfied");
    }

    #[test]
    fn empty_pull_request_passes() {
        let eval = evaluation(&[], &[]);
        let mut out = Vec::new();
        assert!(publish(&eval, true, None, &mut out).expect("publish"));

        let report: serde_json::Value = serde_json::from_slice(&out).expect("JSON report");
        assert_eq!(report["passed"], serde_json::Value::Bool(true));
        assert_eq!(report["missing"], serde_json::json!([]));
    }

    #[test]
    fn registry_defaults_to_base_repository() {
        let request = build_request(&args(PathBuf::from("event.json")), &event()).expect("request");
        assert_eq!(request.pull_request.repo, RepoRef::new("upstream", "project"));
        assert_eq!(request.pull_request.number, 5);
        assert_eq!(request.registry.repo, RepoRef::new("upstream", "project"));
        assert_eq!(request.registry.path, ".github/contributors.yml");
        assert_eq!(request.expected_commits, Some(3));
    }

    #[test]
    fn empty_overrides_are_ignored() {
        let mut a = args(PathBuf::from("event.json"));
        a.contributors_repository_owner = Some(String::new());
        a.contributors_repository_name = Some("  ".to_owned());
        a.repository = Some(String::new());
        let request = build_request(&a, &event()).expect("request");
        assert_eq!(request.registry.repo, RepoRef::new("upstream", "project"));
        assert_eq!(request.pull_request.repo, RepoRef::new("upstream", "project"));
    }

    #[test]
    fn overrides_and_repository_are_applied() {
        let mut a = args(PathBuf::from("event.json"));
        a.contributors_repository_owner = Some("legal".to_owned());
        a.repository = Some("upstream/project".to_owned());
        let request = build_request(&a, &event()).expect("request");
        assert_eq!(request.registry.repo, RepoRef::new("legal", "project"));
    }

    #[test]
    fn empty_contributors_file_is_rejected() {
        let mut a = args(PathBuf::from("event.json"));
        a.contributors_file = String::new();
        assert!(build_request(&a, &event()).is_err());
    }

    #[test]
    fn malformed_repository_is_rejected() {
        let mut a = args(PathBuf::from("event.json"));
        a.repository = Some("no-slash".to_owned());
        let err = build_request(&a, &event()).unwrap_err();
        assert!(err.to_string().contains("owner/name"), "{err}");
    }

    #[test]
    fn explicit_token_wins() {
        assert_eq!(resolve_token(Some("abc".to_owned())).expect("token"), "abc");
    }
}
