use serde::Deserialize;

use super::github::CommitState;

/// Result callback posted by the validation pipeline once a run finishes.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineResultEvent {
    pub pull_status_url: String,
    pub pull_html_url: String,
    pub pull_url: String,
    pub pull_comments_url: String,
    pub pull_number: u64,
    pub status: CommitState,
    pub pull_author: String,
    pub pull_title: String,
    pub go_job_console_url: String,
    pub go_description: String,
}

/// Variables passed to a scheduled pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineVariables {
    pub pull_number: u64,
    pub pull_status_url: String,
    pub pull_html_url: String,
    pub pull_comments_url: String,
    pub pull_url: String,
    pub pull_title: String,
    pub pull_author: String,
    pub pull_repo_url: String,
}

impl PipelineVariables {
    /// Form fields in the `variables[name]=value` shape the schedule API expects.
    pub fn form_fields(&self) -> Vec<(String, String)> {
        [
            ("pull_number", self.pull_number.to_string()),
            ("pull_status_url", self.pull_status_url.clone()),
            ("pull_html_url", self.pull_html_url.clone()),
            ("pull_comments_url", self.pull_comments_url.clone()),
            ("pull_url", self.pull_url.clone()),
            ("pull_title", self.pull_title.clone()),
            ("pull_author", self.pull_author.clone()),
            ("pull_repo_url", self.pull_repo_url.clone()),
        ]
        .into_iter()
        .map(|(name, value)| (format!("variables[{}]", name), value))
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_result_callback() {
        let event: PipelineResultEvent = serde_json::from_value(serde_json::json!({
            "pull_status_url": "https://api.github.com/repos/o/r/statuses/abc",
            "pull_html_url": "https://github.com/o/r/pull/42",
            "pull_url": "https://api.github.com/repos/o/r/pulls/42",
            "pull_comments_url": "https://api.github.com/repos/o/r/issues/42/comments",
            "pull_number": 42,
            "status": "failure",
            "pull_author": "octocat",
            "pull_title": "Add widget",
            "go_job_console_url": "http://ci/42",
            "go_description": "tests failed"
        }))
        .unwrap();

        assert_eq!(event.pull_number, 42);
        assert_eq!(event.status, CommitState::Failure);
        assert_eq!(event.go_job_console_url, "http://ci/42");
    }

    #[test]
    fn form_fields_are_wrapped_in_variables() {
        let vars = PipelineVariables {
            pull_number: 7,
            pull_status_url: "s".into(),
            pull_html_url: "h".into(),
            pull_comments_url: "c".into(),
            pull_url: "u".into(),
            pull_title: "t".into(),
            pull_author: "a".into(),
            pull_repo_url: "r".into(),
        };
        let fields = vars.form_fields();

        assert_eq!(fields.len(), 8);
        assert_eq!(fields[0], ("variables[pull_number]".to_string(), "7".to_string()));
        assert!(fields.contains(&("variables[pull_repo_url]".to_string(), "r".to_string())));
    }
}
