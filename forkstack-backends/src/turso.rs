//! `turso` CLI implementation of [`DatabaseBranches`].

use crate::error::BackendError;
use crate::runner::{run_checked, CommandRunner, Invocation, SystemRunner};
use crate::traits::{Credentials, DatabaseBranches};

pub const TURSO_BIN: &str = "turso";

pub struct TursoCli<R = SystemRunner> {
    runner: R,
    group: Option<String>,
}

impl TursoCli<SystemRunner> {
    pub fn system(group: Option<String>) -> Self {
        Self::new(SystemRunner, group)
    }
}

impl<R: CommandRunner> TursoCli<R> {
    pub fn new(runner: R, group: Option<String>) -> Self {
        Self { runner, group }
    }

    fn db(&self) -> Invocation {
        Invocation::new(TURSO_BIN).arg("db")
    }
}

impl<R: CommandRunner> DatabaseBranches for TursoCli<R> {
    fn create_branch(&self, name: &str, from: Option<&str>) -> Result<(), BackendError> {
        let inv = self
            .db()
            .args(["create", name])
            .opt("--from-db", from)
            .opt("--group", self.group.as_deref());
        let what = match from {
            Some(parent) => format!("database {parent}"),
            None => format!("database {name}"),
        };
        run_checked(&self.runner, &inv, &what)?;
        tracing::info!("created database {}", name);
        Ok(())
    }

    fn destroy_branch(&self, name: &str) -> Result<(), BackendError> {
        let inv = self.db().args(["destroy", name, "--yes"]);
        run_checked(&self.runner, &inv, &format!("database {name}"))?;
        tracing::info!("destroyed database {}", name);
        Ok(())
    }

    fn list_branches(&self) -> Result<Vec<String>, BackendError> {
        let stdout = run_checked(&self.runner, &self.db().arg("list"), "database list")?;
        Ok(parse_first_column(&stdout))
    }

    fn connection(&self, name: &str) -> Result<Credentials, BackendError> {
        let what = format!("database {name}");
        let url = run_checked(&self.runner, &self.db().args(["show", name, "--url"]), &what)?;
        let token = run_checked(
            &self.runner,
            &self.db().args(["tokens", "create", name]),
            &what,
        )?;

        let url = non_empty(url, "empty database URL")?;
        let token = non_empty(token, "empty database token")?;
        Ok(Credentials { url, token })
    }
}

/// First whitespace-separated column of a table, header row skipped.
fn parse_first_column(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .filter(|name| !name.eq_ignore_ascii_case("name"))
        .map(str::to_string)
        .collect()
}

fn non_empty(value: String, message: &str) -> Result<String, BackendError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(BackendError::InvalidOutput {
            program: TURSO_BIN.to_string(),
            message: message.to_string(),
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::{CommandOutput, ScriptedRunner};

    #[test]
    fn create_passes_parent_and_group() {
        let runner = ScriptedRunner::new();
        let turso = TursoCli::new(&runner, Some("eu".into()));
        turso
            .create_branch("myproject-alice", Some("myproject"))
            .expect("create");
        assert_eq!(
            runner.call_lines(),
            vec!["turso db create myproject-alice --from-db myproject --group eu"]
        );
    }

    #[test]
    fn destroy_is_non_interactive() {
        let runner = ScriptedRunner::new();
        TursoCli::new(&runner, None)
            .destroy_branch("myproject-alice")
            .expect("destroy");
        assert_eq!(runner.call_lines(), vec!["turso db destroy myproject-alice --yes"]);
    }

    #[test]
    fn list_skips_header_and_blank_lines() {
        let runner = ScriptedRunner::new();
        runner.on(
            &["turso", "db", "list"],
            CommandOutput::ok(
                "NAME               GROUP      URL\n\
                 myproject          default    libsql://myproject.turso.io\n\
                 \n\
                 myproject-alice    default    libsql://myproject-alice.turso.io\n",
            ),
        );
        let names = TursoCli::new(&runner, None).list_branches().expect("list");
        assert_eq!(names, vec!["myproject", "myproject-alice"]);
    }

    #[test]
    fn connection_trims_outputs() {
        let runner = ScriptedRunner::new();
        runner.on(
            &["turso", "db", "show"],
            CommandOutput::ok("libsql://myproject-bob.turso.io\n"),
        );
        runner.on(&["turso", "db", "tokens"], CommandOutput::ok("tok-123\n"));
        let creds = TursoCli::new(&runner, None)
            .connection("myproject-bob")
            .expect("connection");
        assert_eq!(creds.url, "libsql://myproject-bob.turso.io");
        assert_eq!(creds.token, "tok-123");
    }

    #[test]
    fn connection_to_missing_database_is_not_found() {
        let runner = ScriptedRunner::new();
        runner.on(
            &["turso", "db", "show"],
            CommandOutput::failed(1, "Error: database myproject-zed not found"),
        );
        let err = TursoCli::new(&runner, None)
            .connection("myproject-zed")
            .unwrap_err();
        assert!(err.is_not_found(), "got: {err}");
        assert_eq!(runner.calls().len(), 1, "token must not be minted for a missing db");
    }

    #[test]
    fn empty_url_is_invalid_output() {
        let runner = ScriptedRunner::new();
        runner.on(&["turso", "db", "tokens"], CommandOutput::ok("tok"));
        let err = TursoCli::new(&runner, None).connection("x").unwrap_err();
        assert!(matches!(err, BackendError::InvalidOutput { .. }), "got: {err}");
    }
}
