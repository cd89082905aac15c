//! Email domain manager.
//!
//! Wraps the email tool's command line and the header cache behind typed
//! operations. Quick queries are run and parsed here. Slow operations
//! (update, send, mark read, body, attachments) only build an
//! [`Invocation`]; the caller hands it to a worker and handles completion.

use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::{ConfigField, ConfigMode, WriteOutcome, resolve_fields};
use crate::error::{Error, Result};
use crate::model::{Account, Folder, Header};
use crate::process::{Invocation, run};
use crate::protocol::{parse_account_line, parse_config, parse_folder_line, parse_lines};
use crate::settings::Settings;
use crate::store::{HeaderStore, UidIndex};

/// Which rendering of a message body to fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyFormat {
    /// Plain text.
    #[default]
    Plain,
    /// HTML.
    Html,
}

impl BodyFormat {
    const fn flag(self) -> &'static str {
        match self {
            Self::Plain => "--body-plain",
            Self::Html => "--body-html",
        }
    }
}

/// A message to hand to `--smtp`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutgoingMail {
    /// Primary recipients; must not be empty.
    pub to: Vec<String>,
    /// Carbon-copy recipients.
    pub cc: Vec<String>,
    /// Blind carbon-copy recipients.
    pub bcc: Vec<String>,
    /// Subject line.
    pub subject: String,
    /// Plain text body.
    pub body: String,
    /// Files to attach.
    pub attachments: Vec<PathBuf>,
}

/// Typed operations over the email tool and its header cache.
#[derive(Debug, Clone)]
pub struct EmailManager {
    email_command: Vec<String>,
    store: HeaderStore,
    sent_folder: String,
}

impl EmailManager {
    /// Creates a manager from settings.
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        Self {
            email_command: settings.email_command.clone(),
            store: HeaderStore::new(&settings.cache_dir),
            sent_folder: settings.sent_folder.clone(),
        }
    }

    /// Name of the reserved sent folder.
    #[must_use]
    pub fn sent_folder(&self) -> &str {
        &self.sent_folder
    }

    fn email(&self) -> Invocation {
        Invocation::new(self.email_command.iter().cloned())
    }

    /// Runs a quick query, logging (but tolerating) a non-zero exit.
    async fn query(&self, invocation: Invocation) -> Result<String> {
        let output = run(&invocation).await?;
        if !output.is_success() {
            warn!(
                "`{invocation}` exited with {}: {}",
                output.exit_code,
                output.stderr.trim_end()
            );
        }
        Ok(output.stdout)
    }

    /// Lists configured accounts (`--accounts`).
    ///
    /// # Errors
    ///
    /// Returns an error if the email tool cannot be started.
    pub async fn list_accounts(&self) -> Result<Vec<Account>> {
        let out = self.query(self.email().arg("--accounts")).await?;
        Ok(parse_lines("account", &out, parse_account_line))
    }

    /// Lists the folders of `account` (`--folders`).
    ///
    /// # Errors
    ///
    /// Returns an error if the email tool cannot be started.
    pub async fn list_folders(&self, account: &str) -> Result<Vec<Folder>> {
        let out = self.query(self.email().args(["--folders", account])).await?;
        Ok(parse_lines("folder", &out, parse_folder_line))
    }

    /// Reads headers from the cache, newest first.
    ///
    /// UIDs in `exclude` are skipped, then at most `limit` headers are
    /// resolved. Returns the number of lines in the UID index (before
    /// deduplication, exclusion and truncation) alongside the headers. UIDs whose header file is
    /// missing or malformed are dropped.
    #[must_use]
    pub fn fetch_headers(
        &self,
        account: &str,
        folder: &str,
        limit: Option<usize>,
        exclude: &HashSet<u64>,
    ) -> (usize, Vec<Header>) {
        let mut uids = self.store.uids(account, folder, UidIndex::All);
        let total = uids.len();
        uids.sort_unstable_by(|a, b| b.cmp(a));
        uids.dedup();

        let wanted = uids.into_iter().filter(|uid| !exclude.contains(uid));
        let wanted: Vec<u64> = match limit {
            Some(limit) => wanted.take(limit).collect(),
            None => wanted.collect(),
        };

        let unread: HashSet<u64> = self
            .store
            .uids(account, folder, UidIndex::Unread)
            .into_iter()
            .collect();
        let headers: Vec<Header> = wanted
            .into_iter()
            .filter_map(|uid| self.store.header(account, folder, uid))
            .map(|header| self.decorate(header, folder, &unread))
            .collect();

        debug!(
            "Fetched {} of {total} headers for {account}/{folder}",
            headers.len()
        );
        (total, headers)
    }

    /// Reads one header from the cache, with read and sent flags set.
    #[must_use]
    pub fn get_header(&self, account: &str, folder: &str, uid: u64) -> Option<Header> {
        let header = self.store.header(account, folder, uid)?;
        let unread: HashSet<u64> = self
            .store
            .uids(account, folder, UidIndex::Unread)
            .into_iter()
            .collect();
        Some(self.decorate(header, folder, &unread))
    }

    fn decorate(&self, mut header: Header, folder: &str, unread: &HashSet<u64>) -> Header {
        header.is_sent = folder == self.sent_folder;
        header.read = !unread.contains(&header.uid);
        header
    }

    /// Reads raw config values (`--read-config [ACCOUNT]` or `--read-options`).
    ///
    /// # Errors
    ///
    /// Returns an error if the email tool cannot be started.
    pub async fn read_config(
        &self,
        mode: ConfigMode,
        account: Option<&str>,
    ) -> Result<BTreeMap<String, String>> {
        let invocation = match mode {
            ConfigMode::Account => self.email().arg("--read-config").args(account),
            ConfigMode::Options => self.email().arg("--read-options"),
        };
        Ok(parse_config(&self.query(invocation).await?))
    }

    /// Builds the editable fields for `mode`.
    ///
    /// Account mode without an account gives an empty form for a new account
    /// and does not call the tool. With an account, `name` defaults to the
    /// account's own name.
    ///
    /// # Errors
    ///
    /// Returns an error if the email tool cannot be started.
    pub async fn config_fields(
        &self,
        mode: ConfigMode,
        account: Option<&str>,
    ) -> Result<Vec<ConfigField>> {
        let values = match (mode, account) {
            (ConfigMode::Account, None) => BTreeMap::new(),
            (ConfigMode::Account, Some(name)) => {
                let mut values = self.read_config(mode, account).await?;
                values
                    .entry("name".to_string())
                    .or_insert_with(|| name.to_string());
                values
            }
            (ConfigMode::Options, _) => self.read_config(mode, None).await?,
        };
        Ok(resolve_fields(mode.schema(), &values))
    }

    /// Writes config values (`--write-config ACCOUNT` or `--write-options`).
    ///
    /// # Errors
    ///
    /// Returns an error if account mode has no account, or the tool cannot
    /// be started. A non-zero exit is reported in the outcome.
    pub async fn write_config(
        &self,
        mode: ConfigMode,
        values: &[(String, String)],
        account: Option<&str>,
    ) -> Result<WriteOutcome> {
        let invocation = match mode {
            ConfigMode::Account => {
                let account = account
                    .filter(|a| !a.is_empty())
                    .ok_or_else(|| Error::MissingSelection("account name is required".into()))?;
                self.email().args(["--write-config", account])
            }
            ConfigMode::Options => self.email().arg("--write-options"),
        };
        let invocation =
            invocation.args(values.iter().map(|(key, value)| format!("{key}={value}")));

        let output = run(&invocation).await?;
        Ok(WriteOutcome {
            exit_code: output.exit_code,
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }

    /// Saves edited fields. In account mode the `name` field selects the
    /// account and every other field is written.
    ///
    /// # Errors
    ///
    /// See [`Self::write_config`].
    pub async fn save_config_fields(
        &self,
        mode: ConfigMode,
        fields: &[ConfigField],
    ) -> Result<WriteOutcome> {
        let mut account = None;
        let mut values = Vec::with_capacity(fields.len());
        for field in fields {
            if mode == ConfigMode::Account && field.name == "name" {
                account = Some(field.value.as_str());
            } else {
                values.push((field.name.clone(), field.value.clone()));
            }
        }
        self.write_config(mode, &values, account).await
    }

    /// `--update [ACCOUNT]`; without an account, every non-skipped account.
    #[must_use]
    pub fn update(&self, account: Option<&str>) -> Invocation {
        self.email().arg("--update").args(account)
    }

    /// `--mark-read` / `--mark-unread` for one message.
    #[must_use]
    pub fn mark_read(&self, account: &str, folder: &str, uid: u64, read: bool) -> Invocation {
        let flag = if read { "--mark-read" } else { "--mark-unread" };
        self.email()
            .arg(flag)
            .arg(format!("--folder={folder}"))
            .arg(account)
            .arg(uid.to_string())
    }

    /// `--body-plain` / `--body-html` for one message.
    #[must_use]
    pub fn fetch_body(&self, account: &str, folder: &str, uid: u64, format: BodyFormat) -> Invocation {
        self.email()
            .arg(format.flag())
            .arg(format!("--folder={folder}"))
            .arg(account)
            .arg(uid.to_string())
    }

    /// `--attachments`, saving into `dest_dir`.
    #[must_use]
    pub fn save_attachments(
        &self,
        account: &str,
        folder: &str,
        uid: u64,
        dest_dir: &Path,
    ) -> Invocation {
        self.email()
            .arg("--attachments")
            .arg(format!("--folder={folder}"))
            .arg(account)
            .arg(dest_dir.to_string_lossy())
            .arg(uid.to_string())
    }

    /// `--smtp ACCOUNT SUBJECT BODY TO [--to E]* [--cc E]* [--bcc E]* [--attach P]*`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingSelection`] if there is no recipient.
    pub fn send_mail(&self, account: &str, mail: &OutgoingMail) -> Result<Invocation> {
        let (first_to, other_to) = mail
            .to
            .split_first()
            .ok_or_else(|| Error::MissingSelection("TO is empty".into()))?;

        let mut invocation = self
            .email()
            .args(["--smtp", account, mail.subject.as_str(), mail.body.as_str(), first_to.as_str()]);
        let recipients = [
            ("--to", other_to),
            ("--cc", mail.cc.as_slice()),
            ("--bcc", mail.bcc.as_slice()),
        ];
        for (flag, addresses) in recipients {
            for address in addresses {
                invocation = invocation.args([flag, address.as_str()]);
            }
        }
        for path in &mail.attachments {
            invocation = invocation.arg("--attach").arg(path.to_string_lossy());
        }
        Ok(invocation)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::needless_collect,
    clippy::similar_names
)]
mod tests {
    use super::*;

    /// A manager whose email tool is a shell script receiving the flags as `$@`.
    fn manager_with_script(script: &str, cache_dir: &Path) -> EmailManager {
        EmailManager::new(&Settings {
            email_command: vec![
                "sh".into(),
                "-c".into(),
                script.into(),
                "email.pl".into(),
            ],
            cache_dir: cache_dir.to_path_buf(),
            ..Settings::default()
        })
    }

    fn write_folder(root: &Path, account: &str, folder: &str, uids: &[u64], unread: &[u64]) {
        let dir = root.join(account).join(folder);
        std::fs::create_dir_all(dir.join("headers")).unwrap();
        let join = |ids: &[u64]| {
            ids.iter()
                .map(u64::to_string)
                .collect::<Vec<_>>()
                .join("\n")
        };
        std::fs::write(dir.join("all"), join(uids)).unwrap();
        std::fs::write(dir.join("unread"), join(unread)).unwrap();
        for uid in uids {
            std::fs::write(
                dir.join("headers").join(uid.to_string()),
                format!(
                    "Date: day {uid}\nFrom: Sender {uid} <s{uid}@example.com>\nTo: me@example.com\nSubject: message {uid}\n"
                ),
            )
            .unwrap();
        }
    }

    #[test]
    fn test_fetch_headers_descending_with_flags() {
        let dir = tempfile::tempdir().unwrap();
        write_folder(dir.path(), "Work", "inbox", &[3, 10, 7, 1, 5], &[7, 1]);
        let manager = manager_with_script("exit 0", dir.path());

        let (total, headers) = manager.fetch_headers("Work", "inbox", None, &HashSet::new());
        assert_eq!(total, 5);
        let uids: Vec<u64> = headers.iter().map(|h| h.uid).collect();
        assert_eq!(uids, vec![10, 7, 5, 3, 1]);
        let unread: Vec<u64> = headers.iter().filter(|h| !h.read).map(|h| h.uid).collect();
        assert_eq!(unread, vec![7, 1]);
        assert!(headers.iter().all(|h| !h.is_sent));
    }

    #[test]
    fn test_fetch_headers_limit_and_exclude() {
        let dir = tempfile::tempdir().unwrap();
        let all: Vec<u64> = (1..=50).collect();
        write_folder(dir.path(), "Work", "inbox", &all, &[]);
        let manager = manager_with_script("exit 0", dir.path());

        let exclude: HashSet<u64> = [50, 49, 48, 20].into_iter().collect();
        let (total, headers) = manager.fetch_headers("Work", "inbox", Some(10), &exclude);
        assert_eq!(total, 50);
        assert_eq!(headers.len(), 10);
        assert!(headers.iter().all(|h| !exclude.contains(&h.uid)));
        assert!(headers.windows(2).all(|w| w[0].uid > w[1].uid));
        assert_eq!(headers[0].uid, 47);
    }

    #[test]
    fn test_fetch_headers_limit_larger_than_index() {
        let dir = tempfile::tempdir().unwrap();
        write_folder(dir.path(), "Work", "inbox", &[1, 2], &[]);
        let manager = manager_with_script("exit 0", dir.path());
        let (total, headers) = manager.fetch_headers("Work", "inbox", Some(100), &HashSet::new());
        assert_eq!((total, headers.len()), (2, 2));
    }

    #[test]
    fn test_fetch_headers_total_counts_index_lines() {
        let dir = tempfile::tempdir().unwrap();
        write_folder(dir.path(), "Work", "inbox", &[3, 1, 3, 2], &[]);
        let manager = manager_with_script("exit 0", dir.path());
        let (total, headers) = manager.fetch_headers("Work", "inbox", None, &HashSet::new());
        assert_eq!(total, 4);
        let uids: Vec<u64> = headers.iter().map(|h| h.uid).collect();
        assert_eq!(uids, vec![3, 2, 1]);
    }

    #[test]
    fn test_fetch_headers_marks_sent_folder() {
        let dir = tempfile::tempdir().unwrap();
        write_folder(dir.path(), "Work", "sent", &[4], &[]);
        let manager = manager_with_script("exit 0", dir.path());
        let (_, headers) = manager.fetch_headers("Work", "sent", None, &HashSet::new());
        assert!(headers[0].is_sent);
        assert!(headers[0].read);
    }

    #[test]
    fn test_fetch_headers_missing_folder_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager_with_script("exit 0", dir.path());
        let (total, headers) = manager.fetch_headers("Nope", "inbox", Some(5), &HashSet::new());
        assert_eq!(total, 0);
        assert!(headers.is_empty());
    }

    #[test]
    fn test_fetch_headers_skips_broken_header_files() {
        let dir = tempfile::tempdir().unwrap();
        write_folder(dir.path(), "Work", "inbox", &[1, 2, 3], &[]);
        std::fs::write(
            dir.path().join("Work/inbox/headers/2"),
            "Date: d\nFrom: f\nSubject: no recipient\n",
        )
        .unwrap();
        let manager = manager_with_script("exit 0", dir.path());
        let (total, headers) = manager.fetch_headers("Work", "inbox", None, &HashSet::new());
        assert_eq!(total, 3);
        let uids: Vec<u64> = headers.iter().map(|h| h.uid).collect();
        assert_eq!(uids, vec![3, 1]);
    }

    #[tokio::test]
    async fn test_list_accounts_skips_bad_lines() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager_with_script(
            r#"[ "$1" = --accounts ] || exit 9
echo 'Work:1700000000:5min ago:2/10:'
echo 'garbage line'
echo 'Home:1700000100:1h ago:0/3:ERROR: timeout: 30s'"#,
            dir.path(),
        );
        let accounts = manager.list_accounts().await.unwrap();
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[1].error, "ERROR: timeout: 30s");
    }

    #[tokio::test]
    async fn test_list_folders_passes_account() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager_with_script(
            r#"[ "$1" = --folders ] && [ "$2" = Work ] || exit 9
echo 'inbox:2/10'
echo 'sent:0/4'"#,
            dir.path(),
        );
        let folders = manager.list_folders("Work").await.unwrap();
        let names: Vec<_> = folders.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["inbox", "sent"]);
    }

    #[tokio::test]
    async fn test_config_fields_for_account() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager_with_script(
            r#"[ "$1" = --read-config ] && [ "$2" = Work ] || exit 9
echo 'user=me@example.com'
echo 'password=secret'
echo 'extra=ignored'"#,
            dir.path(),
        );
        let fields = manager
            .config_fields(ConfigMode::Account, Some("Work"))
            .await
            .unwrap();
        assert_eq!(fields.len(), 12);
        assert_eq!(fields[0].value, "Work");
        assert_eq!(fields[1].value, "me@example.com");
        assert!(fields[2].is_sensitive);

        let empty = manager
            .config_fields(ConfigMode::Account, None)
            .await
            .unwrap();
        assert!(empty.iter().all(|f| f.value.is_empty()));
    }

    #[tokio::test]
    async fn test_save_account_fields_uses_name_as_account() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager_with_script(r#"echo "$@"; echo warn >&2; exit 0"#, dir.path());
        let mut fields = resolve_fields(ConfigMode::Account.schema(), &BTreeMap::new());
        fields[0].value = "Work".into();
        fields[1].value = "me@example.com".into();

        let outcome = manager
            .save_config_fields(ConfigMode::Account, &fields)
            .await
            .unwrap();
        assert!(outcome.is_success());
        assert!(outcome.stdout.starts_with("--write-config Work user=me@example.com password="));
        assert!(!outcome.stdout.contains("name="));
        assert_eq!(outcome.stderr, "warn\n");
    }

    #[tokio::test]
    async fn test_save_account_fields_requires_name() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager_with_script("exit 0", dir.path());
        let fields = resolve_fields(ConfigMode::Account.schema(), &BTreeMap::new());
        assert!(matches!(
            manager.save_config_fields(ConfigMode::Account, &fields).await,
            Err(Error::MissingSelection(_))
        ));
    }

    #[tokio::test]
    async fn test_write_options_reports_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let manager = manager_with_script(r#"echo "$1 $2"; exit 2"#, dir.path());
        let outcome = manager
            .write_config(
                ConfigMode::Options,
                &[("update_cmd".into(), "notify-send done".into())],
                None,
            )
            .await
            .unwrap();
        assert_eq!(outcome.exit_code, 2);
        assert_eq!(outcome.stdout, "--write-options update_cmd=notify-send done\n");
    }

    #[test]
    fn test_command_builders() {
        let dir = tempfile::tempdir().unwrap();
        let manager = EmailManager::new(&Settings {
            email_command: vec!["email.pl".into()],
            cache_dir: dir.path().to_path_buf(),
            ..Settings::default()
        });

        assert_eq!(manager.update(None).argv(), ["email.pl", "--update"]);
        assert_eq!(
            manager.update(Some("Work")).argv(),
            ["email.pl", "--update", "Work"]
        );
        assert_eq!(
            manager.mark_read("Work", "inbox", 12, false).argv(),
            ["email.pl", "--mark-unread", "--folder=inbox", "Work", "12"]
        );
        assert_eq!(
            manager.fetch_body("Work", "sent", 3, BodyFormat::Html).argv(),
            ["email.pl", "--body-html", "--folder=sent", "Work", "3"]
        );
        assert_eq!(
            manager
                .save_attachments("Work", "inbox", 9, Path::new("/home/me"))
                .argv(),
            ["email.pl", "--attachments", "--folder=inbox", "Work", "/home/me", "9"]
        );
    }

    #[test]
    fn test_send_mail_command() {
        let dir = tempfile::tempdir().unwrap();
        let manager = EmailManager::new(&Settings {
            email_command: vec!["email.pl".into()],
            cache_dir: dir.path().to_path_buf(),
            ..Settings::default()
        });
        let mail = OutgoingMail {
            to: vec!["a@x.org".into(), "b@x.org".into()],
            cc: vec!["c@x.org".into()],
            bcc: vec!["d@x.org".into()],
            subject: "Re: hi".into(),
            body: "text".into(),
            attachments: vec![PathBuf::from("/tmp/f.pdf")],
        };
        assert_eq!(
            manager.send_mail("Work", &mail).unwrap().argv(),
            [
                "email.pl", "--smtp", "Work", "Re: hi", "text", "a@x.org", "--to", "b@x.org",
                "--cc", "c@x.org", "--bcc", "d@x.org", "--attach", "/tmp/f.pdf",
            ]
        );

        let empty = OutgoingMail::default();
        assert!(matches!(
            manager.send_mail("Work", &empty),
            Err(Error::MissingSelection(_))
        ));
    }
}
