//! Integration tests for the email controller.
//!
//! A shell script stands in for the email tool and a temporary directory for
//! its header cache, so these tests exercise real child processes, workers
//! and completions end to end.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::path::Path;
use std::time::Duration;

use mailshell::controller::{BODY_ERROR, Controller, LOADING_BODY, ViewUpdate};
use mailshell::message::{ComposeMessage, Message};
use mailshell::model::{SendKind, quote_body};
use mailshell::shell::run_email_shell;
use mailshell_core::{CommandId, ConfigMode, Header, Settings, WorkerEvent};
use tempfile::TempDir;
use tokio::sync::mpsc;

/// Fake email tool. `STATE` is replaced with a scratch directory.
const EMAIL_TOOL: &str = r#"
state='STATE'
cmd="$1"; shift
case "$cmd" in
  --accounts)
    if [ -e "$state/updated" ]; then unread=0; else unread=2; fi
    echo "Work:1700000000:5min ago:$unread/7:"
    echo "Home:1700000000:1h ago:0/3:ERROR: login failed"
    ;;
  --folders)
    echo "inbox:2/7"
    echo "sent:0/1"
    ;;
  --read-config)
    if [ "$1" = Work ]; then
      echo "user=me@example.com"
      echo "password=secret"
    fi
    ;;
  --read-options)
    echo "update_cmd=true"
    ;;
  --write-config|--write-options)
    echo "wrote $*"
    echo "note" >&2
    ;;
  --update)
    echo "fetching ${1:-all}"
    touch "$state/updated"
    echo "done"
    ;;
  --mark-read|--mark-unread)
    [ "$3" = 13 ] && exit 1
    exit 0
    ;;
  --body-plain)
    [ "$3" = 99 ] && exit 1
    printf 'line one\nline two\n'
    ;;
  --body-html)
    exec sleep 30
    ;;
  --attachments)
    ;;
  --smtp)
    printf '%s\n' "$@" > "$state/smtp"
    echo "queued"
    ;;
  *)
    echo "unknown command $cmd" >&2
    exit 2
    ;;
esac
"#;

fn write_header(dir: &Path, uid: u64, from: &str, to: &str, subject: &str) {
    std::fs::write(
        dir.join("headers").join(uid.to_string()),
        format!("Date: Tue, 2 Jan 2024 10:0{}\nFrom: {from}\nTo: {to}\nSubject: {subject}\n", uid % 10),
    )
    .unwrap();
}

fn write_cache(root: &Path) {
    let inbox = root.join("Work").join("inbox");
    std::fs::create_dir_all(inbox.join("headers")).unwrap();
    std::fs::write(inbox.join("all"), "1\n2\n3\n4\n5\n13\n99\n").unwrap();
    std::fs::write(inbox.join("unread"), "4\n5\n").unwrap();
    let alice = "Alice <alice@example.com>";
    let me = "Me <me@example.com>";
    write_header(&inbox, 1, alice, me, "Invoice");
    write_header(&inbox, 2, alice, me, "Lunch");
    write_header(&inbox, 3, alice, me, "Report");
    write_header(&inbox, 4, alice, me, "Lunch again");
    write_header(&inbox, 5, "Bob <bob@example.com>", me, "Weekend");
    write_header(&inbox, 13, alice, me, "Locked");
    write_header(&inbox, 99, alice, me, "Broken");

    let sent = root.join("Work").join("sent");
    std::fs::create_dir_all(sent.join("headers")).unwrap();
    std::fs::write(sent.join("all"), "5\n7\n").unwrap();
    write_header(&sent, 5, me, "dave@example.com", "Minutes");
    write_header(
        &sent,
        7,
        me,
        "Bob <bob@example.com>, carol@example.com",
        "Plans",
    );
}

struct Fixture {
    dir: TempDir,
    controller: Controller,
    events: mpsc::UnboundedReceiver<WorkerEvent>,
}

impl Fixture {
    fn new() -> Self {
        let (controller, events, dir) = Self::parts();
        Self {
            dir,
            controller,
            events,
        }
    }

    fn parts() -> (Controller, mpsc::UnboundedReceiver<WorkerEvent>, TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let state = dir.path().join("state");
        let cache = dir.path().join("cache");
        let downloads = dir.path().join("downloads");
        for path in [&state, &cache, &downloads] {
            std::fs::create_dir_all(path).unwrap();
        }
        write_cache(&cache);

        let script = EMAIL_TOOL.replace("STATE", &state.to_string_lossy());
        let settings = Settings {
            email_command: vec!["sh".into(), "-c".into(), script, "email.pl".into()],
            cache_dir: cache,
            page_initial_size: 3,
            page_more_size: 2,
            more_percentage: 30,
            ..Settings::default()
        };
        let (tx, rx) = mpsc::unbounded_channel();
        let controller = Controller::new(&settings, tx).with_attachment_dir(downloads);
        (controller, rx, dir)
    }

    fn state_file(&self, name: &str) -> String {
        std::fs::read_to_string(self.dir.path().join("state").join(name)).unwrap()
    }

    async fn send(&mut self, message: Message) {
        self.controller.update(message).await;
    }

    /// Feeds worker events to the controller until nothing is pending.
    async fn settle(&mut self) {
        while self.controller.has_pending() {
            let event = tokio::time::timeout(Duration::from_secs(10), self.events.recv())
                .await
                .expect("timed out waiting for a worker")
                .expect("event channel closed");
            self.controller.handle_worker_event(event).await;
        }
    }

    /// Feeds whatever events arrive within a short window.
    async fn drain(&mut self) {
        while let Ok(Some(event)) =
            tokio::time::timeout(Duration::from_millis(300), self.events.recv()).await
        {
            self.controller.handle_worker_event(event).await;
        }
    }

    fn notifications(&mut self) -> Vec<String> {
        self.controller
            .take_updates()
            .into_iter()
            .filter_map(|update| match update {
                ViewUpdate::Notify(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    fn counters(&mut self) -> Vec<String> {
        self.controller
            .take_updates()
            .into_iter()
            .filter_map(|update| match update {
                ViewUpdate::Counter(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    fn header_uids(&self) -> Vec<u64> {
        self.controller.headers().items().iter().map(|h| h.uid).collect()
    }

    async fn open_folder(&mut self, folder: &str) {
        self.send(Message::SelectAccount("Work".into())).await;
        self.send(Message::SelectFolder(folder.into())).await;
        self.send(Message::SetupHeaders).await;
    }

    fn loaded_header(&self, uid: u64) -> &Header {
        self.controller
            .headers()
            .items()
            .iter()
            .find(|h| h.uid == uid)
            .unwrap()
    }

    fn account_loading(&self, name: &str) -> bool {
        self.controller
            .accounts()
            .items()
            .iter()
            .find(|a| a.name == name)
            .unwrap()
            .is_loading
    }
}

#[tokio::test]
async fn test_accounts_and_folders() {
    let mut f = Fixture::new();
    f.send(Message::SetupAccounts).await;
    let accounts = f.controller.accounts().items();
    assert_eq!(accounts.len(), 2);
    assert_eq!(accounts[0].name, "Work");
    assert_eq!(accounts[0].unread, 2);
    assert!(accounts[1].has_error());

    f.send(Message::SetupFolders).await;
    assert_eq!(f.notifications(), vec!["no account selected"]);

    f.send(Message::SelectAccount("Work".into())).await;
    assert_eq!(f.controller.nav().folder(), Some("inbox"));
    assert_eq!(f.controller.account_config_value("user"), "me@example.com");
    assert_eq!(f.controller.account_config_value("smtp_server"), "");

    f.send(Message::SetupFolders).await;
    let names: Vec<&str> = f
        .controller
        .folders()
        .items()
        .iter()
        .map(|folder| folder.name.as_str())
        .collect();
    assert_eq!(names, ["inbox", "sent"]);
}

#[tokio::test]
async fn test_update_account_logs_and_refreshes() {
    let mut f = Fixture::new();
    f.send(Message::SetupAccounts).await;
    f.send(Message::UpdateAccount(Some("Work".into()))).await;
    assert!(f.account_loading("Work"));
    assert!(!f.account_loading("Home"));

    f.settle().await;
    assert_eq!(
        f.controller.message_log(),
        "STARTING UPDATE FOR Work\nfetching Work\ndone\nSUCCESS\n"
    );
    assert!(!f.account_loading("Work"));
    assert_eq!(f.controller.accounts().items()[0].unread, 0);
}

#[tokio::test]
async fn test_update_all_accounts() {
    let mut f = Fixture::new();
    f.send(Message::UpdateAccount(None)).await;
    f.settle().await;
    assert_eq!(
        f.controller.message_log(),
        "STARTING UPDATE FOR ALL ACCOUNTS WITHOUT SKIP\nfetching all\ndone\nSUCCESS\n"
    );
}

#[tokio::test]
async fn test_header_paging() {
    let mut f = Fixture::new();
    f.send(Message::SetupHeaders).await;
    assert_eq!(f.notifications(), vec!["no folder selected"]);

    f.open_folder("inbox").await;
    assert_eq!(f.header_uids(), [99, 13, 5]);
    assert_eq!(f.counters(), vec!["3 / 7"]);

    // 10% of 7 rounds down to nothing, so the minimum page applies.
    f.send(Message::MoreHeaders(Some(10))).await;
    assert_eq!(f.header_uids(), [99, 13, 5, 4, 3]);
    assert_eq!(f.counters(), vec!["5 / 7"]);

    f.send(Message::MoreHeaders(None)).await;
    assert_eq!(f.header_uids(), [99, 13, 5, 4, 3, 2, 1]);
    assert_eq!(f.controller.counter_text(), "7 / 7");

    let unread: Vec<u64> = f
        .controller
        .headers()
        .items()
        .iter()
        .filter(|h| !h.read)
        .map(|h| h.uid)
        .collect();
    assert_eq!(unread, [5, 4]);
}

#[tokio::test]
async fn test_filters() {
    let mut f = Fixture::new();
    f.open_folder("inbox").await;
    f.send(Message::MoreHeaders(Some(100))).await;
    assert_eq!(f.header_uids().len(), 7);

    f.send(Message::SearchTextChanged("LUNCH".into())).await;
    assert_eq!(f.header_uids(), [4, 2]);

    f.send(Message::SetUnreadOnly(true)).await;
    assert_eq!(f.header_uids(), [4]);

    f.controller.take_updates();
    f.send(Message::SearchTextChanged("(".into())).await;
    let notes = f.notifications();
    assert_eq!(notes.len(), 1);
    assert!(notes[0].starts_with("Invalid search pattern"));
    assert_eq!(f.header_uids(), [4]);

    f.send(Message::SetUnreadOnly(false)).await;
    f.send(Message::SearchTextChanged("bob@".into())).await;
    assert_eq!(f.header_uids(), [5]);

    // Reloading the folder drops every filter.
    f.send(Message::SetupHeaders).await;
    assert_eq!(f.header_uids(), [99, 13, 5]);
}

#[tokio::test]
async fn test_toggle_read() {
    let mut f = Fixture::new();
    f.open_folder("inbox").await;

    f.send(Message::ToggleRead(5)).await;
    assert!(f.controller.headers().items()[2].is_loading);
    f.settle().await;
    let header = &f.controller.headers().items()[2];
    assert!(!header.is_loading);
    assert!(header.read);

    f.send(Message::ToggleRead(13)).await;
    f.settle().await;
    let header = &f.controller.headers().items()[1];
    assert!(!header.is_loading);
    assert!(header.read, "a failed toggle keeps the old state");

    f.controller.take_updates();
    f.send(Message::ToggleRead(1)).await;
    assert_eq!(f.notifications(), vec!["no header with UID 1"]);
    assert!(!f.controller.has_pending());
}

#[tokio::test]
async fn test_toggle_completion_only_touches_its_folder() {
    let mut f = Fixture::new();
    f.open_folder("inbox").await;
    assert!(!f.loaded_header(5).read);
    f.send(Message::ToggleRead(5)).await;

    // sent/5 shares the UID with inbox/5.
    f.send(Message::SelectFolder("sent".into())).await;
    f.send(Message::SetupHeaders).await;
    assert!(f.loaded_header(5).read);

    f.settle().await;
    let header = f.loaded_header(5);
    assert!(header.read);
    assert!(!header.is_loading);
}

#[tokio::test]
async fn test_cancel_toggle_only_touches_its_folder() {
    let mut f = Fixture::new();
    f.open_folder("inbox").await;
    f.send(Message::ToggleRead(5)).await;
    let (inbox_toggle, _) = f.controller.pending_commands()[0];

    f.send(Message::SelectFolder("sent".into())).await;
    f.send(Message::SetupHeaders).await;
    f.send(Message::ToggleRead(5)).await;
    assert!(f.loaded_header(5).is_loading);

    f.send(Message::Cancel(inbox_toggle)).await;
    assert!(f.loaded_header(5).is_loading);

    f.settle().await;
    let header = f.loaded_header(5);
    assert!(!header.is_loading);
    assert!(!header.read);
}

#[tokio::test]
async fn test_more_headers_with_huge_percentage() {
    let mut f = Fixture::new();
    f.open_folder("inbox").await;
    f.send(Message::MoreHeaders(Some(usize::MAX))).await;
    assert_eq!(f.header_uids(), [99, 13, 5, 4, 3, 2, 1]);
    assert_eq!(f.controller.counter_text(), "7 / 7");
}

#[tokio::test]
async fn test_fetch_body() {
    let mut f = Fixture::new();
    f.open_folder("inbox").await;

    f.send(Message::FetchBody).await;
    assert_eq!(f.notifications(), vec!["CURRENT MESSAGE NOT SET"]);

    f.send(Message::SelectHeader(3)).await;
    f.send(Message::FetchBody).await;
    assert_eq!(f.controller.body_view(), LOADING_BODY);
    let header_text = f.controller.take_updates().into_iter().find_map(|u| match u {
        ViewUpdate::HeaderText(text) => Some(text),
        _ => None,
    });
    assert!(header_text.unwrap().contains("Subject: Report\n"));

    f.settle().await;
    assert_eq!(f.controller.body_view(), "line one\nline two\n");
    assert_eq!(f.controller.body_text(), Some("line one\nline two\n"));

    f.send(Message::SelectHeader(99)).await;
    f.send(Message::FetchBody).await;
    f.settle().await;
    assert_eq!(f.controller.body_view(), BODY_ERROR);
    assert_eq!(f.controller.body_text(), None);
}

#[tokio::test]
async fn test_reply_from_inbox() {
    let mut f = Fixture::new();
    f.open_folder("inbox").await;
    f.send(Message::Compose(ComposeMessage::Attach("/tmp/notes.txt".into())))
        .await;
    f.send(Message::SelectHeader(5)).await;
    f.send(Message::InitSend(SendKind::Reply)).await;

    let compose = f.controller.compose();
    assert_eq!(compose.to, ["bob@example.com"]);
    assert_eq!(compose.subject, "Re: Weekend");
    assert_eq!(compose.body, LOADING_BODY);
    assert_eq!(compose.attachments.len(), 1);

    f.settle().await;
    let date = f.controller.nav().header().unwrap().date.clone();
    assert_eq!(
        f.controller.compose().body,
        quote_body("line one\nline two\n", &date, "bob@example.com")
    );
    assert_eq!(f.controller.body_view(), "");
}

#[tokio::test]
async fn test_reply_from_sent_and_forward() {
    let mut f = Fixture::new();
    f.open_folder("sent").await;
    f.send(Message::SelectHeader(7)).await;
    f.send(Message::InitSend(SendKind::Reply)).await;
    assert_eq!(
        f.controller.compose().to,
        ["bob@example.com", "carol@example.com"]
    );
    f.settle().await;

    f.send(Message::InitSend(SendKind::Forward)).await;
    assert!(f.controller.compose().to.is_empty());
    assert_eq!(f.controller.compose().subject, "Fwd: Plans");
    f.settle().await;
    assert!(f.controller.compose().body.contains("me@example.com wrote:"));
}

#[tokio::test]
async fn test_init_send_needs_a_message() {
    let mut f = Fixture::new();
    f.send(Message::SelectAccount("Work".into())).await;
    f.send(Message::InitSend(SendKind::Reply)).await;
    assert_eq!(f.notifications(), vec!["Missing source email for reply"]);
    assert!(!f.controller.has_pending());
}

#[tokio::test]
async fn test_send_email() {
    let mut f = Fixture::new();
    f.send(Message::SelectAccount("Work".into())).await;
    f.send(Message::SendEmail).await;
    assert_eq!(f.notifications(), vec!["TO is empty\n"]);

    f.send(Message::Compose(ComposeMessage::To("x@y.org, z@y.org".into())))
        .await;
    f.send(Message::Compose(ComposeMessage::Subject("hi".into())))
        .await;
    f.send(Message::Compose(ComposeMessage::Body("text".into())))
        .await;
    f.send(Message::Compose(ComposeMessage::Attach("/tmp/a.pdf".into())))
        .await;
    f.controller.take_updates();

    f.send(Message::SendEmail).await;
    assert_eq!(f.notifications(), vec!["sending..."]);
    f.settle().await;
    assert_eq!(f.notifications(), vec!["\nSUCCESS\n\nqueued\n"]);
    assert_eq!(
        f.state_file("smtp"),
        "Work\nhi\ntext\nx@y.org\n--to\nz@y.org\n--attach\n/tmp/a.pdf\n"
    );
}

#[tokio::test]
async fn test_send_needs_an_account() {
    let mut f = Fixture::new();
    f.send(Message::Compose(ComposeMessage::To("x@y.org".into())))
        .await;
    f.controller.take_updates();
    f.send(Message::SendEmail).await;
    assert_eq!(f.notifications(), vec!["no FROM account selected\n"]);
}

#[tokio::test]
async fn test_save_attachments() {
    let mut f = Fixture::new();
    f.open_folder("inbox").await;
    f.send(Message::SaveAttachments).await;
    assert_eq!(f.notifications(), vec!["MISSING CURRENT MESSAGE"]);

    f.send(Message::SelectHeader(3)).await;
    f.send(Message::SaveAttachments).await;
    f.settle().await;
    assert_eq!(f.notifications(), vec!["success:\n{no attachments}"]);
}

#[tokio::test]
async fn test_cancel_body_fetch() {
    let mut f = Fixture::new();
    f.open_folder("inbox").await;
    f.send(Message::SetHtmlMode(true)).await;
    f.send(Message::SelectHeader(3)).await;
    f.send(Message::FetchBody).await;

    let (id, invocation) = f.controller.pending_commands()[0];
    assert!(invocation.argv().contains(&"--body-html".to_string()));
    f.controller.take_updates();

    f.send(Message::Cancel(id)).await;
    assert!(!f.controller.has_pending());
    let notes = f.notifications();
    assert!(notes[0].starts_with(&format!("cancelled {id}: ")));

    f.drain().await;
    assert_eq!(f.controller.body_view(), LOADING_BODY);

    f.send(Message::Cancel(CommandId(42))).await;
    assert_eq!(f.notifications(), vec!["no pending command #42"]);
}

#[tokio::test]
async fn test_cancel_update_drops_late_output() {
    let mut f = Fixture::new();
    f.send(Message::SetupAccounts).await;
    f.send(Message::UpdateAccount(Some("Work".into()))).await;
    let (id, _) = f.controller.pending_commands()[0];

    f.send(Message::Cancel(id)).await;
    assert!(!f.account_loading("Work"));
    f.drain().await;
    assert_eq!(
        f.controller.message_log(),
        "STARTING UPDATE FOR Work\nCANCELLED\n"
    );
    assert_eq!(f.controller.accounts().items()[0].unread, 2);
}

#[tokio::test]
async fn test_cancel_one_of_two_updates_keeps_account_loading() {
    let mut f = Fixture::new();
    f.send(Message::SetupAccounts).await;
    f.send(Message::UpdateAccount(Some("Work".into()))).await;
    f.send(Message::UpdateAccount(Some("Work".into()))).await;
    let (first, _) = f.controller.pending_commands()[0];

    f.send(Message::Cancel(first)).await;
    assert!(f.account_loading("Work"));

    f.settle().await;
    assert!(!f.account_loading("Work"));
}

#[tokio::test]
async fn test_account_config() {
    let mut f = Fixture::new();
    f.send(Message::SetupConfig).await;
    assert_eq!(f.notifications(), vec!["no config mode selected"]);

    f.send(Message::SelectAccount("Work".into())).await;
    f.send(Message::SetConfigMode(ConfigMode::Account)).await;
    f.send(Message::SetupConfig).await;
    let fields = f.controller.config_fields().items();
    assert_eq!(fields[0].name, "name");
    assert_eq!(fields[0].value, "Work");

    f.send(Message::UpdateConfigField {
        name: "smtp_server".into(),
        value: "smtp.example.com".into(),
    })
    .await;
    f.send(Message::UpdateConfigField {
        name: "bogus".into(),
        value: "x".into(),
    })
    .await;
    assert_eq!(f.notifications(), vec!["unknown config field: bogus"]);

    f.send(Message::SaveConfig).await;
    let notes = f.notifications();
    assert!(notes[0].starts_with("saved config\nwrote Work "));
    assert!(notes[0].contains("smtp_server=smtp.example.com"));
    assert!(notes[0].ends_with("note\n"));
}

#[tokio::test]
async fn test_new_account_needs_a_name() {
    let mut f = Fixture::new();
    f.send(Message::SetConfigMode(ConfigMode::Account)).await;
    f.send(Message::SetupConfig).await;
    assert!(f.controller.config_fields().items().iter().all(|field| field.value.is_empty()));

    f.send(Message::SaveConfig).await;
    let notes = f.notifications();
    assert!(notes[0].starts_with("FAILURE\n"));
    assert!(notes[0].contains("account name is required"));
}

#[tokio::test]
async fn test_shell_session() {
    let (controller, events, _dir) = Fixture::parts();
    let input: &[u8] = b"accounts\naccount Work\nfolder inbox\nheaders\nbogus\nheader 3\nbody\n";
    let mut out = Vec::new();
    run_email_shell(controller, events, input, &mut out)
        .await
        .unwrap();

    let out = String::from_utf8(out).unwrap();
    assert!(out.starts_with("== account ==\n"));
    assert!(out.contains("-- accounts (2) --\n"));
    assert!(out.contains("[3 / 7]\n"));
    assert!(out.contains("error: unknown command: bogus"));
    assert!(out.contains(LOADING_BODY));
    assert!(out.ends_with("line one\nline two\n\n"));
}
