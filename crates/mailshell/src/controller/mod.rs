//! Presentation controller for the email shell.
//!
//! The controller owns every list model, the navigation context and the set
//! of pending commands. It runs on the shell's main task only: user actions
//! come in through [`Controller::update`] and worker output through
//! [`Controller::handle_worker_event`].
//!
//! Quick queries (account/folder lists, config) are awaited inline. Slow
//! email tool commands run on workers; each is registered as a
//! [`PendingCommand`] with a typed [`Completion`] and handled exactly once,
//! unless it is cancelled first.

mod pending;

use std::collections::{BTreeMap, HashMap, HashSet};
use std::path::PathBuf;

use mailshell_core::process::{self, launch};
use mailshell_core::{
    Account, BodyFormat, CommandId, ConfigField, ConfigMode, EmailManager, Error, Folder, Header,
    Invocation, Settings, WorkerEvent, WorkerEventKind, extract_addresses,
};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::message::{ComposeMessage, Message};
use crate::model::{
    ComposeState, FilterSet, HeaderFilter, ListModel, ModelChange, NavContext, Page, QUICK_FILTER,
    SendKind, UNREAD_FILTER, prefixed_subject, quote_body, split_addresses,
};

pub use pending::{BodyTarget, Completion, PendingCommand};

/// Shown in the body area while a body is being fetched.
pub const LOADING_BODY: &str = "...loading body";
/// Shown in the body area when a body fetch fails.
pub const BODY_ERROR: &str = "ERROR FETCHING BODY\n";

/// Something the view should show, besides list model changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewUpdate {
    /// A short message for the user.
    Notify(String),
    /// Text appended to the message log.
    Log(String),
    /// New text for the body area.
    Body(String),
    /// New text for the header area above the body.
    HeaderText(String),
    /// The compose form changed.
    Compose,
    /// New `shown / total` header counter.
    Counter(String),
    /// The current page changed.
    Page(Page),
}

/// Changes drained from every list model at once.
#[derive(Debug, Default)]
pub struct ModelChanges {
    /// Account list changes.
    pub accounts: Vec<ModelChange>,
    /// Folder list changes.
    pub folders: Vec<ModelChange>,
    /// Header list changes.
    pub headers: Vec<ModelChange>,
    /// Config field changes.
    pub config: Vec<ModelChange>,
}

/// Email shell state and action handling.
#[derive(Debug)]
pub struct Controller {
    manager: EmailManager,
    page_initial_size: usize,
    page_more_size: usize,
    more_percentage: usize,
    attachment_dir: PathBuf,

    nav: NavContext,
    account_config: Option<BTreeMap<String, String>>,
    html_mode: bool,
    config_mode: Option<ConfigMode>,

    accounts: ListModel<Account>,
    folders: ListModel<Folder>,
    headers: ListModel<Header>,
    config_fields: ListModel<ConfigField>,

    /// Every loaded header, before filtering.
    current_headers: Vec<Header>,
    /// Account and folder `current_headers` were read from.
    headers_folder: Option<(String, String)>,
    filters: FilterSet,
    total_size: usize,
    cur_size: usize,

    body_view: String,
    body_text: Option<String>,
    compose: ComposeState,
    message_log: String,
    updates: Vec<ViewUpdate>,

    pending: HashMap<CommandId, PendingCommand>,
    next_id: u64,
    events: mpsc::UnboundedSender<WorkerEvent>,
}

impl Controller {
    /// Creates a controller whose workers report to `events`.
    #[must_use]
    pub fn new(settings: &Settings, events: mpsc::UnboundedSender<WorkerEvent>) -> Self {
        Self {
            manager: EmailManager::new(settings),
            page_initial_size: settings.page_initial_size,
            page_more_size: settings.page_more_size,
            more_percentage: settings.more_percentage,
            attachment_dir: dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")),
            nav: NavContext::default(),
            account_config: None,
            html_mode: false,
            config_mode: None,
            accounts: ListModel::new(),
            folders: ListModel::new(),
            headers: ListModel::new(),
            config_fields: ListModel::new(),
            current_headers: Vec::new(),
            headers_folder: None,
            filters: FilterSet::default(),
            total_size: 0,
            cur_size: 0,
            body_view: String::new(),
            body_text: None,
            compose: ComposeState::new(),
            message_log: String::new(),
            updates: Vec::new(),
            pending: HashMap::new(),
            next_id: 1,
            events,
        }
    }

    /// Saves attachments into `dir` instead of the home directory.
    #[must_use]
    pub fn with_attachment_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.attachment_dir = dir.into();
        self
    }

    /// Replaces the navigation context without side effects.
    pub fn restore(&mut self, nav: NavContext) {
        self.nav = nav;
    }

    /// Domain manager used by this controller.
    #[must_use]
    pub const fn manager(&self) -> &EmailManager {
        &self.manager
    }

    /// Current page and selection.
    #[must_use]
    pub const fn nav(&self) -> &NavContext {
        &self.nav
    }

    /// Account list model.
    #[must_use]
    pub const fn accounts(&self) -> &ListModel<Account> {
        &self.accounts
    }

    /// Folder list model.
    #[must_use]
    pub const fn folders(&self) -> &ListModel<Folder> {
        &self.folders
    }

    /// Filtered header list model.
    #[must_use]
    pub const fn headers(&self) -> &ListModel<Header> {
        &self.headers
    }

    /// Config field model.
    #[must_use]
    pub const fn config_fields(&self) -> &ListModel<ConfigField> {
        &self.config_fields
    }

    /// Compose form.
    #[must_use]
    pub const fn compose(&self) -> &ComposeState {
        &self.compose
    }

    /// Text shown in the body area.
    #[must_use]
    pub fn body_view(&self) -> &str {
        &self.body_view
    }

    /// Last successfully fetched body, if any.
    #[must_use]
    pub fn body_text(&self) -> Option<&str> {
        self.body_text.as_deref()
    }

    /// Everything appended to the message log so far.
    #[must_use]
    pub fn message_log(&self) -> &str {
        &self.message_log
    }

    /// Whether bodies are fetched as HTML.
    #[must_use]
    pub const fn html_mode(&self) -> bool {
        self.html_mode
    }

    /// Config mode chosen for the config page.
    #[must_use]
    pub const fn config_mode(&self) -> Option<ConfigMode> {
        self.config_mode
    }

    /// `shown / total` header counter.
    #[must_use]
    pub fn counter_text(&self) -> String {
        format!("{} / {}", self.cur_size, self.total_size)
    }

    /// Value of `key` in the selected account's config, or empty.
    #[must_use]
    pub fn account_config_value(&self, key: &str) -> &str {
        self.account_config
            .as_ref()
            .and_then(|config| config.get(key))
            .map_or("", String::as_str)
    }

    /// Commands still running, oldest first.
    #[must_use]
    pub fn pending_commands(&self) -> Vec<(CommandId, &Invocation)> {
        let mut commands: Vec<_> = self
            .pending
            .iter()
            .map(|(id, pending)| (*id, &pending.invocation))
            .collect();
        commands.sort_by_key(|(id, _)| *id);
        commands
    }

    /// Whether any command is still running.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Drains view updates recorded since the last call.
    pub fn take_updates(&mut self) -> Vec<ViewUpdate> {
        std::mem::take(&mut self.updates)
    }

    /// Drains list model changes recorded since the last call.
    pub fn take_model_changes(&mut self) -> ModelChanges {
        ModelChanges {
            accounts: self.accounts.take_changes(),
            folders: self.folders.take_changes(),
            headers: self.headers.take_changes(),
            config: self.config_fields.take_changes(),
        }
    }

    /// Handles one user action.
    pub async fn update(&mut self, message: Message) {
        match message {
            Message::ShowPage(page) => {
                self.nav = self.nav.with_page(page);
                self.updates.push(ViewUpdate::Page(page));
            }
            Message::SelectAccount(name) => self.select_account(&name).await,
            Message::ClearAccount => {
                self.nav = self.nav.cleared();
                self.account_config = None;
                self.body_text = None;
            }
            Message::SelectFolder(name) => self.nav = self.nav.with_folder(&name),
            Message::SelectHeader(uid) => self.select_header(uid),
            Message::SetupAccounts => self.setup_accounts().await,
            Message::SetupFolders => self.setup_folders().await,
            Message::SetupHeaders => self.setup_headers(),
            Message::MoreHeaders(percentage) => self.more_headers(percentage),
            Message::SearchTextChanged(text) => self.search_text_changed(&text),
            Message::SetUnreadOnly(unread_only) => {
                if unread_only {
                    self.filters.set(UNREAD_FILTER, HeaderFilter::Unread);
                } else {
                    self.filters.remove(UNREAD_FILTER);
                }
                self.refilter();
            }
            Message::UpdateAccount(account) => self.update_account(account),
            Message::ToggleRead(uid) => self.toggle_read(uid),
            Message::SetHtmlMode(html_mode) => self.html_mode = html_mode,
            Message::FetchBody => self.fetch_body(BodyTarget::Viewer),
            Message::SaveAttachments => self.save_attachments(),
            Message::InitSend(kind) => self.init_send(kind),
            Message::Compose(edit) => self.edit_compose(edit),
            Message::SendEmail => self.send_email(),
            Message::SetConfigMode(mode) => self.config_mode = Some(mode),
            Message::SetupConfig => self.setup_config().await,
            Message::UpdateConfigField { name, value } => self.update_config_field(&name, value),
            Message::SaveConfig => self.save_config().await,
            Message::Cancel(id) => self.cancel(id),
            Message::RunCommand(argv) => self.run_command(&Invocation::new(argv)),
            Message::ShellCommand(script) => {
                self.run_command(&Invocation::new(["sh", "-c"]).arg(script));
            }
        }
    }

    /// Routes one worker event to its pending command.
    ///
    /// Events for commands that are no longer pending (cancelled, or a
    /// stray duplicate) are dropped.
    pub async fn handle_worker_event(&mut self, event: WorkerEvent) {
        let Some(log_output) = self.pending.get(&event.id).map(|p| p.log_output) else {
            debug!("Dropping event for {}, no longer pending", event.id);
            return;
        };

        match event.kind {
            WorkerEventKind::Line(line) => {
                if log_output {
                    self.append_log(&format!("{line}\n"));
                }
            }
            WorkerEventKind::Finished {
                success,
                output,
                stderr,
            } => {
                let Some(pending) = self.pending.remove(&event.id) else {
                    return;
                };
                if log_output {
                    self.append_log(if success { "SUCCESS\n" } else { "FAILURE\n" });
                }
                if success {
                    info!("{} finished: {}", event.id, pending.invocation);
                } else {
                    warn!(
                        "{} failed: {}: {}",
                        event.id,
                        pending.invocation,
                        stderr.trim_end()
                    );
                }
                self.complete(pending.completion, success, output).await;
            }
        }
    }

    /// Kills every running command. Their completions are never handled.
    pub fn cancel_all(&mut self) {
        let ids: Vec<CommandId> = self.pending.keys().copied().collect();
        for id in ids {
            self.cancel(id);
        }
    }

    fn notify(&mut self, text: impl Into<String>) {
        let text = text.into();
        debug!("notify: {}", text.trim_end());
        self.updates.push(ViewUpdate::Notify(text));
    }

    fn append_log(&mut self, text: &str) {
        self.message_log.push_str(text);
        self.updates.push(ViewUpdate::Log(text.to_string()));
    }

    fn report(&mut self, context: &str, error: &Error) {
        warn!("{context}: {error}");
        self.notify(format!("{context}: {error}"));
    }

    /// Account and folder of the current selection, or a notification.
    fn require_folder(&mut self) -> Option<(String, String)> {
        if let (Some(account), Some(folder)) = (self.nav.account(), self.nav.folder()) {
            return Some((account.to_string(), folder.to_string()));
        }
        self.notify("no folder selected");
        None
    }

    fn start(&mut self, invocation: Invocation, log_output: bool, completion: Completion) -> CommandId {
        let id = CommandId(self.next_id);
        self.next_id += 1;
        debug!("Starting {id}: {invocation}");
        let handle = process::start(id, invocation.clone(), self.events.clone());
        self.pending.insert(
            id,
            PendingCommand {
                invocation,
                log_output,
                completion,
                handle,
            },
        );
        id
    }

    async fn complete(&mut self, completion: Completion, success: bool, output: String) {
        match completion {
            Completion::UpdateAccount { .. } => self.setup_accounts().await,
            Completion::ToggleRead {
                account,
                folder,
                uid,
            } => self.update_header(&account, &folder, uid, |header| {
                header.is_loading = false;
                if success {
                    header.read = !header.read;
                }
            }),
            Completion::FetchBody { target } => {
                if success {
                    let body = match &target {
                        BodyTarget::Viewer => output,
                        BodyTarget::Compose { date, author } => quote_body(&output, date, author),
                    };
                    self.body_text = Some(body.clone());
                    self.show_body(&target, body);
                } else {
                    self.body_text = None;
                    self.show_body(&target, BODY_ERROR.to_string());
                }
            }
            Completion::SaveAttachments => {
                if success {
                    let output = if output.trim().is_empty() {
                        "{no attachments}".to_string()
                    } else {
                        output
                    };
                    self.notify(format!("success:\n{output}"));
                } else {
                    self.notify("ERROR: saving attachments failed\n");
                }
            }
            Completion::SendMail => {
                let status = if success { "SUCCESS" } else { "FAILED" };
                self.notify(format!("\n{status}\n\n{output}"));
            }
        }
    }

    fn show_body(&mut self, target: &BodyTarget, text: String) {
        match target {
            BodyTarget::Viewer => {
                self.body_view.clone_from(&text);
                self.updates.push(ViewUpdate::Body(text));
            }
            BodyTarget::Compose { .. } => {
                self.compose.body = text;
                self.updates.push(ViewUpdate::Compose);
            }
        }
    }

    fn cancel(&mut self, id: CommandId) {
        let Some(pending) = self.pending.remove(&id) else {
            self.notify(format!("no pending command {id}"));
            return;
        };
        pending.handle.cancel();
        match &pending.completion {
            Completion::ToggleRead {
                account,
                folder,
                uid,
            } => {
                self.update_header(account, folder, *uid, |header| header.is_loading = false);
            }
            Completion::UpdateAccount {
                account: Some(name),
            } => self.set_account_loading(name, self.is_updating(name)),
            _ => {}
        }
        if pending.log_output {
            self.append_log("CANCELLED\n");
        }
        self.notify(format!("cancelled {id}: {}", pending.invocation));
    }

    fn run_command(&mut self, invocation: &Invocation) {
        if let Err(e) = launch(invocation) {
            self.report("Could not run command", &e);
        }
    }

    async fn select_account(&mut self, name: &str) {
        self.nav = self.nav.with_account(name);
        self.account_config = match self
            .manager
            .read_config(ConfigMode::Account, Some(name))
            .await
        {
            Ok(config) => Some(config),
            Err(e) => {
                self.report("Could not read account config", &e);
                None
            }
        };
    }

    fn select_header(&mut self, uid: u64) {
        let header = self
            .current_headers
            .iter()
            .find(|h| h.uid == uid)
            .cloned()
            .or_else(|| {
                let (account, folder) = (self.nav.account()?, self.nav.folder()?);
                self.manager.get_header(account, folder, uid)
            });
        match header {
            Some(header) => self.nav = self.nav.with_header(header),
            None => self.notify(format!("no header with UID {uid}")),
        }
    }

    async fn setup_accounts(&mut self) {
        match self.manager.list_accounts().await {
            Ok(mut accounts) => {
                for account in &mut accounts {
                    account.is_loading = self.is_updating(&account.name);
                }
                self.accounts.set_items(accounts);
            }
            Err(e) => self.report("Could not list accounts", &e),
        }
    }

    async fn setup_folders(&mut self) {
        let Some(account) = self.nav.account().map(str::to_string) else {
            self.notify("no account selected");
            return;
        };
        match self.manager.list_folders(&account).await {
            Ok(folders) => self.folders.set_items(folders),
            Err(e) => self.report("Could not list folders", &e),
        }
    }

    fn setup_headers(&mut self) {
        let Some((account, folder)) = self.require_folder() else {
            return;
        };
        self.filters.clear();
        let (total, headers) = self.manager.fetch_headers(
            &account,
            &folder,
            Some(self.page_initial_size),
            &HashSet::new(),
        );
        self.total_size = total;
        self.cur_size = headers.len();
        self.updates.push(ViewUpdate::Counter(self.counter_text()));
        self.headers_folder = Some((account, folder));
        self.set_headers(headers);
    }

    /// Extends the loaded header list from the folder it was read from.
    fn more_headers(&mut self, percentage: Option<usize>) {
        let Some((account, folder)) = self.loaded_folder() else {
            return;
        };
        let percentage = percentage.unwrap_or(self.more_percentage);
        let limit = (self.total_size.saturating_mul(percentage) / 100).max(self.page_more_size);
        let exclude: HashSet<u64> = self.current_headers.iter().map(|h| h.uid).collect();
        let (total, headers) = self
            .manager
            .fetch_headers(&account, &folder, Some(limit), &exclude);
        self.cur_size = self.current_headers.len() + headers.len();
        self.total_size = total;
        self.updates.push(ViewUpdate::Counter(self.counter_text()));
        self.append_headers(headers);
    }

    fn set_headers(&mut self, headers: Vec<Header>) {
        let shown = self.filters.apply(&headers);
        self.current_headers = headers;
        self.headers.set_items(shown);
    }

    fn append_headers(&mut self, headers: Vec<Header>) {
        let shown = self.filters.apply(&headers);
        self.current_headers.extend(headers);
        self.headers.append_items(shown);
    }

    fn refilter(&mut self) {
        let headers = std::mem::take(&mut self.current_headers);
        self.set_headers(headers);
    }

    fn search_text_changed(&mut self, text: &str) {
        match HeaderFilter::quick_search(text) {
            Ok(filter) => {
                self.filters.set(QUICK_FILTER, filter);
                self.refilter();
            }
            Err(e) => self.notify(Error::InvalidRegex(e).to_string()),
        }
    }

    /// Account and folder of the loaded header list, or a notification.
    fn loaded_folder(&mut self) -> Option<(String, String)> {
        let loaded = self.headers_folder.clone();
        if loaded.is_none() {
            self.notify("no folder selected");
        }
        loaded
    }

    /// Applies `f` to header `uid` and its displayed row, if the loaded list
    /// comes from `account`/`folder`.
    fn update_header(&mut self, account: &str, folder: &str, uid: u64, f: impl Fn(&mut Header)) {
        let loaded = self
            .headers_folder
            .as_ref()
            .is_some_and(|(a, d)| a == account && d == folder);
        if !loaded {
            debug!("Header {account}/{folder}/{uid} is no longer loaded");
            return;
        }
        if let Some(header) = self.current_headers.iter_mut().find(|h| h.uid == uid) {
            f(header);
        }
        if let Some(index) = self.headers.position(|h| h.uid == uid) {
            self.headers.update(index, &f);
        }
    }

    /// Whether an update of `name` is still running.
    fn is_updating(&self, name: &str) -> bool {
        self.pending.values().any(|p| {
            matches!(&p.completion, Completion::UpdateAccount { account: Some(a) } if a == name)
        })
    }

    fn set_account_loading(&mut self, name: &str, is_loading: bool) {
        if let Some(index) = self.accounts.position(|a| a.name == name) {
            self.accounts.update(index, |a| a.is_loading = is_loading);
        }
    }

    fn update_account(&mut self, account: Option<String>) {
        let label = account.as_deref().unwrap_or("ALL ACCOUNTS WITHOUT SKIP");
        self.append_log(&format!("STARTING UPDATE FOR {label}\n"));
        if let Some(name) = &account {
            self.set_account_loading(name, true);
        }
        let invocation = self.manager.update(account.as_deref());
        self.start(invocation, true, Completion::UpdateAccount { account });
    }

    /// Toggles a header of the loaded list.
    fn toggle_read(&mut self, uid: u64) {
        let Some((account, folder)) = self.loaded_folder() else {
            return;
        };
        let Some(read) = self
            .current_headers
            .iter()
            .find(|h| h.uid == uid)
            .map(|h| h.read)
        else {
            self.notify(format!("no header with UID {uid}"));
            return;
        };
        self.update_header(&account, &folder, uid, |header| header.is_loading = true);
        let invocation = self.manager.mark_read(&account, &folder, uid, !read);
        self.start(
            invocation,
            false,
            Completion::ToggleRead {
                account,
                folder,
                uid,
            },
        );
    }

    fn fetch_body(&mut self, target: BodyTarget) {
        self.body_text = None;
        self.show_body(&target, LOADING_BODY.to_string());
        let Some(header) = self.nav.header().cloned() else {
            self.notify("CURRENT MESSAGE NOT SET");
            return;
        };
        let Some((account, folder)) = self.require_folder() else {
            return;
        };
        if target == BodyTarget::Viewer {
            self.updates.push(ViewUpdate::HeaderText(header.to_string()));
        }
        let format = if self.html_mode {
            BodyFormat::Html
        } else {
            BodyFormat::Plain
        };
        let invocation = self
            .manager
            .fetch_body(&account, &folder, header.uid, format);
        self.start(invocation, false, Completion::FetchBody { target });
    }

    fn save_attachments(&mut self) {
        let Some(uid) = self.nav.header().map(|h| h.uid) else {
            self.notify("MISSING CURRENT MESSAGE");
            return;
        };
        let Some((account, folder)) = self.require_folder() else {
            return;
        };
        let invocation = self
            .manager
            .save_attachments(&account, &folder, uid, &self.attachment_dir);
        self.start(invocation, false, Completion::SaveAttachments);
    }

    fn init_send(&mut self, kind: SendKind) {
        let (Some(account), Some(folder), Some(uid)) = (
            self.nav.account(),
            self.nav.folder(),
            self.nav.header().map(|h| h.uid),
        ) else {
            self.notify(format!("Missing source email for {kind}"));
            return;
        };
        let Some(header) = self.manager.get_header(account, folder, uid) else {
            self.notify("Could not parse headers for message");
            return;
        };

        let from = extract_addresses(&header.from);
        let recipients = match kind {
            SendKind::Reply if folder == self.manager.sent_folder() => {
                extract_addresses(&header.to)
            }
            SendKind::Reply => from.clone(),
            SendKind::Forward => Vec::new(),
        };
        let author = from
            .into_iter()
            .next()
            .unwrap_or_else(|| "[unknown]".to_string());

        self.compose = ComposeState {
            to: recipients,
            cc: Vec::new(),
            bcc: Vec::new(),
            subject: prefixed_subject(kind, &header.subject),
            body: String::new(),
            attachments: std::mem::take(&mut self.compose.attachments),
        };
        self.fetch_body(BodyTarget::Compose {
            date: header.date,
            author,
        });
    }

    fn edit_compose(&mut self, edit: ComposeMessage) {
        match edit {
            ComposeMessage::To(text) => self.compose.to = split_addresses(&text),
            ComposeMessage::Cc(text) => self.compose.cc = split_addresses(&text),
            ComposeMessage::Bcc(text) => self.compose.bcc = split_addresses(&text),
            ComposeMessage::Subject(text) => self.compose.subject = text,
            ComposeMessage::Body(text) => self.compose.body = text,
            ComposeMessage::Attach(path) => self.compose.attachments.push(PathBuf::from(path)),
            ComposeMessage::Clear => self.compose = ComposeState::new(),
        }
        self.updates.push(ViewUpdate::Compose);
    }

    fn send_email(&mut self) {
        if self.compose.to.is_empty() {
            self.notify("TO is empty\n");
            return;
        }
        let Some(account) = self.nav.account().map(str::to_string) else {
            self.notify("no FROM account selected\n");
            return;
        };
        let invocation = match self.manager.send_mail(&account, &self.compose.to_outgoing()) {
            Ok(invocation) => invocation,
            Err(e) => {
                self.notify(e.to_string());
                return;
            }
        };
        self.notify("sending...");
        self.start(invocation, false, Completion::SendMail);
    }

    async fn setup_config(&mut self) {
        let Some(mode) = self.config_mode else {
            self.notify("no config mode selected");
            return;
        };
        let account = match mode {
            ConfigMode::Account => self.nav.account().map(str::to_string),
            ConfigMode::Options => None,
        };
        match self.manager.config_fields(mode, account.as_deref()).await {
            Ok(fields) => self.config_fields.set_items(fields),
            Err(e) => self.report("Could not read config", &e),
        }
    }

    fn update_config_field(&mut self, name: &str, value: String) {
        match self.config_fields.position(|f| f.name == name) {
            Some(index) => {
                self.config_fields.update(index, |f| f.value = value);
            }
            None => self.notify(format!("unknown config field: {name}")),
        }
    }

    async fn save_config(&mut self) {
        let Some(mode) = self.config_mode else {
            self.notify("no config mode selected");
            return;
        };
        match self
            .manager
            .save_config_fields(mode, self.config_fields.items())
            .await
        {
            Ok(outcome) if outcome.is_success() => {
                self.notify(format!("saved config\n{}{}", outcome.stdout, outcome.stderr));
            }
            Ok(outcome) => {
                self.notify(format!("FAILURE\n{}{}", outcome.stdout, outcome.stderr));
            }
            Err(e) => self.notify(format!("FAILURE\n{e}")),
        }
    }
}
