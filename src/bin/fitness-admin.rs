use clap::{Parser, Subcommand};
use flexi_logger::Logger;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use fitness_admin::analytics::Dashboard;
use fitness_admin::articles::{Article, ArticleStatus};
use fitness_admin::auth::{FileTokenStore, LoginCredentials};
use fitness_admin::config::ClientOptions;
use fitness_admin::error::{Error, ErrorKind, Notice, NoticeLevel, Notifier};
use fitness_admin::issues::IssueLookup;
use fitness_admin::languages::{Language, LanguagesApi};
use fitness_admin::manager::{ListFilter, Resource, ResourceManager};
use fitness_admin::present::{self, BlockAction};
use fitness_admin::shell::{self, Route};
use fitness_admin::AdminConsole;

#[derive(Parser)]
#[clap(name = "fitness-admin", version, about = "Admin console for the fitness app")]
struct Cli {
    /// File the session token is kept in
    #[clap(long, global = true)]
    token_file: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sign in and keep the session
    Login {
        #[clap(long)]
        email: String,
        #[clap(long)]
        password: String,
        #[clap(long, default_value = "admin")]
        role: String,
    },
    /// Forget the session
    Logout,
    /// Show whether a session is held
    Status,
    /// Daily counters
    #[clap(alias = "analytics")]
    Dashboard,
    #[clap(subcommand)]
    Users(UsersCommand),
    #[clap(subcommand)]
    Articles(ArticlesCommand),
    /// Look up logged failures by request id
    Issues {
        request_id: String,
        /// Row to show in detail (0-based)
        #[clap(long)]
        select: Option<usize>,
    },
    #[clap(subcommand)]
    Settings(SettingsCommand),
}

#[derive(Subcommand)]
enum UsersCommand {
    List {
        #[clap(long, default_value_t = 1)]
        page: u32,
        #[clap(long)]
        search: Option<String>,
    },
    /// Profile and purchase history
    Show { id: String },
    Edit {
        id: String,
        #[clap(long)]
        name: Option<String>,
        #[clap(long)]
        gender: Option<String>,
        #[clap(long)]
        height: Option<String>,
        #[clap(long)]
        weight: Option<String>,
        #[clap(long)]
        date_of_birth: Option<String>,
        #[clap(long)]
        profile_pic: Option<String>,
        #[clap(long)]
        provider: Option<String>,
    },
    /// Block or unblock, whichever the user is not
    Block { id: String },
    Delete {
        id: String,
        #[clap(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum ArticlesCommand {
    List {
        #[clap(long, default_value_t = 1)]
        page: u32,
        /// Locale code, or "all"
        #[clap(long, default_value = "all")]
        locale: String,
        #[clap(long)]
        search: Option<String>,
    },
    Show { id: String },
    Create {
        #[clap(flatten)]
        fields: ArticleFields,
    },
    Edit {
        id: String,
        #[clap(flatten)]
        fields: ArticleFields,
    },
    Delete {
        id: String,
        #[clap(long)]
        yes: bool,
    },
    /// Draft, Scheduled, Published or Unpublished
    Status { id: String, status: String },
    Liked,
    Like { id: String },
}

#[derive(clap::Args)]
struct ArticleFields {
    #[clap(long)]
    title: Option<String>,
    #[clap(long)]
    body: Option<String>,
    #[clap(long)]
    locale: Option<String>,
    #[clap(long)]
    topic: Option<String>,
    #[clap(long = "type")]
    kind: Option<String>,
    #[clap(long)]
    image_url: Option<String>,
    #[clap(long)]
    category: Option<String>,
    #[clap(long)]
    source: Option<String>,
    #[clap(long)]
    status: Option<String>,
}

impl ArticleFields {
    fn apply(self, article: &mut Article) -> Result<(), Error> {
        if let Some(v) = self.title {
            article.title = v;
        }
        if let Some(v) = self.body {
            article.body = v;
        }
        if let Some(v) = self.locale {
            article.locale = v;
        }
        if let Some(v) = self.topic {
            article.topic = v;
        }
        if let Some(v) = self.kind {
            article.kind = v;
        }
        if self.image_url.is_some() {
            article.image_url = self.image_url;
        }
        if self.category.is_some() {
            article.category = self.category;
        }
        if self.source.is_some() {
            article.source = self.source;
        }
        if let Some(v) = self.status {
            article.status = v.parse()?;
        }
        Ok(())
    }
}

#[derive(Subcommand)]
enum SettingsCommand {
    #[clap(subcommand)]
    Languages(LanguagesCommand),
}

#[derive(Subcommand)]
enum LanguagesCommand {
    List,
    Add { locale: String, language: String },
    Edit {
        id: i64,
        #[clap(long)]
        locale: Option<String>,
        #[clap(long)]
        language: Option<String>,
    },
    Delete {
        id: i64,
        #[clap(long)]
        yes: bool,
    },
}

impl Command {
    fn route(&self) -> Route {
        match self {
            Command::Login { .. } | Command::Logout | Command::Status => Route::Login,
            Command::Dashboard => Route::Dashboard,
            Command::Users(_) => Route::Users,
            Command::Articles(_) => Route::Articles,
            Command::Issues { .. } => Route::Issues,
            Command::Settings(_) => Route::Settings,
        }
    }
}

/// Prints notices and remembers whether the server rejected the token
#[derive(Default)]
struct ConsoleNotifier {
    unauthorized: AtomicBool,
    failed: AtomicBool,
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: &Notice) {
        match notice.level {
            NoticeLevel::Success => println!("{} {}", notice.title(), notice.message),
            _ => {
                self.failed.store(true, Ordering::SeqCst);
                eprintln!("{} {}", notice.title(), notice.message);
            }
        }
        if notice.kind == Some(ErrorKind::Unauthorized) {
            self.unauthorized.store(true, Ordering::SeqCst);
        }
    }
}

fn init_logging() -> Result<(), Error> {
    Logger::try_with_env_or_str("warn")
        .and_then(|logger| logger.log_to_stderr().start())
        .map_err(|e| Error::general(format!("logger unavailable: {}", e)))?;
    Ok(())
}

fn default_token_file() -> PathBuf {
    dirs::config_dir()
        .map(|dir| dir.join("fitness-admin").join("session.json"))
        .unwrap_or_else(|| PathBuf::from(".fitness-admin-session.json"))
}

fn confirm(yes: bool, what: &str) -> Result<(), Error> {
    if yes {
        Ok(())
    } else {
        Err(Error::validation(format!("refusing to delete {} without --yes", what)))
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    if let Err(e) = init_logging() {
        eprintln!("{}", e);
    }

    let cli = Cli::parse();
    let notifier = Arc::new(ConsoleNotifier::default());

    let console = match ClientOptions::from_env().and_then(|options| {
        let store = FileTokenStore::new(cli.token_file.clone().unwrap_or_else(default_token_file));
        AdminConsole::with_token_store(options, Arc::new(store))
    }) {
        Ok(console) => console,
        Err(e) => {
            eprintln!("Error! {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = run(&console, cli.command, notifier.clone()).await;

    let unauthorized = match &result {
        Err(e) => e.is_unauthorized(),
        Ok(()) => notifier.unauthorized.load(Ordering::SeqCst),
    };
    if unauthorized {
        if let Err(e) = console.handle_unauthorized(&Error::Unauthorized(None)) {
            log::warn!("could not clear session: {}", e);
        }
        eprintln!("Session expired. Run `fitness-admin login` again.");
        return ExitCode::FAILURE;
    }

    match result {
        Ok(()) if !notifier.failed.load(Ordering::SeqCst) => ExitCode::SUCCESS,
        Ok(()) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{} {}", Notice::from_error(&e, &e.to_string()).title(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(console: &AdminConsole, command: Command, notifier: Arc<ConsoleNotifier>) -> Result<(), Error> {
    let requested = command.route();
    if shell::guard(requested, console.session()) != requested {
        return Err(Error::auth("not signed in, run `fitness-admin login` first"));
    }

    match command {
        Command::Login { email, password, role } => {
            let credentials = LoginCredentials { email, password, role };
            console.auth().login(&credentials).await?;
            println!("Signed in. Opening {}", Route::Dashboard);
            Ok(())
        }
        Command::Logout => {
            console.auth().logout()?;
            println!("Signed out");
            Ok(())
        }
        Command::Status => {
            if console.session().is_authenticated() {
                println!("Signed in against {}", console.options.base_url);
                for route in Route::NAVIGATION {
                    println!("  {:<12} {}", route.path(), route.title());
                }
            } else {
                println!("Not signed in");
            }
            Ok(())
        }
        Command::Dashboard => {
            let dashboard = Dashboard::load(&console.analytics()).await;
            print_counter("Daily active users", &dashboard.active_users, notifier.as_ref());
            print_counter("New users today", &dashboard.new_users_today, notifier.as_ref());
            Ok(())
        }
        Command::Users(cmd) => run_users(console, cmd, notifier).await,
        Command::Articles(cmd) => run_articles(console, cmd, notifier).await,
        Command::Issues { request_id, select } => {
            let mut lookup = IssueLookup::new();
            match lookup.search(&console.issues(), &request_id).await {
                Ok(count) => {
                    if let Some(index) = select {
                        if !lookup.select(index) {
                            return Err(Error::validation(format!("no row {} among {} results", index, count)));
                        }
                    }
                    print_issues(&lookup);
                    Ok(())
                }
                Err(notice) => {
                    notifier.notify(&notice);
                    Ok(())
                }
            }
        }
        Command::Settings(SettingsCommand::Languages(cmd)) => run_languages(console, cmd, notifier).await,
    }
}

fn print_counter(label: &str, value: &Result<u64, Notice>, notifier: &dyn Notifier) {
    match value {
        Ok(count) => println!("{:<20} {}", label, count),
        Err(notice) => {
            println!("{:<20} -", label);
            notifier.notify(notice);
        }
    }
}

fn print_page<R: Resource>(manager: &ResourceManager<R>, row: impl Fn(&R::Item) -> String) {
    for item in manager.visible() {
        println!("{}", row(item));
    }
    let info = manager.page_info();
    let mut nav = Vec::new();
    if info.has_previous() {
        nav.push("--page ".to_string() + &(info.page - 1).to_string());
    }
    if info.has_next() {
        nav.push("--page ".to_string() + &(info.page + 1).to_string());
    }
    println!("{}  {}", info.label(), nav.join(" | "));
}

async fn run_users(console: &AdminConsole, cmd: UsersCommand, notifier: Arc<ConsoleNotifier>) -> Result<(), Error> {
    let mut manager = console.user_manager(notifier);

    match cmd {
        UsersCommand::List { page, search } => {
            manager.go_to(page).await;
            manager.set_search(search.as_deref().unwrap_or_default());
            println!("{:<38} {:<24} {:<30} {:<8} {:<8} {}", "ID", "NAME", "EMAIL", "STATUS", "PLAN", "ACTION");
            print_page(&manager, |u| {
                format!(
                    "{:<38} {:<24} {:<30} {:<8} {:<8} {}",
                    u.id,
                    u.name,
                    u.email,
                    present::user_status_badge(u).label,
                    present::membership_badge(u).label,
                    BlockAction::for_user(u).label()
                )
            });
        }
        UsersCommand::Show { id } => {
            let user = console.users().get(&id).await?;
            manager.open_view(&user).await;
            if let Some(form) = manager.form() {
                let u = &form.record;
                println!("{} <{}>", u.name, u.email);
                println!("  status:        {}", present::user_status_badge(u).label);
                println!("  membership:    {}", present::membership_badge(u).label);
                println!("  role:          {}", u.role.as_deref().unwrap_or("-"));
                println!("  gender:        {}", u.gender.as_deref().unwrap_or("-"));
                println!("  height:        {}", u.height.as_deref().unwrap_or("-"));
                println!("  weight:        {}", u.weight.as_deref().unwrap_or("-"));
                println!("  date of birth: {}", present::format_date(u.date_of_birth.as_deref().unwrap_or_default()));
                println!("  mobile:        {}", u.mobile_number.as_deref().unwrap_or("-"));
                println!("  provider:      {}", u.provider.as_deref().unwrap_or("-"));
                println!("  member since:  {}", present::format_date(u.created_at.as_deref().unwrap_or_default()));
                println!("{}", present::pluralize(form.detail.len(), "purchase"));
                for p in &form.detail {
                    println!("  {:<24} {:<24} {}", p.order_id, p.product_id, present::format_date(&p.created_at));
                }
            }
            manager.close_form();
        }
        UsersCommand::Edit {
            id,
            name,
            gender,
            height,
            weight,
            date_of_birth,
            profile_pic,
            provider,
        } => {
            let user = console.users().get(&id).await?;
            manager.open_edit(&user);
            if let Some(form) = manager.form_mut() {
                let u = &mut form.record;
                if let Some(v) = name {
                    u.name = v;
                }
                if gender.is_some() {
                    u.gender = gender;
                }
                if height.is_some() {
                    u.height = height;
                }
                if weight.is_some() {
                    u.weight = weight;
                }
                if date_of_birth.is_some() {
                    u.date_of_birth = date_of_birth;
                }
                if profile_pic.is_some() {
                    u.profile_pic = profile_pic;
                }
                if provider.is_some() {
                    u.provider = provider;
                }
            }
            manager.submit().await;
        }
        UsersCommand::Block { id } => {
            let user = console.users().get(&id).await?;
            manager.toggle_block(&user).await;
        }
        UsersCommand::Delete { id, yes } => {
            confirm(yes, &format!("user {}", id))?;
            let user = console.users().get(&id).await?;
            manager.delete(&user).await;
        }
    }
    Ok(())
}

async fn run_articles(console: &AdminConsole, cmd: ArticlesCommand, notifier: Arc<ConsoleNotifier>) -> Result<(), Error> {
    let mut manager = console.article_manager(notifier.clone());

    match cmd {
        ArticlesCommand::List { page, locale, search } => {
            manager.set_filter_at(ListFilter::locale(&locale), page).await;
            manager.set_search(search.as_deref().unwrap_or_default());
            println!("{:<38} {:<40} {:<6} {:<12} {}", "ID", "TITLE", "LOCALE", "STATUS", "UPDATED");
            print_page(&manager, |a| {
                format!(
                    "{:<38} {:<40} {:<6} {:<12} {}",
                    a.id,
                    a.title,
                    a.locale,
                    a.status,
                    present::format_date(&a.updated_at)
                )
            });
        }
        ArticlesCommand::Show { id } => {
            let article = console.articles().get(&id).await?;
            println!("{} [{}] {}", article.title, article.locale, article.status);
            println!("topic: {}  type: {}", article.topic, article.kind);
            if let Some(category) = &article.category {
                println!("category: {}", category);
            }
            if let Some(source) = &article.source {
                println!("source: {}", source);
            }
            println!("updated {}", present::format_date(&article.updated_at));
            println!();
            println!("{}", article.body);
        }
        ArticlesCommand::Create { fields } => {
            manager.open_create();
            if let Some(form) = manager.form_mut() {
                fields.apply(&mut form.record)?;
                if form.record.title.trim().is_empty() || form.record.body.trim().is_empty() {
                    return Err(Error::validation("--title and --body are required"));
                }
            }
            manager.submit().await;
        }
        ArticlesCommand::Edit { id, fields } => {
            let article = console.articles().get(&id).await?;
            manager.open_edit(&article);
            if let Some(form) = manager.form_mut() {
                fields.apply(&mut form.record)?;
            }
            manager.submit().await;
        }
        ArticlesCommand::Delete { id, yes } => {
            confirm(yes, &format!("article {}", id))?;
            let article = console.articles().get(&id).await?;
            manager.delete(&article).await;
        }
        ArticlesCommand::Status { id, status } => {
            let status: ArticleStatus = status.parse()?;
            let article = console.articles().get(&id).await?;
            manager.change_status(&article, status).await;
        }
        ArticlesCommand::Liked => {
            for article in console.articles().liked_articles().await? {
                println!("{:<38} {}", article.id, article.title);
            }
        }
        ArticlesCommand::Like { id } => {
            let message = console.articles().add_liked(&id).await?;
            notifier.notify(&Notice::from_message(message, "Article liked"));
        }
    }
    Ok(())
}

async fn run_languages(console: &AdminConsole, cmd: LanguagesCommand, notifier: Arc<ConsoleNotifier>) -> Result<(), Error> {
    let mut manager = console.language_manager(notifier);
    manager.load().await;

    match cmd {
        LanguagesCommand::List => {
            println!("{:<6} {:<8} {:<20} {}", "ID", "LOCALE", "LANGUAGE", "ACTIVE");
            for l in manager.items() {
                println!(
                    "{:<6} {:<8} {:<20} {}",
                    l.id.map(|id| id.to_string()).unwrap_or_default(),
                    l.locale,
                    l.language,
                    if l.status { "yes" } else { "no" }
                );
            }
            println!("{}", present::pluralize(manager.items().len(), "language"));
        }
        LanguagesCommand::Add { locale, language } => {
            manager.open_create();
            if let Some(form) = manager.form_mut() {
                form.record = Language::new(&locale, &language);
            }
            manager.submit().await;
        }
        LanguagesCommand::Edit { id, locale, language } => {
            let current = find_language(&manager, id)?;
            manager.open_edit(&current);
            if let Some(form) = manager.form_mut() {
                if let Some(v) = locale {
                    form.record.locale = v;
                }
                if let Some(v) = language {
                    form.record.language = v;
                }
            }
            manager.submit().await;
        }
        LanguagesCommand::Delete { id, yes } => {
            confirm(yes, &format!("language {}", id))?;
            let current = find_language(&manager, id)?;
            manager.delete(&current).await;
        }
    }
    Ok(())
}

fn find_language(manager: &ResourceManager<LanguagesApi>, id: i64) -> Result<Language, Error> {
    manager
        .items()
        .iter()
        .find(|l| l.id == Some(id))
        .cloned()
        .ok_or_else(|| Error::validation(format!("no language with id {}", id)))
}

fn print_issues(lookup: &IssueLookup) {
    if lookup.results().is_empty() {
        println!("No issues logged for this request id");
        return;
    }

    println!("{:<4} {:<7} {:<6} {:<40} {}", "#", "METHOD", "STATUS", "URL", "TIME");
    for (i, issue) in lookup.results().iter().enumerate() {
        println!(
            "{:<4} {:<7} {:<6} {:<40} {}",
            i,
            issue.method,
            issue.status_code().map(|c| c.to_string()).unwrap_or_else(|| "-".to_string()),
            issue.url,
            issue.timestamp
        );
    }

    if let Some(issue) = lookup.selected() {
        println!();
        println!("{} {}", issue.method, issue.url);
        println!("request id: {}", issue.request_id);
        if let Some(code) = issue.status_code() {
            println!("status:     {} ({:?})", code, present::http_status_tone(code));
        }
        println!("error:      {}", issue.error_text());
        println!("headers:    {}", pretty(&issue.headers));
        println!("request:    {}", pretty(&issue.request_body));
        println!("response:   {}", pretty(&issue.response));
    }
}

fn pretty(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}
