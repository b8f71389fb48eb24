mod config;
mod shell;

use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
    process::ExitCode,
    time::Instant,
};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use entity::employee::{Department, EmployeeInput, Field, Position};
use platform_obs::{ObsConfig, init_tracing};
use platform_store::FileStore;
use platform_ui::{ConsoleNotifier, Locale, Notifier, Route, Translator, i18n, report};
use products_hr::{
    EmployeeService, FormView, ListController, Preferences, ServiceError, ViewMode, render,
    sample,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::AppConfig;

const DEFAULT_PHONE_CODE: &str = "+(90)";

type Console = ListController<FileStore, ConsoleNotifier>;

#[derive(Parser, Debug)]
#[command(name = "hr", version, about = "Employee directory for the terminal")]
struct Cli {
    /// Interface language (en, tr); overrides HR_LANG and the saved preference.
    #[arg(long, global = true)]
    lang: Option<String>,
    /// Directory holding the data files; overrides HR_DATA_DIR.
    #[arg(long, global = true, value_name = "DIR")]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print one page of the employee list.
    List(ListArgs),
    /// Print a single employee.
    Show { id: Uuid },
    /// Add an employee.
    Create(EmployeeArgs),
    /// Change an employee; omitted fields keep their value.
    Update {
        id: Uuid,
        #[command(flatten)]
        fields: EmployeeArgs,
        #[arg(long, help = "Skip the confirmation prompt")]
        yes: bool,
    },
    /// Remove an employee.
    Delete {
        id: Uuid,
        #[arg(long, help = "Skip the confirmation prompt")]
        yes: bool,
    },
    /// Fill an empty directory with random employees.
    Seed {
        #[arg(long, default_value_t = sample::DEFAULT_COUNT)]
        count: usize,
    },
    /// Remove every employee.
    Reset {
        #[arg(long, help = "Skip the confirmation prompt")]
        yes: bool,
    },
    /// Resolve an application path such as `/employee/new`.
    Open { path: String },
    /// Browse the list interactively.
    Shell,
    /// List the bundled languages.
    Languages,
}

#[derive(Args, Debug, Default)]
struct ListArgs {
    #[arg(long, default_value_t = 1)]
    page: usize,
    #[arg(long, help = "Employees per page for this listing (5, 10, 20, 50)")]
    size: Option<usize>,
    #[arg(long, default_value = "")]
    search: String,
    #[arg(long, help = "table or card; saved as the default view")]
    view: Option<ViewMode>,
}

#[derive(Args, Debug, Default)]
struct EmployeeArgs {
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long, help = "Country code, e.g. +(90)")]
    phone_code: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long, value_name = "YYYY-MM-DD")]
    born: Option<NaiveDate>,
    #[arg(long, value_name = "YYYY-MM-DD")]
    employed: Option<NaiveDate>,
    #[arg(long, help = "analytics or tech")]
    department: Option<Department>,
    #[arg(long, help = "junior, medior or senior")]
    position: Option<Position>,
}

impl From<EmployeeArgs> for EmployeeInput {
    fn from(args: EmployeeArgs) -> Self {
        EmployeeInput {
            id: None,
            first_name: args.first_name,
            last_name: args.last_name,
            email: args.email,
            phone_code: args.phone_code,
            phone_number: args.phone,
            date_of_birth: args.born,
            date_of_employment: args.employed,
            department: args.department,
            position: args.position,
        }
    }
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    let config = AppConfig::load()?.with_overrides(cli.data_dir.clone(), cli.lang.clone());
    init_tracing(ObsConfig::default().with_filter(config.log_filter.clone()))?;

    let mut storage = config
        .storage
        .open()
        .with_context(|| format!("cannot open data directory {}", config.storage.dir.display()))?;
    if !storage.is_available() {
        warn!(dir = %config.storage.dir.display(), "data directory rejects writes; changes will fail");
    }

    let locale = match config.language.as_deref() {
        Some(code) => code.parse::<Locale>()?,
        None => {
            let saved = Preferences::load(&storage).language;
            let env_lang = std::env::var("LANG").ok();
            Locale::detect(saved.map(Locale::code), env_lang.as_deref())
        }
    };
    debug!(%locale, dir = %config.storage.dir.display(), "console starting");
    let translator = Translator::new(locale)?;
    let mut notifier = ConsoleNotifier::new();

    let (mut service, unreadable) =
        EmployeeService::open_or_empty(storage).context("cannot load employees")?;
    let recovered = unreadable.is_some();
    if let Some(err) = unreadable {
        report(&err, &translator, &mut notifier);
    }

    let command = cli.command.unwrap_or(Command::List(ListArgs::default()));
    let shows_list = matches!(
        command,
        Command::List(_) | Command::Open { .. } | Command::Shell
    );
    if config.seed_on_empty && shows_list && !recovered && service.is_empty() {
        let today = service.today();
        let created = sample::seed(
            &mut service,
            sample::DEFAULT_COUNT,
            today,
            &mut rand::thread_rng(),
        )
        .context("cannot seed sample employees")?;
        info!(created, "empty directory seeded");
    }

    let mut console = ListController::new(service, translator, notifier);

    let ok = match command {
        Command::List(args) => list(&mut console, args),
        Command::Show { id } => show(&mut console, id),
        Command::Create(fields) => create(&mut console, fields),
        Command::Update { id, fields, yes } => update(&mut console, id, fields, yes)?,
        Command::Delete { id, yes } => delete(&mut console, id, yes)?,
        Command::Seed { count } => seed(&mut console, count),
        Command::Reset { yes } => reset(&mut console, yes)?,
        Command::Open { path } => open(&mut console, &path),
        Command::Shell => {
            let stdin = io::stdin();
            shell::run(&mut console, stdin.lock(), io::stdout())?;
            true
        }
        Command::Languages => {
            languages(console.translator().locale());
            true
        }
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn list(console: &mut Console, args: ListArgs) -> bool {
    if let Some(size) = args.size {
        if !console.use_page_size(size) {
            eprintln!("page size must be one of 5, 10, 20, 50");
            return false;
        }
    }
    if let Some(view) = args.view {
        console.set_view(view);
    }
    if !args.search.trim().is_empty() {
        console.set_search(args.search);
    }
    let page = args.page.clamp(1, console.listing().total_pages);
    console.go_to(page);
    println!("{}", console.render());
    true
}

fn show(console: &mut Console, id: Uuid) -> bool {
    match console.service().get_by_id(id) {
        Some(employee) => {
            println!("{}", render::card(&employee, console.translator()));
            true
        }
        None => {
            console.report_error(&ServiceError::NotFound { id });
            false
        }
    }
}

fn create(console: &mut Console, fields: EmployeeArgs) -> bool {
    let mut input = EmployeeInput::from(fields);
    if input.phone_code.is_none() {
        input.phone_code = Some(DEFAULT_PHONE_CODE.to_string());
    }
    let outcome = console.submit(&FormView::create(), input);
    if let Some(record) = outcome.record() {
        println!("{}", record.id);
    }
    outcome.is_saved()
}

fn update(console: &mut Console, id: Uuid, fields: EmployeeArgs, yes: bool) -> Result<bool> {
    let form = match console.open_form(&Route::Edit(id)) {
        Ok(Some(form)) => form,
        Ok(None) => return Ok(false),
        Err(err) => {
            console.report_error(&err);
            return Ok(false);
        }
    };
    if !yes && !confirm(&console.translator().t("employee.form.updateConfirm"))? {
        return Ok(false);
    }
    Ok(console.submit(&form, fields.into()).is_saved())
}

fn delete(console: &mut Console, id: Uuid, yes: bool) -> Result<bool> {
    if !yes && !confirm(&console.translator().t("employee.form.deleteConfirm"))? {
        return Ok(false);
    }
    Ok(console.confirm_delete(id, Instant::now()))
}

fn seed(console: &mut Console, count: usize) -> bool {
    let service = console.service_mut();
    let today = service.today();
    let result = sample::seed(service, count, today, &mut rand::thread_rng());
    console.refresh();
    match result {
        Ok(0) => {
            let message = console.translator().t("notifications.seedSkipped");
            console.notifier_mut().warning(&message);
            true
        }
        Ok(created) => {
            let message = console
                .translator()
                .translate("notifications.seeded", &[("count", &created)]);
            console.notifier_mut().success(&message);
            true
        }
        Err(err) => {
            console.report_error(&err);
            false
        }
    }
}

fn reset(console: &mut Console, yes: bool) -> Result<bool> {
    if !yes && !confirm(&console.translator().t("employee.form.deleteConfirm"))? {
        return Ok(false);
    }
    let result = console.service_mut().clear();
    console.refresh();
    Ok(match result {
        Ok(()) => {
            let message = console.translator().t("notifications.cleared");
            console.notifier_mut().success(&message);
            true
        }
        Err(err) => {
            console.report_error(&err);
            false
        }
    })
}

fn open(console: &mut Console, path: &str) -> bool {
    let route = Route::parse(path);
    if let Route::NotFound(missing) = &route {
        let translator = console.translator();
        eprintln!("{}", translator.t("notFound.title"));
        eprintln!(
            "{}",
            translator.translate("notFound.message", &[("path", missing)])
        );
        return false;
    }
    match console.open_form(&route) {
        Ok(Some(form)) => {
            print_form(console.translator(), &form);
            true
        }
        Ok(None) => {
            println!("{}", console.render());
            true
        }
        Err(err) => {
            console.report_error(&err);
            false
        }
    }
}

fn print_form(translator: &Translator, form: &FormView) {
    println!("{}", translator.t(form.title_key()));
    let initial = form.initial();
    for field in Field::ALL {
        let label = translator.t(&field.i18n_key());
        let value = field_value(initial, field, translator).unwrap_or_default();
        println!("  {label:<22} {value}");
    }
}

fn field_value(input: &EmployeeInput, field: Field, translator: &Translator) -> Option<String> {
    let locale = translator.locale();
    match field {
        Field::FirstName => input.first_name.clone(),
        Field::LastName => input.last_name.clone(),
        Field::Email => input.email.clone(),
        Field::PhoneCode => input.phone_code.clone(),
        Field::PhoneNumber => input.phone_number.clone(),
        Field::DateOfEmployment => input
            .date_of_employment
            .map(|d| products_hr::format::date(d, locale)),
        Field::DateOfBirth => input
            .date_of_birth
            .map(|d| products_hr::format::date(d, locale)),
        Field::Department => input.department.map(|d| translator.t(&d.i18n_key())),
        Field::Position => input.position.map(|p| translator.t(&p.i18n_key())),
    }
}

fn languages(current: Locale) {
    for (code, name) in i18n::available_languages() {
        let marker = if code == current.code() { "*" } else { " " };
        println!("{marker} {code}  {name}");
    }
}

fn confirm(question: &str) -> Result<bool> {
    let mut stderr = io::stderr();
    write!(stderr, "{question} [y/N] ")?;
    stderr.flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(
        answer.trim().to_lowercase().as_str(),
        "y" | "yes" | "e" | "evet"
    ))
}
