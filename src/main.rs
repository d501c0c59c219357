use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use councilhub::calendar::is_past;
use councilhub::contact::{self, ContactForm};
use councilhub::feed::{events_to_rss, FeedInfo};
use councilhub::homepage::HomepageData;
use councilhub::media::correct_page_urls;
use councilhub::prelude::*;
use councilhub::settings::{AccessibilitySettings, FileStore};
use councilhub::views::{ContentHubView, CouncillorsView, EventsView, MeetingTypeView, MeetingsOverview};
use serde::Serialize;
use serde_json::json;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command-line client for the town council CMS
#[derive(Parser, Debug)]
#[command(name = "councilhub")]
#[command(about = "Query the town council CMS and print JSON lines")]
#[command(version)]
struct Args {
    /// YAML config file (default: COUNCILHUB_CONFIG env var)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// CMS origin (overrides config and COUNCILHUB_API_URL)
    #[arg(long = "api-url", global = true)]
    api_url: Option<String>,

    /// Date treated as today, YYYY-MM-DD (default: local date)
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List councillors, optionally narrowed by tag
    Councillors {
        /// Tag identifiers to keep (any match)
        #[arg(long = "tag")]
        tags: Vec<String>,

        /// Case-insensitive search over name and intro
        #[arg(long)]
        query: Option<String>,
    },

    /// Show one month of events
    Events {
        /// Category identifiers to keep (any match)
        #[arg(long = "category")]
        categories: Vec<String>,

        /// Case-insensitive search over title and short description
        #[arg(long)]
        query: Option<String>,

        /// Month to show, YYYY-MM (default: month of the next event)
        #[arg(long)]
        month: Option<YearMonth>,

        /// Move to the next month with events
        #[arg(long, conflicts_with = "prev")]
        next: bool,

        /// Move to the previous month with events
        #[arg(long)]
        prev: bool,
    },

    /// List meeting types, or show the meetings of one type
    Meetings {
        /// Meeting type name, e.g. "Full Council Meetings"
        meeting_type: Option<String>,

        /// How the next meeting is chosen: earliest_upcoming or first_in_descending
        #[arg(long)]
        rule: Option<String>,

        /// Page URL used in share links
        #[arg(long = "page-url")]
        page_url: Option<String>,
    },

    /// Show content-hub sections
    Content {
        /// Search categories and pages
        #[arg(long)]
        search: Option<String>,
    },

    /// Show one content page
    Page {
        /// Page slug
        slug: String,
    },

    /// Show the homepage bundle
    Homepage,

    /// Print an RSS 2.0 feed of upcoming events
    Feed {
        /// Channel link
        #[arg(long)]
        link: Option<String>,
    },

    /// Send a message through the contact form
    Contact {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long, default_value = "")]
        phone: String,

        /// general, planning, meetings, services, complaint, suggestion or other
        #[arg(long)]
        subject: String,

        #[arg(long)]
        message: String,

        /// Agree to the privacy policy
        #[arg(long)]
        privacy: bool,
    },

    /// Show or change accessibility settings
    Settings {
        #[command(subcommand)]
        action: Option<SettingsAction>,
    },
}

#[derive(Subcommand, Debug, Clone, Copy)]
enum SettingsAction {
    Show,
    ToggleContrast,
    ToggleTextSize,
    Reset,
}

fn print_available_commands() {
    println!("Available commands:");
    println!("  councillors  List councillors, optionally narrowed by tag");
    println!("  events       Show one month of events");
    println!("  meetings     List meeting types, or show the meetings of one type");
    println!("  content      Show content-hub sections");
    println!("  page         Show one content page");
    println!("  homepage     Show the homepage bundle");
    println!("  feed         Print an RSS 2.0 feed of upcoming events");
    println!("  contact      Send a message through the contact form");
    println!("  settings     Show or change accessibility settings");
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("COUNCILHUB_LOG")
        .unwrap_or_else(|_| EnvFilter::new("councilhub=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(args: &Args) -> anyhow::Result<ConfigBuilder> {
    let builder = match &args.config {
        Some(path) => ConfigBuilder::from_file(path)?.env_overrides(),
        None => ConfigBuilder::from_env()?,
    };
    Ok(match &args.api_url {
        Some(url) => builder.api_base_url(url.as_str()),
        None => builder,
    })
}

/// Write one JSON object per line to stdout
fn emit<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(value)?);
    Ok(())
}

async fn run_councillors_command(
    client: &CmsClient,
    tags: Vec<String>,
    query: Option<String>,
) -> anyhow::Result<()> {
    let mut view = CouncillorsView::load(client).await?;
    view.selection = FilterSelection::new().with_tags(tags);
    if let Some(query) = query {
        view.selection.set_query(query);
    }

    for councillor in view.visible() {
        emit(&json!({
            "councillor": councillor,
            "card_description": councillor.card_description(),
        }))?;
    }
    Ok(())
}

#[derive(Debug)]
struct MonthQuery {
    categories: Vec<String>,
    query: Option<String>,
    month: Option<YearMonth>,
    next: bool,
    prev: bool,
}

async fn run_events_command(
    client: &CmsClient,
    today: NaiveDate,
    MonthQuery {
        categories,
        query,
        month,
        next,
        prev,
    }: MonthQuery,
) -> anyhow::Result<()> {
    let mut view = EventsView::load(client, today).await?;
    view.selection = FilterSelection::new().with_tags(categories);
    if let Some(query) = query {
        view.selection.set_query(query);
    }

    let navigator = view.navigator_mut();
    if let Some(month) = month {
        navigator.jump_to(month);
    }
    if next {
        navigator.next();
    } else if prev {
        navigator.prev();
    }

    let month = view.month();
    emit(&json!({
        "month": month.to_string(),
        "label": month.label(),
        "has_prev": view.navigator().has_prev(),
        "has_next": view.navigator().has_next(),
        "categories": view.categories(),
    }))?;

    for event in view.visible() {
        emit(&json!({
            "event": event,
            "time_label": event.time_label(),
            "past": is_past(event.date, today),
        }))?;
    }
    Ok(())
}

async fn run_meetings_command(
    client: &CmsClient,
    config: &Config,
    today: NaiveDate,
    meeting_type: Option<String>,
    page_url: Option<String>,
) -> anyhow::Result<()> {
    let Some(name) = meeting_type else {
        let overview = MeetingsOverview::load(client, config).await?;
        for meeting_type in &overview.meeting_types {
            emit(&json!({
                "meeting_type": meeting_type,
                "color": meeting_type.color_or_default(),
            }))?;
        }
        return Ok(());
    };

    let view = MeetingTypeView::load(client, &name, today, config).await?;
    let page_url = page_url.unwrap_or_else(|| client.base_url().to_string());
    let documents = view.partition.next.as_ref().map(|m| m.documents());

    emit(&json!({
        "meeting_type": view.meeting_type,
        "next": view.partition.next,
        "next_documents": documents,
        "next_links": view.next_meeting_links(&page_url),
        "upcoming": view.partition.upcoming,
        "recent": view.partition.recent,
        "historic": view.partition.historic,
    }))
}

async fn run_content_command(
    client: &CmsClient,
    config: &Config,
    search: Option<String>,
) -> anyhow::Result<()> {
    let mut hub = ContentHubView::load(client, config).await?;
    if let Some(search) = search {
        hub.set_query(search);
        info!(results = hub.result_count(), "content search");
    }

    for section in hub.sections() {
        emit(&section)?;
    }
    Ok(())
}

async fn run_contact_command(client: &CmsClient, form: ContactForm) -> anyhow::Result<()> {
    let outcome = contact::send(client, &form).await?;
    emit(&outcome)?;
    if !outcome.is_sent() {
        anyhow::bail!("{}", outcome.message());
    }
    Ok(())
}

fn run_settings_command(config: &Config, action: SettingsAction) -> anyhow::Result<()> {
    let mut store = FileStore::open(&config.settings_path)?;
    let mut settings = AccessibilitySettings::load(&store)?;

    match action {
        SettingsAction::Show => {}
        SettingsAction::ToggleContrast => {
            settings.toggle_contrast(&mut store)?;
        }
        SettingsAction::ToggleTextSize => {
            settings.toggle_text_size(&mut store)?;
        }
        SettingsAction::Reset => settings.reset(&mut store)?,
    }

    emit(&settings)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let mut args = Args::parse();

    let Some(command) = args.command.take() else {
        print_available_commands();
        return Ok(());
    };

    let mut builder = load_config(&args)?;
    if let Command::Meetings {
        rule: Some(rule), ..
    } = &command
    {
        builder = builder.next_meeting_rule(NextMeetingRule::from(rule.as_str()));
    }
    let config = builder.build()?;
    let client = CmsClient::from_config(&config)?;
    let today = args
        .today
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    match command {
        Command::Councillors { tags, query } => {
            run_councillors_command(&client, tags, query).await
        }
        Command::Events {
            categories,
            query,
            month,
            next,
            prev,
        } => {
            let request = MonthQuery {
                categories,
                query,
                month,
                next,
                prev,
            };
            run_events_command(&client, today, request).await
        }
        Command::Meetings {
            meeting_type,
            page_url,
            ..
        } => run_meetings_command(&client, &config, today, meeting_type, page_url).await,
        Command::Content { search } => run_content_command(&client, &config, search).await,
        Command::Page { slug } => {
            let mut page = client.content_page(&slug).await?;
            correct_page_urls(&mut page);
            emit(&page)
        }
        Command::Homepage => emit(&HomepageData::load(&client).await),
        Command::Feed { link } => {
            let view = EventsView::load(&client, today).await?;
            let mut info = FeedInfo::default();
            if let Some(link) = link {
                info.link = link;
            }
            println!("{}", events_to_rss(view.upcoming(today), &info));
            Ok(())
        }
        Command::Contact {
            name,
            email,
            phone,
            subject,
            message,
            privacy,
        } => {
            let form = ContactForm {
                name,
                email,
                phone,
                subject,
                message,
                privacy,
            };
            run_contact_command(&client, form).await
        }
        Command::Settings { action } => {
            run_settings_command(&config, action.unwrap_or(SettingsAction::Show))
        }
    }
}
