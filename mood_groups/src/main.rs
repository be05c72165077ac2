use anyhow::Result;
use clap::Parser;
use mindstore::JsonFileStore;
use mood_groups::{
    categories,
    chat::ClearScope,
    cli::{CategoryCommand, Cli, Command, ScopeArg},
    clock::SystemClock,
    config::Config,
    housekeeping,
    model::{MoodCategory, User},
    movements::MovementFilter,
    Directory,
};
use std::sync::Arc;
use time::{format_description::well_known::Rfc3339, Duration, OffsetDateTime};

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli)?;
    let level = if config.logging_enabled {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let store = Arc::new(JsonFileStore::open(config.store_file())?);
    let directory = Directory::new(store, Arc::new(SystemClock));

    match cli.command.unwrap_or(Command::Moods) {
        Command::Login { name, avatar } => {
            let user = directory.login(&name, avatar)?;
            println!("logged in as {} ({})", user.name, user.id);
        }
        Command::Moods => {
            for summary in directory.group_overview() {
                let c = &summary.category;
                let (members, last) = match &summary.data {
                    Some(data) => (
                        data.member_count,
                        data.last_activity.format(&Rfc3339).unwrap_or_default(),
                    ),
                    None => (0, "-".to_string()),
                };
                println!(
                    "{:<12} {} {:<20} {:>3} members  last activity {}",
                    c.key, c.emoji, c.group_name, members, last
                );
            }
        }
        Command::Join { mood } => {
            let user = active_user(&directory)?;
            let assignment = directory.select_mood(&user.id, &mood)?;
            println!(
                "joined {} ({} members)",
                assignment.category.group_name,
                assignment.roster.len()
            );
        }
        Command::Send { text } => {
            let user = active_user(&directory)?;
            let mood = current_mood(&user)?;
            let message = directory.send_message(&user.id, &mood, &text)?;
            println!("sent {}", message.id);
        }
        Command::SendVoice {
            audio,
            duration_secs,
        } => {
            let user = active_user(&directory)?;
            let mood = current_mood(&user)?;
            let message = directory.send_voice_message(&user.id, &mood, &audio, duration_secs)?;
            println!("sent voice message {}", message.id);
        }
        Command::Log { mood } => {
            let mood = match mood {
                Some(mood) => mood,
                None => current_mood(&active_user(&directory)?)?,
            };
            for message in directory.transcript(&mood)? {
                let stamp = message.sent_at.format(&Rfc3339).unwrap_or_default();
                println!("[{}] {:<12} {}  ({})", stamp, message.author_name, message.text, message.id);
            }
        }
        Command::Movements { mood, since, stats } => {
            let mut filter = MovementFilter {
                mood,
                ..Default::default()
            };
            if let Some(since) = since {
                filter.since = Some(OffsetDateTime::parse(&since, &Rfc3339)?);
            }
            if stats {
                let stats = directory.movement_stats(filter);
                println!("total: {}", stats.total);
                for (mood, count) in stats.by_destination {
                    println!("{:<12} {}", mood, count);
                }
            } else {
                for m in directory.movements(filter) {
                    let stamp = m.occurred_at.format(&Rfc3339).unwrap_or_default();
                    println!("[{}] {} moved {} -> {}", stamp, m.user_name, m.from_mood, m.to_mood);
                }
            }
        }
        Command::Report { message_id, reason } => {
            let user = active_user(&directory)?;
            let report = directory.report_message(&user.id, message_id, &reason)?;
            println!("reported message {} in {}", report.message.id, report.mood);
        }
        Command::Reports => {
            for report in directory.reports() {
                let stamp = report.reported_at.format(&Rfc3339).unwrap_or_default();
                println!(
                    "[{}] {} reported \"{}\": {}",
                    stamp, report.reporter_id, report.message.text, report.reason
                );
            }
        }
        Command::Clear { scope } => {
            let user = active_user(&directory)?;
            let mood = current_mood(&user)?;
            let scope = match scope {
                ScopeArg::All => ClearScope::All,
                ScopeArg::Own => ClearScope::OwnMessages(user.id.clone()),
                ScopeArg::Expired => {
                    ClearScope::OlderThan(Duration::days(i64::from(config.retention_days)))
                }
            };
            let removed = directory.clear_chat(&mood, scope)?;
            println!("removed {} messages", removed);
        }
        Command::Clean => {
            let removed = housekeeping::sweep(
                &directory,
                Duration::days(i64::from(config.retention_days)),
            )?;
            println!("removed {} expired messages", removed);
        }
        Command::Category { command } => match command {
            CategoryCommand::List => {
                for c in directory.categories() {
                    println!(
                        "{:<12} {} {:<14} {:<20} {}",
                        c.key, c.emoji, c.label, c.group_name, c.color
                    );
                }
            }
            CategoryCommand::Add {
                label,
                emoji,
                color,
                group_name,
                icon,
            } => {
                let key = categories::sanitize_key(&label);
                let group_name = group_name.unwrap_or_else(|| format!("{label} Circle"));
                directory.add_category(MoodCategory {
                    key: key.clone(),
                    label,
                    emoji,
                    color,
                    group_name,
                    icon,
                })?;
                println!("added category {}", key);
            }
            CategoryCommand::Update {
                key,
                label,
                emoji,
                color,
                group_name,
                icon,
            } => {
                let mut category = directory
                    .categories()
                    .into_iter()
                    .find(|c| c.key == key)
                    .ok_or_else(|| anyhow::anyhow!("unknown category {}", key))?;
                if let Some(label) = label {
                    category.label = label;
                }
                if let Some(emoji) = emoji {
                    category.emoji = emoji;
                }
                if let Some(color) = color {
                    category.color = color;
                }
                if let Some(group_name) = group_name {
                    category.group_name = group_name;
                }
                if let Some(icon) = icon {
                    category.icon = icon;
                }
                directory.update_category(category)?;
                println!("updated category {}", key);
            }
            CategoryCommand::Remove { key } => {
                directory.remove_category(&key)?;
                println!("removed category {}", key);
            }
        },
    }
    Ok(())
}

fn active_user(directory: &Directory) -> Result<User> {
    directory
        .current_user()
        .ok_or_else(|| anyhow::anyhow!("no active user - run login first"))
}

fn current_mood(user: &User) -> Result<String> {
    user.current_mood
        .clone()
        .ok_or_else(|| anyhow::anyhow!("no group joined - run join first"))
}
