use blog_indexer::feed::{self, DeployTarget};
use blog_indexer::manifest::DailyItem;
use blog_indexer::menu::Menu;
use blog_indexer::{config, daily, output, update, urls};
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "blog-indexer")]
#[command(about = "Manifest and RSS indexer for a static blog")]
#[command(long_about = "\
Manifest and RSS indexer for a static blog

Site layout (defaults, all configurable in indexer.toml):

  site/
  ├── indexer.toml                 # Optional config (see gen-config)
  ├── config/blogs.json            # Manifest read by the front end
  ├── blog/                        # → \"blogs\", also the feed source
  │   ├── 2023/1.md                # year/number ordering
  │   └── index.md                 # root files are listed after numbered ones
  ├── daily/                       # → \"daily\" (file-list schema)
  └── article/tech_stack/          # → \"tech_stack.article\"

Articles carry metadata in a hidden author block:

  <div style=\"display:none;\" class=\"author\">
  {\"title\": \"...\", \"description\": \"...\", \"date\": \"2024-01-01\", \"tag\": [\"...\"]}
  </div>")]
#[command(version)]
struct Cli {
    /// Site root directory
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    /// Config file, relative to the site root
    #[arg(long, default_value = config::CONFIG_FILE, global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Rescan content directories into the manifest
    Update,
    /// Manage structured daily items
    #[command(subcommand)]
    Daily(DailyCommand),
    /// Generate the RSS feed
    Feed {
        /// Base URL the item links point at
        #[arg(long, value_enum, default_value_t = DeployTarget::Local)]
        target: DeployTarget,
        /// Output path (defaults to rss_path from the config)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Write the hosted URL of every site file
    Urls,
    /// Interactive menu (the default when no command is given)
    Menu,
    /// Print a stock indexer.toml with all options documented
    GenConfig,
}

#[derive(Subcommand)]
enum DailyCommand {
    /// Append a daily item
    Add {
        /// Item text
        #[arg(long)]
        content: String,
        /// Image URL (repeatable)
        #[arg(long = "image")]
        images: Vec<String>,
        /// Tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// List daily items
    List,
    /// Delete a daily item by its number in `list`
    Delete { index: usize },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let command = cli.command.unwrap_or(Command::Menu);
    if let Command::GenConfig = command {
        print!("{}", config::stock_config_toml());
        return Ok(());
    }

    let site_config = config::load_config(&cli.root, &cli.config)?;
    let root = cli.root.as_path();

    match command {
        Command::Update => {
            let report = update::update_file_list(root, &site_config)?;
            output::print_update_report(&report, &site_config.manifest_path(root));
        }
        Command::Daily(DailyCommand::Add {
            content,
            images,
            tags,
        }) => {
            let item = DailyItem {
                date: daily::now_timestamp(),
                content,
                images,
                tags,
            };
            daily::add(root, &site_config, item)?;
        }
        Command::Daily(DailyCommand::List) => {
            let manifest = daily::load_logged(&site_config.manifest_path(root));
            output::print_daily_list(&manifest);
        }
        Command::Daily(DailyCommand::Delete { index }) => {
            let removed = daily::delete(root, &site_config, index)?;
            println!(
                "Deleted: [{}] {}",
                daily::display_timestamp(&removed.date),
                daily::preview(&removed.content)
            );
        }
        Command::Feed {
            target,
            output: out_path,
        } => {
            let summary = feed::generate_feed(root, &site_config, target, out_path.as_deref())?;
            output::print_feed_summary(&summary);
        }
        Command::Urls => {
            let (path, count) = urls::write_url_list(root, &site_config)?;
            for line in output::format_url_list(&path, count) {
                println!("{line}");
            }
        }
        Command::Menu => {
            let stdin = io::stdin();
            Menu::new(root, &site_config, stdin.lock(), io::stdout()).run()?;
        }
        // printed above, before any config is loaded
        Command::GenConfig => {}
    }

    Ok(())
}
