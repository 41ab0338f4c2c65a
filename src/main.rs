use clap::{Parser, Subcommand};
use dummybook::feed::{self, FeedList};
use dummybook::history::MemoryHistory;
use dummybook::logging::{self, LogSettings};
use dummybook::session::FeedSession;
use dummybook::{config, output, render, script};
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Parser)]
#[command(name = "dummybook")]
#[command(about = "DummyBook feed viewer: render feeds and replay navigation")]
#[command(long_about = "\
DummyBook feed viewer: render feeds and replay navigation

Posts are shown as a feed of cards. Clicking a post's text opens the post
viewer; clicking a collage tile opens the image viewer. Each overlay records a
marker in the address fragment (#post:<id> or #images), and navigating back
closes the overlay whose marker is gone.

Replay scripts list one event per line:

  open-post <id>               click a post's text
  open-image <post-id> <index> click a collage tile
  select <index>               click a thumbnail in the image viewer
  next | prev                  step through the image viewer
  close                        dismiss the open overlay
  back | forward               browser history navigation
  navigate <fragment>          edit the address fragment by hand

Run 'dummybook gen-config' to generate a documented dummybook.toml.")]
#[command(version)]
struct Cli {
    /// Config file; stock defaults are used when it does not exist
    #[arg(long, default_value = "dummybook.toml", global = true)]
    config: PathBuf,

    /// Raise log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load the feed and print a summary of its posts
    Check,
    /// Render the feed page, optionally with an overlay open
    Render {
        /// Open the post viewer on this post id
        #[arg(long)]
        open_post: Option<String>,
        /// Open the image viewer at <post-id>:<index>
        #[arg(long)]
        open_images: Option<ImageTarget>,
        /// Output directory (overrides render.output_dir)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Run a replay script against a fresh session
    Replay {
        /// Script file, one event per line
        script: PathBuf,
    },
    /// Print a stock dummybook.toml with all options documented
    GenConfig,
}

/// `<post-id>:<index>` as given to `--open-images`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ImageTarget {
    post: String,
    index: usize,
}

impl FromStr for ImageTarget {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (post, index) = s
            .rsplit_once(':')
            .ok_or_else(|| format!("expected <post-id>:<index>, got `{s}`"))?;
        if post.is_empty() {
            return Err(format!("missing post id in `{s}`"));
        }
        let index = index
            .parse()
            .map_err(|_| format!("expected a non-negative index, got `{index}`"))?;
        Ok(Self {
            post: post.to_string(),
            index,
        })
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Check => {
            let app_config = setup(&cli.config, cli.verbose)?;
            let source = feed::configured_source(&app_config.feed);
            let feed = FeedList::from_source(source.as_ref())?;
            output::print_feed_summary(&feed, &source.describe());
        }
        Command::Render {
            open_post,
            open_images,
            output: out_dir,
        } => {
            let app_config = setup(&cli.config, cli.verbose)?;
            let mut session = new_session(feed::load_feed(&app_config.feed)?);
            if let Some(id) = &open_post {
                session.open_post(id)?;
            }
            if let Some(target) = &open_images {
                session.open_image(&target.post, target.index)?;
            }
            let dir = out_dir.unwrap_or_else(|| app_config.render.output_dir.clone());
            let path = render::write_page(&dir, session.feed(), session.state(), &app_config)?;
            output::print_render_output(&path, session.state());
        }
        Command::Replay { script: path } => {
            let app_config = setup(&cli.config, cli.verbose)?;
            let text = std::fs::read_to_string(&path)?;
            let steps = script::parse_script(&text)?;
            let mut session = new_session(feed::load_feed(&app_config.feed)?);
            let reports = script::replay(&mut session, &steps);
            output::print_replay_output(&reports);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Load config and install the log subscriber.
fn setup(
    config_path: &Path,
    verbose: u8,
) -> Result<config::AppConfig, Box<dyn std::error::Error>> {
    let app_config = config::load_config(config_path)?;
    logging::init_logging(&LogSettings::resolve(&app_config.logging, verbose))?;
    Ok(app_config)
}

fn new_session(feed: FeedList) -> FeedSession<MemoryHistory> {
    FeedSession::new(feed, MemoryHistory::new())
}
