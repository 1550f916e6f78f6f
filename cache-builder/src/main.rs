mod common;
mod config;

use crate::{common::*, config::Config};
use prettytable::{cell, row, Table};
use scene_graph::{generate_dataset, generate_symbolic, load_or_generate_symbolic};

#[derive(Debug, Clone, Parser)]
/// Scene graph dataset cache toolkit
struct Opts {
    /// json5 configuration file
    #[clap(long)]
    config: Option<PathBuf>,
    /// raw dataset directory, overrides the configuration
    #[clap(long)]
    dataset_dir: Option<PathBuf>,
    /// directory receiving the dataset caches, overrides the configuration
    #[clap(long)]
    base_dir: Option<PathBuf>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Load every take and write the symbolic dataset
    Symbolic {
        /// regenerate even if the symbolic dataset exists
        #[clap(long)]
        force: bool,
    },
    /// Write the encoded graphs for one history size
    Build {
        /// history size, overrides the configuration
        #[clap(long)]
        history_size: Option<usize>,
    },
    /// Count the cache files of one history size per split
    Info {
        /// history size, overrides the configuration
        #[clap(long)]
        history_size: Option<usize>,
        /// view applied when verifying
        #[clap(long, default_value = "normal")]
        view: ViewMode,
        /// the held out subject, 1 to 6
        #[clap(long, default_value_t = 1)]
        evaluation_subject: usize,
        /// the validation take, 0 to 9
        #[clap(long, default_value_t = 9)]
        validation_take: usize,
        /// load every file to check that it decodes
        #[clap(long)]
        verify: bool,
    },
}

fn main() -> Result<()> {
    pretty_env_logger::init();

    let opts = Opts::parse();
    let config = {
        let mut config = match &opts.config {
            Some(path) => Config::open(path)
                .with_context(|| format!("failed to load config file '{}'", path.display()))?,
            None => Config::default(),
        };
        if let Some(dir) = opts.dataset_dir {
            config.dataset_dir = dir;
        }
        if let Some(dir) = opts.base_dir {
            config.base_dir = dir;
        }
        config
    };

    match opts.command {
        Command::Symbolic { force } => symbolic(&config, force)?,
        Command::Build { history_size } => {
            build(&config, history_size.unwrap_or(config.history_size))?
        }
        Command::Info {
            history_size,
            view,
            evaluation_subject,
            validation_take,
            verify,
        } => {
            let split = LeaveOneOut::new(evaluation_subject, validation_take)?;
            info(
                &config,
                history_size.unwrap_or(config.history_size),
                view,
                &split,
                verify,
            )?
        }
    }

    Ok(())
}

fn symbolic(config: &Config, force: bool) -> Result<()> {
    let layout = config.layout();

    let dataset = if force {
        generate_symbolic(&layout, cache::crawl(), &config.read_retry)?
    } else {
        load_or_generate_symbolic(&layout, &config.read_retry)?
    };
    info!("symbolic dataset holds {} recordings", dataset.len());

    Ok(())
}

fn build(config: &Config, history_size: usize) -> Result<()> {
    let layout = config.layout();

    // fail before the symbolic pass if the output exists
    let config_dir = layout.config_dir(history_size);
    ensure!(
        !config_dir.exists(),
        "'{}' already exists, refuse to overwrite it",
        config_dir.display()
    );
    let staging_dir = layout.staging_dir(history_size);
    ensure!(
        !staging_dir.exists(),
        "'{}' is left over from an interrupted run, remove it first",
        staging_dir.display()
    );

    let symbolic = load_or_generate_symbolic(&layout, &config.read_retry)?;
    let num_files = generate_dataset(&symbolic, &layout, history_size, &config.write_retry)?;
    info!(
        "built {} cache files in '{}'",
        num_files,
        config_dir.display()
    );

    Ok(())
}

fn info(
    config: &Config,
    history_size: usize,
    view: ViewMode,
    split: &LeaveOneOut,
    verify: bool,
) -> Result<()> {
    let layout = config.layout();
    let config_name = cache::history_config_name(history_size);
    let proxies = cache::load_proxies(layout.cache_root(), &config_name, view, |_| false)?;

    if verify {
        proxies.iter().try_for_each(|proxy| -> Result<_> {
            let graph = proxy.load()?;
            ensure!(
                graph.nodes.iter().all(|node| node.len() == view.node_features()),
                "'{}' has unexpected node features under the {} view",
                proxy.path().display(),
                view.as_ref()
            );
            Ok(())
        })?;
        info!("verified {} cache files", proxies.len());
    }

    let cache::Split { train, valid, test } = split.split(proxies);

    let mut table = Table::new();
    table.add_row(row!["split", "left", "right", "total"]);
    [("train", &train), ("valid", &valid), ("test", &test)]
        .iter()
        .for_each(|(name, proxies)| {
            let (left, right) = count_sides(proxies);
            table.add_row(row![name, left, right, proxies.len()]);
        });
    table.printstd();

    Ok(())
}

fn count_sides(proxies: &[SceneGraphProxy]) -> (usize, usize) {
    let left = proxies
        .iter()
        .filter(|proxy| proxy.side() == HandSide::Left)
        .count();
    (left, proxies.len() - left)
}
