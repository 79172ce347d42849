use clap::{CommandFactory, Parser};
use layerdirs::{
    cli::{AnsiStyles, LayerdirsArgs, LayerdirsSubcommand},
    config::StoreConfig,
    materialize, LayerStore, LayerdirsError, LayerdirsResult,
};
use tracing_subscriber::{fmt, EnvFilter};

//--------------------------------------------------------------------------------------------------
// Functions: main
//--------------------------------------------------------------------------------------------------

fn main() -> LayerdirsResult<()> {
    let args = LayerdirsArgs::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    let mut config = StoreConfig::load(&args.config)?;
    if let Some(root) = args.root {
        config = config.with_root(root);
    }
    tracing::trace!("using config: {config:?}");

    let store = LayerStore::from_config(&config);
    match args.subcommand {
        Some(LayerdirsSubcommand::Ids { records }) => {
            let ids = if records {
                store.record_ids()?
            } else {
                store.ids()?
            };
            for id in ids {
                println!("{id}");
            }
        }
        Some(LayerdirsSubcommand::Parents { id, diffs }) => {
            if diffs {
                for path in store.parent_diff_paths(&id)? {
                    println!("{}", path.display());
                }
            } else {
                for parent in store.parent_ids(&id)? {
                    println!("{parent}");
                }
            }
        }
        Some(LayerdirsSubcommand::Paths { id, label }) => {
            print_path("mount", &store.mount_path(&id));
            print_path("diff", &store.diff_path(&id));
            if let Some(label) = label.or_else(|| config.get_label().clone()) {
                print_path("label diff", &store.label_diff_path(&id, &label));
            }
            print_path("record", &store.record_path(&id));
        }
        Some(LayerdirsSubcommand::Copy {
            source,
            destination,
            label_dir,
            atomic,
        }) => {
            tracing::trace!("copying tree: source={source:?}, destination={destination:?}, label_dir={label_dir:?}, atomic={atomic}");
            if atomic || *config.get_atomic() {
                materialize::copy_tree_atomic(&source, &destination, label_dir.as_deref())?;
            } else {
                materialize::copy_tree(&source, &destination, label_dir.as_deref())?;
            }
        }
        Some(LayerdirsSubcommand::Materialize { id, label, atomic }) => {
            let Some(label) = label.or_else(|| config.get_label().clone()) else {
                eprintln!(
                    "{} no label given and none set in {}",
                    "error:".error(),
                    args.config.display().to_string().literal()
                );
                return Err(LayerdirsError::custom(anyhow::anyhow!(
                    "materialize requires a label"
                )));
            };

            let store = if atomic { store.atomic(true) } else { store };
            let path = store.materialize_label(&id, &label)?;
            println!("{}", path.display());
        }
        None => {
            LayerdirsArgs::command().print_help()?;
        }
    }

    Ok(())
}

//--------------------------------------------------------------------------------------------------
// Functions: *
//--------------------------------------------------------------------------------------------------

fn print_path(name: &str, path: &std::path::Path) {
    println!(
        "{} {}",
        format!("{name}:").header(),
        path.display().to_string().placeholder()
    );
}
