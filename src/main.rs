//! CLI entry point for retint.

mod cli;

use clap::Parser;
use retint::config::load_config;
use retint::store::TweakStore;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = cli::Args::parse();

    let config = match load_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    };

    let mut store = TweakStore::new(config.tweaks_file);

    match args.command {
        cli::Command::Path => {
            println!("{}", store.path().display());
        }
        cli::Command::List { theme } => {
            let themes = match theme {
                Some(theme) => vec![theme],
                None => store.themes(),
            };
            let mut printed = 0usize;
            for theme in themes {
                let groups = store.tweaked_groups(&theme);
                if groups.is_empty() {
                    continue;
                }
                println!("{theme}:");
                for group in groups {
                    for (channel, color) in &group.channels {
                        println!("  {}.{channel} = {color}", group.name);
                        printed += 1;
                    }
                }
            }
            if printed == 0 {
                println!("no stored tweaks");
            }
        }
        cli::Command::Clear { theme, all } => {
            let themes = if all {
                store.themes()
            } else {
                // clap guarantees a theme when --all is absent.
                theme.into_iter().collect()
            };
            if themes.is_empty() {
                println!("nothing to clear");
                return;
            }
            for theme in themes {
                if let Err(e) = store.clear_theme(&theme) {
                    eprintln!("error: failed to clear tweaks for {theme}: {e}");
                    std::process::exit(1);
                }
                println!("cleared tweaks for {theme}");
            }
        }
    }
}
