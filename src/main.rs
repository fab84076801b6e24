#![deny(warnings, clippy::all, clippy::pedantic, clippy::nursery)]

use anyhow::Result;
use clap::Parser;
use trailog::app::{App, AppConfig, Message, Response};
use trailog::map::{ConsoleMap, FixedLocator, Locator};
use trailog::store::{FileStorage, WORKOUTS_KEY};
use trailog::{cli, utils};

#[macro_use]
extern crate trailog;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    utils::init_logging(cli.verbose, cli.quiet);

    let storage = FileStorage::open(&cli.data_dir)?;
    dlog!(
        "data_dir={} home={:?} zoom={}",
        storage.dir().display(),
        cli.home,
        cli.zoom
    );

    let config = AppConfig {
        map_zoom: cli.zoom,
        storage_key: WORKOUTS_KEY.to_string(),
    };
    let mut app = App::start(storage, ConsoleMap::new(), config)?;
    let mut locator = FixedLocator(cli.home);

    match cli.cmd {
        None | Some(cli::Cmd::List) => {
            let entries = app.entries();
            if entries.is_empty() {
                println!("No workouts yet.");
            }
            for e in entries {
                println!("{e}");
            }
            Ok(())
        }
        Some(cli::Cmd::Log { at, workout }) => {
            expect_ok(app.dispatch(Message::PositionResolved(locator.locate()))?)?;
            expect_ok(app.dispatch(Message::MapClicked(at))?)?;
            let form = workout.to_form();
            expect_ok(app.dispatch(Message::VariantChanged(form.kind))?)?;

            if let Response::Added(w) = expect_ok(app.dispatch(Message::Submit(form))?)? {
                println!("{}", trailog::render::entry(&w));
            }
            Ok(())
        }
        Some(cli::Cmd::Select { id }) => {
            expect_ok(app.dispatch(Message::PositionResolved(locator.locate()))?)?;
            match expect_ok(app.dispatch(Message::EntrySelected(id.clone()))?)? {
                Response::Centered { at, .. } => {
                    println!("Centered on {id} at {at}");
                    Ok(())
                }
                _ => anyhow::bail!("No workout with id {id}"),
            }
        }
        Some(cli::Cmd::Reset) => {
            app.dispatch(Message::Reset)?;
            println!("All workouts deleted.");
            Ok(())
        }
    }
}

/// Turns a user-facing notice into an error exit.
fn expect_ok(resp: Response) -> Result<Response> {
    if let Response::Notice(msg) = resp {
        anyhow::bail!(msg);
    }
    Ok(resp)
}
