mod args;
mod rollcall;

use std::path::Path;
use std::process;

use clap::Parser;
use log::{debug, warn};
use roll_call::{abbreviated_list, DrawMode};

use crate::args::{Args, ClassCommand, Command};
use crate::rollcall::io_excel::ImportOptions;
use crate::rollcall::{ImportSummary, MergePolicy, RollCall, RollCallResult};

fn main() {
    let args = Args::parse();
    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
    debug!("args: {:?}", args);

    if let Err(e) = run(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(args: &Args) -> RollCallResult<()> {
    let mut app = RollCall::open(Path::new(&args.data_dir))?;

    match &args.command {
        Command::Import {
            file,
            worksheet,
            skip_rows,
            yes,
            skip_duplicates,
        } => {
            let options = ImportOptions {
                worksheet: worksheet.clone(),
                skip_rows: *skip_rows,
            };
            let summary = app.import_file(file, &options, merge_policy(*yes, *skip_duplicates))?;
            print_summary(&summary);
        }
        Command::Add {
            names,
            yes,
            skip_duplicates,
        } => {
            let summary = app.add_manual(names, merge_policy(*yes, *skip_duplicates))?;
            print_summary(&summary);
        }
        Command::Remove { names } => {
            let removed = app.rosters.remove_names(names)?;
            if removed < names.len() {
                warn!("{} name(s) were not in the class", names.len() - removed);
            }
            println!(
                "Removed {} name(s), {} left in class '{}'",
                removed,
                app.rosters.current_roster().len(),
                app.rosters.current_class()
            );
        }
        Command::Clear => {
            let count = app.rosters.current_roster().len();
            app.rosters.clear_current()?;
            println!(
                "Removed all {} name(s) from class '{}'",
                count,
                app.rosters.current_class()
            );
        }
        Command::List => {
            let roster = app.rosters.current_roster();
            println!(
                "Class '{}' ({} names)",
                app.rosters.current_class(),
                roster.len()
            );
            for (idx, name) in roster.iter().enumerate() {
                println!("{:>4}. {}", idx + 1, name);
            }
        }
        Command::Class(cmd) => run_class_command(&mut app, cmd)?,
        Command::Draw {
            count,
            allow_repeat,
            no_repeat,
        } => {
            let mode = match (*allow_repeat, *no_repeat) {
                (true, false) => Some(DrawMode::WithReplacement),
                (false, true) => Some(DrawMode::Unique),
                _ => None,
            };
            if *allow_repeat && *no_repeat {
                warn!("Both --allow-repeat and --no-repeat given, using the settings");
            }
            let event = app.draw(*count, mode)?;
            for name in event.names.iter() {
                println!("{}", name);
            }
        }
        Command::Config {
            count,
            prevent_duplicate,
            geometry,
        } => {
            if count.is_some() || prevent_duplicate.is_some() || geometry.is_some() {
                app.config.update(|c| {
                    if let Some(n) = count {
                        c.num_students = (*n).max(1);
                    }
                    if let Some(p) = prevent_duplicate {
                        c.prevent_duplicate = *p;
                    }
                    if let Some([x, y, w, h]) = geometry.as_deref() {
                        c.window_geometry = [*x, *y, *w, *h];
                    }
                })?;
            }
            let c = app.config.config();
            println!("num_students: {}", c.num_students);
            println!("prevent_duplicate: {}", c.prevent_duplicate);
            println!("window_geometry: {:?}", c.window_geometry);
        }
        Command::History { limit, clear } => {
            if *clear {
                let count = app.history.events().len();
                app.history.clear()?;
                println!("Deleted {} draw(s) from the history", count);
            } else if app.history.events().is_empty() {
                println!("No draw yet");
            } else {
                for event in app.history.recent(*limit) {
                    println!("[{} {}] {}", event.date, event.time, event.names.join(", "));
                }
            }
        }
        Command::Stats { top } => {
            let stats = app.history.stats_today();
            println!("Draws today: {}", stats.today);
            println!("Draws in total: {}", stats.total);
            if !stats.tally.is_empty() {
                println!();
                for (idx, (name, count)) in stats.tally.iter().take(*top).enumerate() {
                    println!("{:>4}. {}: {}", idx + 1, name, count);
                }
                if stats.tally.len() > *top {
                    println!("... and {} more", stats.tally.len() - *top);
                }
            }
        }
    }
    Ok(())
}

fn run_class_command(app: &mut RollCall, cmd: &ClassCommand) -> RollCallResult<()> {
    match cmd {
        ClassCommand::List => {
            let current = app.rosters.current_class();
            for name in app.rosters.class_names() {
                let marker = if name == current { "*" } else { " " };
                let size = app.rosters.classes().roster(name).map_or(0, |r| r.len());
                println!("{} {} ({} names)", marker, name, size);
            }
        }
        ClassCommand::Add { name } => {
            app.rosters.add_class(name)?;
            println!("Created class '{}'", name.trim());
        }
        ClassCommand::Rename { new, from } => {
            let old = from
                .clone()
                .unwrap_or_else(|| app.rosters.current_class().to_string());
            app.rosters.rename_class(&old, new)?;
            println!("Renamed class '{}' to '{}'", old, new.trim());
        }
        ClassCommand::Delete { name } => {
            let name = name
                .clone()
                .unwrap_or_else(|| app.rosters.current_class().to_string());
            app.rosters.delete_class(&name)?;
            println!(
                "Deleted class '{}', current class is '{}'",
                name,
                app.rosters.current_class()
            );
        }
        ClassCommand::Use { name } => {
            app.rosters.switch_class(name)?;
            println!(
                "Current class is '{}' ({} names)",
                name,
                app.rosters.current_roster().len()
            );
        }
    }
    Ok(())
}

fn merge_policy(yes: bool, skip_duplicates: bool) -> MergePolicy {
    MergePolicy {
        accept_warnings: yes,
        keep_duplicates: !skip_duplicates,
    }
}

fn print_summary(summary: &ImportSummary) {
    println!(
        "Added {} name(s), the class now has {}",
        summary.added, summary.total
    );
    if summary.report.has_warnings() {
        println!("({} warning(s))", summary.report.warnings.len());
        for w in summary.report.warnings.iter() {
            println!("  {}", w);
        }
    }
    if !summary.report.duplicates.is_empty() {
        let dups: Vec<String> = summary
            .report
            .duplicate_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        println!("Duplicate names: {}", abbreviated_list(&dups, 5));
    }
}
