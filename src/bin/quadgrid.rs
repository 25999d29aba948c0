use std::path::PathBuf;
use std::process;

use clap::{Parser, ValueEnum};
use quadgrid::common::config::{Config, config_file};
use quadgrid::common::log;
use quadgrid::layout_engine::{LayoutCommand, LayoutEngine, LayoutEvent};
use quadgrid::model::fixture::{self, GalleryFixture};

/// Demo driver: plays the host-page collaborator against a fixture gallery.
#[derive(Parser)]
struct Cli {
    /// Path to configuration file to use (overrides default).
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Check the configuration file without running the demo.
    #[arg(long)]
    validate: bool,

    /// Load the gallery from a RON fixture instead of the built-in demo.
    #[arg(long, value_name = "PATH")]
    fixture: Option<PathBuf>,

    /// Write the built-in demo fixture to PATH and exit.
    #[arg(long, value_name = "PATH")]
    emit_fixture: Option<PathBuf>,

    /// Steps to run against the gallery, in order.
    #[arg(long, value_delimiter = ',', default_value = "toggle")]
    steps: Vec<Step>,

    /// Print the group state as JSON instead of the document tree.
    #[arg(long)]
    json: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Step {
    /// Toggle between horizontal and vertical presentation.
    Toggle,
    /// Cycle the inter-tile gap.
    Gap,
    /// Drag the first tile onto the last one.
    Swap,
    /// Settle host layout and deliver a frame event.
    Frame,
}

fn main() -> anyhow::Result<()> {
    log::init_logging();
    let cli = Cli::parse();

    let config_path = cli.config.clone().unwrap_or_else(config_file);
    let config = if config_path.exists() {
        Config::read(&config_path)?
    } else {
        Config::default()
    };

    if cli.validate {
        let issues = config.validate();
        if issues.is_empty() {
            println!("Config validation passed");
            return Ok(());
        }
        for issue in issues {
            eprintln!("{issue}");
        }
        process::exit(1);
    }

    if let Some(path) = cli.emit_fixture.as_deref() {
        fixture::standard().save(path)?;
        println!("wrote demo fixture to {}", path.display());
        return Ok(());
    }

    let mut f = match cli.fixture.as_deref() {
        Some(path) => GalleryFixture::load(path)?,
        None => fixture::standard(),
    };

    let mut engine = LayoutEngine::new(&config.settings);
    engine.handle_event(&mut f.doc, LayoutEvent::GroupDiscovered(f.group));

    for step in &cli.steps {
        match step {
            Step::Toggle => engine.handle_command(&mut f.doc, f.group, LayoutCommand::ToggleMode),
            Step::Gap => engine.handle_command(&mut f.doc, f.group, LayoutCommand::ToggleGap),
            Step::Swap => {
                engine.handle_event(&mut f.doc, LayoutEvent::DragStarted(f.tiles[0]));
                engine.handle_event(&mut f.doc, LayoutEvent::DroppedOn(f.tiles[3]));
                engine.handle_event(&mut f.doc, LayoutEvent::DragEnded);
            }
            Step::Frame => {
                f.settle();
                engine.handle_event(&mut f.doc, LayoutEvent::FramePresented);
            }
        }
    }
    // Let the host layout settle once more so the printout shows
    // post-frame state.
    f.settle();
    engine.handle_event(&mut f.doc, LayoutEvent::FramePresented);

    if cli.json {
        let state = serde_json::json!({
            "mode": engine.mode(f.group).to_string(),
            "gap": engine.gap(f.group).to_string(),
            "drag": engine.drag_enabled(f.group),
            "padding_bottom": f.doc.get(f.ratio_box).and_then(|el| el.style.padding_bottom),
            "row_weights": f
                .rows
                .iter()
                .map(|&row| f.doc.get(row).and_then(|el| el.style.flex_grow))
                .collect::<Vec<_>>(),
        });
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        print!("{}", f.doc.draw_tree(f.group));
    }
    Ok(())
}
