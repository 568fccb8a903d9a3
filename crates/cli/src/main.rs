//! CLI tool for turning PowerPoint presentations into per-topic videos.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ppt2video_convert::{CommandEngine, DisplaySink, Session};
use ppt2video_core::{AnimationMode, DisplayStyle, ExtensionMatch};
use ppt2video_tika::{property, property_all, PropertyNames, TikaConfig};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Convert PowerPoint presentations into per-topic videos.
#[derive(Parser, Debug)]
#[command(name = "ppt2video")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Java launcher used to run Tika
    #[arg(long, global = true, default_value = "java")]
    java: String,

    /// Directory containing the Tika jar
    #[arg(long, global = true, default_value = "lib")]
    lib_dir: PathBuf,

    /// Tika application jar file name
    #[arg(long, global = true, default_value = "tika-app.jar")]
    tika_jar: String,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the presentations in a directory
    List {
        /// Directory to search
        dir: PathBuf,

        /// Match the .pptx extension in any letter case
        #[arg(short, long)]
        ignore_case: bool,
    },

    /// Print the slides (content and notes) of a presentation
    Slides {
        /// Presentation (.pptx) or pre-extracted Tika output (.xml)
        input: PathBuf,

        /// Print slides as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Print document properties of a presentation
    Meta {
        /// Presentation (.pptx) or pre-extracted Tika output (.xml)
        input: PathBuf,

        /// Semantic property key to look up (e.g. title); repeatable
        #[arg(short, long)]
        key: Vec<String>,

        /// Literal meta name whose values are all printed; repeatable
        #[arg(short, long)]
        name: Vec<String>,

        /// JSON file overriding the key-to-meta-name mapping
        #[arg(short, long)]
        properties: Option<PathBuf>,
    },

    /// Generate the import manifest and every topic video, then save the archive
    Convert {
        /// Directory containing the presentation
        dir: PathBuf,

        /// Presentation file name within the directory
        file: String,

        /// Conversion engine program
        #[arg(short, long)]
        engine: PathBuf,

        /// Argument passed to the engine before each subcommand; repeatable
        #[arg(long = "engine-arg", allow_hyphen_values = true)]
        engine_args: Vec<String>,

        /// Progress display refresh period in milliseconds
        #[arg(long, default_value = "100")]
        refresh_ms: u64,

        /// Use one spinner phase for the whole list
        #[arg(long)]
        shared_spinner: bool,

        /// Match the .pptx extension in any letter case
        #[arg(short, long)]
        ignore_case: bool,

        /// Leave the archive unsaved
        #[arg(long)]
        no_save: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.verbose {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    }

    let tika = TikaConfig {
        java: args.java.clone(),
        lib_dir: args.lib_dir.clone(),
        tika_jar: args.tika_jar.clone(),
    };

    match &args.command {
        Command::List { dir, ignore_case } => list(dir, *ignore_case),
        Command::Slides { input, json } => slides(input, &tika, *json),
        Command::Meta {
            input,
            key,
            name,
            properties,
        } => meta(input, &tika, key, name, properties.as_deref()),
        Command::Convert {
            dir,
            file,
            engine,
            engine_args,
            refresh_ms,
            shared_spinner,
            ignore_case,
            no_save,
        } => {
            let animation = if *shared_spinner {
                AnimationMode::Shared
            } else {
                AnimationMode::PerTopic
            };
            convert(
                dir,
                file,
                engine,
                engine_args,
                Duration::from_millis(*refresh_ms),
                DisplayStyle::default().with_animation(animation),
                extension_match(*ignore_case),
                !*no_save,
            )
            .await
        }
    }
}

fn extension_match(ignore_case: bool) -> ExtensionMatch {
    if ignore_case {
        ExtensionMatch::IgnoreCase
    } else {
        ExtensionMatch::Exact
    }
}

/// List presentations in a directory.
fn list(dir: &Path, ignore_case: bool) -> Result<()> {
    let names = ppt2video_core::list_presentations(dir, extension_match(ignore_case))?;
    for name in names {
        println!("{}", name);
    }
    Ok(())
}

/// Print the slides of a presentation.
fn slides(input: &Path, tika: &TikaConfig, json: bool) -> Result<()> {
    let extracted = ppt2video_tika::extract(input, tika)
        .with_context(|| format!("Failed to extract {}", input.display()))?;
    log::debug!("Found {} slides", extracted.slides.len());

    if json {
        println!("{}", serde_json::to_string_pretty(&extracted.slides)?);
        return Ok(());
    }

    let title = property(&extracted.document, &PropertyNames::default(), "title");
    if !title.is_empty() {
        println!("# {}", title);
        println!();
    }

    for (idx, slide) in extracted.slides.iter().enumerate() {
        println!("## Slide {}", idx + 1);
        for line in &slide.content {
            println!("{}", line);
        }
        if !slide.note.is_empty() {
            println!("--- notes");
            for line in &slide.note {
                println!("{}", line);
            }
        }
        println!();
    }
    Ok(())
}

/// Print document properties.
fn meta(
    input: &Path,
    tika: &TikaConfig,
    keys: &[String],
    names: &[String],
    properties: Option<&Path>,
) -> Result<()> {
    let mapping = match properties {
        Some(path) => PropertyNames::from_json_file(path)
            .with_context(|| format!("Failed to load property map {}", path.display()))?,
        None => PropertyNames::default(),
    };

    let extracted = ppt2video_tika::extract(input, tika)
        .with_context(|| format!("Failed to extract {}", input.display()))?;
    let document = &extracted.document;

    // With nothing requested, show every mapped key.
    let keys: Vec<String> = if keys.is_empty() && names.is_empty() {
        mapping.keys().map(str::to_string).collect()
    } else {
        keys.to_vec()
    };

    for key in &keys {
        println!("{}: {}", key, property(document, &mapping, key));
    }
    for name in names {
        for value in property_all(document, name) {
            println!("{}: {}", name, value);
        }
    }
    Ok(())
}

/// Run the whole conversion workflow for one presentation.
#[allow(clippy::too_many_arguments)]
async fn convert(
    dir: &Path,
    file: &str,
    engine: &Path,
    engine_args: &[String],
    refresh: Duration,
    style: DisplayStyle,
    matching: ExtensionMatch,
    save: bool,
) -> Result<()> {
    let mut session = Session::new(matching).with_style(style);

    session.open_directory(dir)?;
    let lines = session
        .open_document(file, |path| {
            CommandEngine::new(engine, path).with_args(engine_args.iter().cloned())
        })
        .await
        .with_context(|| format!("Failed to open {}", file))?;

    eprintln!("Topics:");
    for line in &lines {
        eprintln!("  {}", line);
    }

    session
        .generate(refresh, terminal_sink(lines.len()))
        .await
        .context("Conversion failed")?;

    if save {
        session.save().await?;
        eprintln!("Archive saved.");
    } else {
        log::info!("Archive left unsaved");
    }
    Ok(())
}

/// Redraw the topic list in place on stderr.
///
/// `already_drawn` is the number of list lines on screen before the first
/// frame, so the first frame replaces them.
fn terminal_sink(already_drawn: usize) -> DisplaySink {
    let drawn = AtomicUsize::new(already_drawn);
    Arc::new(move |lines: Vec<String>| {
        let previous = drawn.swap(lines.len(), Ordering::Relaxed);
        let mut stderr = std::io::stderr().lock();
        let _ = stderr.write_all(render_frame(previous, &lines).as_bytes());
        let _ = stderr.flush();
    })
}

/// Terminal output replacing `previous` lines with `lines`.
fn render_frame(previous: usize, lines: &[String]) -> String {
    let mut out = String::new();
    if previous > 0 {
        // Move back up over the previous frame.
        out.push_str(&format!("\x1b[{}A", previous));
    }
    for line in lines {
        out.push_str(&format!("\x1b[2K  {}\n", line));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_first_frame_redraws_over_static_list() {
        let frame = render_frame(2, &lines(&["⠋ a", "b"]));
        assert_eq!(frame, "\x1b[2A\x1b[2K  ⠋ a\n\x1b[2K  b\n");
    }

    #[test]
    fn test_frame_without_previous_output() {
        assert_eq!(render_frame(0, &lines(&["a"])), "\x1b[2K  a\n");
        assert_eq!(render_frame(0, &[]), "");
    }
}
