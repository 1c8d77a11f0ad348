//! Interactive session shell.

use std::path::PathBuf;
use std::sync::Arc;
use storygen::{
    ImageExporter, ImageSize, RenderBatch, Storyboard, StorygenConfig, StorygenResult, Studio,
    StudioOptions,
};
use tracing::{info, warn};

use super::analyze::{load_script, print_summary, scene_line};
use super::chat::stream_turn;
use super::{ConsoleInput, TerminalKeyPrompt};

const HELP: &str = "\
Commands:
  analyze              segment the current script and render every scene
  load <file>          replace the current script with a .txt or .md file
  sample               replace the current script with the bundled sample
  script               print the current script
  list                 show every scene and its render status
  size [1K|2K|4K]      show or change the resolution tier
  regenerate <n>       re-render scene number n at the current tier
  export [dir]         write finished frames as PNG files
  chat <text>          ask the script assistant
  key                  select a different API key
  help                 show this list
  quit                 leave the studio";

/// One parsed shell line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ShellCommand {
    Analyze,
    Load(PathBuf),
    Sample,
    Script,
    List,
    Size(Option<ImageSize>),
    Regenerate(u32),
    Export(Option<PathBuf>),
    Chat(String),
    Key,
    Help,
    Quit,
}

fn parse_command(line: &str) -> Result<ShellCommand, String> {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    let command = match word.to_ascii_lowercase().as_str() {
        "analyze" => ShellCommand::Analyze,
        "load" if !rest.is_empty() => ShellCommand::Load(PathBuf::from(rest)),
        "load" => return Err("usage: load <file>".to_string()),
        "sample" => ShellCommand::Sample,
        "script" => ShellCommand::Script,
        "list" | "ls" => ShellCommand::List,
        "size" if rest.is_empty() => ShellCommand::Size(None),
        "size" => ShellCommand::Size(Some(
            rest.parse()
                .map_err(|_| format!("unknown size '{}', expected 1K, 2K or 4K", rest))?,
        )),
        "regenerate" | "regen" => ShellCommand::Regenerate(
            rest.parse()
                .map_err(|_| "usage: regenerate <scene number>".to_string())?,
        ),
        "export" if rest.is_empty() => ShellCommand::Export(None),
        "export" => ShellCommand::Export(Some(PathBuf::from(rest))),
        "chat" if !rest.is_empty() => ShellCommand::Chat(rest.to_string()),
        "chat" => return Err("usage: chat <text>".to_string()),
        "key" => ShellCommand::Key,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" => ShellCommand::Quit,
        other => return Err(format!("unknown command '{}', try 'help'", other)),
    };
    Ok(command)
}

/// Run the studio shell until `quit` or end of input.
pub async fn run_studio(
    config: StorygenConfig,
    script: Option<PathBuf>,
    input: ConsoleInput,
) -> StorygenResult<()> {
    let mut current = load_script(script.as_ref()).await?;

    let prompt = Arc::new(TerminalKeyPrompt::new(input.clone()));
    let studio = Studio::open(config, prompt, StudioOptions::default()).await?;
    if !studio.gate().is_open() {
        println!("No API key found. Use 'key' to select one.");
    }
    println!("{}", HELP);

    while let Some(line) = input.read_line("\nstudio> ").await? {
        if line.trim().is_empty() {
            continue;
        }
        let command = match parse_command(&line) {
            Ok(command) => command,
            Err(message) => {
                println!("{}", message);
                continue;
            }
        };
        if command == ShellCommand::Quit {
            break;
        }
        // Failures are reported and the shell keeps running.
        if let Err(e) = execute(&studio, &mut current, command).await {
            println!("Error: {}", e);
        }
    }

    studio.chat().abandon();
    Ok(())
}

async fn execute(studio: &Studio, current: &mut String, command: ShellCommand) -> StorygenResult<()> {
    let board = studio.board();
    match command {
        ShellCommand::Analyze => {
            let batch = board.analyze(current).await?;
            println!(
                "Segmented script into {} scenes, rendering at {}",
                batch.len(),
                board.size()
            );
            announce_when_done(board.clone(), batch, "All scenes settled");
        }
        ShellCommand::Load(path) => {
            *current = load_script(Some(&path)).await?;
            println!("Loaded {} ({} characters)", path.display(), current.len());
        }
        ShellCommand::Sample => {
            *current = load_script(None).await?;
            println!("Loaded the sample script");
        }
        ShellCommand::Script => println!("{}", current),
        ShellCommand::List => {
            let scenes = board.snapshot();
            if scenes.is_empty() {
                println!("No scenes yet. Run 'analyze'.");
            } else {
                print_summary(&scenes);
            }
        }
        ShellCommand::Size(None) => println!("Resolution: {}", board.size()),
        ShellCommand::Size(Some(size)) => {
            board.set_size(size);
            println!("Resolution set to {}; new renders use it", size);
        }
        ShellCommand::Regenerate(number) => {
            let Some(scene) = board.scene_by_number(number) else {
                println!("No scene {}", number);
                return Ok(());
            };
            let batch = board.regenerate(&scene.id).await?;
            println!("Re-rendering scene {} at {}", number, board.size());
            announce_when_done(board.clone(), batch, "Regeneration settled");
        }
        ShellCommand::Export(dir) => {
            let exporter = match dir {
                Some(dir) => ImageExporter::new(dir),
                None => studio.exporter().clone(),
            };
            let report = exporter.export_all(&board.snapshot()).await?;
            for path in &report.written {
                println!("Wrote {}", path.display());
            }
            if !report.skipped.is_empty() {
                println!("Skipped scenes without an image: {:?}", report.skipped);
            }
        }
        ShellCommand::Chat(text) => {
            stream_turn(studio.chat(), &text).await?;
        }
        ShellCommand::Key => {
            studio.gate().select().await?;
            println!("API key selected");
        }
        ShellCommand::Help => println!("{}", HELP),
        ShellCommand::Quit => {}
    }
    Ok(())
}

/// Print the final state of each scene in `batch` once every render has
/// been applied.
fn announce_when_done(board: Storyboard, batch: RenderBatch, label: &'static str) {
    let ids = batch.scene_ids().to_vec();
    tokio::spawn(async move {
        batch.join().await;
        info!(scenes = ids.len(), "{}", label);
        for id in &ids {
            match board.scene(id) {
                Some(scene) => println!("{}", scene_line(&scene)),
                None => warn!(%id, "Scene replaced before its render settled"),
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_commands() {
        assert_eq!(parse_command("analyze"), Ok(ShellCommand::Analyze));
        assert_eq!(parse_command("  LIST "), Ok(ShellCommand::List));
        assert_eq!(parse_command("size"), Ok(ShellCommand::Size(None)));
        assert_eq!(
            parse_command("size 4k"),
            Ok(ShellCommand::Size(Some(ImageSize::Size4K)))
        );
        assert_eq!(parse_command("regenerate 2"), Ok(ShellCommand::Regenerate(2)));
        assert_eq!(
            parse_command("export out/frames"),
            Ok(ShellCommand::Export(Some(PathBuf::from("out/frames"))))
        );
        assert_eq!(
            parse_command("chat  Who is Captain Hawke?"),
            Ok(ShellCommand::Chat("Who is Captain Hawke?".to_string()))
        );
        assert_eq!(parse_command("quit"), Ok(ShellCommand::Quit));
    }

    #[test]
    fn test_parse_rejects_bad_arguments() {
        assert!(parse_command("size 8K").is_err());
        assert!(parse_command("regenerate two").is_err());
        assert!(parse_command("chat").is_err());
        assert!(parse_command("load").is_err());
        assert!(parse_command("dance").is_err());
    }
}
