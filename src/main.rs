//! CLI entry point for serialtree

use std::ffi::OsString;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, ValueEnum};
use serialtree::{
    JsonLinesFormatter, NodeOutput, NodeRecord, OutputConfig, StatsCollector, StreamingFormatter,
    TreeConfig, print_stats, print_stats_json, tree, walk,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Color output mode
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum ColorMode {
    /// Auto-detect based on terminal and environment
    #[default]
    Auto,
    /// Always use colors
    Always,
    /// Never use colors
    Never,
}

impl ColorMode {
    /// Resolve against the process environment and stdout.
    fn enabled(self) -> bool {
        self.resolve(|name| std::env::var_os(name), std::io::stdout().is_terminal())
    }

    /// `NO_COLOR` wins over `FORCE_COLOR`; both count only when non-empty.
    fn resolve(self, env: impl Fn(&str) -> Option<OsString>, is_tty: bool) -> bool {
        let set = |name: &str| env(name).is_some_and(|value| !value.is_empty());
        match self {
            ColorMode::Always => true,
            ColorMode::Never => false,
            ColorMode::Auto if set("NO_COLOR") => false,
            ColorMode::Auto if set("FORCE_COLOR") => true,
            ColorMode::Auto => {
                is_tty && env("TERM").is_none_or(|term| term.to_str() != Some("dumb"))
            }
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "serialtree")]
#[command(about = "Walk a directory tree lazily, the way an upload pipeline would see it")]
#[command(version)]
struct Args {
    /// File or directory to walk
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Include hidden files and directories
    #[arg(short, long)]
    all: bool,

    /// Ignore paths matching a gitignore-style pattern (can be used multiple times)
    #[arg(short = 'I', long = "ignore", value_name = "PATTERN")]
    ignore: Vec<String>,

    /// Read additional ignore rules from FILE
    #[arg(long = "ignore-file", value_name = "FILE")]
    ignore_file: Option<PathBuf>,

    /// Output one JSON object per node
    #[arg(long = "json")]
    json: bool,

    /// Show file sizes next to file names
    #[arg(short = 's', long = "size")]
    size: bool,

    /// Print a summary instead of the listing; file contents are read to count bytes
    #[arg(long = "stats")]
    stats: bool,

    /// Control color output: auto, always, never
    #[arg(long = "color", value_name = "WHEN", default_value = "auto")]
    color: ColorMode,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let config = TreeConfig {
        include_hidden: args.all,
        ignore_file: args.ignore_file.clone(),
        ignore_patterns: args.ignore.clone(),
    };

    let mut root = match tree::open(&args.path, &config) {
        Ok(root) => root,
        Err(e) if e.is_configuration() => {
            eprintln!("serialtree: {}", e);
            process::exit(1);
        }
        Err(e) => {
            eprintln!("serialtree: cannot access '{}': {}", args.path.display(), e);
            process::exit(1);
        }
    };

    let use_color = args.color.enabled();
    let mut collector = StatsCollector::new(args.stats);

    let result = if args.stats {
        walk(&mut root, |_, node| {
            collector.record(node)?;
            close_file(node);
            Ok::<(), std::io::Error>(())
        })
    } else if args.json {
        let mut formatter = JsonLinesFormatter::stdout();
        run(&mut root, &mut formatter, &mut collector)
    } else {
        let output_config = OutputConfig {
            use_color,
            show_size: args.size,
        };
        let label = args.path.display().to_string();
        let mut formatter = StreamingFormatter::stdout(output_config, label);
        run(&mut root, &mut formatter, &mut collector)
    };

    let result = result.and_then(|()| {
        if !args.stats {
            return Ok(());
        }
        let stats = collector.finalize();
        if args.json {
            print_stats_json(&stats)
        } else {
            print_stats(&stats, use_color)
        }
    });

    if let Err(e) = result {
        eprintln!("serialtree: {}", e);
        process::exit(1);
    }
}

/// Walk `root`, sending every node to `output`. Files are closed as soon as
/// they have been described.
fn run<O: NodeOutput>(
    root: &mut serialtree::Node,
    output: &mut O,
    collector: &mut StatsCollector,
) -> std::io::Result<()> {
    walk(root, |path, node| {
        debug!(path, kind = ?node.kind(), "visit");
        output.output_node(&NodeRecord::new(path, node))?;
        collector.record(node)?;
        close_file(node);
        Ok::<(), std::io::Error>(())
    })?;
    output.finish(collector.stats())
}

fn close_file(node: &mut serialtree::Node) {
    if let Some(file) = node.as_file_mut() {
        file.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<OsString> + 'a {
        move |name: &str| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| OsString::from(value))
        }
    }

    #[test]
    fn test_explicit_modes_ignore_environment() {
        let vars = [("NO_COLOR", "1")];
        assert!(ColorMode::Always.resolve(env(&vars), false));
        assert!(!ColorMode::Never.resolve(env(&[]), true));
    }

    #[test]
    fn test_auto_mode() {
        assert!(ColorMode::Auto.resolve(env(&[]), true));
        assert!(!ColorMode::Auto.resolve(env(&[]), false));
        assert!(!ColorMode::Auto.resolve(env(&[("TERM", "dumb")]), true));
        let both = [("NO_COLOR", "1"), ("FORCE_COLOR", "1")];
        assert!(!ColorMode::Auto.resolve(env(&both), true));
        assert!(ColorMode::Auto.resolve(env(&[("FORCE_COLOR", "1")]), false));
        assert!(ColorMode::Auto.resolve(env(&[("NO_COLOR", "")]), true));
    }
}
