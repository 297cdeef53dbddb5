use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use dramanet::{Explorer, ExplorerOpts, FileSource, PlaySortKey};

#[derive(Parser, Debug)]
#[command(name = "dramanet", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List plays with their gender and Bechdel highlights.
    Plays(PlaysArgs),
    /// Summarize one play: top speakers, acts, Bechdel and pair intensity.
    Show(ShowArgs),
    /// Write every view of a play as JSON files.
    Export(ExportArgs),
    /// Print corpus-wide totals, or write them as JSON.
    Corpus(CorpusArgs),
}

#[derive(Args, Debug)]
struct InputArgs {
    /// Input corpus JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Explorer options JSON (viewports, pulse constants, top-N).
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct PlaysArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Ordering of the list.
    #[arg(long, value_enum, default_value_t = PlaySortKey::FemaleNodes)]
    sort: PlaySortKey,
}

#[derive(Parser, Debug)]
struct ShowArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Play key (`id`, or title when the play has no id). Defaults to the first play.
    #[arg(long)]
    play: Option<String>,
}

#[derive(Parser, Debug)]
struct ExportArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Play key. Defaults to the first play.
    #[arg(long)]
    play: Option<String>,

    /// Output directory.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct CorpusArgs {
    #[command(flatten)]
    input: InputArgs,

    /// Ordering of the play list in the JSON output.
    #[arg(long, value_enum, default_value_t = PlaySortKey::Bechdel)]
    sort: PlaySortKey,

    /// Write JSON here instead of printing a summary.
    #[arg(long)]
    out: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Plays(args) => cmd_plays(args),
        Command::Show(args) => cmd_show(args),
        Command::Export(args) => cmd_export(args),
        Command::Corpus(args) => cmd_corpus(args),
    }
}

fn open(input: &InputArgs, play: Option<&str>) -> anyhow::Result<Explorer> {
    let opts = match &input.config {
        Some(p) => ExplorerOpts::from_path(p)?,
        None => ExplorerOpts::default(),
    };
    let mut explorer = Explorer::from_source(&FileSource::new(&input.in_path), opts)
        .with_context(|| format!("open corpus '{}'", input.in_path.display()))?;
    if let Some(key) = play {
        explorer.select_play(key)?;
    }
    Ok(explorer)
}

fn cmd_plays(args: PlaysArgs) -> anyhow::Result<()> {
    let explorer = open(&args.input, None)?;
    for p in explorer.sorted_plays(args.sort) {
        println!(
            "{:<32} female_nodes={:<3} female_words={:<8} male_words={:<8} share={:>5.1}% bechdel={} ({}/{})",
            p.title,
            p.female_nodes,
            p.female_words,
            p.male_words,
            p.female_share * 100.0,
            p.bechdel_status,
            p.no_male_count,
            p.dialog_count,
        );
    }
    Ok(())
}

fn cmd_show(args: ShowArgs) -> anyhow::Result<()> {
    let mut explorer = open(&args.input, args.play.as_deref())?;
    let global = explorer.global_view()?;
    let panel = explorer.stats_panel()?;

    println!("{}", global.title);
    println!("female share: {:.1}%", global.female_share * 100.0);
    println!("bechdel: {}", panel.bechdel.status);
    println!("top speakers:");
    for c in &global.top {
        println!("  {:<24} {} {:>8}", c.name, c.gender, c.total_len);
    }
    println!("acts:");
    for act in explorer.act_views()? {
        let lead = act.top.first().map(|c| c.name.as_str()).unwrap_or("-");
        println!("  {:<8} characters={:<3} lead={lead}", act.title, act.stats.nodes.len());
    }
    println!("pairs:");
    for p in &panel.pairs {
        println!(
            "  {:<32} dialogs={:<3} words={:<8} turns={:<5} longest={}",
            p.pair.label(),
            p.dialogs,
            p.total_words,
            p.total_turns,
            p.max_length
        );
    }
    Ok(())
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let mut explorer = open(&args.input, args.play.as_deref())?;
    let files = dramanet::write_play_views(&mut explorer, &args.out)?;
    for f in files {
        eprintln!("wrote {}", f.display());
    }
    Ok(())
}

fn cmd_corpus(args: CorpusArgs) -> anyhow::Result<()> {
    let explorer = open(&args.input, None)?;
    if let Some(out) = &args.out {
        let path = dramanet::write_corpus(&explorer, args.sort, out)?;
        eprintln!("wrote {}", path.display());
        return Ok(());
    }
    let stats = explorer.corpus_stats();
    println!("plays: {}", stats.plays);
    println!(
        "words: female={} male={} unknown={} total={}",
        stats.female_words, stats.male_words, stats.unknown_words, stats.total_words
    );
    println!("female share: {:.1}%", stats.female_share() * 100.0);
    println!(
        "bechdel: bestått={} ikke bestått={} NR={}",
        stats.passed, stats.failed, stats.not_rated
    );
    Ok(())
}
