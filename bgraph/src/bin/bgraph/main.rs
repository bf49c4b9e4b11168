use bgraph::core::{FileIndex, Layout, Target};
use bgraph::project::{project_crates, render_project, write_project};
use bgraph::query::resolve_outputs;
use bgraph::toml::read_graph;
use bgraph::utils::{IResult, Shell, Verbosity};
use std::io::Write;
use std::path::Path;

const USAGE: &str = "\
Query and projection tools for resolved build graphs

Usage:
    bgraph outputs <graph.toml> <target-or-file>...
    bgraph rust-project <graph.toml> <build-dir> [--sysroot <name>] -o <file>

Options:
    -q, --quiet         Suppress warnings
    --color <when>      Coloring: auto, always, never

An input starting with `//` or containing `:` is a target label; anything
else is a source file path. Pass `-` to -o to write to stdout.";

fn main() {
    let mut shell = Shell::new();
    let args: Vec<String> = std::env::args().skip(1).collect();

    if let Err(e) = run(&mut shell, &args) {
        let _ = shell.error(format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(shell: &mut Shell, args: &[String]) -> IResult<()> {
    let mut rest = Vec::new();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-q" | "--quiet" => shell.set_verbosity(Verbosity::Quiet),
            "--color" => shell.set_color_choice(iter.next().map(String::as_str))?,
            _ => rest.push(arg.clone()),
        }
    }
    let args = rest;

    match args.first().map(String::as_str) {
        Some("outputs") => outputs(shell, &args[1..]),
        Some("rust-project") => rust_project(shell, &args[1..]),
        Some("help") | Some("--help") | Some("-h") => {
            println!("{}", USAGE);
            Ok(())
        }
        Some(cmd) => anyhow::bail!("unknown command `{}`\n\n{}", cmd, USAGE),
        None => anyhow::bail!("missing command\n\n{}", USAGE),
    }
}

fn load(shell: &mut Shell, path: &str) -> IResult<bgraph::core::TargetGraph> {
    let (graph, warnings) = read_graph(Path::new(path))?;
    for warning in warnings {
        shell.warn(warning)?;
    }
    Ok(graph)
}

fn outputs(shell: &mut Shell, args: &[String]) -> IResult<()> {
    let [graph_path, inputs @ ..] = args else {
        anyhow::bail!("usage: bgraph outputs <graph.toml> <target-or-file>...");
    };
    if inputs.is_empty() {
        anyhow::bail!("usage: bgraph outputs <graph.toml> <target-or-file>...");
    }

    let graph = load(shell, graph_path)?;
    let index = FileIndex::new(&graph);

    let stdout = std::io::stdout();
    let mut stdout = stdout.lock();
    for file in resolve_outputs(&graph, &index, inputs)? {
        writeln!(stdout, "{}", file)?;
    }
    Ok(())
}

fn rust_project(shell: &mut Shell, args: &[String]) -> IResult<()> {
    let mut graph_path = None;
    let mut build_dir = None;
    let mut sysroot = "sysroot".to_string();
    let mut out = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--sysroot" => {
                sysroot = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--sysroot requires a value"))?
                    .clone();
            }
            "-o" | "--output" => {
                out = Some(
                    iter.next()
                        .ok_or_else(|| anyhow::anyhow!("{} requires a value", arg))?
                        .clone(),
                );
            }
            _ if graph_path.is_none() => graph_path = Some(arg.clone()),
            _ if build_dir.is_none() => build_dir = Some(arg.clone()),
            _ => anyhow::bail!("unexpected argument `{}`", arg),
        }
    }
    let (Some(graph_path), Some(build_dir), Some(out)) = (graph_path, build_dir, out) else {
        anyhow::bail!("usage: bgraph rust-project <graph.toml> <build-dir> [--sysroot <name>] -o <file>");
    };

    let graph = load(shell, &graph_path)?;
    let layout = Layout::new(build_dir);

    // Every Rust target in the graph seeds the projection; non-Rust deps
    // are folded away during the walk.
    let targets: Vec<Target> = graph.iter().filter(|t| t.is_rust()).cloned().collect();
    let crates = project_crates(&graph, &layout, &sysroot, &targets)?;

    if out == "-" {
        print!("{}", render_project(&crates)?);
    } else {
        write_project(&crates, &out)?;
    }
    Ok(())
}
