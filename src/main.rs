use anyhow::Result;
use tracing::info;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    info!("cnot-orbit-bfs starting");

    let argv: Vec<String> = std::env::args().skip(1).collect();
    let (output, code) = cnot_cli::run(&argv)?;
    println!("{output}");
    std::process::exit(code);
}
