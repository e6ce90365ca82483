use anyhow::Result;
use sapper_core::{GameConfig, SampleReport};
use sapper_records::{ScoreEntry, ScoreFile};

const VALUE_LABELS: [&str; 10] = ["M", "0", "1", "2", "3", "4", "5", "6", "7", "8"];

pub fn stats(config: GameConfig, boards: usize, seed: u64, json: bool) -> Result<()> {
    log::info!("sampling {} boards of {} with seed {}", boards, config, seed);
    let report = SampleReport::sample(config, boards, seed)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{} boards of {} (seed {})", report.boards, config, seed);
    println!("white cells per board: mean {:.2}", report.mean_white_cells());
    println!("mine clusters per board: mean {:.2}", report.mean_mine_clusters());
    println!();
    println!("cell values:");
    for (label, count) in VALUE_LABELS.iter().zip(report.value_histogram) {
        println!("  {label:>2} {count:>8}");
    }
    println!();
    println!("average mines in 3x3 neighborhood:");
    for row in report.heatmap.rows() {
        let line: Vec<String> = row.iter().map(|heat| format!("{heat:.2}")).collect();
        println!("  {}", line.join(" "));
    }
    Ok(())
}

pub fn scores(file: &ScoreFile, config: GameConfig) {
    let entries = file.top10(config.rows(), config.cols(), config.mines);
    if entries.is_empty() {
        println!("no times recorded for {config}");
    } else {
        print_entries(config, &entries);
    }
}

pub fn print_entries(config: GameConfig, entries: &[ScoreEntry]) {
    println!("best times for {config}:");
    for (rank, entry) in entries.iter().enumerate() {
        println!(
            "  {:>2}. {:<32} {:>8.2}s  {}",
            rank + 1,
            entry.name,
            entry.time,
            entry.when
        );
    }
}
