use std::time::{Duration, Instant};

use labyrinth::{Difficulty, GenerationConfig, MazeEngine, generators::Generator};

fn main() -> std::io::Result<()> {
    let file_appender = tracing_appender::rolling::never("logs", "profile.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .init();

    let mut args = std::env::args();
    args.next(); // Skip executable name
    let num_iters = args
        .next()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(100);

    for generator in [Generator::HuntAndKill, Generator::OriginShift] {
        for difficulty in Difficulty::ALL {
            let mut total = Duration::ZERO;
            let mut repaired = 0;
            for seed in 0..num_iters as u64 {
                let engine = MazeEngine::new(
                    GenerationConfig::new(difficulty)
                        .generator(generator)
                        .seed(seed),
                );
                let started = Instant::now();
                let generated = engine.generate().map_err(std::io::Error::other)?;
                total += started.elapsed();
                if generated.repaired > 0 {
                    repaired += 1;
                }
            }
            let average = total / num_iters.max(1) as u32;
            tracing::info!(
                "[profile] {} {}: {} runs, avg {:?}, {} repaired",
                generator,
                difficulty,
                num_iters,
                average,
                repaired
            );
            let (generator, difficulty) = (generator.to_string(), difficulty.to_string());
            println!("{generator:<18} {difficulty:<10} avg {average:>12?} repaired {repaired}");
        }
    }
    Ok(())
}
