use sw_aligner::{write_report, Aligner, AlignerParameters, FillStrategy, Sequence};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let seq1 = Sequence::new("seq1", b"ACACACTA");
    let seq2 = Sequence::new("seq2", b"AGCACACA");

    for strategy in [FillStrategy::Sequential, FillStrategy::Wavefront] {
        let params = AlignerParameters::new()
            .with_strategy(strategy)
            .with_min_parallel_cells(1);
        let aligner = Aligner::new(params)?;

        let result = aligner.align(&seq1, &seq2)?;

        println!("Strategy: {}", strategy);
        println!("Score: {}", result.score);
        println!("Aligned sequence 1: {}", String::from_utf8_lossy(&result.aligned_seq1));
        println!("Aligned sequence 2: {}", String::from_utf8_lossy(&result.aligned_seq2));
        println!("Operations: {:?}", result.operations);
        println!();
    }

    let aligner = Aligner::new(AlignerParameters::new())?;
    let result = aligner.align(&seq1, &seq2)?;
    write_report(&mut std::io::stdout(), seq1.name(), seq2.name(), &result)?;

    Ok(())
}
