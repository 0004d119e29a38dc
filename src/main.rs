use std::fs;

use revlogica::{build_skeleton, canonicalize, evaluate, Circuit, Evaluation, Limits};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 {
        eprintln!("Usage: {} circuit.json [canonical_out.json]", args[0]);
        std::process::exit(2);
    }
    let code = fs::read_to_string(&args[1])?;
    let circuit: Circuit = serde_json::from_str(&code)?;
    circuit.validate()?;

    let limits = Limits::default();
    println!(
        "revlogica: width {} circuit, {} gates touching {} wires",
        circuit.width,
        circuit.gates.len(),
        circuit.used_wires().len()
    );

    match evaluate(&circuit, &limits)? {
        Evaluation::Exact(perm) => {
            println!("cycles: {}", perm.cycle_notation());
            if perm.is_identity() {
                println!("circuit is the identity (exact)");
            }
        }
        Evaluation::Sampled(verdict) => println!("sampled: {verdict}"),
    }

    match build_skeleton(&circuit.gates, &limits) {
        Ok(skeleton) => {
            println!("skeleton edges: {:?}", skeleton.edges);
            println!("skeleton levels: {:?}", skeleton.levels);
        }
        Err(err) => println!("skeleton skipped: {err}"),
    }

    if let Some(out_path) = args.get(2) {
        let canonical = Circuit {
            width: circuit.width,
            gates: canonicalize(&circuit.gates),
        };
        fs::write(out_path, serde_json::to_string_pretty(&canonical)?)?;
        println!("Wrote canonical circuit to {}", out_path);
    }
    Ok(())
}
