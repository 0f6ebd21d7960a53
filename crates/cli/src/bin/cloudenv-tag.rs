//! Print placeholder values and IAM statements for `NAME=ARN` pairs
use clap::Parser;
use cloudenv_env::tagging::{parse_assignments, tag_resources};

#[derive(Parser)]
#[command(name = "cloudenv-tag", version)]
#[command(about = "Turn NAME=ARN pairs into cloudenv placeholders and the IAM statements they need")]
struct Args {
    /// Variables to tag, as NAME=ARN
    #[arg(required = true, value_name = "NAME=ARN")]
    assignments: Vec<String>,

    /// Print JSON on a single line
    #[arg(long)]
    compact: bool,
}

fn main() -> eyre::Result<()> {
    let args = Args::parse();

    let tagged = tag_resources(parse_assignments(&args.assignments)?)?;
    let json = if args.compact {
        serde_json::to_string(&tagged)?
    } else {
        serde_json::to_string_pretty(&tagged)?
    };
    println!("{json}");

    Ok(())
}
